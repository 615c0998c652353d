//! Boundary to the vendor SDK instance that receives tracking calls.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::TransportError;
use crate::metadata::record::NielsenMetadata;

/// The four tracking verbs of the vendor API.
///
/// Positions are whole seconds. Implementations forward already-built values
/// and do not retry.
pub trait Transport: Send + Sync {
    fn load_metadata(&self, metadata: &NielsenMetadata) -> Result<(), TransportError>;
    fn set_playhead_position(&self, position: i64) -> Result<(), TransportError>;
    fn stop(&self, position: i64) -> Result<(), TransportError>;
    fn end(&self, position: i64) -> Result<(), TransportError>;
}

/// Logging front for an installed transport.
pub(crate) struct Tracker {
    instance_name: String,
    transport: Arc<dyn Transport>,
}

impl Tracker {
    pub(crate) fn new(instance_name: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        Self {
            instance_name: instance_name.into(),
            transport,
        }
    }

    pub(crate) fn load_metadata(&self, metadata: &NielsenMetadata) {
        debug!(
            instance = %self.instance_name,
            metadata = %serde_json::to_string(metadata).unwrap_or_default(),
            "loading metadata"
        );
        self.report(self.transport.load_metadata(metadata));
    }

    pub(crate) fn set_playhead_position(&self, position: i64) {
        debug!(instance = %self.instance_name, position, "setting playhead position");
        self.report(self.transport.set_playhead_position(position));
    }

    pub(crate) fn stop_tracking(&self, position: i64) {
        debug!(instance = %self.instance_name, position, "stopping tracking");
        self.report(self.transport.stop(position));
    }

    pub(crate) fn end_tracking(&self, position: i64) {
        debug!(instance = %self.instance_name, position, "ending tracking");
        self.report(self.transport.end(position));
    }

    fn report(&self, result: Result<(), TransportError>) {
        if let Err(error) = result {
            warn!(instance = %self.instance_name, %error, "transport call failed");
        }
    }
}
