use std::sync::Arc;
use std::time::Duration;

use nielsen_runtime::actor::{ActorRef, CallError};

use crate::control::actor::SessionActor;
use crate::control::messages::{
    AttachPlayerMessage, GetSnapshotMessage, OnPlayerEventMessage, SessionSnapshot,
    ShutdownMessage,
};
use crate::error::MeasurementsError;
use crate::metadata::record::ContentMetadata;
use crate::player::{PlayerApi, PlayerEvent};

/// Cloneable front of a running measurement session.
///
/// Dropping every handle ends the session the same way [`shutdown`] does.
///
/// [`shutdown`]: MeasurementsHandle::shutdown
#[derive(Clone)]
pub struct MeasurementsHandle {
    actor_ref: ActorRef<SessionActor>,
    timeout: Duration,
}

impl MeasurementsHandle {
    pub(crate) fn new(actor_ref: ActorRef<SessionActor>, timeout: Duration) -> Self {
        Self { actor_ref, timeout }
    }

    fn map_call_error(&self, operation: &'static str) -> impl FnOnce(CallError) -> MeasurementsError {
        let timeout = self.timeout;
        move |error| MeasurementsError::from_call_error(operation, timeout, error)
    }

    /// Binds the session to `player` and starts forwarding its events.
    ///
    /// `content` seeds every content and ad record built for this player.
    pub async fn attach_to(
        &self,
        player: Arc<dyn PlayerApi>,
        content: Option<ContentMetadata>,
    ) -> Result<(), MeasurementsError> {
        self.actor_ref
            .call(AttachPlayerMessage { player, content }, self.timeout)
            .await
            .map_err(self.map_call_error("attach_to"))
    }

    /// Delivers one player event directly, for hosts without an event stream.
    pub async fn dispatch(&self, event: PlayerEvent) -> Result<(), MeasurementsError> {
        self.actor_ref
            .call(OnPlayerEventMessage { event }, self.timeout)
            .await
            .map_err(self.map_call_error("dispatch"))
    }

    pub async fn snapshot(&self) -> Result<SessionSnapshot, MeasurementsError> {
        self.actor_ref
            .call(GetSnapshotMessage, self.timeout)
            .await
            .map_err(self.map_call_error("snapshot"))
    }

    /// Cancels every timer and background task and stops the session.
    pub async fn shutdown(&self) -> Result<(), MeasurementsError> {
        self.actor_ref
            .call(ShutdownMessage, self.timeout)
            .await
            .map_err(self.map_call_error("shutdown"))
    }

    pub fn is_closed(&self) -> bool {
        self.actor_ref.is_closed()
    }
}
