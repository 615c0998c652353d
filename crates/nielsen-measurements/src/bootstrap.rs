//! Boundary to the asynchronous vendor SDK bring-up.
//!
//! The orchestrator only needs [`load_sdk`]: it applies the configured
//! timeout around any [`SdkBootstrap`] and yields the transport to install.
//! [`QueuedSdkBootstrap`] covers the common vendor flow of queueing a named
//! instance and polling until it reports ready.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::config::MeasurementsConfig;
use crate::error::{BootstrapError, MeasurementsError};
use crate::transport::Transport;

const READY_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Everything the vendor needs to create an SDK instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SdkLoadRequest {
    pub app_id: String,
    pub instance_name: String,
    pub options: BTreeMap<String, String>,
}

impl SdkLoadRequest {
    /// Merges the pass-through options with the flags the vendor expects as
    /// string options.
    pub fn from_config(config: &MeasurementsConfig) -> Self {
        let mut options = config.options.clone();
        options.insert("optout".to_string(), config.optout.to_string());
        options.insert("enableFpid".to_string(), config.enable_fpid.to_string());
        if config.debug {
            options.insert("nol_sdkDebug".to_string(), "debug".to_string());
        }
        Self {
            app_id: config.app_id.clone(),
            instance_name: config.instance_name.clone(),
            options,
        }
    }
}

#[async_trait]
pub trait SdkBootstrap: Send + Sync {
    async fn load(&self, request: &SdkLoadRequest) -> Result<Arc<dyn Transport>, BootstrapError>;
}

/// Loads the SDK, bounded by `config.timeout_ms`.
pub async fn load_sdk(
    bootstrap: &dyn SdkBootstrap,
    config: &MeasurementsConfig,
) -> Result<Arc<dyn Transport>, BootstrapError> {
    if let Err(MeasurementsError::InvalidConfig(reason)) = config.validate() {
        return Err(BootstrapError::InvalidConfig(reason));
    }
    let request = SdkLoadRequest::from_config(config);
    debug!(
        app_id = %request.app_id,
        instance = %request.instance_name,
        timeout_ms = config.timeout_ms,
        "loading vendor SDK"
    );
    match tokio::time::timeout(config.bootstrap_timeout(), bootstrap.load(&request)).await {
        Ok(result) => result,
        Err(_) => Err(BootstrapError::Timeout {
            timeout_ms: config.timeout_ms,
        }),
    }
}

/// Vendor namespace holding SDK instances by name.
pub trait SdkNamespace: Send + Sync {
    /// Instance registered under `instance_name` once it accepts calls.
    fn ready_instance(&self, instance_name: &str) -> Option<Arc<dyn Transport>>;
    /// Whether the namespace can queue new instances.
    fn can_queue(&self) -> bool;
    fn queue_instance(&self, request: &SdkLoadRequest) -> Result<(), BootstrapError>;
}

/// Queues a named instance and polls the namespace until it is ready.
pub struct QueuedSdkBootstrap<N> {
    namespace: N,
    poll_interval: Duration,
}

impl<N: SdkNamespace> QueuedSdkBootstrap<N> {
    pub fn new(namespace: N) -> Self {
        Self {
            namespace,
            poll_interval: READY_POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }
}

#[async_trait]
impl<N: SdkNamespace> SdkBootstrap for QueuedSdkBootstrap<N> {
    async fn load(&self, request: &SdkLoadRequest) -> Result<Arc<dyn Transport>, BootstrapError> {
        if let Some(instance) = self.namespace.ready_instance(&request.instance_name) {
            debug!(instance = %request.instance_name, "reusing registered vendor SDK instance");
            return Ok(instance);
        }
        if !self.namespace.can_queue() {
            return Err(BootstrapError::SnippetUnavailable);
        }
        self.namespace.queue_instance(request)?;
        loop {
            if let Some(instance) = self.namespace.ready_instance(&request.instance_name) {
                info!(instance = %request.instance_name, "vendor SDK instance initialized");
                return Ok(instance);
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}
