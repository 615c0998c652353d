use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use crate::error::MeasurementsError;
use crate::metadata::strategy::MetadataStrategy;

/// Callback receiving setup and runtime errors that the integrator should see.
#[derive(Clone)]
pub struct ErrorCallback(Arc<dyn Fn(&MeasurementsError) + Send + Sync>);

impl ErrorCallback {
    pub fn new(callback: impl Fn(&MeasurementsError) + Send + Sync + 'static) -> Self {
        Self(Arc::new(callback))
    }

    pub(crate) fn call(&self, error: &MeasurementsError) {
        (self.0)(error);
    }
}

impl fmt::Debug for ErrorCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ErrorCallback")
    }
}

fn default_enable_fpid() -> bool {
    true
}

fn default_timeout_ms() -> u64 {
    5_000
}

fn default_playhead_interval() -> Duration {
    Duration::from_secs(1)
}

fn default_max_stall_duration() -> Duration {
    Duration::from_secs(30)
}

fn default_command_timeout() -> Duration {
    Duration::from_secs(5)
}

/// Settings for one measurement session.
///
/// The serializable part uses the vendor option names so it can be read from
/// the same JSON an integrator hands to the browser SDK.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementsConfig {
    /// Vendor application identifier.
    pub app_id: String,
    /// Logical SDK instance name.
    pub instance_name: String,
    /// Pass-through vendor options.
    #[serde(default)]
    pub options: BTreeMap<String, String>,
    /// Disables tracking on the vendor side.
    #[serde(default)]
    pub optout: bool,
    /// First party id support.
    #[serde(default = "default_enable_fpid")]
    pub enable_fpid: bool,
    /// Enables vendor console diagnostics.
    #[serde(default)]
    pub debug: bool,
    /// Budget for the SDK bootstrap.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(skip, default = "default_playhead_interval")]
    pub playhead_interval: Duration,
    #[serde(skip, default = "default_max_stall_duration")]
    pub max_stall_duration: Duration,
    /// Budget for calls into the control actor.
    #[serde(skip, default = "default_command_timeout")]
    pub command_timeout: Duration,
    #[serde(skip)]
    pub on_error: Option<ErrorCallback>,
    #[serde(skip)]
    pub metadata_strategy: Option<Arc<dyn MetadataStrategy>>,
}

impl MeasurementsConfig {
    pub fn new(app_id: impl Into<String>, instance_name: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            instance_name: instance_name.into(),
            options: BTreeMap::new(),
            optout: false,
            enable_fpid: default_enable_fpid(),
            debug: false,
            timeout_ms: default_timeout_ms(),
            playhead_interval: default_playhead_interval(),
            max_stall_duration: default_max_stall_duration(),
            command_timeout: default_command_timeout(),
            on_error: None,
            metadata_strategy: None,
        }
    }

    pub fn with_on_error(
        mut self,
        callback: impl Fn(&MeasurementsError) + Send + Sync + 'static,
    ) -> Self {
        self.on_error = Some(ErrorCallback::new(callback));
        self
    }

    pub fn with_metadata_strategy(mut self, strategy: Arc<dyn MetadataStrategy>) -> Self {
        self.metadata_strategy = Some(strategy);
        self
    }

    pub fn bootstrap_timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn validate(&self) -> Result<(), MeasurementsError> {
        if self.app_id.trim().is_empty() {
            return Err(MeasurementsError::InvalidConfig(
                "appId must not be empty".to_string(),
            ));
        }
        if self.instance_name.trim().is_empty() {
            return Err(MeasurementsError::InvalidConfig(
                "instanceName must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for MeasurementsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MeasurementsConfig")
            .field("app_id", &self.app_id)
            .field("instance_name", &self.instance_name)
            .field("options", &self.options)
            .field("optout", &self.optout)
            .field("enable_fpid", &self.enable_fpid)
            .field("debug", &self.debug)
            .field("timeout_ms", &self.timeout_ms)
            .field("playhead_interval", &self.playhead_interval)
            .field("max_stall_duration", &self.max_stall_duration)
            .field("command_timeout", &self.command_timeout)
            .field("on_error", &self.on_error)
            .field("metadata_strategy", &self.metadata_strategy.is_some())
            .finish()
    }
}
