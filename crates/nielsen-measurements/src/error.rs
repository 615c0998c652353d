//! Typed error enums for metadata construction, SDK bootstrap and the
//! session control surface.
//!
//! [`MeasurementsError`] is the top-level error returned by the public
//! handle. Metadata and bootstrap failures are kept as their own enums so the
//! builder and the bootstrap can be used without the orchestrator.

use thiserror::Error;

use nielsen_runtime::actor::CallError;

/// Errors produced while finalizing a metadata record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetadataError {
    /// A required field was never set.
    #[error("failed to build metadata: missing required field '{field}'")]
    MissingField {
        /// Wire name of the missing field.
        field: &'static str,
    },
    /// The record does not fit even after every optional field was dropped.
    #[error("failed to build metadata: required fields exceed {limit} bytes")]
    SizeExceeded {
        /// Payload ceiling in bytes.
        limit: usize,
    },
}

/// Errors produced while bringing up the vendor SDK.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BootstrapError {
    /// Configuration rejected before any load was attempted.
    #[error("invalid measurements config: {0}")]
    InvalidConfig(String),
    /// The vendor namespace is missing or cannot queue instances.
    #[error("vendor static queue snippet did not load properly")]
    SnippetUnavailable,
    /// The SDK did not become ready within the configured budget.
    #[error("vendor SDK load timed out after {timeout_ms}ms")]
    Timeout {
        /// Timeout budget used for the load.
        timeout_ms: u64,
    },
    /// Any other failure reported by the bootstrap implementation.
    #[error("failed to initialize vendor SDK: {0}")]
    Failed(String),
}

/// Failure reported by a [`Transport`](crate::transport::Transport) call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("transport call '{verb}' failed: {message}")]
pub struct TransportError {
    /// Transport verb that failed.
    pub verb: &'static str,
    /// Vendor supplied detail.
    pub message: String,
}

impl TransportError {
    pub fn new(verb: &'static str, message: impl Into<String>) -> Self {
        Self {
            verb,
            message: message.into(),
        }
    }
}

/// Errors produced by the measurements control surface.
#[derive(Debug, Error)]
pub enum MeasurementsError {
    /// Configuration rejected at startup.
    #[error("invalid measurements config: {0}")]
    InvalidConfig(String),
    /// An operation needed the player before one was attached.
    #[error("player is not attached; call attach_to before using the integration")]
    PlayerNotAttached,
    /// An operation needed the transport before bootstrap succeeded.
    #[error("vendor transport is not available; SDK bootstrap has not succeeded")]
    TransportUnavailable,
    /// Wrapped bootstrap failure.
    #[error(transparent)]
    Bootstrap(#[from] BootstrapError),
    /// Wrapped metadata failure.
    #[error(transparent)]
    Metadata(#[from] MetadataError),
    /// Control actor call timed out.
    #[error("control actor command '{operation}' timed out after {timeout_ms}ms")]
    ControlCommandTimedOut {
        /// Operation name used for the actor call.
        operation: &'static str,
        /// Timeout budget used for the actor call.
        timeout_ms: u128,
    },
    /// Control actor exited before command completion.
    #[error("control actor exited while handling '{operation}'")]
    ControlActorExited {
        /// Operation name used for the actor call.
        operation: &'static str,
    },
}

impl MeasurementsError {
    pub(crate) fn from_call_error(
        operation: &'static str,
        timeout: std::time::Duration,
        err: CallError,
    ) -> Self {
        match err {
            CallError::MailboxClosed | CallError::ActorStopped => {
                Self::ControlActorExited { operation }
            },
            CallError::Timeout => Self::ControlCommandTimedOut {
                operation,
                timeout_ms: timeout.as_millis(),
            },
        }
    }
}
