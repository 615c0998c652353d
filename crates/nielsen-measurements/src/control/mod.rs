//! Session orchestration.
//!
//! A single [`actor::SessionActor`] owns the state machine, the transport and
//! the timers. Player events, timer ticks, bootstrap completion and the
//! unload signal are all funneled into its mailbox, which gives every
//! handler exclusive, run-to-completion access to the session.

mod actor;
mod handle;
mod handlers;
mod messages;
mod startup;
mod tasks;

pub use handle::MeasurementsHandle;
pub use messages::SessionSnapshot;

/// Starts a session bound to the process-wide [`UnloadSignal`].
///
/// The SDK bootstrap runs in the background; tracking calls are dropped until
/// it succeeds, and a failure is passed to the configured error callback.
///
/// [`UnloadSignal`]: crate::unload::UnloadSignal
pub fn start_measurements(
    config: crate::config::MeasurementsConfig,
    bootstrap: std::sync::Arc<dyn crate::bootstrap::SdkBootstrap>,
) -> Result<MeasurementsHandle, crate::error::MeasurementsError> {
    startup::start_measurements(config, bootstrap)
}

pub fn start_measurements_with_unload(
    config: crate::config::MeasurementsConfig,
    bootstrap: std::sync::Arc<dyn crate::bootstrap::SdkBootstrap>,
    unload: crate::unload::UnloadSignal,
) -> Result<MeasurementsHandle, crate::error::MeasurementsError> {
    startup::start_measurements_with_unload(config, bootstrap, unload)
}
