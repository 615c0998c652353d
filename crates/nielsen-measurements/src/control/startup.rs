use std::sync::Arc;

use nielsen_runtime::actor::spawn_actor_named;

use crate::bootstrap::SdkBootstrap;
use crate::config::MeasurementsConfig;
use crate::control::actor::SessionActor;
use crate::control::handle::MeasurementsHandle;
use crate::control::messages::StartBootstrapMessage;
use crate::error::MeasurementsError;
use crate::unload::UnloadSignal;

pub(crate) fn start_measurements(
    config: MeasurementsConfig,
    bootstrap: Arc<dyn SdkBootstrap>,
) -> Result<MeasurementsHandle, MeasurementsError> {
    start_measurements_with_unload(config, bootstrap, UnloadSignal::global().clone())
}

pub(crate) fn start_measurements_with_unload(
    config: MeasurementsConfig,
    bootstrap: Arc<dyn SdkBootstrap>,
    unload: UnloadSignal,
) -> Result<MeasurementsHandle, MeasurementsError> {
    config.validate()?;
    let command_timeout = config.command_timeout;
    let actor = SessionActor::new(config, unload);
    let (actor_ref, _join) = spawn_actor_named(actor, "nielsen-measurements-session");

    actor_ref
        .cast(StartBootstrapMessage { bootstrap })
        .map_err(|_| MeasurementsError::ControlActorExited {
            operation: "start_bootstrap",
        })?;

    Ok(MeasurementsHandle::new(actor_ref, command_timeout))
}
