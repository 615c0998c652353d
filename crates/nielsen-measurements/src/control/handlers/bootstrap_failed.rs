use tracing::error;

use nielsen_runtime::actor::{ActorContext, Handler};

use crate::control::actor::SessionActor;
use crate::control::messages::BootstrapFailedMessage;
use crate::error::MeasurementsError;

impl Handler<BootstrapFailedMessage> for SessionActor {
    fn handle(&mut self, message: BootstrapFailedMessage, _ctx: &mut ActorContext<Self>) {
        self.bootstrap_task = None;
        error!(
            instance = %self.config.instance_name,
            error = %message.error,
            "vendor SDK bootstrap failed, tracking disabled"
        );
        self.report_error(&MeasurementsError::Bootstrap(message.error));
    }
}
