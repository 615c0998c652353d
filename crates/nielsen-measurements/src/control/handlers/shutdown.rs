use tracing::debug;

use nielsen_runtime::actor::{ActorContext, Handler};

use crate::control::actor::SessionActor;
use crate::control::messages::ShutdownMessage;

impl Handler<ShutdownMessage> for SessionActor {
    fn handle(&mut self, _message: ShutdownMessage, ctx: &mut ActorContext<Self>) {
        debug!(instance = %self.config.instance_name, "shutting down measurement session");
        self.release_tasks();
        ctx.stop();
    }
}
