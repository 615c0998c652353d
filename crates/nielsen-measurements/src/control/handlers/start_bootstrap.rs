use nielsen_runtime::actor::{ActorContext, Handler};

use crate::bootstrap::load_sdk;
use crate::control::actor::SessionActor;
use crate::control::messages::{
    BootstrapFailedMessage, InstallTransportMessage, StartBootstrapMessage,
};
use crate::control::tasks::OwnedTask;

impl Handler<StartBootstrapMessage> for SessionActor {
    fn handle(&mut self, message: StartBootstrapMessage, ctx: &mut ActorContext<Self>) {
        let actor = ctx.weak_ref();
        let config = self.config.clone();
        let bootstrap = message.bootstrap;
        self.bootstrap_task = Some(OwnedTask::spawn(async move {
            let result = load_sdk(bootstrap.as_ref(), &config).await;
            let Some(actor) = actor.upgrade() else {
                return;
            };
            let _ = match result {
                Ok(transport) => actor.cast(InstallTransportMessage { transport }),
                Err(error) => actor.cast(BootstrapFailedMessage { error }),
            };
        }));
    }
}
