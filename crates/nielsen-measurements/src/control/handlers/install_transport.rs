use tracing::info;

use nielsen_runtime::actor::{ActorContext, Handler};

use crate::control::actor::SessionActor;
use crate::control::messages::InstallTransportMessage;
use crate::control::tasks::spawn_unload_listener;
use crate::transport::Tracker;

impl Handler<InstallTransportMessage> for SessionActor {
    fn handle(&mut self, message: InstallTransportMessage, ctx: &mut ActorContext<Self>) {
        self.bootstrap_task = None;
        if self.tracker.is_some() {
            return;
        }
        info!(instance = %self.config.instance_name, "vendor SDK ready, tracking enabled");
        self.tracker = Some(Tracker::new(
            self.config.instance_name.clone(),
            message.transport,
        ));
        self.unload_listener = Some(spawn_unload_listener(ctx.weak_ref(), &self.unload));
    }
}
