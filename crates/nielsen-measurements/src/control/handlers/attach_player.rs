use tracing::debug;

use nielsen_runtime::actor::{ActorContext, Handler};

use crate::control::actor::SessionActor;
use crate::control::messages::AttachPlayerMessage;
use crate::control::tasks::spawn_event_forwarder;

impl Handler<AttachPlayerMessage> for SessionActor {
    fn handle(&mut self, message: AttachPlayerMessage, ctx: &mut ActorContext<Self>) {
        if self.player.is_some() {
            debug!("replacing attached player");
        }
        self.event_forwarder = Some(spawn_event_forwarder(
            ctx.weak_ref(),
            message.player.as_ref(),
        ));
        self.player = Some(message.player);
        self.content = message.content;
    }
}
