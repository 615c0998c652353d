use nielsen_runtime::actor::{ActorContext, Handler};

use crate::control::actor::SessionActor;
use crate::control::messages::PlayheadTickMessage;

impl Handler<PlayheadTickMessage> for SessionActor {
    fn handle(&mut self, message: PlayheadTickMessage, _ctx: &mut ActorContext<Self>) {
        let current = self.playhead_timer.as_ref().map(|timer| timer.generation());
        if current != Some(message.generation) {
            return;
        }
        self.report_playhead();
    }
}
