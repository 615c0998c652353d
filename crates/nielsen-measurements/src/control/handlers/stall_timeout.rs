use tracing::warn;

use nielsen_runtime::actor::{ActorContext, Handler};

use crate::control::actor::SessionActor;
use crate::control::messages::StallTimeoutMessage;

impl Handler<StallTimeoutMessage> for SessionActor {
    fn handle(&mut self, message: StallTimeoutMessage, _ctx: &mut ActorContext<Self>) {
        let armed = self.stall_watchdog.as_ref().map(|timer| timer.generation());
        if armed != Some(message.generation) {
            return;
        }
        self.stall_watchdog = None;
        warn!(
            stall_ms = self.config.max_stall_duration.as_millis() as u64,
            "stall over limit, ending session"
        );
        // Finalization is best effort: the end report goes out even when
        // the state machine refuses the transition.
        let _ = self.state_machine.on_end();
        self.report_end();
        self.stop_playhead_timer();
    }
}
