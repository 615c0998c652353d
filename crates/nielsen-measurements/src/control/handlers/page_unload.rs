use tracing::info;

use nielsen_runtime::actor::{ActorContext, Handler};

use crate::control::actor::SessionActor;
use crate::control::messages::PageUnloadMessage;

impl Handler<PageUnloadMessage> for SessionActor {
    fn handle(&mut self, _message: PageUnloadMessage, _ctx: &mut ActorContext<Self>) {
        info!(instance = %self.config.instance_name, "page unloading, ending tracking");
        self.stop_playhead_timer();
        self.disarm_stall_watchdog();
        self.report_end();
    }
}
