use nielsen_runtime::actor::{ActorContext, Handler};

use crate::control::actor::SessionActor;
use crate::control::messages::{GetSnapshotMessage, SessionSnapshot};

impl Handler<GetSnapshotMessage> for SessionActor {
    fn handle(
        &mut self,
        _message: GetSnapshotMessage,
        _ctx: &mut ActorContext<Self>,
    ) -> SessionSnapshot {
        self.snapshot()
    }
}
