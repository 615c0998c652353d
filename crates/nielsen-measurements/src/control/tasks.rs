use std::time::Duration;

use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::warn;

use nielsen_runtime::actor::WeakActorRef;

use crate::control::actor::SessionActor;
use crate::control::messages::{
    OnPlayerEventMessage, PageUnloadMessage, PlayheadTickMessage, StallTimeoutMessage,
};
use crate::player::PlayerApi;
use crate::unload::UnloadSignal;

/// Background task owned by the session; aborted when dropped.
pub(crate) struct OwnedTask {
    task: JoinHandle<()>,
}

impl OwnedTask {
    pub(crate) fn spawn<F>(future: F) -> Self
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        Self {
            task: nielsen_runtime::spawn(future),
        }
    }
}

impl Drop for OwnedTask {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// A scheduled timer. Messages it sends carry `generation` so that a tick
/// already queued when the timer was replaced is recognized as stale.
pub(crate) struct TimerHandle {
    generation: u64,
    _task: OwnedTask,
}

impl TimerHandle {
    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }
}

pub(crate) fn spawn_playhead_ticker(
    actor: WeakActorRef<SessionActor>,
    generation: u64,
    period: Duration,
) -> TimerHandle {
    let task = OwnedTask::spawn(async move {
        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            let Some(actor) = actor.upgrade() else {
                break;
            };
            if actor.cast(PlayheadTickMessage { generation }).is_err() {
                break;
            }
        }
    });
    TimerHandle {
        generation,
        _task: task,
    }
}

pub(crate) fn spawn_stall_watchdog(
    actor: WeakActorRef<SessionActor>,
    generation: u64,
    delay: Duration,
) -> TimerHandle {
    let task = OwnedTask::spawn(async move {
        tokio::time::sleep(delay).await;
        if let Some(actor) = actor.upgrade() {
            let _ = actor.cast(StallTimeoutMessage { generation });
        }
    });
    TimerHandle {
        generation,
        _task: task,
    }
}

/// Forwards the player's event stream into the session mailbox.
///
/// Subscribes before returning, so nothing emitted after attachment is lost.
pub(crate) fn spawn_event_forwarder(
    actor: WeakActorRef<SessionActor>,
    player: &dyn PlayerApi,
) -> OwnedTask {
    let mut events = player.subscribe_events();
    OwnedTask::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => {
                    let Some(actor) = actor.upgrade() else {
                        break;
                    };
                    if actor.cast(OnPlayerEventMessage { event }).is_err() {
                        break;
                    }
                },
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "player event stream lagged, events dropped");
                },
                Err(RecvError::Closed) => break,
            }
        }
    })
}

pub(crate) fn spawn_unload_listener(
    actor: WeakActorRef<SessionActor>,
    signal: &UnloadSignal,
) -> OwnedTask {
    let mut unload = signal.subscribe();
    OwnedTask::spawn(async move {
        loop {
            match unload.recv().await {
                Ok(()) | Err(RecvError::Lagged(_)) => {
                    let Some(actor) = actor.upgrade() else {
                        break;
                    };
                    if actor.cast(PageUnloadMessage).is_err() {
                        break;
                    }
                },
                Err(RecvError::Closed) => break,
            }
        }
    })
}
