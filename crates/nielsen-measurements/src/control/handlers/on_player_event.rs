use tracing::{debug, error, trace};

use nielsen_runtime::actor::{ActorContext, Handler};

use crate::control::actor::SessionActor;
use crate::control::messages::OnPlayerEventMessage;
use crate::metadata::strategy::ad_metadata;
use crate::player::{Ad, PlayerEventKind};
use crate::state_machine::PlaybackState;

impl Handler<OnPlayerEventMessage> for SessionActor {
    fn handle(&mut self, message: OnPlayerEventMessage, ctx: &mut ActorContext<Self>) {
        let event = message.event;
        trace!(
            event = event.name(),
            timestamp_ms = event.timestamp_ms,
            state = ?self.state_machine.current_state(),
            "player event"
        );
        match event.kind {
            PlayerEventKind::SourceLoaded => {
                self.dispatch_content_metadata();
            },
            PlayerEventKind::SourceUnloaded | PlayerEventKind::PlaybackFinished => {
                self.on_playback_finished();
            },
            PlayerEventKind::Playing => self.on_playing(ctx),
            PlayerEventKind::Paused => self.on_paused(),
            PlayerEventKind::AdBreakFinished => {
                self.dispatch_content_metadata();
                self.start_playhead_timer(ctx);
            },
            PlayerEventKind::AdStarted { ad } => self.on_ad_started(&ad, ctx),
            PlayerEventKind::AdFinished { .. } => self.report_stop(),
            PlayerEventKind::StallStarted => self.on_stall_started(ctx),
            PlayerEventKind::StallEnded => self.on_stall_ended(ctx),
            PlayerEventKind::Error { code, message } => {
                error!(code, %message, "player reported an error");
            },
            PlayerEventKind::Destroy => self.on_destroy(),
        }
    }
}

impl SessionActor {
    fn on_playing(&mut self, ctx: &ActorContext<Self>) {
        // A replay after the end has no fresh source-loaded signal.
        if self.state_machine.current_state() == PlaybackState::Ended {
            self.dispatch_content_metadata();
        }
        if self.state_machine.on_play() {
            self.disarm_stall_watchdog();
            self.start_playhead_timer(ctx);
        }
    }

    fn on_paused(&mut self) {
        if self.state_machine.on_stop() {
            self.stop_playhead_timer();
            self.disarm_stall_watchdog();
            self.report_stop();
        }
    }

    fn on_playback_finished(&mut self) -> bool {
        if !self.state_machine.on_end() {
            return false;
        }
        self.stop_playhead_timer();
        self.disarm_stall_watchdog();
        self.report_end();
        true
    }

    fn on_ad_started(&mut self, ad: &Ad, ctx: &ActorContext<Self>) {
        let player = match self.player() {
            Ok(player) => player,
            Err(error) => {
                debug!(%error, "ignoring ad start");
                return;
            },
        };
        let record = ad_metadata(
            self.config.metadata_strategy.as_deref(),
            self.content.as_ref(),
            ad,
            player.as_ref(),
        );
        match record {
            Ok(record) => {
                self.with_tracker("load_metadata", |tracker| tracker.load_metadata(&record));
                self.start_playhead_timer(ctx);
            },
            Err(error) => {
                error!(
                    ad_id = ad.id.as_deref().unwrap_or_default(),
                    error = %format!("{error:#}"),
                    "failed to build ad metadata"
                );
            },
        }
    }

    fn on_stall_started(&mut self, ctx: &ActorContext<Self>) {
        if self.state_machine.on_stop() {
            self.stop_playhead_timer();
            self.arm_stall_watchdog(ctx);
        }
    }

    fn on_stall_ended(&mut self, ctx: &ActorContext<Self>) {
        if self.state_machine.on_play() {
            self.disarm_stall_watchdog();
            self.start_playhead_timer(ctx);
        }
    }

    /// Finishes the session like a playback end, then detaches from the
    /// player and the unload signal whatever the transition outcome.
    fn on_destroy(&mut self) {
        if !self.on_playback_finished() {
            debug!(
                state = ?self.state_machine.current_state(),
                "destroy without a running session"
            );
        }
        self.stop_playhead_timer();
        self.disarm_stall_watchdog();
        self.event_forwarder = None;
        self.unload_listener = None;
    }
}
