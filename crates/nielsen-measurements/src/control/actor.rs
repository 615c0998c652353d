use std::sync::Arc;

use tracing::{debug, error, warn};

use nielsen_runtime::actor::ActorContext;

use crate::config::MeasurementsConfig;
use crate::control::messages::SessionSnapshot;
use crate::control::tasks::{OwnedTask, TimerHandle, spawn_playhead_ticker, spawn_stall_watchdog};
use crate::error::MeasurementsError;
use crate::metadata::record::ContentMetadata;
use crate::metadata::strategy::content_metadata;
use crate::player::{PlayerApi, playhead_seconds};
use crate::state_machine::PlaybackStateMachine;
use crate::transport::Tracker;
use crate::unload::UnloadSignal;

/// Owner of one measurement session.
///
/// Every player event, timer expiry and unload notification arrives as a
/// message, so handlers never overlap and the state machine alone decides
/// which side effects run.
pub(crate) struct SessionActor {
    pub(crate) config: MeasurementsConfig,
    pub(crate) state_machine: PlaybackStateMachine,
    pub(crate) last_playhead: Option<i64>,
    pub(crate) playhead_timer: Option<TimerHandle>,
    pub(crate) stall_watchdog: Option<TimerHandle>,
    next_timer_generation: u64,
    pub(crate) player: Option<Arc<dyn PlayerApi>>,
    pub(crate) content: Option<ContentMetadata>,
    pub(crate) tracker: Option<Tracker>,
    pub(crate) unload: UnloadSignal,
    pub(crate) bootstrap_task: Option<OwnedTask>,
    pub(crate) event_forwarder: Option<OwnedTask>,
    pub(crate) unload_listener: Option<OwnedTask>,
}

impl SessionActor {
    pub(crate) fn new(config: MeasurementsConfig, unload: UnloadSignal) -> Self {
        Self {
            config,
            state_machine: PlaybackStateMachine::new(),
            last_playhead: None,
            playhead_timer: None,
            stall_watchdog: None,
            next_timer_generation: 0,
            player: None,
            content: None,
            tracker: None,
            unload,
            bootstrap_task: None,
            event_forwarder: None,
            unload_listener: None,
        }
    }

    pub(crate) fn player(&self) -> Result<Arc<dyn PlayerApi>, MeasurementsError> {
        self.player
            .clone()
            .ok_or(MeasurementsError::PlayerNotAttached)
    }

    pub(crate) fn tracker(&self) -> Result<&Tracker, MeasurementsError> {
        self.tracker
            .as_ref()
            .ok_or(MeasurementsError::TransportUnavailable)
    }

    pub(crate) fn current_playhead(&self) -> Result<i64, MeasurementsError> {
        Ok(playhead_seconds(self.player()?.current_time()))
    }

    pub(crate) fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state_machine.current_state(),
            last_playhead: self.last_playhead,
            playhead_timer_active: self.playhead_timer.is_some(),
            stall_watchdog_armed: self.stall_watchdog.is_some(),
            transport_ready: self.tracker.is_some(),
            player_attached: self.player.is_some(),
            subscribed: self.event_forwarder.is_some(),
        }
    }

    fn next_generation(&mut self) -> u64 {
        self.next_timer_generation += 1;
        self.next_timer_generation
    }

    /// Starts the 1 s playhead ticker and reports the current position right
    /// away. No-op when the ticker already runs.
    pub(crate) fn start_playhead_timer(&mut self, ctx: &ActorContext<Self>) {
        if self.playhead_timer.is_some() {
            return;
        }
        self.report_playhead();
        let generation = self.next_generation();
        self.playhead_timer = Some(spawn_playhead_ticker(
            ctx.weak_ref(),
            generation,
            self.config.playhead_interval,
        ));
    }

    pub(crate) fn stop_playhead_timer(&mut self) {
        self.playhead_timer = None;
    }

    pub(crate) fn arm_stall_watchdog(&mut self, ctx: &ActorContext<Self>) {
        let generation = self.next_generation();
        self.stall_watchdog = Some(spawn_stall_watchdog(
            ctx.weak_ref(),
            generation,
            self.config.max_stall_duration,
        ));
    }

    pub(crate) fn disarm_stall_watchdog(&mut self) {
        self.stall_watchdog = None;
    }

    /// Reports the playhead when it moved since the last report.
    pub(crate) fn report_playhead(&mut self) {
        let position = match self.current_playhead() {
            Ok(position) => position,
            Err(error) => {
                warn!(%error, "skipping playhead report");
                return;
            },
        };
        if self.last_playhead == Some(position) {
            return;
        }
        self.last_playhead = Some(position);
        if let Some(tracker) = &self.tracker {
            tracker.set_playhead_position(position);
        }
    }

    pub(crate) fn report_stop(&self) {
        match self.current_playhead() {
            Ok(position) => self.with_tracker("stop", |tracker| tracker.stop_tracking(position)),
            Err(error) => warn!(%error, "skipping stop report"),
        }
    }

    pub(crate) fn report_end(&self) {
        match self.current_playhead() {
            Ok(position) => self.with_tracker("end", |tracker| tracker.end_tracking(position)),
            Err(error) => warn!(%error, "skipping end report"),
        }
    }

    /// Builds content metadata and hands it to the transport. Failures are
    /// logged and swallowed.
    pub(crate) fn dispatch_content_metadata(&self) -> bool {
        let player = match self.player() {
            Ok(player) => player,
            Err(error) => {
                warn!(%error, "skipping content metadata");
                return false;
            },
        };
        match content_metadata(
            self.config.metadata_strategy.as_deref(),
            self.content.as_ref(),
            player.as_ref(),
        ) {
            Ok(record) => {
                self.with_tracker("load_metadata", |tracker| tracker.load_metadata(&record));
                true
            },
            Err(error) => {
                error!(error = %format!("{error:#}"), "failed to build content metadata");
                false
            },
        }
    }

    pub(crate) fn with_tracker(&self, verb: &'static str, call: impl FnOnce(&Tracker)) {
        match self.tracker() {
            Ok(tracker) => call(tracker),
            Err(_) => debug!(verb, "transport not ready, dropping tracking call"),
        }
    }

    pub(crate) fn report_error(&self, error: &MeasurementsError) {
        if let Some(on_error) = &self.config.on_error {
            on_error.call(error);
        }
    }

    /// Drops every timer and background task the session owns.
    pub(crate) fn release_tasks(&mut self) {
        self.stop_playhead_timer();
        self.disarm_stall_watchdog();
        self.bootstrap_task = None;
        self.event_forwarder = None;
        self.unload_listener = None;
    }
}
