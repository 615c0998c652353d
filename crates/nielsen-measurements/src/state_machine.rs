use serde::Serialize;

/// Lifecycle of one tracked playback session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum PlaybackState {
    #[default]
    Idle,
    Playing,
    Stopped,
    Ended,
}

impl PlaybackState {
    pub const ALL: [PlaybackState; 4] = [
        PlaybackState::Idle,
        PlaybackState::Playing,
        PlaybackState::Stopped,
        PlaybackState::Ended,
    ];

    /// Whether `self -> target` is an allowed edge. Self-loops never are.
    pub fn can_transition_to(self, target: PlaybackState) -> bool {
        use PlaybackState::{Ended, Idle, Playing, Stopped};
        matches!(
            (self, target),
            (Idle, Playing)
                | (Idle, Stopped)
                | (Playing, Stopped)
                | (Playing, Ended)
                | (Stopped, Playing)
                | (Stopped, Ended)
                | (Ended, Idle)
                | (Ended, Playing)
        )
    }
}

/// Gatekeeper for session side effects.
///
/// Repeated or out-of-order player events are filtered here: a rejected
/// transition returns `false` and leaves the state untouched, so callers only
/// report start/stop/end once per real change.
#[derive(Debug, Clone, Default)]
pub struct PlaybackStateMachine {
    state: PlaybackState,
}

impl PlaybackStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_state(&self) -> PlaybackState {
        self.state
    }

    pub fn transition_to(&mut self, target: PlaybackState) -> bool {
        if !self.state.can_transition_to(target) {
            return false;
        }
        self.state = target;
        true
    }

    pub fn on_play(&mut self) -> bool {
        self.transition_to(PlaybackState::Playing)
    }

    pub fn on_stop(&mut self) -> bool {
        self.transition_to(PlaybackState::Stopped)
    }

    pub fn on_end(&mut self) -> bool {
        self.transition_to(PlaybackState::Ended)
    }
}
