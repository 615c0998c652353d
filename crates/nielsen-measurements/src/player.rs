//! Boundary to the media player being measured.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Locators and descriptive data of the loaded source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub title: Option<String>,
    /// Primary manifest locator.
    pub dash: Option<String>,
    /// Fallback manifest locator.
    pub hls: Option<String>,
}

/// Descriptive data carried by VAST style ads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdData {
    pub ad_title: Option<String>,
    pub ad_description: Option<String>,
}

/// An inserted advertisement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ad {
    pub id: Option<String>,
    pub media_file_url: Option<String>,
    pub is_linear: bool,
    /// Declared duration in seconds; only linear ads carry one.
    pub duration: Option<f64>,
    pub data: Option<AdData>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlayerEventKind {
    SourceLoaded,
    SourceUnloaded,
    Playing,
    Paused,
    AdBreakFinished,
    AdStarted { ad: Ad },
    AdFinished { ad: Ad },
    PlaybackFinished,
    StallStarted,
    StallEnded,
    Error { code: u32, message: String },
    Destroy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerEvent {
    /// Player clock at emission, in milliseconds.
    pub timestamp_ms: u64,
    #[serde(flatten)]
    pub kind: PlayerEventKind,
}

impl PlayerEvent {
    pub fn new(timestamp_ms: u64, kind: PlayerEventKind) -> Self {
        Self { timestamp_ms, kind }
    }

    pub fn name(&self) -> &'static str {
        match self.kind {
            PlayerEventKind::SourceLoaded => "source_loaded",
            PlayerEventKind::SourceUnloaded => "source_unloaded",
            PlayerEventKind::Playing => "playing",
            PlayerEventKind::Paused => "paused",
            PlayerEventKind::AdBreakFinished => "ad_break_finished",
            PlayerEventKind::AdStarted { .. } => "ad_started",
            PlayerEventKind::AdFinished { .. } => "ad_finished",
            PlayerEventKind::PlaybackFinished => "playback_finished",
            PlayerEventKind::StallStarted => "stall_started",
            PlayerEventKind::StallEnded => "stall_ended",
            PlayerEventKind::Error { .. } => "error",
            PlayerEventKind::Destroy => "destroy",
        }
    }
}

/// Read-only view of the player plus its event stream.
pub trait PlayerApi: Send + Sync {
    /// Current playhead in seconds.
    fn current_time(&self) -> f64;
    /// Duration of the current item in seconds.
    fn duration(&self) -> f64;
    fn is_live(&self) -> bool;
    fn source(&self) -> Option<SourceConfig>;
    fn subscribe_events(&self) -> broadcast::Receiver<PlayerEvent>;
}

/// Truncates a player position to whole seconds.
pub fn playhead_seconds(position: f64) -> i64 {
    if position.is_finite() {
        position.floor() as i64
    } else {
        0
    }
}
