use std::sync::Arc;

use serde::Serialize;

use nielsen_runtime::actor::Message;

use crate::bootstrap::SdkBootstrap;
use crate::error::BootstrapError;
use crate::metadata::record::ContentMetadata;
use crate::player::{PlayerApi, PlayerEvent};
use crate::state_machine::PlaybackState;
use crate::transport::Transport;

/// Point-in-time view of a session, mostly useful to assert that no timer
/// outlives the session state that justified it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub state: PlaybackState,
    pub last_playhead: Option<i64>,
    pub playhead_timer_active: bool,
    pub stall_watchdog_armed: bool,
    pub transport_ready: bool,
    pub player_attached: bool,
    /// Whether the player event stream is being forwarded.
    pub subscribed: bool,
}

pub(crate) struct StartBootstrapMessage {
    pub(crate) bootstrap: Arc<dyn SdkBootstrap>,
}

impl Message for StartBootstrapMessage {
    type Response = ();
}

pub(crate) struct InstallTransportMessage {
    pub(crate) transport: Arc<dyn Transport>,
}

impl Message for InstallTransportMessage {
    type Response = ();
}

pub(crate) struct BootstrapFailedMessage {
    pub(crate) error: BootstrapError,
}

impl Message for BootstrapFailedMessage {
    type Response = ();
}

pub(crate) struct AttachPlayerMessage {
    pub(crate) player: Arc<dyn PlayerApi>,
    pub(crate) content: Option<ContentMetadata>,
}

impl Message for AttachPlayerMessage {
    type Response = ();
}

pub(crate) struct OnPlayerEventMessage {
    pub(crate) event: PlayerEvent,
}

impl Message for OnPlayerEventMessage {
    type Response = ();
}

pub(crate) struct PlayheadTickMessage {
    pub(crate) generation: u64,
}

impl Message for PlayheadTickMessage {
    type Response = ();
}

pub(crate) struct StallTimeoutMessage {
    pub(crate) generation: u64,
}

impl Message for StallTimeoutMessage {
    type Response = ();
}

pub(crate) struct PageUnloadMessage;

impl Message for PageUnloadMessage {
    type Response = ();
}

pub(crate) struct GetSnapshotMessage;

impl Message for GetSnapshotMessage {
    type Response = SessionSnapshot;
}

pub(crate) struct ShutdownMessage;

impl Message for ShutdownMessage {
    type Response = ();
}
