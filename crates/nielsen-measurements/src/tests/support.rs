use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing_subscriber::EnvFilter;

use crate::bootstrap::{SdkBootstrap, SdkLoadRequest};
use crate::config::MeasurementsConfig;
use crate::control::{MeasurementsHandle, SessionSnapshot, start_measurements_with_unload};
use crate::error::{BootstrapError, MeasurementsError, TransportError};
use crate::metadata::record::{ContentMetadata, NielsenMetadata};
use crate::player::{PlayerApi, PlayerEvent, PlayerEventKind, SourceConfig};
use crate::transport::Transport;
use crate::unload::UnloadSignal;

pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Lets spawned forwarder and timer tasks run without moving past the next
/// whole-second tick.
pub(crate) async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TransportCall {
    LoadMetadata(NielsenMetadata),
    SetPlayhead(i64),
    Stop(i64),
    End(i64),
}

#[derive(Default)]
pub(crate) struct RecordingTransport {
    calls: Mutex<Vec<TransportCall>>,
}

impl RecordingTransport {
    fn record(&self, call: TransportCall) -> Result<(), TransportError> {
        self.calls
            .lock()
            .expect("transport calls mutex poisoned")
            .push(call);
        Ok(())
    }

    pub(crate) fn calls(&self) -> Vec<TransportCall> {
        self.calls
            .lock()
            .expect("transport calls mutex poisoned")
            .clone()
    }

    /// Returns and forgets every call recorded so far.
    pub(crate) fn take(&self) -> Vec<TransportCall> {
        std::mem::take(&mut *self.calls.lock().expect("transport calls mutex poisoned"))
    }

    pub(crate) fn loaded_metadata(&self) -> Vec<NielsenMetadata> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                TransportCall::LoadMetadata(record) => Some(record),
                _ => None,
            })
            .collect()
    }
}

impl Transport for RecordingTransport {
    fn load_metadata(&self, metadata: &NielsenMetadata) -> Result<(), TransportError> {
        self.record(TransportCall::LoadMetadata(metadata.clone()))
    }

    fn set_playhead_position(&self, position: i64) -> Result<(), TransportError> {
        self.record(TransportCall::SetPlayhead(position))
    }

    fn stop(&self, position: i64) -> Result<(), TransportError> {
        self.record(TransportCall::Stop(position))
    }

    fn end(&self, position: i64) -> Result<(), TransportError> {
        self.record(TransportCall::End(position))
    }
}

pub(crate) struct ScriptedPlayerState {
    pub(crate) position: f64,
    pub(crate) duration: f64,
    pub(crate) live: bool,
    pub(crate) source: Option<SourceConfig>,
}

pub(crate) struct ScriptedPlayer {
    state: Mutex<ScriptedPlayerState>,
    events: broadcast::Sender<PlayerEvent>,
}

impl ScriptedPlayer {
    pub(crate) fn new() -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            state: Mutex::new(ScriptedPlayerState {
                position: 0.0,
                duration: 100.0,
                live: false,
                source: Some(SourceConfig {
                    title: Some("Asset Title".to_string()),
                    dash: Some("test.mpd".to_string()),
                    hls: None,
                }),
            }),
            events,
        }
    }

    pub(crate) fn state(&self) -> MutexGuard<'_, ScriptedPlayerState> {
        self.state.lock().expect("player state mutex poisoned")
    }

    pub(crate) fn seek(&self, position: f64) {
        self.state().position = position;
    }

    pub(crate) fn emit(&self, kind: PlayerEventKind) {
        let _ = self.events.send(PlayerEvent::new(0, kind));
    }

    pub(crate) fn subscriber_count(&self) -> usize {
        self.events.receiver_count()
    }
}

impl PlayerApi for ScriptedPlayer {
    fn current_time(&self) -> f64 {
        self.state().position
    }

    fn duration(&self) -> f64 {
        self.state().duration
    }

    fn is_live(&self) -> bool {
        self.state().live
    }

    fn source(&self) -> Option<SourceConfig> {
        self.state().source.clone()
    }

    fn subscribe_events(&self) -> broadcast::Receiver<PlayerEvent> {
        self.events.subscribe()
    }
}

pub(crate) struct ReadyBootstrap {
    transport: Arc<RecordingTransport>,
    pub(crate) requests: Mutex<Vec<SdkLoadRequest>>,
}

impl ReadyBootstrap {
    pub(crate) fn new(transport: Arc<RecordingTransport>) -> Self {
        Self {
            transport,
            requests: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl SdkBootstrap for ReadyBootstrap {
    async fn load(&self, request: &SdkLoadRequest) -> Result<Arc<dyn Transport>, BootstrapError> {
        self.requests
            .lock()
            .expect("requests mutex poisoned")
            .push(request.clone());
        Ok(self.transport.clone())
    }
}

pub(crate) struct FailingBootstrap;

#[async_trait]
impl SdkBootstrap for FailingBootstrap {
    async fn load(&self, _request: &SdkLoadRequest) -> Result<Arc<dyn Transport>, BootstrapError> {
        Err(BootstrapError::Failed("script blocked".to_string()))
    }
}

pub(crate) struct PendingBootstrap;

#[async_trait]
impl SdkBootstrap for PendingBootstrap {
    async fn load(&self, _request: &SdkLoadRequest) -> Result<Arc<dyn Transport>, BootstrapError> {
        std::future::pending().await
    }
}

pub(crate) fn test_config() -> MeasurementsConfig {
    MeasurementsConfig::new("PTEST-APP", "test-player")
}

pub(crate) fn content() -> ContentMetadata {
    ContentMetadata {
        asset_id: "a1".to_string(),
        subbrand: "b".to_string(),
        ..ContentMetadata::default()
    }
}

/// Collects every error handed to the session's error callback.
#[derive(Clone, Default)]
pub(crate) struct ErrorSink {
    errors: Arc<Mutex<Vec<String>>>,
}

impl ErrorSink {
    pub(crate) fn install(&self, config: MeasurementsConfig) -> MeasurementsConfig {
        let errors = Arc::clone(&self.errors);
        config.with_on_error(move |error: &MeasurementsError| {
            errors
                .lock()
                .expect("errors mutex poisoned")
                .push(error.to_string());
        })
    }

    pub(crate) fn messages(&self) -> Vec<String> {
        self.errors.lock().expect("errors mutex poisoned").clone()
    }
}

/// A session with a ready transport and an attached scripted player.
pub(crate) struct Session {
    pub(crate) handle: MeasurementsHandle,
    pub(crate) player: Arc<ScriptedPlayer>,
    pub(crate) transport: Arc<RecordingTransport>,
    pub(crate) unload: UnloadSignal,
}

impl Session {
    pub(crate) async fn start() -> Self {
        Self::start_with(test_config()).await
    }

    pub(crate) async fn start_with(config: MeasurementsConfig) -> Self {
        init_tracing();
        let transport = Arc::new(RecordingTransport::default());
        let unload = UnloadSignal::new();
        let handle = start_measurements_with_unload(
            config,
            Arc::new(ReadyBootstrap::new(Arc::clone(&transport))),
            unload.clone(),
        )
        .expect("start measurements");
        settle().await;
        let player = Arc::new(ScriptedPlayer::new());
        handle
            .attach_to(player.clone(), Some(content()))
            .await
            .expect("attach player");
        let session = Self {
            handle,
            player,
            transport,
            unload,
        };
        assert!(session.snapshot().await.transport_ready);
        session
    }

    /// Emits a player event and waits until the session has handled it.
    pub(crate) async fn emit(&self, kind: PlayerEventKind) -> SessionSnapshot {
        self.player.emit(kind);
        self.flush().await
    }

    pub(crate) async fn flush(&self) -> SessionSnapshot {
        settle().await;
        self.snapshot().await
    }

    pub(crate) async fn snapshot(&self) -> SessionSnapshot {
        self.handle.snapshot().await.expect("session snapshot")
    }
}
