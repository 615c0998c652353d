use std::sync::Arc;

use anyhow::anyhow;

use crate::metadata::record::{IsLive, NielsenMetadata};
use crate::metadata::strategy::MetadataStrategy;
use crate::player::{Ad, AdData, PlayerApi, PlayerEvent, PlayerEventKind};
use crate::state_machine::PlaybackState;
use crate::tests::support::{Session, TransportCall, settle, test_config};

fn ad(id: &str) -> Ad {
    Ad {
        id: Some(id.to_string()),
        media_file_url: Some("https://ads.example/spot.mp4".to_string()),
        is_linear: true,
        duration: Some(15.0),
        data: Some(AdData {
            ad_title: Some("Spot".to_string()),
            ad_description: None,
        }),
    }
}

#[tokio::test(start_paused = true)]
async fn playing_reports_the_position_immediately() {
    let session = Session::start().await;
    session.player.seek(5.4);

    let snapshot = session.emit(PlayerEventKind::Playing).await;

    assert_eq!(snapshot.state, PlaybackState::Playing);
    assert!(snapshot.playhead_timer_active);
    assert_eq!(snapshot.last_playhead, Some(5));
    assert_eq!(session.transport.calls(), vec![TransportCall::SetPlayhead(5)]);
}

#[tokio::test(start_paused = true)]
async fn pause_stops_the_ticker_and_reports_stop() {
    let session = Session::start().await;
    session.player.seek(5.4);
    session.emit(PlayerEventKind::Playing).await;
    session.player.seek(7.9);

    let snapshot = session.emit(PlayerEventKind::Paused).await;

    assert_eq!(snapshot.state, PlaybackState::Stopped);
    assert!(!snapshot.playhead_timer_active);
    assert_eq!(
        session.transport.calls(),
        vec![TransportCall::SetPlayhead(5), TransportCall::Stop(7)]
    );
}

#[tokio::test(start_paused = true)]
async fn duplicate_events_produce_a_single_report() {
    let session = Session::start().await;
    session.player.seek(3.0);
    session.emit(PlayerEventKind::Playing).await;
    session.emit(PlayerEventKind::Playing).await;
    session.emit(PlayerEventKind::Paused).await;
    session.emit(PlayerEventKind::Paused).await;
    session.emit(PlayerEventKind::PlaybackFinished).await;
    let snapshot = session.emit(PlayerEventKind::PlaybackFinished).await;

    assert_eq!(snapshot.state, PlaybackState::Ended);
    assert_eq!(
        session.transport.calls(),
        vec![
            TransportCall::SetPlayhead(3),
            TransportCall::Stop(3),
            TransportCall::End(3),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn source_loaded_dispatches_content_metadata_without_a_transition() {
    let session = Session::start().await;

    let snapshot = session.emit(PlayerEventKind::SourceLoaded).await;

    assert_eq!(snapshot.state, PlaybackState::Idle);
    let loaded = session.transport.loaded_metadata();
    assert_eq!(loaded.len(), 1);
    let record = &loaded[0];
    assert_eq!(record.kind, "content");
    assert_eq!(record.asset_id, "a1");
    assert_eq!(record.subbrand, "b");
    assert_eq!(record.title, "Asset Title");
    assert_eq!(record.program, "test.mpd");
    assert_eq!(record.length, 100);
    assert_eq!(record.islive, IsLive::No);
}

#[tokio::test(start_paused = true)]
async fn playing_after_end_redispatches_metadata_first() {
    let session = Session::start().await;
    session.player.seek(42.0);
    session.emit(PlayerEventKind::Playing).await;
    session.emit(PlayerEventKind::PlaybackFinished).await;
    session.transport.take();
    session.player.seek(0.0);

    let snapshot = session.emit(PlayerEventKind::Playing).await;

    assert_eq!(snapshot.state, PlaybackState::Playing);
    let calls = session.transport.calls();
    assert_eq!(calls.len(), 2);
    assert!(matches!(&calls[0], TransportCall::LoadMetadata(record) if record.kind == "content"));
    assert_eq!(calls[1], TransportCall::SetPlayhead(0));
}

#[tokio::test(start_paused = true)]
async fn source_unloaded_ends_like_playback_finished() {
    let session = Session::start().await;
    session.player.seek(12.5);
    session.emit(PlayerEventKind::Playing).await;

    let snapshot = session.emit(PlayerEventKind::SourceUnloaded).await;

    assert_eq!(snapshot.state, PlaybackState::Ended);
    assert!(!snapshot.playhead_timer_active);
    assert_eq!(
        session.transport.calls(),
        vec![TransportCall::SetPlayhead(12), TransportCall::End(12)]
    );
}

#[tokio::test(start_paused = true)]
async fn ad_lifecycle_switches_metadata_without_touching_content_state() {
    let session = Session::start().await;
    session.player.seek(1.0);

    let snapshot = session.emit(PlayerEventKind::AdStarted { ad: ad("ad-1") }).await;
    assert_eq!(snapshot.state, PlaybackState::Idle);
    assert!(snapshot.playhead_timer_active);
    let calls = session.transport.take();
    assert_eq!(calls.len(), 2);
    match &calls[0] {
        TransportCall::LoadMetadata(record) => {
            assert_eq!(record.kind, "ad");
            assert_eq!(record.asset_id, "ad-1");
            assert_eq!(record.title, "Spot");
            assert_eq!(record.program, "https://ads.example/spot.mp4");
            assert_eq!(record.length, 15);
            assert_eq!(record.islive, IsLive::No);
            assert_eq!(record.subbrand, "b");
        },
        other => panic!("expected ad metadata, got {other:?}"),
    }
    assert_eq!(calls[1], TransportCall::SetPlayhead(1));

    session.player.seek(16.0);
    let snapshot = session.emit(PlayerEventKind::AdFinished { ad: ad("ad-1") }).await;
    assert_eq!(snapshot.state, PlaybackState::Idle);
    assert_eq!(session.transport.take(), vec![TransportCall::Stop(16)]);

    let snapshot = session.emit(PlayerEventKind::AdBreakFinished).await;
    assert!(snapshot.playhead_timer_active);
    let loaded = session.transport.loaded_metadata();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].kind, "content");
}

#[tokio::test(start_paused = true)]
async fn player_errors_are_not_fatal() {
    let session = Session::start().await;
    session.emit(PlayerEventKind::Playing).await;

    let snapshot = session
        .emit(PlayerEventKind::Error {
            code: 1201,
            message: "network down".to_string(),
        })
        .await;

    assert_eq!(snapshot.state, PlaybackState::Playing);
    assert_eq!(session.transport.calls(), vec![TransportCall::SetPlayhead(0)]);
}

#[tokio::test(start_paused = true)]
async fn destroy_ends_the_session_and_detaches_from_the_player() {
    let session = Session::start().await;
    session.player.seek(20.0);
    session.emit(PlayerEventKind::Playing).await;
    assert_eq!(session.player.subscriber_count(), 1);
    assert_eq!(session.unload.listener_count(), 1);

    let snapshot = session.emit(PlayerEventKind::Destroy).await;

    assert_eq!(snapshot.state, PlaybackState::Ended);
    assert!(!snapshot.playhead_timer_active);
    assert!(!snapshot.stall_watchdog_armed);
    assert!(!snapshot.subscribed);
    settle().await;
    assert_eq!(session.player.subscriber_count(), 0);
    assert_eq!(session.unload.listener_count(), 0);
    assert_eq!(
        session.transport.calls(),
        vec![TransportCall::SetPlayhead(20), TransportCall::End(20)]
    );

    // Nothing is forwarded any more.
    let snapshot = session.emit(PlayerEventKind::Playing).await;
    assert_eq!(snapshot.state, PlaybackState::Ended);
    assert_eq!(session.transport.calls().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn destroy_during_an_ad_clears_the_ticker() {
    let session = Session::start().await;
    session.emit(PlayerEventKind::AdStarted { ad: ad("ad-2") }).await;

    let snapshot = session.emit(PlayerEventKind::Destroy).await;

    assert_eq!(snapshot.state, PlaybackState::Idle);
    assert!(!snapshot.playhead_timer_active);
    assert!(
        !session
            .transport
            .calls()
            .iter()
            .any(|call| matches!(call, TransportCall::End(_)))
    );
}

#[tokio::test(start_paused = true)]
async fn page_unload_ends_tracking_without_a_transition() {
    let session = Session::start().await;
    session.player.seek(5.4);
    session.emit(PlayerEventKind::Playing).await;
    session.player.seek(8.0);

    assert_eq!(session.unload.fire(), 1);
    let snapshot = session.flush().await;

    assert_eq!(snapshot.state, PlaybackState::Playing);
    assert!(!snapshot.playhead_timer_active);
    assert_eq!(
        session.transport.calls(),
        vec![TransportCall::SetPlayhead(5), TransportCall::End(8)]
    );
}

#[tokio::test(start_paused = true)]
async fn dispatch_delivers_events_directly() {
    let session = Session::start().await;
    session.player.seek(2.0);

    session
        .handle
        .dispatch(PlayerEvent::new(10, PlayerEventKind::Playing))
        .await
        .expect("dispatch playing");

    let snapshot = session.snapshot().await;
    assert_eq!(snapshot.state, PlaybackState::Playing);
    assert_eq!(session.transport.calls(), vec![TransportCall::SetPlayhead(2)]);
}

struct FixedContentStrategy;

impl MetadataStrategy for FixedContentStrategy {
    fn build_content_metadata(
        &self,
        player: &dyn PlayerApi,
    ) -> Option<anyhow::Result<NielsenMetadata>> {
        Some(Ok(NielsenMetadata {
            kind: "content".to_string(),
            asset_id: "custom-asset".to_string(),
            program: "Custom Program".to_string(),
            title: "Custom Title".to_string(),
            length: player.duration() as u64,
            islive: IsLive::No,
            subbrand: "custom".to_string(),
            cli_md: None,
            cli_ch: None,
            custom: Default::default(),
        }))
    }

    fn build_ad_metadata(
        &self,
        _ad: &Ad,
        _player: &dyn PlayerApi,
    ) -> Option<anyhow::Result<NielsenMetadata>> {
        Some(Err(anyhow!("ad catalogue unavailable")))
    }
}

#[tokio::test(start_paused = true)]
async fn strategy_results_are_used_verbatim() {
    let config = test_config().with_metadata_strategy(Arc::new(FixedContentStrategy));
    let session = Session::start_with(config).await;

    session.emit(PlayerEventKind::SourceLoaded).await;
    let loaded = session.transport.loaded_metadata();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].asset_id, "custom-asset");
    assert_eq!(loaded[0].length, 100);

    // A failing ad strategy leaves the ad untracked but the session alive.
    let snapshot = session.emit(PlayerEventKind::AdStarted { ad: ad("ad-3") }).await;
    assert!(!snapshot.playhead_timer_active);
    assert_eq!(session.transport.loaded_metadata().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn content_metadata_failures_are_contained() {
    let session = Session::start().await;
    session.player.state().source = None;

    let snapshot = session.emit(PlayerEventKind::SourceLoaded).await;

    assert_eq!(snapshot.state, PlaybackState::Idle);
    assert!(session.transport.loaded_metadata().is_empty());

    // Playing still transitions when the metadata for the replay fails.
    session.emit(PlayerEventKind::Playing).await;
    session.emit(PlayerEventKind::PlaybackFinished).await;
    let snapshot = session.emit(PlayerEventKind::Playing).await;
    assert_eq!(snapshot.state, PlaybackState::Playing);
    assert!(session.transport.loaded_metadata().is_empty());
}
