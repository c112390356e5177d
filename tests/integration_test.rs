//! Integration tests for the full companion flow.

use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;

use wearlink_companion::devices::{Device, DeviceStore, SelectionError};
use wearlink_companion::health::{HealthError, HealthMetric, HealthReading, HealthSource};
use wearlink_companion::peerlink::{Payload, SimulatedWearable};
use wearlink_companion::player::{PlaybackState, VideoPlayer};
use wearlink_companion::session::{CompanionSession, SessionError};
use wearlink_companion::state::{LogKind, MessageLog};

struct FixedHealth(Vec<HealthReading>);

impl HealthSource for FixedHealth {
    fn latest_readings(&self) -> BoxFuture<'_, Result<Vec<HealthReading>, HealthError>> {
        let readings = self.0.clone();
        Box::pin(async move { Ok(readings) })
    }
}

struct Rig {
    link: Arc<SimulatedWearable>,
    store: Arc<DeviceStore>,
    player: Arc<VideoPlayer>,
    log: Arc<MessageLog>,
    session: CompanionSession,
}

fn rig() -> Rig {
    let link = Arc::new(SimulatedWearable::new(vec![
        Device::new("uuid-watch", "WearLink Watch Pro", true),
        Device::new("uuid-band", "WearLink Band", false),
    ]));
    let store = Arc::new(DeviceStore::new());
    let player = VideoPlayer::new(
        vec!["https://media.example/demo.mp4".to_string()],
        Duration::from_secs(10),
    );
    let log = MessageLog::new();
    let health = Arc::new(FixedHealth(vec![
        HealthReading::new(HealthMetric::Steps, Some(12000.0)),
        HealthReading::new(HealthMetric::Calories, Some(420.5)),
        HealthReading::new(HealthMetric::HeartRate, Some(65.0)),
        HealthReading::new(HealthMetric::Oxygen, Some(98.0)),
    ]));
    let session = CompanionSession::new(
        link.clone(),
        store.clone(),
        player.clone(),
        health,
        log.clone(),
    );
    Rig {
        link,
        store,
        player,
        log,
        session,
    }
}

async fn wait_until(mut condition: impl FnMut() -> bool) {
    for _ in 0..200 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not met within two seconds");
}

#[tokio::test]
async fn test_remote_control_round_trip() {
    let rig = rig();

    // Pair up: discover, select the connected watch.
    let devices = rig.session.refresh_devices().await.unwrap();
    assert_eq!(devices.len(), 2);
    rig.session.select_device("uuid-watch").await.unwrap();

    // The watch starts playback.
    assert!(
        rig.link
            .push_remote_json(
                "uuid-watch",
                r#"{"messageType":"Player-Command","playerCommand":{"command":"play"}}"#,
            )
            .await
    );
    let player = rig.player.clone();
    wait_until(move || player.status().state == PlaybackState::Playing).await;

    // Skip ahead, then pause.
    rig.link
        .push_remote_json(
            "uuid-watch",
            r#"{"messageType":"Player-Command","playerCommand":{"command":"fastForward"}}"#,
        )
        .await;
    rig.link
        .push_remote_json(
            "uuid-watch",
            r#"{"messageType":"Player-Command","playerCommand":{"command":"pause"}}"#,
        )
        .await;
    let player = rig.player.clone();
    wait_until(move || player.status().state == PlaybackState::Paused).await;
    assert!(rig.player.status().position >= Duration::from_secs(10));

    // A text message lands in the feed, not in the player.
    rig.link
        .push_remote_json(
            "uuid-watch",
            r#"{"messageType":"Text-Message","plainMessage":"Hello from the watch"}"#,
        )
        .await;
    let log = rig.log.clone();
    wait_until(move || !log.entries_of(LogKind::Incoming).is_empty()).await;
    let incoming = rig.log.entries_of(LogKind::Incoming);
    assert_eq!(incoming.len(), 1);
    assert_eq!(incoming[0].text, "Hello from the watch");
    assert_eq!(rig.player.status().state, PlaybackState::Paused);
}

#[tokio::test]
async fn test_disconnect_refresh_reselect_blocks_sends() {
    let rig = rig();
    rig.session.refresh_devices().await.unwrap();
    rig.session.select_device("uuid-watch").await.unwrap();
    rig.session.send_text("first").await.unwrap();

    // The watch drops off the link. The stored selection still carries the
    // old connected snapshot until the roster is refreshed and the device
    // re-selected.
    rig.link.set_connected("uuid-watch", false);
    rig.session.refresh_devices().await.unwrap();
    let reselected = rig.session.select_device("uuid-watch").await;
    assert!(
        reselected.is_ok(),
        "selecting a disconnected device is not an error"
    );

    let err = rig.session.send_text("second").await.unwrap_err();
    assert!(matches!(err, SessionError::Gate(_)));

    // Only the first message went over the link.
    let sent = rig.link.sent_payloads();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].1, Payload::text("first"));

    let texts: Vec<_> = rig
        .log
        .entries_of(LogKind::Link)
        .into_iter()
        .map(|entry| entry.text)
        .collect();
    assert!(texts.contains(&"Lost connection with the device".to_string()));
}

#[tokio::test]
async fn test_health_relay_reaches_the_wearable() {
    let rig = rig();
    rig.session.refresh_devices().await.unwrap();
    rig.session.select_device("uuid-watch").await.unwrap();

    let count = rig.session.relay_health().await.unwrap();
    assert_eq!(count, 4);

    let lines: Vec<_> = rig
        .link
        .sent_payloads()
        .into_iter()
        .map(|(uuid, payload)| {
            assert_eq!(uuid, "uuid-watch");
            payload
        })
        .collect();
    assert_eq!(
        lines,
        vec![
            Payload::text("Steps - 12000"),
            Payload::text("Calories - 420.5"),
            Payload::text("HeartRate - 65"),
            Payload::text("Oxygen - 98"),
        ]
    );
}

#[tokio::test]
async fn test_unknown_selection_is_surfaced_and_harmless() {
    let rig = rig();
    rig.session.refresh_devices().await.unwrap();
    rig.session.select_device("uuid-watch").await.unwrap();

    let err = rig.session.select_device("uuid-ghost").await.unwrap_err();
    match err {
        SessionError::Selection(SelectionError::DeviceNotFound { uuid }) => {
            assert_eq!(uuid, "uuid-ghost");
        }
        other => panic!("unexpected error: {other}"),
    }

    // The previous selection survives and still works.
    assert_eq!(
        rig.store.selected_device().map(|device| device.uuid),
        Some("uuid-watch".to_string())
    );
    rig.session.send_text("still here").await.unwrap();
}

#[tokio::test]
async fn test_photo_bytes_arrive_verbatim() {
    let rig = rig();
    rig.session.refresh_devices().await.unwrap();
    rig.session.select_device("uuid-watch").await.unwrap();

    let bytes: Vec<u8> = (0..=255).collect();
    rig.session
        .send_photo("holiday.jpg", bytes.clone())
        .await
        .unwrap();

    let sent = rig.link.sent_payloads();
    assert_eq!(sent.len(), 1);
    assert_eq!(
        sent[0].1,
        Payload::File {
            name: "holiday.jpg".to_string(),
            bytes,
        }
    );
}

#[tokio::test]
async fn test_inbound_file_lands_in_the_feed() {
    let rig = rig();
    rig.session.refresh_devices().await.unwrap();
    rig.session.select_device("uuid-watch").await.unwrap();

    let bytes: Vec<u8> = (0..=255).collect();
    assert!(
        rig.link
            .push_remote_file("uuid-watch", "screenshot.png", bytes)
            .await
    );

    let log = rig.log.clone();
    wait_until(move || {
        log.entries_of(LogKind::Incoming)
            .iter()
            .any(|entry| entry.text == "Received file screenshot.png (256 bytes)")
    })
    .await;

    // File bytes land in the feed only; the player never sees them.
    assert_eq!(rig.player.status().state, PlaybackState::Paused);
}

#[tokio::test]
async fn test_late_subscribers_observe_current_state() {
    let rig = rig();
    rig.session.refresh_devices().await.unwrap();
    rig.session.select_device("uuid-watch").await.unwrap();

    // Selection happened before this subscription; the receiver still
    // yields the current value on its first wakeup.
    let mut selection_rx = rig.store.subscribe_selected();
    selection_rx.changed().await.unwrap();
    assert_eq!(
        selection_rx
            .borrow_and_update()
            .as_ref()
            .map(|device| device.name.clone()),
        Some("WearLink Watch Pro".to_string())
    );

    let mut status_rx = rig.player.subscribe_status();
    status_rx.changed().await.unwrap();
    assert_eq!(status_rx.borrow_and_update().state, PlaybackState::Paused);
}
