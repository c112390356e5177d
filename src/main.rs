// Copyright 2026 WearLink Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! WearLink Companion application.
//!
//! Runs the companion core against the in-process wearable simulator: a
//! scripted watch drives the player and the message feed while the main
//! loop reports status changes and relays health readings.

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use wearlink_companion::config::Config;
use wearlink_companion::devices::{Device, DeviceStore};
use wearlink_companion::health::SimulatedHealth;
use wearlink_companion::peerlink::SimulatedWearable;
use wearlink_companion::player::VideoPlayer;
use wearlink_companion::session::CompanionSession;
use wearlink_companion::state::MessageLog;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("wearlink_companion=info".parse().unwrap()),
        )
        .init();

    info!(
        "Starting WearLink Companion v{}...",
        env!("CARGO_PKG_VERSION")
    );

    // Load configuration
    let config = Config::load()?;
    info!(
        "Configuration loaded (peer package {})",
        config.link.peer_pkg_name
    );

    // Simulated wearable roster: one watch on the link, one sleeping band
    let watch_uuid = Uuid::new_v4().to_string();
    let band_uuid = Uuid::new_v4().to_string();
    let link = Arc::new(SimulatedWearable::new(vec![
        Device::new(watch_uuid.clone(), "WearLink Watch Pro", true),
        Device::new(band_uuid, "WearLink Band", false),
    ]));

    // Core state
    let store = Arc::new(DeviceStore::new());
    let player = VideoPlayer::new(config.player.playlist.clone(), config.player.skip());
    let log = MessageLog::new();
    let health = Arc::new(SimulatedHealth::new());

    let session = CompanionSession::new(
        link.clone(),
        store.clone(),
        player.clone(),
        health,
        log.clone(),
    );

    // Discover devices and select the first connected one
    let devices = session.refresh_devices().await?;
    match devices.iter().find(|device| device.connected) {
        Some(device) => {
            session.select_device(&device.uuid).await?;
        }
        None => warn!("No connected device to select"),
    }

    // Greet the watch, then check that it answers
    let greeting = format!(
        "Hi from the handheld! Time: {}ms",
        chrono::Utc::now().timestamp_millis()
    );
    if let Err(e) = session.send_text(&greeting).await {
        error!("Greeting not delivered: {}", e);
    }
    if let Err(e) = session.ping().await {
        error!("Ping failed: {}", e);
    }

    // Script the simulated watch: a short remote-control session
    let script_link = link.clone();
    let script_uuid = watch_uuid.clone();
    tokio::spawn(async move {
        let payloads = [
            r#"{"messageType":"Player-Command","playerCommand":{"command":"play"}}"#,
            r#"{"messageType":"Player-Command","playerCommand":{"command":"fastForward"}}"#,
            r#"{"messageType":"Text-Message","plainMessage":"Hello from the watch"}"#,
            r#"{"messageType":"Player-Command","playerCommand":{"command":"pause"}}"#,
        ];
        for json in payloads {
            tokio::time::sleep(Duration::from_secs(2)).await;
            if !script_link.push_remote_json(&script_uuid, json).await {
                warn!("Simulated watch has no receiver, stopping script");
                break;
            }
        }
        info!("Simulated watch script finished");
    });

    let mut status_rx = player.subscribe_status();
    let mut selection_rx = store.subscribe_selected();
    let mut relay_tick = tokio::time::interval(config.health.poll_interval());

    info!("Ready. Press Ctrl-C to stop.");

    loop {
        tokio::select! {
            _ = relay_tick.tick() => {
                if config.health.relay_enabled {
                    match session.relay_health().await {
                        Ok(count) => info!("Health relay delivered {} reading(s)", count),
                        Err(e) => warn!("Health relay skipped: {}", e),
                    }
                }
            }
            result = status_rx.changed() => {
                if result.is_err() {
                    break;
                }
                let status = status_rx.borrow_and_update().clone();
                info!(
                    "Player {} at {:?} ({})",
                    status.state.as_str(),
                    status.position,
                    status.media_url
                );
            }
            result = selection_rx.changed() => {
                if result.is_err() {
                    break;
                }
                match selection_rx.borrow_and_update().clone() {
                    Some(device) => info!(
                        "Active device: {} (connected={})",
                        device.name, device.connected
                    ),
                    None => info!("No device selected"),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received");
                break;
            }
        }
    }

    session.shutdown();
    for entry in log.entries() {
        info!(
            "feed [{}] {}: {}",
            entry.kind.as_str(),
            entry.at.format("%H:%M:%S"),
            entry.text
        );
    }
    info!("WearLink Companion stopped");
    Ok(())
}
