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

//! Companion session: ties the link, the device store, the gate, the
//! player, and the health source together.
//!
//! The session owns the inbound router task. Selecting a device tears the
//! previous router down and, when the new device is connected, registers
//! a fresh receiver and spawns a new router for it. Every outbound
//! operation passes the readiness gate first.

use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::devices::{Device, DeviceStore, SelectionError};
use crate::events::MessageRouter;
use crate::gate::{GateError, LinkGate};
use crate::health::{HealthError, HealthSource};
use crate::peerlink::{LinkError, Payload, PeerLink};
use crate::player::PlayerSurface;
use crate::state::{LogKind, MessageLog};

/// Any failure a session operation can surface to its caller.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Selection(#[from] SelectionError),
    #[error(transparent)]
    Gate(#[from] GateError),
    #[error(transparent)]
    Link(#[from] LinkError),
    #[error(transparent)]
    Health(#[from] HealthError),
}

/// Long-lived coordinator for one handheld-wearable pairing session.
pub struct CompanionSession {
    link: Arc<dyn PeerLink>,
    store: Arc<DeviceStore>,
    gate: LinkGate,
    surface: Arc<dyn PlayerSurface>,
    health: Arc<dyn HealthSource>,
    log: Arc<MessageLog>,
    router_task: Mutex<Option<JoinHandle<()>>>,
}

impl CompanionSession {
    pub fn new(
        link: Arc<dyn PeerLink>,
        store: Arc<DeviceStore>,
        surface: Arc<dyn PlayerSurface>,
        health: Arc<dyn HealthSource>,
        log: Arc<MessageLog>,
    ) -> Self {
        let gate = LinkGate::new(Arc::clone(&store));
        Self {
            link,
            store,
            gate,
            surface,
            health,
            log,
            router_task: Mutex::new(None),
        }
    }

    /// Ask the link for bonded devices and publish them to the store.
    ///
    /// An empty result is reported but does not replace a roster we
    /// already have; a transient discovery hiccup must not wipe the list
    /// the user is looking at.
    pub async fn refresh_devices(&self) -> Result<Vec<Device>, SessionError> {
        let devices = self.link.bonded_devices().await?;
        if devices.is_empty() {
            warn!("Devices list is empty");
            self.log.push(LogKind::Link, "Devices list is empty");
            return Ok(devices);
        }
        info!("Discovered {} bonded device(s)", devices.len());
        self.store.set_found_devices(devices.clone());
        Ok(devices)
    }

    /// Select the roster device with `uuid` and start routing its traffic.
    ///
    /// An unknown uuid is an error and leaves both the selection and the
    /// running router untouched. A disconnected device becomes the
    /// selection but gets no receiver; the gate will block traffic to it.
    pub async fn select_device(&self, uuid: &str) -> Result<Device, SessionError> {
        let device = match self.store.select_by_uuid(uuid) {
            Ok(device) => device,
            Err(e) => {
                warn!("The device has not been found: {}", e);
                self.log
                    .push(LogKind::Link, "The device has not been found");
                return Err(e.into());
            }
        };

        // The previous selection's router must not keep consuming.
        if let Some(old) = self.router_task.lock().take() {
            old.abort();
            debug!("Stopped router for previous selection");
        }

        if !device.connected {
            warn!("The device seems to be disconnected");
            self.log
                .push(LogKind::Link, "The device seems to be disconnected");
            return Ok(device);
        }

        match self.link.register_receiver(&device).await {
            Ok(rx) => {
                let router = MessageRouter::new(self.surface.clone(), self.log.clone());
                let task = tokio::spawn(router.run(rx));
                if let Some(racer) = self.router_task.lock().replace(task) {
                    racer.abort();
                }
                info!("Register receiver listener succeed for {}", device.name);
                self.log
                    .push(LogKind::Link, "Register receiver listener succeed!");
                Ok(device)
            }
            Err(e) => {
                error!("Register receiver listener failed: {}", e);
                self.log
                    .push(LogKind::Link, "Register receiver listener failed!");
                Err(e.into())
            }
        }
    }

    /// Gate check shared by every outbound operation.
    fn guarded_device(&self) -> Result<Device, SessionError> {
        match self.gate.ensure_ready() {
            Ok(device) => Ok(device),
            Err(e) => {
                warn!("Lost connection with the device: {}", e);
                self.log
                    .push(LogKind::Link, "Lost connection with the device");
                Err(e.into())
            }
        }
    }

    /// Send a text message to the selected device.
    pub async fn send_text(&self, text: &str) -> Result<(), SessionError> {
        let device = self.guarded_device()?;
        match self.link.send(&device, Payload::text(text)).await {
            Ok(()) => {
                info!("Send message succeed");
                self.log.push(LogKind::Outgoing, text);
                Ok(())
            }
            Err(e) => {
                error!("Send message failed: {}", e);
                self.log.push(LogKind::Link, "Send message failed!");
                Err(e.into())
            }
        }
    }

    /// Probe whether the selected device answers on the link.
    pub async fn ping(&self) -> Result<(), SessionError> {
        let device = self.guarded_device()?;
        match self.link.ping(&device).await {
            Ok(()) => {
                info!("Ping succeed");
                self.log.push(LogKind::Link, "Ping succeed!");
                Ok(())
            }
            Err(e) => {
                error!("Ping failed: {}", e);
                self.log.push(LogKind::Link, "Ping failed!");
                Err(e.into())
            }
        }
    }

    /// Send a named binary blob, e.g. a photo, to the selected device.
    pub async fn send_photo(&self, name: &str, bytes: Vec<u8>) -> Result<(), SessionError> {
        let device = self.guarded_device()?;
        let size = bytes.len();
        let payload = Payload::File {
            name: name.to_string(),
            bytes,
        };
        match self.link.send(&device, payload).await {
            Ok(()) => {
                info!("Send file succeed: {} ({} bytes)", name, size);
                self.log
                    .push(LogKind::Outgoing, format!("Sent photo {name} ({size} bytes)"));
                Ok(())
            }
            Err(e) => {
                error!("Send file failed: {}", e);
                self.log.push(LogKind::Link, "Send file failed!");
                Err(e.into())
            }
        }
    }

    /// Relay today's health readings, one message per metric.
    ///
    /// Fails fast on the first send error; earlier lines of the batch
    /// have already been delivered at that point.
    pub async fn relay_health(&self) -> Result<usize, SessionError> {
        let device = self.guarded_device()?;
        let readings = self.health.latest_readings().await?;
        for reading in &readings {
            self.link
                .send(&device, Payload::text(reading.relay_line()))
                .await?;
        }
        info!("Relayed {} health reading(s)", readings.len());
        Ok(readings.len())
    }

    /// Stop the inbound router, if one is running.
    pub fn shutdown(&self) {
        if let Some(task) = self.router_task.lock().take() {
            task.abort();
            info!("Session shut down");
        }
    }
}

impl Drop for CompanionSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}
