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

//! In-process wearable simulator.
//!
//! Implements [`PeerLink`] against an in-memory roster so the whole
//! companion can run without hardware. Tests drive inbound traffic with
//! [`SimulatedWearable::push_remote_json`] and inspect outbound traffic
//! with [`SimulatedWearable::sent_payloads`].

use std::collections::HashMap;

use futures::future::BoxFuture;
use parking_lot::{Mutex, RwLock};
use tokio::sync::mpsc;
use tracing::debug;

use crate::devices::Device;
use crate::peerlink::link::{InboundMessage, LinkError, Payload, PeerLink};

/// Capacity of each per-device inbound channel.
const INBOUND_CHANNEL_SIZE: usize = 32;

/// Fake transport backed by an in-memory device roster.
pub struct SimulatedWearable {
    devices: RwLock<Vec<Device>>,
    receivers: Mutex<HashMap<String, mpsc::Sender<InboundMessage>>>,
    sent: Mutex<Vec<(String, Payload)>>,
}

impl SimulatedWearable {
    pub fn new(devices: Vec<Device>) -> Self {
        Self {
            devices: RwLock::new(devices),
            receivers: Mutex::new(HashMap::new()),
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Flip the connected flag of a roster device.
    pub fn set_connected(&self, uuid: &str, connected: bool) {
        let mut devices = self.devices.write();
        if let Some(device) = devices.iter_mut().find(|device| device.uuid == uuid) {
            device.connected = connected;
            debug!("Device {} connected={}", uuid, connected);
        }
    }

    /// Inject a JSON document as if the device had sent it.
    ///
    /// Returns `false` when no receiver is registered for the device (or
    /// the registered receiver was dropped), mirroring a real link that
    /// silently drops traffic nobody listens for.
    pub async fn push_remote_json(&self, uuid: &str, json: &str) -> bool {
        self.push_inbound(uuid, Payload::Data(json.as_bytes().to_vec()))
            .await
    }

    /// Inject a named file as if the device had sent it.
    pub async fn push_remote_file(&self, uuid: &str, name: &str, bytes: Vec<u8>) -> bool {
        self.push_inbound(
            uuid,
            Payload::File {
                name: name.to_string(),
                bytes,
            },
        )
        .await
    }

    async fn push_inbound(&self, uuid: &str, payload: Payload) -> bool {
        // Clone the sender out so the lock is not held across the await.
        let sender = self.receivers.lock().get(uuid).cloned();
        match sender {
            Some(tx) => tx
                .send(InboundMessage {
                    device_uuid: uuid.to_string(),
                    payload,
                })
                .await
                .is_ok(),
            None => {
                debug!("No receiver registered for {}, dropping payload", uuid);
                false
            }
        }
    }

    /// Everything sent so far, in order, as (device uuid, payload) pairs.
    pub fn sent_payloads(&self) -> Vec<(String, Payload)> {
        self.sent.lock().clone()
    }

    fn reachable(&self, uuid: &str) -> bool {
        self.devices
            .read()
            .iter()
            .any(|device| device.uuid == uuid && device.connected)
    }
}

impl PeerLink for SimulatedWearable {
    fn bonded_devices(&self) -> BoxFuture<'_, Result<Vec<Device>, LinkError>> {
        Box::pin(async move { Ok(self.devices.read().clone()) })
    }

    fn send(&self, device: &Device, payload: Payload) -> BoxFuture<'_, Result<(), LinkError>> {
        let uuid = device.uuid.clone();
        Box::pin(async move {
            if !self.reachable(&uuid) {
                return Err(LinkError::DeviceUnreachable(uuid));
            }
            debug!("Sending payload to {}", uuid);
            self.sent.lock().push((uuid, payload));
            Ok(())
        })
    }

    fn register_receiver(
        &self,
        device: &Device,
    ) -> BoxFuture<'_, Result<mpsc::Receiver<InboundMessage>, LinkError>> {
        let uuid = device.uuid.clone();
        Box::pin(async move {
            if !self.reachable(&uuid) {
                return Err(LinkError::RegisterFailed(format!(
                    "device {uuid} is not connected"
                )));
            }
            let (tx, rx) = mpsc::channel(INBOUND_CHANNEL_SIZE);
            // Replacing the sender closes the previous receiver's channel.
            self.receivers.lock().insert(uuid, tx);
            Ok(rx)
        })
    }

    fn ping(&self, device: &Device) -> BoxFuture<'_, Result<(), LinkError>> {
        let uuid = device.uuid.clone();
        Box::pin(async move {
            if self.reachable(&uuid) {
                Ok(())
            } else {
                Err(LinkError::DeviceUnreachable(uuid))
            }
        })
    }
}
