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

//! Peer-link transport seam.
//!
//! Everything above this trait treats the wearable link as an opaque
//! byte-payload channel. The simulator in [`crate::peerlink::sim`]
//! implements it for development and tests; a production transport
//! plugs in behind the same trait.

use futures::future::BoxFuture;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::devices::Device;

/// One outbound unit handed to the link layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// Small opaque byte message, typically UTF-8 JSON.
    Data(Vec<u8>),
    /// Named binary blob, e.g. a photo.
    File { name: String, bytes: Vec<u8> },
}

impl Payload {
    /// Wrap a text message as a data payload.
    pub fn text(message: impl Into<String>) -> Self {
        Self::Data(message.into().into_bytes())
    }
}

/// One inbound payload together with the device it came from.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub device_uuid: String,
    pub payload: Payload,
}

/// Transport-level failure.
#[derive(Debug, Error)]
pub enum LinkError {
    /// The addressed device is not reachable over the link.
    #[error("device {0} is unreachable")]
    DeviceUnreachable(String),
    /// The transport accepted the device but refused the payload.
    #[error("send failed: {0}")]
    SendFailed(String),
    /// Receiver registration was rejected by the transport.
    #[error("receiver registration failed: {0}")]
    RegisterFailed(String),
    /// Enumerating bonded devices failed.
    #[error("device discovery failed: {0}")]
    DiscoveryFailed(String),
}

/// Bidirectional message link to paired wearable devices.
///
/// All methods are object-safe async via [`BoxFuture`] so the session can
/// hold the transport as `Arc<dyn PeerLink>`.
pub trait PeerLink: Send + Sync {
    /// Enumerate the devices currently bonded to this handheld.
    fn bonded_devices(&self) -> BoxFuture<'_, Result<Vec<Device>, LinkError>>;

    /// Send one payload to a device.
    fn send(&self, device: &Device, payload: Payload) -> BoxFuture<'_, Result<(), LinkError>>;

    /// Register this handheld as the receiver for a device's inbound
    /// traffic. Registering again replaces the previous receiver; the old
    /// channel closes.
    fn register_receiver(
        &self,
        device: &Device,
    ) -> BoxFuture<'_, Result<mpsc::Receiver<InboundMessage>, LinkError>>;

    /// Probe whether the device answers on the link.
    fn ping(&self, device: &Device) -> BoxFuture<'_, Result<(), LinkError>>;
}
