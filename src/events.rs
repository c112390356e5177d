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

//! Inbound message routing and dispatch.
//!
//! One router per registered receiver: it drains the inbound channel,
//! translates each payload, and dispatches to the player surface or the
//! message feed. Malformed payloads are logged and dropped; they never
//! stop the loop.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::peerlink::{
    translate, InboundMessage, LocalDataMessage, LocalMessageType, LocalPlayerCommand, Payload,
};
use crate::player::PlayerSurface;
use crate::state::{LogKind, MessageLog};

/// Routes inbound messages to the player and the message feed.
pub struct MessageRouter {
    surface: Arc<dyn PlayerSurface>,
    log: Arc<MessageLog>,
}

impl MessageRouter {
    pub fn new(surface: Arc<dyn PlayerSurface>, log: Arc<MessageLog>) -> Self {
        Self { surface, log }
    }

    /// Drain the channel until the sender side closes.
    ///
    /// Closing happens when the transport replaces this receiver (the
    /// device was re-selected) or drops it entirely.
    pub async fn run(self, mut rx: mpsc::Receiver<InboundMessage>) {
        info!("Message router started");
        while let Some(inbound) = rx.recv().await {
            self.route(inbound);
        }
        info!("Message router stopped");
    }

    /// Route one inbound message. Each message is handled exactly once.
    pub fn route(&self, inbound: InboundMessage) {
        match inbound.payload {
            Payload::Data(bytes) => self.route_data(&inbound.device_uuid, &bytes),
            Payload::File { name, bytes } => {
                info!(
                    "Received file {} ({} bytes) from {}",
                    name,
                    bytes.len(),
                    inbound.device_uuid
                );
                self.log.push(
                    LogKind::Incoming,
                    format!("Received file {} ({} bytes)", name, bytes.len()),
                );
            }
        }
    }

    fn route_data(&self, device_uuid: &str, bytes: &[u8]) {
        match translate(bytes) {
            Ok(message) => self.dispatch(message),
            Err(e) => {
                error!("Dropping malformed payload from {}: {}", device_uuid, e);
                self.log
                    .push(LogKind::Link, format!("Dropped malformed message: {e}"));
            }
        }
    }

    fn dispatch(&self, message: LocalDataMessage) {
        match message.message_type {
            LocalMessageType::PlayerCommand => {
                let command = message.player_command.unwrap_or_else(|| {
                    warn!("Player command message without a command, treating as fastForward");
                    LocalPlayerCommand::FastForward
                });
                debug!("Dispatching player command {}", command.as_str());
                match command {
                    LocalPlayerCommand::Play => self.surface.play(),
                    LocalPlayerCommand::Pause => self.surface.pause(),
                    LocalPlayerCommand::Rewind => self.surface.rewind(),
                    LocalPlayerCommand::FastForward => self.surface.fast_forward(),
                    LocalPlayerCommand::Previous => self.surface.previous(),
                    LocalPlayerCommand::Next => self.surface.next(),
                }
            }
            LocalMessageType::TextMessage => {
                let text = message.plain_message.unwrap_or_default();
                info!("Received text message: {}", text);
                self.log.push(LogKind::Incoming, text);
            }
        }
    }
}
