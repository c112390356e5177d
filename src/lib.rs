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

//! Handheld companion core for WearLink wearable accessories.
//!
//! The crate talks to a paired wearable over an opaque message link:
//! inbound JSON documents become typed messages that drive a media player
//! or a message feed, and outbound traffic (texts, pings, photos, health
//! readings) flows through a readiness gate tied to the selected device.

pub mod config;
pub mod devices;
pub mod events;
pub mod gate;
pub mod health;
pub mod peerlink;
pub mod player;
pub mod session;
pub mod state;

pub use config::Config;
pub use devices::{Device, DeviceStore, SelectionError};
pub use gate::{GateError, LinkGate};
pub use session::{CompanionSession, SessionError};
