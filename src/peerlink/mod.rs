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

//! Peer link to the paired wearable: wire protocol, transport seam,
//! and the in-process simulator.

pub mod link;
pub mod protocol;
pub mod sim;

pub use link::{InboundMessage, LinkError, Payload, PeerLink};
pub use protocol::{translate, LocalDataMessage, LocalMessageType, LocalPlayerCommand, ParseError};
pub use sim::SimulatedWearable;
