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

//! Readiness gate for outbound operations.
//!
//! Every send, ping, and relay first asks the gate for the device it may
//! talk to. The gate inspects the live selection at call time, so a
//! selection change between two sends is picked up by the second one.

use std::sync::Arc;

use thiserror::Error;

use crate::devices::{Device, DeviceStore};

/// Why the link is not ready for an outbound operation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GateError {
    /// Nothing selected yet; nothing to talk to.
    #[error("no device selected")]
    NoDeviceSelected,
    /// The selected device's last known state is disconnected.
    #[error("device {name} is disconnected")]
    DeviceDisconnected { name: String },
}

/// Gate that admits outbound traffic only towards a connected selection.
pub struct LinkGate {
    store: Arc<DeviceStore>,
}

impl LinkGate {
    pub fn new(store: Arc<DeviceStore>) -> Self {
        Self { store }
    }

    /// Return the selected device if it is ready to receive traffic.
    ///
    /// Reads the store fresh on every call; callers must not cache the
    /// result across awaits.
    pub fn ensure_ready(&self) -> Result<Device, GateError> {
        match self.store.selected_device() {
            None => Err(GateError::NoDeviceSelected),
            Some(device) if !device.connected => Err(GateError::DeviceDisconnected {
                name: device.name,
            }),
            Some(device) => Ok(device),
        }
    }
}
