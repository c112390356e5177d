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

//! Paired-device roster and selection state.
//!
//! [`DeviceStore`] is the single owner of "which wearable are we talking
//! to". Selection changes fan out over watch channels; every subscriber
//! immediately observes the current value and then only distinct updates.

use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info};

/// One paired wearable as the link layer reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    pub uuid: String,
    pub name: String,
    pub connected: bool,
}

impl Device {
    pub fn new(uuid: impl Into<String>, name: impl Into<String>, connected: bool) -> Self {
        Self {
            uuid: uuid.into(),
            name: name.into(),
            connected,
        }
    }
}

/// Selection against the current roster failed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    /// No device in the last discovery result carries this uuid.
    #[error("no paired device with uuid {uuid}")]
    DeviceNotFound { uuid: String },
}

/// Shared store for the discovered roster and the selected device.
///
/// Cheap to share: clone the `Arc` it lives in, not the store itself.
/// Both channels deduplicate, so writing the value already held wakes
/// nobody.
pub struct DeviceStore {
    selected_tx: watch::Sender<Option<Device>>,
    found_tx: watch::Sender<Vec<Device>>,
}

impl Default for DeviceStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceStore {
    pub fn new() -> Self {
        let (selected_tx, _) = watch::channel(None);
        let (found_tx, _) = watch::channel(Vec::new());
        Self {
            selected_tx,
            found_tx,
        }
    }

    /// Replace the roster of discovered devices.
    ///
    /// Subscribers are only woken when the roster actually differs from
    /// the one already stored.
    pub fn set_found_devices(&self, devices: Vec<Device>) {
        let modified = self.found_tx.send_if_modified(|current| {
            if *current == devices {
                false
            } else {
                *current = devices;
                true
            }
        });
        if modified {
            debug!(
                "Updated found devices ({} entries)",
                self.found_tx.borrow().len()
            );
        }
    }

    /// Select the roster device carrying `uuid`.
    ///
    /// A uuid outside the current roster is an error and leaves the
    /// existing selection untouched.
    pub fn select_by_uuid(&self, uuid: &str) -> Result<Device, SelectionError> {
        let found = self
            .found_tx
            .borrow()
            .iter()
            .find(|device| device.uuid == uuid)
            .cloned();
        match found {
            Some(device) => {
                self.select_device(device.clone());
                Ok(device)
            }
            None => Err(SelectionError::DeviceNotFound {
                uuid: uuid.to_string(),
            }),
        }
    }

    /// Make `device` the selected device.
    pub fn select_device(&self, device: Device) {
        let modified = self.selected_tx.send_if_modified(|current| {
            if current.as_ref() == Some(&device) {
                false
            } else {
                info!("Selected device {} ({})", device.name, device.uuid);
                *current = Some(device);
                true
            }
        });
        if !modified {
            debug!("Selection unchanged");
        }
    }

    /// Drop the selection, if any.
    pub fn clear_selection(&self) {
        self.selected_tx.send_if_modified(|current| {
            if current.is_none() {
                false
            } else {
                info!("Cleared device selection");
                *current = None;
                true
            }
        });
    }

    /// Current selection, if any.
    pub fn selected_device(&self) -> Option<Device> {
        self.selected_tx.borrow().clone()
    }

    /// Roster from the most recent discovery.
    pub fn last_found_devices(&self) -> Vec<Device> {
        self.found_tx.borrow().clone()
    }

    /// Watch the selection. The receiver starts marked changed, so the
    /// first `changed().await` returns immediately with the current value.
    pub fn subscribe_selected(&self) -> watch::Receiver<Option<Device>> {
        let mut rx = self.selected_tx.subscribe();
        rx.mark_changed();
        rx
    }

    /// Watch the discovered roster, with the same replay-first semantics
    /// as [`Self::subscribe_selected`].
    pub fn subscribe_found(&self) -> watch::Receiver<Vec<Device>> {
        let mut rx = self.found_tx.subscribe();
        rx.mark_changed();
        rx
    }
}
