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

//! Shared message feed state.

use chrono::{DateTime, Local};
use parking_lot::RwLock;
use std::sync::Arc;

/// Direction or origin of a feed entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogKind {
    /// Arrived from the wearable.
    Incoming,
    /// Sent by this handheld.
    Outgoing,
    /// Link status and gate messages.
    Link,
}

impl LogKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogKind::Incoming => "incoming",
            LogKind::Outgoing => "outgoing",
            LogKind::Link => "link",
        }
    }
}

/// One line of the user-visible message feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub at: DateTime<Local>,
    pub kind: LogKind,
    pub text: String,
}

/// Append-only feed of user-visible message traffic.
#[derive(Debug, Default)]
pub struct MessageLog {
    entries: RwLock<Vec<LogEntry>>,
}

impl MessageLog {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push(&self, kind: LogKind, text: impl Into<String>) {
        self.entries.write().push(LogEntry {
            at: Local::now(),
            kind,
            text: text.into(),
        });
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.read().clone()
    }

    /// Feed lines of one kind, oldest first.
    pub fn entries_of(&self, kind: LogKind) -> Vec<LogEntry> {
        self.entries
            .read()
            .iter()
            .filter(|entry| entry.kind == kind)
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
