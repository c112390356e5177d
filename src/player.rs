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

//! Remote-driven media player.
//!
//! [`VideoPlayer`] models playback as a playlist cursor plus a position
//! clock: while playing, position is the captured offset plus wall time
//! since the last resume, so nothing ticks in the background. Remote
//! commands arrive through the [`PlayerSurface`] trait; status changes
//! fan out over a watch channel.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::{debug, info};

/// Sample media used when no playlist is configured.
pub const DEFAULT_MEDIA_URL: &str =
    "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/ElephantsDream.mp4";

/// Control surface the message router drives.
///
/// Methods take `&self` so one `Arc<dyn PlayerSurface>` can be shared by
/// every router generation; implementations use interior mutability.
pub trait PlayerSurface: Send + Sync {
    fn play(&self);
    fn pause(&self);
    fn rewind(&self);
    fn fast_forward(&self);
    fn previous(&self);
    fn next(&self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Playing,
    Paused,
}

impl PlaybackState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlaybackState::Playing => "playing",
            PlaybackState::Paused => "paused",
        }
    }
}

/// Snapshot of the player as of its most recent transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerStatus {
    pub state: PlaybackState,
    pub position: Duration,
    pub media_url: String,
}

struct PlayerInner {
    playlist: Vec<String>,
    index: usize,
    state: PlaybackState,
    /// Position captured at the last transition.
    base_offset: Duration,
    /// When playback last resumed; meaningful only while playing.
    resumed_at: Instant,
}

impl PlayerInner {
    fn position(&self) -> Duration {
        match self.state {
            PlaybackState::Playing => self.base_offset + self.resumed_at.elapsed(),
            PlaybackState::Paused => self.base_offset,
        }
    }

    fn status(&self) -> PlayerStatus {
        PlayerStatus {
            state: self.state,
            position: self.position(),
            media_url: self.playlist[self.index].clone(),
        }
    }
}

/// Playlist player controlled entirely through [`PlayerSurface`].
pub struct VideoPlayer {
    inner: Mutex<PlayerInner>,
    skip: Duration,
    status_tx: watch::Sender<PlayerStatus>,
}

impl VideoPlayer {
    /// Create a player paused at the start of the first playlist entry.
    ///
    /// An empty playlist is replaced by [`DEFAULT_MEDIA_URL`] so there is
    /// always a current track.
    pub fn new(playlist: Vec<String>, skip: Duration) -> Arc<Self> {
        let playlist = if playlist.is_empty() {
            vec![DEFAULT_MEDIA_URL.to_string()]
        } else {
            playlist
        };

        let inner = PlayerInner {
            playlist,
            index: 0,
            state: PlaybackState::Paused,
            base_offset: Duration::ZERO,
            resumed_at: Instant::now(),
        };
        let (status_tx, _) = watch::channel(inner.status());

        Arc::new(Self {
            inner: Mutex::new(inner),
            skip,
            status_tx,
        })
    }

    /// Live status, with position computed at call time.
    pub fn status(&self) -> PlayerStatus {
        self.inner.lock().status()
    }

    /// Watch status transitions. The receiver starts marked changed so
    /// the first `changed().await` yields the current status.
    pub fn subscribe_status(&self) -> watch::Receiver<PlayerStatus> {
        let mut rx = self.status_tx.subscribe();
        rx.mark_changed();
        rx
    }

    fn publish(&self, inner: &PlayerInner) {
        self.status_tx.send_replace(inner.status());
    }

    /// Seek by a signed amount, clamping at the start of the track.
    fn seek_by(&self, forward: bool) {
        let mut inner = self.inner.lock();
        let position = inner.position();
        inner.base_offset = if forward {
            position + self.skip
        } else {
            position.saturating_sub(self.skip)
        };
        inner.resumed_at = Instant::now();
        debug!("Seek to {:?}", inner.base_offset);
        self.publish(&inner);
    }

    /// Move the playlist cursor, saturating at either end. Position
    /// resets to zero; the play/pause state carries over.
    fn step(&self, forward: bool) {
        let mut inner = self.inner.lock();
        let last = inner.playlist.len() - 1;
        let next = if forward {
            (inner.index + 1).min(last)
        } else {
            inner.index.saturating_sub(1)
        };
        if next != inner.index {
            info!("Switching to track {}: {}", next, inner.playlist[next]);
        }
        inner.index = next;
        inner.base_offset = Duration::ZERO;
        inner.resumed_at = Instant::now();
        self.publish(&inner);
    }
}

impl PlayerSurface for VideoPlayer {
    fn play(&self) {
        let mut inner = self.inner.lock();
        if inner.state == PlaybackState::Playing {
            return;
        }
        inner.state = PlaybackState::Playing;
        inner.resumed_at = Instant::now();
        info!("Playback resumed at {:?}", inner.base_offset);
        self.publish(&inner);
    }

    fn pause(&self) {
        let mut inner = self.inner.lock();
        if inner.state == PlaybackState::Paused {
            return;
        }
        inner.base_offset = inner.position();
        inner.state = PlaybackState::Paused;
        info!("Playback paused at {:?}", inner.base_offset);
        self.publish(&inner);
    }

    fn rewind(&self) {
        self.seek_by(false);
    }

    fn fast_forward(&self) {
        self.seek_by(true);
    }

    fn previous(&self) {
        self.step(false);
    }

    fn next(&self) {
        self.step(true);
    }
}
