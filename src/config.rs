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

//! Configuration module.
//!
//! Handles loading and saving application settings.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::player::DEFAULT_MEDIA_URL;

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Peer-link settings.
    pub link: LinkConfig,

    /// Media player settings.
    pub player: PlayerConfig,

    /// Health relay settings.
    pub health: HealthConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// Package name of the watch-side app we pair with.
    pub peer_pkg_name: String,

    /// Signing fingerprint of the watch-side app. Empty until taken from
    /// the watch app's signing certificate.
    pub peer_fingerprint: String,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            peer_pkg_name: "com.wearlink.watchapp".to_string(),
            peer_fingerprint: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Media URLs played in order.
    pub playlist: Vec<String>,

    /// Seconds skipped by one rewind or fast-forward.
    pub skip_secs: u64,
}

impl PlayerConfig {
    pub fn skip(&self) -> Duration {
        Duration::from_secs(self.skip_secs)
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            playlist: vec![DEFAULT_MEDIA_URL.to_string()],
            skip_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthConfig {
    /// Relay health readings to the wearable periodically.
    pub relay_enabled: bool,

    /// Seconds between two relay rounds.
    pub poll_interval_secs: u64,
}

impl HealthConfig {
    pub fn poll_interval(&self) -> Duration {
        // tokio::time::interval panics on a zero period.
        Duration::from_secs(self.poll_interval_secs.max(1))
    }
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            relay_enabled: true,
            poll_interval_secs: 30,
        }
    }
}

impl Config {
    /// Load configuration from file or create default.
    pub fn load() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("wearlink");

        std::fs::create_dir_all(&config_dir)?;

        let config_path = config_dir.join("config.toml");

        if config_path.exists() {
            Self::read_from(&config_path)
        } else {
            let config = Self::default();
            config.write_to(&config_path)?;
            Ok(config)
        }
    }

    /// Save configuration to file.
    pub fn save(&self) -> Result<()> {
        let config_path = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("wearlink")
            .join("config.toml");
        self.write_to(&config_path)
    }

    /// Read configuration from an explicit path.
    pub fn read_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Write configuration to an explicit path.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
