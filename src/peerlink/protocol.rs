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

//! Remote message protocol and translation.
//!
//! The wearable sends small JSON documents as opaque peer-link payloads.
//! This module turns those bytes into the closed, typed representation the
//! rest of the app dispatches on. Translation is a pure function: no I/O,
//! no shared state, every call re-parses from scratch.

use serde::Deserialize;
use std::str;
use thiserror::Error;
use tracing::warn;

/// Wire value of `messageType` that marks a player command.
const PLAYER_COMMAND_TYPE: &str = "Player-Command";

/// Inbound message as it appears on the wire.
///
/// Every field is optional: text traffic omits `playerCommand`, and some
/// wearable builds omit `messageType` entirely.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteDataMessage {
    pub message_type: Option<String>,
    pub player_command: Option<RemotePlayerCommand>,
    pub plain_message: Option<String>,
}

/// Nested command object of a player-command message.
#[derive(Debug, Deserialize)]
pub struct RemotePlayerCommand {
    pub command: String,
}

/// Kind of an inbound message after translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalMessageType {
    TextMessage,
    PlayerCommand,
}

/// Player instruction decoded from the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalPlayerCommand {
    Play,
    Pause,
    Rewind,
    /// Also the fallback for command strings this build does not know,
    /// kept for wire compatibility with newer wearable revisions. Every
    /// fallback is logged at warn level.
    FastForward,
    Previous,
    Next,
}

impl LocalPlayerCommand {
    /// Map a wire command string, case-insensitively.
    ///
    /// `stop` is a legacy alias for pause still sent by older wearable
    /// builds. Anything unrecognized falls back to [`Self::FastForward`].
    pub fn parse(s: &str) -> Self {
        let command = s.trim();
        if command.eq_ignore_ascii_case("play") {
            Self::Play
        } else if command.eq_ignore_ascii_case("pause") || command.eq_ignore_ascii_case("stop") {
            Self::Pause
        } else if command.eq_ignore_ascii_case("rewind") {
            Self::Rewind
        } else if command.eq_ignore_ascii_case("previous") {
            Self::Previous
        } else if command.eq_ignore_ascii_case("next") {
            Self::Next
        } else {
            warn!(
                "Unknown player command {:?}, falling back to fastForward",
                s
            );
            Self::FastForward
        }
    }

    /// Canonical wire spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Play => "play",
            Self::Pause => "pause",
            Self::Rewind => "rewind",
            Self::FastForward => "fastForward",
            Self::Previous => "previous",
            Self::Next => "next",
        }
    }
}

/// Typed local form of one inbound message.
///
/// Produced once per payload and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalDataMessage {
    pub message_type: LocalMessageType,
    pub player_command: Option<LocalPlayerCommand>,
    pub plain_message: Option<String>,
}

/// The payload was not the UTF-8 JSON document we expect.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("payload is not valid UTF-8: {0}")]
    Utf8(#[from] str::Utf8Error),
    #[error("payload is not a remote message document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Translate a raw peer-link payload into its typed local form.
///
/// Unknown or missing `messageType` values map to `TextMessage`; malformed
/// payloads are the caller's problem and come back as [`ParseError`]. Equal
/// payloads translate to equal values.
pub fn translate(payload: &[u8]) -> Result<LocalDataMessage, ParseError> {
    let text = str::from_utf8(payload)?;
    let remote: RemoteDataMessage = serde_json::from_str(text)?;

    let message_type = match remote.message_type.as_deref() {
        Some(PLAYER_COMMAND_TYPE) => LocalMessageType::PlayerCommand,
        _ => LocalMessageType::TextMessage,
    };

    let player_command = remote
        .player_command
        .map(|remote_command| LocalPlayerCommand::parse(&remote_command.command));

    Ok(LocalDataMessage {
        message_type,
        player_command,
        plain_message: remote.plain_message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player_message(command: LocalPlayerCommand) -> LocalDataMessage {
        LocalDataMessage {
            message_type: LocalMessageType::PlayerCommand,
            player_command: Some(command),
            plain_message: None,
        }
    }

    #[test]
    fn test_player_command_payloads() {
        let cases = [
            (
                r#"{"messageType":"Player-Command","playerCommand":{"command":"fastForward"}}"#,
                player_message(LocalPlayerCommand::FastForward),
            ),
            (
                r#"{"messageType":"Player-Command","playerCommand":{"command":"rewind" }}"#,
                player_message(LocalPlayerCommand::Rewind),
            ),
            (
                r#"{"messageType":"Player-Command","playerCommand":{"command":"play" }}"#,
                player_message(LocalPlayerCommand::Play),
            ),
            (
                r#"{"messageType":"Player-Command","playerCommand":{"command":"pause" }}"#,
                player_message(LocalPlayerCommand::Pause),
            ),
            (
                r#"{"messageType":"Player-Command","playerCommand":{"command":"previous"}}"#,
                player_message(LocalPlayerCommand::Previous),
            ),
            (
                r#"{"messageType":"Player-Command","playerCommand":{"command":"next"}}"#,
                player_message(LocalPlayerCommand::Next),
            ),
        ];

        for (payload, expected) in cases {
            let actual = translate(payload.as_bytes()).unwrap();
            assert_eq!(actual, expected, "payload: {payload}");
        }
    }

    #[test]
    fn test_text_message_passes_plain_message_through() {
        let payload = r#"{"messageType":"Text-Message","plainMessage":"Some text message" }"#;
        let actual = translate(payload.as_bytes()).unwrap();

        assert_eq!(
            actual,
            LocalDataMessage {
                message_type: LocalMessageType::TextMessage,
                player_command: None,
                plain_message: Some("Some text message".to_string()),
            }
        );
    }

    #[test]
    fn test_unknown_message_type_is_text() {
        let payload = r#"{"messageType":"Voice-Memo","plainMessage":"hi"}"#;
        let actual = translate(payload.as_bytes()).unwrap();
        assert_eq!(actual.message_type, LocalMessageType::TextMessage);
        assert_eq!(actual.plain_message.as_deref(), Some("hi"));
    }

    #[test]
    fn test_missing_message_type_is_text() {
        let payload = r#"{"plainMessage":"hi"}"#;
        let actual = translate(payload.as_bytes()).unwrap();
        assert_eq!(actual.message_type, LocalMessageType::TextMessage);
        assert_eq!(actual.player_command, None);
    }

    #[test]
    fn test_unknown_command_falls_back_to_fast_forward() {
        let payload = r#"{"messageType":"Player-Command","playerCommand":{"command":"launch"}}"#;
        let actual = translate(payload.as_bytes()).unwrap();
        assert_eq!(
            actual.player_command,
            Some(LocalPlayerCommand::FastForward)
        );
    }

    #[test]
    fn test_command_matching_is_case_insensitive() {
        assert_eq!(LocalPlayerCommand::parse("PLAY"), LocalPlayerCommand::Play);
        assert_eq!(LocalPlayerCommand::parse("Pause"), LocalPlayerCommand::Pause);
        assert_eq!(
            LocalPlayerCommand::parse("REWIND"),
            LocalPlayerCommand::Rewind
        );
        assert_eq!(
            LocalPlayerCommand::parse("Next"),
            LocalPlayerCommand::Next
        );
    }

    #[test]
    fn test_legacy_stop_maps_to_pause() {
        assert_eq!(LocalPlayerCommand::parse("stop"), LocalPlayerCommand::Pause);
    }

    #[test]
    fn test_player_command_without_nested_command() {
        let payload = r#"{"messageType":"Player-Command"}"#;
        let actual = translate(payload.as_bytes()).unwrap();
        assert_eq!(actual.message_type, LocalMessageType::PlayerCommand);
        assert_eq!(actual.player_command, None);
    }

    #[test]
    fn test_translation_is_idempotent() {
        let payload = br#"{"messageType":"Player-Command","playerCommand":{"command":"pause"}}"#;
        let first = translate(payload).unwrap();
        let second = translate(payload).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_malformed_json_is_a_parse_error() {
        let err = translate(b"{not json").unwrap_err();
        assert!(matches!(err, ParseError::Json(_)));
    }

    #[test]
    fn test_invalid_utf8_is_a_parse_error() {
        let err = translate(&[0xff, 0xfe, 0xfd]).unwrap_err();
        assert!(matches!(err, ParseError::Utf8(_)));
    }
}
