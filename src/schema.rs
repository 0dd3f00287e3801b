use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Opaque key naming one game session on the server.
pub type GameIdentifier = String;

/// Outcome reported while a game is still being played.
pub const OUTCOME_IN_PROGRESS: &str = "*";

/// Errors that can occur while talking to the game service
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered with a status outside `200..=299`.
    /// Whatever the body said is dropped.
    #[error("request failed with status {status}")]
    RequestFailed { status: u16 },

    #[error("invalid response body: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("invalid request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// No response at all, e.g. the network is down.
    #[error("transport error: {0}")]
    Transport(String),
}

pub type Result<T> = std::result::Result<T, ClientError>;

/// Whose move it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Turn {
    User,
    Machine,
}

/// Color requested when starting a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Color {
    #[serde(rename = "w")]
    White,
    #[serde(rename = "b")]
    Black,
}

impl Color {
    pub fn as_str(&self) -> &'static str {
        match self {
            Color::White => "w",
            Color::Black => "b",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown color {0:?}, expected w, white, b or black")]
pub struct ParseColorError(String);

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "w" | "white" => Ok(Color::White),
            "b" | "black" => Ok(Color::Black),
            _ => Err(ParseColorError(s.to_string())),
        }
    }
}

/// Snapshot of a game as served by `GET /api/games/{id}`.
///
/// The server leaves fields out depending on the phase of the game (e.g.
/// `ValidMoves` only while it is the user's turn), so every field is
/// optional and an absent field stays absent when re-serialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    #[serde(rename = "FEN", default, skip_serializing_if = "Option::is_none")]
    pub fen: Option<String>,
    #[serde(rename = "ValidMoves", default, skip_serializing_if = "Option::is_none")]
    pub valid_moves: Option<Vec<String>>,
    #[serde(rename = "Turn", default, skip_serializing_if = "Option::is_none")]
    pub turn: Option<Turn>,
    /// The user's color, as named by the server ("White", "Black").
    #[serde(rename = "Color", default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(rename = "Outcome", default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<String>,
    /// How the outcome was reached (checkmate, resignation, ...), as the
    /// server's numeric code.
    #[serde(rename = "Method", default, skip_serializing_if = "Option::is_none")]
    pub method: Option<u8>,
    /// Plain-text drawing of the position.
    #[serde(rename = "Board", default, skip_serializing_if = "Option::is_none")]
    pub board: Option<String>,
}

impl GameState {
    pub fn is_over(&self) -> bool {
        matches!(self.outcome.as_deref(), Some(outcome) if outcome != OUTCOME_IN_PROGRESS)
    }

    pub fn is_users_turn(&self) -> bool {
        self.turn == Some(Turn::User)
    }

    /// Legal moves starting on `square`, in the order the server sent them.
    pub fn legal_moves_from<'a>(&'a self, square: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.valid_moves
            .iter()
            .flatten()
            .map(String::as_str)
            .filter(move |m| m.starts_with(square))
    }
}

/// Body of `POST /api/games`. Omitted fields are left out of the JSON so the
/// server falls back to its defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StartGameRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fen: Option<String>,
}

/// Response of `POST /api/games`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameCreated {
    pub id: GameIdentifier,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn partial_state_keeps_only_present_fields() {
        let body = json!({ "FEN": "8/8/8/8/8/8/8/8 w - - 0 1", "Turn": "Machine" });
        let state: GameState = serde_json::from_value(body.clone()).unwrap();

        assert_eq!(state.fen.as_deref(), Some("8/8/8/8/8/8/8/8 w - - 0 1"));
        assert_eq!(state.turn, Some(Turn::Machine));
        assert_eq!(state.valid_moves, None);
        assert_eq!(state.color, None);
        assert_eq!(state.outcome, None);
        assert_eq!(serde_json::to_value(&state).unwrap(), body);
    }

    #[test]
    fn full_server_payload() {
        let body = r#"{
            "FEN": "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            "Outcome": "*",
            "Method": 0,
            "Board": "board",
            "Turn": "User",
            "Color": "White",
            "ValidMoves": ["e2e4", "e2e3", "g1f3"]
        }"#;
        let state: GameState = serde_json::from_str(body).unwrap();

        assert!(!state.is_over());
        assert!(state.is_users_turn());
        assert_eq!(state.color.as_deref(), Some("White"));
        assert_eq!(state.method, Some(0));
        assert_eq!(state.legal_moves_from("e2").collect::<Vec<_>>(), vec!["e2e4", "e2e3"]);
        assert_eq!(state.legal_moves_from("a2").count(), 0);
    }

    #[test]
    fn game_over_only_with_decisive_outcome() {
        let mut state = GameState::default();
        assert!(!state.is_over());

        state.outcome = Some("*".to_string());
        assert!(!state.is_over());

        state.outcome = Some("1-0".to_string());
        assert!(state.is_over());
    }

    #[test]
    fn start_request_omits_missing_fields() {
        let empty = serde_json::to_string(&StartGameRequest::default()).unwrap();
        assert_eq!(empty, "{}");

        let request = StartGameRequest {
            color: Some(Color::Black),
            fen: None,
        };
        assert_eq!(serde_json::to_string(&request).unwrap(), r#"{"color":"b"}"#);
    }

    #[test]
    fn color_from_str() {
        assert_eq!("w".parse::<Color>(), Ok(Color::White));
        assert_eq!("White".parse::<Color>(), Ok(Color::White));
        assert_eq!("BLACK".parse::<Color>(), Ok(Color::Black));
        assert!("red".parse::<Color>().is_err());
        assert_eq!(Color::Black.to_string(), "b");
    }
}
