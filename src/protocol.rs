use serde::{Deserialize, Serialize};

use crate::error::RoomError;
use crate::types::{PlayerId, Room, RoomCode};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Establish session identity. A previously issued session id is
    /// reused if still well-formed; otherwise a fresh one is granted.
    Hello { session: Option<String> },
    /// Start receiving snapshots of one room.
    Subscribe { room_code: String },
    /// Stop receiving snapshots.
    Unsubscribe,

    CreateRoom {
        host_name: String,
    },
    JoinRoom {
        room_code: String,
        player_name: String,
    },
    StartGame {
        room_code: String,
    },
    DrawPlayer {
        room_code: String,
    },
    MakeChoice {
        room_code: String,
        /// "truth" or "dare"; anything else is rejected before any store
        /// call.
        choice: String,
    },
    SubmitQuestion {
        room_code: String,
        content: String,
    },
    SkipQuestion {
        room_code: String,
    },
    DrawQuestion {
        room_code: String,
    },
    FinishRound {
        room_code: String,
    },
    KickPlayer {
        room_code: String,
        player_id: PlayerId,
    },
    DeleteRoom {
        room_code: String,
    },
    ResetGame {
        room_code: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum ServerMessage {
    Welcome {
        protocol: String,
        server_now: String,
    },
    Session {
        session_id: String,
    },
    RoomCreated {
        room_code: RoomCode,
    },
    /// Full snapshot of a room. `room: null` is the distinct not-found
    /// signal (unknown code, or the room was deleted).
    RoomState {
        room_code: RoomCode,
        room: Option<Room>,
    },
    PlayerDrawn {
        player_id: PlayerId,
    },
    QuestionDrawn {
        content: String,
    },
    RoomDeleted {
        room_code: RoomCode,
    },
    Error {
        code: String,
        msg: String,
    },
}

impl ServerMessage {
    pub fn from_error(err: &RoomError) -> Self {
        ServerMessage::Error {
            code: err.code().to_string(),
            msg: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_message_wire_shape() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"t":"join_room","room_code":"ABC234","player_name":"Bob"}"#)
                .unwrap();
        match msg {
            ClientMessage::JoinRoom {
                room_code,
                player_name,
            } => {
                assert_eq!(room_code, "ABC234");
                assert_eq!(player_name, "Bob");
            }
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn test_error_message_carries_code_and_text() {
        let msg = ServerMessage::from_error(&RoomError::RoomNotFound);
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["t"], "error");
        assert_eq!(json["code"], "ROOM_NOT_FOUND");
        assert_eq!(json["msg"], "room not found");
    }

    #[test]
    fn test_room_state_not_found_signal() {
        let msg = ServerMessage::RoomState {
            room_code: "ABC234".to_string(),
            room: None,
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert!(json["room"].is_null());
    }
}
