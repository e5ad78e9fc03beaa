//! WebSocket message dispatch
//!
//! Connection-level messages (`Hello`, `Subscribe`, `Unsubscribe`) are
//! handled in the socket loop; everything that reaches here is a mutation
//! attributed to an established session identity.

use std::sync::Arc;

use crate::protocol::{ClientMessage, ServerMessage};
use crate::state::AppState;
use crate::types::PlayerId;

/// Handle a mutation message and return the reply to send.
pub async fn handle_message(
    msg: ClientMessage,
    caller: &PlayerId,
    state: &Arc<AppState>,
) -> Option<ServerMessage> {
    match msg {
        // Connection messages are consumed by the socket loop.
        ClientMessage::Hello { .. }
        | ClientMessage::Subscribe { .. }
        | ClientMessage::Unsubscribe => None,

        ClientMessage::CreateRoom { host_name } => {
            Some(match state.create_room(caller, &host_name).await {
                Ok(room_code) => ServerMessage::RoomCreated { room_code },
                Err(e) => ServerMessage::from_error(&e),
            })
        }

        ClientMessage::JoinRoom {
            room_code,
            player_name,
        } => Some(match state.join_room(caller, &room_code, &player_name).await {
            Ok(room) => ServerMessage::RoomState {
                room_code: crate::code::normalize(&room_code),
                room: Some(room),
            },
            Err(e) => ServerMessage::from_error(&e),
        }),

        ClientMessage::StartGame { room_code } => {
            Some(match state.start_game(caller, &room_code).await {
                Ok(room) => ServerMessage::RoomState {
                    room_code: crate::code::normalize(&room_code),
                    room: Some(room),
                },
                Err(e) => ServerMessage::from_error(&e),
            })
        }

        ClientMessage::DrawPlayer { room_code } => {
            Some(match state.draw_player(&room_code).await {
                Ok(player_id) => ServerMessage::PlayerDrawn { player_id },
                Err(e) => ServerMessage::from_error(&e),
            })
        }

        ClientMessage::MakeChoice { room_code, choice } => Some(match choice.parse() {
            Ok(choice) => match state.make_choice(&room_code, choice).await {
                Ok(room) => ServerMessage::RoomState {
                    room_code: crate::code::normalize(&room_code),
                    room: Some(room),
                },
                Err(e) => ServerMessage::from_error(&e),
            },
            Err(e) => ServerMessage::from_error(&e),
        }),

        ClientMessage::SubmitQuestion { room_code, content } => {
            Some(match state.submit_question(caller, &room_code, &content).await {
                Ok(room) => ServerMessage::RoomState {
                    room_code: crate::code::normalize(&room_code),
                    room: Some(room),
                },
                Err(e) => ServerMessage::from_error(&e),
            })
        }

        ClientMessage::SkipQuestion { room_code } => {
            Some(match state.skip_question(caller, &room_code).await {
                Ok(room) => ServerMessage::RoomState {
                    room_code: crate::code::normalize(&room_code),
                    room: Some(room),
                },
                Err(e) => ServerMessage::from_error(&e),
            })
        }

        ClientMessage::DrawQuestion { room_code } => {
            Some(match state.draw_question(&room_code).await {
                Ok(content) => ServerMessage::QuestionDrawn { content },
                Err(e) => ServerMessage::from_error(&e),
            })
        }

        ClientMessage::FinishRound { room_code } => {
            Some(match state.finish_round(&room_code).await {
                Ok(room) => ServerMessage::RoomState {
                    room_code: crate::code::normalize(&room_code),
                    room: Some(room),
                },
                Err(e) => ServerMessage::from_error(&e),
            })
        }

        ClientMessage::KickPlayer {
            room_code,
            player_id,
        } => Some(
            match state.kick_player(caller, &room_code, &player_id).await {
                Ok(room) => ServerMessage::RoomState {
                    room_code: crate::code::normalize(&room_code),
                    room: Some(room),
                },
                Err(e) => ServerMessage::from_error(&e),
            },
        ),

        ClientMessage::DeleteRoom { room_code } => {
            Some(match state.delete_room(caller, &room_code).await {
                Ok(()) => ServerMessage::RoomDeleted {
                    room_code: crate::code::normalize(&room_code),
                },
                Err(e) => ServerMessage::from_error(&e),
            })
        }

        ClientMessage::ResetGame { room_code } => {
            Some(match state.reset_game(caller, &room_code).await {
                Ok(room) => ServerMessage::RoomState {
                    room_code: crate::code::normalize(&room_code),
                    room: Some(room),
                },
                Err(e) => ServerMessage::from_error(&e),
            })
        }
    }
}
