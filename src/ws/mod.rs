pub mod handlers;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::{sink::SinkExt, stream::StreamExt};
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::protocol::{ClientMessage, ServerMessage};
use crate::state::AppState;
use crate::types::{PlayerId, Room, RoomCode};

/// WebSocket upgrade handler
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn send_message(
    sender: &mut (impl SinkExt<Message> + Unpin),
    msg: &ServerMessage,
) -> Result<(), ()> {
    let json = serde_json::to_string(msg).map_err(|_| ())?;
    sender.send(Message::Text(json.into())).await.map_err(|_| ())
}

/// Handle one WebSocket connection: establish identity on `Hello`, stream
/// room snapshots while subscribed, dispatch mutations in between.
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();

    let welcome = ServerMessage::Welcome {
        protocol: "1.0".to_string(),
        server_now: chrono::Utc::now().to_rfc3339(),
    };
    if send_message(&mut sender, &welcome).await.is_err() {
        tracing::error!("Failed to send welcome message");
        return;
    }

    // Identity is established only by Hello; until then the connection can
    // watch rooms but not mutate them.
    let mut session: Option<PlayerId> = None;
    let mut watched: Option<(RoomCode, broadcast::Receiver<Option<Room>>)> = None;

    loop {
        tokio::select! {
            // Room change deliveries while subscribed
            change = async {
                match &mut watched {
                    Some((_, rx)) => Some(rx.recv().await),
                    None => std::future::pending().await,
                }
            } => {
                let Some(change) = change else { continue };
                match change {
                    Ok(snapshot) => {
                        let room_code = match &watched {
                            Some((code, _)) => code.clone(),
                            None => continue,
                        };
                        let msg = ServerMessage::RoomState { room_code, room: snapshot };
                        if send_message(&mut sender, &msg).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        // Resync from the store; intermediate snapshots are
                        // superseded anyway.
                        tracing::warn!("subscriber lagged by {} updates, resyncing", skipped);
                        if let Some((code, _)) = &watched {
                            let room = state.room(code).await;
                            let msg = ServerMessage::RoomState { room_code: code.clone(), room };
                            if send_message(&mut sender, &msg).await.is_err() {
                                break;
                            }
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        watched = None;
                    }
                }
            }

            // Client messages
            ws_msg = receiver.next() => {
                match ws_msg {
                    Some(Ok(Message::Text(text))) => {
                        let client_msg = match serde_json::from_str::<ClientMessage>(&text) {
                            Ok(msg) => msg,
                            Err(e) => {
                                tracing::debug!("Failed to parse client message: {}", e);
                                let error = ServerMessage::Error {
                                    code: "PARSE_ERROR".to_string(),
                                    msg: format!("invalid message format: {}", e),
                                };
                                if send_message(&mut sender, &error).await.is_err() {
                                    break;
                                }
                                continue;
                            }
                        };

                        match client_msg {
                            ClientMessage::Hello { session: supplied } => {
                                let id = crate::auth::establish(supplied.as_deref());
                                tracing::info!("session established: {}", id);
                                session = Some(id.clone());
                                let msg = ServerMessage::Session { session_id: id };
                                if send_message(&mut sender, &msg).await.is_err() {
                                    break;
                                }
                            }
                            ClientMessage::Subscribe { room_code } => {
                                let normalized = crate::code::normalize(&room_code);
                                if !crate::code::is_valid(&normalized) {
                                    let err = ServerMessage::from_error(
                                        &crate::error::RoomError::InvalidRoomCode,
                                    );
                                    if send_message(&mut sender, &err).await.is_err() {
                                        break;
                                    }
                                    continue;
                                }
                                let sub = state.store.subscribe(&normalized).await;
                                let initial = ServerMessage::RoomState {
                                    room_code: normalized.clone(),
                                    room: sub.snapshot,
                                };
                                watched = Some((normalized, sub.rx));
                                if send_message(&mut sender, &initial).await.is_err() {
                                    break;
                                }
                            }
                            ClientMessage::Unsubscribe => {
                                watched = None;
                            }
                            other => {
                                let reply = match &session {
                                    Some(caller) => {
                                        handlers::handle_message(other, caller, &state).await
                                    }
                                    None => Some(ServerMessage::from_error(
                                        &crate::error::RoomError::NotAuthenticated,
                                    )),
                                };
                                if let Some(reply) = reply {
                                    if send_message(&mut sender, &reply).await.is_err() {
                                        break;
                                    }
                                }
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) => {
                        tracing::debug!("WebSocket closed");
                        break;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if sender.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::debug!("WebSocket error: {}", e);
                        break;
                    }
                    None => break,
                }
            }
        }
    }

    tracing::debug!("WebSocket connection closed");
}
