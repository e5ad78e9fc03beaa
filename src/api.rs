//! HTTP endpoints: room lookup for the quick-join form and the
//! join-by-link redirect behind shared links and QR codes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::state::AppState;

#[derive(Debug, Clone, Serialize)]
pub struct RoomLookupResponse {
    /// Normalized form of the requested code.
    pub room_code: String,
    pub exists: bool,
}

/// Existence probe for a room code.
///
/// GET /api/rooms/{code}
///
/// Malformed codes are rejected before any store call.
pub async fn lookup_room(
    Path(code): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let normalized = crate::code::normalize(&code);
    if !crate::code::is_valid(&normalized) {
        let err = crate::error::RoomError::InvalidRoomCode;
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "code": err.code(), "msg": err.to_string() })),
        )
            .into_response();
    }

    let exists = state.store.exists(&normalized).await;
    Json(RoomLookupResponse {
        room_code: normalized,
        exists,
    })
    .into_response()
}

/// Join-by-link: a shared link or QR payload lands here and gets bounced
/// to the lobby page with the code pre-filled.
///
/// GET /r/{code}
pub async fn join_link(Path(code): Path<String>) -> Redirect {
    let normalized = crate::code::normalize(&code);
    if crate::code::is_valid(&normalized) {
        Redirect::temporary(&format!("/?code={}", normalized))
    } else {
        Redirect::temporary("/")
    }
}
