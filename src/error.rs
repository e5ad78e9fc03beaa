//! Error taxonomy for room operations.
//!
//! `Display` is the human-readable message shown to the user; `code()` is
//! the stable tag carried alongside it on the wire.

/// Errors that can occur while mutating or reading a room.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoomError {
    /// Session identity has not been established yet.
    #[error("not authenticated")]
    NotAuthenticated,

    /// The room code does not exist in the store.
    #[error("room not found")]
    RoomNotFound,

    /// Join attempted after the game left the lobby.
    #[error("the game has already started, you can no longer join")]
    GameAlreadyStarted,

    /// Caller lacks the role this operation requires.
    #[error("permission denied: {0}")]
    PermissionDenied(&'static str),

    /// Start attempted with fewer than two players.
    #[error("at least 2 players are required to start")]
    InsufficientPlayers,

    /// Choice value outside truth/dare.
    #[error("invalid choice, must be \"truth\" or \"dare\"")]
    InvalidChoice,

    /// Draw attempted against an empty pool.
    #[error("the question pool is empty")]
    EmptyPool,

    /// Malformed room code, rejected before any store call.
    #[error("invalid room code")]
    InvalidRoomCode,

    /// A submission-phase operation arrived with no round open.
    #[error("no round is in progress")]
    NoActiveRound,

    /// Skip attempted while a fresh submission is mandatory.
    #[error("a new question is required, skipping is disabled")]
    ForcedSubmission,
}

impl RoomError {
    /// Stable machine-readable tag for the wire protocol.
    pub fn code(&self) -> &'static str {
        match self {
            RoomError::NotAuthenticated => "NOT_AUTHENTICATED",
            RoomError::RoomNotFound => "ROOM_NOT_FOUND",
            RoomError::GameAlreadyStarted => "GAME_ALREADY_STARTED",
            RoomError::PermissionDenied(_) => "PERMISSION_DENIED",
            RoomError::InsufficientPlayers => "INSUFFICIENT_PLAYERS",
            RoomError::InvalidChoice => "INVALID_CHOICE",
            RoomError::EmptyPool => "EMPTY_POOL",
            RoomError::InvalidRoomCode => "INVALID_ROOM_CODE",
            RoomError::NoActiveRound => "NO_ACTIVE_ROUND",
            RoomError::ForcedSubmission => "FORCED_SUBMISSION",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_human_readable() {
        assert_eq!(RoomError::RoomNotFound.to_string(), "room not found");
        assert_eq!(
            RoomError::PermissionDenied("only the host can start the game").to_string(),
            "permission denied: only the host can start the game"
        );
    }

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(RoomError::EmptyPool.code(), "EMPTY_POOL");
        assert_eq!(RoomError::NotAuthenticated.code(), "NOT_AUTHENTICATED");
    }
}
