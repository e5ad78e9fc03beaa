mod question;
mod room;
mod round;

use std::sync::Arc;

use crate::error::RoomError;
use crate::store::{MemoryStore, RoomStore};
use crate::types::{Room, RoomCode};

/// Shared application state: the room store behind every operation.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RoomStore>,
}

impl AppState {
    pub fn new() -> Self {
        Self::with_store(Arc::new(MemoryStore::new()))
    }

    pub fn with_store(store: Arc<dyn RoomStore>) -> Self {
        Self { store }
    }

    /// Read the full record once, without subscribing.
    pub async fn room(&self, code: &str) -> Option<Room> {
        self.store.get(code).await
    }

    /// Normalize and validate a room code before it reaches the store.
    pub(crate) fn checked_code(code: &str) -> Result<RoomCode, RoomError> {
        let code = crate::code::normalize(code);
        if !crate::code::is_valid(&code) {
            return Err(RoomError::InvalidRoomCode);
        }
        Ok(code)
    }

    /// Apply one guarded mutation atomically against the store.
    pub(crate) async fn mutate<F>(&self, code: &RoomCode, f: F) -> Result<Room, RoomError>
    where
        F: FnOnce(&mut Room) -> Result<(), RoomError> + Send + 'static,
    {
        self.store.update(code, Box::new(f)).await
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
