//! Storage abstraction for room records.
//!
//! The game logic only ever talks to a [`RoomStore`]: a keyed collection of
//! [`Room`] aggregates with change subscriptions. The bundled
//! implementation is [`MemoryStore`]; a remote backend would implement the
//! same trait.

mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::error::RoomError;
use crate::types::{Room, RoomCode};

/// Mutation applied to a room under the store's critical section. Returning
/// an error aborts the update without writing anything.
pub type UpdateFn = Box<dyn FnOnce(&mut Room) -> Result<(), RoomError> + Send>;

/// A live subscription to one room.
///
/// `snapshot` is the record at registration time (`None` is the distinct
/// "not found" signal, not an empty room). `rx` then yields the full record
/// after every change, and `None` once the room is deleted. Dropping the
/// receiver unsubscribes.
pub struct RoomSubscription {
    pub snapshot: Option<Room>,
    pub rx: broadcast::Receiver<Option<Room>>,
}

#[async_trait]
pub trait RoomStore: Send + Sync {
    /// Read the full record, or `None` if the code is unknown.
    async fn get(&self, code: &str) -> Option<Room>;

    /// Existence probe, used for code-collision retry on create.
    async fn exists(&self, code: &str) -> bool;

    /// Insert or replace the record and notify subscribers.
    async fn put(&self, code: &str, room: Room);

    /// Atomic read-modify-write: apply `f` under the store lock, bump the
    /// room version, notify subscribers, and return the updated record.
    /// Fails with [`RoomError::RoomNotFound`] if the code is unknown, or
    /// with whatever `f` returns — in which case nothing is written.
    async fn update(&self, code: &str, f: UpdateFn) -> Result<Room, RoomError>;

    /// Delete the record and notify subscribers with the not-found signal.
    async fn remove(&self, code: &str) -> Result<(), RoomError>;

    /// Codes of all rooms currently stored (for maintenance sweeps).
    async fn codes(&self) -> Vec<RoomCode>;

    /// Register an observer for one room code.
    async fn subscribe(&self, code: &str) -> RoomSubscription;
}
