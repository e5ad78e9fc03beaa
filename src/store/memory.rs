//! In-memory room store.
//!
//! Rooms live in a lock-guarded map; each room code with at least one
//! observer gets a broadcast channel that carries the full record after
//! every change. Because `update` applies the caller's closure while
//! holding the write lock, every mutation is a single critical section —
//! there is no read-then-write window between concurrent clients.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::{broadcast, Mutex, RwLock};

use super::{RoomStore, RoomSubscription, UpdateFn};
use crate::error::RoomError;
use crate::types::{Room, RoomCode};

/// Per-room channel capacity. A room only changes on user actions, so a
/// lagging subscriber this far behind has effectively disconnected.
const CHANNEL_CAPACITY: usize = 64;

#[derive(Default)]
pub struct MemoryStore {
    rooms: RwLock<HashMap<RoomCode, Room>>,
    watchers: Mutex<HashMap<RoomCode, broadcast::Sender<Option<Room>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fan the new snapshot out to subscribers, if any. Senders with no
    /// remaining receivers are pruned here.
    async fn notify(&self, code: &str, snapshot: Option<Room>) {
        let mut watchers = self.watchers.lock().await;
        if let Some(tx) = watchers.get(code) {
            if tx.send(snapshot).is_err() {
                watchers.remove(code);
            }
        }
    }
}

#[async_trait]
impl RoomStore for MemoryStore {
    async fn get(&self, code: &str) -> Option<Room> {
        self.rooms.read().await.get(code).cloned()
    }

    async fn exists(&self, code: &str) -> bool {
        self.rooms.read().await.contains_key(code)
    }

    async fn put(&self, code: &str, room: Room) {
        self.rooms
            .write()
            .await
            .insert(code.to_string(), room.clone());
        self.notify(code, Some(room)).await;
    }

    async fn update(&self, code: &str, f: UpdateFn) -> Result<Room, RoomError> {
        let updated = {
            let mut rooms = self.rooms.write().await;
            let room = rooms.get_mut(code).ok_or(RoomError::RoomNotFound)?;

            // Work on a copy so a failed guard leaves no partial state.
            let mut next = room.clone();
            f(&mut next)?;
            next.version = room.version + 1;
            *room = next.clone();
            next
        };

        self.notify(code, Some(updated.clone())).await;
        Ok(updated)
    }

    async fn remove(&self, code: &str) -> Result<(), RoomError> {
        let removed = self.rooms.write().await.remove(code);
        if removed.is_none() {
            return Err(RoomError::RoomNotFound);
        }
        self.notify(code, None).await;
        Ok(())
    }

    async fn codes(&self) -> Vec<RoomCode> {
        self.rooms.read().await.keys().cloned().collect()
    }

    async fn subscribe(&self, code: &str) -> RoomSubscription {
        // Take the watcher lock before reading the snapshot so no change
        // can slip between the snapshot and the subscription.
        let mut watchers = self.watchers.lock().await;

        // Channels whose receivers have all dropped only get noticed by
        // `notify` if their room ever changes; codes that never become
        // rooms would otherwise pin a sender forever.
        watchers.retain(|_, tx| tx.receiver_count() > 0);

        let tx = watchers
            .entry(code.to_string())
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0);
        let rx = tx.subscribe();
        let snapshot = self.rooms.read().await.get(code).cloned();

        RoomSubscription { snapshot, rx }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room() -> Room {
        Room::new("host".to_string(), "Alice")
    }

    #[tokio::test]
    async fn test_put_get_remove() {
        let store = MemoryStore::new();
        assert!(!store.exists("AAAAAA").await);

        store.put("AAAAAA", room()).await;
        assert!(store.exists("AAAAAA").await);
        assert_eq!(store.get("AAAAAA").await.unwrap().host_id, "host");

        store.remove("AAAAAA").await.unwrap();
        assert!(store.get("AAAAAA").await.is_none());
        assert_eq!(store.remove("AAAAAA").await, Err(RoomError::RoomNotFound));
    }

    #[tokio::test]
    async fn test_update_bumps_version() {
        let store = MemoryStore::new();
        store.put("AAAAAA", room()).await;

        let updated = store
            .update(
                "AAAAAA",
                Box::new(|r| {
                    r.current_phase = Some(crate::types::Phase::Drawing);
                    Ok(())
                }),
            )
            .await
            .unwrap();
        assert_eq!(updated.version, 2);
        assert_eq!(store.get("AAAAAA").await.unwrap().version, 2);
    }

    #[tokio::test]
    async fn test_failed_update_writes_nothing() {
        let store = MemoryStore::new();
        store.put("AAAAAA", room()).await;

        let err = store
            .update(
                "AAAAAA",
                Box::new(|r| {
                    r.current_phase = Some(crate::types::Phase::Drawing);
                    Err(RoomError::InsufficientPlayers)
                }),
            )
            .await
            .unwrap_err();
        assert_eq!(err, RoomError::InsufficientPlayers);

        let stored = store.get("AAAAAA").await.unwrap();
        assert_eq!(stored.version, 1);
        assert!(stored.current_phase.is_none());
    }

    #[tokio::test]
    async fn test_update_missing_room() {
        let store = MemoryStore::new();
        let err = store
            .update("ZZZZZZ", Box::new(|_| Ok(())))
            .await
            .unwrap_err();
        assert_eq!(err, RoomError::RoomNotFound);
    }

    #[tokio::test]
    async fn test_subscription_delivers_snapshot_and_changes() {
        let store = MemoryStore::new();
        store.put("AAAAAA", room()).await;

        let mut sub = store.subscribe("AAAAAA").await;
        assert!(sub.snapshot.is_some());

        store
            .update(
                "AAAAAA",
                Box::new(|r| {
                    r.status = crate::types::RoomStatus::Playing;
                    Ok(())
                }),
            )
            .await
            .unwrap();
        let change = sub.rx.recv().await.unwrap();
        assert_eq!(
            change.unwrap().status,
            crate::types::RoomStatus::Playing
        );

        store.remove("AAAAAA").await.unwrap();
        assert!(sub.rx.recv().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_dropped_watchers_are_pruned() {
        let store = MemoryStore::new();

        // Subscriptions to codes that never become rooms, all dropped.
        for code in ["AAAAAA", "BBBBBB", "CCCCCC"] {
            drop(store.subscribe(code).await);
        }
        assert_eq!(store.watchers.lock().await.len(), 3);

        // The next subscribe sweeps the dead senders.
        let live = store.subscribe("DDDDDD").await;
        assert_eq!(store.watchers.lock().await.len(), 1);
        drop(live);
    }

    #[tokio::test]
    async fn test_subscription_to_missing_room() {
        let store = MemoryStore::new();
        let mut sub = store.subscribe("ZZZZZZ").await;
        assert!(sub.snapshot.is_none());

        // Room created after registration is still delivered.
        store.put("ZZZZZZ", room()).await;
        assert!(sub.rx.recv().await.unwrap().is_some());
    }
}
