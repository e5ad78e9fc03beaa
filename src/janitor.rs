//! Background sweep of abandoned rooms.

use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

use crate::state::AppState;

const SWEEP_INTERVAL: std::time::Duration = std::time::Duration::from_secs(600);

/// Delete every room created before `cutoff`. Returns how many were
/// removed. Deletion notifies subscribers with the not-found signal, so a
/// client idling in a dead lobby sees it disappear.
pub async fn sweep(state: &AppState, cutoff: DateTime<Utc>) -> usize {
    let mut removed = 0;
    for code in state.store.codes().await {
        let Some(room) = state.store.get(&code).await else {
            continue;
        };
        if room.created_at < cutoff && state.store.remove(&code).await.is_ok() {
            tracing::info!("janitor: removed stale room {}", code);
            removed += 1;
        }
    }
    removed
}

/// Spawn a background task that periodically sweeps rooms older than the
/// configured TTL.
pub fn spawn_room_janitor(state: Arc<AppState>, ttl_hours: u64) {
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(SWEEP_INTERVAL).await;
            let cutoff = Utc::now() - Duration::hours(ttl_hours as i64);
            sweep(&state, cutoff).await;
        }
    });
}
