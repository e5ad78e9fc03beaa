//! Room lifecycle: create, join, kick, delete, reset.

use super::AppState;
use crate::error::RoomError;
use crate::types::{Phase, Player, Room, RoomCode, RoomStatus};

/// Bounded retry against code collisions. Past this we accept the
/// vanishingly small chance of reusing a live code rather than failing.
const CODE_ATTEMPTS: usize = 10;

impl AppState {
    /// Create a room with the caller as host and sole player.
    pub async fn create_room(
        &self,
        host_id: &str,
        host_name: &str,
    ) -> Result<RoomCode, RoomError> {
        let mut room_code = crate::code::generate();
        let mut attempts = 0;
        while attempts < CODE_ATTEMPTS {
            if !self.store.exists(&room_code).await {
                break;
            }
            room_code = crate::code::generate();
            attempts += 1;
        }

        let room = Room::new(host_id.to_string(), host_name);
        self.store.put(&room_code, room).await;
        tracing::info!("room {} created by host {}", room_code, host_id);
        Ok(room_code)
    }

    /// Join a waiting room. Rejoining under the same identity replaces the
    /// previous player entry.
    pub async fn join_room(
        &self,
        caller: &str,
        room_code: &str,
        player_name: &str,
    ) -> Result<Room, RoomError> {
        let room_code = Self::checked_code(room_code)?;
        let player_id = caller.to_string();
        let name = player_name.to_string();

        let room = self
            .mutate(&room_code, move |room| {
                if room.status != RoomStatus::Waiting {
                    return Err(RoomError::GameAlreadyStarted);
                }
                room.players.insert(player_id, Player::new(name));
                Ok(())
            })
            .await?;

        tracing::info!("player {} joined room {}", caller, room_code);
        Ok(room)
    }

    /// Remove a player from the room. Host only; the host cannot be kicked.
    /// Kicking the current round's target aborts the round so
    /// `current_player_id` always names a member.
    pub async fn kick_player(
        &self,
        caller: &str,
        room_code: &str,
        player_id: &str,
    ) -> Result<Room, RoomError> {
        let room_code = Self::checked_code(room_code)?;
        let caller = caller.to_string();
        let target = player_id.to_string();

        let room = self
            .mutate(&room_code, move |room| {
                if room.host_id != caller {
                    return Err(RoomError::PermissionDenied("only the host can kick players"));
                }
                if target == room.host_id {
                    return Err(RoomError::PermissionDenied("the host cannot be kicked"));
                }
                room.players.remove(&target);

                if room.current_player_id.as_deref() == Some(target.as_str()) {
                    room.current_player_id = None;
                    room.current_choice = None;
                    room.current_round = None;
                    if room.status == RoomStatus::Playing {
                        room.current_phase = Some(Phase::Drawing);
                    }
                } else if let Some(round) = &mut room.current_round {
                    round.submitted_by.remove(&target);
                }
                Ok(())
            })
            .await?;

        tracing::info!("player {} kicked from room {}", player_id, room_code);
        Ok(room)
    }

    /// Delete the entire room record. Host only.
    pub async fn delete_room(&self, caller: &str, room_code: &str) -> Result<(), RoomError> {
        let room_code = Self::checked_code(room_code)?;
        let room = self
            .store
            .get(&room_code)
            .await
            .ok_or(RoomError::RoomNotFound)?;
        if room.host_id != caller {
            return Err(RoomError::PermissionDenied("only the host can delete the room"));
        }

        self.store.remove(&room_code).await?;
        tracing::info!("room {} deleted", room_code);
        Ok(())
    }

    /// Return the room to the lobby: status back to waiting, round state
    /// cleared, every player's pools emptied. Membership survives.
    pub async fn reset_game(&self, caller: &str, room_code: &str) -> Result<Room, RoomError> {
        let room_code = Self::checked_code(room_code)?;
        let caller = caller.to_string();

        let room = self
            .mutate(&room_code, move |room| {
                if room.host_id != caller {
                    return Err(RoomError::PermissionDenied("only the host can reset the game"));
                }
                room.status = RoomStatus::Waiting;
                room.current_phase = None;
                room.current_player_id = None;
                room.current_choice = None;
                room.current_round = None;
                for player in room.players.values_mut() {
                    player.truth_pool.clear();
                    player.dare_pool.clear();
                }
                Ok(())
            })
            .await?;

        tracing::info!("room {} reset to lobby", room_code);
        Ok(room)
    }
}
