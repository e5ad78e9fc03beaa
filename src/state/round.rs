//! Round flow: start the game, draw a player, pick a category, close a
//! round.

use rand::Rng;

use super::AppState;
use crate::error::RoomError;
use crate::types::{Choice, CurrentRound, Phase, PlayerId, Room, RoomStatus};

impl AppState {
    /// Leave the lobby. Host only, needs at least two players.
    pub async fn start_game(&self, caller: &str, room_code: &str) -> Result<Room, RoomError> {
        let room_code = Self::checked_code(room_code)?;
        let caller = caller.to_string();

        let room = self
            .mutate(&room_code, move |room| {
                if room.host_id != caller {
                    return Err(RoomError::PermissionDenied("only the host can start the game"));
                }
                if room.status != RoomStatus::Waiting {
                    return Err(RoomError::GameAlreadyStarted);
                }
                if room.players.len() < 2 {
                    return Err(RoomError::InsufficientPlayers);
                }
                room.status = RoomStatus::Playing;
                room.current_phase = Some(Phase::Drawing);
                Ok(())
            })
            .await?;

        tracing::info!("room {} started with {} players", room_code, room.players.len());
        Ok(room)
    }

    /// Select a uniformly random player to be "it" and open a fresh round.
    /// Repeats across rounds are possible; there is no exclusion of the
    /// previously drawn player.
    pub async fn draw_player(&self, room_code: &str) -> Result<PlayerId, RoomError> {
        let room_code = Self::checked_code(room_code)?;

        let room = self
            .mutate(&room_code, move |room| {
                let ids = room.player_ids();
                if ids.is_empty() {
                    return Err(RoomError::InsufficientPlayers);
                }
                let index = rand::rng().random_range(0..ids.len());
                let selected = ids[index].clone();

                room.current_player_id = Some(selected.clone());
                room.current_phase = Some(Phase::Choosing);
                room.current_choice = None;
                room.current_round = Some(CurrentRound::new(selected));
                Ok(())
            })
            .await?;

        let drawn = room
            .current_player_id
            .clone()
            .ok_or(RoomError::NoActiveRound)?;
        tracing::info!("room {}: drew player {}", room_code, drawn);
        Ok(drawn)
    }

    /// The drawn player picks truth or dare; the collection pass begins.
    pub async fn make_choice(&self, room_code: &str, choice: Choice) -> Result<Room, RoomError> {
        let room_code = Self::checked_code(room_code)?;

        let room = self
            .mutate(&room_code, move |room| {
                let round = room.current_round.as_mut().ok_or(RoomError::NoActiveRound)?;
                round.submitted_by.clear();
                round.force_submit = false;
                room.current_choice = Some(choice);
                room.current_phase = Some(Phase::Submitting);
                Ok(())
            })
            .await?;

        tracing::info!("room {}: choice made {:?}", room_code, choice);
        Ok(room)
    }

    /// Close the active round and go back to drawing the next player.
    pub async fn finish_round(&self, room_code: &str) -> Result<Room, RoomError> {
        let room_code = Self::checked_code(room_code)?;

        let room = self
            .mutate(&room_code, move |room| {
                room.current_phase = Some(Phase::Drawing);
                room.current_player_id = None;
                room.current_choice = None;
                room.current_round = None;
                Ok(())
            })
            .await?;

        tracing::info!("room {}: round finished", room_code);
        Ok(room)
    }
}
