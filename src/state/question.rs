//! The collection pass: submitting and skipping prompts for the drawn
//! player, and drawing one from their pool.
//!
//! Completion is decided inside the same store update that records the
//! submission or skip, so two clients finishing the pass at the same time
//! cannot race each other into conflicting transitions.

use rand::Rng;

use super::AppState;
use crate::error::RoomError;
use crate::types::{EntryId, Phase, Question, Room};

/// If everyone but the target has responded, either move on to drawing a
/// question or, with nothing in the pool, demand a fresh mandatory pass.
/// Only a live collection pass can advance: a repeated skip arriving after
/// the question was drawn must not reopen a finished pass.
fn advance_if_complete(room: &mut Room) {
    if room.current_phase != Some(Phase::Submitting) {
        return;
    }
    if !room.all_submitted() {
        return;
    }
    if room.target_pool_len() > 0 {
        room.current_phase = Some(Phase::DrawingQuestion);
    } else if let Some(round) = room.current_round.as_mut() {
        round.submitted_by.clear();
        round.force_submit = true;
    }
}

impl AppState {
    /// Add a prompt to the target's pool for the active category and mark
    /// the caller as done for this pass.
    pub async fn submit_question(
        &self,
        caller: &str,
        room_code: &str,
        content: &str,
    ) -> Result<Room, RoomError> {
        let room_code = Self::checked_code(room_code)?;
        let caller = caller.to_string();
        let content = content.trim().to_string();

        let room = self
            .mutate(&room_code, move |room| {
                let choice = room.current_choice.ok_or(RoomError::NoActiveRound)?;
                let round = room.current_round.as_ref().ok_or(RoomError::NoActiveRound)?;
                let target = round.target_player_id.clone();

                if caller == target {
                    return Err(RoomError::PermissionDenied(
                        "the drawn player does not submit for themselves",
                    ));
                }
                if round.submitted_by.contains(&caller) {
                    return Err(RoomError::PermissionDenied("already submitted this round"));
                }

                let player = room
                    .players
                    .get_mut(&target)
                    .ok_or(RoomError::NoActiveRound)?;
                let entry_id = ulid::Ulid::new().to_string();
                player.pool_mut(choice).insert(entry_id, Question { content });

                if let Some(round) = room.current_round.as_mut() {
                    round.submitted_by.insert(caller);
                }
                advance_if_complete(room);
                Ok(())
            })
            .await?;

        tracing::debug!("room {}: question submitted", room_code);
        Ok(room)
    }

    /// Mark the caller as done without contributing a prompt. Disabled
    /// while a mandatory pass is in effect; repeating a skip is harmless.
    pub async fn skip_question(&self, caller: &str, room_code: &str) -> Result<Room, RoomError> {
        let room_code = Self::checked_code(room_code)?;
        let caller = caller.to_string();

        let room = self
            .mutate(&room_code, move |room| {
                let round = room.current_round.as_ref().ok_or(RoomError::NoActiveRound)?;
                if round.force_submit {
                    return Err(RoomError::ForcedSubmission);
                }
                if caller == round.target_player_id {
                    return Err(RoomError::PermissionDenied(
                        "the drawn player does not skip for themselves",
                    ));
                }

                if let Some(round) = room.current_round.as_mut() {
                    round.submitted_by.insert(caller);
                }
                advance_if_complete(room);
                Ok(())
            })
            .await?;

        tracing::debug!("room {}: question skipped", room_code);
        Ok(room)
    }

    /// Consume a uniformly random entry from the drawn player's pool and
    /// record it as the prompt to perform. Only permitted once the
    /// collection pass has completed.
    pub async fn draw_question(&self, room_code: &str) -> Result<String, RoomError> {
        let room_code = Self::checked_code(room_code)?;

        let room = self
            .mutate(&room_code, move |room| {
                if room.current_phase != Some(Phase::DrawingQuestion) {
                    return Err(RoomError::NoActiveRound);
                }
                let choice = room.current_choice.ok_or(RoomError::NoActiveRound)?;
                let target = room
                    .current_player_id
                    .clone()
                    .ok_or(RoomError::NoActiveRound)?;
                let player = room
                    .players
                    .get_mut(&target)
                    .ok_or(RoomError::NoActiveRound)?;

                let pool = player.pool_mut(choice);
                let keys: Vec<EntryId> = pool.keys().cloned().collect();
                if keys.is_empty() {
                    return Err(RoomError::EmptyPool);
                }
                let picked = &keys[rand::rng().random_range(0..keys.len())];
                let question = pool.remove(picked).ok_or(RoomError::EmptyPool)?;

                let round = room.current_round.as_mut().ok_or(RoomError::NoActiveRound)?;
                round.drawn_question = Some(question.content);
                room.current_phase = Some(Phase::Executing);
                Ok(())
            })
            .await?;

        let content = room
            .current_round
            .and_then(|r| r.drawn_question)
            .ok_or(RoomError::NoActiveRound)?;
        tracing::info!("room {}: question drawn", room_code);
        Ok(content)
    }
}
