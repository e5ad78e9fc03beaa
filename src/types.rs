use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use crate::error::RoomError;

/// Identifier aliases used throughout the room model
pub type RoomCode = String;
pub type PlayerId = String;
pub type EntryId = String;

/// Room lifecycle: `waiting` until the host starts, `playing` until reset.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    Waiting,
    Playing,
}

/// Step of the active round. `None` on the room means "no round machinery
/// running" (lobby, or freshly reset).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    Drawing,
    Choosing,
    Submitting,
    DrawingQuestion,
    Executing,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Choice {
    Truth,
    Dare,
}

impl FromStr for Choice {
    type Err = RoomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "truth" => Ok(Choice::Truth),
            "dare" => Ok(Choice::Dare),
            _ => Err(RoomError::InvalidChoice),
        }
    }
}

/// A prompt sitting in a player's pool, waiting to be drawn.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Question {
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub name: String,
    pub joined_at: DateTime<Utc>,
    /// Prompts other players submitted for this player, keyed by entry id.
    /// Entries exist only between submission and being drawn.
    #[serde(default)]
    pub truth_pool: BTreeMap<EntryId, Question>,
    #[serde(default)]
    pub dare_pool: BTreeMap<EntryId, Question>,
}

impl Player {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            joined_at: Utc::now(),
            truth_pool: BTreeMap::new(),
            dare_pool: BTreeMap::new(),
        }
    }

    pub fn pool(&self, choice: Choice) -> &BTreeMap<EntryId, Question> {
        match choice {
            Choice::Truth => &self.truth_pool,
            Choice::Dare => &self.dare_pool,
        }
    }

    pub fn pool_mut(&mut self, choice: Choice) -> &mut BTreeMap<EntryId, Question> {
        match choice {
            Choice::Truth => &mut self.truth_pool,
            Choice::Dare => &mut self.dare_pool,
        }
    }
}

/// State of the round in flight: who is "it", who has already responded,
/// and the prompt once one has been drawn.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentRound {
    pub target_player_id: PlayerId,
    /// Players who have submitted or skipped this collection pass.
    /// Never contains `target_player_id`.
    #[serde(default)]
    pub submitted_by: BTreeSet<PlayerId>,
    /// Set when the target's pool came up empty after everyone responded;
    /// while it holds, skipping is disabled and a fresh submission is
    /// required from each player.
    #[serde(default)]
    pub force_submit: bool,
    pub drawn_question: Option<String>,
}

impl CurrentRound {
    pub fn new(target_player_id: PlayerId) -> Self {
        Self {
            target_player_id,
            submitted_by: BTreeSet::new(),
            force_submit: false,
            drawn_question: None,
        }
    }
}

/// The aggregate root: one game session, keyed by its room code.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub host_id: PlayerId,
    /// Monotonic sequence, bumped by the store on every mutation.
    pub version: u64,
    pub status: RoomStatus,
    pub current_phase: Option<Phase>,
    pub current_player_id: Option<PlayerId>,
    pub current_choice: Option<Choice>,
    pub current_round: Option<CurrentRound>,
    pub players: BTreeMap<PlayerId, Player>,
    pub created_at: DateTime<Utc>,
}

impl Room {
    /// A fresh room in the lobby with the host as its only player.
    pub fn new(host_id: PlayerId, host_name: impl Into<String>) -> Self {
        let mut players = BTreeMap::new();
        players.insert(host_id.clone(), Player::new(host_name));
        Self {
            host_id,
            version: 1,
            status: RoomStatus::Waiting,
            current_phase: None,
            current_player_id: None,
            current_choice: None,
            current_round: None,
            players,
            created_at: Utc::now(),
        }
    }

    pub fn player_ids(&self) -> Vec<PlayerId> {
        self.players.keys().cloned().collect()
    }

    /// True iff every player except the round's target has submitted or
    /// skipped. False when no round is open.
    pub fn all_submitted(&self) -> bool {
        let Some(round) = &self.current_round else {
            return false;
        };
        self.players
            .keys()
            .filter(|id| **id != round.target_player_id)
            .all(|id| round.submitted_by.contains(id))
    }

    /// Size of the target's pool for the active choice. Zero when no round
    /// or no choice is active.
    pub fn target_pool_len(&self) -> usize {
        let (Some(round), Some(choice)) = (&self.current_round, self.current_choice) else {
            return 0;
        };
        self.players
            .get(&round.target_player_id)
            .map(|p| p.pool(choice).len())
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_choice_from_str() {
        assert_eq!("truth".parse::<Choice>().unwrap(), Choice::Truth);
        assert_eq!("dare".parse::<Choice>().unwrap(), Choice::Dare);
        assert!("double-dare".parse::<Choice>().is_err());
        assert!("TRUTH".parse::<Choice>().is_err());
    }

    #[test]
    fn test_new_room_shape() {
        let room = Room::new("host".to_string(), "Alice");
        assert_eq!(room.status, RoomStatus::Waiting);
        assert_eq!(room.version, 1);
        assert!(room.current_phase.is_none());
        assert!(room.current_round.is_none());
        assert_eq!(room.player_ids(), vec!["host".to_string()]);
        assert_eq!(room.players["host"].name, "Alice");
    }

    #[test]
    fn test_all_submitted_ignores_target() {
        let mut room = Room::new("a".to_string(), "Alice");
        room.players.insert("b".to_string(), Player::new("Bob"));
        room.players.insert("c".to_string(), Player::new("Carol"));

        let mut round = CurrentRound::new("b".to_string());
        round.submitted_by.insert("a".to_string());
        room.current_round = Some(round);
        assert!(!room.all_submitted());

        room.current_round
            .as_mut()
            .unwrap()
            .submitted_by
            .insert("c".to_string());
        assert!(room.all_submitted());
    }

    #[test]
    fn test_all_submitted_without_round() {
        let room = Room::new("a".to_string(), "Alice");
        assert!(!room.all_submitted());
    }

    #[test]
    fn test_wire_format_field_names() {
        let room = Room::new("host".to_string(), "Alice");
        let json = serde_json::to_value(&room).unwrap();
        assert!(json.get("hostId").is_some());
        assert!(json.get("currentPhase").is_some());
        assert!(json.get("createdAt").is_some());
        assert_eq!(json["status"], "waiting");

        let phase = serde_json::to_value(Phase::DrawingQuestion).unwrap();
        assert_eq!(phase, "drawingQuestion");
        let choice = serde_json::to_value(Choice::Dare).unwrap();
        assert_eq!(choice, "dare");
    }
}
