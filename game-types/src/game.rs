use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use ts_rs::TS;
use uuid::Uuid;

/// Stable in-game identity. Generated fresh when a player joins a room (or a
/// local session is assembled) and never derived from a transport-level
/// connection identifier.
pub type PlayerId = Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Phase {
    Setup,
    RoleReveal,
    Round1,
    Round2,
    Voting,
    Result,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Role {
    Civilian,
    Impostor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Winner {
    Civilians,
    Impostor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// Per-game options chosen at room creation and preserved across resets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Settings {
    pub difficulty: Difficulty,
    pub impostor_hint_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Medium,
            impostor_hint_enabled: true,
        }
    }
}

/// A participant in one running session. Created at game start when roles
/// are assigned, destroyed on reset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GamePlayer {
    pub id: PlayerId,
    pub display_name: String,
    pub avatar: String,
    pub is_bot: bool,
    pub role: Role,
    pub clues: Vec<String>,
    pub voted_for: Option<PlayerId>,
}

/// Broadcastable snapshot of a session. Carries everything a client may see;
/// the secret word is deliberately absent (civilians receive it once through
/// their private RoleInfo payload).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SharedState {
    pub phase: Phase,
    pub current_round: u8,
    pub turn_index: usize,
    pub turn_order: Vec<PlayerId>,
    pub players: Vec<GamePlayer>,
    pub category: String,
    pub impostor_id: Option<PlayerId>,
    pub winner: Option<Winner>,
    pub vote_counts: HashMap<PlayerId, u32>,
    pub settings: Settings,
    pub show_role_reveal: bool,
    pub created_at: String, // ISO 8601 string
}

/// Private per-player payload delivered once at game start.
/// Civilians get the secret word; the impostor gets the category only when
/// the hint setting is enabled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RoleInfo {
    pub player_id: PlayerId,
    pub role: Role,
    pub secret_word: Option<String>,
    pub category: Option<String>,
}
