use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::PlayerId;

/// Lobby-level member of a room. Roster members exist before role assignment
/// and carry readiness/host flags rather than any in-game state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RosterPlayer {
    pub id: PlayerId,
    pub name: String,
    pub is_host: bool,
    pub is_ready: bool,
}
