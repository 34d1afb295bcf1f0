use async_trait::async_trait;
use game_types::{Difficulty, PlayerId, Role};

/// Everything an oracle needs to produce one clue for one bot.
#[derive(Debug, Clone)]
pub struct ClueRequest {
    pub role: Role,
    /// The secret word, present only for civilian bots.
    pub word: Option<String>,
    /// The category, present only when the impostor hint setting is on.
    pub category: Option<String>,
    /// All clues given so far in the session, in roster order.
    pub previous_clues: Vec<String>,
    /// The requesting bot's own earlier clues.
    pub own_clues: Vec<String>,
    pub difficulty: Difficulty,
}

/// Everything an oracle needs to cast one vote for one bot.
#[derive(Debug, Clone)]
pub struct VoteRequest {
    pub role: Role,
    /// The secret word, present only for civilian bots.
    pub word: Option<String>,
    pub players_clues: Vec<(PlayerId, Vec<String>)>,
    pub player_names: Vec<(PlayerId, String)>,
    pub self_id: PlayerId,
    pub difficulty: Difficulty,
}

/// Source of bot clues and votes.
///
/// Implementations typically wrap a remote language model. The driver treats
/// any error, and any reply that fails sanitization, as a signal to use the
/// local fallback tables instead, so implementations can fail freely.
#[async_trait]
pub trait ClueOracle: Send + Sync {
    async fn clue(&self, request: &ClueRequest) -> anyhow::Result<String>;
    async fn vote(&self, request: &VoteRequest) -> anyhow::Result<String>;
}

/// Oracle used when no remote model is configured. It refuses every request,
/// which routes all bot decisions through the fallback tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineOracle;

#[async_trait]
impl ClueOracle for OfflineOracle {
    async fn clue(&self, _request: &ClueRequest) -> anyhow::Result<String> {
        anyhow::bail!("no clue oracle configured")
    }

    async fn vote(&self, _request: &VoteRequest) -> anyhow::Result<String> {
        anyhow::bail!("no vote oracle configured")
    }
}
