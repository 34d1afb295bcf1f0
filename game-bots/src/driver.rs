use std::ops::RangeInclusive;
use std::sync::Arc;
use std::time::Duration;

use game_core::{
    fallback_clue, fallback_vote, parse_vote_target, sanitize_oracle_clue, validate_clue,
    ClueRejection, Randomizer, Seat, Session, VoteOutcome,
};
use game_types::{Phase, PlayerId, Role, RoleInfo, SessionError, Settings, SharedState};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::time::sleep;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::oracle::{ClueOracle, ClueRequest, VoteRequest};
use crate::roster::{BOT_SEATS, DEFAULT_HUMAN_NAME, HUMAN_AVATAR};

/// How long bots pretend to think, in milliseconds.
#[derive(Debug, Clone)]
pub struct BotPacing {
    pub clue_delay_ms: RangeInclusive<u64>,
    pub vote_delay_ms: RangeInclusive<u64>,
}

impl Default for BotPacing {
    fn default() -> Self {
        Self {
            clue_delay_ms: 1500..=4000,
            vote_delay_ms: 1000..=2500,
        }
    }
}

impl BotPacing {
    /// Zero delays, for tests.
    pub fn instant() -> Self {
        Self {
            clue_delay_ms: 0..=0,
            vote_delay_ms: 0..=0,
        }
    }
}

/// Pushed to the UI layer whenever the local game changes.
#[derive(Debug, Clone)]
pub enum LocalUpdate {
    /// A game just started. Carries the human's private role payload.
    Started {
        state: SharedState,
        role_info: RoleInfo,
    },
    StateChanged {
        state: SharedState,
    },
}

#[derive(Debug, Error)]
pub enum LocalGameError {
    #[error(transparent)]
    InvalidClue(#[from] ClueRejection),
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// A single-player table: one human plus the fixed bot lineup.
///
/// The driver owns the session and the randomizer. Bot turns run inside the
/// human-facing calls (`dismiss_role_reveal`, `submit_clue`, `submit_vote`),
/// one bot at a time with a randomized thinking delay before each action, so
/// bot clues and votes are strictly sequential. State changes stream out
/// through the update channel as they happen.
pub struct LocalGame {
    session: Session,
    oracle: Arc<dyn ClueOracle>,
    randomizer: Randomizer,
    pacing: BotPacing,
    human_id: PlayerId,
    human_name: String,
    updates: mpsc::UnboundedSender<LocalUpdate>,
}

impl LocalGame {
    pub fn new(
        human_name: &str,
        settings: Settings,
        oracle: Arc<dyn ClueOracle>,
        pacing: BotPacing,
    ) -> (Self, mpsc::UnboundedReceiver<LocalUpdate>) {
        let (updates, receiver) = mpsc::unbounded_channel();
        let trimmed = human_name.trim();
        let human_name = if trimmed.is_empty() {
            DEFAULT_HUMAN_NAME.to_string()
        } else {
            trimmed.to_string()
        };
        let game = Self {
            session: Session::new(settings),
            oracle,
            randomizer: Randomizer::new(),
            pacing,
            human_id: Uuid::new_v4(),
            human_name,
            updates,
        };
        (game, receiver)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn human_id(&self) -> PlayerId {
        self.human_id
    }

    /// Seat the human and the bot lineup and deal a new game. The human keeps
    /// their id across games; bots get fresh ids every time.
    pub fn start(&mut self) -> Result<(), SessionError> {
        let mut seats = vec![Seat {
            id: self.human_id,
            name: self.human_name.clone(),
            avatar: HUMAN_AVATAR.to_string(),
            is_bot: false,
        }];
        seats.extend(BOT_SEATS.iter().map(|bot| Seat {
            id: Uuid::new_v4(),
            name: bot.name.to_string(),
            avatar: bot.avatar.to_string(),
            is_bot: true,
        }));
        self.session.start(seats, &mut self.randomizer)?;

        if let Some(role_info) = self.session.role_info_for(self.human_id) {
            let _ = self.updates.send(LocalUpdate::Started {
                state: self.session.snapshot(),
                role_info,
            });
        }
        Ok(())
    }

    /// Reset the finished game and deal the next one.
    pub fn play_again(&mut self) -> Result<(), SessionError> {
        self.session.reset();
        self.start()
    }

    /// Close the role reveal, then let bots play until it is the human's
    /// turn again (or the session has moved on to voting).
    pub async fn dismiss_role_reveal(&mut self) {
        if self.session.dismiss_role_reveal() {
            self.emit_state();
            self.run_bots().await;
        }
    }

    /// Validate and submit the human's clue, then let bots play.
    pub async fn submit_clue(&mut self, clue: &str) -> Result<(), LocalGameError> {
        let secret = self
            .session
            .player(self.human_id)
            .filter(|p| p.role == Role::Civilian)
            .map(|_| self.session.secret_word().to_string());
        let clean = validate_clue(clue, secret.as_deref())?;
        self.session.submit_clue(self.human_id, &clean)?;
        self.emit_state();
        self.run_bots().await;
        Ok(())
    }

    /// Record the human's vote. Normally the bots have already voted by the
    /// time this is called, so this resolves the game.
    pub async fn submit_vote(&mut self, target_id: PlayerId) -> Result<(), LocalGameError> {
        let outcome = self
            .session
            .submit_vote(self.human_id, target_id, &mut self.randomizer)?;
        self.emit_state();
        if outcome == VoteOutcome::Pending && *self.session.phase() == Phase::Voting {
            self.run_bot_votes().await;
        }
        Ok(())
    }

    async fn run_bots(&mut self) {
        while let Some(bot_id) = self.next_bot_clue_turn() {
            self.think(self.pacing.clue_delay_ms.clone()).await;
            let Some(request) = self.clue_request_for(bot_id) else {
                break;
            };
            let clue = self.bot_clue(&request).await;
            if let Err(err) = self.session.submit_clue(bot_id, &clue) {
                warn!(%bot_id, %err, "bot clue rejected");
                break;
            }
            self.emit_state();
        }
        if *self.session.phase() == Phase::Voting {
            self.run_bot_votes().await;
        }
    }

    async fn run_bot_votes(&mut self) {
        let pending: Vec<PlayerId> = self
            .session
            .players()
            .iter()
            .filter(|p| p.is_bot && p.voted_for.is_none())
            .map(|p| p.id)
            .collect();

        for bot_id in pending {
            if *self.session.phase() != Phase::Voting {
                break;
            }
            self.think(self.pacing.vote_delay_ms.clone()).await;
            let Some(request) = self.vote_request_for(bot_id) else {
                continue;
            };
            let target = self.bot_vote(bot_id, &request).await;
            match self.session.submit_vote(bot_id, target, &mut self.randomizer) {
                Ok(_) => self.emit_state(),
                Err(err) => warn!(%bot_id, %err, "bot vote rejected"),
            }
        }
    }

    fn next_bot_clue_turn(&self) -> Option<PlayerId> {
        match self.session.phase() {
            Phase::Round1 | Phase::Round2 => self
                .session
                .current_player()
                .filter(|p| p.is_bot)
                .map(|p| p.id),
            _ => None,
        }
    }

    async fn bot_clue(&mut self, request: &ClueRequest) -> String {
        match self.oracle.clue(request).await {
            Ok(raw) => {
                if let Some(clue) = sanitize_oracle_clue(&raw, request.word.as_deref()) {
                    let repeat = request
                        .previous_clues
                        .iter()
                        .any(|c| c.eq_ignore_ascii_case(&clue));
                    if !repeat {
                        return clue;
                    }
                }
                warn!("oracle clue unusable, using local fallback");
            }
            Err(err) => {
                debug!(%err, "oracle clue failed, using local fallback");
            }
        }
        fallback_clue(
            &request.role,
            request.word.as_deref(),
            request.category.as_deref(),
            &request.previous_clues,
            &mut self.randomizer,
        )
    }

    async fn bot_vote(&mut self, bot_id: PlayerId, request: &VoteRequest) -> PlayerId {
        match self.oracle.vote(request).await {
            Ok(raw) => {
                if let Some(target) = parse_vote_target(&raw, bot_id, self.session.players()) {
                    return target;
                }
                warn!("oracle vote unusable, using local fallback");
            }
            Err(err) => {
                debug!(%err, "oracle vote failed, using local fallback");
            }
        }
        fallback_vote(bot_id, self.session.players(), &mut self.randomizer)
    }

    fn clue_request_for(&self, bot_id: PlayerId) -> Option<ClueRequest> {
        let player = self.session.player(bot_id)?;
        let word =
            (player.role == Role::Civilian).then(|| self.session.secret_word().to_string());
        let category = self
            .session
            .settings()
            .impostor_hint_enabled
            .then(|| self.session.category().to_string());
        Some(ClueRequest {
            role: player.role.clone(),
            word,
            category,
            previous_clues: self.session.all_clues(),
            own_clues: player.clues.clone(),
            difficulty: self.session.settings().difficulty.clone(),
        })
    }

    fn vote_request_for(&self, bot_id: PlayerId) -> Option<VoteRequest> {
        let player = self.session.player(bot_id)?;
        let word = (player.role == Role::Civilian).then(|| self.session.secret_word().to_string());
        Some(VoteRequest {
            role: player.role.clone(),
            word,
            players_clues: self
                .session
                .players()
                .iter()
                .map(|p| (p.id, p.clues.clone()))
                .collect(),
            player_names: self
                .session
                .players()
                .iter()
                .map(|p| (p.id, p.display_name.clone()))
                .collect(),
            self_id: bot_id,
            difficulty: self.session.settings().difficulty.clone(),
        })
    }

    async fn think(&mut self, delay_ms: RangeInclusive<u64>) {
        let ms = self.randomizer.pick_range(delay_ms);
        if ms > 0 {
            sleep(Duration::from_millis(ms)).await;
        }
    }

    fn emit_state(&self) {
        let _ = self.updates.send(LocalUpdate::StateChanged {
            state: self.session.snapshot(),
        });
    }
}
