use std::collections::HashMap;

use chrono::Utc;
use game_types::{
    GamePlayer, Phase, PlayerId, Role, RoleInfo, SessionError, Settings, SharedState, Winner,
};
use tracing::debug;

use crate::randomizer::Randomizer;
use crate::words::draw_word;

/// Smallest roster a round can be played with.
pub const MIN_PLAYERS: usize = 3;

/// A participant handed to [`Session::start`]. Identity and presentation
/// only; the session assigns roles itself.
#[derive(Debug, Clone)]
pub struct Seat {
    pub id: PlayerId,
    pub name: String,
    pub avatar: String,
    pub is_bot: bool,
}

/// Where the turn machine landed after a clue was accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClueProgress {
    /// Same round, next player in the turn order.
    NextTurn,
    /// Round 1 finished, round 2 begins at the top of the order.
    RoundAdvanced,
    /// Round 2 finished, the session moved to voting.
    VotingStarted,
}

/// Result of recording a vote.
#[derive(Debug, Clone, PartialEq)]
pub enum VoteOutcome {
    /// Some players still have not voted.
    Pending,
    /// Everyone voted; the session tallied and moved to `Result`.
    Resolved {
        eliminated: Option<PlayerId>,
        winner: Winner,
    },
}

/// The authoritative state of one game of word-mole.
///
/// A session is created empty in the `Setup` phase, seeded with a roster via
/// [`Session::start`], then driven forward exclusively through
/// [`Session::dismiss_role_reveal`], [`Session::submit_clue`] and
/// [`Session::submit_vote`]. It holds the secret word; everything broadcast
/// to players goes through [`Session::snapshot`], which strips it.
#[derive(Debug, Clone)]
pub struct Session {
    phase: Phase,
    current_round: u8,
    turn_index: usize,
    turn_order: Vec<PlayerId>,
    players: Vec<GamePlayer>,
    secret_word: String,
    category: String,
    impostor_id: Option<PlayerId>,
    winner: Option<Winner>,
    vote_counts: HashMap<PlayerId, u32>,
    settings: Settings,
    show_role_reveal: bool,
    created_at: String,
}

impl Session {
    pub fn new(settings: Settings) -> Self {
        Self {
            phase: Phase::Setup,
            current_round: 1,
            turn_index: 0,
            turn_order: Vec::new(),
            players: Vec::new(),
            secret_word: String::new(),
            category: String::new(),
            impostor_id: None,
            winner: None,
            vote_counts: HashMap::new(),
            settings,
            show_role_reveal: false,
            created_at: Utc::now().to_rfc3339(),
        }
    }

    /// Deal a word, assign exactly one impostor and shuffle the turn order.
    ///
    /// Only valid from `Setup`. The impostor is drawn by shuffling seat
    /// indices and taking the first, so every seat is equally likely.
    pub fn start(&mut self, seats: Vec<Seat>, rng: &mut Randomizer) -> Result<(), SessionError> {
        if self.phase != Phase::Setup {
            return Err(SessionError::AlreadyStarted);
        }
        if seats.len() < MIN_PLAYERS {
            return Err(SessionError::NotEnoughPlayers);
        }

        let draw = draw_word(rng);

        let mut indices: Vec<usize> = (0..seats.len()).collect();
        rng.shuffle(&mut indices);
        let impostor_ix = indices[0];

        self.players = seats
            .iter()
            .enumerate()
            .map(|(ix, seat)| GamePlayer {
                id: seat.id,
                display_name: seat.name.clone(),
                avatar: seat.avatar.clone(),
                is_bot: seat.is_bot,
                role: if ix == impostor_ix {
                    Role::Impostor
                } else {
                    Role::Civilian
                },
                clues: Vec::new(),
                voted_for: None,
            })
            .collect();
        self.impostor_id = Some(seats[impostor_ix].id);

        let mut turn_order: Vec<PlayerId> = seats.iter().map(|s| s.id).collect();
        rng.shuffle(&mut turn_order);
        self.turn_order = turn_order;

        self.secret_word = draw.word.to_string();
        self.category = draw.category.to_string();
        self.phase = Phase::RoleReveal;
        self.current_round = 1;
        self.turn_index = 0;
        self.show_role_reveal = true;
        self.winner = None;
        self.vote_counts.clear();
        self.created_at = Utc::now().to_rfc3339();

        debug!(
            players = self.players.len(),
            category = %self.category,
            "session started"
        );
        Ok(())
    }

    /// Close the role reveal and open round 1. Returns whether anything
    /// changed, so callers can skip redundant broadcasts.
    pub fn dismiss_role_reveal(&mut self) -> bool {
        if self.phase == Phase::RoleReveal && self.show_role_reveal {
            self.show_role_reveal = false;
            self.phase = Phase::Round1;
            true
        } else {
            false
        }
    }

    /// Record a clue for the player whose turn it is and advance the turn
    /// machine. The clue is stored normalized (trimmed, lowercased).
    pub fn submit_clue(
        &mut self,
        player_id: PlayerId,
        clue: &str,
    ) -> Result<ClueProgress, SessionError> {
        if self.phase != Phase::Round1 && self.phase != Phase::Round2 {
            return Err(SessionError::NotCluePhase);
        }
        let current = self
            .turn_order
            .get(self.turn_index)
            .copied()
            .ok_or(SessionError::NotYourTurn)?;
        if current != player_id {
            return Err(SessionError::NotYourTurn);
        }
        let player = self
            .players
            .iter_mut()
            .find(|p| p.id == player_id)
            .ok_or(SessionError::UnknownPlayer)?;
        player.clues.push(crate::clue::normalize_clue(clue));

        self.turn_index += 1;
        if self.turn_index < self.turn_order.len() {
            return Ok(ClueProgress::NextTurn);
        }
        self.turn_index = 0;
        if self.current_round == 1 {
            self.current_round = 2;
            self.phase = Phase::Round2;
            Ok(ClueProgress::RoundAdvanced)
        } else {
            self.phase = Phase::Voting;
            Ok(ClueProgress::VotingStarted)
        }
    }

    /// Record (or overwrite) a vote. When the last outstanding vote lands,
    /// the tally runs: the most-voted player is eliminated, ties broken
    /// uniformly at random, and the winner is decided.
    pub fn submit_vote(
        &mut self,
        voter_id: PlayerId,
        target_id: PlayerId,
        rng: &mut Randomizer,
    ) -> Result<VoteOutcome, SessionError> {
        if self.phase != Phase::Voting {
            return Err(SessionError::NotVotingPhase);
        }
        let voter_ix = self
            .players
            .iter()
            .position(|p| p.id == voter_id)
            .ok_or(SessionError::UnknownPlayer)?;
        if !self.players.iter().any(|p| p.id == target_id) {
            return Err(SessionError::UnknownTarget);
        }
        self.players[voter_ix].voted_for = Some(target_id);

        if self.players.iter().any(|p| p.voted_for.is_none()) {
            return Ok(VoteOutcome::Pending);
        }
        let (eliminated, winner) = self.tally(rng);
        Ok(VoteOutcome::Resolved { eliminated, winner })
    }

    fn tally(&mut self, rng: &mut Randomizer) -> (Option<PlayerId>, Winner) {
        let mut counts: HashMap<PlayerId, u32> = HashMap::new();
        for player in &self.players {
            if let Some(target) = player.voted_for {
                *counts.entry(target).or_insert(0) += 1;
            }
        }

        let eliminated = counts.values().copied().max().and_then(|top| {
            let mut leaders: Vec<PlayerId> = counts
                .iter()
                .filter(|(_, count)| **count == top)
                .map(|(id, _)| *id)
                .collect();
            leaders.sort();
            rng.pick(&leaders).copied()
        });

        let winner = match eliminated {
            Some(id) if Some(id) == self.impostor_id => Winner::Civilians,
            _ => Winner::Impostor,
        };

        debug!(?eliminated, ?winner, "votes tallied");
        self.vote_counts = counts;
        self.winner = Some(winner.clone());
        self.phase = Phase::Result;
        (eliminated, winner)
    }

    /// Throw away the finished game but keep the table settings, returning
    /// the session to `Setup` for another round.
    pub fn reset(&mut self) {
        *self = Session::new(self.settings.clone());
    }

    /// Player-safe view of the session. Never contains the secret word.
    pub fn snapshot(&self) -> SharedState {
        SharedState::from(self)
    }

    /// Private role payloads, one per player.
    pub fn role_infos(&self) -> Vec<RoleInfo> {
        self.players
            .iter()
            .map(|p| self.role_info(p))
            .collect()
    }

    /// The private role payload for one player, if they are seated.
    pub fn role_info_for(&self, player_id: PlayerId) -> Option<RoleInfo> {
        self.players
            .iter()
            .find(|p| p.id == player_id)
            .map(|p| self.role_info(p))
    }

    fn role_info(&self, player: &GamePlayer) -> RoleInfo {
        let is_civilian = player.role == Role::Civilian;
        RoleInfo {
            player_id: player.id,
            role: player.role.clone(),
            secret_word: is_civilian.then(|| self.secret_word.clone()),
            // Civilians read the category from the shared snapshot; the
            // private payload carries it only as the impostor's hint.
            category: (!is_civilian && self.settings.impostor_hint_enabled)
                .then(|| self.category.clone()),
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn current_round(&self) -> u8 {
        self.current_round
    }

    pub fn turn_order(&self) -> &[PlayerId] {
        &self.turn_order
    }

    pub fn players(&self) -> &[GamePlayer] {
        &self.players
    }

    pub fn player(&self, player_id: PlayerId) -> Option<&GamePlayer> {
        self.players.iter().find(|p| p.id == player_id)
    }

    /// Whose turn it is, during the clue rounds.
    pub fn current_player(&self) -> Option<&GamePlayer> {
        self.turn_order
            .get(self.turn_index)
            .and_then(|id| self.players.iter().find(|p| p.id == *id))
    }

    pub fn secret_word(&self) -> &str {
        &self.secret_word
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn impostor_id(&self) -> Option<PlayerId> {
        self.impostor_id
    }

    pub fn winner(&self) -> Option<&Winner> {
        self.winner.as_ref()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn show_role_reveal(&self) -> bool {
        self.show_role_reveal
    }

    /// Every clue given so far, in roster order.
    pub fn all_clues(&self) -> Vec<String> {
        self.players
            .iter()
            .flat_map(|p| p.clues.iter().cloned())
            .collect()
    }
}

impl From<&Session> for SharedState {
    fn from(session: &Session) -> Self {
        SharedState {
            phase: session.phase.clone(),
            current_round: session.current_round,
            turn_index: session.turn_index,
            turn_order: session.turn_order.clone(),
            players: session.players.clone(),
            category: session.category.clone(),
            impostor_id: session.impostor_id,
            winner: session.winner.clone(),
            vote_counts: session.vote_counts.clone(),
            settings: session.settings.clone(),
            show_role_reveal: session.show_role_reveal,
            created_at: session.created_at.clone(),
        }
    }
}
