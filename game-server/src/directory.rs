use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

use game_core::{MIN_PLAYERS, Randomizer, Seat, Session, VoteOutcome, validate_clue};
use game_types::{
    Phase, PlayerId, Role, RoleInfo, RoomError, RosterPlayer, SessionError, Settings, SharedState,
};

/// Characters used in room codes. Visually confusable characters (0/O, 1/I/L)
/// are excluded so codes survive being read aloud or scribbled on a napkin.
pub const ROOM_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
pub const ROOM_CODE_LENGTH: usize = 6;

const PLAYER_AVATAR: &str = "👤";

fn generate_room_code(rng: &mut Randomizer) -> String {
    (0..ROOM_CODE_LENGTH)
        .map(|_| rng.pick(ROOM_CODE_ALPHABET).copied().unwrap_or(b'A') as char)
        .collect()
}

/// Codes are stored uppercase; accept whatever casing the client typed.
pub fn canonical_code(room_code: &str) -> String {
    room_code.trim().to_uppercase()
}

fn clean_name(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        "Player".to_string()
    } else {
        trimmed.to_string()
    }
}

#[derive(Debug)]
struct Room {
    code: String,
    host_id: PlayerId,
    roster: Vec<RosterPlayer>,
    session: Option<Session>,
    settings: Settings,
    created_at: DateTime<Utc>,
    /// Set by the sweep just before the room is dropped from the map, so a
    /// task that checked the room out earlier treats it as gone.
    closed: bool,
}

fn ensure_open(room: &Room) -> Result<(), RoomError> {
    if room.closed {
        Err(RoomError::RoomNotFound)
    } else {
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct CreatedRoom {
    pub room_code: String,
    pub player_id: PlayerId,
    pub roster: Vec<RosterPlayer>,
}

#[derive(Debug, Clone)]
pub struct JoinedRoom {
    pub room_code: String,
    pub player_id: PlayerId,
    pub roster: Vec<RosterPlayer>,
}

#[derive(Debug, Clone)]
pub struct StartedGame {
    pub state: SharedState,
    pub role_infos: Vec<RoleInfo>,
}

/// Roster and game state replayed to a reconnecting client.
#[derive(Debug, Clone)]
pub struct RoomStateView {
    pub roster: Vec<RosterPlayer>,
    pub state: Option<SharedState>,
}

/// What changed when a player left, so the caller knows what to broadcast.
#[derive(Debug, Clone)]
pub struct LeaveOutcome {
    pub room_code: String,
    pub roster: Vec<RosterPlayer>,
    pub new_host: Option<PlayerId>,
    pub session_abandoned: bool,
}

/// Process-wide map from room code to room. Each room is guarded by its own
/// mutex, so events for one room apply strictly in sequence while unrelated
/// rooms proceed in parallel.
pub struct RoomDirectory {
    rooms: DashMap<String, Arc<Mutex<Room>>>,
    randomizer: Mutex<Randomizer>,
    max_room_size: usize,
}

impl RoomDirectory {
    pub fn new(max_room_size: usize) -> Self {
        Self::with_randomizer(Randomizer::new(), max_room_size)
    }

    /// Directory with injected randomness, for deterministic tests.
    pub fn with_randomizer(randomizer: Randomizer, max_room_size: usize) -> Self {
        Self {
            rooms: DashMap::new(),
            randomizer: Mutex::new(randomizer),
            max_room_size,
        }
    }

    pub async fn create_room(&self, player_name: &str, settings: Settings) -> CreatedRoom {
        let host = RosterPlayer {
            id: Uuid::new_v4(),
            name: clean_name(player_name),
            is_host: true,
            is_ready: false,
        };

        loop {
            let code = {
                let mut rng = self.randomizer.lock().await;
                generate_room_code(&mut rng)
            };

            match self.rooms.entry(code.clone()) {
                Entry::Occupied(_) => continue,
                Entry::Vacant(vacant) => {
                    let room = Room {
                        code: code.clone(),
                        host_id: host.id,
                        roster: vec![host.clone()],
                        session: None,
                        settings,
                        created_at: Utc::now(),
                        closed: false,
                    };
                    vacant.insert(Arc::new(Mutex::new(room)));
                    info!("Created room {} hosted by {}", code, host.name);
                    return CreatedRoom {
                        room_code: code,
                        player_id: host.id,
                        roster: vec![host],
                    };
                }
            }
        }
    }

    pub async fn join_room(
        &self,
        room_code: &str,
        player_name: &str,
    ) -> Result<JoinedRoom, RoomError> {
        let room = self.lookup(room_code)?;
        let mut room = room.lock().await;
        ensure_open(&room)?;

        if room.session.is_some() {
            return Err(RoomError::GameInProgress);
        }
        if room.roster.len() >= self.max_room_size {
            return Err(RoomError::RoomFull);
        }

        let player = RosterPlayer {
            id: Uuid::new_v4(),
            name: clean_name(player_name),
            is_host: false,
            is_ready: false,
        };
        room.roster.push(player.clone());
        info!("{} joined room {}", player.name, room.code);

        Ok(JoinedRoom {
            room_code: room.code.clone(),
            player_id: player.id,
            roster: room.roster.clone(),
        })
    }

    pub async fn toggle_ready(
        &self,
        room_code: &str,
        player_id: PlayerId,
    ) -> Result<Vec<RosterPlayer>, RoomError> {
        let room = self.lookup(room_code)?;
        let mut room = room.lock().await;
        ensure_open(&room)?;

        let player = room
            .roster
            .iter_mut()
            .find(|p| p.id == player_id)
            .ok_or(SessionError::UnknownPlayer)?;
        player.is_ready = !player.is_ready;

        Ok(room.roster.clone())
    }

    /// Deal a new game for the room. Only the host may start, everyone must
    /// be ready and the roster must hold at least [`MIN_PLAYERS`]. Allowed
    /// again once a finished game sits in the `Result` phase, which is how
    /// "play again" works: the old session is replaced wholesale.
    pub async fn start_game(
        &self,
        room_code: &str,
        player_id: PlayerId,
    ) -> Result<StartedGame, RoomError> {
        let room = self.lookup(room_code)?;
        let mut room = room.lock().await;
        ensure_open(&room)?;

        if player_id != room.host_id {
            return Err(RoomError::NotHost);
        }
        if let Some(session) = &room.session {
            if session.phase() != &Phase::Result {
                return Err(RoomError::GameInProgress);
            }
        }
        if room.roster.len() < MIN_PLAYERS {
            return Err(SessionError::NotEnoughPlayers.into());
        }
        if !room.roster.iter().all(|p| p.is_ready) {
            return Err(RoomError::PlayersNotReady);
        }

        let seats: Vec<Seat> = room
            .roster
            .iter()
            .map(|p| Seat {
                id: p.id,
                name: p.name.clone(),
                avatar: PLAYER_AVATAR.to_string(),
                is_bot: false,
            })
            .collect();

        let mut session = Session::new(room.settings.clone());
        {
            let mut rng = self.randomizer.lock().await;
            session.start(seats, &mut rng)?;
        }

        let state = SharedState::from(&session);
        let role_infos = session.role_infos();
        room.session = Some(session);
        info!(
            "Started game in room {} with {} players",
            room.code,
            room.roster.len()
        );

        Ok(StartedGame { state, role_infos })
    }

    /// Validate and record a clue for the submitting player. The clue is
    /// checked against the secret word only when the submitter is a civilian,
    /// since the impostor does not know it.
    pub async fn submit_clue(
        &self,
        room_code: &str,
        player_id: PlayerId,
        clue: &str,
    ) -> Result<SharedState, RoomError> {
        let room = self.lookup(room_code)?;
        let mut room = room.lock().await;
        ensure_open(&room)?;

        let session = room.session.as_mut().ok_or(RoomError::NoActiveGame)?;
        let secret = session
            .player(player_id)
            .filter(|p| p.role == Role::Civilian)
            .map(|_| session.secret_word().to_string());
        let cleaned = validate_clue(clue, secret.as_deref())
            .map_err(|rejection| RoomError::InvalidClue(rejection.to_string()))?;

        session.submit_clue(player_id, &cleaned)?;
        Ok(SharedState::from(&*session))
    }

    pub async fn submit_vote(
        &self,
        room_code: &str,
        voter_id: PlayerId,
        target_id: PlayerId,
    ) -> Result<SharedState, RoomError> {
        let room = self.lookup(room_code)?;
        let mut room = room.lock().await;
        ensure_open(&room)?;

        let session = room.session.as_mut().ok_or(RoomError::NoActiveGame)?;
        let outcome = {
            let mut rng = self.randomizer.lock().await;
            session.submit_vote(voter_id, target_id, &mut rng)?
        };
        let state = SharedState::from(&*session);

        if let VoteOutcome::Resolved { eliminated, winner } = outcome {
            info!(
                "Room {} tally complete: eliminated {:?}, winner {:?}",
                room.code, eliminated, winner
            );
        }

        Ok(state)
    }

    pub async fn dismiss_role_reveal(&self, room_code: &str) -> Result<SharedState, RoomError> {
        let room = self.lookup(room_code)?;
        let mut room = room.lock().await;
        ensure_open(&room)?;

        let session = room.session.as_mut().ok_or(RoomError::NoActiveGame)?;
        session.dismiss_role_reveal();
        Ok(SharedState::from(&*session))
    }

    pub async fn room_state(&self, room_code: &str) -> Result<RoomStateView, RoomError> {
        let room = self.lookup(room_code)?;
        let room = room.lock().await;
        ensure_open(&room)?;

        Ok(RoomStateView {
            roster: room.roster.clone(),
            state: room.session.as_ref().map(SharedState::from),
        })
    }

    /// Drop a player from their room's roster. Promotes the first remaining
    /// member when the host left, and abandons an in-flight session once the
    /// roster falls below the player minimum. Returns `None` when the room or
    /// player is unknown, since a disconnect may race a sweep.
    pub async fn handle_leave(&self, room_code: &str, player_id: PlayerId) -> Option<LeaveOutcome> {
        let room = self.lookup(room_code).ok()?;
        let mut room = room.lock().await;
        if room.closed {
            return None;
        }
        let room = &mut *room;

        let position = room.roster.iter().position(|p| p.id == player_id)?;
        let departed = room.roster.remove(position);

        let mut new_host = None;
        if room.host_id == player_id {
            if let Some(next) = room.roster.first_mut() {
                next.is_host = true;
                room.host_id = next.id;
                new_host = Some(next.id);
            }
        }

        let mut session_abandoned = false;
        if room.session.is_some() && room.roster.len() < MIN_PLAYERS {
            room.session = None;
            session_abandoned = true;
        }

        info!("{} left room {}", departed.name, room.code);
        Some(LeaveOutcome {
            room_code: room.code.clone(),
            roster: room.roster.clone(),
            new_host,
            session_abandoned,
        })
    }

    /// Remove rooms whose roster has emptied out. Runs on a periodic sweep
    /// rather than at the moment the last player leaves, which tolerates a
    /// quick reconnect after a transport hiccup.
    pub async fn sweep_empty_rooms(&self) -> usize {
        let codes: Vec<String> = self.rooms.iter().map(|entry| entry.key().clone()).collect();

        let mut removed = 0;
        for code in codes {
            let Some(room) = self.rooms.get(&code).map(|entry| entry.value().clone()) else {
                continue;
            };
            let mut room = room.lock().await;
            if room.roster.is_empty() {
                room.closed = true;
                self.rooms.remove(&code);
                removed += 1;
                info!("Removed empty room {} (created {})", code, room.created_at);
            }
        }
        removed
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    fn lookup(&self, room_code: &str) -> Result<Arc<Mutex<Room>>, RoomError> {
        self.rooms
            .get(&canonical_code(room_code))
            .map(|entry| entry.value().clone())
            .ok_or(RoomError::RoomNotFound)
    }
}
