use game_core::{ClueProgress, Randomizer, Seat, Session};
use game_types::{PlayerId, Settings};
use uuid::Uuid;

/// Creates a test seat with a fixed avatar
pub fn create_test_seat(name: &str) -> Seat {
    Seat {
        id: Uuid::new_v4(),
        name: name.to_string(),
        avatar: "🙂".to_string(),
        is_bot: false,
    }
}

/// Creates a roster of n named seats
pub fn create_test_seats(count: usize) -> Vec<Seat> {
    (0..count)
        .map(|i| create_test_seat(&format!("Player{}", i + 1)))
        .collect()
}

/// Starts a session with a seeded randomizer for reproducible runs
pub fn start_test_session(count: usize, seed: u64) -> (Session, Randomizer) {
    let mut rng = Randomizer::seeded(seed);
    let mut session = Session::new(Settings::default());
    session
        .start(create_test_seats(count), &mut rng)
        .expect("session should start");
    (session, rng)
}

/// Submits one clue for whoever's turn it is and returns the progress
pub fn submit_current_clue(session: &mut Session, clue: &str) -> ClueProgress {
    let current = session
        .current_player()
        .expect("a clue phase must have a current player")
        .id;
    session
        .submit_clue(current, clue)
        .expect("in-turn clue should be accepted")
}

/// Plays a whole clue round with numbered clues
pub fn play_clue_round(session: &mut Session, prefix: &str) {
    for i in 0..session.players().len() {
        submit_current_clue(session, &format!("{}{}", prefix, i));
    }
}

/// Player ids in roster order
pub fn roster_ids(session: &Session) -> Vec<PlayerId> {
    session.players().iter().map(|p| p.id).collect()
}
