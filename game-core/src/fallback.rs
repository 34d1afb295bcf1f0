use std::collections::HashSet;

use game_types::{GamePlayer, PlayerId, Role};

use crate::randomizer::Randomizer;

/// Clues that could work for many topics; the impostor's only pool.
pub const GENERIC_CLUES: &[&str] = &[
    "interesting",
    "unique",
    "special",
    "common",
    "popular",
    "famous",
    "typical",
    "classic",
    "normal",
    "different",
    "similar",
    "related",
    "connected",
    "important",
    "useful",
];

/// Returned when every fallback pool is exhausted.
pub const LAST_RESORT_CLUE: &str = "thing";

const CATEGORY_FALLBACKS: &[(&str, &[&str])] = &[
    ("Animals", &["creature", "wild", "nature", "living", "species"]),
    ("Food", &["delicious", "tasty", "meal", "eating", "cooking"]),
    ("Technology", &["digital", "modern", "electronic", "device", "smart"]),
    ("Places", &["location", "travel", "visit", "explore", "destination"]),
    ("Sports", &["active", "athletic", "competition", "game", "physical"]),
    ("Jobs", &["work", "professional", "career", "skilled", "occupation"]),
    ("Music", &["sound", "melody", "rhythm", "musical", "artistic"]),
    ("Movies", &["story", "character", "fiction", "entertainment", "dramatic"]),
    ("Objects", &["item", "tool", "useful", "handy", "physical"]),
    ("Nature", &["natural", "powerful", "weather", "phenomenon", "earth"]),
];

const WORD_ASSOCIATIONS: &[(&str, &[&str])] = &[
    ("elephant", &["trunk", "gray", "large", "memory", "safari"]),
    ("dolphin", &["ocean", "smart", "fin", "swim", "friendly"]),
    ("pizza", &["cheese", "round", "slice", "italian", "oven"]),
    ("robot", &["metal", "machine", "future", "automatic", "programmed"]),
    ("beach", &["sand", "waves", "sunny", "vacation", "coastal"]),
    ("doctor", &["health", "hospital", "medical", "healing", "stethoscope"]),
    ("guitar", &["strings", "music", "strum", "acoustic", "rock"]),
];

fn word_associations(word: &str) -> Option<&'static [&'static str]> {
    WORD_ASSOCIATIONS
        .iter()
        .find(|(w, _)| *w == word)
        .map(|(_, clues)| *clues)
}

fn category_fallbacks(category: &str) -> Option<&'static [&'static str]> {
    CATEGORY_FALLBACKS
        .iter()
        .find(|(c, _)| *c == category)
        .map(|(_, clues)| *clues)
}

fn pick_fresh(
    pool: &[&'static str],
    used: &HashSet<String>,
    secret: Option<&str>,
    rng: &mut Randomizer,
) -> Option<&'static str> {
    let available: Vec<&'static str> = pool
        .iter()
        .copied()
        .filter(|c| !used.contains(*c) && Some(*c) != secret)
        .collect();
    rng.pick(&available).copied()
}

/// Local stand-in for the oracle when it fails or returns garbage.
///
/// A civilian who knows the word tries its association list first, then the
/// category list, then the generic pool; the impostor only ever draws from
/// the generic pool. Clues already given in the session are excluded
/// (case-insensitive) and the secret word itself can never come back.
pub fn fallback_clue(
    role: &Role,
    word: Option<&str>,
    category: Option<&str>,
    previous_clues: &[String],
    rng: &mut Randomizer,
) -> String {
    let used: HashSet<String> = previous_clues.iter().map(|c| c.to_lowercase()).collect();
    let secret = word.map(|w| w.to_lowercase());
    let secret = secret.as_deref();

    if *role == Role::Civilian {
        if let Some(word) = secret {
            if let Some(pool) = word_associations(word) {
                if let Some(clue) = pick_fresh(pool, &used, secret, rng) {
                    return clue.to_string();
                }
            }
            if let Some(pool) = category.and_then(category_fallbacks) {
                if let Some(clue) = pick_fresh(pool, &used, secret, rng) {
                    return clue.to_string();
                }
            }
        }
    }

    if let Some(clue) = pick_fresh(GENERIC_CLUES, &used, secret, rng) {
        return clue.to_string();
    }

    LAST_RESORT_CLUE.to_string()
}

/// Uniform vote among all players other than the voter. Falls back to the
/// voter's own id only in the degenerate single-player-roster case.
pub fn fallback_vote(self_id: PlayerId, players: &[GamePlayer], rng: &mut Randomizer) -> PlayerId {
    let others: Vec<PlayerId> = players
        .iter()
        .map(|p| p.id)
        .filter(|id| *id != self_id)
        .collect();
    match rng.pick(&others) {
        Some(id) => *id,
        None => self_id,
    }
}

/// Match an oracle vote response against the other players' display names:
/// exact match (case-insensitive) first, then substring containment.
pub fn parse_vote_target(
    response: &str,
    self_id: PlayerId,
    players: &[GamePlayer],
) -> Option<PlayerId> {
    let cleaned = response.trim().to_uppercase();
    if cleaned.is_empty() {
        return None;
    }

    if let Some(exact) = players
        .iter()
        .filter(|p| p.id != self_id)
        .find(|p| p.display_name.to_uppercase() == cleaned)
    {
        return Some(exact.id);
    }

    players
        .iter()
        .filter(|p| p.id != self_id)
        .find(|p| cleaned.contains(&p.display_name.to_uppercase()))
        .map(|p| p.id)
}
