use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::ops::RangeInclusive;

/// The single source of randomness for the whole game: role assignment, turn
/// order, word draws, vote tie-breaks, fallback clue picks, room codes and
/// bot pacing all draw from one of these.
///
/// Wraps a seedable CSPRNG so production can seed from OS entropy while
/// tests inject a fixed seed and replay identical decisions.
#[derive(Debug, Clone)]
pub struct Randomizer {
    rng: StdRng,
}

impl Randomizer {
    /// A randomizer seeded from operating-system entropy.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// A deterministic randomizer for tests and replays.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Fisher-Yates shuffle: walks from the last index down to 1 and swaps
    /// each position with a uniformly chosen earlier-or-equal position, so
    /// every permutation is equally likely.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.rng.random_range(0..=i);
            items.swap(i, j);
        }
    }

    /// Uniform pick of one element. Returns None on an empty slice.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            None
        } else {
            Some(&items[self.rng.random_range(0..items.len())])
        }
    }

    /// Uniform index into a collection of the given length.
    pub fn pick_index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            None
        } else {
            Some(self.rng.random_range(0..len))
        }
    }

    /// Uniform value in an inclusive range, used for bot thinking delays.
    pub fn pick_range(&mut self, range: RangeInclusive<u64>) -> u64 {
        self.rng.random_range(range)
    }
}

impl Default for Randomizer {
    fn default() -> Self {
        Self::new()
    }
}
