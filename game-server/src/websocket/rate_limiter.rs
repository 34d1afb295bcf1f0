use std::time::{Duration, Instant};

/// Token bucket guarding one connection. Lobby actions like ready-toggling
/// arrive in bursts, so the bucket starts full; sustained spam drains it and
/// further messages are dropped until tokens trickle back.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    tokens: u32,
    capacity: u32,
    refill_every: Duration,
    last_refill: Instant,
}

impl RateLimiter {
    pub fn new() -> Self {
        // One token per second, bursts of up to 20.
        Self::with_limits(20, Duration::from_secs(1))
    }

    pub fn with_limits(capacity: u32, refill_every: Duration) -> Self {
        Self {
            tokens: capacity,
            capacity,
            refill_every,
            last_refill: Instant::now(),
        }
    }

    /// Spend one token if available.
    pub fn allow(&mut self) -> bool {
        self.refill();

        if self.tokens > 0 {
            self.tokens -= 1;
            true
        } else {
            false
        }
    }

    fn refill(&mut self) {
        let elapsed = self.last_refill.elapsed();
        let periods = (elapsed.as_millis() / self.refill_every.as_millis().max(1)) as u32;

        if periods > 0 {
            self.tokens = (self.tokens + periods).min(self.capacity);
            // Advance by whole periods only, keeping partial progress toward
            // the next token.
            self.last_refill += self.refill_every * periods;
        }
    }

    pub fn remaining(&mut self) -> u32 {
        self.refill();
        self.tokens
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}
