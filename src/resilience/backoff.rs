//! Delays between status polls of a pending batch.

use rand::Rng;
use std::time::Duration;

/// Growing, jittered delay sequence for one confirmation wait.
///
/// The ceiling starts at `base_ms` and doubles per poll up to `max_ms`.
/// Each delay is half the ceiling plus a random share of the other half.
#[derive(Debug, Clone)]
pub struct PollBackoff {
    base_ms: u64,
    max_ms: u64,
    polls: u32,
}

impl PollBackoff {
    pub fn new(base_ms: u64, max_ms: u64) -> Self {
        Self {
            base_ms,
            max_ms,
            polls: 0,
        }
    }

    /// Current ceiling, before jitter.
    pub fn ceiling_ms(&self) -> u64 {
        2u64.checked_pow(self.polls)
            .and_then(|factor| self.base_ms.checked_mul(factor))
            .unwrap_or(u64::MAX)
            .min(self.max_ms)
    }

    /// Delay to sleep before the next poll.
    pub fn next_delay(&mut self) -> Duration {
        let ceiling = self.ceiling_ms();
        self.polls = self.polls.saturating_add(1);

        let fixed = ceiling / 2;
        let spread = ceiling - fixed;
        let jitter = if spread > 0 {
            rand::thread_rng().gen_range(0..=spread)
        } else {
            0
        };
        Duration::from_millis(fixed + jitter)
    }
}
