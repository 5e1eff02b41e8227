//! Simulated Tatta Adavu beat indicator shown beside the rhythm test.

use crate::core::constants::{BEAT_SYNC_INTERVAL_MS, BEAT_SYNC_MAX};
use crate::detection::RandomSource;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeatSync {
    beat: u8,
    next_change_ms: u64,
}

impl Default for BeatSync {
    fn default() -> Self {
        Self::new(0)
    }
}

impl BeatSync {
    /// Indicator that shows no beat until the first interval passes.
    pub fn new(now_ms: u64) -> Self {
        Self {
            beat: 0,
            next_change_ms: now_ms + BEAT_SYNC_INTERVAL_MS,
        }
    }

    /// Current beat, `0` before the first draw, else `1..=3`.
    pub fn beat(&self) -> u8 {
        self.beat
    }

    /// Redraw the beat if its interval has passed. Returns the new beat
    /// when it changed hands, even if the value drawn is the same.
    pub fn update<R: RandomSource + ?Sized>(&mut self, now_ms: u64, rng: &mut R) -> Option<u8> {
        if now_ms < self.next_change_ms {
            return None;
        }
        // A long stall only produces one redraw
        let missed = (now_ms - self.next_change_ms) / BEAT_SYNC_INTERVAL_MS;
        self.next_change_ms += (missed + 1) * BEAT_SYNC_INTERVAL_MS;
        self.beat = rng.next_in_range(BEAT_SYNC_MAX);
        Some(self.beat)
    }
}
