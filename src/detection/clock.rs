//! Time sources for driving the engine.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// Milliseconds since an arbitrary, fixed origin. Must never go backwards.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Wall-clock time measured from construction.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Virtual time moved by hand. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<u64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get().saturating_add(ms));
    }

    /// Jump to `ms`. Earlier values are ignored.
    pub fn set(&self, ms: u64) {
        if ms > self.now.get() {
            self.now.set(ms);
        }
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_clones_share_time() {
        let clock = ManualClock::new();
        let view = clock.clone();
        clock.advance(700);
        assert_eq!(view.now_ms(), 700);
    }

    #[test]
    fn test_manual_clock_never_goes_backwards() {
        let clock = ManualClock::new();
        clock.set(3_000);
        clock.set(1_000);
        assert_eq!(clock.now_ms(), 3_000);
    }

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now_ms();
        let b = clock.now_ms();
        assert!(b >= a);
    }
}
