//! Injectable random source for the simulated detection.

use rand::rngs::ThreadRng;
use rand::Rng;
use std::collections::VecDeque;

/// A stream of unit draws in `[0, 1)`.
pub trait RandomSource {
    fn next_unit(&mut self) -> f64;

    /// Uniform integer in `1..=max`.
    fn next_in_range(&mut self, max: u8) -> u8 {
        let max = max.max(1);
        let draw = (self.next_unit() * max as f64).floor() as u8;
        draw.min(max - 1) + 1
    }
}

/// Adapter over any `rand` generator.
#[derive(Debug, Clone)]
pub struct RngRandom<R: Rng>(pub R);

impl<R: Rng> RandomSource for RngRandom<R> {
    fn next_unit(&mut self) -> f64 {
        self.0.gen::<f64>()
    }
}

impl RngRandom<ThreadRng> {
    pub fn thread() -> Self {
        RngRandom(rand::thread_rng())
    }
}

/// Replays a fixed sequence of draws, then repeats the last one forever.
///
/// Values are clamped below 1.0 so the `[0, 1)` contract holds even when
/// a test asks for "the maximum draw".
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    queue: VecDeque<f64>,
    last: f64,
}

/// Largest value a scripted draw can produce.
pub const MAX_UNIT_DRAW: f64 = 1.0 - f64::EPSILON;

impl ScriptedRandom {
    pub fn new(values: impl IntoIterator<Item = f64>) -> Self {
        Self {
            queue: values.into_iter().map(clamp_unit).collect(),
            last: 0.0,
        }
    }

    /// Always draws the same value.
    pub fn constant(value: f64) -> Self {
        Self {
            queue: VecDeque::new(),
            last: clamp_unit(value),
        }
    }

    /// Always draws the largest possible value.
    pub fn max() -> Self {
        Self::constant(MAX_UNIT_DRAW)
    }

    pub fn push(&mut self, value: f64) {
        self.queue.push_back(clamp_unit(value));
    }
}

impl RandomSource for ScriptedRandom {
    fn next_unit(&mut self) -> f64 {
        if let Some(v) = self.queue.pop_front() {
            self.last = v;
        }
        self.last
    }
}

fn clamp_unit(value: f64) -> f64 {
    value.clamp(0.0, MAX_UNIT_DRAW)
}
