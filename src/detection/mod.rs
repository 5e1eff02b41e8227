//! Simulated skill detection.
//!
//! Nothing here looks at camera frames. A run climbs from a fixed start
//! value toward the tier's success line with random per-tick increments,
//! and ends either in success (confirmed after a short delay) or, once per
//! Advanced attempt chain, in a scripted near miss at the checkpoint.

pub mod clock;
pub mod engine;
pub mod logic;
pub mod random;
pub mod scheduler;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::{DetectionEngine, SimulationHandle};
pub use random::{RandomSource, RngRandom, ScriptedRandom};
pub use types::{DetectionError, Phase, RunId, SimulationConfig, SimulationState, Tier, TickUpdate};
