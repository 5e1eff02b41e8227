//! Natya - simulated dance-skill practice engine.
//!
//! Exposes the detection engine, practice session policy, mudra tutorial
//! and achievement ledger for the terminal app, the headless simulator and
//! tests.

pub mod achievements;
pub mod core;
pub mod detection;
pub mod mudra;
pub mod practice;
pub mod roadmap;
pub mod utils;

pub use achievements::{AchievementCategory, AchievementLedger, AchievementRecord, GuruScore};
pub use core::constants::*;
pub use detection::{
    DetectionEngine, DetectionError, ManualClock, Phase, ScriptedRandom, SimulationConfig,
    SimulationHandle, SystemClock, Tier, TickUpdate,
};
pub use practice::{PracticeOutcome, PracticeSession};
