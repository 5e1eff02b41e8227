//! Detection simulation data structures.

use crate::core::constants::{
    ADVANCED_TIER, BASIC_TIER, CHECKPOINT_THRESHOLD, CHECKPOINT_WINDOW, CONFIRMATION_DELAY_MS,
    MAX_PERCENT, RAMP_START_PERCENT, START_DELAY_MS, TICK_INTERVAL_MS,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised synchronously when starting a simulation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DetectionError {
    #[error("invalid configuration: unrecognized tier level {level}")]
    InvalidConfiguration { level: String },
}

/// Difficulty of a practice attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tier {
    Basic,
    Advanced,
}

impl Tier {
    pub const ALL: [Tier; 2] = [Tier::Basic, Tier::Advanced];

    pub fn name(&self) -> &'static str {
        match self {
            Tier::Basic => "Basic",
            Tier::Advanced => "Advanced",
        }
    }

    /// Slider level that selects this tier.
    pub fn level(&self) -> u8 {
        match self {
            Tier::Basic => 1,
            Tier::Advanced => 2,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u8> for Tier {
    type Error = DetectionError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        match level {
            1 => Ok(Tier::Basic),
            2 => Ok(Tier::Advanced),
            other => Err(DetectionError::InvalidConfiguration {
                level: other.to_string(),
            }),
        }
    }
}

impl FromStr for Tier {
    type Err = DetectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.parse::<u8>() {
            Ok(level) => Tier::try_from(level),
            Err(_) => match trimmed.to_ascii_lowercase().as_str() {
                "basic" => Ok(Tier::Basic),
                "advanced" => Ok(Tier::Advanced),
                _ => Err(DetectionError::InvalidConfiguration {
                    level: trimmed.to_string(),
                }),
            },
        }
    }
}

/// Immutable per-run parameters, fixed by tier.
///
/// Fields are private: the only way to get a config is [`SimulationConfig::for_tier`],
/// so every config the engine sees is one of the two valid presets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimulationConfig {
    tier: Tier,
    duration_ms: u64,
    success_threshold: f64,
    checkpoint_threshold: Option<f64>,
    start_delay_ms: u64,
    tick_interval_ms: u64,
    confirmation_delay_ms: u64,
    ramp_start: f64,
}

impl SimulationConfig {
    pub fn for_tier(tier: Tier) -> Self {
        let (duration_ms, success_threshold) = match tier {
            Tier::Basic => BASIC_TIER,
            Tier::Advanced => ADVANCED_TIER,
        };
        Self {
            tier,
            duration_ms,
            success_threshold,
            checkpoint_threshold: match tier {
                Tier::Basic => None,
                Tier::Advanced => Some(CHECKPOINT_THRESHOLD),
            },
            start_delay_ms: START_DELAY_MS,
            tick_interval_ms: TICK_INTERVAL_MS,
            confirmation_delay_ms: CONFIRMATION_DELAY_MS,
            ramp_start: RAMP_START_PERCENT,
        }
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    pub fn success_threshold(&self) -> f64 {
        self.success_threshold
    }

    pub fn checkpoint_threshold(&self) -> Option<f64> {
        self.checkpoint_threshold
    }

    pub fn start_delay_ms(&self) -> u64 {
        self.start_delay_ms
    }

    pub fn tick_interval_ms(&self) -> u64 {
        self.tick_interval_ms
    }

    pub fn confirmation_delay_ms(&self) -> u64 {
        self.confirmation_delay_ms
    }

    pub fn ramp_start(&self) -> f64 {
        self.ramp_start
    }

    /// Largest per-tick increment below the success line.
    ///
    /// Expected climb is linear from `ramp_start` to `success_threshold`
    /// over the nominal duration: Basic 4.5, Advanced 2.75.
    pub fn ramp_step_max(&self) -> f64 {
        (self.success_threshold - self.ramp_start) / (self.duration_ms as f64 / 1000.0)
    }

    /// Whether `percentage` sits in the scripted near-miss window `[50, 52)`.
    pub fn in_checkpoint_window(&self, percentage: f64) -> bool {
        match self.checkpoint_threshold {
            Some(t) => (t..t + CHECKPOINT_WINDOW).contains(&percentage),
            None => false,
        }
    }
}

/// Lifecycle phase of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Idle,
    PreRoll,
    Ramping,
    CheckpointFailed,
    Succeeded,
}

impl Phase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::CheckpointFailed | Phase::Succeeded)
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Phase::PreRoll | Phase::Ramping)
    }
}

/// Mutable state owned by one running simulation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationState {
    /// Raw percentage; only the rounded value is ever shown.
    pub percentage: f64,
    pub has_triggered_checkpoint_failure: bool,
    pub phase: Phase,
    /// Set by the first tick at or above the success threshold.
    pub confirmation_armed: bool,
    pub ticks: u32,
}

impl SimulationState {
    pub fn new(has_triggered_checkpoint_failure: bool) -> Self {
        Self {
            percentage: 0.0,
            has_triggered_checkpoint_failure,
            phase: Phase::PreRoll,
            confirmation_armed: false,
            ticks: 0,
        }
    }

    pub fn idle() -> Self {
        Self {
            phase: Phase::Idle,
            ..Self::new(false)
        }
    }

    pub fn display_percentage(&self) -> u8 {
        self.percentage.round().clamp(0.0, MAX_PERCENT) as u8
    }
}

/// Identifier of one run inside an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RunId(pub u64);

/// Notification delivered to a run's subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TickUpdate {
    pub run: RunId,
    pub percentage: u8,
    pub phase: Phase,
    /// Engine time at which the update was produced.
    pub at_ms: u64,
}

impl TickUpdate {
    pub fn is_terminal(&self) -> bool {
        self.phase.is_terminal()
    }
}
