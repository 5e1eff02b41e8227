//! Ghungroo practice session: the caller-side policy around the engine.
//!
//! The session owns the slider, the engine and the attempt in flight. It
//! turns terminal updates into an outcome the screen can show, moves the
//! user up to Advanced after a Basic pass, and records achievements without
//! letting a failed save touch the run's result.

use crate::achievements::{rhythm_achievement, AchievementLedger, AchievementStore};
use crate::detection::{
    Clock, DetectionEngine, DetectionError, Phase, RandomSource, RunId, SimulationConfig,
    SimulationHandle, Tier, TickUpdate,
};
use chrono::Utc;

/// How a finished attempt is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PracticeOutcome {
    /// Scripted near miss on the Advanced tier.
    KeepPracticing { tier: Tier, percentage: u8 },
    /// Passed; `promoted_to` is set when the pass unlocked the next tier.
    Celebrate {
        tier: Tier,
        percentage: u8,
        promoted_to: Option<Tier>,
    },
}

impl PracticeOutcome {
    pub fn headline(&self) -> &'static str {
        match self {
            PracticeOutcome::KeepPracticing { .. } => "Failed",
            PracticeOutcome::Celebrate { .. } => "Success",
        }
    }

    pub fn message(&self) -> String {
        match *self {
            PracticeOutcome::KeepPracticing { percentage, .. } => {
                format!("Lost the beat at {}%. Keep practicing and try again.", percentage)
            }
            PracticeOutcome::Celebrate {
                percentage,
                promoted_to: Some(next),
                ..
            } => format!("Rhythm detected at {}%! {} level unlocked.", percentage, next),
            PracticeOutcome::Celebrate { percentage, .. } => {
                format!("Rhythm detected at {}%!", percentage)
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, PracticeOutcome::Celebrate { .. })
    }

    pub fn tier(&self) -> Tier {
        match *self {
            PracticeOutcome::KeepPracticing { tier, .. } | PracticeOutcome::Celebrate { tier, .. } => tier,
        }
    }
}

pub struct PracticeSession<R: RandomSource, C: Clock> {
    engine: DetectionEngine<R, C>,
    tier: Tier,
    attempt: Option<SimulationHandle>,
    percentage: u8,
    phase: Phase,
    outcome: Option<PracticeOutcome>,
}

impl<R: RandomSource, C: Clock> PracticeSession<R, C> {
    pub fn new(engine: DetectionEngine<R, C>) -> Self {
        Self {
            engine,
            tier: Tier::Basic,
            attempt: None,
            percentage: 0,
            phase: Phase::Idle,
            outcome: None,
        }
    }

    /// Session opening at a given slider level.
    pub fn with_level(engine: DetectionEngine<R, C>, level: u8) -> Result<Self, DetectionError> {
        let mut session = Self::new(engine);
        session.set_level(level)?;
        Ok(session)
    }

    pub fn engine(&self) -> &DetectionEngine<R, C> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut DetectionEngine<R, C> {
        &mut self.engine
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    pub fn percentage(&self) -> u8 {
        self.percentage
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn outcome(&self) -> Option<PracticeOutcome> {
        self.outcome
    }

    pub fn attempt_id(&self) -> Option<RunId> {
        self.attempt.as_ref().map(|h| h.id())
    }

    pub fn is_running(&self) -> bool {
        self.phase.is_active()
    }

    /// Move the slider. Dropping back to Basic clears the Advanced near miss,
    /// so the next Advanced attempt will hit it again.
    pub fn set_level(&mut self, level: u8) -> Result<Tier, DetectionError> {
        let tier = Tier::try_from(level)?;
        self.set_tier(tier);
        Ok(tier)
    }

    pub fn set_tier(&mut self, tier: Tier) {
        if tier == Tier::Basic {
            self.engine.reset_attempt_chain();
        }
        self.tier = tier;
    }

    /// Start a fresh attempt at the current tier, abandoning any attempt
    /// still in flight.
    pub fn start_attempt(&mut self) -> RunId {
        self.discard_attempt();
        let handle = self.engine.start(SimulationConfig::for_tier(self.tier));
        let id = handle.id();
        self.attempt = Some(handle);
        self.percentage = 0;
        self.phase = Phase::PreRoll;
        self.outcome = None;
        id
    }

    /// Stop the attempt in flight without producing an outcome.
    pub fn cancel_attempt(&mut self) {
        if let Some(handle) = &self.attempt {
            self.engine.cancel(handle);
            if !self.phase.is_terminal() {
                self.phase = Phase::Idle;
            }
        }
    }

    /// Fire due timers and fold the attempt's updates into the session.
    ///
    /// Returns the outcome on the poll that observed the attempt ending,
    /// and `None` otherwise.
    pub fn poll(&mut self) -> Option<PracticeOutcome> {
        self.engine.pump();
        let updates = match &self.attempt {
            Some(handle) => handle.drain(),
            None => return None,
        };
        updates.into_iter().find_map(|update| self.apply(update))
    }

    fn apply(&mut self, update: TickUpdate) -> Option<PracticeOutcome> {
        if self.phase.is_terminal() {
            return None;
        }
        self.percentage = update.percentage;
        self.phase = update.phase;

        let tier = self.attempt.as_ref().map_or(self.tier, |h| h.tier());
        let outcome = match update.phase {
            Phase::CheckpointFailed => PracticeOutcome::KeepPracticing {
                tier,
                percentage: update.percentage,
            },
            Phase::Succeeded => {
                let promoted_to = (tier == Tier::Basic).then_some(Tier::Advanced);
                if let Some(next) = promoted_to {
                    self.tier = next;
                }
                PracticeOutcome::Celebrate {
                    tier,
                    percentage: update.percentage,
                    promoted_to,
                }
            }
            _ => return None,
        };
        log::info!("attempt finished: {}", outcome.message());
        self.outcome = Some(outcome);
        Some(outcome)
    }

    fn discard_attempt(&mut self) {
        if let Some(handle) = self.attempt.take() {
            self.engine.forget(&handle);
        }
    }
}

/// Record a passed rhythm test.
///
/// The achievement is appended to the ledger and the ledger is saved. A
/// failed save is logged and returned; the outcome itself is never
/// revisited. Returns `Ok(false)` for outcomes that earn nothing.
pub fn record_outcome<S: AchievementStore + ?Sized>(
    outcome: &PracticeOutcome,
    ledger: &mut AchievementLedger,
    store: &S,
) -> std::io::Result<bool> {
    if !outcome.is_success() {
        return Ok(false);
    }
    ledger.award(rhythm_achievement(outcome.tier()).earn(Utc::now()));
    store.save(ledger).inspect_err(|e| {
        log::warn!("could not save achievements: {}", e);
    })?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::{ManualClock, ScriptedRandom};

    fn session(rng: ScriptedRandom) -> (PracticeSession<ScriptedRandom, ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        let engine = DetectionEngine::new(rng, clock.clone());
        (PracticeSession::new(engine), clock)
    }

    #[test]
    fn test_invalid_level_is_rejected_and_tier_kept() {
        let (mut s, _) = session(ScriptedRandom::constant(0.0));
        assert!(s.set_level(5).is_err());
        assert_eq!(s.tier(), Tier::Basic);
        assert_eq!(s.set_level(2), Ok(Tier::Advanced));
    }

    #[test]
    fn test_with_level_validates() {
        let engine = DetectionEngine::new(ScriptedRandom::constant(0.0), ManualClock::new());
        assert!(PracticeSession::with_level(engine, 9).is_err());
    }

    #[test]
    fn test_poll_tracks_percentage() {
        let (mut s, clock) = session(ScriptedRandom::constant(0.0));
        s.start_attempt();
        assert_eq!(s.phase(), Phase::PreRoll);

        clock.advance(3_000);
        assert_eq!(s.poll(), None);
        assert_eq!(s.percentage(), 35);
        assert_eq!(s.phase(), Phase::Ramping);
    }

    #[test]
    fn test_outcome_headlines() {
        let fail = PracticeOutcome::KeepPracticing {
            tier: Tier::Advanced,
            percentage: 51,
        };
        assert_eq!(fail.headline(), "Failed");
        assert!(fail.message().contains("51%"));

        let pass = PracticeOutcome::Celebrate {
            tier: Tier::Basic,
            percentage: 84,
            promoted_to: Some(Tier::Advanced),
        };
        assert_eq!(pass.headline(), "Success");
        assert!(pass.message().contains("Advanced level unlocked"));
    }
}
