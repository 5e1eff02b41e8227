//! Per-tick progress rules, independent of any timer or channel.

use super::random::RandomSource;
use super::types::{Phase, SimulationConfig, SimulationState};
use crate::core::constants::{DRIFT_STEP_MAX, MAX_PERCENT};

/// What the driver has to do after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Keep ticking.
    Continue,
    /// First tick at or above the success line; start the confirmation delay
    /// and keep ticking.
    ArmConfirmation,
    /// Scripted near miss; the run is over.
    CheckpointFailed,
    /// Run is not ramping, nothing changed.
    Ignored,
}

/// Pre-roll has elapsed: jump to the fixed ramp start.
pub fn begin_ramp(state: &mut SimulationState, config: &SimulationConfig) {
    if state.phase != Phase::PreRoll {
        return;
    }
    state.percentage = config.ramp_start();
    state.phase = Phase::Ramping;
}

/// Advance one tick.
///
/// The checkpoint check looks at the percentage *before* this tick's
/// increment, so a run whose increment jumps over `[50, 52)` never hits it.
pub fn process_tick<R: RandomSource + ?Sized>(
    state: &mut SimulationState,
    config: &SimulationConfig,
    rng: &mut R,
) -> TickOutcome {
    if state.phase != Phase::Ramping {
        return TickOutcome::Ignored;
    }
    state.ticks += 1;

    if !state.has_triggered_checkpoint_failure && config.in_checkpoint_window(state.percentage) {
        state.phase = Phase::CheckpointFailed;
        state.has_triggered_checkpoint_failure = true;
        return TickOutcome::CheckpointFailed;
    }

    let threshold = config.success_threshold();
    if state.percentage < threshold {
        state.percentage += rng.next_unit() * config.ramp_step_max();
    } else if state.percentage <= MAX_PERCENT {
        state.percentage += rng.next_unit() * DRIFT_STEP_MAX;
    }

    if state.percentage >= threshold && !state.confirmation_armed {
        state.confirmation_armed = true;
        return TickOutcome::ArmConfirmation;
    }
    TickOutcome::Continue
}

/// Confirmation delay has elapsed. Re-checks the threshold before declaring
/// success; on a failed re-check the arm is released so a later tick can
/// arm it again.
pub fn confirm_success(state: &mut SimulationState, config: &SimulationConfig) -> bool {
    if state.phase != Phase::Ramping {
        return false;
    }
    if state.percentage >= config.success_threshold() {
        state.phase = Phase::Succeeded;
        true
    } else {
        state.confirmation_armed = false;
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::random::ScriptedRandom;
    use crate::detection::types::Tier;

    fn ramping(tier: Tier, percentage: f64) -> (SimulationState, SimulationConfig) {
        let config = SimulationConfig::for_tier(tier);
        let mut state = SimulationState::new(false);
        begin_ramp(&mut state, &config);
        state.percentage = percentage;
        (state, config)
    }

    #[test]
    fn test_begin_ramp_sets_start_value() {
        let config = SimulationConfig::for_tier(Tier::Basic);
        let mut state = SimulationState::new(false);
        begin_ramp(&mut state, &config);
        assert_eq!(state.percentage, 35.0);
        assert_eq!(state.phase, Phase::Ramping);
    }

    #[test]
    fn test_zero_draw_makes_no_progress() {
        let (mut state, config) = ramping(Tier::Basic, 35.0);
        let mut rng = ScriptedRandom::constant(0.0);
        for _ in 0..50 {
            assert_eq!(process_tick(&mut state, &config, &mut rng), TickOutcome::Continue);
        }
        assert_eq!(state.percentage, 35.0);
        assert_eq!(state.ticks, 50);
    }

    #[test]
    fn test_ramp_increment_scales_with_tier() {
        let (mut basic, basic_cfg) = ramping(Tier::Basic, 35.0);
        let (mut adv, adv_cfg) = ramping(Tier::Advanced, 35.0);
        let mut rng = ScriptedRandom::constant(0.5);

        process_tick(&mut basic, &basic_cfg, &mut rng);
        process_tick(&mut adv, &adv_cfg, &mut rng);

        assert!((basic.percentage - 37.25).abs() < 1e-9);
        assert!((adv.percentage - 36.375).abs() < 1e-9);
    }

    #[test]
    fn test_crossing_threshold_arms_once() {
        let (mut state, config) = ramping(Tier::Basic, 79.0);
        let mut rng = ScriptedRandom::constant(0.5);

        assert_eq!(
            process_tick(&mut state, &config, &mut rng),
            TickOutcome::ArmConfirmation
        );
        assert!(state.confirmation_armed);
        assert_eq!(process_tick(&mut state, &config, &mut rng), TickOutcome::Continue);
    }

    #[test]
    fn test_drift_above_threshold_is_small() {
        let (mut state, config) = ramping(Tier::Basic, 85.0);
        let mut rng = ScriptedRandom::max();
        process_tick(&mut state, &config, &mut rng);
        assert!(state.percentage > 85.0 && state.percentage < 85.5 + 1e-9);
    }

    #[test]
    fn test_drift_stops_past_one_hundred() {
        let (mut state, config) = ramping(Tier::Basic, 100.2);
        let mut rng = ScriptedRandom::max();
        process_tick(&mut state, &config, &mut rng);
        assert_eq!(state.percentage, 100.2);
        assert_eq!(state.display_percentage(), 100);
    }

    #[test]
    fn test_checkpoint_fires_inside_window_on_advanced() {
        let (mut state, config) = ramping(Tier::Advanced, 50.4);
        let mut rng = ScriptedRandom::max();

        assert_eq!(
            process_tick(&mut state, &config, &mut rng),
            TickOutcome::CheckpointFailed
        );
        assert_eq!(state.phase, Phase::CheckpointFailed);
        assert!(state.has_triggered_checkpoint_failure);
        assert_eq!(state.percentage, 50.4, "no increment on the failing tick");
    }

    #[test]
    fn test_checkpoint_skipped_when_already_triggered() {
        let (mut state, config) = ramping(Tier::Advanced, 50.4);
        state.has_triggered_checkpoint_failure = true;
        let mut rng = ScriptedRandom::constant(0.0);

        assert_eq!(process_tick(&mut state, &config, &mut rng), TickOutcome::Continue);
        assert_eq!(state.phase, Phase::Ramping);
    }

    #[test]
    fn test_checkpoint_never_applies_to_basic() {
        let (mut state, config) = ramping(Tier::Basic, 51.0);
        let mut rng = ScriptedRandom::constant(0.0);
        assert_eq!(process_tick(&mut state, &config, &mut rng), TickOutcome::Continue);
    }

    #[test]
    fn test_jumping_over_window_skips_checkpoint() {
        let (mut state, config) = ramping(Tier::Advanced, 49.9);
        let mut rng = ScriptedRandom::max();
        process_tick(&mut state, &config, &mut rng);
        assert!(state.percentage >= 52.0);
        assert_eq!(process_tick(&mut state, &config, &mut rng), TickOutcome::Continue);
        assert!(!state.has_triggered_checkpoint_failure);
    }

    #[test]
    fn test_confirm_success_rechecks_threshold() {
        let (mut state, config) = ramping(Tier::Advanced, 89.0);
        state.confirmation_armed = true;
        assert!(!confirm_success(&mut state, &config));
        assert!(!state.confirmation_armed);
        assert_eq!(state.phase, Phase::Ramping);

        state.percentage = 90.0;
        assert!(confirm_success(&mut state, &config));
        assert_eq!(state.phase, Phase::Succeeded);
    }

    #[test]
    fn test_terminal_state_ignores_ticks() {
        let (mut state, config) = ramping(Tier::Basic, 81.0);
        state.phase = Phase::Succeeded;
        let mut rng = ScriptedRandom::max();
        assert_eq!(process_tick(&mut state, &config, &mut rng), TickOutcome::Ignored);
        assert_eq!(state.percentage, 81.0);
    }
}
