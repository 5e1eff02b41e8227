// Detection timing
pub const START_DELAY_MS: u64 = 3_000;
pub const TICK_INTERVAL_MS: u64 = 700;
pub const CONFIRMATION_DELAY_MS: u64 = 2_000;

// Detection percentages
pub const RAMP_START_PERCENT: f64 = 35.0;
pub const MAX_PERCENT: f64 = 100.0;
pub const DRIFT_STEP_MAX: f64 = 0.5;
pub const CHECKPOINT_THRESHOLD: f64 = 50.0;
pub const CHECKPOINT_WINDOW: f64 = 2.0;

// Tier parameters: (duration_ms, success_threshold)
pub const BASIC_TIER: (u64, f64) = (10_000, 80.0);
pub const ADVANCED_TIER: (u64, f64) = (20_000, 90.0);

// Practice slider
pub const SLIDER_MIN_LEVEL: u8 = 1;

// Ghungroo beat sync (Tatta Adavu beats 1-3)
pub const BEAT_SYNC_INTERVAL_MS: u64 = 4_000;
pub const BEAT_SYNC_MAX: u8 = 3;

// Mudra tutorial
pub const MUDRA_MATCH_CONFIDENCE: f64 = 0.6;
pub const MUDRA_SUCCESS_CONFIDENCE: f64 = 0.8;
pub const MUDRA_HOLD_MS: u64 = 2_000;
pub const FEEDBACK_LOG_CAPACITY: usize = 5;
pub const MUDRA_MASTER_POINTS: u32 = 100;

// Guru score
pub const GURU_SCORE_GOAL: u32 = 1_000;
pub const GURU_TREND_DAYS: i64 = 7;

// Terminal UI frame pacing
pub const UI_FRAME_MS: u64 = 50;
