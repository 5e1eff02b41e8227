//! Achievement ledger.
//!
//! Tracks what a user has earned across practice screens and summarizes it
//! as a guru score. The ledger is stored in `~/.natya/achievements.json`.

pub mod data;
pub mod persistence;
pub mod types;

pub use data::{get_achievement_def, get_achievements_by_category, rhythm_achievement, AchievementDef};
pub use persistence::{load_achievements, AchievementStore, JsonAchievementStore};
pub use types::{AchievementCategory, AchievementLedger, AchievementRecord, GuruScore};
