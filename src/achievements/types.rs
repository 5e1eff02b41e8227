//! Achievement records and the per-user ledger.
//!
//! Records keep the document shape the rest of the platform stores
//! (`{name, description, category, points, earnedAt}`), so the JSON written
//! here can be handed to any collaborator unchanged.

use crate::core::constants::{GURU_SCORE_GOAL, GURU_TREND_DAYS};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Achievement categories, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AchievementCategory {
    Mudras,
    Poses,
    Performances,
}

impl AchievementCategory {
    pub const ALL: [AchievementCategory; 3] = [
        AchievementCategory::Mudras,
        AchievementCategory::Poses,
        AchievementCategory::Performances,
    ];

    /// Display name for the category.
    pub fn name(&self) -> &'static str {
        match self {
            AchievementCategory::Mudras => "Mudras",
            AchievementCategory::Poses => "Dance Poses",
            AchievementCategory::Performances => "Performances",
        }
    }
}

/// One earned achievement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementRecord {
    pub name: String,
    pub description: String,
    pub category: AchievementCategory,
    #[serde(default)]
    pub points: u32,
    pub earned_at: DateTime<Utc>,
}

/// Everything a user has earned, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AchievementLedger {
    #[serde(default)]
    pub achievements: Vec<AchievementRecord>,
}

impl AchievementLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn award(&mut self, record: AchievementRecord) {
        log::info!("awarded {} (+{} pts)", record.name, record.points);
        self.achievements.push(record);
    }

    pub fn len(&self) -> usize {
        self.achievements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.achievements.is_empty()
    }

    pub fn has(&self, name: &str) -> bool {
        self.achievements.iter().any(|a| a.name == name)
    }

    pub fn total_points(&self) -> u32 {
        self.achievements.iter().map(|a| a.points).sum()
    }

    pub fn count_in(&self, category: AchievementCategory) -> usize {
        self.achievements
            .iter()
            .filter(|a| a.category == category)
            .count()
    }

    /// Points from achievements earned strictly after `cutoff`.
    pub fn points_since(&self, cutoff: DateTime<Utc>) -> u32 {
        self.achievements
            .iter()
            .filter(|a| a.earned_at > cutoff)
            .map(|a| a.points)
            .sum()
    }

    pub fn in_category(
        &self,
        category: AchievementCategory,
    ) -> impl Iterator<Item = &AchievementRecord> {
        self.achievements
            .iter()
            .filter(move |a| a.category == category)
    }
}

/// Dashboard summary of a ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GuruScore {
    /// Total points ever earned.
    pub current: u32,
    /// Percent of the way to the score goal, capped at 100.
    pub progress: u8,
    /// Points earned over the trailing week.
    pub trend: u32,
}

impl GuruScore {
    pub fn from_ledger(ledger: &AchievementLedger, now: DateTime<Utc>) -> Self {
        let current = ledger.total_points();
        let progress = ((current as f64 / GURU_SCORE_GOAL as f64) * 100.0)
            .round()
            .min(100.0) as u8;
        let trend = ledger.points_since(now - Duration::days(GURU_TREND_DAYS));
        Self {
            current,
            progress,
            trend,
        }
    }

    pub fn trend_label(&self) -> String {
        format!("+{}", self.trend)
    }
}
