//! Static definitions of the achievements practice screens can award.

use super::types::{AchievementCategory, AchievementRecord};
use crate::core::constants::MUDRA_MASTER_POINTS;
use crate::detection::Tier;
use chrono::{DateTime, Utc};

/// Static definition of an achievement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AchievementDef {
    pub name: &'static str,
    pub description: &'static str,
    pub category: AchievementCategory,
    pub points: u32,
}

impl AchievementDef {
    /// Stamp this definition as earned at `earned_at`.
    pub fn earn(&self, earned_at: DateTime<Utc>) -> AchievementRecord {
        AchievementRecord {
            name: self.name.to_string(),
            description: self.description.to_string(),
            category: self.category,
            points: self.points,
            earned_at,
        }
    }
}

pub const MUDRA_MASTER: AchievementDef = AchievementDef {
    name: "Mudra Master",
    description: "Completed all basic mudras practice",
    category: AchievementCategory::Mudras,
    points: MUDRA_MASTER_POINTS,
};

pub const RHYTHM_EXPLORER: AchievementDef = AchievementDef {
    name: "Rhythm Explorer",
    description: "Passed the basic ghungroo rhythm test",
    category: AchievementCategory::Performances,
    points: 50,
};

pub const RHYTHM_VIRTUOSO: AchievementDef = AchievementDef {
    name: "Rhythm Virtuoso",
    description: "Passed the advanced ghungroo rhythm test",
    category: AchievementCategory::Performances,
    points: 200,
};

pub const ALL_ACHIEVEMENTS: &[AchievementDef] = &[MUDRA_MASTER, RHYTHM_EXPLORER, RHYTHM_VIRTUOSO];

/// Achievement for passing a rhythm test at `tier`.
pub fn rhythm_achievement(tier: Tier) -> &'static AchievementDef {
    match tier {
        Tier::Basic => &RHYTHM_EXPLORER,
        Tier::Advanced => &RHYTHM_VIRTUOSO,
    }
}

pub fn get_achievement_def(name: &str) -> Option<&'static AchievementDef> {
    ALL_ACHIEVEMENTS.iter().find(|d| d.name == name)
}

pub fn get_achievements_by_category(category: AchievementCategory) -> Vec<&'static AchievementDef> {
    ALL_ACHIEVEMENTS
        .iter()
        .filter(|d| d.category == category)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_are_unique() {
        for (i, a) in ALL_ACHIEVEMENTS.iter().enumerate() {
            for b in &ALL_ACHIEVEMENTS[i + 1..] {
                assert_ne!(a.name, b.name);
            }
        }
    }

    #[test]
    fn test_lookup_by_name() {
        assert_eq!(get_achievement_def("Mudra Master"), Some(&MUDRA_MASTER));
        assert!(get_achievement_def("Nope").is_none());
    }

    #[test]
    fn test_rhythm_achievement_scales_with_tier() {
        assert!(rhythm_achievement(Tier::Advanced).points > rhythm_achievement(Tier::Basic).points);
        assert_eq!(
            get_achievements_by_category(AchievementCategory::Performances).len(),
            2
        );
    }

    #[test]
    fn test_earn_copies_definition() {
        let now = Utc::now();
        let record = MUDRA_MASTER.earn(now);
        assert_eq!(record.points, 100);
        assert_eq!(record.category, AchievementCategory::Mudras);
        assert_eq!(record.earned_at, now);
    }
}
