//! Achievement persistence (load/save to disk).

use super::types::AchievementLedger;
use crate::utils::persistence::{load_json_at_or_default, save_json_at, save_path};
use std::io;
use std::path::{Path, PathBuf};

pub const ACHIEVEMENTS_FILE: &str = "achievements.json";

/// Somewhere a ledger can be loaded from and written back to.
pub trait AchievementStore {
    fn load(&self) -> AchievementLedger;
    fn save(&self, ledger: &AchievementLedger) -> io::Result<()>;
}

/// Ledger kept as a JSON file.
#[derive(Debug, Clone)]
pub struct JsonAchievementStore {
    path: PathBuf,
}

impl JsonAchievementStore {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The store in `~/.natya/achievements.json`.
    pub fn default_location() -> io::Result<Self> {
        Ok(Self::at(save_path(ACHIEVEMENTS_FILE)?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AchievementStore for JsonAchievementStore {
    /// Missing or corrupt files load as an empty ledger.
    fn load(&self) -> AchievementLedger {
        load_json_at_or_default(&self.path)
    }

    fn save(&self, ledger: &AchievementLedger) -> io::Result<()> {
        save_json_at(&self.path, ledger)
    }
}

/// Load achievements from `~/.natya/`, or return an empty ledger.
pub fn load_achievements() -> AchievementLedger {
    match JsonAchievementStore::default_location() {
        Ok(store) => store.load(),
        Err(_) => AchievementLedger::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::achievements::data::MUDRA_MASTER;
    use chrono::Utc;
    use std::fs;

    #[test]
    fn test_ledger_survives_a_save() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonAchievementStore::at(dir.path().join(ACHIEVEMENTS_FILE));

        let mut ledger = AchievementLedger::new();
        ledger.award(MUDRA_MASTER.earn(Utc::now()));
        store.save(&ledger).unwrap();

        let loaded = store.load();
        assert_eq!(loaded, ledger);
        assert_eq!(loaded.total_points(), 100);
    }

    #[test]
    fn test_load_missing_file_returns_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonAchievementStore::at(dir.path().join("none.json"));
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_reads_document_written_elsewhere() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(ACHIEVEMENTS_FILE);
        fs::write(
            &path,
            r#"{"achievements":[{"name":"Mudra Master","description":"Completed all basic mudras practice","category":"mudras","earnedAt":"2024-02-15T10:00:00Z","points":100}]}"#,
        )
        .unwrap();

        let ledger = JsonAchievementStore::at(&path).load();
        assert_eq!(ledger.len(), 1);
        assert!(ledger.has("Mudra Master"));
    }
}
