//! User settings stored in `~/.natya/settings.json`.
//!
//! Only presentation-level choices live here. Detection thresholds and
//! durations are fixed per tier.

use crate::core::constants::SLIDER_MIN_LEVEL;
use crate::utils::persistence::{
    load_json_at_or_default, load_json_or_default, save_json, save_json_at,
};
use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;

pub const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Slider level the practice screen opens with.
    pub starting_level: u8,
    /// Roadmap generation endpoint.
    pub roadmap_endpoint: String,
    /// Log filter for the file logger (`error`, `warn`, `info`, `debug`, `trace`).
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            starting_level: SLIDER_MIN_LEVEL,
            roadmap_endpoint: "http://localhost:5005/generate-roadmap".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    pub fn load() -> Self {
        load_json_or_default(SETTINGS_FILE)
    }

    pub fn save(&self) -> io::Result<()> {
        save_json(SETTINGS_FILE, self)
    }

    pub fn load_at(path: &Path) -> Self {
        load_json_at_or_default(path)
    }

    pub fn save_at(&self, path: &Path) -> io::Result<()> {
        save_json_at(path, self)
    }

    /// Parsed log filter, falling back to `Info` on anything unrecognized.
    pub fn log_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }
}
