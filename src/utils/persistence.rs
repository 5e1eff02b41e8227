//! JSON persistence helpers for ~/.natya/ files.
//!
//! Every on-disk file (settings, achievements, log) lives in one directory.
//! The `_at` variants take an explicit path so callers and tests can point
//! them somewhere else.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Get the ~/.natya/ directory path, creating it if needed.
pub fn natya_dir() -> io::Result<PathBuf> {
    let home_dir = dirs::home_dir().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::NotFound,
            "Could not determine home directory",
        )
    })?;
    let dir = home_dir.join(".natya");
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Get the full path for a file in ~/.natya/.
pub fn save_path(filename: &str) -> io::Result<PathBuf> {
    Ok(natya_dir()?.join(filename))
}

/// Load a JSON file from ~/.natya/, returning `T::default()` if missing or invalid.
pub fn load_json_or_default<T: Default + DeserializeOwned>(filename: &str) -> T {
    match save_path(filename) {
        Ok(path) => load_json_at_or_default(&path),
        Err(_) => T::default(),
    }
}

/// Save a value as pretty-printed JSON to ~/.natya/.
pub fn save_json<T: Serialize>(filename: &str, data: &T) -> io::Result<()> {
    save_json_at(&save_path(filename)?, data)
}

pub fn load_json_at_or_default<T: Default + DeserializeOwned>(path: &Path) -> T {
    match fs::read_to_string(path) {
        Ok(json) => serde_json::from_str(&json).unwrap_or_else(|e| {
            log::warn!("ignoring unreadable {}: {}", path.display(), e);
            T::default()
        }),
        Err(_) => T::default(),
    }
}

pub fn save_json_at<T: Serialize>(path: &Path, data: &T) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(data)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    fs::write(path, json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_returns_default() {
        let dir = tempfile::tempdir().unwrap();
        let val: Vec<String> = load_json_at_or_default(&dir.path().join("missing.json"));
        assert!(val.is_empty());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("data.json");
        let data = vec!["pataka".to_string(), "mushti".to_string()];

        save_json_at(&path, &data).expect("save should succeed");
        let loaded: Vec<String> = load_json_at_or_default(&path);
        assert_eq!(loaded, data);
    }

    #[test]
    fn test_corrupt_file_returns_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{not json").unwrap();

        let loaded: Vec<u32> = load_json_at_or_default(&path);
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_save_path_format() {
        let path = save_path("test.json").expect("save_path should succeed");
        assert!(path.to_string_lossy().ends_with(".natya/test.json"));
    }
}
