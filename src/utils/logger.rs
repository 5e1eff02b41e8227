//! Append-only file logger behind the `log` facade.
//!
//! The terminal runs in raw mode while the practice screen is up, so log
//! records go to `~/.natya/natya.log` instead of stderr.

use chrono::Local;
use log::{LevelFilter, Log, Metadata, Record};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;

pub const LOG_FILE: &str = "natya.log";

pub struct FileLogger {
    level: LevelFilter,
    file: Mutex<File>,
}

impl FileLogger {
    pub fn open(path: &Path, level: LevelFilter) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            level,
            file: Mutex::new(file),
        })
    }

    fn format(record: &Record) -> String {
        format!(
            "{} {:<5} [{}] {}\n",
            Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
            record.level(),
            record.target(),
            record.args()
        )
    }
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if let Ok(mut file) = self.file.lock() {
            // Logging must never take the app down
            let _ = file.write_all(Self::format(record).as_bytes());
        }
    }

    fn flush(&self) {
        if let Ok(mut file) = self.file.lock() {
            let _ = file.flush();
        }
    }
}

/// Install the file logger as the global logger.
///
/// Returns an error if the log file cannot be opened. A logger that was
/// already installed is left in place.
pub fn init(path: &Path, level: LevelFilter) -> io::Result<()> {
    let logger = FileLogger::open(path, level)?;
    if log::set_logger(Box::leak(Box::new(logger))).is_ok() {
        log::set_max_level(level);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Level;
    use std::fs;

    #[test]
    fn test_records_below_level_are_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.log");
        let logger = FileLogger::open(&path, LevelFilter::Warn).unwrap();

        logger.log(
            &Record::builder()
                .level(Level::Info)
                .target("natya::test")
                .args(format_args!("quiet"))
                .build(),
        );
        logger.log(
            &Record::builder()
                .level(Level::Warn)
                .target("natya::test")
                .args(format_args!("loud"))
                .build(),
        );
        logger.flush();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(!contents.contains("quiet"));
        assert!(contents.contains("WARN"));
        assert!(contents.contains("[natya::test] loud"));
    }

    #[test]
    fn test_init_creates_log_file_and_tolerates_reinstall() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(LOG_FILE);

        init(&path, LevelFilter::Info).unwrap();
        assert!(path.exists());
        assert!(init(&path, LevelFilter::Info).is_ok());
    }
}
