//! Core runtime configuration.

use crate::logging::{start_logging, LogLevel, LoggingError};
use crate::stats::DEFAULT_STATS_GRACE;
use log::info;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable consulted for the database path.
pub const DB_PATH_ENV: &str = "SOULSCRIPT_DB_PATH";
/// File name used under the fallback directory.
pub const DEFAULT_DB_FILE_NAME: &str = "soulscript.sqlite3";

/// Where the journal database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbLocation {
    File(PathBuf),
    InMemory,
}

impl DbLocation {
    /// Resolves the file location: explicit path, then env override, then
    /// `<temp_dir>/soulscript.sqlite3`.
    pub fn resolve(explicit: Option<PathBuf>) -> Self {
        if let Some(path) = explicit {
            return Self::File(path);
        }
        match std::env::var(DB_PATH_ENV) {
            Ok(value) if !value.trim().is_empty() => Self::File(PathBuf::from(value.trim())),
            _ => Self::File(std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub db: DbLocation,
    /// How long statistics keep recomputing after the last observer leaves.
    pub stats_grace: Duration,
    /// `debug` in debug builds, `info` in release.
    pub log_level: LogLevel,
}

impl CoreConfig {
    pub fn in_memory() -> Self {
        Self {
            db: DbLocation::InMemory,
            ..Self::default()
        }
    }

    pub fn with_db_path(path: impl Into<PathBuf>) -> Self {
        Self {
            db: DbLocation::File(path.into()),
            ..Self::default()
        }
    }

    /// Starts file logging under `log_dir` at the configured level and
    /// records which database and grace period this process runs with.
    pub fn init_logging(&self, log_dir: &Path) -> Result<(), LoggingError> {
        start_logging(self.log_level, log_dir)?;
        let db_mode = match &self.db {
            DbLocation::File(_) => "file",
            DbLocation::InMemory => "memory",
        };
        info!(
            "event=journal_config module=core status=ok db_mode={db_mode} stats_grace_ms={}",
            self.stats_grace.as_millis()
        );
        Ok(())
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db: DbLocation::resolve(None),
            stats_grace: DEFAULT_STATS_GRACE,
            log_level: LogLevel::for_build(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CoreConfig, DbLocation};
    use crate::logging::{LogLevel, LoggingError};
    use std::path::{Path, PathBuf};

    #[test]
    fn relative_log_dir_is_rejected() {
        let error = CoreConfig::in_memory()
            .init_logging(Path::new("logs"))
            .expect_err("relative log dir must fail");
        assert!(matches!(error, LoggingError::InvalidDirectory(_)));
        assert!(error.to_string().contains("absolute"));
    }

    #[test]
    fn explicit_path_wins() {
        let location = DbLocation::resolve(Some(PathBuf::from("/tmp/journal.sqlite3")));
        assert_eq!(location, DbLocation::File(PathBuf::from("/tmp/journal.sqlite3")));
    }

    #[test]
    fn in_memory_keeps_default_grace() {
        let config = CoreConfig::in_memory();
        assert_eq!(config.db, DbLocation::InMemory);
        assert_eq!(config.stats_grace.as_secs(), 5);
        assert_eq!(config.log_level, LogLevel::for_build());
    }
}
