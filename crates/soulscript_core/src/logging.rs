//! Rolling-file logging for the journal core.
//!
//! # Responsibility
//! - Start the file logger once per process, from `CoreConfig` or the FFI.
//! - Record startup metadata and captured panics.
//!
//! # Invariants
//! - One logger per process; repeating the same level and directory is a no-op.
//! - A different level or directory after start is rejected, never applied.
//! - Entry text and passcodes never reach the log. Panic payloads are
//!   flattened to one line and capped.

use crate::db::migrations::latest_version;
use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::{error, info};
use once_cell::sync::OnceCell;
use std::any::Any;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const LOG_FILE_BASENAME: &str = "soulscript";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;
const MAX_LOG_FILES: usize = 5;
const MAX_PANIC_PAYLOAD_CHARS: usize = 160;

static ACTIVE_LOGGER: OnceCell<ActiveLogger> = OnceCell::new();
static PANIC_HOOK: OnceCell<()> = OnceCell::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Case-insensitive; `warning` is accepted for `warn`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "trace" => Some(Self::Trace),
            "debug" => Some(Self::Debug),
            "info" => Some(Self::Info),
            "warn" | "warning" => Some(Self::Warn),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    /// `debug` in debug builds, `info` in release builds.
    pub fn for_build() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Info
        }
    }
}

#[derive(Debug)]
pub enum LoggingError {
    UnsupportedLevel(String),
    InvalidDirectory(String),
    CreateDirectory {
        dir: PathBuf,
        source: std::io::Error,
    },
    Backend(String),
    AlreadyActive {
        setting: &'static str,
        active: String,
        requested: String,
    },
}

impl Display for LoggingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedLevel(level) => write!(
                f,
                "unsupported log level `{level}`; expected trace|debug|info|warn|error"
            ),
            Self::InvalidDirectory(message) => write!(f, "{message}"),
            Self::CreateDirectory { dir, source } => {
                write!(f, "failed to create log directory `{}`: {source}", dir.display())
            }
            Self::Backend(message) => write!(f, "failed to start logger: {message}"),
            Self::AlreadyActive {
                setting,
                active,
                requested,
            } => write!(
                f,
                "logging already running with {setting} `{active}`; refusing to switch to `{requested}`"
            ),
        }
    }
}

impl Error for LoggingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CreateDirectory { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Level and directory of the running logger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingStatus {
    pub level: LogLevel,
    pub log_dir: PathBuf,
}

struct ActiveLogger {
    status: LoggingStatus,
    _handle: LoggerHandle,
}

/// Starts rolling-file logging under `log_dir`.
///
/// # Errors
/// - `InvalidDirectory` when `log_dir` is empty or relative.
/// - `AlreadyActive` when a logger with another level or directory runs.
/// - `CreateDirectory` / `Backend` when the logger cannot be set up.
pub fn start_logging(level: LogLevel, log_dir: &Path) -> Result<(), LoggingError> {
    let log_dir = checked_log_dir(log_dir)?;
    let active = ACTIVE_LOGGER.get_or_try_init(|| spawn_logger(level, &log_dir))?;
    ensure_same(&active.status, level, &log_dir)
}

/// String-typed entry point for the FFI; errors are rendered messages.
pub fn init_logging(level: &str, log_dir: &str) -> Result<(), String> {
    let parsed = LogLevel::parse(level)
        .ok_or_else(|| LoggingError::UnsupportedLevel(level.trim().to_string()).to_string())?;
    start_logging(parsed, Path::new(log_dir.trim())).map_err(|err| err.to_string())
}

/// `None` until logging has been started.
pub fn logging_status() -> Option<LoggingStatus> {
    ACTIVE_LOGGER.get().map(|active| active.status.clone())
}

fn checked_log_dir(log_dir: &Path) -> Result<PathBuf, LoggingError> {
    if log_dir.as_os_str().is_empty() {
        return Err(LoggingError::InvalidDirectory(
            "log directory cannot be empty".to_string(),
        ));
    }
    if !log_dir.is_absolute() {
        return Err(LoggingError::InvalidDirectory(format!(
            "log directory must be an absolute path, got `{}`",
            log_dir.display()
        )));
    }
    Ok(log_dir.to_path_buf())
}

fn ensure_same(active: &LoggingStatus, level: LogLevel, log_dir: &Path) -> Result<(), LoggingError> {
    if active.log_dir != log_dir {
        return Err(LoggingError::AlreadyActive {
            setting: "directory",
            active: active.log_dir.display().to_string(),
            requested: log_dir.display().to_string(),
        });
    }
    if active.level != level {
        return Err(LoggingError::AlreadyActive {
            setting: "level",
            active: active.level.as_str().to_string(),
            requested: level.as_str().to_string(),
        });
    }
    Ok(())
}

fn spawn_logger(level: LogLevel, log_dir: &Path) -> Result<ActiveLogger, LoggingError> {
    std::fs::create_dir_all(log_dir).map_err(|source| LoggingError::CreateDirectory {
        dir: log_dir.to_path_buf(),
        source,
    })?;

    let handle = Logger::try_with_str(level.as_str())
        .map_err(|err| LoggingError::Backend(err.to_string()))?
        .log_to_file(
            FileSpec::default()
                .directory(log_dir)
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(MAX_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(|err| LoggingError::Backend(err.to_string()))?;

    install_panic_hook();
    info!(
        "event=app_start module=core status=ok platform={} debug_build={} version={} schema_version={}",
        std::env::consts::OS,
        cfg!(debug_assertions),
        env!("CARGO_PKG_VERSION"),
        latest_version()
    );
    info!(
        "event=logging_init module=core status=ok level={} log_dir={}",
        level.as_str(),
        log_dir.display()
    );

    Ok(ActiveLogger {
        status: LoggingStatus {
            level,
            log_dir: log_dir.to_path_buf(),
        },
        _handle: handle,
    })
}

fn install_panic_hook() {
    PANIC_HOOK.get_or_init(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let location = info.location().map_or_else(
                || "unknown".to_string(),
                |loc| format!("{}:{}", loc.file(), loc.line()),
            );
            error!(
                "event=panic_captured module=core status=error location={location} payload={}",
                flatten_payload(payload_text(info.payload()), MAX_PANIC_PAYLOAD_CHARS)
            );
            previous(info);
        }));
    });
}

fn payload_text(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

/// Joins all whitespace runs into single spaces and caps the length.
fn flatten_payload(text: &str, max_chars: usize) -> String {
    let mut words = text.split_whitespace();
    let mut flat = String::new();
    if let Some(first) = words.next() {
        flat.push_str(first);
        for word in words {
            flat.push(' ');
            flat.push_str(word);
        }
    }
    if flat.chars().count() <= max_chars {
        return flat;
    }
    let mut capped: String = flat.chars().take(max_chars).collect();
    capped.push_str("...");
    capped
}

#[cfg(test)]
mod tests {
    use super::{
        flatten_payload, logging_status, payload_text, start_logging, LogLevel, LoggingError,
    };
    use std::any::Any;
    use std::path::Path;

    #[test]
    fn log_level_parse_accepts_aliases() {
        assert_eq!(LogLevel::parse(" WARNING "), Some(LogLevel::Warn));
        assert_eq!(LogLevel::parse("Info"), Some(LogLevel::Info));
        assert_eq!(LogLevel::parse("verbose"), None);
        assert_eq!(LogLevel::Trace.as_str(), "trace");
    }

    #[test]
    fn relative_and_empty_directories_are_rejected() {
        for dir in ["", "logs/dev"] {
            let err = start_logging(LogLevel::Info, Path::new(dir))
                .expect_err("directory must be absolute");
            assert!(matches!(err, LoggingError::InvalidDirectory(_)));
        }
    }

    #[test]
    fn panic_payloads_are_flattened_and_capped() {
        let owned: Box<dyn Any + Send> = Box::new(String::from("entry\n\ttitle  leaked"));
        assert_eq!(
            flatten_payload(payload_text(owned.as_ref()), 160),
            "entry title leaked"
        );

        let number: Box<dyn Any + Send> = Box::new(7_u8);
        assert_eq!(payload_text(number.as_ref()), "non-string panic payload");

        let capped = flatten_payload("abcdefghij", 4);
        assert_eq!(capped, "abcd...");
    }

    #[test]
    fn logger_starts_once_and_rejects_reconfiguration() {
        let log_dir = tempfile::Builder::new()
            .prefix("soulscript-logs")
            .tempdir()
            .expect("create log dir")
            .keep();
        let other_dir = log_dir.join("nested");

        start_logging(LogLevel::Info, &log_dir).expect("first start");
        start_logging(LogLevel::Info, &log_dir).expect("same settings are a no-op");

        let level_err =
            start_logging(LogLevel::Debug, &log_dir).expect_err("level switch must fail");
        assert!(matches!(
            level_err,
            LoggingError::AlreadyActive {
                setting: "level",
                ..
            }
        ));
        let dir_err =
            start_logging(LogLevel::Info, &other_dir).expect_err("directory switch must fail");
        assert!(matches!(
            dir_err,
            LoggingError::AlreadyActive {
                setting: "directory",
                ..
            }
        ));

        let status = logging_status().expect("logger should be running");
        assert_eq!(status.level, LogLevel::Info);
        assert_eq!(status.log_dir, log_dir);
    }
}
