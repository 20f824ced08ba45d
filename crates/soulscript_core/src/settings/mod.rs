//! User preferences and app lock.
//!
//! # Responsibility
//! - Map the key-value `settings` table to a typed `Settings` snapshot.
//! - Publish a fresh snapshot to observers after every change.
//! - Compute the next daily reminder instant (delivery is platform work).
//!
//! # Invariants
//! - Missing or unreadable keys resolve to documented defaults.
//! - The passcode hash is stored but never exposed through `Settings`.

use crate::repo::RepoError;
use crate::security::passcode::PasscodeError;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

mod reminder;
mod service;

pub use reminder::next_reminder_at;
pub use service::SettingsService;

pub type SettingsResult<T> = Result<T, SettingsError>;

/// Default reminder: 20:00 local time.
pub const DEFAULT_REMINDER_TIME: ReminderTime = ReminderTime {
    hour: 20,
    minute: 0,
};

/// App color scheme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ThemeOption {
    Light,
    Dark,
    #[default]
    System,
}

impl ThemeOption {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "Light",
            Self::Dark => "Dark",
            Self::System => "System",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Light" => Some(Self::Light),
            "Dark" => Some(Self::Dark),
            "System" => Some(Self::System),
            _ => None,
        }
    }
}

/// Local wall-clock time of the daily writing reminder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderTime {
    hour: u8,
    minute: u8,
}

impl ReminderTime {
    /// Returns `None` unless `hour <= 23` and `minute <= 59`.
    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        (hour <= 23 && minute <= 59).then_some(Self { hour, minute })
    }

    pub fn hour(self) -> u8 {
        self.hour
    }

    pub fn minute(self) -> u8 {
        self.minute
    }
}

impl Default for ReminderTime {
    fn default() -> Self {
        DEFAULT_REMINDER_TIME
    }
}

/// Typed snapshot of every user preference.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Settings {
    pub theme: ThemeOption,
    pub notifications_enabled: bool,
    pub user_name: String,
    pub onboarding_completed: bool,
    pub reminder_time: ReminderTime,
    /// `true` once a passcode has been set.
    pub app_lock_enabled: bool,
}

#[derive(Debug)]
pub enum SettingsError {
    Repo(RepoError),
    Passcode(PasscodeError),
    InvalidReminderTime { hour: u8, minute: u8 },
    LockPoisoned,
}

impl Display for SettingsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Passcode(err) => write!(f, "{err}"),
            Self::InvalidReminderTime { hour, minute } => {
                write!(f, "invalid reminder time {hour:02}:{minute:02}")
            }
            Self::LockPoisoned => write!(f, "settings connection lock poisoned"),
        }
    }
}

impl Error for SettingsError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Passcode(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for SettingsError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<PasscodeError> for SettingsError {
    fn from(value: PasscodeError) -> Self {
        Self::Passcode(value)
    }
}
