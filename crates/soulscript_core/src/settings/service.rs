//! Settings service over the shared connection.

use crate::db::SharedConnection;
use crate::repo::settings_repo::{SettingValue, SettingsRepository, SqliteSettingsRepository};
use crate::security::passcode;
use crate::settings::{
    ReminderTime, Settings, SettingsError, SettingsResult, ThemeOption, DEFAULT_REMINDER_TIME,
};
use log::{info, warn};
use rusqlite::Connection;
use std::collections::BTreeMap;
use std::sync::{Arc, MutexGuard};
use tokio::sync::watch;

const KEY_THEME: &str = "theme_option";
const KEY_NOTIFICATIONS: &str = "enable_notifications";
const KEY_USER_NAME: &str = "user_name";
const KEY_ONBOARDING: &str = "onboarding_completed";
const KEY_REMINDER_HOUR: &str = "reminder_hour";
const KEY_REMINDER_MINUTE: &str = "reminder_minute";
const KEY_PASSCODE_HASH: &str = "passcode_hash";

/// Injected preference service; clone to share.
#[derive(Clone)]
pub struct SettingsService {
    inner: Arc<SettingsInner>,
}

struct SettingsInner {
    conn: SharedConnection,
    settings_tx: watch::Sender<Settings>,
}

impl SettingsService {
    /// Loads stored preferences and starts publishing snapshots.
    pub fn open(conn: SharedConnection) -> SettingsResult<Self> {
        let settings = {
            let guard = lock(&conn)?;
            load_settings(&guard)?
        };
        let (settings_tx, _) = watch::channel(settings);
        Ok(Self {
            inner: Arc::new(SettingsInner { conn, settings_tx }),
        })
    }

    pub fn current(&self) -> Settings {
        self.inner.settings_tx.borrow().clone()
    }

    /// Receiver replaying the current snapshot, then every change.
    pub fn subscribe(&self) -> watch::Receiver<Settings> {
        self.inner.settings_tx.subscribe()
    }

    pub fn set_theme(&self, theme: ThemeOption) -> SettingsResult<()> {
        self.put(
            "theme",
            &[(KEY_THEME, SettingValue::Text(theme.as_str().to_string()))],
        )
    }

    pub fn set_notifications_enabled(&self, enabled: bool) -> SettingsResult<()> {
        self.put("notifications", &[(KEY_NOTIFICATIONS, enabled.into())])
    }

    pub fn set_user_name(&self, name: &str) -> SettingsResult<()> {
        self.put(
            "user_name",
            &[(KEY_USER_NAME, SettingValue::Text(name.trim().to_string()))],
        )
    }

    /// Stores the user name and marks onboarding done in one write.
    pub fn complete_onboarding(&self, name: &str) -> SettingsResult<()> {
        self.put(
            "onboarding",
            &[
                (KEY_USER_NAME, SettingValue::Text(name.trim().to_string())),
                (KEY_ONBOARDING, true.into()),
            ],
        )
    }

    /// # Errors
    /// - `InvalidReminderTime` unless `hour <= 23` and `minute <= 59`.
    pub fn set_reminder_time(&self, hour: u8, minute: u8) -> SettingsResult<()> {
        let time = ReminderTime::new(hour, minute)
            .ok_or(SettingsError::InvalidReminderTime { hour, minute })?;
        self.put(
            "reminder_time",
            &[
                (KEY_REMINDER_HOUR, SettingValue::Integer(i64::from(time.hour()))),
                (KEY_REMINDER_MINUTE, SettingValue::Integer(i64::from(time.minute()))),
            ],
        )
    }

    /// Enables the app lock with a four-digit passcode.
    pub fn set_passcode(&self, code: &str) -> SettingsResult<()> {
        let hash = passcode::hash_passcode(code)?;
        self.put("passcode", &[(KEY_PASSCODE_HASH, SettingValue::Blob(hash))])
    }

    /// Disables the app lock.
    pub fn clear_passcode(&self) -> SettingsResult<()> {
        let guard = lock(&self.inner.conn)?;
        SqliteSettingsRepository::new(&guard).remove_value(KEY_PASSCODE_HASH)?;
        self.publish(&guard, "clear_passcode")
    }

    /// Checks `code` against the stored passcode.
    ///
    /// Returns `Ok(false)` when no passcode is set.
    pub fn verify_passcode(&self, code: &str) -> SettingsResult<bool> {
        let stored = {
            let guard = lock(&self.inner.conn)?;
            SqliteSettingsRepository::new(&guard).get_value(KEY_PASSCODE_HASH)?
        };
        let Some(hash) = stored.as_ref().and_then(SettingValue::as_blob) else {
            return Ok(false);
        };
        let matched = passcode::verify_passcode(code, hash)?;
        if !matched {
            info!("event=passcode_verify module=settings status=mismatch");
        }
        Ok(matched)
    }

    fn put(&self, op: &'static str, values: &[(&str, SettingValue)]) -> SettingsResult<()> {
        let guard = lock(&self.inner.conn)?;
        SqliteSettingsRepository::new(&guard).put_values(values)?;
        self.publish(&guard, op)
    }

    fn publish(&self, conn: &Connection, op: &'static str) -> SettingsResult<()> {
        let settings = load_settings(conn)?;
        self.inner.settings_tx.send_if_modified(|current| {
            if *current == settings {
                return false;
            }
            *current = settings;
            true
        });
        info!("event=settings_write module=settings status=ok op={op}");
        Ok(())
    }
}

fn lock(conn: &SharedConnection) -> SettingsResult<MutexGuard<'_, Connection>> {
    conn.lock().map_err(|_| SettingsError::LockPoisoned)
}

fn load_settings(conn: &Connection) -> SettingsResult<Settings> {
    let values = SqliteSettingsRepository::new(conn).load_all()?;
    Ok(settings_from_values(&values))
}

fn settings_from_values(values: &BTreeMap<String, SettingValue>) -> Settings {
    let theme = match values.get(KEY_THEME).and_then(SettingValue::as_text) {
        Some(raw) => ThemeOption::parse(raw).unwrap_or_else(|| {
            warn!("event=settings_load module=settings status=fallback key={KEY_THEME}");
            ThemeOption::default()
        }),
        None => ThemeOption::default(),
    };

    let reminder_time = match (
        integer(values, KEY_REMINDER_HOUR),
        integer(values, KEY_REMINDER_MINUTE),
    ) {
        (None, None) => DEFAULT_REMINDER_TIME,
        (hour, minute) => {
            let hour = hour.unwrap_or(i64::from(DEFAULT_REMINDER_TIME.hour()));
            let minute = minute.unwrap_or(i64::from(DEFAULT_REMINDER_TIME.minute()));
            u8::try_from(hour)
                .ok()
                .zip(u8::try_from(minute).ok())
                .and_then(|(hour, minute)| ReminderTime::new(hour, minute))
                .unwrap_or_else(|| {
                    warn!("event=settings_load module=settings status=fallback key=reminder_time");
                    DEFAULT_REMINDER_TIME
                })
        }
    };

    Settings {
        theme,
        notifications_enabled: integer(values, KEY_NOTIFICATIONS).is_some_and(|value| value != 0),
        user_name: values
            .get(KEY_USER_NAME)
            .and_then(SettingValue::as_text)
            .unwrap_or_default()
            .to_string(),
        onboarding_completed: integer(values, KEY_ONBOARDING).is_some_and(|value| value != 0),
        reminder_time,
        app_lock_enabled: values
            .get(KEY_PASSCODE_HASH)
            .and_then(SettingValue::as_blob)
            .is_some(),
    }
}

fn integer(values: &BTreeMap<String, SettingValue>, key: &str) -> Option<i64> {
    values.get(key).and_then(SettingValue::as_integer)
}

#[cfg(test)]
mod tests {
    use super::{settings_from_values, KEY_REMINDER_HOUR, KEY_THEME};
    use crate::repo::settings_repo::SettingValue;
    use crate::settings::{ThemeOption, DEFAULT_REMINDER_TIME};
    use std::collections::BTreeMap;

    #[test]
    fn empty_store_yields_defaults() {
        let settings = settings_from_values(&BTreeMap::new());
        assert_eq!(settings.theme, ThemeOption::System);
        assert_eq!(settings.reminder_time, DEFAULT_REMINDER_TIME);
        assert!(!settings.notifications_enabled);
        assert!(!settings.app_lock_enabled);
        assert!(settings.user_name.is_empty());
    }

    #[test]
    fn unreadable_values_fall_back() {
        let mut values = BTreeMap::new();
        values.insert(KEY_THEME.to_string(), SettingValue::Text("Purple".to_string()));
        values.insert(KEY_REMINDER_HOUR.to_string(), SettingValue::Integer(42));
        let settings = settings_from_values(&values);
        assert_eq!(settings.theme, ThemeOption::System);
        assert_eq!(settings.reminder_time, DEFAULT_REMINDER_TIME);
    }
}
