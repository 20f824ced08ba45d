//! Key-value settings repository over the `settings` table.
//!
//! # Invariants
//! - Multi-key writes are applied in one transaction.
//! - Only text, integer and blob values are stored; anything else read back
//!   is treated as absent so callers fall back to defaults.

use crate::repo::RepoResult;
use log::warn;
use rusqlite::types::{ToSqlOutput, Value, ValueRef};
use rusqlite::{params, Connection, ToSql};
use std::collections::BTreeMap;

/// One stored preference value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingValue {
    Text(String),
    Integer(i64),
    Blob(Vec<u8>),
}

impl SettingValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_blob(&self) -> Option<&[u8]> {
        match self {
            Self::Blob(value) => Some(value.as_slice()),
            _ => None,
        }
    }
}

impl From<bool> for SettingValue {
    fn from(value: bool) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl ToSql for SettingValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Self::Text(value) => ToSqlOutput::Borrowed(ValueRef::Text(value.as_bytes())),
            Self::Integer(value) => ToSqlOutput::Owned(Value::Integer(*value)),
            Self::Blob(value) => ToSqlOutput::Borrowed(ValueRef::Blob(value.as_slice())),
        })
    }
}

/// Repository interface for preference storage.
pub trait SettingsRepository {
    fn get_value(&self, key: &str) -> RepoResult<Option<SettingValue>>;
    /// Upserts all pairs atomically.
    fn put_values(&self, values: &[(&str, SettingValue)]) -> RepoResult<()>;
    /// Returns `false` when the key was not stored.
    fn remove_value(&self, key: &str) -> RepoResult<bool>;
    fn load_all(&self) -> RepoResult<BTreeMap<String, SettingValue>>;
}

/// SQLite-backed settings repository.
pub struct SqliteSettingsRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSettingsRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl SettingsRepository for SqliteSettingsRepository<'_> {
    fn get_value(&self, key: &str) -> RepoResult<Option<SettingValue>> {
        let mut stmt = self
            .conn
            .prepare("SELECT value FROM settings WHERE key = ?1;")?;
        let mut rows = stmt.query([key])?;
        if let Some(row) = rows.next()? {
            let value: Value = row.get(0)?;
            return Ok(decode_value(key, value));
        }
        Ok(None)
    }

    fn put_values(&self, values: &[(&str, SettingValue)]) -> RepoResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        for (key, value) in values {
            tx.execute(
                "INSERT INTO settings (key, value, updated_at)
                 VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
                 ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = excluded.updated_at;",
                params![key, value],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    fn remove_value(&self, key: &str) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM settings WHERE key = ?1;", [key])?;
        Ok(changed > 0)
    }

    fn load_all(&self) -> RepoResult<BTreeMap<String, SettingValue>> {
        let mut stmt = self
            .conn
            .prepare("SELECT key, value FROM settings ORDER BY key ASC;")?;
        let mut rows = stmt.query([])?;
        let mut values = BTreeMap::new();
        while let Some(row) = rows.next()? {
            let key: String = row.get(0)?;
            let value: Value = row.get(1)?;
            if let Some(decoded) = decode_value(&key, value) {
                values.insert(key, decoded);
            }
        }
        Ok(values)
    }
}

fn decode_value(key: &str, value: Value) -> Option<SettingValue> {
    match value {
        Value::Text(text) => Some(SettingValue::Text(text)),
        Value::Integer(number) => Some(SettingValue::Integer(number)),
        Value::Blob(bytes) => Some(SettingValue::Blob(bytes)),
        Value::Null | Value::Real(_) => {
            warn!("event=settings_load module=settings status=fallback key={key} reason=unsupported_type");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{SettingValue, SettingsRepository, SqliteSettingsRepository};
    use crate::db::open_db_in_memory;

    #[test]
    fn unsupported_value_types_read_as_absent() {
        let conn = open_db_in_memory().expect("open db");
        conn.execute_batch(
            "INSERT INTO settings (key, value, updated_at) VALUES
                ('reminder_hour', 20.5, 0),
                ('user_name', NULL, 0),
                ('theme_option', 'Dark', 0);",
        )
        .expect("seed settings");
        let repo = SqliteSettingsRepository::new(&conn);

        let values = repo.load_all().expect("load_all should skip bad values");
        assert_eq!(values.len(), 1);
        assert_eq!(
            values.get("theme_option"),
            Some(&SettingValue::Text("Dark".to_string()))
        );
        assert_eq!(repo.get_value("reminder_hour").expect("get_value"), None);
    }

    #[test]
    fn put_values_upserts_every_pair() {
        let conn = open_db_in_memory().expect("open db");
        let repo = SqliteSettingsRepository::new(&conn);

        repo.put_values(&[("a", SettingValue::Integer(1)), ("b", true.into())])
            .expect("first put");
        repo.put_values(&[("a", SettingValue::Blob(vec![7, 8]))])
            .expect("second put");

        assert_eq!(
            repo.get_value("a").expect("get a"),
            Some(SettingValue::Blob(vec![7, 8]))
        );
        assert_eq!(
            repo.get_value("b").expect("get b"),
            Some(SettingValue::Integer(1))
        );
        assert!(repo.remove_value("a").expect("remove"));
        assert!(!repo.remove_value("a").expect("remove again"));
    }
}
