//! Application context wiring every service to one connection.
//!
//! # Responsibility
//! - Open the database once and hand the same connection to every service.
//! - Expose the injected calendar so all "today" logic agrees.

use crate::calendar::{Calendar, SystemCalendar};
use crate::config::{CoreConfig, DbLocation};
use crate::db::{open_db, open_db_in_memory, share, DbError};
use crate::service::entry_service::EntryService;
use crate::service::home_service::{build_home_feed, HomeFeed};
use crate::settings::{SettingsError, SettingsService};
use crate::stats::StatsFeed;
use crate::store::{EntryStore, StoreError};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Debug)]
pub enum CoreError {
    Db(DbError),
    Store(StoreError),
    Settings(SettingsError),
}

impl Display for CoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::Settings(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::Settings(err) => Some(err),
        }
    }
}

impl From<DbError> for CoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<StoreError> for CoreError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<SettingsError> for CoreError {
    fn from(value: SettingsError) -> Self {
        Self::Settings(value)
    }
}

/// Every long-lived service of one journal, sharing a connection.
#[derive(Clone)]
pub struct Journal {
    pub entries: EntryStore,
    pub settings: SettingsService,
    pub stats: StatsFeed,
    pub calendar: Arc<dyn Calendar>,
}

impl Journal {
    /// Opens the journal using the device clock and timezone.
    pub fn open(config: &CoreConfig) -> CoreResult<Self> {
        Self::open_with_calendar(config, Arc::new(SystemCalendar))
    }

    pub fn open_with_calendar(
        config: &CoreConfig,
        calendar: Arc<dyn Calendar>,
    ) -> CoreResult<Self> {
        let conn = match &config.db {
            DbLocation::File(path) => open_db(path)?,
            DbLocation::InMemory => open_db_in_memory()?,
        };
        let conn = share(conn);
        let entries = EntryStore::open(Arc::clone(&conn))?;
        let settings = SettingsService::open(conn)?;
        let stats = StatsFeed::new(&entries, Arc::clone(&calendar), config.stats_grace);
        info!(
            "event=journal_open module=core status=ok in_memory={}",
            config.db == DbLocation::InMemory
        );
        Ok(Self {
            entries,
            settings,
            stats,
            calendar,
        })
    }

    pub fn entry_service(&self) -> EntryService {
        EntryService::new(self.entries.clone(), Arc::clone(&self.calendar))
    }

    /// Home screen state for the current snapshot and settings.
    pub fn home_feed(&self) -> HomeFeed {
        let snapshot = self.entries.snapshot();
        let settings = self.settings.current();
        build_home_feed(&snapshot, &settings.user_name, self.calendar.as_ref())
    }
}
