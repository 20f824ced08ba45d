//! Reactive entry store.
//!
//! # Responsibility
//! - Serialize all journal writes through one shared connection.
//! - Publish a full, newest-first snapshot after every effective mutation.
//!
//! # Invariants
//! - Subscribers always observe snapshots in write order.
//! - A failed write publishes nothing.
//! - New subscribers immediately see the latest published snapshot.

use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod entry_store;

pub use entry_store::{EntrySnapshot, EntryStore, EntrySubscription};

pub type StoreResult<T> = Result<T, StoreError>;

/// Store-level error for async write paths and subscriptions.
#[derive(Debug)]
pub enum StoreError {
    Repo(RepoError),
    /// A previous writer panicked while holding the connection.
    LockPoisoned,
    /// The store was dropped while a subscriber was waiting.
    Closed,
    /// The blocking write task was cancelled or panicked.
    Join(String),
    /// Called outside of a tokio runtime.
    NoRuntime,
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::LockPoisoned => write!(f, "journal connection lock poisoned"),
            Self::Closed => write!(f, "journal store closed"),
            Self::Join(message) => write!(f, "journal write task failed: {message}"),
            Self::NoRuntime => write!(f, "no tokio runtime available"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<tokio::task::JoinError> for StoreError {
    fn from(value: tokio::task::JoinError) -> Self {
        Self::Join(value.to_string())
    }
}
