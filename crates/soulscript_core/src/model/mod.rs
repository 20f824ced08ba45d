//! Journal domain model.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep mood display metadata in one closed lookup table.
//!
//! # Invariants
//! - Every persisted entry is identified by a positive `EntryId`.
//! - Mood labels are stored verbatim; unknown labels are displayed with a
//!   fallback, never rejected.

pub mod entry;
pub mod mood;
