//! App-lock secrets.
//!
//! # Invariants
//! - Plain passcodes never leave this module; storage only sees hashes.

pub mod passcode;
