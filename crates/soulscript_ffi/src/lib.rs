//! Flutter-facing bridge over `soulscript_core`.

pub mod api;
