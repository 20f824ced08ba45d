//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `soulscript_core` linkage.
//! - Optionally dump statistics of an existing journal database as JSON.

use soulscript_core::db::open_db;
use soulscript_core::{aggregate, EntryRepository, SqliteEntryRepository, SystemCalendar};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("soulscript_core ping={}", soulscript_core::ping());
    println!("soulscript_core version={}", soulscript_core::core_version());

    let Some(db_path) = std::env::args().nth(1) else {
        return ExitCode::SUCCESS;
    };
    match dump_stats(&db_path) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("soulscript: {err}");
            ExitCode::FAILURE
        }
    }
}

fn dump_stats(db_path: &str) -> Result<String, Box<dyn std::error::Error>> {
    let conn = open_db(db_path)?;
    let entries = SqliteEntryRepository::new(&conn).list_entries()?;
    let stats = aggregate(&entries, &SystemCalendar);
    Ok(serde_json::to_string_pretty(&stats)?)
}
