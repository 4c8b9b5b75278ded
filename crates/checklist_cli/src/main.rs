//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `checklist_core` linkage.
//! - Exercise one in-memory create/list round trip with deterministic output.

use checklist_core::db::open_db_in_memory;
use checklist_core::{ListController, MemoryPreferenceStore, SqliteItemRepository};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("checklist_core ping={}", checklist_core::ping());
    println!("checklist_core version={}", checklist_core::core_version());

    match smoke_round_trip() {
        Ok(header) => {
            println!("checklist_core store=ok header=\"{header}\"");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("checklist_core store=error error={err}");
            ExitCode::FAILURE
        }
    }
}

fn smoke_round_trip() -> Result<String, Box<dyn std::error::Error>> {
    let conn = open_db_in_memory()?;
    let prefs = MemoryPreferenceStore::default();
    let mut list = ListController::new(SqliteItemRepository::new(&conn), &prefs)?;

    list.submit_new_item("Milk")?;
    Ok(list.view().header)
}
