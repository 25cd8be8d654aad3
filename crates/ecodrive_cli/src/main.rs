//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `ecodrive_core` linkage.
//! - Optionally open a database file and report per-collection record counts.
//! - Keep output deterministic for quick local sanity checks.

use ecodrive_core::db::open_db;
use ecodrive_core::store::get_item;
use ecodrive_core::{initialize_storage, CollectionKey, SqliteKeyValueStore};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("ecodrive_core ping={}", ecodrive_core::ping());
    println!("ecodrive_core version={}", ecodrive_core::core_version());

    let Some(db_path) = std::env::args().nth(1) else {
        return ExitCode::SUCCESS;
    };
    match report_counts(&db_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("ecodrive_core db={db_path} error={err}");
            ExitCode::FAILURE
        }
    }
}

fn report_counts(db_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let conn = open_db(db_path)?;
    let store = SqliteKeyValueStore::try_new(&conn)?;
    initialize_storage(&store)?;

    for key in CollectionKey::ALL {
        let count = get_item::<Vec<serde_json::Value>, _>(&store, key.as_str())
            .map_or(0, |items| items.len());
        println!("ecodrive_core collection={key} count={count}");
    }
    Ok(())
}
