//! Printing and saving results.

use std::path::Path;

use ml_widgets::Journal;
use serde::Serialize;

/// Writes `value` as pretty-printed JSON to `path`, if there is one.
pub fn save_json<T: Serialize>(value: &T, path: Option<&Path>) -> Result<(), String> {
    let Some(path) = path else {
        return Ok(());
    };
    let json = serde_json::to_string_pretty(value).map_err(|e| e.to_string())?;
    std::fs::write(path, json).map_err(|e| e.to_string())?;
    ftlog::info!("Wrote snapshot to {}", path.display());
    println!("Snapshot written to {}", path.display());
    Ok(())
}

/// Prints the journal, oldest entry first.
pub fn print_journal(journal: &Journal) {
    for entry in journal.entries() {
        println!("{entry}");
    }
}
