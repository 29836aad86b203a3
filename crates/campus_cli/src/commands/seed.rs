//! Seed and clear commands.

use super::{open, CliError};
use std::path::Path;

/// Loads the demonstration dataset into `path`.
pub fn run(path: &Path, force: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut db = open(path)?;
    if !db.registry().is_empty() && !force {
        return Err(CliError::NotEmpty(path.display().to_string()).into());
    }

    db.load_sample();
    db.flush()?;

    let summary = db.summary();
    println!(
        "Seeded {}: {} students, {} faculty, {} courses, {} departments",
        summary.university, summary.students, summary.faculty, summary.courses, summary.departments
    );
    Ok(())
}

/// Removes every record from `path`.
pub fn clear(path: &Path, yes: bool) -> Result<(), Box<dyn std::error::Error>> {
    if !yes {
        return Err(CliError::NotConfirmed("clear all data").into());
    }
    let mut db = open(path)?;
    db.clear();
    db.flush()?;
    println!("All data cleared");
    Ok(())
}
