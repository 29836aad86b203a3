//! CLI command implementations.

pub mod delete;
pub mod list;
pub mod remote;
pub mod seed;
pub mod stats;
pub mod top;
pub mod transfer;
pub mod verify;

use campus_core::{CoreResult, Database};
use std::path::Path;
use thiserror::Error;
use tracing::warn;

/// Errors reported by commands beyond the library errors they pass on.
#[derive(Debug, Error)]
pub enum CliError {
    /// The data directory already holds records.
    #[error("{0} already holds data; pass --force to replace it")]
    NotEmpty(String),

    /// A destructive command was not confirmed.
    #[error("refusing to {0} without --yes")]
    NotConfirmed(&'static str),

    /// Integrity check found problems.
    #[error("verification failed with {0} violation(s)")]
    VerificationFailed(usize),
}

/// Opens the database in `path`, logging any recovered load issues.
pub fn open(path: &Path) -> CoreResult<Database> {
    let db = Database::open(path)?;
    for issue in &db.load_report().issues {
        warn!(%issue, "stored data was partly unreadable");
    }
    Ok(db)
}
