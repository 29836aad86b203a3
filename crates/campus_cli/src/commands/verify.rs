//! Verify command implementation.

use super::{open, CliError};
use std::path::Path;

/// Checks cross-reference integrity and fails if anything is off.
pub fn run(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    println!("Verifying data at {:?}", path);
    println!();

    let db = open(path)?;
    let report = db.load_report();
    if !report.is_clean() {
        println!("Load recovered from {} problem(s):", report.issues.len());
        for issue in &report.issues {
            println!("  {issue}");
        }
    }

    let violations = db.check_integrity();
    for violation in &violations {
        println!("  {violation}");
    }

    println!();
    if violations.is_empty() && report.is_clean() {
        println!("✓ Verification passed");
        Ok(())
    } else {
        println!("✗ Verification failed");
        Err(CliError::VerificationFailed(violations.len() + report.issues.len()).into())
    }
}
