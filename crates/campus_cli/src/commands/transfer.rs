//! Export and import commands.

use super::open;
use campus_codec::Workbook;
use std::fs;
use std::path::Path;
use tracing::info;

/// Writes the flat CSV report to `output`, or stdout.
pub fn export_csv(path: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let db = open(path)?;
    let report = db.export_report();
    match output {
        Some(file) => {
            fs::write(file, &report)?;
            info!(file = %file.display(), lines = report.lines().count(), "exported report");
        }
        None => print!("{report}"),
    }
    Ok(())
}

/// Writes all tables, or the summary tables, as a workbook document.
pub fn export_workbook(path: &Path, output: &Path, summary: bool) -> Result<(), Box<dyn std::error::Error>> {
    let db = open(path)?;
    let workbook = if summary {
        db.summary_workbook()
    } else {
        db.export_workbook()
    };
    let bytes = workbook.to_bytes()?;
    fs::write(output, &bytes)?;
    println!(
        "Wrote {} sheet(s) to {} ({} bytes)",
        workbook.len(),
        output.display(),
        bytes.len()
    );
    Ok(())
}

/// Applies the tables found in a workbook document.
pub fn import_workbook(path: &Path, input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let workbook = Workbook::from_bytes(&fs::read(input)?)?;
    let mut db = open(path)?;
    let applied = db.import_workbook(&workbook)?;
    db.flush()?;

    if applied.is_empty() {
        println!("No tables with data found in {}", input.display());
    } else {
        let names: Vec<&str> = applied.iter().map(|t| t.as_str()).collect();
        println!("Imported {}", names.join(", "));
    }
    Ok(())
}
