//! Stats command implementation.

use super::open;
use crate::Format;
use campus_core::views::{self, DepartmentStats, Summary};
use campus_core::StatsSnapshot;
use serde::Serialize;
use std::path::Path;

/// Stats command result.
#[derive(Debug, Serialize)]
pub struct StatsResult {
    /// Data directory.
    pub path: String,
    /// Dashboard summary.
    pub summary: Summary,
    /// Per-department counts (if requested).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub departments: Option<Vec<DepartmentStats>>,
    /// Counters of this session.
    pub counters: StatsSnapshot,
}

/// Runs the stats command.
pub fn run(path: &Path, show_departments: bool, format: Format) -> Result<(), Box<dyn std::error::Error>> {
    let db = open(path)?;
    let result = StatsResult {
        path: path.display().to_string(),
        summary: db.summary(),
        departments: show_departments.then(|| views::department_breakdown(db.registry())),
        counters: db.stats(),
    };

    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        Format::Text => print_text_output(&result),
    }
    Ok(())
}

fn print_text_output(result: &StatsResult) {
    let summary = &result.summary;
    println!("{}", summary.university);
    if !summary.address.is_empty() {
        println!("{}", summary.address);
    }
    println!();
    println!("Students:       {}", summary.students);
    println!("Faculty:        {}", summary.faculty);
    println!("Courses:        {}", summary.courses);
    println!("Departments:    {}", summary.departments);
    println!("Average score:  {}", views::format_average(summary.average_score));

    if let Some(departments) = &result.departments {
        println!();
        println!("{:<10} {:<28} {:>8} {:>8} {:>8}", "ID", "Department", "Students", "Faculty", "Courses");
        for d in departments {
            println!(
                "{:<10} {:<28} {:>8} {:>8} {:>8}",
                d.id, d.name, d.students, d.faculty, d.courses
            );
        }
    }
}
