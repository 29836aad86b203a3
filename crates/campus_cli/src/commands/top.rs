//! Top students command.

use super::open;
use crate::Format;
use campus_core::views;
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct Ranked<'a> {
    rank: usize,
    id: &'a str,
    name: &'a str,
    department: &'a str,
    average: f64,
}

/// Prints the best `count` students, or the configured number.
pub fn run(path: &Path, count: Option<usize>, format: Format) -> Result<(), Box<dyn std::error::Error>> {
    let db = open(path)?;
    let count = count.unwrap_or(db.config().top_count);
    let ranked: Vec<Ranked<'_>> = views::top_students(db.registry().students(), count)
        .into_iter()
        .enumerate()
        .map(|(i, s)| Ranked {
            rank: i + 1,
            id: &s.id,
            name: &s.name,
            department: &s.department,
            average: s.average_score(),
        })
        .collect();

    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&ranked)?),
        Format::Text => {
            if ranked.is_empty() {
                println!("No students");
            }
            for r in &ranked {
                println!(
                    "{:>2}. {:<8} {:<24} {:<24} {}",
                    r.rank,
                    r.id,
                    r.name,
                    r.department,
                    views::format_average(r.average)
                );
            }
        }
    }
    Ok(())
}
