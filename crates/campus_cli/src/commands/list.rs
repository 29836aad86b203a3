//! List command implementation.

use super::open;
use crate::Format;
use campus_core::views::format_average;
use campus_core::{EntityKind, Registry};
use std::path::Path;

/// Prints the records of one kind, optionally filtered by name.
pub fn run(
    path: &Path,
    kind: EntityKind,
    search: Option<&str>,
    format: Format,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = open(path)?;
    let registry = db.registry();
    let query = search.unwrap_or("");

    match format {
        Format::Json => println!("{}", to_json(registry, kind, query)?),
        Format::Text => print_text_output(registry, kind, query),
    }
    Ok(())
}

fn department_matches(name: &str, query: &str) -> bool {
    name.to_lowercase().contains(&query.to_lowercase())
}

fn to_json(registry: &Registry, kind: EntityKind, query: &str) -> serde_json::Result<String> {
    match kind {
        EntityKind::Student => serde_json::to_string_pretty(&registry.search_students(query)),
        EntityKind::Faculty => serde_json::to_string_pretty(&registry.search_faculty(query)),
        EntityKind::Course => serde_json::to_string_pretty(&registry.search_courses(query)),
        EntityKind::Department => {
            let departments: Vec<_> = registry
                .departments()
                .iter()
                .filter(|d| department_matches(&d.name, query))
                .collect();
            serde_json::to_string_pretty(&departments)
        }
    }
}

fn print_text_output(registry: &Registry, kind: EntityKind, query: &str) {
    match kind {
        EntityKind::Student => {
            for s in registry.search_students(query) {
                println!(
                    "{:<8} {:<24} {:>3} {:<8} {:<24} {} course(s), avg {}",
                    s.id,
                    s.name,
                    s.age,
                    s.gender,
                    s.department,
                    s.courses.len(),
                    format_average(s.average_score())
                );
            }
        }
        EntityKind::Faculty => {
            for f in registry.search_faculty(query) {
                println!(
                    "{:<8} {:<24} {:<24} {}",
                    f.id,
                    f.name,
                    f.department,
                    f.courses_taught.join(", ")
                );
            }
        }
        EntityKind::Course => {
            for c in registry.search_courses(query) {
                let faculty = c
                    .assigned_faculty
                    .as_deref()
                    .and_then(|id| registry.name_of(EntityKind::Faculty, id))
                    .unwrap_or("N/A");
                println!(
                    "{:<8} {:<32} {} cr  {:<24} {} student(s)",
                    c.id,
                    c.name,
                    c.credit_hours,
                    faculty,
                    c.enrolled_students.len()
                );
            }
        }
        EntityKind::Department => {
            for d in registry
                .departments()
                .iter()
                .filter(|d| department_matches(&d.name, query))
            {
                println!(
                    "{:<8} {:<28} {:<24} {}",
                    d.id,
                    d.name,
                    d.head_of_department,
                    d.courses.join(", ")
                );
            }
        }
    }
}
