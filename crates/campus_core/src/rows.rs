//! Mapping between collections and tables.
//!
//! Shared by the workbook document codec and the remote tabular codec.
//!
//! # Row Convention
//!
//! - Row 1 is the header, see [`TableName::header`]
//! - Column 0 is the identifier, scalar fields follow in declared order
//! - List fields are comma-joined identifiers in one cell
//! - A student's grades are a JSON object in one cell
//! - Missing trailing cells read as empty
//! - A table with fewer than two rows carries no data and leaves its
//!   collection alone
//! - Fully blank rows are skipped
//! - Any unparsable cell rejects the whole table

use crate::entity::{Course, Department, Faculty, Grades, Record, Student, University};
use crate::error::{CoreError, CoreResult};
use crate::registry::{Collection, Registry};
use campus_codec::{join_list, split_list, Table, TableName, Workbook};
use std::collections::HashSet;
use tracing::debug;

/// Builds the table for `name` from the registry.
#[must_use]
pub fn to_table(registry: &Registry, name: TableName) -> Table {
    let mut table = Table::with_header(name.header().iter().copied());
    match name {
        TableName::Students => {
            for s in registry.students() {
                table.push_row([
                    s.id.clone(),
                    s.name.clone(),
                    s.age.to_string(),
                    s.gender.clone(),
                    s.department.clone(),
                    join_list(&s.courses),
                    grades_cell(&s.grades),
                ]);
            }
        }
        TableName::Faculty => {
            for f in registry.faculty() {
                table.push_row([
                    f.id.clone(),
                    f.name.clone(),
                    f.department.clone(),
                    join_list(&f.courses_taught),
                ]);
            }
        }
        TableName::Courses => {
            for c in registry.courses() {
                table.push_row([
                    c.id.clone(),
                    c.name.clone(),
                    c.credit_hours.to_string(),
                    c.assigned_faculty.clone().unwrap_or_default(),
                    join_list(&c.enrolled_students),
                ]);
            }
        }
        TableName::Departments => {
            for d in registry.departments() {
                table.push_row([
                    d.id.clone(),
                    d.name.clone(),
                    d.head_of_department.clone(),
                    join_list(&d.courses),
                ]);
            }
        }
        TableName::University => {
            let u = registry.university();
            table.push_row([u.name.clone(), u.address.clone()]);
        }
    }
    table
}

/// Builds a workbook holding all five tables.
#[must_use]
pub fn to_workbook(registry: &Registry) -> Workbook {
    let mut workbook = Workbook::new();
    for name in TableName::ALL {
        workbook.insert_table(name, to_table(registry, name));
    }
    workbook
}

/// Parses a table into a collection.
///
/// Returns `Ok(None)` if the table carries no data.
///
/// # Errors
///
/// Returns `MalformedRow` for the first row that does not parse.
pub fn parse_table(name: TableName, table: &Table) -> CoreResult<Option<Collection>> {
    if !table.has_data() {
        return Ok(None);
    }

    // Header is row 1, so data row `i` is row `i + 2`.
    let rows = table
        .data_rows()
        .iter()
        .enumerate()
        .filter(|(_, row)| row.iter().any(|cell| !cell.trim().is_empty()))
        .map(|(i, row)| (i + 2, row.as_slice()));

    let collection = match name {
        TableName::Students => Collection::Students(parse_records(name, rows, parse_student)?),
        TableName::Faculty => Collection::Faculty(parse_records(name, rows, parse_faculty)?),
        TableName::Courses => Collection::Courses(parse_records(name, rows, parse_course)?),
        TableName::Departments => {
            Collection::Departments(parse_records(name, rows, parse_department)?)
        }
        TableName::University => {
            let row = &table.data_rows()[0];
            Collection::University(University::new(cell(row, 0), cell(row, 1)))
        }
    };
    debug!(table = %name, records = collection.len(), "parsed table");
    Ok(Some(collection))
}

/// Applies every schema table present in `workbook` to the registry.
///
/// All tables are parsed before any is applied, so a malformed table leaves
/// the registry untouched. Returns the tables that were applied.
///
/// # Errors
///
/// Returns `MalformedRow` for the first row that does not parse.
pub fn import_workbook(registry: &mut Registry, workbook: &Workbook) -> CoreResult<Vec<TableName>> {
    let mut parsed = Vec::new();
    for name in TableName::ALL {
        if let Some(table) = workbook.table(name) {
            if let Some(collection) = parse_table(name, table)? {
                parsed.push(collection);
            }
        }
    }

    let applied = parsed.iter().map(Collection::table).collect();
    for collection in parsed {
        registry.restore(collection);
    }
    Ok(applied)
}

fn parse_records<'a, T, I, F>(table: TableName, rows: I, parse: F) -> CoreResult<Vec<T>>
where
    T: Record,
    I: Iterator<Item = (usize, &'a [String])>,
    F: Fn(&[String]) -> Result<T, String>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for (number, row) in rows {
        let record = parse(row).map_err(|message| CoreError::malformed_row(table, number, message))?;
        if record.id().is_empty() {
            return Err(CoreError::malformed_row(table, number, "missing identifier"));
        }
        if !seen.insert(record.id().to_string()) {
            return Err(CoreError::malformed_row(
                table,
                number,
                format!("duplicate identifier {}", record.id()),
            ));
        }
        out.push(record);
    }
    Ok(out)
}

fn parse_student(row: &[String]) -> Result<Student, String> {
    Ok(Student {
        id: cell(row, 0).to_string(),
        name: cell(row, 1).to_string(),
        age: number(row, 2, "age")?,
        gender: cell(row, 3).to_string(),
        department: cell(row, 4).to_string(),
        courses: split_list(cell(row, 5)),
        grades: parse_grades(cell(row, 6))?,
    })
}

fn parse_faculty(row: &[String]) -> Result<Faculty, String> {
    Ok(Faculty {
        id: cell(row, 0).to_string(),
        name: cell(row, 1).to_string(),
        department: cell(row, 2).to_string(),
        courses_taught: split_list(cell(row, 3)),
    })
}

fn parse_course(row: &[String]) -> Result<Course, String> {
    let faculty = cell(row, 3).trim();
    Ok(Course {
        id: cell(row, 0).to_string(),
        name: cell(row, 1).to_string(),
        credit_hours: number(row, 2, "credit hours")?,
        assigned_faculty: (!faculty.is_empty()).then(|| faculty.to_string()),
        enrolled_students: split_list(cell(row, 4)),
    })
}

fn parse_department(row: &[String]) -> Result<Department, String> {
    Ok(Department {
        id: cell(row, 0).to_string(),
        name: cell(row, 1).to_string(),
        head_of_department: cell(row, 2).to_string(),
        courses: split_list(cell(row, 3)),
    })
}

fn cell(row: &[String], index: usize) -> &str {
    Table::cell(row, index)
}

fn number(row: &[String], index: usize, what: &str) -> Result<u32, String> {
    let raw = cell(row, index).trim();
    raw.parse()
        .map_err(|_| format!("{what} {raw:?} is not a whole number"))
}

fn grades_cell(grades: &Grades) -> String {
    if grades.is_empty() {
        return "{}".to_string();
    }
    serde_json::to_string(grades).unwrap_or_else(|_| "{}".to_string())
}

fn parse_grades(text: &str) -> Result<Grades, String> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(Grades::new());
    }
    serde_json::from_str(text).map_err(|e| format!("grades {text:?} are not a score map: {e}"))
}
