//! One-way export formats.
//!
//! - [`to_delimited_text`]: a flat comma-delimited report with one line per
//!   record and computed details inline
//! - [`summary_workbook`]: a human-oriented workbook with computed columns
//!
//! Neither can be imported back; use [`crate::rows`] for that.

use crate::registry::Registry;
use crate::views::format_average;
use campus_codec::{write_record, Table, TableName, Workbook};

/// Header line of the flat report.
pub const REPORT_HEADER: [&str; 4] = ["DATA TYPE", "ID", "NAME", "DETAILS"];

/// Renders the flat text report.
///
/// Students come first, then faculty, courses and departments, each in
/// collection order. Every line, the header included, ends with `\n`.
#[must_use]
pub fn to_delimited_text(registry: &Registry) -> String {
    let mut out = String::new();
    push_line(&mut out, REPORT_HEADER);
    for s in registry.students() {
        let details = format!(
            "Age: {}, Dept: {}, GPA: {}",
            s.age,
            s.department,
            format_average(s.average_score())
        );
        push_line(&mut out, ["Student", s.id.as_str(), s.name.as_str(), details.as_str()]);
    }
    for f in registry.faculty() {
        let details = format!("Dept: {}, Courses: {}", f.department, f.courses_taught.len());
        push_line(&mut out, ["Faculty", f.id.as_str(), f.name.as_str(), details.as_str()]);
    }
    for c in registry.courses() {
        let details = format!(
            "Credits: {}, Students: {}",
            c.credit_hours,
            c.enrolled_students.len()
        );
        push_line(&mut out, ["Course", c.id.as_str(), c.name.as_str(), details.as_str()]);
    }
    for d in registry.departments() {
        let details = format!("Head: {}, Courses: {}", d.head_of_department, d.courses.len());
        push_line(&mut out, ["Department", d.id.as_str(), d.name.as_str(), details.as_str()]);
    }
    out
}

fn push_line(out: &mut String, fields: [&str; 4]) {
    out.push_str(&write_record(&fields));
    out.push('\n');
}

/// Builds the summary workbook.
///
/// Unlike [`crate::rows::to_workbook`], list columns hold counts or
/// `", "`-joined names meant for reading, students carry a `GPA` column and
/// the university sheet carries totals.
#[must_use]
pub fn summary_workbook(registry: &Registry) -> Workbook {
    let mut workbook = Workbook::new();

    let mut students = Table::with_header([
        "ID", "Name", "Age", "Gender", "Department", "GPA", "Courses", "Grades",
    ]);
    for s in registry.students() {
        students.push_row([
            s.id.clone(),
            s.name.clone(),
            s.age.to_string(),
            s.gender.clone(),
            s.department.clone(),
            format_average(s.average_score()),
            s.courses.join(", "),
            serde_json::to_string(&s.grades).unwrap_or_default(),
        ]);
    }
    workbook.insert_table(TableName::Students, students);

    let mut faculty = Table::with_header(["ID", "Name", "Department", "Courses Taught"]);
    for f in registry.faculty() {
        faculty.push_row([
            f.id.clone(),
            f.name.clone(),
            f.department.clone(),
            f.courses_taught.join(", "),
        ]);
    }
    workbook.insert_table(TableName::Faculty, faculty);

    let mut courses = Table::with_header([
        "ID",
        "Name",
        "Credit Hours",
        "Assigned Faculty",
        "Enrolled Students",
    ]);
    for c in registry.courses() {
        courses.push_row([
            c.id.clone(),
            c.name.clone(),
            c.credit_hours.to_string(),
            c.assigned_faculty.clone().unwrap_or_else(|| "N/A".to_string()),
            c.enrolled_students.len().to_string(),
        ]);
    }
    workbook.insert_table(TableName::Courses, courses);

    let mut departments = Table::with_header(["ID", "Name", "Head of Department", "Total Courses"]);
    for d in registry.departments() {
        departments.push_row([
            d.id.clone(),
            d.name.clone(),
            d.head_of_department.clone(),
            d.courses.len().to_string(),
        ]);
    }
    workbook.insert_table(TableName::Departments, departments);

    let university = registry.university();
    let profile = Table::with_header([
        "Name",
        "Address",
        "Total Students",
        "Total Faculty",
        "Total Courses",
        "Total Departments",
    ])
    .row([
        university.name.clone(),
        university.address.clone(),
        registry.students().len().to_string(),
        registry.faculty().len().to_string(),
        registry.courses().len().to_string(),
        registry.departments().len().to_string(),
    ]);
    workbook.insert_table(TableName::University, profile);

    workbook
}
