//! Tables and the fixed table names of the schema.

use crate::error::CodecError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The five named tables every tabular representation carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TableName {
    /// One row per student.
    Students,
    /// One row per faculty member.
    Faculty,
    /// One row per course.
    Courses,
    /// One row per department.
    Departments,
    /// A single row holding the university profile.
    University,
}

impl TableName {
    /// All tables, in the order they are read and written.
    pub const ALL: [TableName; 5] = [
        TableName::Students,
        TableName::Faculty,
        TableName::Courses,
        TableName::Departments,
        TableName::University,
    ];

    /// Returns the table name as it appears in documents and remote ranges.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            TableName::Students => "Students",
            TableName::Faculty => "Faculty",
            TableName::Courses => "Courses",
            TableName::Departments => "Departments",
            TableName::University => "University",
        }
    }

    /// Returns the header row used when writing this table.
    #[must_use]
    pub const fn header(self) -> &'static [&'static str] {
        match self {
            TableName::Students => &["ID", "Name", "Age", "Gender", "Department", "Courses", "Grades"],
            TableName::Faculty => &["ID", "Name", "Department", "Courses Taught"],
            TableName::Courses => &["ID", "Name", "Credit Hours", "Faculty", "Students"],
            TableName::Departments => &["ID", "Name", "Head", "Courses"],
            TableName::University => &["Name", "Address"],
        }
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TableName {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TableName::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| CodecError::UnknownTable { name: s.to_string() })
    }
}

/// A table of string cells: an optional header row followed by data rows.
///
/// Rows may be ragged. Readers treat missing trailing cells as empty
/// strings (see [`Table::cell`]), matching how spreadsheet services trim
/// empty cells from the end of a row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Creates an empty table (no header, no rows).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a table from raw rows, the first of which is the header.
    #[must_use]
    pub fn from_rows(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    /// Creates a table holding only a header row.
    pub fn with_header<I, S>(header: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            rows: vec![header.into_iter().map(Into::into).collect()],
        }
    }

    /// Appends a row and returns the table.
    #[must_use]
    pub fn row<I, S>(mut self, cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push_row(cells);
        self
    }

    /// Appends a row.
    pub fn push_row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(cells.into_iter().map(Into::into).collect());
    }

    /// Appends raw rows.
    pub fn extend_rows(&mut self, rows: impl IntoIterator<Item = Vec<String>>) {
        self.rows.extend(rows);
    }

    /// Returns the header row, if any.
    #[must_use]
    pub fn header(&self) -> Option<&[String]> {
        self.rows.first().map(Vec::as_slice)
    }

    /// Returns every row after the header.
    #[must_use]
    pub fn data_rows(&self) -> &[Vec<String>] {
        self.rows.get(1..).unwrap_or(&[])
    }

    /// Returns true if the table holds at least one data row.
    ///
    /// A table with only a header, or no rows at all, carries no data.
    #[must_use]
    pub fn has_data(&self) -> bool {
        self.rows.len() >= 2
    }

    /// Returns all rows including the header.
    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Consumes the table and returns its rows.
    #[must_use]
    pub fn into_rows(self) -> Vec<Vec<String>> {
        self.rows
    }

    /// Returns the number of rows including the header.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the table has no rows at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the cell at `index` in `row`, or `""` when the row is short.
    #[must_use]
    pub fn cell(row: &[String], index: usize) -> &str {
        row.get(index).map(String::as_str).unwrap_or("")
    }
}
