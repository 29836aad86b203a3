//! Cell-level packing rules.
//!
//! List-valued fields are stored as comma-joined strings in a single cell.
//! The flat text report uses the same comma as its field delimiter, so any
//! field containing it is quoted.

use std::borrow::Cow;

/// Field delimiter of the flat text report.
pub const DELIMITER: char = ',';

/// Joins identifiers into a single list cell.
#[must_use]
pub fn join_list<S: AsRef<str>>(items: &[S]) -> String {
    let mut out = String::new();
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push(DELIMITER);
        }
        out.push_str(item.as_ref());
    }
    out
}

/// Splits a list cell back into identifiers.
///
/// Surrounding whitespace is trimmed so that cells written with `", "`
/// separators read the same, and empty items are skipped.
#[must_use]
pub fn split_list(cell: &str) -> Vec<String> {
    cell.split(DELIMITER)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Returns true if `field` must be quoted in delimited text.
#[must_use]
pub fn needs_quoting(field: &str) -> bool {
    field.contains([DELIMITER, '"', '\n', '\r'])
}

/// Quotes `field` if it contains the delimiter, a quote or a line break.
///
/// Inner quotes are doubled.
#[must_use]
pub fn quote_field(field: &str) -> Cow<'_, str> {
    if needs_quoting(field) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

/// Writes one delimited record, quoting fields as needed, without a line ending.
#[must_use]
pub fn write_record<S: AsRef<str>>(fields: &[S]) -> String {
    let mut out = String::new();
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(DELIMITER);
        }
        out.push_str(&quote_field(field.as_ref()));
    }
    out
}
