//! Multi-table workbook documents.
//!
//! # Binary Layout
//!
//! ```text
//! ┌──────────┬─────────┬──────────────────────────────┐
//! │ CAMPUSWB │ version │ CBOR body                    │
//! │ 8 bytes  │ 1 byte  │ [{name, rows: [[text]]}, ..] │
//! └──────────┴─────────┴──────────────────────────────┘
//! ```
//!
//! Sheets keep their insertion order. Sheets whose names are not part of
//! the schema are preserved but ignored by importers.

use crate::error::{CodecError, CodecResult};
use crate::table::{Table, TableName};
use serde::{Deserialize, Serialize};

/// Magic bytes at the start of every workbook document.
pub const MAGIC: &[u8; 8] = b"CAMPUSWB";

/// Current workbook format version.
pub const FORMAT_VERSION: u8 = 1;

#[derive(Serialize, Deserialize)]
struct Sheet {
    name: String,
    rows: Vec<Vec<String>>,
}

/// An in-memory spreadsheet-like document: named tables in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Workbook {
    sheets: Vec<(String, Table)>,
}

impl Workbook {
    /// Creates an empty workbook.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a sheet, replacing any sheet with the same name in place.
    pub fn insert(&mut self, name: impl Into<String>, table: Table) {
        let name = name.into();
        match self.sheets.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = table,
            None => self.sheets.push((name, table)),
        }
    }

    /// Inserts one of the schema tables.
    pub fn insert_table(&mut self, name: TableName, table: Table) {
        self.insert(name.as_str(), table);
    }

    /// Returns the sheet called `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Table> {
        self.sheets
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, table)| table)
    }

    /// Returns the schema table `name`, if the workbook has it.
    #[must_use]
    pub fn table(&self, name: TableName) -> Option<&Table> {
        self.get(name.as_str())
    }

    /// Returns the sheet names in order.
    pub fn sheet_names(&self) -> impl Iterator<Item = &str> {
        self.sheets.iter().map(|(n, _)| n.as_str())
    }

    /// Returns the number of sheets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    /// Returns true if the workbook has no sheets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    /// Encodes the workbook into a binary buffer.
    ///
    /// # Errors
    ///
    /// Returns `EncodingFailed` if the CBOR writer fails.
    pub fn to_bytes(&self) -> CodecResult<Vec<u8>> {
        let body: Vec<Sheet> = self
            .sheets
            .iter()
            .map(|(name, table)| Sheet {
                name: name.clone(),
                rows: table.rows().to_vec(),
            })
            .collect();

        let mut out = Vec::with_capacity(MAGIC.len() + 1);
        out.extend_from_slice(MAGIC);
        out.push(FORMAT_VERSION);
        ciborium::into_writer(&body, &mut out).map_err(|e| CodecError::encoding(e.to_string()))?;
        Ok(out)
    }

    /// Decodes a workbook from a binary buffer.
    ///
    /// # Errors
    ///
    /// Returns:
    /// - `BadMagic` if the buffer is not a workbook
    /// - `UnsupportedFormat` for an unknown version byte
    /// - `DecodingFailed` if the body is not valid CBOR of the expected shape
    pub fn from_bytes(bytes: &[u8]) -> CodecResult<Self> {
        let rest = bytes.strip_prefix(MAGIC.as_slice()).ok_or(CodecError::BadMagic)?;
        let (&version, body) = rest
            .split_first()
            .ok_or_else(|| CodecError::decoding("missing format version"))?;
        if version != FORMAT_VERSION {
            return Err(CodecError::UnsupportedFormat {
                found: version,
                expected: FORMAT_VERSION,
            });
        }

        let sheets: Vec<Sheet> =
            ciborium::from_reader(body).map_err(|e| CodecError::decoding(e.to_string()))?;

        let mut workbook = Workbook::new();
        for sheet in sheets {
            workbook.insert(sheet.name, Table::from_rows(sheet.rows));
        }
        Ok(workbook)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn courses() -> Table {
        Table::with_header(TableName::Courses.header().iter().copied())
            .row(["CS101", "Introduction to Programming", "3", "FAC001", "STU001,STU002"])
            .row(["CS201", "Data Structures", "4", "", ""])
    }

    #[test]
    fn workbook_round_trip() {
        let mut workbook = Workbook::new();
        workbook.insert_table(TableName::Courses, courses());
        workbook.insert("Notes", Table::with_header(["anything"]));

        let decoded = Workbook::from_bytes(&workbook.to_bytes().unwrap()).unwrap();
        assert_eq!(decoded, workbook);
        assert_eq!(decoded.sheet_names().collect::<Vec<_>>(), ["Courses", "Notes"]);
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut workbook = Workbook::new();
        workbook.insert("A", Table::new());
        workbook.insert("B", Table::new());
        workbook.insert("A", courses());
        assert_eq!(workbook.len(), 2);
        assert_eq!(workbook.sheet_names().next(), Some("A"));
        assert!(workbook.get("A").unwrap().has_data());
    }

    #[test]
    fn rejects_foreign_buffers() {
        assert_eq!(Workbook::from_bytes(b"PK\x03\x04"), Err(CodecError::BadMagic));
        assert_eq!(Workbook::from_bytes(b""), Err(CodecError::BadMagic));
    }

    #[test]
    fn rejects_unknown_version() {
        let mut bytes = MAGIC.to_vec();
        bytes.push(FORMAT_VERSION + 1);
        assert!(matches!(
            Workbook::from_bytes(&bytes),
            Err(CodecError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn rejects_truncated_body() {
        let mut workbook = Workbook::new();
        workbook.insert_table(TableName::Courses, courses());
        let bytes = workbook.to_bytes().unwrap();
        let truncated = &bytes[..bytes.len() - 5];
        assert!(matches!(
            Workbook::from_bytes(truncated),
            Err(CodecError::DecodingFailed { .. })
        ));
    }

    #[test]
    fn missing_version_byte_is_decoding_error() {
        assert!(matches!(
            Workbook::from_bytes(MAGIC),
            Err(CodecError::DecodingFailed { .. })
        ));
    }
}
