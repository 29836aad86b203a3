//! # Campus Codec
//!
//! Tabular representations shared by the CampusDB serialization adapters.
//!
//! This crate provides:
//! - [`Table`]: a header row plus data rows of string cells
//! - [`TableName`]: the five fixed table names of the schema
//! - [`Workbook`]: named tables packed into a binary document
//! - Cell helpers for comma-joined list cells and delimited-text quoting
//!
//! It knows nothing about students or courses; mapping entities to rows
//! lives in `campus_core`.
//!
//! ## Usage
//!
//! ```
//! use campus_codec::{Table, TableName, Workbook};
//!
//! let mut workbook = Workbook::new();
//! workbook.insert_table(
//!     TableName::University,
//!     Table::with_header(["Name", "Address"]).row(["Lincoln University", "Education City"]),
//! );
//!
//! let bytes = workbook.to_bytes().unwrap();
//! let decoded = Workbook::from_bytes(&bytes).unwrap();
//! assert_eq!(workbook, decoded);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod cells;
mod error;
mod table;
mod workbook;

pub use cells::{join_list, needs_quoting, quote_field, split_list, write_record, DELIMITER};
pub use error::{CodecError, CodecResult};
pub use table::{Table, TableName};
pub use workbook::{Workbook, FORMAT_VERSION, MAGIC};
