//! # Campus Testkit
//!
//! Test utilities for CampusDB.
//!
//! This crate provides:
//! - Test fixtures and database helpers
//! - Property-based test generators using proptest
//!
//! ## Usage
//!
//! ```rust
//! use campus_testkit::prelude::*;
//!
//! with_temp_db_mut(|db| {
//!     db.load_sample();
//!     assert_eq!(db.top_students().len(), 5);
//! });
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
}

pub use fixtures::*;
pub use generators::*;
