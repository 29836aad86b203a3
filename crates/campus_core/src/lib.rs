//! # Campus Core
//!
//! Record store and data layer for CampusDB, a manager for the academic
//! records of one university.
//!
//! This crate provides:
//! - The entity types ([`Student`], [`Faculty`], [`Course`], [`Department`],
//!   [`University`])
//! - [`Registry`]: the in-memory record store with cross-reference repair
//!   and cascading deletes
//! - [`Database`]: the facade that persists and announces every mutation
//! - Serialization adapters: the local JSON blob ([`blob`]), row mapping
//!   for workbooks and remote tables ([`rows`]) and one-way reports
//!   ([`report`])
//! - Derived views ([`views`]): averages, top students, summaries
//!
//! ## Quick Start
//!
//! ```rust
//! use campus_core::{Course, Database, EntityKind, Student, StudentPatch};
//!
//! let mut db = Database::open_in_memory().unwrap();
//! db.add_course(Course::new("CS101", "Introduction to Programming", 3)).unwrap();
//! db.add_student(
//!     Student::new("STU001", "Alice Johnson", 20, "Female", "Computer Science")
//!         .with_grade("CS101", 3.7),
//! )
//! .unwrap();
//!
//! // the course roster follows the student's course list
//! assert!(db.registry().course("CS101").unwrap().has_student("STU001"));
//!
//! db.update_student("STU001", StudentPatch::new().courses(Vec::<String>::new())).unwrap();
//! assert!(!db.registry().course("CS101").unwrap().has_student("STU001"));
//!
//! db.delete(EntityKind::Course, "CS101").unwrap();
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod blob;
mod change_feed;
mod config;
mod database;
mod entity;
mod error;
mod persistence;
mod registry;
pub mod report;
pub mod rows;
pub mod sample;
mod stats;
pub mod validate;
pub mod views;

pub use change_feed::{ChangeEvent, ChangeFeed, ChangeType};
pub use config::{Config, DEFAULT_STORAGE_KEY};
pub use database::Database;
pub use entity::{Course, Department, EntityKind, Faculty, Grades, Record, Student, University};
pub use error::{CoreError, CoreResult};
pub use persistence::{LoadReport, LocalPersistence, Persistence};
pub use registry::{
    Collection, CoursePatch, DeleteImpact, DepartmentPatch, FacultyPatch, Field, Reference,
    Registry, StudentPatch, Violation,
};
pub use stats::{DatabaseStats, StatsSnapshot};
pub use views::View;

// Re-export the lower layers for convenience
pub use campus_codec::{Table, TableName, Workbook};
pub use campus_storage::{FileStore, InMemoryStore, LocalStore};
