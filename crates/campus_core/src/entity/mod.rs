//! Entity types.
//!
//! Entities reference each other by string identifier, except for the
//! department of a student or faculty member, which is a free-text
//! department *name*.

mod course;
mod department;
mod faculty;
mod kind;
mod student;

pub use course::Course;
pub use department::{Department, University};
pub use faculty::Faculty;
pub use kind::{EntityKind, Record};
pub use student::{Grades, Student};
