use super::{EntityKind, Record};
use serde::{Deserialize, Serialize};

/// A faculty member.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Faculty {
    /// Unique identifier.
    pub id: String,
    /// Full name.
    pub name: String,
    /// Department name (not identifier).
    pub department: String,
    /// Identifiers of courses this member is assigned to.
    pub courses_taught: Vec<String>,
}

impl Faculty {
    /// Creates a faculty member teaching nothing.
    pub fn new(id: impl Into<String>, name: impl Into<String>, department: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            department: department.into(),
            courses_taught: Vec::new(),
        }
    }

    /// Adds a taught course and returns the faculty member.
    #[must_use]
    pub fn with_course(mut self, course: impl Into<String>) -> Self {
        let course = course.into();
        if !self.teaches(&course) {
            self.courses_taught.push(course);
        }
        self
    }

    /// Returns true if `course` is in the taught set.
    #[must_use]
    pub fn teaches(&self, course: &str) -> bool {
        self.courses_taught.iter().any(|c| c == course)
    }
}

impl Record for Faculty {
    const KIND: EntityKind = EntityKind::Faculty;

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}
