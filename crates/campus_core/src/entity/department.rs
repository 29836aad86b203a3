use super::{EntityKind, Record};
use serde::{Deserialize, Serialize};

/// A department.
///
/// Students and faculty refer to a department by its name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Department {
    /// Unique identifier.
    pub id: String,
    /// Department name.
    pub name: String,
    /// Free-text name of the head of department.
    pub head_of_department: String,
    /// Identifiers of the courses the department offers.
    pub courses: Vec<String>,
}

impl Department {
    /// Creates a department offering no courses.
    pub fn new(id: impl Into<String>, name: impl Into<String>, head: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            head_of_department: head.into(),
            courses: Vec::new(),
        }
    }

    /// Adds a course and returns the department.
    #[must_use]
    pub fn with_course(mut self, course: impl Into<String>) -> Self {
        let course = course.into();
        if !self.courses.contains(&course) {
            self.courses.push(course);
        }
        self
    }
}

impl Record for Department {
    const KIND: EntityKind = EntityKind::Department;

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// The university profile. There is exactly one per registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct University {
    /// University name.
    pub name: String,
    /// Postal address.
    pub address: String,
}

impl University {
    /// Creates a university profile.
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
        }
    }
}
