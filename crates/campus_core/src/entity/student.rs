use super::{EntityKind, Record};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Scores keyed by course identifier.
pub type Grades = BTreeMap<String, f64>;

/// A student record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Student {
    /// Unique identifier.
    pub id: String,
    /// Full name.
    pub name: String,
    /// Age in years.
    pub age: u32,
    /// Free-text gender.
    pub gender: String,
    /// Department name (not identifier).
    pub department: String,
    /// Enrolled course identifiers, in enrollment order.
    pub courses: Vec<String>,
    /// Scores for enrolled courses, 0.0 to 4.0.
    pub grades: Grades,
}

impl Student {
    /// Creates a student with no courses.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        age: u32,
        gender: impl Into<String>,
        department: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            age,
            gender: gender.into(),
            department: department.into(),
            courses: Vec::new(),
            grades: Grades::new(),
        }
    }

    /// Adds a course to the enrollment list and returns the student.
    #[must_use]
    pub fn with_course(mut self, course: impl Into<String>) -> Self {
        let course = course.into();
        if !self.is_enrolled(&course) {
            self.courses.push(course);
        }
        self
    }

    /// Enrolls in `course` with `score` and returns the student.
    #[must_use]
    pub fn with_grade(self, course: impl Into<String>, score: f64) -> Self {
        let course = course.into();
        let mut student = self.with_course(course.clone());
        student.grades.insert(course, score);
        student
    }

    /// Returns true if the student lists `course`.
    #[must_use]
    pub fn is_enrolled(&self, course: &str) -> bool {
        self.courses.iter().any(|c| c == course)
    }

    /// Returns the mean of all recorded scores, or zero without scores.
    #[must_use]
    pub fn average_score(&self) -> f64 {
        crate::views::average_score(&self.grades)
    }
}

impl Record for Student {
    const KIND: EntityKind = EntityKind::Student;

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}
