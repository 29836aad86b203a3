use super::{EntityKind, Record};
use serde::{Deserialize, Serialize};

/// A course.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Course {
    /// Unique identifier.
    pub id: String,
    /// Course title.
    pub name: String,
    /// Credit hours.
    pub credit_hours: u32,
    /// Identifier of the assigned faculty member, if any.
    pub assigned_faculty: Option<String>,
    /// Identifiers of enrolled students, in enrollment order.
    pub enrolled_students: Vec<String>,
}

impl Course {
    /// Creates a course with no faculty and no students.
    pub fn new(id: impl Into<String>, name: impl Into<String>, credit_hours: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            credit_hours,
            assigned_faculty: None,
            enrolled_students: Vec::new(),
        }
    }

    /// Sets the assigned faculty member and returns the course.
    #[must_use]
    pub fn with_faculty(mut self, faculty: impl Into<String>) -> Self {
        self.assigned_faculty = Some(faculty.into());
        self
    }

    /// Adds an enrolled student and returns the course.
    #[must_use]
    pub fn with_student(mut self, student: impl Into<String>) -> Self {
        let student = student.into();
        if !self.has_student(&student) {
            self.enrolled_students.push(student);
        }
        self
    }

    /// Returns true if `student` is enrolled.
    #[must_use]
    pub fn has_student(&self, student: &str) -> bool {
        self.enrolled_students.iter().any(|s| s == student)
    }

    /// Returns true if `faculty` is the assigned faculty member.
    #[must_use]
    pub fn is_taught_by(&self, faculty: &str) -> bool {
        self.assigned_faculty.as_deref() == Some(faculty)
    }
}

impl Record for Course {
    const KIND: EntityKind = EntityKind::Course;

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unassigned_course_serializes_null_faculty() {
        let json = serde_json::to_string(&Course::new("CS101", "Intro", 3)).unwrap();
        assert!(json.contains(r#""assignedFaculty":null"#));
        assert!(json.contains(r#""creditHours":3"#));
        assert!(json.contains(r#""enrolledStudents":[]"#));
    }
}
