//! Cross-reference audit.

use super::Registry;
use crate::entity::{EntityKind, Record};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// A single broken cross-reference or duplicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Kind of the offending record.
    pub kind: EntityKind,
    /// Identifier of the offending record.
    pub id: String,
    /// What is wrong with it.
    pub message: String,
}

impl Violation {
    fn new(kind: EntityKind, id: &str, message: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.kind, self.id, self.message)
    }
}

impl Registry {
    /// Audits every cross-reference.
    ///
    /// References to records that do not exist are not violations; they are
    /// linked up when the record is created. Registries built only through
    /// the mutating operations always audit clean. Collections replaced
    /// with [`Registry::restore`] may not.
    #[must_use]
    pub fn check_integrity(&self) -> Vec<Violation> {
        let mut out = Vec::new();

        duplicates(&self.students, &mut out);
        duplicates(&self.faculty, &mut out);
        duplicates(&self.courses, &mut out);
        duplicates(&self.departments, &mut out);

        let students = by_id(&self.students);
        let faculty = by_id(&self.faculty);
        let courses = by_id(&self.courses);

        for student in &self.students {
            repeated(EntityKind::Student, &student.id, "courses", &student.courses, &mut out);
            for course_id in &student.courses {
                if let Some(course) = courses.get(course_id.as_str()) {
                    if !course.has_student(&student.id) {
                        out.push(Violation::new(
                            EntityKind::Student,
                            &student.id,
                            format!("lists course {course_id} which does not list the student"),
                        ));
                    }
                }
            }
            for course_id in student.grades.keys() {
                if !student.is_enrolled(course_id) {
                    out.push(Violation::new(
                        EntityKind::Student,
                        &student.id,
                        format!("has a grade for {course_id} without being enrolled"),
                    ));
                }
            }
        }

        for course in &self.courses {
            repeated(
                EntityKind::Course,
                &course.id,
                "enrolledStudents",
                &course.enrolled_students,
                &mut out,
            );
            for student_id in &course.enrolled_students {
                if let Some(student) = students.get(student_id.as_str()) {
                    if !student.is_enrolled(&course.id) {
                        out.push(Violation::new(
                            EntityKind::Course,
                            &course.id,
                            format!("lists student {student_id} who does not list the course"),
                        ));
                    }
                }
            }
            if let Some(faculty_id) = &course.assigned_faculty {
                if let Some(member) = faculty.get(faculty_id.as_str()) {
                    if !member.teaches(&course.id) {
                        out.push(Violation::new(
                            EntityKind::Course,
                            &course.id,
                            format!("is assigned to {faculty_id} who does not teach it"),
                        ));
                    }
                }
            }
        }

        for member in &self.faculty {
            repeated(
                EntityKind::Faculty,
                &member.id,
                "coursesTaught",
                &member.courses_taught,
                &mut out,
            );
            for course_id in &member.courses_taught {
                if let Some(course) = courses.get(course_id.as_str()) {
                    if !course.is_taught_by(&member.id) {
                        out.push(Violation::new(
                            EntityKind::Faculty,
                            &member.id,
                            format!("teaches course {course_id} which is not assigned to it"),
                        ));
                    }
                }
            }
        }

        for department in &self.departments {
            repeated(
                EntityKind::Department,
                &department.id,
                "courses",
                &department.courses,
                &mut out,
            );
        }

        out
    }
}

fn by_id<R: Record>(items: &[R]) -> HashMap<&str, &R> {
    let mut map = HashMap::with_capacity(items.len());
    for item in items {
        map.entry(item.id()).or_insert(item);
    }
    map
}

fn duplicates<R: Record>(items: &[R], out: &mut Vec<Violation>) {
    let mut seen = HashSet::new();
    for item in items {
        if !seen.insert(item.id()) {
            out.push(Violation::new(R::KIND, item.id(), "identifier is not unique"));
        }
    }
}

fn repeated(kind: EntityKind, id: &str, field: &str, list: &[String], out: &mut Vec<Violation>) {
    let mut seen = HashSet::new();
    for entry in list {
        if !seen.insert(entry.as_str()) {
            out.push(Violation::new(kind, id, format!("{field} repeats {entry}")));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Course, Faculty, Student};
    use crate::registry::Collection;

    #[test]
    fn empty_registry_is_clean() {
        assert!(Registry::new().check_integrity().is_empty());
    }

    #[test]
    fn restored_inconsistency_is_reported() {
        let mut registry = Registry::new();
        registry.restore(Collection::Courses(vec![
            Course::new("CS101", "Intro", 3).with_faculty("FAC001")
        ]));
        registry.restore(Collection::Faculty(vec![Faculty::new("FAC001", "Dr. A", "CS")]));
        registry.restore(Collection::Students(vec![
            Student::new("STU001", "Alice", 20, "Female", "CS").with_course("CS101"),
            Student::new("STU001", "Alice Again", 20, "Female", "CS"),
        ]));

        let violations = registry.check_integrity();
        let messages: Vec<String> = violations.iter().map(ToString::to_string).collect();
        assert!(messages.iter().any(|m| m.contains("not unique")));
        assert!(messages.iter().any(|m| m.contains("does not list the student")));
        assert!(messages.iter().any(|m| m.contains("does not teach it")));
    }

    #[test]
    fn dangling_references_are_not_violations() {
        let mut registry = Registry::new();
        registry
            .add_student(Student::new("STU001", "Alice", 20, "Female", "CS").with_course("CS999"))
            .unwrap();
        assert!(registry.check_integrity().is_empty());
    }
}
