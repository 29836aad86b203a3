//! Deletion and its cascade.
//!
//! Deleting is two-phase: [`Registry::preview_delete`] reports what a
//! delete would purge without touching anything, and [`Registry::delete`]
//! commits it. The reported impact is the same in both cases.

use super::{index_of, remove_id, Registry};
use crate::entity::EntityKind;
use crate::error::CoreResult;
use std::fmt;
use tracing::debug;

/// A relational field that holds identifiers of another collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// A student's course list.
    Courses,
    /// A student's grade map.
    Grades,
    /// A course's enrolled set.
    EnrolledStudents,
    /// A faculty member's taught set.
    CoursesTaught,
    /// A course's assigned faculty.
    AssignedFaculty,
    /// A department's course set.
    DepartmentCourses,
    /// The department name of a student or faculty member.
    DepartmentName,
}

impl Field {
    /// Returns the field name as it appears in the local blob.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Field::Courses | Field::DepartmentCourses => "courses",
            Field::Grades => "grades",
            Field::EnrolledStudents => "enrolledStudents",
            Field::CoursesTaught => "coursesTaught",
            Field::AssignedFaculty => "assignedFaculty",
            Field::DepartmentName => "department",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A field of one record that refers to the record being deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    /// Kind of the referring record.
    pub kind: EntityKind,
    /// Identifier of the referring record.
    pub id: String,
    /// The referring field.
    pub field: Field,
}

impl Reference {
    fn new(kind: EntityKind, id: &str, field: Field) -> Self {
        Self {
            kind,
            id: id.to_string(),
            field,
        }
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}.{}", self.kind, self.id, self.field)
    }
}

/// What deleting a record does to the rest of the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteImpact {
    /// Kind of the deleted record.
    pub kind: EntityKind,
    /// Identifier of the deleted record.
    pub id: String,
    /// Display name of the deleted record.
    pub name: String,
    /// References removed by the delete.
    pub purged: Vec<Reference>,
    /// References left in place.
    ///
    /// Only department deletes produce these: students and faculty name
    /// their department in free text, and deleting a department does not
    /// rewrite or clear those names.
    pub retained: Vec<Reference>,
}

impl DeleteImpact {
    /// Returns true if nothing else refers to the record.
    #[must_use]
    pub fn is_isolated(&self) -> bool {
        self.purged.is_empty() && self.retained.is_empty()
    }
}

impl Registry {
    /// Reports what deleting the record would change, without changing it.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the record does not exist.
    pub fn preview_delete(&self, kind: EntityKind, id: &str) -> CoreResult<DeleteImpact> {
        let mut purged = Vec::new();
        let mut retained = Vec::new();

        let name = match kind {
            EntityKind::Student => {
                let student = &self.students[index_of(&self.students, id)?];
                for course in self.courses.iter().filter(|c| c.has_student(id)) {
                    purged.push(Reference::new(EntityKind::Course, &course.id, Field::EnrolledStudents));
                }
                student.name.clone()
            }
            EntityKind::Faculty => {
                let member = &self.faculty[index_of(&self.faculty, id)?];
                for course in self.courses.iter().filter(|c| c.is_taught_by(id)) {
                    purged.push(Reference::new(EntityKind::Course, &course.id, Field::AssignedFaculty));
                }
                member.name.clone()
            }
            EntityKind::Course => {
                let course = &self.courses[index_of(&self.courses, id)?];
                for student in &self.students {
                    if student.is_enrolled(id) {
                        purged.push(Reference::new(EntityKind::Student, &student.id, Field::Courses));
                    }
                    if student.grades.contains_key(id) {
                        purged.push(Reference::new(EntityKind::Student, &student.id, Field::Grades));
                    }
                }
                for member in self.faculty.iter().filter(|f| f.teaches(id)) {
                    purged.push(Reference::new(EntityKind::Faculty, &member.id, Field::CoursesTaught));
                }
                for department in self.departments.iter().filter(|d| d.courses.iter().any(|c| c == id)) {
                    purged.push(Reference::new(
                        EntityKind::Department,
                        &department.id,
                        Field::DepartmentCourses,
                    ));
                }
                course.name.clone()
            }
            EntityKind::Department => {
                // Department names are free text on students and faculty.
                // They are reported but left as they are.
                let department = &self.departments[index_of(&self.departments, id)?];
                let dept_name = department.name.as_str();
                for student in self.students.iter().filter(|s| s.department == dept_name) {
                    retained.push(Reference::new(EntityKind::Student, &student.id, Field::DepartmentName));
                }
                for member in self.faculty.iter().filter(|f| f.department == dept_name) {
                    retained.push(Reference::new(EntityKind::Faculty, &member.id, Field::DepartmentName));
                }
                department.name.clone()
            }
        };

        Ok(DeleteImpact {
            kind,
            id: id.to_string(),
            name,
            purged,
            retained,
        })
    }

    /// Deletes the record and purges every reference to it.
    ///
    /// - student: removed from every course's enrolled set
    /// - course: removed from every student's course list and grades, every
    ///   taught set and every department's course set
    /// - faculty: unassigned from every course it taught
    /// - department: removed alone
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the record does not exist.
    pub fn delete(&mut self, kind: EntityKind, id: &str) -> CoreResult<DeleteImpact> {
        let impact = self.preview_delete(kind, id)?;

        match kind {
            EntityKind::Student => {
                self.students.retain(|s| s.id != id);
                for course in &mut self.courses {
                    remove_id(&mut course.enrolled_students, id);
                }
            }
            EntityKind::Faculty => {
                self.faculty.retain(|f| f.id != id);
                for course in self.courses.iter_mut().filter(|c| c.is_taught_by(id)) {
                    course.assigned_faculty = None;
                }
            }
            EntityKind::Course => {
                self.courses.retain(|c| c.id != id);
                for student in &mut self.students {
                    remove_id(&mut student.courses, id);
                    student.grades.remove(id);
                }
                for member in &mut self.faculty {
                    remove_id(&mut member.courses_taught, id);
                }
                for department in &mut self.departments {
                    remove_id(&mut department.courses, id);
                }
            }
            EntityKind::Department => {
                self.departments.retain(|d| d.id != id);
            }
        }

        debug!(
            kind = %kind,
            id,
            purged = impact.purged.len(),
            retained = impact.retained.len(),
            "deleted"
        );
        Ok(impact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Course, Department, Faculty, Student};
    use crate::error::CoreError;

    fn registry() -> Registry {
        let mut registry = Registry::new();
        registry
            .add_department(
                Department::new("DEPT001", "Computer Science", "Dr. Sarah Johnson")
                    .with_course("CS101")
                    .with_course("CS201"),
            )
            .unwrap();
        registry
            .add_faculty(Faculty::new("FAC001", "Dr. James Anderson", "Computer Science"))
            .unwrap();
        registry
            .add_course(Course::new("CS101", "Introduction to Programming", 3).with_faculty("FAC001"))
            .unwrap();
        registry
            .add_course(Course::new("CS201", "Data Structures", 4).with_faculty("FAC001"))
            .unwrap();
        registry
            .add_student(
                Student::new("STU001", "Alice Johnson", 20, "Female", "Computer Science")
                    .with_grade("CS101", 3.7)
                    .with_course("CS201"),
            )
            .unwrap();
        registry
            .add_student(
                Student::new("STU002", "Bob Williams", 21, "Male", "Computer Science")
                    .with_grade("CS101", 3.5),
            )
            .unwrap();
        registry
    }

    #[test]
    fn course_delete_purges_everywhere() {
        let mut registry = registry();
        let impact = registry.delete(EntityKind::Course, "CS101").unwrap();

        assert!(registry.course("CS101").is_none());
        for student in registry.students() {
            assert!(!student.is_enrolled("CS101"));
            assert!(!student.grades.contains_key("CS101"));
        }
        assert!(!registry.faculty_member("FAC001").unwrap().teaches("CS101"));
        assert_eq!(registry.department("DEPT001").unwrap().courses, ["CS201"]);

        // two course lists, two grade maps, one taught set, one department
        assert_eq!(impact.purged.len(), 6);
        assert!(registry.check_integrity().is_empty());
    }

    #[test]
    fn faculty_delete_unassigns_courses() {
        let mut registry = registry();
        registry.delete(EntityKind::Faculty, "FAC001").unwrap();
        assert!(registry.courses().iter().all(|c| c.assigned_faculty.is_none()));
    }

    #[test]
    fn student_delete_purges_rosters() {
        let mut registry = registry();
        let impact = registry.delete(EntityKind::Student, "STU001").unwrap();
        assert_eq!(impact.purged.len(), 2);
        assert!(registry.courses().iter().all(|c| !c.has_student("STU001")));
        assert!(registry.course("CS101").unwrap().has_student("STU002"));
    }

    #[test]
    fn department_delete_does_not_cascade() {
        let mut registry = registry();
        let impact = registry.delete(EntityKind::Department, "DEPT001").unwrap();

        assert!(impact.purged.is_empty());
        // two students and one faculty member still name the department
        assert_eq!(impact.retained.len(), 3);
        assert_eq!(registry.student("STU001").unwrap().department, "Computer Science");
        assert_eq!(registry.courses().len(), 2);
    }

    #[test]
    fn preview_matches_commit_and_changes_nothing() {
        let mut registry = registry();
        let before = registry.clone();
        let preview = registry.preview_delete(EntityKind::Course, "CS201").unwrap();
        assert_eq!(registry, before);

        let committed = registry.delete(EntityKind::Course, "CS201").unwrap();
        assert_eq!(preview, committed);
    }

    #[test]
    fn delete_unknown_is_not_found() {
        let mut registry = registry();
        let before = registry.clone();
        let err = registry.delete(EntityKind::Student, "STU404").unwrap_err();
        assert!(matches!(err, CoreError::NotFound { kind: EntityKind::Student, .. }));
        assert_eq!(registry, before);
    }

    #[test]
    fn isolated_record_has_empty_impact() {
        let mut registry = Registry::new();
        registry.add_course(Course::new("X1", "Seminar", 1)).unwrap();
        assert!(registry.preview_delete(EntityKind::Course, "X1").unwrap().is_isolated());
    }
}
