//! Partial updates.
//!
//! A patch names the fields to change; `None` leaves a field alone.
//! Identifiers cannot be patched.

use super::{check_grades, dedup_ids, index_of, push_unique, remove_id, Registry};
use crate::entity::Grades;
use crate::error::CoreResult;
use tracing::debug;

/// Changes to a student.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudentPatch {
    /// New name.
    pub name: Option<String>,
    /// New age.
    pub age: Option<u32>,
    /// New gender.
    pub gender: Option<String>,
    /// New department name.
    pub department: Option<String>,
    /// New course list. Courses dropped from the list lose their grade.
    pub courses: Option<Vec<String>>,
    /// New grade map. Grades for courses not in the list are dropped.
    pub grades: Option<Grades>,
}

impl StudentPatch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the age.
    #[must_use]
    pub fn age(mut self, age: u32) -> Self {
        self.age = Some(age);
        self
    }

    /// Sets the gender.
    #[must_use]
    pub fn gender(mut self, gender: impl Into<String>) -> Self {
        self.gender = Some(gender.into());
        self
    }

    /// Sets the department name.
    #[must_use]
    pub fn department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }

    /// Replaces the course list.
    #[must_use]
    pub fn courses<I, S>(mut self, courses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.courses = Some(courses.into_iter().map(Into::into).collect());
        self
    }

    /// Replaces the grade map.
    #[must_use]
    pub fn grades(mut self, grades: Grades) -> Self {
        self.grades = Some(grades);
        self
    }
}

/// Changes to a faculty member.
///
/// The taught set follows course assignment and is not patched directly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacultyPatch {
    /// New name.
    pub name: Option<String>,
    /// New department name.
    pub department: Option<String>,
}

impl FacultyPatch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the department name.
    #[must_use]
    pub fn department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }
}

/// Changes to a course.
///
/// The enrolled set follows student course lists and is not patched
/// directly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoursePatch {
    /// New title.
    pub name: Option<String>,
    /// New credit hours.
    pub credit_hours: Option<u32>,
    /// New assigned faculty: `Some(None)` unassigns.
    pub assigned_faculty: Option<Option<String>>,
}

impl CoursePatch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the title.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the credit hours.
    #[must_use]
    pub fn credit_hours(mut self, hours: u32) -> Self {
        self.credit_hours = Some(hours);
        self
    }

    /// Assigns a faculty member.
    #[must_use]
    pub fn faculty(mut self, faculty: impl Into<String>) -> Self {
        self.assigned_faculty = Some(Some(faculty.into()));
        self
    }

    /// Removes the assigned faculty member.
    #[must_use]
    pub fn unassign(mut self) -> Self {
        self.assigned_faculty = Some(None);
        self
    }
}

/// Changes to a department.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DepartmentPatch {
    /// New name.
    ///
    /// Students and faculty keep the old name; department references are
    /// free text and are not rewritten.
    pub name: Option<String>,
    /// New head of department.
    pub head_of_department: Option<String>,
    /// New course set.
    pub courses: Option<Vec<String>>,
}

impl DepartmentPatch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the head of department.
    #[must_use]
    pub fn head(mut self, head: impl Into<String>) -> Self {
        self.head_of_department = Some(head.into());
        self
    }

    /// Replaces the course set.
    #[must_use]
    pub fn courses<I, S>(mut self, courses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.courses = Some(courses.into_iter().map(Into::into).collect());
        self
    }
}

impl Registry {
    /// Applies `patch` to the student with `id`.
    ///
    /// A new course list is diffed against the old one: the student leaves
    /// the enrolled set of every dropped course and joins every added one.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the student does not exist, and
    /// `NonFiniteScore` if the patched grades hold NaN or infinity.
    pub fn update_student(&mut self, id: &str, patch: StudentPatch) -> CoreResult<()> {
        let index = index_of(&self.students, id)?;
        if let Some(grades) = &patch.grades {
            check_grades(id, grades)?;
        }
        let StudentPatch {
            name,
            age,
            gender,
            department,
            courses,
            grades,
        } = patch;

        let student = &mut self.students[index];
        if let Some(name) = name {
            student.name = name;
        }
        if let Some(age) = age {
            student.age = age;
        }
        if let Some(gender) = gender {
            student.gender = gender;
        }
        if let Some(department) = department {
            student.department = department;
        }
        if let Some(mut courses) = courses {
            dedup_ids(&mut courses);
            let previous = std::mem::replace(&mut student.courses, courses);
            for course in &mut self.courses {
                if student.is_enrolled(&course.id) {
                    push_unique(&mut course.enrolled_students, id);
                } else if previous.contains(&course.id) {
                    remove_id(&mut course.enrolled_students, id);
                }
            }
        }
        if let Some(grades) = grades {
            student.grades = grades;
        }
        student
            .grades
            .retain(|course, _| student.courses.contains(course));

        debug!(id, "updated student");
        Ok(())
    }

    /// Applies `patch` to the faculty member with `id`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the faculty member does not exist.
    pub fn update_faculty(&mut self, id: &str, patch: FacultyPatch) -> CoreResult<()> {
        let index = index_of(&self.faculty, id)?;
        let member = &mut self.faculty[index];
        if let Some(name) = patch.name {
            member.name = name;
        }
        if let Some(department) = patch.department {
            member.department = department;
        }
        debug!(id, "updated faculty");
        Ok(())
    }

    /// Applies `patch` to the course with `id`.
    ///
    /// Changing the assigned faculty moves the course between taught sets.
    /// An unknown faculty identifier is stored as given.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the course does not exist.
    pub fn update_course(&mut self, id: &str, patch: CoursePatch) -> CoreResult<()> {
        let index = index_of(&self.courses, id)?;
        let course = &mut self.courses[index];
        if let Some(name) = patch.name {
            course.name = name;
        }
        if let Some(hours) = patch.credit_hours {
            course.credit_hours = hours;
        }
        if let Some(faculty) = patch.assigned_faculty {
            self.relink_faculty(index, faculty);
        }
        debug!(id, "updated course");
        Ok(())
    }

    /// Applies `patch` to the department with `id`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the department does not exist.
    pub fn update_department(&mut self, id: &str, patch: DepartmentPatch) -> CoreResult<()> {
        let index = index_of(&self.departments, id)?;
        let department = &mut self.departments[index];
        if let Some(name) = patch.name {
            department.name = name;
        }
        if let Some(head) = patch.head_of_department {
            department.head_of_department = head;
        }
        if let Some(mut courses) = patch.courses {
            dedup_ids(&mut courses);
            department.courses = courses;
        }
        debug!(id, "updated department");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Course, Faculty, Student};
    use crate::error::CoreError;

    fn registry() -> Registry {
        let mut registry = Registry::new();
        registry.add_faculty(Faculty::new("FAC001", "Dr. James Anderson", "CS")).unwrap();
        registry.add_faculty(Faculty::new("FAC003", "Dr. David Kim", "Mathematics")).unwrap();
        registry
            .add_course(Course::new("CS101", "Introduction to Programming", 3).with_faculty("FAC001"))
            .unwrap();
        registry
            .add_course(Course::new("MATH101", "Calculus I", 3).with_faculty("FAC003"))
            .unwrap();
        registry
            .add_course(Course::new("BUS101", "Introduction to Business", 3))
            .unwrap();
        registry
            .add_student(
                Student::new("STU001", "Alice Johnson", 20, "Female", "CS")
                    .with_grade("CS101", 3.7)
                    .with_grade("MATH101", 3.9),
            )
            .unwrap();
        registry
    }

    #[test]
    fn dropping_a_course_updates_roster_and_grades() {
        let mut registry = registry();
        registry
            .update_student("STU001", StudentPatch::new().courses(["CS101", "BUS101"]))
            .unwrap();

        assert!(!registry.course("MATH101").unwrap().has_student("STU001"));
        assert!(registry.course("BUS101").unwrap().has_student("STU001"));
        assert!(registry.course("CS101").unwrap().has_student("STU001"));

        let student = registry.student("STU001").unwrap();
        assert!(!student.grades.contains_key("MATH101"));
        assert_eq!(student.grades["CS101"], 3.7);
    }

    #[test]
    fn scalar_patch_leaves_relations_alone() {
        let mut registry = registry();
        registry
            .update_student("STU001", StudentPatch::new().name("Alice J.").age(21))
            .unwrap();
        let student = registry.student("STU001").unwrap();
        assert_eq!(student.name, "Alice J.");
        assert_eq!(student.age, 21);
        assert_eq!(student.courses, ["CS101", "MATH101"]);
        assert_eq!(student.grades.len(), 2);
    }

    #[test]
    fn patched_grades_are_limited_to_course_list() {
        let mut registry = registry();
        let mut grades = Grades::new();
        grades.insert("CS101".to_string(), 3.0);
        grades.insert("PHY101".to_string(), 4.0);
        registry
            .update_student("STU001", StudentPatch::new().grades(grades))
            .unwrap();
        let student = registry.student("STU001").unwrap();
        assert_eq!(student.grades.len(), 1);
        assert_eq!(student.grades["CS101"], 3.0);
    }

    #[test]
    fn patch_with_nan_grade_changes_nothing() {
        let mut registry = registry();
        let before = registry.clone();
        let mut grades = Grades::new();
        grades.insert("CS101".to_string(), f64::NAN);

        let err = registry
            .update_student("STU001", StudentPatch::new().name("Renamed").grades(grades))
            .unwrap_err();
        assert!(matches!(err, CoreError::NonFiniteScore { .. }));
        assert_eq!(registry, before);
    }

    #[test]
    fn update_unknown_is_not_found() {
        let mut registry = registry();
        let err = registry
            .update_course("CS999", CoursePatch::new().name("Nope"))
            .unwrap_err();
        assert!(matches!(err, CoreError::NotFound { .. }));
    }

    #[test]
    fn reassigning_course_updates_taught_sets() {
        let mut registry = registry();
        registry
            .update_course("CS101", CoursePatch::new().faculty("FAC003").credit_hours(4))
            .unwrap();

        assert!(!registry.faculty_member("FAC001").unwrap().teaches("CS101"));
        assert!(registry.faculty_member("FAC003").unwrap().teaches("CS101"));
        assert_eq!(registry.course("CS101").unwrap().credit_hours, 4);

        registry
            .update_course("CS101", CoursePatch::new().unassign())
            .unwrap();
        assert!(!registry.faculty_member("FAC003").unwrap().teaches("CS101"));
        assert!(registry.check_integrity().is_empty());
    }

    #[test]
    fn department_rename_does_not_touch_people() {
        let mut registry = registry();
        registry
            .add_department(crate::entity::Department::new("DEPT001", "CS", "Dr. Sarah Johnson"))
            .unwrap();
        registry
            .update_department("DEPT001", DepartmentPatch::new().name("Computing"))
            .unwrap();
        assert_eq!(registry.student("STU001").unwrap().department, "CS");
    }
}
