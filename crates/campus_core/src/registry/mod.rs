//! The record store.
//!
//! [`Registry`] holds the four entity collections and the university
//! profile, and is the only place that mutates them. Every mutation keeps
//! the cross-references between collections consistent:
//!
//! - a student's course list and each listed course's enrolled set are
//!   mutual inverses
//! - a course's assigned faculty and that member's taught set are mutual
//!   inverses
//! - a student's grade keys are a subset of their course list
//! - identifiers are unique within their collection
//! - deleting an entity removes every reference to it
//!
//! Repair only ever touches entities that exist. A student may list a
//! course identifier that is not (yet) in the store; the reference is kept,
//! and is linked up when that course is created.
//!
//! The registry has no side effects. Persistence and notification are the
//! job of [`crate::Database`].

mod cascade;
mod integrity;
mod patch;

pub use cascade::{DeleteImpact, Field, Reference};
pub use integrity::Violation;
pub use patch::{CoursePatch, DepartmentPatch, FacultyPatch, StudentPatch};

use crate::entity::{Course, Department, EntityKind, Faculty, Grades, Record, Student, University};
use crate::error::{CoreError, CoreResult};
use campus_codec::TableName;
use tracing::{debug, info};

/// A whole collection, or the university profile, replaced in one step.
///
/// Produced by the blob and row codecs and applied with
/// [`Registry::restore`].
#[derive(Debug, Clone, PartialEq)]
pub enum Collection {
    /// The students collection.
    Students(Vec<Student>),
    /// The faculty collection.
    Faculty(Vec<Faculty>),
    /// The courses collection.
    Courses(Vec<Course>),
    /// The departments collection.
    Departments(Vec<Department>),
    /// The university profile.
    University(University),
}

impl Collection {
    /// Returns the table this collection is stored in.
    #[must_use]
    pub fn table(&self) -> TableName {
        match self {
            Collection::Students(_) => TableName::Students,
            Collection::Faculty(_) => TableName::Faculty,
            Collection::Courses(_) => TableName::Courses,
            Collection::Departments(_) => TableName::Departments,
            Collection::University(_) => TableName::University,
        }
    }

    /// Returns the number of records (1 for the university profile).
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Collection::Students(v) => v.len(),
            Collection::Faculty(v) => v.len(),
            Collection::Courses(v) => v.len(),
            Collection::Departments(v) => v.len(),
            Collection::University(_) => 1,
        }
    }

    /// Returns true if the collection holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The in-memory record store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Registry {
    students: Vec<Student>,
    faculty: Vec<Faculty>,
    courses: Vec<Course>,
    departments: Vec<Department>,
    university: University,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // === Collections ===

    /// Returns all students in collection order.
    #[must_use]
    pub fn students(&self) -> &[Student] {
        &self.students
    }

    /// Returns all faculty members in collection order.
    #[must_use]
    pub fn faculty(&self) -> &[Faculty] {
        &self.faculty
    }

    /// Returns all courses in collection order.
    #[must_use]
    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    /// Returns all departments in collection order.
    #[must_use]
    pub fn departments(&self) -> &[Department] {
        &self.departments
    }

    /// Returns the university profile.
    #[must_use]
    pub fn university(&self) -> &University {
        &self.university
    }

    /// Returns the number of records of `kind`.
    #[must_use]
    pub fn count(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Student => self.students.len(),
            EntityKind::Faculty => self.faculty.len(),
            EntityKind::Course => self.courses.len(),
            EntityKind::Department => self.departments.len(),
        }
    }

    /// Returns true if every collection is empty and the profile is blank.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        EntityKind::ALL.iter().all(|&kind| self.count(kind) == 0)
            && self.university == University::default()
    }

    // === Lookup ===

    /// Returns the student with `id`.
    #[must_use]
    pub fn student(&self, id: &str) -> Option<&Student> {
        find(&self.students, id)
    }

    /// Returns the faculty member with `id`.
    #[must_use]
    pub fn faculty_member(&self, id: &str) -> Option<&Faculty> {
        find(&self.faculty, id)
    }

    /// Returns the course with `id`.
    #[must_use]
    pub fn course(&self, id: &str) -> Option<&Course> {
        find(&self.courses, id)
    }

    /// Returns the department with `id`.
    #[must_use]
    pub fn department(&self, id: &str) -> Option<&Department> {
        find(&self.departments, id)
    }

    /// Returns the department called `name`.
    #[must_use]
    pub fn department_named(&self, name: &str) -> Option<&Department> {
        self.departments.iter().find(|d| d.name == name)
    }

    /// Returns true if a record of `kind` with `id` exists.
    #[must_use]
    pub fn contains(&self, kind: EntityKind, id: &str) -> bool {
        match kind {
            EntityKind::Student => self.student(id).is_some(),
            EntityKind::Faculty => self.faculty_member(id).is_some(),
            EntityKind::Course => self.course(id).is_some(),
            EntityKind::Department => self.department(id).is_some(),
        }
    }

    /// Returns the display name of a record, if it exists.
    #[must_use]
    pub fn name_of(&self, kind: EntityKind, id: &str) -> Option<&str> {
        match kind {
            EntityKind::Student => self.student(id).map(Record::name),
            EntityKind::Faculty => self.faculty_member(id).map(Record::name),
            EntityKind::Course => self.course(id).map(Record::name),
            EntityKind::Department => self.department(id).map(Record::name),
        }
    }

    // === Search ===

    /// Returns students whose name contains `query`, ignoring case.
    #[must_use]
    pub fn search_students(&self, query: &str) -> Vec<&Student> {
        search(&self.students, query)
    }

    /// Returns faculty members whose name contains `query`, ignoring case.
    #[must_use]
    pub fn search_faculty(&self, query: &str) -> Vec<&Faculty> {
        search(&self.faculty, query)
    }

    /// Returns courses whose name contains `query`, ignoring case.
    #[must_use]
    pub fn search_courses(&self, query: &str) -> Vec<&Course> {
        search(&self.courses, query)
    }

    // === Create ===

    /// Adds a student.
    ///
    /// The student is added to the enrolled set of every listed course that
    /// exists, and picks up any existing course that already lists it.
    /// Grades for courses not in the list are dropped.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateIdentifier` if the id is taken, and
    /// `NonFiniteScore` if a grade is NaN or infinite.
    pub fn add_student(&mut self, mut student: Student) -> CoreResult<()> {
        if self.student(&student.id).is_some() {
            return Err(CoreError::duplicate(EntityKind::Student, student.id));
        }
        check_grades(&student.id, &student.grades)?;

        dedup_ids(&mut student.courses);
        for course in &self.courses {
            if course.has_student(&student.id) {
                push_unique(&mut student.courses, &course.id);
            }
        }
        student
            .grades
            .retain(|course, _| student.courses.contains(course));

        for course in &mut self.courses {
            if student.is_enrolled(&course.id) {
                push_unique(&mut course.enrolled_students, &student.id);
            }
        }

        debug!(id = %student.id, courses = student.courses.len(), "added student");
        self.students.push(student);
        Ok(())
    }

    /// Adds a faculty member.
    ///
    /// Every listed course that exists is assigned to the new member, taking
    /// it from its previous faculty member if it had one.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateIdentifier` if the id is taken.
    pub fn add_faculty(&mut self, mut member: Faculty) -> CoreResult<()> {
        if self.faculty_member(&member.id).is_some() {
            return Err(CoreError::duplicate(EntityKind::Faculty, member.id));
        }

        dedup_ids(&mut member.courses_taught);
        for course in &self.courses {
            if course.is_taught_by(&member.id) {
                push_unique(&mut member.courses_taught, &course.id);
            }
        }

        for course in &mut self.courses {
            if !member.teaches(&course.id) || course.is_taught_by(&member.id) {
                continue;
            }
            if let Some(previous) = course.assigned_faculty.replace(member.id.clone()) {
                if let Some(other) = self.faculty.iter_mut().find(|f| f.id == previous) {
                    remove_id(&mut other.courses_taught, &course.id);
                }
            }
        }

        debug!(id = %member.id, courses = member.courses_taught.len(), "added faculty");
        self.faculty.push(member);
        Ok(())
    }

    /// Adds a course.
    ///
    /// The course is added to its assigned faculty member's taught set and
    /// to the course list of every enrolled student that exists. Students
    /// and faculty that already list the course are linked up as well.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateIdentifier` if the id is taken.
    pub fn add_course(&mut self, mut course: Course) -> CoreResult<()> {
        if self.course(&course.id).is_some() {
            return Err(CoreError::duplicate(EntityKind::Course, course.id));
        }

        dedup_ids(&mut course.enrolled_students);
        for student in &self.students {
            if student.is_enrolled(&course.id) {
                push_unique(&mut course.enrolled_students, &student.id);
            }
        }
        for student in &mut self.students {
            if course.has_student(&student.id) {
                push_unique(&mut student.courses, &course.id);
            }
        }

        if course.assigned_faculty.is_none() {
            course.assigned_faculty = self
                .faculty
                .iter()
                .find(|f| f.teaches(&course.id))
                .map(|f| f.id.clone());
        }
        for member in &mut self.faculty {
            if course.is_taught_by(&member.id) {
                push_unique(&mut member.courses_taught, &course.id);
            } else {
                remove_id(&mut member.courses_taught, &course.id);
            }
        }

        debug!(id = %course.id, students = course.enrolled_students.len(), "added course");
        self.courses.push(course);
        Ok(())
    }

    /// Adds a department.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateIdentifier` if the id is taken.
    pub fn add_department(&mut self, mut department: Department) -> CoreResult<()> {
        if self.department(&department.id).is_some() {
            return Err(CoreError::duplicate(EntityKind::Department, department.id));
        }
        dedup_ids(&mut department.courses);
        debug!(id = %department.id, "added department");
        self.departments.push(department);
        Ok(())
    }

    // === Relationships ===

    /// Enrolls a student in a course, updating both sides.
    ///
    /// Returns false if the student was already enrolled.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if either the student or the course is missing.
    pub fn enroll(&mut self, student: &str, course: &str) -> CoreResult<bool> {
        let s = index_of(&self.students, student)?;
        let c = index_of(&self.courses, course)?;

        let listed = push_unique(&mut self.students[s].courses, course);
        let rostered = push_unique(&mut self.courses[c].enrolled_students, student);
        debug!(student, course, "enrolled");
        Ok(listed || rostered)
    }

    /// Withdraws a student from a course, dropping the course's grade.
    ///
    /// Returns false if the student was not enrolled.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if either the student or the course is missing.
    pub fn withdraw(&mut self, student: &str, course: &str) -> CoreResult<bool> {
        let s = index_of(&self.students, student)?;
        let c = index_of(&self.courses, course)?;

        let record = &mut self.students[s];
        let listed = remove_id(&mut record.courses, course);
        record.grades.remove(course);
        let rostered = remove_id(&mut self.courses[c].enrolled_students, student);
        debug!(student, course, "withdrew");
        Ok(listed || rostered)
    }

    /// Assigns `faculty` to `course`, or unassigns it with `None`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the course, or the named faculty member, is
    /// missing.
    pub fn assign_faculty(&mut self, course: &str, faculty: Option<&str>) -> CoreResult<()> {
        if let Some(member) = faculty {
            index_of(&self.faculty, member)?;
        }
        let c = index_of(&self.courses, course)?;
        self.relink_faculty(c, faculty.map(str::to_string));
        Ok(())
    }

    /// Records `score` for `course` on `student`, returning the previous one.
    ///
    /// The score is not range-checked; see [`crate::validate::score`].
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown student, `CourseNotEnrolled`
    /// if the course is not in the student's course list, and
    /// `NonFiniteScore` for NaN or infinite scores.
    pub fn set_score(&mut self, student: &str, course: &str, score: f64) -> CoreResult<Option<f64>> {
        let s = index_of(&self.students, student)?;
        if !score.is_finite() {
            return Err(CoreError::non_finite_score(student, course));
        }
        let record = &mut self.students[s];
        if !record.is_enrolled(course) {
            return Err(CoreError::CourseNotEnrolled {
                student: student.to_string(),
                course: course.to_string(),
            });
        }
        debug!(student, course, score, "set score");
        Ok(record.grades.insert(course.to_string(), score))
    }

    /// Removes the score for `course` from `student`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown student.
    pub fn remove_score(&mut self, student: &str, course: &str) -> CoreResult<Option<f64>> {
        let s = index_of(&self.students, student)?;
        Ok(self.students[s].grades.remove(course))
    }

    // === Bulk ===

    /// Replaces the university profile.
    pub fn set_university(&mut self, university: University) {
        debug!(name = %university.name, "set university");
        self.university = university;
    }

    /// Replaces a whole collection as-is.
    ///
    /// No cross-reference repair is performed; imported data is trusted the
    /// way it was exported. Use [`Registry::check_integrity`] to audit it.
    pub fn restore(&mut self, collection: Collection) {
        info!(table = %collection.table(), records = collection.len(), "restored collection");
        match collection {
            Collection::Students(v) => self.students = v,
            Collection::Faculty(v) => self.faculty = v,
            Collection::Courses(v) => self.courses = v,
            Collection::Departments(v) => self.departments = v,
            Collection::University(u) => self.university = u,
        }
    }

    /// Resets the registry to the empty default.
    pub fn clear(&mut self) {
        info!("cleared registry");
        *self = Self::default();
    }

    // === Internal ===

    /// Moves course `c` to `faculty`, keeping taught sets in step.
    fn relink_faculty(&mut self, c: usize, faculty: Option<String>) {
        let course = &mut self.courses[c];
        if course.assigned_faculty == faculty {
            return;
        }
        if let Some(previous) = course.assigned_faculty.take() {
            if let Some(member) = self.faculty.iter_mut().find(|f| f.id == previous) {
                remove_id(&mut member.courses_taught, &course.id);
            }
        }
        if let Some(next) = &faculty {
            if let Some(member) = self.faculty.iter_mut().find(|f| f.id == *next) {
                push_unique(&mut member.courses_taught, &course.id);
            }
        }
        debug!(course = %course.id, faculty = ?faculty, "assigned faculty");
        course.assigned_faculty = faculty;
    }
}

fn find<'a, R: Record>(items: &'a [R], id: &str) -> Option<&'a R> {
    items.iter().find(|r| r.id() == id)
}

fn index_of<R: Record>(items: &[R], id: &str) -> CoreResult<usize> {
    items
        .iter()
        .position(|r| r.id() == id)
        .ok_or_else(|| CoreError::not_found(R::KIND, id))
}

fn search<'a, R: Record>(items: &'a [R], query: &str) -> Vec<&'a R> {
    let needle = query.trim().to_lowercase();
    items
        .iter()
        .filter(|r| r.name().to_lowercase().contains(&needle))
        .collect()
}

/// Appends `id` unless present. Returns whether it was added.
fn push_unique(list: &mut Vec<String>, id: &str) -> bool {
    if list.iter().any(|x| x == id) {
        false
    } else {
        list.push(id.to_string());
        true
    }
}

/// Removes every occurrence of `id`. Returns whether any was removed.
fn remove_id(list: &mut Vec<String>, id: &str) -> bool {
    let before = list.len();
    list.retain(|x| x != id);
    list.len() != before
}

/// Rejects grade maps holding NaN or infinite scores.
fn check_grades(student: &str, grades: &Grades) -> CoreResult<()> {
    match grades.iter().find(|(_, score)| !score.is_finite()) {
        Some((course, _)) => Err(CoreError::non_finite_score(student, course.as_str())),
        None => Ok(()),
    }
}

/// Drops repeated ids, keeping first occurrences in order.
fn dedup_ids(list: &mut Vec<String>) {
    let mut seen = std::collections::HashSet::new();
    list.retain(|id| seen.insert(id.clone()));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> Registry {
        let mut registry = Registry::new();
        registry
            .add_faculty(Faculty::new("FAC001", "Dr. James Anderson", "Computer Science"))
            .unwrap();
        registry
            .add_course(Course::new("CS101", "Introduction to Programming", 3).with_faculty("FAC001"))
            .unwrap();
        registry
            .add_course(Course::new("MATH101", "Calculus I", 3))
            .unwrap();
        registry
    }

    #[test]
    fn create_then_read_returns_record() {
        let mut registry = registry();
        let student = Student::new("STU001", "Alice Johnson", 20, "Female", "Computer Science")
            .with_grade("CS101", 3.7);
        registry.add_student(student.clone()).unwrap();
        assert_eq!(registry.student("STU001"), Some(&student));
    }

    #[test]
    fn create_student_links_courses() {
        let mut registry = registry();
        registry
            .add_student(Student::new("STU001", "Alice", 20, "Female", "CS").with_course("CS101"))
            .unwrap();
        assert!(registry.course("CS101").unwrap().has_student("STU001"));
        assert!(!registry.course("MATH101").unwrap().has_student("STU001"));
    }

    #[test]
    fn create_course_links_faculty() {
        let registry = registry();
        assert!(registry.faculty_member("FAC001").unwrap().teaches("CS101"));
    }

    #[test]
    fn duplicate_create_leaves_store_unchanged() {
        let mut registry = registry();
        let before = registry.clone();
        let err = registry
            .add_course(Course::new("CS101", "Another", 4))
            .unwrap_err();
        assert!(matches!(err, CoreError::DuplicateIdentifier { kind: EntityKind::Course, .. }));
        assert_eq!(registry, before);
    }

    #[test]
    fn create_drops_grades_for_unlisted_courses() {
        let mut registry = registry();
        let mut student = Student::new("STU001", "Alice", 20, "Female", "CS").with_course("CS101");
        student.grades.insert("MATH101".to_string(), 3.0);
        registry.add_student(student).unwrap();
        assert!(registry.student("STU001").unwrap().grades.is_empty());
    }

    #[test]
    fn unknown_course_reference_is_linked_when_course_arrives() {
        let mut registry = Registry::new();
        registry
            .add_student(Student::new("STU001", "Alice", 20, "Female", "CS").with_course("CS500"))
            .unwrap();
        registry.add_course(Course::new("CS500", "Compilers", 4)).unwrap();
        assert!(registry.course("CS500").unwrap().has_student("STU001"));
        assert!(registry.check_integrity().is_empty());
    }

    #[test]
    fn faculty_create_takes_over_listed_courses() {
        let mut registry = registry();
        registry
            .add_faculty(Faculty::new("FAC002", "Prof. Lisa Martinez", "CS").with_course("CS101"))
            .unwrap();
        assert_eq!(
            registry.course("CS101").unwrap().assigned_faculty.as_deref(),
            Some("FAC002")
        );
        assert!(!registry.faculty_member("FAC001").unwrap().teaches("CS101"));
        assert!(registry.check_integrity().is_empty());
    }

    #[test]
    fn enroll_and_withdraw_keep_both_sides() {
        let mut registry = registry();
        registry
            .add_student(Student::new("STU001", "Alice", 20, "Female", "CS"))
            .unwrap();

        assert!(registry.enroll("STU001", "MATH101").unwrap());
        assert!(!registry.enroll("STU001", "MATH101").unwrap());
        registry.set_score("STU001", "MATH101", 3.9).unwrap();
        assert!(registry.course("MATH101").unwrap().has_student("STU001"));

        assert!(registry.withdraw("STU001", "MATH101").unwrap());
        let student = registry.student("STU001").unwrap();
        assert!(student.courses.is_empty());
        assert!(student.grades.is_empty());
        assert!(!registry.course("MATH101").unwrap().has_student("STU001"));
    }

    #[test]
    fn enroll_requires_both_records() {
        let mut registry = registry();
        let err = registry.enroll("STU404", "CS101").unwrap_err();
        assert!(matches!(err, CoreError::NotFound { kind: EntityKind::Student, .. }));
    }

    #[test]
    fn score_requires_enrollment() {
        let mut registry = registry();
        registry
            .add_student(Student::new("STU001", "Alice", 20, "Female", "CS").with_course("CS101"))
            .unwrap();

        assert_eq!(registry.set_score("STU001", "CS101", 3.2).unwrap(), None);
        assert_eq!(registry.set_score("STU001", "CS101", 3.4).unwrap(), Some(3.2));
        let err = registry.set_score("STU001", "MATH101", 3.0).unwrap_err();
        assert!(matches!(err, CoreError::CourseNotEnrolled { .. }));
    }

    #[test]
    fn out_of_range_scores_are_accepted() {
        let mut registry = registry();
        registry
            .add_student(Student::new("STU001", "Alice", 20, "Female", "CS").with_course("CS101"))
            .unwrap();
        registry.set_score("STU001", "CS101", 9.5).unwrap();
        assert_eq!(registry.student("STU001").unwrap().grades["CS101"], 9.5);
    }

    #[test]
    fn non_finite_scores_are_rejected() {
        let mut registry = registry();
        registry
            .add_student(Student::new("STU001", "Alice", 20, "Female", "CS").with_course("CS101").with_grade("CS101", 3.2))
            .unwrap();
        let before = registry.clone();

        for score in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = registry.set_score("STU001", "CS101", score).unwrap_err();
            assert!(matches!(err, CoreError::NonFiniteScore { .. }));
        }
        let err = registry
            .add_student(Student::new("STU002", "Bob", 22, "Male", "CS").with_course("CS101").with_grade("CS101", f64::NAN))
            .unwrap_err();
        assert!(matches!(err, CoreError::NonFiniteScore { ref student, .. } if student == "STU002"));
        assert_eq!(registry, before);

        // what was accepted still survives a blob reload
        let (decoded, issues) = crate::blob::decode_registry(&crate::blob::encode(&registry).unwrap());
        assert!(issues.is_empty());
        assert_eq!(decoded, registry);
    }

    #[test]
    fn assign_faculty_moves_course() {
        let mut registry = registry();
        registry
            .add_faculty(Faculty::new("FAC002", "Prof. Lisa Martinez", "CS"))
            .unwrap();

        registry.assign_faculty("CS101", Some("FAC002")).unwrap();
        assert!(!registry.faculty_member("FAC001").unwrap().teaches("CS101"));
        assert!(registry.faculty_member("FAC002").unwrap().teaches("CS101"));

        registry.assign_faculty("CS101", None).unwrap();
        assert!(registry.course("CS101").unwrap().assigned_faculty.is_none());
        assert!(!registry.faculty_member("FAC002").unwrap().teaches("CS101"));

        assert!(registry.assign_faculty("CS101", Some("FAC404")).is_err());
    }

    #[test]
    fn search_ignores_case() {
        let registry = registry();
        let found = registry.search_courses("CALCULUS");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "MATH101");
        assert_eq!(registry.search_faculty("").len(), 1);
    }

    #[test]
    fn clear_resets_everything() {
        let mut registry = registry();
        registry.set_university(University::new("Lincoln University", "Education City"));
        registry.clear();
        assert!(registry.is_empty());
    }

    #[test]
    fn restore_replaces_collection_verbatim() {
        let mut registry = registry();
        registry.restore(Collection::Courses(vec![Course::new("X1", "Only", 1)]));
        assert_eq!(registry.courses().len(), 1);
        // no repair on restore
        assert!(registry.faculty_member("FAC001").unwrap().teaches("CS101"));
    }
}
