//! Property-based test generators using proptest.
//!
//! Identifiers are drawn from small fixed pools so that generated
//! operations collide often: duplicate creates, references to records
//! that do not exist yet, and deletes of records that are referenced.

use campus_core::{
    Course, CoreResult, Database, Department, EntityKind, Faculty, Registry, Student, StudentPatch,
};
use proptest::prelude::*;

/// Student identifiers used by the generators.
pub const STUDENT_IDS: &[&str] = &["STU001", "STU002", "STU003", "STU004", "STU005", "STU006"];
/// Faculty identifiers used by the generators.
pub const FACULTY_IDS: &[&str] = &["FAC001", "FAC002", "FAC003", "FAC004"];
/// Course identifiers used by the generators.
pub const COURSE_IDS: &[&str] = &["CS101", "CS201", "MATH101", "MATH201", "PHY101", "BUS101"];
/// Department identifiers used by the generators.
pub const DEPARTMENT_IDS: &[&str] = &["DEPT001", "DEPT002", "DEPT003"];
/// Department names used by the generators.
pub const DEPARTMENT_NAMES: &[&str] = &["Computer Science", "Mathematics", "Physics"];

const GENDERS: &[&str] = &["Female", "Male"];

fn pool(kind: EntityKind) -> &'static [&'static str] {
    match kind {
        EntityKind::Student => STUDENT_IDS,
        EntityKind::Faculty => FACULTY_IDS,
        EntityKind::Course => COURSE_IDS,
        EntityKind::Department => DEPARTMENT_IDS,
    }
}

/// Strategy for an identifier from the pool of `kind`.
pub fn id_strategy(kind: EntityKind) -> impl Strategy<Value = String> {
    prop::sample::select(pool(kind)).prop_map(str::to_string)
}

/// Strategy for a list of identifiers of `kind`, possibly with repeats.
pub fn id_list_strategy(kind: EntityKind, max: usize) -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(id_strategy(kind), 0..=max)
}

/// Strategy for person and course names.
pub fn name_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Z][a-z]{2,8}( [A-Z][a-z]{2,8})?").expect("Invalid regex")
}

/// Strategy for scores between 0.0 and 4.0 in steps of 0.1.
pub fn score_strategy() -> impl Strategy<Value = f64> {
    (0u32..=40).prop_map(|n| f64::from(n) / 10.0)
}

/// Strategy for students, whose grades may name courses they do not list.
pub fn student_strategy() -> impl Strategy<Value = Student> {
    (
        id_strategy(EntityKind::Student),
        name_strategy(),
        17u32..30,
        prop::sample::select(GENDERS),
        prop::sample::select(DEPARTMENT_NAMES),
        id_list_strategy(EntityKind::Course, 4),
        prop::collection::vec((id_strategy(EntityKind::Course), score_strategy()), 0..3),
    )
        .prop_map(|(id, name, age, gender, department, courses, grades)| {
            let mut student = Student::new(id, name, age, gender, department);
            student.courses = courses;
            student.grades.extend(grades);
            student
        })
}

/// Strategy for students whose course list has no repeats and whose grades
/// only name listed courses.
pub fn clean_student_strategy() -> impl Strategy<Value = Student> {
    (
        id_strategy(EntityKind::Student),
        name_strategy(),
        17u32..30,
        prop::sample::subsequence(COURSE_IDS, 0..=COURSE_IDS.len()),
        prop::collection::vec(score_strategy(), COURSE_IDS.len()),
    )
        .prop_map(|(id, name, age, courses, scores)| {
            courses
                .into_iter()
                .zip(scores)
                .fold(Student::new(id, name, age, "Female", "Physics"), |s, (c, score)| {
                    s.with_grade(c, score)
                })
        })
}

/// Strategy for faculty members.
pub fn faculty_strategy() -> impl Strategy<Value = Faculty> {
    (
        id_strategy(EntityKind::Faculty),
        name_strategy(),
        prop::sample::select(DEPARTMENT_NAMES),
        id_list_strategy(EntityKind::Course, 3),
    )
        .prop_map(|(id, name, department, courses)| {
            let mut member = Faculty::new(id, name, department);
            member.courses_taught = courses;
            member
        })
}

/// Strategy for courses.
pub fn course_strategy() -> impl Strategy<Value = Course> {
    (
        id_strategy(EntityKind::Course),
        name_strategy(),
        1u32..6,
        prop::option::of(id_strategy(EntityKind::Faculty)),
        id_list_strategy(EntityKind::Student, 4),
    )
        .prop_map(|(id, name, hours, faculty, students)| {
            let mut course = Course::new(id, name, hours);
            course.assigned_faculty = faculty;
            course.enrolled_students = students;
            course
        })
}

/// Strategy for departments.
pub fn department_strategy() -> impl Strategy<Value = Department> {
    (
        id_strategy(EntityKind::Department),
        prop::sample::select(DEPARTMENT_NAMES),
        name_strategy(),
        id_list_strategy(EntityKind::Course, 3),
    )
        .prop_map(|(id, name, head, courses)| {
            let mut department = Department::new(id, name, head);
            department.courses = courses;
            department
        })
}

/// A mutation of the record store.
#[derive(Debug, Clone)]
pub enum RegistryOperation {
    /// Add a student.
    AddStudent(Student),
    /// Add a faculty member.
    AddFaculty(Faculty),
    /// Add a course.
    AddCourse(Course),
    /// Add a department.
    AddDepartment(Department),
    /// Replace a student's course list.
    SetCourses {
        /// Student id.
        student: String,
        /// New course list.
        courses: Vec<String>,
    },
    /// Enroll a student in a course.
    Enroll {
        /// Student id.
        student: String,
        /// Course id.
        course: String,
    },
    /// Withdraw a student from a course.
    Withdraw {
        /// Student id.
        student: String,
        /// Course id.
        course: String,
    },
    /// Assign or unassign a course's faculty member.
    AssignFaculty {
        /// Course id.
        course: String,
        /// Faculty id, or none to unassign.
        faculty: Option<String>,
    },
    /// Record a score.
    SetScore {
        /// Student id.
        student: String,
        /// Course id.
        course: String,
        /// Score.
        score: f64,
    },
    /// Delete a record of any kind.
    Delete {
        /// Kind of record.
        kind: EntityKind,
        /// Record id.
        id: String,
    },
}

impl RegistryOperation {
    /// Applies the operation to a registry.
    ///
    /// # Errors
    ///
    /// Returns whatever the registry rejects the operation with.
    pub fn apply(&self, registry: &mut Registry) -> CoreResult<()> {
        match self {
            Self::AddStudent(s) => registry.add_student(s.clone()),
            Self::AddFaculty(f) => registry.add_faculty(f.clone()),
            Self::AddCourse(c) => registry.add_course(c.clone()),
            Self::AddDepartment(d) => registry.add_department(d.clone()),
            Self::SetCourses { student, courses } => {
                registry.update_student(student, StudentPatch::new().courses(courses.clone()))
            }
            Self::Enroll { student, course } => registry.enroll(student, course).map(drop),
            Self::Withdraw { student, course } => registry.withdraw(student, course).map(drop),
            Self::AssignFaculty { course, faculty } => {
                registry.assign_faculty(course, faculty.as_deref())
            }
            Self::SetScore {
                student,
                course,
                score,
            } => registry.set_score(student, course, *score).map(drop),
            Self::Delete { kind, id } => registry.delete(*kind, id).map(drop),
        }
    }

    /// Applies the operation through a database, persisting it.
    ///
    /// # Errors
    ///
    /// Returns whatever the database rejects the operation with.
    pub fn apply_to(&self, db: &mut Database) -> CoreResult<()> {
        match self {
            Self::AddStudent(s) => db.add_student(s.clone()),
            Self::AddFaculty(f) => db.add_faculty(f.clone()),
            Self::AddCourse(c) => db.add_course(c.clone()),
            Self::AddDepartment(d) => db.add_department(d.clone()),
            Self::SetCourses { student, courses } => {
                db.update_student(student, StudentPatch::new().courses(courses.clone()))
            }
            Self::Enroll { student, course } => db.enroll(student, course).map(drop),
            Self::Withdraw { student, course } => db.withdraw(student, course).map(drop),
            Self::AssignFaculty { course, faculty } => db.assign_faculty(course, faculty.as_deref()),
            Self::SetScore {
                student,
                course,
                score,
            } => db.set_score(student, course, *score).map(drop),
            Self::Delete { kind, id } => db.delete(*kind, id).map(drop),
        }
    }
}

/// Strategy for a single registry operation.
pub fn operation_strategy() -> impl Strategy<Value = RegistryOperation> {
    let student = || id_strategy(EntityKind::Student);
    let course = || id_strategy(EntityKind::Course);
    prop_oneof![
        3 => student_strategy().prop_map(RegistryOperation::AddStudent),
        2 => faculty_strategy().prop_map(RegistryOperation::AddFaculty),
        3 => course_strategy().prop_map(RegistryOperation::AddCourse),
        1 => department_strategy().prop_map(RegistryOperation::AddDepartment),
        2 => (student(), id_list_strategy(EntityKind::Course, 4))
            .prop_map(|(student, courses)| RegistryOperation::SetCourses { student, courses }),
        3 => (student(), course())
            .prop_map(|(student, course)| RegistryOperation::Enroll { student, course }),
        1 => (student(), course())
            .prop_map(|(student, course)| RegistryOperation::Withdraw { student, course }),
        2 => (course(), prop::option::of(id_strategy(EntityKind::Faculty)))
            .prop_map(|(course, faculty)| RegistryOperation::AssignFaculty { course, faculty }),
        2 => (student(), course(), score_strategy()).prop_map(|(student, course, score)| {
            RegistryOperation::SetScore {
                student,
                course,
                score,
            }
        }),
        2 => (prop::sample::select(EntityKind::ALL.to_vec()), 0usize..8).prop_map(|(kind, i)| {
            let ids = pool(kind);
            RegistryOperation::Delete {
                kind,
                id: ids[i % ids.len()].to_string(),
            }
        }),
    ]
}

/// Strategy for generating a sequence of operations.
pub fn operation_sequence_strategy(
    min_ops: usize,
    max_ops: usize,
) -> impl Strategy<Value = Vec<RegistryOperation>> {
    prop::collection::vec(operation_strategy(), min_ops..max_ops)
}

/// Strategy for registries built only through registry operations.
pub fn registry_strategy() -> impl Strategy<Value = Registry> {
    operation_sequence_strategy(0, 48).prop_map(|ops| {
        let mut registry = Registry::new();
        for op in &ops {
            let _ = op.apply(&mut registry);
        }
        registry
    })
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Creates a configuration for quick tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #![proptest_config(PropTestConfig::quick().to_proptest_config())]

        #[test]
        fn scores_are_in_range(score in score_strategy()) {
            prop_assert!((0.0..=4.0).contains(&score));
        }

        #[test]
        fn clean_students_grade_only_listed_courses(student in clean_student_strategy()) {
            for course in student.grades.keys() {
                prop_assert!(student.is_enrolled(course));
            }
            prop_assert_eq!(student.grades.len(), student.courses.len());
        }

        #[test]
        fn generated_registries_have_unique_ids(registry in registry_strategy()) {
            let mut ids: Vec<&str> = registry.students().iter().map(|s| s.id.as_str()).collect();
            let before = ids.len();
            ids.sort_unstable();
            ids.dedup();
            prop_assert_eq!(ids.len(), before);
        }
    }
}
