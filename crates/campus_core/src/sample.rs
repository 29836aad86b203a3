//! Demonstration dataset.

use crate::entity::{Course, Department, Faculty, Student, University};
use crate::registry::{Collection, Registry};

const DEPARTMENTS: &[(&str, &str, &str, &[&str])] = &[
    ("DEPT001", "Computer Science", "Dr. Sarah Johnson", &["CS101", "CS201", "CS301"]),
    ("DEPT002", "Mathematics", "Dr. Michael Chen", &["MATH101", "MATH201"]),
    ("DEPT003", "Physics", "Dr. Emily Davis", &["PHY101", "PHY201"]),
    ("DEPT004", "Business Administration", "Dr. Robert Williams", &["BUS101", "BUS201"]),
];

const COURSES: &[(&str, &str, u32, &str, &[&str])] = &[
    ("CS101", "Introduction to Programming", 3, "FAC001", &["STU001", "STU002", "STU003"]),
    ("CS201", "Data Structures", 4, "FAC001", &["STU002", "STU004"]),
    ("CS301", "Algorithms", 4, "FAC002", &["STU003"]),
    ("MATH101", "Calculus I", 3, "FAC003", &["STU001", "STU005"]),
    ("MATH201", "Linear Algebra", 3, "FAC003", &["STU002"]),
    ("PHY101", "Physics I", 4, "FAC004", &["STU004", "STU005"]),
    ("PHY201", "Quantum Mechanics", 4, "FAC004", &["STU003"]),
    ("BUS101", "Introduction to Business", 3, "FAC005", &["STU001"]),
];

const FACULTY: &[(&str, &str, &str, &[&str])] = &[
    ("FAC001", "Dr. James Anderson", "Computer Science", &["CS101", "CS201"]),
    ("FAC002", "Prof. Lisa Martinez", "Computer Science", &["CS301"]),
    ("FAC003", "Dr. David Kim", "Mathematics", &["MATH101", "MATH201"]),
    ("FAC004", "Dr. Emma Thompson", "Physics", &["PHY101", "PHY201"]),
    ("FAC005", "Prof. John Smith", "Business Administration", &["BUS101"]),
];

type StudentRow = (&'static str, &'static str, u32, &'static str, &'static str, &'static [(&'static str, f64)]);

const STUDENTS: &[StudentRow] = &[
    ("STU001", "Alice Johnson", 20, "Female", "Computer Science", &[("CS101", 3.7), ("MATH101", 3.9), ("BUS101", 3.8)]),
    ("STU002", "Bob Williams", 21, "Male", "Computer Science", &[("CS101", 3.5), ("CS201", 3.6), ("MATH201", 3.4)]),
    ("STU003", "Carol Davis", 19, "Female", "Computer Science", &[("CS101", 4.0), ("CS301", 3.9), ("PHY201", 3.8)]),
    ("STU004", "David Miller", 22, "Male", "Physics", &[("CS201", 3.3), ("PHY101", 3.7)]),
    ("STU005", "Emma Garcia", 20, "Female", "Mathematics", &[("MATH101", 3.8), ("PHY101", 3.6)]),
];

/// Returns the demonstration registry: Lincoln University with four
/// departments, eight courses, five faculty members and five students.
///
/// The data is cross-referenced consistently. Department `DEPT004` lists a
/// course `BUS201` that does not exist.
#[must_use]
pub fn sample_registry() -> Registry {
    let departments = DEPARTMENTS
        .iter()
        .map(|&(id, name, head, courses)| {
            courses
                .iter()
                .fold(Department::new(id, name, head), |d, &c| d.with_course(c))
        })
        .collect();

    let courses = COURSES
        .iter()
        .map(|&(id, name, hours, faculty, students)| {
            students
                .iter()
                .fold(Course::new(id, name, hours).with_faculty(faculty), |c, &s| c.with_student(s))
        })
        .collect();

    let faculty = FACULTY
        .iter()
        .map(|&(id, name, department, courses)| {
            courses
                .iter()
                .fold(Faculty::new(id, name, department), |f, &c| f.with_course(c))
        })
        .collect();

    let students = STUDENTS
        .iter()
        .map(|&(id, name, age, gender, department, grades)| {
            grades
                .iter()
                .fold(Student::new(id, name, age, gender, department), |s, &(c, score)| {
                    s.with_grade(c, score)
                })
        })
        .collect();

    let mut registry = Registry::new();
    registry.restore(Collection::Departments(departments));
    registry.restore(Collection::Courses(courses));
    registry.restore(Collection::Faculty(faculty));
    registry.restore(Collection::Students(students));
    registry.restore(Collection::University(University::new(
        "Lincoln University",
        "123 Academic Ave, Education City, EC 12345",
    )));
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_is_consistent() {
        let registry = sample_registry();
        assert!(registry.check_integrity().is_empty());
        assert_eq!(registry.students().len(), 5);
        assert_eq!(registry.courses().len(), 8);
        assert_eq!(registry.student("STU001").unwrap().courses, ["CS101", "MATH101", "BUS101"]);
    }
}
