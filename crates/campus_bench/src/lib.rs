//! Benchmark utilities.

#![deny(unsafe_code)]
#![warn(missing_docs)]

use campus_core::{Registry, Student};
use rand::seq::SliceRandom;
use rand::Rng;

pub use campus_testkit::scenarios::populated_registry;

/// Generates a student enrolled in `courses` random courses of `registry`,
/// with random scores.
pub fn random_student(registry: &Registry, id: &str, courses: usize) -> Student {
    let mut rng = rand::thread_rng();
    let mut student = Student::new(id, format!("Student {id}"), rng.gen_range(17..30), "Female", "Physics");
    for course in registry.courses().choose_multiple(&mut rng, courses) {
        let score = f64::from(rng.gen_range(0u32..=40)) / 10.0;
        student = student.with_grade(course.id.clone(), score);
    }
    student
}

/// Picks a random course id of `registry`.
pub fn random_course_id(registry: &Registry) -> Option<String> {
    registry
        .courses()
        .choose(&mut rand::thread_rng())
        .map(|c| c.id.clone())
}
