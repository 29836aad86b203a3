//! Cross-crate properties of the record store, its codecs and its views.

use campus_core::views::{self, average_score, format_average};
use campus_core::{
    blob, CoreError, Course, EntityKind, Faculty, Grades, Registry, Student, StudentPatch,
};
use campus_testkit::prelude::*;
use proptest::prelude::*;

#[test]
fn updating_course_list_moves_roster_membership() {
    let mut db = TestDatabase::sample();

    // STU001 takes CS101, MATH101, BUS101
    db.update_student("STU001", StudentPatch::new().courses(["CS101", "PHY101"]))
        .unwrap();

    let registry = db.registry();
    assert!(registry.course("CS101").unwrap().has_student("STU001"));
    assert!(registry.course("PHY101").unwrap().has_student("STU001"));
    assert!(!registry.course("MATH101").unwrap().has_student("STU001"));
    assert!(!registry.course("BUS101").unwrap().has_student("STU001"));

    // the grades for dropped courses go with them
    let grades = &registry.student("STU001").unwrap().grades;
    assert_eq!(grades.keys().collect::<Vec<_>>(), ["CS101"]);
    assert!(db.check_integrity().is_empty());
}

#[test]
fn deleting_a_course_purges_every_reference() {
    let mut db = TestDatabase::sample();
    let impact = db.delete(EntityKind::Course, "CS101").unwrap();
    assert!(!impact.purged.is_empty());

    let registry = db.registry();
    for student in registry.students() {
        assert!(!student.is_enrolled("CS101"), "{} still lists CS101", student.id);
        assert!(!student.grades.contains_key("CS101"));
    }
    assert!(!registry.faculty_member("FAC001").unwrap().teaches("CS101"));
    assert!(!registry.department("DEPT001").unwrap().courses.iter().any(|c| c == "CS101"));
    assert!(db.check_integrity().is_empty());
}

#[test]
fn deleting_faculty_and_students_cleans_up() {
    let mut db = TestDatabase::sample();
    db.delete(EntityKind::Faculty, "FAC001").unwrap();
    db.delete(EntityKind::Student, "STU002").unwrap();

    let registry = db.registry();
    assert_eq!(registry.course("CS101").unwrap().assigned_faculty, None);
    assert_eq!(registry.course("CS201").unwrap().assigned_faculty, None);
    for course in registry.courses() {
        assert!(!course.has_student("STU002"));
    }
    assert!(db.check_integrity().is_empty());
}

#[test]
fn averages_and_formatting() {
    let grades: Grades = [("CS101".to_string(), 3.7), ("MATH101".to_string(), 3.9)]
        .into_iter()
        .collect();
    assert_eq!(format_average(average_score(&grades)), "3.80");
    assert_eq!(average_score(&Grades::new()), 0.0);
}

#[test]
fn top_three_of_sample() {
    let db = TestDatabase::sample();
    // averages: 3.80, 3.50, 3.90, 3.50, 3.70
    let top: Vec<&str> = views::top_students(db.registry().students(), 3)
        .into_iter()
        .map(|s| s.id.as_str())
        .collect();
    assert_eq!(top, ["STU003", "STU001", "STU005"]);
}

#[test]
fn top_three_with_ties() {
    let mut registry = Registry::new();
    for (id, score) in [("A", 3.8), ("B", 3.5), ("C", 4.0), ("D", 3.5), ("E", 3.7)] {
        registry
            .add_student(Student::new(id, id, 20, "Female", "Physics").with_grade("X", score))
            .unwrap();
    }
    let top: Vec<&str> = views::top_students(registry.students(), 3)
        .into_iter()
        .map(|s| s.id.as_str())
        .collect();
    assert_eq!(top, ["C", "A", "E"]);
}

#[test]
fn file_database_survives_reopen() {
    let mut db = TestDatabase::file();
    db.load_sample();
    db.add_faculty(Faculty::new("FAC006", "Dr. Nora Quinn", "Physics").with_course("PHY201"))
        .unwrap();

    let db = db.reopen();
    let member = db.registry().faculty_member("FAC006").unwrap();
    assert!(member.teaches("PHY201"));
    assert_eq!(
        db.registry().course("PHY201").unwrap().assigned_faculty.as_deref(),
        Some("FAC006")
    );
    assert!(!db.registry().faculty_member("FAC004").unwrap().teaches("PHY201"));
}

#[test]
fn malformed_blob_opens_with_defaults() {
    let db = TestDatabase::from_blob(r#"{"students": 7, "courses": [{"id": "CS101", "name": "Intro", "creditHours": 3}]}"#);
    assert!(db.registry().students().is_empty());
    assert_eq!(db.registry().courses().len(), 1);
    assert!(matches!(
        db.load_report().issues[0],
        CoreError::MalformedPersistedState { .. }
    ));
}

proptest! {
    #![proptest_config(PropTestConfig::default().to_proptest_config())]

    #[test]
    fn create_then_read(student in clean_student_strategy()) {
        let mut registry = Registry::new();
        for id in COURSE_IDS {
            registry.add_course(Course::new(*id, *id, 3)).unwrap();
        }
        registry.add_student(student.clone()).unwrap();
        prop_assert_eq!(registry.student(&student.id), Some(&student));
        for course in &student.courses {
            prop_assert!(registry.course(course).unwrap().has_student(&student.id));
        }
    }

    #[test]
    fn duplicate_create_leaves_store_unchanged(
        registry in registry_strategy(),
        student in student_strategy(),
    ) {
        let mut registry = registry;
        let before = registry.clone();
        let taken = registry.student(&student.id).is_some();
        let result = registry.add_student(student);
        if taken {
            let is_duplicate = matches!(result, Err(CoreError::DuplicateIdentifier { .. }));
            prop_assert!(is_duplicate);
            prop_assert_eq!(registry, before);
        } else {
            prop_assert!(result.is_ok());
        }
    }

    #[test]
    fn operations_keep_integrity(ops in operation_sequence_strategy(1, 64)) {
        let mut registry = Registry::new();
        for op in &ops {
            let _ = op.apply(&mut registry);
            let violations = registry.check_integrity();
            prop_assert!(violations.is_empty(), "after {:?}: {:?}", op, violations);
        }
    }

    #[test]
    fn failed_operations_change_nothing(
        registry in registry_strategy(),
        op in operation_strategy(),
    ) {
        let mut after = registry.clone();
        if op.apply(&mut after).is_err() {
            prop_assert_eq!(after, registry);
        }
    }

    #[test]
    fn blob_round_trip(registry in registry_strategy()) {
        let text = blob::encode(&registry).unwrap();
        let (decoded, issues) = blob::decode_registry(&text);
        prop_assert!(issues.is_empty());
        prop_assert_eq!(decoded, registry);
    }

    #[test]
    fn workbook_round_trip_preserves_registry(registry in registry_strategy()) {
        prop_assert_eq!(workbook_round_trip(&registry), registry);
    }
}

proptest! {
    #![proptest_config(PropTestConfig::quick().to_proptest_config())]

    #[test]
    fn database_persists_every_operation(ops in operation_sequence_strategy(1, 24)) {
        let mut db = TestDatabase::memory();
        for op in &ops {
            let _ = op.apply_to(&mut db);
        }
        prop_assert!(db.check_integrity().is_empty());
        prop_assert!(db.last_persist_error().is_none());
        prop_assert!(!db.is_dirty());
    }
}
