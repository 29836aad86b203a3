//! Test fixtures and database helpers.
//!
//! Provides convenience functions for setting up test databases
//! and common test scenarios.

use campus_codec::Workbook;
use campus_core::{rows, Config, Database, LocalPersistence, Registry, DEFAULT_STORAGE_KEY};
use campus_storage::InMemoryStore;
use std::path::Path;
use tempfile::TempDir;

pub use campus_core::sample::sample_registry;

/// A test database with automatic cleanup.
pub struct TestDatabase {
    /// The database instance.
    pub db: Database,
    /// The temporary directory (kept alive to prevent cleanup).
    temp_dir: Option<TempDir>,
}

impl TestDatabase {
    /// Creates a new in-memory test database.
    pub fn memory() -> Self {
        Self {
            db: Database::open_in_memory().expect("Failed to open in-memory database"),
            temp_dir: None,
        }
    }

    /// Creates a new file-based test database in a temporary directory.
    pub fn file() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let db = Database::open(temp_dir.path()).expect("Failed to open file database");
        Self {
            db,
            temp_dir: Some(temp_dir),
        }
    }

    /// Creates an in-memory database holding the demonstration dataset.
    pub fn sample() -> Self {
        let mut test_db = Self::memory();
        test_db.db.load_sample();
        test_db
    }

    /// Creates an in-memory database whose store already holds `blob`
    /// under the default key.
    pub fn from_blob(blob: &str) -> Self {
        let store = InMemoryStore::with_value(DEFAULT_STORAGE_KEY, blob);
        let persistence = LocalPersistence::new(store, DEFAULT_STORAGE_KEY);
        let db = Database::open_with_persistence(Config::default(), Box::new(persistence))
            .expect("Failed to open database over blob");
        Self { db, temp_dir: None }
    }

    /// Returns the data directory if file-based, None if in-memory.
    pub fn path(&self) -> Option<&Path> {
        self.temp_dir.as_ref().map(TempDir::path)
    }

    /// Closes and reopens a file-based database from disk.
    ///
    /// # Panics
    ///
    /// Panics for in-memory databases.
    #[must_use]
    pub fn reopen(self) -> Self {
        let Self { db, temp_dir } = self;
        let temp_dir = temp_dir.expect("Only file databases can be reopened");
        drop(db);
        let db = Database::open(temp_dir.path()).expect("Failed to reopen file database");
        Self {
            db,
            temp_dir: Some(temp_dir),
        }
    }
}

impl std::ops::Deref for TestDatabase {
    type Target = Database;

    fn deref(&self) -> &Self::Target {
        &self.db
    }
}

impl std::ops::DerefMut for TestDatabase {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.db
    }
}

/// Runs a test with a temporary in-memory database.
pub fn with_temp_db<F, R>(f: F) -> R
where
    F: FnOnce(&Database) -> R,
{
    let test_db = TestDatabase::memory();
    f(&test_db.db)
}

/// Runs a mutable test with a temporary database.
pub fn with_temp_db_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut Database) -> R,
{
    let mut test_db = TestDatabase::memory();
    f(&mut test_db.db)
}

/// Runs a test with a temporary file-based database.
pub fn with_file_db<F, R>(f: F) -> R
where
    F: FnOnce(&mut Database, &Path) -> R,
{
    let mut test_db = TestDatabase::file();
    let dir = test_db.temp_dir.take().expect("File database should have a directory");
    let result = f(&mut test_db.db, dir.path());
    drop(test_db);
    result
}

/// Sends `registry` through the workbook document format and back.
pub fn workbook_round_trip(registry: &Registry) -> Registry {
    let bytes = rows::to_workbook(registry)
        .to_bytes()
        .expect("Failed to encode workbook");
    let workbook = Workbook::from_bytes(&bytes).expect("Failed to decode workbook");
    let mut imported = Registry::new();
    rows::import_workbook(&mut imported, &workbook).expect("Failed to import workbook");
    imported
}

/// Test scenario helpers.
pub mod scenarios {
    use campus_core::{Course, Department, Faculty, Registry, Student};

    const DEPARTMENTS: [&str; 4] = ["Computer Science", "Mathematics", "Physics", "History"];

    /// Builds a consistent registry of the given size.
    ///
    /// Course `i` is taught by faculty member `i % faculty` and belongs to
    /// department `i % 4`. Student `i` takes every course whose index is
    /// congruent to `i` modulo 3, with a score derived from both indices.
    pub fn populated_registry(students: usize, faculty: usize, courses: usize) -> Registry {
        let mut registry = Registry::new();

        for (i, name) in DEPARTMENTS.iter().enumerate() {
            registry
                .add_department(Department::new(format!("DEPT{i:03}"), *name, format!("Head {i}")))
                .expect("Failed to add department");
        }
        for i in 0..faculty {
            registry
                .add_faculty(Faculty::new(
                    format!("FAC{i:04}"),
                    format!("Faculty {i}"),
                    DEPARTMENTS[i % DEPARTMENTS.len()],
                ))
                .expect("Failed to add faculty");
        }
        for i in 0..courses {
            let mut course = Course::new(format!("C{i:04}"), format!("Course {i}"), 1 + (i % 4) as u32);
            if faculty > 0 {
                course = course.with_faculty(format!("FAC{:04}", i % faculty));
            }
            registry.add_course(course).expect("Failed to add course");
            let department = format!("DEPT{:03}", i % DEPARTMENTS.len());
            let mut listed = registry
                .department(&department)
                .map(|d| d.courses.clone())
                .unwrap_or_default();
            listed.push(format!("C{i:04}"));
            registry
                .update_department(&department, campus_core::DepartmentPatch::new().courses(listed))
                .expect("Failed to link department");
        }
        for i in 0..students {
            let mut student = Student::new(
                format!("S{i:05}"),
                format!("Student {i}"),
                18 + (i % 10) as u32,
                if i % 2 == 0 { "Female" } else { "Male" },
                DEPARTMENTS[i % DEPARTMENTS.len()],
            );
            for c in (i % 3..courses).step_by(3) {
                let score = ((i + c) % 41) as f64 / 10.0;
                student = student.with_grade(format!("C{c:04}"), score);
            }
            registry.add_student(student).expect("Failed to add student");
        }
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_database() {
        let test_db = TestDatabase::memory();
        assert!(test_db.registry().is_empty());
        assert!(test_db.path().is_none());
    }

    #[test]
    fn test_file_database_reopens() {
        let mut test_db = TestDatabase::file();
        test_db.load_sample();
        let test_db = test_db.reopen();
        assert_eq!(test_db.registry(), &sample_registry());
    }

    #[test]
    fn test_with_file_db() {
        let students = with_file_db(|db, dir| {
            db.load_sample();
            assert!(dir.exists());
            db.registry().students().len()
        });
        assert_eq!(students, 5);
    }

    #[test]
    fn test_populated_scenario() {
        let registry = scenarios::populated_registry(30, 4, 12);
        assert_eq!(registry.students().len(), 30);
        assert_eq!(registry.courses().len(), 12);
        assert!(registry.check_integrity().is_empty());
        assert_eq!(registry.student("S00000").unwrap().courses.len(), 4);
    }
}
