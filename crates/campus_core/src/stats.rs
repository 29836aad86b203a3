//! Database statistics.
//!
//! # Usage
//!
//! ```rust
//! use campus_core::{Database, Student};
//!
//! let mut db = Database::open_in_memory().unwrap();
//! db.add_student(Student::new("STU001", "Alice", 20, "Female", "CS")).unwrap();
//!
//! let stats = db.stats();
//! assert_eq!(stats.mutations, 1);
//! assert_eq!(stats.persist_failures, 0);
//! ```

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Database counters.
///
/// All counters are atomic and monotonically increasing.
#[derive(Debug, Default)]
pub struct DatabaseStats {
    /// Applied mutations.
    mutations: AtomicU64,
    /// Mutations rejected with an error.
    rejected: AtomicU64,
    /// Successful saves.
    persists: AtomicU64,
    /// Failed saves.
    persist_failures: AtomicU64,
    /// Loads from persistence.
    loads: AtomicU64,
    /// Issues recovered from while loading.
    load_issues: AtomicU64,
}

impl DatabaseStats {
    /// Creates a new stats instance.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_mutation(&self) {
        self.mutations.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_rejected(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_persist(&self) {
        self.persists.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_persist_failure(&self) {
        self.persist_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_load(&self, issues: usize) {
        self.loads.fetch_add(1, Ordering::Relaxed);
        self.load_issues.fetch_add(issues as u64, Ordering::Relaxed);
    }

    /// Takes a point-in-time copy of every counter.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            mutations: self.mutations.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            persists: self.persists.load(Ordering::Relaxed),
            persist_failures: self.persist_failures.load(Ordering::Relaxed),
            loads: self.loads.load(Ordering::Relaxed),
            load_issues: self.load_issues.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of database statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    /// Applied mutations.
    pub mutations: u64,
    /// Mutations rejected with an error.
    pub rejected: u64,
    /// Successful saves.
    pub persists: u64,
    /// Failed saves.
    pub persist_failures: u64,
    /// Loads from persistence.
    pub loads: u64,
    /// Issues recovered from while loading.
    pub load_issues: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate() {
        let stats = DatabaseStats::new();
        stats.record_mutation();
        stats.record_mutation();
        stats.record_persist_failure();
        stats.record_load(3);

        let snap = stats.snapshot();
        assert_eq!(snap.mutations, 2);
        assert_eq!(snap.persist_failures, 1);
        assert_eq!(snap.loads, 1);
        assert_eq!(snap.load_issues, 3);
    }
}
