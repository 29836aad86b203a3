//! Database facade.

use crate::change_feed::{ChangeEvent, ChangeFeed, ChangeType};
use crate::config::Config;
use crate::entity::{Course, Department, EntityKind, Faculty, Student, University};
use crate::error::CoreResult;
use crate::persistence::{LoadReport, LocalPersistence, Persistence};
use crate::registry::{
    CoursePatch, DeleteImpact, DepartmentPatch, FacultyPatch, Registry, StudentPatch, Violation,
};
use crate::stats::{DatabaseStats, StatsSnapshot};
use crate::{report, rows, sample, views};
use campus_codec::{TableName, Workbook};
use campus_storage::{FileStore, InMemoryStore};
use std::path::Path;
use std::sync::mpsc::Receiver;
use tracing::{debug, info, warn};

type Listener = Box<dyn FnMut(&ChangeEvent) + Send>;

/// The main database handle.
///
/// `Database` owns the [`Registry`] and wraps every mutation with the side
/// effects collaborators rely on:
/// - the registry is persisted (unless `persist_on_mutation` is off)
/// - a [`ChangeEvent`] is sent to subscribers and listeners
/// - counters are updated
///
/// A failed save does not undo the mutation. The failure is logged, kept
/// as [`Database::last_persist_error`] and attached to the change event.
///
/// # Opening a Database
///
/// ```rust
/// use campus_core::{Database, EntityKind};
///
/// let mut db = Database::open_in_memory().unwrap();
/// db.load_sample();
///
/// let impact = db.preview_delete(EntityKind::Course, "CS101").unwrap();
/// assert!(!impact.purged.is_empty());
/// db.delete(EntityKind::Course, "CS101").unwrap();
/// assert!(db.registry().course("CS101").is_none());
/// ```
pub struct Database {
    /// Configuration.
    config: Config,
    /// The record store.
    registry: Registry,
    /// Where the registry is loaded from and saved to.
    persistence: Box<dyn Persistence>,
    /// Change feed for subscribers.
    feed: ChangeFeed,
    /// Callbacks run on every change.
    listeners: Vec<Listener>,
    /// Counters.
    stats: DatabaseStats,
    /// Sequence number of the last change.
    sequence: u64,
    /// Whether the registry has changes not yet saved.
    dirty: bool,
    /// Message of the last failed save, cleared by the next successful one.
    last_persist_error: Option<String>,
    /// Outcome of the last load.
    load_report: LoadReport,
}

impl Database {
    /// Opens a database kept in the directory at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or is locked by
    /// another process.
    pub fn open(path: &Path) -> CoreResult<Self> {
        Self::open_with_config(path, Config::default())
    }

    /// Opens a directory database with custom configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or is locked by
    /// another process.
    pub fn open_with_config(path: &Path, config: Config) -> CoreResult<Self> {
        let store = FileStore::open(path)?;
        let persistence = LocalPersistence::new(store, config.storage_key.clone());
        Self::open_with_persistence(config, Box::new(persistence))
    }

    /// Opens a fresh in-memory database.
    ///
    /// # Errors
    ///
    /// Does not fail in practice; the signature matches the other openers.
    pub fn open_in_memory() -> CoreResult<Self> {
        let config = Config::default();
        let persistence = LocalPersistence::new(InMemoryStore::new(), config.storage_key.clone());
        Self::open_with_persistence(config, Box::new(persistence))
    }

    /// Opens a database over any persistence and loads its state.
    ///
    /// Malformed stored data does not fail the open; see
    /// [`Database::load_report`].
    ///
    /// # Errors
    ///
    /// Returns an error if the persistence itself fails to load.
    pub fn open_with_persistence(config: Config, mut persistence: Box<dyn Persistence>) -> CoreResult<Self> {
        let mut registry = Registry::new();
        let load_report = persistence.load_into(&mut registry)?;
        let stats = DatabaseStats::new();
        stats.record_load(load_report.issues.len());
        for issue in &load_report.issues {
            warn!(backend = persistence.name(), %issue, "recovered while loading");
        }
        info!(
            backend = persistence.name(),
            students = registry.students().len(),
            courses = registry.courses().len(),
            "opened database"
        );

        Ok(Self {
            feed: ChangeFeed::with_max_history(config.history_size),
            config,
            registry,
            persistence,
            listeners: Vec::new(),
            stats,
            sequence: 0,
            dirty: false,
            last_persist_error: None,
            load_report,
        })
    }

    // === Accessors ===

    /// Returns the record store.
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the outcome of the last load.
    #[must_use]
    pub fn load_report(&self) -> &LoadReport {
        &self.load_report
    }

    /// Returns the persistence name, e.g. `"local"`.
    #[must_use]
    pub fn backend(&self) -> &str {
        self.persistence.name()
    }

    /// Returns true if there are changes not yet saved.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Returns the message of the last failed save, if the latest save
    /// failed.
    #[must_use]
    pub fn last_persist_error(&self) -> Option<&str> {
        self.last_persist_error.as_deref()
    }

    /// Returns a snapshot of the counters.
    #[must_use]
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    // === Notification ===

    /// Subscribes to change events.
    pub fn subscribe(&self) -> Receiver<ChangeEvent> {
        self.feed.subscribe()
    }

    /// Registers a callback run synchronously after every change.
    pub fn on_change<F>(&mut self, listener: F)
    where
        F: FnMut(&ChangeEvent) + Send + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Returns recent events with sequence > `cursor`, up to `limit`.
    #[must_use]
    pub fn poll_changes(&self, cursor: u64, limit: usize) -> Vec<ChangeEvent> {
        self.feed.poll(cursor, limit)
    }

    // === Create ===

    /// Adds a student. See [`Registry::add_student`].
    ///
    /// # Errors
    ///
    /// Returns `DuplicateIdentifier` if the id is taken.
    pub fn add_student(&mut self, student: Student) -> CoreResult<()> {
        let id = student.id.clone();
        self.apply(ChangeType::Insert, EntityKind::Student, &id, |r| r.add_student(student))
    }

    /// Adds a faculty member. See [`Registry::add_faculty`].
    ///
    /// # Errors
    ///
    /// Returns `DuplicateIdentifier` if the id is taken.
    pub fn add_faculty(&mut self, member: Faculty) -> CoreResult<()> {
        let id = member.id.clone();
        self.apply(ChangeType::Insert, EntityKind::Faculty, &id, |r| r.add_faculty(member))
    }

    /// Adds a course. See [`Registry::add_course`].
    ///
    /// # Errors
    ///
    /// Returns `DuplicateIdentifier` if the id is taken.
    pub fn add_course(&mut self, course: Course) -> CoreResult<()> {
        let id = course.id.clone();
        self.apply(ChangeType::Insert, EntityKind::Course, &id, |r| r.add_course(course))
    }

    /// Adds a department.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateIdentifier` if the id is taken.
    pub fn add_department(&mut self, department: Department) -> CoreResult<()> {
        let id = department.id.clone();
        self.apply(ChangeType::Insert, EntityKind::Department, &id, |r| {
            r.add_department(department)
        })
    }

    // === Update ===

    /// Updates a student. See [`Registry::update_student`].
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the student does not exist.
    pub fn update_student(&mut self, id: &str, patch: StudentPatch) -> CoreResult<()> {
        self.apply(ChangeType::Update, EntityKind::Student, id, |r| r.update_student(id, patch))
    }

    /// Updates a faculty member.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the faculty member does not exist.
    pub fn update_faculty(&mut self, id: &str, patch: FacultyPatch) -> CoreResult<()> {
        self.apply(ChangeType::Update, EntityKind::Faculty, id, |r| r.update_faculty(id, patch))
    }

    /// Updates a course. See [`Registry::update_course`].
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the course does not exist.
    pub fn update_course(&mut self, id: &str, patch: CoursePatch) -> CoreResult<()> {
        self.apply(ChangeType::Update, EntityKind::Course, id, |r| r.update_course(id, patch))
    }

    /// Updates a department.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the department does not exist.
    pub fn update_department(&mut self, id: &str, patch: DepartmentPatch) -> CoreResult<()> {
        self.apply(ChangeType::Update, EntityKind::Department, id, |r| {
            r.update_department(id, patch)
        })
    }

    /// Enrolls a student in a course.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if either record is missing.
    pub fn enroll(&mut self, student: &str, course: &str) -> CoreResult<bool> {
        self.apply(ChangeType::Update, EntityKind::Student, student, |r| r.enroll(student, course))
    }

    /// Withdraws a student from a course.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if either record is missing.
    pub fn withdraw(&mut self, student: &str, course: &str) -> CoreResult<bool> {
        self.apply(ChangeType::Update, EntityKind::Student, student, |r| {
            r.withdraw(student, course)
        })
    }

    /// Assigns or unassigns a course's faculty member.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the course or faculty member is missing.
    pub fn assign_faculty(&mut self, course: &str, faculty: Option<&str>) -> CoreResult<()> {
        self.apply(ChangeType::Update, EntityKind::Course, course, |r| {
            r.assign_faculty(course, faculty)
        })
    }

    /// Records a score. See [`Registry::set_score`].
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `CourseNotEnrolled`.
    pub fn set_score(&mut self, student: &str, course: &str, score: f64) -> CoreResult<Option<f64>> {
        self.apply(ChangeType::Update, EntityKind::Student, student, |r| {
            r.set_score(student, course, score)
        })
    }

    /// Replaces the university profile.
    pub fn set_university(&mut self, university: University) {
        self.registry.set_university(university);
        self.commit(ChangeType::Update, None, "");
    }

    // === Delete ===

    /// Reports what a delete would change. Nothing is modified.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the record does not exist.
    pub fn preview_delete(&self, kind: EntityKind, id: &str) -> CoreResult<DeleteImpact> {
        self.registry.preview_delete(kind, id)
    }

    /// Deletes a record and purges every reference to it.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the record does not exist.
    pub fn delete(&mut self, kind: EntityKind, id: &str) -> CoreResult<DeleteImpact> {
        self.apply(ChangeType::Delete, kind, id, |r| r.delete(kind, id))
    }

    // === Bulk ===

    /// Resets to the empty registry.
    pub fn clear(&mut self) {
        self.registry.clear();
        self.commit(ChangeType::Reload, None, "");
    }

    /// Replaces everything with the demonstration dataset.
    pub fn load_sample(&mut self) {
        self.registry = sample::sample_registry();
        info!("loaded sample data");
        self.commit(ChangeType::Reload, None, "");
    }

    /// Applies the schema tables present in `workbook`.
    ///
    /// # Errors
    ///
    /// Returns `MalformedRow` and leaves the registry untouched if any
    /// table fails to parse.
    pub fn import_workbook(&mut self, workbook: &Workbook) -> CoreResult<Vec<TableName>> {
        let applied = match rows::import_workbook(&mut self.registry, workbook) {
            Ok(applied) => applied,
            Err(e) => {
                self.stats.record_rejected();
                return Err(e);
            }
        };
        info!(tables = applied.len(), "imported workbook");
        self.commit(ChangeType::Reload, None, "");
        Ok(applied)
    }

    /// Re-reads state from the persistence, discarding unsaved changes.
    ///
    /// # Errors
    ///
    /// Returns an error if the persistence itself fails.
    pub fn reload(&mut self) -> CoreResult<&LoadReport> {
        let report = self.persistence.load_into(&mut self.registry)?;
        self.stats.record_load(report.issues.len());
        self.load_report = report;
        self.dirty = false;
        self.emit(ChangeType::Reload, None, "", None);
        Ok(&self.load_report)
    }

    /// Switches to another persistence and loads from it.
    ///
    /// Unsaved changes are flushed to the old persistence first.
    ///
    /// # Errors
    ///
    /// Returns an error if the new persistence fails to load.
    pub fn switch_persistence(&mut self, persistence: Box<dyn Persistence>) -> CoreResult<&LoadReport> {
        if self.dirty {
            if let Err(e) = self.persist() {
                warn!(error = %e, "unsaved changes lost while switching persistence");
            }
        }
        info!(from = self.persistence.name(), to = persistence.name(), "switching persistence");
        self.persistence = persistence;
        self.reload()
    }

    /// Loads `source` over the current registry and saves the result to
    /// this database's own persistence.
    ///
    /// Collections `source` cannot provide keep their current contents.
    /// Unlike [`Database::switch_persistence`], the persistence is kept.
    ///
    /// # Errors
    ///
    /// Returns an error if `source` itself fails to load. A failed save is
    /// reported through [`Database::last_persist_error`] as for any other
    /// mutation.
    pub fn load_from(&mut self, source: &mut dyn Persistence) -> CoreResult<LoadReport> {
        let report = source.load_into(&mut self.registry)?;
        self.stats.record_load(report.issues.len());
        for issue in &report.issues {
            warn!(backend = source.name(), %issue, "kept local data for unreadable part");
        }
        info!(
            backend = source.name(),
            restored = report.restored.len(),
            "loaded from other persistence"
        );
        self.commit(ChangeType::Reload, None, "");
        Ok(report)
    }

    /// Saves the registry into `target` without switching to it.
    ///
    /// # Errors
    ///
    /// Returns whatever `target` fails with.
    pub fn save_to(&self, target: &mut dyn Persistence) -> CoreResult<()> {
        target.save(&self.registry)
    }

    /// Saves pending changes.
    ///
    /// # Errors
    ///
    /// Returns the save error; the changes stay dirty.
    pub fn flush(&mut self) -> CoreResult<()> {
        if !self.dirty {
            return Ok(());
        }
        self.persist()
    }

    // === Views ===

    /// Returns the configured number of top students.
    #[must_use]
    pub fn top_students(&self) -> Vec<&Student> {
        views::top_students(self.registry.students(), self.config.top_count)
    }

    /// Returns the dashboard summary.
    #[must_use]
    pub fn summary(&self) -> views::Summary {
        views::summary(&self.registry)
    }

    /// Builds the five-table workbook.
    #[must_use]
    pub fn export_workbook(&self) -> Workbook {
        rows::to_workbook(&self.registry)
    }

    /// Builds the summary workbook.
    #[must_use]
    pub fn summary_workbook(&self) -> Workbook {
        report::summary_workbook(&self.registry)
    }

    /// Renders the flat text report.
    #[must_use]
    pub fn export_report(&self) -> String {
        report::to_delimited_text(&self.registry)
    }

    /// Audits cross-references.
    #[must_use]
    pub fn check_integrity(&self) -> Vec<Violation> {
        self.registry.check_integrity()
    }

    // === Internal ===

    fn apply<T, F>(&mut self, change_type: ChangeType, kind: EntityKind, id: &str, op: F) -> CoreResult<T>
    where
        F: FnOnce(&mut Registry) -> CoreResult<T>,
    {
        match op(&mut self.registry) {
            Ok(value) => {
                self.commit(change_type, Some(kind), id);
                Ok(value)
            }
            Err(e) => {
                debug!(kind = %kind, id, error = %e, "mutation rejected");
                self.stats.record_rejected();
                Err(e)
            }
        }
    }

    fn commit(&mut self, change_type: ChangeType, kind: Option<EntityKind>, id: &str) {
        self.stats.record_mutation();
        self.dirty = true;
        let persist_error = if self.config.persist_on_mutation {
            self.persist().err().map(|e| e.to_string())
        } else {
            None
        };
        self.emit(change_type, kind, id, persist_error);
    }

    fn emit(&mut self, change_type: ChangeType, kind: Option<EntityKind>, id: &str, persist_error: Option<String>) {
        self.sequence += 1;
        let event = ChangeEvent::new(self.sequence, change_type, kind, id).with_persist_error(persist_error);
        for listener in &mut self.listeners {
            listener(&event);
        }
        self.feed.emit(event);
    }

    fn persist(&mut self) -> CoreResult<()> {
        match self.persistence.save(&self.registry) {
            Ok(()) => {
                self.dirty = false;
                self.last_persist_error = None;
                self.stats.record_persist();
                Ok(())
            }
            Err(e) => {
                warn!(backend = self.persistence.name(), error = %e, "failed to persist");
                self.stats.record_persist_failure();
                self.last_persist_error = Some(e.to_string());
                Err(e)
            }
        }
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("backend", &self.persistence.name())
            .field("students", &self.registry.students().len())
            .field("sequence", &self.sequence)
            .field("dirty", &self.dirty)
            .finish_non_exhaustive()
    }
}

impl Drop for Database {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}
