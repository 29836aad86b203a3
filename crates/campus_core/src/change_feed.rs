//! Change feed for observing registry mutations.
//!
//! The change feed emits one event per successful mutation, after the
//! mutation has been applied and persisted, enabling:
//! - Redrawing affected views (see [`crate::View::affected_by`])
//! - Audit logging
//! - Surfacing persistence failures to the user
//!
//! # Usage
//!
//! ```rust
//! use campus_core::{Database, Student};
//!
//! let mut db = Database::open_in_memory().unwrap();
//! let receiver = db.subscribe();
//!
//! db.add_student(Student::new("STU001", "Alice Johnson", 20, "Female", "CS")).unwrap();
//!
//! let event = receiver.try_recv().unwrap();
//! assert_eq!(event.id, "STU001");
//! ```

use crate::entity::EntityKind;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::mpsc::{self, Receiver, Sender};

/// Type of change event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeType {
    /// A record was created.
    Insert,
    /// A record, or one of its relationships, was changed.
    Update,
    /// A record was deleted.
    Delete,
    /// Whole collections were replaced (load, import, clear, sample data).
    Reload,
}

/// A single change event from the change feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    /// Sequence number of the mutation, starting at 1.
    pub sequence: u64,
    /// Type of change.
    pub change_type: ChangeType,
    /// Kind of the changed record. `None` for the university profile and
    /// for reloads.
    pub kind: Option<EntityKind>,
    /// Identifier of the changed record, empty when there is none.
    pub id: String,
    /// Set when the change was applied but could not be persisted.
    pub persist_error: Option<String>,
}

impl ChangeEvent {
    /// Creates an event.
    pub fn new(
        sequence: u64,
        change_type: ChangeType,
        kind: Option<EntityKind>,
        id: impl Into<String>,
    ) -> Self {
        Self {
            sequence,
            change_type,
            kind,
            id: id.into(),
            persist_error: None,
        }
    }

    /// Attaches a persistence failure.
    #[must_use]
    pub fn with_persist_error(mut self, error: Option<String>) -> Self {
        self.persist_error = error;
        self
    }

    /// Returns true if the change reached storage.
    #[must_use]
    pub fn is_persisted(&self) -> bool {
        self.persist_error.is_none()
    }
}

/// Fan-out of [`ChangeEvent`]s to channel subscribers, with a bounded
/// backlog for callers that poll instead of subscribing.
///
/// Subscribers whose receiver was dropped are pruned on the next emit.
pub struct ChangeFeed {
    inner: Mutex<FeedState>,
    capacity: usize,
}

#[derive(Default)]
struct FeedState {
    subscribers: Vec<Sender<ChangeEvent>>,
    backlog: VecDeque<ChangeEvent>,
}

impl ChangeFeed {
    /// Creates a feed keeping the last 1000 events.
    pub fn new() -> Self {
        Self::with_max_history(1000)
    }

    /// Creates a feed keeping the last `capacity` events.
    pub fn with_max_history(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(FeedState::default()),
            capacity,
        }
    }

    /// Returns a receiver for every event emitted from now on.
    pub fn subscribe(&self) -> Receiver<ChangeEvent> {
        let (tx, rx) = mpsc::channel();
        self.inner.lock().subscribers.push(tx);
        rx
    }

    /// Records `event` and hands a copy to each live subscriber.
    pub fn emit(&self, event: ChangeEvent) {
        let mut state = self.inner.lock();
        state
            .subscribers
            .retain(|subscriber| subscriber.send(event.clone()).is_ok());
        if self.capacity == 0 {
            return;
        }
        while state.backlog.len() >= self.capacity {
            state.backlog.pop_front();
        }
        state.backlog.push_back(event);
    }

    /// Returns up to `limit` backlog events newer than `cursor`.
    pub fn poll(&self, cursor: u64, limit: usize) -> Vec<ChangeEvent> {
        let state = self.inner.lock();
        let skip = state.backlog.partition_point(|e| e.sequence <= cursor);
        state.backlog.iter().skip(skip).take(limit).cloned().collect()
    }

    /// Sequence number of the newest event, or 0 before the first one.
    pub fn latest_sequence(&self) -> u64 {
        self.inner.lock().backlog.back().map_or(0, |e| e.sequence)
    }

    /// Number of live subscribers as of the last emit.
    pub fn subscriber_count(&self) -> usize {
        self.inner.lock().subscribers.len()
    }

    /// Number of events held for polling.
    pub fn history_len(&self) -> usize {
        self.inner.lock().backlog.len()
    }
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new()
    }
}
