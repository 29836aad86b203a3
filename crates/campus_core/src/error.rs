//! Error types for CampusDB core.

use crate::entity::EntityKind;
use campus_codec::TableName;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in CampusDB core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Create was called with an identifier that already exists.
    #[error("{kind} {id} already exists")]
    DuplicateIdentifier {
        /// Collection the identifier collided in.
        kind: EntityKind,
        /// The colliding identifier.
        id: String,
    },

    /// Update, delete or a relationship helper named an unknown identifier.
    #[error("{kind} {id} not found")]
    NotFound {
        /// Collection that was searched.
        kind: EntityKind,
        /// The identifier that was not found.
        id: String,
    },

    /// A score was assigned for a course the student is not enrolled in.
    #[error("student {student} is not enrolled in course {course}")]
    CourseNotEnrolled {
        /// Student identifier.
        student: String,
        /// Course identifier.
        course: String,
    },

    /// A score was NaN or infinite. Such values cannot be stored.
    #[error("score for student {student} in course {course} is not a finite number")]
    NonFiniteScore {
        /// Student identifier.
        student: String,
        /// Course identifier.
        course: String,
    },

    /// The local blob, or one of its collections, could not be decoded.
    #[error("malformed persisted state: {message}")]
    MalformedPersistedState {
        /// Description of the problem.
        message: String,
    },

    /// A row of a tabular representation could not be parsed.
    #[error("malformed row {row} in table {table}: {message}")]
    MalformedRow {
        /// Table the row belongs to.
        table: TableName,
        /// 1-based row number, counting the header as row 1.
        row: usize,
        /// Description of the problem.
        message: String,
    },

    /// The remote tabular store could not be reached or refused a request.
    #[error("remote table {table} unavailable: {message}")]
    RemoteUnavailable {
        /// Table being read or written.
        table: TableName,
        /// Description of the failure.
        message: String,
    },

    /// A remote table was cleared but could not be rewritten.
    ///
    /// The remote table may be left empty.
    #[error("remote table {table} was cleared but not rewritten: {message}")]
    PartialWriteFailure {
        /// Table that was left in an unknown state.
        table: TableName,
        /// Description of the failure.
        message: String,
    },

    /// Local storage error.
    #[error("storage error: {0}")]
    Storage(#[from] campus_storage::StorageError),

    /// Tabular codec error.
    #[error("codec error: {0}")]
    Codec(#[from] campus_codec::CodecError),
}

impl CoreError {
    /// Creates a `NotFound` error.
    pub fn not_found(kind: EntityKind, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// Creates a `DuplicateIdentifier` error.
    pub fn duplicate(kind: EntityKind, id: impl Into<String>) -> Self {
        Self::DuplicateIdentifier {
            kind,
            id: id.into(),
        }
    }

    /// Creates a `NonFiniteScore` error.
    pub fn non_finite_score(student: impl Into<String>, course: impl Into<String>) -> Self {
        Self::NonFiniteScore {
            student: student.into(),
            course: course.into(),
        }
    }

    /// Creates a `MalformedPersistedState` error.
    pub fn malformed_state(message: impl Into<String>) -> Self {
        Self::MalformedPersistedState {
            message: message.into(),
        }
    }

    /// Creates a `MalformedRow` error.
    pub fn malformed_row(table: TableName, row: usize, message: impl Into<String>) -> Self {
        Self::MalformedRow {
            table,
            row,
            message: message.into(),
        }
    }

    /// Creates a `RemoteUnavailable` error.
    pub fn remote_unavailable(table: TableName, message: impl Into<String>) -> Self {
        Self::RemoteUnavailable {
            table,
            message: message.into(),
        }
    }

    /// Creates a `PartialWriteFailure` error.
    pub fn partial_write(table: TableName, message: impl Into<String>) -> Self {
        Self::PartialWriteFailure {
            table,
            message: message.into(),
        }
    }

    /// Returns true if the store is known to be in its pre-call state.
    ///
    /// Only a partial remote write leaves external state inconsistent.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::PartialWriteFailure { .. })
    }
}
