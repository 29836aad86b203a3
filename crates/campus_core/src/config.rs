//! Database configuration.

/// Default key the local blob is stored under.
pub const DEFAULT_STORAGE_KEY: &str = "uniManageData";

/// Configuration for opening a database.
#[derive(Debug, Clone)]
pub struct Config {
    /// Key of the local blob in the local store.
    pub storage_key: String,

    /// Whether every mutation is persisted before it returns.
    ///
    /// When false, changes stay dirty until [`crate::Database::flush`].
    pub persist_on_mutation: bool,

    /// Number of students shown in top-students views.
    pub top_count: usize,

    /// Number of change events kept for polling.
    pub history_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            persist_on_mutation: true,
            top_count: 5,
            history_size: 1000,
        }
    }
}

impl Config {
    /// Creates a new config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the local blob key.
    #[must_use]
    pub fn storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Sets whether mutations persist immediately.
    #[must_use]
    pub fn persist_on_mutation(mut self, value: bool) -> Self {
        self.persist_on_mutation = value;
        self
    }

    /// Sets the top-students count.
    #[must_use]
    pub fn top_count(mut self, count: usize) -> Self {
        self.top_count = count;
        self
    }

    /// Sets the change-feed history size.
    #[must_use]
    pub fn history_size(mut self, size: usize) -> Self {
        self.history_size = size;
        self
    }
}
