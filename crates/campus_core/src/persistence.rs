//! Persistence seam.
//!
//! A [`Persistence`] loads the registry at startup and saves it after
//! mutations. The local implementation keeps the JSON blob in a
//! [`LocalStore`]; the remote implementation lives in `campus_sync`.

use crate::blob;
use crate::error::{CoreError, CoreResult};
use crate::registry::Registry;
use campus_codec::TableName;
use campus_storage::LocalStore;
use tracing::{debug, info};

/// Outcome of a load.
///
/// Loads recover from bad data instead of failing: whatever could be
/// restored is restored, and the rest is reported here.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Tables whose collections were replaced, in load order.
    pub restored: Vec<TableName>,
    /// Problems recovered from.
    pub issues: Vec<CoreError>,
}

impl LoadReport {
    /// Returns true if the load hit no problems.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Where the registry is loaded from and saved to.
pub trait Persistence: Send {
    /// Short name for logs, e.g. `"local"`.
    fn name(&self) -> &str;

    /// Loads stored state into `registry`.
    ///
    /// # Errors
    ///
    /// Returns an error only when the backing store itself fails. Bad data
    /// is reported in the returned [`LoadReport`].
    fn load_into(&mut self, registry: &mut Registry) -> CoreResult<LoadReport>;

    /// Saves the whole registry.
    ///
    /// # Errors
    ///
    /// Returns an error if the state could not be written.
    fn save(&mut self, registry: &Registry) -> CoreResult<()>;
}

/// Keeps the registry as one JSON blob under a key of a [`LocalStore`].
pub struct LocalPersistence<S: LocalStore> {
    store: S,
    key: String,
}

impl<S: LocalStore> LocalPersistence<S> {
    /// Creates a local persistence over `store` using `key`.
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Returns the blob key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Consumes the persistence and returns the store.
    pub fn into_inner(self) -> S {
        self.store
    }
}

impl<S: LocalStore> Persistence for LocalPersistence<S> {
    fn name(&self) -> &str {
        "local"
    }

    /// Replaces the registry with the stored blob.
    ///
    /// A missing blob yields the empty registry.
    fn load_into(&mut self, registry: &mut Registry) -> CoreResult<LoadReport> {
        registry.clear();
        let Some(text) = self.store.get(&self.key)? else {
            debug!(key = %self.key, "no stored state");
            return Ok(LoadReport::default());
        };

        let decoded = blob::decode(&text);
        let mut report = LoadReport {
            restored: Vec::with_capacity(decoded.collections.len()),
            issues: decoded.issues,
        };
        for collection in decoded.collections {
            report.restored.push(collection.table());
            registry.restore(collection);
        }
        info!(
            key = %self.key,
            restored = report.restored.len(),
            issues = report.issues.len(),
            "loaded local state"
        );
        Ok(report)
    }

    fn save(&mut self, registry: &Registry) -> CoreResult<()> {
        let text = blob::encode(registry)?;
        self.store.put(&self.key, &text)?;
        self.store.flush()?;
        debug!(key = %self.key, bytes = text.len(), "saved local state");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::sample_registry;
    use campus_storage::InMemoryStore;

    #[test]
    fn missing_blob_loads_empty() {
        let mut persistence = LocalPersistence::new(InMemoryStore::new(), "uniManageData");
        let mut registry = sample_registry();
        let report = persistence.load_into(&mut registry).unwrap();
        assert!(registry.is_empty());
        assert!(report.is_clean());
        assert!(report.restored.is_empty());
    }

    #[test]
    fn save_then_load() {
        let mut persistence = LocalPersistence::new(InMemoryStore::new(), "uniManageData");
        let registry = sample_registry();
        persistence.save(&registry).unwrap();

        let mut loaded = Registry::new();
        let report = persistence.load_into(&mut loaded).unwrap();
        assert_eq!(loaded, registry);
        assert_eq!(report.restored, TableName::ALL);
    }

    #[test]
    fn garbage_blob_is_an_issue_not_an_error() {
        let store = InMemoryStore::with_value("uniManageData", "\u{0}garbage");
        let mut persistence = LocalPersistence::new(store, "uniManageData");
        let mut registry = Registry::new();
        let report = persistence.load_into(&mut registry).unwrap();
        assert!(registry.is_empty());
        assert_eq!(report.issues.len(), 1);
    }
}
