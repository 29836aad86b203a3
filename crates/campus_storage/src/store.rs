//! Local store trait definition.

use crate::error::{StorageError, StorageResult};

/// Maximum length of a key in bytes.
pub const MAX_KEY_LEN: usize = 128;

/// A durable local key-value store.
///
/// Stores are **opaque text stores**. They keep whole values under string
/// keys and never look inside them. The record store owns the blob format.
///
/// # Invariants
///
/// - `get` on a key that was never written returns `Ok(None)`
/// - `put` replaces any previous value for the key
/// - after `flush` returns, every `put` made so far survives a restart
///   (for stores that persist at all)
///
/// # Implementors
///
/// - [`super::InMemoryStore`] - For testing
/// - [`super::FileStore`] - For persistent storage
pub trait LocalStore: Send + Sync {
    /// Returns the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid or the value cannot be read.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid or the write fails.
    fn put(&mut self, key: &str, value: &str) -> StorageResult<()>;

    /// Removes `key`. Returns whether a value was present.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid or the removal fails.
    fn remove(&mut self, key: &str) -> StorageResult<bool>;

    /// Lists all keys currently stored, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the listing fails.
    fn keys(&self) -> StorageResult<Vec<String>>;

    /// Flushes pending writes to durable storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the flush operation fails.
    fn flush(&mut self) -> StorageResult<()>;
}

/// Checks that `key` is usable by every store.
///
/// Keys must be non-empty, at most [`MAX_KEY_LEN`] bytes, must not start
/// with a dot, and may only contain ASCII letters, digits, `_`, `-` and `.`.
///
/// # Errors
///
/// Returns [`StorageError::InvalidKey`] describing the first rule broken.
pub fn validate_key(key: &str) -> StorageResult<()> {
    if key.is_empty() {
        return Err(StorageError::invalid_key(key, "key is empty"));
    }
    if key.len() > MAX_KEY_LEN {
        return Err(StorageError::invalid_key(key, "key is too long"));
    }
    if key.starts_with('.') {
        return Err(StorageError::invalid_key(key, "key starts with a dot"));
    }
    if !key
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b'.'))
    {
        return Err(StorageError::invalid_key(
            key,
            "key contains characters outside [A-Za-z0-9_.-]",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_portable_keys() {
        assert!(validate_key("uniManageData").is_ok());
        assert!(validate_key("backup-2024.01_a").is_ok());
    }

    #[test]
    fn rejects_bad_keys() {
        assert!(validate_key("").is_err());
        assert!(validate_key(".hidden").is_err());
        assert!(validate_key("../escape").is_err());
        assert!(validate_key("with space").is_err());
        assert!(validate_key(&"k".repeat(MAX_KEY_LEN + 1)).is_err());
    }

    proptest::proptest! {
        #[test]
        fn portable_keys_always_validate(key in "[A-Za-z0-9_-][A-Za-z0-9_.-]{0,63}") {
            proptest::prop_assert!(validate_key(&key).is_ok());
        }

        #[test]
        fn keys_with_separators_never_validate(prefix in "[a-z]{0,8}", suffix in "[a-z]{0,8}") {
            let key = format!("{prefix}/{suffix}");
            proptest::prop_assert!(validate_key(&key).is_err());
        }
    }
}
