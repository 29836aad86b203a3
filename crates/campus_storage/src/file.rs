//! Directory-backed store for persistent storage.
//!
//! Layout:
//!
//! ```text
//! <dir>/
//! ├─ LOCK              # Advisory lock for single-writer
//! ├─ <key>.kv          # One file per key
//! └─ <key>.kv.tmp      # Transient, only during a write
//! ```

use crate::error::{StorageError, StorageResult};
use crate::store::{validate_key, LocalStore};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

const LOCK_FILE: &str = "LOCK";
const VALUE_EXT: &str = "kv";
const TEMP_EXT: &str = "kv.tmp";

/// A directory-backed key-value store.
///
/// Every key is stored in its own file. Writes go to a temporary file that
/// is synced and then renamed over the previous value, so a crash never
/// leaves a half-written value behind.
///
/// # Single Writer
///
/// The store holds an exclusive advisory lock on `<dir>/LOCK` for its whole
/// lifetime. A second `FileStore` on the same directory fails with
/// [`StorageError::Locked`].
///
/// # Example
///
/// ```no_run
/// use campus_storage::{FileStore, LocalStore};
/// use std::path::Path;
///
/// let mut store = FileStore::open(Path::new("campus-data")).unwrap();
/// store.put("uniManageData", "{}").unwrap();
/// ```
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
    _lock_file: File,
}

impl FileStore {
    /// Opens or creates a store in `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The directory cannot be created
    /// - `dir` exists but is not a directory
    /// - Another process holds the lock (returns `Locked`)
    pub fn open(dir: &Path) -> StorageResult<Self> {
        if !dir.exists() {
            fs::create_dir_all(dir)?;
        }
        if !dir.is_dir() {
            return Err(StorageError::Io(std::io::Error::new(
                ErrorKind::InvalidInput,
                format!("path is not a directory: {}", dir.display()),
            )));
        }

        let lock_file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(dir.join(LOCK_FILE))?;

        if lock_file.try_lock_exclusive().is_err() {
            return Err(StorageError::Locked {
                path: dir.to_path_buf(),
            });
        }

        Ok(Self {
            dir: dir.to_path_buf(),
            _lock_file: lock_file,
        })
    }

    /// Returns the store directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.dir
    }

    fn value_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.{VALUE_EXT}"))
    }

    fn temp_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.{TEMP_EXT}"))
    }
}

impl LocalStore for FileStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        validate_key(key)?;
        match fs::read(self.value_path(key)) {
            Ok(bytes) => String::from_utf8(bytes)
                .map(Some)
                .map_err(|e| StorageError::Corrupted(format!("{key}: {e}"))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn put(&mut self, key: &str, value: &str) -> StorageResult<()> {
        validate_key(key)?;
        let temp = self.temp_path(key);
        {
            let mut file = File::create(&temp)?;
            file.write_all(value.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&temp, self.value_path(key))?;
        tracing::debug!(key, bytes = value.len(), "stored value");
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StorageResult<bool> {
        validate_key(key)?;
        match fs::remove_file(self.value_path(key)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let name = entry?.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if name.ends_with(TEMP_EXT) {
                continue;
            }
            if let Some(key) = name.strip_suffix(&format!(".{VALUE_EXT}")) {
                keys.push(key.to_string());
            }
        }
        keys.sort();
        Ok(keys)
    }

    fn flush(&mut self) -> StorageResult<()> {
        // Values are synced before the rename in `put`
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn file_missing_key_is_none() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        assert_eq!(store.get("absent").unwrap(), None);
    }

    #[test]
    fn file_put_then_get() {
        let dir = tempdir().unwrap();
        let mut store = FileStore::open(dir.path()).unwrap();
        store.put("state", "hello").unwrap();
        assert_eq!(store.get("state").unwrap().as_deref(), Some("hello"));
    }

    #[test]
    fn file_values_survive_reopen() {
        let dir = tempdir().unwrap();
        {
            let mut store = FileStore::open(dir.path()).unwrap();
            store.put("state", "persisted").unwrap();
            store.flush().unwrap();
        }
        let store = FileStore::open(dir.path()).unwrap();
        assert_eq!(store.get("state").unwrap().as_deref(), Some("persisted"));
    }

    #[test]
    fn file_second_open_is_locked() {
        let dir = tempdir().unwrap();
        let _first = FileStore::open(dir.path()).unwrap();
        let second = FileStore::open(dir.path());
        assert!(matches!(second, Err(StorageError::Locked { .. })));
    }

    #[test]
    fn file_keys_skip_lock_and_temp_files() {
        let dir = tempdir().unwrap();
        let mut store = FileStore::open(dir.path()).unwrap();
        store.put("b", "2").unwrap();
        store.put("a", "1").unwrap();
        fs::write(dir.path().join("c.kv.tmp"), "partial").unwrap();
        assert_eq!(store.keys().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn file_remove() {
        let dir = tempdir().unwrap();
        let mut store = FileStore::open(dir.path()).unwrap();
        store.put("k", "v").unwrap();
        assert!(store.remove("k").unwrap());
        assert!(!store.remove("k").unwrap());
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn file_creates_missing_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let store = FileStore::open(&nested).unwrap();
        assert!(store.path().is_dir());
    }

    #[test]
    fn file_non_utf8_value_is_corrupted() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        fs::write(dir.path().join("bad.kv"), [0xff, 0xfe, 0x00]).unwrap();
        assert!(matches!(
            store.get("bad"),
            Err(StorageError::Corrupted(_))
        ));
    }
}
