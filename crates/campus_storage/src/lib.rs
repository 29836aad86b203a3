//! # Campus Storage
//!
//! Durable local key-value stores for CampusDB.
//!
//! This crate provides the lowest-level persistence abstraction. Stores are
//! **opaque text stores** addressed by key - they do not interpret the
//! values they hold. The record store keeps its whole state as a single
//! serialized blob under one named key, the same way a browser application
//! keeps its state in `localStorage`.
//!
//! ## Design Principles
//!
//! - Stores are simple key-value maps (get, put, remove, flush)
//! - No knowledge of the record schema or blob format
//! - Absence of a key is not an error
//! - Keys are restricted to a portable character set so that every store
//!   can map them to file names
//!
//! ## Available Stores
//!
//! - [`InMemoryStore`] - For testing and ephemeral sessions
//! - [`FileStore`] - One file per key inside a locked directory
//!
//! ## Example
//!
//! ```rust
//! use campus_storage::{InMemoryStore, LocalStore};
//!
//! let mut store = InMemoryStore::new();
//! store.put("uniManageData", "{}").unwrap();
//! assert_eq!(store.get("uniManageData").unwrap().as_deref(), Some("{}"));
//! assert_eq!(store.get("missing").unwrap(), None);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod file;
mod memory;
mod store;

pub use error::{StorageError, StorageResult};
pub use file::FileStore;
pub use memory::InMemoryStore;
pub use store::{validate_key, LocalStore, MAX_KEY_LEN};
