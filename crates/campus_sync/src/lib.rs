//! # Campus Sync
//!
//! Remote tabular store for CampusDB.
//!
//! The registry is stored as one sheet per table in a spreadsheet document
//! reached over HTTP. This crate provides:
//!
//! - [`TableTransport`]: ranged reads, clears and writes of one sheet
//! - [`HttpTransport`]: the spreadsheet values API over a pluggable
//!   [`HttpClient`] ([`UreqClient`] in production)
//! - [`MockTransport`]: in-memory sheets with failure injection for tests
//! - [`RemoteStore`]: paged loads, clear-then-put saves and retries; it
//!   implements [`campus_core::Persistence`] so a `Database` can use it
//!
//! ## Example
//!
//! ```rust
//! use campus_core::{Database, Config};
//! use campus_sync::{MockTransport, RemoteConfig, RemoteStore};
//!
//! let store = RemoteStore::new(MockTransport::new(), RemoteConfig::new("key", "doc"));
//! let mut db = Database::open_with_persistence(Config::default(), Box::new(store)).unwrap();
//! db.load_sample();
//! assert_eq!(db.registry().students().len(), 5);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod http;
mod remote;
mod transport;

pub use config::{RemoteConfig, RetryConfig, DEFAULT_ENDPOINT};
pub use error::{SyncError, SyncResult};
pub use http::{HttpClient, HttpTransport, Method, UreqClient};
pub use remote::{RemoteStats, RemoteStore};
pub use transport::{MockTransport, Operation, Request, TableTransport};
