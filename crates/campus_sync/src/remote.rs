//! Remote tabular store.
//!
//! Each collection lives in its own sheet named after its table. Reads are
//! paged by row range. Writes clear the sheet and then rewrite it in one
//! request, so a failure between the two leaves the sheet empty.

use crate::config::RemoteConfig;
use crate::error::{SyncError, SyncResult};
use crate::http::{HttpTransport, UreqClient};
use crate::transport::TableTransport;
use campus_codec::{Table, TableName};
use campus_core::{rows, CoreError, CoreResult, LoadReport, Persistence, Registry};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info, warn};

/// Counters for remote traffic.
#[derive(Debug, Default)]
struct Counters {
    reads: AtomicU64,
    writes: AtomicU64,
    retries: AtomicU64,
    failures: AtomicU64,
}

/// Snapshot of remote traffic counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemoteStats {
    /// Ranged reads that succeeded.
    pub reads: u64,
    /// Tables written.
    pub writes: u64,
    /// Requests retried after a retryable failure.
    pub retries: u64,
    /// Requests that failed for good.
    pub failures: u64,
}

/// The registry stored as one sheet per table.
pub struct RemoteStore<T: TableTransport> {
    transport: T,
    config: RemoteConfig,
    counters: Counters,
}

impl RemoteStore<HttpTransport<UreqClient>> {
    /// Creates a store that talks HTTP to the configured endpoint.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the configuration is incomplete.
    pub fn connect(config: RemoteConfig) -> SyncResult<Self> {
        let transport = HttpTransport::from_config(&config)?;
        Ok(Self::new(transport, config))
    }
}

impl<T: TableTransport> RemoteStore<T> {
    /// Creates a store over any transport.
    pub fn new(transport: T, config: RemoteConfig) -> Self {
        Self {
            transport,
            config,
            counters: Counters::default(),
        }
    }

    /// Returns the transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Returns the configuration.
    pub fn config(&self) -> &RemoteConfig {
        &self.config
    }

    /// Returns the traffic counters.
    pub fn stats(&self) -> RemoteStats {
        RemoteStats {
            reads: self.counters.reads.load(Ordering::Relaxed),
            writes: self.counters.writes.load(Ordering::Relaxed),
            retries: self.counters.retries.load(Ordering::Relaxed),
            failures: self.counters.failures.load(Ordering::Relaxed),
        }
    }

    /// Reads one whole table, page by page.
    ///
    /// Reading stops at the first page shorter than the page size.
    ///
    /// # Errors
    ///
    /// Returns the transport error of the first page that could not be read.
    pub fn read_table(&self, table: TableName) -> SyncResult<Table> {
        let page_size = self.config.page_size.max(1);
        let mut result = Table::new();
        let mut first = 1;
        loop {
            let last = first + page_size - 1;
            let page = self.with_retry(table, "read", || {
                self.transport.read_range(table, first, last)
            })?;
            self.counters.reads.fetch_add(1, Ordering::Relaxed);

            let received = page.len();
            result.extend_rows(page);
            if received < page_size {
                break;
            }
            first = last + 1;
        }
        debug!(%table, rows = result.len(), "read remote table");
        Ok(result)
    }

    /// Loads every table present on the remote into `registry`.
    ///
    /// Each table is read on its own. A table that cannot be read is
    /// reported as `RemoteUnavailable` and its collection is left as it
    /// was; the remaining tables are still read. A table with no data rows
    /// leaves its collection unchanged, and a table with a bad row is
    /// reported and skipped.
    pub fn load(&self, registry: &mut Registry) -> LoadReport {
        let mut report = LoadReport::default();
        for table in TableName::ALL {
            let contents = match self.read_table(table) {
                Ok(contents) => contents,
                Err(err) => {
                    warn!(%table, error = %err, "remote table unavailable, keeping local copy");
                    report
                        .issues
                        .push(CoreError::remote_unavailable(table, err.to_string()));
                    continue;
                }
            };

            match rows::parse_table(table, &contents) {
                Ok(Some(collection)) => {
                    registry.restore(collection);
                    report.restored.push(table);
                }
                Ok(None) => debug!(%table, "remote table has no data"),
                Err(err) => {
                    warn!(%table, error = %err, "skipping malformed remote table");
                    report.issues.push(err);
                }
            }
        }
        info!(
            restored = report.restored.len(),
            issues = report.issues.len(),
            "loaded remote state"
        );
        report
    }

    /// Writes every table of `registry` to the remote.
    ///
    /// Each table is cleared and then rewritten. Writing stops at the first
    /// failing table.
    ///
    /// # Errors
    ///
    /// - `RemoteUnavailable` if a clear fails; that table is untouched.
    /// - `PartialWriteFailure` if a write fails after its clear; that table
    ///   may be left empty.
    pub fn save(&self, registry: &Registry) -> CoreResult<()> {
        for table in TableName::ALL {
            let contents = rows::to_table(registry, table);

            self.with_retry(table, "clear", || self.transport.clear(table))
                .map_err(|err| {
                    warn!(%table, error = %err, "remote clear failed");
                    CoreError::remote_unavailable(table, err.to_string())
                })?;

            self.with_retry(table, "write", || self.transport.write(table, contents.rows()))
                .map_err(|err| {
                    warn!(%table, error = %err, "remote write failed after clear");
                    CoreError::partial_write(table, err.to_string())
                })?;

            self.counters.writes.fetch_add(1, Ordering::Relaxed);
            debug!(%table, rows = contents.len(), "wrote remote table");
        }
        info!(tables = TableName::ALL.len(), "saved remote state");
        Ok(())
    }

    fn with_retry<R>(
        &self,
        table: TableName,
        operation: &str,
        mut request: impl FnMut() -> SyncResult<R>,
    ) -> SyncResult<R> {
        let retry = &self.config.retry;
        let attempts = retry.max_attempts.max(1);
        let mut attempt = 0;
        loop {
            if attempt > 0 {
                std::thread::sleep(retry.delay_for_attempt(attempt));
                self.counters.retries.fetch_add(1, Ordering::Relaxed);
            }

            match request() {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() && attempt + 1 < attempts => {
                    debug!(%table, operation, attempt, error = %err, "retrying remote request");
                    attempt += 1;
                }
                Err(err) => {
                    self.counters.failures.fetch_add(1, Ordering::Relaxed);
                    return Err(err);
                }
            }
        }
    }
}

impl<T: TableTransport> Persistence for RemoteStore<T> {
    fn name(&self) -> &str {
        "remote"
    }

    fn load_into(&mut self, registry: &mut Registry) -> CoreResult<LoadReport> {
        Ok(self.load(registry))
    }

    fn save(&mut self, registry: &Registry) -> CoreResult<()> {
        RemoteStore::save(self, registry)
    }
}

impl<T: TableTransport> std::fmt::Debug for RemoteStore<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteStore")
            .field("endpoint", &self.config.endpoint)
            .field("document_id", &self.config.document_id)
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}
