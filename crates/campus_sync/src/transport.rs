//! Transport abstraction for the remote store.

use crate::error::{SyncError, SyncResult};
use campus_codec::TableName;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

/// Row-range access to the remote tables.
///
/// Rows are numbered from 1, as in the spreadsheet, and ranges are
/// inclusive. Implementations may return fewer rows than requested when
/// the table ends early.
pub trait TableTransport: Send + Sync {
    /// Reads rows `first..=last` of a table.
    fn read_range(&self, table: TableName, first: usize, last: usize)
        -> SyncResult<Vec<Vec<String>>>;

    /// Removes every value of a table.
    fn clear(&self, table: TableName) -> SyncResult<()>;

    /// Writes `rows` starting at the first row of a table.
    fn write(&self, table: TableName, rows: &[Vec<String>]) -> SyncResult<()>;

    /// Returns true if the last request reached the remote.
    fn is_connected(&self) -> bool;
}

/// Kind of request sent to a transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// A ranged read.
    Read,
    /// A table clear.
    Clear,
    /// A table write.
    Write,
}

/// A request recorded by [`MockTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// `read_range(table, first, last)`.
    Read {
        /// Table read.
        table: TableName,
        /// First row requested.
        first: usize,
        /// Last row requested.
        last: usize,
    },
    /// `clear(table)`.
    Clear(TableName),
    /// `write(table, rows)` with the number of rows written.
    Write {
        /// Table written.
        table: TableName,
        /// Rows written.
        rows: usize,
    },
}

#[derive(Debug)]
struct Failure {
    table: TableName,
    operation: Operation,
    error: SyncError,
    remaining: Option<u32>,
}

/// An in-memory transport for tests, with per-table failure injection.
#[derive(Debug)]
pub struct MockTransport {
    connected: AtomicBool,
    sheets: Mutex<BTreeMap<TableName, Vec<Vec<String>>>>,
    failures: Mutex<Vec<Failure>>,
    requests: Mutex<Vec<Request>>,
}

impl MockTransport {
    /// Creates a mock with no sheets.
    pub fn new() -> Self {
        Self {
            connected: AtomicBool::new(true),
            sheets: Mutex::new(BTreeMap::new()),
            failures: Mutex::new(Vec::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Replaces the contents of one sheet.
    pub fn set_sheet(&self, table: TableName, rows: Vec<Vec<String>>) {
        self.sheets.lock().insert(table, rows);
    }

    /// Returns a copy of one sheet.
    pub fn sheet(&self, table: TableName) -> Vec<Vec<String>> {
        self.sheets.lock().get(&table).cloned().unwrap_or_default()
    }

    /// Makes every `operation` on `table` fail with `error`.
    pub fn fail(&self, table: TableName, operation: Operation, error: SyncError) {
        self.push_failure(table, operation, error, None);
    }

    /// Makes the next `times` `operation`s on `table` fail with `error`.
    pub fn fail_times(&self, table: TableName, operation: Operation, error: SyncError, times: u32) {
        self.push_failure(table, operation, error, Some(times));
    }

    /// Removes all injected failures.
    pub fn heal(&self) {
        self.failures.lock().clear();
    }

    /// Sets the connection state.
    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }

    /// Returns every request received so far.
    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().clone()
    }

    /// Forgets recorded requests.
    pub fn clear_requests(&self) {
        self.requests.lock().clear();
    }

    fn push_failure(
        &self,
        table: TableName,
        operation: Operation,
        error: SyncError,
        remaining: Option<u32>,
    ) {
        self.failures.lock().push(Failure {
            table,
            operation,
            error,
            remaining,
        });
    }

    fn check(&self, table: TableName, operation: Operation, request: Request) -> SyncResult<()> {
        self.requests.lock().push(request);
        if !self.is_connected() {
            return Err(SyncError::NotConnected);
        }

        let mut failures = self.failures.lock();
        let Some(index) = failures
            .iter()
            .position(|f| f.table == table && f.operation == operation)
        else {
            return Ok(());
        };
        let error = failures[index].error.clone();
        if let Some(remaining) = failures[index].remaining.as_mut() {
            *remaining -= 1;
            if *remaining == 0 {
                failures.remove(index);
            }
        }
        Err(error)
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl TableTransport for MockTransport {
    fn read_range(
        &self,
        table: TableName,
        first: usize,
        last: usize,
    ) -> SyncResult<Vec<Vec<String>>> {
        self.check(table, Operation::Read, Request::Read { table, first, last })?;
        let sheets = self.sheets.lock();
        let rows = sheets.get(&table).map(Vec::as_slice).unwrap_or_default();
        let start = first.saturating_sub(1).min(rows.len());
        let end = last.min(rows.len()).max(start);
        Ok(rows[start..end].to_vec())
    }

    fn clear(&self, table: TableName) -> SyncResult<()> {
        self.check(table, Operation::Clear, Request::Clear(table))?;
        self.sheets.lock().remove(&table);
        Ok(())
    }

    fn write(&self, table: TableName, rows: &[Vec<String>]) -> SyncResult<()> {
        self.check(
            table,
            Operation::Write,
            Request::Write {
                table,
                rows: rows.len(),
            },
        )?;
        let mut sheets = self.sheets.lock();
        let sheet = sheets.entry(table).or_default();
        for (i, row) in rows.iter().enumerate() {
            match sheet.get_mut(i) {
                Some(existing) => existing.clone_from(row),
                None => sheet.push(row.clone()),
            }
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}
