//! Remote pull and push commands.

use super::open;
use crate::RemoteArgs;
use campus_sync::{RemoteConfig, RemoteStore, RetryConfig, TableTransport};
use std::path::Path;
use std::time::Duration;
use tracing::warn;

fn remote_config(args: &RemoteArgs) -> RemoteConfig {
    let mut config = RemoteConfig::new(&args.api_key, &args.document)
        .with_endpoint(&args.endpoint)
        .with_page_size(args.page_size)
        .with_retry(RetryConfig::new(args.attempts.max(1)));
    if let Some(secs) = args.timeout {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    config
}

/// Replaces the local data with the contents of the remote spreadsheet.
///
/// Tables the remote cannot provide keep their local contents.
pub fn pull(path: &Path, args: &RemoteArgs) -> Result<(), Box<dyn std::error::Error>> {
    let remote = RemoteStore::connect(remote_config(args))?;
    pull_from(path, remote)
}

fn pull_from<T: TableTransport>(
    path: &Path,
    mut remote: RemoteStore<T>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut db = open(path)?;
    let report = db.load_from(&mut remote)?;
    db.flush()?;

    for issue in &report.issues {
        warn!(%issue, "remote load incomplete, local table kept");
    }
    let names: Vec<&str> = report.restored.iter().map(|t| t.as_str()).collect();
    println!(
        "Pulled {} table(s) into {}: {}",
        names.len(),
        path.display(),
        names.join(", ")
    );
    if !report.is_clean() {
        println!(
            "{} table(s) could not be read and were left as they were; see log",
            report.issues.len()
        );
    }
    Ok(())
}

/// Overwrites the remote spreadsheet with the local data.
pub fn push(path: &Path, args: &RemoteArgs) -> Result<(), Box<dyn std::error::Error>> {
    let db = open(path)?;
    let mut remote = RemoteStore::connect(remote_config(args))?;
    db.save_to(&mut remote)?;

    let stats = remote.stats();
    println!(
        "Pushed {} table(s) ({} retried request(s))",
        stats.writes, stats.retries
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::seed;
    use campus_codec::TableName;
    use campus_core::{rows, sample::sample_registry, Student};
    use campus_sync::{MockTransport, Operation, SyncError};
    use tempfile::TempDir;

    fn mock_remote() -> RemoteStore<MockTransport> {
        let config = RemoteConfig::new("key", "doc").with_retry(RetryConfig::no_retry());
        RemoteStore::new(MockTransport::new(), config)
    }

    #[test]
    fn failed_table_keeps_local_copy() {
        let dir = TempDir::new().unwrap();
        seed::run(dir.path(), false).unwrap();

        let mut upstream = sample_registry();
        upstream
            .add_student(Student::new("STU006", "Frank Lee", 23, "Male", "Physics"))
            .unwrap();
        let remote = mock_remote();
        for table in TableName::ALL {
            remote
                .transport()
                .set_sheet(table, rows::to_table(&upstream, table).into_rows());
        }
        remote.transport().fail(
            TableName::Courses,
            Operation::Read,
            SyncError::status(403, "forbidden"),
        );

        pull_from(dir.path(), remote).unwrap();

        let db = open(dir.path()).unwrap();
        assert_eq!(db.registry().students().len(), 6);
        assert_eq!(db.registry().courses().len(), 8);
        assert_eq!(db.registry().departments(), sample_registry().departments());
    }

    #[test]
    fn unreachable_remote_changes_nothing() {
        let dir = TempDir::new().unwrap();
        seed::run(dir.path(), false).unwrap();
        let before = open(dir.path()).unwrap().registry().clone();

        let remote = mock_remote();
        remote.transport().set_connected(false);
        pull_from(dir.path(), remote).unwrap();

        assert_eq!(open(dir.path()).unwrap().registry(), &before);
    }
}
