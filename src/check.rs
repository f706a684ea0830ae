//! One complete check: inspect every installer, diff, persist

use std::process::ExitCode;

use tracing::{error, info};

use crate::config::WatchConfig;
use crate::version::differ::{Change, detect_changes};
use crate::version::error::CheckError;
use crate::version::extractor::VersionExtractor;
use crate::version::snapshot::Snapshot;
use crate::version::source::{InstallerSource, inspect_installer};

/// Outcome of a run as seen by the CI caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    /// Nothing changed upstream
    Unchanged,
    /// At least one change was detected
    Changed,
    /// The check could not complete
    Failed,
}

impl CheckStatus {
    pub fn code(self) -> u8 {
        match self {
            CheckStatus::Unchanged => 0,
            CheckStatus::Changed => 1,
            CheckStatus::Failed => 2,
        }
    }
}

impl From<CheckStatus> for ExitCode {
    fn from(status: CheckStatus) -> Self {
        ExitCode::from(status.code())
    }
}

/// Result of a completed check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    /// Freshly recorded state, already written to disk
    pub snapshot: Snapshot,
    pub changes: Vec<Change>,
    /// No usable previous snapshot was found
    pub first_run: bool,
}

impl CheckReport {
    pub fn status(&self) -> CheckStatus {
        if self.changes.is_empty() {
            CheckStatus::Unchanged
        } else {
            CheckStatus::Changed
        }
    }
}

/// Inspect every configured installer in order and compare against the
/// previous snapshot.
///
/// The new snapshot is saved whether or not anything changed; a failed save
/// is logged and does not fail the check. Any installer that cannot be
/// reached aborts the whole check.
pub async fn run_check<S: InstallerSource + ?Sized>(
    source: &S,
    config: &WatchConfig,
) -> Result<CheckReport, CheckError> {
    println!("Checking for Claude Desktop updates...");

    let extractor = VersionExtractor::new();
    let mut snapshot = Snapshot::new(chrono::Local::now().naive_local());

    for (arch, url) in &config.installers {
        println!("Checking {} installer...", arch);
        let record = inspect_installer(source, &extractor, url)
            .await
            .map_err(|e| CheckError::Fetch {
                arch: arch.clone(),
                source: e,
            })?;
        info!(
            "{}: etag={} version={}",
            arch,
            record.etag,
            record.version.as_deref().unwrap_or("unknown")
        );
        snapshot.architectures.insert(arch.clone(), record);
    }

    let previous = Snapshot::load(&config.metadata_file);
    let first_run = previous.is_none();
    let changes = detect_changes(&snapshot, previous.as_ref());

    if let Err(e) = snapshot.save(&config.metadata_file) {
        error!(
            "Could not save metadata to {:?}: {}",
            config.metadata_file, e
        );
    }

    Ok(CheckReport {
        snapshot,
        changes,
        first_run,
    })
}
