//! Change detection between two snapshots

use std::cmp::Ordering;
use std::fmt;

use crate::version::compare::compare_versions;
use crate::version::snapshot::{ArchitectureRecord, Snapshot};

/// A single observed difference for one architecture
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// No previous snapshot to compare against
    Initial { arch: String, version: Option<String> },
    EtagChanged { arch: String },
    SizeChanged { arch: String },
    LastModifiedChanged { arch: String },
    /// The version moved strictly forward
    VersionUpdated {
        arch: String,
        from: String,
        to: String,
    },
    /// A version is known now but was not before
    VersionDetected { arch: String, version: String },
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Change::Initial { arch, version } => write!(
                f,
                "{}: Initial version detected: {}",
                arch,
                version.as_deref().unwrap_or("unknown")
            ),
            Change::EtagChanged { arch } => write!(f, "{}: ETag changed", arch),
            Change::SizeChanged { arch } => write!(f, "{}: File size changed", arch),
            Change::LastModifiedChanged { arch } => {
                write!(f, "{}: Last modified date changed", arch)
            }
            Change::VersionUpdated { arch, from, to } => {
                write!(f, "{}: Version updated from {} to {}", arch, from, to)
            }
            Change::VersionDetected { arch, version } => {
                write!(f, "{}: Version detected: {}", arch, version)
            }
        }
    }
}

/// Compare `current` against `previous` and list every change, in
/// architecture order.
///
/// Without a previous snapshot each architecture yields exactly one
/// [`Change::Initial`]. An architecture missing from the previous snapshot
/// is compared against an empty record.
pub fn detect_changes(current: &Snapshot, previous: Option<&Snapshot>) -> Vec<Change> {
    let Some(previous) = previous else {
        return current
            .architectures
            .iter()
            .map(|(arch, record)| Change::Initial {
                arch: arch.clone(),
                version: record.version.clone(),
            })
            .collect();
    };

    let empty = ArchitectureRecord::default();
    current
        .architectures
        .iter()
        .flat_map(|(arch, record)| {
            let before = previous.architectures.get(arch).unwrap_or(&empty);
            diff_record(arch, before, record)
        })
        .collect()
}

fn diff_record(arch: &str, before: &ArchitectureRecord, after: &ArchitectureRecord) -> Vec<Change> {
    let arch = arch.to_string();
    let mut changes = Vec::new();

    if before.etag != after.etag {
        changes.push(Change::EtagChanged { arch: arch.clone() });
    }
    if before.size != after.size {
        changes.push(Change::SizeChanged { arch: arch.clone() });
    }
    if before.last_modified != after.last_modified {
        changes.push(Change::LastModifiedChanged { arch: arch.clone() });
    }

    match (before.version.as_deref(), after.version.as_deref()) {
        (Some(from), Some(to)) if compare_versions(from, to) == Ordering::Less => {
            changes.push(Change::VersionUpdated {
                arch,
                from: from.to_string(),
                to: to.to_string(),
            });
        }
        (None, Some(to)) => {
            changes.push(Change::VersionDetected {
                arch,
                version: to.to_string(),
            });
        }
        _ => {}
    }

    changes
}
