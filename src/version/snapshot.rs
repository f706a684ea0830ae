use std::path::Path;

use chrono::{DateTime, NaiveDateTime};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, info, warn};

use crate::version::error::SnapshotError;

/// Metadata recorded for one installer architecture
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchitectureRecord {
    /// ETag with surrounding quotes removed
    #[serde(deserialize_with = "null_as_empty")]
    pub etag: String,
    /// Raw `Content-Length` header value
    pub size: Option<String>,
    #[serde(deserialize_with = "lenient_timestamp")]
    pub last_modified: Option<NaiveDateTime>,
    #[serde(deserialize_with = "null_as_empty")]
    pub url: String,
    pub version: Option<String>,
}

/// Full recorded state of all tracked installers at one point in time
///
/// Only `architectures` is required when reading; a missing or unreadable
/// `check_time` falls back to the epoch since it is never compared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default, deserialize_with = "lenient_check_time")]
    pub check_time: NaiveDateTime,
    pub architectures: IndexMap<String, ArchitectureRecord>,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_timestamp<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<NaiveDateTime>, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?
        .as_deref()
        .and_then(parse_timestamp))
}

fn lenient_check_time<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<NaiveDateTime, D::Error> {
    Ok(lenient_timestamp(deserializer)?.unwrap_or_default())
}

/// Naive ISO-8601 as written by this tool, or RFC 3339 with an offset
/// (converted to UTC). Anything else is dropped with a warning.
fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    value
        .parse::<NaiveDateTime>()
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.naive_utc())
        })
        .or_else(|| {
            warn!("Ignoring unrecognized timestamp {:?} in previous metadata", value);
            None
        })
}

impl Snapshot {
    pub fn new(check_time: NaiveDateTime) -> Self {
        Self {
            check_time,
            architectures: IndexMap::new(),
        }
    }

    /// Load the snapshot left by a previous run.
    ///
    /// A missing file is a first run. An unreadable file, invalid JSON or a
    /// document without `architectures` is logged and treated the same way.
    /// Null fields and unrecognized timestamps inside records are read as
    /// empty so the records are still compared.
    pub fn load(path: &Path) -> Option<Self> {
        if !path.exists() {
            debug!("No previous snapshot at {:?}", path);
            return None;
        }

        Self::read(path)
            .inspect_err(|e| warn!("Could not load previous metadata from {:?}: {}", path, e))
            .ok()
    }

    fn read(path: &Path) -> Result<Self, SnapshotError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Overwrite `path` with this snapshot as pretty-printed JSON
    pub fn save(&self, path: &Path) -> Result<(), SnapshotError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        info!(
            "Saved snapshot with {} architectures to {:?}",
            self.architectures.len(),
            path
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;
    use tempfile::TempDir;

    fn timestamp(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f").unwrap()
    }

    fn sample_snapshot() -> Snapshot {
        let mut snapshot = Snapshot::new(timestamp("2024-03-01T12:00:00.123456"));
        snapshot.architectures.insert(
            "amd64".to_string(),
            ArchitectureRecord {
                etag: "abc123".to_string(),
                size: Some("104857600".to_string()),
                last_modified: Some(timestamp("2024-02-28T09:15:00")),
                url: "https://example.com/x64.exe".to_string(),
                version: Some("0.9.3".to_string()),
            },
        );
        snapshot
    }

    #[test]
    fn serializes_with_expected_layout() {
        let value = serde_json::to_value(sample_snapshot()).unwrap();

        assert_eq!(
            value,
            json!({
                "check_time": "2024-03-01T12:00:00.123456",
                "architectures": {
                    "amd64": {
                        "etag": "abc123",
                        "size": "104857600",
                        "last_modified": "2024-02-28T09:15:00",
                        "url": "https://example.com/x64.exe",
                        "version": "0.9.3"
                    }
                }
            })
        );
    }

    #[test]
    fn deserializes_record_with_missing_fields_as_empty() {
        let snapshot: Snapshot = serde_json::from_value(json!({
            "check_time": "2024-03-01T12:00:00",
            "architectures": {
                "arm64": { "etag": "xyz" }
            }
        }))
        .unwrap();

        assert_eq!(
            snapshot.architectures["arm64"],
            ArchitectureRecord {
                etag: "xyz".to_string(),
                ..Default::default()
            }
        );
    }

    #[test]
    fn load_returns_none_when_file_missing() {
        let temp_dir = TempDir::new().unwrap();

        assert_eq!(Snapshot::load(&temp_dir.path().join("missing.json")), None);
    }

    #[test]
    fn load_returns_none_for_malformed_json() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("metadata.json");
        std::fs::write(&path, "{\"check_time\": ").unwrap();

        assert_eq!(Snapshot::load(&path), None);
    }

    #[test]
    fn load_returns_none_without_architectures_key() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("metadata.json");
        std::fs::write(&path, r#"{"check_time": "2024-03-01T12:00:00"}"#).unwrap();

        assert_eq!(Snapshot::load(&path), None);
    }

    #[test]
    fn load_without_check_time_keeps_records() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("metadata.json");
        std::fs::write(
            &path,
            r#"{"architectures": {"amd64": {"etag": "abc123", "version": "0.9.3"}}}"#,
        )
        .unwrap();

        let snapshot = Snapshot::load(&path).unwrap();

        assert_eq!(snapshot.check_time, NaiveDateTime::default());
        assert_eq!(snapshot.architectures["amd64"].etag, "abc123");
        assert_eq!(snapshot.architectures["amd64"].version.as_deref(), Some("0.9.3"));
    }

    #[test]
    fn load_reads_null_fields_as_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("metadata.json");
        std::fs::write(
            &path,
            r#"{
                "check_time": null,
                "architectures": {
                    "amd64": {"etag": null, "size": null, "last_modified": null, "url": null, "version": null}
                }
            }"#,
        )
        .unwrap();

        let snapshot = Snapshot::load(&path).unwrap();

        assert_eq!(snapshot.architectures["amd64"], ArchitectureRecord::default());
    }

    #[rstest]
    #[case("2024-02-28T09:15:00", Some("2024-02-28T09:15:00"))]
    #[case("2024-02-28T09:15:00.5", Some("2024-02-28T09:15:00.5"))]
    #[case("2024-02-28T09:15:00+00:00", Some("2024-02-28T09:15:00"))]
    #[case("2024-02-28T10:15:00+01:00", Some("2024-02-28T09:15:00"))]
    #[case("2024-02-28T09:15:00Z", Some("2024-02-28T09:15:00"))]
    #[case("Wed, 28 Feb 2024 09:15:00 GMT", None)]
    #[case("", None)]
    fn parse_timestamp_returns_expected(#[case] value: &str, #[case] expected: Option<&str>) {
        assert_eq!(parse_timestamp(value), expected.map(timestamp));
    }

    #[test]
    fn load_keeps_record_with_unrecognized_last_modified() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("metadata.json");
        std::fs::write(
            &path,
            r#"{
                "check_time": "2024-03-01T12:00:00",
                "architectures": {"amd64": {"etag": "abc123", "last_modified": "last tuesday"}}
            }"#,
        )
        .unwrap();

        let snapshot = Snapshot::load(&path).unwrap();

        assert_eq!(snapshot.architectures["amd64"].etag, "abc123");
        assert_eq!(snapshot.architectures["amd64"].last_modified, None);
    }

    #[test]
    fn save_overwrites_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("metadata.json");
        std::fs::write(&path, "stale content that is longer than nothing").unwrap();

        let snapshot = sample_snapshot();
        snapshot.save(&path).unwrap();

        assert_eq!(Snapshot::load(&path), Some(snapshot));
    }

    #[test]
    fn save_fails_when_directory_missing() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing").join("metadata.json");

        let result = sample_snapshot().save(&path);

        assert!(matches!(result, Err(SnapshotError::Io(_))));
    }
}
