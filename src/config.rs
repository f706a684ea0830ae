use indexmap::IndexMap;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

// =============================================================================
// Time-related constants
// =============================================================================

/// Timeout for the metadata HEAD request in seconds
pub const HEAD_TIMEOUT_SECS: u64 = 30;

/// Timeout for the ranged prefix download in seconds
pub const PREFIX_TIMEOUT_SECS: u64 = 60;

// =============================================================================
// Fetch constants
// =============================================================================

/// Inclusive end offset of the `Range` requested when sniffing the version (~2MB)
pub const PREFIX_RANGE_END: u64 = 2_097_152;

/// Default location of the persisted snapshot, relative to the working directory
pub const DEFAULT_METADATA_FILE: &str = ".claude-version-metadata";

const DOWNLOAD_BASE_URL: &str =
    "https://storage.googleapis.com/osprey-downloads-c02f6a0d-347c-492b-a752-3e0651722e97";

/// Tracked installers as (architecture, URL) pairs, in report order
pub fn default_installers() -> IndexMap<String, String> {
    IndexMap::from([
        (
            "amd64".to_string(),
            format!("{DOWNLOAD_BASE_URL}/nest-win-x64/Claude-Setup-x64.exe"),
        ),
        (
            "arm64".to_string(),
            format!("{DOWNLOAD_BASE_URL}/nest-win-arm64/Claude-Setup-arm64.exe"),
        ),
    ])
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Watcher configuration structure
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct WatchConfig {
    /// Path of the JSON snapshot written after every check
    pub metadata_file: PathBuf,
    /// Architecture name to installer URL
    pub installers: IndexMap<String, String>,
    pub timeouts: TimeoutConfig,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            metadata_file: PathBuf::from(DEFAULT_METADATA_FILE),
            installers: default_installers(),
            timeouts: TimeoutConfig::default(),
        }
    }
}

impl WatchConfig {
    /// Loads a JSON config file. Fields absent from the file keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Request timeouts
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct TimeoutConfig {
    pub head_secs: u64,
    pub prefix_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            head_secs: HEAD_TIMEOUT_SECS,
            prefix_secs: PREFIX_TIMEOUT_SECS,
        }
    }
}
