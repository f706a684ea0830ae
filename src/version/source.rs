//! Source trait for probing installer downloads

#[cfg(test)]
use mockall::automock;

use chrono::NaiveDateTime;
use tracing::{debug, warn};

use crate::version::error::FetchError;
use crate::version::extractor::VersionExtractor;
use crate::version::snapshot::ArchitectureRecord;

/// Header metadata returned by a HEAD request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadMetadata {
    /// ETag with surrounding quotes removed, empty if absent
    pub etag: String,
    pub content_length: Option<String>,
    /// `None` if the header was absent or not a valid HTTP-date
    pub last_modified: Option<NaiveDateTime>,
}

/// Trait for reading installer metadata and content from a download host
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait InstallerSource: Send + Sync {
    /// Fetches the header metadata of the installer at `url`
    async fn head(&self, url: &str) -> Result<HeadMetadata, FetchError>;

    /// Downloads the first bytes of the installer at `url`
    ///
    /// # Returns
    /// * `Ok(Vec<u8>)` - At most the configured prefix length
    /// * `Err(FetchError)` - If the request fails or returns a non-success status
    async fn fetch_prefix(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Build the record for one architecture.
///
/// A HEAD failure is returned to the caller. Failing to download the prefix
/// only loses the version, which is logged and recorded as `None`.
pub async fn inspect_installer<S: InstallerSource + ?Sized>(
    source: &S,
    extractor: &VersionExtractor,
    url: &str,
) -> Result<ArchitectureRecord, FetchError> {
    let head = source.head(url).await?;

    let version = match source.fetch_prefix(url).await {
        Ok(data) => {
            debug!("Downloaded {} bytes from {}", data.len(), url);
            extractor.extract(&data)
        }
        Err(e) => {
            warn!("Failed to extract version from installer {}: {}", url, e);
            None
        }
    };

    Ok(ArchitectureRecord {
        etag: head.etag,
        size: head.content_length,
        last_modified: head.last_modified,
        url: url.to_string(),
        version,
    })
}
