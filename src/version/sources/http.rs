//! HTTP installer source backed by reqwest

use std::time::Duration;

use chrono::NaiveDateTime;
use reqwest::header::{CONTENT_LENGTH, ETAG, HeaderMap, LAST_MODIFIED, RANGE};
use tracing::{debug, warn};

use crate::config::{PREFIX_RANGE_END, TimeoutConfig};
use crate::version::error::FetchError;
use crate::version::source::{HeadMetadata, InstallerSource};

/// HTTP-date without the zone name, which must be GMT or UTC
const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S";

/// Installer source that talks to the download host over HTTP
pub struct HttpSource {
    client: reqwest::Client,
    head_timeout: Duration,
    prefix_timeout: Duration,
}

impl HttpSource {
    pub fn new(timeouts: &TimeoutConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("installer-watch/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            head_timeout: Duration::from_secs(timeouts.head_secs),
            prefix_timeout: Duration::from_secs(timeouts.prefix_secs),
        })
    }

    fn check_status(response: &reqwest::Response, url: &str) -> Result<(), FetchError> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        warn!("Download host returned status {}: {}", status, url);
        Err(FetchError::UnexpectedStatus {
            url: url.to_string(),
            status,
        })
    }
}

#[async_trait::async_trait]
impl InstallerSource for HttpSource {
    async fn head(&self, url: &str) -> Result<HeadMetadata, FetchError> {
        let response = self
            .client
            .head(url)
            .timeout(self.head_timeout)
            .send()
            .await?;

        Self::check_status(&response, url)?;

        Ok(parse_head_metadata(response.headers()))
    }

    async fn fetch_prefix(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let mut response = self
            .client
            .get(url)
            .header(RANGE, format!("bytes=0-{}", PREFIX_RANGE_END))
            .timeout(self.prefix_timeout)
            .send()
            .await?;

        Self::check_status(&response, url)?;

        // The server may ignore the range and send the whole installer
        let limit = (PREFIX_RANGE_END + 1) as usize;
        let mut data = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            let remaining = limit - data.len();
            if chunk.len() >= remaining {
                data.extend_from_slice(&chunk[..remaining]);
                break;
            }
            data.extend_from_slice(&chunk);
        }

        debug!("Read {} bytes of {} (status {})", data.len(), url, response.status());
        Ok(data)
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: reqwest::header::HeaderName) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn parse_head_metadata(headers: &HeaderMap) -> HeadMetadata {
    let etag = header_str(headers, ETAG)
        .map(|v| v.trim_matches('"').to_string())
        .unwrap_or_default();

    let content_length = header_str(headers, CONTENT_LENGTH).map(String::from);

    let last_modified = header_str(headers, LAST_MODIFIED).and_then(|value| {
        parse_http_date(value)
            .inspect_err(|e| warn!("Could not parse last-modified date {:?}: {}", value, e))
            .ok()
    });

    HeadMetadata {
        etag,
        content_length,
        last_modified,
    }
}

/// Parse an HTTP-date such as `Mon, 15 Jan 2024 10:30:00 GMT`
fn parse_http_date(value: &str) -> chrono::ParseResult<NaiveDateTime> {
    let trimmed = value.trim();
    let without_zone = trimmed
        .strip_suffix(" GMT")
        .or_else(|| trimmed.strip_suffix(" UTC"))
        .unwrap_or(trimmed);
    NaiveDateTime::parse_from_str(without_zone, HTTP_DATE_FORMAT)
}
