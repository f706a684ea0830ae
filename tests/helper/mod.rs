//! Mock download host for end-to-end checks

use indexmap::IndexMap;
use mockito::{Mock, ServerGuard};
use tempfile::TempDir;

use installer_watch::config::WatchConfig;

pub const ARCHES: [(&str, &str); 2] = [
    ("amd64", "/Claude-Setup-x64.exe"),
    ("arm64", "/Claude-Setup-arm64.exe"),
];

/// Serve HEAD and ranged GET for every tracked installer, `hits` times each
pub async fn serve_release(
    server: &mut ServerGuard,
    etag: &str,
    version: &str,
    hits: usize,
) -> Vec<Mock> {
    let mut mocks = Vec::new();
    for (_, path) in ARCHES {
        mocks.push(
            server
                .mock("HEAD", path)
                .with_status(200)
                .with_header("etag", &format!("\"{}\"", etag))
                .with_header("last-modified", "Mon, 15 Jan 2024 10:30:00 GMT")
                .expect(hits)
                .create_async()
                .await,
        );
        mocks.push(
            server
                .mock("GET", path)
                .match_header("range", "bytes=0-2097152")
                .with_status(206)
                .with_body(installer_prefix(version))
                .expect(hits)
                .create_async()
                .await,
        );
    }
    mocks
}

/// PE-ish header followed by a UTF-16 style version resource
pub fn installer_prefix(version: &str) -> Vec<u8> {
    let mut data = b"MZ\x90\x00\x03\x00\x00\x00\x04\x00".to_vec();
    data.extend_from_slice(&[0xff; 64]);
    data.extend_from_slice(b"ProductVersion\x00\x00");
    data.extend_from_slice(version.as_bytes());
    data.extend_from_slice(&[0x00; 16]);
    data
}

pub fn watch_config(server: &ServerGuard, temp_dir: &TempDir) -> WatchConfig {
    WatchConfig {
        metadata_file: temp_dir.path().join(".claude-version-metadata"),
        installers: ARCHES
            .iter()
            .map(|(arch, path)| (arch.to_string(), format!("{}{}", server.url(), path)))
            .collect::<IndexMap<_, _>>(),
        ..Default::default()
    }
}
