//! Version sniffing from raw installer bytes
//!
//! The installer is scanned with a fixed, ordered list of byte patterns.
//! Every capture across every pattern is a candidate; candidates are
//! de-duplicated in first-seen order, filtered to plausible
//! `major.minor.patch` numbers and the shortest one wins:
//!
//! ```text
//! bytes ──▶ patterns ──▶ candidates ──▶ bounds filter ──▶ (parts, lexical) min
//! ```
//!
//! The pattern list and bounds describe the installer's binary layout and
//! must stay as they are.

use indexmap::IndexSet;
use regex::bytes::Regex;
use tracing::debug;

/// Ordered byte patterns, each with exactly one capture group.
/// `(?-u)` keeps `\d` and `[^\d]` ASCII-only so arbitrary binary can match.
const VERSION_PATTERNS: &[&str] = &[
    // Plain dotted numbers
    r"(?-u)(\d+\.\d+\.\d+\.\d+)",
    r"(?-u)(\d+\.\d+\.\d+)",
    // Windows version resource
    r#"(?-u)ProductVersion["\x00]*(\d+\.\d+\.\d+)"#,
    r#"(?-u)FileVersion["\x00]*(\d+\.\d+\.\d+)"#,
    r#"(?-u)Version["\x00]*(\d+\.\d+\.\d+)"#,
    // Installer names
    r"(?-u)AnthropicClaude[^\d]*(\d+\.\d+\.\d+)",
    r"(?-u)Claude[^\d]*(\d+\.\d+\.\d+)",
    r"(?-u)v(\d+\.\d+\.\d+)",
    r"(?-u)V(\d+\.\d+\.\d+)",
    // UTF-16 / padded strings near the product name
    r"(?-u)(\d+\.\d+\.\d+)[\x00\x20-\x7F]{0,50}[Cc]laude",
    r"(?-u)[Cc]laude[\x00\x20-\x7F]{0,50}(\d+\.\d+\.\d+)",
];

const MAX_MAJOR: u64 = 10;
const MAX_MINOR: u64 = 100;
const MAX_PATCH: u64 = 100;

/// Extracts a best-effort version string from the head of an installer
pub struct VersionExtractor {
    patterns: Vec<Regex>,
}

impl VersionExtractor {
    pub fn new() -> Self {
        Self {
            patterns: VERSION_PATTERNS
                .iter()
                .map(|p| Regex::new(p).expect("version pattern must compile"))
                .collect(),
        }
    }

    /// Returns the single best version found in `data`, if any
    pub fn extract(&self, data: &[u8]) -> Option<String> {
        let candidates = self.candidates(data);
        debug!("Found {} version candidates", candidates.len());

        let mut valid: Vec<&String> = candidates.iter().filter(|v| is_plausible(v)).collect();
        valid.sort_by(|a, b| {
            component_count(a)
                .cmp(&component_count(b))
                .then_with(|| a.cmp(b))
        });

        valid.first().map(|v| v.to_string())
    }

    /// All captures of all patterns, in pattern order then match order, without duplicates
    fn candidates(&self, data: &[u8]) -> IndexSet<String> {
        self.patterns
            .iter()
            .flat_map(|re| re.captures_iter(data))
            .filter_map(|caps| caps.get(1))
            .map(|m| String::from_utf8_lossy(m.as_bytes()).into_owned())
            .collect()
    }
}

impl Default for VersionExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn component_count(version: &str) -> usize {
    version.split('.').count()
}

/// At least three components, the first three numeric and within bounds
fn is_plausible(version: &str) -> bool {
    let parts: Vec<&str> = version.split('.').collect();
    if parts.len() < 3 {
        return false;
    }

    match (
        parts[0].parse::<u64>(),
        parts[1].parse::<u64>(),
        parts[2].parse::<u64>(),
    ) {
        (Ok(major), Ok(minor), Ok(patch)) => {
            major <= MAX_MAJOR && minor <= MAX_MINOR && patch <= MAX_PATCH
        }
        _ => false,
    }
}
