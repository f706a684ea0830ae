//! Dotted version comparison used to detect upgrades

use std::cmp::Ordering;

/// Compare two dotted version strings component by component.
///
/// Components are compared as non-negative integers of any length and
/// missing trailing components count as 0, so "1.2" equals "1.2.0". If any
/// component of either side is not all digits, the whole strings are
/// compared lexicographically.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    match (numeric_components(a), numeric_components(b)) {
        (Some(a_parts), Some(b_parts)) => {
            let len = a_parts.len().max(b_parts.len());
            (0..len)
                .map(|i| {
                    let x = a_parts.get(i).copied().unwrap_or("");
                    let y = b_parts.get(i).copied().unwrap_or("");
                    compare_digits(x, y)
                })
                .find(|ord| ord.is_ne())
                .unwrap_or(Ordering::Equal)
        }
        _ => a.cmp(b),
    }
}

/// Digit strings with leading zeros stripped; zero becomes ""
fn numeric_components(version: &str) -> Option<Vec<&str>> {
    version
        .split('.')
        .map(|part| {
            (!part.is_empty() && part.bytes().all(|b| b.is_ascii_digit()))
                .then(|| part.trim_start_matches('0'))
        })
        .collect()
}

/// Numeric order of two zero-stripped digit strings
fn compare_digits(a: &str, b: &str) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}
