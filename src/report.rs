//! Human-readable summary printed at the end of a check

use std::fmt::Write;

use crate::check::CheckReport;

/// Render the summary for CI logs
pub fn render(report: &CheckReport) -> String {
    let mut out = String::new();

    if report.first_run {
        let _ = writeln!(out, "First run detected - initializing version tracking");
    }

    let versions = report
        .snapshot
        .architectures
        .iter()
        .map(|(arch, record)| (arch, record.version.as_deref().unwrap_or("unknown")));

    if report.changes.is_empty() {
        let _ = writeln!(out, "No changes detected");
        let summary: Vec<String> = versions
            .map(|(arch, version)| format!("{}: {}", arch, version))
            .collect();
        let _ = writeln!(out, "Current versions: {}", summary.join(", "));
    } else {
        let _ = writeln!(out, "Changes detected:");
        for change in &report.changes {
            let _ = writeln!(out, "  • {}", change);
        }
        let _ = writeln!(out, "\nCurrent versions:");
        for (arch, version) in versions {
            let _ = writeln!(out, "  • {}: {}", arch, version);
        }
    }

    out
}
