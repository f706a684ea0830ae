//! Detects upstream releases of the Claude Desktop Windows installers.
//!
//! A check inspects every configured installer, diffs the result against
//! the snapshot left by the previous run and overwrites that snapshot.
//! The binary maps the outcome to an exit code for CI.

pub mod check;
pub mod config;
pub mod logging;
pub mod report;
pub mod version;
