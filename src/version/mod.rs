//! Installer version tracking
//!
//! This module fetches installer metadata, sniffs versions out of the
//! installer bytes, and compares the result against the last recorded
//! snapshot.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Source    │────▶│  Snapshot   │◀────│   Differ    │
//! │ (HEAD, GET) │     │   (JSON)    │     │  (changes)  │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!        │                                       │
//!        ▼                                       ▼
//! ┌─────────────┐                         ┌─────────────┐
//! │  Extractor  │                         │   Compare   │
//! │ (byte regex)│                         │(version cmp)│
//! └─────────────┘                         └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`source`]: Source trait and per-architecture inspection
//! - [`sources`]: Concrete sources (HTTP)
//! - [`extractor`]: Version sniffing from raw bytes
//! - [`snapshot`]: Persisted per-architecture records
//! - [`differ`]: Change detection between snapshots
//! - [`compare`]: Dotted version ordering
//! - [`error`]: Error types for fetch, snapshot and check operations

pub mod compare;
pub mod differ;
pub mod error;
pub mod extractor;
pub mod snapshot;
pub mod source;
pub mod sources;
