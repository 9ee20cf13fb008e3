//! Flight List Check
//!
//! Checklist and flight-plan list validation for simmers and pilots.
//!
//! This library provides:
//! - Line-oriented list loading and entry normalization
//! - A reconciliation engine reporting duplicate, missing, out-of-order and
//!   malformed entries
//! - Text and JSON report rendering
//! - The on-disk checklist library and item-by-item walkthrough state

pub mod catalog;
pub mod check;
pub mod config;
pub mod error;
pub mod parser;
pub mod report;
pub mod session;
pub mod validation;
pub mod watch;

// Re-exports for clean public API
pub use check::{check_path, check_reader, load_reference};
pub use config::Config;
pub use error::ListError;
pub use parser::{normalize, ListFormat, NormalizedEntry, RawEntry};
pub use report::OutputFormat;
pub use validation::{reconcile, Finding, FindingKind, Reference, Report, Rules, Severity};
