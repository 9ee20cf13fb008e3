//! Validation Engine
//!
//! Reconciliation rules and the findings they produce, separated from loading
//! and output concerns.

pub mod engine;
pub mod finding;

pub use engine::{reconcile, Reference, ReferenceKey, Rules};
pub use finding::{Finding, FindingKind, Report, Severity, Summary};
