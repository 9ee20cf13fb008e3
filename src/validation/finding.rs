//! Findings and reports produced by the reconciliation engine.

use std::fmt;

use serde::Serialize;

/// Severity of a finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

/// Category of a detected discrepancy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    Duplicate,
    Missing,
    OutOfOrder,
    Unexpected,
    Malformed,
}

impl fmt::Display for FindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Duplicate => write!(f, "duplicate"),
            Self::Missing => write!(f, "missing"),
            Self::OutOfOrder => write!(f, "out-of-order"),
            Self::Unexpected => write!(f, "unexpected"),
            Self::Malformed => write!(f, "malformed"),
        }
    }
}

/// One discrepancy between a list and the rule set
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub kind: FindingKind,
    pub severity: Severity,
    /// Normalized key involved, if the entry had one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Source lines involved, ascending. Empty for missing entries.
    pub lines: Vec<usize>,
    pub message: String,
}

impl Finding {
    /// First line this finding refers to
    pub fn first_line(&self) -> Option<usize> {
        self.lines.first().copied()
    }
}

/// Finding counts by kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub duplicate: usize,
    pub missing: usize,
    pub out_of_order: usize,
    pub unexpected: usize,
    pub malformed: usize,
}

impl Summary {
    pub fn count(&self, kind: FindingKind) -> usize {
        match kind {
            FindingKind::Duplicate => self.duplicate,
            FindingKind::Missing => self.missing,
            FindingKind::OutOfOrder => self.out_of_order,
            FindingKind::Unexpected => self.unexpected,
            FindingKind::Malformed => self.malformed,
        }
    }

    fn record(&mut self, kind: FindingKind) {
        let slot = match kind {
            FindingKind::Duplicate => &mut self.duplicate,
            FindingKind::Missing => &mut self.missing,
            FindingKind::OutOfOrder => &mut self.out_of_order,
            FindingKind::Unexpected => &mut self.unexpected,
            FindingKind::Malformed => &mut self.malformed,
        };
        *slot += 1;
    }

    pub fn total(&self) -> usize {
        self.duplicate + self.missing + self.out_of_order + self.unexpected + self.malformed
    }
}

/// Ordered findings of one check run plus their summary
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    pub findings: Vec<Finding>,
    pub summary: Summary,
    /// Entries seen by the engine, malformed ones included
    pub entries_checked: usize,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, finding: Finding) {
        self.summary.record(finding.kind);
        self.findings.push(finding);
    }

    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    /// True when any finding has error severity
    pub fn has_errors(&self) -> bool {
        self.findings.iter().any(|f| f.severity == Severity::Error)
    }

    pub fn error_count(&self) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Error)
            .count()
    }

    pub fn findings_of(&self, kind: FindingKind) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(move |f| f.kind == kind)
    }
}
