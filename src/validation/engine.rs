//! Reconciliation Engine
//!
//! Applies the fixed rule set to a fully normalized list. Rules run in a fixed
//! order (uniqueness, completeness, order, unexpected, malformed) and each rule
//! emits its findings by ascending line number, so a report is fully
//! determined by its input.

use std::collections::{HashMap, HashSet};

use crate::parser::{normalize_key, NormalizedEntry, ParseError};
use crate::validation::finding::{Finding, FindingKind, Report, Severity};

/// A key of the reference list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceKey {
    pub key: String,
    pub display: String,
}

/// Ordered set of keys a list is expected to contain
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reference {
    keys: Vec<ReferenceKey>,
    positions: HashMap<String, usize>,
}

impl Reference {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a reference from raw key spellings, keeping first occurrences
    pub fn from_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut reference = Self::new();
        for key in keys {
            reference.insert(key.as_ref());
        }
        reference
    }

    /// Build a reference from already normalized entries
    pub fn from_entries(entries: &[NormalizedEntry]) -> Self {
        let mut reference = Self::new();
        for entry in entries {
            reference.insert(&entry.display_key);
        }
        reference
    }

    /// Append a key; duplicates and blank keys are ignored
    pub fn insert(&mut self, display: &str) -> bool {
        let key = normalize_key(display);
        if key.is_empty() || self.positions.contains_key(&key) {
            return false;
        }

        self.positions.insert(key.clone(), self.keys.len());
        self.keys.push(ReferenceKey {
            key,
            display: display.trim().to_string(),
        });
        true
    }

    pub fn position(&self, key: &str) -> Option<usize> {
        self.positions.get(key).copied()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.positions.contains_key(key)
    }

    pub fn keys(&self) -> &[ReferenceKey] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Rule configuration for one reconciliation run
#[derive(Debug, Clone, Default)]
pub struct Rules {
    /// Required keys and their expected order
    pub reference: Option<Reference>,
    /// Flag entries that break reference order
    pub check_order: bool,
    /// Flag entries whose key is not in the reference
    pub reject_unknown: bool,
    /// Malformed entries are errors instead of warnings
    pub strict: bool,
}

/// Reconcile a normalized list against the rules
///
/// Every entry is evaluated; a parse failure never stops the run.
pub fn reconcile(
    results: Vec<Result<NormalizedEntry, ParseError>>,
    rules: &Rules,
) -> Report {
    let mut entries = Vec::new();
    let mut malformed = Vec::new();
    for result in results {
        match result {
            Ok(entry) => entries.push(entry),
            Err(err) => malformed.push(err),
        }
    }
    entries.sort_by_key(|e| e.line);
    malformed.sort_by_key(|e| e.line);

    log::debug!(
        "Reconciling {} entries ({} malformed)",
        entries.len(),
        malformed.len()
    );

    let mut report = Report::new();
    report.entries_checked = entries.len() + malformed.len();

    check_uniqueness(&entries, &mut report);

    if let Some(reference) = &rules.reference {
        check_completeness(&entries, reference, &mut report);
        if rules.check_order {
            check_order(&entries, reference, &mut report);
        }
        if rules.reject_unknown {
            check_unexpected(&entries, reference, &mut report);
        }
    }

    let severity = if rules.strict {
        Severity::Error
    } else {
        Severity::Warning
    };
    for err in &malformed {
        report.push(Finding {
            kind: FindingKind::Malformed,
            severity,
            key: None,
            lines: vec![err.line],
            message: format!("Malformed entry: {}", err.reason),
        });
    }

    report
}

/// Any key seen more than once yields one finding listing every occurrence
fn check_uniqueness(entries: &[NormalizedEntry], report: &mut Report) {
    let mut order: Vec<&str> = Vec::new();
    let mut occurrences: HashMap<&str, Vec<&NormalizedEntry>> = HashMap::new();

    for entry in entries {
        let slot = occurrences.entry(entry.key.as_str()).or_default();
        if slot.is_empty() {
            order.push(entry.key.as_str());
        }
        slot.push(entry);
    }

    for key in order {
        let seen = &occurrences[key];
        if seen.len() < 2 {
            continue;
        }

        let lines: Vec<usize> = seen.iter().map(|e| e.line).collect();
        report.push(Finding {
            kind: FindingKind::Duplicate,
            severity: Severity::Error,
            key: Some(key.to_string()),
            message: format!(
                "Duplicate entry '{}' on lines {}",
                seen[0].display_key,
                join_lines(&lines)
            ),
            lines,
        });
    }
}

/// Every reference key absent from the list yields one finding
fn check_completeness(entries: &[NormalizedEntry], reference: &Reference, report: &mut Report) {
    let present: HashSet<&str> = entries.iter().map(|e| e.key.as_str()).collect();

    for required in reference.keys() {
        if present.contains(required.key.as_str()) {
            continue;
        }

        report.push(Finding {
            kind: FindingKind::Missing,
            severity: Severity::Error,
            key: Some(required.key.clone()),
            lines: Vec::new(),
            message: format!("Missing required entry '{}'", required.display),
        });
    }
}

/// Entries outside the longest run that agrees with reference order
fn check_order(entries: &[NormalizedEntry], reference: &Reference, report: &mut Report) {
    let mut seen = HashSet::new();
    let ranked: Vec<(&NormalizedEntry, usize)> = entries
        .iter()
        .filter(|e| seen.insert(e.key.as_str()))
        .filter_map(|e| reference.position(&e.key).map(|pos| (e, pos)))
        .collect();

    let positions: Vec<usize> = ranked.iter().map(|(_, pos)| *pos).collect();
    let in_order = longest_increasing(&positions);

    for (idx, (entry, pos)) in ranked.iter().enumerate() {
        if in_order.contains(&idx) {
            continue;
        }

        let expectation = match pos.checked_sub(1) {
            Some(prev) => format!("expected after '{}'", reference.keys()[prev].display),
            None => "expected first".to_string(),
        };
        report.push(Finding {
            kind: FindingKind::OutOfOrder,
            severity: Severity::Error,
            key: Some(entry.key.clone()),
            lines: vec![entry.line],
            message: format!(
                "Entry '{}' is out of order ({})",
                entry.display_key, expectation
            ),
        });
    }
}

/// Entries whose key the reference does not know
fn check_unexpected(entries: &[NormalizedEntry], reference: &Reference, report: &mut Report) {
    for entry in entries.iter().filter(|e| !reference.contains(&e.key)) {
        report.push(Finding {
            kind: FindingKind::Unexpected,
            severity: Severity::Warning,
            key: Some(entry.key.clone()),
            lines: vec![entry.line],
            message: format!("Entry '{}' is not in the reference list", entry.display_key),
        });
    }
}

/// Indices of one longest strictly increasing subsequence
///
/// Patience sorting with predecessor links, O(n log n).
fn longest_increasing(values: &[usize]) -> HashSet<usize> {
    let mut tails: Vec<usize> = Vec::new();
    let mut prev: Vec<Option<usize>> = vec![None; values.len()];

    for (idx, value) in values.iter().enumerate() {
        let slot = tails.partition_point(|&t| values[t] < *value);
        if slot > 0 {
            prev[idx] = Some(tails[slot - 1]);
        }
        if slot == tails.len() {
            tails.push(idx);
        } else {
            tails[slot] = idx;
        }
    }

    let mut kept = HashSet::new();
    let mut cursor = tails.last().copied();
    while let Some(idx) = cursor {
        kept.insert(idx);
        cursor = prev[idx];
    }
    kept
}

fn join_lines(lines: &[usize]) -> String {
    lines
        .iter()
        .map(|l| l.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
