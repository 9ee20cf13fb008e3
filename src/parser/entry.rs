//! Entry Normalizer
//!
//! Splits raw lines into fields and produces the canonical key used for all
//! comparisons. Pure functions only.

use std::fmt;

use crate::parser::loader::RawEntry;
use crate::parser::ListFormat;

/// Canonical, comparable form of a list entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedEntry {
    /// Line number of the originating [`RawEntry`]
    pub line: usize,
    /// Comparison key (whitespace collapsed, upper case)
    pub key: String,
    /// Key as written, trimmed
    pub display_key: String,
    /// Remaining fields, trimmed, in input order
    pub fields: Vec<String>,
}

/// Why an entry could not be normalized
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorReason {
    FieldCount { expected: usize, found: usize },
    MissingKeyField { index: usize, found: usize },
    EmptyKey,
}

impl fmt::Display for ParseErrorReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FieldCount { expected, found } => {
                write!(f, "expected {expected} field(s), found {found}")
            }
            Self::MissingKeyField { index, found } => {
                write!(f, "key field {} missing, only {found} field(s)", index + 1)
            }
            Self::EmptyKey => write!(f, "key field is empty"),
        }
    }
}

/// An entry that does not match the expected shape
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("line {line}: {reason}")]
pub struct ParseError {
    pub line: usize,
    pub text: String,
    pub reason: ParseErrorReason,
}

/// Normalize a key for comparison
///
/// Trims, collapses internal whitespace runs to one space and upper-cases, so
/// `" alpha  one"` and `"ALPHA ONE"` compare equal.
pub fn normalize_key(key: &str) -> String {
    key.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

/// Normalize a raw entry according to the list format
pub fn normalize(raw: &RawEntry, format: &ListFormat) -> Result<NormalizedEntry, ParseError> {
    let parts: Vec<&str> = raw.text.split(format.delimiter).collect();

    let fail = |reason| ParseError {
        line: raw.line,
        text: raw.text.clone(),
        reason,
    };

    if let Some(expected) = format.expected_fields {
        if parts.len() != expected {
            return Err(fail(ParseErrorReason::FieldCount {
                expected,
                found: parts.len(),
            }));
        }
    }

    let Some(key_part) = parts.get(format.key_field) else {
        return Err(fail(ParseErrorReason::MissingKeyField {
            index: format.key_field,
            found: parts.len(),
        }));
    };

    let key = normalize_key(key_part);
    if key.is_empty() {
        return Err(fail(ParseErrorReason::EmptyKey));
    }

    let fields = parts
        .iter()
        .enumerate()
        .filter(|(idx, _)| *idx != format.key_field)
        .map(|(_, field)| field.trim().to_string())
        .collect();

    Ok(NormalizedEntry {
        line: raw.line,
        key,
        display_key: key_part.trim().to_string(),
        fields,
    })
}
