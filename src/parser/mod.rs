//! Checklist Parser
//!
//! Line-oriented loading and normalization of checklist and flight-plan lists.
//! Loading turns a source into [`RawEntry`] values, normalization turns those
//! into comparable [`NormalizedEntry`] values.

pub mod entry;
pub mod loader;

pub use entry::{normalize, normalize_key, NormalizedEntry, ParseError, ParseErrorReason};
pub use loader::{open_path, RawEntries, RawEntry};

use crate::error::{ListError, Result};

/// Field grammar of a list file
#[derive(Debug, Clone, PartialEq)]
pub struct ListFormat {
    /// Field separator
    pub delimiter: char,
    /// Index of the key field among the split fields
    pub key_field: usize,
    /// Exact number of fields every entry must have
    pub expected_fields: Option<usize>,
    /// Lines starting with this marker are skipped
    pub comment_prefix: Option<String>,
    /// Skip the first entry line as a header row
    pub has_header: bool,
}

impl Default for ListFormat {
    fn default() -> Self {
        Self {
            delimiter: ',',
            key_field: 0,
            expected_fields: None,
            comment_prefix: Some("#".to_string()),
            has_header: false,
        }
    }
}

impl ListFormat {
    /// Check that the format can describe at least one valid entry
    pub fn validate(&self) -> Result<()> {
        if self.delimiter == '\n' || self.delimiter == '\r' {
            return Err(ListError::Config(
                "delimiter cannot be a line break".to_string(),
            ));
        }

        if let Some(expected) = self.expected_fields {
            if expected == 0 {
                return Err(ListError::Config(
                    "expected field count must be at least 1".to_string(),
                ));
            }
            if self.key_field >= expected {
                return Err(ListError::Config(format!(
                    "key field {} is outside the expected {} field(s)",
                    self.key_field, expected
                )));
            }
        }

        if self.comment_prefix.as_deref() == Some("") {
            return Err(ListError::Config(
                "comment prefix cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

/// Load and normalize every entry of an in-memory list
///
/// Entries that fail normalization are returned as `Err` in their original
/// position. An invalid format or a loader error fails the whole call.
pub fn parse_text(
    text: &str,
    format: &ListFormat,
) -> Result<Vec<std::result::Result<NormalizedEntry, ParseError>>> {
    format.validate()?;
    loader::from_reader(text.as_bytes(), "<memory>", format)
        .map(|raw| raw.map(|raw| normalize(&raw, format)))
        .collect()
}
