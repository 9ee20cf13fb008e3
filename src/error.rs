//! Error types for loading checklist sources.
//!
//! Only source-level problems are errors. Problems with individual entries are
//! carried as data ([`crate::parser::ParseError`]) and end up as findings.

use std::io;
use std::path::PathBuf;

/// Fatal errors that abort a check run
#[derive(Debug, thiserror::Error)]
pub enum ListError {
    /// The source could not be opened or read
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The source is not valid UTF-8 text
    #[error("line {line}: input is not valid UTF-8")]
    Decode { line: usize },

    /// Invalid list format or rule configuration
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("no aircraft named '{0}' in the checklist library")]
    UnknownAircraft(String),

    #[error("no checklist named '{0}'")]
    UnknownChecklist(String),
}

impl ListError {
    /// Build a read error for a path
    pub fn read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = ListError> = std::result::Result<T, E>;
