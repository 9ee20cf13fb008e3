//! Check pipeline: loader → normalizer → engine.

use std::io::BufRead;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::parser::{self, loader, ListFormat, RawEntries};
use crate::validation::{reconcile, Reference, Report, Rules};

/// Check a list read from any buffered source
pub fn check_reader<R: BufRead>(
    reader: R,
    source: impl Into<PathBuf>,
    format: &ListFormat,
    rules: &Rules,
) -> Result<Report> {
    format.validate()?;
    run(loader::from_reader(reader, source, format), format, rules)
}

/// Check a list file
pub fn check_path(path: &Path, format: &ListFormat, rules: &Rules) -> Result<Report> {
    format.validate()?;
    run(parser::open_path(path, format)?, format, rules)
}

fn run<R: BufRead>(raw: RawEntries<R>, format: &ListFormat, rules: &Rules) -> Result<Report> {
    // Read errors are fatal, so the whole source is consumed before reconciling
    let mut normalized = Vec::new();
    for entry in raw {
        normalized.push(parser::normalize(&entry?, format));
    }

    log::debug!("Read {} entries", normalized.len());
    Ok(reconcile(normalized, rules))
}

/// Load a reference list using the same format as the checked lists
///
/// Reference lines that fail normalization are skipped with a warning.
pub fn load_reference(path: &Path, format: &ListFormat) -> Result<Reference> {
    format.validate()?;

    let mut reference = Reference::new();
    for raw in parser::open_path(path, format)? {
        match parser::normalize(&raw?, format) {
            Ok(entry) => {
                reference.insert(&entry.display_key);
            }
            Err(err) => {
                log::warn!("Skipping reference entry in {}: {}", path.display(), err);
            }
        }
    }

    log::debug!(
        "Loaded {} reference keys from {}",
        reference.len(),
        path.display()
    );
    Ok(reference)
}
