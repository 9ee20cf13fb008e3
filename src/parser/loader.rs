//! List Loader
//!
//! Streams a list source line by line into [`RawEntry`] values. Blank and
//! comment lines are dropped but still counted, so line numbers always match
//! what the user sees in an editor.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::error::{ListError, Result};
use crate::parser::ListFormat;

/// One unparsed line of a list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry {
    /// 1-based physical line number
    pub line: usize,
    /// Line text without the line terminator
    pub text: String,
}

/// Lazy iterator over the entry lines of a source
pub struct RawEntries<R: BufRead> {
    reader: R,
    source: PathBuf,
    comment_prefix: Option<String>,
    skip_header: bool,
    line_number: usize,
    buffer: Vec<u8>,
    done: bool,
}

impl<R: BufRead> RawEntries<R> {
    pub fn new(reader: R, source: impl Into<PathBuf>, format: &ListFormat) -> Self {
        Self {
            reader,
            source: source.into(),
            comment_prefix: format.comment_prefix.clone(),
            skip_header: format.has_header,
            line_number: 0,
            buffer: Vec::new(),
            done: false,
        }
    }

    /// Number of physical lines consumed so far
    pub fn lines_read(&self) -> usize {
        self.line_number
    }
}

impl<R: BufRead> Iterator for RawEntries<R> {
    type Item = Result<RawEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            self.buffer.clear();
            match self.reader.read_until(b'\n', &mut self.buffer) {
                Ok(0) => {
                    self.done = true;
                    return None;
                }
                Ok(_) => {
                    self.line_number += 1;

                    let Ok(text) = std::str::from_utf8(&self.buffer) else {
                        self.done = true;
                        return Some(Err(ListError::Decode {
                            line: self.line_number,
                        }));
                    };

                    let mut text = text.trim_end_matches('\n').trim_end_matches('\r');
                    if self.line_number == 1 {
                        text = text.strip_prefix('\u{feff}').unwrap_or(text);
                    }

                    if is_skipped(text, self.comment_prefix.as_deref()) {
                        continue;
                    }

                    if self.skip_header {
                        self.skip_header = false;
                        continue;
                    }

                    return Some(Ok(RawEntry {
                        line: self.line_number,
                        text: text.to_string(),
                    }));
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(ListError::read(self.source.clone(), e)));
                }
            }
        }
    }
}

/// Blank lines and comment lines carry no entry
fn is_skipped(text: &str, comment_prefix: Option<&str>) -> bool {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return true;
    }

    comment_prefix.is_some_and(|prefix| trimmed.starts_with(prefix))
}

/// Stream entries from any buffered reader
pub fn from_reader<R: BufRead>(
    reader: R,
    source: impl Into<PathBuf>,
    format: &ListFormat,
) -> RawEntries<R> {
    RawEntries::new(reader, source, format)
}

/// Open a list file for streaming
pub fn open_path(path: &Path, format: &ListFormat) -> Result<RawEntries<BufReader<File>>> {
    let file = File::open(path).map_err(|e| ListError::read(path, e))?;
    log::debug!("Opened list source {}", path.display());
    Ok(RawEntries::new(BufReader::new(file), path, format))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(text: &[u8], format: &ListFormat) -> Vec<RawEntry> {
        from_reader(text, "<test>", format)
            .collect::<Result<Vec<_>>>()
            .expect("readable input")
    }

    #[test]
    fn test_blank_and_comment_lines_are_counted() {
        let entries = collect(b"ALPHA\n\n  # note\nBRAVO\n", &ListFormat::default());

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].line, 1);
        assert_eq!(entries[1].line, 4);
        assert_eq!(entries[1].text, "BRAVO");
    }

    #[test]
    fn test_crlf_and_bom_are_stripped() {
        let entries = collect(b"\xEF\xBB\xBFALPHA,1\r\nBRAVO,2\r\n", &ListFormat::default());

        assert_eq!(entries[0].text, "ALPHA,1");
        assert_eq!(entries[1].text, "BRAVO,2");
    }

    #[test]
    fn test_missing_newline_at_eof() {
        let entries = collect(b"ALPHA\nBRAVO", &ListFormat::default());
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].line, 2);
    }

    #[test]
    fn test_header_row_skipped() {
        let format = ListFormat {
            has_header: true,
            ..ListFormat::default()
        };
        let entries = collect(b"# comment\nname,alt\nALPHA,100\n", &format);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].line, 3);
    }

    #[test]
    fn test_comments_disabled() {
        let format = ListFormat {
            comment_prefix: None,
            ..ListFormat::default()
        };
        let entries = collect(b"#1 Beacon - ON\n", &format);
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_invalid_utf8_is_decode_error() {
        let input = &b"ALPHA\n\xFF\xFE\nBRAVO\n"[..];
        let mut entries = from_reader(input, "<test>", &ListFormat::default());

        assert!(entries.next().unwrap().is_ok());
        assert!(matches!(
            entries.next(),
            Some(Err(ListError::Decode { line: 2 }))
        ));
        assert!(entries.next().is_none());
    }

    #[test]
    fn test_open_missing_file() {
        let result = open_path(Path::new("/nonexistent/list.txt"), &ListFormat::default());
        assert!(matches!(result, Err(ListError::Read { .. })));
    }
}
