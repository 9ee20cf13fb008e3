//! Report Formatter
//!
//! Renders a [`Report`] into a sink as plain text or JSON.

use std::io::{self, Write};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::validation::{FindingKind, Report};

/// Output format for reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Render a report in the chosen format
pub fn write_report<W: Write>(
    report: &Report,
    label: &str,
    format: OutputFormat,
    out: &mut W,
) -> io::Result<()> {
    match format {
        OutputFormat::Text => write_text(report, label, out),
        OutputFormat::Json => write_json(report, label, out),
    }
}

/// One line per finding followed by a summary line
pub fn write_text<W: Write>(report: &Report, label: &str, out: &mut W) -> io::Result<()> {
    for finding in &report.findings {
        match finding.first_line() {
            Some(line) => write!(out, "{label}:{line}: ")?,
            None => write!(out, "{label}: ")?,
        }
        writeln!(
            out,
            "{}[{}]: {}",
            finding.severity, finding.kind, finding.message
        )?;
    }

    writeln!(out, "{}", summary_line(report))
}

/// `N duplicates, M missing, K malformed`, plus any other non-zero counts
pub fn summary_line(report: &Report) -> String {
    let summary = &report.summary;
    let mut line = format!(
        "{} duplicates, {} missing, {} malformed",
        summary.count(FindingKind::Duplicate),
        summary.count(FindingKind::Missing),
        summary.count(FindingKind::Malformed)
    );

    if summary.out_of_order > 0 {
        line.push_str(&format!(", {} out of order", summary.out_of_order));
    }
    if summary.unexpected > 0 {
        line.push_str(&format!(", {} unexpected", summary.unexpected));
    }

    line
}

#[derive(Serialize)]
struct JsonReport<'a> {
    source: &'a str,
    #[serde(flatten)]
    report: &'a Report,
}

pub fn write_json<W: Write>(report: &Report, label: &str, out: &mut W) -> io::Result<()> {
    let doc = JsonReport {
        source: label,
        report,
    };
    serde_json::to_writer_pretty(&mut *out, &doc)?;
    writeln!(out)
}
