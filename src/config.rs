//! Configuration management for the flight checklist checker.
//!
//! Handles:
//! - Command-line argument parsing
//! - Project config file (`.fltchk.toml`) loading
//! - Merging both into effective check settings (CLI > project > default)

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;

use crate::catalog;
use crate::parser::ListFormat;
use crate::report::OutputFormat;
use crate::validation::{Reference, Rules};

/// Project config file looked up in the working directory
pub const PROJECT_CONFIG_FILE: &str = ".fltchk.toml";

/// Command-line arguments for the checklist checker
#[derive(Debug, Parser)]
#[command(name = "fltchk")]
#[command(about = "Check and fly flight checklists")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Checklist library directory
    #[arg(long, global = true, help = "Directory holding one folder per aircraft")]
    pub lists_dir: Option<PathBuf>,

    /// Project config file
    #[arg(long, global = true, help = "Project config file (default: ./.fltchk.toml)")]
    pub config: Option<PathBuf>,

    /// Log level
    #[arg(
        long,
        global = true,
        default_value = "info",
        help = "Log level (trace, debug, info, warn, error)"
    )]
    pub log_level: String,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Validate list files and report duplicate, missing and malformed entries
    Check(CheckArgs),
    /// Show the aircraft and checklists of the library
    List,
    /// Walk through an aircraft's checklists item by item
    Fly(FlyArgs),
}

#[derive(Debug, Default, clap::Args)]
pub struct CheckArgs {
    /// List files or directories; the whole library when omitted
    pub paths: Vec<PathBuf>,

    #[arg(long, help = "Field separator (default: ',')")]
    pub delimiter: Option<char>,

    #[arg(long, help = "0-based index of the key field (default: 0)")]
    pub key_field: Option<usize>,

    #[arg(long = "fields", help = "Exact number of fields every entry must have")]
    pub expected_fields: Option<usize>,

    #[arg(long, help = "Skip the first entry line as a header row")]
    pub header: bool,

    #[arg(long, conflicts_with = "no_comments", help = "Comment marker (default: '#')")]
    pub comment: Option<String>,

    #[arg(long, help = "Treat every non-blank line as an entry")]
    pub no_comments: bool,

    #[arg(long, help = "Reference list of required keys")]
    pub reference: Option<PathBuf>,

    #[arg(long, help = "Require entries to follow reference order")]
    pub order: bool,

    #[arg(long, help = "Warn about entries missing from the reference")]
    pub reject_unknown: bool,

    #[arg(long, help = "Malformed entries fail the run")]
    pub strict: bool,

    #[arg(long, value_enum, help = "Report format")]
    pub format: Option<OutputFormat>,

    #[arg(long, help = "Re-run whenever a checked file changes")]
    pub watch: bool,
}

#[derive(Debug, clap::Args)]
pub struct FlyArgs {
    /// Aircraft folder name
    pub aircraft: String,

    #[arg(long, help = "Checklist file to start from")]
    pub from: Option<String>,
}

/// `[format]` table of the project config
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FormatSection {
    pub delimiter: Option<char>,
    pub key_field: Option<usize>,
    pub expected_fields: Option<usize>,
    /// An empty string disables comments
    pub comment_prefix: Option<String>,
    pub has_header: Option<bool>,
}

/// `[rules]` table of the project config
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RulesSection {
    pub check_order: Option<bool>,
    pub reject_unknown: Option<bool>,
    pub strict: Option<bool>,
}

/// Project configuration file contents
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    pub lists_dir: Option<PathBuf>,
    pub reference: Option<PathBuf>,
    pub output: Option<OutputFormat>,
    pub format: FormatSection,
    pub rules: RulesSection,
}

impl ProjectConfig {
    /// Load a project config; relative paths resolve against its directory
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let mut config: ProjectConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config TOML: {}", path.display()))?;

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        config.lists_dir = config.lists_dir.map(|p| base.join(p));
        config.reference = config.reference.map(|p| base.join(p));

        log::debug!("Loaded project config {}", path.display());
        Ok(config)
    }
}

/// Effective settings of a `check` run
#[derive(Debug, Clone)]
pub struct CheckSettings {
    pub paths: Vec<PathBuf>,
    pub format: ListFormat,
    pub reference: Option<PathBuf>,
    pub check_order: bool,
    pub reject_unknown: bool,
    pub strict: bool,
    pub output: OutputFormat,
    pub watch: bool,
}

impl CheckSettings {
    /// Engine rules for these settings
    pub fn rules(&self, reference: Option<Reference>) -> Rules {
        Rules {
            reference,
            check_order: self.check_order,
            reject_unknown: self.reject_unknown,
            strict: self.strict,
        }
    }
}

/// Combined configuration from all sources
#[derive(Debug, Clone)]
pub struct Config {
    /// Checklist library directory
    pub lists_dir: Option<PathBuf>,
    /// Project config that was loaded, if any
    pub project_config_path: Option<PathBuf>,
    pub project: ProjectConfig,
}

impl Config {
    /// Create configuration from parsed command-line arguments
    pub fn from_args(args: &Args) -> Result<Self> {
        let project_config_path = match &args.config {
            Some(path) => Some(path.clone()),
            None => {
                let candidate = std::env::current_dir()?.join(PROJECT_CONFIG_FILE);
                candidate.exists().then_some(candidate)
            }
        };

        let project = match &project_config_path {
            Some(path) => ProjectConfig::load(path)?,
            None => ProjectConfig::default(),
        };

        let lists_dir = args
            .lists_dir
            .clone()
            .or_else(|| project.lists_dir.clone())
            .or_else(catalog::default_lists_dir);

        Ok(Config {
            lists_dir,
            project_config_path,
            project,
        })
    }

    pub fn has_project_config(&self) -> bool {
        self.project_config_path.is_some()
    }

    /// Merge `check` arguments over the project config
    pub fn check_settings(&self, args: &CheckArgs) -> Result<CheckSettings> {
        let section = &self.project.format;
        let defaults = ListFormat::default();

        let comment_prefix = if args.no_comments {
            None
        } else if let Some(prefix) = &args.comment {
            Some(prefix.clone())
        } else {
            match &section.comment_prefix {
                Some(prefix) if prefix.is_empty() => None,
                Some(prefix) => Some(prefix.clone()),
                None => defaults.comment_prefix,
            }
        };

        let format = ListFormat {
            delimiter: args
                .delimiter
                .or(section.delimiter)
                .unwrap_or(defaults.delimiter),
            key_field: args
                .key_field
                .or(section.key_field)
                .unwrap_or(defaults.key_field),
            expected_fields: args.expected_fields.or(section.expected_fields),
            comment_prefix,
            has_header: args.header || section.has_header.unwrap_or(defaults.has_header),
        };
        format.validate()?;

        let rules = &self.project.rules;
        Ok(CheckSettings {
            paths: args.paths.clone(),
            format,
            reference: args
                .reference
                .clone()
                .or_else(|| self.project.reference.clone()),
            check_order: args.order || rules.check_order.unwrap_or(false),
            reject_unknown: args.reject_unknown || rules.reject_unknown.unwrap_or(false),
            strict: args.strict || rules.strict.unwrap_or(false),
            output: args.format.or(self.project.output).unwrap_or_default(),
            watch: args.watch,
        })
    }
}
