//! Checklist library management.
//!
//! The library is a lists directory with one folder per aircraft, each holding
//! `.txt` checklists. File names are numbered (`01_Cold_and_Dark.txt`,
//! `02_Before_Start.txt`, ...) and their sorted order is the flying sequence.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{ListError, Result};

const CHECKLIST_EXTENSION: &str = "txt";

static LEADING_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)([A-Za-z])").expect("leading number pattern is valid"));

/// One checklist file of an aircraft
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecklistFile {
    pub file_name: String,
    pub display_name: String,
    pub path: PathBuf,
}

/// An aircraft folder and its checklists in sequence order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aircraft {
    pub name: String,
    pub path: PathBuf,
    pub checklists: Vec<ChecklistFile>,
}

impl Aircraft {
    pub fn checklist(&self, file_name: &str) -> Option<&ChecklistFile> {
        self.checklists.iter().find(|c| c.file_name == file_name)
    }

    pub fn position(&self, file_name: &str) -> Option<usize> {
        self.checklists.iter().position(|c| c.file_name == file_name)
    }
}

/// Scanned checklist library
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    pub root: PathBuf,
    pub aircraft: Vec<Aircraft>,
}

impl Catalog {
    /// Scan a lists directory
    ///
    /// A missing directory yields an empty catalog so a fresh install works.
    pub fn scan(root: &Path) -> Result<Self> {
        if !root.exists() {
            log::info!("Lists directory {} does not exist yet", root.display());
            return Ok(Self {
                root: root.to_path_buf(),
                aircraft: Vec::new(),
            });
        }

        let mut aircraft = Vec::new();
        for entry in fs::read_dir(root).map_err(|e| ListError::read(root, e))? {
            let entry = entry.map_err(|e| ListError::read(root, e))?;
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }

            let name = entry.file_name().to_string_lossy().into_owned();
            let checklists = match scan_checklists(&path) {
                Ok(checklists) => checklists,
                Err(e) => {
                    log::warn!("Skipping aircraft folder {}: {}", path.display(), e);
                    continue;
                }
            };
            aircraft.push(Aircraft {
                name,
                path,
                checklists,
            });
        }
        aircraft.sort_by(|a, b| a.name.cmp(&b.name));

        log::info!(
            "Found {} aircraft in {}",
            aircraft.len(),
            root.display()
        );

        Ok(Self {
            root: root.to_path_buf(),
            aircraft,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.aircraft.is_empty()
    }

    /// Look up an aircraft by folder name, ignoring case
    pub fn aircraft(&self, name: &str) -> Option<&Aircraft> {
        self.aircraft
            .iter()
            .find(|a| a.name == name)
            .or_else(|| self.aircraft.iter().find(|a| a.name.eq_ignore_ascii_case(name)))
    }

    /// The checklist that follows `file_name` in the aircraft's sequence
    pub fn next_checklist(&self, aircraft: &str, file_name: &str) -> Option<&ChecklistFile> {
        let aircraft = self.aircraft(aircraft)?;
        let position = aircraft.position(file_name)?;
        aircraft.checklists.get(position + 1)
    }

    /// Every checklist file in the library, in display order
    pub fn checklist_paths(&self) -> Vec<PathBuf> {
        self.aircraft
            .iter()
            .flat_map(|a| a.checklists.iter().map(|c| c.path.clone()))
            .collect()
    }
}

fn scan_checklists(dir: &Path) -> Result<Vec<ChecklistFile>> {
    let mut checklists = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| ListError::read(dir, e))? {
        let path = entry.map_err(|e| ListError::read(dir, e))?.path();
        if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some(CHECKLIST_EXTENSION)
        {
            continue;
        }

        let Some(file_name) = path.file_name().and_then(|s| s.to_str()) else {
            continue;
        };
        checklists.push(ChecklistFile {
            file_name: file_name.to_string(),
            display_name: display_name(file_name),
            path: path.clone(),
        });
    }
    checklists.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    Ok(checklists)
}

/// Human readable name of a checklist file
///
/// `01Cold_and_Dark.txt` becomes `01 Cold and Dark`.
pub fn display_name(file_name: &str) -> String {
    let base = file_name
        .strip_suffix(".txt")
        .unwrap_or(file_name)
        .replace('_', " ");

    LEADING_NUMBER.replace(&base, "$1 $2").into_owned()
}

/// Every `.txt` file below `dir`, depth first, sorted by path
pub fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut subdirs = Vec::new();

    for entry in fs::read_dir(dir).map_err(|e| ListError::read(dir, e))? {
        let path = entry.map_err(|e| ListError::read(dir, e))?.path();
        if path.is_dir() {
            subdirs.push(path);
        } else if path.extension().and_then(|s| s.to_str()) == Some(CHECKLIST_EXTENSION) {
            files.push(path);
        }
    }

    files.sort();
    subdirs.sort();
    for subdir in subdirs {
        files.extend(list_files(&subdir)?);
    }
    Ok(files)
}

/// Read the items of a checklist: every non-blank line, trimmed
pub fn load_items(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path).map_err(|e| ListError::read(path, e))?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Default library location: `<local data dir>/FLTCHKLST/Lists`
pub fn default_lists_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|dir| dir.join("FLTCHKLST").join("Lists"))
}
