//! Checklist walkthrough state.
//!
//! Tracks which items of each checklist are ticked while an aircraft's
//! sequence is flown. Check marks are kept per checklist, so going back to an
//! earlier list shows it as it was left.

use std::collections::HashMap;
use std::io::{BufRead, Write};

use anyhow::Result;

use crate::catalog::{self, Aircraft, ChecklistFile};
use crate::error::ListError;

/// Checked items out of total items
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

/// Check state of a single checklist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecklistState {
    items: Vec<String>,
    checked: Vec<bool>,
}

impl ChecklistState {
    pub fn new(items: Vec<String>) -> Self {
        let checked = vec![false; items.len()];
        Self { items, checked }
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn is_checked(&self, index: usize) -> bool {
        self.checked.get(index).copied().unwrap_or(false)
    }

    /// Set one item, returning the new progress or `None` for a bad index
    pub fn set(&mut self, index: usize, checked: bool) -> Option<Progress> {
        *self.checked.get_mut(index)? = checked;
        Some(self.progress())
    }

    pub fn toggle(&mut self, index: usize) -> Option<Progress> {
        let current = *self.checked.get(index)?;
        self.set(index, !current)
    }

    /// Tick the first unchecked item
    pub fn check_next(&mut self) -> Option<(usize, Progress)> {
        let index = self.checked.iter().position(|c| !c)?;
        self.set(index, true).map(|progress| (index, progress))
    }

    pub fn uncheck_all(&mut self) {
        self.checked.iter_mut().for_each(|c| *c = false);
    }

    pub fn progress(&self) -> Progress {
        Progress {
            completed: self.checked.iter().filter(|c| **c).count(),
            total: self.items.len(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.checked.iter().all(|c| *c)
    }
}

/// Result of moving on from the current checklist
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// The current checklist still has unchecked items
    Incomplete(Progress),
    /// Moved to the next checklist in the sequence
    Next(ChecklistFile),
    /// The last checklist of the aircraft is done
    SequenceComplete,
}

/// Walkthrough of one aircraft's checklist sequence
#[derive(Debug)]
pub struct Session {
    aircraft: Aircraft,
    current: usize,
    states: HashMap<String, ChecklistState>,
}

impl Session {
    pub fn new(aircraft: Aircraft) -> Self {
        Self {
            aircraft,
            current: 0,
            states: HashMap::new(),
        }
    }

    pub fn aircraft(&self) -> &Aircraft {
        &self.aircraft
    }

    pub fn current_file(&self) -> Option<&ChecklistFile> {
        self.aircraft.checklists.get(self.current)
    }

    /// Jump to a checklist by file name
    pub fn select(&mut self, file_name: &str) -> Result<(), ListError> {
        self.current = self
            .aircraft
            .position(file_name)
            .ok_or_else(|| ListError::UnknownChecklist(file_name.to_string()))?;
        Ok(())
    }

    /// State of the current checklist, loading its items on first use
    pub fn current_state(&mut self) -> Result<&mut ChecklistState, ListError> {
        let file = self
            .aircraft
            .checklists
            .get(self.current)
            .ok_or_else(|| ListError::UnknownChecklist(self.aircraft.name.clone()))?;

        if !self.states.contains_key(&file.file_name) {
            let items = catalog::load_items(&file.path)?;
            log::debug!("Loaded {} items from {}", items.len(), file.path.display());
            self.states
                .insert(file.file_name.clone(), ChecklistState::new(items));
        }

        self.states
            .get_mut(&file.file_name)
            .ok_or_else(|| ListError::UnknownChecklist(file.file_name.clone()))
    }

    /// Move on once the current checklist is complete
    pub fn advance(&mut self) -> Result<Advance, ListError> {
        let state = self.current_state()?;
        if !state.is_complete() {
            return Ok(Advance::Incomplete(state.progress()));
        }
        Ok(self.skip())
    }

    /// Move on regardless of completion
    pub fn skip(&mut self) -> Advance {
        match self.aircraft.checklists.get(self.current + 1) {
            Some(next) => {
                self.current += 1;
                Advance::Next(next.clone())
            }
            None => Advance::SequenceComplete,
        }
    }
}

/// How a terminal walkthrough ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlyOutcome {
    SequenceComplete,
    Quit,
}

const FLY_HELP: &str =
    "Enter: check next item | <n>: toggle item n | u: uncheck all | n: next list | q: quit";

/// Drive a session from line-based input
pub fn fly<R: BufRead, W: Write>(
    session: &mut Session,
    input: R,
    out: &mut W,
) -> Result<FlyOutcome> {
    let aircraft = session.aircraft().name.clone();
    if session.current_file().is_none() {
        writeln!(out, "No checklists found for {aircraft}.")?;
        return Ok(FlyOutcome::SequenceComplete);
    }

    show_checklist(session, out)?;
    let mut lines = input.lines();

    loop {
        if session.current_state()?.is_complete() {
            match session.advance()? {
                Advance::Next(next) => {
                    writeln!(
                        out,
                        "Checklist complete. Loading next list: {}",
                        next.display_name
                    )?;
                    show_checklist(session, out)?;
                    continue;
                }
                Advance::SequenceComplete => {
                    writeln!(out, "Sequence complete for {aircraft}! All checklists finished.")?;
                    return Ok(FlyOutcome::SequenceComplete);
                }
                Advance::Incomplete(_) => {}
            }
        }

        let Some(line) = lines.next() else {
            return Ok(FlyOutcome::Quit);
        };
        let command = line?;

        match command.trim() {
            "" => {
                let state = session.current_state()?;
                if let Some((index, progress)) = state.check_next() {
                    writeln!(out, "[x] {}. {}", index + 1, state.items()[index])?;
                    write_progress(out, progress)?;
                }
            }
            "q" => return Ok(FlyOutcome::Quit),
            "u" => {
                session.current_state()?.uncheck_all();
                let name = current_display_name(session);
                writeln!(out, "All items in '{name}' have been unchecked.")?;
            }
            "n" => match session.skip() {
                Advance::Next(next) => {
                    writeln!(out, "Skipping to next list: {}", next.display_name)?;
                    show_checklist(session, out)?;
                }
                _ => writeln!(out, "This is the last checklist for {aircraft}.")?,
            },
            other => {
                let state = session.current_state()?;
                let toggled = other
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|index| state.toggle(index).map(|progress| (index, progress)));

                match toggled {
                    Some((index, progress)) => {
                        let mark = if state.is_checked(index) { "x" } else { " " };
                        writeln!(out, "[{mark}] {}. {}", index + 1, state.items()[index])?;
                        write_progress(out, progress)?;
                    }
                    None => writeln!(out, "{FLY_HELP}")?,
                }
            }
        }
    }
}

fn current_display_name(session: &Session) -> String {
    session
        .current_file()
        .map(|f| f.display_name.clone())
        .unwrap_or_default()
}

fn show_checklist<W: Write>(session: &mut Session, out: &mut W) -> Result<()> {
    let title = format!("{} - {}", session.aircraft().name, current_display_name(session));
    let state = session.current_state()?;

    writeln!(out, "== {title} ==")?;
    for (index, item) in state.items().iter().enumerate() {
        let mark = if state.is_checked(index) { "x" } else { " " };
        writeln!(out, "[{mark}] {}. {item}", index + 1)?;
    }
    writeln!(out, "{FLY_HELP}")?;
    Ok(())
}

fn write_progress<W: Write>(out: &mut W, progress: Progress) -> Result<()> {
    writeln!(
        out,
        "Progress: {}/{} items checked.",
        progress.completed, progress.total
    )?;
    Ok(())
}
