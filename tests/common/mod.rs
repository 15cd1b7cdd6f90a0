//! Shared test doubles for integration tests
//!
//! `RecordingShell` and `MemoryFs` append to one shared `Journal`, so the
//! interleaving of commands and file writes is observable in a single list.

#![allow(dead_code)] // Not every test file uses every helper

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use vps_provision::{CommandStatus, FileSystem, Interaction, Shell};

/// One observed host effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Command(String),
    Interactive(String),
    Write(PathBuf),
}

/// Ordered record of every host effect in a Run.
pub type Journal = Rc<RefCell<Vec<Event>>>;

pub fn journal() -> Journal {
    Rc::new(RefCell::new(Vec::new()))
}

/// Shell double: records every command, fails the ones it is told to.
pub struct RecordingShell {
    journal: Journal,
    failures: BTreeMap<String, CommandStatus>,
}

impl RecordingShell {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            failures: BTreeMap::new(),
        }
    }

    /// Make `command` exit with `code`.
    pub fn fail_on(mut self, command: &str, code: i32) -> Self {
        self.failures
            .insert(command.to_string(), CommandStatus::exited(code));
        self
    }
}

impl Shell for RecordingShell {
    fn run(&mut self, command: &str, interaction: Interaction) -> io::Result<CommandStatus> {
        let event = match interaction {
            Interaction::None => Event::Command(command.to_string()),
            // Interactive steps are answered immediately
            Interaction::Operator => Event::Interactive(command.to_string()),
        };
        self.journal.borrow_mut().push(event);
        Ok(self
            .failures
            .get(command)
            .copied()
            .unwrap_or(CommandStatus::SUCCESS))
    }
}

/// In-memory filesystem double.
pub struct MemoryFs {
    journal: Journal,
    pub files: BTreeMap<PathBuf, String>,
}

impl MemoryFs {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            files: BTreeMap::new(),
        }
    }

    pub fn read(&self, path: &str) -> Option<&str> {
        self.files.get(Path::new(path)).map(String::as_str)
    }
}

impl FileSystem for MemoryFs {
    fn write_file(&mut self, path: &Path, contents: &str) -> io::Result<()> {
        self.journal
            .borrow_mut()
            .push(Event::Write(path.to_path_buf()));
        self.files.insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }
}

/// Commands (interactive or not) in journal order.
pub fn commands(journal: &Journal) -> Vec<String> {
    journal
        .borrow()
        .iter()
        .filter_map(|event| match event {
            Event::Command(c) | Event::Interactive(c) => Some(c.clone()),
            Event::Write(_) => None,
        })
        .collect()
}
