//! The interactive loop.
//!
//! Runs as a small state machine. Every pass through [`State::MainMenu`]
//! re-reads the directory, so files changed behind our back show up on the
//! next render. Launching is a terminal state: the loop returns the chosen
//! configuration and never spawns the target program itself.

use std::path::PathBuf;

use tracing::{debug, warn};

use crate::edit::EditorLauncher;
use crate::error::{Result, SwitchError};
use crate::model::{Choice, Configuration, Outcome, Template};
use crate::store;
use crate::ui::{Entry, Notice, Prompter};

#[derive(Debug, Clone, Eq, PartialEq)]
enum State {
    MainMenu,
    CreateFlow,
    EditFlow,
    DeleteFlow,
    Launching(Configuration),
    Exited,
}

pub struct Menu<'a, P: Prompter, E: EditorLauncher> {
    dir: PathBuf,
    prompter: &'a mut P,
    editors: &'a E,
}

impl<'a, P: Prompter, E: EditorLauncher> Menu<'a, P, E> {
    pub fn new(dir: PathBuf, prompter: &'a mut P, editors: &'a E) -> Self {
        Self { dir, prompter, editors }
    }

    /// Drives the loop until the user launches, exits or backs out.
    pub fn run(&mut self) -> Result<Outcome> {
        match self.drive() {
            Ok(outcome) => Ok(outcome),
            Err(SwitchError::Cancelled) => Ok(Outcome::Cancelled),
            Err(e) => Err(e),
        }
    }

    fn drive(&mut self) -> Result<Outcome> {
        let mut state = State::MainMenu;
        loop {
            debug!(?state, "menu state");
            state = match state {
                State::MainMenu => self.main_menu()?,
                State::CreateFlow => self.create_flow()?,
                State::EditFlow => self.edit_flow()?,
                State::DeleteFlow => self.delete_flow()?,
                State::Launching(config) => return Ok(Outcome::Launch(config)),
                State::Exited => return Ok(Outcome::Exit),
            };
        }
    }

    fn main_menu(&mut self) -> Result<State> {
        let configs = store::list_configurations(&self.dir);

        let choices: Vec<Choice> = if configs.is_empty() {
            self.prompter.report(
                Notice::Info,
                &format!("No configurations found in {}", self.dir.display()),
            );
            vec![Choice::Create, Choice::Exit]
        } else {
            configs
                .into_iter()
                .map(Choice::Launch)
                .chain([Choice::Create, Choice::Edit, Choice::Delete, Choice::Exit])
                .collect()
        };

        let entries: Vec<Entry> = choices.iter().map(choice_entry).collect();
        let index = self.prompter.select("Select a configuration:", &entries)?;

        let len = choices.len();
        Ok(match choices.into_iter().nth(index).ok_or_else(|| out_of_range(index, len))? {
            Choice::Launch(config) => State::Launching(config),
            Choice::Create => State::CreateFlow,
            Choice::Edit => State::EditFlow,
            Choice::Delete => State::DeleteFlow,
            Choice::Exit => State::Exited,
        })
    }

    fn create_flow(&mut self) -> Result<State> {
        let name = loop {
            let name = self.prompter.input("Name for the new configuration:")?;
            match store::validate_name(&self.dir, &name) {
                Ok(()) => break name,
                Err(e) => self.prompter.report(Notice::Error, &e.to_string()),
            }
        };

        let existing = store::list_configurations(&self.dir);
        let template = if existing.is_empty() {
            Template::Empty
        } else {
            let mut entries = vec![Entry::new("Empty ({})")];
            entries.extend(existing.iter().map(|c| Entry::new(format!("Copy from {}", c.name))));
            match self.prompter.select("Start from:", &entries)? {
                0 => Template::Empty,
                index => existing
                    .get(index - 1)
                    .map(|source| Template::CopyFrom(source.clone()))
                    .ok_or_else(|| out_of_range(index, entries.len()))?,
            }
        };

        match store::create_configuration(&self.dir, &name, &template) {
            Ok(config) => self.prompter.report(
                Notice::Success,
                &format!("Created '{}' at {}", config.name, config.path.display()),
            ),
            Err(e @ (SwitchError::Validation(_) | SwitchError::Io { .. })) => {
                warn!(error = %e, "create failed");
                self.prompter.report(Notice::Error, &e.to_string());
            }
            Err(e) => return Err(e),
        }
        Ok(State::MainMenu)
    }

    fn edit_flow(&mut self) -> Result<State> {
        let configs = store::list_configurations(&self.dir);
        let Some(config) = self.pick_configuration("Edit which configuration?", &configs)? else {
            self.prompter.report(Notice::Info, "No configurations to edit.");
            return Ok(State::MainMenu);
        };

        let editors = self.editors.available();
        if editors.is_empty() {
            self.prompter.report(Notice::Error, "No supported editor found.");
            return Ok(State::MainMenu);
        }
        let entries: Vec<Entry> = editors.iter().map(|e| Entry::new(e.label.clone())).collect();
        let index = self.prompter.select("Open with:", &entries)?;
        let editor = editors.get(index).ok_or_else(|| out_of_range(index, editors.len()))?;

        if let Err(e) = self.editors.open(editor, &config.path) {
            warn!(error = %e, "editor failed");
            self.prompter.report(Notice::Error, &e.to_string());
        }
        Ok(State::MainMenu)
    }

    fn delete_flow(&mut self) -> Result<State> {
        let deletable: Vec<Configuration> = store::list_configurations(&self.dir)
            .into_iter()
            .filter(|c| !c.is_default())
            .collect();
        let Some(config) = self.pick_configuration("Delete which configuration?", &deletable)? else {
            self.prompter.report(Notice::Info, "No configurations can be deleted.");
            return Ok(State::MainMenu);
        };

        let sure = self
            .prompter
            .confirm(&format!("Delete '{}' ({})?", config.name, config.path.display()), false)?;
        if !sure {
            return Ok(State::MainMenu);
        }

        match store::delete_configuration(&config) {
            Ok(()) => self.prompter.report(Notice::Success, &format!("Deleted '{}'", config.name)),
            Err(e) => {
                warn!(error = %e, "delete failed");
                self.prompter.report(Notice::Error, &e.to_string());
            }
        }
        Ok(State::MainMenu)
    }

    fn pick_configuration(&mut self, message: &str, configs: &[Configuration]) -> Result<Option<Configuration>> {
        if configs.is_empty() {
            return Ok(None);
        }
        let entries: Vec<Entry> = configs.iter().map(config_entry).collect();
        let index = self.prompter.select(message, &entries)?;
        configs
            .get(index)
            .cloned()
            .map(Some)
            .ok_or_else(|| out_of_range(index, configs.len()))
    }
}

fn out_of_range(index: usize, len: usize) -> SwitchError {
    SwitchError::Prompt(format!("selection {index} is out of range for {len} entries"))
}

fn config_entry(config: &Configuration) -> Entry {
    Entry::with_detail(config.name.clone(), config.path.display().to_string())
}

fn choice_entry(choice: &Choice) -> Entry {
    match choice {
        Choice::Launch(config) => config_entry(config),
        other => Entry::new(other.label()),
    }
}
