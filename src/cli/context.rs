//! Shell state shared by every command: the tracker, the selected date, and
//! the last summary shown to the user.

use std::io;

use rustyline::error::ReadlineError;
use strsim::levenshtein;
use thiserror::Error;

use crate::{
    config::{Config, ConfigError, ConfigManager},
    errors::IntakeError,
    ledger::DateKey,
    storage::json_backend::JsonFileStore,
    tracking::{DaySummary, IntakeTracker, WeeklyReport},
    utils::paths::PathResolver,
};

use super::{commands, io as cli_io, output};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

/// Fatal shell errors; anything here ends the session.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] IntakeError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Readline error: {0}")]
    Readline(#[from] ReadlineError),
    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Recoverable command failures, reported and followed by a fresh prompt.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("Unknown command `{0}`")]
    UnknownCommand(String),
    #[error(transparent)]
    Intake(#[from] IntakeError),
}

pub(crate) type CommandResult = Result<LoopControl, CommandError>;

pub struct ShellContext {
    pub(crate) mode: CliMode,
    pub(crate) running: bool,
    pub(crate) tracker: IntakeTracker<JsonFileStore>,
    pub(crate) config: Config,
    pub(crate) selected: DateKey,
    displayed: Option<DaySummary>,
    config_manager: ConfigManager,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let config_manager = ConfigManager::new()?;
        let config = config_manager.load()?;
        let store = JsonFileStore::open(PathResolver::ledger_file_in(config_manager.base_dir()))?;
        let tracker = IntakeTracker::new(store, config.daily_goal_ml);
        let selected = tracker.today();
        tracing::debug!(
            base = %config_manager.base_dir().display(),
            goal = config.daily_goal_ml.milliliters(),
            "shell context ready"
        );
        Ok(Self {
            mode,
            running: true,
            tracker,
            config,
            selected,
            displayed: None,
            config_manager,
        })
    }

    pub(crate) fn prompt(&self) -> String {
        format!("hydration [{}]> ", self.selected)
    }

    pub(crate) fn config_manager(&self) -> &ConfigManager {
        &self.config_manager
    }

    /// Selects `date` and shows its total along with the trailing week.
    pub(crate) fn select_date(&mut self, date: DateKey) -> Result<(), CommandError> {
        self.selected = date;
        let summary = self.tracker.on_date_selected(date);
        self.show_summary(&summary);
        self.show_weekly(date)
    }

    pub(crate) fn show_summary(&mut self, summary: &DaySummary) {
        output::section(format!("{}", summary.date));
        output::line(summary.progress_line());
        output::line(format!("Status: {}", summary.status));
        if summary.remaining() > 0 {
            output::line(format!("Remaining: {} ml", summary.remaining()));
        }
        self.displayed = Some(*summary);
    }

    pub(crate) fn show_weekly(&self, anchor: DateKey) -> Result<(), CommandError> {
        let report = self.tracker.on_weekly_report_requested(anchor)?;
        print_weekly(&report);
        Ok(())
    }

    pub(crate) fn dispatch(&mut self, command: &str, args: &[&str]) -> CommandResult {
        match commands::find(command) {
            Some(entry) => (entry.handler)(self, args),
            None => Err(CommandError::UnknownCommand(command.to_string())),
        }
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        commands::names().collect()
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let mut suggestions: Vec<_> = commands::names()
            .map(|key| (levenshtein(key, input), key))
            .collect();
        suggestions.sort_by_key(|(distance, _)| *distance);

        if let Some((distance, best)) = suggestions.first() {
            if *distance <= 3 {
                cli_io::print_info(format!("Suggestion: `{}`?", best));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action("Exit shell?")
    }

    pub(crate) fn report_error(&self, err: CommandError) {
        match err {
            CommandError::InvalidArguments(message) => {
                cli_io::print_error(message);
                output::hint("Use `help` for usage details.");
            }
            CommandError::UnknownCommand(command) => self.suggest_command(&command),
            CommandError::Intake(IntakeError::InvalidAmount(message)) => {
                cli_io::print_warning(format!("Please enter a positive number! ({message})"));
            }
            CommandError::Intake(IntakeError::InvalidDate(message)) => {
                cli_io::print_error(message);
                output::hint("Dates use the YYYY-MM-DD form, e.g. `date 2024-06-01`.");
            }
            CommandError::Intake(other) => {
                cli_io::print_error(format!("Could not update the ledger: {other}"));
                if let Some(summary) = self.displayed {
                    cli_io::print_info(format!(
                        "Last known total for {}: {} ml",
                        summary.date, summary.total
                    ));
                }
            }
        }
    }
}

pub(crate) fn print_weekly(report: &WeeklyReport) {
    output::line(format!(
        "Consumed this week ({}): {} ml",
        report.window, report.total
    ));
}
