//! Shell context, command dispatch, and error reporting.

use std::{env, io};

use chrono::{Local, NaiveDate};
use dialoguer::{theme::ColorfulTheme, Confirm};
use strsim::levenshtein;
use thiserror::Error;

use crate::{
    config::{Config, ConfigManager},
    core::{
        services::{GenerationOutcome, GenerationReport},
        LedgerManager,
    },
    currency::{format_currency_value, LocaleConfig},
    errors::LedgerError,
    storage::JsonStorage,
};

use super::{commands, output};

pub const SCRIPT_ENV: &str = "POCKET_LEDGER_CLI_SCRIPT";
pub const TODAY_ENV: &str = "POCKET_LEDGER_TODAY";

/// User-facing CLI error wrapper.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] LedgerError),
    #[error("Invalid input: {0}")]
    Input(String),
    #[error("Terminal error: {0}")]
    Terminal(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl From<rustyline::error::ReadlineError> for CliError {
    fn from(err: rustyline::error::ReadlineError) -> Self {
        CliError::Terminal(err.to_string())
    }
}

impl From<dialoguer::Error> for CliError {
    fn from(err: dialoguer::Error) -> Self {
        CliError::Terminal(err.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<LoopControl, CliError>;

pub struct ShellContext {
    pub mode: CliMode,
    pub running: bool,
    pub(crate) manager: LedgerManager,
    pub(crate) config: Config,
    pub(crate) locale: LocaleConfig,
    pub(crate) today: NaiveDate,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let config_manager = ConfigManager::new()?;
        let config = config_manager.load().unwrap_or_else(|err| {
            output::warning(format!("Configuration ignored: {err}"));
            Config::default()
        });
        let data_dir = config.resolve_data_dir(config_manager.base_dir());
        let storage = JsonStorage::new(Some(data_dir))?;
        let (manager, metadata) = LedgerManager::open(Box::new(storage));
        for warning in &metadata.warnings {
            output::warning(warning);
        }

        let mut context = Self {
            mode,
            running: true,
            manager,
            locale: config.locale_config(),
            config,
            today: resolve_today()?,
        };
        context.generate_fixed_bills();
        Ok(context)
    }

    pub fn prompt(&self) -> String {
        format!("ledger [{}]> ", self.today.format("%Y-%m"))
    }

    pub(crate) fn money(&self, cents: i64) -> String {
        format_currency_value(&self.locale, &self.config.currency_symbol, cents)
    }

    fn generate_fixed_bills(&mut self) {
        match self.manager.run_monthly_generation(self.today) {
            Ok(report) => report_generation(&report),
            Err(err) => output::error(format!("Fixed bills were not generated: {err}")),
        }
    }

    pub(crate) fn dispatch(&mut self, command: &str, args: &[&str]) -> CommandResult {
        let Some(definition) = commands::find(command) else {
            output::warning(format!("Unknown command `{command}`."));
            self.suggest_command(command);
            return Ok(LoopControl::Continue);
        };
        (definition.handler)(self, args)
    }

    fn suggest_command(&self, input: &str) {
        let mut suggestions: Vec<(usize, &str)> = commands::names()
            .map(|name| (levenshtein(name, input), name))
            .collect();
        suggestions.sort_by_key(|(distance, _)| *distance);

        if let Some((distance, best)) = suggestions.first() {
            if *distance <= 3 {
                output::info(format!("Suggestion: `{}`?", best));
            }
        }
    }

    /// Asks before destructive operations; script mode always proceeds.
    pub(crate) fn confirm(&self, prompt: &str) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Ok(Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .default(false)
            .interact()?)
    }

    pub(crate) fn report_error(&self, err: CliError) {
        output::error(err);
    }
}

fn report_generation(report: &GenerationReport) {
    match &report.outcome {
        GenerationOutcome::Generated(ids) if !ids.is_empty() => output::success(format!(
            "{} fixed bill entr{} created for {}.",
            ids.len(),
            if ids.len() == 1 { "y" } else { "ies" },
            report.period
        )),
        _ => tracing::debug!(period = %report.period, "no fixed bill entries created"),
    }
}

fn resolve_today() -> Result<NaiveDate, CliError> {
    match env::var(TODAY_ENV) {
        Ok(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .map_err(|_| CliError::Input(format!("{TODAY_ENV} must be YYYY-MM-DD, got `{raw}`"))),
        Err(_) => Ok(Local::now().date_naive()),
    }
}
