use dialoguer::{theme::ColorfulTheme, Confirm};
use strsim::levenshtein;
use tracing::debug;

use crate::cli::commands;
use crate::cli::core::{CliError, CliMode, CommandError, LoopControl};
use crate::cli::io as cli_io;
use crate::cli::output::{self, OutputPreferences};
use crate::cli::registry::{CommandEntry, CommandRegistry};
use crate::cli::system_clock::SystemClock;
use crate::config::ConfigManager;
use crate::core::session::FinanceSession;
use crate::currency::MoneyFormatter;
use crate::storage::JsonStorage;

/// Mutable state shared by every command handler.
pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub theme: ColorfulTheme,
    pub config_manager: ConfigManager,
    pub session: FinanceSession,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    /// Opens the session from the default data directory.
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let config_manager = ConfigManager::new();
        let config = config_manager.load()?;
        let storage = JsonStorage::new_default()?;
        debug!(root = %storage.base_dir().display(), "opening session");
        let session = FinanceSession::open(Box::new(storage), config, Box::new(SystemClock))?;
        Ok(Self::with_session(mode, config_manager, session))
    }

    pub fn with_session(
        mode: CliMode,
        config_manager: ConfigManager,
        session: FinanceSession,
    ) -> Self {
        if mode == CliMode::Script {
            output::set_preferences(OutputPreferences {
                plain: true,
                quiet: false,
            });
        }
        Self {
            mode,
            registry: CommandRegistry::with_entries(commands::all_definitions()),
            theme: ColorfulTheme::default(),
            config_manager,
            session,
            last_command: None,
            running: true,
        }
    }

    pub fn prompt(&self) -> String {
        "fintel> ".to_string()
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub fn money(&self) -> MoneyFormatter {
        self.session.config().money()
    }

    pub fn is_interactive(&self) -> bool {
        self.mode == CliMode::Interactive
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let needle = input.to_lowercase();
        let best = self
            .registry
            .names()
            .map(|key| (levenshtein(key, &needle), key))
            .min_by_key(|(distance, _)| *distance);

        if let Some((distance, best)) = best {
            if distance <= 3 {
                cli_io::print_hint(format!("Did you mean `{}`?", best));
            }
        }
    }

    /// Asks before a destructive step; script mode always proceeds.
    pub(crate) fn confirm(&self, prompt: &str) -> Result<bool, CommandError> {
        if !self.is_interactive() {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, prompt, false)
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if !self.is_interactive() {
            return Ok(true);
        }
        Confirm::with_theme(&self.theme)
            .with_prompt("Exit shell?")
            .default(true)
            .interact()
            .map_err(CliError::from)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                cli_io::print_error(&message);
                cli_io::print_hint("Use `help <command>` for usage details.");
                Ok(())
            }
            other => {
                cli_io::print_error(other.to_string());
                Ok(())
            }
        }
    }

    pub(crate) fn print_warning(&self, message: &str) {
        cli_io::print_warning(message);
    }
}
