use std::io;

use rustyline::error::ReadlineError;
use thiserror::Error;

use crate::core::services::ServiceError;
use crate::errors::LedgerError;

pub use crate::cli::shell_context::ShellContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

/// Fatal shell errors; these end the session.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Readline error: {0}")]
    Readline(#[from] ReadlineError),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error("Prompt error: {0}")]
    Dialoguer(#[from] dialoguer::Error),
}

/// Errors raised by individual commands; the shell reports them and keeps running.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error("Prompt error: {0}")]
    Dialoguer(#[from] dialoguer::Error),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("exit requested")]
    ExitRequested,
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}
