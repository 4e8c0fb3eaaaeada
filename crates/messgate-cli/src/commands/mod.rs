//! Subcommand implementations.

use std::io::{self, Read};

use messgate_client::ClientError;
use messgate_core::{DraftError, TokenIdError};
use thiserror::Error;

pub mod admin;
pub mod event;
pub mod gate;
pub mod student;

/// Errors surfaced to the user as `Error: ...`.
#[derive(Debug, Error)]
pub enum CliError {
    /// Input file could not be read.
    #[error("Failed to read file {path}: {source}")]
    Read {
        /// Path given on the command line.
        path: String,
        /// Underlying failure.
        source: io::Error,
    },
    /// Input is not a valid event form.
    #[error("Invalid event form: {0}")]
    InvalidForm(#[from] serde_json::Error),
    /// Form failed validation.
    #[error(transparent)]
    Draft(#[from] DraftError),
    /// Typed token id was blank.
    #[error(transparent)]
    TokenId(#[from] TokenIdError),
    /// Client could not be set up.
    #[error(transparent)]
    Client(#[from] ClientError),
    /// Scan payload carried no usable identifier.
    #[error("No token id found in scan")]
    NoTokenInScan,
    /// A service call failed; carries the message to show.
    #[error("{0}")]
    Service(String),
    /// Terminal I/O failed.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Maps a failed call to the service message, else `default`.
pub fn service_error(default: &'static str) -> impl Fn(ClientError) -> CliError {
    move |e| {
        tracing::debug!(error = %e, "service call failed");
        CliError::Service(e.message_or(default))
    }
}

/// Reads a file, or stdin when no path is given.
pub fn read_input(input: Option<String>) -> Result<String, CliError> {
    match input {
        Some(path) => {
            std::fs::read_to_string(&path).map_err(|source| CliError::Read { path, source })
        }
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}
