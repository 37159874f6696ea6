//! Error types for the nacremote binary

use nac_receiver::{ReceiverError, ValidationError};
use thiserror::Error;

use crate::settings::SettingsError;

/// Errors surfaced to the user by a command
#[derive(Debug, Error)]
pub enum CliError {
    #[error("no device configured; run `nacremote setup` first")]
    NotConfigured,

    #[error("invalid setup field '{field}': {0}", field = .0.field())]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Receiver(#[from] ReceiverError),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error("invalid output: {0}")]
    InvalidOutput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode status: {0}")]
    Json(#[from] serde_json::Error),
}
