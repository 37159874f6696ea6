//! Error types for setup validation and receiver control

use nac_codes::{CommandId, SlotId};
use thiserror::Error;

/// Errors raised while validating setup input
///
/// These are shown back to the operator next to the offending form field.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Name is absent or blank
    #[error("device name must not be empty")]
    EmptyName,

    /// Transport target is absent or not a remote-transmit entity
    #[error("invalid transport target: {0}")]
    InvalidTarget(String),

    /// Slot has no label or a label outside the allowed set
    #[error("invalid source label for input {0}")]
    InvalidSourceLabel(SlotId),
}

impl ValidationError {
    /// Setup-form field this error belongs to
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyName => "name",
            Self::InvalidTarget(_) => "broadlink",
            Self::InvalidSourceLabel(slot) => slot.config_key(),
        }
    }
}

/// Errors from the IR transport
#[derive(Debug, Error)]
pub enum TransportError {
    /// I/O error talking to the host or blaster
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The host refused the send
    #[error("send rejected: {0}")]
    Rejected(String),

    /// The target entity could not be reached
    #[error("target unreachable: {0}")]
    Unreachable(String),

    /// The transport has been shut down
    #[error("transport closed")]
    Closed,
}

/// Errors from a single control intent
///
/// None of these leave believed state partially updated.
#[derive(Debug, Error)]
pub enum ReceiverError {
    /// Source name is not one of the configured inputs
    #[error("unknown source: {0}")]
    UnknownSource(String),

    /// Command token is not part of the command table
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// The transport failed to send the command
    #[error("failed to transmit {command}: {source}")]
    TransmitFailed {
        /// Command that was being sent
        command: CommandId,
        /// Underlying transport failure
        #[source]
        source: TransportError,
    },

    /// The receiver actor is no longer running
    #[error("receiver actor is not running")]
    ActorClosed,
}
