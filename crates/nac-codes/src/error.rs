//! Error types for command parsing and payload decoding

use thiserror::Error;

/// Errors that can occur while converting external input into command vocabulary
/// or while decoding transmit payloads
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Command token is not part of the command table
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// Source label is not one of the allowed labels
    #[error("unknown source label: {0}")]
    UnknownLabel(String),

    /// Payload text is not valid base64
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    /// Packet is shorter than its header claims
    #[error("truncated packet: need {needed} more bytes")]
    Truncated { needed: usize },

    /// Packet type byte is not one a Broadlink blaster emits
    #[error("unsupported packet type: 0x{0:02X}")]
    UnsupportedPacketType(u8),
}
