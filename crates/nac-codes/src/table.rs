//! Pre-captured transmit payloads
//!
//! Each payload is an RC-5 frame for system address 16, encoded as a Broadlink
//! IR packet (two bursts with a trailing gap, padded to 16 bytes) and stored as
//! base64 text, which is the form the blaster's `send_command` service accepts
//! after a `b64:` prefix.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::command::CommandId;
use crate::error::ParseError;

/// Opaque payload understood only by the IR blaster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransmitPayload(&'static str);

impl TransmitPayload {
    /// Base64 text of the packet
    pub fn as_base64(&self) -> &'static str {
        self.0
    }

    /// Argument form accepted by the blaster's `send_command` service
    pub fn to_command_arg(&self) -> String {
        format!("b64:{}", self.0)
    }

    /// Raw packet bytes
    pub fn decode(&self) -> Result<Vec<u8>, ParseError> {
        STANDARD
            .decode(self.0)
            .map_err(|e| ParseError::InvalidPayload(e.to_string()))
    }
}

const INPUT_1: &str =
    "JgA0AB0dOjo6HR0dHR0dHR0dHR0dHR0dHTodAAhWHR06OjodHR0dHR0dHR0dHR0dHR0dOh0ADQUAAAAAAAAAAA==";
const INPUT_2: &str =
    "JgAyAB0dOjo6HR0dHR0dHR0dHR0dHR06Oh0ACFYdHTo6Oh0dHR0dHR0dHR0dHR0dOjodAA0FAAAAAAAAAAAAAA==";
const INPUT_3: &str =
    "JgA0AB0dOjo6HR0dHR0dHR0dHR0dHR06HR0dAAhWHR06OjodHR0dHR0dHR0dHR0dHTodHR0ADQUAAAAAAAAAAA==";
const INPUT_4: &str =
    "JgAyAB0dOjo6HR0dHR0dHR0dHR0dOjodHR0ACFYdHTo6Oh0dHR0dHR0dHR0dHTo6HR0dAA0FAAAAAAAAAAAAAA==";
const INPUT_5: &str =
    "JgAwAB0dOjo6HR0dHR0dHR0dHR0dOjo6HQAIVh0dOjo6HR0dHR0dHR0dHR0dOjo6HQANBQAAAAAAAAAAAAAAAA==";
const INPUT_6: &str =
    "JgAyAB0dOjo6HR0dHR0dHR0dHR0dOh0dOh0ACFYdHTo6Oh0dHR0dHR0dHR0dHTodHTodAA0FAAAAAAAAAAAAAA==";
const VOLUME_UP: &str =
    "JgAyAB0dOjo6HR0dHR0dHR06Oh0dHR0dHR0ACFYdHTo6Oh0dHR0dHR0dOjodHR0dHR0dAA0FAAAAAAAAAAAAAA==";
const VOLUME_DOWN: &str =
    "JgAwAB0dOjo6HR0dHR0dHR06Oh0dHR06HQAIVh0dOjo6HR0dHR0dHR06Oh0dHR06HQANBQAAAAAAAAAAAAAAAA==";
const MUTE: &str =
    "JgAwAB0dOjo6HR0dHR0dHR0dHTodHTo6HQAIVh0dOjo6HR0dHR0dHR0dHTodHTo6HQANBQAAAAAAAAAAAAAAAA==";

/// Immutable mapping from command identifiers to transmit payloads
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandTable;

impl CommandTable {
    /// Payload for a command; total over `CommandId`
    pub fn lookup(id: CommandId) -> TransmitPayload {
        TransmitPayload(match id {
            CommandId::One => INPUT_1,
            CommandId::Two => INPUT_2,
            CommandId::Three => INPUT_3,
            CommandId::Four => INPUT_4,
            CommandId::Five => INPUT_5,
            CommandId::Six => INPUT_6,
            CommandId::VolumeUp => VOLUME_UP,
            CommandId::VolumeDown => VOLUME_DOWN,
            CommandId::Mute => MUTE,
        })
    }

    /// Reverse lookup: which command, if any, these packet bytes encode
    pub fn identify(packet: &[u8]) -> Option<CommandId> {
        CommandId::ALL.into_iter().find(|&id| {
            Self::lookup(id)
                .decode()
                .map(|bytes| bytes == packet)
                .unwrap_or(false)
        })
    }

    /// Reverse lookup from the base64 text form
    pub fn identify_base64(text: &str) -> Option<CommandId> {
        let text = text.strip_prefix("b64:").unwrap_or(text);
        CommandId::ALL
            .into_iter()
            .find(|&id| Self::lookup(id).as_base64() == text)
    }
}
