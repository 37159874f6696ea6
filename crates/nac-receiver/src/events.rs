//! Receiver event stream
//!
//! Observers (a status display, a log, a host state bridge) receive every
//! transmission and believed-state change through one ordered stream.

use nac_codes::CommandId;

use crate::state::ReceiverStatus;

/// Events emitted by the receiver
#[derive(Debug, Clone, PartialEq)]
pub enum ReceiverEvent {
    /// A command was accepted by the transport
    Transmitted {
        /// Command sent
        command: CommandId,
        /// Entity id of the blaster
        target: String,
    },

    /// Believed state changed; observers should refresh
    StateChanged {
        /// Snapshot after the change
        status: ReceiverStatus,
    },

    /// An intent was refused or its transmission failed
    IntentRejected {
        /// Intent as received, e.g. `select_source(FM)`
        intent: String,
        /// Why it was refused
        reason: String,
    },
}

impl ReceiverEvent {
    /// Check if this event reports a transmission
    pub fn is_transmission(&self) -> bool {
        matches!(self, ReceiverEvent::Transmitted { .. })
    }

    /// Command carried by a transmission event
    pub fn command(&self) -> Option<CommandId> {
        match self {
            ReceiverEvent::Transmitted { command, .. } => Some(*command),
            _ => None,
        }
    }
}
