//! Virtual preamplifier for testing
//!
//! This module provides a simulated NAC that reacts to decoded IR commands the
//! way the real unit does. Unlike the receiver's believed state it tracks what
//! the hardware is *actually* doing, so tests can show the two drifting apart
//! when a burst is missed.

use nac_codes::{CommandId, SlotId};
use serde::Serialize;
use tracing::debug;

/// Volume the simulated unit powers up at
pub const DEFAULT_VOLUME: u8 = 20;
/// Top of the simulated volume range
pub const MAX_VOLUME: u8 = 100;

/// Virtual NAC preamplifier
///
/// Tracks input, mute and volume based on commands received.
#[derive(Debug, Clone)]
pub struct VirtualAmplifier {
    /// Identifier for logging
    id: String,
    input: SlotId,
    muted: bool,
    volume: u8,
    /// Bursts still to be lost before commands land again
    miss_remaining: usize,
    /// Commands received (for test verification)
    received_commands: Vec<CommandId>,
}

/// Point-in-time view of the simulated hardware
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AmplifierSnapshot {
    pub input: SlotId,
    pub muted: bool,
    pub volume: u8,
}

impl VirtualAmplifier {
    /// Create a new virtual preamplifier on input one, unmuted
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            input: SlotId::One,
            muted: false,
            volume: DEFAULT_VOLUME,
            miss_remaining: 0,
            received_commands: Vec::new(),
        }
    }

    /// Get the identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get the active input
    pub fn input(&self) -> SlotId {
        self.input
    }

    /// Get the mute state
    pub fn muted(&self) -> bool {
        self.muted
    }

    /// Get the volume position
    pub fn volume(&self) -> u8 {
        self.volume
    }

    /// Current hardware state
    pub fn snapshot(&self) -> AmplifierSnapshot {
        AmplifierSnapshot {
            input: self.input,
            muted: self.muted,
            volume: self.volume,
        }
    }

    /// Lose the next `count` bursts, as if the IR path were blocked
    pub fn miss_next(&mut self, count: usize) {
        self.miss_remaining = count;
    }

    /// Process a command that reached the amplifier
    ///
    /// Returns true if state changed. Missed bursts are not recorded.
    pub fn process_command(&mut self, command: CommandId) -> bool {
        if self.miss_remaining > 0 {
            self.miss_remaining -= 1;
            debug!("Virtual amp {} missed {}", self.id, command);
            return false;
        }

        self.received_commands.push(command);

        let changed = match command {
            CommandId::Mute => {
                self.muted = !self.muted;
                true
            }
            CommandId::VolumeUp => {
                let next = self.volume.saturating_add(1).min(MAX_VOLUME);
                std::mem::replace(&mut self.volume, next) != next
            }
            CommandId::VolumeDown => {
                let next = self.volume.saturating_sub(1);
                std::mem::replace(&mut self.volume, next) != next
            }
            slot_cmd => match slot_cmd.slot() {
                Some(slot) => std::mem::replace(&mut self.input, slot) != slot,
                None => false,
            },
        };

        if changed {
            debug!(
                "Virtual amp {} state changed: input={}, muted={}, volume={}",
                self.id, self.input, self.muted, self.volume
            );
        }
        changed
    }

    /// Get all received commands (for test verification)
    pub fn received_commands(&self) -> &[CommandId] {
        &self.received_commands
    }

    /// Clear received commands
    pub fn clear_received(&mut self) {
        self.received_commands.clear();
    }
}
