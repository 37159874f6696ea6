//! Closed command vocabulary
//!
//! `CommandId` names every infrared code the adapter can emit. `SlotId` is the
//! subset that selects one of the six physical inputs on the preamplifier.
//! External strings are converted once at the boundary via `FromStr`; internal
//! call sites only ever hold the enums.

use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;

/// Symbolic identifier of a pre-captured infrared command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CommandId {
    /// Input 1
    One,
    /// Input 2
    Two,
    /// Input 3
    Three,
    /// Input 4
    Four,
    /// Input 5
    Five,
    /// Input 6
    Six,
    /// One volume step up
    VolumeUp,
    /// One volume step down
    VolumeDown,
    /// Mute toggle (the preamplifier has no discrete mute on/off codes)
    Mute,
}

impl CommandId {
    /// Every command, in table order
    pub const ALL: [CommandId; 9] = [
        CommandId::One,
        CommandId::Two,
        CommandId::Three,
        CommandId::Four,
        CommandId::Five,
        CommandId::Six,
        CommandId::VolumeUp,
        CommandId::VolumeDown,
        CommandId::Mute,
    ];

    /// The token used by the control surface and in logs
    pub fn token(&self) -> &'static str {
        match self {
            Self::One => "one",
            Self::Two => "two",
            Self::Three => "three",
            Self::Four => "four",
            Self::Five => "five",
            Self::Six => "six",
            Self::VolumeUp => "volume_up",
            Self::VolumeDown => "volume_down",
            Self::Mute => "mute",
        }
    }

    /// Returns the input slot this command selects, if it is a slot command
    pub fn slot(&self) -> Option<SlotId> {
        match self {
            Self::One => Some(SlotId::One),
            Self::Two => Some(SlotId::Two),
            Self::Three => Some(SlotId::Three),
            Self::Four => Some(SlotId::Four),
            Self::Five => Some(SlotId::Five),
            Self::Six => Some(SlotId::Six),
            Self::VolumeUp | Self::VolumeDown | Self::Mute => None,
        }
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for CommandId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CommandId::ALL
            .into_iter()
            .find(|cmd| cmd.token() == s)
            .ok_or_else(|| ParseError::UnknownCommand(s.to_string()))
    }
}

/// One of the six physical input positions on the preamplifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SlotId {
    One,
    Two,
    Three,
    Four,
    Five,
    Six,
}

impl SlotId {
    /// Every slot, in slot order
    pub const ALL: [SlotId; 6] = [
        SlotId::One,
        SlotId::Two,
        SlotId::Three,
        SlotId::Four,
        SlotId::Five,
        SlotId::Six,
    ];

    /// Zero-based position in slot order
    pub fn index(&self) -> usize {
        match self {
            Self::One => 0,
            Self::Two => 1,
            Self::Three => 2,
            Self::Four => 3,
            Self::Five => 4,
            Self::Six => 5,
        }
    }

    /// The command that selects this input
    pub fn command(&self) -> CommandId {
        match self {
            Self::One => CommandId::One,
            Self::Two => CommandId::Two,
            Self::Three => CommandId::Three,
            Self::Four => CommandId::Four,
            Self::Five => CommandId::Five,
            Self::Six => CommandId::Six,
        }
    }

    /// Setup-form key carrying the label for this slot (`input1`..`input6`)
    pub fn config_key(&self) -> &'static str {
        match self {
            Self::One => "input1",
            Self::Two => "input2",
            Self::Three => "input3",
            Self::Four => "input4",
            Self::Five => "input5",
            Self::Six => "input6",
        }
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.command().token())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_tokens_parse_back() {
        for cmd in CommandId::ALL {
            assert_eq!(cmd.token().parse::<CommandId>(), Ok(cmd));
        }
    }

    #[test]
    fn test_unknown_command_token() {
        assert_eq!(
            "power".parse::<CommandId>(),
            Err(ParseError::UnknownCommand("power".to_string()))
        );
        // Tokens are exact, not case-folded
        assert!("Mute".parse::<CommandId>().is_err());
    }

    #[test]
    fn test_slot_command_mapping() {
        for (i, slot) in SlotId::ALL.into_iter().enumerate() {
            assert_eq!(slot.index(), i);
            assert_eq!(slot.command().slot(), Some(slot));
        }
        assert_eq!(CommandId::Mute.slot(), None);
        assert_eq!(CommandId::VolumeUp.slot(), None);
    }

    #[test]
    fn test_config_keys() {
        assert_eq!(SlotId::One.config_key(), "input1");
        assert_eq!(SlotId::Six.config_key(), "input6");
        assert_eq!(SlotId::Three.to_string(), "three");
    }
}
