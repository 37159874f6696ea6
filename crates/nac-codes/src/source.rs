//! Allowed source labels
//!
//! The labels a user may assign to an input slot at setup time. The set is
//! closed; nothing extends it at runtime.

use std::fmt;
use std::str::FromStr;

use crate::command::SlotId;
use crate::error::ParseError;

/// User-facing name for a preamplifier input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SourceLabel {
    #[cfg_attr(feature = "serde", serde(rename = "Phono"))]
    Phono,
    #[cfg_attr(feature = "serde", serde(rename = "CD"))]
    Cd,
    #[cfg_attr(feature = "serde", serde(rename = "Tuner"))]
    Tuner,
    #[cfg_attr(feature = "serde", serde(rename = "Tape"))]
    Tape,
    #[cfg_attr(feature = "serde", serde(rename = "VCR"))]
    Vcr,
    #[cfg_attr(feature = "serde", serde(rename = "AUX"))]
    Aux,
}

impl SourceLabel {
    /// Every allowed label, in the order a setup form offers them
    pub const ALL: [SourceLabel; 6] = [
        SourceLabel::Phono,
        SourceLabel::Cd,
        SourceLabel::Tuner,
        SourceLabel::Tape,
        SourceLabel::Vcr,
        SourceLabel::Aux,
    ];

    /// Display text, exactly as offered to and matched against callers
    pub fn name(&self) -> &'static str {
        match self {
            Self::Phono => "Phono",
            Self::Cd => "CD",
            Self::Tuner => "Tuner",
            Self::Tape => "Tape",
            Self::Vcr => "VCR",
            Self::Aux => "AUX",
        }
    }

    /// Label pre-selected for a slot on a fresh setup form
    pub fn default_for(slot: SlotId) -> Self {
        Self::ALL[slot.index()]
    }
}

impl fmt::Display for SourceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SourceLabel {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SourceLabel::ALL
            .into_iter()
            .find(|label| label.name() == s)
            .ok_or_else(|| ParseError::UnknownLabel(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_parse_exactly() {
        assert_eq!("CD".parse::<SourceLabel>(), Ok(SourceLabel::Cd));
        assert_eq!("AUX".parse::<SourceLabel>(), Ok(SourceLabel::Aux));
        assert!("cd".parse::<SourceLabel>().is_err());
        assert_eq!(
            "FM".parse::<SourceLabel>(),
            Err(ParseError::UnknownLabel("FM".to_string()))
        );
    }

    #[test]
    fn test_slot_defaults() {
        let defaults: Vec<&str> = SlotId::ALL
            .into_iter()
            .map(|slot| SourceLabel::default_for(slot).name())
            .collect();
        assert_eq!(defaults, ["Phono", "CD", "Tuner", "Tape", "VCR", "AUX"]);
    }
}
