//! Setup validation
//!
//! Turns the raw setup form into a [`ValidatedConfiguration`]. Checks run in
//! form order (name, transport target, then inputs one to six) and stop at the
//! first failure so the form can be re-shown with a single field error.

use std::collections::BTreeMap;

use nac_codes::{SlotId, SourceLabel};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ValidationError;
use crate::registry::SourceRegistry;
use crate::state::{DeviceIdentity, MuteBehavior};
use crate::transport::TransportTarget;

/// Setup form contents as submitted
///
/// Deserialized input gets no implicit slot defaults; a missing `inputN` key
/// is a validation error. Use [`RawSetupInput::with_defaults`] for a
/// pre-filled form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSetupInput {
    /// Device name
    #[serde(default)]
    pub name: Option<String>,
    /// Blaster entity id
    #[serde(default)]
    pub broadlink: Option<String>,
    /// Mute argument handling
    #[serde(default)]
    pub mute_behavior: MuteBehavior,
    /// `input1`..`input6` to label text
    #[serde(flatten)]
    pub inputs: BTreeMap<String, String>,
}

impl RawSetupInput {
    /// A form pre-filled with the default label for every input
    pub fn with_defaults() -> Self {
        let inputs = SlotId::ALL
            .into_iter()
            .map(|slot| {
                (
                    slot.config_key().to_string(),
                    SourceLabel::default_for(slot).name().to_string(),
                )
            })
            .collect();

        Self {
            name: None,
            broadlink: None,
            mute_behavior: MuteBehavior::default(),
            inputs,
        }
    }

    /// Set the label text for one input
    pub fn set_input(&mut self, slot: SlotId, label: impl Into<String>) {
        self.inputs.insert(slot.config_key().to_string(), label.into());
    }

    /// Label text submitted for one input
    pub fn input(&self, slot: SlotId) -> Option<&str> {
        self.inputs.get(slot.config_key()).map(String::as_str)
    }
}

/// Setup data that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedConfiguration {
    /// Trimmed, non-empty device name
    pub name: String,
    /// Blaster entity
    pub target: TransportTarget,
    /// Label per input, in slot order
    pub slots: [SourceLabel; 6],
    /// Mute argument handling
    pub mute_behavior: MuteBehavior,
}

impl ValidatedConfiguration {
    /// Build the source registry for this configuration
    pub fn registry(&self) -> SourceRegistry {
        SourceRegistry::new(self.slots)
    }

    /// Build the device identity for this configuration
    pub fn identity(&self) -> DeviceIdentity {
        DeviceIdentity::new(self.name.clone(), self.target.clone())
    }
}

impl From<&ValidatedConfiguration> for RawSetupInput {
    fn from(config: &ValidatedConfiguration) -> Self {
        let mut raw = RawSetupInput {
            name: Some(config.name.clone()),
            broadlink: Some(config.target.entity_id()),
            mute_behavior: config.mute_behavior,
            inputs: BTreeMap::new(),
        };
        for slot in SlotId::ALL {
            raw.set_input(slot, config.slots[slot.index()].name());
        }
        raw
    }
}

/// Validate and normalize setup input
pub fn validate(raw: &RawSetupInput) -> Result<ValidatedConfiguration, ValidationError> {
    let name = raw.name.as_deref().unwrap_or("").trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }

    let target = raw
        .broadlink
        .as_deref()
        .ok_or_else(|| ValidationError::InvalidTarget("no transport target given".to_string()))
        .and_then(TransportTarget::parse)?;

    let mut slots = [SourceLabel::Phono; 6];
    for slot in SlotId::ALL {
        slots[slot.index()] = raw
            .input(slot)
            .and_then(|text| text.parse::<SourceLabel>().ok())
            .ok_or(ValidationError::InvalidSourceLabel(slot))?;
    }

    debug!("Validated setup for '{}' via {}", name, target);

    Ok(ValidatedConfiguration {
        name: name.to_string(),
        target,
        slots,
        mute_behavior: raw.mute_behavior,
    })
}
