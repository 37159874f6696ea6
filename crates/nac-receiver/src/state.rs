//! Receiver identity and believed state

use nac_codes::SourceLabel;
use serde::{Deserialize, Serialize};

use crate::transport::TransportTarget;

/// Integration domain, used as the unique id prefix
pub const DOMAIN: &str = "naim_nac_x2";
/// Reported manufacturer
pub const MANUFACTURER: &str = "Naim Audio";
/// Reported model
pub const MODEL: &str = "NAC X2";
/// Reported device class
pub const DEVICE_CLASS: &str = "receiver";

/// Fixed identity of one configured receiver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceIdentity {
    /// User-chosen device name
    pub name: String,
    /// Blaster entity commands are sent through
    pub target: TransportTarget,
}

impl DeviceIdentity {
    /// Create a new identity
    pub fn new(name: impl Into<String>, target: TransportTarget) -> Self {
        Self {
            name: name.into(),
            target,
        }
    }

    /// Stable id derived from the name
    pub fn unique_id(&self) -> String {
        let slug: String = self
            .name
            .chars()
            .map(|c| match c {
                ' ' | '-' | ':' => '_',
                other => other,
            })
            .collect();
        format!("{DOMAIN}_{slug}")
    }

    /// Device registry information
    pub fn device_info(&self) -> DeviceInfo {
        DeviceInfo {
            identifiers: vec![(DOMAIN.to_string(), self.unique_id())],
            name: self.name.clone(),
            manufacturer: MANUFACTURER.to_string(),
            model: MODEL.to_string(),
            device_class: DEVICE_CLASS.to_string(),
            should_poll: false,
        }
    }
}

/// Device registry entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub identifiers: Vec<(String, String)>,
    pub name: String,
    pub manufacturer: String,
    pub model: String,
    pub device_class: String,
    /// State is pushed after each intent; there is nothing to poll
    pub should_poll: bool,
}

/// Control features the receiver advertises
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    VolumeStep,
    VolumeMute,
    SelectSource,
}

/// Everything the receiver supports; there is no power or absolute volume control
pub const SUPPORTED_FEATURES: [Feature; 3] =
    [Feature::VolumeStep, Feature::VolumeMute, Feature::SelectSource];

/// Reported power state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerState {
    /// Always reported; the preamplifier has no power feedback
    #[default]
    On,
}

/// How the mute intent's argument is treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MuteBehavior {
    /// Ignore the argument and always toggle
    #[default]
    Toggle,
    /// Drive believed mute to the requested value, sending only when it differs
    Honor,
}

impl MuteBehavior {
    /// Get human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Toggle => "Toggle",
            Self::Honor => "Honor",
        }
    }
}

/// Last commanded state of the receiver
///
/// This is what the adapter last told the preamplifier, not what the
/// preamplifier is actually doing. A front-panel change or a missed IR burst
/// is invisible here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BelievedState {
    /// Input last selected through the adapter
    pub source: Option<SourceLabel>,
    /// Mute as last toggled through the adapter
    pub muted: bool,
}

/// Snapshot of the receiver for observers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiverStatus {
    /// Always `On`
    pub power: PowerState,
    /// Believed selected source
    pub source: Option<String>,
    /// Believed mute
    pub muted: bool,
    /// Configured sources in slot order
    pub source_list: Vec<String>,
    /// Always true: the fields above are assumed, not read back
    pub assumed_state: bool,
}

impl ReceiverStatus {
    /// Format source for display
    pub fn source_display(&self) -> &str {
        self.source.as_deref().unwrap_or("---")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(name: &str) -> DeviceIdentity {
        DeviceIdentity::new(name, TransportTarget::parse("remote.rm4").unwrap())
    }

    #[test]
    fn test_unique_id_replaces_separators() {
        assert_eq!(
            identity("Living Room-NAC:1").unique_id(),
            "naim_nac_x2_Living_Room_NAC_1"
        );
        assert_eq!(identity("nac").unique_id(), "naim_nac_x2_nac");
    }

    #[test]
    fn test_device_info() {
        let info = identity("Study").device_info();
        assert_eq!(info.name, "Study");
        assert_eq!(info.manufacturer, MANUFACTURER);
        assert_eq!(info.model, MODEL);
        assert_eq!(info.device_class, "receiver");
        assert!(!info.should_poll);
        assert_eq!(
            info.identifiers,
            vec![(DOMAIN.to_string(), "naim_nac_x2_Study".to_string())]
        );
    }

    #[test]
    fn test_initial_believed_state() {
        let state = BelievedState::default();
        assert_eq!(state.source, None);
        assert!(!state.muted);
    }

    #[test]
    fn test_mute_behavior_serde() {
        assert_eq!(MuteBehavior::default(), MuteBehavior::Toggle);
        let json = serde_json::to_string(&MuteBehavior::Honor).unwrap();
        assert_eq!(json, "\"honor\"");
    }

    #[test]
    fn test_status_source_display() {
        let status = ReceiverStatus {
            power: PowerState::On,
            source: None,
            muted: false,
            source_list: Vec::new(),
            assumed_state: true,
        };
        assert_eq!(status.source_display(), "---");
    }
}
