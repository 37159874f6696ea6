//! Receiver state machine
//!
//! Turns control intents into at most one transmission each and keeps the
//! believed state in step with what was sent. Believed state only moves after
//! the transport reports success; a failed send leaves it untouched.

use nac_codes::{CommandId, CommandTable, SourceLabel};
use tracing::{debug, info, warn};

use crate::error::ReceiverError;
use crate::events::ReceiverEvent;
use crate::registry::SourceRegistry;
use crate::setup::ValidatedConfiguration;
use crate::state::{
    BelievedState, DeviceIdentity, Feature, MuteBehavior, PowerState, ReceiverStatus,
    SUPPORTED_FEATURES,
};
use crate::transport::{SendPolicy, Transport};

/// Direction of a relative volume step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeDirection {
    Up,
    Down,
}

impl VolumeDirection {
    fn command(&self) -> CommandId {
        match self {
            Self::Up => CommandId::VolumeUp,
            Self::Down => CommandId::VolumeDown,
        }
    }
}

/// One IR-controlled preamplifier
pub struct Receiver<T> {
    identity: DeviceIdentity,
    registry: SourceRegistry,
    state: BelievedState,
    mute_behavior: MuteBehavior,
    transport: T,
    event_buffer: Vec<ReceiverEvent>,
}

impl<T: Transport> Receiver<T> {
    /// Create a receiver from validated setup data
    pub fn new(config: &ValidatedConfiguration, transport: T) -> Self {
        Self::from_parts(
            config.identity(),
            config.registry(),
            config.mute_behavior,
            transport,
        )
    }

    /// Create a receiver from its parts
    pub fn from_parts(
        identity: DeviceIdentity,
        registry: SourceRegistry,
        mute_behavior: MuteBehavior,
        transport: T,
    ) -> Self {
        info!(
            "Receiver '{}' created ({}, mute: {})",
            identity.name,
            identity.target,
            mute_behavior.name()
        );
        Self {
            identity,
            registry,
            state: BelievedState::default(),
            mute_behavior,
            transport,
            event_buffer: Vec::new(),
        }
    }

    /// Select an input by its configured label
    ///
    /// `name` must be one of [`available_sources`](Self::available_sources).
    /// Anything else fails with `UnknownSource` without transmitting.
    pub async fn select_source(&mut self, name: &str) -> Result<(), ReceiverError> {
        let resolved = name
            .parse::<SourceLabel>()
            .ok()
            .and_then(|label| self.registry.slot_for(label).map(|slot| (label, slot)));

        let Some((label, slot)) = resolved else {
            warn!("Receiver '{}': unknown source '{}'", self.identity.name, name);
            let err = ReceiverError::UnknownSource(name.to_string());
            self.reject(format!("select_source({name})"), &err);
            return Err(err);
        };

        self.transmit(slot.command(), || format!("select_source({name})")).await?;

        if self.state.source != Some(label) {
            info!("Receiver '{}': source -> {}", self.identity.name, label);
        }
        self.state.source = Some(label);
        self.emit_state_changed();
        Ok(())
    }

    /// Handle a mute request
    ///
    /// With [`MuteBehavior::Toggle`] the argument is ignored and mute always
    /// flips. With [`MuteBehavior::Honor`] believed mute is driven to `mute`,
    /// and nothing is sent when it already matches.
    pub async fn mute_volume(&mut self, mute: bool) -> Result<(), ReceiverError> {
        match self.mute_behavior {
            MuteBehavior::Toggle => self.toggle_mute().await,
            MuteBehavior::Honor if self.state.muted == mute => {
                debug!(
                    "Receiver '{}': already believed {}, not sending",
                    self.identity.name,
                    if mute { "muted" } else { "unmuted" }
                );
                Ok(())
            }
            MuteBehavior::Honor => self.toggle_mute().await,
        }
    }

    /// Send the mute toggle and flip believed mute
    pub async fn toggle_mute(&mut self) -> Result<(), ReceiverError> {
        self.transmit(CommandId::Mute, || "mute".to_string()).await?;

        self.state.muted = !self.state.muted;
        info!("Receiver '{}': muted -> {}", self.identity.name, self.state.muted);
        self.emit_state_changed();
        Ok(())
    }

    /// Step the volume one notch; volume level itself is not tracked
    pub async fn volume_step(&mut self, direction: VolumeDirection) -> Result<(), ReceiverError> {
        let command = direction.command();
        self.transmit(command, || command.token().to_string()).await
    }

    /// Step the volume up
    pub async fn volume_up(&mut self) -> Result<(), ReceiverError> {
        self.volume_step(VolumeDirection::Up).await
    }

    /// Step the volume down
    pub async fn volume_down(&mut self) -> Result<(), ReceiverError> {
        self.volume_step(VolumeDirection::Down).await
    }

    /// Send any table command as-is, without touching believed state
    pub async fn send_command(&mut self, command: CommandId) -> Result<(), ReceiverError> {
        self.transmit(command, || format!("send_command({command})")).await
    }

    /// Send a command named by its token, as received from a caller
    pub async fn send_command_token(&mut self, token: &str) -> Result<(), ReceiverError> {
        match token.parse::<CommandId>() {
            Ok(command) => self.send_command(command).await,
            Err(e) => {
                warn!("Receiver '{}': {}", self.identity.name, e);
                let err = ReceiverError::UnknownCommand(token.to_string());
                self.reject(format!("send_command({token})"), &err);
                Err(err)
            }
        }
    }

    /// Believed selected source
    pub fn current_source(&self) -> Option<SourceLabel> {
        self.state.source
    }

    /// Believed mute
    pub fn is_muted(&self) -> bool {
        self.state.muted
    }

    /// Configured sources in slot order
    pub fn available_sources(&self) -> Vec<SourceLabel> {
        self.registry.sources_in_order().collect()
    }

    /// Always `On`; there is no modeled off state
    pub fn reported_power_state(&self) -> PowerState {
        PowerState::On
    }

    /// Advertised control features
    pub fn supported_features(&self) -> &'static [Feature] {
        &SUPPORTED_FEATURES
    }

    /// Snapshot for observers
    pub fn status(&self) -> ReceiverStatus {
        ReceiverStatus {
            power: self.reported_power_state(),
            source: self.state.source.map(|l| l.name().to_string()),
            muted: self.state.muted,
            source_list: self.registry.source_names(),
            assumed_state: true,
        }
    }

    /// Fixed identity
    pub fn identity(&self) -> &DeviceIdentity {
        &self.identity
    }

    /// Source registry
    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    /// Underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Drain buffered events
    pub fn drain_events(&mut self) -> Vec<ReceiverEvent> {
        std::mem::take(&mut self.event_buffer)
    }

    /// Send one command; the only suspension point of every intent
    async fn transmit(
        &mut self,
        command: CommandId,
        intent: impl FnOnce() -> String,
    ) -> Result<(), ReceiverError> {
        let payload = CommandTable::lookup(command);
        debug!(
            "Receiver '{}': transmitting {} via {}",
            self.identity.name, command, self.identity.target
        );

        let result = self
            .transport
            .transmit(&self.identity.target, payload, SendPolicy::DEFAULT)
            .await;

        match result {
            Ok(()) => {
                self.event_buffer.push(ReceiverEvent::Transmitted {
                    command,
                    target: self.identity.target.entity_id(),
                });
                Ok(())
            }
            Err(source) => {
                warn!(
                    "Receiver '{}': transmit {} failed: {}",
                    self.identity.name, command, source
                );
                let err = ReceiverError::TransmitFailed { command, source };
                self.reject(intent(), &err);
                Err(err)
            }
        }
    }

    fn reject(&mut self, intent: String, err: &ReceiverError) {
        self.event_buffer.push(ReceiverEvent::IntentRejected {
            intent,
            reason: err.to_string(),
        });
    }

    fn emit_state_changed(&mut self) {
        let status = self.status();
        self.event_buffer.push(ReceiverEvent::StateChanged { status });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use crate::setup::{validate, RawSetupInput};
    use crate::transport::TransportTarget;
    use nac_codes::TransmitPayload;

    /// Records sends and fails on demand
    #[derive(Default)]
    struct RecordingTransport {
        sent: Vec<(String, CommandId)>,
        fail_next: bool,
    }

    impl Transport for RecordingTransport {
        async fn transmit(
            &mut self,
            target: &TransportTarget,
            payload: TransmitPayload,
            policy: SendPolicy,
        ) -> Result<(), TransportError> {
            assert_eq!(policy, SendPolicy::DEFAULT);
            if std::mem::take(&mut self.fail_next) {
                return Err(TransportError::Unreachable(target.entity_id()));
            }
            let command = CommandTable::identify_base64(payload.as_base64())
                .expect("payload not from the command table");
            self.sent.push((target.entity_id(), command));
            Ok(())
        }
    }

    fn receiver(behavior: MuteBehavior) -> Receiver<RecordingTransport> {
        let raw = RawSetupInput {
            name: Some("NAC".to_string()),
            broadlink: Some("remote.rm4".to_string()),
            mute_behavior: behavior,
            ..RawSetupInput::with_defaults()
        };
        Receiver::new(&validate(&raw).unwrap(), RecordingTransport::default())
    }

    fn sent(rx: &Receiver<RecordingTransport>) -> Vec<CommandId> {
        rx.transport().sent.iter().map(|(_, c)| *c).collect()
    }

    #[tokio::test]
    async fn test_initial_state() {
        let rx = receiver(MuteBehavior::Toggle);
        assert_eq!(rx.current_source(), None);
        assert!(!rx.is_muted());
        assert_eq!(rx.reported_power_state(), PowerState::On);
        assert_eq!(rx.available_sources().len(), 6);
        assert!(sent(&rx).is_empty());
    }

    #[tokio::test]
    async fn test_select_source_sends_slot_command() {
        let mut rx = receiver(MuteBehavior::Toggle);

        rx.select_source("Tuner").await.unwrap();

        assert_eq!(
            rx.transport().sent,
            vec![("remote.rm4".to_string(), CommandId::Three)]
        );
        assert_eq!(rx.current_source(), Some(SourceLabel::Tuner));
    }

    #[tokio::test]
    async fn test_select_unknown_source() {
        let mut rx = receiver(MuteBehavior::Toggle);
        rx.select_source("CD").await.unwrap();

        let err = rx.select_source("FM").await.unwrap_err();

        assert!(matches!(err, ReceiverError::UnknownSource(ref s) if s == "FM"));
        assert_eq!(sent(&rx), vec![CommandId::Two]);
        assert_eq!(rx.current_source(), Some(SourceLabel::Cd));
    }

    #[tokio::test]
    async fn test_select_label_not_configured() {
        use SourceLabel::*;
        let registry = SourceRegistry::new([Phono, Cd, Cd, Tape, Vcr, Aux]);
        let identity = DeviceIdentity::new("NAC", TransportTarget::parse("remote.rm4").unwrap());
        let mut rx = Receiver::from_parts(
            identity,
            registry,
            MuteBehavior::Toggle,
            RecordingTransport::default(),
        );

        // Allowed label, but no slot carries it
        assert!(matches!(
            rx.select_source("Tuner").await,
            Err(ReceiverError::UnknownSource(_))
        ));
        // Shared label goes to the first slot
        rx.select_source("CD").await.unwrap();
        assert_eq!(sent(&rx), vec![CommandId::Two]);
    }

    #[tokio::test]
    async fn test_select_source_failure_keeps_state() {
        let mut rx = receiver(MuteBehavior::Toggle);
        rx.select_source("Phono").await.unwrap();

        rx.transport.fail_next = true;
        let err = rx.select_source("AUX").await.unwrap_err();

        assert!(matches!(
            err,
            ReceiverError::TransmitFailed {
                command: CommandId::Six,
                ..
            }
        ));
        assert_eq!(rx.current_source(), Some(SourceLabel::Phono));
    }

    #[tokio::test]
    async fn test_toggle_mute_ignores_argument() {
        let mut rx = receiver(MuteBehavior::Toggle);

        rx.mute_volume(true).await.unwrap();
        assert!(rx.is_muted());
        rx.mute_volume(true).await.unwrap();
        assert!(!rx.is_muted());
        rx.mute_volume(false).await.unwrap();
        assert!(rx.is_muted());

        assert_eq!(sent(&rx), vec![CommandId::Mute; 3]);
    }

    #[tokio::test]
    async fn test_honor_mute_skips_redundant_sends() {
        let mut rx = receiver(MuteBehavior::Honor);

        rx.mute_volume(false).await.unwrap();
        assert!(!rx.is_muted());
        assert!(sent(&rx).is_empty());

        rx.mute_volume(true).await.unwrap();
        rx.mute_volume(true).await.unwrap();
        assert!(rx.is_muted());
        assert_eq!(sent(&rx), vec![CommandId::Mute]);

        rx.mute_volume(false).await.unwrap();
        assert!(!rx.is_muted());
        assert_eq!(sent(&rx), vec![CommandId::Mute, CommandId::Mute]);
    }

    #[tokio::test]
    async fn test_mute_failure_keeps_state() {
        let mut rx = receiver(MuteBehavior::Toggle);
        rx.transport.fail_next = true;

        assert!(rx.toggle_mute().await.is_err());
        assert!(!rx.is_muted());
    }

    #[tokio::test]
    async fn test_volume_steps_leave_state_alone() {
        let mut rx = receiver(MuteBehavior::Toggle);
        rx.select_source("Tape").await.unwrap();
        rx.toggle_mute().await.unwrap();

        rx.volume_up().await.unwrap();
        rx.volume_down().await.unwrap();

        assert_eq!(rx.current_source(), Some(SourceLabel::Tape));
        assert!(rx.is_muted());
        assert_eq!(
            sent(&rx),
            vec![
                CommandId::Four,
                CommandId::Mute,
                CommandId::VolumeUp,
                CommandId::VolumeDown
            ]
        );
    }

    #[tokio::test]
    async fn test_raw_command_bypasses_state() {
        let mut rx = receiver(MuteBehavior::Toggle);

        rx.send_command(CommandId::Mute).await.unwrap();
        rx.send_command_token("five").await.unwrap();

        assert!(!rx.is_muted());
        assert_eq!(rx.current_source(), None);
        assert_eq!(sent(&rx), vec![CommandId::Mute, CommandId::Five]);
    }

    #[tokio::test]
    async fn test_raw_command_unknown_token() {
        let mut rx = receiver(MuteBehavior::Toggle);

        let err = rx.send_command_token("power").await.unwrap_err();

        assert!(matches!(err, ReceiverError::UnknownCommand(ref s) if s == "power"));
        assert_eq!(err.to_string(), "unknown command: power");
        assert!(sent(&rx).is_empty());
    }

    #[tokio::test]
    async fn test_events() {
        let mut rx = receiver(MuteBehavior::Toggle);

        rx.select_source("VCR").await.unwrap();
        let events = rx.drain_events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].command(), Some(CommandId::Five));
        assert!(matches!(
            &events[1],
            ReceiverEvent::StateChanged { status } if status.source.as_deref() == Some("VCR")
        ));

        rx.transport.fail_next = true;
        let _ = rx.volume_up().await;
        let events = rx.drain_events();
        assert!(matches!(
            &events[..],
            [ReceiverEvent::IntentRejected { intent, .. }] if intent == "volume_up"
        ));
        assert!(rx.drain_events().is_empty());
    }

    #[tokio::test]
    async fn test_status_snapshot() {
        let mut rx = receiver(MuteBehavior::Toggle);
        rx.select_source("AUX").await.unwrap();

        let status = rx.status();
        assert_eq!(status.power, PowerState::On);
        assert_eq!(status.source.as_deref(), Some("AUX"));
        assert!(!status.muted);
        assert!(status.assumed_state);
        assert_eq!(status.source_list[5], "AUX");
        assert_eq!(rx.supported_features().len(), 3);
    }
}
