//! Virtual IR blaster
//!
//! A [`Transport`] that never touches hardware. It checks each payload the
//! way a real blaster would, records what it accepted, and can be scripted to
//! fail. Clones share state, so a test can keep one clone while the receiver
//! owns another.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use nac_codes::{BroadlinkPacket, CommandId, CommandTable, TransmitPayload};
use nac_receiver::{SendPolicy, Transport, TransportError, TransportTarget};
use tracing::{debug, warn};

use crate::amplifier::{AmplifierSnapshot, VirtualAmplifier};

/// One accepted transmission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentCommand {
    /// Entity id the send was addressed to
    pub target: String,
    /// Command the payload decodes to, if it is in the table
    pub command: Option<CommandId>,
    /// Repeat count requested
    pub num_repeats: u32,
    /// Delay between repeats requested
    pub delay: Duration,
}

#[derive(Debug, Default)]
struct BlasterState {
    sent: Vec<SentCommand>,
    fail_remaining: usize,
    unreachable: bool,
    latency: Option<Duration>,
    amplifier: Option<VirtualAmplifier>,
}

/// Simulated Broadlink blaster
#[derive(Debug, Clone)]
pub struct VirtualBlaster {
    /// Identifier for logging
    id: String,
    state: Arc<Mutex<BlasterState>>,
}

impl VirtualBlaster {
    /// Create a new virtual blaster with nothing in front of it
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            state: Arc::new(Mutex::new(BlasterState::default())),
        }
    }

    /// Create a blaster pointed at a simulated preamplifier
    pub fn with_amplifier(id: impl Into<String>, amplifier: VirtualAmplifier) -> Self {
        let blaster = Self::new(id);
        blaster.lock().amplifier = Some(amplifier);
        blaster
    }

    /// Fail the next `count` sends with `TransportError::Rejected`
    pub fn fail_next(&self, count: usize) {
        self.lock().fail_remaining = count;
    }

    /// Make every send fail with `TransportError::Unreachable` until cleared
    pub fn set_unreachable(&self, unreachable: bool) {
        self.lock().unreachable = unreachable;
    }

    /// Wait this long inside every send, before it resolves
    pub fn set_latency(&self, latency: Option<Duration>) {
        self.lock().latency = latency;
    }

    /// Lose the next `count` bursts between blaster and preamplifier
    ///
    /// The sends still succeed; only the simulated hardware misses them.
    pub fn miss_next(&self, count: usize) {
        if let Some(amp) = self.lock().amplifier.as_mut() {
            amp.miss_next(count);
        }
    }

    /// All accepted transmissions
    pub fn sent(&self) -> Vec<SentCommand> {
        self.lock().sent.clone()
    }

    /// Commands of all accepted transmissions, in order
    pub fn sent_commands(&self) -> Vec<CommandId> {
        self.lock().sent.iter().filter_map(|s| s.command).collect()
    }

    /// Clear the transmission log
    pub fn clear_sent(&self) {
        self.lock().sent.clear();
    }

    /// Actual state of the simulated preamplifier, if there is one
    pub fn amplifier(&self) -> Option<AmplifierSnapshot> {
        self.lock().amplifier.as_ref().map(VirtualAmplifier::snapshot)
    }

    fn lock(&self) -> MutexGuard<'_, BlasterState> {
        // State stays consistent even if a test panicked while holding it
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn accept(
        &self,
        target: &TransportTarget,
        payload: TransmitPayload,
        policy: SendPolicy,
    ) -> Result<(), TransportError> {
        let mut state = self.lock();

        if state.unreachable {
            warn!("Virtual blaster {}: {} unreachable", self.id, target);
            return Err(TransportError::Unreachable(target.entity_id()));
        }
        if state.fail_remaining > 0 {
            state.fail_remaining -= 1;
            warn!("Virtual blaster {}: scripted failure", self.id);
            return Err(TransportError::Rejected("scripted failure".to_string()));
        }

        let bytes = payload
            .decode()
            .map_err(|e| TransportError::Rejected(e.to_string()))?;
        let packet =
            BroadlinkPacket::parse(&bytes).map_err(|e| TransportError::Rejected(e.to_string()))?;
        if !packet.is_ir() {
            return Err(TransportError::Rejected(format!(
                "{:?} packet on an IR blaster",
                packet.kind
            )));
        }

        let command = CommandTable::identify(&bytes);
        debug!(
            "Virtual blaster {} -> {}: {:?} ({} pulses, {} us, x{})",
            self.id,
            target,
            command,
            packet.pulses.len(),
            packet.duration_us(),
            policy.num_repeats
        );

        if let (Some(amp), Some(cmd)) = (state.amplifier.as_mut(), command) {
            for _ in 0..policy.num_repeats {
                amp.process_command(cmd);
            }
        }

        state.sent.push(SentCommand {
            target: target.entity_id(),
            command,
            num_repeats: policy.num_repeats,
            delay: policy.delay,
        });
        Ok(())
    }
}

impl Transport for VirtualBlaster {
    async fn transmit(
        &mut self,
        target: &TransportTarget,
        payload: TransmitPayload,
        policy: SendPolicy,
    ) -> Result<(), TransportError> {
        let latency = self.lock().latency;
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        self.accept(target, payload, policy)
    }
}
