//! IR transport seam
//!
//! The receiver never talks to a blaster directly. It hands a payload and a
//! target to a [`Transport`] and treats any error as a failed intent. There is
//! no acknowledgement from the preamplifier itself, so a successful transmit
//! only means the blaster accepted the command.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use nac_codes::TransmitPayload;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::debug;

use crate::error::{TransportError, ValidationError};

/// Entity domain a transport target must belong to
pub const REMOTE_DOMAIN: &str = "remote";

/// Reference to a remote-transmit-capable entity, e.g. `remote.lounge_broadlink`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TransportTarget {
    object_id: String,
}

impl TransportTarget {
    /// Parse and check an entity id
    pub fn parse(entity_id: &str) -> Result<Self, ValidationError> {
        let invalid = |why: &str| ValidationError::InvalidTarget(format!("{entity_id}: {why}"));

        let (domain, object_id) = entity_id
            .split_once('.')
            .ok_or_else(|| invalid("expected <domain>.<object_id>"))?;

        if domain != REMOTE_DOMAIN {
            return Err(invalid("not a remote entity"));
        }
        if object_id.is_empty() || !object_id.chars().all(is_entity_char) {
            return Err(invalid("malformed object id"));
        }

        Ok(Self {
            object_id: object_id.to_string(),
        })
    }

    /// Entity domain (always `remote`)
    pub fn domain(&self) -> &'static str {
        REMOTE_DOMAIN
    }

    /// Object id part of the entity id
    pub fn object_id(&self) -> &str {
        &self.object_id
    }

    /// Full entity id
    pub fn entity_id(&self) -> String {
        format!("{REMOTE_DOMAIN}.{}", self.object_id)
    }
}

fn is_entity_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'
}

impl fmt::Display for TransportTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{REMOTE_DOMAIN}.{}", self.object_id)
    }
}

impl TryFrom<String> for TransportTarget {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TransportTarget> for String {
    fn from(target: TransportTarget) -> Self {
        target.entity_id()
    }
}

/// Repeat and spacing the blaster applies to every send
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendPolicy {
    /// Number of times the blaster sends the code
    pub num_repeats: u32,
    /// Pause between repeats
    pub delay: Duration,
}

impl SendPolicy {
    /// The only policy the receiver uses
    pub const DEFAULT: SendPolicy = SendPolicy {
        num_repeats: 1,
        delay: Duration::from_millis(400),
    };
}

impl Default for SendPolicy {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Something that can emit a payload toward a target
///
/// Called at most once per intent. Implementations must not retry on their own.
pub trait Transport: Send {
    /// Send one payload
    fn transmit(
        &mut self,
        target: &TransportTarget,
        payload: TransmitPayload,
        policy: SendPolicy,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;
}

/// `remote.send_command` service call, one per transmission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceCall {
    pub domain: String,
    pub service: String,
    pub data: SendCommandData,
}

/// Service data for `remote.send_command`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendCommandData {
    pub entity_id: String,
    pub num_repeats: u32,
    pub delay_secs: f64,
    pub command: String,
}

impl ServiceCall {
    /// Build the service call for one transmission
    pub fn send_command(
        target: &TransportTarget,
        payload: TransmitPayload,
        policy: SendPolicy,
    ) -> Self {
        Self {
            domain: REMOTE_DOMAIN.to_string(),
            service: "send_command".to_string(),
            data: SendCommandData {
                entity_id: target.entity_id(),
                num_repeats: policy.num_repeats,
                delay_secs: policy.delay.as_secs_f64(),
                command: payload.to_command_arg(),
            },
        }
    }
}

/// Transport that writes newline-delimited JSON service calls to a stream
///
/// The stream is typically stdout or a TCP connection to a host bridge that
/// forwards each line to the blaster integration.
pub struct ServiceCallTransport<W> {
    writer: W,
}

impl<W> ServiceCallTransport<W>
where
    W: AsyncWrite + Unpin + Send,
{
    /// Create a new service call transport
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W> Transport for ServiceCallTransport<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn transmit(
        &mut self,
        target: &TransportTarget,
        payload: TransmitPayload,
        policy: SendPolicy,
    ) -> Result<(), TransportError> {
        let call = ServiceCall::send_command(target, payload, policy);
        let mut line = serde_json::to_vec(&call).map_err(std::io::Error::from)?;
        line.push(b'\n');

        debug!("Writing service call for {} ({} bytes)", target, line.len());
        self.writer.write_all(&line).await?;
        self.writer.flush().await?;
        Ok(())
    }
}
