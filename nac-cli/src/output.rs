//! Service call output selection
//!
//! `Transport` is not object safe, so the binary picks one of a fixed set of
//! outputs at startup and dispatches through this enum.

use nac_codes::TransmitPayload;
use nac_receiver::{SendPolicy, ServiceCallTransport, Transport, TransportError, TransportTarget};
use nac_sim::{VirtualAmplifier, VirtualBlaster};
use tokio::io::Stdout;
use tokio::net::TcpStream;
use tracing::info;

use crate::error::CliError;
use crate::settings::OutputSettings;

/// Output chosen for this run
pub enum Output {
    /// JSON service call lines on stdout
    Stdout(ServiceCallTransport<Stdout>),
    /// JSON service call lines over a TCP connection
    Tcp(ServiceCallTransport<TcpStream>),
    /// In-memory blaster in front of a simulated preamplifier
    Sim(VirtualBlaster),
}

impl Output {
    /// Resolve the output from command-line overrides, then saved settings
    pub async fn open(
        sim: bool,
        connect: Option<&str>,
        saved: &OutputSettings,
    ) -> Result<Self, CliError> {
        if sim {
            return Ok(Self::simulated());
        }
        if let Some(addr) = connect {
            return Self::connect(addr).await;
        }

        match saved.connection_type.as_str() {
            "stdout" => Ok(Self::Stdout(ServiceCallTransport::new(tokio::io::stdout()))),
            "tcp" => Self::connect(&saved.address).await,
            "sim" => Ok(Self::simulated()),
            other => Err(CliError::InvalidOutput(other.to_string())),
        }
    }

    fn simulated() -> Self {
        info!("Using simulated blaster");
        Self::Sim(VirtualBlaster::with_amplifier(
            "sim-blaster",
            VirtualAmplifier::new("sim-nac"),
        ))
    }

    async fn connect(addr: &str) -> Result<Self, CliError> {
        if addr.is_empty() {
            return Err(CliError::InvalidOutput("tcp without an address".to_string()));
        }
        let stream = TcpStream::connect(addr).await?;
        info!("Streaming service calls to {}", addr);
        Ok(Self::Tcp(ServiceCallTransport::new(stream)))
    }

    /// The simulated blaster, if that is the output in use
    pub fn blaster(&self) -> Option<&VirtualBlaster> {
        match self {
            Self::Sim(blaster) => Some(blaster),
            _ => None,
        }
    }
}

impl Transport for Output {
    async fn transmit(
        &mut self,
        target: &TransportTarget,
        payload: TransmitPayload,
        policy: SendPolicy,
    ) -> Result<(), TransportError> {
        match self {
            Self::Stdout(t) => t.transmit(target, payload, policy).await,
            Self::Tcp(t) => t.transmit(target, payload, policy).await,
            Self::Sim(t) => t.transmit(target, payload, policy).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sim_flag_wins() {
        let saved = OutputSettings {
            connection_type: "tcp".to_string(),
            address: "203.0.113.1:1".to_string(),
        };
        let output = Output::open(true, None, &saved).await.unwrap();
        assert!(output.blaster().is_some());
    }

    #[tokio::test]
    async fn test_saved_sim() {
        let saved = OutputSettings {
            connection_type: "sim".to_string(),
            address: String::new(),
        };
        let output = Output::open(false, None, &saved).await.unwrap();
        assert!(output.blaster().is_some());
    }

    #[tokio::test]
    async fn test_saved_stdout() {
        let output = Output::open(false, None, &OutputSettings::default())
            .await
            .unwrap();
        assert!(matches!(output, Output::Stdout(_)));
    }

    #[tokio::test]
    async fn test_unknown_connection_type() {
        let saved = OutputSettings {
            connection_type: "serial".to_string(),
            address: String::new(),
        };
        assert!(matches!(
            Output::open(false, None, &saved).await,
            Err(CliError::InvalidOutput(ref t)) if t == "serial"
        ));
    }

    #[tokio::test]
    async fn test_tcp_without_address() {
        let saved = OutputSettings {
            connection_type: "tcp".to_string(),
            address: String::new(),
        };
        assert!(matches!(
            Output::open(false, None, &saved).await,
            Err(CliError::InvalidOutput(_))
        ));
    }

    #[tokio::test]
    async fn test_tcp_streams_service_calls() {
        use tokio::io::{AsyncBufReadExt, BufReader};
        use tokio::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();

        let mut output = Output::open(false, Some(&addr), &OutputSettings::default())
            .await
            .unwrap();
        let (socket, _) = listener.accept().await.unwrap();

        let target = TransportTarget::parse("remote.rm4").unwrap();
        let payload = nac_codes::CommandTable::lookup(nac_codes::CommandId::Mute);
        output
            .transmit(&target, payload, SendPolicy::DEFAULT)
            .await
            .unwrap();

        let mut line = String::new();
        BufReader::new(socket).read_line(&mut line).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["service"], "send_command");
        assert_eq!(value["data"]["entity_id"], "remote.rm4");
        assert_eq!(value["data"]["command"], payload.to_command_arg());
    }
}
