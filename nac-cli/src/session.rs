//! A running receiver behind the actor, plus the shell loop

use clap::Parser;
use nac_codes::SlotId;
use nac_receiver::{
    run_receiver_actor, validate, Receiver, ReceiverEvent, ReceiverHandle, ValidatedConfiguration,
};
use nac_sim::VirtualBlaster;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cli::{Intent, ShellLine};
use crate::error::CliError;
use crate::output::Output;
use crate::settings::Settings;

/// Load and validate the saved device setup
pub fn load_config(settings: &Settings) -> Result<ValidatedConfiguration, CliError> {
    let raw = settings.device.as_ref().ok_or(CliError::NotConfigured)?;
    Ok(validate(raw)?)
}

/// `inputN<TAB>Label` for every slot, one per line
pub fn labels_text(config: &ValidatedConfiguration) -> String {
    let registry = config.registry();
    SlotId::ALL
        .iter()
        .map(|slot| format!("{}\t{}", slot.config_key(), registry.label(*slot)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Stream that human-readable replies are written to
///
/// Service calls own stdout when that is the output, so replies move to stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Report {
    Stdout,
    Stderr,
}

impl Report {
    /// Pick the stream that does not carry service calls
    pub fn for_output(output: &Output) -> Self {
        match output {
            Output::Stdout(_) => Report::Stderr,
            Output::Tcp(_) | Output::Sim(_) => Report::Stdout,
        }
    }

    fn emit(self, text: &str) {
        match self {
            Report::Stdout => println!("{text}"),
            Report::Stderr => eprintln!("{text}"),
        }
    }
}

pub struct Session {
    config: ValidatedConfiguration,
    report: Report,
    handle: ReceiverHandle,
    actor: JoinHandle<()>,
    events: JoinHandle<()>,
    blaster: Option<VirtualBlaster>,
}

impl Session {
    /// Build the receiver and start its actor
    pub fn start(config: ValidatedConfiguration, output: Output) -> Self {
        let blaster = output.blaster().cloned();
        let report = Report::for_output(&output);
        let receiver = Receiver::new(&config, output);

        let (cmd_tx, cmd_rx) = mpsc::channel(32);
        let (event_tx, event_rx) = mpsc::channel(256);

        let actor = tokio::spawn(run_receiver_actor(receiver, cmd_rx, event_tx));
        let events = tokio::spawn(log_events(event_rx));

        Self {
            config,
            report,
            handle: ReceiverHandle::new(cmd_tx),
            actor,
            events,
            blaster,
        }
    }

    /// Run one intent to completion
    pub async fn execute(&self, intent: Intent) -> Result<(), CliError> {
        match intent {
            Intent::Labels => self.report.emit(&labels_text(&self.config)),
            Intent::Status => {
                let status = self.handle.status().await?;
                self.report.emit(&serde_json::to_string_pretty(&status)?);
            }
            Intent::SelectSource { source } => self.handle.select_source(&source).await?,
            Intent::Mute { state: Some(state) } => self.handle.mute_volume(state.is_on()).await?,
            Intent::Mute { state: None } => {
                let muted = self.handle.status().await?.muted;
                self.handle.mute_volume(!muted).await?;
            }
            Intent::VolumeUp => self.handle.volume_up().await?,
            Intent::VolumeDown => self.handle.volume_down().await?,
            Intent::Send { command } => self.handle.send_command(&command).await?,
        }
        Ok(())
    }

    /// Read intents from stdin until EOF or `quit`
    ///
    /// Errors from a single line are reported and the session carries on.
    pub async fn shell(&self) -> Result<(), CliError> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if matches!(line, "quit" | "exit") {
                break;
            }

            let intent = match ShellLine::try_parse_from(line.split_whitespace()) {
                Ok(parsed) => parsed.intent,
                Err(e) => {
                    eprintln!("{e}");
                    continue;
                }
            };
            if let Err(e) = self.execute(intent).await {
                eprintln!("error: {e}");
            }
        }
        Ok(())
    }

    /// Stop the actor and wait for queued events to be logged
    pub async fn finish(self) {
        self.handle.shutdown().await;
        drop(self.handle);

        if let Err(e) = self.actor.await {
            warn!("Receiver actor ended abnormally: {}", e);
        }
        if let Err(e) = self.events.await {
            warn!("Event logger ended abnormally: {}", e);
        }

        if let Some(amp) = self.blaster.as_ref().and_then(VirtualBlaster::amplifier) {
            info!(
                "Simulated NAC: input={}, muted={}, volume={}",
                amp.input, amp.muted, amp.volume
            );
        }
    }
}

async fn log_events(mut event_rx: mpsc::Receiver<ReceiverEvent>) {
    while let Some(event) = event_rx.recv().await {
        match event {
            ReceiverEvent::Transmitted { command, target } => {
                info!("Sent {} to {}", command, target);
            }
            ReceiverEvent::StateChanged { status } => {
                debug!(
                    "Believed state: source={}, muted={}",
                    status.source_display(),
                    status.muted
                );
            }
            ReceiverEvent::IntentRejected { intent, reason } => {
                warn!("{} rejected: {}", intent, reason);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Switch;
    use nac_codes::CommandId;
    use nac_receiver::{RawSetupInput, ServiceCallTransport};
    use nac_sim::VirtualAmplifier;

    fn config() -> ValidatedConfiguration {
        validate(&RawSetupInput {
            name: Some("Lounge".to_string()),
            broadlink: Some("remote.rm4".to_string()),
            ..RawSetupInput::with_defaults()
        })
        .unwrap()
    }

    fn sim_session() -> (Session, VirtualBlaster) {
        let blaster = VirtualBlaster::with_amplifier("rm4", VirtualAmplifier::new("nac"));
        let session = Session::start(config(), Output::Sim(blaster.clone()));
        (session, blaster)
    }

    #[test]
    fn test_load_config_requires_device() {
        assert!(matches!(
            load_config(&Settings::default()),
            Err(CliError::NotConfigured)
        ));
    }

    #[tokio::test]
    async fn test_intents_reach_blaster() {
        let (session, blaster) = sim_session();

        session
            .execute(Intent::SelectSource { source: "Tape".to_string() })
            .await
            .unwrap();
        session.execute(Intent::VolumeUp).await.unwrap();
        session
            .execute(Intent::Send { command: "six".to_string() })
            .await
            .unwrap();
        session.finish().await;

        assert_eq!(
            blaster.sent_commands(),
            vec![CommandId::Four, CommandId::VolumeUp, CommandId::Six]
        );
        assert_eq!(blaster.amplifier().unwrap().input, SlotId::Six);
    }

    #[tokio::test]
    async fn test_mute_without_state_toggles() {
        let (session, blaster) = sim_session();

        session.execute(Intent::Mute { state: None }).await.unwrap();
        session.execute(Intent::Mute { state: None }).await.unwrap();
        session
            .execute(Intent::Mute { state: Some(Switch::Off) })
            .await
            .unwrap();
        session.finish().await;

        assert_eq!(blaster.sent_commands(), vec![CommandId::Mute; 3]);
        assert!(blaster.amplifier().unwrap().muted);
    }

    #[tokio::test]
    async fn test_stdout_session_replies_on_stderr() {
        let output = Output::Stdout(ServiceCallTransport::new(tokio::io::stdout()));
        let session = Session::start(config(), output);

        assert_eq!(session.report, Report::Stderr);
        session.execute(Intent::Status).await.unwrap();
        session.execute(Intent::Labels).await.unwrap();
        session.finish().await;
    }

    #[tokio::test]
    async fn test_sim_session_replies_on_stdout() {
        let (session, _blaster) = sim_session();
        assert_eq!(session.report, Report::Stdout);
        session.finish().await;
    }

    #[test]
    fn test_labels_text() {
        let text = labels_text(&config());
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "input1\tPhono");
        assert_eq!(lines[5], "input6\tAUX");
    }

    #[tokio::test]
    async fn test_unknown_source_is_an_error() {
        let (session, blaster) = sim_session();

        let err = session
            .execute(Intent::SelectSource { source: "FM".to_string() })
            .await
            .unwrap_err();
        session.finish().await;

        assert!(matches!(err, CliError::Receiver(_)));
        assert!(blaster.sent().is_empty());
    }
}
