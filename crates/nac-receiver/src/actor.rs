//! Receiver Actor
//!
//! This module runs a [`Receiver`] inside its own task. Intents arrive on a
//! channel and are handled strictly one at a time: each runs to completion,
//! including its transmission, before the next is read. That ordering is what
//! keeps believed state consistent without any locking.
//!
//! # Architecture
//!
//! The actor receives commands through a channel and emits events through
//! another. Every command carries a oneshot for its result, so callers see the
//! outcome of their own intent while observers see the full event stream.
//!
//! # Example
//!
//! ```rust,ignore
//! use nac_receiver::{run_receiver_actor, ReceiverHandle};
//! use tokio::sync::mpsc;
//!
//! let (cmd_tx, cmd_rx) = mpsc::channel(32);
//! let (event_tx, mut event_rx) = mpsc::channel(256);
//!
//! tokio::spawn(run_receiver_actor(receiver, cmd_rx, event_tx));
//!
//! let handle = ReceiverHandle::new(cmd_tx);
//! handle.select_source("CD").await?;
//! ```

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use crate::error::ReceiverError;
use crate::events::ReceiverEvent;
use crate::receiver::Receiver;
use crate::state::ReceiverStatus;
use crate::transport::Transport;

type Reply = oneshot::Sender<Result<(), ReceiverError>>;

/// Commands sent to the receiver actor
#[derive(Debug)]
pub enum ReceiverCommand {
    /// Select an input by label
    SelectSource {
        /// Label as given by the caller
        source: String,
        /// Result of the intent
        response: Reply,
    },

    /// Mute request; see [`MuteBehavior`](crate::MuteBehavior) for how `mute` is used
    MuteVolume {
        /// Requested mute state
        mute: bool,
        /// Result of the intent
        response: Reply,
    },

    /// One volume step up
    VolumeUp {
        /// Result of the intent
        response: Reply,
    },

    /// One volume step down
    VolumeDown {
        /// Result of the intent
        response: Reply,
    },

    /// Raw command by token
    SendCommand {
        /// Command token, e.g. `mute` or `three`
        command: String,
        /// Result of the intent
        response: Reply,
    },

    /// Query the believed state
    QueryStatus {
        /// Channel to send back the snapshot
        response: oneshot::Sender<ReceiverStatus>,
    },

    /// Shutdown the actor
    Shutdown,
}

/// Run the receiver actor until shutdown or until every sender is dropped
pub async fn run_receiver_actor<T: Transport>(
    mut receiver: Receiver<T>,
    mut cmd_rx: mpsc::Receiver<ReceiverCommand>,
    event_tx: mpsc::Sender<ReceiverEvent>,
) {
    info!("Receiver actor started for '{}'", receiver.identity().name);

    while let Some(cmd) = cmd_rx.recv().await {
        match cmd {
            ReceiverCommand::SelectSource { source, response } => {
                let result = receiver.select_source(&source).await;
                let _ = response.send(result);
            }

            ReceiverCommand::MuteVolume { mute, response } => {
                let result = receiver.mute_volume(mute).await;
                let _ = response.send(result);
            }

            ReceiverCommand::VolumeUp { response } => {
                let result = receiver.volume_up().await;
                let _ = response.send(result);
            }

            ReceiverCommand::VolumeDown { response } => {
                let result = receiver.volume_down().await;
                let _ = response.send(result);
            }

            ReceiverCommand::SendCommand { command, response } => {
                let result = receiver.send_command_token(&command).await;
                let _ = response.send(result);
            }

            ReceiverCommand::QueryStatus { response } => {
                let _ = response.send(receiver.status());
            }

            ReceiverCommand::Shutdown => {
                debug!("Shutdown requested for '{}'", receiver.identity().name);
                break;
            }
        }

        for event in receiver.drain_events() {
            let _ = event_tx.send(event).await;
        }
    }

    info!("Receiver actor stopped for '{}'", receiver.identity().name);
}

/// Cloneable front end for a running receiver actor
///
/// Mirrors the control surface: each method sends one command and waits for
/// its result.
#[derive(Debug, Clone)]
pub struct ReceiverHandle {
    cmd_tx: mpsc::Sender<ReceiverCommand>,
}

impl ReceiverHandle {
    /// Wrap the actor's command sender
    pub fn new(cmd_tx: mpsc::Sender<ReceiverCommand>) -> Self {
        Self { cmd_tx }
    }

    /// Select an input by label
    pub async fn select_source(&self, source: &str) -> Result<(), ReceiverError> {
        let source = source.to_string();
        self.request(|response| ReceiverCommand::SelectSource { source, response }).await
    }

    /// Mute request
    pub async fn mute_volume(&self, mute: bool) -> Result<(), ReceiverError> {
        self.request(|response| ReceiverCommand::MuteVolume { mute, response }).await
    }

    /// One volume step up
    pub async fn volume_up(&self) -> Result<(), ReceiverError> {
        self.request(|response| ReceiverCommand::VolumeUp { response }).await
    }

    /// One volume step down
    pub async fn volume_down(&self) -> Result<(), ReceiverError> {
        self.request(|response| ReceiverCommand::VolumeDown { response }).await
    }

    /// Raw command by token
    pub async fn send_command(&self, command: &str) -> Result<(), ReceiverError> {
        let command = command.to_string();
        self.request(|response| ReceiverCommand::SendCommand { command, response }).await
    }

    /// Believed state snapshot
    pub async fn status(&self) -> Result<ReceiverStatus, ReceiverError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(ReceiverCommand::QueryStatus { response: tx })
            .await
            .map_err(|_| ReceiverError::ActorClosed)?;
        rx.await.map_err(|_| ReceiverError::ActorClosed)
    }

    /// Ask the actor to stop
    pub async fn shutdown(&self) {
        let _ = self.cmd_tx.send(ReceiverCommand::Shutdown).await;
    }

    async fn request(
        &self,
        make: impl FnOnce(Reply) -> ReceiverCommand,
    ) -> Result<(), ReceiverError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(make(tx))
            .await
            .map_err(|_| ReceiverError::ActorClosed)?;
        rx.await.map_err(|_| ReceiverError::ActorClosed)?
    }
}
