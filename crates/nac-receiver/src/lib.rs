//! NAC Receiver Engine
//!
//! This crate turns high-level control intents for a Naim NAC preamplifier
//! ("select CD", "mute", "volume up") into pre-captured IR commands sent
//! through a Broadlink blaster, and keeps track of what the preamplifier is
//! believed to be doing.
//!
//! # Architecture
//!
//! The preamplifier has no feedback channel. The receiver therefore tracks
//! *believed* state: the last source selected and the mute flag as last
//! toggled, both updated only after the transport accepts the command.
//!
//! - **SourceRegistry**: binds the six input slots to user-chosen labels
//! - **Receiver**: the state machine; one transmission per intent
//! - **validate**: checks setup input before a receiver is built
//! - **Transport**: the seam to whatever actually emits IR
//! - **run_receiver_actor**: runs a receiver in its own task, one intent at a time
//!
//! # Example
//!
//! ```rust,no_run
//! use nac_receiver::{validate, RawSetupInput, Receiver, ServiceCallTransport};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut raw = RawSetupInput::with_defaults();
//! raw.name = Some("Lounge".into());
//! raw.broadlink = Some("remote.lounge_rm4".into());
//!
//! let config = validate(&raw)?;
//! let mut receiver = Receiver::new(&config, ServiceCallTransport::new(tokio::io::stdout()));
//!
//! receiver.select_source("CD").await?;
//! receiver.mute_volume(true).await?;
//! assert!(receiver.is_muted());
//! # Ok(())
//! # }
//! ```

pub mod actor;
pub mod error;
pub mod events;
pub mod receiver;
pub mod registry;
pub mod setup;
pub mod state;
pub mod transport;

// Re-export actor types
pub use actor::{run_receiver_actor, ReceiverCommand, ReceiverHandle};

pub use error::{ReceiverError, TransportError, ValidationError};
pub use events::ReceiverEvent;
pub use receiver::{Receiver, VolumeDirection};
pub use registry::SourceRegistry;
pub use setup::{validate, RawSetupInput, ValidatedConfiguration};
pub use state::{
    BelievedState, DeviceIdentity, DeviceInfo, Feature, MuteBehavior, PowerState, ReceiverStatus,
    SUPPORTED_FEATURES,
};
pub use transport::{
    SendCommandData, SendPolicy, ServiceCall, ServiceCallTransport, Transport, TransportTarget,
};
