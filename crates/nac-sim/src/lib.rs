//! NAC Simulation Library
//!
//! This crate provides a simulation layer for exercising the receiver engine
//! without a Broadlink blaster or a preamplifier on the bench. It includes:
//!
//! - **VirtualBlaster**: a [`Transport`](nac_receiver::Transport) that validates
//!   payloads, records sends and can be scripted to fail
//! - **VirtualAmplifier**: a preamplifier that tracks its actual input, mute
//!   and volume from the commands that reach it
//!
//! # Example
//!
//! ```rust
//! use nac_codes::{CommandId, SlotId};
//! use nac_receiver::{validate, RawSetupInput, Receiver};
//! use nac_sim::{VirtualAmplifier, VirtualBlaster};
//!
//! # tokio_test_block(async {
//! let blaster = VirtualBlaster::with_amplifier("rm4", VirtualAmplifier::new("nac"));
//!
//! let raw = RawSetupInput {
//!     name: Some("Lounge".into()),
//!     broadlink: Some("remote.rm4".into()),
//!     ..RawSetupInput::with_defaults()
//! };
//! let mut receiver = Receiver::new(&validate(&raw).unwrap(), blaster.clone());
//!
//! receiver.select_source("Tuner").await.unwrap();
//!
//! assert_eq!(blaster.sent_commands(), vec![CommandId::Three]);
//! assert_eq!(blaster.amplifier().unwrap().input, SlotId::Three);
//! # });
//! # fn tokio_test_block(f: impl std::future::Future<Output = ()>) {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

pub mod amplifier;
pub mod blaster;

pub use amplifier::{AmplifierSnapshot, VirtualAmplifier};
pub use blaster::{SentCommand, VirtualBlaster};
