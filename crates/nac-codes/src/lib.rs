//! NAC Infrared Code Library
//!
//! This crate holds the fixed vocabulary for driving a Naim NAC preamplifier
//! through a Broadlink IR blaster:
//!
//! - **CommandId**: every code the adapter can emit (six inputs, volume step, mute)
//! - **SlotId**: the six physical inputs, each selected by one `CommandId`
//! - **SourceLabel**: the closed set of names a user may give an input
//! - **CommandTable**: total mapping from `CommandId` to a pre-captured payload
//!
//! Payloads are opaque to everything but the blaster. The `broadlink` module
//! can read a packet back for inspection but never builds one.
//!
//! # Example
//!
//! ```rust
//! use nac_codes::{CommandId, CommandTable, SlotId};
//!
//! let cmd: CommandId = "three".parse().unwrap();
//! assert_eq!(cmd.slot(), Some(SlotId::Three));
//!
//! let payload = CommandTable::lookup(cmd);
//! assert!(payload.to_command_arg().starts_with("b64:"));
//! ```

pub mod broadlink;
pub mod command;
pub mod error;
pub mod source;
pub mod table;

pub use broadlink::{BroadlinkPacket, PacketKind};
pub use command::{CommandId, SlotId};
pub use error::ParseError;
pub use source::SourceLabel;
pub use table::{CommandTable, TransmitPayload};
