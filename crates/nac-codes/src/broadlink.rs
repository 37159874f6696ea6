//! Broadlink packet inspection
//!
//! Payloads are never built here, only read back. The simulator uses this to
//! reject blobs a real blaster would refuse, and tests use it to check the
//! command table.
//!
//! Packet layout:
//!
//! ```text
//! [type] [repeat] [len lo] [len hi] [pulse data; len bytes] [zero padding]
//! ```
//!
//! Each pulse is one tick count (1 tick = 8192/269 µs). Counts above 255 are
//! written as `0x00` followed by a big-endian `u16`. A long trailing gap
//! (`00 0D 05`) closes the burst.

use tracing::trace;

use crate::error::ParseError;

const HEADER_LEN: usize = 4;

/// Carrier a packet is meant for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketKind {
    /// Infrared, 38 kHz
    Ir,
    /// 433 MHz RF
    Rf433,
    /// 315 MHz RF
    Rf315,
}

impl PacketKind {
    fn from_byte(b: u8) -> Result<Self, ParseError> {
        match b {
            0x26 => Ok(Self::Ir),
            0xB2 => Ok(Self::Rf433),
            0xD7 => Ok(Self::Rf315),
            other => Err(ParseError::UnsupportedPacketType(other)),
        }
    }
}

/// A decoded Broadlink packet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BroadlinkPacket {
    /// Carrier type
    pub kind: PacketKind,
    /// Extra repeats the blaster adds on its own
    pub repeat: u8,
    /// Alternating mark/space durations in microseconds, starting with a mark
    pub pulses: Vec<u32>,
}

impl BroadlinkPacket {
    /// Parse a packet from raw bytes
    pub fn parse(data: &[u8]) -> Result<Self, ParseError> {
        if data.len() < HEADER_LEN {
            return Err(ParseError::Truncated {
                needed: HEADER_LEN - data.len(),
            });
        }

        let kind = PacketKind::from_byte(data[0])?;
        let repeat = data[1];
        let len = u16::from_le_bytes([data[2], data[3]]) as usize;

        let body = &data[HEADER_LEN..];
        if body.len() < len {
            return Err(ParseError::Truncated {
                needed: len - body.len(),
            });
        }
        trace!(
            "Broadlink packet {:?}: {} data bytes, {} padding",
            kind,
            len,
            body.len() - len
        );

        let mut pulses = Vec::new();
        let mut iter = body[..len].iter().copied();
        while let Some(b) = iter.next() {
            let ticks = if b == 0 {
                match (iter.next(), iter.next()) {
                    (Some(hi), Some(lo)) => u16::from_be_bytes([hi, lo]) as u32,
                    _ => return Err(ParseError::Truncated { needed: 2 }),
                }
            } else {
                b as u32
            };
            pulses.push(ticks_to_us(ticks));
        }

        Ok(Self {
            kind,
            repeat,
            pulses,
        })
    }

    /// Returns true for infrared packets
    pub fn is_ir(&self) -> bool {
        self.kind == PacketKind::Ir
    }

    /// Total burst length in microseconds, including the trailing gap
    pub fn duration_us(&self) -> u64 {
        self.pulses.iter().map(|&p| p as u64).sum()
    }
}

fn ticks_to_us(ticks: u32) -> u32 {
    ticks * 8192 / 269
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CommandId, CommandTable};

    #[test]
    fn test_parse_input_one() {
        let bytes = CommandTable::lookup(CommandId::One).decode().unwrap();
        let packet = BroadlinkPacket::parse(&bytes).unwrap();

        assert!(packet.is_ir());
        assert_eq!(packet.repeat, 0);
        // 29 ticks is one RC-5 half bit
        assert_eq!(packet.pulses[0], 883);
        // Escaped trailing gap
        assert_eq!(*packet.pulses.last().unwrap(), 101_501);
    }

    #[test]
    fn test_every_command_is_ir() {
        for id in CommandId::ALL {
            let bytes = CommandTable::lookup(id).decode().unwrap();
            let packet = BroadlinkPacket::parse(&bytes).unwrap();
            assert!(packet.is_ir());
            // Two RC-5 frames and their gaps run close to 200 ms
            assert!(packet.duration_us() > 150_000, "{id}: {}", packet.duration_us());
        }
    }

    #[test]
    fn test_rejects_short_header() {
        assert_eq!(
            BroadlinkPacket::parse(&[0x26, 0x00]),
            Err(ParseError::Truncated { needed: 2 })
        );
    }

    #[test]
    fn test_rejects_length_overrun() {
        assert_eq!(
            BroadlinkPacket::parse(&[0x26, 0x00, 0x05, 0x00, 0x1D]),
            Err(ParseError::Truncated { needed: 4 })
        );
    }

    #[test]
    fn test_rejects_dangling_escape() {
        assert_eq!(
            BroadlinkPacket::parse(&[0x26, 0x00, 0x02, 0x00, 0x00, 0x0D]),
            Err(ParseError::Truncated { needed: 2 })
        );
    }

    #[test]
    fn test_rejects_unknown_type() {
        assert_eq!(
            BroadlinkPacket::parse(&[0x42, 0x00, 0x00, 0x00]),
            Err(ParseError::UnsupportedPacketType(0x42))
        );
    }

    #[test]
    fn test_rf_packet_kind() {
        let packet = BroadlinkPacket::parse(&[0xB2, 0x03, 0x02, 0x00, 0x10, 0x20]).unwrap();
        assert_eq!(packet.kind, PacketKind::Rf433);
        assert!(!packet.is_ir());
        assert_eq!(packet.repeat, 3);
        assert_eq!(packet.pulses.len(), 2);
    }

    proptest::proptest! {
        #[test]
        fn parse_never_panics(data in proptest::collection::vec(proptest::num::u8::ANY, 0..64)) {
            let _ = BroadlinkPacket::parse(&data);
        }
    }
}
