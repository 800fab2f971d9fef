//! Creation and extraction of the 29-bit extended CAN identifiers used by
//! NMEA 2000 (derived from the SAE J1939 specification), plus the
//! little-endian field accessors the PGN codec builds on.
use thiserror::Error;

/// Failures building a [`CanId`] from a PGN and source/destination pair.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanIdBuildError {
    /// Attempted to build a broadcast message (PDU2, PF ≥ 240) with a destination.
    #[error("PGN {pf:#04x} is broadcast-only (PDU2); it cannot carry a destination")]
    InvalidForBroadcast { pf: u8 },
    /// Attempted to build an addressed message (PDU1, PF < 240) without a destination.
    #[error("PGN {pf:#04x} requires a destination (PDU1)")]
    InvalidForFocusedMessage { pf: u8 },
    /// PDU1 PGNs must carry a zero low byte; the destination is supplied separately.
    #[error("PDU1 PGNs require the low PGN byte to be zero")]
    PsFocusMessageMustBeNull,
}

//==================================================================================CAN_ID
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Encapsulates an extended CAN identifier (29 bits) and exposes accessors
/// for priority, PGN, destination, and source (§3.1).
pub struct CanId(pub u32);

impl CanId {
    /// Creates a pre-configured [`CanIdBuilder`] for a PGN and source address.
    pub fn builder(pgn: u32, source_address: u8) -> CanIdBuilder {
        CanIdBuilder::new(pgn, source_address)
    }

    /// Returns the priority (3 bits, 0 = highest) encoded in the CAN ID.
    pub fn priority(&self) -> u8 {
        ((self.0 >> 26) & 0x07) as u8
    }

    /// Extracts the 18-bit PGN, handling the PDU1/PDU2 distinction (§3.1):
    /// for PDU1 frames (`PF < 0xF0`) the PS byte is a destination address,
    /// not part of the PGN, and must read back as zero.
    pub fn pgn(&self) -> u32 {
        let raw = (self.0 >> 8) & 0x3FFFF;
        if self.pdu_format() < 0xF0 {
            raw & !0xFF
        } else {
            raw
        }
    }

    /// PDU-Format byte (bits 16-23). `PF >= 0xF0` marks a broadcast PGN.
    pub fn pdu_format(&self) -> u8 {
        ((self.0 >> 16) & 0xFF) as u8
    }

    /// Returns the destination address (PDU1) when the PGN requires one.
    pub fn destination(&self) -> Option<u8> {
        if self.pdu_format() >= 0xF0 {
            None
        } else {
            Some(((self.0 >> 8) & 0xFF) as u8)
        }
    }

    /// Eight-bit source address (logical node identifier on the N2K network).
    pub fn source_address(&self) -> u8 {
        (self.0 & 0xFF) as u8
    }
}

/// Packs priority/PGN/PS/source into a 29-bit extended identifier, setting
/// the extended-frame bit so the value drops straight into a raw CAN ID.
///
/// The PDU-Format byte and the data-page/reserved bits are both taken from
/// `pgn` (bits 8-25 of the resulting ID mirror `pgn`'s own 18 bits), so the
/// ID always round-trips through [`CanId::pgn`]; `ps` is supplied
/// separately since it differs between a broadcast PGN (part of the PGN
/// itself) and an addressed one (an explicit destination).
pub fn pack_id(priority: u8, pgn: u32, ps: u8, source_address: u8) -> u32 {
    let pf = ((pgn >> 8) & 0xFF) as u32;
    let data_page = (pgn >> 16) & 0x01;
    let reserved = (pgn >> 17) & 0x01;
    crate::connection::CAN_EFF_FLAG
        | ((priority as u32 & 0x07) << 26)
        | (reserved << 25)
        | (data_page << 24)
        | (pf << 16)
        | ((ps as u32) << 8)
        | (source_address as u32)
}

/// Reads a little-endian `u16` from `buffer` at `offset`.
pub fn read_u16_le(buffer: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([buffer[offset], buffer[offset + 1]])
}

/// Reads a little-endian `i16` from `buffer` at `offset`.
pub fn read_i16_le(buffer: &[u8], offset: usize) -> i16 {
    i16::from_le_bytes([buffer[offset], buffer[offset + 1]])
}

/// Writes a little-endian `u16` into `buffer` at `offset`.
pub fn write_u16_le(buffer: &mut [u8], offset: usize, value: u16) {
    buffer[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
}

/// Writes a little-endian `i16` into `buffer` at `offset`.
pub fn write_i16_le(buffer: &mut [u8], offset: usize, value: i16) {
    buffer[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
}

//==================================================================================CAN_ID_BUILDER
#[derive(Debug)]
/// Fluent builder that enforces the PDU1/PDU2 rules.
pub struct CanIdBuilder {
    priority: u8,
    pgn: u32,
    source_address: u8,
    destination: Option<u8>,
}

impl CanIdBuilder {
    /// Initializes the builder for a given PGN and source address, defaulting
    /// to priority 6 (the J1939 "informational" default).
    pub fn new(pgn: u32, source_address: u8) -> Self {
        Self {
            priority: 6,
            pgn,
            source_address,
            destination: None,
        }
    }

    /// Sets the priority (3 bits, extra bits are masked off).
    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority & 0x07;
        self
    }

    /// Assigns a destination address (PDU1). Implies a directed message.
    pub fn to_destination(mut self, destination_address: u8) -> Self {
        self.destination = Some(destination_address);
        self
    }

    /// Builds the CAN identifier while applying J1939 rules:
    /// - PF < 0xF0 → addressed message (PDU1): `destination` mandatory and the
    ///   PGN's low byte must be `0`.
    /// - PF ≥ 0xF0 → broadcast (PDU2): `destination` must not be provided.
    pub fn build(self) -> Result<CanId, CanIdBuildError> {
        let pf = ((self.pgn >> 8) & 0xFF) as u8;
        let ps_from_pgn = (self.pgn & 0xFF) as u8;

        match self.destination {
            None => {
                if pf < 0xF0 {
                    return Err(CanIdBuildError::InvalidForFocusedMessage { pf });
                }
                Ok(CanId(pack_id(
                    self.priority,
                    self.pgn,
                    ps_from_pgn,
                    self.source_address,
                )))
            }
            Some(destination) => {
                if pf >= 0xF0 {
                    return Err(CanIdBuildError::InvalidForBroadcast { pf });
                }
                if ps_from_pgn != 0 {
                    return Err(CanIdBuildError::PsFocusMessageMustBeNull);
                }
                Ok(CanId(pack_id(
                    self.priority,
                    self.pgn,
                    destination,
                    self.source_address,
                )))
            }
        }
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
