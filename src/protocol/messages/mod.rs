//! Closed registry of the NMEA 2000 message variants this crate decodes and
//! encodes (§3.3). Unknown PGNs are a typed error, not a silent default.
pub mod attitude;
pub mod cog_sog;
pub mod temperature;
pub mod vessel_speed;

pub use attitude::Attitude;
pub use cog_sog::CogSog;
pub use temperature::Temperature;
pub use vessel_speed::VesselSpeedComponents;

use crate::error::DecodeError;

/// Contract every registered PGN implements: its identity, wire length,
/// default transmit priority, and the parse/serialize pair (§9).
pub trait PgnMessage: Sized {
    const PGN: u32;
    const LEN: usize;
    const DEFAULT_PRIORITY: u8;

    /// Decodes `data`; the caller has already checked `data.len() >= LEN`.
    fn parse(data: &[u8]) -> Result<Self, DecodeError>;
    /// Encodes to exactly `LEN` bytes, zero-filling unused fields.
    fn serialize(&self) -> Vec<u8>;
}

/// One decoded NMEA 2000 message.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    CogSog(CogSog),
    Temperature(Temperature),
    Attitude(Attitude),
    VesselSpeedComponents(VesselSpeedComponents),
}

/// The PGN and wire bytes produced by [`serialize`].
pub struct SerializedMessage {
    pub pgn: u32,
    pub data: Vec<u8>,
}

/// Derives the PGN from `raw_id`, looks it up in the registry, and delegates
/// to the matching parser (§4.2).
pub fn parse(raw_id: u32, data: &[u8]) -> Result<Message, DecodeError> {
    let pgn = (raw_id >> 8) & 0x3FFFF;
    match pgn {
        CogSog::PGN => Ok(Message::CogSog(parse_checked::<CogSog>(pgn, data)?)),
        Temperature::PGN => Ok(Message::Temperature(parse_checked::<Temperature>(pgn, data)?)),
        Attitude::PGN => Ok(Message::Attitude(parse_checked::<Attitude>(pgn, data)?)),
        VesselSpeedComponents::PGN => Ok(Message::VesselSpeedComponents(parse_checked::<
            VesselSpeedComponents,
        >(pgn, data)?)),
        other => Err(DecodeError::UnsupportedPgn(other)),
    }
}

fn parse_checked<M: PgnMessage>(pgn: u32, data: &[u8]) -> Result<M, DecodeError> {
    if data.len() < M::LEN {
        return Err(DecodeError::ShortPayload {
            pgn,
            got: data.len(),
            expected: M::LEN,
        });
    }
    M::parse(data)
}

/// Encodes `msg` to its declared PGN and a fixed-length byte buffer (§4.2).
pub fn serialize(msg: &Message) -> SerializedMessage {
    match msg {
        Message::CogSog(m) => SerializedMessage {
            pgn: CogSog::PGN,
            data: m.serialize(),
        },
        Message::Temperature(m) => SerializedMessage {
            pgn: Temperature::PGN,
            data: m.serialize(),
        },
        Message::Attitude(m) => SerializedMessage {
            pgn: Attitude::PGN,
            data: m.serialize(),
        },
        Message::VesselSpeedComponents(m) => SerializedMessage {
            pgn: VesselSpeedComponents::PGN,
            data: m.serialize(),
        },
    }
}

/// Default transmit priority for `msg`'s variant (§4.2).
pub fn default_priority(msg: &Message) -> u8 {
    match msg {
        Message::CogSog(_) => CogSog::DEFAULT_PRIORITY,
        Message::Temperature(_) => Temperature::DEFAULT_PRIORITY,
        Message::Attitude(_) => Attitude::DEFAULT_PRIORITY,
        Message::VesselSpeedComponents(_) => VesselSpeedComponents::DEFAULT_PRIORITY,
    }
}
