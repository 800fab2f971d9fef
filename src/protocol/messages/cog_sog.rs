//! PGN 129026 — COG & SOG, Rapid Update.
use crate::error::DecodeError;
use crate::protocol::transport::can_id::{read_u16_le, write_u16_le};

use super::PgnMessage;

/// Course and speed over ground.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CogSog {
    pub sid: u8,
    /// `0` = true, `1` = magnetic.
    pub cog_reference: u8,
    /// Course over ground, radians.
    pub cog: f64,
    /// Speed over ground, metres per second.
    pub sog: f64,
}

impl PgnMessage for CogSog {
    const PGN: u32 = 129026;
    const LEN: usize = 8;
    const DEFAULT_PRIORITY: u8 = 2;

    fn parse(data: &[u8]) -> Result<Self, DecodeError> {
        Ok(CogSog {
            sid: data[0],
            cog_reference: data[1] & 0x03,
            cog: read_u16_le(data, 2) as f64 * 0.0001,
            sog: read_u16_le(data, 4) as f64 * 0.01,
        })
    }

    fn serialize(&self) -> Vec<u8> {
        let mut data = vec![0u8; Self::LEN];
        data[0] = self.sid;
        data[1] = self.cog_reference & 0x03;
        write_u16_le(&mut data, 2, (self.cog / 0.0001).round() as u16);
        write_u16_le(&mut data, 4, (self.sog / 0.01).round() as u16);
        data
    }
}
