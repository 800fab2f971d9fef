//! PGN 127257 — Attitude.
use crate::error::DecodeError;
use crate::protocol::transport::can_id::{read_i16_le, write_i16_le};

use super::PgnMessage;

/// Vessel attitude: yaw, pitch, and roll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attitude {
    pub sid: u8,
    /// Radians.
    pub yaw: f64,
    /// Radians.
    pub pitch: f64,
    /// Radians.
    pub roll: f64,
}

impl PgnMessage for Attitude {
    const PGN: u32 = 127257;
    const LEN: usize = 8;
    const DEFAULT_PRIORITY: u8 = 3;

    fn parse(data: &[u8]) -> Result<Self, DecodeError> {
        Ok(Attitude {
            sid: data[0],
            yaw: read_i16_le(data, 1) as f64 * 0.0001,
            pitch: read_i16_le(data, 3) as f64 * 0.0001,
            roll: read_i16_le(data, 5) as f64 * 0.0001,
        })
    }

    fn serialize(&self) -> Vec<u8> {
        let mut data = vec![0u8; Self::LEN];
        data[0] = self.sid;
        write_i16_le(&mut data, 1, (self.yaw / 0.0001).round() as i16);
        write_i16_le(&mut data, 3, (self.pitch / 0.0001).round() as i16);
        write_i16_le(&mut data, 5, (self.roll / 0.0001).round() as i16);
        data
    }
}
