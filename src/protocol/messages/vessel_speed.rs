//! PGN 130578 — Vessel Speed Components. Twelve bytes, always fragmented
//! across the Transport Protocol on transmit (§3.3).
use crate::error::DecodeError;
use crate::protocol::transport::can_id::{read_i16_le, write_i16_le};

use super::PgnMessage;

/// One water- and ground-referenced speed pair along an axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedPair {
    /// Metres per second, relative to water.
    pub water: f64,
    /// Metres per second, relative to ground.
    pub ground: f64,
}

/// Vessel speed resolved into longitudinal, transverse, and stern components.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VesselSpeedComponents {
    pub longitudinal: SpeedPair,
    pub transverse: SpeedPair,
    pub stern: SpeedPair,
}

const SCALE: f64 = 0.001;

impl PgnMessage for VesselSpeedComponents {
    const PGN: u32 = 130578;
    const LEN: usize = 12;
    const DEFAULT_PRIORITY: u8 = 3;

    fn parse(data: &[u8]) -> Result<Self, DecodeError> {
        Ok(VesselSpeedComponents {
            longitudinal: SpeedPair {
                water: read_i16_le(data, 0) as f64 * SCALE,
                ground: read_i16_le(data, 2) as f64 * SCALE,
            },
            transverse: SpeedPair {
                water: read_i16_le(data, 4) as f64 * SCALE,
                ground: read_i16_le(data, 6) as f64 * SCALE,
            },
            stern: SpeedPair {
                water: read_i16_le(data, 8) as f64 * SCALE,
                ground: read_i16_le(data, 10) as f64 * SCALE,
            },
        })
    }

    fn serialize(&self) -> Vec<u8> {
        let mut data = vec![0u8; Self::LEN];
        write_i16_le(&mut data, 0, (self.longitudinal.water / SCALE).round() as i16);
        write_i16_le(&mut data, 2, (self.longitudinal.ground / SCALE).round() as i16);
        write_i16_le(&mut data, 4, (self.transverse.water / SCALE).round() as i16);
        write_i16_le(&mut data, 6, (self.transverse.ground / SCALE).round() as i16);
        write_i16_le(&mut data, 8, (self.stern.water / SCALE).round() as i16);
        write_i16_le(&mut data, 10, (self.stern.ground / SCALE).round() as i16);
        data
    }
}
