//! PGN 130312 — Temperature.
use crate::error::DecodeError;
use crate::protocol::transport::can_id::{read_u16_le, write_u16_le};

use super::PgnMessage;

/// A single temperature reading and its setpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Temperature {
    pub sid: u8,
    pub instance: u8,
    pub source: u8,
    /// Actual temperature, kelvin.
    pub actual_temperature: f64,
    /// Setpoint temperature, kelvin.
    pub set_temperature: f64,
}

impl PgnMessage for Temperature {
    const PGN: u32 = 130312;
    const LEN: usize = 8;
    const DEFAULT_PRIORITY: u8 = 5;

    fn parse(data: &[u8]) -> Result<Self, DecodeError> {
        Ok(Temperature {
            sid: data[0],
            instance: data[1],
            source: data[2],
            actual_temperature: read_u16_le(data, 3) as f64 * 0.01,
            set_temperature: read_u16_le(data, 5) as f64 * 0.01,
        })
    }

    fn serialize(&self) -> Vec<u8> {
        let mut data = vec![0u8; Self::LEN];
        data[0] = self.sid;
        data[1] = self.instance;
        data[2] = self.source;
        write_u16_le(&mut data, 3, (self.actual_temperature / 0.01).round() as u16);
        write_u16_le(&mut data, 5, (self.set_temperature / 0.01).round() as u16);
        data
    }
}
