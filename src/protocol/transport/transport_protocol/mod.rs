//! J1939-21 Transport Protocol, broadcast (BAM) variant only: reassembly of
//! multi-frame PGNs on the receive side, and segmentation on the send side.
//! The connection-mode RTS/CTS variant and NMEA Fast-Packet are out of scope.

pub mod assembler;
pub mod builder;

pub use assembler::{ProcessResult, Reassembler};
pub use builder::build_frames;

/// PDU-Format of a BAM announce frame.
pub const PF_BAM: u8 = 0xEC;
/// PDU-Format of a Transport Protocol data frame.
pub const PF_DT: u8 = 0xEB;
/// Control byte identifying a BAM announce within the first TP.CM frame.
pub const BAM_CONTROL_BYTE: u8 = 0x20;
