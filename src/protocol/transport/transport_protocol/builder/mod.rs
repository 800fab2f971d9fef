//! Segmentation of an outbound PGN payload into a BAM announce followed by
//! DT data frames (§4.5, §6.2). Used whenever a serialized message exceeds
//! a single CAN frame's eight bytes.
use crate::error::CanIdBuildError;
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::can_id::CanId;
use crate::protocol::transport::transport_protocol::BAM_CONTROL_BYTE;

const TP_CM_PGN: u32 = 0xEC00;
const TP_DT_PGN: u32 = 0xEB00;
const GLOBAL_ADDRESS: u8 = 0xFF;

/// Builds the BAM announce frame followed by `ceil(len/7)` DT frames
/// carrying `payload`, in order. Frames are issued as a single `Vec` so the
/// caller can write them to the bus back-to-back without interleaving.
pub fn build_frames(
    pgn: u32,
    priority: u8,
    source_address: u8,
    payload: &[u8],
) -> Result<Vec<CanFrame>, CanIdBuildError> {
    let total_size = payload.len();
    let total_packets = total_size.div_ceil(7) as u8;

    let bam_id = CanId::builder(TP_CM_PGN, source_address)
        .with_priority(priority)
        .to_destination(GLOBAL_ADDRESS)
        .build()?;
    let mut bam_data = [0xFFu8; 8];
    bam_data[0] = BAM_CONTROL_BYTE;
    bam_data[1] = (total_size & 0xFF) as u8;
    bam_data[2] = ((total_size >> 8) & 0xFF) as u8;
    bam_data[3] = total_packets;
    bam_data[4] = 0xFF;
    bam_data[5] = (pgn & 0xFF) as u8;
    bam_data[6] = ((pgn >> 8) & 0xFF) as u8;
    bam_data[7] = ((pgn >> 16) & 0xFF) as u8;

    let mut frames = Vec::with_capacity(1 + total_packets as usize);
    frames.push(CanFrame {
        id: bam_id,
        data: bam_data,
        len: 8,
    });

    let dt_id = CanId::builder(TP_DT_PGN, source_address)
        .with_priority(priority)
        .to_destination(GLOBAL_ADDRESS)
        .build()?;

    for seq in 1..=total_packets {
        let mut data = [0xFFu8; 8];
        data[0] = seq;
        let offset = (seq as usize - 1) * 7;
        let take = (total_size - offset).min(7);
        data[1..1 + take].copy_from_slice(&payload[offset..offset + take]);
        frames.push(CanFrame {
            id: dt_id,
            data,
            len: 8,
        });
    }

    Ok(frames)
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
