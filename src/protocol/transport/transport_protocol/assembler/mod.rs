//! Per-source reassembly of J1939 Transport Protocol broadcast transfers.
use std::collections::HashMap;

use crate::error::DecodeError;
use crate::protocol::transport::transport_protocol::{BAM_CONTROL_BYTE, PF_BAM, PF_DT};

/// In-flight state for one source's broadcast transfer, installed on BAM and
/// consumed frame-by-frame by subsequent DT frames.
struct TransferState {
    total_size: usize,
    total_packets: u8,
    pgn: u32,
    buffer: Vec<u8>,
    next_expected_seq: u8,
}

/// Outcome of feeding one frame to the reassembler.
#[derive(Debug, PartialEq, Eq)]
pub enum ProcessResult {
    /// The frame was not part of a Transport Protocol exchange.
    Ignored,
    /// The frame advanced an in-flight transfer but did not complete it.
    FrameConsumed,
    /// The final DT frame arrived; the payload is ready for the PGN codec.
    MessageComplete { pgn: u32, payload: Vec<u8> },
}

/// Tracks one in-flight BAM transfer per source address (§3.4, §4.3).
#[derive(Default)]
pub struct Reassembler {
    transfers: HashMap<u8, TransferState>,
}

impl Reassembler {
    /// Creates an empty reassembler with no in-flight transfers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one received frame to the reassembler. `pf` is the frame's
    /// PDU-Format byte; `data` its full 8-byte payload.
    pub fn process_frame(
        &mut self,
        source_address: u8,
        pf: u8,
        data: &[u8; 8],
    ) -> Result<ProcessResult, DecodeError> {
        match pf {
            PF_BAM if data[0] == BAM_CONTROL_BYTE => {
                let total_size = data[1] as usize | ((data[2] as usize) << 8);
                let total_packets = data[3];
                let pgn = data[5] as u32 | ((data[6] as u32) << 8) | ((data[7] as u32) << 16);

                log::debug!(
                    "TP.BAM from {source_address}: pgn {pgn}, {total_size} bytes over {total_packets} packets"
                );
                self.transfers.insert(
                    source_address,
                    TransferState {
                        total_size,
                        total_packets,
                        pgn,
                        buffer: vec![0u8; total_size],
                        next_expected_seq: 1,
                    },
                );
                Ok(ProcessResult::FrameConsumed)
            }
            PF_DT => self.process_dt(source_address, data),
            _ => Ok(ProcessResult::Ignored),
        }
    }

    fn process_dt(
        &mut self,
        source_address: u8,
        data: &[u8; 8],
    ) -> Result<ProcessResult, DecodeError> {
        let Some(transfer) = self.transfers.get_mut(&source_address) else {
            return Err(DecodeError::UnexpectedDataPacket(source_address));
        };

        let seq = data[0];
        if seq != transfer.next_expected_seq {
            let expected = transfer.next_expected_seq;
            self.transfers.remove(&source_address);
            return Err(DecodeError::OutOfOrder { expected, got: seq });
        }

        let offset = (seq as usize - 1) * 7;
        let remaining = transfer.total_size.saturating_sub(offset);
        let take = remaining.min(7);
        transfer.buffer[offset..offset + take].copy_from_slice(&data[1..1 + take]);
        transfer.next_expected_seq += 1;

        if seq == transfer.total_packets {
            let transfer = self.transfers.remove(&source_address).expect("present");
            return Ok(ProcessResult::MessageComplete {
                pgn: transfer.pgn,
                payload: transfer.buffer,
            });
        }

        Ok(ProcessResult::FrameConsumed)
    }
}
