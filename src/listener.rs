//! Passive NMEA 2000 participant (C6, §4.6): reads frames from a transport,
//! feeds Transport Protocol frames to the reassembler, and surfaces one
//! decoded message per successful [`Listener::read`].
use crate::error::ReadError;
use crate::protocol::messages::{parse, Message};
use crate::protocol::transport::traits::can_bus::CanTransport;
use crate::protocol::transport::transport_protocol::{ProcessResult, Reassembler};

/// A read loop bound to one CAN transport (§3.5, §5).
///
/// `read` is blocking relative to the caller (it loops internally until a
/// message is ready); the caller is expected to externally multiplex (e.g.
/// poll the socket for readability) before calling it, and must not call
/// `read` concurrently on the same `Listener`.
pub struct Listener<C: CanTransport> {
    connection: C,
    reassembler: Reassembler,
}

impl<C: CanTransport> Listener<C> {
    /// Wraps `connection`, taking exclusive ownership of it.
    pub fn new(connection: C) -> Self {
        Self {
            connection,
            reassembler: Reassembler::new(),
        }
    }

    /// Reads frames until one yields a decoded message (§4.6).
    ///
    /// Transport Protocol BAM/DT frames are fed to the reassembler and do
    /// not themselves produce a result; a reassembly fault is surfaced to
    /// this call but does not poison other in-flight per-source transfers.
    /// Every other frame is parsed directly via the PGN registry.
    pub async fn read(&mut self) -> Result<Message, ReadError> {
        loop {
            let frame = self.connection.recv_frame().await?;
            let source = frame.id.source_address();
            let pdu_format = frame.id.pdu_format();

            match self
                .reassembler
                .process_frame(source, pdu_format, &frame.data)
            {
                Ok(ProcessResult::Ignored) => {
                    let data = &frame.data[..frame.len];
                    return Ok(parse(frame.id.0, data)?);
                }
                Ok(ProcessResult::FrameConsumed) => continue,
                Ok(ProcessResult::MessageComplete { pgn, payload }) => {
                    return Ok(parse(pgn << 8, &payload)?);
                }
                Err(err) => {
                    log::warn!("transport-protocol fault from source {source}: {err}");
                    return Err(err.into());
                }
            }
        }
    }
}
