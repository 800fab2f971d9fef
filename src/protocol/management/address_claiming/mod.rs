//! SAE J1939 / NMEA 2000 dynamic address-claim procedure (J1939-81, §4.4).
//!
//! Packs the local NAME, emits a claim for a candidate address, listens for
//! 250 ms for a contending claim, and applies the deterministic priority
//! rule (lower packed NAME wins) until the candidate settles, a conflict
//! forces the null address, or the candidate pool cycles back to the start.
use std::time::Duration;

use tokio::time::sleep;

use crate::error::ClaimError;
use crate::protocol::management::iso_name::IsoName;
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::can_id::CanId;
use crate::protocol::transport::traits::can_bus::CanTransport;

/// SAE J1939 PGN for Address Claimed / Cannot Claim.
pub const PGN_ADDRESS_CLAIM: u32 = 60928;
/// Fixed transmit priority for address-claim frames.
pub const CLAIM_PRIORITY: u8 = 6;
/// Global destination carried by every claim frame.
pub const GLOBAL_ADDRESS: u8 = 0xFF;
/// Reserved "no address" source, claimed when a non-arbitrary node loses.
pub const NULL_ADDRESS: u8 = 254;
/// Listening window after each emitted claim.
pub const CONTENTION_WINDOW: Duration = Duration::from_millis(250);
/// Size of the claimable address space (0..=251) probed when arbitrary
/// address capable.
const ADDRESS_MODULUS: u32 = 252;

/// Runs one full claim cycle over `transport` and returns the settled
/// source address, or a terminal [`ClaimError`] (§4.4, §8).
///
/// `transport` is exclusively owned for the duration of the call: callers
/// run this inside the single background task `Device` dedicates to
/// claiming (§5, §9).
pub async fn claim_address<T: CanTransport>(
    transport: &mut T,
    name: IsoName,
) -> Result<u8, ClaimError> {
    let raw_name = name.raw();
    let arbitrary_capable = name.is_arbitrary_address_capable();
    let start_address = (name.unique_number() % ADDRESS_MODULUS) as u8;
    let mut address = start_address;

    loop {
        emit_claim(transport, raw_name, address).await?;
        log::debug!("address-claim: probing candidate address {address}");

        if wait_for_settlement(transport, raw_name, address).await? {
            log::info!("address-claim: settled on address {address}");
            return Ok(address);
        }

        if !arbitrary_capable {
            log::warn!("address-claim: conflict at {address}, not arbitrary-address-capable");
            emit_claim(transport, raw_name, NULL_ADDRESS).await?;
            return Err(ClaimError::AddressConflictNotArbitrary);
        }

        address = ((address as u32 + 1) % ADDRESS_MODULUS) as u8;
        if address == start_address {
            log::warn!("address-claim: candidate pool exhausted, cycled back to {start_address}");
            return Err(ClaimError::NoAvailableAddress);
        }
    }
}

/// Waits up to [`CONTENTION_WINDOW`] for a contending claim on `address`.
/// Returns `Ok(true)` once the window elapses undisturbed (settled), or
/// `Ok(false)` as soon as a strictly-lower NAME claims the same address.
async fn wait_for_settlement<T: CanTransport>(
    transport: &mut T,
    raw_name: u64,
    address: u8,
) -> Result<bool, ClaimError> {
    let deadline = sleep(CONTENTION_WINDOW);
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            _ = &mut deadline => return Ok(true),
            frame = transport.recv_frame() => {
                let frame = frame.map_err(ClaimError::SendFailure)?;
                if !is_contending_claim(&frame, address) {
                    continue;
                }
                let their_name = u64::from_le_bytes(frame.data);
                if their_name < raw_name {
                    log::debug!(
                        "address-claim: lost {address} to contending NAME {their_name:#x}"
                    );
                    return Ok(false);
                }
                // Equal or higher NAME: not a winning contender, keep listening.
            }
        }
    }
}

/// `true` when `frame` is an Address Claim frame contending for `address`.
fn is_contending_claim(frame: &CanFrame, address: u8) -> bool {
    frame.id.pgn() == PGN_ADDRESS_CLAIM && frame.id.source_address() == address
}

/// Emits a claim (or defense) frame asserting `address` under `raw_name`.
async fn emit_claim<T: CanTransport>(
    transport: &mut T,
    raw_name: u64,
    address: u8,
) -> Result<(), ClaimError> {
    let id = CanId::builder(PGN_ADDRESS_CLAIM, address)
        .with_priority(CLAIM_PRIORITY)
        .to_destination(GLOBAL_ADDRESS)
        .build()
        .expect("address-claim frame uses a fixed, always-valid PDU1 PGN");
    let frame = CanFrame {
        id,
        data: raw_name.to_le_bytes(),
        len: 8,
    };
    transport
        .send_frame(&frame)
        .await
        .map_err(ClaimError::SendFailure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IoError;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    /// In-memory transport: a queue of frames to return from `recv_frame`
    /// and a log of everything written via `send_frame`.
    #[derive(Clone, Default)]
    struct MockTransport {
        inbound: Arc<Mutex<VecDeque<CanFrame>>>,
        outbound: Arc<Mutex<Vec<CanFrame>>>,
    }

    impl MockTransport {
        fn with_inbound(frames: Vec<CanFrame>) -> Self {
            Self {
                inbound: Arc::new(Mutex::new(frames.into())),
                outbound: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn sent(&self) -> Vec<CanFrame> {
            self.outbound.lock().unwrap().clone()
        }
    }

    impl CanTransport for MockTransport {
        async fn send_frame(&mut self, frame: &CanFrame) -> Result<(), IoError> {
            self.outbound.lock().unwrap().push(frame.clone());
            Ok(())
        }

        async fn recv_frame(&mut self) -> Result<CanFrame, IoError> {
            loop {
                if let Some(frame) = self.inbound.lock().unwrap().pop_front() {
                    return Ok(frame);
                }
                // No more scripted frames: stall forever so the 250 ms
                // contention timer is what resolves the call.
                std::future::pending::<()>().await;
            }
        }
    }

    fn claim_frame(name: u64, address: u8) -> CanFrame {
        let id = CanId::builder(PGN_ADDRESS_CLAIM, address)
            .to_destination(GLOBAL_ADDRESS)
            .with_priority(CLAIM_PRIORITY)
            .build()
            .unwrap();
        CanFrame {
            id,
            data: name.to_le_bytes(),
            len: 8,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn settles_on_the_preferred_address_with_no_contention() {
        let mut transport = MockTransport::default();
        let name = IsoName::builder()
            .unique_number(42)
            .arbitrary_address_capable(true)
            .build();

        let address = claim_address(&mut transport, name).await.unwrap();
        assert_eq!(address, 42);
        assert_eq!(transport.sent().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn arbitrary_capable_node_advances_past_a_losing_contention() {
        let name = IsoName::builder()
            .unique_number(42)
            .arbitrary_address_capable(true)
            .build();
        // A lower NAME (all zero bits) contends for our preferred address.
        let mut transport = MockTransport::with_inbound(vec![claim_frame(0, 42)]);

        let address = claim_address(&mut transport, name).await.unwrap();
        assert_eq!(address, 43);
        // One claim for 42 (lost), one for 43 (settled).
        let sent = transport.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].id.source_address(), 42);
        assert_eq!(sent[1].id.source_address(), 43);
    }

    #[tokio::test(start_paused = true)]
    async fn non_arbitrary_node_fails_terminally_and_defends_the_null_address() {
        let name = IsoName::builder()
            .unique_number(42)
            .arbitrary_address_capable(false)
            .build();
        let mut transport = MockTransport::with_inbound(vec![claim_frame(0, 42)]);

        let err = claim_address(&mut transport, name).await.unwrap_err();
        assert!(matches!(err, ClaimError::AddressConflictNotArbitrary));

        let sent = transport.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[1].id.source_address(), NULL_ADDRESS);
        assert_eq!(u64::from_le_bytes(sent[1].data), name.raw());
    }

    #[tokio::test(start_paused = true)]
    async fn higher_or_equal_contending_name_is_ignored() {
        let name = IsoName::builder()
            .unique_number(42)
            .arbitrary_address_capable(true)
            .build();
        // Contender NAME is numerically higher: does not win, we settle.
        let mut transport = MockTransport::with_inbound(vec![claim_frame(u64::MAX, 42)]);

        let address = claim_address(&mut transport, name).await.unwrap();
        assert_eq!(address, 42);
    }

    #[tokio::test(start_paused = true)]
    async fn cycling_back_to_the_start_address_is_a_terminal_error() {
        let name = IsoName::builder()
            .unique_number(0)
            .arbitrary_address_capable(true)
            .build();
        // A contender claims every address in the 252-entry pool in order,
        // forcing us to exhaust it and cycle back to the start.
        let frames = (0u32..252).map(|addr| claim_frame(0, addr as u8)).collect();
        let mut transport = MockTransport::with_inbound(frames);

        let err = claim_address(&mut transport, name).await.unwrap_err();
        assert!(matches!(err, ClaimError::NoAvailableAddress));
    }
}
