//! Active NMEA 2000 participant (C5, §4.5): claims a J1939 source address,
//! then routes outgoing messages to a single CAN frame or to the Transport
//! Protocol broadcast (BAM) encoder depending on their serialized length.
use std::sync::atomic::{AtomicBool, AtomicU16, Ordering};
use std::sync::Arc;

use tokio::sync::{Mutex, Notify};

use crate::error::{ClaimError, SendError};
use crate::protocol::management::address_claiming::claim_address;
use crate::protocol::management::iso_name::IsoName;
use crate::protocol::messages::{default_priority, serialize, Message};
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::can_id::CanId;
use crate::protocol::transport::traits::can_bus::CanTransport;
use crate::protocol::transport::transport_protocol::build_frames;

/// Sentinel stored in `address` while no claim has settled yet.
const NO_ADDRESS: u16 = u16::MAX;

/// An NMEA 2000 device bound to one CAN transport (§3.5, §5).
///
/// `Device` exclusively owns its `connection` and releases it on every exit
/// path (`close`, drop). The address-claim procedure runs as a single
/// dedicated background task; [`Device::claim`] may be called concurrently
/// (e.g. from two tasks sharing `&Device`), and a second call observed
/// while one is in flight fails fast with
/// [`ClaimError::ClaimAlreadyInProgress`] without disturbing the first.
pub struct Device<C: CanTransport + Send + 'static> {
    connection: Arc<Mutex<C>>,
    address: AtomicU16,
    claim_in_flight: AtomicBool,
    claim_done: Notify,
}

impl<C: CanTransport + Send + 'static> Device<C> {
    /// Wraps `connection`, taking exclusive ownership of it.
    pub fn new(connection: C) -> Self {
        Self {
            connection: Arc::new(Mutex::new(connection)),
            address: AtomicU16::new(NO_ADDRESS),
            claim_in_flight: AtomicBool::new(false),
            claim_done: Notify::new(),
        }
    }

    /// The settled source address, or `None` before a successful [`Device::claim`].
    pub fn address(&self) -> Option<u8> {
        match self.address.load(Ordering::Acquire) {
            NO_ADDRESS => None,
            addr => Some(addr as u8),
        }
    }

    /// Runs the J1939 dynamic address-claim procedure for `name` (§4.4).
    ///
    /// On success, the claimed address becomes observable via
    /// [`Device::address`] via a single atomic publish. A claim already in
    /// flight on this device is rejected immediately; once a claim
    /// completes (successfully or not), a fresh one may be issued and
    /// resolves independently.
    pub async fn claim(&self, name: IsoName) -> Result<(), ClaimError> {
        if self.claim_in_flight.swap(true, Ordering::AcqRel) {
            return Err(ClaimError::ClaimAlreadyInProgress);
        }

        let connection = Arc::clone(&self.connection);
        let outcome = tokio::spawn(async move {
            let mut guard = connection.lock().await;
            claim_address(&mut *guard, name).await
        })
        .await
        .expect("address-claim task panicked");

        self.claim_in_flight.store(false, Ordering::Release);
        self.claim_done.notify_waiters();

        match outcome {
            Ok(address) => {
                self.address.store(address as u16, Ordering::Release);
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    /// Serializes `message` and writes it to the bus (§4.5).
    ///
    /// Payloads of eight bytes or fewer go out as a single CAN frame;
    /// longer payloads are segmented into a Transport Protocol BAM
    /// announce followed by DT frames, all at the same priority and
    /// issued back-to-back without interleaving from another `send` call.
    pub async fn send(&self, message: &Message, priority: Option<u8>) -> Result<(), SendError> {
        let address = self.address().ok_or(SendError::NotClaimed)?;
        let serialized = serialize(message);
        let priority = priority.unwrap_or_else(|| default_priority(message));

        let frames = if serialized.data.len() <= 8 {
            let id = CanId::builder(serialized.pgn, address)
                .with_priority(priority)
                .build()?;
            let mut data = [0u8; 8];
            data[..serialized.data.len()].copy_from_slice(&serialized.data);
            vec![CanFrame {
                id,
                data,
                len: serialized.data.len(),
            }]
        } else {
            build_frames(serialized.pgn, priority, address, &serialized.data)?
        };

        let mut connection = self.connection.lock().await;
        for frame in &frames {
            connection
                .send_frame(frame)
                .await
                .map_err(SendError::WriteFailed)?;
        }
        log::debug!(
            "sent pgn {} from address {address} as {} frame(s)",
            serialized.pgn,
            frames.len()
        );
        Ok(())
    }

    /// Awaits any in-flight claim, then releases the connection.
    pub async fn close(self) {
        loop {
            let notified = self.claim_done.notified();
            if !self.claim_in_flight.load(Ordering::Acquire) {
                break;
            }
            notified.await;
        }
        log::info!("device closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IoError;
    use crate::protocol::messages::CogSog;
    use std::collections::VecDeque;
    use std::sync::Mutex as StdMutex;

    #[derive(Clone, Default)]
    struct MockTransport {
        inbound: Arc<StdMutex<VecDeque<CanFrame>>>,
        outbound: Arc<StdMutex<Vec<CanFrame>>>,
    }

    impl MockTransport {
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
                std::future::pending::<()>().await;
            }
        }
    }

    #[tokio::test]
    async fn send_before_claim_is_rejected() {
        let device = Device::new(MockTransport::default());
        let msg = Message::CogSog(CogSog {
            sid: 0,
            cog_reference: 0,
            cog: 0.0,
            sog: 0.0,
        });
        let err = device.send(&msg, None).await.unwrap_err();
        assert!(matches!(err, SendError::NotClaimed));
    }

    #[tokio::test(start_paused = true)]
    async fn claim_then_send_emits_one_frame_for_a_short_message() {
        let transport = MockTransport::default();
        let handle = transport.clone();
        let device = Device::new(transport);
        let name = IsoName::builder()
            .unique_number(7)
            .arbitrary_address_capable(true)
            .build();
        device.claim(name).await.unwrap();
        assert_eq!(device.address(), Some(7));

        let msg = Message::CogSog(CogSog {
            sid: 1,
            cog_reference: 0,
            cog: 0.1234,
            sog: 5.0,
        });
        device.send(&msg, None).await.unwrap();

        // One frame for the claim, one for the short message.
        let sent = handle.sent();
        assert_eq!(sent.len(), 2);
        let message_frame = sent.last().unwrap();
        assert_eq!(message_frame.len, 8);
        assert_eq!(message_frame.id.source_address(), 7);
    }

    #[tokio::test(start_paused = true)]
    async fn second_claim_while_in_flight_is_rejected() {
        let device = Arc::new(Device::new(MockTransport::default()));
        let name = IsoName::builder()
            .unique_number(11)
            .arbitrary_address_capable(true)
            .build();

        let first = {
            let device = Arc::clone(&device);
            let name = name;
            tokio::spawn(async move { device.claim(name).await })
        };
        // Give the first claim a chance to flip the in-flight flag before
        // we attempt the second one.
        tokio::task::yield_now().await;

        let second = device.claim(name).await;
        assert!(matches!(second, Err(ClaimError::ClaimAlreadyInProgress)));

        first.await.unwrap().unwrap();
        assert_eq!(device.address(), Some(11));
    }

    #[tokio::test(start_paused = true)]
    async fn reclaim_after_completion_resolves_independently() {
        let device = Device::new(MockTransport::default());
        let first_name = IsoName::builder()
            .unique_number(1)
            .arbitrary_address_capable(true)
            .build();
        device.claim(first_name).await.unwrap();
        assert_eq!(device.address(), Some(1));

        let second_name = IsoName::builder()
            .unique_number(2)
            .arbitrary_address_capable(true)
            .build();
        device.claim(second_name).await.unwrap();
        assert_eq!(device.address(), Some(2));
    }
}
