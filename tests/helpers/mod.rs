//! Test double: an in-memory CAN bus connecting two [`n2k`] participants,
//! built on `tokio::sync::mpsc` the same way `n2k`'s own unit tests mock
//! `CanTransport`.
#![allow(dead_code)]
use n2k::error::IoError;
use n2k::protocol::transport::can_frame::CanFrame;
use n2k::protocol::transport::traits::can_bus::CanTransport;
use tokio::sync::mpsc;

/// One end of a pair of interconnected in-memory CAN buses.
pub struct MockBus {
    tx: mpsc::UnboundedSender<CanFrame>,
    rx: mpsc::UnboundedReceiver<CanFrame>,
}

impl MockBus {
    /// Builds two buses wired to each other: frames sent on one arrive on
    /// the other's `recv_frame`.
    pub fn pair() -> (Self, Self) {
        let (a_tx, b_rx) = mpsc::unbounded_channel();
        let (b_tx, a_rx) = mpsc::unbounded_channel();
        (
            Self { tx: a_tx, rx: a_rx },
            Self { tx: b_tx, rx: b_rx },
        )
    }
}

impl CanTransport for MockBus {
    async fn send_frame(&mut self, frame: &CanFrame) -> Result<(), IoError> {
        self.tx
            .send(frame.clone())
            .map_err(|_| IoError::WriteFailed(std::io::Error::other("peer dropped")))
    }

    async fn recv_frame(&mut self) -> Result<CanFrame, IoError> {
        self.rx
            .recv()
            .await
            .ok_or_else(|| IoError::ReadFailed(std::io::Error::other("peer dropped")))
    }
}
