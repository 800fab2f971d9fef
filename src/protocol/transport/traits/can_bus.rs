//! Abstraction over an asynchronous CAN bus. Allows the claim engine,
//! `Device`, and `Listener` to run against a real socket or an in-memory
//! mock transport interchangeably.
use futures_util::Future;

use crate::error::IoError;
use crate::protocol::transport::can_frame::CanFrame;

/// Contract to send and receive CAN frames asynchronously.
///
/// Futures are required to be `Send` so `Device` can run the address-claim
/// procedure (§4.4) as a dedicated `tokio::spawn`-ed task.
pub trait CanTransport {
    /// Emits a frame on the bus.
    fn send_frame<'a>(
        &'a mut self,
        frame: &'a CanFrame,
    ) -> impl Future<Output = Result<(), IoError>> + Send + 'a;
    /// Waits for and returns the next available frame.
    fn recv_frame<'a>(&'a mut self) -> impl Future<Output = Result<CanFrame, IoError>> + Send + 'a;
}
