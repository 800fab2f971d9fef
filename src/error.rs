//! Error taxonomy shared across the crate. Each enum models one failure
//! domain (connection, frame I/O, PGN decoding, address claiming, sending);
//! domains that build on one another chain via `#[from]` rather than
//! duplicating variants.
use thiserror::Error;

use crate::protocol::transport::can_id::CanIdBuildError;

/// Failures while opening the underlying CAN socket (§6.1).
#[derive(Error, Debug)]
pub enum ConnectionError {
    #[error("Error while opening socket")]
    OpenFailed(#[source] std::io::Error),
    #[error("Network interface not found")]
    InterfaceNotFound,
    #[error("Error while binding socket")]
    BindFailed(#[source] std::io::Error),
}

/// Failures reading or writing frames on an already-open connection.
#[derive(Error, Debug)]
pub enum IoError {
    /// Fewer than 16 bytes were available for a frame record.
    #[error("Incomplete CAN frame")]
    IncompleteFrame,
    #[error("Unable to read from socket")]
    ReadFailed(#[source] std::io::Error),
    #[error("Unable to write to socket")]
    WriteFailed(#[source] std::io::Error),
}

/// Failures decoding a PGN payload, whether single-frame or reassembled.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("PGN {0} not supported")]
    UnsupportedPgn(u32),
    #[error("PGN {pgn}: expected at least {expected} bytes, got {got}")]
    ShortPayload { pgn: u32, got: usize, expected: usize },
    /// Transport-Protocol data frame received with no matching BAM announce.
    #[error("unexpected data frame from source {0}")]
    UnexpectedDataPacket(u8),
    /// Transport-Protocol data frame arrived out of sequence.
    #[error("out of order data frame: expected sequence {expected}, got {got}")]
    OutOfOrder { expected: u8, got: u8 },
}

/// Terminal outcomes of the J1939 address-claim procedure (§4.4).
#[derive(Error, Debug)]
pub enum ClaimError {
    /// A lower-NAME contender holds the candidate address and we cannot
    /// try another one.
    #[error("Address conflict. Device not arbitrary address capable")]
    AddressConflictNotArbitrary,
    /// Every arbitrary candidate address cycled back to the start without
    /// settling.
    #[error("No address available")]
    NoAvailableAddress,
    /// A claim is already running on this device.
    #[error("Address claim already in progress")]
    ClaimAlreadyInProgress,
    /// Writing the claim (or defense) frame to the bus failed.
    #[error("failed to send address claim frame")]
    SendFailure(#[from] IoError),
}

/// Failures transmitting an application message (§4.5).
#[derive(Error, Debug)]
pub enum SendError {
    #[error("Device has not claimed an address")]
    NotClaimed,
    #[error("failed to send message")]
    WriteFailed(#[from] IoError),
    #[error("failed to build CAN identifier")]
    BuildFailed(#[from] CanIdBuildError),
}

/// Failures surfaced by [`crate::listener::Listener::read`].
#[derive(Error, Debug)]
pub enum ReadError {
    #[error(transparent)]
    Io(#[from] IoError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}
