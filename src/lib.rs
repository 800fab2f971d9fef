//! `n2k`: a library for participating as a node on an NMEA 2000 marine
//! network carried over a CAN bus.
//!
//! Two roles are offered:
//!
//! - [`Listener`]: a passive participant that reassembles Transport
//!   Protocol (BAM) transfers and decodes incoming NMEA 2000 messages.
//! - [`Device`]: an active participant that first claims a J1939 source
//!   address (dynamic address claiming, J1939-81) and then transmits
//!   application messages, fragmenting them across CAN frames via the
//!   Transport Protocol broadcast mechanism (J1939-21) when required.
//!
//! Opening the underlying CAN interface, polling for readability, and
//! logging configuration are left to the host application; see
//! [`connect`] and the crate-level `CanTransport` abstraction in
//! [`protocol::transport::traits::can_bus`] for the seam between this
//! crate and the host's I/O loop.
pub mod connection;
pub mod device;
/// Domain error taxonomy: connection, I/O, PGN decode, address-claim, and
/// send failures (§7).
pub mod error;
pub mod listener;
/// NMEA 2000 / J1939 protocol logic: network management, the PGN message
/// registry, and the CAN / Transport-Protocol transport layer.
pub mod protocol;

pub use connection::{connect, Connection};
pub use device::Device;
pub use error::ClaimError;
pub use listener::Listener;
pub use protocol::management::iso_name::IsoName;
pub use protocol::messages::{self, Message};
