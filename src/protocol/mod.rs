//! High-level components of the NMEA 2000 protocol: network management
//! (NAME packing, address claiming), the PGN message registry, and the
//! CAN / Transport-Protocol transport layer.
pub mod management;
pub mod messages;
pub mod transport;
