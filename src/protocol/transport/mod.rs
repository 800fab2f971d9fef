//! NMEA 2000 transport layer: CAN frame representations, 29-bit identifier
//! management, Transport Protocol (BAM/DT) reassembly, and the bus
//! abstraction trait `Device`/`Listener` are generic over.

pub mod can_frame;
pub mod can_id;
pub mod traits;
pub mod transport_protocol;

/// Recommended timeout for sending a single CAN frame (ms).
///
/// Prevents indefinite blocking when the bus is faulty, disconnected, or
/// saturated. On an NMEA 2000 bus @ 250 kbps a single frame takes well under
/// 1 ms barring contention; the margin covers arbitration and retransmission.
pub const CAN_SEND_TIMEOUT_MS: u32 = 100;
