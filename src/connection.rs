//! Raw `SocketCAN` connection: the external collaborator that opens a CAN
//! interface and exchanges wire-level frames with the kernel. `Device` and
//! `Listener` only depend on the crate-internal `CanTransport` trait, so
//! tests substitute an in-memory mock instead of a real interface.
use std::mem::MaybeUninit;
use std::os::unix::io::{AsRawFd, RawFd};

use socket2::{Domain, SockAddr, Socket, Type};
use tokio::io::unix::AsyncFd;

use crate::error::{ConnectionError, IoError};
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::can_id::CanId;
use crate::protocol::transport::traits::can_bus::CanTransport;

/// Marks a 29-bit extended CAN identifier in the wire-level frame record,
/// matching the kernel's `CAN_EFF_FLAG`.
pub const CAN_EFF_FLAG: u32 = 0x8000_0000;
const CAN_EFF_MASK: u32 = 0x1FFF_FFFF;

/// Wire-level record exchanged with the kernel socket: a `struct can_frame`
/// as `original_source/src/connection.cpp` reads and writes it — 4-byte ID
/// (extended-frame bit set), 1-byte DLC, 3 bytes padding, 8-byte payload.
#[repr(C)]
#[derive(Clone, Copy)]
struct RawFrame {
    can_id: u32,
    can_dlc: u8,
    _pad: [u8; 3],
    data: [u8; 8],
}

impl From<&CanFrame> for RawFrame {
    fn from(frame: &CanFrame) -> Self {
        RawFrame {
            can_id: (frame.id.0 & CAN_EFF_MASK) | CAN_EFF_FLAG,
            can_dlc: frame.len as u8,
            _pad: [0; 3],
            data: frame.data,
        }
    }
}

impl From<RawFrame> for CanFrame {
    fn from(raw: RawFrame) -> Self {
        CanFrame {
            id: CanId(raw.can_id & CAN_EFF_MASK),
            data: raw.data,
            len: raw.can_dlc as usize,
        }
    }
}

/// An open raw CAN socket, wrapped for non-blocking async I/O.
pub struct Connection {
    fd: AsyncFd<Socket>,
}

/// Opens `interface_name` as a raw `PF_CAN`/`SOCK_RAW`/`CAN_RAW` socket and
/// binds to it (§4.0, §6.1).
pub async fn connect(interface_name: &str) -> Result<Connection, ConnectionError> {
    let socket = Socket::new(Domain::from(libc::PF_CAN), Type::RAW, Some(libc::CAN_RAW.into()))
        .map_err(ConnectionError::OpenFailed)?;

    let ifindex = interface_index(interface_name).ok_or(ConnectionError::InterfaceNotFound)?;
    socket
        .bind(&can_sock_addr(ifindex))
        .map_err(ConnectionError::BindFailed)?;
    socket
        .set_nonblocking(true)
        .map_err(ConnectionError::BindFailed)?;

    log::info!("opened CAN interface {interface_name}");

    Ok(Connection {
        fd: AsyncFd::new(socket).map_err(ConnectionError::OpenFailed)?,
    })
}

fn interface_index(interface_name: &str) -> Option<i32> {
    let name = std::ffi::CString::new(interface_name).ok()?;
    let index = unsafe { libc::if_nametoindex(name.as_ptr()) };
    if index == 0 {
        None
    } else {
        Some(index as i32)
    }
}

fn can_sock_addr(ifindex: i32) -> SockAddr {
    unsafe {
        let mut sockaddr_can: libc::sockaddr_can = MaybeUninit::zeroed().assume_init();
        sockaddr_can.can_family = libc::AF_CAN as u16;
        sockaddr_can.can_ifindex = ifindex;

        let mut storage = MaybeUninit::<libc::sockaddr_storage>::zeroed();
        (storage.as_mut_ptr() as *mut libc::sockaddr_can).write(sockaddr_can);
        SockAddr::new(
            storage.assume_init(),
            std::mem::size_of::<libc::sockaddr_can>() as libc::socklen_t,
        )
    }
}

impl CanTransport for Connection {
    async fn send_frame(&mut self, frame: &CanFrame) -> Result<(), IoError> {
        let raw = RawFrame::from(frame);
        let bytes = unsafe {
            std::slice::from_raw_parts(
                &raw as *const RawFrame as *const u8,
                std::mem::size_of::<RawFrame>(),
            )
        };
        loop {
            let mut guard = self.fd.writable().await.map_err(IoError::WriteFailed)?;
            match guard.try_io(|inner| inner.get_ref().send(bytes)) {
                Ok(result) => {
                    result.map_err(IoError::WriteFailed)?;
                    return Ok(());
                }
                Err(_would_block) => continue,
            }
        }
    }

    async fn recv_frame(&mut self) -> Result<CanFrame, IoError> {
        loop {
            let mut guard = self.fd.readable().await.map_err(IoError::ReadFailed)?;

            let mut raw = MaybeUninit::<RawFrame>::zeroed();
            let buf = unsafe {
                std::slice::from_raw_parts_mut(
                    raw.as_mut_ptr() as *mut MaybeUninit<u8>,
                    std::mem::size_of::<RawFrame>(),
                )
            };

            match guard.try_io(|inner| inner.get_ref().recv(buf)) {
                Ok(result) => {
                    let read = result.map_err(IoError::ReadFailed)?;
                    if read < std::mem::size_of::<RawFrame>() {
                        return Err(IoError::IncompleteFrame);
                    }
                    return Ok(unsafe { raw.assume_init() }.into());
                }
                Err(_would_block) => continue,
            }
        }
    }
}

impl AsRawFd for Connection {
    fn as_raw_fd(&self) -> RawFd {
        self.fd.as_raw_fd()
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        log::info!("closing CAN connection (fd {})", self.fd.as_raw_fd());
    }
}
