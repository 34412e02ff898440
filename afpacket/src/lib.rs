//! Raw `AF_PACKET` sockets for sending and receiving whole Ethernet frames on Linux.
#![cfg(target_os = "linux")]
mod interfaces;
mod linux;
mod sockets;

#[cfg(feature = "tokio-support")]
mod tokio_sockets;

pub use interfaces::{interface_with_mac, interfaces, Interface};
pub use sockets::{Addr, BoundSocket, Socket};
#[cfg(feature = "tokio-support")]
pub use tokio_sockets::AsyncBoundSocket;
