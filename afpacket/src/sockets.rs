#![deny(missing_docs)]

use crate::linux;
use libc;
use std::{
    ffi::CStr,
    io,
    mem::{self, MaybeUninit},
    ptr,
};

/// The link-level address a frame was received from.
pub struct Addr {
    inner: libc::sockaddr_ll,
}

impl Addr {
    /// Index of the interface the frame arrived on.
    pub fn ifindex(&self) -> i32 {
        self.inner.sll_ifindex
    }

    /// Returns true if the frame was sent by this host (`PACKET_OUTGOING`). An `ETH_P_ALL`
    /// socket sees its own transmissions looped back to it.
    pub fn is_outgoing(&self) -> bool {
        self.inner.sll_pkttype == linux::PACKET_OUTGOING
    }
}

/// Represents an unbound `AF_PACKET` socket.  At this phase of a socket's lifecycle, it can be
/// configured.
pub struct Socket {
    fd: libc::c_int,
}

/// Represents a bound `AF_PACKET` socket. At this phase of a socket's lifecycle, it can be read
/// to/written from.
pub struct BoundSocket {
    fd: libc::c_int,
    send_addr: libc::sockaddr_ll,
    ifr_name: [libc::c_char; libc::IFNAMSIZ],
}

/// Fills an `ifreq` with the interface name, truncated to `IFNAMSIZ - 1` bytes so the kernel
/// always sees a NUL terminator.
fn ifreq_for(name: &[libc::c_char]) -> linux::ifreq {
    // An all-zero ifreq is a valid value for every union member.
    let mut ifr: linux::ifreq = unsafe { MaybeUninit::zeroed().assume_init() };
    let len = name.len().min(libc::IFNAMSIZ - 1);
    unsafe {
        ptr::copy_nonoverlapping(name.as_ptr(), ifr.ifr_ifrn.ifrn_name.as_mut_ptr(), len);
    }
    ifr
}

impl Socket {
    /// Creates a new unbound socket that sees every EtherType.
    pub fn new() -> io::Result<Self> {
        // Resources:
        // https://beej.us/guide/bgnet/html/multi/syscalls.html#socket
        // man 7 packet
        let fd = unsafe {
            libc::socket(
                libc::AF_PACKET,
                libc::SOCK_RAW,
                linux::eth_p_all() as libc::c_int,
            )
        };
        if fd < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(Self { fd })
    }

    /// Binds the socket to a network interface. This function consumes the `Socket` instance, as
    /// no more configuration options may be safely changed.
    pub fn bind(self, iface: impl AsRef<CStr>) -> io::Result<BoundSocket> {
        let name = iface.as_ref().to_bytes();
        let name: Vec<libc::c_char> = name.iter().map(|&b| b as libc::c_char).collect();
        let mut ifr = ifreq_for(&name);

        // ioctl(SIOCGIFINDEX) fills in the index field of the ifreq object
        // Resources:
        // man 7 netdevice
        let err = unsafe { libc::ioctl(self.fd, linux::SIOCGIFINDEX, &mut ifr) };
        if err < 0 {
            return Err(io::Error::last_os_error());
        }

        let mut ll: libc::sockaddr_ll = unsafe { MaybeUninit::zeroed().assume_init() };
        ll.sll_family = libc::AF_PACKET as libc::c_ushort;
        ll.sll_protocol = linux::eth_p_all();
        // expanded from `ifr_ifindex` in kernel headers
        ll.sll_ifindex = unsafe { ifr.ifr_ifru.ifru_ivalue };

        // Resources:
        // https://beej.us/guide/bgnet/html/multi/syscalls.html#bind
        // man 7 packet regarding sockaddr_ll
        let err = unsafe {
            libc::bind(
                self.fd,
                &ll as *const _ as *const libc::sockaddr,
                mem::size_of::<libc::sockaddr_ll>() as libc::socklen_t,
            )
        };
        if err < 0 {
            return Err(io::Error::last_os_error());
        }

        let fd = self.fd;
        // The descriptor now belongs to the BoundSocket, so `self` must not close it.
        mem::forget(self);
        Ok(BoundSocket {
            fd,
            send_addr: ll,
            ifr_name: unsafe { ifr.ifr_ifrn.ifrn_name },
        })
    }

    /// Configures the socket's non-blocking status.
    pub fn set_nonblocking(&mut self, nonblocking: bool) -> io::Result<()> {
        set_nonblocking(self.fd, nonblocking)
    }

    /// Returns true if the socket is configured not to block, false otherwise.
    pub fn is_nonblocking(&self) -> io::Result<bool> {
        let flags = unsafe { libc::fcntl(self.fd, libc::F_GETFL) };
        if flags < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(flags & libc::O_NONBLOCK == libc::O_NONBLOCK)
    }
}

fn set_nonblocking(fd: libc::c_int, nonblocking: bool) -> io::Result<()> {
    // Resources used to write syscall code:
    // https://beej.us/guide/bgnet/html/multi/advanced.html#blocking
    // man 2 fcntl
    unsafe {
        let flags = libc::fcntl(fd, libc::F_GETFL);
        if flags < 0 {
            return Err(io::Error::last_os_error());
        }
        let new_flags = if nonblocking {
            flags | libc::O_NONBLOCK
        } else {
            flags & (!libc::O_NONBLOCK)
        };
        if libc::fcntl(fd, libc::F_SETFL, new_flags) < 0 {
            return Err(io::Error::last_os_error());
        }
    }
    Ok(())
}

impl BoundSocket {
    /// Index of the interface this socket is bound to.
    pub fn ifindex(&self) -> i32 {
        self.send_addr.sll_ifindex
    }

    /// Returns the hardware (MAC) address of the bound interface.
    pub fn hardware_addr(&self) -> io::Result<[u8; 6]> {
        let mut ifr = ifreq_for(&self.ifr_name);
        // man 7 netdevice, SIOCGIFHWADDR
        let err = unsafe { libc::ioctl(self.fd, linux::SIOCGIFHWADDR, &mut ifr) };
        if err < 0 {
            return Err(io::Error::last_os_error());
        }
        let sa_data = unsafe { ifr.ifr_ifru.ifru_hwaddr.sa_data };
        let mut mac = [0u8; 6];
        for (dst, src) in mac.iter_mut().zip(sa_data.iter()) {
            *dst = *src as u8;
        }
        Ok(mac)
    }

    /// Turns promiscuous mode on or off for the bound interface. Useful for receiving all
    /// frames on an interface, including those not addressed to the device.
    pub fn set_promiscuous(&mut self, promiscuous: bool) -> io::Result<()> {
        let mreq = linux::packet_mreq {
            mr_ifindex: self.ifindex(),
            mr_type: linux::PACKET_MR_PROMISC,
            mr_alen: 0,
            mr_address: [0; 8],
        };
        let op = if promiscuous {
            linux::PACKET_ADD_MEMBERSHIP
        } else {
            linux::PACKET_DROP_MEMBERSHIP
        };
        // man 7 packet, "Socket options"
        let err = unsafe {
            libc::setsockopt(
                self.fd,
                linux::SOL_PACKET,
                op,
                &mreq as *const _ as *const libc::c_void,
                mem::size_of::<linux::packet_mreq>() as libc::socklen_t,
            )
        };
        if err < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }

    /// Configures the socket's non-blocking status after it has been bound.
    pub fn set_nonblocking(&mut self, nonblocking: bool) -> io::Result<()> {
        set_nonblocking(self.fd, nonblocking)
    }

    /// Sends a frame to the NIC. The frame must already carry its Ethernet header.
    pub fn send(&mut self, frame: &[u8]) -> io::Result<usize> {
        // Resources:
        // https://beej.us/guide/bgnet/html/multi/syscalls.html#sendtorecv
        let bytes = unsafe {
            libc::sendto(
                self.fd,
                frame.as_ptr() as *const _,
                frame.len(),
                0,
                &self.send_addr as *const _ as *const libc::sockaddr,
                mem::size_of::<libc::sockaddr_ll>() as libc::socklen_t,
            )
        };
        if bytes < 0 {
            Err(io::Error::last_os_error())
        } else {
            Ok(bytes as usize)
        }
    }

    /// Receives a frame from the NIC.
    pub fn recv(&mut self, frame: &mut [u8]) -> io::Result<(usize, Addr)> {
        let mut storage = MaybeUninit::<libc::sockaddr_ll>::zeroed();
        let mut addrlen = mem::size_of::<libc::sockaddr_ll>() as libc::socklen_t;

        // Resources:
        // https://beej.us/guide/bgnet/html/multi/syscalls.html#sendtorecv
        let bytes = unsafe {
            libc::recvfrom(
                self.fd,
                frame.as_mut_ptr() as *mut _,
                frame.len(),
                0,
                storage.as_mut_ptr() as *mut libc::sockaddr,
                &mut addrlen,
            )
        };
        if bytes < 0 {
            Err(io::Error::last_os_error())
        } else {
            Ok((
                bytes as usize,
                Addr {
                    inner: unsafe { storage.assume_init() },
                },
            ))
        }
    }

    #[cfg(feature = "tokio-support")]
    pub(crate) fn raw_fd(&self) -> libc::c_int {
        self.fd
    }
}

impl Drop for Socket {
    fn drop(&mut self) {
        unsafe {
            libc::close(self.fd);
        }
    }
}

impl Drop for BoundSocket {
    fn drop(&mut self) {
        unsafe {
            libc::close(self.fd);
        }
    }
}
