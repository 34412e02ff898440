use libc;
use std::{ffi::CStr, io, ptr};

/// A link-layer network interface as reported by `getifaddrs(3)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Interface {
    /// Interface name, e.g. `eth0`.
    pub name: String,
    /// Interface index, usable with `AF_PACKET` sockets.
    pub index: i32,
    /// Hardware address.
    pub mac: [u8; 6],
}

/// Lists every interface that has an `AF_PACKET` address, which is every interface that can
/// carry raw Ethernet frames.
pub fn interfaces() -> io::Result<Vec<Interface>> {
    let mut head: *mut libc::ifaddrs = ptr::null_mut();
    if unsafe { libc::getifaddrs(&mut head) } < 0 {
        return Err(io::Error::last_os_error());
    }

    let mut found = Vec::new();
    let mut cursor = head;
    while !cursor.is_null() {
        // The list stays valid until freeifaddrs below.
        let ifa = unsafe { &*cursor };
        cursor = ifa.ifa_next;

        if ifa.ifa_addr.is_null() || ifa.ifa_name.is_null() {
            continue;
        }
        if unsafe { (*ifa.ifa_addr).sa_family } as libc::c_int != libc::AF_PACKET {
            continue;
        }

        let ll = unsafe { &*(ifa.ifa_addr as *const libc::sockaddr_ll) };
        if ll.sll_halen != 6 {
            continue;
        }
        let mut mac = [0u8; 6];
        mac.copy_from_slice(&ll.sll_addr[..6]);

        found.push(Interface {
            name: unsafe { CStr::from_ptr(ifa.ifa_name) }
                .to_string_lossy()
                .into_owned(),
            index: ll.sll_ifindex,
            mac,
        });
    }

    unsafe { libc::freeifaddrs(head) };
    Ok(found)
}

/// Returns the first interface whose hardware address is `mac`, if any.
pub fn interface_with_mac(mac: [u8; 6]) -> io::Result<Option<Interface>> {
    Ok(interfaces()?.into_iter().find(|iface| iface.mac == mac))
}
