#![allow(non_camel_case_types)]

use libc;

pub(crate) const SIOCGIFHWADDR: libc::c_ulong = 0x8927;
pub(crate) const SIOCGIFINDEX: libc::c_ulong = 0x8933;

pub(crate) const SOL_PACKET: libc::c_int = 263;
pub(crate) const PACKET_ADD_MEMBERSHIP: libc::c_int = 1;
pub(crate) const PACKET_DROP_MEMBERSHIP: libc::c_int = 2;
pub(crate) const PACKET_MR_PROMISC: libc::c_ushort = 1;

/// `sll_pkttype` of a frame this host sent itself.
pub(crate) const PACKET_OUTGOING: libc::c_uchar = 4;

/// `ETH_P_ALL` in network byte order, as `socket(2)` and `sockaddr_ll` expect it.
pub(crate) fn eth_p_all() -> libc::c_ushort {
    (libc::ETH_P_ALL as libc::c_ushort).to_be()
}

#[repr(C)]
#[derive(Clone, Copy)]
pub(crate) struct ifmap {
    pub(crate) mem_start: libc::c_ulong,
    pub(crate) mem_end: libc::c_ulong,
    pub(crate) base_addr: libc::c_ushort,
    pub(crate) irq: libc::c_uchar,
    pub(crate) dma: libc::c_uchar,
    pub(crate) port: libc::c_uchar,
}

#[repr(C)]
pub(crate) union ifru {
    pub(crate) ifru_addr: libc::sockaddr,
    pub(crate) ifru_hwaddr: libc::sockaddr,
    pub(crate) ifru_flags: libc::c_short,
    pub(crate) ifru_ivalue: libc::c_int,
    pub(crate) ifru_mtu: libc::c_int,
    pub(crate) ifru_map: ifmap,
    pub(crate) ifru_newname: [libc::c_char; libc::IFNAMSIZ],
}

#[repr(C)]
pub(crate) union ifrn {
    pub(crate) ifrn_name: [libc::c_char; libc::IFNAMSIZ],
}

#[repr(C)]
pub(crate) struct ifreq {
    pub(crate) ifr_ifrn: ifrn,
    pub(crate) ifr_ifru: ifru,
}

/// `struct packet_mreq` from `<linux/if_packet.h>`.
#[repr(C)]
pub(crate) struct packet_mreq {
    pub(crate) mr_ifindex: libc::c_int,
    pub(crate) mr_type: libc::c_ushort,
    pub(crate) mr_alen: libc::c_ushort,
    pub(crate) mr_address: [libc::c_uchar; 8],
}
