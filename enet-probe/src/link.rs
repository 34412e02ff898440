use crate::{config::LinkConfig, ProbeError};
use afpacket::AsyncBoundSocket;
use enet_packets::MacAddr;
use std::ffi::CString;
use tracing::{debug, info, warn};

/// Largest frame we ever expect to read, VLAN tag included.
pub const RECV_BUF_LEN: usize = 1522;

/// Picks the interface named in `config`, or the one that owns the local MAC.
pub fn resolve_interface(config: &LinkConfig) -> Result<String, ProbeError> {
    if let Some(name) = &config.interface {
        return Ok(name.clone());
    }
    let iface = afpacket::interface_with_mac(config.local.bytes)
        .map_err(|e| ProbeError::io("listing interfaces", e))?
        .ok_or(ProbeError::NoInterface(config.local))?;
    debug!(interface = %iface.name, mac = %config.local, "found interface by MAC");
    Ok(iface.name)
}

/// Opens a non-blocking raw socket on the configured interface.
pub fn open(config: &LinkConfig) -> Result<(AsyncBoundSocket, String), ProbeError> {
    let name = resolve_interface(config)?;
    let c_name = CString::new(name.clone())
        .map_err(|_| ProbeError::config("interface", "name contains a NUL byte"))?;
    let sock = AsyncBoundSocket::from_interface(&c_name)
        .map_err(|e| ProbeError::io("opening raw socket", e))?;

    match sock.hardware_addr() {
        Ok(mac) if MacAddr::new(mac) != config.local => warn!(
            interface = %name,
            hardware = %MacAddr::new(mac),
            local = %config.local,
            "interface MAC differs from --local-mac; frames will carry --local-mac"
        ),
        Ok(_) => {}
        Err(e) => debug!(interface = %name, error = %e, "could not read hardware address"),
    }

    info!(interface = %name, "bound raw socket");
    Ok((sock, name))
}
