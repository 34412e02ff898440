use crate::FrameError;
use std::fmt;
use std::str::FromStr;

/// 48-bit hardware address. Most significant byte is 0th.
#[derive(Eq, Clone, Copy, Hash, PartialEq, Default)]
pub struct MacAddr {
    pub bytes: [u8; 6],
}

impl MacAddr {
    pub const BROADCAST: MacAddr = MacAddr { bytes: [0xff; 6] };

    pub fn new(bytes: [u8; 6]) -> MacAddr {
        MacAddr { bytes }
    }
}

impl From<[u8; 6]> for MacAddr {
    fn from(bytes: [u8; 6]) -> Self {
        MacAddr::new(bytes)
    }
}

impl fmt::Display for MacAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = &self.bytes;
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            b[0], b[1], b[2], b[3], b[4], b[5]
        )
    }
}

impl fmt::Debug for MacAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MacAddr({})", self)
    }
}

/// Accepts `aa:bb:cc:dd:ee:ff` or `aa-bb-cc-dd-ee-ff`, in either case.
impl FromStr for MacAddr {
    type Err = FrameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || FrameError::InvalidMac(s.to_string());

        let mut bytes = [0u8; 6];
        let mut octets = s.split(|c| c == ':' || c == '-');
        for byte in bytes.iter_mut() {
            let octet = octets.next().ok_or_else(invalid)?;
            let hex = octet.chars().all(|c| c.is_ascii_hexdigit());
            if octet.is_empty() || octet.len() > 2 || !hex {
                return Err(invalid());
            }
            *byte = u8::from_str_radix(octet, 16).map_err(|_| invalid())?;
        }
        if octets.next().is_some() {
            return Err(invalid());
        }
        Ok(MacAddr::new(bytes))
    }
}
