use crate::*;
use std::borrow::Cow;
use std::convert::{TryFrom, TryInto};

pub const HEADER_LEN: usize = 14;

/// Largest value of the type/length field that IEEE 802.3 reads as a length.
pub const MAX_DOT3_LENGTH: u16 = 1500;

/// How the field at bytes 12..14 reads on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameKind {
    /// IEEE 802.3: the field is a length.
    Dot3,
    /// Ethernet II: the field is an EtherType.
    EthernetII,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EthernetFrame {
    pub data: Vec<u8>,
}

impl EthernetFrame {
    pub fn from_buffer(frame: Vec<u8>) -> Result<EthernetFrame, FrameError> {
        // 0                    6                    12                      14
        // |---6 byte Dest_MAC--|---6 byte Src_MAC---|--2 byte Type/Length--|
        if frame.len() < HEADER_LEN {
            return Err(FrameError::Truncated {
                len: frame.len(),
                min: HEADER_LEN,
            });
        }

        Ok(EthernetFrame { data: frame })
    }

    /// Returns an EthernetFrame with an all-zero header and no payload.
    pub fn empty() -> EthernetFrame {
        EthernetFrame {
            data: vec![0; HEADER_LEN],
        }
    }

    pub fn dest_mac(&self) -> MacAddr {
        MacAddr::new(self.data[0..6].try_into().unwrap())
    }

    pub fn src_mac(&self) -> MacAddr {
        MacAddr::new(self.data[6..12].try_into().unwrap())
    }

    pub fn set_dest_mac(&mut self, mac: MacAddr) {
        self.data[..6].copy_from_slice(&mac.bytes);
    }

    pub fn set_src_mac(&mut self, mac: MacAddr) {
        self.data[6..12].copy_from_slice(&mac.bytes);
    }

    /// The raw type/length field, big-endian on the wire.
    pub fn length_field(&self) -> u16 {
        u16::from_be_bytes(self.data[12..=13].try_into().unwrap())
    }

    pub fn set_length_field(&mut self, value: u16) {
        self.data[12..=13].copy_from_slice(&value.to_be_bytes());
    }

    pub fn kind(&self) -> FrameKind {
        if self.length_field() <= MAX_DOT3_LENGTH {
            FrameKind::Dot3
        } else {
            FrameKind::EthernetII
        }
    }

    // This gives you a cow of a slice of the payload.
    pub fn payload(&self) -> Cow<[u8]> {
        Cow::from(&self.data[HEADER_LEN..])
    }

    pub fn set_payload(&mut self, payload: &[u8]) {
        self.data.truncate(HEADER_LEN);
        self.data.reserve_exact(payload.len());
        self.data.extend_from_slice(payload);
    }
}

impl TryFrom<&[u8]> for EthernetFrame {
    type Error = FrameError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        EthernetFrame::from_buffer(bytes.to_vec())
    }
}
