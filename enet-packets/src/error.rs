use failure::Fail;

/// Everything that can go wrong while building or reading a probe frame.
#[derive(Debug, Fail, Clone, PartialEq, Eq)]
pub enum FrameError {
    #[fail(display = "frame is {} bytes, less than the minimum of {}", len, min)]
    Truncated { len: usize, min: usize },

    #[fail(display = "frame would be {} bytes, more than the maximum of {}", len, max)]
    Oversized { len: usize, max: usize },

    #[fail(
        display = "length field {} does not describe a valid encrypted payload",
        length_field
    )]
    BadLength { length_field: u16 },

    #[fail(
        display = "CRC mismatch: frame carries {:#010x}, computed {:#010x}",
        received, computed
    )]
    BadChecksum { received: u32, computed: u32 },

    #[fail(display = "incorrect padding")]
    BadPadding,

    #[fail(display = "invalid MAC address {:?}", _0)]
    InvalidMac(String),
}
