/// CRC-32 as the board's CRC engine computes it: IEEE polynomial, reflected input and output,
/// seed `0xFFFFFFFF`, complemented result.
pub fn crc32(data: &[u8]) -> u32 {
    crc32fast::hash(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_value() {
        assert_eq!(crc32(b"123456789"), 0xCBF4_3926);
    }

    #[test]
    fn empty() {
        assert_eq!(crc32(&[]), 0);
    }
}
