use crate::*;

/// Everything after the Ethernet header is zero filled up to this many bytes.
pub const MIN_PAYLOAD_LEN: usize = 48;

/// Largest probe frame either side will put on the wire.
pub const MAX_FRAME_LEN: usize = 1488;

/// A decoded probe frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProbeFrame {
    pub dest: MacAddr,
    pub src: MacAddr,
    pub kind: FrameKind,
    pub length_field: u16,
    pub message: Vec<u8>,
}

impl ProbeFrame {
    /// Builds the bytes of a complete frame carrying `message`.
    pub fn encode(
        dest: MacAddr,
        src: MacAddr,
        codec: &dyn PayloadCodec,
        message: &[u8],
    ) -> Result<Vec<u8>, FrameError> {
        let Encoded {
            length_field,
            mut body,
        } = codec.encode(message)?;
        if body.len() < MIN_PAYLOAD_LEN {
            body.resize(MIN_PAYLOAD_LEN, 0);
        }

        let len = HEADER_LEN + body.len();
        if len > MAX_FRAME_LEN {
            return Err(FrameError::Oversized {
                len,
                max: MAX_FRAME_LEN,
            });
        }

        let mut frame = EthernetFrame::empty();
        frame.set_dest_mac(dest);
        frame.set_src_mac(src);
        frame.set_length_field(length_field);
        frame.set_payload(&body);
        Ok(frame.data)
    }

    /// Parses a received frame. Only the header is checked here; the codec decides whether the
    /// payload makes sense.
    pub fn decode(bytes: &[u8], codec: &dyn PayloadCodec) -> Result<ProbeFrame, FrameError> {
        let frame = EthernetFrame::from_buffer(bytes.to_vec())?;
        let length_field = frame.length_field();
        let message = codec.decode(length_field, &frame.payload())?;
        Ok(ProbeFrame {
            dest: frame.dest_mac(),
            src: frame.src_mac(),
            kind: frame.kind(),
            length_field,
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pc() -> MacAddr {
        "00:2b:67:36:70:0f".parse().unwrap()
    }

    fn board() -> MacAddr {
        "54:27:8d:24:2a:f2".parse().unwrap()
    }

    #[test]
    fn short_message_is_zero_filled() {
        let bytes = ProbeFrame::encode(board(), pc(), &PlainCodec, b"hola").unwrap();
        assert_eq!(bytes.len(), HEADER_LEN + MIN_PAYLOAD_LEN + TRAILER_LEN);
        assert_eq!(&bytes[0..6], &board().bytes);
        assert_eq!(&bytes[6..12], &pc().bytes);
        assert_eq!(&bytes[12..14], &[0x00, 0x04]);
        assert_eq!(&bytes[14..18], b"hola");
        assert!(bytes[18..62].iter().all(|&b| b == 0));
        assert_eq!(&bytes[62..66], &DUMMY_TRAILER);
    }

    #[test]
    fn sender_default_message_layout() {
        let message = b"Reading data from the network";
        let bytes = ProbeFrame::encode(board(), pc(), &PlainCodec, message).unwrap();
        // 29 message bytes zero padded to 48, then the trailer.
        assert_eq!(bytes.len(), 66);
        assert_eq!(&bytes[14..43], &message[..]);
        assert!(bytes[43..62].iter().all(|&b| b == 0));
        assert_eq!(&bytes[62..66], &DUMMY_TRAILER);
    }

    #[test]
    fn long_message_is_not_padded() {
        let message = vec![b'x'; 100];
        let bytes = ProbeFrame::encode(board(), pc(), &PlainCodec, &message).unwrap();
        assert_eq!(bytes.len(), HEADER_LEN + 100 + TRAILER_LEN);
    }

    #[test]
    fn frame_size_is_capped() {
        let limit = MAX_FRAME_LEN - HEADER_LEN - TRAILER_LEN;
        assert!(ProbeFrame::encode(board(), pc(), &PlainCodec, &vec![0u8; limit]).is_ok());
        assert_eq!(
            ProbeFrame::encode(board(), pc(), &PlainCodec, &vec![0u8; limit + 1]),
            Err(FrameError::Oversized {
                len: MAX_FRAME_LEN + 1,
                max: MAX_FRAME_LEN
            })
        );
    }

    #[test]
    fn decode_plain_frame_from_board() {
        let quote = "¿Qué es la vida?";
        let bytes = ProbeFrame::encode(pc(), board(), &PlainCodec, quote.as_bytes()).unwrap();
        let frame = ProbeFrame::decode(&bytes, &PlainCodec).unwrap();
        assert_eq!(frame.src, board());
        assert_eq!(frame.dest, pc());
        assert_eq!(frame.kind, FrameKind::Dot3);
        assert_eq!(frame.length_field as usize, quote.len());
        assert_eq!(frame.message, quote.as_bytes().to_vec());
    }

    #[test]
    fn decode_secure_frame_from_board() {
        let codec = SecureCodec::default();
        let bytes = ProbeFrame::encode(pc(), board(), &codec, b"Test number one :D").unwrap();
        // 18 bytes -> 32 bytes ciphertext + 4 CRC, still under the 48 byte minimum.
        assert_eq!(bytes.len(), HEADER_LEN + MIN_PAYLOAD_LEN);
        assert_eq!(&bytes[12..14], &[0x00, 36]);

        let frame = ProbeFrame::decode(&bytes, &codec).unwrap();
        assert_eq!(frame.message, b"Test number one :D".to_vec());
    }

    #[test]
    fn decode_ethertype_frame_uses_field_as_length() {
        let mut raw = EthernetFrame::empty();
        raw.set_src_mac(board());
        raw.set_length_field(0x0800);
        raw.set_payload(&[1, 2, 3]);

        let frame = ProbeFrame::decode(&raw.data, &PlainCodec).unwrap();
        assert_eq!(frame.kind, FrameKind::EthernetII);
        assert_eq!(frame.message, vec![1u8, 2, 3]);
    }

    #[test]
    fn decode_runt_frame() {
        assert_eq!(
            ProbeFrame::decode(&[0u8; 10], &PlainCodec),
            Err(FrameError::Truncated { len: 10, min: 14 })
        );
    }
}
