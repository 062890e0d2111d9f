use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{FrameError, Result};

/// Frame header: version (1) + command type (1) + sequence id (1) + length (2) = 5 bytes.
pub const HEADER_SIZE: usize = 5;

/// Maximum payload size the controller accepts.
pub const MAX_PAYLOAD: usize = 1024;

/// A decoded protocol frame.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Protocol version stamped by the sender.
    pub version: u8,
    /// Command-type code (request) or response code (reply).
    pub command_type: u8,
    /// Rolling sequence id, for diagnostic correlation only.
    pub sequence_id: u8,
    /// The command-specific payload.
    pub payload: Bytes,
}

impl Frame {
    /// The total wire size of this frame (header + payload + checksum).
    pub fn wire_size(&self) -> usize {
        HEADER_SIZE + self.payload.len() + 1
    }
}

/// Two's-complement checksum over `data`, mod 256.
///
/// A frame is valid when this over everything before the trailing checksum
/// byte reproduces that byte; equivalently, the sum of all frame bytes
/// including the checksum is zero mod 256.
pub fn checksum(data: &[u8]) -> u8 {
    data.iter()
        .fold(0u8, |acc, byte| acc.wrapping_add(*byte))
        .wrapping_neg()
}

/// Encode a frame into the wire format.
///
/// Wire format:
/// ```text
/// ┌─────────┬──────┬──────┬─────────────┬─────────────────┬──────────┐
/// │ Version │ Type │ Id   │ Length      │ Payload         │ Checksum │
/// │ (1B)    │ (1B) │ (1B) │ (2B LE)     │ (Length bytes)  │ (1B)     │
/// └─────────┴──────┴──────┴─────────────┴─────────────────┴──────────┘
/// ```
pub fn encode_frame(
    version: u8,
    command_type: u8,
    sequence_id: u8,
    payload: &[u8],
    dst: &mut BytesMut,
) -> Result<()> {
    if payload.len() > MAX_PAYLOAD {
        return Err(FrameError::PayloadTooLarge {
            size: payload.len(),
            max: MAX_PAYLOAD,
        });
    }
    let start = dst.len();
    dst.reserve(HEADER_SIZE + payload.len() + 1);
    dst.put_u8(version);
    dst.put_u8(command_type);
    dst.put_u8(sequence_id);
    dst.put_u16_le(payload.len() as u16);
    dst.put_slice(payload);
    let sum = checksum(&dst[start..]);
    dst.put_u8(sum);
    Ok(())
}

/// Decode a frame from a received buffer.
///
/// Splits fields at fixed offsets using the embedded length field and
/// validates the trailing checksum. Bytes after the checksum are ignored
/// (a TCP read may return more than one frame's worth of buffer).
pub fn decode_frame(src: &[u8]) -> Result<Frame> {
    if src.len() < HEADER_SIZE {
        return Err(FrameError::TruncatedFrame {
            expected: HEADER_SIZE + 1,
            actual: src.len(),
        });
    }

    let length = u16::from_le_bytes([src[3], src[4]]) as usize;
    if length > MAX_PAYLOAD {
        return Err(FrameError::PayloadTooLarge {
            size: length,
            max: MAX_PAYLOAD,
        });
    }

    let total = HEADER_SIZE + length + 1;
    if src.len() < total {
        return Err(FrameError::TruncatedFrame {
            expected: total,
            actual: src.len(),
        });
    }

    let stored = src[HEADER_SIZE + length];
    let computed = checksum(&src[..HEADER_SIZE + length]);
    if stored != computed {
        return Err(FrameError::ChecksumMismatch { stored, computed });
    }

    Ok(Frame {
        version: src[0],
        command_type: src[1],
        sequence_id: src[2],
        payload: Bytes::copy_from_slice(&src[HEADER_SIZE..HEADER_SIZE + length]),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(version: u8, command_type: u8, id: u8, payload: &[u8]) -> Vec<u8> {
        let mut buf = BytesMut::new();
        encode_frame(version, command_type, id, payload, &mut buf).unwrap();
        buf.to_vec()
    }

    #[test]
    fn encode_decode_roundtrip() {
        let wire = encode(2, 0x02, 7, &[0x06, 0xC8, 0x00, 0x00, 0x00]);
        assert_eq!(wire.len(), HEADER_SIZE + 5 + 1);

        let frame = decode_frame(&wire).unwrap();
        assert_eq!(frame.version, 2);
        assert_eq!(frame.command_type, 0x02);
        assert_eq!(frame.sequence_id, 7);
        assert_eq!(frame.payload.as_ref(), &[0x06, 0xC8, 0x00, 0x00, 0x00]);
        assert_eq!(frame.wire_size(), wire.len());
    }

    #[test]
    fn checksum_is_twos_complement_of_sum() {
        let wire = encode(1, 0x0C, 0, b"");
        let body = &wire[..wire.len() - 1];
        let stored = wire[wire.len() - 1];

        let sum: u32 = body.iter().map(|b| u32::from(*b)).sum();
        assert_eq!(stored, (sum.wrapping_neg() & 0xFF) as u8);
        // All frame bytes including the checksum sum to zero mod 256.
        assert_eq!(
            wire.iter().fold(0u8, |acc, b| acc.wrapping_add(*b)),
            0
        );
    }

    #[test]
    fn mutated_payload_byte_fails_validation() {
        let wire = encode(2, 0x02, 3, &[0x13, 0x88, 0x13, 0x00, 0x00]);
        for i in 0..wire.len() - 1 {
            let mut corrupted = wire.clone();
            corrupted[i] ^= 0x01;
            // Flipping a length byte changes the declared frame size instead.
            let result = decode_frame(&corrupted);
            assert!(result.is_err(), "corrupting byte {i} must not decode");
        }
    }

    #[test]
    fn empty_payload() {
        let wire = encode(1, 0x00, 255, b"");
        let frame = decode_frame(&wire).unwrap();
        assert!(frame.payload.is_empty());
        assert_eq!(frame.sequence_id, 255);
    }

    #[test]
    fn truncated_header_rejected() {
        let err = decode_frame(&[0x01, 0x02, 0x03]).unwrap_err();
        assert!(matches!(err, FrameError::TruncatedFrame { actual: 3, .. }));
    }

    #[test]
    fn truncated_payload_rejected() {
        let mut wire = encode(2, 0x02, 0, &[1, 2, 3, 4, 5]);
        wire.truncate(HEADER_SIZE + 3);
        let err = decode_frame(&wire).unwrap_err();
        assert!(matches!(
            err,
            FrameError::TruncatedFrame {
                expected: 11,
                actual: 8
            }
        ));
    }

    #[test]
    fn missing_checksum_byte_rejected() {
        let mut wire = encode(2, 0x02, 0, &[1, 2, 3]);
        wire.pop();
        let err = decode_frame(&wire).unwrap_err();
        assert!(matches!(err, FrameError::TruncatedFrame { .. }));
    }

    #[test]
    fn oversized_payload_rejected_on_encode() {
        let payload = vec![0u8; MAX_PAYLOAD + 1];
        let mut buf = BytesMut::new();
        let err = encode_frame(1, 0x02, 0, &payload, &mut buf).unwrap_err();
        assert!(matches!(err, FrameError::PayloadTooLarge { .. }));
    }

    #[test]
    fn oversized_length_field_rejected_on_decode() {
        // Header declaring a 2048-byte payload.
        let wire = [0x01, 0x02, 0x00, 0x00, 0x08];
        let err = decode_frame(&wire).unwrap_err();
        assert!(matches!(err, FrameError::PayloadTooLarge { size: 2048, .. }));
    }

    #[test]
    fn trailing_bytes_ignored() {
        let mut wire = encode(2, 0x01, 9, &[0xAA, 0xBB]);
        wire.extend_from_slice(&[0xDE, 0xAD]);
        let frame = decode_frame(&wire).unwrap();
        assert_eq!(frame.payload.as_ref(), &[0xAA, 0xBB]);
    }

    #[test]
    fn max_payload_roundtrip() {
        let payload = vec![0x5A; MAX_PAYLOAD];
        let wire = encode(2, 0x03, 1, &payload);
        let frame = decode_frame(&wire).unwrap();
        assert_eq!(frame.payload.len(), MAX_PAYLOAD);
    }
}
