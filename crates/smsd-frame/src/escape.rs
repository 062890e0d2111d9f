//! Byte-stuffing layer for the serial transport.
//!
//! The USB virtual serial port delimits frames with marker bytes; any
//! occurrence of a marker (or of the escape byte itself) inside the frame
//! is replaced with a two-byte escape sequence. TCP never uses this layer.

use crate::error::{FrameError, Result};

/// Start-of-message marker.
pub const FRAME_START: u8 = 0xFA;
/// End-of-message marker.
pub const FRAME_END: u8 = 0xFB;
/// Escape prefix for stuffed bytes.
pub const ESCAPE: u8 = 0xFE;

const ESCAPED_START: u8 = 0x7A;
const ESCAPED_END: u8 = 0x7B;
const ESCAPED_ESCAPE: u8 = 0x7E;

/// Wrap a raw frame for the serial wire: start marker, stuffed body, end
/// marker. Reserved bytes are substituted in a single pass so an escape
/// byte produced by stuffing is never re-escaped.
pub fn escape(frame: &[u8]) -> Vec<u8> {
    let mut wire = Vec::with_capacity(frame.len() + 2);
    wire.push(FRAME_START);
    for &byte in frame {
        match byte {
            FRAME_START => wire.extend_from_slice(&[ESCAPE, ESCAPED_START]),
            FRAME_END => wire.extend_from_slice(&[ESCAPE, ESCAPED_END]),
            ESCAPE => wire.extend_from_slice(&[ESCAPE, ESCAPED_ESCAPE]),
            other => wire.push(other),
        }
    }
    wire.push(FRAME_END);
    wire
}

/// Strip the serial markers and reverse the byte stuffing.
///
/// A buffer that does not start with the start marker and end with the end
/// marker is rejected, as is a dangling or unknown escape sequence.
pub fn unescape(wire: &[u8]) -> Result<Vec<u8>> {
    if wire.len() < 2 || wire[0] != FRAME_START || wire[wire.len() - 1] != FRAME_END {
        return Err(FrameError::InvalidMessageFormat(
            "missing start/end markers",
        ));
    }

    let body = &wire[1..wire.len() - 1];
    let mut frame = Vec::with_capacity(body.len());
    let mut bytes = body.iter();
    while let Some(&byte) = bytes.next() {
        if byte != ESCAPE {
            frame.push(byte);
            continue;
        }
        match bytes.next() {
            Some(&ESCAPED_START) => frame.push(FRAME_START),
            Some(&ESCAPED_END) => frame.push(FRAME_END),
            Some(&ESCAPED_ESCAPE) => frame.push(ESCAPE),
            Some(_) => {
                return Err(FrameError::InvalidMessageFormat("unknown escape sequence"))
            }
            None => return Err(FrameError::InvalidMessageFormat("dangling escape byte")),
        }
    }
    Ok(frame)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_bytes_pass_through() {
        let wire = escape(&[0x01, 0x02, 0x03]);
        assert_eq!(wire, vec![0xFA, 0x01, 0x02, 0x03, 0xFB]);
        assert_eq!(unescape(&wire).unwrap(), vec![0x01, 0x02, 0x03]);
    }

    #[test]
    fn reserved_bytes_are_stuffed() {
        let wire = escape(&[0xFA, 0xFB, 0xFE]);
        assert_eq!(
            wire,
            vec![0xFA, 0xFE, 0x7A, 0xFE, 0x7B, 0xFE, 0x7E, 0xFB]
        );
        assert_eq!(unescape(&wire).unwrap(), vec![0xFA, 0xFB, 0xFE]);
    }

    #[test]
    fn empty_frame() {
        let wire = escape(&[]);
        assert_eq!(wire, vec![0xFA, 0xFB]);
        assert_eq!(unescape(&wire).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn roundtrip_all_byte_values() {
        let frame: Vec<u8> = (0u16..=255).map(|b| b as u8).collect();
        assert_eq!(unescape(&escape(&frame)).unwrap(), frame);
    }

    #[test]
    fn roundtrip_marker_heavy_payloads() {
        let cases: &[&[u8]] = &[
            &[0xFA],
            &[0xFB],
            &[0xFE],
            &[0xFE, 0x7A],
            &[0xFA, 0xFA, 0xFB, 0xFB, 0xFE, 0xFE],
            &[0x00, 0xFA, 0x00, 0xFB, 0x00, 0xFE, 0x00],
            &[0xFE, 0xFE, 0xFE],
        ];
        for case in cases {
            assert_eq!(unescape(&escape(case)).unwrap().as_slice(), *case);
        }
    }

    #[test]
    fn missing_markers_rejected() {
        for wire in [&[0x01u8, 0x02][..], &[0xFA, 0x01][..], &[0x01, 0xFB][..], &[][..]] {
            let err = unescape(wire).unwrap_err();
            assert!(matches!(err, FrameError::InvalidMessageFormat(_)));
        }
    }

    #[test]
    fn dangling_escape_rejected() {
        let err = unescape(&[0xFA, 0xFE, 0xFB]).unwrap_err();
        assert!(matches!(err, FrameError::InvalidMessageFormat(_)));
    }

    #[test]
    fn unknown_escape_pair_rejected() {
        let err = unescape(&[0xFA, 0xFE, 0x01, 0xFB]).unwrap_err();
        assert!(matches!(err, FrameError::InvalidMessageFormat(_)));
    }
}
