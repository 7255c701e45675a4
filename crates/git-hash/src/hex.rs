//! Lowercase hex encoding and case-insensitive decoding.

use std::fmt;

use crate::HashError;

/// Sentinel in [`NIBBLE`] for bytes that are not hex digits.
const INVALID: u8 = 0xff;

/// ASCII byte → nibble value.
const NIBBLE: [u8; 256] = {
    let mut table = [INVALID; 256];
    let mut i = 0usize;
    while i < 256 {
        let c = i as u8;
        table[i] = match c {
            b'0'..=b'9' => c - b'0',
            b'a'..=b'f' => c - b'a' + 10,
            b'A'..=b'F' => c - b'A' + 10,
            _ => INVALID,
        };
        i += 1;
    }
    table
};

const DIGITS: &[u8; 16] = b"0123456789abcdef";

#[inline]
fn digit_pair(b: u8) -> [u8; 2] {
    [DIGITS[(b >> 4) as usize], DIGITS[(b & 0x0f) as usize]]
}

/// Hex-encode `bytes` into `buf`. `buf` must be at least `bytes.len() * 2` bytes.
///
/// # Panics
///
/// Panics if `buf` is too short.
pub fn hex_encode(bytes: &[u8], buf: &mut [u8]) {
    assert!(
        buf.len() >= bytes.len() * 2,
        "hex_encode: buffer too short"
    );
    for (pair, &b) in buf.chunks_exact_mut(2).zip(bytes) {
        pair.copy_from_slice(&digit_pair(b));
    }
}

/// Hex-encode `bytes` to a new `String`.
pub fn hex_to_string(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for &b in bytes {
        let [hi, lo] = digit_pair(b);
        out.push(hi as char);
        out.push(lo as char);
    }
    out
}

/// Write the hex form of `bytes` straight into a formatter.
pub fn write_hex(bytes: &[u8], f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut buf = [0u8; 64];
    for chunk in bytes.chunks(32) {
        let out = &mut buf[..chunk.len() * 2];
        hex_encode(chunk, out);
        // Only ASCII digits were written.
        f.write_str(std::str::from_utf8(out).map_err(|_| fmt::Error)?)?;
    }
    Ok(())
}

/// Decode a hex string into `buf`. The hex string length must be exactly `buf.len() * 2`.
///
/// Upper- and lowercase digits are both accepted. Any other byte, including
/// a sign character, is rejected with its position.
pub fn hex_decode(hex: &str, buf: &mut [u8]) -> Result<(), HashError> {
    let hex = hex.as_bytes();
    if hex.len() != buf.len() * 2 {
        return Err(HashError::InvalidHexLength {
            expected: buf.len() * 2,
            actual: hex.len(),
        });
    }
    for (i, (out, pair)) in buf.iter_mut().zip(hex.chunks_exact(2)).enumerate() {
        let hi = nibble(pair[0], i * 2)?;
        let lo = nibble(pair[1], i * 2 + 1)?;
        *out = (hi << 4) | lo;
    }
    Ok(())
}

fn nibble(c: u8, position: usize) -> Result<u8, HashError> {
    match NIBBLE[c as usize] {
        INVALID => Err(HashError::InvalidHex {
            position,
            character: c as char,
        }),
        v => Ok(v),
    }
}

/// Decode a hex string to a new `Vec<u8>`.
pub fn hex_to_bytes(hex: &str) -> Result<Vec<u8>, HashError> {
    if hex.len() % 2 != 0 {
        return Err(HashError::InvalidHexLength {
            expected: hex.len() + 1,
            actual: hex.len(),
        });
    }
    let mut buf = vec![0u8; hex.len() / 2];
    hex_decode(hex, &mut buf)?;
    Ok(buf)
}

/// Check if a string is valid hexadecimal (even length, all hex chars).
pub fn is_valid_hex(s: &str) -> bool {
    s.len() % 2 == 0 && s.bytes().all(|b| NIBBLE[b as usize] != INVALID)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_known_bytes() {
        assert_eq!(hex_to_string(&[0xde, 0xad, 0xbe, 0xef, 0x00, 0xff]), "deadbeef00ff");
        assert_eq!(hex_to_string(&[]), "");
    }

    #[test]
    fn decode_mixed_case() {
        assert_eq!(hex_to_bytes("DeAdBeEf").unwrap(), [0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(hex_to_bytes("DEADBEEF").unwrap(), [0xde, 0xad, 0xbe, 0xef]);
    }

    #[test]
    fn decode_reports_position_of_bad_digit() {
        let err = hex_to_bytes("deadgoof").unwrap_err();
        assert_eq!(
            err,
            HashError::InvalidHex {
                position: 4,
                character: 'g'
            }
        );

        let err = hex_to_bytes("0g").unwrap_err();
        assert_eq!(
            err,
            HashError::InvalidHex {
                position: 1,
                character: 'g'
            }
        );
    }

    #[test]
    fn decode_rejects_sign_characters() {
        let mut buf = [0u8; 2];
        assert!(hex_decode("+123", &mut buf).is_err());
        assert!(hex_decode("-123", &mut buf).is_err());
    }

    #[test]
    fn decode_odd_length() {
        let err = hex_to_bytes("abc").unwrap_err();
        assert!(matches!(err, HashError::InvalidHexLength { .. }));
    }

    #[test]
    fn decode_wrong_buffer_length() {
        let mut buf = [0u8; 4];
        let err = hex_decode("abcd", &mut buf).unwrap_err();
        assert_eq!(
            err,
            HashError::InvalidHexLength {
                expected: 8,
                actual: 4
            }
        );
    }

    #[test]
    fn is_valid_hex_checks() {
        assert!(is_valid_hex("0123456789abcdefABCDEF"));
        assert!(!is_valid_hex("xyz0"));
        assert!(!is_valid_hex("abc"));
        assert!(is_valid_hex(""));
    }

    #[test]
    fn encode_to_buffer() {
        let mut buf = [0u8; 6];
        hex_encode(&[0x01, 0x23, 0x45], &mut buf);
        assert_eq!(&buf, b"012345");
    }

    #[test]
    fn write_hex_matches_to_string() {
        struct Wrap<'a>(&'a [u8]);
        impl fmt::Display for Wrap<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write_hex(self.0, f)
            }
        }
        let bytes: Vec<u8> = (0..=255).collect();
        assert_eq!(Wrap(&bytes).to_string(), hex_to_string(&bytes));
    }
}
