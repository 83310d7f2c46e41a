use crate::HashError;

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Decode a single ASCII hex digit, case-insensitive.
fn nibble(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

/// Hex-encode `bytes` to a new lowercase `String`.
pub fn encode(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for &b in bytes {
        out.push(HEX_DIGITS[(b >> 4) as usize] as char);
        out.push(HEX_DIGITS[(b & 0x0f) as usize] as char);
    }
    out
}

/// Decode a hex string into `buf`. The string length must be exactly
/// `buf.len() * 2`; decoding is case-insensitive.
pub fn decode(hex: &str, buf: &mut [u8]) -> Result<(), HashError> {
    let hex = hex.as_bytes();
    if hex.len() != buf.len() * 2 {
        return Err(HashError::InvalidHexLength {
            expected: buf.len() * 2,
            actual: hex.len(),
        });
    }
    for (i, out) in buf.iter_mut().enumerate() {
        let hi = nibble(hex[i * 2]).ok_or(HashError::InvalidHex {
            position: i * 2,
            character: hex[i * 2] as char,
        })?;
        let lo = nibble(hex[i * 2 + 1]).ok_or(HashError::InvalidHex {
            position: i * 2 + 1,
            character: hex[i * 2 + 1] as char,
        })?;
        *out = (hi << 4) | lo;
    }
    Ok(())
}

/// Check if a string is entirely hex digits with even length.
pub fn is_valid(s: &str) -> bool {
    s.len() % 2 == 0 && s.bytes().all(|b| nibble(b).is_some())
}
