//! NMEA checksum: XOR of every byte between `$` and `*`.

use crate::error::DecodeError;

/// Hex digits lookup table for fast conversion.
const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// Calculate the XOR checksum of a sentence body.
#[inline]
#[must_use]
pub fn calculate_checksum(data: &[u8]) -> u8 {
    data.iter().fold(0u8, |acc, &b| acc ^ b)
}

/// Format a checksum as two uppercase hex digits.
#[inline]
#[must_use]
pub fn checksum_hex(value: u8) -> [u8; 2] {
    [
        HEX_DIGITS[(value >> 4) as usize],
        HEX_DIGITS[(value & 0xF) as usize],
    ]
}

/// Split a record into its body and verify the trailing checksum.
///
/// The record must start with `$` and end with `*HH`. Line endings must
/// already be stripped. Returns the bytes between `$` and `*`.
pub fn verify(record: &[u8]) -> Result<&[u8], DecodeError> {
    if record.is_empty() {
        return Err(DecodeError::Empty);
    }
    if record[0] != b'$' {
        return Err(DecodeError::MissingStart);
    }

    let star = record
        .iter()
        .rposition(|&b| b == b'*')
        .ok_or(DecodeError::MissingChecksum)?;

    let body = &record[1..star];
    let received = parse_hex_u8(&record[star + 1..])?;
    let computed = calculate_checksum(body);

    if computed != received {
        return Err(DecodeError::ChecksumMismatch { computed, received });
    }

    Ok(body)
}

/// Parse a 2-character hex string as u8.
#[inline]
fn parse_hex_u8(s: &[u8]) -> Result<u8, DecodeError> {
    if s.len() != 2 {
        return Err(DecodeError::MalformedChecksum);
    }
    let high = hex_digit(s[0]).ok_or(DecodeError::MalformedChecksum)?;
    let low = hex_digit(s[1]).ok_or(DecodeError::MalformedChecksum)?;
    Ok((high << 4) | low)
}

/// Convert a hex character to its value.
#[inline]
pub(crate) fn hex_digit(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'A'..=b'F' => Some(b - b'A' + 10),
        b'a'..=b'f' => Some(b - b'a' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_classic_rmc() {
        let body = b"GPRMC,123519,A,4807.038,N,01131.000,E,022.4,084.4,230394,003.1,W";
        assert_eq!(calculate_checksum(body), 0x6A);
    }

    #[test]
    fn test_checksum_hex() {
        assert_eq!(&checksum_hex(0x6A), b"6A");
        assert_eq!(&checksum_hex(0x00), b"00");
        assert_eq!(&checksum_hex(0xF1), b"F1");
    }

    #[test]
    fn test_verify_accepts_lowercase_hex() {
        let body = verify(b"$PFLAE,A,3,21*03").unwrap();
        assert_eq!(body, b"PFLAE,A,3,21");
        assert!(verify(b"$GPRMC,123519,A,4807.038,N,01131.000,E,022.4,084.4,230394,003.1,W*6a").is_ok());
    }

    #[test]
    fn test_verify_mismatch() {
        assert_eq!(
            verify(b"$INVALID*00"),
            Err(DecodeError::ChecksumMismatch {
                computed: 0x51,
                received: 0x00
            })
        );
    }

    #[test]
    fn test_verify_framing_errors() {
        assert_eq!(verify(b""), Err(DecodeError::Empty));
        assert_eq!(verify(b"PFLAE,A,3,21*03"), Err(DecodeError::MissingStart));
        assert_eq!(verify(b"$PFLAE,A,3,21"), Err(DecodeError::MissingChecksum));
        assert_eq!(verify(b"$PFLAE,A,3,21*0"), Err(DecodeError::MalformedChecksum));
        assert_eq!(verify(b"$PFLAE,A,3,21*0G"), Err(DecodeError::MalformedChecksum));
        assert_eq!(verify(b"$PFLAE,A,3,21*033"), Err(DecodeError::MalformedChecksum));
    }
}
