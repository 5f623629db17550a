//! Fixed decimal numbers as transmitted on the wire.
//!
//! NMEA fields such as `022.4` or `-1.40` carry meaning in their digits:
//! leading zeros and the number of fractional digits vary per device. A
//! [`Decimal`] keeps the exact digits so that re-encoding a decoded sentence
//! reproduces the original text, and converts to `f64` only on request.

use core::fmt;

/// Exact powers of ten representable in `u64`.
const POW10_U64: [u64; 20] = [
    1,
    10,
    100,
    1_000,
    10_000,
    100_000,
    1_000_000,
    10_000_000,
    100_000_000,
    1_000_000_000,
    10_000_000_000,
    100_000_000_000,
    1_000_000_000_000,
    10_000_000_000_000,
    100_000_000_000_000,
    1_000_000_000_000_000,
    10_000_000_000_000_000,
    100_000_000_000_000_000,
    1_000_000_000_000_000_000,
    10_000_000_000_000_000_000,
];

/// Largest number of fractional digits accepted.
pub const MAX_SCALE: u8 = 18;

/// Error returned when text is not a decimal number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecimalError {
    /// Not a decimal number.
    Invalid,
    /// Too many digits to represent exactly.
    Overflow,
}

/// A decimal number with the digit layout it was transmitted with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Decimal {
    negative: bool,
    /// All significant digits, integer and fraction, as one integer.
    digits: u64,
    /// Number of fractional digits.
    scale: u8,
    /// Number of digits before the decimal point, including leading zeros.
    int_width: u8,
}

impl Decimal {
    /// Create a decimal from its digit layout.
    ///
    /// `digits = 224, scale = 1, int_width = 3` is `022.4`.
    #[must_use]
    pub const fn new(negative: bool, digits: u64, scale: u8, int_width: u8) -> Self {
        Self {
            negative,
            digits,
            scale,
            int_width,
        }
    }

    /// Create an integral decimal without leading zeros.
    #[must_use]
    pub fn from_int(value: i64) -> Self {
        let digits = value.unsigned_abs();
        Self {
            negative: value < 0,
            digits,
            scale: 0,
            int_width: digit_count(digits),
        }
    }

    /// Parse ASCII text such as `-1.4`, `022.4`, `.5` or `7`.
    pub fn parse(s: &[u8]) -> Result<Self, DecimalError> {
        let (negative, s) = match s.first() {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            _ => (false, s),
        };
        if s.is_empty() {
            return Err(DecimalError::Invalid);
        }

        let mut digits: u64 = 0;
        let mut int_width: u8 = 0;
        let mut scale: u8 = 0;
        let mut seen_point = false;
        let mut seen_digit = false;

        for &b in s {
            match b {
                b'.' if !seen_point => seen_point = true,
                b'0'..=b'9' => {
                    seen_digit = true;
                    digits = digits
                        .checked_mul(10)
                        .and_then(|v| v.checked_add(u64::from(b - b'0')))
                        .ok_or(DecimalError::Overflow)?;
                    let counter = if seen_point { &mut scale } else { &mut int_width };
                    *counter = counter.checked_add(1).ok_or(DecimalError::Overflow)?;
                }
                _ => return Err(DecimalError::Invalid),
            }
        }

        if !seen_digit {
            return Err(DecimalError::Invalid);
        }
        if scale > MAX_SCALE {
            return Err(DecimalError::Overflow);
        }

        Ok(Self {
            negative,
            digits,
            scale,
            int_width,
        })
    }

    /// Whether the value carries a minus sign.
    #[inline]
    #[must_use]
    pub const fn is_negative(&self) -> bool {
        self.negative
    }

    /// Number of fractional digits.
    #[inline]
    #[must_use]
    pub const fn scale(&self) -> u8 {
        self.scale
    }

    /// Integer part, truncated toward zero, ignoring the sign.
    #[inline]
    #[must_use]
    pub const fn integer_part(&self) -> u64 {
        self.digits / POW10_U64[self.scale as usize]
    }

    /// Closest `f64` to the exact decimal value.
    #[must_use]
    pub fn to_f64(&self) -> f64 {
        // Division by an exact power of ten rounds once, to the nearest f64.
        let magnitude = self.digits as f64 / POW10_U64[self.scale as usize] as f64;
        if self.negative {
            -magnitude
        } else {
            magnitude
        }
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let divisor = POW10_U64[self.scale as usize];
        let int_part = self.digits / divisor;
        let frac_part = self.digits % divisor;

        if self.negative {
            f.write_str("-")?;
        }
        if self.int_width > 0 || int_part != 0 {
            write!(f, "{:0width$}", int_part, width = self.int_width as usize)?;
        }
        if self.scale > 0 {
            write!(f, ".{:0width$}", frac_part, width = self.scale as usize)?;
        }
        Ok(())
    }
}

/// Number of decimal digits in `value` (1 for zero).
const fn digit_count(mut value: u64) -> u8 {
    let mut count = 1;
    while value >= 10 {
        value /= 10;
        count += 1;
    }
    count
}

#[cfg(test)]
mod tests {
    extern crate std;
    use std::string::ToString;

    use super::*;

    #[test]
    fn test_parse_preserves_layout() {
        for text in ["022.4", "-1.4", "0.146", "545.4", "7", "000.0", ".5", "-0.0", "4404.13993"] {
            let d = Decimal::parse(text.as_bytes()).unwrap();
            assert_eq!(d.to_string(), text);
        }
    }

    #[test]
    fn test_to_f64() {
        assert_eq!(Decimal::parse(b"022.4").unwrap().to_f64(), 22.4);
        assert_eq!(Decimal::parse(b"-1.4").unwrap().to_f64(), -1.4);
        assert_eq!(Decimal::parse(b"7").unwrap().to_f64(), 7.0);
        assert_eq!(Decimal::parse(b"07.038").unwrap().to_f64(), 7.038);
    }

    #[test]
    fn test_integer_part() {
        assert_eq!(Decimal::parse(b"4807.038").unwrap().integer_part(), 4807);
        assert_eq!(Decimal::parse(b"-12.9").unwrap().integer_part(), 12);
    }

    #[test]
    fn test_from_int() {
        assert_eq!(Decimal::from_int(-120).to_string(), "-120");
        assert_eq!(Decimal::from_int(0).to_string(), "0");
        assert_eq!(Decimal::from_int(2282).to_f64(), 2282.0);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(Decimal::parse(b""), Err(DecimalError::Invalid));
        assert_eq!(Decimal::parse(b"-"), Err(DecimalError::Invalid));
        assert_eq!(Decimal::parse(b"."), Err(DecimalError::Invalid));
        assert_eq!(Decimal::parse(b"1.2.3"), Err(DecimalError::Invalid));
        assert_eq!(Decimal::parse(b"12a"), Err(DecimalError::Invalid));
        assert_eq!(
            Decimal::parse(b"123456789012345678901234"),
            Err(DecimalError::Overflow)
        );
    }
}
