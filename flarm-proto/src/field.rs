//! Comma separated field access with positional error reporting.

use core::slice::Split;

use crate::checksum::hex_digit;
use crate::decimal::{Decimal, DecimalError};
use crate::error::DecodeError;
use crate::types::{Latitude, Longitude, TargetId, UtcTime, Date, TEXT_LEN};

type FieldSplit<'a> = Split<'a, u8, fn(&u8) -> bool>;

fn is_comma(b: &u8) -> bool {
    *b == b','
}

/// Reads the data fields of a sentence body one after another.
///
/// Absent fields (the sentence ended early) and empty fields (`,,`) are
/// distinct: `next_raw` returns `None` for the first and `Some(b"")` for
/// the second.
pub(crate) struct FieldReader<'a> {
    fields: FieldSplit<'a>,
    index: u8,
}

impl<'a> FieldReader<'a> {
    /// Split a checksum-verified body into its tag and a reader over the
    /// remaining fields.
    pub(crate) fn new(body: &'a [u8]) -> (&'a [u8], Self) {
        let mut fields: FieldSplit<'a> = body.split(is_comma as fn(&u8) -> bool);
        // `split` always yields at least one element.
        let tag = fields.next().unwrap_or_default();
        (tag, Self { fields, index: 0 })
    }

    /// Index of the field returned by the next read.
    fn position(&self) -> u8 {
        self.index
    }

    pub(crate) fn next_raw(&mut self) -> Option<&'a [u8]> {
        let field = self.fields.next()?;
        self.index = self.index.saturating_add(1);
        Some(field)
    }

    /// A field that must be present and non-empty.
    pub(crate) fn required(&mut self) -> Result<&'a [u8], DecodeError> {
        let index = self.position();
        match self.next_raw() {
            Some(field) if !field.is_empty() => Ok(field),
            _ => Err(DecodeError::MissingField(index)),
        }
    }

    /// A field that may be absent or empty.
    pub(crate) fn optional(&mut self) -> Option<&'a [u8]> {
        self.next_raw().filter(|f| !f.is_empty())
    }

    /// Parse a required field, mapping parse failures to `InvalidField`.
    pub(crate) fn parse<T>(
        &mut self,
        parse: impl FnOnce(&[u8]) -> Option<T>,
    ) -> Result<T, DecodeError> {
        let index = self.position();
        let field = self.required()?;
        parse(field).ok_or(DecodeError::InvalidField(index))
    }

    /// Parse an optional field; an empty or absent field yields `None`.
    pub(crate) fn parse_opt<T>(
        &mut self,
        parse: impl FnOnce(&[u8]) -> Option<T>,
    ) -> Result<Option<T>, DecodeError> {
        let index = self.position();
        match self.optional() {
            Some(field) => parse(field).map(Some).ok_or(DecodeError::InvalidField(index)),
            None => Ok(None),
        }
    }

    /// Parse an optional number and check its range. A value that parses
    /// but fails `check` is `OutOfRange`.
    pub(crate) fn parse_opt_in<R, T>(
        &mut self,
        parse: impl FnOnce(&[u8]) -> Option<R>,
        check: impl FnOnce(R) -> Option<T>,
    ) -> Result<Option<T>, DecodeError> {
        let index = self.position();
        match self.parse_opt(parse)? {
            Some(raw) => check(raw).map(Some).ok_or(DecodeError::OutOfRange(index)),
            None => Ok(None),
        }
    }

    /// Parse a required field and map it into a protocol enum.
    pub(crate) fn code<T>(
        &mut self,
        parse: impl FnOnce(&[u8]) -> Option<u8>,
        map: impl FnOnce(u8) -> Option<T>,
    ) -> Result<T, DecodeError> {
        let index = self.position();
        let raw = self.parse(parse)?;
        map(raw).ok_or(DecodeError::OutOfRange(index))
    }

    pub(crate) fn decimal(&mut self) -> Result<Decimal, DecodeError> {
        let index = self.position();
        let field = self.required()?;
        decimal_field(field, index)
    }

    pub(crate) fn decimal_opt(&mut self) -> Result<Option<Decimal>, DecodeError> {
        let index = self.position();
        self.optional()
            .map(|field| decimal_field(field, index))
            .transpose()
    }

    /// A single-character field matching one of `allowed`.
    pub(crate) fn flag(&mut self, allowed: &[u8]) -> Result<u8, DecodeError> {
        let index = self.position();
        match self.required()? {
            [c] if allowed.contains(c) => Ok(*c),
            _ => Err(DecodeError::InvalidField(index)),
        }
    }

    pub(crate) fn flag_opt(&mut self, allowed: &[u8]) -> Result<Option<u8>, DecodeError> {
        let index = self.position();
        match self.optional() {
            None => Ok(None),
            Some([c]) if allowed.contains(c) => Ok(Some(*c)),
            Some(_) => Err(DecodeError::InvalidField(index)),
        }
    }

    /// Free text. `None` if absent, possibly empty otherwise.
    pub(crate) fn text(&mut self) -> Result<Option<heapless::String<TEXT_LEN>>, DecodeError> {
        let index = self.position();
        match self.next_raw() {
            None => Ok(None),
            Some(field) => text_field(field)
                .map(Some)
                .ok_or(DecodeError::InvalidField(index)),
        }
    }

    /// Target identifier. `None` if absent, anonymous if empty.
    pub(crate) fn target_id(&mut self) -> Result<Option<TargetId>, DecodeError> {
        let index = self.position();
        match self.next_raw() {
            None => Ok(None),
            Some(field) => core::str::from_utf8(field)
                .ok()
                .and_then(TargetId::new)
                .map(Some)
                .ok_or(DecodeError::InvalidField(index)),
        }
    }

    /// `ddmm.mmmm,N`
    pub(crate) fn latitude_opt(&mut self) -> Result<Option<Latitude>, DecodeError> {
        let index = self.position();
        let value = self.optional();
        let hemisphere = self.flag_opt(b"NS")?;
        match (value, hemisphere) {
            (None, None) => Ok(None),
            (Some(value), Some(h)) => {
                let (degrees, minutes) = angle_field(value, 2, 90, index)?;
                Ok(Some(Latitude {
                    degrees,
                    minutes,
                    north: h == b'N',
                }))
            }
            (Some(_), None) => Err(DecodeError::MissingField(index + 1)),
            (None, Some(_)) => Err(DecodeError::MissingField(index)),
        }
    }

    /// `dddmm.mmmm,E`
    pub(crate) fn longitude_opt(&mut self) -> Result<Option<Longitude>, DecodeError> {
        let index = self.position();
        let value = self.optional();
        let hemisphere = self.flag_opt(b"EW")?;
        match (value, hemisphere) {
            (None, None) => Ok(None),
            (Some(value), Some(h)) => {
                let (degrees, minutes) = angle_field(value, 3, 180, index)?;
                Ok(Some(Longitude {
                    degrees,
                    minutes,
                    east: h == b'E',
                }))
            }
            (Some(_), None) => Err(DecodeError::MissingField(index + 1)),
            (None, Some(_)) => Err(DecodeError::MissingField(index)),
        }
    }

    /// `hhmmss[.ss]`
    pub(crate) fn time_opt(&mut self) -> Result<Option<UtcTime>, DecodeError> {
        let index = self.position();
        let Some(field) = self.optional() else {
            return Ok(None);
        };
        if field.len() < 6 {
            return Err(DecodeError::InvalidField(index));
        }
        let hour = parse_u8_exact(&field[0..2]).ok_or(DecodeError::InvalidField(index))?;
        let minute = parse_u8_exact(&field[2..4]).ok_or(DecodeError::InvalidField(index))?;
        let second = decimal_field(&field[4..], index)?;
        if second.is_negative() || second.integer_part() > 60 || hour > 23 || minute > 59 {
            return Err(DecodeError::OutOfRange(index));
        }
        Ok(Some(UtcTime {
            hour,
            minute,
            second,
        }))
    }

    /// `ddmmyy`
    pub(crate) fn date_opt(&mut self) -> Result<Option<Date>, DecodeError> {
        let index = self.position();
        let Some(field) = self.optional() else {
            return Ok(None);
        };
        if field.len() != 6 {
            return Err(DecodeError::InvalidField(index));
        }
        let day = parse_u8_exact(&field[0..2]).ok_or(DecodeError::InvalidField(index))?;
        let month = parse_u8_exact(&field[2..4]).ok_or(DecodeError::InvalidField(index))?;
        let year = parse_u8_exact(&field[4..6]).ok_or(DecodeError::InvalidField(index))?;
        if !(1..=31).contains(&day) || !(1..=12).contains(&month) {
            return Err(DecodeError::OutOfRange(index));
        }
        Ok(Some(Date { day, month, year }))
    }
}

fn decimal_field(field: &[u8], index: u8) -> Result<Decimal, DecodeError> {
    Decimal::parse(field).map_err(|e| match e {
        DecimalError::Invalid => DecodeError::InvalidField(index),
        DecimalError::Overflow => DecodeError::OutOfRange(index),
    })
}

fn text_field(field: &[u8]) -> Option<heapless::String<TEXT_LEN>> {
    let text = core::str::from_utf8(field).ok()?;
    let mut s = heapless::String::new();
    s.push_str(text).ok()?;
    Some(s)
}

/// Split `dddmm.mmmm` into whole degrees and decimal minutes.
fn angle_field(
    field: &[u8],
    degree_digits: usize,
    max_degrees: u8,
    index: u8,
) -> Result<(u8, Decimal), DecodeError> {
    if field.len() < degree_digits + 2 {
        return Err(DecodeError::InvalidField(index));
    }
    let degrees =
        parse_u8_exact(&field[..degree_digits]).ok_or(DecodeError::InvalidField(index))?;
    let minutes = decimal_field(&field[degree_digits..], index)?;
    if minutes.is_negative() || minutes.integer_part() >= 60 || degrees > max_degrees {
        return Err(DecodeError::OutOfRange(index));
    }
    Ok((degrees, minutes))
}

/// Parse all-digit text as u8.
pub(crate) fn parse_u8_exact(s: &[u8]) -> Option<u8> {
    let value = parse_u32(s)?;
    u8::try_from(value).ok()
}

/// Parse unsigned decimal digits without sign.
pub(crate) fn parse_u32(s: &[u8]) -> Option<u32> {
    if s.is_empty() {
        return None;
    }
    let mut value: u32 = 0;
    for &b in s {
        if !b.is_ascii_digit() {
            return None;
        }
        value = value.checked_mul(10)?.checked_add(u32::from(b - b'0'))?;
    }
    Some(value)
}

/// Parse an optionally signed decimal integer.
pub(crate) fn parse_i32(s: &[u8]) -> Option<i32> {
    let (negative, digits) = match s.first()? {
        b'-' => (true, &s[1..]),
        b'+' => (false, &s[1..]),
        _ => (false, s),
    };
    let magnitude = i64::from(parse_u32(digits)?);
    let value = if negative { -magnitude } else { magnitude };
    i32::try_from(value).ok()
}

/// Parse one or two hex digits.
pub(crate) fn parse_hex_u8(s: &[u8]) -> Option<u8> {
    match s {
        [d] => hex_digit(*d),
        [h, l] => Some((hex_digit(*h)? << 4) | hex_digit(*l)?),
        _ => None,
    }
}

/// Parse one to four hex digits.
pub(crate) fn parse_hex_u16(s: &[u8]) -> Option<u16> {
    if s.is_empty() || s.len() > 4 {
        return None;
    }
    s.iter()
        .try_fold(0u16, |acc, &b| Some((acc << 4) | u16::from(hex_digit(b)?)))
}
