//! Serialize sentences back to wire format.
//!
//! Decoded sentences keep their transmitted digit layout, so encoding a
//! decoded sentence reproduces the original record byte for byte (checksum
//! digits in uppercase).

use core::fmt::{self, Display, Write};

use crate::checksum::{calculate_checksum, checksum_hex};
use crate::error::EncodeError;
use crate::sentence::{AltitudeUnit, Gga, Pflaa, Pflae, Pflau, Pflav, Pgrmz, Rmc, Sentence};
use crate::tokenizer::MAX_SENTENCE_LENGTH;
use crate::types::{Date, Latitude, Longitude, UtcTime};

/// Capacity of an encoded sentence, including CR LF.
pub const ENCODED_CAPACITY: usize = MAX_SENTENCE_LENGTH + 2;

/// An encoded sentence: `$<body>*HH\r\n`.
pub type SentenceBuf = heapless::String<ENCODED_CAPACITY>;

impl Sentence {
    /// Encode to a complete, checksummed line.
    ///
    /// # Example
    ///
    /// ```
    /// use flarm_proto::decode;
    ///
    /// let sentence = decode(b"$PGRMZ,2282,F,2*00").unwrap();
    /// assert_eq!(sentence.encode().unwrap().as_str(), "$PGRMZ,2282,F,2*00\r\n");
    /// ```
    pub fn encode(&self) -> Result<SentenceBuf, EncodeError> {
        self.check_text()?;

        let mut out = SentenceBuf::new();
        out.push('$').map_err(|()| EncodeError::BufferTooSmall)?;
        self.write_body(&mut out)
            .map_err(|fmt::Error| EncodeError::BufferTooSmall)?;

        let checksum = checksum_hex(calculate_checksum(&out.as_bytes()[1..]));
        out.push('*').map_err(|()| EncodeError::BufferTooSmall)?;
        for digit in checksum {
            out.push(char::from(digit))
                .map_err(|()| EncodeError::BufferTooSmall)?;
        }
        // The tokenizer limit applies to the record without line ending.
        if out.len() > MAX_SENTENCE_LENGTH {
            return Err(EncodeError::BufferTooSmall);
        }
        out.push_str("\r\n").map_err(|()| EncodeError::BufferTooSmall)?;
        Ok(out)
    }

    fn write_body<W: Write>(&self, w: &mut W) -> fmt::Result {
        match self {
            Self::Pflau(s) => s.write_fields(w),
            Self::Pflaa(s) => s.write_fields(w),
            Self::Rmc(s) => s.write_fields(w),
            Self::Gga(s) => s.write_fields(w),
            Self::Pgrmz(s) => s.write_fields(w),
            Self::Pflav(s) => s.write_fields(w),
            Self::Pflae(s) => s.write_fields(w),
            // Rejected by `check_text`.
            Self::Unknown(_) => Err(fmt::Error),
        }
    }

    /// Reject text that would break framing.
    fn check_text(&self) -> Result<(), EncodeError> {
        match self {
            Self::Pflau(s) => check_opt(s.id.as_ref().map(|id| id.as_str())),
            Self::Pflaa(s) => check(s.id.as_str()),
            Self::Rmc(s) => check_talker(s.talker),
            Self::Gga(s) => check_talker(s.talker),
            Self::Pgrmz(_) => Ok(()),
            Self::Pflav(s) => {
                check(&s.hardware_version)?;
                check(&s.software_version)?;
                check_opt(s.obstacle_version.as_deref())
            }
            Self::Pflae(s) => check_opt(s.message.as_deref()),
            Self::Unknown(_) => Err(EncodeError::UnknownSentence),
        }
    }
}

fn check(text: &str) -> Result<(), EncodeError> {
    let reserved = text
        .bytes()
        .any(|b| matches!(b, b',' | b'*' | b'$' | b'\r' | b'\n') || !(0x20..0x7F).contains(&b));
    if reserved {
        Err(EncodeError::ReservedCharacter)
    } else {
        Ok(())
    }
}

fn check_opt(text: Option<&str>) -> Result<(), EncodeError> {
    text.map_or(Ok(()), check)
}

fn check_talker(talker: [u8; 2]) -> Result<(), EncodeError> {
    if talker.iter().all(u8::is_ascii_uppercase) {
        Ok(())
    } else {
        Err(EncodeError::ReservedCharacter)
    }
}

/// Writes nothing for `None`, leaving the field empty.
struct Opt<'a, T>(&'a Option<T>);

impl<T: Display> Display for Opt<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(value) => value.fmt(f),
            None => Ok(()),
        }
    }
}

/// A one-byte flag field such as `N` or `A`.
struct Flag(Option<u8>);

impl Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(c) => f.write_char(char::from(c)),
            None => Ok(()),
        }
    }
}

struct TimeField<'a>(&'a Option<UtcTime>);

impl Display for TimeField<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(t) => write!(f, "{:02}{:02}{}", t.hour, t.minute, t.second),
            None => Ok(()),
        }
    }
}

struct DateField<'a>(&'a Option<Date>);

impl Display for DateField<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(d) => write!(f, "{:02}{:02}{:02}", d.day, d.month, d.year),
            None => Ok(()),
        }
    }
}

/// Latitude and hemisphere, two fields.
struct LatField<'a>(&'a Option<Latitude>);

impl Display for LatField<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(lat) => write!(
                f,
                "{:02}{},{}",
                lat.degrees,
                lat.minutes,
                if lat.north { 'N' } else { 'S' }
            ),
            None => f.write_char(','),
        }
    }
}

/// Longitude and hemisphere, two fields.
struct LonField<'a>(&'a Option<Longitude>);

impl Display for LonField<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(lon) => write!(
                f,
                "{:03}{},{}",
                lon.degrees,
                lon.minutes,
                if lon.east { 'E' } else { 'W' }
            ),
            None => f.write_char(','),
        }
    }
}

impl Pflau {
    fn write_fields<W: Write>(&self, w: &mut W) -> fmt::Result {
        write!(
            w,
            "PFLAU,{},{},{},{},{},{},{:X},{},{}",
            self.rx,
            u8::from(self.tx),
            self.gps.as_u8(),
            u8::from(self.power),
            self.alarm_level.as_u8(),
            Opt(&self.relative_bearing),
            self.alarm_type.as_u8(),
            Opt(&self.relative_vertical),
            Opt(&self.relative_distance),
        )?;
        if let Some(id) = &self.id {
            write!(w, ",{}", id.as_str())?;
        }
        Ok(())
    }
}

impl Pflaa {
    fn write_fields<W: Write>(&self, w: &mut W) -> fmt::Result {
        write!(
            w,
            "PFLAA,{},{},{},{},{},{},{},{},{},{},{:X}",
            self.alarm_level.as_u8(),
            self.relative_north,
            Opt(&self.relative_east),
            self.relative_vertical,
            self.id_type.as_u8(),
            self.id.as_str(),
            Opt(&self.track),
            Opt(&self.turn_rate),
            Opt(&self.ground_speed),
            Opt(&self.climb_rate),
            self.aircraft_type.as_u8(),
        )?;
        if let Some(no_track) = self.no_track {
            write!(w, ",{no_track}")?;
        }
        Ok(())
    }
}

impl Rmc {
    fn write_fields<W: Write>(&self, w: &mut W) -> fmt::Result {
        write!(
            w,
            "{}{}RMC,{},{},{},{},{},{},{},{},{}",
            char::from(self.talker[0]),
            char::from(self.talker[1]),
            TimeField(&self.time),
            if self.valid { 'A' } else { 'V' },
            LatField(&self.latitude),
            LonField(&self.longitude),
            Opt(&self.speed),
            Opt(&self.course),
            DateField(&self.date),
            Opt(&self.magnetic_variation),
            Flag(self.variation_direction),
        )?;
        if let Some(mode) = self.mode {
            write!(w, ",{}", char::from(mode))?;
        }
        Ok(())
    }
}

impl Gga {
    fn write_fields<W: Write>(&self, w: &mut W) -> fmt::Result {
        write!(
            w,
            "{}{}GGA,{},{},{},{},{},{},{},{},{},{},{},{}",
            char::from(self.talker[0]),
            char::from(self.talker[1]),
            TimeField(&self.time),
            LatField(&self.latitude),
            LonField(&self.longitude),
            self.quality,
            Opt(&self.satellites),
            Opt(&self.hdop),
            Opt(&self.altitude),
            Flag(self.altitude_unit),
            Opt(&self.geoid_separation),
            Flag(self.geoid_unit),
            Opt(&self.dgps_age),
            Opt(&self.dgps_station),
        )
    }
}

impl Pgrmz {
    fn write_fields<W: Write>(&self, w: &mut W) -> fmt::Result {
        let unit = match self.unit {
            AltitudeUnit::Feet => 'F',
            AltitudeUnit::Meters => 'M',
        };
        write!(
            w,
            "PGRMZ,{},{},{}",
            self.altitude,
            unit,
            Opt(&self.fix_dimension)
        )
    }
}

impl Pflav {
    fn write_fields<W: Write>(&self, w: &mut W) -> fmt::Result {
        write!(
            w,
            "PFLAV,{},{},{}",
            self.query_type.as_char(),
            self.hardware_version,
            self.software_version
        )?;
        if let Some(obstacle) = &self.obstacle_version {
            write!(w, ",{obstacle}")?;
        }
        Ok(())
    }
}

impl Pflae {
    fn write_fields<W: Write>(&self, w: &mut W) -> fmt::Result {
        write!(
            w,
            "PFLAE,{},{},{:X}",
            self.query_type.as_char(),
            self.severity.as_u8(),
            self.error_code
        )?;
        if let Some(message) = &self.message {
            write!(w, ",{message}")?;
        }
        Ok(())
    }
}
