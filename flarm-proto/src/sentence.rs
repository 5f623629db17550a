//! Typed sentences as they appear on the wire.
//!
//! Fields keep the protocol's units and the exact digits that were
//! transmitted; conversion to canonical units happens in
//! [`crate::message`].

use crate::decimal::Decimal;
use crate::error::DecodeError;
use crate::field::{parse_hex_u16, parse_hex_u8, parse_i32, parse_u32, parse_u8_exact, FieldReader};
use crate::types::{
    AircraftType, AlarmLevel, AlarmType, Date, GpsStatus, IdType, Latitude, Longitude, Severity,
    TargetId, Text, UtcTime,
};

/// Maximum length of a sentence tag.
pub const TAG_LEN: usize = 8;

/// Sentence tag, e.g. `PFLAU` or `GPRMC`.
pub type Tag = heapless::String<TAG_LEN>;

/// Direction of a configuration or status exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum QueryType {
    /// `R`: sent to the device.
    Request,
    /// `A`: reply from the device.
    Answer,
}

impl QueryType {
    pub(crate) fn from_flag(flag: u8) -> Self {
        if flag == b'R' {
            Self::Request
        } else {
            Self::Answer
        }
    }

    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::Request => 'R',
            Self::Answer => 'A',
        }
    }
}

/// Unit of a PGRMZ altitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AltitudeUnit {
    Feet,
    Meters,
}

/// `PFLAU`: heartbeat, status and the most relevant alarm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pflau {
    /// Number of devices with unique IDs currently received.
    pub rx: u8,
    pub tx: bool,
    pub gps: GpsStatus,
    pub power: bool,
    pub alarm_level: AlarmLevel,
    /// Degrees relative to own track, -180..180. Empty for
    /// non-directional targets.
    pub relative_bearing: Option<i16>,
    pub alarm_type: AlarmType,
    /// Meters, positive above.
    pub relative_vertical: Option<i32>,
    /// Meters.
    pub relative_distance: Option<u32>,
    /// `None` when the field is absent, anonymous when present but empty.
    pub id: Option<TargetId>,
}

/// `PFLAA`: one nearby target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pflaa {
    pub alarm_level: AlarmLevel,
    /// Meters north of own position; the distance for non-directional
    /// targets.
    pub relative_north: i32,
    /// Meters east of own position; empty for non-directional targets.
    pub relative_east: Option<i32>,
    /// Meters, positive above.
    pub relative_vertical: i32,
    pub id_type: IdType,
    pub id: TargetId,
    /// True track in degrees.
    pub track: Option<u16>,
    /// Degrees per second, positive clockwise.
    pub turn_rate: Option<Decimal>,
    /// Meters per second.
    pub ground_speed: Option<u16>,
    /// Meters per second, positive up.
    pub climb_rate: Option<Decimal>,
    pub aircraft_type: AircraftType,
    /// Stealth / no-track flag, sent by newer firmware only.
    pub no_track: Option<u8>,
}

/// `xxRMC`: recommended minimum GNSS data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rmc {
    pub talker: [u8; 2],
    pub time: Option<UtcTime>,
    /// Status `A`; `V` means the fix is void.
    pub valid: bool,
    pub latitude: Option<Latitude>,
    pub longitude: Option<Longitude>,
    /// Knots.
    pub speed: Option<Decimal>,
    /// True course in degrees.
    pub course: Option<Decimal>,
    pub date: Option<Date>,
    /// Degrees.
    pub magnetic_variation: Option<Decimal>,
    /// `E` or `W`.
    pub variation_direction: Option<u8>,
    /// FAA mode indicator (NMEA 2.3 and later).
    pub mode: Option<u8>,
}

/// `xxGGA`: fix data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gga {
    pub talker: [u8; 2],
    pub time: Option<UtcTime>,
    pub latitude: Option<Latitude>,
    pub longitude: Option<Longitude>,
    /// 0 means no fix.
    pub quality: u8,
    pub satellites: Option<Decimal>,
    pub hdop: Option<Decimal>,
    /// Above mean sea level.
    pub altitude: Option<Decimal>,
    pub altitude_unit: Option<u8>,
    pub geoid_separation: Option<Decimal>,
    pub geoid_unit: Option<u8>,
    /// Seconds since the last DGPS update.
    pub dgps_age: Option<Decimal>,
    pub dgps_station: Option<Decimal>,
}

/// `PGRMZ`: barometric (pressure) altitude.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pgrmz {
    pub altitude: Decimal,
    pub unit: AltitudeUnit,
    /// 2 = user altitude, 3 = GPS altitude.
    pub fix_dimension: Option<u8>,
}

/// `PFLAV`: version information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pflav {
    pub query_type: QueryType,
    pub hardware_version: Text,
    pub software_version: Text,
    /// `None` when the field is absent, empty when no database is loaded.
    pub obstacle_version: Option<Text>,
}

/// `PFLAE`: self-test result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pflae {
    pub query_type: QueryType,
    pub severity: Severity,
    pub error_code: u16,
    pub message: Option<Text>,
}

/// A decoded sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sentence {
    Pflau(Pflau),
    Pflaa(Pflaa),
    Rmc(Rmc),
    Gga(Gga),
    Pgrmz(Pgrmz),
    Pflav(Pflav),
    Pflae(Pflae),
    /// Framing and checksum were valid but the tag is not handled.
    Unknown(Tag),
}

impl Sentence {
    /// Short name of the sentence type, used for logging.
    #[must_use]
    pub fn kind(&self) -> &str {
        match self {
            Self::Pflau(_) => "PFLAU",
            Self::Pflaa(_) => "PFLAA",
            Self::Rmc(_) => "RMC",
            Self::Gga(_) => "GGA",
            Self::Pgrmz(_) => "PGRMZ",
            Self::Pflav(_) => "PFLAV",
            Self::Pflae(_) => "PFLAE",
            Self::Unknown(tag) => tag.as_str(),
        }
    }
}

impl Pflau {
    pub(crate) fn read(r: &mut FieldReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            rx: r.parse(parse_u8_exact)?,
            tx: r.code(parse_u8_exact, bool_flag)?,
            gps: r.code(parse_u8_exact, GpsStatus::from_u8)?,
            power: r.code(parse_u8_exact, bool_flag)?,
            alarm_level: r.code(parse_u8_exact, AlarmLevel::from_u8)?,
            relative_bearing: r.parse_opt_in(parse_i32, bearing)?,
            alarm_type: r.code(parse_hex_u8, |v| Some(AlarmType::from_u8(v)))?,
            relative_vertical: r.parse_opt(parse_i32)?,
            relative_distance: r.parse_opt(parse_u32)?,
            id: r.target_id()?,
        })
    }
}

impl Pflaa {
    pub(crate) fn read(r: &mut FieldReader<'_>) -> Result<Self, DecodeError> {
        let alarm_level = r.code(parse_u8_exact, AlarmLevel::from_u8)?;
        let relative_north = r.parse(parse_i32)?;
        let relative_east = r.parse_opt(parse_i32)?;
        let relative_vertical = r.parse(parse_i32)?;
        let id_type = r.code(parse_u8_exact, |v| Some(IdType::from_u8(v)))?;
        // Unlike PFLAU, every PFLAA target carries an ID.
        let id = r
            .target_id()?
            .filter(|id| !id.is_anonymous())
            .ok_or(DecodeError::MissingField(5))?;
        Ok(Self {
            alarm_level,
            relative_north,
            relative_east,
            relative_vertical,
            id_type,
            id,
            track: r.parse_opt_in(parse_u32, track)?,
            turn_rate: r.decimal_opt()?,
            ground_speed: r.parse_opt(|s| parse_u32(s).and_then(|v| u16::try_from(v).ok()))?,
            climb_rate: r.decimal_opt()?,
            aircraft_type: r.code(parse_hex_u8, AircraftType::from_u8)?,
            no_track: r.parse_opt(parse_u8_exact)?,
        })
    }
}

impl Rmc {
    pub(crate) fn read(talker: [u8; 2], r: &mut FieldReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            talker,
            time: r.time_opt()?,
            valid: r.flag(b"AV")? == b'A',
            latitude: r.latitude_opt()?,
            longitude: r.longitude_opt()?,
            speed: r.decimal_opt()?,
            course: r.decimal_opt()?,
            date: r.date_opt()?,
            magnetic_variation: r.decimal_opt()?,
            variation_direction: r.flag_opt(b"EW")?,
            mode: r.flag_opt(b"ADEMSNPRFV")?,
        })
    }
}

impl Gga {
    pub(crate) fn read(talker: [u8; 2], r: &mut FieldReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            talker,
            time: r.time_opt()?,
            latitude: r.latitude_opt()?,
            longitude: r.longitude_opt()?,
            quality: r.parse(parse_u8_exact)?,
            satellites: r.decimal_opt()?,
            hdop: r.decimal_opt()?,
            altitude: r.decimal_opt()?,
            altitude_unit: r.flag_opt(b"MF")?,
            geoid_separation: r.decimal_opt()?,
            geoid_unit: r.flag_opt(b"MF")?,
            dgps_age: r.decimal_opt()?,
            dgps_station: r.decimal_opt()?,
        })
    }
}

impl Pgrmz {
    pub(crate) fn read(r: &mut FieldReader<'_>) -> Result<Self, DecodeError> {
        let altitude = r.decimal()?;
        let unit = match r.flag(b"FfMm")? {
            b'F' | b'f' => AltitudeUnit::Feet,
            _ => AltitudeUnit::Meters,
        };
        Ok(Self {
            altitude,
            unit,
            fix_dimension: r.parse_opt(parse_u8_exact)?,
        })
    }
}

impl Pflav {
    pub(crate) fn read(r: &mut FieldReader<'_>) -> Result<Self, DecodeError> {
        let query_type = QueryType::from_flag(r.flag(b"AR")?);
        let hardware_version = r.text()?.ok_or(DecodeError::MissingField(1))?;
        let software_version = r.text()?.ok_or(DecodeError::MissingField(2))?;
        Ok(Self {
            query_type,
            hardware_version,
            software_version,
            obstacle_version: r.text()?,
        })
    }
}

impl Pflae {
    pub(crate) fn read(r: &mut FieldReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            query_type: QueryType::from_flag(r.flag(b"AR")?),
            severity: r.code(parse_u8_exact, Severity::from_u8)?,
            error_code: r.parse(parse_hex_u16)?,
            message: r.text()?,
        })
    }
}

fn bool_flag(value: u8) -> Option<bool> {
    match value {
        0 => Some(false),
        1 => Some(true),
        _ => None,
    }
}

/// Degrees relative to own track.
fn bearing(value: i32) -> Option<i16> {
    if (-180..=180).contains(&value) {
        i16::try_from(value).ok()
    } else {
        None
    }
}

/// True track in whole degrees.
fn track(value: u32) -> Option<u16> {
    if value < 360 {
        u16::try_from(value).ok()
    } else {
        None
    }
}
