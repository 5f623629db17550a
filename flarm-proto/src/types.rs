//! Field types shared by several sentences.

use core::fmt;

use crate::decimal::Decimal;

/// Maximum length of a traffic target identifier.
pub const TARGET_ID_LEN: usize = 8;

/// Maximum length of a free-text field (versions, error messages).
pub const TEXT_LEN: usize = 48;

/// Free-text field content.
pub type Text = heapless::String<TEXT_LEN>;

/// Identifier of a traffic target, usually six hex digits.
///
/// The empty identifier stands for a target the device did not identify,
/// e.g. a non-directional alarm without ID.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TargetId(heapless::String<TARGET_ID_LEN>);

impl TargetId {
    /// The identifier used for targets reported without an ID.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self(heapless::String::new())
    }

    /// Build an identifier from text. Returns `None` if it is too long.
    #[must_use]
    pub fn new(id: &str) -> Option<Self> {
        let mut s = heapless::String::new();
        s.push_str(id).ok()?;
        Some(Self(s))
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    #[inline]
    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_anonymous() {
            f.write_str("<anonymous>")
        } else {
            f.write_str(self.as_str())
        }
    }
}

/// Latitude as transmitted: `ddmm.mmmm` plus hemisphere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Latitude {
    pub degrees: u8,
    pub minutes: Decimal,
    pub north: bool,
}

impl Latitude {
    /// Signed decimal degrees, south negative.
    #[must_use]
    pub fn to_degrees(&self) -> f64 {
        let value = f64::from(self.degrees) + self.minutes.to_f64() / 60.0;
        if self.north {
            value
        } else {
            -value
        }
    }
}

/// Longitude as transmitted: `dddmm.mmmm` plus hemisphere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Longitude {
    pub degrees: u8,
    pub minutes: Decimal,
    pub east: bool,
}

impl Longitude {
    /// Signed decimal degrees, west negative.
    #[must_use]
    pub fn to_degrees(&self) -> f64 {
        let value = f64::from(self.degrees) + self.minutes.to_f64() / 60.0;
        if self.east {
            value
        } else {
            -value
        }
    }
}

/// UTC time of day, `hhmmss.ss`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UtcTime {
    pub hour: u8,
    pub minute: u8,
    pub second: Decimal,
}

impl fmt::Display for UtcTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{}", self.hour, self.minute, self.second)
    }
}

/// Calendar date, `ddmmyy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Date {
    pub day: u8,
    pub month: u8,
    /// Two-digit year as transmitted.
    pub year: u8,
}

/// Alarm level reported by PFLAU and PFLAA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlarmLevel {
    /// No alarm.
    #[default]
    None,
    /// 13-18 seconds to impact.
    Low,
    /// 9-12 seconds to impact.
    Important,
    /// 0-8 seconds to impact.
    Urgent,
}

impl AlarmLevel {
    #[must_use]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::None),
            1 => Some(Self::Low),
            2 => Some(Self::Important),
            3 => Some(Self::Urgent),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

/// GPS status field of PFLAU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GpsStatus {
    NoFix,
    OnGround,
    Airborne,
}

impl GpsStatus {
    #[must_use]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::NoFix),
            1 => Some(Self::OnGround),
            2 => Some(Self::Airborne),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

/// Alarm type field of PFLAU (hex on the wire).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlarmType {
    NoAlarm,
    Aircraft,
    Obstacle,
    TrafficAdvisory,
    Other(u8),
}

impl AlarmType {
    #[must_use]
    pub const fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::NoAlarm,
            2 => Self::Aircraft,
            3 => Self::Obstacle,
            4 => Self::TrafficAdvisory,
            other => Self::Other(other),
        }
    }

    #[must_use]
    pub const fn as_u8(self) -> u8 {
        match self {
            Self::NoAlarm => 0,
            Self::Aircraft => 2,
            Self::Obstacle => 3,
            Self::TrafficAdvisory => 4,
            Self::Other(other) => other,
        }
    }
}

/// Identifier type field of PFLAA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IdType {
    Random,
    Icao,
    Flarm,
    Other(u8),
}

impl IdType {
    #[must_use]
    pub const fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Random,
            1 => Self::Icao,
            2 => Self::Flarm,
            other => Self::Other(other),
        }
    }

    #[must_use]
    pub const fn as_u8(self) -> u8 {
        match self {
            Self::Random => 0,
            Self::Icao => 1,
            Self::Flarm => 2,
            Self::Other(other) => other,
        }
    }
}

/// Aircraft type field of PFLAA (one hex digit on the wire).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AircraftType {
    Unknown,
    Glider,
    TowPlane,
    Helicopter,
    Skydiver,
    DropPlane,
    HangGlider,
    Paraglider,
    PoweredAircraft,
    JetAircraft,
    Ufo,
    Balloon,
    Airship,
    Drone,
    Reserved,
    StaticObstacle,
}

impl AircraftType {
    const ALL: [Self; 16] = [
        Self::Unknown,
        Self::Glider,
        Self::TowPlane,
        Self::Helicopter,
        Self::Skydiver,
        Self::DropPlane,
        Self::HangGlider,
        Self::Paraglider,
        Self::PoweredAircraft,
        Self::JetAircraft,
        Self::Ufo,
        Self::Balloon,
        Self::Airship,
        Self::Drone,
        Self::Reserved,
        Self::StaticObstacle,
    ];

    #[must_use]
    pub const fn from_u8(value: u8) -> Option<Self> {
        if value < 16 {
            Some(Self::ALL[value as usize])
        } else {
            None
        }
    }

    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

/// Severity field of PFLAE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Severity {
    NoError,
    /// Information only, normal operation.
    Information,
    /// Functionality may be reduced.
    Reduced,
    /// Fatal problem, device will not work.
    Fatal,
}

impl Severity {
    #[must_use]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::NoError),
            1 => Some(Self::Information),
            2 => Some(Self::Reduced),
            3 => Some(Self::Fatal),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_id() {
        let id = TargetId::new("DD8F12").unwrap();
        assert_eq!(id.as_str(), "DD8F12");
        assert!(!id.is_anonymous());
        assert!(TargetId::anonymous().is_anonymous());
        assert!(TargetId::new("123456789").is_none());
    }

    #[test]
    fn test_latitude_degrees() {
        let lat = Latitude {
            degrees: 48,
            minutes: Decimal::parse(b"07.038").unwrap(),
            north: true,
        };
        let value = lat.to_degrees();
        assert!(value > 48.1172 && value < 48.1174);

        let south = Latitude { north: false, ..lat };
        assert_eq!(south.to_degrees(), -value);
    }

    #[test]
    fn test_enum_codes_round_trip() {
        for code in 0..16 {
            assert_eq!(AircraftType::from_u8(code).unwrap().as_u8(), code);
        }
        assert!(AircraftType::from_u8(16).is_none());
        assert_eq!(AlarmType::from_u8(7), AlarmType::Other(7));
        assert_eq!(AlarmType::from_u8(4).as_u8(), 4);
        assert_eq!(IdType::from_u8(2), IdType::Flarm);
        assert_eq!(AlarmLevel::from_u8(3), Some(AlarmLevel::Urgent));
        assert_eq!(AlarmLevel::from_u8(4), None);
    }
}
