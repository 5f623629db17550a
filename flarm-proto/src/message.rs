//! Decoded messages in canonical units.
//!
//! A [`Sentence`] mirrors the wire; a [`FlarmMessage`] is what the rest of
//! the system consumes. All distances are meters, speeds meters per second
//! and angles degrees. One sentence can carry several messages: `PFLAU` is
//! both the heartbeat and, for non-directional alarms, a traffic report.

use heapless::Vec;

use crate::self_test;
use crate::sentence::{AltitudeUnit, Gga, Pflaa, Pflae, Pflau, Pflav, Pgrmz, Rmc, Sentence, Tag};
use crate::types::{
    AircraftType, AlarmLevel, AlarmType, Date, GpsStatus, IdType, Severity, TargetId, Text,
    UtcTime,
};
use crate::units::{Distance, Speed};

/// Most messages produced by a single sentence.
pub const MAX_MESSAGES_PER_SENTENCE: usize = 3;

/// Messages decoded from one sentence.
pub type Messages = Vec<FlarmMessage, MAX_MESSAGES_PER_SENTENCE>;

/// Device status carried by every `PFLAU`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Heartbeat {
    pub received_devices: u8,
    pub transmitting: bool,
    pub gps: GpsStatus,
    pub power_ok: bool,
    pub alarm_level: AlarmLevel,
}

/// Own position from a valid RMC fix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    /// Degrees, south negative.
    pub latitude: f64,
    /// Degrees, west negative.
    pub longitude: f64,
    pub ground_speed: Option<Speed>,
    /// True track in degrees.
    pub track: Option<f64>,
    pub time: Option<UtcTime>,
    pub date: Option<Date>,
}

/// GNSS altitude from a GGA fix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixAltitude {
    /// Above mean sea level.
    pub altitude: Distance,
    pub geoid_separation: Option<Distance>,
    pub quality: u8,
    pub satellites: Option<u8>,
    pub hdop: Option<f64>,
    pub time: Option<UtcTime>,
}

/// A target with relative position (`PFLAA` with both offsets).
#[derive(Debug, Clone, PartialEq)]
pub struct TrafficWithPosition {
    pub id: TargetId,
    pub id_type: IdType,
    pub alarm_level: AlarmLevel,
    pub relative_north: Distance,
    pub relative_east: Distance,
    /// Positive above own altitude.
    pub relative_vertical: Distance,
    pub track: Option<f64>,
    /// Degrees per second, positive clockwise.
    pub turn_rate: Option<f64>,
    pub ground_speed: Option<Speed>,
    pub climb_rate: Option<Speed>,
    pub aircraft_type: AircraftType,
    pub no_track: bool,
}

/// A target without bearing: only distance and vertical separation are
/// known.
#[derive(Debug, Clone, PartialEq)]
pub struct TrafficWithoutPosition {
    pub id: TargetId,
    pub alarm_level: AlarmLevel,
    pub alarm_type: Option<AlarmType>,
    pub aircraft_type: Option<AircraftType>,
    pub distance: Option<Distance>,
    pub relative_vertical: Option<Distance>,
}

/// Result of the device self test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelfTest {
    pub severity: Severity,
    pub error_code: u16,
    /// Description of `error_code`.
    pub description: &'static str,
    /// Free text sent by the device, if any.
    pub message: Option<Text>,
}

impl SelfTest {
    /// Whether the device reported no problem.
    #[inline]
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.severity == Severity::NoError
    }
}

impl core::fmt::Display for SelfTest {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if self.is_ok() {
            return f.write_str(self.description);
        }
        write!(
            f,
            "{} ({}, code {:X})",
            self.description,
            self_test::severity_text(self.severity),
            self.error_code
        )?;
        match &self.message {
            Some(message) if !message.is_empty() => write!(f, ": {message}"),
            _ => Ok(()),
        }
    }
}

/// A decoded message.
#[derive(Debug, Clone, PartialEq)]
pub enum FlarmMessage {
    Heartbeat(Heartbeat),
    Position(Position),
    FixAltitude(FixAltitude),
    BarometricAltitude(Distance),
    TrafficWithPosition(TrafficWithPosition),
    TrafficWithoutPosition(TrafficWithoutPosition),
    HardwareVersion(Text),
    SoftwareVersion(Text),
    ObstacleDbVersion(Text),
    SelfTest(SelfTest),
    Unknown(Tag),
}

impl Sentence {
    /// Convert to messages in canonical units.
    ///
    /// Sentences that carry nothing usable (a void RMC, a GGA without fix)
    /// produce no messages.
    #[must_use]
    pub fn messages(&self) -> Messages {
        let mut out = Messages::new();
        match self {
            Self::Pflau(s) => s.messages(&mut out),
            Self::Pflaa(s) => push(&mut out, s.message()),
            Self::Rmc(s) => {
                if let Some(position) = s.position() {
                    push(&mut out, FlarmMessage::Position(position));
                }
            }
            Self::Gga(s) => {
                if let Some(altitude) = s.fix_altitude() {
                    push(&mut out, FlarmMessage::FixAltitude(altitude));
                }
            }
            Self::Pgrmz(s) => push(&mut out, FlarmMessage::BarometricAltitude(s.altitude())),
            Self::Pflav(s) => s.messages(&mut out),
            Self::Pflae(s) => push(&mut out, FlarmMessage::SelfTest(s.self_test())),
            Self::Unknown(tag) => push(&mut out, FlarmMessage::Unknown(tag.clone())),
        }
        out
    }
}

fn push(out: &mut Messages, message: FlarmMessage) {
    // No sentence yields more than the capacity.
    let _ = out.push(message);
}

impl Pflau {
    #[must_use]
    pub fn heartbeat(&self) -> Heartbeat {
        Heartbeat {
            received_devices: self.rx,
            transmitting: self.tx,
            gps: self.gps,
            power_ok: self.power,
            alarm_level: self.alarm_level,
        }
    }

    /// The alarm as a target without position, if it is non-directional.
    #[must_use]
    pub fn non_directional_alarm(&self) -> Option<TrafficWithoutPosition> {
        if self.relative_bearing.is_some() {
            return None;
        }
        let distance = self.relative_distance?;
        let vertical = self.relative_vertical?;
        Some(TrafficWithoutPosition {
            id: self.id.clone().unwrap_or_default(),
            alarm_level: self.alarm_level,
            alarm_type: Some(self.alarm_type),
            aircraft_type: None,
            distance: Some(Distance::from_meters(f64::from(distance))),
            relative_vertical: Some(Distance::from_meters(f64::from(vertical))),
        })
    }

    fn messages(&self, out: &mut Messages) {
        push(out, FlarmMessage::Heartbeat(self.heartbeat()));
        if let Some(traffic) = self.non_directional_alarm() {
            push(out, FlarmMessage::TrafficWithoutPosition(traffic));
        }
    }
}

impl Pflaa {
    #[must_use]
    pub fn message(&self) -> FlarmMessage {
        let vertical = Distance::from_meters(f64::from(self.relative_vertical));
        match self.relative_east {
            Some(east) => FlarmMessage::TrafficWithPosition(TrafficWithPosition {
                id: self.id.clone(),
                id_type: self.id_type,
                alarm_level: self.alarm_level,
                relative_north: Distance::from_meters(f64::from(self.relative_north)),
                relative_east: Distance::from_meters(f64::from(east)),
                relative_vertical: vertical,
                track: self.track.map(f64::from),
                turn_rate: self.turn_rate.map(|d| d.to_f64()),
                ground_speed: self.ground_speed.map(|v| Speed::from_mps(f64::from(v))),
                climb_rate: self.climb_rate.map(|d| Speed::from_mps(d.to_f64())),
                aircraft_type: self.aircraft_type,
                no_track: self.no_track.is_some_and(|v| v != 0),
            }),
            // Without an east offset the north field holds the distance.
            None => FlarmMessage::TrafficWithoutPosition(TrafficWithoutPosition {
                id: self.id.clone(),
                alarm_level: self.alarm_level,
                alarm_type: None,
                aircraft_type: Some(self.aircraft_type),
                distance: Some(Distance::from_meters(f64::from(self.relative_north.unsigned_abs()))),
                relative_vertical: Some(vertical),
            }),
        }
    }
}

impl Rmc {
    /// The fix, if it is valid and carries coordinates.
    #[must_use]
    pub fn position(&self) -> Option<Position> {
        if !self.valid {
            return None;
        }
        Some(Position {
            latitude: self.latitude?.to_degrees(),
            longitude: self.longitude?.to_degrees(),
            ground_speed: self.speed.map(|d| Speed::from_knots(d.to_f64())),
            track: self.course.map(|d| d.to_f64()),
            time: self.time,
            date: self.date,
        })
    }
}

impl Gga {
    /// The altitude, if the fix is valid and carries one.
    #[must_use]
    pub fn fix_altitude(&self) -> Option<FixAltitude> {
        if self.quality == 0 {
            return None;
        }
        let altitude = self.altitude?;
        Some(FixAltitude {
            altitude: to_distance(altitude.to_f64(), self.altitude_unit),
            geoid_separation: self
                .geoid_separation
                .map(|d| to_distance(d.to_f64(), self.geoid_unit)),
            quality: self.quality,
            satellites: self
                .satellites
                .and_then(|d| u8::try_from(d.integer_part()).ok()),
            hdop: self.hdop.map(|d| d.to_f64()),
            time: self.time,
        })
    }
}

fn to_distance(value: f64, unit: Option<u8>) -> Distance {
    if unit == Some(b'F') {
        Distance::from_feet(value)
    } else {
        Distance::from_meters(value)
    }
}

impl Pgrmz {
    #[must_use]
    pub fn altitude(&self) -> Distance {
        let value = self.altitude.to_f64();
        match self.unit {
            AltitudeUnit::Feet => Distance::from_feet(value),
            AltitudeUnit::Meters => Distance::from_meters(value),
        }
    }
}

impl Pflav {
    fn messages(&self, out: &mut Messages) {
        if !self.hardware_version.is_empty() {
            push(out, FlarmMessage::HardwareVersion(self.hardware_version.clone()));
        }
        if !self.software_version.is_empty() {
            push(out, FlarmMessage::SoftwareVersion(self.software_version.clone()));
        }
        if let Some(obstacle) = self.obstacle_version.as_ref().filter(|v| !v.is_empty()) {
            push(out, FlarmMessage::ObstacleDbVersion(obstacle.clone()));
        }
    }
}

impl Pflae {
    #[must_use]
    pub fn self_test(&self) -> SelfTest {
        let description = if self.severity == Severity::NoError {
            self_test::describe(0)
        } else {
            self_test::describe(self.error_code)
        };
        SelfTest {
            severity: self.severity,
            error_code: self.error_code,
            description,
            message: self.message.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;
    use std::string::ToString;

    use super::*;
    use crate::decoder::decode;

    fn close(a: f64, b: f64) -> bool {
        let d = a - b;
        d < 1e-6 && d > -1e-6
    }

    fn messages(record: &str) -> Messages {
        decode(record.as_bytes()).unwrap().messages()
    }

    #[test]
    fn test_pflau_is_heartbeat() {
        let out = messages("$PFLAU,3,1,2,1,0,,0,,*63");
        assert_eq!(out.len(), 1);
        let FlarmMessage::Heartbeat(hb) = &out[0] else {
            panic!("expected heartbeat");
        };
        assert_eq!(hb.received_devices, 3);
        assert_eq!(hb.gps, GpsStatus::Airborne);
    }

    #[test]
    fn test_pflau_non_directional_alarm() {
        let out = messages("$PFLAU,2,1,2,1,1,,2,-30,755,DD8F12*29");
        assert_eq!(out.len(), 2);
        let FlarmMessage::TrafficWithoutPosition(t) = &out[1] else {
            panic!("expected traffic without position");
        };
        assert_eq!(t.id.as_str(), "DD8F12");
        assert_eq!(t.distance, Some(Distance::from_meters(755.0)));
        assert_eq!(t.relative_vertical, Some(Distance::from_meters(-30.0)));
        assert_eq!(t.alarm_type, Some(AlarmType::Aircraft));
    }

    #[test]
    fn test_pflau_alarm_without_id_is_anonymous() {
        let out = messages("$PFLAU,2,1,2,1,1,,2,12,410*57");
        let FlarmMessage::TrafficWithoutPosition(t) = &out[1] else {
            panic!("expected traffic without position");
        };
        assert!(t.id.is_anonymous());
    }

    #[test]
    fn test_pflau_directional_alarm_is_heartbeat_only() {
        let out = messages("$PFLAU,2,1,2,1,2,-30,2,-32,755*57");
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_pflaa_with_position() {
        let out = messages("$PFLAA,0,-1234,1234,220,2,DD8F12,180,,30,-1.4,1*19");
        let FlarmMessage::TrafficWithPosition(t) = &out[0] else {
            panic!("expected traffic with position");
        };
        assert_eq!(t.relative_north.meters(), -1234.0);
        assert_eq!(t.relative_east.meters(), 1234.0);
        assert_eq!(t.relative_vertical.meters(), 220.0);
        assert_eq!(t.ground_speed, Some(Speed::from_mps(30.0)));
        assert_eq!(t.climb_rate, Some(Speed::from_mps(-1.4)));
        assert_eq!(t.turn_rate, None);
        assert_eq!(t.track, Some(180.0));
        assert!(!t.no_track);
    }

    #[test]
    fn test_rmc_position_in_canonical_units() {
        let out = messages("$GPRMC,123519,A,4807.038,N,01131.000,E,022.4,084.4,230394,003.1,W*6A");
        let FlarmMessage::Position(p) = &out[0] else {
            panic!("expected position");
        };
        assert!(close(p.latitude, 48.1173));
        assert!(close(p.longitude, 11.516_666_666));
        assert!(close(p.ground_speed.unwrap().mps(), 22.4 * 1852.0 / 3600.0));
        assert_eq!(p.track, Some(84.4));
    }

    #[test]
    fn test_southern_hemisphere() {
        let out = messages("$GPRMC,081836,A,3751.65,S,14507.36,E,000.0,360.0,130998,011.3,E*62");
        let FlarmMessage::Position(p) = &out[0] else {
            panic!("expected position");
        };
        assert!(p.latitude < -37.0);
        assert!(p.longitude > 145.0);
    }

    #[test]
    fn test_void_rmc_has_no_position() {
        assert!(messages("$GPRMC,120000,V,,,,,,,010120,,*30").is_empty());
    }

    #[test]
    fn test_gga_altitude() {
        let out = messages("$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47");
        let FlarmMessage::FixAltitude(a) = &out[0] else {
            panic!("expected fix altitude");
        };
        assert_eq!(a.altitude.meters(), 545.4);
        assert_eq!(a.satellites, Some(8));
    }

    #[test]
    fn test_pgrmz_feet_to_meters() {
        let out = messages("$PGRMZ,2282,F,2*00");
        let FlarmMessage::BarometricAltitude(alt) = &out[0] else {
            panic!("expected barometric altitude");
        };
        assert!(close(alt.meters(), 695.5536));
    }

    #[test]
    fn test_pflav_skips_empty_versions() {
        let out = messages("$PFLAV,A,2.00,6.00,*08");
        assert_eq!(out.len(), 2);
        assert!(matches!(&out[0], FlarmMessage::HardwareVersion(v) if v == "2.00"));
        assert!(matches!(&out[1], FlarmMessage::SoftwareVersion(v) if v == "6.00"));

        let out = messages("$PFLAV,A,1.10,7.20,OBST-2024-03*04");
        assert_eq!(out.len(), 3);
        assert!(matches!(&out[2], FlarmMessage::ObstacleDbVersion(v) if v == "OBST-2024-03"));
    }

    #[test]
    fn test_pflae_self_test() {
        let out = messages("$PFLAE,A,0,0*33");
        let FlarmMessage::SelfTest(t) = &out[0] else {
            panic!("expected self test");
        };
        assert!(t.is_ok());
        assert_eq!(t.to_string(), "No error");

        let out = messages("$PFLAE,A,2,82,Obstacle database expired*74");
        let FlarmMessage::SelfTest(t) = &out[0] else {
            panic!("expected self test");
        };
        assert_eq!(t.description, "Obstacle database expired");
        assert_eq!(
            t.to_string(),
            "Obstacle database expired (reduced functionality, code 82): Obstacle database expired"
        );
    }

    #[test]
    fn test_unknown_passes_through() {
        let out = messages("$PFLAC,A,NMEAOUT,61*7B");
        assert!(matches!(&out[0], FlarmMessage::Unknown(tag) if tag == "PFLAC"));
    }
}
