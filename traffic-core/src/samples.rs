//! Own-ship samples republished by the data source.

use std::time::Instant;

use flarm_proto::{Date, Distance, FixAltitude, Position, Speed, UtcTime};

/// A point on the earth's surface, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// Own position from the device's GNSS.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionSample {
    pub point: GeoPoint,
    /// From a GGA fix received shortly before.
    pub altitude: Option<Distance>,
    pub ground_speed: Option<Speed>,
    /// True track in degrees.
    pub track: Option<f64>,
    pub time: Option<UtcTime>,
    pub date: Option<Date>,
    /// GGA fix quality, satellites and HDOP, when available.
    pub fix_quality: Option<u8>,
    pub satellites: Option<u8>,
    pub hdop: Option<f64>,
    pub received: Instant,
}

impl PositionSample {
    pub(crate) fn new(position: &Position, fix: Option<&FixAltitude>, received: Instant) -> Self {
        Self {
            point: GeoPoint {
                latitude: position.latitude,
                longitude: position.longitude,
            },
            altitude: fix.map(|f| f.altitude),
            ground_speed: position.ground_speed,
            track: position.track,
            time: position.time,
            date: position.date,
            fix_quality: fix.map(|f| f.quality),
            satellites: fix.and_then(|f| f.satellites),
            hdop: fix.and_then(|f| f.hdop),
            received,
        }
    }
}

/// Pressure altitude reported by the device.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AltitudeSample {
    pub altitude: Distance,
    pub received: Instant,
}
