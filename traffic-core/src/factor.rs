//! Traffic factors: nearby aircraft and obstacles reported by the device.

use std::time::Instant;

use flarm_proto::{
    AircraftType, AlarmLevel, AlarmType, Distance, IdType, Speed, TargetId, TrafficWithPosition,
    TrafficWithoutPosition,
};

use crate::samples::GeoPoint;

/// Mean earth radius used for the local flat-earth projection.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Whether a factor's position relative to own ship is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FactorKind {
    /// Relative north/east offsets are known.
    WithPosition,
    /// Only distance and vertical separation are known.
    WithoutPosition,
}

/// An update for one target, as decoded from PFLAA or PFLAU.
#[derive(Debug, Clone, PartialEq)]
pub enum FactorUpdate {
    WithPosition(TrafficWithPosition),
    WithoutPosition(TrafficWithoutPosition),
}

impl FactorUpdate {
    #[must_use]
    pub fn id(&self) -> &TargetId {
        match self {
            Self::WithPosition(t) => &t.id,
            Self::WithoutPosition(t) => &t.id,
        }
    }
}

/// One tracked target. Owned by the [`FactorRegistry`](crate::FactorRegistry).
#[derive(Debug, Clone, PartialEq)]
pub struct TrafficFactor {
    pub id: TargetId,
    pub kind: FactorKind,
    pub alarm_level: AlarmLevel,
    pub alarm_type: Option<AlarmType>,
    pub aircraft_type: Option<AircraftType>,
    pub id_type: Option<IdType>,
    /// Absolute position, when own position was known at the update.
    pub coordinate: Option<GeoPoint>,
    pub relative_north: Option<Distance>,
    pub relative_east: Option<Distance>,
    pub horizontal_distance: Option<Distance>,
    /// Positive above own altitude.
    pub vertical_separation: Option<Distance>,
    /// True track in degrees.
    pub track: Option<f64>,
    /// Degrees per second.
    pub turn_rate: Option<f64>,
    pub ground_speed: Option<Speed>,
    pub climb_rate: Option<Speed>,
    pub no_track: bool,
    pub last_update: Instant,
}

impl TrafficFactor {
    /// Create a factor from its first update.
    #[must_use]
    pub fn new(update: &FactorUpdate, own_position: Option<GeoPoint>, now: Instant) -> Self {
        let mut factor = Self {
            id: update.id().clone(),
            kind: FactorKind::WithoutPosition,
            alarm_level: AlarmLevel::None,
            alarm_type: None,
            aircraft_type: None,
            id_type: None,
            coordinate: None,
            relative_north: None,
            relative_east: None,
            horizontal_distance: None,
            vertical_separation: None,
            track: None,
            turn_rate: None,
            ground_speed: None,
            climb_rate: None,
            no_track: false,
            last_update: now,
        };
        factor.merge(update, own_position, now);
        factor
    }

    /// Overwrite with a newer update and refresh the timestamp.
    ///
    /// Geometry is replaced entirely. Classification fields the update does
    /// not carry (alarm type, aircraft type, ID type) keep their value.
    pub fn merge(&mut self, update: &FactorUpdate, own_position: Option<GeoPoint>, now: Instant) {
        match update {
            FactorUpdate::WithPosition(t) => {
                self.kind = FactorKind::WithPosition;
                self.alarm_level = t.alarm_level;
                self.aircraft_type = Some(t.aircraft_type);
                self.id_type = Some(t.id_type);
                self.coordinate =
                    own_position.map(|own| project(own, t.relative_north, t.relative_east));
                self.relative_north = Some(t.relative_north);
                self.relative_east = Some(t.relative_east);
                self.horizontal_distance = Some(Distance::from_meters(
                    t.relative_north.meters().hypot(t.relative_east.meters()),
                ));
                self.vertical_separation = Some(t.relative_vertical);
                self.track = t.track;
                self.turn_rate = t.turn_rate;
                self.ground_speed = t.ground_speed;
                self.climb_rate = t.climb_rate;
                self.no_track = t.no_track;
            }
            FactorUpdate::WithoutPosition(t) => {
                self.kind = FactorKind::WithoutPosition;
                self.alarm_level = t.alarm_level;
                if t.alarm_type.is_some() {
                    self.alarm_type = t.alarm_type;
                }
                if t.aircraft_type.is_some() {
                    self.aircraft_type = t.aircraft_type;
                }
                self.coordinate = None;
                self.relative_north = None;
                self.relative_east = None;
                self.horizontal_distance = t.distance;
                self.vertical_separation = t.relative_vertical;
                self.track = None;
                self.turn_rate = None;
                self.ground_speed = None;
                self.climb_rate = None;
            }
        }
        self.last_update = now;
    }

    /// Time since the last update.
    #[must_use]
    pub fn age(&self, now: Instant) -> std::time::Duration {
        now.saturating_duration_since(self.last_update)
    }

    #[inline]
    #[must_use]
    pub fn has_position(&self) -> bool {
        self.kind == FactorKind::WithPosition
    }
}

/// Place a target given as north/east offsets from `origin`.
///
/// Uses a local flat-earth approximation, adequate for the few kilometers
/// of FLARM range. Longitude is wrapped to `[-180, 180)`.
#[must_use]
pub fn project(origin: GeoPoint, north: Distance, east: Distance) -> GeoPoint {
    let d_lat = (north.meters() / EARTH_RADIUS_M).to_degrees();
    let cos_lat = origin.latitude.to_radians().cos();
    let d_lon = if cos_lat.abs() < 1e-9 {
        0.0
    } else {
        (east.meters() / (EARTH_RADIUS_M * cos_lat)).to_degrees()
    };
    GeoPoint {
        latitude: (origin.latitude + d_lat).clamp(-90.0, 90.0),
        longitude: wrap_longitude(origin.longitude + d_lon),
    }
}

fn wrap_longitude(longitude: f64) -> f64 {
    (longitude + 180.0).rem_euclid(360.0) - 180.0
}
