//! Canonical units.
//!
//! Everything leaving the decoder is expressed in meters, meters per second
//! and degrees. Protocol units (feet, knots) are converted once, in
//! [`crate::message`].

use core::fmt;
use core::ops::{Add, Neg, Sub};

/// Meters per international foot.
pub const METERS_PER_FOOT: f64 = 0.3048;

/// Meters per second per knot.
pub const MPS_PER_KNOT: f64 = 1852.0 / 3600.0;

/// A distance or altitude in meters.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Distance(f64);

impl Distance {
    /// Zero distance.
    pub const ZERO: Self = Self(0.0);

    #[inline]
    #[must_use]
    pub const fn from_meters(meters: f64) -> Self {
        Self(meters)
    }

    #[inline]
    #[must_use]
    pub fn from_feet(feet: f64) -> Self {
        Self(feet * METERS_PER_FOOT)
    }

    #[inline]
    #[must_use]
    pub const fn meters(self) -> f64 {
        self.0
    }

    #[inline]
    #[must_use]
    pub fn feet(self) -> f64 {
        self.0 / METERS_PER_FOOT
    }
}

impl Add for Distance {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Distance {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Neg for Distance {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} m", self.0)
    }
}

/// A speed in meters per second.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Speed(f64);

impl Speed {
    #[inline]
    #[must_use]
    pub const fn from_mps(mps: f64) -> Self {
        Self(mps)
    }

    #[inline]
    #[must_use]
    pub fn from_knots(knots: f64) -> Self {
        Self(knots * MPS_PER_KNOT)
    }

    #[inline]
    #[must_use]
    pub const fn mps(self) -> f64 {
        self.0
    }

    #[inline]
    #[must_use]
    pub fn knots(self) -> f64 {
        self.0 / MPS_PER_KNOT
    }
}

impl fmt::Display for Speed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} m/s", self.0)
    }
}
