//! Outputs of a traffic data source.

use flarm_proto::SelfTest;

use crate::connectivity::ConnectivityStatus;
use crate::factor::TrafficFactor;
use crate::samples::{AltitudeSample, PositionSample};

/// A change reported by a [`TrafficDataSource`](crate::TrafficDataSource).
///
/// Payloads borrow from the source and are only valid during the
/// [`EventSink::notify`] call; copy what needs to outlive it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrafficEvent<'a> {
    ConnectivityStatusChanged(ConnectivityStatus),
    /// The new error string; empty when cleared.
    ErrorStringChanged(&'a str),
    HasHeartbeatChanged(bool),
    PositionUpdated(PositionSample),
    BarometricAltitudeUpdated(AltitudeSample),
    FactorWithPosition(&'a TrafficFactor),
    FactorWithoutPosition(&'a TrafficFactor),
    /// The factor expired, was evicted, or the source disconnected.
    FactorRemoved(&'a TrafficFactor),
    HardwareVersionReported(&'a str),
    SoftwareVersionReported(&'a str),
    ObstacleDbVersionReported(&'a str),
    SelfTestResultReported(&'a SelfTest),
}

/// Receiver of [`TrafficEvent`]s.
///
/// Called synchronously on the thread driving the source.
pub trait EventSink {
    fn notify(&mut self, event: TrafficEvent<'_>);
}

impl<F> EventSink for F
where
    F: FnMut(TrafficEvent<'_>),
{
    #[inline]
    fn notify(&mut self, event: TrafficEvent<'_>) {
        self(event);
    }
}
