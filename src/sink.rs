//! Event sinks for the host.

use flarm_proto::{SelfTest, TargetId};
use tokio::sync::mpsc;
use tracing::{debug, info, trace, warn};
use traffic_core::{
    AltitudeSample, ConnectivityStatus, EventSink, PositionSample, TrafficEvent, TrafficFactor,
};

/// Owned copy of a [`TrafficEvent`], for consumers outside the run loop.
#[derive(Debug, Clone, PartialEq)]
pub enum ReceiverEvent {
    ConnectivityStatusChanged(ConnectivityStatus),
    ErrorStringChanged(String),
    HasHeartbeatChanged(bool),
    PositionUpdated(PositionSample),
    BarometricAltitudeUpdated(AltitudeSample),
    FactorWithPosition(TrafficFactor),
    FactorWithoutPosition(TrafficFactor),
    FactorRemoved(TargetId),
    HardwareVersionReported(String),
    SoftwareVersionReported(String),
    ObstacleDbVersionReported(String),
    SelfTestResultReported(SelfTest),
}

impl From<TrafficEvent<'_>> for ReceiverEvent {
    fn from(event: TrafficEvent<'_>) -> Self {
        match event {
            TrafficEvent::ConnectivityStatusChanged(status) => {
                Self::ConnectivityStatusChanged(status)
            }
            TrafficEvent::ErrorStringChanged(error) => Self::ErrorStringChanged(error.to_owned()),
            TrafficEvent::HasHeartbeatChanged(live) => Self::HasHeartbeatChanged(live),
            TrafficEvent::PositionUpdated(position) => Self::PositionUpdated(position),
            TrafficEvent::BarometricAltitudeUpdated(altitude) => {
                Self::BarometricAltitudeUpdated(altitude)
            }
            TrafficEvent::FactorWithPosition(factor) => Self::FactorWithPosition(factor.clone()),
            TrafficEvent::FactorWithoutPosition(factor) => {
                Self::FactorWithoutPosition(factor.clone())
            }
            TrafficEvent::FactorRemoved(factor) => Self::FactorRemoved(factor.id.clone()),
            TrafficEvent::HardwareVersionReported(v) => Self::HardwareVersionReported(v.to_owned()),
            TrafficEvent::SoftwareVersionReported(v) => Self::SoftwareVersionReported(v.to_owned()),
            TrafficEvent::ObstacleDbVersionReported(v) => {
                Self::ObstacleDbVersionReported(v.to_owned())
            }
            TrafficEvent::SelfTestResultReported(result) => {
                Self::SelfTestResultReported(result.clone())
            }
        }
    }
}

/// Forwards owned events over a channel.
///
/// Events are dropped silently once the receiver is gone.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<ReceiverEvent>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::UnboundedSender<ReceiverEvent>) -> Self {
        Self { tx }
    }

    /// A sink and the receiving end of its channel.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ReceiverEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }
}

impl EventSink for ChannelSink {
    fn notify(&mut self, event: TrafficEvent<'_>) {
        let _ = self.tx.send(event.into());
    }
}

/// Logs every event through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl EventSink for LogSink {
    fn notify(&mut self, event: TrafficEvent<'_>) {
        match event {
            TrafficEvent::ConnectivityStatusChanged(status) => {
                info!(status = %status, "connectivity changed");
            }
            TrafficEvent::ErrorStringChanged(error) if error.is_empty() => {
                debug!("error cleared");
            }
            TrafficEvent::ErrorStringChanged(error) => warn!(error, "transport error"),
            TrafficEvent::HasHeartbeatChanged(live) => info!(live, "heartbeat"),
            TrafficEvent::PositionUpdated(position) => debug!(
                lat = format!("{:.5}", position.point.latitude),
                lon = format!("{:.5}", position.point.longitude),
                alt = ?position.altitude.map(|a| a.meters()),
                "own position"
            ),
            TrafficEvent::BarometricAltitudeUpdated(altitude) => {
                trace!(altitude = %altitude.altitude, "pressure altitude");
            }
            TrafficEvent::FactorWithPosition(factor) => debug!(
                id = %factor.id,
                alarm = ?factor.alarm_level,
                distance = ?factor.horizontal_distance.map(|d| d.meters()),
                vertical = ?factor.vertical_separation.map(|d| d.meters()),
                "traffic"
            ),
            TrafficEvent::FactorWithoutPosition(factor) => info!(
                id = %factor.id,
                alarm = ?factor.alarm_level,
                distance = ?factor.horizontal_distance.map(|d| d.meters()),
                "non-directional traffic"
            ),
            TrafficEvent::FactorRemoved(factor) => debug!(id = %factor.id, "traffic removed"),
            TrafficEvent::HardwareVersionReported(version) => info!(version, "hardware version"),
            TrafficEvent::SoftwareVersionReported(version) => info!(version, "software version"),
            TrafficEvent::ObstacleDbVersionReported(version) => {
                info!(version, "obstacle database version");
            }
            TrafficEvent::SelfTestResultReported(result) if result.is_ok() => {
                info!("self test passed");
            }
            TrafficEvent::SelfTestResultReported(result) => warn!(result = %result, "self test"),
        }
    }
}
