//! The traffic data source: bytes in, events out.

use std::time::Instant;

use flarm_proto::{decode, FixAltitude, FlarmMessage, Sentence, SentenceTokenizer};

use crate::config::SourceConfig;
use crate::connectivity::{Connectivity, ConnectivityStatus, Transition};
use crate::device::DeviceInfo;
use crate::events::{EventSink, TrafficEvent};
use crate::factor::FactorUpdate;
use crate::heartbeat::HeartbeatMonitor;
use crate::registry::FactorRegistry;
use crate::samples::{AltitudeSample, GeoPoint, PositionSample};
use crate::stats::DecodeStats;
use crate::transport::{Transport, TransportError};

/// Connects to a FLARM device through `T` and reports to `S`.
///
/// All methods must be called from one execution context. Time is passed
/// in explicitly; call [`poll`](Self::poll) periodically so that heartbeat
/// loss and factor expiry are detected without incoming data.
///
/// # Example
///
/// ```
/// use std::time::Instant;
/// use traffic_core::{ConnectivityStatus, SourceConfig, TrafficDataSource, TrafficEvent, Transport};
///
/// struct Loopback;
///
/// impl Transport for Loopback {
///     fn open(&mut self) {}
///     fn close(&mut self) {}
///     fn source_name(&self) -> &str {
///         "loopback"
///     }
/// }
///
/// let mut status = Vec::new();
/// let sink = |event: TrafficEvent<'_>| {
///     if let TrafficEvent::ConnectivityStatusChanged(s) = event {
///         status.push(s);
///     }
/// };
/// let mut source = TrafficDataSource::new(Loopback, sink, SourceConfig::default());
/// source.connect();
/// source.on_bytes(Instant::now(), b"$PFLAU,0,1,2,1,0,,0,,*60\r\n");
/// assert_eq!(source.connectivity_status(), ConnectivityStatus::Connected);
/// drop(source);
/// assert_eq!(status, [ConnectivityStatus::Connecting, ConnectivityStatus::Connected]);
/// ```
pub struct TrafficDataSource<T, S> {
    transport: T,
    sink: S,
    config: SourceConfig,
    connectivity: Connectivity,
    tokenizer: SentenceTokenizer,
    heartbeat: HeartbeatMonitor,
    registry: FactorRegistry,
    device: DeviceInfo,
    stats: DecodeStats,
    last_position: Option<PositionSample>,
    last_fix: Option<(FixAltitude, Instant)>,
    last_barometric_altitude: Option<AltitudeSample>,
}

impl<T: Transport, S: EventSink> TrafficDataSource<T, S> {
    /// Create a disconnected source.
    pub fn new(transport: T, sink: S, config: SourceConfig) -> Self {
        Self {
            transport,
            sink,
            config,
            connectivity: Connectivity::new(),
            tokenizer: SentenceTokenizer::new(),
            heartbeat: HeartbeatMonitor::default(),
            registry: FactorRegistry::new(config.factor_expiry, config.max_targets),
            device: DeviceInfo::default(),
            stats: DecodeStats::default(),
            last_position: None,
            last_fix: None,
            last_barometric_altitude: None,
        }
    }

    /// Start connecting. Does nothing unless disconnected.
    pub fn connect(&mut self) {
        let transition = self.connectivity.request_connect();
        if transition.is_empty() {
            return;
        }
        log::info!("connecting to {}", self.transport.source_name());
        self.tokenizer.reset();
        self.emit_transition(transition);
        self.transport.open();
    }

    /// Close the transport and go to Disconnected.
    ///
    /// The error string is left as is. Data already queued by the transport
    /// is discarded.
    pub fn disconnect(&mut self) {
        self.transport.close();
        let transition = self.connectivity.request_disconnect();
        if transition.is_empty() {
            return;
        }
        log::info!("disconnected from {}", self.transport.source_name());
        self.emit_transition(transition);
        self.enter_disconnected();
    }

    /// The transport established its connection.
    ///
    /// The status stays Connecting until the first valid sentence.
    pub fn on_transport_connected(&mut self) {
        if self.connectivity.status() == ConnectivityStatus::Disconnected {
            return;
        }
        log::debug!("transport to {} is up", self.transport.source_name());
    }

    /// The transport failed. Errors reported while disconnected are stale
    /// and ignored.
    pub fn on_transport_error(&mut self, error: TransportError) {
        if self.connectivity.status() == ConnectivityStatus::Disconnected {
            log::debug!("ignoring stale transport error: {error}");
            return;
        }
        log::warn!("{}: {error}", self.transport.source_name());
        self.transport.close();
        let transition = self.connectivity.transport_failed(&error.to_string());
        self.emit_transition(transition);
        self.enter_disconnected();
    }

    /// Feed bytes received from the transport at `now`.
    ///
    /// Bytes arriving while disconnected are dropped.
    pub fn on_bytes(&mut self, now: Instant, chunk: &[u8]) {
        if self.connectivity.status() == ConnectivityStatus::Disconnected {
            log::trace!("dropping {} bytes while disconnected", chunk.len());
            return;
        }
        for &byte in chunk {
            let Some(record) = self.tokenizer.push_byte(byte) else {
                continue;
            };
            let outcome = record.and_then(decode);
            self.stats.record(&outcome);
            match outcome {
                Ok(sentence) => self.handle_sentence(now, &sentence),
                Err(err) => log::debug!("dropping record: {err}"),
            }
        }
    }

    /// Expire the heartbeat and stale traffic factors.
    pub fn poll(&mut self, now: Instant) {
        if self.heartbeat.poll(now) {
            log::warn!("no heartbeat from {}", self.transport.source_name());
            self.sink.notify(TrafficEvent::HasHeartbeatChanged(false));
        }
        let sink = &mut self.sink;
        let removed = self
            .registry
            .sweep(now, |factor| sink.notify(TrafficEvent::FactorRemoved(factor)));
        if removed > 0 {
            log::debug!("{removed} traffic factors expired");
        }
    }

    #[inline]
    #[must_use]
    pub fn connectivity_status(&self) -> ConnectivityStatus {
        self.connectivity.status()
    }

    /// Last transport failure; empty if none since the last connect.
    #[inline]
    #[must_use]
    pub fn error_string(&self) -> &str {
        self.connectivity.error_string()
    }

    #[must_use]
    pub fn has_heartbeat(&self, now: Instant) -> bool {
        self.heartbeat.has_heartbeat(now)
    }

    #[inline]
    #[must_use]
    pub fn device_info(&self) -> &DeviceInfo {
        &self.device
    }

    #[inline]
    #[must_use]
    pub fn factors(&self) -> &FactorRegistry {
        &self.registry
    }

    #[inline]
    #[must_use]
    pub fn stats(&self) -> &DecodeStats {
        &self.stats
    }

    #[must_use]
    pub fn source_name(&self) -> &str {
        self.transport.source_name()
    }

    #[inline]
    #[must_use]
    pub fn last_position(&self) -> Option<&PositionSample> {
        self.last_position.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn last_barometric_altitude(&self) -> Option<&AltitudeSample> {
        self.last_barometric_altitude.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &SourceConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Decompose into the transport and the sink.
    pub fn into_parts(self) -> (T, S) {
        (self.transport, self.sink)
    }

    /// Error string first, so that a listener reacting to the status sees
    /// the cause.
    fn emit_transition(&mut self, transition: Transition) {
        if transition.error_changed {
            self.sink.notify(TrafficEvent::ErrorStringChanged(
                self.connectivity.error_string(),
            ));
        }
        if let Some(status) = transition.status {
            self.sink
                .notify(TrafficEvent::ConnectivityStatusChanged(status));
        }
    }

    fn enter_disconnected(&mut self) {
        if self.heartbeat.stop() {
            self.sink.notify(TrafficEvent::HasHeartbeatChanged(false));
        }
        self.tokenizer.reset();
        let sink = &mut self.sink;
        self.registry
            .clear(|factor| sink.notify(TrafficEvent::FactorRemoved(factor)));
        self.device = DeviceInfo::default();
        self.last_position = None;
        self.last_fix = None;
        self.last_barometric_altitude = None;
    }

    fn handle_sentence(&mut self, now: Instant, sentence: &Sentence) {
        let transition = self.connectivity.data_received();
        if !transition.is_empty() {
            log::info!("receiving data from {}", self.transport.source_name());
            self.emit_transition(transition);
        }
        for message in sentence.messages() {
            self.handle_message(now, message);
        }
    }

    fn handle_message(&mut self, now: Instant, message: FlarmMessage) {
        match message {
            FlarmMessage::Heartbeat(heartbeat) => {
                self.device.status = Some(heartbeat);
                if self.heartbeat.record(now) {
                    log::info!("heartbeat from {}", self.transport.source_name());
                    self.sink.notify(TrafficEvent::HasHeartbeatChanged(true));
                }
            }
            FlarmMessage::Position(position) => {
                let max_age = self.config.fix_altitude_max_age;
                let fix = self
                    .last_fix
                    .as_ref()
                    .filter(|(_, at)| now.saturating_duration_since(*at) <= max_age)
                    .map(|(fix, _)| fix);
                let sample = PositionSample::new(&position, fix, now);
                self.last_position = Some(sample);
                self.sink.notify(TrafficEvent::PositionUpdated(sample));
            }
            FlarmMessage::FixAltitude(fix) => self.last_fix = Some((fix, now)),
            FlarmMessage::BarometricAltitude(altitude) => {
                let sample = AltitudeSample {
                    altitude,
                    received: now,
                };
                self.last_barometric_altitude = Some(sample);
                self.sink
                    .notify(TrafficEvent::BarometricAltitudeUpdated(sample));
            }
            FlarmMessage::TrafficWithPosition(traffic) => {
                self.apply_factor(now, &FactorUpdate::WithPosition(traffic));
            }
            FlarmMessage::TrafficWithoutPosition(traffic) => {
                self.apply_factor(now, &FactorUpdate::WithoutPosition(traffic));
            }
            FlarmMessage::HardwareVersion(version) => {
                if DeviceInfo::update(&mut self.device.hardware_version, &version) {
                    log::info!("hardware version {version}");
                }
                self.sink
                    .notify(TrafficEvent::HardwareVersionReported(&version));
            }
            FlarmMessage::SoftwareVersion(version) => {
                if DeviceInfo::update(&mut self.device.software_version, &version) {
                    log::info!("software version {version}");
                }
                self.sink
                    .notify(TrafficEvent::SoftwareVersionReported(&version));
            }
            FlarmMessage::ObstacleDbVersion(version) => {
                if DeviceInfo::update(&mut self.device.obstacle_db_version, &version) {
                    log::info!("obstacle database {version}");
                }
                self.sink
                    .notify(TrafficEvent::ObstacleDbVersionReported(&version));
            }
            FlarmMessage::SelfTest(result) => {
                if !result.is_ok() {
                    log::warn!("self test: {result}");
                }
                self.sink
                    .notify(TrafficEvent::SelfTestResultReported(&result));
                self.device.self_test = Some(result);
            }
            FlarmMessage::Unknown(tag) => log::trace!("ignoring {tag} sentence"),
        }
    }

    fn apply_factor(&mut self, now: Instant, update: &FactorUpdate) {
        let own_position = self.own_position(now);
        let sink = &mut self.sink;
        let factor = self.registry.apply_update(update, own_position, now, |evicted| {
            sink.notify(TrafficEvent::FactorRemoved(evicted));
        });
        let event = if factor.has_position() {
            TrafficEvent::FactorWithPosition(factor)
        } else {
            TrafficEvent::FactorWithoutPosition(factor)
        };
        sink.notify(event);
    }

    /// Own position recent enough to place traffic.
    fn own_position(&self, now: Instant) -> Option<GeoPoint> {
        self.last_position
            .filter(|p| now.saturating_duration_since(p.received) <= self.config.own_position_max_age)
            .map(|p| p.point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use flarm_proto::{calculate_checksum, Distance, TargetId};

    use crate::factor::FactorKind;

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Status(ConnectivityStatus),
        Error(String),
        Heartbeat(bool),
        Position(f64, f64, Option<f64>),
        Barometric(f64),
        WithPosition(String, bool),
        WithoutPosition(String),
        Removed(String),
        Hardware(String),
        Software(String),
        ObstacleDb(String),
        SelfTest(bool),
    }

    #[derive(Default)]
    struct Recorder(Vec<Event>);

    impl EventSink for Recorder {
        fn notify(&mut self, event: TrafficEvent<'_>) {
            self.0.push(match event {
                TrafficEvent::ConnectivityStatusChanged(s) => Event::Status(s),
                TrafficEvent::ErrorStringChanged(e) => Event::Error(e.to_string()),
                TrafficEvent::HasHeartbeatChanged(v) => Event::Heartbeat(v),
                TrafficEvent::PositionUpdated(p) => Event::Position(
                    p.point.latitude,
                    p.point.longitude,
                    p.altitude.map(Distance::meters),
                ),
                TrafficEvent::BarometricAltitudeUpdated(a) => {
                    Event::Barometric(a.altitude.meters())
                }
                TrafficEvent::FactorWithPosition(f) => {
                    Event::WithPosition(f.id.to_string(), f.coordinate.is_some())
                }
                TrafficEvent::FactorWithoutPosition(f) => Event::WithoutPosition(f.id.to_string()),
                TrafficEvent::FactorRemoved(f) => Event::Removed(f.id.to_string()),
                TrafficEvent::HardwareVersionReported(v) => Event::Hardware(v.to_string()),
                TrafficEvent::SoftwareVersionReported(v) => Event::Software(v.to_string()),
                TrafficEvent::ObstacleDbVersionReported(v) => Event::ObstacleDb(v.to_string()),
                TrafficEvent::SelfTestResultReported(r) => Event::SelfTest(r.is_ok()),
            });
        }
    }

    #[derive(Default)]
    struct MockTransport {
        opened: usize,
        closed: usize,
    }

    impl Transport for MockTransport {
        fn open(&mut self) {
            self.opened += 1;
        }

        fn close(&mut self) {
            self.closed += 1;
        }

        fn source_name(&self) -> &str {
            "mock"
        }
    }

    type Source = TrafficDataSource<MockTransport, Recorder>;

    fn source() -> Source {
        TrafficDataSource::new(
            MockTransport::default(),
            Recorder::default(),
            SourceConfig::default(),
        )
    }

    fn connected(t: Instant) -> Source {
        let mut s = source();
        s.connect();
        s.on_bytes(t, &line("PFLAU,0,1,2,1,0,,0,,"));
        s.sink_mut().0.clear();
        s
    }

    fn line(body: &str) -> Vec<u8> {
        format!("${body}*{:02X}\r\n", calculate_checksum(body.as_bytes())).into_bytes()
    }

    fn events(s: &Source) -> &[Event] {
        &s.sink().0
    }

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    #[test]
    fn test_connect_opens_and_reports_connecting() {
        let mut s = source();
        s.connect();
        s.connect();
        assert_eq!(s.transport().opened, 1);
        assert_eq!(s.connectivity_status(), ConnectivityStatus::Connecting);
        assert_eq!(
            events(&s),
            [Event::Status(ConnectivityStatus::Connecting)]
        );
        assert_eq!(s.source_name(), "mock");
    }

    #[test]
    fn test_first_valid_sentence_connects() {
        let t = Instant::now();
        let mut s = source();
        s.connect();
        s.on_transport_connected();
        assert_eq!(s.connectivity_status(), ConnectivityStatus::Connecting);

        // Garbage does not change the status.
        s.on_bytes(t, b"$INVALID*00\r\nnoise\r\n");
        assert_eq!(s.connectivity_status(), ConnectivityStatus::Connecting);

        s.on_bytes(t, &line("PGRMZ,1500,F,2"));
        assert_eq!(s.connectivity_status(), ConnectivityStatus::Connected);
        assert_eq!(
            &events(&s)[1..],
            [
                Event::Status(ConnectivityStatus::Connected),
                Event::Barometric(Distance::from_feet(1500.0).meters()),
            ]
        );
        assert!(s.last_barometric_altitude().is_some());
    }

    #[test]
    fn test_unknown_sentence_connects() {
        let t = Instant::now();
        let mut s = source();
        s.connect();
        s.on_bytes(t, &line("GPGSA,A,3,,,,,,,,,,,,,1.0,1.0,1.0"));
        assert_eq!(s.connectivity_status(), ConnectivityStatus::Connected);
        assert_eq!(s.stats().unknown, 1);
    }

    #[test]
    fn test_invalid_record_between_valid_ones() {
        let t = Instant::now();
        let mut s = connected(t);
        let mut input = line("PGRMZ,100,m,3");
        input.extend_from_slice(b"$INVALID*00\r\n");
        input.extend(line("PGRMZ,200,m,3"));
        s.on_bytes(t, &input);

        assert_eq!(s.connectivity_status(), ConnectivityStatus::Connected);
        assert_eq!(
            events(&s),
            [Event::Barometric(100.0), Event::Barometric(200.0)]
        );
        assert_eq!(s.stats().checksum_errors, 1);
    }

    #[test]
    fn test_chunking_does_not_change_events() {
        let t = Instant::now();
        let mut stream = line("PFLAU,2,1,2,1,0,,0,,");
        stream.extend(line("PFLAA,0,-1234,1234,220,2,DD8F12,180,,30,-1.4,1"));
        stream.extend(line("PFLAV,A,2.00,7.20,"));
        stream.extend(line("PFLAA,1,500,,10,1,ABCDEF,,,,,8"));

        let mut whole = connected(t);
        whole.on_bytes(t, &stream);

        for size in [1, 2, 5, 13] {
            let mut chunked = connected(t);
            for chunk in stream.chunks(size) {
                chunked.on_bytes(t, chunk);
            }
            assert_eq!(events(&chunked), events(&whole), "chunk size {size}");
        }
        assert_eq!(whole.factors().len(), 2);
    }

    #[test]
    fn test_heartbeat_timing() {
        let t = Instant::now();
        let mut s = source();
        s.connect();
        s.on_bytes(t, &line("PFLAU,0,1,2,1,0,,0,,"));
        assert!(s.has_heartbeat(t));
        assert!(s.has_heartbeat(t + Duration::from_millis(4999)));
        assert!(!s.has_heartbeat(t + secs(5)));

        s.poll(t + secs(4));
        assert!(!events(&s).contains(&Event::Heartbeat(false)));
        s.poll(t + secs(5));
        assert_eq!(events(&s).last(), Some(&Event::Heartbeat(false)));

        // Still connected: the two are independent.
        assert_eq!(s.connectivity_status(), ConnectivityStatus::Connected);
        assert_eq!(
            s.device_info().status.map(|hb| hb.transmitting),
            Some(true)
        );
    }

    #[test]
    fn test_factor_merge_and_expiry() {
        let t0 = Instant::now();
        let mut s = connected(t0);
        s.on_bytes(t0, &line("PFLAA,0,100,200,50,2,ID123,90,,25,0.5,1"));
        s.on_bytes(t0 + secs(5), &line("PFLAA,1,300,400,60,2,ID123,95,,26,0.7,1"));

        let id = TargetId::new("ID123").unwrap();
        let factor = s.factors().get(&id).unwrap();
        assert_eq!(s.factors().len(), 1);
        assert_eq!(factor.kind, FactorKind::WithPosition);
        assert_eq!(factor.relative_north, Some(Distance::from_meters(300.0)));
        assert_eq!(factor.last_update, t0 + secs(5));

        s.poll(t0 + secs(14));
        assert_eq!(s.factors().len(), 1);
        s.poll(t0 + secs(15));
        s.poll(t0 + secs(20));
        assert!(s.factors().is_empty());

        let removals = events(&s)
            .iter()
            .filter(|e| matches!(e, Event::Removed(_)))
            .count();
        assert_eq!(removals, 1);
    }

    #[test]
    fn test_traffic_placed_from_recent_own_position() {
        let t = Instant::now();
        let mut s = connected(t);
        s.on_bytes(t, &line("GPGGA,120000,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,"));
        s.on_bytes(
            t,
            &line("GPRMC,120000,A,4807.038,N,01131.000,E,022.4,084.4,230394,003.1,W"),
        );
        s.on_bytes(t, &line("PFLAA,0,100,200,50,2,AAA111,90,,25,0.5,1"));
        let Event::Position(lat, _, altitude) = events(&s)[0] else {
            panic!("expected position, got {:?}", events(&s));
        };
        assert!((lat - 48.1173).abs() < 1e-4);
        assert_eq!(altitude, Some(545.4));
        assert_eq!(events(&s)[1], Event::WithPosition("AAA111".into(), true));

        // Own position is too old to place new traffic.
        s.on_bytes(t + secs(6), &line("PFLAA,0,100,200,50,2,BBB222,90,,25,0.5,1"));
        assert_eq!(events(&s)[2], Event::WithPosition("BBB222".into(), false));
    }

    #[test]
    fn test_non_directional_alarm_without_id() {
        let t = Instant::now();
        let mut s = connected(t);
        s.on_bytes(t, &line("PFLAU,2,1,2,1,1,,2,12,410"));
        assert_eq!(
            events(&s),
            [Event::WithoutPosition("<anonymous>".into())]
        );
        assert!(s.factors().get(&TargetId::anonymous()).is_some());
    }

    #[test]
    fn test_device_reports() {
        let t = Instant::now();
        let mut s = connected(t);
        s.on_bytes(t, &line("PFLAV,A,2.00,7.20,EU_2024"));
        s.on_bytes(t, &line("PFLAE,A,3,11,Firmware expired"));
        assert_eq!(
            events(&s),
            [
                Event::Hardware("2.00".into()),
                Event::Software("7.20".into()),
                Event::ObstacleDb("EU_2024".into()),
                Event::SelfTest(false),
            ]
        );
        let info = s.device_info();
        assert_eq!(info.software_version.as_deref(), Some("7.20"));
        assert_eq!(info.self_test.as_ref().map(|r| r.error_code), Some(0x11));
    }

    #[test]
    fn test_transport_error_disconnects() {
        let t = Instant::now();
        let mut s = connected(t);
        s.on_bytes(t, &line("PFLAA,0,100,200,50,2,ID123,90,,25,0.5,1"));
        s.sink_mut().0.clear();

        s.on_transport_error(TransportError::RemoteClosed);
        assert_eq!(s.connectivity_status(), ConnectivityStatus::Disconnected);
        assert_eq!(s.error_string(), "Remote closed the connection");
        assert_eq!(s.transport().closed, 1);
        assert_eq!(
            events(&s),
            [
                Event::Error("Remote closed the connection".into()),
                Event::Status(ConnectivityStatus::Disconnected),
                Event::Heartbeat(false),
                Event::Removed("ID123".into()),
            ]
        );

        // Stale error after the fact.
        s.on_transport_error(TransportError::ReadTimeout);
        assert_eq!(s.error_string(), "Remote closed the connection");
        assert_eq!(events(&s).len(), 4);

        // Reconnecting clears the error.
        s.connect();
        assert_eq!(s.error_string(), "");
        assert_eq!(
            &events(&s)[4..],
            [
                Event::Error(String::new()),
                Event::Status(ConnectivityStatus::Connecting),
            ]
        );
    }

    #[test]
    fn test_disconnect_from_connected() {
        let t = Instant::now();
        let mut s = connected(t);
        s.disconnect();
        assert_eq!(s.connectivity_status(), ConnectivityStatus::Disconnected);
        assert_eq!(s.error_string(), "");
        assert_eq!(
            events(&s),
            [
                Event::Status(ConnectivityStatus::Disconnected),
                Event::Heartbeat(false),
            ]
        );

        // Nothing is delivered after disconnecting.
        s.on_bytes(t, &line("PGRMZ,100,m,3"));
        s.disconnect();
        assert_eq!(events(&s).len(), 2);
        assert_eq!(s.transport().closed, 2);
        assert!(s.device_info().status.is_none());
    }

    #[test]
    fn test_partial_record_dropped_on_disconnect() {
        let t = Instant::now();
        let mut s = connected(t);
        let record = line("PGRMZ,100,m,3");
        let (head, tail) = record.split_at(6);
        s.on_bytes(t, head);
        s.disconnect();
        s.connect();
        s.sink_mut().0.clear();
        s.on_bytes(t, tail);
        assert!(events(&s).is_empty());
        assert_eq!(s.connectivity_status(), ConnectivityStatus::Connecting);
    }

    #[test]
    fn test_into_parts() {
        let mut s = source();
        s.connect();
        let (transport, sink) = s.into_parts();
        assert_eq!(transport.opened, 1);
        assert_eq!(sink.0.len(), 1);
    }
}
