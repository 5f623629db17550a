//! The run loop: drives a data source from transport deliveries and timers.

use std::future::Future;
use std::io;
use std::time::{Duration, Instant};

use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, trace, warn};
use traffic_core::{ConnectivityStatus, EventSink, SourceConfig, TrafficDataSource};

use crate::transport::{Delivery, DeliveryReceiver, HostTransport, TransportEvent};

/// Default period of [`TrafficDataSource::poll`].
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Timing of the run loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunnerConfig {
    pub poll_interval: Duration,
    /// Delay before reconnecting while disconnected; `None` never reconnects.
    pub reconnect_interval: Option<Duration>,
    /// Period of the decode statistics log; `None` disables it.
    pub stats_interval: Option<Duration>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            reconnect_interval: Some(Duration::from_secs(5)),
            stats_interval: Some(Duration::from_secs(60)),
        }
    }
}

/// Resolve when `signal` fires.
///
/// If the signal cannot be installed the error is logged and this never
/// resolves, so the receiver keeps running instead of exiting at once.
pub async fn shutdown_on<F>(signal: F)
where
    F: Future<Output = io::Result<()>>,
{
    if let Err(e) = signal.await {
        warn!(error = %e, "cannot listen for the shutdown signal");
        std::future::pending::<()>().await;
    }
}

pub type HostSource<S> = TrafficDataSource<Box<dyn HostTransport>, S>;

/// Owns a data source and feeds it on the current task.
pub struct Runner<S> {
    source: HostSource<S>,
    deliveries: DeliveryReceiver,
    config: RunnerConfig,
    reconnect_at: Option<Instant>,
}

impl<S: EventSink> Runner<S> {
    /// `deliveries` must be the receiving end of the transport's channel.
    pub fn new(
        transport: Box<dyn HostTransport>,
        deliveries: DeliveryReceiver,
        sink: S,
        source_config: SourceConfig,
        config: RunnerConfig,
    ) -> Self {
        Self {
            source: TrafficDataSource::new(transport, sink, source_config),
            deliveries,
            config,
            reconnect_at: None,
        }
    }

    pub fn source(&self) -> &HostSource<S> {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut HostSource<S> {
        &mut self.source
    }

    /// Connect and process until `shutdown` completes, then disconnect.
    ///
    /// Returns the source for inspection.
    pub async fn run<F>(mut self, shutdown: F) -> HostSource<S>
    where
        F: Future<Output = ()>,
    {
        info!(source = self.source.source_name(), "traffic receiver started");
        self.source.connect();

        let mut poll = interval(self.config.poll_interval);
        poll.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // Disabled below when there is no stats interval.
        let mut stats = interval(self.config.stats_interval.unwrap_or(self.config.poll_interval));
        stats.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        stats.tick().await;

        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                () = &mut shutdown => {
                    info!("shutting down");
                    break;
                }
                delivery = self.deliveries.recv() => match delivery {
                    Some(delivery) => self.dispatch(delivery),
                    None => {
                        warn!("transport channel closed");
                        break;
                    }
                },
                _ = poll.tick() => self.tick(Instant::now()),
                _ = stats.tick(), if self.config.stats_interval.is_some() => self.log_stats(),
            }
        }

        self.source.disconnect();
        self.log_stats();
        self.source
    }

    /// Hand one delivery to the source, unless it is from an old session.
    pub fn dispatch(&mut self, delivery: Delivery) {
        let current = self.source.transport().session();
        if delivery.session != current {
            trace!(
                session = delivery.session,
                current,
                "dropping stale delivery"
            );
            return;
        }
        match delivery.event {
            TransportEvent::Connected => self.source.on_transport_connected(),
            TransportEvent::Data(bytes) => self.source.on_bytes(Instant::now(), &bytes),
            TransportEvent::Failed(error) => self.source.on_transport_error(error),
        }
    }

    /// Periodic work: expiry and reconnecting.
    pub fn tick(&mut self, now: Instant) {
        self.source.poll(now);

        if self.source.connectivity_status() != ConnectivityStatus::Disconnected {
            self.reconnect_at = None;
            return;
        }
        let Some(delay) = self.config.reconnect_interval else {
            return;
        };
        match self.reconnect_at {
            None => {
                debug!(delay_secs = delay.as_secs_f64(), "scheduling reconnect");
                self.reconnect_at = Some(now + delay);
            }
            Some(at) if now >= at => {
                self.reconnect_at = None;
                info!(source = self.source.source_name(), "reconnecting");
                self.source.connect();
            }
            Some(_) => {}
        }
    }

    fn log_stats(&self) {
        let stats = self.source.stats();
        info!(
            records = stats.records,
            decoded = stats.decoded,
            unknown = stats.unknown,
            framing_errors = stats.framing_errors,
            checksum_errors = stats.checksum_errors,
            field_errors = stats.field_errors,
            garbled = format!("{:.1}%", stats.garbled_ratio() * 100.0),
            traffic = self.source.factors().len(),
            "decode statistics"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;
    use traffic_core::{Transport, TransportError};

    use crate::sink::{ChannelSink, ReceiverEvent};

    #[tokio::test]
    async fn test_shutdown_on_signal() {
        let done = tokio::time::timeout(Duration::from_secs(1), shutdown_on(async { Ok(()) })).await;
        assert!(done.is_ok());
    }

    #[tokio::test]
    async fn test_shutdown_waits_when_signal_fails() {
        let failed = async { Err(io::Error::other("no signal handler")) };
        let done = tokio::time::timeout(Duration::from_millis(50), shutdown_on(failed)).await;
        assert!(done.is_err());
    }

    /// Every open and close starts a new session.
    struct FakeTransport {
        session: u64,
    }

    impl Transport for FakeTransport {
        fn open(&mut self) {
            self.session += 1;
        }

        fn close(&mut self) {
            self.session += 1;
        }

        fn source_name(&self) -> &str {
            "fake"
        }
    }

    impl HostTransport for FakeTransport {
        fn session(&self) -> u64 {
            self.session
        }
    }

    fn runner(config: RunnerConfig) -> (Runner<ChannelSink>, mpsc::UnboundedReceiver<ReceiverEvent>) {
        let (_tx, rx) = mpsc::unbounded_channel();
        let (sink, events) = ChannelSink::channel();
        let transport = Box::new(FakeTransport { session: 0 });
        let runner = Runner::new(transport, rx, sink, SourceConfig::default(), config);
        (runner, events)
    }

    fn data(session: u64, bytes: &[u8]) -> Delivery {
        Delivery {
            session,
            event: TransportEvent::Data(bytes.to_vec()),
        }
    }

    #[test]
    fn test_stale_deliveries_are_dropped() {
        let (mut runner, _events) = runner(RunnerConfig::default());
        runner.source_mut().connect();
        let session = runner.source().transport().session();

        runner.dispatch(data(session - 1, b"$PFLAU,0,1,2,1,0,,0,,*60\r\n"));
        assert_eq!(
            runner.source().connectivity_status(),
            ConnectivityStatus::Connecting
        );

        runner.dispatch(data(session, b"$PFLAU,0,1,2,1,0,,0,,*60\r\n"));
        assert_eq!(
            runner.source().connectivity_status(),
            ConnectivityStatus::Connected
        );
    }

    #[test]
    fn test_reconnects_after_interval() {
        let config = RunnerConfig {
            reconnect_interval: Some(Duration::from_secs(2)),
            ..RunnerConfig::default()
        };
        let (mut runner, _events) = runner(config);
        runner.source_mut().connect();
        let session = runner.source().transport().session();
        runner.dispatch(Delivery {
            session,
            event: TransportEvent::Failed(TransportError::ConnectionRefused),
        });
        assert_eq!(runner.source().error_string(), "Connection refused");

        let t = Instant::now();
        runner.tick(t);
        runner.tick(t + Duration::from_secs(1));
        assert_eq!(
            runner.source().connectivity_status(),
            ConnectivityStatus::Disconnected
        );
        runner.tick(t + Duration::from_secs(2));
        assert_eq!(
            runner.source().connectivity_status(),
            ConnectivityStatus::Connecting
        );
    }

    #[test]
    fn test_no_reconnect_when_disabled() {
        let config = RunnerConfig {
            reconnect_interval: None,
            ..RunnerConfig::default()
        };
        let (mut runner, _events) = runner(config);
        let t = Instant::now();
        runner.tick(t);
        runner.tick(t + Duration::from_secs(3600));
        assert_eq!(
            runner.source().connectivity_status(),
            ConnectivityStatus::Disconnected
        );
    }

    #[tokio::test]
    async fn test_run_until_shutdown() {
        let (runner, mut events) = runner(RunnerConfig::default());
        let source = runner.run(async {}).await;
        assert_eq!(source.connectivity_status(), ConnectivityStatus::Disconnected);
        assert_eq!(
            events.recv().await,
            Some(ReceiverEvent::ConnectivityStatusChanged(
                ConnectivityStatus::Connecting
            ))
        );
        assert_eq!(
            events.recv().await,
            Some(ReceiverEvent::ConnectivityStatusChanged(
                ConnectivityStatus::Disconnected
            ))
        );
    }
}
