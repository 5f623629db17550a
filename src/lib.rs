//! Host side of the FLARM traffic receiver.
//!
//! Wires a [`traffic_core::TrafficDataSource`] to tokio: transports run as
//! spawned tasks and hand their data to a [`Runner`] over a channel, and
//! events come out through a [`sink`].

pub mod config;
pub mod logging;
pub mod runner;
pub mod sink;
pub mod transport;

pub use config::{Args, ConfigError, Settings, SourceKind, SourceSettings};
pub use runner::{shutdown_on, HostSource, Runner, RunnerConfig};
pub use sink::{ChannelSink, LogSink, ReceiverEvent};
pub use transport::{
    build_transport, Delivery, FileReplayTransport, HostTransport, ReplayOptions, TcpTransport,
    TransportEvent,
};
