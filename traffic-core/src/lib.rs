//! Platform-independent core of a FLARM traffic receiver.
//!
//! [`TrafficDataSource`] ties the pieces together: bytes from a
//! [`Transport`] are split and decoded by `flarm-proto`, drive the
//! [`Connectivity`] state machine and the [`HeartbeatMonitor`], and feed
//! the [`FactorRegistry`]. Every observable change is reported to an
//! [`EventSink`].
//!
//! The core does no I/O and reads no clock. The platform owns the
//! transport, passes the current [`Instant`](std::time::Instant) in, and
//! calls [`TrafficDataSource::poll`] periodically.
//!
//! Diagnostics go through the [`log`] facade.

pub mod config;
pub mod connectivity;
pub mod device;
pub mod events;
pub mod factor;
pub mod heartbeat;
pub mod registry;
pub mod samples;
pub mod source;
pub mod stats;
pub mod transport;

pub use config::SourceConfig;
pub use connectivity::{Connectivity, ConnectivityStatus, Transition};
pub use device::DeviceInfo;
pub use events::{EventSink, TrafficEvent};
pub use factor::{FactorKind, FactorUpdate, TrafficFactor};
pub use heartbeat::HeartbeatMonitor;
pub use registry::FactorRegistry;
pub use samples::{AltitudeSample, GeoPoint, PositionSample};
pub use source::TrafficDataSource;
pub use stats::DecodeStats;
pub use transport::{Transport, TransportError};
