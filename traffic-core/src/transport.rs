//! Byte source seam between the core and the platform.

use std::io;

use thiserror::Error;

/// A connection to a FLARM device.
///
/// `open` starts connecting without blocking. The platform later reports
/// the outcome to the owning [`TrafficDataSource`](crate::TrafficDataSource)
/// through `on_transport_connected`, `on_bytes` or `on_transport_error`.
/// After `close` returns, nothing from the closed connection may be
/// reported any more.
pub trait Transport {
    fn open(&mut self);

    fn close(&mut self);

    /// Human-readable name of the source, e.g. an address or a file path.
    fn source_name(&self) -> &str;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn open(&mut self) {
        (**self).open();
    }

    fn close(&mut self) {
        (**self).close();
    }

    fn source_name(&self) -> &str {
        (**self).source_name()
    }
}

/// Why a transport stopped delivering data.
///
/// The `Display` text becomes the source's error string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("Connection refused")]
    ConnectionRefused,
    #[error("Connection timed out")]
    ConnectTimeout,
    #[error("No data received")]
    ReadTimeout,
    #[error("Remote closed the connection")]
    RemoteClosed,
    #[error("Host unreachable")]
    Unreachable,
    #[error("End of file")]
    EndOfStream,
    #[error("{0}")]
    Io(String),
}

impl From<io::Error> for TransportError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::ConnectionRefused => Self::ConnectionRefused,
            io::ErrorKind::TimedOut => Self::ConnectTimeout,
            io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::BrokenPipe => Self::RemoteClosed,
            io::ErrorKind::UnexpectedEof => Self::EndOfStream,
            io::ErrorKind::HostUnreachable | io::ErrorKind::NetworkUnreachable => {
                Self::Unreachable
            }
            _ => Self::Io(err.to_string()),
        }
    }
}
