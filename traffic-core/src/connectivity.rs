//! Connectivity lifecycle: Disconnected, Connecting, Connected.
//!
//! [`Connectivity`] holds the status and the last error string and applies
//! the legal transitions. It performs no I/O; the caller opens and closes
//! the transport and forwards the reported [`Transition`] as events.

use core::fmt;

/// Connection status of a traffic data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConnectivityStatus {
    /// Not connected to any device.
    #[default]
    Disconnected,
    /// Connecting to a device, no valid data yet.
    Connecting,
    /// Valid data has been received.
    Connected,
}

impl fmt::Display for ConnectivityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
        })
    }
}

/// What changed during a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[must_use]
pub struct Transition {
    /// New status, if it changed.
    pub status: Option<ConnectivityStatus>,
    /// Whether the error string changed.
    pub error_changed: bool,
}

impl Transition {
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && !self.error_changed
    }
}

/// Status plus last error.
#[derive(Debug, Clone, Default)]
pub struct Connectivity {
    status: ConnectivityStatus,
    error_string: String,
}

impl Connectivity {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn status(&self) -> ConnectivityStatus {
        self.status
    }

    /// Description of the last transport failure; empty if none.
    #[inline]
    #[must_use]
    pub fn error_string(&self) -> &str {
        &self.error_string
    }

    /// Disconnected to Connecting. Clears the error string.
    ///
    /// Does nothing while Connecting or Connected.
    pub fn request_connect(&mut self) -> Transition {
        if self.status != ConnectivityStatus::Disconnected {
            return Transition::default();
        }
        let error_changed = !self.error_string.is_empty();
        self.error_string.clear();
        self.status = ConnectivityStatus::Connecting;
        Transition {
            status: Some(self.status),
            error_changed,
        }
    }

    /// Connecting to Connected, on the first valid sentence.
    pub fn data_received(&mut self) -> Transition {
        if self.status != ConnectivityStatus::Connecting {
            return Transition::default();
        }
        self.status = ConnectivityStatus::Connected;
        Transition {
            status: Some(self.status),
            error_changed: false,
        }
    }

    /// Connecting or Connected to Disconnected, recording the failure.
    ///
    /// Failures reported while already Disconnected are stale and ignored.
    pub fn transport_failed(&mut self, description: &str) -> Transition {
        if self.status == ConnectivityStatus::Disconnected {
            return Transition::default();
        }
        let error_changed = self.error_string != description;
        if error_changed {
            self.error_string.clear();
            self.error_string.push_str(description);
        }
        self.status = ConnectivityStatus::Disconnected;
        Transition {
            status: Some(self.status),
            error_changed,
        }
    }

    /// Any state to Disconnected. The error string is kept.
    pub fn request_disconnect(&mut self) -> Transition {
        if self.status == ConnectivityStatus::Disconnected {
            return Transition::default();
        }
        self.status = ConnectivityStatus::Disconnected;
        Transition {
            status: Some(self.status),
            error_changed: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_is_idempotent() {
        let mut c = Connectivity::new();
        assert_eq!(
            c.request_connect().status,
            Some(ConnectivityStatus::Connecting)
        );
        assert!(c.request_connect().is_empty());
        assert!(c.data_received().status.is_some());
        assert!(c.request_connect().is_empty());
        assert_eq!(c.status(), ConnectivityStatus::Connected);
    }

    #[test]
    fn test_data_only_promotes_connecting() {
        let mut c = Connectivity::new();
        assert!(c.data_received().is_empty());
        assert_eq!(c.status(), ConnectivityStatus::Disconnected);

        let _ = c.request_connect();
        let _ = c.data_received();
        assert!(c.data_received().is_empty());
    }

    #[test]
    fn test_failure_sets_error_and_connect_clears_it() {
        let mut c = Connectivity::new();
        let _ = c.request_connect();
        let t = c.transport_failed("Connection refused");
        assert_eq!(t.status, Some(ConnectivityStatus::Disconnected));
        assert!(t.error_changed);
        assert_eq!(c.error_string(), "Connection refused");

        // Stale failure after the fact.
        assert!(c.transport_failed("late").is_empty());
        assert_eq!(c.error_string(), "Connection refused");

        let t = c.request_connect();
        assert!(t.error_changed);
        assert_eq!(c.error_string(), "");
    }

    #[test]
    fn test_disconnect_keeps_error_string() {
        let mut c = Connectivity::new();
        let _ = c.request_connect();
        let _ = c.transport_failed("Timed out");
        let _ = c.request_connect();
        let _ = c.data_received();

        let mut c2 = c.clone();
        let _ = c2.transport_failed("Remote closed");
        let _ = c2.request_connect();
        let _ = c2.transport_failed("Remote closed");
        let t = c2.request_disconnect();
        assert!(t.is_empty());
        assert_eq!(c2.error_string(), "Remote closed");

        let t = c.request_disconnect();
        assert_eq!(t.status, Some(ConnectivityStatus::Disconnected));
        assert!(!t.error_changed);
        assert!(c.request_disconnect().is_empty());
    }
}
