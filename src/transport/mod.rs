//! Tokio transports feeding a [`TrafficDataSource`](traffic_core::TrafficDataSource).
//!
//! A transport runs its I/O as a spawned task and reports back through an
//! unbounded channel of [`Delivery`] values. Each `open` starts a new
//! session; `close` aborts the task and starts another, so anything still
//! queued from the old connection can be recognized and dropped.

mod replay;
mod tcp;

use std::future::Future;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use traffic_core::{Transport, TransportError};

use crate::config::SourceSettings;

pub use replay::{parse_recording, FileReplayTransport, RecordedLine, ReplayOptions};
pub use tcp::TcpTransport;

/// What happened on a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// The connection is up.
    Connected,
    Data(Vec<u8>),
    /// The connection is gone; no further events follow in this session.
    Failed(TransportError),
}

/// A transport event tagged with the session it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub session: u64,
    pub event: TransportEvent,
}

pub type DeliverySender = mpsc::UnboundedSender<Delivery>;
pub type DeliveryReceiver = mpsc::UnboundedReceiver<Delivery>;

/// A [`Transport`] driven by the runner.
pub trait HostTransport: Transport + Send {
    /// Deliveries from other sessions are stale.
    fn session(&self) -> u64;
}

/// Sends events for one session.
#[derive(Debug, Clone)]
pub(crate) struct Emitter {
    session: u64,
    tx: DeliverySender,
}

impl Emitter {
    /// Returns `false` once nobody listens any more.
    pub(crate) fn send(&self, event: TransportEvent) -> bool {
        self.tx
            .send(Delivery {
                session: self.session,
                event,
            })
            .is_ok()
    }

    pub(crate) fn fail(&self, error: TransportError) {
        let _ = self.send(TransportEvent::Failed(error));
    }
}

/// The I/O task of a transport and its session counter.
#[derive(Debug)]
pub(crate) struct SessionTask {
    session: u64,
    tx: DeliverySender,
    task: Option<JoinHandle<()>>,
}

impl SessionTask {
    pub(crate) fn new(tx: DeliverySender) -> Self {
        Self {
            session: 0,
            tx,
            task: None,
        }
    }

    /// Abort any running task and spawn `run` in a new session.
    ///
    /// Must be called from within a tokio runtime.
    pub(crate) fn spawn<F, Fut>(&mut self, run: F)
    where
        F: FnOnce(Emitter) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.abort();
        let emitter = Emitter {
            session: self.session,
            tx: self.tx.clone(),
        };
        self.task = Some(tokio::spawn(run(emitter)));
    }

    /// Abort the running task, if any, and end the session.
    pub(crate) fn abort(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.session += 1;
    }

    pub(crate) fn session(&self) -> u64 {
        self.session
    }
}

impl Drop for SessionTask {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Build the transport selected in the settings.
pub fn build_transport(source: &SourceSettings, tx: DeliverySender) -> Box<dyn HostTransport> {
    match source {
        SourceSettings::Network {
            address,
            connect_timeout,
            read_timeout,
        } => Box::new(TcpTransport::new(
            address.clone(),
            *connect_timeout,
            *read_timeout,
            tx,
        )),
        SourceSettings::File { path, options } => {
            Box::new(FileReplayTransport::new(path.clone(), *options, tx))
        }
    }
}
