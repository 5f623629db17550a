use std::time::Duration;

use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, info};
use traffic_core::{Transport, TransportError};

use super::{DeliverySender, Emitter, HostTransport, SessionTask, TransportEvent};

/// Receive buffer size. FLARM devices send a few hundred bytes per second.
const READ_BUFFER_SIZE: usize = 1024;

/// Connects to a FLARM data port over TCP, as offered by WiFi bridges and
/// flight simulators.
///
/// A connection that stays silent for the read timeout is treated as lost.
#[derive(Debug)]
pub struct TcpTransport {
    address: String,
    connect_timeout: Duration,
    read_timeout: Duration,
    task: SessionTask,
}

impl TcpTransport {
    /// `address` is `host:port`; host names are resolved on every open.
    pub fn new(
        address: String,
        connect_timeout: Duration,
        read_timeout: Duration,
        tx: DeliverySender,
    ) -> Self {
        Self {
            address,
            connect_timeout,
            read_timeout,
            task: SessionTask::new(tx),
        }
    }
}

impl Transport for TcpTransport {
    fn open(&mut self) {
        let address = self.address.clone();
        let connect_timeout = self.connect_timeout;
        let read_timeout = self.read_timeout;
        self.task.spawn(move |emitter| async move {
            run(address, connect_timeout, read_timeout, emitter).await;
        });
    }

    fn close(&mut self) {
        self.task.abort();
    }

    fn source_name(&self) -> &str {
        &self.address
    }
}

impl HostTransport for TcpTransport {
    fn session(&self) -> u64 {
        self.task.session()
    }
}

async fn run(address: String, connect_timeout: Duration, read_timeout: Duration, emitter: Emitter) {
    let mut stream = match timeout(connect_timeout, TcpStream::connect(address.as_str())).await {
        Ok(Ok(stream)) => stream,
        Ok(Err(e)) => {
            debug!(address = %address, error = %e, "TCP connect failed");
            emitter.fail(e.into());
            return;
        }
        Err(_) => {
            emitter.fail(TransportError::ConnectTimeout);
            return;
        }
    };
    let _ = stream.set_nodelay(true);
    info!(address = %address, peer = ?stream.peer_addr().ok(), "TCP connected");
    if !emitter.send(TransportEvent::Connected) {
        return;
    }

    let mut buffer = [0u8; READ_BUFFER_SIZE];
    loop {
        let error = match timeout(read_timeout, stream.read(&mut buffer)).await {
            Ok(Ok(0)) => TransportError::RemoteClosed,
            Ok(Ok(len)) => {
                if emitter.send(TransportEvent::Data(buffer[..len].to_vec())) {
                    continue;
                }
                debug!("delivery channel closed, stopping TCP reader");
                return;
            }
            Ok(Err(e)) => e.into(),
            Err(_) => TransportError::ReadTimeout,
        };
        emitter.fail(error);
        return;
    }
}
