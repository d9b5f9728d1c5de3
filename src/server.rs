//! Server lifecycle: bind, listen, accept, cancel.
//!
//! The accept loop is the only long-lived task; every accepted socket is
//! handed to a fresh connection task immediately, so one slow client never
//! stalls accepting. Shutdown comes from a [`ShutdownHandle`], observed by
//! the loop between accepts. In-flight connections are not drained: the
//! engine's contract is one request per connection, so anything still
//! running at shutdown finishes on its own task.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::{TcpListener, TcpSocket};
use tokio::sync::watch;
use tracing::{error, info};

use crate::conn::Conn;
use crate::error::Error;
use crate::router::Router;

/// Kernel accept backlog for the listening socket.
const BACKLOG: u32 = 64;

type ReadyCallback = Box<dyn FnOnce(SocketAddr) + Send>;

/// The HTTP server.
///
/// ```rust,no_run
/// use sprint::{Router, Server};
///
/// # async fn run(app: Router) -> Result<(), sprint::Error> {
/// Server::bind("0.0.0.0:3000").serve(app).await
/// # }
/// ```
pub struct Server {
    addr: SocketAddr,
    on_ready: Option<ReadyCallback>,
    shutdown_tx: Arc<watch::Sender<bool>>,
    shutdown_rx: watch::Receiver<bool>,
}

impl Server {
    /// Configures the server to bind to `addr` when [`serve`](Server::serve)
    /// is called. Port `0` asks the kernel for a free port; the real one is
    /// reported through [`on_ready`](Server::on_ready).
    ///
    /// # Panics
    ///
    /// Panics if `addr` is not a valid `host:port` string.
    pub fn bind(addr: &str) -> Self {
        let addr: SocketAddr = addr.parse().expect("invalid socket address");
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Self {
            addr,
            on_ready: None,
            shutdown_tx: Arc::new(shutdown_tx),
            shutdown_rx,
        }
    }

    /// Registers a one-shot callback invoked with the bound address once
    /// the socket is listening, right before the first accept. This is how
    /// hosts binding port `0` learn the real port.
    pub fn on_ready(mut self, callback: impl FnOnce(SocketAddr) + Send + 'static) -> Self {
        self.on_ready = Some(Box::new(callback));
        self
    }

    /// Returns a handle that stops the accept loop when fired. Cheap to
    /// clone; grab one before calling [`serve`](Server::serve) and fire it
    /// from wherever shutdown is decided (a signal task, a test, an admin
    /// endpoint).
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle { tx: Arc::clone(&self.shutdown_tx) }
    }

    /// Binds, listens, and accepts until shut down.
    ///
    /// Startup failures are staged so hosts can tell them apart — socket
    /// creation, bind, and listen each map to their own [`Error`] variant.
    /// Once listening, nothing a client does is fatal: accept errors are
    /// logged and the loop keeps going. Returns `Ok(())` after a
    /// [`ShutdownHandle::shutdown`]; connections already handed off keep
    /// running on their own tasks.
    pub async fn serve(mut self, router: Router) -> Result<(), Error> {
        let listener = self.listen()?;
        let local_addr = listener.local_addr().map_err(Error::Socket)?;

        if let Some(callback) = self.on_ready.take() {
            callback(local_addr);
        }

        info!(addr = %local_addr, "listening");

        // Arc so the table is shared across concurrent connection tasks
        // without copying it.
        let router = Arc::new(router);

        loop {
            tokio::select! {
                // `biased` makes select! check arms top-to-bottom. Shutdown
                // comes first so a pending signal beats a pending accept,
                // even when both are ready.
                biased;

                _ = self.shutdown_rx.changed() => {
                    info!("shutdown signal received");
                    break;
                }

                res = listener.accept() => {
                    match res {
                        Ok((stream, peer)) => {
                            tokio::spawn(Conn::new(stream, peer, Arc::clone(&router)).run());
                        }
                        Err(e) => {
                            error!("accept error: {e}");
                            continue;
                        }
                    }
                }
            }
        }

        info!("stopped");
        Ok(())
    }

    /// The staged startup path: socket, bind, listen.
    fn listen(&self) -> Result<TcpListener, Error> {
        let socket = match self.addr {
            SocketAddr::V4(_) => TcpSocket::new_v4(),
            SocketAddr::V6(_) => TcpSocket::new_v6(),
        }
        .map_err(Error::Socket)?;

        socket.bind(self.addr).map_err(Error::Bind)?;
        socket.listen(BACKLOG).map_err(Error::Listen)
    }
}

// ── Shutdown handle ───────────────────────────────────────────────────────────

/// Cancels a running [`Server::serve`] loop.
#[derive(Clone)]
pub struct ShutdownHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl ShutdownHandle {
    /// Signals the accept loop to stop. Idempotent and never blocks; firing
    /// it before `serve` starts makes `serve` return on its first loop turn.
    pub fn shutdown(&self) {
        let _ = self.tx.send(true);
    }
}
