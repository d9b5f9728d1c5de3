//! Per-connection lifecycle: the engine's unit of concurrency.
//!
//! Each accepted socket is owned end-to-end by one task running
//! [`Conn::run`]: read once, parse, dispatch, stamp diagnostics, serialize,
//! write, close. A connection carries exactly one request; there is no
//! keep-alive. Read and parse failures drop the connection without a
//! response, and nothing that happens here can touch another connection.

use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::debug;

use crate::request::Request;
use crate::response::Response;
use crate::router::Router;

/// One fixed-size read per connection; longer requests are truncated.
const BUFFER_SIZE: usize = 1024;

static NEXT_TASK_ID: AtomicU64 = AtomicU64::new(1);

// ── Task identity ─────────────────────────────────────────────────────────────

/// Opaque identifier of the task handling a connection.
///
/// A process-wide monotonic counter, fresh per connection. Clients see it
/// in the `X-Task-Id` response header; handlers reach it through
/// [`Request::task_id`](crate::Request::task_id).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

impl TaskId {
    pub(crate) fn next() -> Self {
        Self(NEXT_TASK_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── Connection ────────────────────────────────────────────────────────────────

pub(crate) struct Conn {
    stream: TcpStream,
    peer: SocketAddr,
    router: Arc<Router>,
}

impl Conn {
    pub(crate) fn new(stream: TcpStream, peer: SocketAddr, router: Arc<Router>) -> Self {
        Self { stream, peer, router }
    }

    /// Drives the connection to completion. The socket closes when `self`
    /// drops, response written or not.
    pub(crate) async fn run(mut self) {
        // Arrival is stamped before the read so X-Server-Time covers the
        // wait for request bytes too.
        let received_at = Instant::now();
        let task = TaskId::next();

        let mut buf = [0u8; BUFFER_SIZE];
        let read = match self.stream.read(&mut buf).await {
            Ok(n) => n,
            Err(e) => {
                debug!(peer = %self.peer, "read failed, dropping connection: {e}");
                return;
            }
        };

        let mut request = match Request::parse(&buf[..read], received_at, task) {
            Some(request) => request,
            None => {
                debug!(peer = %self.peer, "no request line, dropping connection");
                return;
            }
        };

        let mut response = Response::new();
        self.router.dispatch(&mut request, &mut response);
        response.finalize(&request);
        self.router.notify(&request, &response);

        let wire = response.to_bytes();
        if let Err(e) = self.stream.write_all(&wire).await {
            debug!(peer = %self.peer, "write failed: {e}");
            return;
        }
        if let Err(e) = self.stream.flush().await {
            debug!(peer = %self.peer, "flush failed: {e}");
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_ids_are_unique_and_increasing() {
        let a = TaskId::next();
        let b = TaskId::next();

        assert_ne!(a, b);
        assert!(b.as_u64() > a.as_u64());
    }

    #[test]
    fn task_id_displays_as_its_number() {
        let id = TaskId::next();
        assert_eq!(id.to_string(), id.as_u64().to_string());
    }
}
