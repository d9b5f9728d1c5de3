//! Outgoing HTTP response type: accumulator, diagnostics, wire serializer.
//!
//! A [`Response`] starts empty — no status, no headers, no body — and
//! handlers fill it in. After dispatch the engine stamps the diagnostic
//! headers and serializes the whole thing in one buffer:
//!
//! ```text
//! HTTP/1.1 <status line>\r\n
//! Content-Length: <n>\r\n
//! <headers, insertion order>\r\n
//! \r\n
//! <compact JSON body>\r\n        ← only when a body was set
//! ```
//!
//! The body's trailing `\r\n` is part of the body for framing purposes:
//! `Content-Length` counts it.

use std::time::Instant;

use serde_json::Value;
use tracing::warn;

use crate::records::{DEFAULT_CAPACITY, Records, RecordsFull};
use crate::request::Request;
use crate::status::Status;

/// An outgoing HTTP response, mutated in place as dispatch walks the route
/// table.
///
/// Setting a body or a redirect is what terminates dispatch — see
/// [`Router`](crate::Router). Status is optional until serialization:
/// unset means "let dispatch defaulting decide".
pub struct Response {
    status: Option<Status>,
    completed_at: Option<Instant>,
    headers: Records,
    redirect: Option<String>,
    body: Option<Value>,
}

impl Response {
    pub(crate) fn new() -> Self {
        Self {
            status: None,
            completed_at: None,
            headers: Records::new(DEFAULT_CAPACITY),
            redirect: None,
            body: None,
        }
    }

    /// The status set so far, if any.
    pub fn status(&self) -> Option<Status> {
        self.status
    }

    /// Sets the status explicitly. Dispatch defaulting never overrides an
    /// explicit status, even a surprising pairing like `404` with a body.
    pub fn set_status(&mut self, status: Status) {
        self.status = Some(status);
    }

    /// Case-sensitive header lookup, first match wins.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// The full header table, in insertion order.
    pub fn headers(&self) -> &Records {
        &self.headers
    }

    /// Appends a response header. Existing entries are never replaced.
    pub fn add_header(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), RecordsFull> {
        self.headers.push(name, value)
    }

    /// The redirect target, if a handler set one.
    pub fn redirect(&self) -> Option<&str> {
        self.redirect.as_deref()
    }

    /// Marks this response a redirect. Dispatch stops at the next check,
    /// injects a `Location` header from the target, and defaults the status
    /// to `302 Found` unless one was set explicitly.
    pub fn set_redirect(&mut self, target: impl Into<String>) {
        self.redirect = Some(target.into());
    }

    /// The JSON body set so far, if any.
    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// Sets the JSON body. Dispatch stops at the next check and injects a
    /// `Content-Type: application/json` header.
    pub fn set_body(&mut self, body: Value) {
        self.body = Some(body);
    }

    /// When the engine finished dispatching this response. `None` until
    /// then — handlers never see it set, the response hook always does.
    pub fn completed_at(&self) -> Option<Instant> {
        self.completed_at
    }

    /// Stamps the completion time and the diagnostic headers. Runs once,
    /// after dispatch and before the response hook.
    pub(crate) fn finalize(&mut self, request: &Request) {
        let completed = Instant::now();
        self.completed_at = Some(completed);

        let elapsed = completed.duration_since(request.received_at()).as_micros();
        self.inject_header("X-Powered-By", env!("CARGO_PKG_NAME"));
        self.inject_header("X-Server-Time", elapsed.to_string());
        self.inject_header("X-Task-Id", request.task_id().to_string());
    }

    /// Engine-side header injection. A full table costs the client a
    /// diagnostic, not the response; the handler's own headers keep their
    /// slots.
    pub(crate) fn inject_header(&mut self, name: &'static str, value: impl Into<String>) {
        if self.headers.push(name, value).is_err() {
            warn!(header = name, "response header table full, dropping injected header");
        }
    }

    /// Serializes the response into one wire buffer. An unset status falls
    /// back to `200 OK`; dispatch normally guarantees a status first.
    pub(crate) fn to_bytes(&self) -> Vec<u8> {
        let body = self.body.as_ref().map(|value| {
            let mut text = value.to_string();
            text.push_str("\r\n");
            text
        });
        let content_length = body.as_deref().map_or(0, str::len);
        let status = self.status.unwrap_or(Status::Ok);

        let mut wire = Vec::with_capacity(256 + content_length);
        wire.extend_from_slice(b"HTTP/1.1 ");
        wire.extend_from_slice(status.line().as_bytes());
        wire.extend_from_slice(b"\r\n");
        wire.extend_from_slice(format!("Content-Length: {content_length}\r\n").as_bytes());
        for (name, value) in self.headers.iter() {
            wire.extend_from_slice(name.as_bytes());
            wire.extend_from_slice(b": ");
            wire.extend_from_slice(value.as_bytes());
            wire.extend_from_slice(b"\r\n");
        }
        wire.extend_from_slice(b"\r\n");
        if let Some(body) = body {
            wire.extend_from_slice(body.as_bytes());
        }
        wire
    }
}

// ── Tests ──────────────────────────────────────────────────────────
