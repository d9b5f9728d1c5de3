//! Incoming HTTP request type and the raw-buffer parser.
//!
//! A request is parsed from exactly one read of the connection: request
//! line, query string, header block, JSON body. The parser never fails on
//! malformed *pieces* — a broken query pair or a header line without a
//! colon is silently dropped — only a buffer with no request line at all is
//! rejected, and the connection handler drops that connection unanswered.

use std::time::Instant;

use serde_json::Value;
use tracing::debug;

use crate::conn::TaskId;
use crate::records::{DEFAULT_CAPACITY, Records, RecordsFull};

/// An incoming HTTP request, parsed from the raw TCP stream.
///
/// Handlers receive `&mut Request`, but mutation is deliberately narrow:
/// [`add_header`](Request::add_header) appends to the header table and
/// nothing else changes after parsing. That is enough for middleware to tag
/// a request for handlers further down the route table.
pub struct Request {
    method: String,
    path: String,
    version: String,
    received_at: Instant,
    task: TaskId,
    query: Records,
    headers: Records,
    body: Option<Value>,
}

impl Request {
    /// Parses one raw buffer. Returns `None` when no request line is
    /// present (an empty or all-whitespace read).
    pub(crate) fn parse(raw: &[u8], received_at: Instant, task: TaskId) -> Option<Self> {
        let text = String::from_utf8_lossy(raw);
        let text = text.as_ref();

        // The request line runs to the first line terminator; the header
        // block runs from there to the first blank line; the body is
        // whatever follows.
        let line_end = text.find("\r\n");
        let request_line = match line_end {
            Some(i) => &text[..i],
            None => text,
        };

        // The line splits at the first two space runs, so `GET  /x   HTTP/1.1`
        // is still well formed. The version keeps whatever remains of the
        // line, embedded spaces included.
        let request_line = request_line.trim_start_matches(' ');
        let (method, rest) = request_line.split_once(' ').unwrap_or((request_line, ""));
        if method.is_empty() {
            return None;
        }
        let rest = rest.trim_start_matches(' ');
        let (target, version) = rest.split_once(' ').unwrap_or((rest, ""));
        let version = version.trim_start_matches(' ');

        let (path, query_string) = match target.split_once('?') {
            Some((p, q)) => (p, Some(q)),
            None => (target, None),
        };

        let mut query = Records::new(DEFAULT_CAPACITY);
        if let Some(query_string) = query_string {
            for pair in query_string.split('&') {
                match pair.split_once('=') {
                    Some((name, value)) if !name.is_empty() && !value.is_empty() => {
                        if query.push(name, value).is_err() {
                            debug!("query table full, dropping remaining parameters");
                            break;
                        }
                    }
                    // Pairs without `=`, or with an empty side, are dropped.
                    _ => {}
                }
            }
        }

        let mut headers = Records::new(DEFAULT_CAPACITY);
        let mut body = None;

        if let Some(i) = line_end {
            let tail = &text[i..];
            let (header_block, body_text) = match tail.find("\r\n\r\n") {
                Some(j) => (&tail[..j], Some(&tail[j + 4..])),
                None => (tail, None),
            };

            for line in header_block.split(['\r', '\n']) {
                if line.is_empty() {
                    continue;
                }
                let Some(colon) = line.find(':') else {
                    continue;
                };
                let name = &line[..colon];
                // The value starts two bytes past the colon; `get` covers
                // lines that end at the colon or inside a multibyte char.
                let value = line.get(colon + 2..).unwrap_or("");
                if headers.push(name, value).is_err() {
                    debug!("header table full, dropping remaining headers");
                    break;
                }
            }

            if let Some(body_text) = body_text {
                body = serde_json::from_str(body_text).ok();
            }
        }

        Some(Self {
            method: method.to_owned(),
            path: path.to_owned(),
            version: version.to_owned(),
            received_at,
            task,
            query,
            headers,
            body,
        })
    }

    pub fn method(&self) -> &str { &self.method }
    pub fn path(&self) -> &str { &self.path }
    pub fn version(&self) -> &str { &self.version }

    /// When the connection handler started working on this request,
    /// captured before the socket read.
    pub fn received_at(&self) -> Instant { self.received_at }

    /// The identifier of the task handling this connection.
    pub fn task_id(&self) -> TaskId { self.task }

    /// Returns the first query parameter named `name`. Values are the raw
    /// bytes from the request target; nothing is percent-decoded.
    pub fn query(&self, name: &str) -> Option<&str> {
        self.query.get(name)
    }

    /// The full query-parameter table, in request order.
    pub fn query_params(&self) -> &Records { &self.query }

    /// Case-sensitive header lookup, first match wins.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// The full header table, in request order.
    pub fn headers(&self) -> &Records { &self.headers }

    /// Appends a request header. Existing entries are never replaced, so a
    /// later [`header`](Request::header) lookup still sees the original.
    pub fn add_header(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), RecordsFull> {
        self.headers.push(name, value)
    }

    /// The parsed JSON body, when one was present and valid.
    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }
}

// ── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn parse(raw: &[u8]) -> Request {
        Request::parse(raw, Instant::now(), TaskId::next()).expect("request should parse")
    }

    #[test]
    fn request_line_fields() {
        let req = parse(b"GET /user?id=123 HTTP/1.1\r\n\r\n");

        assert_eq!(req.method(), "GET");
        assert_eq!(req.path(), "/user");
        assert_eq!(req.version(), "HTTP/1.1");
    }

    #[test]
    fn repeated_spaces_in_the_request_line_are_collapsed() {
        let req = parse(b"GET   /user  HTTP/1.1\r\n\r\n");

        assert_eq!(req.method(), "GET");
        assert_eq!(req.path(), "/user");
        assert_eq!(req.version(), "HTTP/1.1");
    }

    #[test]
    fn version_keeps_the_rest_of_the_request_line() {
        let req = parse(b"GET / HTTP/1.1 beta\r\n\r\n");

        assert_eq!(req.method(), "GET");
        assert_eq!(req.path(), "/");
        assert_eq!(req.version(), "HTTP/1.1 beta");
    }

    #[test]
    fn query_parameters_keep_raw_values() {
        let req = parse(b"GET /s?id=123&tag=a%20b HTTP/1.1\r\n\r\n");

        assert_eq!(req.query("id"), Some("123"));
        assert_eq!(req.query("tag"), Some("a%20b"));
        assert_eq!(req.query_params().len(), 2);
    }

    #[test]
    fn malformed_query_pairs_are_dropped() {
        let req = parse(b"GET /s?a=1&junk&=x&c=&b=2 HTTP/1.1\r\n\r\n");

        assert_eq!(req.query("a"), Some("1"));
        assert_eq!(req.query("b"), Some("2"));
        assert_eq!(req.query("junk"), None);
        assert_eq!(req.query("c"), None);
        assert_eq!(req.query_params().len(), 2);
    }

    #[test]
    fn no_query_string_means_empty_table() {
        let req = parse(b"GET /user HTTP/1.1\r\n\r\n");
        assert!(req.query_params().is_empty());
    }

    #[test]
    fn query_table_truncates_at_capacity() {
        let pairs: Vec<String> = (0..DEFAULT_CAPACITY + 5).map(|i| format!("k{i}={i}")).collect();
        let raw = format!("GET /s?{} HTTP/1.1\r\n\r\n", pairs.join("&"));
        let req = parse(raw.as_bytes());

        assert_eq!(req.query_params().len(), DEFAULT_CAPACITY);
        assert_eq!(req.query("k0"), Some("0"));
        assert_eq!(req.query("k99"), Some("99"));
        assert_eq!(req.query("k100"), None);
    }

    #[test]
    fn headers_parsed_in_order() {
        let req = parse(b"GET / HTTP/1.1\r\nHost: localhost\r\nAccept: */*\r\n\r\n");

        assert_eq!(req.header("Host"), Some("localhost"));
        assert_eq!(req.header("Accept"), Some("*/*"));
        let order: Vec<_> = req.headers().iter().collect();
        assert_eq!(order, vec![("Host", "localhost"), ("Accept", "*/*")]);
    }

    #[test]
    fn header_lookup_is_case_sensitive() {
        let req = parse(b"GET / HTTP/1.1\r\nHost: localhost\r\n\r\n");

        assert_eq!(req.header("Host"), Some("localhost"));
        assert_eq!(req.header("host"), None);
    }

    #[test]
    fn header_value_starts_two_bytes_past_the_colon() {
        // One space is the separator; anything further is part of the value.
        let req = parse(b"GET / HTTP/1.1\r\nX-Pad:  padded\r\nX-Tight:tight\r\nX-End:\r\n\r\n");

        assert_eq!(req.header("X-Pad"), Some(" padded"));
        assert_eq!(req.header("X-Tight"), Some("ight"));
        assert_eq!(req.header("X-End"), Some(""));
    }

    #[test]
    fn header_lines_without_a_colon_are_dropped() {
        let req = parse(b"GET / HTTP/1.1\r\nGarbage line\r\nHost: x\r\n\r\n");

        assert_eq!(req.headers().len(), 1);
        assert_eq!(req.header("Host"), Some("x"));
    }

    #[test]
    fn duplicate_headers_first_match_wins() {
        let req = parse(b"GET / HTTP/1.1\r\nAccept: text/html\r\nAccept: application/json\r\n\r\n");

        assert_eq!(req.header("Accept"), Some("text/html"));
        assert_eq!(req.headers().len(), 2);
    }

    #[test]
    fn json_body_is_parsed() {
        let req = parse(b"POST /echo HTTP/1.1\r\nContent-Type: application/json\r\n\r\n{\"k\":\"v\",\"n\":1}");

        assert_eq!(req.body(), Some(&json!({ "k": "v", "n": 1 })));
    }

    #[test]
    fn body_without_headers_is_still_found() {
        let req = parse(b"POST /echo HTTP/1.1\r\n\r\n{\"n\":2}");

        assert!(req.headers().is_empty());
        assert_eq!(req.body(), Some(&json!({ "n": 2 })));
    }

    #[test]
    fn invalid_json_body_is_absent() {
        let req = parse(b"POST /echo HTTP/1.1\r\n\r\nnot json at all");
        assert_eq!(req.body(), None);
    }

    #[test]
    fn missing_body_is_absent() {
        let req = parse(b"GET / HTTP/1.1\r\nHost: x\r\n\r\n");
        assert_eq!(req.body(), None);
    }

    #[test]
    fn truncated_header_block_still_yields_headers() {
        // No blank line: everything after the request line is headers.
        let req = parse(b"GET / HTTP/1.1\r\nHost: x\r\nAccept: */*");

        assert_eq!(req.header("Host"), Some("x"));
        assert_eq!(req.header("Accept"), Some("*/*"));
        assert_eq!(req.body(), None);
    }

    #[test]
    fn empty_buffer_is_rejected() {
        assert!(Request::parse(b"", Instant::now(), TaskId::next()).is_none());
        assert!(Request::parse(b"   ", Instant::now(), TaskId::next()).is_none());
        assert!(Request::parse(b"\r\nGET / HTTP/1.1", Instant::now(), TaskId::next()).is_none());
    }

    #[test]
    fn bare_method_is_tolerated() {
        let req = parse(b"GET\r\n\r\n");

        assert_eq!(req.method(), "GET");
        assert_eq!(req.path(), "");
        assert_eq!(req.version(), "");
    }

    #[test]
    fn non_utf8_bytes_are_replaced_not_fatal() {
        let req = parse(b"GET /caf\xe9 HTTP/1.1\r\n\r\n");
        assert_eq!(req.path(), "/caf\u{fffd}");
    }

    #[test]
    fn reparsing_the_same_buffer_is_identical() {
        let raw = b"POST /echo?id=9 HTTP/1.1\r\nHost: x\r\n\r\n{\"n\":3}";
        let a = parse(raw);
        let b = parse(raw);

        assert_eq!(a.method(), b.method());
        assert_eq!(a.path(), b.path());
        assert_eq!(a.version(), b.version());
        assert_eq!(a.query_params(), b.query_params());
        assert_eq!(a.headers(), b.headers());
        assert_eq!(a.body(), b.body());
    }

    #[test]
    fn added_headers_append_without_replacing() {
        let mut req = parse(b"GET / HTTP/1.1\r\nX-Tag: original\r\n\r\n");
        req.add_header("X-Tag", "added").unwrap();

        assert_eq!(req.header("X-Tag"), Some("original"));
        assert_eq!(req.headers().len(), 2);
    }
}
