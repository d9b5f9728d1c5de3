//! HTTP status codes as a typed enum.
//!
//! The engine speaks a closed set of statuses: the eight its dispatch rules
//! and its callers can produce. A [`Response`](crate::Response) starts with
//! no status at all; handlers may set one, and dispatch fills in a default
//! (`302`, `200`, or `404`) when they don't.
//!
//! ```rust
//! use sprint::Status;
//!
//! assert_eq!(Status::NotFound.code(), 404);
//! assert_eq!(Status::NotFound.line(), "404 Not Found");
//! ```

use std::fmt;

/// A status code the engine can put on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Ok,                  // 200
    MovedPermanently,    // 301
    Found,               // 302
    BadRequest,          // 400
    Unauthorized,        // 401
    Forbidden,           // 403
    NotFound,            // 404
    InternalServerError, // 500
}

impl Status {
    /// The numeric code, e.g. `404`.
    pub fn code(self) -> u16 {
        match self {
            Status::Ok                  => 200,
            Status::MovedPermanently    => 301,
            Status::Found               => 302,
            Status::BadRequest          => 400,
            Status::Unauthorized        => 401,
            Status::Forbidden           => 403,
            Status::NotFound            => 404,
            Status::InternalServerError => 500,
        }
    }

    /// The status-line text, e.g. `"404 Not Found"`.
    pub fn line(self) -> &'static str {
        match self {
            Status::Ok                  => "200 OK",
            Status::MovedPermanently    => "301 Moved Permanently",
            Status::Found               => "302 Found",
            Status::BadRequest          => "400 Bad Request",
            Status::Unauthorized        => "401 Unauthorized",
            Status::Forbidden           => "403 Forbidden",
            Status::NotFound            => "404 Not Found",
            Status::InternalServerError => "500 Internal Server Error",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_and_line_agree() {
        let all = [
            Status::Ok,
            Status::MovedPermanently,
            Status::Found,
            Status::BadRequest,
            Status::Unauthorized,
            Status::Forbidden,
            Status::NotFound,
            Status::InternalServerError,
        ];
        for status in all {
            assert!(
                status.line().starts_with(&status.code().to_string()),
                "line {:?} does not start with code {}",
                status.line(),
                status.code(),
            );
        }
    }

    #[test]
    fn line_text_matches_the_wire_format() {
        assert_eq!(Status::Ok.line(), "200 OK");
        assert_eq!(Status::Found.line(), "302 Found");
        assert_eq!(Status::InternalServerError.line(), "500 Internal Server Error");
    }

    #[test]
    fn displays_as_bare_code() {
        assert_eq!(Status::Forbidden.to_string(), "403");
    }
}
