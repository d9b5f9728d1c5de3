//! Startup error taxonomy.
//!
//! Application-level failures (404s, bad input) are expressed on the
//! [`Response`](crate::Response), never here. `Error` covers the staged
//! startup failures of [`Server::serve`](crate::Server::serve): creating
//! the listening socket, binding it, and marking it listening. Each stage
//! carries a stable negative code so hosts can report or exit with it.

use std::io;

use thiserror::Error;

const CODE_ALLOCATION: i32 = -11;
const CODE_SOCKET: i32 = -12;
const CODE_BIND: i32 = -13;
const CODE_LISTEN: i32 = -14;

/// The error type returned by the engine's fallible startup path.
#[derive(Debug, Error)]
pub enum Error {
    /// The listening socket could not be created.
    #[error("server socket failed: {0}")]
    Socket(#[source] io::Error),

    /// The socket could not be bound to the requested address.
    #[error("server binding failed: {0}")]
    Bind(#[source] io::Error),

    /// The bound socket could not be marked listening.
    #[error("server listening failed: {0}")]
    Listen(#[source] io::Error),
}

impl Error {
    /// The stable numeric code for this error: `-12`, `-13`, or `-14`.
    pub fn code(&self) -> i32 {
        match self {
            Error::Socket(_) => CODE_SOCKET,
            Error::Bind(_) => CODE_BIND,
            Error::Listen(_) => CODE_LISTEN,
        }
    }

    /// Resolves a numeric error code to its short description.
    ///
    /// The table also covers codes the engine reserves but no longer
    /// produces, such as `-11` for allocation failure. Anything
    /// unrecognized resolves to `"Unknown error"`.
    pub fn describe(code: i32) -> &'static str {
        match code {
            CODE_ALLOCATION => "Server allocation failed",
            CODE_SOCKET => "Server socket failed",
            CODE_BIND => "Server binding failed",
            CODE_LISTEN => "Server listening failed",
            _ => "Unknown error",
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn io_err() -> io::Error {
        io::Error::new(io::ErrorKind::AddrInUse, "address in use")
    }

    #[test]
    fn each_stage_has_its_own_code() {
        assert_eq!(Error::Socket(io_err()).code(), -12);
        assert_eq!(Error::Bind(io_err()).code(), -13);
        assert_eq!(Error::Listen(io_err()).code(), -14);
    }

    #[test]
    fn codes_resolve_to_their_descriptions() {
        assert_eq!(Error::describe(-11), "Server allocation failed");
        assert_eq!(Error::describe(-12), "Server socket failed");
        assert_eq!(Error::describe(-13), "Server binding failed");
        assert_eq!(Error::describe(-14), "Server listening failed");
    }

    #[test]
    fn unrecognized_codes_are_unknown() {
        assert_eq!(Error::describe(-10), "Unknown error");
        assert_eq!(Error::describe(0), "Unknown error");
        assert_eq!(Error::describe(42), "Unknown error");
    }

    #[test]
    fn display_names_the_failed_stage() {
        let err = Error::Bind(io_err());
        assert_eq!(err.to_string(), "server binding failed: address in use");
    }

    #[test]
    fn source_is_the_underlying_io_error() {
        use std::error::Error as _;

        let err = Error::Listen(io_err());
        let source = err.source().expect("io source");
        assert_eq!(source.to_string(), "address in use");
    }
}
