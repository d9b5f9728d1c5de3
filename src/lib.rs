//! # sprint
//!
//! An embeddable HTTP/1.1 engine: parse, route, respond, close.
//! Nothing more. Nothing less.
//!
//! ## The contract
//!
//! Every connection carries exactly one request. The engine reads once
//! (1024 bytes, longer requests are truncated), parses the raw bytes,
//! walks the route table in registration order, serializes one response,
//! and closes the socket. Clients are expected to be nearby and
//! well-behaved — a test harness, a dashboard on localhost, a device on
//! the same rack.
//!
//! What sprint deliberately skips:
//!
//! - **Keep-alive, HTTP/2, chunked encoding** — one request, one
//!   connection, `Content-Length` framing only
//! - **TLS** — terminate it in front if you need it
//! - **Percent-decoding, multipart, compression** — handlers get the raw
//!   bytes and JSON, nothing else
//!
//! What's left is the part that changes between applications:
//!
//! - Ordered routing — first registration wins, `*` wildcards, middleware
//!   as a `*`/`*` route
//! - Async I/O — one tokio task per connection, raw HTTP/1.1, no hyper
//! - Cancellation — a [`ShutdownHandle`] stops the accept loop from
//!   anywhere
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use serde_json::json;
//! use sprint::{Request, Response, Router, Server, Status};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), sprint::Error> {
//!     let app = Router::new()
//!         .middleware(trace)
//!         .route("GET", "/user", get_user);
//!
//!     Server::bind("0.0.0.0:3000").serve(app).await
//! }
//!
//! fn trace(req: &mut Request, _res: &mut Response) {
//!     println!("{} {}", req.method(), req.path());
//! }
//!
//! fn get_user(req: &mut Request, res: &mut Response) {
//!     match req.query("id") {
//!         Some(id) => res.set_body(json!({ "id": id, "name": "Foo Bar" })),
//!         None => res.set_status(Status::NotFound),
//!     }
//! }
//! ```

mod conn;
mod error;
mod handler;
mod records;
mod request;
mod response;
mod router;
mod server;
mod status;

pub use conn::TaskId;
pub use error::Error;
pub use handler::Handler;
#[doc(hidden)]
pub use handler::{BoxedHandler, ErasedHandler};
pub use records::{Records, RecordsFull};
pub use request::Request;
pub use response::Response;
pub use router::Router;
pub use server::{Server, ShutdownHandle};
pub use status::Status;
