//! Minimal sprint example — a user lookup with middleware, a redirect, and
//! an access log.
//!
//! Run with:
//!   RUST_LOG=info cargo run --example basic -- 3000
//!
//! Try:
//!   curl -i 'http://localhost:3000/user?id=123'
//!   curl -i 'http://localhost:3000/user'
//!   curl -i 'http://localhost:3000/redirect'

use serde_json::json;
use sprint::{Error, Request, Response, Router, Server, ShutdownHandle, Status};

// Application-level error code for a missing user. A convention of this
// app, not of the engine.
const ERR_USER_NOT_FOUND: i32 = -10;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let port = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse::<u16>().ok())
        .unwrap_or(3000);

    let app = Router::new()
        .middleware(tag_request)
        .route("GET", "/user", get_user)
        .route("GET", "/redirect", redirect_to_user)
        .response_hook(access_log);

    let server = Server::bind(&format!("0.0.0.0:{port}"))
        .on_ready(|addr| println!("Server started on {}", addr.port()));

    let shutdown = server.shutdown_handle();
    tokio::spawn(shutdown_on_signal(shutdown));

    if let Err(err) = server.serve(app).await {
        eprintln!("{}", Error::describe(err.code()));
        std::process::exit(err.code());
    }
    println!("Server is shutting down...");
}

// Runs for every request, before any route: tags the request so handlers
// (and logs) can correlate it.
fn tag_request(req: &mut Request, _res: &mut Response) {
    let id = req.task_id().to_string();
    let _ = req.add_header("X-Request-Id", id);
}

// GET /user?id=123 → {"id":"123","name":"Foo Bar"}
// GET /user        → 404 {"error":"User not found","error_code":-10}
fn get_user(req: &mut Request, res: &mut Response) {
    match req.query("id") {
        Some(id) => res.set_body(json!({ "id": id, "name": "Foo Bar" })),
        None => {
            res.set_status(Status::NotFound);
            res.set_body(json!({ "error": "User not found", "error_code": ERR_USER_NOT_FOUND }));
        }
    }
}

// GET /redirect → 302 /user?id=123
fn redirect_to_user(_req: &mut Request, res: &mut Response) {
    res.set_redirect("/user?id=123");
}

// One line per completed request, hook-style: method, path, status, time.
fn access_log(req: &Request, res: &Response) {
    let status = res.status().map(Status::code).unwrap_or(0);
    let micros = res
        .completed_at()
        .map(|done| done.duration_since(req.received_at()).as_micros())
        .unwrap_or(0);
    println!("{} {} {} {}µs", req.method(), req.path(), status, micros);
}

/// Resolves on the first shutdown signal the process receives, then fires
/// the handle. On Unix this listens for both SIGTERM and SIGINT; on
/// Windows only Ctrl-C is available.
async fn shutdown_on_signal(handle: ShutdownHandle) {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let sigterm = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c  => {}
        () = sigterm => {}
    }

    handle.shutdown();
}
