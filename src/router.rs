//! Ordered-table router and the dispatch rules.
//!
//! Routing here is deliberately not a tree: the table is scanned in
//! registration order, every matching handler runs, and the first one to
//! set a body or a redirect ends the scan. A wildcard (`*`) in the method
//! or path position matches anything, which is what makes a `*`/`*` route
//! a middleware: it runs for every request and, as long as it only
//! annotates, never terminates dispatch. Registration order is the whole
//! contract — middleware registered after a route runs after it, or not at
//! all if the route short-circuited.

use tracing::trace;

use crate::handler::{BoxedHandler, Handler};
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;

// ── Patterns and routes ───────────────────────────────────────────────────────

/// A method or path pattern: an exact literal, or `*` matching anything.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Pattern {
    Any,
    Exact(String),
}

impl Pattern {
    fn new(pattern: &str) -> Self {
        if pattern == "*" { Pattern::Any } else { Pattern::Exact(pattern.to_owned()) }
    }

    fn matches(&self, value: &str) -> bool {
        match self {
            Pattern::Any => true,
            Pattern::Exact(literal) => literal == value,
        }
    }
}

struct Route {
    method: Pattern,
    path: Pattern,
    handler: BoxedHandler,
}

impl Route {
    fn matches(&self, request: &Request) -> bool {
        self.method.matches(request.method()) && self.path.matches(request.path())
    }
}

/// The one-per-router completion observer. See [`Router::response_hook`].
type BoxedHook = Box<dyn Fn(&Request, &Response) + Send + Sync + 'static>;

// ── Router ────────────────────────────────────────────────────────────────────

/// The application route table.
///
/// Build it once at startup and pass it to [`Server::serve`](crate::Server::serve).
/// Each registration returns `self` so calls chain naturally:
///
/// ```rust,no_run
/// # use sprint::{Request, Response, Router};
/// # fn trace(_: &mut Request, _: &mut Response) {}
/// # fn get_user(_: &mut Request, _: &mut Response) {}
/// # fn create_user(_: &mut Request, _: &mut Response) {}
/// Router::new()
///     .middleware(trace)
///     .route("GET",  "/users", get_user)
///     .route("POST", "/users", create_user);
/// ```
pub struct Router {
    routes: Vec<Route>,
    hook: Option<BoxedHook>,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: Vec::new(), hook: None }
    }

    /// Registers a handler for a method + path pair. Returns `self` for
    /// chaining.
    ///
    /// `"*"` in either position matches any value; both patterns are
    /// otherwise compared literally, query string excluded. Duplicate
    /// registrations are legal — the earlier one wins whenever it
    /// terminates dispatch.
    pub fn route(mut self, method: &str, path: &str, handler: impl Handler) -> Self {
        self.routes.push(Route {
            method: Pattern::new(method),
            path: Pattern::new(path),
            handler: handler.into_boxed_handler(),
        });
        self
    }

    /// Registers a middleware: shorthand for a `"*"`/`"*"` route.
    pub fn middleware(self, handler: impl Handler) -> Self {
        self.route("*", "*", handler)
    }

    /// Registers the response hook, invoked once per request with the final
    /// request/response pair — after dispatch and the diagnostic headers,
    /// before serialization. Replaces any hook registered earlier.
    pub fn response_hook(
        mut self,
        hook: impl Fn(&Request, &Response) + Send + Sync + 'static,
    ) -> Self {
        self.hook = Some(Box::new(hook));
        self
    }

    /// Runs the request through the table: ordered scan, short-circuit on
    /// redirect or body, then status defaulting.
    pub(crate) fn dispatch(&self, request: &mut Request, response: &mut Response) {
        // A request "matched" only when some non-wildcard path matched it;
        // middleware alone still leaves it a 404.
        let mut matched = false;

        for route in &self.routes {
            if !route.matches(request) {
                continue;
            }
            if route.path != Pattern::Any {
                matched = true;
            }

            route.handler.call(request, response);

            // Redirect beats body: a handler that set both gets a Location
            // header and keeps the body, but no Content-Type.
            if let Some(target) = response.redirect() {
                let target = target.to_owned();
                response.inject_header("Location", target);
                break;
            }
            if response.body().is_some() {
                response.inject_header("Content-Type", "application/json");
                break;
            }
        }

        if response.status().is_none() {
            let status = if response.redirect().is_some() {
                Status::Found
            } else if matched {
                Status::Ok
            } else {
                Status::NotFound
            };
            response.set_status(status);
        }

        trace!(
            method = request.method(),
            path = request.path(),
            status = response.status().map(Status::code),
            "dispatched"
        );
    }

    /// Invokes the response hook, when one is registered.
    pub(crate) fn notify(&self, request: &Request, response: &Response) {
        if let Some(hook) = &self.hook {
            hook(request, response);
        }
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ──────────────────────────────────────────────────────────
