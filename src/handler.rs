//! Handler trait and type erasure.
//!
//! # How handlers are stored
//!
//! The route table holds handlers of *different* concrete types in a single
//! `Vec`. Rust collections can only hold one concrete type, so we use
//! **trait objects** (`dyn ErasedHandler`) to hide the concrete handler type
//! behind a common interface and store everything uniformly.
//!
//! The chain from user code to vtable call is:
//!
//! ```text
//! fn get_user(req: &mut Request, res: &mut Response) { … }   ← user writes this
//!        ↓ router.route("GET", "/user", get_user)
//! get_user.into_boxed_handler()                              ← Handler blanket impl
//!        ↓  stored as BoxedHandler = Box<dyn ErasedHandler>
//! handler.call(req, res)  at dispatch time                   ← one virtual call
//! ```
//!
//! Handlers are synchronous: they read the request, mutate the response, and
//! return. Ordering and short-circuiting are the router's business, not the
//! handler's.

use crate::request::Request;
use crate::response::Response;

// ── Internal types ────────────────────────────────────────────────────────────

/// Internal dispatch interface.
///
/// `#[doc(hidden)] pub` rather than `pub(crate)` because it appears in the
/// return type of the public `Handler` trait's `into_boxed_handler` method.
/// External crates cannot usefully interact with this trait.
#[doc(hidden)]
pub trait ErasedHandler: Send + Sync {
    fn call(&self, req: &mut Request, res: &mut Response);
}

/// A heap-allocated, type-erased handler as stored in the route table.
///
/// `#[doc(hidden)] pub` for the same reason as `ErasedHandler`.
#[doc(hidden)]
pub type BoxedHandler = Box<dyn ErasedHandler>;

// ── Public Handler trait ──────────────────────────────────────────────────────

/// Implemented for every valid route handler.
///
/// You never implement this yourself. It is automatically satisfied for any
/// function or closure with the signature:
///
/// ```text
/// fn name(req: &mut Request, res: &mut Response)
/// ```
///
/// The trait is **sealed** (via the private `Sealed` supertrait): only the
/// blanket impl below can satisfy it. This prevents accidental misuse and
/// keeps the API surface stable across versions.
pub trait Handler: private::Sealed + Send + Sync + 'static {
    #[doc(hidden)]
    fn into_boxed_handler(self) -> BoxedHandler;
}

/// The sealing module. Because `Sealed` is private, external crates cannot
/// name it and therefore cannot implement `Handler` on their own types.
mod private {
    pub trait Sealed {}
}

// ── Blanket implementations ───────────────────────────────────────────────────

/// Implement the sealing trait for any function with the right signature.
///
/// `Fn(&mut Request, &mut Response)` covers:
///   - named `fn` items
///   - closures, including capturing ones
///   - any struct that implements `Fn`
impl<F> private::Sealed for F where F: Fn(&mut Request, &mut Response) + Send + Sync + 'static {}

/// Implement `Handler` for any function with the right signature.
impl<F> Handler for F
where
    F: Fn(&mut Request, &mut Response) + Send + Sync + 'static,
{
    fn into_boxed_handler(self) -> BoxedHandler {
        Box::new(FnHandler(self))
    }
}

// ── Concrete wrapper ──────────────────────────────────────────────────────────

/// Newtype wrapper that holds a concrete handler `F` and implements
/// [`ErasedHandler`], bridging the typed world to the trait-object world.
struct FnHandler<F>(F);

impl<F> ErasedHandler for FnHandler<F>
where
    F: Fn(&mut Request, &mut Response) + Send + Sync,
{
    fn call(&self, req: &mut Request, res: &mut Response) {
        (self.0)(req, res)
    }
}
