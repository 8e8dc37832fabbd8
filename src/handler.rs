//! Handler trait and type erasure.
//!
//! # How async handlers are stored
//!
//! The router, the static-file resolver, the fallback and every middleware
//! layer all hand the dispatcher something that turns a [`Request`] into a
//! response. Those are different concrete types, so they are hidden behind a
//! common trait object (`dyn ErasedHandler`) and passed around uniformly.
//!
//! The chain from user code to vtable call is:
//!
//! ```text
//! async fn hello(req: Request) -> Response { … }   ← user writes this
//!        ↓ router.get("/", hello)
//! hello.into_boxed_handler()                       ← Handler blanket impl
//!        ↓
//! Arc::new(FnHandler(hello))                       ← heap-allocated wrapper
//!        ↓  stored as BoxedHandler = Arc<dyn ErasedHandler>
//! handler.call(req)  at request time               ← one vtable dispatch
//!        ↓
//! Box::pin(async { hello(req).await.into_outcome() })  ← BoxFuture
//! ```
//!
//! A handler may fail: anything returning `Result<impl IntoResponse, E>` with
//! `E: Into<HandlerError>` works, and the dispatcher turns the error into a
//! response.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::HandlerError;
use crate::request::Request;
use crate::response::{IntoResponse, Response};
use crate::status::Status;

// ── Internal types ────────────────────────────────────────────────────────────

/// What every handler eventually produces.
pub type Outcome = Result<Response, HandlerError>;

/// A heap-allocated, type-erased future that resolves to an [`Outcome`].
///
/// `Pin<Box<…>>` is required because the async runtime must be able to poll
/// the future in-place. `Send + 'static` let tokio move the future across
/// threads safely. Custom [`Middleware`](crate::middleware::Middleware)
/// implementations return one of these.
pub type BoxFuture = Pin<Box<dyn Future<Output = Outcome> + Send + 'static>>;

/// Internal dispatch interface.
///
/// `#[doc(hidden)] pub` rather than `pub(crate)` because it appears in the
/// return type of the public `Handler` trait's `into_boxed_handler` method
/// and in [`AssetResolver`](crate::AssetResolver).
#[doc(hidden)]
pub trait ErasedHandler {
    fn call(&self, req: Request) -> BoxFuture;
}

/// A heap-allocated, type-erased handler shared across concurrent requests.
#[doc(hidden)]
pub type BoxedHandler = Arc<dyn ErasedHandler + Send + Sync + 'static>;

// ── IntoOutcome ───────────────────────────────────────────────────────────────

/// Conversion of a handler's return value into an [`Outcome`].
///
/// Implemented for everything that is [`IntoResponse`] in this crate and for
/// `Result<T, E>` where `T: IntoResponse` and `E: Into<HandlerError>`.
pub trait IntoOutcome {
    fn into_outcome(self) -> Outcome;
}

impl IntoOutcome for Response {
    fn into_outcome(self) -> Outcome { Ok(self) }
}

impl IntoOutcome for &'static str {
    fn into_outcome(self) -> Outcome { Ok(self.into_response()) }
}

impl IntoOutcome for String {
    fn into_outcome(self) -> Outcome { Ok(self.into_response()) }
}

impl IntoOutcome for Status {
    fn into_outcome(self) -> Outcome { Ok(self.into_response()) }
}

impl<T, E> IntoOutcome for Result<T, E>
where
    T: IntoResponse,
    E: Into<HandlerError>,
{
    fn into_outcome(self) -> Outcome {
        self.map(IntoResponse::into_response).map_err(Into::into)
    }
}

// ── Public Handler trait ──────────────────────────────────────────────────────

/// Implemented for every valid route handler.
///
/// You never implement this yourself. It is automatically satisfied for any
/// `async fn` with the signature:
///
/// ```text
/// async fn name(req: Request) -> impl IntoOutcome
/// ```
///
/// The trait is **sealed** (via the private `Sealed` supertrait): only the
/// blanket impl below can satisfy it.
pub trait Handler: private::Sealed + Send + Sync + 'static {
    #[doc(hidden)]
    fn into_boxed_handler(self) -> BoxedHandler;
}

mod private {
    pub trait Sealed {}
}

// ── Blanket implementations ───────────────────────────────────────────────────

impl<F, Fut, R> private::Sealed for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoOutcome + Send + 'static,
{
}

impl<F, Fut, R> Handler for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoOutcome + Send + 'static,
{
    fn into_boxed_handler(self) -> BoxedHandler {
        Arc::new(FnHandler(self))
    }
}

// ── Concrete wrapper ──────────────────────────────────────────────────────────

/// Newtype wrapper that holds a concrete handler `F` and implements
/// [`ErasedHandler`], bridging the typed world to the trait-object world.
struct FnHandler<F>(F);

impl<F, Fut, R> ErasedHandler for FnHandler<F>
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoOutcome + Send + 'static,
{
    fn call(&self, req: Request) -> BoxFuture {
        let fut = (self.0)(req);
        Box::pin(async move { fut.await.into_outcome() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::method::Method;

    async fn ok(_req: Request) -> &'static str {
        "ok"
    }

    async fn fails(_req: Request) -> Result<Response, HandlerError> {
        Err(HandlerError::msg("nope"))
    }

    async fn parse(req: Request) -> Result<String, std::num::ParseIntError> {
        let n: u32 = req.path().trim_start_matches('/').parse()?;
        Ok(format!("{}", n * 2))
    }

    fn req(path: &str) -> Request {
        Request::builder(Method::Get, path).build()
    }

    #[tokio::test]
    async fn plain_values_succeed() {
        let res = ok.into_boxed_handler().call(req("/")).await.unwrap();
        assert_eq!(res.body(), b"ok");
    }

    #[tokio::test]
    async fn errors_surface_as_handler_errors() {
        let err = fails.into_boxed_handler().call(req("/")).await.unwrap_err();
        assert_eq!(err.to_string(), "nope");
    }

    #[tokio::test]
    async fn foreign_errors_convert() {
        let h = parse.into_boxed_handler();
        assert_eq!(h.call(req("/21")).await.unwrap().body(), b"42");
        assert!(h.call(req("/x")).await.is_err());
    }
}
