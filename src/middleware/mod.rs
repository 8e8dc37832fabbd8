//! Middleware layer.
//!
//! Middleware intercepts requests and responses and is the right place for
//! cross-cutting concerns: structured tracing, request-id injection,
//! authentication-header inspection.
//!
//! # Ordering
//!
//! A [`MiddlewareChain`] is assembled once at startup. The first layer
//! registered is the outermost one: it sees the request first and the
//! outcome last. Each layer decides whether to call [`Next::run`],
//! short-circuit with its own response, or fail.
//!
//! ```rust
//! use halyard::middleware::{self, MiddlewareChain, Next, Trace};
//! use halyard::{Request, Response, Status};
//!
//! let chain = MiddlewareChain::new()
//!     .with(Trace)
//!     .with(middleware::from_fn(|req: Request, next: Next| async move {
//!         if req.header("authorization").is_none() {
//!             return Ok(Response::status(Status::Unauthorized));
//!         }
//!         next.run(req).await
//!     }));
//! ```
//!
//! Built-in middleware:
//! - [`Trace`] — per-request span with method, path, status, latency

mod trace;

pub use trace::Trace;

use std::future::Future;
use std::sync::Arc;

use crate::handler::{BoxFuture, BoxedHandler, ErasedHandler, IntoOutcome, Outcome};
use crate::request::Request;

/// A cross-cutting layer wrapped around every handler.
///
/// Implement it on your own types for stateful middleware; use [`from_fn`]
/// for a plain closure.
pub trait Middleware: Send + Sync + 'static {
    fn call(&self, req: Request, next: Next) -> BoxFuture;
}

type BoxedMiddleware = Arc<dyn Middleware>;

/// The rest of the chain, as seen from inside one layer.
pub struct Next {
    layers: Arc<[BoxedMiddleware]>,
    index: usize,
    terminal: BoxedHandler,
}

impl Next {
    /// Pass `req` to the next layer, or to the handler after the last one.
    pub async fn run(self, req: Request) -> Outcome {
        match self.layers.get(self.index).cloned() {
            Some(layer) => {
                let next = Next { index: self.index + 1, ..self };
                layer.call(req, next).await
            }
            None => self.terminal.call(req).await,
        }
    }
}

/// The ordered, process-wide middleware list.
#[derive(Clone)]
pub struct MiddlewareChain {
    layers: Arc<[BoxedMiddleware]>,
}

impl MiddlewareChain {
    pub fn new() -> Self {
        Self { layers: Vec::new().into() }
    }

    /// Append a layer. It runs after every layer added before it.
    pub fn with(self, middleware: impl Middleware) -> Self {
        let mut layers = self.layers.to_vec();
        layers.push(Arc::new(middleware));
        Self { layers: layers.into() }
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Wrap `handler` so that calling the result runs every layer, in order,
    /// before it.
    #[doc(hidden)]
    pub fn chain(&self, handler: BoxedHandler) -> BoxedHandler {
        if self.layers.is_empty() {
            return handler;
        }
        Arc::new(Chained {
            layers: Arc::clone(&self.layers),
            terminal: handler,
        })
    }
}

impl Default for MiddlewareChain {
    fn default() -> Self {
        Self::new()
    }
}

struct Chained {
    layers: Arc<[BoxedMiddleware]>,
    terminal: BoxedHandler,
}

impl ErasedHandler for Chained {
    fn call(&self, req: Request) -> BoxFuture {
        let next = Next {
            layers: Arc::clone(&self.layers),
            index: 0,
            terminal: Arc::clone(&self.terminal),
        };
        Box::pin(next.run(req))
    }
}

// ── from_fn ───────────────────────────────────────────────────────────────────

/// Turn an `async` closure taking `(Request, Next)` into a [`Middleware`].
pub fn from_fn<F, Fut, R>(f: F) -> FromFn<F>
where
    F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoOutcome + Send + 'static,
{
    FromFn(f)
}

/// Middleware built by [`from_fn`].
pub struct FromFn<F>(F);

impl<F, Fut, R> Middleware for FromFn<F>
where
    F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoOutcome + Send + 'static,
{
    fn call(&self, req: Request, next: Next) -> BoxFuture {
        let fut = (self.0)(req, next);
        Box::pin(async move { fut.await.into_outcome() })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::error::HandlerError;
    use crate::handler::Handler;
    use crate::method::Method;
    use crate::response::Response;
    use crate::status::Status;

    struct Record {
        name: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl Middleware for Record {
        fn call(&self, req: Request, next: Next) -> BoxFuture {
            let name = self.name;
            let log = Arc::clone(&self.log);
            Box::pin(async move {
                log.lock().unwrap().push(format!("{name} in"));
                let out = next.run(req).await;
                log.lock().unwrap().push(format!("{name} out"));
                out
            })
        }
    }

    async fn hello(_req: Request) -> Response {
        Response::text("hello")
    }

    fn req() -> Request {
        Request::builder(Method::Get, "/").build()
    }

    #[tokio::test]
    async fn runs_in_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let chain = MiddlewareChain::new()
            .with(Record { name: "a", log: Arc::clone(&log) })
            .with(Record { name: "b", log: Arc::clone(&log) });

        let res = chain.chain(hello.into_boxed_handler()).call(req()).await.unwrap();

        assert_eq!(res.body(), b"hello");
        assert_eq!(*log.lock().unwrap(), ["a in", "b in", "b out", "a out"]);
    }

    #[tokio::test]
    async fn a_layer_can_short_circuit() {
        let chain = MiddlewareChain::new()
            .with(from_fn(|_req: Request, _next: Next| async { Status::Forbidden }));

        let res = chain.chain(hello.into_boxed_handler()).call(req()).await.unwrap();
        assert_eq!(res.status_code(), 403);
    }

    #[tokio::test]
    async fn a_layer_can_fail() {
        let chain = MiddlewareChain::new().with(from_fn(|_req: Request, _next: Next| async {
            Err::<Response, _>(HandlerError::msg("denied"))
        }));

        let err = chain.chain(hello.into_boxed_handler()).call(req()).await.unwrap_err();
        assert_eq!(err.to_string(), "denied");
    }

    #[tokio::test]
    async fn a_layer_can_rewrite_the_response() {
        let chain = MiddlewareChain::new().with(from_fn(|req: Request, next: Next| async move {
            let mut res = next.run(req).await?;
            res.set_header("x-layer", "1");
            Ok::<_, HandlerError>(res)
        }));

        let res = chain.chain(hello.into_boxed_handler()).call(req()).await.unwrap();
        assert_eq!(res.header("x-layer"), Some("1"));
    }

    #[test]
    fn empty_chain_returns_the_handler_itself() {
        let handler = hello.into_boxed_handler();
        let chained = MiddlewareChain::new().chain(Arc::clone(&handler));
        assert!(Arc::ptr_eq(&handler, &chained));
    }
}
