//! Request dispatch: from one [`Request`] to exactly one [`Response`].
//!
//! # Pipeline
//!
//! ```text
//! request ──► log "METHOD path"
//!         ──► HEAD? look up as GET, remember it was HEAD
//!         ──► router ──► static assets ──► fallback        (first match wins)
//!         ──► wrap in the middleware chain
//!         ──► run inside the failure boundary               (errors, panics → response)
//!         ──► stamp `server` header
//!         ──► HEAD? drop the body, keep every header
//! ```
//!
//! [`Dispatcher::respond`] cannot fail. Whatever goes wrong in a handler or a
//! middleware layer, the caller gets a complete, status-coded response.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::HandlerError;
use crate::fallback::Fallback;
use crate::handler::BoxedHandler;
use crate::method::Method;
use crate::middleware::MiddlewareChain;
use crate::request::Request;
use crate::response::Response;
use crate::router::Router;
use crate::static_files::AssetResolver;
use crate::status::Status;

/// Body of a 500 response in production.
const REDACTED: &str = "Something went wrong";

/// The request-dispatch core.
///
/// Build it once at startup and share it (`Arc<Dispatcher>`) across every
/// connection. It holds no per-request state; the router, resolver, middleware
/// and configuration are only ever read.
///
/// ```rust
/// use halyard::{Config, Dispatcher, Environment, Method, Request, Response, Router};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// async fn page(_req: Request) -> Response { Response::text("hello") }
///
/// let app = Dispatcher::new(Router::new().get("/page", page), Config::new(Environment::Production));
///
/// let res = app.respond(Request::builder(Method::Head, "/page").build()).await;
/// assert_eq!(res.status_code(), 200);
/// assert!(res.body().is_empty());
/// # }
/// ```
pub struct Dispatcher {
    router: Router,
    assets: Option<Box<dyn AssetResolver>>,
    middleware: MiddlewareChain,
    config: Config,
}

/// Which handler a request resolved to, before middleware wrapping.
enum Selected {
    Route(BoxedHandler),
    Asset(BoxedHandler),
    Fallback,
}

impl Selected {
    fn name(&self) -> &'static str {
        match self {
            Self::Route(_)  => "route",
            Self::Asset(_)  => "asset",
            Self::Fallback  => "fallback",
        }
    }

    fn into_handler(self) -> BoxedHandler {
        match self {
            Self::Route(h) | Self::Asset(h) => h,
            Self::Fallback => Arc::new(Fallback),
        }
    }
}

impl Dispatcher {
    pub fn new(router: Router, config: Config) -> Self {
        Self {
            router,
            assets: None,
            middleware: MiddlewareChain::new(),
            config,
        }
    }

    /// Consult `resolver` when no route matches.
    pub fn with_assets(mut self, resolver: impl AssetResolver) -> Self {
        self.assets = Some(Box::new(resolver));
        self
    }

    /// Wrap every handler, including the fallback, in `chain`.
    pub fn with_middleware(mut self, chain: MiddlewareChain) -> Self {
        self.middleware = chain;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Produce the response for `request`. Never fails.
    pub async fn respond(&self, request: Request) -> Response {
        let original = request.method().clone();
        info!(method = %original, path = %request.path(), "dispatch");

        // RFC 9110 §9.3.2: HEAD is GET without the content.
        let effective = if original == Method::Head { Method::Get } else { original.clone() };
        let request = request.with_method(effective);

        let (selected, request) = self.select(request).await;
        debug!(handler = selected.name(), "resolved");
        let responder = self.middleware.chain(selected.into_handler());

        // `call` may panic before it returns a future; it stays inside the guard.
        let outcome = AssertUnwindSafe(async move { responder.call(request).await })
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| Err(HandlerError::from_panic(panic)));

        let mut response = match outcome {
            Ok(response) => {
                if response.header("content-type").is_none() {
                    warn!(status = response.status_code(), "response has no content-type header");
                }
                response
            }
            Err(err) => self.error_response(&err),
        };

        response.set_header("server", self.config.server_header());

        // The content-length a handler may have set is left as is.
        if original == Method::Head {
            response.clear_body();
        }

        response
    }

    /// First match wins: router, then static assets, then the fallback.
    async fn select(&self, request: Request) -> (Selected, Request) {
        if let Some((handler, params)) = self.router.route(request.method(), request.path()) {
            return (Selected::Route(handler), request.with_params(params));
        }
        let asset = match &self.assets {
            Some(resolver) => resolver.resolve(&request).await,
            None => None,
        };
        match asset {
            Some(handler) => (Selected::Asset(handler), request),
            None => (Selected::Fallback, request),
        }
    }

    /// Turn a failure into its response.
    ///
    /// Not-found becomes `404 Not Found`. Anything else, panics included,
    /// becomes `500`: in production the body is `Something went wrong`,
    /// elsewhere it is the error's description prefixed with `Server Error: `.
    fn error_response(&self, err: &HandlerError) -> Response {
        if err.is_not_found() {
            return Response::builder()
                .status(Status::NotFound)
                .text(Status::NotFound.reason());
        }
        let body = if self.config.environment().is_production() {
            REDACTED.to_owned()
        } else {
            format!("Server Error: {err}")
        };
        Response::builder()
            .status(Status::InternalServerError)
            .text(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Environment;

    fn dispatcher(env: Environment) -> Dispatcher {
        Dispatcher::new(Router::new(), Config::new(env))
    }

    #[test]
    fn not_found_is_404_everywhere() {
        for env in [Environment::Production, Environment::Development] {
            let res = dispatcher(env).error_response(&HandlerError::not_found());
            assert_eq!(res.status_code(), 404);
            assert_eq!(res.body(), b"Not Found");
        }
    }

    #[test]
    fn internal_errors_are_redacted_in_production() {
        let res = dispatcher(Environment::Production).error_response(&HandlerError::msg("db down"));
        assert_eq!(res.status_code(), 500);
        assert_eq!(res.body(), REDACTED.as_bytes());
    }

    #[test]
    fn internal_errors_are_described_elsewhere() {
        let res = dispatcher(Environment::Testing).error_response(&HandlerError::msg("db down"));
        assert_eq!(res.status_code(), 500);
        assert_eq!(res.body(), b"Server Error: db down");
    }

    #[test]
    fn panics_are_500_and_redacted_in_production() {
        let panic = HandlerError::from_panic(Box::new("secret state"));
        let res = dispatcher(Environment::Production).error_response(&panic);
        assert_eq!(res.status_code(), 500);
        assert_eq!(res.body(), REDACTED.as_bytes());
    }

    #[tokio::test]
    async fn selection_falls_back_when_nothing_matches() {
        let d = dispatcher(Environment::Development);
        let (selected, _) = d.select(Request::builder(Method::Get, "/missing").build()).await;
        assert_eq!(selected.name(), "fallback");
    }
}
