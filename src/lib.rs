//! # halyard
//!
//! The request-dispatch core of a minimal HTTP framework: given a parsed
//! request, decide which handler answers it, run the middleware around it,
//! and make sure a complete response always comes back.
//!
//! ## The contract
//!
//! Every request resolves to exactly one handler, first match wins:
//!
//! 1. a route registered on the [`Router`],
//! 2. a file found by the [`AssetResolver`] (e.g. [`StaticFiles`]),
//! 3. the fallback: `404` for `GET`/`POST`/`PUT`/`PATCH`/`DELETE`,
//!    `200` with `allow: OPTIONS` for `OPTIONS`, `501` for anything else.
//!
//! The handler is wrapped in the [`MiddlewareChain`](middleware::MiddlewareChain),
//! run, and whatever it produces, including errors and panics, becomes a
//! response. In [`Environment::Production`] internal error details never reach
//! the client. Every response carries a `server` header. `HEAD` is served by
//! the `GET` handler with the body removed.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use halyard::middleware::{MiddlewareChain, Trace};
//! use halyard::{Config, Dispatcher, HandlerError, Request, Response, Router, Server, Status};
//!
//! #[tokio::main]
//! async fn main() {
//!     let router = Router::new()
//!         .get("/users/{id}", get_user)
//!         .post("/users",     create_user);
//!
//!     let app = Dispatcher::new(router, Config::from_env().unwrap())
//!         .with_middleware(MiddlewareChain::new().with(Trace));
//!
//!     Server::bind("0.0.0.0:3000").serve(app).await.unwrap();
//! }
//!
//! async fn get_user(req: Request) -> Result<Response, HandlerError> {
//!     let id: u64 = req.param("id").unwrap_or_default().parse()?;
//!     Ok(Response::json(format!(r#"{{"id":{id}}}"#).into_bytes()))
//! }
//!
//! async fn create_user(req: Request) -> Response {
//!     if req.body().is_empty() {
//!         return Response::status(Status::BadRequest);
//!     }
//!     Response::builder()
//!         .status(Status::Created)
//!         .header("location", "/users/99")
//!         .json(br#"{"id":99}"#.to_vec())
//! }
//! ```

mod config;
mod dispatcher;
mod error;
mod fallback;
mod handler;
mod method;
mod request;
mod response;
mod router;
mod server;
mod static_files;
mod status;

pub mod middleware;

pub use config::{Config, ConfigError, Environment};
pub use dispatcher::Dispatcher;
pub use error::{Error, HandlerError};
pub use handler::{BoxFuture, Handler, IntoOutcome, Outcome};
pub use method::{InvalidMethod, Method};
pub use request::{Request, RequestBuilder};
pub use response::{ContentType, IntoResponse, Response, ResponseBuilder};
pub use router::Router;
pub use server::Server;
pub use static_files::{AssetResolver, ResolveFuture, StaticFiles};
pub use status::Status;

#[doc(hidden)]
pub use handler::{BoxedHandler, ErasedHandler};
