//! Error types.
//!
//! Two kinds of failure exist and they never mix:
//!
//! - [`Error`] is infrastructure: binding to a port or accepting a connection.
//!   It is what [`Server::serve`](crate::Server::serve) returns.
//! - [`HandlerError`] is what a route, static-file, fallback or middleware
//!   handler fails with. It never leaves the dispatcher: every one is turned
//!   into a complete HTTP response at the dispatch boundary.

use std::any::Any;
use std::fmt;

use crate::status::Status;

/// The error type returned by halyard's fallible infrastructure operations.
///
/// Application-level errors (404, 422, etc.) are expressed as HTTP
/// [`Response`](crate::Response) values or [`HandlerError`]s, not as `Error`s.
#[derive(Debug)]
pub struct Error(std::io::Error);

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "io: {}", self.0)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self(e)
    }
}

// ── HandlerError ──────────────────────────────────────────────────────────────

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A failure raised while producing a response.
///
/// Return it from a handler as the `Err` side of a `Result`; the `?` operator
/// converts any `std::error::Error + Send + Sync` into one.
///
/// At the dispatch boundary a not-found error becomes `404 Not Found`; every
/// other failure becomes `500 Internal Server Error`. A handler that wants to
/// answer 401, 403 or 422 returns that [`Response`](crate::Response) instead.
///
/// ```rust
/// use halyard::{HandlerError, Request, Response};
///
/// async fn get_user(req: Request) -> Result<Response, HandlerError> {
///     let id: u64 = req.param("id")
///         .ok_or_else(HandlerError::not_found)?
///         .parse()?; // ParseIntError → internal error → 500
///     if id != 42 {
///         return Err(HandlerError::not_found());
///     }
///     Ok(Response::text("alice"))
/// }
/// ```
///
/// `HandlerError` deliberately does not implement `std::error::Error`; that
/// is what makes the blanket `From<E: Error>` impl coherent.
pub struct HandlerError {
    kind: Kind,
}

enum Kind {
    /// Nothing answers this request.
    NotFound,
    /// Anything else. The description is only shown outside production.
    Internal(BoxError),
    /// The handler future panicked.
    Panic(String),
}

impl HandlerError {
    /// Nothing answers this request: `404 Not Found`.
    pub fn not_found() -> Self {
        Self { kind: Kind::NotFound }
    }

    /// An internal failure described by `message`.
    pub fn msg(message: impl fmt::Display) -> Self {
        Self { kind: Kind::Internal(message.to_string().into()) }
    }

    pub(crate) fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&'static str>() {
            (*s).to_owned()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "panic with a non-string payload".to_owned()
        };
        Self { kind: Kind::Panic(message) }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self.kind, Kind::NotFound)
    }

    /// The status the dispatcher answers this error with.
    pub fn status(&self) -> Status {
        match self.kind {
            Kind::NotFound => Status::NotFound,
            Kind::Internal(_) | Kind::Panic(_) => Status::InternalServerError,
        }
    }
}

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            Kind::NotFound => f.write_str(Status::NotFound.reason()),
            Kind::Internal(e) => fmt::Display::fmt(e, f),
            Kind::Panic(m) => write!(f, "handler panicked: {m}"),
        }
    }
}

impl fmt::Debug for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            Kind::NotFound => f.write_str("NotFound"),
            Kind::Internal(e) => f.debug_tuple("Internal").field(e).finish(),
            Kind::Panic(m) => f.debug_tuple("Panic").field(m).finish(),
        }
    }
}

impl<E> From<E> for HandlerError
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn from(e: E) -> Self {
        Self { kind: Kind::Internal(Box::new(e)) }
    }
}
