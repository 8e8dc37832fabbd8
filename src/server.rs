//! HTTP transport: the part the dispatcher treats as a black box.
//!
//! One tokio task per connection, hyper's `auto` builder for HTTP/1.1 and
//! HTTP/2, one [`Dispatcher::respond`] call per request. Concurrency lives
//! here; the dispatcher itself is shared read-only.
//!
//! # Shutdown
//!
//! On SIGTERM or Ctrl-C the accept loop stops, in-flight connections are
//! allowed to finish, and [`Server::serve`] returns.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as ConnBuilder;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::dispatcher::Dispatcher;
use crate::error::Error;
use crate::method::Method;
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;

/// The HTTP transport: accepts connections and feeds a [`Dispatcher`].
pub struct Server {
    addr: SocketAddr,
}

impl Server {
    /// Configures the server to bind to `addr` when [`serve`](Server::serve)
    /// is called.
    ///
    /// # Panics
    ///
    /// Panics if `addr` is not a valid `host:port` string.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use halyard::Server;
    /// let server = Server::bind("0.0.0.0:3000");
    /// ```
    pub fn bind(addr: &str) -> Self {
        let addr: SocketAddr = addr.parse().expect("invalid socket address");
        Self { addr }
    }

    /// Starts accepting connections and handing every request to
    /// `dispatcher`.
    ///
    /// Returns only after a full graceful shutdown (SIGTERM or Ctrl-C,
    /// followed by all in-flight requests completing).
    pub async fn serve(self, dispatcher: Dispatcher) -> Result<(), Error> {
        let listener = TcpListener::bind(self.addr).await?;

        // Shared read-only by every connection task.
        let dispatcher = Arc::new(dispatcher);

        info!(
            addr = %self.addr,
            environment = %dispatcher.config().environment(),
            "halyard listening"
        );

        let mut tasks = tokio::task::JoinSet::new();

        let shutdown = shutdown_signal();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                // Shutdown first, even with connections queued.
                biased;

                () = &mut shutdown => {
                    info!(in_flight = tasks.len(), "shutdown signal received, draining connections");
                    break;
                }

                res = listener.accept() => {
                    let (stream, remote_addr) = match res {
                        Ok(v) => v,
                        Err(e) => {
                            error!("accept error: {e}");
                            continue;
                        }
                    };

                    let dispatcher = Arc::clone(&dispatcher);
                    let io = TokioIo::new(stream);

                    tasks.spawn(async move {
                        // Called once per request on this connection.
                        let svc = service_fn(move |req| {
                            handle(Arc::clone(&dispatcher), req)
                        });

                        if let Err(e) = ConnBuilder::new(TokioExecutor::new())
                            .serve_connection(io, svc)
                            .await
                        {
                            error!(peer = %remote_addr, "connection error: {e}");
                        }
                    });
                }

                // Reap finished connections.
                Some(_) = tasks.join_next(), if !tasks.is_empty() => {}
            }
        }

        while tasks.join_next().await.is_some() {}

        info!("halyard stopped");
        Ok(())
    }
}

// ── Request conversion ────────────────────────────────────────────────────────

/// Hot path: converts one hyper request, dispatches it, converts the response.
///
/// The error type is [`Infallible`]: the dispatcher
/// answers every request, so hyper never sees an error.
async fn handle(
    dispatcher: Arc<Dispatcher>,
    req: hyper::Request<Incoming>,
) -> Result<http::Response<Full<Bytes>>, Infallible> {
    let request = match into_request(req).await {
        Ok(request) => request,
        Err(e) => {
            warn!("failed to read request body: {e}");
            let mut res = Response::status(Status::BadRequest);
            res.set_header("server", dispatcher.config().server_header());
            return Ok(res.into_inner());
        }
    };

    Ok(dispatcher.respond(request).await.into_inner())
}

async fn into_request(req: hyper::Request<Incoming>) -> Result<Request, hyper::Error> {
    let (parts, body) = req.into_parts();
    let body = body.collect().await?.to_bytes();

    let mut builder = Request::builder(Method::from(&parts.method), parts.uri.path());
    if let Some(query) = parts.uri.query() {
        builder = builder.query(query);
    }
    for (name, value) in &parts.headers {
        // Non-UTF-8 header values are not representable in `Request`.
        if let Ok(value) = value.to_str() {
            builder = builder.header(name.as_str(), value);
        }
    }
    Ok(builder.body(body).build())
}

// ── Shutdown signal ───────────────────────────────────────────────────────────

/// Resolves on SIGTERM or Ctrl-C (Ctrl-C only off Unix).
async fn shutdown_signal() {
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
        () = ctrl_c   => {}
        () = sigterm  => {}
    }
}
