//! Per-request tracing span.

use std::time::Instant;

use tracing::{info, info_span, Instrument};

use super::{Middleware, Next};
use crate::handler::BoxFuture;
use crate::request::Request;

/// Wraps the rest of the chain in an `http.request` span carrying the method
/// and path, and logs the status and latency once the outcome is known.
///
/// Register it first so the span covers every other layer.
#[derive(Clone, Copy, Debug, Default)]
pub struct Trace;

impl Middleware for Trace {
    fn call(&self, req: Request, next: Next) -> BoxFuture {
        let span = info_span!(
            "http.request",
            method = %req.method(),
            path = %req.path()
        );
        Box::pin(
            async move {
                let started = Instant::now();
                let outcome = next.run(req).await;
                let latency_ms = started.elapsed().as_secs_f64() * 1000.0;
                match &outcome {
                    Ok(res) => info!(status = res.status_code(), latency_ms, "request completed"),
                    Err(e) => info!(error = %e, latency_ms, "request failed"),
                }
                outcome
            }
            .instrument(span),
        )
    }
}
