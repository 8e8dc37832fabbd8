//! The handler used when neither a route nor a static asset matched.
//!
//! | Method | Outcome |
//! |---|---|
//! | `GET` `POST` `PUT` `PATCH` `DELETE` | `404 Not Found` (as a [`HandlerError`]) |
//! | `OPTIONS` | `200 OK`, `allow: OPTIONS` |
//! | anything else | `501 Not Implemented` |
//!
//! The `OPTIONS` answer only advertises `OPTIONS` itself; it does not look
//! at which methods the router has for the path.

use crate::error::HandlerError;
use crate::handler::{BoxFuture, ErasedHandler, Outcome};
use crate::method::Method;
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;

pub(crate) struct Fallback;

impl Fallback {
    pub(crate) fn respond(req: &Request) -> Outcome {
        let method = req.method();
        if method.is_normal() {
            Err(HandlerError::not_found())
        } else if *method == Method::Options {
            Ok(Response::builder().header("allow", "OPTIONS").no_body())
        } else {
            Ok(Response::status(Status::NotImplemented))
        }
    }
}

impl ErasedHandler for Fallback {
    fn call(&self, req: Request) -> BoxFuture {
        let outcome = Self::respond(&req);
        Box::pin(async move { outcome })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fallback(method: Method) -> Outcome {
        Fallback::respond(&Request::builder(method, "/nowhere").build())
    }

    #[test]
    fn normal_verbs_are_not_found() {
        for m in [Method::Get, Method::Post, Method::Put, Method::Patch, Method::Delete] {
            let err = fallback(m).unwrap_err();
            assert!(err.is_not_found());
        }
    }

    #[test]
    fn options_advertises_itself() {
        let res = fallback(Method::Options).unwrap();
        assert_eq!(res.status_code(), 200);
        assert_eq!(res.header("Allow"), Some("OPTIONS"));
        assert!(res.body().is_empty());
    }

    #[test]
    fn other_verbs_are_not_implemented() {
        for m in [Method::Trace, Method::Connect, Method::Purge, Method::Extension("BREW".into())] {
            assert_eq!(fallback(m).unwrap().status_code(), 501);
        }
    }
}
