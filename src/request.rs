//! Incoming HTTP request type.
//!
//! A [`Request`] is an immutable value. The dispatcher never edits one in
//! place: when it needs a different method (HEAD looked up as GET) or has
//! route parameters to attach, it builds a new value with
//! [`with_method`](Request::with_method) / [`with_params`](Request::with_params).

use std::collections::HashMap;

use bytes::Bytes;

use crate::method::Method;

/// An incoming HTTP request.
#[derive(Clone, Debug)]
pub struct Request {
    method: Method,
    path: String,
    query: Option<String>,
    headers: Vec<(String, String)>,
    body: Bytes,
    params: HashMap<String, String>,
}

impl Request {
    /// Start building a request. Mostly useful in tests; the server builds
    /// requests from the wire.
    ///
    /// ```rust
    /// use halyard::{Method, Request};
    ///
    /// let req = Request::builder(Method::Post, "/users")
    ///     .header("content-type", "application/json")
    ///     .body(r#"{"name":"alice"}"#)
    ///     .build();
    /// assert_eq!(req.header("Content-Type"), Some("application/json"));
    /// ```
    pub fn builder(method: Method, path: impl Into<String>) -> RequestBuilder {
        RequestBuilder {
            method,
            path: path.into(),
            query: None,
            headers: Vec::new(),
            body: Bytes::new(),
        }
    }

    pub fn method(&self) -> &Method { &self.method }
    pub fn headers(&self) -> &[(String, String)] { &self.headers }
    pub fn body(&self) -> &[u8] { &self.body }
    pub fn query(&self) -> Option<&str> { self.query.as_deref() }

    /// The request path. An empty path is reported as `/`.
    pub fn path(&self) -> &str {
        if self.path.is_empty() { "/" } else { &self.path }
    }

    /// Case-insensitive header lookup. Returns the first match.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/users/{id}`, `req.param("id")` on `/users/42` returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// The same request, seen under another method.
    pub fn with_method(self, method: Method) -> Self {
        Self { method, ..self }
    }

    pub(crate) fn with_params(self, params: HashMap<String, String>) -> Self {
        Self { params, ..self }
    }
}

/// Builder for [`Request`]. Obtain via [`Request::builder`].
#[derive(Debug)]
pub struct RequestBuilder {
    method: Method,
    path: String,
    query: Option<String>,
    headers: Vec<(String, String)>,
    body: Bytes,
}

impl RequestBuilder {
    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Append a header. Order is preserved and duplicates are kept.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_owned(), value.to_owned()));
        self
    }

    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn build(self) -> Request {
        Request {
            method: self.method,
            path: self.path,
            query: self.query,
            headers: self.headers,
            body: self.body,
            params: HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_path_reads_as_root() {
        let req = Request::builder(Method::Get, "").build();
        assert_eq!(req.path(), "/");
    }

    #[test]
    fn with_method_leaves_everything_else() {
        let req = Request::builder(Method::Head, "/page")
            .header("accept", "text/html")
            .query("a=1")
            .build();
        let get = req.clone().with_method(Method::Get);
        assert_eq!(get.method(), &Method::Get);
        assert_eq!(req.method(), &Method::Head);
        assert_eq!(get.path(), "/page");
        assert_eq!(get.query(), Some("a=1"));
        assert_eq!(get.header("Accept"), Some("text/html"));
    }

    #[test]
    fn params_are_attached() {
        let params = HashMap::from([("id".to_owned(), "42".to_owned())]);
        let req = Request::builder(Method::Get, "/users/42").build().with_params(params);
        assert_eq!(req.param("id"), Some("42"));
        assert_eq!(req.param("name"), None);
    }
}
