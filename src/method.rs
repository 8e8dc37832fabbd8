//! HTTP method as a typed enum.
//!
//! Covers RFC 9110 standard methods, WebDAV extensions (RFC 4918 / 4791 / 3253 / 5323),
//! and `PURGE` used by nginx and Varnish for cache invalidation. Any other
//! syntactically valid token is kept as [`Method::Extension`] so it can reach
//! the dispatcher and be answered with `501 Not Implemented`.

use std::fmt;
use std::str::FromStr;

/// An HTTP request method.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Method {
    // RFC 9110 ─────────────────────────────────────────────────────────────────
    Connect,
    Delete,
    Get,
    Head,
    Options,
    Patch,
    Post,
    Put,
    Trace,
    // WebDAV RFC 4918 ──────────────────────────────────────────────────────────
    Copy,
    Lock,
    Mkcol,
    Move,
    Propfind,
    Proppatch,
    Unlock,
    // WebDAV extensions ────────────────────────────────────────────────────────
    Mkcalendar, // RFC 4791 — CalDAV
    Report,     // RFC 3253
    Search,     // RFC 5323
    // Cache invalidation ───────────────────────────────────────────────────────
    Purge, // nginx / Varnish
    // Anything else the client sent ────────────────────────────────────────────
    Extension(String),
}

impl Method {
    /// Returns the uppercase wire representation (e.g. `"GET"`).
    pub fn as_str(&self) -> &str {
        match self {
            Self::Connect      => "CONNECT",
            Self::Copy         => "COPY",
            Self::Delete       => "DELETE",
            Self::Get          => "GET",
            Self::Head         => "HEAD",
            Self::Lock         => "LOCK",
            Self::Mkcalendar   => "MKCALENDAR",
            Self::Mkcol        => "MKCOL",
            Self::Move         => "MOVE",
            Self::Options      => "OPTIONS",
            Self::Patch        => "PATCH",
            Self::Post         => "POST",
            Self::Propfind     => "PROPFIND",
            Self::Proppatch    => "PROPPATCH",
            Self::Purge        => "PURGE",
            Self::Put          => "PUT",
            Self::Report       => "REPORT",
            Self::Search       => "SEARCH",
            Self::Trace        => "TRACE",
            Self::Unlock       => "UNLOCK",
            Self::Extension(s) => s,
        }
    }

    /// The five verbs a missing resource answers with `404 Not Found`.
    pub fn is_normal(&self) -> bool {
        matches!(
            self,
            Self::Get | Self::Post | Self::Put | Self::Patch | Self::Delete
        )
    }
}

/// Returned when a method string is not a valid RFC 9110 token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidMethod(pub(crate) String);

impl fmt::Display for InvalidMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid HTTP method `{}`", self.0)
    }
}

impl std::error::Error for InvalidMethod {}

/// Parses a method string (e.g. `"GET"`). Case-sensitive per RFC 9110 §9.1,
/// so `"get"` becomes an extension method rather than [`Method::Get`].
impl FromStr for Method {
    type Err = InvalidMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let method = match s {
            "CONNECT"    => Self::Connect,
            "COPY"       => Self::Copy,
            "DELETE"     => Self::Delete,
            "GET"        => Self::Get,
            "HEAD"       => Self::Head,
            "LOCK"       => Self::Lock,
            "MKCALENDAR" => Self::Mkcalendar,
            "MKCOL"      => Self::Mkcol,
            "MOVE"       => Self::Move,
            "OPTIONS"    => Self::Options,
            "PATCH"      => Self::Patch,
            "POST"       => Self::Post,
            "PROPFIND"   => Self::Propfind,
            "PROPPATCH"  => Self::Proppatch,
            "PURGE"      => Self::Purge,
            "PUT"        => Self::Put,
            "REPORT"     => Self::Report,
            "SEARCH"     => Self::Search,
            "TRACE"      => Self::Trace,
            "UNLOCK"     => Self::Unlock,
            _ if is_token(s) => Self::Extension(s.to_owned()),
            _ => return Err(InvalidMethod(s.to_owned())),
        };
        Ok(method)
    }
}

// RFC 9110 §5.6.2 tchar.
fn is_token(s: &str) -> bool {
    !s.is_empty()
        && s.bytes().all(|b| {
            b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b)
        })
}

/// hyper has already validated the token, so this never fails.
impl From<&http::Method> for Method {
    fn from(m: &http::Method) -> Self {
        m.as_str()
            .parse()
            .unwrap_or_else(|_| Self::Extension(m.as_str().to_owned()))
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
