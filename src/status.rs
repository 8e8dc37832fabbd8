//! HTTP status codes as a typed enum.
//!
//! Use [`Status`] anywhere a status code is accepted: `Response::status()`,
//! `Response::builder().status()`, or as a bare handler return value.
//!
//! ```rust
//! use halyard::{Response, Status};
//!
//! // status-only, no body
//! Response::status(Status::NoContent);
//!
//! Response::builder()
//!     .status(Status::Created)
//!     .header("location", "/users/42")
//!     .json(br#"{"id":42}"#.to_vec());
//!
//! // return Status directly from a handler
//! async fn delete_user(_req: halyard::Request) -> Status {
//!     Status::NoContent
//! }
//! ```

/// All IANA-registered HTTP status codes.
#[allow(clippy::enum_variant_names)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Status {
    // ── 1xx Informational ─────────────────────────────────────────────────────
    Continue,                      // 100
    SwitchingProtocols,            // 101
    Processing,                    // 102
    EarlyHints,                    // 103

    // ── 2xx Success ───────────────────────────────────────────────────────────
    Ok,                            // 200
    Created,                       // 201
    Accepted,                      // 202
    NonAuthoritativeInformation,   // 203
    NoContent,                     // 204
    ResetContent,                  // 205
    PartialContent,                // 206
    MultiStatus,                   // 207
    AlreadyReported,               // 208
    ImUsed,                        // 226

    // ── 3xx Redirection ───────────────────────────────────────────────────────
    MultipleChoices,               // 300
    MovedPermanently,              // 301
    Found,                         // 302
    SeeOther,                      // 303
    NotModified,                   // 304
    TemporaryRedirect,             // 307
    PermanentRedirect,             // 308

    // ── 4xx Client errors ─────────────────────────────────────────────────────
    BadRequest,                    // 400
    Unauthorized,                  // 401
    PaymentRequired,               // 402
    Forbidden,                     // 403
    NotFound,                      // 404
    MethodNotAllowed,              // 405
    NotAcceptable,                 // 406
    ProxyAuthenticationRequired,   // 407
    RequestTimeout,                // 408
    Conflict,                      // 409
    Gone,                          // 410
    LengthRequired,                // 411
    PreconditionFailed,            // 412
    ContentTooLarge,               // 413
    UriTooLong,                    // 414
    UnsupportedMediaType,          // 415
    RangeNotSatisfiable,           // 416
    ExpectationFailed,             // 417
    ImATeapot,                     // 418
    MisdirectedRequest,            // 421
    UnprocessableContent,          // 422
    Locked,                        // 423
    FailedDependency,              // 424
    TooEarly,                      // 425
    UpgradeRequired,               // 426
    PreconditionRequired,          // 428
    TooManyRequests,               // 429
    RequestHeaderFieldsTooLarge,   // 431
    UnavailableForLegalReasons,    // 451

    // ── 5xx Server errors ─────────────────────────────────────────────────────
    InternalServerError,           // 500
    NotImplemented,                // 501
    BadGateway,                    // 502
    ServiceUnavailable,            // 503
    GatewayTimeout,                // 504
    HttpVersionNotSupported,       // 505
    VariantAlsoNegotiates,         // 506
    InsufficientStorage,           // 507
    LoopDetected,                  // 508
    NotExtended,                   // 510
    NetworkAuthenticationRequired, // 511
}

impl Status {
    /// The numeric code, e.g. `404`.
    pub fn code(self) -> u16 {
        match self {
            Self::Continue                      => 100,
            Self::SwitchingProtocols            => 101,
            Self::Processing                    => 102,
            Self::EarlyHints                    => 103,
            Self::Ok                            => 200,
            Self::Created                       => 201,
            Self::Accepted                      => 202,
            Self::NonAuthoritativeInformation   => 203,
            Self::NoContent                     => 204,
            Self::ResetContent                  => 205,
            Self::PartialContent                => 206,
            Self::MultiStatus                   => 207,
            Self::AlreadyReported               => 208,
            Self::ImUsed                        => 226,
            Self::MultipleChoices               => 300,
            Self::MovedPermanently              => 301,
            Self::Found                         => 302,
            Self::SeeOther                      => 303,
            Self::NotModified                   => 304,
            Self::TemporaryRedirect             => 307,
            Self::PermanentRedirect             => 308,
            Self::BadRequest                    => 400,
            Self::Unauthorized                  => 401,
            Self::PaymentRequired               => 402,
            Self::Forbidden                     => 403,
            Self::NotFound                      => 404,
            Self::MethodNotAllowed              => 405,
            Self::NotAcceptable                 => 406,
            Self::ProxyAuthenticationRequired   => 407,
            Self::RequestTimeout                => 408,
            Self::Conflict                      => 409,
            Self::Gone                          => 410,
            Self::LengthRequired                => 411,
            Self::PreconditionFailed            => 412,
            Self::ContentTooLarge               => 413,
            Self::UriTooLong                    => 414,
            Self::UnsupportedMediaType          => 415,
            Self::RangeNotSatisfiable           => 416,
            Self::ExpectationFailed             => 417,
            Self::ImATeapot                     => 418,
            Self::MisdirectedRequest            => 421,
            Self::UnprocessableContent          => 422,
            Self::Locked                        => 423,
            Self::FailedDependency              => 424,
            Self::TooEarly                      => 425,
            Self::UpgradeRequired               => 426,
            Self::PreconditionRequired          => 428,
            Self::TooManyRequests               => 429,
            Self::RequestHeaderFieldsTooLarge   => 431,
            Self::UnavailableForLegalReasons    => 451,
            Self::InternalServerError           => 500,
            Self::NotImplemented                => 501,
            Self::BadGateway                    => 502,
            Self::ServiceUnavailable            => 503,
            Self::GatewayTimeout                => 504,
            Self::HttpVersionNotSupported       => 505,
            Self::VariantAlsoNegotiates         => 506,
            Self::InsufficientStorage           => 507,
            Self::LoopDetected                  => 508,
            Self::NotExtended                   => 510,
            Self::NetworkAuthenticationRequired => 511,
        }
    }

    /// The canonical reason phrase, e.g. `"Not Found"`.
    pub fn reason(self) -> &'static str {
        reason(self.code())
    }
}

impl From<Status> for u16 {
    fn from(s: Status) -> u16 { s.code() }
}

/// Reason phrase for any numeric code; empty for unregistered codes.
pub(crate) fn reason(code: u16) -> &'static str {
    match code {
        100 => "Continue",
        101 => "Switching Protocols",
        102 => "Processing",
        103 => "Early Hints",
        200 => "OK",
        201 => "Created",
        202 => "Accepted",
        203 => "Non-Authoritative Information",
        204 => "No Content",
        205 => "Reset Content",
        206 => "Partial Content",
        207 => "Multi-Status",
        208 => "Already Reported",
        226 => "IM Used",
        300 => "Multiple Choices",
        301 => "Moved Permanently",
        302 => "Found",
        303 => "See Other",
        304 => "Not Modified",
        307 => "Temporary Redirect",
        308 => "Permanent Redirect",
        400 => "Bad Request",
        401 => "Unauthorized",
        402 => "Payment Required",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        406 => "Not Acceptable",
        407 => "Proxy Authentication Required",
        408 => "Request Timeout",
        409 => "Conflict",
        410 => "Gone",
        411 => "Length Required",
        412 => "Precondition Failed",
        413 => "Content Too Large",
        414 => "URI Too Long",
        415 => "Unsupported Media Type",
        416 => "Range Not Satisfiable",
        417 => "Expectation Failed",
        418 => "I'm a Teapot",
        421 => "Misdirected Request",
        422 => "Unprocessable Content",
        423 => "Locked",
        424 => "Failed Dependency",
        425 => "Too Early",
        426 => "Upgrade Required",
        428 => "Precondition Required",
        429 => "Too Many Requests",
        431 => "Request Header Fields Too Large",
        451 => "Unavailable For Legal Reasons",
        500 => "Internal Server Error",
        501 => "Not Implemented",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        505 => "HTTP Version Not Supported",
        506 => "Variant Also Negotiates",
        507 => "Insufficient Storage",
        508 => "Loop Detected",
        510 => "Not Extended",
        511 => "Network Authentication Required",
        _   => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_and_reasons() {
        assert_eq!(Status::NotFound.code(), 404);
        assert_eq!(Status::NotFound.reason(), "Not Found");
        assert_eq!(u16::from(Status::NotImplemented), 501);
        assert_eq!(Status::InternalServerError.reason(), "Internal Server Error");
        assert_eq!(reason(299), "");
    }
}
