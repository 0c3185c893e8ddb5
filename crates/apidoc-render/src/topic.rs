//! Documentation topic vocabulary.

use std::fmt;
use std::str::FromStr;

/// One kind of documentation artifact.
///
/// Each topic has a context builder and a template; adding one requires
/// both.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Topic {
    CurlRequest,
    HttpRequest,
    HttpResponse,
    RequestBody,
    ResponseBody,
    PathParameters,
    QueryParameters,
    FormParameters,
    RequestHeaders,
    ResponseHeaders,
    RequestFields,
    ResponseFields,
    RequestCookies,
    ResponseCookies,
    RequestParts,
}

impl Topic {
    /// Every topic, in rendering order.
    pub const ALL: [Self; 15] = [
        Self::CurlRequest,
        Self::HttpRequest,
        Self::HttpResponse,
        Self::RequestBody,
        Self::ResponseBody,
        Self::PathParameters,
        Self::QueryParameters,
        Self::FormParameters,
        Self::RequestHeaders,
        Self::ResponseHeaders,
        Self::RequestFields,
        Self::ResponseFields,
        Self::RequestCookies,
        Self::ResponseCookies,
        Self::RequestParts,
    ];

    /// Identifier used in file names and template names.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CurlRequest => "curl-request",
            Self::HttpRequest => "http-request",
            Self::HttpResponse => "http-response",
            Self::RequestBody => "request-body",
            Self::ResponseBody => "response-body",
            Self::PathParameters => "path-parameters",
            Self::QueryParameters => "query-parameters",
            Self::FormParameters => "form-parameters",
            Self::RequestHeaders => "request-headers",
            Self::ResponseHeaders => "response-headers",
            Self::RequestFields => "request-fields",
            Self::ResponseFields => "response-fields",
            Self::RequestCookies => "request-cookies",
            Self::ResponseCookies => "response-cookies",
            Self::RequestParts => "request-parts",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown topic identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown topic `{0}`")]
pub struct UnknownTopic(pub String);

impl FromStr for Topic {
    type Err = UnknownTopic;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownTopic(s.to_owned()))
    }
}
