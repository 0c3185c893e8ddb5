//! Shape of a completed exchange as recorded by a test harness.
//!
//! Every field is optional: harnesses differ in what they record, and the
//! trace extractor fills defaults for anything missing.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Request half of a recorded exchange.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawRequest {
    pub method: Option<String>,
    /// Absolute URL or a path relative to the configured base URL.
    pub url: Option<String>,
    /// Header values may be strings, numbers or arrays of strings.
    pub headers: Option<Map<String, Value>>,
    /// Either a `Cookie` header string or an object of name/value pairs.
    pub cookies: Option<Value>,
    pub body: Option<Value>,
    pub query: Option<Map<String, Value>>,
}

/// Response half of a recorded exchange.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawResponse {
    #[serde(alias = "status")]
    pub status_code: Option<u16>,
    pub headers: Option<Map<String, Value>>,
    pub body: Option<Value>,
}

/// A completed request/response pair.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawExchange {
    pub request: RawRequest,
    pub response: RawResponse,
}

/// Anything that can describe itself as a recorded exchange.
///
/// Implement this for a harness's native response type so it can be handed
/// to the documentation pipeline and returned unchanged afterwards.
pub trait Exchange {
    fn raw_exchange(&self) -> RawExchange;
}

impl Exchange for RawExchange {
    fn raw_exchange(&self) -> RawExchange {
        self.clone()
    }
}

impl<T: Exchange + ?Sized> Exchange for &T {
    fn raw_exchange(&self) -> RawExchange {
        (**self).raw_exchange()
    }
}
