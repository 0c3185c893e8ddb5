//! Trace extraction from a recorded exchange.
//!
//! This is the only module that reads [`RawRequest`] / [`RawResponse`]; the
//! rest of the pipeline works on [`ExtractedRequest`] and
//! [`ExtractedResponse`], whose fields are always populated.

use serde::Serialize;
use serde_json::{Map, Value};
use url::Url;

use crate::exchange::{RawRequest, RawResponse};

/// Base used when no base URL is configured.
const DEFAULT_BASE_URL: &str = "http://localhost";

/// Ordered header list with case-insensitive lookup.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Headers(Vec<(String, String)>);

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a header, keeping existing entries with the same name.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push((name.into(), value.into()));
    }

    /// First value of `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.get_all(name).next()
    }

    /// Every value of `name`, in recorded order.
    pub fn get_all<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a str> {
        self.0
            .iter()
            .filter(move |(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn from_raw(raw: Option<&Map<String, Value>>) -> Self {
        let mut headers = Self::new();
        for (name, value) in raw.into_iter().flatten() {
            match value {
                Value::Array(values) => {
                    for v in values {
                        headers.append(name.clone(), scalar_to_string(v));
                    }
                }
                Value::Null => {}
                other => headers.append(name.clone(), scalar_to_string(other)),
            }
        }
        headers
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(n, v)| (n.into(), v.into())).collect())
    }
}

/// Options for trace extraction.
#[derive(Clone, Debug, Default)]
pub struct ExtractOptions {
    /// Base for relative URLs. `http://localhost` when unset.
    pub base_url: Option<Url>,
    /// Method assumed when none was recorded.
    pub default_method: Option<String>,
}

/// Request half of a trace with defaults applied.
#[derive(Clone, Debug, PartialEq)]
pub struct ExtractedRequest {
    /// Uppercased method, or `None` when neither recorded nor defaulted.
    pub method: Option<String>,
    /// Absolute URL, or `None` when no URL was recorded.
    pub url: Option<Url>,
    pub headers: Headers,
    /// Request cookies as a `Cookie` header string.
    pub cookies: Option<String>,
    /// Query pairs from the URL, overridden by recorded query values.
    pub query: Vec<(String, String)>,
    /// Body, an empty object when none was recorded.
    pub body: Value,
}

/// Response half of a trace with defaults applied.
#[derive(Clone, Debug, PartialEq)]
pub struct ExtractedResponse {
    pub status_code: Option<u16>,
    pub headers: Headers,
    /// Body, an empty object when none was recorded.
    pub body: Value,
    /// `Set-Cookie` header lines.
    pub cookies: Vec<String>,
}

/// Extract the request half of an exchange.
pub fn extract_request(raw: &RawRequest, options: &ExtractOptions) -> ExtractedRequest {
    let method = raw
        .method
        .as_deref()
        .filter(|m| !m.is_empty())
        .or(options.default_method.as_deref())
        .map(str::to_ascii_uppercase);

    let mut url = raw
        .url
        .as_deref()
        .and_then(|u| resolve_url(options.base_url.as_ref(), u));

    let headers = Headers::from_raw(raw.headers.as_ref());

    let cookies = match &raw.cookies {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Object(map)) if !map.is_empty() => Some(
            map.iter()
                .map(|(k, v)| format!("{k}={}", scalar_to_string(v)))
                .collect::<Vec<_>>()
                .join("; "),
        ),
        _ => headers.get("cookie").map(str::to_owned),
    };

    let mut query: Vec<(String, String)> = url
        .as_ref()
        .map(|u| u.query_pairs().into_owned().collect())
        .unwrap_or_default();
    if let Some(recorded) = &raw.query {
        for (name, value) in recorded {
            query.retain(|(n, _)| n != name);
            match value {
                Value::Array(values) => {
                    query.extend(values.iter().map(|v| (name.clone(), scalar_to_string(v))));
                }
                other => query.push((name.clone(), scalar_to_string(other))),
            }
        }
        if !recorded.is_empty()
            && let Some(url) = url.as_mut()
        {
            url.query_pairs_mut().clear().extend_pairs(&query);
        }
    }

    ExtractedRequest {
        method,
        url,
        headers,
        cookies,
        query,
        body: body_or_empty(raw.body.as_ref()),
    }
}

/// Extract the response half of an exchange.
pub fn extract_response(raw: &RawResponse) -> ExtractedResponse {
    let headers = Headers::from_raw(raw.headers.as_ref());
    let cookies = headers.get_all("set-cookie").map(str::to_owned).collect();
    ExtractedResponse {
        status_code: raw.status_code,
        headers,
        body: body_or_empty(raw.body.as_ref()),
        cookies,
    }
}

/// Whether a body carries no content worth showing.
pub fn is_empty_body(body: &Value) -> bool {
    match body {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// Name/value pairs of a `Cookie` header.
pub fn parse_cookie_header(header: &str) -> Vec<(String, String)> {
    header
        .split(';')
        .filter_map(|pair| {
            let pair = pair.trim();
            if pair.is_empty() {
                return None;
            }
            let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
            Some((name.trim().to_owned(), value.trim().to_owned()))
        })
        .collect()
}

/// Name/value pair of a `Set-Cookie` line, ignoring its attributes.
pub fn parse_set_cookie(line: &str) -> Option<(String, String)> {
    let first = line.split(';').next()?.trim();
    let (name, value) = first.split_once('=')?;
    let name = name.trim();
    (!name.is_empty()).then(|| (name.to_owned(), value.trim().to_owned()))
}

fn body_or_empty(body: Option<&Value>) -> Value {
    match body {
        None | Some(Value::Null) => Value::Object(Map::new()),
        Some(value) => value.clone(),
    }
}

fn resolve_url(base: Option<&Url>, raw: &str) -> Option<Url> {
    if let Ok(absolute) = Url::parse(raw) {
        return Some(absolute);
    }
    let joined = match base {
        Some(base) => base.join(raw),
        None => Url::parse(DEFAULT_BASE_URL).and_then(|b| b.join(raw)),
    };
    match joined {
        Ok(url) => Some(url),
        Err(e) => {
            tracing::warn!(url = raw, error = %e, "Failed to resolve request URL");
            None
        }
    }
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn raw_request(value: Value) -> RawRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_relative_url_resolves_against_default_base() {
        let request = extract_request(
            &raw_request(json!({"method": "get", "url": "/users/42?expand=roles"})),
            &ExtractOptions::default(),
        );
        assert_eq!(request.method.as_deref(), Some("GET"));
        assert_eq!(
            request.url.as_ref().map(Url::as_str),
            Some("http://localhost/users/42?expand=roles")
        );
        assert_eq!(
            request.query,
            vec![("expand".to_owned(), "roles".to_owned())]
        );
    }

    #[test]
    fn test_relative_url_uses_configured_base() {
        let options = ExtractOptions {
            base_url: Some(Url::parse("https://api.example.com/v1/").unwrap()),
            default_method: None,
        };
        let request = extract_request(&raw_request(json!({"url": "orders"})), &options);
        assert_eq!(
            request.url.map(String::from),
            Some("https://api.example.com/v1/orders".to_owned())
        );
    }

    #[test]
    fn test_absent_fields_get_defaults() {
        let request = extract_request(&RawRequest::default(), &ExtractOptions::default());
        assert_eq!(request.method, None);
        assert_eq!(request.url, None);
        assert!(request.headers.is_empty());
        assert_eq!(request.body, json!({}));
        assert!(request.query.is_empty());

        let response = extract_response(&RawResponse::default());
        assert_eq!(response.status_code, None);
        assert_eq!(response.body, json!({}));
        assert!(response.cookies.is_empty());
    }

    #[test]
    fn test_default_method_applies_when_missing() {
        let options = ExtractOptions {
            base_url: None,
            default_method: Some("get".to_owned()),
        };
        let request = extract_request(&raw_request(json!({"url": "/"})), &options);
        assert_eq!(request.method.as_deref(), Some("GET"));
    }

    #[test]
    fn test_recorded_query_overrides_url_query() {
        let request = extract_request(
            &raw_request(json!({
                "url": "/search?q=old&page=1",
                "query": {"q": "new", "tag": ["a", "b"]}
            })),
            &ExtractOptions::default(),
        );
        assert_eq!(
            request.query,
            vec![
                ("page".to_owned(), "1".to_owned()),
                ("q".to_owned(), "new".to_owned()),
                ("tag".to_owned(), "a".to_owned()),
                ("tag".to_owned(), "b".to_owned()),
            ]
        );
    }

    #[test]
    fn test_recorded_query_is_written_into_url() {
        let request = extract_request(
            &raw_request(json!({"url": "/search", "query": {"q": "rust"}})),
            &ExtractOptions::default(),
        );
        assert_eq!(request.query, vec![("q".to_owned(), "rust".to_owned())]);
        assert_eq!(
            request.url.as_ref().map(Url::as_str),
            Some("http://localhost/search?q=rust")
        );

        let merged = extract_request(
            &raw_request(json!({"url": "/search?q=old&page=1", "query": {"q": "new"}})),
            &ExtractOptions::default(),
        );
        assert_eq!(
            merged.url.as_ref().and_then(Url::query),
            Some("page=1&q=new")
        );
    }

    #[test]
    fn test_cookies_from_object_or_header() {
        let from_object = extract_request(
            &raw_request(json!({"cookies": {"session": "abc", "theme": "dark"}})),
            &ExtractOptions::default(),
        );
        assert_eq!(from_object.cookies.as_deref(), Some("session=abc; theme=dark"));

        let from_header = extract_request(
            &raw_request(json!({"headers": {"Cookie": "session=xyz"}})),
            &ExtractOptions::default(),
        );
        assert_eq!(from_header.cookies.as_deref(), Some("session=xyz"));
    }

    #[test]
    fn test_response_set_cookie_lines() {
        let response = extract_response(
            &serde_json::from_value(json!({
                "statusCode": 200,
                "headers": {
                    "content-type": "application/json",
                    "set-cookie": ["session=abc; Path=/; HttpOnly", "theme=dark"]
                }
            }))
            .unwrap(),
        );
        assert_eq!(response.cookies.len(), 2);
        assert_eq!(response.headers.len(), 3);
        assert_eq!(response.headers.get("Content-Type"), Some("application/json"));
    }

    #[test]
    fn test_parse_cookie_header() {
        assert_eq!(
            parse_cookie_header("a=1; b=2;; flag"),
            vec![
                ("a".to_owned(), "1".to_owned()),
                ("b".to_owned(), "2".to_owned()),
                ("flag".to_owned(), String::new()),
            ]
        );
    }

    #[test]
    fn test_parse_set_cookie() {
        assert_eq!(
            parse_set_cookie("session=abc; Path=/; HttpOnly"),
            Some(("session".to_owned(), "abc".to_owned()))
        );
        assert_eq!(parse_set_cookie("garbage"), None);
    }

    #[test]
    fn test_is_empty_body() {
        assert!(is_empty_body(&json!(null)));
        assert!(is_empty_body(&json!({})));
        assert!(is_empty_body(&json!("")));
        assert!(!is_empty_body(&json!([])));
        assert!(!is_empty_body(&json!({"a": 1})));
    }
}
