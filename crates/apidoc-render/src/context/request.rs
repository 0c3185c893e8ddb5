//! Request-side topics: curl command, raw HTTP request, body and parts.

use std::borrow::Cow;

use apidoc_descriptor::ContractError;
use apidoc_snapshot::{DocumentSnapshot, HttpTrace, is_empty_body};
use serde::Serialize;
use serde_json::Value;
use url::Url;
use url::form_urlencoded;

use super::tables::{DescriptorRow, TableContext};
use super::{Built, HeaderLine, pretty_body};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Headers curl sets on its own.
const CURL_IMPLICIT_HEADERS: [&str; 2] = ["host", "cookie"];

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CurlContext {
    /// Full shell command, continuation lines joined with ` \`.
    pub command: String,
    pub method: String,
    pub url: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct HttpRequestContext {
    pub request_line: String,
    pub headers: Vec<HeaderLine>,
    pub body: Option<String>,
    pub has_body: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BodyContext {
    pub body: String,
    /// `json` for structured bodies, `text` otherwise.
    pub language: &'static str,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PartContext {
    #[serde(flatten)]
    pub row: DescriptorRow,
    pub body: Option<String>,
    pub fields: TableContext,
    pub has_body: bool,
    pub has_fields: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PartsContext {
    pub parts: Vec<PartContext>,
    pub has_optional: bool,
    pub has_description: bool,
}

pub(crate) fn is_form_request(http: &HttpTrace) -> bool {
    http.request_headers
        .get("content-type")
        .is_some_and(|ct| ct.trim_start().starts_with(FORM_CONTENT_TYPE))
}

/// Name/value pairs of a form body given either as an encoded string or as
/// an object.
pub(crate) fn form_pairs(body: &Value) -> Vec<(String, String)> {
    match body {
        Value::String(encoded) => form_urlencoded::parse(encoded.as_bytes())
            .into_owned()
            .collect(),
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| {
                let value = match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (k.clone(), value)
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn encode_form(body: &Value) -> String {
    if let Value::String(encoded) = body {
        return encoded.clone();
    }
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(form_pairs(body))
        .finish()
}

/// Body as sent on the wire: form bodies urlencoded, JSON compact.
fn wire_body(http: &HttpTrace) -> Option<String> {
    if is_empty_body(&http.request_body) {
        return None;
    }
    if is_form_request(http) {
        return Some(encode_form(&http.request_body));
    }
    Some(match &http.request_body {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    })
}

/// POSIX quoting; curl snippets are shell commands regardless of host OS.
fn shell_quote(value: &str) -> String {
    shell_escape::unix::escape(Cow::Borrowed(value)).into_owned()
}

fn host_header(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_owned(),
    })
}

fn request_target(url: &Url) -> String {
    match url.query() {
        Some(query) => format!("{}?{query}", url.path()),
        None => url.path().to_owned(),
    }
}

/// # Errors
///
/// Returns [`ContractError::MissingField`] when the snapshot has no method
/// or its URL has no host to send to.
pub(super) fn curl_request(snapshot: &DocumentSnapshot) -> Result<Built<CurlContext>, ContractError> {
    let http = &snapshot.http;
    if http.method.is_empty() {
        return Err(ContractError::missing_field("curl-request", "method"));
    }
    if http.url.host_str().is_none() {
        return Err(ContractError::missing_field("curl-request", "url"));
    }

    let multipart = !snapshot.parts.descriptors.is_empty();
    let mut lines = vec![format!(
        "$ curl {} -i -X {}",
        shell_quote(http.url.as_str()),
        http.method
    )];

    for (name, value) in http.request_headers.iter() {
        let implicit = CURL_IMPLICIT_HEADERS
            .iter()
            .any(|h| name.eq_ignore_ascii_case(h));
        let boundary = multipart && name.eq_ignore_ascii_case("content-type");
        if !implicit && !boundary {
            lines.push(format!("-H {}", shell_quote(&format!("{name}: {value}"))));
        }
    }

    if let Some(cookies) = &http.request_cookies {
        lines.push(format!("--cookie {}", shell_quote(cookies)));
    }

    if multipart {
        for part in &snapshot.parts.descriptors {
            let value = match snapshot.parts.bodies.get(part.name()) {
                Some(body) => format!("{}={body};type=application/json", part.name()),
                None => format!("{name}=@{name}", name = part.name()),
            };
            lines.push(format!("-F {}", shell_quote(&value)));
        }
    } else if let Some(body) = wire_body(http) {
        lines.push(format!("-d {}", shell_quote(&body)));
    }

    Ok(Built {
        context: CurlContext {
            command: lines.join(" \\\n    "),
            method: http.method.clone(),
            url: http.url.to_string(),
        },
        is_empty: false,
    })
}

pub(super) fn http_request(snapshot: &DocumentSnapshot) -> Built<HttpRequestContext> {
    let http = &snapshot.http;
    let mut headers: Vec<HeaderLine> = http
        .request_headers
        .iter()
        .map(|(name, value)| HeaderLine::new(name, value))
        .collect();
    if !http.request_headers.contains("host")
        && let Some(host) = host_header(&http.url)
    {
        headers.push(HeaderLine::new("Host", &host));
    }
    if !http.request_headers.contains("cookie")
        && let Some(cookies) = &http.request_cookies
    {
        headers.push(HeaderLine::new("Cookie", cookies));
    }

    let body = if is_form_request(http) {
        wire_body(http)
    } else {
        (!is_empty_body(&http.request_body)).then(|| pretty_body(&http.request_body))
    };

    Built {
        context: HttpRequestContext {
            request_line: format!("{} {} HTTP/1.1", http.method, request_target(&http.url)),
            headers,
            has_body: body.is_some(),
            body,
        },
        is_empty: false,
    }
}

pub(super) fn request_body(snapshot: &DocumentSnapshot) -> Built<BodyContext> {
    body_context(&snapshot.http.request_body)
}

pub(super) fn body_context(body: &Value) -> Built<BodyContext> {
    if is_empty_body(body) {
        return Built {
            context: BodyContext::default(),
            is_empty: true,
        };
    }
    let language = if body.is_string() { "text" } else { "json" };
    Built {
        context: BodyContext {
            body: pretty_body(body),
            language,
        },
        is_empty: false,
    }
}

pub(super) fn request_parts(snapshot: &DocumentSnapshot) -> Built<PartsContext> {
    let parts: Vec<PartContext> = snapshot
        .parts
        .descriptors
        .iter()
        .map(|descriptor| {
            let body = snapshot
                .parts
                .bodies
                .get(descriptor.name())
                .filter(|b| !is_empty_body(b))
                .map(pretty_body);
            let fields = snapshot
                .parts
                .fields
                .get(descriptor.name())
                .map(|f| TableContext::declared(f))
                .unwrap_or_default();
            PartContext {
                row: DescriptorRow::declared(descriptor),
                has_body: body.is_some(),
                has_fields: !fields.rows.is_empty(),
                body,
                fields,
            }
        })
        .collect();

    let context = PartsContext {
        has_optional: parts.iter().any(|p| p.row.optional),
        has_description: parts.iter().any(|p| !p.row.description.is_empty()),
        parts,
    };
    let is_empty = context.parts.is_empty();
    Built { context, is_empty }
}
