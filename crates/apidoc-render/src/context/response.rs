//! Response-side topics: raw HTTP response and body.

use apidoc_snapshot::{DocumentSnapshot, is_empty_body};
use http::StatusCode;
use serde::Serialize;

use super::request::{BodyContext, body_context};
use super::{Built, HeaderLine, pretty_body};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct HttpResponseContext {
    pub status_line: String,
    pub status_code: u16,
    pub reason: String,
    pub headers: Vec<HeaderLine>,
    pub body: Option<String>,
    pub has_body: bool,
}

/// Standard reason phrase for a status code.
pub fn reason_phrase(status: u16) -> Option<&'static str> {
    StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason())
}

/// Empty when the harness recorded neither a status, headers nor a body.
pub(super) fn http_response(snapshot: &DocumentSnapshot) -> Built<HttpResponseContext> {
    let http = &snapshot.http;
    let Some(status_code) = http.status_code else {
        if http.response_headers.is_empty() && is_empty_body(&http.response_body) {
            return Built {
                context: HttpResponseContext::default(),
                is_empty: true,
            };
        }
        tracing::debug!("Response has no status code, rendering as 200");
        return http_response_with(snapshot, 200);
    };
    http_response_with(snapshot, status_code)
}

fn http_response_with(snapshot: &DocumentSnapshot, status_code: u16) -> Built<HttpResponseContext> {
    let http = &snapshot.http;
    let reason = reason_phrase(status_code).unwrap_or_default().to_owned();
    let status_line = if reason.is_empty() {
        format!("HTTP/1.1 {status_code}")
    } else {
        format!("HTTP/1.1 {status_code} {reason}")
    };
    let body = (!is_empty_body(&http.response_body)).then(|| pretty_body(&http.response_body));

    Built {
        context: HttpResponseContext {
            status_line,
            status_code,
            reason,
            headers: http
                .response_headers
                .iter()
                .map(|(name, value)| HeaderLine::new(name, value))
                .collect(),
            has_body: body.is_some(),
            body,
        },
        is_empty: false,
    }
}

pub(super) fn response_body(snapshot: &DocumentSnapshot) -> Built<BodyContext> {
    body_context(&snapshot.http.response_body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::tests::snapshot;
    use apidoc_snapshot::Registrations;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_status_line_with_reason() {
        let built = http_response(&snapshot(
            json!({"url": "/"}),
            json!({"statusCode": 201, "headers": {"Location": "/users/1"}, "body": {"id": 1}}),
            Registrations::default(),
        ));
        assert!(!built.is_empty);
        assert_eq!(built.context.status_line, "HTTP/1.1 201 Created");
        assert_eq!(built.context.headers, vec![HeaderLine::new("Location", "/users/1")]);
        assert_eq!(built.context.body.as_deref(), Some("{\n  \"id\": 1\n}"));
    }

    #[test]
    fn test_unknown_status_has_no_reason() {
        let built = http_response(&snapshot(
            json!({"url": "/"}),
            json!({"statusCode": 299}),
            Registrations::default(),
        ));
        assert_eq!(built.context.status_line, "HTTP/1.1 299");
        assert!(!built.context.has_body);
    }

    #[test]
    fn test_reason_phrase_covers_registered_codes() {
        assert_eq!(reason_phrase(207), Some("Multi-Status"));
        assert_eq!(reason_phrase(418), Some("I'm a teapot"));
        assert_eq!(reason_phrase(428), Some("Precondition Required"));
        assert_eq!(reason_phrase(1000), None);

        let built = http_response(&snapshot(
            json!({"url": "/"}),
            json!({"statusCode": 451}),
            Registrations::default(),
        ));
        assert_eq!(
            built.context.status_line,
            "HTTP/1.1 451 Unavailable For Legal Reasons"
        );
    }

    #[test]
    fn test_nothing_recorded_is_empty() {
        let snap = snapshot(json!({"url": "/"}), json!({}), Registrations::default());
        assert!(http_response(&snap).is_empty);
        assert!(response_body(&snap).is_empty);
    }

    #[test]
    fn test_text_body() {
        let built = response_body(&snapshot(
            json!({"url": "/"}),
            json!({"statusCode": 200, "body": "pong"}),
            Registrations::default(),
        ));
        assert_eq!(built.context.body, "pong");
        assert_eq!(built.context.language, "text");
    }
}
