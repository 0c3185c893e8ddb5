//! Per-topic template contexts.
//!
//! Every topic has a pure builder that turns a [`DocumentSnapshot`] into a
//! serializable context plus an emptiness flag. Empty topics produce no
//! artifact.

mod request;
mod response;
mod tables;

use apidoc_descriptor::ContractError;
use apidoc_snapshot::DocumentSnapshot;
use serde::Serialize;
use serde_json::Value;

use crate::Topic;

pub use request::{BodyContext, CurlContext, HttpRequestContext, PartContext, PartsContext};
pub use response::{HttpResponseContext, reason_phrase};
pub use tables::{DescriptorRow, TableContext};

/// Output of one context builder.
#[derive(Clone, Debug, PartialEq)]
pub struct Built<C> {
    pub context: C,
    pub is_empty: bool,
}

/// Type-erased context for one topic, ready for a template.
#[derive(Clone, Debug)]
pub struct TopicContext {
    pub topic: Topic,
    pub value: minijinja::Value,
    pub is_empty: bool,
}

impl TopicContext {
    fn from_built<C: Serialize>(topic: Topic, built: Built<C>) -> Self {
        Self {
            topic,
            value: minijinja::Value::from_serialize(&built.context),
            is_empty: built.is_empty,
        }
    }
}

/// One `Name: value` header line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HeaderLine {
    pub name: String,
    pub value: String,
}

impl HeaderLine {
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.to_owned(),
            value: value.to_owned(),
        }
    }
}

/// Body for display: strings verbatim, everything else as indented JSON.
pub(crate) fn pretty_body(body: &Value) -> String {
    match body {
        Value::String(s) => s.clone(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    }
}

/// Build the context for `topic`.
///
/// # Errors
///
/// Returns a [`ContractError`] when the snapshot lacks data the topic
/// cannot do without (a method or a routable URL for `curl-request`).
pub fn build_context(topic: Topic, snapshot: &DocumentSnapshot) -> Result<TopicContext, ContractError> {
    let context = match topic {
        Topic::CurlRequest => TopicContext::from_built(topic, request::curl_request(snapshot)?),
        Topic::HttpRequest => TopicContext::from_built(topic, request::http_request(snapshot)),
        Topic::HttpResponse => TopicContext::from_built(topic, response::http_response(snapshot)),
        Topic::RequestBody => TopicContext::from_built(topic, request::request_body(snapshot)),
        Topic::ResponseBody => TopicContext::from_built(topic, response::response_body(snapshot)),
        Topic::PathParameters => TopicContext::from_built(topic, tables::path_parameters(snapshot)),
        Topic::QueryParameters => {
            TopicContext::from_built(topic, tables::query_parameters(snapshot))
        }
        Topic::FormParameters => TopicContext::from_built(topic, tables::form_parameters(snapshot)),
        Topic::RequestHeaders => TopicContext::from_built(topic, tables::request_headers(snapshot)),
        Topic::ResponseHeaders => {
            TopicContext::from_built(topic, tables::response_headers(snapshot))
        }
        Topic::RequestFields => TopicContext::from_built(topic, tables::request_fields(snapshot)),
        Topic::ResponseFields => TopicContext::from_built(topic, tables::response_fields(snapshot)),
        Topic::RequestCookies => TopicContext::from_built(topic, tables::request_cookies(snapshot)),
        Topic::ResponseCookies => {
            TopicContext::from_built(topic, tables::response_cookies(snapshot))
        }
        Topic::RequestParts => TopicContext::from_built(topic, request::request_parts(snapshot)),
    };
    Ok(context)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use apidoc_snapshot::{
        ExtractOptions, RawRequest, RawResponse, Registrations, assemble, extract_request,
        extract_response,
    };
    use serde_json::json;

    /// Snapshot from harness-shaped JSON.
    pub(crate) fn snapshot(
        request: Value,
        response: Value,
        registrations: Registrations,
    ) -> DocumentSnapshot {
        let mut request: RawRequest = serde_json::from_value(request).unwrap();
        request.method.get_or_insert_with(|| "GET".to_owned());
        let response: RawResponse = serde_json::from_value(response).unwrap();
        assemble(
            extract_request(&request, &ExtractOptions::default()),
            extract_response(&response),
            registrations,
        )
        .unwrap()
    }

    #[test]
    fn test_every_topic_builds_for_a_minimal_exchange() {
        let snap = snapshot(json!({"url": "/ping"}), json!({"statusCode": 200}), Registrations::default());
        let contexts: Vec<_> = Topic::ALL
            .into_iter()
            .map(|t| build_context(t, &snap).unwrap())
            .collect();

        let non_empty: Vec<_> = contexts
            .iter()
            .filter(|c| !c.is_empty)
            .map(|c| c.topic)
            .collect();
        assert_eq!(
            non_empty,
            vec![Topic::CurlRequest, Topic::HttpRequest, Topic::HttpResponse]
        );
    }

    #[test]
    fn test_context_value_exposes_snake_case_keys() {
        let snap = snapshot(
            json!({"url": "/?page=1"}),
            json!({"statusCode": 200}),
            Registrations::default(),
        );
        let context = build_context(Topic::QueryParameters, &snap).unwrap();
        let has_format = context.value.get_attr("has_format").unwrap();
        assert!(!has_format.is_true());
        let rows = context.value.get_attr("rows").unwrap();
        assert_eq!(rows.len(), Some(1));
    }

    #[test]
    fn test_pretty_body() {
        assert_eq!(pretty_body(&json!("plain")), "plain");
        assert_eq!(pretty_body(&json!([1])), "[\n  1\n]");
    }
}
