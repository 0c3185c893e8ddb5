//! The document snapshot: one exchange plus every registered descriptor.

use std::collections::BTreeMap;

use apidoc_descriptor::{ContractError, Descriptor, DescriptorKind};
use serde_json::Value;
use url::Url;

use crate::trace::{ExtractedRequest, ExtractedResponse, Headers};

/// Context label for assembly errors.
const ASSEMBLE_CONTEXT: &str = "assemble snapshot";

/// Descriptors registered by the author for one exchange.
///
/// Lists may contain repeated names; [`assemble`] resolves them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Registrations {
    pub path_parameters: Vec<Descriptor>,
    pub query_parameters: Vec<Descriptor>,
    pub form_parameters: Vec<Descriptor>,
    pub request_fields: Vec<Descriptor>,
    pub response_fields: Vec<Descriptor>,
    pub request_headers: Vec<Descriptor>,
    pub response_headers: Vec<Descriptor>,
    pub request_cookies: Vec<Descriptor>,
    pub response_cookies: Vec<Descriptor>,
    pub request_parts: Vec<Descriptor>,
    /// Field descriptors for the body of a named part.
    pub part_fields: BTreeMap<String, Vec<Descriptor>>,
    /// Example body of a named part.
    pub part_bodies: BTreeMap<String, Value>,
}

/// Recorded HTTP exchange with required attributes present.
#[derive(Clone, Debug, PartialEq)]
pub struct HttpTrace {
    pub method: String,
    pub url: Url,
    pub status_code: Option<u16>,
    pub request_headers: Headers,
    pub response_headers: Headers,
    pub request_body: Value,
    pub response_body: Value,
    /// `Cookie` header string sent with the request.
    pub request_cookies: Option<String>,
    /// `Set-Cookie` lines of the response.
    pub response_cookies: Vec<String>,
    pub query: Vec<(String, String)>,
}

/// Path, query and form parameter descriptors.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Parameters {
    pub path: Vec<Descriptor>,
    pub query: Vec<Descriptor>,
    pub form: Vec<Descriptor>,
}

/// Descriptors split by message side.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MessageDescriptors {
    pub request: Vec<Descriptor>,
    pub response: Vec<Descriptor>,
}

/// Multipart part descriptors with per-part overrides.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Parts {
    pub descriptors: Vec<Descriptor>,
    pub fields: BTreeMap<String, Vec<Descriptor>>,
    pub bodies: BTreeMap<String, Value>,
}

/// Immutable view of one documented exchange.
///
/// Every descriptor list is present, possibly empty.
#[derive(Clone, Debug, PartialEq)]
pub struct DocumentSnapshot {
    pub http: HttpTrace,
    pub parameters: Parameters,
    pub fields: MessageDescriptors,
    pub parts: Parts,
    pub headers: MessageDescriptors,
    pub cookies: MessageDescriptors,
}

/// Build a snapshot from an extracted trace and the registered descriptors.
///
/// Repeated names within a list resolve to the last registration, kept at
/// the position of the first.
///
/// # Errors
///
/// Returns [`ContractError::MissingField`] when the request has no method or
/// no URL.
pub fn assemble(
    request: ExtractedRequest,
    response: ExtractedResponse,
    registrations: Registrations,
) -> Result<DocumentSnapshot, ContractError> {
    let method = request
        .method
        .ok_or_else(|| ContractError::missing_field(ASSEMBLE_CONTEXT, "method"))?;
    let url = request
        .url
        .ok_or_else(|| ContractError::missing_field(ASSEMBLE_CONTEXT, "url"))?;

    let Registrations {
        path_parameters,
        query_parameters,
        form_parameters,
        request_fields,
        response_fields,
        request_headers,
        response_headers,
        request_cookies,
        response_cookies,
        request_parts,
        part_fields,
        part_bodies,
    } = registrations;

    Ok(DocumentSnapshot {
        http: HttpTrace {
            method,
            url,
            status_code: response.status_code,
            request_headers: request.headers,
            response_headers: response.headers,
            request_body: request.body,
            response_body: response.body,
            request_cookies: request.cookies,
            response_cookies: response.cookies,
            query: request.query,
        },
        parameters: Parameters {
            path: last_wins(path_parameters),
            query: last_wins(query_parameters),
            form: last_wins(form_parameters),
        },
        fields: MessageDescriptors {
            request: last_wins(request_fields),
            response: last_wins(response_fields),
        },
        parts: Parts {
            descriptors: last_wins(request_parts),
            fields: part_fields
                .into_iter()
                .map(|(part, fields)| (part, last_wins(fields)))
                .collect(),
            bodies: part_bodies,
        },
        headers: MessageDescriptors {
            request: last_wins(request_headers),
            response: last_wins(response_headers),
        },
        cookies: MessageDescriptors {
            request: last_wins(request_cookies),
            response: last_wins(response_cookies),
        },
    })
}

/// Whether two descriptors name the same thing. Header names ignore case.
pub fn same_name(a: &Descriptor, b: &Descriptor) -> bool {
    if a.kind() == DescriptorKind::Header && b.kind() == DescriptorKind::Header {
        a.name().eq_ignore_ascii_case(b.name())
    } else {
        a.name() == b.name()
    }
}

fn last_wins(descriptors: Vec<Descriptor>) -> Vec<Descriptor> {
    let mut resolved: Vec<Descriptor> = Vec::with_capacity(descriptors.len());
    for descriptor in descriptors {
        if let Some(slot) = resolved.iter_mut().find(|d| same_name(d, &descriptor)) {
            tracing::debug!(name = descriptor.name(), "Replacing repeated descriptor");
            *slot = descriptor;
        } else {
            resolved.push(descriptor);
        }
    }
    resolved
}
