//! Descriptor tables: parameters, headers, fields and cookies.
//!
//! Each table lists the declared descriptors first, in registration order,
//! followed by names seen on the wire that nobody declared.

use apidoc_descriptor::{Descriptor, FieldType};
use apidoc_snapshot::{DocumentSnapshot, parse_cookie_header, parse_set_cookie};
use serde::Serialize;
use serde_json::Value;

use super::Built;
use super::request::{form_pairs, is_form_request};

/// One table row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DescriptorRow {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    pub format: Option<String>,
    pub description: String,
    pub optional: bool,
}

impl DescriptorRow {
    pub(crate) fn declared(descriptor: &Descriptor) -> Self {
        Self {
            name: descriptor.name().to_owned(),
            field_type: descriptor.field_type().as_str().to_owned(),
            format: descriptor.format().map(str::to_owned),
            description: descriptor.description().to_owned(),
            optional: descriptor.is_optional(),
        }
    }

    fn inferred(name: String, field_type: FieldType) -> Self {
        Self {
            name,
            field_type: field_type.as_str().to_owned(),
            format: None,
            description: String::new(),
            optional: false,
        }
    }
}

/// Rows plus the column flags templates use to drop empty columns.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TableContext {
    pub rows: Vec<DescriptorRow>,
    pub has_format: bool,
    pub has_optional: bool,
    pub has_description: bool,
}

impl TableContext {
    pub fn from_rows(rows: Vec<DescriptorRow>) -> Self {
        Self {
            has_format: rows.iter().any(|r| r.format.is_some()),
            has_optional: rows.iter().any(|r| r.optional),
            has_description: rows.iter().any(|r| !r.description.is_empty()),
            rows,
        }
    }

    /// Table of declared descriptors only.
    pub fn declared(descriptors: &[Descriptor]) -> Self {
        Self::from_rows(descriptors.iter().map(DescriptorRow::declared).collect())
    }

    fn into_built(self) -> Built<Self> {
        let is_empty = self.rows.is_empty();
        Built {
            context: self,
            is_empty,
        }
    }
}

/// How inferred names are compared with declared ones.
#[derive(Clone, Copy)]
enum Names {
    Exact,
    IgnoreCase,
}

impl Names {
    fn eq(self, a: &str, b: &str) -> bool {
        match self {
            Self::Exact => a == b,
            Self::IgnoreCase => a.eq_ignore_ascii_case(b),
        }
    }
}

fn merge(
    declared: &[Descriptor],
    inferred: impl IntoIterator<Item = (String, FieldType)>,
    names: Names,
) -> TableContext {
    let mut rows: Vec<DescriptorRow> = declared.iter().map(DescriptorRow::declared).collect();
    for (name, field_type) in inferred {
        if !rows.iter().any(|r| names.eq(&r.name, &name)) {
            rows.push(DescriptorRow::inferred(name, field_type));
        }
    }
    TableContext::from_rows(rows)
}

fn body_keys(body: &Value) -> Vec<(String, FieldType)> {
    match body {
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| (k.clone(), FieldType::of_value(v)))
            .collect(),
        _ => Vec::new(),
    }
}

fn strings(names: impl IntoIterator<Item = String>) -> impl Iterator<Item = (String, FieldType)> {
    names.into_iter().map(|n| (n, FieldType::String))
}

/// Path parameters cannot be recovered from a concrete URL, so only
/// declared ones are listed.
pub(super) fn path_parameters(snapshot: &DocumentSnapshot) -> Built<TableContext> {
    TableContext::declared(&snapshot.parameters.path).into_built()
}

pub(super) fn query_parameters(snapshot: &DocumentSnapshot) -> Built<TableContext> {
    let names = snapshot.http.query.iter().map(|(name, _)| name.clone());
    merge(&snapshot.parameters.query, strings(names), Names::Exact).into_built()
}

pub(super) fn form_parameters(snapshot: &DocumentSnapshot) -> Built<TableContext> {
    let names: Vec<String> = if is_form_request(&snapshot.http) {
        form_pairs(&snapshot.http.request_body)
            .into_iter()
            .map(|(name, _)| name)
            .collect()
    } else {
        Vec::new()
    };
    merge(&snapshot.parameters.form, strings(names), Names::Exact).into_built()
}

pub(super) fn request_headers(snapshot: &DocumentSnapshot) -> Built<TableContext> {
    let names = snapshot
        .http
        .request_headers
        .iter()
        .filter(|(name, _)| !name.eq_ignore_ascii_case("cookie"))
        .map(|(name, _)| name.to_owned());
    merge(&snapshot.headers.request, strings(names), Names::IgnoreCase).into_built()
}

pub(super) fn response_headers(snapshot: &DocumentSnapshot) -> Built<TableContext> {
    let names = snapshot
        .http
        .response_headers
        .iter()
        .filter(|(name, _)| !name.eq_ignore_ascii_case("set-cookie"))
        .map(|(name, _)| name.to_owned());
    merge(&snapshot.headers.response, strings(names), Names::IgnoreCase).into_built()
}

/// A form-encoded request body documents form parameters, not fields.
pub(super) fn request_fields(snapshot: &DocumentSnapshot) -> Built<TableContext> {
    let inferred = if is_form_request(&snapshot.http) {
        Vec::new()
    } else {
        body_keys(&snapshot.http.request_body)
    };
    merge(&snapshot.fields.request, inferred, Names::Exact).into_built()
}

pub(super) fn response_fields(snapshot: &DocumentSnapshot) -> Built<TableContext> {
    let inferred = body_keys(&snapshot.http.response_body);
    merge(&snapshot.fields.response, inferred, Names::Exact).into_built()
}

pub(super) fn request_cookies(snapshot: &DocumentSnapshot) -> Built<TableContext> {
    let names = snapshot
        .http
        .request_cookies
        .as_deref()
        .map(parse_cookie_header)
        .unwrap_or_default()
        .into_iter()
        .map(|(name, _)| name);
    merge(&snapshot.cookies.request, strings(names), Names::Exact).into_built()
}

pub(super) fn response_cookies(snapshot: &DocumentSnapshot) -> Built<TableContext> {
    let names = snapshot
        .http
        .response_cookies
        .iter()
        .filter_map(|line| parse_set_cookie(line))
        .map(|(name, _)| name);
    merge(&snapshot.cookies.response, strings(names), Names::Exact).into_built()
}
