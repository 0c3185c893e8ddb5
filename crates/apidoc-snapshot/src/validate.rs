//! Strict contract validation of bodies against field descriptors.
//!
//! Checks never stop at the first problem: every mismatch in a body is
//! collected into one [`ValidationError`].

use apidoc_descriptor::{ContractError, Descriptor, FieldType, ValidationError};
use rayon::prelude::*;
use serde_json::{Map, Value};

use crate::DocumentSnapshot;

/// Check `actual` against `fields`.
///
/// A body that is not a JSON object fails immediately with a single
/// `InvalidType`. Otherwise undeclared keys produce one `UnexpectedField`
/// and each declared field is checked independently; errors keep
/// declaration order.
pub fn check(context: &str, actual: &Value, fields: &[Descriptor]) -> Result<(), ValidationError> {
    let Value::Object(body) = actual else {
        let error = ContractError::invalid_type(
            context,
            "body",
            FieldType::Object.as_str(),
            FieldType::of_value(actual).as_str(),
        );
        return Err(ValidationError::single(context, error));
    };

    let mut errors = Vec::new();

    let unexpected: Vec<String> = body
        .keys()
        .filter(|key| !fields.iter().any(|f| f.name() == key.as_str()))
        .cloned()
        .collect();
    if !unexpected.is_empty() {
        errors.push(ContractError::unexpected_fields(context, unexpected));
    }

    let field_errors: Vec<Option<ContractError>> = fields
        .par_iter()
        .map(|field| check_field(context, body, field))
        .collect();
    errors.extend(field_errors.into_iter().flatten());

    match ValidationError::from_errors(context, errors) {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

/// Check both bodies of a snapshot against their declared fields.
///
/// A side without declared fields is skipped. Errors from both sides are
/// merged into one aggregate labelled `context`.
pub fn check_snapshot(context: &str, snapshot: &DocumentSnapshot) -> Result<(), ValidationError> {
    let sides = [
        (
            "request body",
            &snapshot.http.request_body,
            &snapshot.fields.request,
        ),
        (
            "response body",
            &snapshot.http.response_body,
            &snapshot.fields.response,
        ),
    ];

    let errors: Vec<ContractError> = sides
        .into_iter()
        .filter(|(_, _, fields)| !fields.is_empty())
        .filter_map(|(label, body, fields)| check(label, body, fields).err())
        .flat_map(|error| error.errors().to_vec())
        .collect();

    match ValidationError::from_errors(context, errors) {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

fn check_field(context: &str, body: &Map<String, Value>, field: &Descriptor) -> Option<ContractError> {
    let value = body.get(field.name());
    match value {
        None if field.is_optional() => None,
        None => Some(ContractError::missing_field(context, field.name())),
        Some(_) if field.field_type().matches(value) => None,
        Some(_) => Some(ContractError::invalid_type(
            context,
            field.name(),
            field.field_type().as_str(),
            FieldType::describe(value),
        )),
    }
}
