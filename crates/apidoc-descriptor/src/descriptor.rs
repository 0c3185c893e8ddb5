//! Canonical descriptor records and the fluent builder that produces them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{DescriptorError, FieldType};

/// Where in an HTTP message a descriptor applies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DescriptorKind {
    Path,
    Query,
    Form,
    Header,
    Cookie,
    Part,
    Field,
}

impl DescriptorKind {
    /// Lowercase kind name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Path => "path",
            Self::Query => "query",
            Self::Form => "form",
            Self::Header => "header",
            Self::Cookie => "cookie",
            Self::Part => "part",
            Self::Field => "field",
        }
    }

    /// Whether a descriptor of this kind may declare `field_type`.
    pub fn allows(self, field_type: FieldType) -> bool {
        match self {
            Self::Part => field_type == FieldType::String,
            Self::Path => !matches!(
                field_type,
                FieldType::Object | FieldType::Array | FieldType::Null
            ),
            _ => true,
        }
    }
}

impl fmt::Display for DescriptorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// A declared, typed, named unit of an HTTP message.
///
/// Only obtainable through [`DescriptorBuilder::build`] or normalization, so
/// every instance satisfies the kind/type/format invariants. Serializes
/// `optional` only when it is `true`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Descriptor {
    kind: DescriptorKind,
    name: String,
    #[serde(rename = "type")]
    field_type: FieldType,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<String>,
    description: String,
    #[serde(skip_serializing_if = "is_false")]
    optional: bool,
}

impl Descriptor {
    /// Start a builder for `kind` named `name`.
    pub fn builder(kind: DescriptorKind, name: impl Into<String>) -> DescriptorBuilder {
        DescriptorBuilder::new(kind).name(name)
    }

    pub fn kind(&self) -> DescriptorKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    pub fn format(&self) -> Option<&str> {
        self.format.as_deref()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// Rebuild this descriptor as a builder, e.g. to re-register it elsewhere.
    pub fn to_builder(&self) -> DescriptorBuilder {
        DescriptorBuilder {
            kind: self.kind,
            name: Some(self.name.clone()),
            field_type: Some(self.field_type),
            format: self.format.clone(),
            description: Some(self.description.clone()),
            optional: self.optional,
        }
    }
}

/// Fluent builder for a [`Descriptor`].
///
/// Each setter consumes and returns the builder. Required attributes are
/// checked once, in [`build`](Self::build).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DescriptorBuilder {
    kind: DescriptorKind,
    name: Option<String>,
    field_type: Option<FieldType>,
    format: Option<String>,
    description: Option<String>,
    optional: bool,
}

impl DescriptorBuilder {
    /// Create an empty builder for `kind`.
    pub fn new(kind: DescriptorKind) -> Self {
        Self {
            kind,
            name: None,
            field_type: None,
            format: None,
            description: None,
            optional: false,
        }
    }

    /// Kind this builder produces.
    pub fn kind(&self) -> DescriptorKind {
        self.kind
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn field_type(mut self, field_type: FieldType) -> Self {
        self.field_type = Some(field_type);
        self
    }

    #[must_use]
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Mark the described value as possibly absent.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Shorthand for `field_type(FieldType::String)`.
    #[must_use]
    pub fn string(self) -> Self {
        self.field_type(FieldType::String)
    }

    /// Shorthand for `field_type(FieldType::Number)`.
    #[must_use]
    pub fn number(self) -> Self {
        self.field_type(FieldType::Number)
    }

    /// Shorthand for `field_type(FieldType::Integer)`.
    #[must_use]
    pub fn integer(self) -> Self {
        self.field_type(FieldType::Integer)
    }

    /// Shorthand for `field_type(FieldType::Boolean)`.
    #[must_use]
    pub fn boolean(self) -> Self {
        self.field_type(FieldType::Boolean)
    }

    /// Shorthand for `field_type(FieldType::Object)`.
    #[must_use]
    pub fn object(self) -> Self {
        self.field_type(FieldType::Object)
    }

    /// Shorthand for `field_type(FieldType::Array)`.
    #[must_use]
    pub fn array(self) -> Self {
        self.field_type(FieldType::Array)
    }

    /// Validate and produce the descriptor.
    ///
    /// Fills `type = string` and `description = ""` when unset.
    pub fn build(self) -> Result<Descriptor, DescriptorError> {
        let kind = self.kind;
        let name = match self.name {
            Some(name) if !name.is_empty() => name,
            _ => return Err(DescriptorError::MissingName { kind }),
        };
        let field_type = self.field_type.unwrap_or_default();

        if !kind.allows(field_type) {
            return Err(DescriptorError::TypeNotAllowed {
                kind,
                name,
                field_type,
            });
        }
        if let Some(format) = &self.format
            && !field_type.supports_format(format)
        {
            return Err(DescriptorError::UnsupportedFormat {
                kind,
                name,
                field_type,
                format: format.clone(),
            });
        }

        Ok(Descriptor {
            kind,
            name,
            field_type,
            format: self.format,
            description: self.description.unwrap_or_default(),
            optional: self.optional,
        })
    }
}

/// Builder for a path parameter.
pub fn path_parameter(name: impl Into<String>) -> DescriptorBuilder {
    Descriptor::builder(DescriptorKind::Path, name)
}

/// Builder for a query parameter.
pub fn query_parameter(name: impl Into<String>) -> DescriptorBuilder {
    Descriptor::builder(DescriptorKind::Query, name)
}

/// Builder for a form parameter.
pub fn form_parameter(name: impl Into<String>) -> DescriptorBuilder {
    Descriptor::builder(DescriptorKind::Form, name)
}

/// Builder for a header.
pub fn header(name: impl Into<String>) -> DescriptorBuilder {
    Descriptor::builder(DescriptorKind::Header, name)
}

/// Builder for a cookie.
pub fn cookie(name: impl Into<String>) -> DescriptorBuilder {
    Descriptor::builder(DescriptorKind::Cookie, name)
}

/// Builder for a multipart request part.
pub fn part(name: impl Into<String>) -> DescriptorBuilder {
    Descriptor::builder(DescriptorKind::Part, name)
}

/// Builder for a body field.
pub fn field(name: impl Into<String>) -> DescriptorBuilder {
    Descriptor::builder(DescriptorKind::Field, name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_build_fills_defaults() {
        let descriptor = path_parameter("userId").build().unwrap();
        assert_eq!(descriptor.kind(), DescriptorKind::Path);
        assert_eq!(descriptor.name(), "userId");
        assert_eq!(descriptor.field_type(), FieldType::String);
        assert_eq!(descriptor.description(), "");
        assert_eq!(descriptor.format(), None);
        assert!(!descriptor.is_optional());
    }

    #[test]
    fn test_build_requires_name() {
        let err = DescriptorBuilder::new(DescriptorKind::Field).build().unwrap_err();
        assert_eq!(
            err,
            DescriptorError::MissingName {
                kind: DescriptorKind::Field
            }
        );
        assert!(field("").build().is_err());
    }

    #[test]
    fn test_build_rejects_format_for_wrong_type() {
        let err = field("count").integer().format("uuid").build().unwrap_err();
        assert!(matches!(err, DescriptorError::UnsupportedFormat { .. }));
        assert!(err.to_string().contains("uuid"));
    }

    #[test]
    fn test_path_parameter_cannot_be_object() {
        let err = path_parameter("id").object().build().unwrap_err();
        assert!(matches!(err, DescriptorError::TypeNotAllowed { .. }));
    }

    #[test]
    fn test_part_must_be_string() {
        assert!(part("file").build().is_ok());
        assert!(part("file").number().build().is_err());
    }

    #[test]
    fn test_serialize_omits_optional_when_false() {
        let required = field("id").integer().format("int64").build().unwrap();
        let json = serde_json::to_value(&required).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "kind": "field",
                "name": "id",
                "type": "integer",
                "format": "int64",
                "description": ""
            })
        );

        let optional = field("note").optional().build().unwrap();
        let json = serde_json::to_value(&optional).unwrap();
        assert_eq!(json["optional"], serde_json::json!(true));
    }

    #[test]
    fn test_to_builder_round_trips() {
        let original = header("X-Request-Id")
            .format("uuid")
            .description("Correlation id")
            .optional()
            .build()
            .unwrap();
        assert_eq!(original.to_builder().build().unwrap(), original);
    }
}
