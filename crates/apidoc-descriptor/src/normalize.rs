//! Reduction of author-supplied descriptor input to canonical [`Descriptor`]s.
//!
//! Authors may register descriptors as builders, as plain partial records,
//! or as a map keyed by name. [`DescriptorInput`] makes the builder/record
//! distinction explicit, and [`normalize`] turns either shape into a list.

use serde::{Deserialize, Deserializer, de::Error as _};
use serde_json::Value;

use crate::{Descriptor, DescriptorBuilder, DescriptorError, DescriptorKind, FieldType};

/// A descriptor given as a plain record with any attribute left out.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct PartialDescriptor {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub field_type: Option<FieldType>,
    pub format: Option<String>,
    pub description: Option<String>,
    pub optional: Option<bool>,
}

impl PartialDescriptor {
    /// A record carrying only a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    fn into_builder(self, kind: DescriptorKind) -> DescriptorBuilder {
        let mut builder = DescriptorBuilder::new(kind);
        if let Some(name) = self.name {
            builder = builder.name(name);
        }
        if let Some(field_type) = self.field_type {
            builder = builder.field_type(field_type);
        }
        if let Some(format) = self.format {
            builder = builder.format(format);
        }
        if let Some(description) = self.description {
            builder = builder.description(description);
        }
        if self.optional == Some(true) {
            builder = builder.optional();
        }
        builder
    }
}

/// One entry of a descriptor list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DescriptorInput {
    /// Resolved by calling [`DescriptorBuilder::build`].
    Builder(DescriptorBuilder),
    /// Defaults filled for every missing attribute.
    Partial(PartialDescriptor),
}

impl From<DescriptorBuilder> for DescriptorInput {
    fn from(builder: DescriptorBuilder) -> Self {
        Self::Builder(builder)
    }
}

impl From<PartialDescriptor> for DescriptorInput {
    fn from(partial: PartialDescriptor) -> Self {
        Self::Partial(partial)
    }
}

impl From<Descriptor> for DescriptorInput {
    fn from(descriptor: Descriptor) -> Self {
        Self::Builder(descriptor.to_builder())
    }
}

/// Descriptor input in one of the accepted shapes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum DescriptorInputs {
    /// Mixed builders and partial records.
    List(Vec<DescriptorInput>),
    /// Partial records keyed by name, in insertion order.
    Map(Vec<(String, PartialDescriptor)>),
    #[default]
    Empty,
}

impl DescriptorInputs {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::List(items) => items.is_empty(),
            Self::Map(entries) => entries.is_empty(),
            Self::Empty => true,
        }
    }
}

impl<T: Into<DescriptorInput>> From<Vec<T>> for DescriptorInputs {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<DescriptorInput>, const N: usize> From<[T; N]> for DescriptorInputs {
    fn from(items: [T; N]) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

impl<K: Into<String>> FromIterator<(K, PartialDescriptor)> for DescriptorInputs {
    fn from_iter<I: IntoIterator<Item = (K, PartialDescriptor)>>(iter: I) -> Self {
        Self::Map(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl<'de> Deserialize<'de> for DescriptorInputs {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            List(Vec<PartialDescriptor>),
            Map(serde_json::Map<String, Value>),
        }

        match Raw::deserialize(deserializer)? {
            Raw::List(items) => Ok(items.into()),
            Raw::Map(map) => map
                .into_iter()
                .map(|(name, value)| {
                    serde_json::from_value::<PartialDescriptor>(value)
                        .map(|partial| (name.clone(), partial))
                        .map_err(|e| D::Error::custom(format!("descriptor `{name}`: {e}")))
                })
                .collect::<Result<Vec<_>, _>>()
                .map(DescriptorInputs::Map),
        }
    }
}

/// Normalize `inputs` into canonical descriptors of `kind`.
///
/// Missing `type` becomes `string`, missing `description` becomes `""`, and
/// `optional` is only set when explicitly true. Map keys supply the name.
/// Duplicate names are kept as given.
pub fn normalize(
    kind: DescriptorKind,
    inputs: DescriptorInputs,
) -> Result<Vec<Descriptor>, DescriptorError> {
    match inputs {
        DescriptorInputs::Empty => Ok(Vec::new()),
        DescriptorInputs::List(items) => items
            .into_iter()
            .map(|input| normalize_one(kind, input))
            .collect(),
        DescriptorInputs::Map(entries) => entries
            .into_iter()
            .map(|(name, partial)| {
                PartialDescriptor {
                    name: Some(name),
                    ..partial
                }
                .into_builder(kind)
                .build()
            })
            .collect(),
    }
}

fn normalize_one(kind: DescriptorKind, input: DescriptorInput) -> Result<Descriptor, DescriptorError> {
    match input {
        DescriptorInput::Builder(builder) if builder.kind() != kind => {
            let descriptor = builder.build()?;
            Err(DescriptorError::KindMismatch {
                name: descriptor.name().to_owned(),
                built: descriptor.kind(),
                expected: kind,
            })
        }
        DescriptorInput::Builder(builder) => builder.build(),
        DescriptorInput::Partial(partial) => partial.into_builder(kind).build(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{field, header, path_parameter};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_input_yields_empty_list() {
        assert_eq!(normalize(DescriptorKind::Field, DescriptorInputs::Empty), Ok(vec![]));
        assert_eq!(
            normalize(DescriptorKind::Field, DescriptorInputs::List(vec![])),
            Ok(vec![])
        );
        assert_eq!(
            normalize(DescriptorKind::Field, DescriptorInputs::Map(vec![])),
            Ok(vec![])
        );
    }

    #[test]
    fn test_name_only_partial_gets_defaults() {
        let descriptors = normalize(
            DescriptorKind::Query,
            vec![PartialDescriptor::named("page")].into(),
        )
        .unwrap();
        assert_eq!(descriptors.len(), 1);
        let json = serde_json::to_value(&descriptors[0]).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "kind": "query",
                "name": "page",
                "type": "string",
                "description": ""
            })
        );
    }

    #[test]
    fn test_explicit_false_optional_is_omitted() {
        let partial = PartialDescriptor {
            optional: Some(false),
            ..PartialDescriptor::named("page")
        };
        let descriptors = normalize(DescriptorKind::Query, vec![partial].into()).unwrap();
        let json = serde_json::to_value(&descriptors[0]).unwrap();
        assert!(json.get("optional").is_none());
    }

    #[test]
    fn test_mixed_list_preserves_order() {
        let inputs = DescriptorInputs::List(vec![
            field("id").integer().into(),
            PartialDescriptor::named("name").into(),
            field("tags").array().optional().into(),
        ]);
        let descriptors = normalize(DescriptorKind::Field, inputs).unwrap();
        let names: Vec<_> = descriptors.iter().map(Descriptor::name).collect();
        assert_eq!(names, vec!["id", "name", "tags"]);
        assert_eq!(descriptors[0].field_type(), FieldType::Integer);
        assert!(descriptors[2].is_optional());
    }

    #[test]
    fn test_map_keys_supply_names() {
        let inputs: DescriptorInputs = [
            (
                "userId",
                PartialDescriptor {
                    field_type: Some(FieldType::Integer),
                    ..PartialDescriptor::default()
                },
            ),
            ("slug", PartialDescriptor::default()),
        ]
        .into_iter()
        .collect();
        let descriptors = normalize(DescriptorKind::Path, inputs).unwrap();
        assert_eq!(descriptors[0].name(), "userId");
        assert_eq!(descriptors[0].field_type(), FieldType::Integer);
        assert_eq!(descriptors[1].name(), "slug");
        assert_eq!(descriptors[1].field_type(), FieldType::String);
    }

    #[test]
    fn test_normalizing_canonical_descriptors_is_identity() {
        let canonical = vec![
            field("id").integer().format("int64").description("Id").build().unwrap(),
            field("email").format("email").optional().build().unwrap(),
        ];
        let again = normalize(DescriptorKind::Field, canonical.clone().into()).unwrap();
        assert_eq!(again, canonical);
    }

    #[test]
    fn test_duplicates_are_not_collapsed() {
        let inputs = DescriptorInputs::from(vec![field("id"), field("id").integer()]);
        let descriptors = normalize(DescriptorKind::Field, inputs).unwrap();
        assert_eq!(descriptors.len(), 2);
    }

    #[test]
    fn test_builder_of_other_kind_is_rejected() {
        let err = normalize(DescriptorKind::Path, vec![header("Accept")].into()).unwrap_err();
        assert_eq!(
            err,
            DescriptorError::KindMismatch {
                name: "Accept".to_owned(),
                built: DescriptorKind::Header,
                expected: DescriptorKind::Path,
            }
        );
    }

    #[test]
    fn test_invalid_partial_surfaces_error() {
        let partial = PartialDescriptor {
            field_type: Some(FieldType::Array),
            ..PartialDescriptor::named("ids")
        };
        assert!(normalize(DescriptorKind::Path, vec![partial].into()).is_err());
        assert!(normalize(DescriptorKind::Path, vec![path_parameter("ok")].into()).is_ok());
    }

    #[test]
    fn test_deserialize_list_and_map() {
        let list: DescriptorInputs =
            serde_json::from_str(r#"[{"name": "id", "type": "integer"}]"#).unwrap();
        assert_eq!(
            list,
            DescriptorInputs::List(vec![DescriptorInput::Partial(PartialDescriptor {
                field_type: Some(FieldType::Integer),
                ..PartialDescriptor::named("id")
            })])
        );

        let map: DescriptorInputs = serde_json::from_str(
            r#"{"zeta": {"type": "boolean"}, "alpha": {"optional": true}}"#,
        )
        .unwrap();
        let descriptors = normalize(DescriptorKind::Field, map).unwrap();
        let names: Vec<_> = descriptors.iter().map(Descriptor::name).collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
        assert!(descriptors[1].is_optional());
    }
}
