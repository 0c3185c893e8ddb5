//! Declared value types and their legal formats.
//!
//! [`FieldType`] is the single source for both naming a runtime JSON value
//! ([`FieldType::of_value`]) and testing a value against a declaration
//! ([`FieldType::matches`]), so error messages and checks never disagree.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Type of a described value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    #[default]
    String,
    Number,
    Integer,
    Boolean,
    Object,
    Array,
    Null,
}

const STRING_FORMATS: &[&str] = &[
    "date",
    "date-time",
    "time",
    "duration",
    "email",
    "hostname",
    "ipv4",
    "ipv6",
    "uri",
    "uuid",
    "byte",
    "binary",
    "password",
];
const NUMBER_FORMATS: &[&str] = &["float", "double"];
const INTEGER_FORMATS: &[&str] = &["int32", "int64"];

impl FieldType {
    /// Every type, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::String,
        Self::Number,
        Self::Integer,
        Self::Boolean,
        Self::Object,
        Self::Array,
        Self::Null,
    ];

    /// Lowercase type name as written in descriptors.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::Array => "array",
            Self::Null => "null",
        }
    }

    /// Formats that may refine this type.
    pub fn formats(self) -> &'static [&'static str] {
        match self {
            Self::String => STRING_FORMATS,
            Self::Number => NUMBER_FORMATS,
            Self::Integer => INTEGER_FORMATS,
            Self::Boolean | Self::Object | Self::Array | Self::Null => &[],
        }
    }

    /// Whether `format` is a legal refinement of this type.
    pub fn supports_format(self, format: &str) -> bool {
        self.formats().contains(&format)
    }

    /// Canonical type name of a runtime value.
    ///
    /// Whole numbers are named `integer`; every other number is `number`.
    pub fn of_value(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Boolean,
            Value::Number(n) if n.is_i64() || n.is_u64() => Self::Integer,
            Value::Number(_) => Self::Number,
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
        }
    }

    /// Whether a runtime value satisfies this declared type.
    ///
    /// `None` stands for an absent value, which only `null` accepts.
    pub fn matches(self, value: Option<&Value>) -> bool {
        let Some(value) = value else {
            return self == Self::Null;
        };
        match self {
            Self::Number => value.is_number(),
            Self::Integer => match value {
                Value::Number(n) => {
                    n.is_i64() || n.is_u64() || n.as_f64().is_some_and(|f| f.fract() == 0.0)
                }
                _ => false,
            },
            other => Self::of_value(value) == other,
        }
    }

    /// Name of a possibly absent runtime value, for error messages.
    pub fn describe(value: Option<&Value>) -> &'static str {
        value.map_or("undefined", |v| Self::of_value(v).as_str())
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown type name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown type `{0}`, expected one of: string, number, integer, boolean, object, array, null")]
pub struct UnknownFieldType(pub String);

impl FromStr for FieldType {
    type Err = UnknownFieldType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownFieldType(s.to_owned()))
    }
}
