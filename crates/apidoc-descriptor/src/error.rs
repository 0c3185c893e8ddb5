//! Error types for descriptor input and contract checks.

use crate::{DescriptorKind, FieldType};

/// Error returned when author-supplied descriptor input is malformed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DescriptorError {
    /// Descriptor has no name.
    #[error("{kind} descriptor is missing a name")]
    MissingName {
        /// Kind of the nameless descriptor.
        kind: DescriptorKind,
    },
    /// Format is not legal for the declared type.
    #[error("{kind} descriptor `{name}`: format `{format}` is not valid for type `{field_type}`")]
    UnsupportedFormat {
        kind: DescriptorKind,
        name: String,
        field_type: FieldType,
        format: String,
    },
    /// Type is not allowed for this descriptor kind.
    #[error("{kind} descriptor `{name}` cannot have type `{field_type}`")]
    TypeNotAllowed {
        kind: DescriptorKind,
        name: String,
        field_type: FieldType,
    },
    /// A builder for one kind was registered as another.
    #[error("descriptor `{name}` was built as {built} but registered as {expected}")]
    KindMismatch {
        name: String,
        built: DescriptorKind,
        expected: DescriptorKind,
    },
}

/// A single contract violation.
///
/// Each variant carries the operation that raised it, a reason and a
/// remediation hint so the message is actionable on its own.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContractError {
    /// A required field, parameter or attribute is absent.
    #[error("{context}: {reason}. {suggestion}")]
    MissingField {
        context: String,
        field: String,
        reason: String,
        suggestion: String,
    },
    /// A value's runtime type differs from its declared type.
    #[error("{context}: {reason}. {suggestion}")]
    InvalidType {
        context: String,
        field: String,
        expected: String,
        actual: String,
        reason: String,
        suggestion: String,
    },
    /// A value contains keys with no descriptor.
    #[error("{context}: {reason}. {suggestion}")]
    UnexpectedField {
        context: String,
        fields: Vec<String>,
        reason: String,
        suggestion: String,
    },
}

impl ContractError {
    /// Required `field` is absent.
    pub fn missing_field(context: impl Into<String>, field: impl Into<String>) -> Self {
        let field = field.into();
        Self::MissingField {
            context: context.into(),
            reason: format!("required field `{field}` is missing"),
            suggestion: format!(
                "Add `{field}` to the payload or mark its descriptor as optional"
            ),
            field,
        }
    }

    /// `field` holds a value of type `actual` where `expected` was declared.
    pub fn invalid_type(
        context: impl Into<String>,
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        let field = field.into();
        let expected = expected.into();
        let actual = actual.into();
        Self::InvalidType {
            context: context.into(),
            reason: format!("field `{field}` expected type `{expected}` but got `{actual}`"),
            suggestion: format!(
                "Declare `{field}` as `{actual}` or fix the value to be `{expected}`"
            ),
            field,
            expected,
            actual,
        }
    }

    /// `fields` appear in the payload without descriptors.
    pub fn unexpected_fields(context: impl Into<String>, fields: Vec<String>) -> Self {
        let listed = fields
            .iter()
            .map(|f| format!("`{f}`"))
            .collect::<Vec<_>>()
            .join(", ");
        Self::UnexpectedField {
            context: context.into(),
            reason: format!("undocumented fields present: {listed}"),
            suggestion: "Add descriptors for these fields or remove them from the payload"
                .to_owned(),
            fields,
        }
    }

    /// Operation that raised the error.
    pub fn context(&self) -> &str {
        match self {
            Self::MissingField { context, .. }
            | Self::InvalidType { context, .. }
            | Self::UnexpectedField { context, .. } => context,
        }
    }

    /// Human-readable reason.
    pub fn reason(&self) -> &str {
        match self {
            Self::MissingField { reason, .. }
            | Self::InvalidType { reason, .. }
            | Self::UnexpectedField { reason, .. } => reason,
        }
    }

    /// Remediation hint.
    pub fn suggestion(&self) -> &str {
        match self {
            Self::MissingField { suggestion, .. }
            | Self::InvalidType { suggestion, .. }
            | Self::UnexpectedField { suggestion, .. } => suggestion,
        }
    }
}

/// Every contract violation found by one check pass.
///
/// Never empty when returned as an error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "{context}: {} contract violation(s){}",
    .errors.len(),
    .errors.iter().map(|e| format!("\n  - {e}")).collect::<String>()
)]
pub struct ValidationError {
    context: String,
    errors: Vec<ContractError>,
}

impl ValidationError {
    /// Wrap collected errors. Returns `None` when there is nothing to report.
    pub fn from_errors(context: impl Into<String>, errors: Vec<ContractError>) -> Option<Self> {
        if errors.is_empty() {
            return None;
        }
        Some(Self {
            context: context.into(),
            errors,
        })
    }

    /// Aggregate holding exactly one error.
    pub fn single(context: impl Into<String>, error: ContractError) -> Self {
        Self {
            context: context.into(),
            errors: vec![error],
        }
    }

    /// Operation that ran the check.
    pub fn context(&self) -> &str {
        &self.context
    }

    /// Collected errors in declaration order.
    pub fn errors(&self) -> &[ContractError] {
        &self.errors
    }

    /// Number of collected errors.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Always false for a constructed error.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Merge another aggregate into this one, keeping this context.
    #[must_use]
    pub fn merge(mut self, other: Self) -> Self {
        self.errors.extend(other.errors);
        self
    }
}
