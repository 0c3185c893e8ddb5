//! Recorded exchange files.
//!
//! A file holds one exchange in the harness shape plus the descriptors to
//! document it with:
//!
//! ```json
//! {
//!   "identifier": "user-get",
//!   "request": { "method": "GET", "url": "/users/42" },
//!   "response": { "statusCode": 200, "body": { "id": 42 } },
//!   "descriptors": {
//!     "path_parameters": { "userId": { "description": "User id" } },
//!     "response_fields": [ { "name": "id", "type": "integer" } ]
//!   }
//! }
//! ```
//!
//! Without `identifier`, the file stem is used.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use apidoc::{
    DescriptorError, DescriptorInputs, DescriptorKind, RawExchange, Registrations, normalize,
};
use serde::Deserialize;
use serde_json::Value;

use crate::error::CliError;

/// Descriptor inputs for every registration slot.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct DescriptorSet {
    path_parameters: DescriptorInputs,
    query_parameters: DescriptorInputs,
    form_parameters: DescriptorInputs,
    request_fields: DescriptorInputs,
    response_fields: DescriptorInputs,
    request_headers: DescriptorInputs,
    response_headers: DescriptorInputs,
    request_cookies: DescriptorInputs,
    response_cookies: DescriptorInputs,
    request_parts: DescriptorInputs,
    part_fields: BTreeMap<String, DescriptorInputs>,
    part_bodies: BTreeMap<String, Value>,
}

impl DescriptorSet {
    fn into_registrations(self) -> Result<Registrations, DescriptorError> {
        Ok(Registrations {
            path_parameters: normalize(DescriptorKind::Path, self.path_parameters)?,
            query_parameters: normalize(DescriptorKind::Query, self.query_parameters)?,
            form_parameters: normalize(DescriptorKind::Form, self.form_parameters)?,
            request_fields: normalize(DescriptorKind::Field, self.request_fields)?,
            response_fields: normalize(DescriptorKind::Field, self.response_fields)?,
            request_headers: normalize(DescriptorKind::Header, self.request_headers)?,
            response_headers: normalize(DescriptorKind::Header, self.response_headers)?,
            request_cookies: normalize(DescriptorKind::Cookie, self.request_cookies)?,
            response_cookies: normalize(DescriptorKind::Cookie, self.response_cookies)?,
            request_parts: normalize(DescriptorKind::Part, self.request_parts)?,
            part_fields: self
                .part_fields
                .into_iter()
                .map(|(part, inputs)| Ok((part, normalize(DescriptorKind::Field, inputs)?)))
                .collect::<Result<_, DescriptorError>>()?,
            part_bodies: self.part_bodies,
        })
    }
}

#[derive(Debug, Deserialize)]
struct RawExchangeFile {
    identifier: Option<String>,
    #[serde(flatten)]
    exchange: RawExchange,
    #[serde(default)]
    descriptors: DescriptorSet,
}

/// A loaded exchange file with its descriptors normalized.
#[derive(Debug)]
pub(crate) struct ExchangeFile {
    pub path: PathBuf,
    pub identifier: String,
    pub exchange: RawExchange,
    pub registrations: Registrations,
}

impl ExchangeFile {
    pub(crate) fn load(path: &Path) -> Result<Self, CliError> {
        tracing::debug!(path = %path.display(), "Loading exchange file");
        let content = std::fs::read_to_string(path).map_err(|source| CliError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &content)
    }

    fn parse(path: &Path, content: &str) -> Result<Self, CliError> {
        let raw: RawExchangeFile =
            serde_json::from_str(content).map_err(|source| CliError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        let registrations =
            raw.descriptors
                .into_registrations()
                .map_err(|source| CliError::Descriptor {
                    path: path.to_path_buf(),
                    source,
                })?;
        let identifier = raw.identifier.unwrap_or_else(|| {
            path.file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default()
        });

        Ok(Self {
            path: path.to_path_buf(),
            identifier,
            exchange: raw.exchange,
            registrations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apidoc::FieldType;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_full_file() {
        let file = ExchangeFile::parse(
            Path::new("exchanges/users-get.json"),
            r#"{
                "request": {"method": "GET", "url": "/users/42", "headers": {"Accept": "application/json"}},
                "response": {"statusCode": 200, "body": {"id": 42}},
                "descriptors": {
                    "path_parameters": {"userId": {"description": "User id"}},
                    "response_fields": [{"name": "id", "type": "integer"}],
                    "request_parts": [{"name": "file"}],
                    "part_fields": {"metadata": [{"name": "title"}]},
                    "part_bodies": {"metadata": {"title": "Q3"}}
                }
            }"#,
        )
        .unwrap();

        assert_eq!(file.identifier, "users-get");
        assert_eq!(file.exchange.request.method.as_deref(), Some("GET"));
        assert_eq!(file.exchange.response.status_code, Some(200));
        assert_eq!(file.registrations.path_parameters[0].name(), "userId");
        assert_eq!(file.registrations.path_parameters[0].description(), "User id");
        assert_eq!(
            file.registrations.response_fields[0].field_type(),
            FieldType::Integer
        );
        assert_eq!(file.registrations.part_fields["metadata"].len(), 1);
        assert!(file.registrations.request_headers.is_empty());
    }

    #[test]
    fn test_load_reads_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("ping.json");
        std::fs::write(&path, r#"{"request": {"method": "GET", "url": "/ping"}}"#).unwrap();

        let file = ExchangeFile::load(&path).unwrap();
        assert_eq!(file.identifier, "ping");
        assert_eq!(file.path, path);

        let err = ExchangeFile::load(&tmp.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, CliError::Read { .. }));
    }

    #[test]
    fn test_identifier_overrides_file_stem() {
        let file = ExchangeFile::parse(
            Path::new("a.json"),
            r#"{"identifier": "orders-create", "request": {"method": "POST", "url": "/orders"}}"#,
        )
        .unwrap();
        assert_eq!(file.identifier, "orders-create");
    }

    #[test]
    fn test_invalid_descriptor_names_file() {
        let err = ExchangeFile::parse(
            Path::new("bad.json"),
            r#"{"request": {}, "descriptors": {"path_parameters": [{"name": "id", "type": "object"}]}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, CliError::Descriptor { .. }));
        assert!(err.to_string().starts_with("bad.json: "));
    }

    #[test]
    fn test_unknown_descriptor_slot_rejected() {
        let err = ExchangeFile::parse(
            Path::new("bad.json"),
            r#"{"request": {}, "descriptors": {"body_fields": []}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, CliError::Parse { .. }));
    }
}
