//! API documentation from recorded HTTP test exchanges.
//!
//! A test records an exchange, registers descriptors for the parts it wants
//! documented, and calls [`DocBuilder::doc`]. The exchange is extracted,
//! assembled with the descriptors into a snapshot, checked against the
//! declared fields, and rendered into one artifact per non-empty topic.
//!
//! ```no_run
//! use apidoc::{Config, Documenter, RawExchange, field, path_parameter};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load(None, None)?;
//! let documenter = Documenter::new(&config)?;
//!
//! let exchange: RawExchange = serde_json::from_str(
//!     r#"{"request": {"method": "GET", "url": "/users/42"},
//!         "response": {"statusCode": 200, "body": {"id": 42}}}"#,
//! )?;
//! documenter
//!     .builder(&exchange)
//!     .with_path_parameters([path_parameter("userId")])
//!     .with_response_fields([field("id").integer()])
//!     .doc("user-get")?;
//! # Ok(())
//! # }
//! ```

mod builder;
mod documenter;
mod error;

pub use builder::DocBuilder;
pub use documenter::Documenter;
pub use error::DocError;

pub use apidoc_config::{Config, ConfigError, DirectoryStructure, Overrides};
pub use apidoc_descriptor::{
    ContractError, Descriptor, DescriptorBuilder, DescriptorError, DescriptorInput,
    DescriptorInputs, DescriptorKind, FieldType, PartialDescriptor, ValidationError, cookie, field,
    form_parameter, header, normalize, part, path_parameter, query_parameter,
};
pub use apidoc_render::Topic;
pub use apidoc_snapshot::{Exchange, RawExchange, RawRequest, RawResponse, Registrations};
