//! Descriptor model for apidoc.
//!
//! A [`Descriptor`] declares one named, typed piece of an HTTP exchange: a
//! path/query/form parameter, a header, a cookie, a multipart part or a body
//! field. Authors produce descriptors with the fluent builders
//! ([`field`], [`path_parameter`], ...) or as [`PartialDescriptor`] records,
//! and [`normalize`] reduces either shape to canonical descriptors.
//!
//! # Example
//!
//! ```
//! use apidoc_descriptor::{DescriptorInputs, DescriptorKind, FieldType, field, normalize};
//!
//! let fields = normalize(
//!     DescriptorKind::Field,
//!     DescriptorInputs::from(vec![field("id").integer(), field("email").format("email")]),
//! )?;
//! assert_eq!(fields[0].field_type(), FieldType::Integer);
//! assert_eq!(fields[1].description(), "");
//! # Ok::<(), apidoc_descriptor::DescriptorError>(())
//! ```

mod descriptor;
mod error;
mod field_type;
mod normalize;

pub use descriptor::{
    Descriptor, DescriptorBuilder, DescriptorKind, cookie, field, form_parameter, header, part,
    path_parameter, query_parameter,
};
pub use error::{ContractError, DescriptorError, ValidationError};
pub use field_type::{FieldType, UnknownFieldType};
pub use normalize::{DescriptorInput, DescriptorInputs, PartialDescriptor, normalize};
