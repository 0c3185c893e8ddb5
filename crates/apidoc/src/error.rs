//! Pipeline error type.

use apidoc_config::ConfigError;
use apidoc_descriptor::{ContractError, DescriptorError, ValidationError};
use apidoc_render::{RenderError, TemplateError, WriteError};

/// Errors raised while documenting an exchange.
#[derive(Debug, thiserror::Error)]
pub enum DocError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid trace.base_url `{url}`: {source}")]
    BaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("invalid descriptor: {0}")]
    Descriptor(#[from] DescriptorError),

    #[error(transparent)]
    Contract(#[from] ContractError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Write(#[from] WriteError),
}
