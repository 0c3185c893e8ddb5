//! Documentation topics, contexts, templates and artifact writing.
//!
//! The pipeline's back half. For each [`Topic`], [`build_context`] turns a
//! document snapshot into a template context, [`Renderer`] renders it with
//! the body resolved by [`TemplateStore`], and [`Writer`] places the result
//! under the output root.
//!
//! ```
//! use std::path::PathBuf;
//! use apidoc_render::{OutputLayout, Topic, Writer};
//!
//! let writer = Writer::new(PathBuf::from("docs"), OutputLayout::Flat, "adoc");
//! let path = writer.output_path("orders-create", Topic::HttpResponse).unwrap();
//! assert_eq!(path, PathBuf::from("docs/orders-create-http-response.adoc"));
//! ```

pub mod context;
mod renderer;
mod template;
mod topic;
mod writer;

pub use context::{TopicContext, build_context};
pub use renderer::{RenderError, Renderer};
pub use template::{TemplateError, TemplateStore};
pub use topic::{Topic, UnknownTopic};
pub use writer::{OutputLayout, WriteError, Writer, validate_identifier};
