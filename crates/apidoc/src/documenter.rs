//! The documentation pipeline.

use std::path::PathBuf;

use apidoc_config::{Config, DirectoryStructure};
use apidoc_render::{
    OutputLayout, Renderer, TemplateStore, Topic, TopicContext, Writer, build_context,
    validate_identifier,
};
use apidoc_snapshot::{
    DocumentSnapshot, ExtractOptions, RawExchange, Registrations, assemble, check_snapshot,
    extract_request, extract_response,
};
use rayon::prelude::*;
use url::Url;

use crate::DocError;

/// Turns recorded exchanges into documentation artifacts.
///
/// Built once from a [`Config`]; templates are resolved up front so a
/// missing template fails before any exchange is processed. Shared
/// read-only between concurrent [`Documenter::document`] calls.
pub struct Documenter {
    store: TemplateStore,
    renderer: Renderer,
    writer: Writer,
    options: ExtractOptions,
    strict: bool,
}

impl Documenter {
    /// # Errors
    ///
    /// Returns [`DocError::Template`] when a topic has no template for the
    /// configured format, or [`DocError::BaseUrl`] for an unparsable base URL.
    pub fn new(config: &Config) -> Result<Self, DocError> {
        let output = &config.output_resolved;
        let store = TemplateStore::load(output.extension(), output.templates_dir.as_deref())?;

        let base_url = Url::parse(&config.trace.base_url).map_err(|source| DocError::BaseUrl {
            url: config.trace.base_url.clone(),
            source,
        })?;

        let layout = match output.directory_structure {
            DirectoryStructure::Flat => OutputLayout::Flat,
            DirectoryStructure::Nested => OutputLayout::Nested,
        };

        tracing::debug!(
            dir = %output.dir.display(),
            format = %output.format,
            strict = config.validation.strict,
            "Documenter ready"
        );

        Ok(Self {
            writer: Writer::new(output.dir.clone(), layout, store.extension()),
            store,
            renderer: Renderer::new(),
            options: ExtractOptions {
                base_url: Some(base_url),
                default_method: config.trace.default_method.clone(),
            },
            strict: config.validation.strict,
        })
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Extract and assemble a snapshot without validating or rendering.
    ///
    /// # Errors
    ///
    /// Returns [`DocError::Contract`] when the request has no method or URL.
    pub fn snapshot(
        &self,
        exchange: &RawExchange,
        registrations: Registrations,
    ) -> Result<DocumentSnapshot, DocError> {
        let request = extract_request(&exchange.request, &self.options);
        let response = extract_response(&exchange.response);
        Ok(assemble(request, response, registrations)?)
    }

    /// Validate both bodies of an exchange against the declared fields,
    /// regardless of the strict setting.
    ///
    /// # Errors
    ///
    /// Returns [`DocError::Validation`] carrying every mismatch.
    pub fn check(
        &self,
        context: &str,
        exchange: &RawExchange,
        registrations: Registrations,
    ) -> Result<(), DocError> {
        let snapshot = self.snapshot(exchange, registrations)?;
        Ok(check_snapshot(context, &snapshot)?)
    }

    /// Run the whole pipeline for one exchange and return the written paths.
    ///
    /// Contract mismatches fail the call in strict mode and are logged as
    /// warnings otherwise. Topics with nothing to show produce no file.
    ///
    /// # Errors
    ///
    /// Returns the first structural error (invalid identifier, missing
    /// method or URL, render or write failure) or, in strict mode, the
    /// aggregated [`DocError::Validation`].
    pub fn document(
        &self,
        identifier: &str,
        exchange: &RawExchange,
        registrations: Registrations,
    ) -> Result<Vec<PathBuf>, DocError> {
        validate_identifier(identifier)?;
        let snapshot = self.snapshot(exchange, registrations)?;

        if let Err(error) = check_snapshot(identifier, &snapshot) {
            if self.strict {
                return Err(error.into());
            }
            tracing::warn!(identifier, violations = error.len(), "{error}");
        }

        let contexts: Vec<TopicContext> = Topic::ALL
            .par_iter()
            .map(|topic| build_context(*topic, &snapshot))
            .collect::<Result<_, _>>()?;

        let artifacts: Vec<(Topic, String)> = contexts
            .par_iter()
            .filter(|context| {
                if context.is_empty {
                    tracing::debug!(identifier, topic = %context.topic, "Skipping empty topic");
                }
                !context.is_empty
            })
            .map(|context| {
                let template = self.store.get(context.topic);
                self.renderer
                    .render(context.topic, template, &context.value)
                    .map(|text| (context.topic, text))
            })
            .collect::<Result<_, _>>()?;

        let written = self.writer.write(identifier, &artifacts)?;
        tracing::info!(
            identifier,
            artifacts = written.len(),
            dir = %self.writer.root().display(),
            "Documented exchange"
        );
        Ok(written)
    }
}
