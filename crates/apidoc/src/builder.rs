//! Fluent registration surface over [`Documenter`].

use apidoc_descriptor::{Descriptor, DescriptorError, DescriptorInputs, DescriptorKind, normalize};
use apidoc_snapshot::{Exchange, Registrations};
use serde_json::Value;

use crate::{DocError, Documenter};

/// Collects descriptors for one exchange, then documents it with
/// [`DocBuilder::doc`].
///
/// Inputs are normalized as they are registered; the first invalid
/// descriptor is reported by `doc`.
#[must_use = "nothing is documented until `doc` is called"]
pub struct DocBuilder<'a, E> {
    documenter: &'a Documenter,
    exchange: E,
    registrations: Registrations,
    error: Option<DescriptorError>,
}

impl<'a, E: Exchange> DocBuilder<'a, E> {
    pub(crate) fn new(documenter: &'a Documenter, exchange: E) -> Self {
        Self {
            documenter,
            exchange,
            registrations: Registrations::default(),
            error: None,
        }
    }

    fn register(
        mut self,
        kind: DescriptorKind,
        inputs: impl Into<DescriptorInputs>,
        slot: impl FnOnce(&mut Registrations) -> &mut Vec<Descriptor>,
    ) -> Self {
        if self.error.is_some() {
            return self;
        }
        match normalize(kind, inputs.into()) {
            Ok(descriptors) => slot(&mut self.registrations).extend(descriptors),
            Err(e) => self.error = Some(e),
        }
        self
    }

    pub fn with_path_parameters(self, inputs: impl Into<DescriptorInputs>) -> Self {
        self.register(DescriptorKind::Path, inputs, |r| &mut r.path_parameters)
    }

    pub fn with_query_parameters(self, inputs: impl Into<DescriptorInputs>) -> Self {
        self.register(DescriptorKind::Query, inputs, |r| &mut r.query_parameters)
    }

    /// Parameters of an `application/x-www-form-urlencoded` body.
    pub fn with_form_parameters(self, inputs: impl Into<DescriptorInputs>) -> Self {
        self.register(DescriptorKind::Form, inputs, |r| &mut r.form_parameters)
    }

    pub fn with_request_fields(self, inputs: impl Into<DescriptorInputs>) -> Self {
        self.register(DescriptorKind::Field, inputs, |r| &mut r.request_fields)
    }

    pub fn with_response_fields(self, inputs: impl Into<DescriptorInputs>) -> Self {
        self.register(DescriptorKind::Field, inputs, |r| &mut r.response_fields)
    }

    pub fn with_request_headers(self, inputs: impl Into<DescriptorInputs>) -> Self {
        self.register(DescriptorKind::Header, inputs, |r| &mut r.request_headers)
    }

    pub fn with_response_headers(self, inputs: impl Into<DescriptorInputs>) -> Self {
        self.register(DescriptorKind::Header, inputs, |r| &mut r.response_headers)
    }

    pub fn with_request_cookies(self, inputs: impl Into<DescriptorInputs>) -> Self {
        self.register(DescriptorKind::Cookie, inputs, |r| &mut r.request_cookies)
    }

    pub fn with_response_cookies(self, inputs: impl Into<DescriptorInputs>) -> Self {
        self.register(DescriptorKind::Cookie, inputs, |r| &mut r.response_cookies)
    }

    pub fn with_request_parts(self, inputs: impl Into<DescriptorInputs>) -> Self {
        self.register(DescriptorKind::Part, inputs, |r| &mut r.request_parts)
    }

    /// Fields of the JSON body carried by multipart part `part`.
    pub fn with_request_part_fields(
        self,
        part: impl Into<String>,
        inputs: impl Into<DescriptorInputs>,
    ) -> Self {
        let part = part.into();
        self.register(DescriptorKind::Field, inputs, move |r| {
            r.part_fields.entry(part).or_default()
        })
    }

    /// Example body shown for multipart part `part`.
    pub fn with_request_part_body(mut self, part: impl Into<String>, body: Value) -> Self {
        self.registrations.part_bodies.insert(part.into(), body);
        self
    }

    /// Document the exchange under `identifier` and hand it back unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`DocError::Descriptor`] for the first invalid registration,
    /// otherwise whatever [`Documenter::document`] returns.
    pub fn doc(self, identifier: &str) -> Result<E, DocError> {
        if let Some(error) = self.error {
            return Err(error.into());
        }
        let raw = self.exchange.raw_exchange();
        self.documenter
            .document(identifier, &raw, self.registrations)?;
        Ok(self.exchange)
    }
}

impl Documenter {
    /// Start registering descriptors for `exchange`.
    pub fn builder<E: Exchange>(&self, exchange: E) -> DocBuilder<'_, E> {
        DocBuilder::new(self, exchange)
    }
}
