//! Exchange extraction, document snapshots and contract validation.
//!
//! The pipeline's front half:
//!
//! 1. [`extract_request`] / [`extract_response`] read a [`RawExchange`]
//!    recorded by a test harness and fill defaults.
//! 2. [`assemble`] merges the extracted trace with the author's
//!    [`Registrations`] into an immutable [`DocumentSnapshot`].
//! 3. [`check`] / [`check_snapshot`] compare bodies against declared field
//!    descriptors, collecting every mismatch.

mod exchange;
mod snapshot;
mod trace;
mod validate;

pub use exchange::{Exchange, RawExchange, RawRequest, RawResponse};
pub use snapshot::{
    DocumentSnapshot, HttpTrace, MessageDescriptors, Parameters, Parts, Registrations, assemble,
    same_name,
};
pub use trace::{
    ExtractOptions, ExtractedRequest, ExtractedResponse, Headers, extract_request,
    extract_response, is_empty_body, parse_cookie_header, parse_set_cookie,
};
pub use validate::{check, check_snapshot};
