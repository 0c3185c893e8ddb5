//! Artifact writing.
//!
//! Artifacts for one identifier are laid out either flat or nested:
//!
//! ```text
//! flat:    {root}/{identifier}-{topic}.{ext}
//! nested:  {root}/{identifier}/{topic}.{ext}
//! ```
//!
//! Writes are independent. A failure leaves already-written artifacts in
//! place.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use rayon::prelude::*;
use regex::Regex;

use crate::Topic;

/// Slash-separated segments, none starting with a dot or dash.
static IDENTIFIER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9_.-]*(/[A-Za-z0-9_][A-Za-z0-9_.-]*)*$")
        .expect("invalid identifier regex")
});

/// How artifact files are arranged under the output root.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputLayout {
    #[default]
    Flat,
    Nested,
}

/// Errors raised while writing artifacts.
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("invalid identifier `{identifier}`: {reason}")]
    InvalidIdentifier { identifier: String, reason: String },

    #[error("failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Writes rendered artifacts below an output root.
#[derive(Clone, Debug)]
pub struct Writer {
    root: PathBuf,
    layout: OutputLayout,
    extension: String,
}

impl Writer {
    #[must_use]
    pub fn new(root: PathBuf, layout: OutputLayout, extension: impl Into<String>) -> Self {
        Self {
            root,
            layout,
            extension: extension.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the artifact for `identifier` and `topic`.
    ///
    /// # Errors
    ///
    /// Returns [`WriteError::InvalidIdentifier`] when the identifier is empty
    /// or could escape the output root.
    pub fn output_path(&self, identifier: &str, topic: Topic) -> Result<PathBuf, WriteError> {
        validate_identifier(identifier)?;
        let path = match self.layout {
            OutputLayout::Flat => self
                .root
                .join(format!("{identifier}-{topic}.{}", self.extension)),
            OutputLayout::Nested => self
                .root
                .join(identifier)
                .join(format!("{topic}.{}", self.extension)),
        };
        Ok(path)
    }

    /// Write every artifact, returning the written paths in input order.
    ///
    /// # Errors
    ///
    /// Returns the first [`WriteError`] encountered. Other artifacts may
    /// already have been written.
    pub fn write(&self, identifier: &str, artifacts: &[(Topic, String)]) -> Result<Vec<PathBuf>, WriteError> {
        validate_identifier(identifier)?;
        artifacts
            .par_iter()
            .map(|(topic, text)| {
                let path = self.output_path(identifier, *topic)?;
                write_file(&path, text)?;
                tracing::debug!(path = %path.display(), "Wrote artifact");
                Ok(path)
            })
            .collect()
    }
}

/// Check that `identifier` can name artifacts below an output root.
///
/// # Errors
///
/// Returns [`WriteError::InvalidIdentifier`] when the identifier is empty
/// or could escape the output root.
pub fn validate_identifier(identifier: &str) -> Result<(), WriteError> {
    let reason = if identifier.is_empty() {
        "must not be empty"
    } else if !IDENTIFIER_PATTERN.is_match(identifier) {
        "use letters, digits, `_`, `-`, `.` and `/`-separated segments not starting with `.` or `-`"
    } else {
        return Ok(());
    };
    Err(WriteError::InvalidIdentifier {
        identifier: identifier.to_owned(),
        reason: reason.to_owned(),
    })
}

fn write_file(path: &Path, text: &str) -> Result<(), WriteError> {
    let io_err = |source| WriteError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(path, text).map_err(io_err)
}
