//! Template lookup.
//!
//! Every topic must resolve to a template before anything is rendered. A
//! file `{templates_dir}/{topic}.{ext}.jinja` overrides the built-in
//! template for that topic; formats without built-ins need a directory
//! covering every topic.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use crate::Topic;

macro_rules! builtin {
    ($format:literal, $topic:literal) => {
        (
            $topic,
            include_str!(concat!(
                "../templates/",
                $format,
                "/",
                $topic,
                ".",
                $format,
                ".jinja"
            )),
        )
    };
}

macro_rules! builtin_set {
    ($format:literal) => {
        [
            builtin!($format, "curl-request"),
            builtin!($format, "http-request"),
            builtin!($format, "http-response"),
            builtin!($format, "request-body"),
            builtin!($format, "response-body"),
            builtin!($format, "path-parameters"),
            builtin!($format, "query-parameters"),
            builtin!($format, "form-parameters"),
            builtin!($format, "request-headers"),
            builtin!($format, "response-headers"),
            builtin!($format, "request-fields"),
            builtin!($format, "response-fields"),
            builtin!($format, "request-cookies"),
            builtin!($format, "response-cookies"),
            builtin!($format, "request-parts"),
        ]
    };
}

const ADOC: [(&str, &str); 15] = builtin_set!("adoc");
const MARKDOWN: [(&str, &str); 15] = builtin_set!("md");

/// Errors raised while loading templates.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error(
        "no template for format `{format}`: missing {}. Add `{{topic}}.{format}.jinja` files to the templates directory",
        .topics.join(", ")
    )]
    Missing { format: String, topics: Vec<String> },

    #[error("failed to read template {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

fn builtins(extension: &str) -> Option<&'static [(&'static str, &'static str)]> {
    match extension {
        "adoc" => Some(&ADOC),
        "md" => Some(&MARKDOWN),
        _ => None,
    }
}

/// One template body per topic for a single output format.
#[derive(Clone, Debug)]
pub struct TemplateStore {
    extension: String,
    templates: BTreeMap<Topic, String>,
}

impl TemplateStore {
    /// Resolve a template for every topic.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::Missing`] naming every topic without a
    /// template, or [`TemplateError::Io`] when an override exists but
    /// cannot be read.
    pub fn load(extension: &str, templates_dir: Option<&Path>) -> Result<Self, TemplateError> {
        let builtin = builtins(extension);
        let mut templates = BTreeMap::new();
        let mut missing = Vec::new();

        for topic in Topic::ALL {
            if let Some(dir) = templates_dir
                && let Some(body) = read_override(dir, topic, extension)?
            {
                tracing::debug!(%topic, dir = %dir.display(), "Using template override");
                templates.insert(topic, body);
                continue;
            }
            let body = builtin.and_then(|set| {
                set.iter()
                    .find(|(name, _)| *name == topic.as_str())
                    .map(|(_, body)| (*body).to_owned())
            });
            match body {
                Some(body) => {
                    templates.insert(topic, body);
                }
                None => missing.push(topic.as_str().to_owned()),
            }
        }

        if !missing.is_empty() {
            return Err(TemplateError::Missing {
                format: extension.to_owned(),
                topics: missing,
            });
        }

        Ok(Self {
            extension: extension.to_owned(),
            templates,
        })
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Template body for `topic`. Always present after a successful load.
    pub fn get(&self, topic: Topic) -> &str {
        self.templates.get(&topic).map_or("", String::as_str)
    }
}

fn read_override(dir: &Path, topic: Topic, extension: &str) -> Result<Option<String>, TemplateError> {
    let path = dir.join(format!("{topic}.{extension}.jinja"));
    match std::fs::read_to_string(&path) {
        Ok(body) => Ok(Some(body)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(TemplateError::Io { path, source }),
    }
}
