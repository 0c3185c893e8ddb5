//! Template rendering with minijinja.

use minijinja::{Environment, Value};

use crate::Topic;

/// Error raised when a template fails to render.
#[derive(Debug, thiserror::Error)]
#[error("failed to render {topic}: {source}")]
pub struct RenderError {
    pub topic: Topic,
    #[source]
    pub source: minijinja::Error,
}

/// Escape table cell separators.
fn cell(value: &str) -> String {
    value.replace('|', r"\|")
}

/// Renders template bodies against topic contexts.
///
/// Undefined context keys render as empty, so a template can be rendered
/// against an empty context without error.
pub struct Renderer {
    env: Environment<'static>,
}

impl Renderer {
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.add_filter("cell", cell);
        Self { env }
    }

    /// Render `template` for `topic`. The output always ends with a newline.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] on template syntax or evaluation errors.
    pub fn render(&self, topic: Topic, template: &str, context: &Value) -> Result<String, RenderError> {
        let mut text = self
            .env
            .render_str(template, context)
            .map_err(|source| RenderError { topic, source })?;
        if !text.ends_with('\n') {
            text.push('\n');
        }
        Ok(text)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}
