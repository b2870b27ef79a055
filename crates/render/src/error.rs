use quire_core::{BoxError, FrontmatterError, MarkupError};
use thiserror::Error;

/// Failure reported by a [`TemplateEngine`](crate::TemplateEngine).
#[derive(Debug, Error)]
#[error("{message}")]
pub struct TemplateError {
    message: String,
    line: Option<usize>,
    #[source]
    source: Option<BoxError>,
}

impl TemplateError {
    /// Create an error from a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            line: None,
            source: None,
        }
    }

    /// Create an error wrapping the engine's own error.
    pub fn with_source(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self {
            message: message.into(),
            line: None,
            source: Some(source.into()),
        }
    }

    /// Attach the template line the failure happened on.
    pub fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    /// Error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Template line (1-indexed), when the engine reports one.
    pub fn line(&self) -> Option<usize> {
        self.line
    }
}

/// Errors that abort rendering a single document.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The source file's front matter could not be parsed.
    #[error(transparent)]
    FrontMatter(#[from] FrontmatterError),
    /// Markup conversion failed for the document or a layout.
    #[error(transparent)]
    Markup(#[from] MarkupError),
    /// The templating engine failed.
    #[error("template error in {origin}: {source}")]
    Template {
        /// What was being rendered (`document` or `layout 'name'`)
        origin: String,
        /// Engine failure
        #[source]
        source: TemplateError,
    },
    /// Layouts refer to each other in a loop.
    #[error("layout cycle detected: {}", .chain.join(" -> "))]
    CyclicLayout {
        /// Layout names walked, ending with the repeated name
        chain: Vec<String>,
    },
}
