//! Markup conversion: kinds, converters, and the registry that dispatches
//! between them.
//!
//! - `config`: start-up options selecting and tuning back-ends.
//! - `haml`: built-in Haml converter that never evaluates code.
//! - `markdown`: Markdown back-ends (`markdown-rs`, optional `pulldown-cmark`).
//! - `registry`: kind to converter table with recorded configuration errors.
//! - `textile`: built-in lightweight Textile converter.

/// Markup back-end configuration.
pub mod config;
/// Built-in Haml converter.
pub mod haml;
/// Markdown back-ends.
pub mod markdown;
/// Converter registry.
pub mod registry;
/// Built-in Textile converter.
pub mod textile;

use crate::error::BoxError;
use std::fmt;

pub use self::config::MarkupConfig;
pub use self::markdown::{MarkdownBackend, MarkdownOptions};
pub use self::registry::MarkupRegistry;

/// Markup languages the registry can convert.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MarkupKind {
    /// Markdown, whatever its file extension spelling.
    Markdown,
    /// Textile.
    Textile,
    /// Haml. Code lines are rejected rather than evaluated.
    Haml,
    /// Any other extension, lower-cased.
    Other(String),
}

impl MarkupKind {
    /// Maps a canonical kind name to a kind.
    pub fn from_name(name: &str) -> Self {
        match name {
            "markdown" => Self::Markdown,
            "textile" => Self::Textile,
            "haml" => Self::Haml,
            other => Self::Other(other.to_string()),
        }
    }

    /// Canonical kind name.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Markdown => "markdown",
            Self::Textile => "textile",
            Self::Haml => "haml",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for MarkupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Converts one kind of markup into HTML.
pub trait Converter: Send + Sync {
    /// Convert `input` to HTML.
    fn convert(&self, input: &str) -> Result<String, BoxError>;
}

impl<F> Converter for F
where
    F: Fn(&str) -> Result<String, BoxError> + Send + Sync,
{
    fn convert(&self, input: &str) -> Result<String, BoxError> {
        (self)(input)
    }
}
