#![deny(missing_docs)]
//! quire core: documents, front matter, content types, and markup conversion.

/// Extension to content-type resolution.
pub mod content_type;
/// The document model.
pub mod document;
/// Core error types.
pub mod error;
/// YAML front matter splitting.
pub mod frontmatter;
/// Markup kinds, converters, and the registry.
pub mod markup;
/// The transform step (markup to HTML).
pub mod transform;

pub use content_type::ContentType;
pub use document::{Document, LAYOUT_KEY, Metadata};
pub use error::{BoxError, ConfigurationError, MarkupError, SourceLocation};
pub use frontmatter::{FrontmatterError, FrontmatterSplit, split};
pub use markup::{
    Converter, MarkdownBackend, MarkdownOptions, MarkupConfig, MarkupKind, MarkupRegistry,
};
pub use transform::{RENDERED_EXTENSION, transform};
