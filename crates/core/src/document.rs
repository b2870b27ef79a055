use crate::content_type::ContentType;
use crate::frontmatter::{self, FrontmatterError};
use serde_json::Value as JsonValue;
use std::fmt;
use std::path::Path;

/// Front matter of a document: string keys to arbitrary YAML/JSON values.
pub type Metadata = serde_json::Map<String, JsonValue>;

/// Metadata key naming the layout a document is wrapped in.
pub const LAYOUT_KEY: &str = "layout";

/// A page-like source file moving through the rendering pipeline.
///
/// Each render owns its document exclusively; stages mutate it in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    /// Body text; replaced by the rendered and transformed body.
    pub content: String,
    /// Final output after layouts have been applied.
    pub output: String,
    /// Parsed front matter.
    pub metadata: Metadata,
    /// Source file suffix including the leading dot (e.g. `.md`).
    pub extension: String,
}

impl Document {
    /// Creates a document without front matter.
    pub fn new(content: impl Into<String>, extension: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            output: String::new(),
            metadata: Metadata::new(),
            extension: extension.into(),
        }
    }

    /// Replaces the metadata.
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Builds a document from raw file text, separating its front matter.
    ///
    /// ```
    /// use quire_core::Document;
    ///
    /// let doc = Document::from_source("---\nlayout: post\n---\nHello", ".md").unwrap();
    /// assert_eq!(doc.layout_name(), Some("post"));
    /// assert_eq!(doc.content, "Hello");
    /// ```
    pub fn from_source(raw: &str, extension: impl Into<String>) -> Result<Self, FrontmatterError> {
        let split = frontmatter::split(raw)?;
        Ok(Self::new(split.body, extension).with_metadata(split.metadata))
    }

    /// Builds a document from the text of the file at `path`.
    ///
    /// The extension comes from the path, and front matter errors carry
    /// the path in their location.
    pub fn from_path(path: impl AsRef<Path>, raw: &str) -> Result<Self, FrontmatterError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();
        Self::from_source(raw, extension).map_err(|err| err.in_file(path.display().to_string()))
    }

    /// Content type implied by the extension.
    pub fn content_type(&self) -> ContentType {
        ContentType::resolve(&self.extension)
    }

    /// Name of the layout this document asks for.
    ///
    /// Only string values count; `layout: null` or `layout: false` mean none.
    pub fn layout_name(&self) -> Option<&str> {
        self.metadata.get(LAYOUT_KEY).and_then(JsonValue::as_str)
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_source_without_front_matter_keeps_everything() {
        let doc = Document::from_source("Just text\n", ".html").unwrap();
        assert!(doc.metadata.is_empty());
        assert_eq!(doc.content, "Just text\n");
        assert_eq!(doc.extension, ".html");
        assert!(doc.output.is_empty());
    }

    #[test]
    fn from_path_takes_extension_and_names_errors() {
        let doc = Document::from_path("_posts/2024-01-01-hello.md", "---\nlayout: post\n---\nHi").unwrap();
        assert_eq!(doc.extension, ".md");
        assert_eq!(doc.layout_name(), Some("post"));

        assert_eq!(Document::from_path("README", "x").unwrap().extension, "");

        let err = Document::from_path("_posts/bad.md", "---\ntitle: [oops\n---\n").unwrap_err();
        assert!(err.to_string().contains("_posts/bad.md"), "{err}");
    }

    #[test]
    fn non_string_layout_means_none() {
        let mut doc = Document::new("", ".md");
        doc.metadata.insert(LAYOUT_KEY.into(), json!(null));
        assert_eq!(doc.layout_name(), None);
        doc.metadata.insert(LAYOUT_KEY.into(), json!(false));
        assert_eq!(doc.layout_name(), None);
        doc.metadata.insert(LAYOUT_KEY.into(), json!("default"));
        assert_eq!(doc.layout_name(), Some("default"));
    }

    #[test]
    fn display_shows_content() {
        assert_eq!(Document::new("abc", ".txt").to_string(), "abc");
        assert_eq!(Document::default().to_string(), "");
    }
}
