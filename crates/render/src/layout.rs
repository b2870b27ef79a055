use quire_core::{Document, FrontmatterError, Metadata};
use std::collections::HashMap;
use std::path::Path;

/// A named wrapper template, itself a document with front matter.
///
/// A layout may name a parent layout through its own `layout` key.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    name: String,
    document: Document,
}

impl Layout {
    /// Create a layout from a parsed document.
    pub fn new(name: impl Into<String>, document: Document) -> Self {
        Self {
            name: name.into(),
            document,
        }
    }

    /// Parse a layout from raw file text.
    pub fn from_source(
        name: impl Into<String>,
        raw: &str,
        extension: impl Into<String>,
    ) -> Result<Self, FrontmatterError> {
        Ok(Self::new(name, Document::from_source(raw, extension)?))
    }

    /// Parse a layout file; the name is the file stem (`_layouts/post.html`
    /// becomes `post`).
    pub fn from_path(path: impl AsRef<Path>, raw: &str) -> Result<Self, FrontmatterError> {
        let path = path.as_ref();
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::new(name, Document::from_path(path, raw)?))
    }

    /// Registry name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Underlying document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Template text.
    pub fn content(&self) -> &str {
        &self.document.content
    }

    /// Front matter; becomes `page` while this layout renders.
    pub fn metadata(&self) -> &Metadata {
        &self.document.metadata
    }

    /// Name of the parent layout, if any.
    pub fn parent(&self) -> Option<&str> {
        self.document.layout_name()
    }
}

/// Layouts by name. Read-only while documents render.
#[derive(Debug, Clone, Default)]
pub struct LayoutRegistry {
    layouts: HashMap<String, Layout>,
}

impl LayoutRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a layout, returning the one it replaced.
    pub fn insert(&mut self, layout: Layout) -> Option<Layout> {
        self.layouts.insert(layout.name.clone(), layout)
    }

    /// Looks a layout up by name.
    pub fn get(&self, name: &str) -> Option<&Layout> {
        self.layouts.get(name)
    }

    /// Number of layouts.
    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    /// Whether the registry has no layouts.
    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }

    /// Layout names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.layouts.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl FromIterator<Layout> for LayoutRegistry {
    fn from_iter<I: IntoIterator<Item = Layout>>(iter: I) -> Self {
        let mut registry = Self::new();
        for layout in iter {
            registry.insert(layout);
        }
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_parent_from_front_matter() {
        let layout = Layout::from_source("post", "---\nlayout: default\n---\n<article>{{ content }}</article>", ".html").unwrap();
        assert_eq!(layout.name(), "post");
        assert_eq!(layout.parent(), Some("default"));
        assert_eq!(layout.content(), "<article>{{ content }}</article>");
    }

    #[test]
    fn from_path_names_layout_after_file_stem() {
        let layout = Layout::from_path("_layouts/post.html", "---\nlayout: default\n---\n{{ content }}").unwrap();
        assert_eq!(layout.name(), "post");
        assert_eq!(layout.document().extension, ".html");
        assert_eq!(layout.parent(), Some("default"));

        let err = Layout::from_path("_layouts/broken.html", "---\nlayout: [\n---\n").unwrap_err();
        assert!(err.to_string().contains("_layouts/broken.html"), "{err}");
    }

    #[test]
    fn registry_replaces_by_name() {
        let mut registry: LayoutRegistry = [
            Layout::new("default", Document::new("a", ".html")),
            Layout::new("post", Document::new("b", ".html")),
        ]
        .into_iter()
        .collect();
        assert_eq!(registry.names(), vec!["default", "post"]);

        let previous = registry.insert(Layout::new("post", Document::new("c", ".html")));
        assert_eq!(previous.map(|l| l.content().to_string()), Some("b".into()));
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("post").map(Layout::content), Some("c"));
        assert!(registry.get("missing").is_none());
    }
}
