//! Extension to content-type resolution.

use crate::markup::MarkupKind;
use std::fmt;

/// Extension spellings that all mean Markdown.
const MARKDOWN_ALIASES: &[&str] = &["markdown", "mkdown", "mkdn", "mkd", "mdown", "mdwn", "md"];

/// Normalized description of what a file's body is written in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ContentType {
    /// Already HTML.
    Html,
    /// XML, passed through untouched.
    Xml,
    /// Atom feed.
    Atom,
    /// RSS feed.
    Rss,
    /// Markup that has to be converted to HTML.
    Markup(MarkupKind),
}

impl ContentType {
    /// Resolves a file extension (`".md"`, `"Markdown"`, ...) to a content type.
    ///
    /// The leading dot is optional and matching ignores case. Unknown
    /// extensions become [`MarkupKind::Other`] carrying the lower-cased name.
    ///
    /// ```
    /// use quire_core::{ContentType, MarkupKind};
    ///
    /// assert_eq!(ContentType::resolve(".mkdn"), ContentType::Markup(MarkupKind::Markdown));
    /// assert_eq!(ContentType::resolve(".HTML").as_str(), "html");
    /// ```
    pub fn resolve(extension: &str) -> Self {
        let name = extension.strip_prefix('.').unwrap_or(extension).to_lowercase();
        if MARKDOWN_ALIASES.contains(&name.as_str()) {
            return Self::Markup(MarkupKind::Markdown);
        }

        match name.as_str() {
            "html" => Self::Html,
            "xml" => Self::Xml,
            "atom" => Self::Atom,
            "rss" => Self::Rss,
            _ => Self::Markup(MarkupKind::from_name(&name)),
        }
    }

    /// Canonical identifier, as exposed to templates under `content_type`.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Html => "html",
            Self::Xml => "xml",
            Self::Atom => "atom",
            Self::Rss => "rss",
            Self::Markup(kind) => kind.as_str(),
        }
    }

    /// Whether content of this type is emitted without conversion.
    pub fn is_pass_through(&self) -> bool {
        self.markup_kind().is_none()
    }

    /// The markup kind to convert with, if any.
    pub fn markup_kind(&self) -> Option<&MarkupKind> {
        match self {
            Self::Markup(kind) => Some(kind),
            _ => None,
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shorthand for [`ContentType::resolve`].
pub fn resolve(extension: &str) -> ContentType {
    ContentType::resolve(extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markdown_aliases_share_one_identifier() {
        for ext in [".md", ".markdown", ".mkdn", ".MD", ".Markdown", "mdown"] {
            assert_eq!(resolve(ext), ContentType::Markup(MarkupKind::Markdown), "{ext}");
            assert_eq!(resolve(ext).as_str(), "markdown");
        }
    }

    #[test]
    fn pass_through_kinds() {
        for (ext, name) in [(".html", "html"), (".xml", "xml"), (".atom", "atom"), (".rss", "rss")] {
            let content_type = resolve(ext);
            assert!(content_type.is_pass_through(), "{ext}");
            assert_eq!(content_type.as_str(), name);
        }
    }

    #[test]
    fn unknown_extensions_are_lower_cased() {
        assert_eq!(resolve(".Textile"), ContentType::Markup(MarkupKind::Textile));
        assert_eq!(resolve(".HAML").as_str(), "haml");
        assert_eq!(
            resolve(".ADOC"),
            ContentType::Markup(MarkupKind::Other("adoc".into()))
        );
        assert_eq!(resolve(".ADOC").to_string(), "adoc");
    }
}
