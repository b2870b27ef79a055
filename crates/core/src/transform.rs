use crate::document::Document;
use crate::error::MarkupError;
use crate::markup::MarkupRegistry;

/// Extension given to documents after conversion.
pub const RENDERED_EXTENSION: &str = ".html";

/// Converts the document body to HTML when its content type requires it.
///
/// HTML, XML, Atom and RSS pass through untouched. Anything else is
/// converted through `registry` and the extension becomes `.html`, so a
/// second call on the same document is a no-op. On error the document is
/// left unmodified.
pub fn transform(document: &mut Document, registry: &MarkupRegistry) -> Result<(), MarkupError> {
    let content_type = document.content_type();
    let Some(kind) = content_type.markup_kind() else {
        return Ok(());
    };

    let html = registry.convert(kind, &document.content)?;
    log::debug!("converted {kind} content ({} bytes) to html", document.content.len());
    document.content = html;
    document.extension = RENDERED_EXTENSION.to_string();
    Ok(())
}
