//! Layout chain rendering.
//!
//! A document renders in steps. The first step renders the document's own
//! content through the template engine and converts it to HTML. Each
//! following step wraps the previous output in the next layout of the
//! chain, until a layout names no parent:
//!
//! ```text
//! payload + content_type -> render(content) -> transform -> output
//! while layout:
//!     payload = deep_merge(payload, {content: output, page: layout.metadata})
//!     output  = render(transform(layout).content, payload)
//!     layout  = layouts[layout.metadata.layout]
//! ```

use crate::error::RenderError;
use crate::layout::{Layout, LayoutRegistry};
use crate::payload::{CONTENT_KEY, CONTENT_TYPE_KEY, PAGE_KEY, Payload, deep_merge_into};
use crate::template::{RenderContext, TemplateEngine};
use quire_core::{Document, MarkupRegistry, transform};
use serde_json::Value as JsonValue;
use std::collections::HashSet;

/// What a successful render produced besides the document's new state.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOutcome {
    /// Payload of the last render step.
    pub payload: Payload,
    /// Names of the layouts applied, innermost first.
    pub layouts: Vec<String>,
}

/// Renders documents through a template engine and their layout chain.
///
/// The renderer only borrows its collaborators; one renderer can serve any
/// number of documents, including from several threads at once.
#[derive(Debug)]
pub struct LayoutRenderer<'a, E: ?Sized> {
    markup: &'a MarkupRegistry,
    layouts: &'a LayoutRegistry,
    engine: &'a E,
    context: RenderContext,
}

impl<'a, E> LayoutRenderer<'a, E>
where
    E: TemplateEngine + ?Sized,
{
    /// Create a renderer whose templates see the
    /// [`default_filters`](crate::template::default_filters).
    pub fn new(markup: &'a MarkupRegistry, layouts: &'a LayoutRegistry, engine: &'a E) -> Self {
        Self {
            markup,
            layouts,
            engine,
            context: RenderContext::with_default_filters(),
        }
    }

    /// Use `context` (filters and registers) for every render call,
    /// replacing the default filters.
    pub fn with_context(mut self, context: RenderContext) -> Self {
        self.context = context;
        self
    }

    /// The layouts this renderer resolves names against.
    pub fn layouts(&self) -> &LayoutRegistry {
        self.layouts
    }

    /// Renders `document` and every layout in its chain.
    ///
    /// On success `document.content` holds the rendered and converted body,
    /// `document.output` the fully wrapped result. On error the document is
    /// left exactly as it was.
    ///
    /// A layout name that is not in the registry ends the chain. A name
    /// that comes up twice fails with [`RenderError::CyclicLayout`].
    pub fn render(
        &self,
        document: &mut Document,
        payload: Payload,
    ) -> Result<RenderOutcome, RenderError> {
        let mut working = document.clone();
        let mut payload = payload;

        let content_type = working.content_type();
        payload.insert(
            CONTENT_TYPE_KEY.to_string(),
            JsonValue::String(content_type.as_str().to_string()),
        );

        working.content = self
            .engine
            .render(&working.content, &payload, &self.context)
            .map_err(|source| RenderError::Template {
                origin: "document".to_string(),
                source,
            })?;
        transform(&mut working, self.markup)?;
        working.output = working.content.clone();

        let mut applied: Vec<String> = Vec::new();
        let mut visited: HashSet<&str> = HashSet::new();
        let mut next = working.layout_name().map(str::to_owned);

        while let Some(name) = next.take() {
            let Some(layout) = self.layouts.get(&name) else {
                log::warn!("layout '{name}' does not exist; rendering stops before it");
                break;
            };
            if !visited.insert(layout.name()) {
                let mut chain = applied;
                chain.push(name);
                return Err(RenderError::CyclicLayout { chain });
            }

            let mut step = Payload::new();
            step.insert(
                CONTENT_KEY.to_string(),
                JsonValue::String(std::mem::take(&mut working.output)),
            );
            step.insert(
                PAGE_KEY.to_string(),
                JsonValue::Object(layout.metadata().clone()),
            );
            deep_merge_into(&mut payload, step);

            working.output = self.apply_layout(layout, &payload)?;
            log::debug!("applied layout '{name}'");
            applied.push(name);
            next = layout.parent().map(str::to_owned);
        }

        *document = working;
        Ok(RenderOutcome {
            payload,
            layouts: applied,
        })
    }

    /// Parses `raw`, then renders it like [`render`](Self::render).
    pub fn render_source(
        &self,
        raw: &str,
        extension: &str,
        payload: Payload,
    ) -> Result<(Document, RenderOutcome), RenderError> {
        let mut document = Document::from_source(raw, extension)?;
        let outcome = self.render(&mut document, payload)?;
        Ok((document, outcome))
    }

    /// Converts a copy of the layout and renders it with `payload`. The
    /// registry's layout stays untouched, so it converts once per step.
    fn apply_layout(&self, layout: &Layout, payload: &Payload) -> Result<String, RenderError> {
        let mut template = layout.document().clone();
        transform(&mut template, self.markup)?;
        self.engine
            .render(&template.content, payload, &self.context)
            .map_err(|source| RenderError::Template {
                origin: format!("layout '{}'", layout.name()),
                source,
            })
    }
}
