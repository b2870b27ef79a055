//! Templating interface and the default MiniJinja engine.
//!
//! - `filters`: the filter set templates get by default.
//! - `minijinja`: [`TemplateEngine`] backed by MiniJinja.

/// Built-in template filters.
pub mod filters;
/// MiniJinja-backed engine.
pub mod minijinja;

use crate::error::TemplateError;
use crate::payload::Payload;
use quire_core::BoxError;
use serde_json::Value as JsonValue;
use std::fmt;
use std::sync::Arc;

pub use self::filters::default_filters;
pub use self::minijinja::MiniJinjaEngine;

/// Renders template text against a payload.
pub trait TemplateEngine {
    /// Render `template` with `payload` as its variables.
    ///
    /// Implementations must support variable substitution, control flow,
    /// and the custom filters carried by `context`.
    fn render(
        &self,
        template: &str,
        payload: &Payload,
        context: &RenderContext,
    ) -> Result<String, TemplateError>;
}

/// A custom template filter.
///
/// Filters receive the piped value, the filter arguments, and the render
/// registers (site-level data templates cannot see directly).
pub trait Filter: Send + Sync {
    /// Apply the filter.
    fn apply(
        &self,
        input: &JsonValue,
        args: &[JsonValue],
        registers: &Payload,
    ) -> Result<JsonValue, BoxError>;
}

impl<F> Filter for F
where
    F: Fn(&JsonValue, &[JsonValue], &Payload) -> Result<JsonValue, BoxError> + Send + Sync,
{
    fn apply(
        &self,
        input: &JsonValue,
        args: &[JsonValue],
        registers: &Payload,
    ) -> Result<JsonValue, BoxError> {
        (self)(input, args, registers)
    }
}

/// A filter together with the name templates call it by.
#[derive(Clone)]
pub struct NamedFilter {
    name: String,
    filter: Arc<dyn Filter>,
}

impl NamedFilter {
    /// Create a named filter.
    pub fn new<F: Filter + 'static>(name: impl Into<String>, filter: F) -> Self {
        Self {
            name: name.into(),
            filter: Arc::new(filter),
        }
    }

    /// Name used in templates.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Apply the filter.
    pub fn apply(
        &self,
        input: &JsonValue,
        args: &[JsonValue],
        registers: &Payload,
    ) -> Result<JsonValue, BoxError> {
        self.filter.apply(input, args, registers)
    }
}

impl fmt::Debug for NamedFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NamedFilter").field(&self.name).finish()
    }
}

/// Filters and registers passed to every render call.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    /// Custom filters available to templates.
    pub filters: Vec<NamedFilter>,
    /// Data visible to filters but not to templates (e.g. `site`).
    pub registers: Payload,
}

impl RenderContext {
    /// An empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// A context carrying [`default_filters`].
    pub fn with_default_filters() -> Self {
        Self {
            filters: default_filters(),
            registers: Payload::new(),
        }
    }

    /// Adds a filter; a later filter with the same name shadows earlier ones.
    pub fn filter<F: Filter + 'static>(mut self, name: impl Into<String>, filter: F) -> Self {
        self.filters.push(NamedFilter::new(name, filter));
        self
    }

    /// Sets a register.
    pub fn register(mut self, key: impl Into<String>, value: JsonValue) -> Self {
        self.registers.insert(key.into(), value);
        self
    }
}
