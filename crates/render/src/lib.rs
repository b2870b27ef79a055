#![deny(missing_docs)]
//! quire rendering: templating, payload merging, and layout chains.

/// Parallel batch rendering.
pub mod batch;
/// Render error types.
pub mod error;
/// Layouts and the layout registry.
pub mod layout;
/// Template payloads and deep merging.
pub mod payload;
/// Layout chain renderer.
pub mod renderer;
/// Templating interface and engines.
pub mod template;

pub use batch::{BatchInput, BatchOptions, BatchReport, BatchResult, BatchStats, render_batch};
pub use error::{RenderError, TemplateError};
pub use layout::{Layout, LayoutRegistry};
pub use payload::{Payload, deep_merge, deep_merge_into};
pub use renderer::{LayoutRenderer, RenderOutcome};
pub use template::{
    Filter, MiniJinjaEngine, NamedFilter, RenderContext, TemplateEngine, default_filters,
};
