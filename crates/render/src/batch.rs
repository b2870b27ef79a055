//! Parallel rendering of many documents against shared layouts.

use crate::error::RenderError;
use crate::payload::Payload;
use crate::renderer::{LayoutRenderer, RenderOutcome};
use crate::template::TemplateEngine;
use quire_core::Document;
use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// A document to render in a batch.
#[derive(Debug, Clone)]
pub struct BatchInput {
    /// Identifier (typically the source path).
    pub id: String,
    /// The document to render.
    pub document: Document,
}

/// Options for batch rendering.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Maximum number of threads to use. Defaults to rayon's global pool.
    pub max_threads: Option<usize>,
    /// Keep rendering after a failure. When false, documents render
    /// sequentially and the batch stops at the first error.
    pub continue_on_error: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            max_threads: None,
            continue_on_error: true,
        }
    }
}

/// Result for a single document in a batch.
#[derive(Debug)]
pub struct BatchResult {
    /// Identifier matching the input.
    pub id: String,
    /// The document, rendered on success and untouched on failure.
    pub document: Document,
    /// Render outcome or error.
    pub outcome: Result<RenderOutcome, RenderError>,
}

/// Statistics for batch rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchStats {
    /// Number of inputs.
    pub total: usize,
    /// Documents rendered successfully.
    pub succeeded: usize,
    /// Documents that failed.
    pub failed: usize,
    /// Wall-clock time spent.
    pub elapsed: Duration,
}

/// All results of a batch, in input order, with statistics.
#[derive(Debug)]
pub struct BatchReport {
    /// Individual results.
    pub results: Vec<BatchResult>,
    /// Processing statistics.
    pub stats: BatchStats,
}

/// Renders `inputs` with `renderer`, each starting from a copy of `payload`.
///
/// Documents never share mutable state: each input owns its document and
/// the layout registry, markup registry and engine are only read.
pub fn render_batch<E>(
    renderer: &LayoutRenderer<'_, E>,
    inputs: Vec<BatchInput>,
    payload: &Payload,
    options: &BatchOptions,
) -> BatchReport
where
    E: TemplateEngine + Sync + ?Sized,
{
    let start = Instant::now();
    let total = inputs.len();
    let succeeded = AtomicUsize::new(0);
    let failed = AtomicUsize::new(0);

    let process_input = |input: BatchInput| -> BatchResult {
        let BatchInput { id, mut document } = input;
        let outcome = renderer.render(&mut document, payload.clone());
        match &outcome {
            Ok(_) => succeeded.fetch_add(1, Ordering::Relaxed),
            Err(err) => {
                log::warn!("failed to render {id}: {err}");
                failed.fetch_add(1, Ordering::Relaxed)
            }
        };
        BatchResult {
            id,
            document,
            outcome,
        }
    };

    let results: Vec<BatchResult> = if options.continue_on_error {
        let pool = options.max_threads.and_then(|threads| {
            rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .map_err(|err| log::warn!("falling back to the global thread pool: {err}"))
                .ok()
        });
        match pool {
            Some(pool) => pool.install(|| {
                inputs
                    .into_par_iter()
                    .map(process_input)
                    .collect::<Vec<_>>()
            }),
            None => inputs.into_par_iter().map(process_input).collect(),
        }
    } else {
        // Stop on first error - sequential processing required
        let mut results = Vec::with_capacity(inputs.len());
        for input in inputs {
            let result = process_input(input);
            let had_error = result.outcome.is_err();
            results.push(result);
            if had_error {
                break;
            }
        }
        results
    };

    BatchReport {
        results,
        stats: BatchStats {
            total,
            succeeded: succeeded.load(Ordering::Relaxed),
            failed: failed.load(Ordering::Relaxed),
            elapsed: start.elapsed(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{Layout, LayoutRegistry};
    use crate::template::MiniJinjaEngine;
    use quire_core::MarkupRegistry;

    fn inputs() -> Vec<BatchInput> {
        ["one", "two", "three"]
            .into_iter()
            .map(|name| BatchInput {
                id: format!("{name}.md"),
                document: Document::from_source(
                    &format!("---\nlayout: base\n---\n{name} in {{{{ site }}}}"),
                    ".md",
                )
                .unwrap(),
            })
            .collect()
    }

    fn registry() -> LayoutRegistry {
        [Layout::new("base", Document::new("<main>{{ content }}</main>", ".html"))]
            .into_iter()
            .collect()
    }

    fn site() -> Payload {
        let mut payload = Payload::new();
        payload.insert("site".into(), "quire".into());
        payload
    }

    #[test]
    fn renders_all_documents_in_order() {
        let markup = MarkupRegistry::default();
        let layouts = registry();
        let engine = MiniJinjaEngine::new();
        let renderer = LayoutRenderer::new(&markup, &layouts, &engine);

        let report = render_batch(
            &renderer,
            inputs(),
            &site(),
            &BatchOptions {
                max_threads: Some(2),
                ..BatchOptions::default()
            },
        );

        assert_eq!(report.stats.total, 3);
        assert_eq!(report.stats.succeeded, 3);
        assert_eq!(report.stats.failed, 0);
        let ids: Vec<&str> = report.results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["one.md", "two.md", "three.md"]);
        for result in &report.results {
            assert!(result.outcome.is_ok());
            assert!(result.document.output.starts_with("<main><p>"), "{}", result.document.output);
            assert!(result.document.output.contains(" in quire"));
        }
    }

    #[test]
    fn stops_at_first_error_when_requested() {
        let markup = MarkupRegistry::default();
        let layouts = registry();
        let engine = MiniJinjaEngine::new();
        let renderer = LayoutRenderer::new(&markup, &layouts, &engine);

        let mut inputs = inputs();
        inputs[1].document.extension = ".adoc".into();

        let report = render_batch(
            &renderer,
            inputs,
            &site(),
            &BatchOptions {
                continue_on_error: false,
                ..BatchOptions::default()
            },
        );

        assert_eq!(report.results.len(), 2);
        assert_eq!(report.stats.succeeded, 1);
        assert_eq!(report.stats.failed, 1);
        let failed = &report.results[1];
        assert!(failed.outcome.is_err());
        assert!(failed.document.output.is_empty());
    }
}
