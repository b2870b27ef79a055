//! Markdown back-ends.

use super::{Converter, MarkupConfig};
use crate::error::{BoxError, ConfigurationError};
use std::str::FromStr;

/// Markdown back-ends quire knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkdownBackend {
    /// The `markdown` crate (markdown-rs). Always available.
    MarkdownRs,
    /// `pulldown-cmark`, compiled in with the `pulldown-cmark` feature.
    PulldownCmark,
}

impl MarkdownBackend {
    /// Configuration name of the back-end.
    pub fn name(self) -> &'static str {
        match self {
            Self::MarkdownRs => "markdown-rs",
            Self::PulldownCmark => "pulldown-cmark",
        }
    }

    /// Builds the converter, or explains why it cannot be built.
    pub fn converter(
        self,
        options: MarkdownOptions,
    ) -> Result<Box<dyn Converter>, ConfigurationError> {
        match self {
            Self::MarkdownRs => Ok(Box::new(MarkdownRs::new(options))),
            #[cfg(feature = "pulldown-cmark")]
            Self::PulldownCmark => Ok(Box::new(PulldownCmark::new(options))),
            #[cfg(not(feature = "pulldown-cmark"))]
            Self::PulldownCmark => Err(ConfigurationError::BackendUnavailable {
                backend: self.name().to_string(),
                reason: "quire-core was built without the `pulldown-cmark` feature".to_string(),
            }),
        }
    }
}

impl FromStr for MarkdownBackend {
    type Err = ConfigurationError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.trim().to_ascii_lowercase().as_str() {
            "markdown-rs" | "markdown" => Ok(Self::MarkdownRs),
            "pulldown-cmark" | "pulldown_cmark" => Ok(Self::PulldownCmark),
            _ => Err(ConfigurationError::UnknownBackend(name.to_string())),
        }
    }
}

/// Back-end independent Markdown options.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MarkdownOptions {
    /// Enable GitHub Flavored Markdown constructs.
    pub gfm: bool,
    /// Enable math constructs ($inline$ and $$block$$).
    pub math: bool,
    /// Pass raw HTML through to the output.
    pub raw_html: bool,
    /// Enable indented code blocks.
    pub code_indented: bool,
}

impl MarkdownOptions {
    /// Options derived from the registry configuration.
    pub fn from_config(config: &MarkupConfig) -> Self {
        Self {
            gfm: config.extended_syntax,
            math: config.math_rendering,
            ..Self::default()
        }
    }

    /// Convert to markdown-rs `Options`.
    pub fn to_markdown(self) -> markdown::Options {
        let mut constructs = markdown::Constructs {
            code_indented: self.code_indented,
            html_flow: self.raw_html,
            html_text: self.raw_html,
            ..Default::default()
        };

        if self.gfm {
            constructs.gfm_autolink_literal = true;
            constructs.gfm_footnote_definition = true;
            constructs.gfm_label_start_footnote = true;
            constructs.gfm_strikethrough = true;
            constructs.gfm_table = true;
            constructs.gfm_task_list_item = true;
        }

        if self.math {
            constructs.math_flow = true;
            constructs.math_text = true;
        }

        markdown::Options {
            parse: markdown::ParseOptions {
                constructs,
                math_text_single_dollar: self.math,
                ..markdown::ParseOptions::default()
            },
            compile: markdown::CompileOptions {
                allow_dangerous_html: self.raw_html,
                allow_dangerous_protocol: true,
                ..markdown::CompileOptions::default()
            },
        }
    }
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            gfm: true,
            math: false,
            raw_html: true,
            code_indented: true,
        }
    }
}

/// markdown-rs converter.
#[derive(Debug, Clone, Copy)]
pub struct MarkdownRs {
    options: MarkdownOptions,
}

impl MarkdownRs {
    /// Create a converter with the given options.
    pub fn new(options: MarkdownOptions) -> Self {
        Self { options }
    }
}

impl Converter for MarkdownRs {
    fn convert(&self, input: &str) -> Result<String, BoxError> {
        // markdown-rs options hold non-Sync hooks, so they are built per call.
        markdown::to_html_with_options(input, &self.options.to_markdown())
            .map_err(|message| message.to_string().into())
    }
}

/// pulldown-cmark converter.
#[cfg(feature = "pulldown-cmark")]
#[derive(Debug, Clone, Copy)]
pub struct PulldownCmark {
    options: pulldown_cmark::Options,
}

#[cfg(feature = "pulldown-cmark")]
impl PulldownCmark {
    /// Create a converter with the given options.
    pub fn new(options: MarkdownOptions) -> Self {
        use pulldown_cmark::Options;

        let mut flags = Options::empty();
        if options.gfm {
            flags.insert(Options::ENABLE_TABLES);
            flags.insert(Options::ENABLE_FOOTNOTES);
            flags.insert(Options::ENABLE_STRIKETHROUGH);
            flags.insert(Options::ENABLE_TASKLISTS);
        }
        if options.math {
            flags.insert(Options::ENABLE_MATH);
        }
        Self { options: flags }
    }
}

#[cfg(feature = "pulldown-cmark")]
impl Converter for PulldownCmark {
    fn convert(&self, input: &str) -> Result<String, BoxError> {
        let parser = pulldown_cmark::Parser::new_ext(input, self.options);
        let mut html = String::with_capacity(input.len() * 3 / 2);
        pulldown_cmark::html::push_html(&mut html, parser);
        Ok(html)
    }
}
