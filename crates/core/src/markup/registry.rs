use super::markdown::{MarkdownBackend, MarkdownOptions};
use super::{Converter, MarkupConfig, MarkupKind, haml, textile};
use crate::error::{BoxError, ConfigurationError, MarkupError};
use std::collections::HashMap;
use std::fmt;

/// Table of markup converters, built once from a [`MarkupConfig`].
///
/// Back-end problems found while configuring do not fail construction.
/// They are logged and kept: [`MarkupRegistry::configuration_errors`] lists
/// them, and converting a kind whose back-end failed returns
/// [`MarkupError::Configuration`] instead of producing wrong output.
///
/// The registry is immutable once built apart from explicit
/// [`register`](Self::register) calls, so it can be shared by reference
/// across threads.
pub struct MarkupRegistry {
    config: MarkupConfig,
    converters: HashMap<MarkupKind, Box<dyn Converter>>,
    disabled: HashMap<MarkupKind, ConfigurationError>,
    errors: Vec<ConfigurationError>,
}

impl MarkupRegistry {
    /// Builds a registry with the built-in converters for `config`.
    pub fn new(config: MarkupConfig) -> Self {
        let mut registry = Self::bare(config);
        registry.register(MarkupKind::Textile, |input: &str| -> Result<String, BoxError> {
            Ok(textile::to_html(input))
        });
        registry.register(MarkupKind::Haml, |input: &str| -> Result<String, BoxError> {
            Ok(haml::to_html(input)?)
        });
        registry.configure_markdown();
        registry.check_math_images();
        registry
    }

    /// Builds a registry without any converters.
    pub fn bare(config: MarkupConfig) -> Self {
        Self {
            config,
            converters: HashMap::new(),
            disabled: HashMap::new(),
            errors: Vec::new(),
        }
    }

    /// Registers (or replaces) the converter for `kind`.
    ///
    /// Registering a kind clears a configuration failure recorded for it.
    pub fn register<C>(&mut self, kind: MarkupKind, converter: C) -> &mut Self
    where
        C: Converter + 'static,
    {
        self.disabled.remove(&kind);
        self.converters.insert(kind, Box::new(converter));
        self
    }

    /// Converts `input` from `kind` to HTML.
    pub fn convert(&self, kind: &MarkupKind, input: &str) -> Result<String, MarkupError> {
        if let Some(converter) = self.converters.get(kind) {
            return converter
                .convert(input)
                .map_err(|source| MarkupError::Conversion {
                    kind: kind.clone(),
                    source,
                });
        }

        match self.disabled.get(kind) {
            Some(source) => Err(MarkupError::Configuration {
                kind: kind.clone(),
                source: source.clone(),
            }),
            None => Err(MarkupError::UnsupportedKind(kind.clone())),
        }
    }

    /// Whether a converter is registered for `kind`.
    pub fn supports(&self, kind: &MarkupKind) -> bool {
        self.converters.contains_key(kind)
    }

    /// Configuration problems recorded while building the registry.
    pub fn configuration_errors(&self) -> &[ConfigurationError] {
        &self.errors
    }

    /// The configuration the registry was built from.
    pub fn config(&self) -> &MarkupConfig {
        &self.config
    }

    fn configure_markdown(&mut self) {
        let options = MarkdownOptions::from_config(&self.config);
        let converter = self
            .config
            .backend
            .parse::<MarkdownBackend>()
            .and_then(|backend| backend.converter(options));

        match converter {
            Ok(converter) => {
                self.converters.insert(MarkupKind::Markdown, converter);
            }
            Err(err) => {
                self.disabled.insert(MarkupKind::Markdown, err.clone());
                self.record(err);
            }
        }
    }

    /// Math images need an external renderer, which is never loaded
    /// in-process. Math still renders as back-end markup.
    fn check_math_images(&mut self) {
        if !self.config.math_rendering {
            return;
        }
        let Some(image_backend) = self.config.math_image_backend.clone() else {
            return;
        };

        let required_by = "math_image_backend is set";
        if self.config.math_output_dir.is_none() {
            self.record(ConfigurationError::MissingOption {
                option: "math_output_dir",
                required_by,
            });
        }
        if self.config.math_output_url.is_none() {
            self.record(ConfigurationError::MissingOption {
                option: "math_output_url",
                required_by,
            });
        }
        self.record(ConfigurationError::BackendUnavailable {
            backend: image_backend,
            reason: "math images are not rendered in-process; math is emitted as markup"
                .to_string(),
        });
    }

    fn record(&mut self, err: ConfigurationError) {
        log::warn!("markup configuration: {err}");
        self.errors.push(err);
    }
}

impl Default for MarkupRegistry {
    fn default() -> Self {
        Self::new(MarkupConfig::default())
    }
}

impl fmt::Debug for MarkupRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<&str> = self.converters.keys().map(MarkupKind::as_str).collect();
        kinds.sort_unstable();
        f.debug_struct("MarkupRegistry")
            .field("config", &self.config)
            .field("kinds", &kinds)
            .field("errors", &self.errors)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registry_converts_markdown_and_textile() {
        let registry = MarkupRegistry::default();
        assert!(registry.configuration_errors().is_empty());

        let html = registry.convert(&MarkupKind::Markdown, "**hi**").unwrap();
        assert!(html.contains("<strong>hi</strong>"), "{html}");

        let html = registry.convert(&MarkupKind::Textile, "h2. Hi").unwrap();
        assert_eq!(html, "<h2>Hi</h2>");
    }

    #[test]
    fn unregistered_kind_is_unsupported() {
        let registry = MarkupRegistry::default();
        let kind = MarkupKind::Other("adoc".into());
        let err = registry.convert(&kind, "= Title").unwrap_err();
        assert!(matches!(err, MarkupError::UnsupportedKind(MarkupKind::Other(ref name)) if name == "adoc"), "{err:?}");
    }

    #[test]
    fn haml_converts_without_evaluating_code() {
        use std::error::Error as _;

        let registry = MarkupRegistry::default();
        assert!(registry.supports(&MarkupKind::Haml));
        let html = registry.convert(&MarkupKind::Haml, "%p hello").unwrap();
        assert_eq!(html, "<p>hello</p>\n");

        let err = registry.convert(&MarkupKind::Haml, "%p\n  = 1 + 1").unwrap_err();
        assert!(matches!(err, MarkupError::Conversion { kind: MarkupKind::Haml, .. }), "{err:?}");
        let cause = err.source().unwrap().downcast_ref::<haml::HamlError>().cloned();
        assert!(matches!(cause, Some(haml::HamlError::CodeEvaluation { line: 2, .. })), "{cause:?}");
    }

    #[test]
    fn config_is_kept_for_inspection() {
        let registry = MarkupRegistry::new(MarkupConfig {
            extended_syntax: false,
            ..MarkupConfig::default()
        });
        assert_eq!(registry.config().backend, "markdown-rs");
        assert!(!registry.config().extended_syntax);
    }

    #[test]
    fn unknown_backend_is_recorded_and_disables_markdown() {
        let registry = MarkupRegistry::new(MarkupConfig {
            backend: "rdiscount".into(),
            ..MarkupConfig::default()
        });
        assert_eq!(
            registry.configuration_errors(),
            &[ConfigurationError::UnknownBackend("rdiscount".into())]
        );
        assert!(!registry.supports(&MarkupKind::Markdown));

        let err = registry.convert(&MarkupKind::Markdown, "hi").unwrap_err();
        assert!(matches!(err, MarkupError::Configuration { .. }), "{err:?}");
        // Other kinds keep working.
        assert!(registry.convert(&MarkupKind::Textile, "hi").is_ok());
    }

    #[test]
    fn registering_a_converter_repairs_a_disabled_kind() {
        let mut registry = MarkupRegistry::new(MarkupConfig {
            backend: "maruku".into(),
            ..MarkupConfig::default()
        });
        registry.register(MarkupKind::Markdown, |input: &str| -> Result<String, BoxError> {
            Ok(format!("<p>{input}</p>"))
        });
        assert_eq!(registry.convert(&MarkupKind::Markdown, "x").unwrap(), "<p>x</p>");
    }

    #[test]
    fn converter_failures_keep_their_cause() {
        use std::error::Error as _;

        let mut registry = MarkupRegistry::bare(MarkupConfig::default());
        registry.register(MarkupKind::Haml, |_: &str| -> Result<String, BoxError> {
            Err("suppressed eval".into())
        });
        let err = registry.convert(&MarkupKind::Haml, "= 1 + 1").unwrap_err();
        assert!(matches!(err, MarkupError::Conversion { .. }), "{err:?}");
        assert_eq!(err.source().unwrap().to_string(), "suppressed eval");
    }

    #[test]
    fn math_image_backend_requires_output_options() {
        let registry = MarkupRegistry::new(MarkupConfig {
            math_rendering: true,
            math_image_backend: Some("blahtex".into()),
            math_output_dir: Some("images/latex".into()),
            ..MarkupConfig::default()
        });
        let errors = registry.configuration_errors();
        assert_eq!(errors.len(), 2, "{errors:?}");
        assert!(matches!(
            errors[0],
            ConfigurationError::MissingOption {
                option: "math_output_url",
                ..
            }
        ));
        assert!(matches!(errors[1], ConfigurationError::BackendUnavailable { .. }));
        // Markdown itself stays usable and emits math markup.
        let html = registry.convert(&MarkupKind::Markdown, "$x$").unwrap();
        assert!(html.contains("math-inline"), "{html}");
    }

    #[test]
    fn math_image_options_ignored_without_math() {
        let registry = MarkupRegistry::new(MarkupConfig {
            math_image_backend: Some("blahtex".into()),
            ..MarkupConfig::default()
        });
        assert!(registry.configuration_errors().is_empty());
    }
}
