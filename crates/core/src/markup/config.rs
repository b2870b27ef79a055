use serde::{Deserialize, Serialize};

/// Default Markdown back-end name.
pub const DEFAULT_BACKEND: &str = "markdown-rs";

/// Start-up options for the markup registry.
///
/// Usually lifted out of the site configuration file. Every field has a
/// default, so an empty mapping is a valid configuration.
///
/// ```
/// use quire_core::MarkupConfig;
///
/// let config = MarkupConfig::from_yaml_str("backend: pulldown-cmark\nmath_rendering: true").unwrap();
/// assert_eq!(config.backend, "pulldown-cmark");
/// assert!(config.extended_syntax);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkupConfig {
    /// Which converter handles the Markdown family.
    #[serde(alias = "markdown")]
    pub backend: String,
    /// Enable extended syntax (tables, strikethrough, footnotes, task lists, autolinks).
    pub extended_syntax: bool,
    /// Enable `$inline$` and `$$block$$` math.
    pub math_rendering: bool,
    /// Directory rendered math images are written to.
    pub math_output_dir: Option<String>,
    /// Public URL prefix of `math_output_dir`.
    pub math_output_url: Option<String>,
    /// Engine used to render math to images.
    pub math_image_backend: Option<String>,
}

impl Default for MarkupConfig {
    fn default() -> Self {
        Self {
            backend: DEFAULT_BACKEND.to_string(),
            extended_syntax: true,
            math_rendering: false,
            math_output_dir: None,
            math_output_url: None,
            math_image_backend: None,
        }
    }
}

impl MarkupConfig {
    /// Parses a configuration from YAML.
    pub fn from_yaml_str(input: &str) -> Result<Self, serde_yaml::Error> {
        if input.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_defaults() {
        assert_eq!(MarkupConfig::from_yaml_str("").unwrap(), MarkupConfig::default());
        assert_eq!(MarkupConfig::from_yaml_str("{}").unwrap(), MarkupConfig::default());
    }

    #[test]
    fn accepts_markdown_alias_for_backend() {
        let config = MarkupConfig::from_yaml_str("markdown: pulldown-cmark").unwrap();
        assert_eq!(config.backend, "pulldown-cmark");
    }

    #[test]
    fn reads_math_options() {
        let config = MarkupConfig::from_yaml_str(
            "math_rendering: true\nmath_image_backend: blahtex\nmath_output_dir: images/latex\nmath_output_url: /images/latex",
        )
        .unwrap();
        assert!(config.math_rendering);
        assert_eq!(config.math_image_backend.as_deref(), Some("blahtex"));
        assert_eq!(config.math_output_dir.as_deref(), Some("images/latex"));
        assert_eq!(config.math_output_url.as_deref(), Some("/images/latex"));
    }
}
