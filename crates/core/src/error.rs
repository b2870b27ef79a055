use crate::markup::MarkupKind;
use thiserror::Error;

/// Boxed error type returned by markup converters.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Position inside a source file, for error reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    /// Path of the file, when the caller supplied one
    pub file: Option<String>,
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed)
    pub column: usize,
}

impl SourceLocation {
    /// A position in an unnamed source.
    pub fn new(line: usize, column: usize) -> Self {
        Self {
            file: None,
            line,
            column,
        }
    }

    /// Attaches the path of the file this position points into.
    pub fn in_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(file) = &self.file {
            write!(f, "{}:{}:{}", file, self.line, self.column)
        } else {
            write!(f, "{}:{}", self.line, self.column)
        }
    }
}

/// Problems detected while configuring the markup registry.
///
/// These never abort configuration. They are logged, kept on the registry,
/// and returned again for every conversion the broken back-end would have
/// handled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// The configured back-end name is not one this build knows about.
    #[error("unknown markdown backend '{0}' (expected 'markdown-rs' or 'pulldown-cmark')")]
    UnknownBackend(String),
    /// The back-end is known but was not compiled in or cannot run here.
    #[error("{backend} is not available: {reason}")]
    BackendUnavailable {
        /// Back-end name as configured
        backend: String,
        /// Why it cannot be used
        reason: String,
    },
    /// A required companion option is missing.
    #[error("option '{option}' is required when {required_by}")]
    MissingOption {
        /// The missing option key
        option: &'static str,
        /// The setting that requires it
        required_by: &'static str,
    },
}

/// Errors raised while converting markup to HTML.
#[derive(Debug, Error)]
pub enum MarkupError {
    /// No converter is registered for the kind.
    #[error("no converter registered for markup kind '{0}'")]
    UnsupportedKind(MarkupKind),
    /// The converter itself failed.
    #[error("failed to convert {kind} content: {source}")]
    Conversion {
        /// Kind being converted
        kind: MarkupKind,
        /// Original converter error
        #[source]
        source: BoxError,
    },
    /// The kind is unusable because its back-end failed to configure.
    #[error("{kind} content cannot be converted: {source}")]
    Configuration {
        /// Kind whose back-end failed
        kind: MarkupKind,
        /// Recorded configuration failure
        #[source]
        source: ConfigurationError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_display_includes_file_when_present() {
        assert_eq!(SourceLocation::new(3, 7).to_string(), "3:7");
        assert_eq!(
            SourceLocation::new(3, 7).in_file("_posts/a.md").to_string(),
            "_posts/a.md:3:7"
        );
    }

    #[test]
    fn conversion_error_keeps_cause() {
        use std::error::Error as _;

        let err = MarkupError::Conversion {
            kind: MarkupKind::Textile,
            source: "boom".into(),
        };
        assert_eq!(err.to_string(), "failed to convert textile content: boom");
        assert_eq!(err.source().map(|s| s.to_string()), Some("boom".into()));
    }
}
