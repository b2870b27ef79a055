use crate::SourceLocation;
use crate::document::Metadata;
use serde_json::Value as JsonValue;
use thiserror::Error;

const MARKER: &str = "---";

/// Result of separating front matter from a source file.
#[derive(Debug, Clone, PartialEq)]
pub struct FrontmatterSplit<'a> {
    /// Parsed front matter; empty when the file has none.
    pub metadata: Metadata,
    /// Everything after the closing marker line.
    pub body: &'a str,
    /// Byte offset inside the original text where `body` begins.
    pub body_start: usize,
}

impl<'a> FrontmatterSplit<'a> {
    fn without_metadata(input: &'a str) -> Self {
        Self {
            metadata: Metadata::new(),
            body: input,
            body_start: 0,
        }
    }
}

/// Errors emitted while parsing front matter.
#[derive(Debug, Error)]
pub enum FrontmatterError {
    /// The block between the markers is not valid YAML.
    #[error("malformed front matter{}: {message}", .location.as_ref().map(|l| format!(" at {l}")).unwrap_or_default())]
    Malformed {
        /// Parser message
        message: String,
        /// Position in the source file, when the parser reports one
        location: Option<SourceLocation>,
    },
    /// Top-level YAML node was not a mapping.
    #[error("malformed front matter: the block must be a YAML mapping")]
    InvalidRootType,
}

impl FrontmatterError {
    /// Names the file the front matter came from in the error location.
    pub fn in_file(self, file: impl Into<String>) -> Self {
        match self {
            Self::Malformed {
                message,
                location: Some(location),
            } => Self::Malformed {
                message,
                location: Some(location.in_file(file)),
            },
            other => other,
        }
    }
}

/// Splits a source file into its front matter and body.
///
/// The front matter block must start at byte 0 with a `---` line (trailing
/// whitespace allowed) and ends at the next line starting with `---`. Text
/// without that shape is returned untouched as the body.
///
/// ```
/// use quire_core::frontmatter::split;
///
/// let split = split("---\ntitle: Hello\n---\nBody\n").unwrap();
/// assert_eq!(split.metadata["title"], "Hello");
/// assert_eq!(split.body, "Body\n");
/// ```
pub fn split(input: &str) -> Result<FrontmatterSplit<'_>, FrontmatterError> {
    match find_block(input) {
        Some(block) => {
            let metadata = parse_yaml_block(block.yaml)?;
            Ok(FrontmatterSplit {
                metadata,
                body: &input[block.body_start..],
                body_start: block.body_start,
            })
        }
        None => Ok(FrontmatterSplit::without_metadata(input)),
    }
}

struct Block<'a> {
    yaml: &'a str,
    body_start: usize,
}

fn find_block(input: &str) -> Option<Block<'_>> {
    let (opening, yaml_start) = next_line(input, 0)?;
    if !is_opening_marker(opening) {
        return None;
    }

    let mut cursor = yaml_start;
    while let Some((line, next_cursor)) = next_line(input, cursor) {
        if line.starts_with(MARKER) {
            return Some(Block {
                yaml: &input[yaml_start..cursor],
                body_start: next_cursor,
            });
        }
        cursor = next_cursor;
    }

    None
}

/// Returns the line starting at `start` (without its `\n`) and the offset of
/// the following line. Lines without a terminating newline are not returned:
/// both marker lines must end with one.
fn next_line(input: &str, start: usize) -> Option<(&str, usize)> {
    if start >= input.len() {
        return None;
    }

    let bytes = &input.as_bytes()[start..];
    let pos = bytes.iter().position(|b| *b == b'\n')?;
    let line_end = start + pos;
    Some((&input[start..line_end], line_end + 1))
}

fn is_opening_marker(line: &str) -> bool {
    line.strip_prefix(MARKER)
        .is_some_and(|rest| rest.chars().all(char::is_whitespace))
}

fn parse_yaml_block(block: &str) -> Result<Metadata, FrontmatterError> {
    if block.trim().is_empty() {
        return Ok(Metadata::new());
    }

    let yaml_value: serde_yaml::Value =
        serde_yaml::from_str(block).map_err(|err| FrontmatterError::Malformed {
            message: err.to_string(),
            location: err
                .location()
                // YAML starts on the line after the opening marker.
                .map(|loc| SourceLocation::new(loc.line() + 1, loc.column())),
        })?;
    let json_value = serde_json::to_value(yaml_value).map_err(|err| FrontmatterError::Malformed {
        message: err.to_string(),
        location: None,
    })?;

    match json_value {
        JsonValue::Null => Ok(Metadata::new()),
        JsonValue::Object(map) => Ok(map),
        _ => Err(FrontmatterError::InvalidRootType),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(input: &str) -> FrontmatterSplit<'_> {
        split(input).expect("front matter split should succeed")
    }

    #[test]
    fn returns_input_unchanged_without_front_matter() {
        for input in ["# Title\nBody", "", "  ---\nfoo: bar\n---\n", "\n---\na: 1\n---\n"] {
            let result = extract(input);
            assert!(result.metadata.is_empty());
            assert_eq!(result.body, input);
            assert_eq!(result.body_start, 0);
        }
    }

    #[test]
    fn parses_basic_yaml() {
        let input = "---\ntitle: Example\ntags:\n  - rust\n  - jekyll\n---\n# Content";
        let result = extract(input);
        assert_eq!(result.body, "# Content");
        assert_eq!(result.body_start, input.find("# Content").unwrap());
        assert_eq!(result.metadata["title"], "Example");
        assert_eq!(result.metadata["tags"], serde_json::json!(["rust", "jekyll"]));
    }

    #[test]
    fn handles_empty_block() {
        let result = extract("---\n---\n# Body");
        assert!(result.metadata.is_empty());
        assert_eq!(result.body, "# Body");
    }

    #[test]
    fn opening_marker_allows_trailing_whitespace() {
        let result = extract("---  \r\nlayout: post\r\n---\r\nhi");
        assert_eq!(result.metadata["layout"], "post");
        assert_eq!(result.body, "hi");
    }

    #[test]
    fn closing_marker_may_carry_trailing_content() {
        let result = extract("---\nlayout: post\n--- end of header\nhi\n---\nmore");
        assert_eq!(result.metadata["layout"], "post");
        assert_eq!(result.body, "hi\n---\nmore");
    }

    #[test]
    fn unterminated_block_is_treated_as_body() {
        for input in ["---\ntitle: test", "---\ntitle: test\n---"] {
            let result = extract(input);
            assert!(result.metadata.is_empty());
            assert_eq!(result.body, input);
        }
    }

    #[test]
    fn null_yaml_yields_empty_metadata() {
        let result = extract("---\n~\n---\nbody");
        assert!(result.metadata.is_empty());
        assert_eq!(result.body, "body");
    }

    #[test]
    fn errors_on_invalid_yaml() {
        let err = split("---\ntitle: ok\ninvalid: [unterminated\n---\n").unwrap_err();
        match err {
            FrontmatterError::Malformed { location, .. } => {
                if let Some(location) = location {
                    assert!(location.line >= 2, "{location}");
                }
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn errors_can_name_their_file() {
        let err = split("---\ntitle: [unterminated\n---\n")
            .unwrap_err()
            .in_file("_posts/broken.md");
        match &err {
            FrontmatterError::Malformed {
                location: Some(location),
                ..
            } => assert_eq!(location.file.as_deref(), Some("_posts/broken.md")),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains("at _posts/broken.md:"), "{err}");

        let err = split("---\n- a\n---\n").unwrap_err().in_file("a.md");
        assert!(matches!(err, FrontmatterError::InvalidRootType));
    }

    #[test]
    fn errors_on_non_mapping_root() {
        let err = split("---\n- a\n- b\n---\nbody").unwrap_err();
        assert!(matches!(err, FrontmatterError::InvalidRootType), "{err:?}");
    }
}
