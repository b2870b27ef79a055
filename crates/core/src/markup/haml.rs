//! A small Haml converter with code evaluation switched off.
//!
//! Supported: `%tag` elements with `.class` and `#id` shorthands (a bare
//! shorthand means `div`), HTML-style `(name="value")` attributes, inline
//! text after the tag, nesting by indentation, trailing `/` for
//! self-closing tags, `!!!` doctypes, `/` HTML comments, `-#` silent
//! comments, `\` escapes and plain text.
//!
//! Anything that would run code (`=`, `-`, `!=`, `&=`, `~`, Ruby hash
//! attributes and `#{}` interpolation) is rejected.

use thiserror::Error;

const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "hr", "img", "input", "link", "meta",
];

/// Errors reported by the Haml converter. Lines are 1-indexed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HamlError {
    /// The line would evaluate code.
    #[error("line {line}: code evaluation is disabled: {snippet}")]
    CodeEvaluation {
        /// Offending line
        line: usize,
        /// The source text of the line
        snippet: String,
    },
    /// The line is nested under something that cannot hold children.
    #[error("line {line}: illegal nesting")]
    IllegalNesting {
        /// Offending line
        line: usize,
    },
    /// The tag, class, id or attribute syntax is not understood.
    #[error("line {line}: invalid tag: {snippet}")]
    InvalidTag {
        /// Offending line
        line: usize,
        /// The source text of the line
        snippet: String,
    },
}

#[derive(Debug, PartialEq)]
enum NodeKind {
    Doctype,
    Text(String),
    Comment(String),
    Element(Element),
}

#[derive(Debug, Default, PartialEq)]
struct Element {
    tag: String,
    classes: Vec<String>,
    id: Option<String>,
    attributes: Vec<(String, String)>,
    text: Option<String>,
    self_closing: bool,
}

#[derive(Debug)]
struct Node {
    kind: NodeKind,
    children: Vec<Node>,
}

impl Node {
    fn accepts_children(&self) -> bool {
        match &self.kind {
            NodeKind::Element(element) => {
                element.text.is_none()
                    && !element.self_closing
                    && !VOID_TAGS.contains(&element.tag.as_str())
            }
            NodeKind::Comment(text) => text.is_empty(),
            NodeKind::Doctype | NodeKind::Text(_) => false,
        }
    }
}

struct Open {
    indent: usize,
    node: Node,
}

/// Convert Haml to HTML, two spaces of indentation per nesting level.
pub fn to_html(input: &str) -> Result<String, HamlError> {
    let mut out = String::with_capacity(input.len() * 2);
    for node in parse(input)? {
        render(&node, 0, &mut out);
    }
    Ok(out)
}

fn parse(input: &str) -> Result<Vec<Node>, HamlError> {
    let mut roots = Vec::new();
    let mut stack: Vec<Open> = Vec::new();
    let mut silent_above: Option<usize> = None;

    for (index, raw) in input.lines().enumerate() {
        let line = index + 1;
        let content = raw.trim_start_matches([' ', '\t']);
        if content.trim().is_empty() {
            continue;
        }
        let indent = raw.len() - content.len();

        if let Some(level) = silent_above {
            if indent > level {
                continue;
            }
            silent_above = None;
        }

        close_to(&mut stack, &mut roots, indent);

        let Some(kind) = parse_line(content.trim_end(), line)? else {
            silent_above = Some(indent);
            continue;
        };

        match stack.last() {
            Some(parent) if !parent.node.accepts_children() => {
                return Err(HamlError::IllegalNesting { line });
            }
            None if indent > 0 => return Err(HamlError::IllegalNesting { line }),
            _ => {}
        }

        stack.push(Open {
            indent,
            node: Node {
                kind,
                children: Vec::new(),
            },
        });
    }

    close_to(&mut stack, &mut roots, 0);
    Ok(roots)
}

/// Closes every open node indented at least `indent`.
fn close_to(stack: &mut Vec<Open>, roots: &mut Vec<Node>, indent: usize) {
    while stack.last().is_some_and(|open| open.indent >= indent) {
        let Some(open) = stack.pop() else { break };
        match stack.last_mut() {
            Some(parent) => parent.node.children.push(open.node),
            None => roots.push(open.node),
        }
    }
}

/// Parses one trimmed line. `None` marks a silent comment.
fn parse_line(content: &str, line: usize) -> Result<Option<NodeKind>, HamlError> {
    let code = || HamlError::CodeEvaluation {
        line,
        snippet: content.to_string(),
    };

    if content.starts_with("-#") {
        return Ok(None);
    }
    if content.starts_with("!!!") {
        return Ok(Some(NodeKind::Doctype));
    }
    if ["=", "-", "!=", "&=", "~"]
        .iter()
        .any(|prefix| content.starts_with(prefix))
    {
        return Err(code());
    }
    if let Some(rest) = content.strip_prefix('\\') {
        return Ok(Some(NodeKind::Text(rest.to_string())));
    }
    if let Some(rest) = content.strip_prefix('/') {
        return Ok(Some(NodeKind::Comment(rest.trim().to_string())));
    }
    if content.contains("#{") {
        return Err(code());
    }
    if content.starts_with(['%', '.', '#']) {
        return parse_element(content, line).map(|element| Some(NodeKind::Element(element)));
    }
    Ok(Some(NodeKind::Text(content.to_string())))
}

fn parse_element(content: &str, line: usize) -> Result<Element, HamlError> {
    let invalid = || HamlError::InvalidTag {
        line,
        snippet: content.to_string(),
    };

    let mut element = Element {
        tag: "div".to_string(),
        ..Element::default()
    };
    let mut rest = content;

    if let Some(after) = rest.strip_prefix('%') {
        let (name, tail) = take_name(after);
        if name.is_empty() {
            return Err(invalid());
        }
        element.tag = name.to_string();
        rest = tail;
    }

    while let Some(marker) = rest.chars().next().filter(|c| matches!(c, '.' | '#')) {
        let (name, tail) = take_name(&rest[1..]);
        if name.is_empty() {
            return Err(invalid());
        }
        if marker == '.' {
            element.classes.push(name.to_string());
        } else {
            element.id = Some(name.to_string());
        }
        rest = tail;
    }

    if rest.starts_with('{') {
        return Err(HamlError::CodeEvaluation {
            line,
            snippet: content.to_string(),
        });
    }
    if let Some(after) = rest.strip_prefix('(') {
        let close = after.find(')').ok_or_else(invalid)?;
        element.attributes = parse_attributes(&after[..close]).ok_or_else(invalid)?;
        rest = &after[close + 1..];
    }

    if ["=", "!=", "&=", "~"]
        .iter()
        .any(|prefix| rest.starts_with(prefix))
    {
        return Err(HamlError::CodeEvaluation {
            line,
            snippet: content.to_string(),
        });
    }

    if let Some(after) = rest.strip_prefix('/') {
        if !after.trim().is_empty() {
            return Err(invalid());
        }
        element.self_closing = true;
    } else if rest.starts_with(' ') {
        let text = rest.trim();
        if !text.is_empty() {
            element.text = Some(text.to_string());
        }
    } else if !rest.is_empty() {
        return Err(invalid());
    }

    Ok(element)
}

fn take_name(input: &str) -> (&str, &str) {
    let end = input
        .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':')))
        .unwrap_or(input.len());
    input.split_at(end)
}

/// Parses `a="x" b='y' c=z` pairs.
fn parse_attributes(input: &str) -> Option<Vec<(String, String)>> {
    let mut attributes = Vec::new();
    let mut rest = input.trim_start();

    while !rest.is_empty() {
        let (name, tail) = take_name(rest);
        if name.is_empty() {
            return None;
        }
        let tail = tail.trim_start().strip_prefix('=')?.trim_start();
        let (value, tail) = match tail.chars().next()? {
            quote @ ('"' | '\'') => {
                let body = &tail[1..];
                let end = body.find(quote)?;
                (&body[..end], &body[end + 1..])
            }
            _ => {
                let end = tail.find(char::is_whitespace).unwrap_or(tail.len());
                tail.split_at(end)
            }
        };
        attributes.push((name.to_string(), value.to_string()));
        rest = tail.trim_start();
    }

    Some(attributes)
}

fn open_tag(element: &Element) -> String {
    let mut tag = format!("<{}", element.tag);
    if !element.classes.is_empty() {
        push_attribute(&mut tag, "class", &element.classes.join(" "));
    }
    if let Some(id) = &element.id {
        push_attribute(&mut tag, "id", id);
    }
    for (name, value) in &element.attributes {
        push_attribute(&mut tag, name, value);
    }
    tag
}

fn push_attribute(tag: &mut String, name: &str, value: &str) {
    tag.push_str(&format!(
        " {name}=\"{}\"",
        html_escape::encode_double_quoted_attribute(value)
    ));
}

fn render(node: &Node, depth: usize, out: &mut String) {
    let pad = "  ".repeat(depth);
    match &node.kind {
        NodeKind::Doctype => out.push_str(&format!("{pad}<!DOCTYPE html>\n")),
        NodeKind::Text(text) => out.push_str(&format!("{pad}{text}\n")),
        NodeKind::Comment(text) if node.children.is_empty() => {
            out.push_str(&format!("{pad}<!-- {text} -->\n"));
        }
        NodeKind::Comment(_) => {
            out.push_str(&format!("{pad}<!--\n"));
            render_children(node, depth, out);
            out.push_str(&format!("{pad}-->\n"));
        }
        NodeKind::Element(element) => {
            let open = open_tag(element);
            let tag = &element.tag;
            let is_void = VOID_TAGS.contains(&tag.as_str());
            if element.self_closing || (is_void && element.text.is_none()) {
                out.push_str(&format!("{pad}{open} />\n"));
            } else if node.children.is_empty() {
                let text = element.text.as_deref().unwrap_or_default();
                out.push_str(&format!("{pad}{open}>{text}</{tag}>\n"));
            } else {
                out.push_str(&format!("{pad}{open}>\n"));
                render_children(node, depth, out);
                out.push_str(&format!("{pad}</{tag}>\n"));
            }
        }
    }
}

fn render_children(node: &Node, depth: usize, out: &mut String) {
    for child in &node.children {
        render(child, depth + 1, out);
    }
}
