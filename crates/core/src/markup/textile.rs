//! A small Textile converter.
//!
//! Covers the commonly used subset: block signatures (`h1.`-`h6.`, `p.`,
//! `bq.`), single-level bulleted and numbered lists, paragraphs with hard
//! line breaks, phrase modifiers (`*strong*`, `_em_`, `@code@`, `-del-`) and
//! `"text":url` links. Raw HTML is passed through.

/// Convert Textile to HTML.
pub fn to_html(input: &str) -> String {
    split_blocks(input)
        .iter()
        .map(|block| render_block(block))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Groups lines into blocks separated by blank lines.
fn split_blocks(input: &str) -> Vec<Vec<&str>> {
    let mut blocks = Vec::new();
    let mut current = Vec::new();
    for line in input.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }
    blocks
}

fn render_block(lines: &[&str]) -> String {
    if let Some(items) = list_items(lines, "* ") {
        return render_list("ul", &items);
    }
    if let Some(items) = list_items(lines, "# ") {
        return render_list("ol", &items);
    }

    let first = lines[0];
    let (signature, rest) = match first.split_once(". ") {
        Some((signature, rest)) if is_signature(signature) => (signature, rest),
        _ => ("p", first),
    };

    let mut text_lines = Vec::with_capacity(lines.len());
    text_lines.push(rest);
    text_lines.extend_from_slice(&lines[1..]);

    match signature {
        "bq" => format!(
            "<blockquote>\n<p>{}</p>\n</blockquote>",
            render_lines(&text_lines)
        ),
        "p" => format!("<p>{}</p>", render_lines(&text_lines)),
        heading => format!(
            "<{heading}>{}</{heading}>",
            render_inline(&text_lines.join(" "))
        ),
    }
}

fn is_signature(candidate: &str) -> bool {
    matches!(
        candidate,
        "p" | "bq" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6"
    )
}

fn list_items<'a>(lines: &[&'a str], marker: &str) -> Option<Vec<&'a str>> {
    lines
        .iter()
        .map(|&line| line.strip_prefix(marker))
        .collect()
}

fn render_list(tag: &str, items: &[&str]) -> String {
    let mut out = format!("<{tag}>\n");
    for item in items {
        out.push_str("<li>");
        out.push_str(&render_inline(item.trim()));
        out.push_str("</li>\n");
    }
    out.push_str(&format!("</{tag}>"));
    out
}

/// Renders lines of one paragraph, turning single newlines into `<br />`.
fn render_lines(lines: &[&str]) -> String {
    lines
        .iter()
        .map(|line| render_inline(line))
        .collect::<Vec<_>>()
        .join("<br />\n")
}

fn span_tag(marker: char) -> Option<&'static str> {
    match marker {
        '*' => Some("strong"),
        '_' => Some("em"),
        '@' => Some("code"),
        '-' => Some("del"),
        _ => None,
    }
}

fn render_inline(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c == '"' {
            if let Some((link, next)) = parse_link(&chars, i) {
                out.push_str(&link);
                i = next;
                continue;
            }
        }

        if let Some(tag) = span_tag(c) {
            if let Some(close) = find_span_close(&chars, i) {
                let inner: String = chars[i + 1..close].iter().collect();
                let inner = if tag == "code" {
                    html_escape::encode_text(&inner).into_owned()
                } else {
                    render_inline(&inner)
                };
                out.push_str(&format!("<{tag}>{inner}</{tag}>"));
                i = close + 1;
                continue;
            }
        }

        out.push(c);
        i += 1;
    }

    out
}

/// Finds the closing marker for a phrase modifier opening at `open`.
///
/// The opener must not follow an alphanumeric character and must be
/// followed by a non-space; the closer must follow a non-space and must not
/// be followed by an alphanumeric character.
fn find_span_close(chars: &[char], open: usize) -> Option<usize> {
    let marker = chars[open];
    if open > 0 && chars[open - 1].is_alphanumeric() {
        return None;
    }
    let first = *chars.get(open + 1)?;
    if first.is_whitespace() || first == marker {
        return None;
    }

    (open + 2..chars.len()).find(|&j| {
        chars[j] == marker
            && !chars[j - 1].is_whitespace()
            && chars.get(j + 1).is_none_or(|next| !next.is_alphanumeric())
    })
}

/// Parses `"text":url` starting at the opening quote.
fn parse_link(chars: &[char], open: usize) -> Option<(String, usize)> {
    let close = (open + 1..chars.len()).find(|&j| chars[j] == '"')?;
    if close == open + 1 || chars.get(close + 1) != Some(&':') {
        return None;
    }

    let url_start = close + 2;
    let mut url_end = (url_start..chars.len())
        .find(|&j| chars[j].is_whitespace())
        .unwrap_or(chars.len());
    while url_end > url_start
        && matches!(chars[url_end - 1], '.' | ',' | ';' | ':' | '!' | '?' | ')')
    {
        url_end -= 1;
    }
    if url_end == url_start {
        return None;
    }

    let text: String = chars[open + 1..close].iter().collect();
    let url: String = chars[url_start..url_end].iter().collect();
    let html = format!(
        "<a href=\"{}\">{}</a>",
        html_escape::encode_double_quoted_attribute(&url),
        render_inline(&text)
    );
    Some((html, url_end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headings_and_paragraphs() {
        assert_eq!(to_html("h1. Hello *world*"), "<h1>Hello <strong>world</strong></h1>");
        assert_eq!(
            to_html("First line\nsecond line\n\np. Next"),
            "<p>First line<br />\nsecond line</p>\n<p>Next</p>"
        );
    }

    #[test]
    fn blockquotes() {
        assert_eq!(
            to_html("bq. Quoted _text_"),
            "<blockquote>\n<p>Quoted <em>text</em></p>\n</blockquote>"
        );
    }

    #[test]
    fn lists() {
        assert_eq!(to_html("* one\n* two"), "<ul>\n<li>one</li>\n<li>two</li>\n</ul>");
        assert_eq!(to_html("# one\n# two"), "<ol>\n<li>one</li>\n<li>two</li>\n</ol>");
    }

    #[test]
    fn phrase_modifiers_need_word_boundaries() {
        assert_eq!(to_html("a-b and -gone-"), "<p>a-b and <del>gone</del></p>");
        assert_eq!(to_html("snake_case_name"), "<p>snake_case_name</p>");
        assert_eq!(to_html("2 * 3 * 4"), "<p>2 * 3 * 4</p>");
    }

    #[test]
    fn code_spans_escape_html() {
        assert_eq!(to_html("Use @<br>@ tags"), "<p>Use <code>&lt;br&gt;</code> tags</p>");
    }

    #[test]
    fn links_drop_trailing_punctuation() {
        assert_eq!(
            to_html("See \"Jekyll\":http://jekyllrb.com."),
            "<p>See <a href=\"http://jekyllrb.com\">Jekyll</a>.</p>"
        );
    }

    #[test]
    fn raw_html_passes_through() {
        assert_eq!(to_html("<span>hi</span>"), "<p><span>hi</span></p>");
    }
}
