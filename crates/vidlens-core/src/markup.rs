//! Conversion of the analysis markup dialect to HTML.
//!
//! The analysis service answers with a small markdown-like dialect:
//! `#` headings, `**bold**` spans, `- **label** : text` list items, bare
//! URLs and newline-separated lines. [`transform`] rewrites it into an
//! [`HtmlFragment`] through a fixed sequence of passes. Each pass reads the
//! output of the previous one, so the order is part of the contract: list
//! items, for instance, are recognised by the `<strong>` the bold pass
//! produced.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// HTML produced by the markup transformer.
///
/// Only `h3`, `h4`, `strong`, `li`, `ul`, `a` and `br` elements are
/// generated, but text outside the recognised patterns is copied verbatim
/// unless [`MarkupOptions::escape_input`] is set. Markup contained in the
/// input therefore survives the conversion: the fragment is only as
/// trustworthy as the text it was built from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct HtmlFragment(String);

impl HtmlFragment {
    /// The HTML as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the fragment, returning the HTML.
    pub fn into_string(self) -> String {
        self.0
    }

    /// Whether the fragment is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for HtmlFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for HtmlFragment {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<HtmlFragment> for String {
    fn from(fragment: HtmlFragment) -> Self {
        fragment.0
    }
}

impl serde::Serialize for HtmlFragment {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Options controlling a [`Transformer`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarkupOptions {
    /// HTML-escape `&`, `<` and `>` in the input before any rule runs, so
    /// the output contains no markup other than the generated elements.
    pub escape_input: bool,
}

/// A rewrite pass over the whole text.
type Pass = fn(&str) -> String;

const PASSES: [Pass; 8] = [
    headings,
    numbered_headers,
    bold,
    list_items,
    group_lists,
    links,
    paragraph_breaks,
    line_breaks,
];

/// Converts analysis markup into an [`HtmlFragment`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Transformer {
    options: MarkupOptions,
}

impl Transformer {
    /// Create a transformer with default options (input passed through).
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transformer with explicit options.
    pub fn with_options(options: MarkupOptions) -> Self {
        Self { options }
    }

    /// The options this transformer was built with.
    pub fn options(&self) -> MarkupOptions {
        self.options
    }

    /// Run every pass over `input`. Never fails; text that matches no rule
    /// is passed through.
    pub fn transform(&self, input: &str) -> HtmlFragment {
        let text = if self.options.escape_input {
            html_escape::encode_text(input).into_owned()
        } else {
            input.to_string()
        };
        HtmlFragment(PASSES.iter().fold(text, |acc, pass| pass(&acc)))
    }
}

/// Convert `input` with the default options.
///
/// ```
/// use vidlens_core::markup::transform;
///
/// let html = transform("## Résumé\n- **Point** : détail");
/// assert_eq!(
///     html.as_str(),
///     "<h3>Résumé</h3><br/><ul><li><strong>Point</strong> : détail</li></ul>",
/// );
/// ```
pub fn transform(input: &str) -> HtmlFragment {
    Transformer::new().transform(input)
}

static NUMBERED_HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\d+\. \*\*.*?\*\* :").expect("NUMBERED_HEADER_RE is a valid regex")
});

static BOLD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("BOLD_RE is a valid regex"));

static LIST_ITEM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^- <strong>(.*?)</strong> : ([^\n]*)").expect("LIST_ITEM_RE is a valid regex")
});

static LIST_ELEMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<li>.*?</li>").expect("LIST_ELEMENT_RE is a valid regex"));

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s<>"]+"#).expect("URL_RE is a valid regex"));

fn push_element(out: &mut String, tag: &str, content: &str) {
    out.push('<');
    out.push_str(tag);
    out.push('>');
    out.push_str(content);
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

/// Text following a leading `#{1,4} ` marker, if `s` starts with one.
fn strip_heading_marker(s: &str) -> Option<&str> {
    let hashes = s.len() - s.trim_start_matches('#').len();
    if (1..=4).contains(&hashes) {
        s[hashes..].strip_prefix(' ')
    } else {
        None
    }
}

fn headings(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 16);
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
        }
        push_heading_line(&mut out, line);
    }
    out
}

/// A heading ends at the end of its line or at the next run of two or more
/// `#`. When that run is itself a valid marker it opens another heading.
fn push_heading_line(out: &mut String, line: &str) {
    let Some(mut content) = strip_heading_marker(line) else {
        out.push_str(line);
        return;
    };
    loop {
        let Some(stop) = content.find("##") else {
            push_element(out, "h3", content);
            return;
        };
        push_element(out, "h3", &content[..stop]);
        let rest = &content[stop..];
        match strip_heading_marker(rest) {
            Some(next) => content = next,
            None => {
                out.push_str(rest);
                return;
            }
        }
    }
}

fn numbered_headers(text: &str) -> String {
    NUMBERED_HEADER_RE
        .replace_all(text, "<h4>${0}</h4>")
        .into_owned()
}

fn bold(text: &str) -> String {
    BOLD_RE
        .replace_all(text, "<strong>${1}</strong>")
        .into_owned()
}

/// Items convert only when followed by another list line, a blank line, or
/// the end of the text.
fn list_items(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 16);
    let mut cursor = 0;
    for caps in LIST_ITEM_RE.captures_iter(text) {
        let (Some(whole), Some(label), Some(rest)) = (caps.get(0), caps.get(1), caps.get(2))
        else {
            continue;
        };
        let follow = &text[whole.end()..];
        if !(follow.is_empty() || follow.starts_with("\n-") || follow.starts_with("\n\n")) {
            continue;
        }
        out.push_str(&text[cursor..whole.start()]);
        out.push_str("<li><strong>");
        out.push_str(label.as_str());
        out.push_str("</strong> : ");
        out.push_str(rest.as_str());
        out.push_str("</li>");
        cursor = whole.end();
    }
    out.push_str(&text[cursor..]);
    out
}

fn push_list(out: &mut String, items: &mut Vec<&str>) {
    if items.is_empty() {
        return;
    }
    out.push_str("<ul>");
    for item in items.drain(..) {
        out.push_str(item);
    }
    out.push_str("</ul>");
}

/// Wraps runs of `<li>` elements in one `<ul>`. Items only join a run when
/// nothing but whitespace separates them; that whitespace is dropped.
fn group_lists(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 16);
    let mut cursor = 0;
    let mut run: Vec<&str> = Vec::new();
    for item in LIST_ELEMENT_RE.find_iter(text) {
        let gap = &text[cursor..item.start()];
        if !run.is_empty() && !gap.trim().is_empty() {
            push_list(&mut out, &mut run);
        }
        if run.is_empty() {
            out.push_str(gap);
        }
        run.push(item.as_str());
        cursor = item.end();
    }
    push_list(&mut out, &mut run);
    out.push_str(&text[cursor..]);
    out
}

fn links(text: &str) -> String {
    URL_RE
        .replace_all(
            text,
            r#"<a href="${0}" target="_blank" rel="noopener noreferrer">${0}</a>"#,
        )
        .into_owned()
}

fn paragraph_breaks(text: &str) -> String {
    text.replace("\n\n", "<br/><br/>")
}

fn line_breaks(text: &str) -> String {
    text.replace('\n', "<br/>")
}
