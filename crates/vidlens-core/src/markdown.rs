//! Terminal rendering of analysis markup.
//!
//! The analysis dialect is close enough to markdown for termimad to style
//! it directly; [`render_plain`] is used when stdout is not a terminal.

use std::sync::LazyLock;

use regex::Regex;

static HEADING_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^#{1,4} ").expect("HEADING_MARKER_RE is a valid regex"));

/// Render analysis text for terminal display at the given width.
pub fn render(text: &str, width: usize) -> String {
    let skin = termimad::MadSkin::default();
    let width = u16::try_from(width).unwrap_or(u16::MAX);
    let fmt = termimad::FmtText::from(&skin, text, Some(usize::from(width)));
    fmt.to_string()
}

/// Strip heading markers and bold delimiters, keeping everything else.
pub fn render_plain(text: &str) -> String {
    HEADING_MARKER_RE.replace_all(text, "").replace("**", "")
}
