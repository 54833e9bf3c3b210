//! Text formatting utilities.

use std::time::Duration;

/// Longest slug produced by [`slugify`].
const MAX_SLUG_LEN: usize = 48;

/// Strip the scheme and trailing slashes from a URL for display.
pub fn display_url(url: &str) -> String {
    let url = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    url.trim_end_matches('/').to_string()
}

/// Elapsed time in seconds with one decimal, e.g. `2.4s`.
pub fn format_elapsed(elapsed: Duration) -> String {
    format!("{:.1}s", elapsed.as_secs_f64())
}

/// Lowercase ASCII slug suitable for a file name.
///
/// Runs of anything other than ASCII letters and digits collapse to a single
/// `-`. Falls back to `analysis` when nothing usable remains.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len().min(MAX_SLUG_LEN));
    let mut pending_dash = false;
    for ch in text.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
            if slug.len() >= MAX_SLUG_LEN {
                break;
            }
        } else {
            pending_dash = true;
        }
    }
    if slug.is_empty() {
        "analysis".to_string()
    } else {
        slug
    }
}

/// Simple English pluralization.
pub fn pluralize(count: u64, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}

/// Clock-style duration: `m:ss` below an hour, `h:mm:ss` above.
pub fn format_clock(seconds: u64) -> String {
    let (h, m, s) = (seconds / 3600, seconds / 60 % 60, seconds % 60);
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m}:{s:02}")
    }
}
