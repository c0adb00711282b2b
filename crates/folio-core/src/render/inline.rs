use once_cell::sync::Lazy;
use regex::Regex;

use crate::text::{escape_html, escape_text};
use crate::toc::anchor_embedded_headings;

static INLINE_MARKDOWN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\*\*(.+?)\*\*|\*(.+?)\*|\[([^\]]+)\]\(([^)\s]+)\)")
        .expect("inline markdown regex is valid")
});
static INLINE_MARKUP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)</?(?:a|abbr|b|br|code|del|div|em|figure|h[1-6]|i|iframe|img|ins|li|mark|ol|p|s|small|span|strong|sub|sup|u|ul)\b",
    )
    .expect("inline markup regex is valid")
});

/// Applies `**bold**`, `*italic*` and `[text](url)` to plain text.
pub fn render_inline(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 16);
    let mut last = 0;
    for caps in INLINE_MARKDOWN.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        out.push_str(&escape_text(&text[last..whole.start()]));
        if let Some(bold) = caps.get(1) {
            out.push_str("<strong>");
            out.push_str(&escape_text(bold.as_str()));
            out.push_str("</strong>");
        } else if let Some(italic) = caps.get(2) {
            out.push_str("<em>");
            out.push_str(&escape_text(italic.as_str()));
            out.push_str("</em>");
        } else if let (Some(label), Some(href)) = (caps.get(3), caps.get(4)) {
            if is_safe_url(href.as_str()) {
                out.push_str("<a href=\"");
                out.push_str(&escape_html(href.as_str()));
                out.push_str("\">");
                out.push_str(&escape_text(label.as_str()));
                out.push_str("</a>");
            } else {
                out.push_str(&escape_text(label.as_str()));
            }
        }
        last = whole.end();
    }
    out.push_str(&escape_text(&text[last..]));
    out
}

pub fn has_inline_markup(html: &str) -> bool {
    INLINE_MARKUP.is_match(html)
}

pub(crate) fn rich(html: &str) -> String {
    if has_inline_markup(html) {
        anchor_embedded_headings(html)
    } else {
        render_inline(html)
    }
}

pub(crate) fn is_safe_url(url: &str) -> bool {
    let lower = url.trim().to_ascii_lowercase();
    !["javascript:", "data:", "vbscript:"]
        .iter()
        .any(|scheme| lower.starts_with(scheme))
}
