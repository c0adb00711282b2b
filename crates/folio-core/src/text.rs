use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static ENTITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(#[xX][0-9a-fA-F]{1,6}|#[0-9]{1,7}|[a-zA-Z]{2,8});").expect("entity regex is valid")
});
static BLOCK_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)</?p\b[^>]*>|<br\s*/?>").expect("break regex is valid"));
static ENTITY_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^&(#[xX][0-9a-fA-F]+|#[0-9]+|[a-zA-Z][a-zA-Z0-9]*);").expect("entity prefix regex is valid")
});
static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("tag regex is valid"));

// Single pass; entities outside the table are left as written.
pub fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    ENTITY
        .replace_all(text, |caps: &Captures| match entity_char(&caps[1]) {
            Some(ch) => ch.to_string(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

fn entity_char(name: &str) -> Option<char> {
    if let Some(num) = name.strip_prefix('#') {
        let code = match num.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse::<u32>().ok()?,
        };
        return match code {
            34 => Some('"'),
            38 => Some('&'),
            39 => Some('\''),
            60 => Some('<'),
            62 => Some('>'),
            160 => Some(' '),
            8211 => Some('\u{2013}'),
            8212 => Some('\u{2014}'),
            8216 => Some('\u{2018}'),
            8217 => Some('\u{2019}'),
            8220 => Some('\u{201C}'),
            8221 => Some('\u{201D}'),
            8230 => Some('\u{2026}'),
            _ => None,
        };
    }
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some(' '),
        "ndash" => Some('\u{2013}'),
        "mdash" => Some('\u{2014}'),
        "lsquo" => Some('\u{2018}'),
        "rsquo" => Some('\u{2019}'),
        "ldquo" => Some('\u{201C}'),
        "rdquo" => Some('\u{201D}'),
        "hellip" => Some('\u{2026}'),
        _ => None,
    }
}

pub fn strip_tags(html: &str) -> String {
    let spaced = BLOCK_BREAK.replace_all(html, " ");
    let bare = TAG.replace_all(&spaced, "");
    collapse_whitespace(&bare)
}

pub(crate) fn remove_tags(html: &str) -> String {
    TAG.replace_all(html, "").into_owned()
}

pub fn clean_for_label(html: &str) -> String {
    decode_entities(&strip_tags(html)).trim().to_string()
}

pub fn collapse_whitespace(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut last_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !last_space {
                out.push(' ');
            }
            last_space = true;
        } else {
            out.push(ch);
            last_space = false;
        }
    }
    out.trim().to_string()
}

pub fn slugify(html: &str) -> String {
    let text = clean_for_label(html).to_lowercase();
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;
    for ch in text.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(ch);
        } else {
            pending_hyphen = true;
        }
    }
    slug
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escapes text that may already carry entity references, leaving those
/// references intact.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for (idx, ch) in text.char_indices() {
        match ch {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' if !starts_entity(&text[idx..]) => out.push_str("&amp;"),
            _ => out.push(ch),
        }
    }
    out
}

fn starts_entity(s: &str) -> bool {
    ENTITY_PREFIX.is_match(s)
}
