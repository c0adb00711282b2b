use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::scan::find_balanced;

pub(crate) const TOKEN_MARK: char = '\u{1A}';

static TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new("\u{1A}FOLIO([0-9]+)\u{1A}").expect("token regex is valid"));
static CLASSED_OPEN_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<([a-z][a-z0-9]*)\b[^>]*?\bclass\s*=\s*["']([^"']*)["'][^>]*>"#)
        .expect("classed tag regex is valid")
});
static EMBED_FIGURE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?is)<figure\b[^>]*?\bclass\s*=\s*["'][^"']*\bwp-block-(?:embed|video)\b[^"']*["'][^>]*>.*?</figure\s*>"#,
    )
    .expect("embed regex is valid")
});
static IMAGE_FIGURE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?is)<figure\b[^>]*?\bclass\s*=\s*["'][^"']*\bwp-block-image\b[^"']*["'][^>]*>.*?</figure\s*>"#,
    )
    .expect("image regex is valid")
});

const ACCORDION_CLASS: &str = "wp-block-accordion";
const GALLERY_CLASS: &str = "wp-block-gallery";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProtectedKind {
    Accordion,
    Video,
    Image,
    Gallery,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProtectedBlock {
    pub token: String,
    pub content: String,
    pub kind: ProtectedKind,
}

#[derive(Clone, Debug, Default)]
pub struct ProtectedBlocks {
    entries: Vec<ProtectedBlock>,
    next_id: usize,
}

impl ProtectedBlocks {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProtectedBlock> {
        self.entries.iter()
    }

    pub fn take(&mut self, token: &str) -> Option<ProtectedBlock> {
        let idx = self.entries.iter().position(|b| b.token == token)?;
        Some(self.entries.remove(idx))
    }

    fn protect(&mut self, content: &str, kind: ProtectedKind) -> String {
        self.next_id += 1;
        let token = format!("{TOKEN_MARK}FOLIO{}{TOKEN_MARK}", self.next_id);
        self.entries.push(ProtectedBlock {
            token: token.clone(),
            content: content.to_string(),
            kind,
        });
        token
    }

    fn restore_nested(&mut self, fragment: &str) -> String {
        if !fragment.contains(TOKEN_MARK) {
            return fragment.to_string();
        }
        TOKEN
            .replace_all(fragment, |caps: &Captures| match self.take(&caps[0]) {
                Some(block) => block.content,
                None => String::new(),
            })
            .into_owned()
    }
}

pub struct Protected {
    pub html: String,
    pub blocks: ProtectedBlocks,
}

// The gallery pass runs last so images nested in a gallery are already isolated.
pub fn extract_protected(html: &str) -> Protected {
    let mut blocks = ProtectedBlocks::default();
    let html = protect_balanced(html, ACCORDION_CLASS, ProtectedKind::Accordion, &mut blocks, false);
    let html = protect_matches(&html, &EMBED_FIGURE, ProtectedKind::Video, &mut blocks);
    let html = protect_matches(&html, &IMAGE_FIGURE, ProtectedKind::Image, &mut blocks);
    let html = protect_balanced(&html, GALLERY_CLASS, ProtectedKind::Gallery, &mut blocks, true);
    Protected { html, blocks }
}

fn protect_matches(
    html: &str,
    pattern: &Regex,
    kind: ProtectedKind,
    blocks: &mut ProtectedBlocks,
) -> String {
    pattern
        .replace_all(html, |caps: &Captures| blocks.protect(&caps[0], kind))
        .into_owned()
}

// An element that never balances is stepped over.
fn protect_balanced(
    html: &str,
    class_token: &str,
    kind: ProtectedKind,
    blocks: &mut ProtectedBlocks,
    restart: bool,
) -> String {
    let mut html = html.to_string();
    let mut pos = 0;
    while let Some(caps) = CLASSED_OPEN_TAG.captures_at(&html, pos) {
        let Some(open) = caps.get(0) else {
            break;
        };
        let start = open.start();
        if !has_class(&caps[2], class_token) {
            pos = start + 1;
            continue;
        }
        let tag = caps[1].to_ascii_lowercase();
        let Some(element) = find_balanced(&html, start, &tag) else {
            tracing::debug!(class = class_token, offset = start, "unbalanced container left unprotected");
            pos = start + 1;
            continue;
        };
        let end = start + element.len();
        let original = blocks.restore_nested(element);
        let token = blocks.protect(&original, kind);
        html.replace_range(start..end, &token);
        pos = if restart { 0 } else { start + token.len() };
    }
    html
}

fn has_class(class_attr: &str, token: &str) -> bool {
    class_attr.split_whitespace().any(|class| class == token)
}

pub(crate) fn split_tokens(text: &str) -> Vec<Piece<'_>> {
    let mut pieces = Vec::new();
    let mut last = 0;
    for m in TOKEN.find_iter(text) {
        if m.start() > last {
            pieces.push(Piece::Text(&text[last..m.start()]));
        }
        pieces.push(Piece::Token(m.as_str()));
        last = m.end();
    }
    if last < text.len() {
        pieces.push(Piece::Text(&text[last..]));
    }
    pieces
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Piece<'a> {
    Text(&'a str),
    Token(&'a str),
}
