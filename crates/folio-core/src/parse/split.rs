use once_cell::sync::Lazy;
use regex::Regex;

use crate::text::clean_for_label;
use crate::types::{BlockKind, ContentBlock};

use super::extract::{self, ExtractContext};
use super::protect::{split_tokens, Piece, ProtectedBlocks, ProtectedKind, TOKEN_MARK};
use super::scan::{find_balanced, inner_of};

static TOP_LEVEL_OPEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<(p|h[1-6]|ul|ol|blockquote|figure|div|pre)\b[^>]*>")
        .expect("top-level tag regex is valid")
});
static RULE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<hr\b[^>]*>").expect("hr regex is valid"));
static EMBEDDED_MEDIA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<(?:img|iframe|video|audio)\b").expect("media regex is valid"));

// One block per recognised top-level element, placeholders resolved where
// they sit.
pub(crate) struct Splitter<'a, 'c> {
    protected: &'a mut ProtectedBlocks,
    ctx: ExtractContext<'c>,
    next_id: usize,
    blocks: Vec<ContentBlock>,
}

impl<'a, 'c> Splitter<'a, 'c> {
    pub(crate) fn new(protected: &'a mut ProtectedBlocks, ctx: ExtractContext<'c>) -> Self {
        Self {
            protected,
            ctx,
            next_id: 0,
            blocks: Vec::new(),
        }
    }

    pub(crate) fn finish(self) -> Vec<ContentBlock> {
        self.blocks
    }

    pub(crate) fn split(&mut self, html: &str) {
        let mut pos = 0;
        let mut gap_start = 0;
        while let Some(caps) = TOP_LEVEL_OPEN.captures_at(html, pos) {
            let Some(open) = caps.get(0) else {
                break;
            };
            let tag = caps[1].to_ascii_lowercase();
            let Some(element) = find_balanced(html, open.start(), &tag) else {
                pos = open.end();
                continue;
            };
            self.gap(&html[gap_start..open.start()]);
            self.element(&tag, open.as_str(), element);
            pos = open.start() + element.len();
            gap_start = pos;
        }
        self.gap(&html[gap_start..]);
    }

    fn element(&mut self, tag: &str, open_tag: &str, element: &str) {
        let inner = inner_of(element);
        if inner.contains(TOKEN_MARK) {
            self.container(tag, open_tag, inner);
            return;
        }
        if let Some(level) = heading_level(tag) {
            let text = clean_for_label(inner);
            if !text.is_empty() {
                self.push(BlockKind::Heading { text, level });
            }
            return;
        }
        match tag {
            "blockquote" => self.quote(inner),
            "ul" | "ol" => {
                let items = extract::list_items(inner);
                if !items.is_empty() {
                    self.push(BlockKind::List {
                        items,
                        ordered: tag == "ol",
                    });
                }
            }
            "pre" => self.push(extract::code_block(open_tag, inner)),
            "figure" if inner.to_ascii_lowercase().contains("<img") => {
                match extract::image_block(element, &mut self.ctx) {
                    Some(image) => self.push(BlockKind::Image(image)),
                    None => tracing::debug!("figure without a usable image source dropped"),
                }
            }
            "div" if extract::has_class(open_tag, "wp-block-spacer") => {
                self.push(extract::spacer_block(open_tag))
            }
            "div" if extract::is_callout(open_tag) => {
                self.push(extract::callout_block(open_tag, inner))
            }
            _ => self.paragraph(inner),
        }
    }

    // A container holding placeholders keeps its own kind for the text
    // around them; lists are split per item so no `<li>` fragment leaks.
    fn container(&mut self, tag: &str, open_tag: &str, inner: &str) {
        match tag {
            "ul" | "ol" => self.list_with_tokens(inner, tag == "ol"),
            "blockquote" => self.around_tokens(inner, |this, text| this.quote(text)),
            "div" if extract::is_callout(open_tag) => self.around_tokens(inner, |this, text| {
                this.push(extract::callout_block(open_tag, text))
            }),
            _ => self.split(inner),
        }
    }

    fn list_with_tokens(&mut self, inner: &str, ordered: bool) {
        let mut items = Vec::new();
        for item in extract::list_items(inner) {
            for piece in split_tokens(&item) {
                match piece {
                    Piece::Token(token) => {
                        self.flush_list(&mut items, ordered);
                        self.resolve(token);
                    }
                    Piece::Text(text) if is_visible(text) => items.push(text.trim().to_string()),
                    Piece::Text(_) => {}
                }
            }
        }
        self.flush_list(&mut items, ordered);
    }

    fn flush_list(&mut self, items: &mut Vec<String>, ordered: bool) {
        if !items.is_empty() {
            let items = std::mem::take(items);
            self.push(BlockKind::List { items, ordered });
        }
    }

    fn around_tokens<F>(&mut self, inner: &str, mut emit: F)
    where
        F: FnMut(&mut Self, &str),
    {
        for piece in split_tokens(inner) {
            match piece {
                Piece::Token(token) => self.resolve(token),
                Piece::Text(text) if is_visible(text) => emit(self, text.trim()),
                Piece::Text(_) => {}
            }
        }
    }

    fn quote(&mut self, inner: &str) {
        if let Some(kind) = extract::quote_block(inner) {
            self.push(kind);
        }
    }

    fn gap(&mut self, text: &str) {
        for piece in split_tokens(text) {
            match piece {
                Piece::Token(token) => self.resolve(token),
                Piece::Text(text) => self.loose_text(text),
            }
        }
    }

    // Horizontal rules between elements become dividers.
    fn loose_text(&mut self, text: &str) {
        let mut last = 0;
        for rule in RULE.find_iter(text) {
            self.paragraph(&text[last..rule.start()]);
            self.push(BlockKind::Divider);
            last = rule.end();
        }
        self.paragraph(&text[last..]);
    }

    fn paragraph(&mut self, html: &str) {
        let html = html.trim();
        if !is_visible(html) {
            return;
        }
        self.push(BlockKind::Paragraph {
            html: html.to_string(),
        });
    }

    fn resolve(&mut self, token: &str) {
        let Some(block) = self.protected.take(token) else {
            tracing::debug!("placeholder already consumed");
            return;
        };
        let kind = match block.kind {
            ProtectedKind::Video => extract::video_block(&block.content),
            ProtectedKind::Image => {
                extract::image_block(&block.content, &mut self.ctx).map(BlockKind::Image)
            }
            ProtectedKind::Accordion => extract::accordion_block(&block.content),
            ProtectedKind::Gallery => extract::gallery_block(&block.content, &mut self.ctx),
        };
        match kind {
            Some(kind) => self.push(kind),
            None => tracing::debug!(kind = ?block.kind, "protected block produced nothing"),
        }
    }

    fn push(&mut self, kind: BlockKind) {
        self.next_id += 1;
        let id = format!("block-{}", self.next_id);
        tracing::trace!(id = %id, block_type = kind.type_name(), "block");
        self.blocks.push(ContentBlock { id, kind });
    }
}

fn is_visible(html: &str) -> bool {
    !clean_for_label(html).is_empty() || EMBEDDED_MEDIA.is_match(html)
}

fn heading_level(tag: &str) -> Option<u8> {
    let level = tag.strip_prefix('h')?.parse::<u8>().ok()?;
    (1..=6).contains(&level).then_some(level)
}
