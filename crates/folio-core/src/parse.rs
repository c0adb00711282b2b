use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::cache::{ImageCache, DEFAULT_CAPACITY};
use crate::types::{BlockKind, ContentBlock, ContentInput, GalleryStyle};

mod extract;
mod protect;
mod scan;
mod split;

#[cfg(test)]
mod tests;

pub use protect::{extract_protected, Protected, ProtectedBlock, ProtectedBlocks, ProtectedKind};
pub use scan::find_balanced;

use extract::ExtractContext;
use split::Splitter;

static COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").expect("comment regex is valid"));

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    pub cloudinary_cloud: String,
    pub gallery_style: GalleryStyle,
    pub image_cache_capacity: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            cloudinary_cloud: "demo".to_string(),
            gallery_style: GalleryStyle::Carousel,
            image_cache_capacity: DEFAULT_CAPACITY,
        }
    }
}

pub struct Parser {
    options: ParseOptions,
    images: ImageCache,
}

impl Parser {
    pub fn new(options: ParseOptions) -> Self {
        let images = ImageCache::new(options.image_cache_capacity);
        Self { options, images }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    pub fn image_cache(&self) -> &ImageCache {
        &self.images
    }

    pub fn parse(&mut self, input: ContentInput) -> Vec<ContentBlock> {
        match input {
            ContentInput::Blocks(blocks) => blocks,
            ContentInput::Html(html) => self.parse_html(&html),
        }
    }

    pub fn parse_html(&mut self, html: &str) -> Vec<ContentBlock> {
        let raw = html.trim();
        if raw.is_empty() {
            return Vec::new();
        }
        let cleaned = COMMENT.replace_all(raw, "");
        let protected = extract_protected(&cleaned);
        tracing::debug!(protected = protected.blocks.len(), "protected constructs lifted");
        let blocks = self.split_blocks(&protected.html, protected.blocks);
        if blocks.is_empty() {
            tracing::debug!("nothing recognised, keeping input as a single paragraph");
            return vec![ContentBlock::new(
                "block-1",
                BlockKind::Paragraph {
                    html: raw.to_string(),
                },
            )];
        }
        blocks
    }

    pub fn split_blocks(
        &mut self,
        processed: &str,
        mut protected: ProtectedBlocks,
    ) -> Vec<ContentBlock> {
        let ctx = ExtractContext {
            cloud: &self.options.cloudinary_cloud,
            gallery_style: self.options.gallery_style,
            images: &mut self.images,
        };
        let mut splitter = Splitter::new(&mut protected, ctx);
        splitter.split(processed);
        let blocks = splitter.finish();
        if !protected.is_empty() {
            tracing::debug!(unresolved = protected.len(), "protected constructs never referenced");
        }
        blocks
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new(ParseOptions::default())
    }
}

pub fn parse_content(input: impl Into<ContentInput>) -> Vec<ContentBlock> {
    Parser::default().parse(input.into())
}

pub fn html_to_blocks(html: &str) -> Vec<ContentBlock> {
    Parser::default().parse_html(html)
}

pub fn split_blocks(processed: &str, protected: ProtectedBlocks) -> Vec<ContentBlock> {
    Parser::default().split_blocks(processed, protected)
}
