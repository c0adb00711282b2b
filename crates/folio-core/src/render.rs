use std::fmt::{self, Write};

use serde::{Deserialize, Serialize};

use crate::text::{escape_html, slugify};
use crate::types::{AccordionItem, BlockKind, CalloutSeverity, ContentBlock};

mod gallery;
mod inline;
mod lightbox;
mod media;
mod state;


pub use inline::{has_inline_markup, render_inline};
pub use media::embed_url;
pub use state::{
    Carousel, Key, Lightbox, LightboxImage, ScrollLock, ViewState, AUTO_ADVANCE, TRANSITION,
};

pub const DEFAULT_ACCENT: &str = "#b45309";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    pub drop_cap: bool,
    pub highlight_code: bool,
    // used when the accent passed to `render` is not a usable colour
    pub accent_color: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            drop_cap: false,
            highlight_code: true,
            accent_color: DEFAULT_ACCENT.to_string(),
        }
    }
}

pub fn render(
    blocks: &[ContentBlock],
    accent: &str,
    options: &RenderOptions,
    state: &ViewState,
) -> String {
    let mut out = String::with_capacity(blocks.len() * 128);
    match render_to(&mut out, blocks, accent, options, state) {
        Ok(()) => out,
        Err(err) => {
            tracing::warn!(%err, "rendering stopped early");
            out
        }
    }
}

/// Blocks that cannot be shown produce no output; accordion, carousel and
/// lightbox state come from `state`.
pub fn render_to<W: Write>(
    out: &mut W,
    blocks: &[ContentBlock],
    accent: &str,
    options: &RenderOptions,
    state: &ViewState,
) -> fmt::Result {
    let accent = accent_color(accent)
        .or_else(|| accent_color(&options.accent_color))
        .unwrap_or(DEFAULT_ACCENT);
    write!(
        out,
        "<article class=\"folio-article\" style=\"--folio-accent:{accent}\">"
    )?;
    let mut seen_paragraph = false;
    for block in blocks {
        let is_paragraph = matches!(block.kind, BlockKind::Paragraph { .. });
        let drop_cap = options.drop_cap && is_paragraph && !seen_paragraph;
        seen_paragraph |= is_paragraph;
        render_block(out, block, drop_cap, options, state)?;
    }
    lightbox::render_lightbox(out, state.lightbox())?;
    out.write_str("</article>")
}

fn render_block<W: Write>(
    out: &mut W,
    block: &ContentBlock,
    drop_cap: bool,
    options: &RenderOptions,
    state: &ViewState,
) -> fmt::Result {
    let id = block.id.as_str();
    match &block.kind {
        BlockKind::Paragraph { html } => {
            let class = if drop_cap {
                "folio-paragraph folio-drop-cap"
            } else {
                "folio-paragraph"
            };
            write!(out, "<div class=\"{class}\">{}</div>", inline::rich(html))
        }
        BlockKind::Heading { text, level } => heading(out, id, text, *level),
        BlockKind::Image(image) => media::render_image(out, id, image),
        BlockKind::Quote { html, citation } => {
            write!(out, "<blockquote class=\"folio-quote\">{}", inline::rich(html))?;
            if let Some(citation) = citation {
                write!(out, "<cite>{}</cite>", escape_html(citation))?;
            }
            out.write_str("</blockquote>")
        }
        BlockKind::List { items, ordered } => {
            let tag = if *ordered { "ol" } else { "ul" };
            write!(out, "<{tag} class=\"folio-list\">")?;
            for item in items {
                write!(out, "<li>{}</li>", inline::rich(item))?;
            }
            write!(out, "</{tag}>")
        }
        BlockKind::Code { code, language } => {
            code_block(out, code, language.as_deref(), options.highlight_code)
        }
        BlockKind::Gallery { images, style } => {
            gallery::render_gallery(out, id, images, *style, state)
        }
        BlockKind::Spacer { height } => write!(
            out,
            "<div class=\"folio-spacer\" style=\"height:{}px\" aria-hidden=\"true\"></div>",
            height.pixels()
        ),
        BlockKind::Video { url, provider } => media::render_video(out, url, *provider),
        BlockKind::Accordion { items } => accordion(out, id, items, state),
        BlockKind::Callout {
            html,
            severity,
            title,
        } => callout(out, html, *severity, title.as_deref()),
        BlockKind::Divider => out.write_str("<hr class=\"folio-divider\">"),
        BlockKind::File { url, name, size } => {
            media::render_file(out, url, name.as_deref(), size.as_deref())
        }
    }
}

// Levels 1, 2 and 3 get their own scale; 4 and below share one.
fn heading<W: Write>(out: &mut W, id: &str, text: &str, level: u8) -> fmt::Result {
    let level = level.clamp(1, 6);
    let tier = level.min(4);
    let slug = slugify(text);
    write!(
        out,
        "<h{level} id=\"heading-{}\" class=\"folio-heading folio-heading--{tier}\">",
        escape_html(id)
    )?;
    if !slug.is_empty() {
        write!(out, "<a id=\"{slug}\" class=\"folio-anchor\" href=\"#{slug}\"></a>")?;
    }
    write!(out, "{}</h{level}>", escape_html(text))
}

fn code_block<W: Write>(
    out: &mut W,
    code: &str,
    language: Option<&str>,
    highlight_code: bool,
) -> fmt::Result {
    out.write_str("<pre class=\"folio-code\"")?;
    if let Some(lang) = language {
        write!(out, " data-language=\"{}\"", escape_html(lang))?;
    }
    let highlight_code = highlight_code && language.is_some_and(highlight::is_known_language);
    if let Some(bg) = highlight::theme_background().filter(|_| highlight_code) {
        write!(out, " style=\"background:{}\"", bg.hex())?;
    }
    out.write_str("><code>")?;
    if highlight_code {
        out.write_str(&highlight::highlight_html(language, code))?;
    } else {
        out.write_str(&escape_html(code))?;
    }
    out.write_str("</code></pre>")
}

fn accordion<W: Write>(
    out: &mut W,
    id: &str,
    items: &[AccordionItem],
    state: &ViewState,
) -> fmt::Result {
    write!(
        out,
        "<div class=\"folio-accordion\" data-block=\"{}\">",
        escape_html(id)
    )?;
    for (idx, item) in items.iter().enumerate() {
        let open = state.is_accordion_open(id, idx);
        write!(
            out,
            "<div class=\"folio-accordion__item{}\"><button type=\"button\" class=\"folio-accordion__toggle\" \
             data-index=\"{idx}\" aria-expanded=\"{open}\">{}</button><div class=\"folio-accordion__panel\"{}>{}</div></div>",
            if open { " is-open" } else { "" },
            escape_html(&item.question),
            if open { "" } else { " hidden" },
            render_inline(&item.answer),
        )?;
    }
    out.write_str("</div>")
}

fn callout<W: Write>(
    out: &mut W,
    html: &str,
    severity: CalloutSeverity,
    title: Option<&str>,
) -> fmt::Result {
    let (name, icon, color) = match severity {
        CalloutSeverity::Info => ("info", "&#8505;", "#2563eb"),
        CalloutSeverity::Warning => ("warning", "&#9888;", "#d97706"),
        CalloutSeverity::Success => ("success", "&#10003;", "#16a34a"),
        CalloutSeverity::Error => ("error", "&#10005;", "#dc2626"),
    };
    write!(
        out,
        "<aside class=\"folio-callout folio-callout--{name}\" role=\"note\" style=\"--folio-callout:{color}\">\
         <span class=\"folio-callout__icon\" aria-hidden=\"true\">{icon}</span><div class=\"folio-callout__body\">"
    )?;
    if let Some(title) = title {
        write!(out, "<p class=\"folio-callout__title\">{}</p>", escape_html(title))?;
    }
    write!(out, "{}</div></aside>", inline::rich(html))
}

/// Accepts `#rgb`, `#rrggbb` or a plain colour keyword.
pub fn accent_color(value: &str) -> Option<&str> {
    let value = value.trim();
    let valid = match value.strip_prefix('#') {
        Some(hex) => matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => (3..=20).contains(&value.len()) && value.chars().all(|c| c.is_ascii_alphabetic()),
    };
    valid.then_some(value)
}
