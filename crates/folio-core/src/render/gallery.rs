use std::fmt::{self, Write};

use crate::text::escape_html;
use crate::types::{GalleryImage, GalleryStyle};

use super::inline::is_safe_url;
use super::media::img_tag;
use super::state::{ViewState, AUTO_ADVANCE, TRANSITION};

// Tile indices and lightbox indices both count this list.
pub(crate) fn viewable(images: &[GalleryImage]) -> Vec<&GalleryImage> {
    images.iter().filter(|img| is_safe_url(&img.url)).collect()
}

pub(crate) fn render_gallery<W: Write>(
    out: &mut W,
    block_id: &str,
    images: &[GalleryImage],
    style: GalleryStyle,
    state: &ViewState,
) -> fmt::Result {
    let images = viewable(images);
    if images.is_empty() {
        tracing::debug!(id = block_id, "gallery without usable images skipped");
        return Ok(());
    }
    match style {
        GalleryStyle::Carousel => carousel(out, block_id, &images, state),
        GalleryStyle::Grid => tiled(out, block_id, &images, "grid"),
        GalleryStyle::Masonry => tiled(out, block_id, &images, "masonry"),
        GalleryStyle::Fullwidth => tiled(out, block_id, &images, "fullwidth"),
    }
}

fn tiled<W: Write>(
    out: &mut W,
    block_id: &str,
    images: &[&GalleryImage],
    style: &str,
) -> fmt::Result {
    write!(
        out,
        "<div class=\"folio-gallery folio-gallery--{style}\" data-block=\"{}\">",
        escape_html(block_id)
    )?;
    for (idx, image) in images.iter().enumerate() {
        item(out, "folio-gallery__item", idx, image)?;
    }
    out.write_str("</div>")
}

fn carousel<W: Write>(
    out: &mut W,
    block_id: &str,
    images: &[&GalleryImage],
    state: &ViewState,
) -> fmt::Result {
    let current = state
        .carousel(block_id)
        .map(|c| c.index())
        .filter(|idx| *idx < images.len())
        .unwrap_or(0);
    write!(
        out,
        "<div class=\"folio-gallery folio-gallery--carousel\" data-block=\"{}\" \
         data-interval-ms=\"{}\" data-transition-ms=\"{}\">\
         <div class=\"folio-carousel__track\" style=\"transform:translateX(-{}%)\">",
        escape_html(block_id),
        AUTO_ADVANCE.as_millis(),
        TRANSITION.as_millis(),
        current * 100,
    )?;
    for (idx, image) in images.iter().enumerate() {
        let class = if idx == current {
            "folio-carousel__slide is-active"
        } else {
            "folio-carousel__slide"
        };
        item(out, class, idx, image)?;
    }
    out.write_str("</div>")?;
    if images.len() > 1 {
        out.write_str(
            "<button type=\"button\" class=\"folio-carousel__prev\" aria-label=\"Previous image\">&#8249;</button>\
             <button type=\"button\" class=\"folio-carousel__next\" aria-label=\"Next image\">&#8250;</button>\
             <div class=\"folio-carousel__dots\">",
        )?;
        for idx in 0..images.len() {
            let current_attr = if idx == current { " aria-current=\"true\"" } else { "" };
            write!(
                out,
                "<button type=\"button\" class=\"folio-carousel__dot\" data-index=\"{idx}\" \
                 aria-label=\"Go to image {}\"{current_attr}></button>",
                idx + 1
            )?;
        }
        out.write_str("</div>")?;
    }
    out.write_str("</div>")
}

fn item<W: Write>(out: &mut W, class: &str, idx: usize, image: &GalleryImage) -> fmt::Result {
    write!(
        out,
        "<figure class=\"{class}\"><button type=\"button\" class=\"folio-gallery__open\" data-index=\"{idx}\" \
         aria-label=\"Enlarge image {}\">",
        idx + 1
    )?;
    img_tag(out, &image.url, image.alt.as_deref(), None, None)?;
    out.write_str("</button>")?;
    if let Some(caption) = &image.caption {
        write!(out, "<figcaption>{}</figcaption>", escape_html(caption))?;
    }
    out.write_str("</figure>")
}
