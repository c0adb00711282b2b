use std::fmt::{self, Write};

use crate::text::escape_html;

use super::inline::is_safe_url;
use super::state::{Lightbox, LightboxImage};

pub(crate) fn render_lightbox<W: Write>(out: &mut W, lightbox: &Lightbox) -> fmt::Result {
    let Some(image) = lightbox.current() else {
        return Ok(());
    };
    if !is_safe_url(&image.url) {
        tracing::debug!("lightbox image with unsafe url not shown");
        return Ok(());
    }
    out.write_str(
        "<div class=\"folio-lightbox\" role=\"dialog\" aria-modal=\"true\">\
         <button type=\"button\" class=\"folio-lightbox__backdrop\" aria-label=\"Close\"></button>",
    )?;
    figure(out, image)?;
    out.write_str(
        "<button type=\"button\" class=\"folio-lightbox__close\" aria-label=\"Close\">&#215;</button>",
    )?;
    if let Lightbox::Gallery { images, index, .. } = lightbox {
        if images.len() > 1 {
            write!(
                out,
                "<button type=\"button\" class=\"folio-lightbox__prev\" aria-label=\"Previous image\">&#8249;</button>\
                 <button type=\"button\" class=\"folio-lightbox__next\" aria-label=\"Next image\">&#8250;</button>\
                 <p class=\"folio-lightbox__counter\">{} / {}</p>",
                index + 1,
                images.len()
            )?;
        }
    }
    out.write_str("</div>")
}

fn figure<W: Write>(out: &mut W, image: &LightboxImage) -> fmt::Result {
    write!(
        out,
        "<figure class=\"folio-lightbox__figure\"><img src=\"{}\" alt=\"{}\">",
        escape_html(&image.url),
        escape_html(image.alt.as_deref().unwrap_or_default())
    )?;
    if let Some(caption) = &image.caption {
        write!(out, "<figcaption>{}</figcaption>", escape_html(caption))?;
    }
    out.write_str("</figure>")
}
