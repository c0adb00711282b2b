use std::fmt::{self, Write};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::text::{escape_html, escape_text};
use crate::types::{ImageAlignment, ImageBlock, ImageSize, VideoProvider};

use super::inline::is_safe_url;

static YOUTUBE_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(?:youtube(?:-nocookie)?\.com/(?:watch\?(?:[^#\s]*&)?v=|embed/|shorts/|live/|v/)|youtu\.be/)([A-Za-z0-9_-]{11})",
    )
    .expect("youtube regex is valid")
});
static VIMEO_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)vimeo\.com/(?:video/|channels/[^/\s]+/|groups/[^/\s]+/videos/)?([0-9]+)")
        .expect("vimeo regex is valid")
});

const DIRECT_MEDIA: &[&str] = &[".mp4", ".webm", ".ogg", ".mov"];

pub fn embed_url(url: &str, provider: VideoProvider) -> Option<String> {
    match provider {
        VideoProvider::Youtube => YOUTUBE_ID
            .captures(url)
            .map(|caps| format!("https://www.youtube.com/embed/{}", &caps[1])),
        VideoProvider::Vimeo => VIMEO_ID
            .captures(url)
            .map(|caps| format!("https://player.vimeo.com/video/{}", &caps[1])),
        VideoProvider::Custom => None,
    }
}

fn is_direct_media(url: &str) -> bool {
    let path = url
        .split(['?', '#'])
        .next()
        .unwrap_or(url)
        .to_ascii_lowercase();
    DIRECT_MEDIA.iter().any(|ext| path.ends_with(ext))
}

pub(crate) fn render_video<W: Write>(out: &mut W, url: &str, provider: VideoProvider) -> fmt::Result {
    if let Some(src) = embed_url(url, provider) {
        write!(
            out,
            "<div class=\"folio-video folio-video--{provider}\"><iframe src=\"{src}\" title=\"Embedded video\" \
             allow=\"accelerometer; autoplay; encrypted-media; picture-in-picture\" allowfullscreen \
             loading=\"lazy\"></iframe></div>",
            provider = provider_name(provider),
            src = escape_html(&src),
        )
    } else if provider == VideoProvider::Custom && is_safe_url(url) && is_direct_media(url) {
        write!(
            out,
            "<div class=\"folio-video folio-video--custom\"><video controls preload=\"metadata\" src=\"{}\"></video></div>",
            escape_html(url)
        )
    } else {
        tracing::debug!(url, "video without a playable source skipped");
        Ok(())
    }
}

fn provider_name(provider: VideoProvider) -> &'static str {
    match provider {
        VideoProvider::Youtube => "youtube",
        VideoProvider::Vimeo => "vimeo",
        VideoProvider::Custom => "custom",
    }
}

fn alignment_class(alignment: ImageAlignment) -> &'static str {
    match alignment {
        ImageAlignment::Left => "folio-align-left",
        ImageAlignment::Right => "folio-align-right",
        ImageAlignment::Center => "folio-align-center",
        ImageAlignment::Full => "folio-align-full",
    }
}

fn size_class(size: ImageSize) -> &'static str {
    match size {
        ImageSize::Small => "folio-size-small",
        ImageSize::Medium => "folio-size-medium",
        ImageSize::Large => "folio-size-large",
        ImageSize::Full => "folio-size-full",
    }
}

pub(crate) fn img_tag<W: Write>(
    out: &mut W,
    url: &str,
    alt: Option<&str>,
    width: Option<u32>,
    height: Option<u32>,
) -> fmt::Result {
    write!(
        out,
        "<img src=\"{}\" alt=\"{}\"",
        escape_html(url),
        escape_html(alt.unwrap_or_default())
    )?;
    if let (Some(w), Some(h)) = (width, height) {
        write!(out, " width=\"{w}\" height=\"{h}\"")?;
    }
    out.write_str(" loading=\"lazy\">")
}

pub(crate) fn render_image<W: Write>(out: &mut W, block_id: &str, image: &ImageBlock) -> fmt::Result {
    if !is_safe_url(&image.url) {
        tracing::debug!(id = block_id, "image with unsafe url skipped");
        return Ok(());
    }
    write!(
        out,
        "<figure class=\"folio-image {} {}\"><button type=\"button\" class=\"folio-image__open\" \
         data-lightbox=\"{}\" aria-label=\"Enlarge image\">",
        alignment_class(image.alignment),
        size_class(image.size),
        escape_html(block_id),
    )?;
    img_tag(out, &image.url, image.alt.as_deref(), image.width, image.height)?;
    out.write_str("</button>")?;
    if let Some(caption) = &image.caption {
        write!(out, "<figcaption>{}</figcaption>", escape_html(caption))?;
    }
    out.write_str("</figure>")
}

pub(crate) fn render_file<W: Write>(
    out: &mut W,
    url: &str,
    name: Option<&str>,
    size: Option<&str>,
) -> fmt::Result {
    if !is_safe_url(url) {
        tracing::debug!(url, "file with unsafe url skipped");
        return Ok(());
    }
    let label = name
        .filter(|name| !name.trim().is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| file_name(url));
    write!(
        out,
        "<div class=\"folio-file\"><a class=\"folio-file__download\" href=\"{}\" download>\
         <span class=\"folio-file__name\">{}</span>",
        escape_html(url),
        escape_text(&label)
    )?;
    if let Some(size) = size.filter(|size| !size.trim().is_empty()) {
        write!(out, "<span class=\"folio-file__size\">{}</span>", escape_text(size))?;
    }
    out.write_str("</a></div>")
}

fn file_name(url: &str) -> String {
    url.split(['?', '#'])
        .next()
        .and_then(|path| path.rsplit('/').find(|seg| !seg.is_empty()))
        .unwrap_or("Download")
        .to_string()
}
