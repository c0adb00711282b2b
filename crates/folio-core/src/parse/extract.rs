use kuchiki::{traits::*, NodeRef};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::cache::{ImageCache, ImageMeta};
use crate::text::{clean_for_label, collapse_whitespace, decode_entities, remove_tags};
use crate::types::{
    AccordionItem, BlockKind, CalloutSeverity, GalleryImage, GalleryStyle, ImageAlignment,
    ImageBlock, ImageSize, SpacerHeight, VideoProvider,
};

use super::scan::{find_balanced, inner_of};

static IFRAME_SRC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<iframe\b[^>]*?\ssrc\s*=\s*["']([^"']+)["']"#).expect("iframe regex is valid")
});
static MEDIA_SRC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<(?:video|source)\b[^>]*?\ssrc\s*=\s*["']([^"']+)["']"#)
        .expect("media regex is valid")
});
static ANCHOR_HREF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<a\b[^>]*?\shref\s*=\s*["']([^"']+)["']"#).expect("anchor regex is valid")
});
static BARE_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"https?://[^\s<>"']+"#).expect("url regex is valid"));

static TOGGLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?is)<(?:button|summary)\b[^>]*?\bclass\s*=\s*["'][^"']*accordion[^"']*toggle[^"']*["'][^>]*>(.*?)</(?:button|summary)\s*>"#,
    )
    .expect("toggle regex is valid")
});
static PANEL_AFTER_TOGGLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?is)^\s*(?:</h[1-6]\s*>\s*)?(<div\b[^>]*?\bclass\s*=\s*["'][^"']*accordion[^"']*panel[^"']*["'][^>]*>)"#,
    )
    .expect("adjacent panel regex is valid")
});
static PANEL_OPEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<div\b[^>]*?\bclass\s*=\s*["'][^"']*accordion[^"']*panel[^"']*["'][^>]*>"#)
        .expect("panel regex is valid")
});
static TOGGLE_TITLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<span\b[^>]*?\bclass\s*=\s*["'][^"']*toggle-title[^"']*["'][^>]*>(.*?)</span\s*>"#)
        .expect("toggle title regex is valid")
});
static TOGGLE_ICON: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<span\b[^>]*?\bclass\s*=\s*["'][^"']*toggle-icon[^"']*["'][^>]*>.*?</span\s*>"#)
        .expect("toggle icon regex is valid")
});
static DETAILS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<details\b[^>]*>\s*<summary\b[^>]*>(.*?)</summary\s*>(.*?)</details\s*>")
        .expect("details regex is valid")
});

static LI_OPEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<li\b[^>]*>").expect("li regex is valid"));
static CODE_WRAPPER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)^\s*<code\b([^>]*)>(.*)</code\s*>\s*$").expect("code regex is valid")
});
static LANGUAGE_CLASS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:language|lang)-([a-z0-9_+#-]+)").expect("language regex is valid")
});
static CITE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<cite\b[^>]*>(.*?)</cite\s*>").expect("cite regex is valid"));
static PX_HEIGHT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)height\s*:\s*([0-9]+)px").expect("height regex is valid"));
static CLASS_ATTR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\bclass\s*=\s*["']([^"']*)["']"#).expect("class regex is valid")
});
static CALLOUT_TITLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?is)<(?:p|div|strong|h[1-6])\b[^>]*?\bclass\s*=\s*["'][^"']*callout[_-]+title[^"']*["'][^>]*>(.*?)</(?:p|div|strong|h[1-6])\s*>"#,
    )
    .expect("callout title regex is valid")
});

pub(crate) struct ExtractContext<'a> {
    pub(crate) cloud: &'a str,
    pub(crate) gallery_style: GalleryStyle,
    pub(crate) images: &'a mut ImageCache,
}

pub(crate) fn video_block(html: &str) -> Option<BlockKind> {
    let url = IFRAME_SRC
        .captures(html)
        .or_else(|| MEDIA_SRC.captures(html))
        .or_else(|| ANCHOR_HREF.captures(html))
        .map(|caps| caps[1].to_string())
        .or_else(|| {
            BARE_URL
                .find(&clean_for_label(html))
                .map(|m| m.as_str().to_string())
        })?;
    let url = decode_entities(url.trim());
    if url.is_empty() {
        return None;
    }
    Some(BlockKind::Video {
        provider: VideoProvider::detect(&url),
        url,
    })
}

pub(crate) fn image_block(html: &str, ctx: &mut ExtractContext<'_>) -> Option<ImageBlock> {
    let doc = kuchiki::parse_html().one(html.to_string());
    let parts = image_parts(&doc, ctx.cloud)?;
    let mut classes = root_element(&doc)
        .map(|root| class_of(&root))
        .unwrap_or_default();
    if let Ok(img) = doc.select_first("img") {
        classes.push(' ');
        classes.push_str(&class_of(img.as_node()));
    }
    let mut image = ImageBlock {
        url: parts.url,
        alt: parts.alt,
        caption: parts.caption,
        alignment: alignment_from(&classes),
        size: size_from(&classes),
        width: parts.width,
        height: parts.height,
    };
    sync_dimensions(&mut image, ctx.images);
    Some(image)
}

fn sync_dimensions(image: &mut ImageBlock, cache: &mut ImageCache) {
    if let (Some(width), Some(height)) = (image.width, image.height) {
        cache.remember(&image.url, ImageMeta { width, height });
    } else if let Some(meta) = cache.lookup(&image.url) {
        image.width = Some(meta.width);
        image.height = Some(meta.height);
    }
}

pub(crate) fn gallery_block(html: &str, ctx: &mut ExtractContext<'_>) -> Option<BlockKind> {
    let doc = kuchiki::parse_html().one(html.to_string());
    let root = root_element(&doc)?;
    let mut items = Vec::new();
    collect_gallery_items(&root, &mut items);
    let mut images: Vec<GalleryImage> = items
        .iter()
        .filter_map(|item| image_parts(item, ctx.cloud))
        .map(|parts| GalleryImage {
            url: parts.url,
            caption: parts.caption,
            alt: parts.alt,
        })
        .collect();
    if images.is_empty() {
        tracing::debug!("gallery has no item containers, falling back to bare images");
        images = root
            .select("img")
            .map(|found| {
                found
                    .filter_map(|img| image_parts(img.as_node(), ctx.cloud))
                    .map(|parts| GalleryImage {
                        url: parts.url,
                        caption: None,
                        alt: parts.alt,
                    })
                    .collect()
            })
            .unwrap_or_default();
    }
    if images.is_empty() {
        return None;
    }
    let style = gallery_style_from(&class_of(&root)).unwrap_or(ctx.gallery_style);
    Some(BlockKind::Gallery { images, style })
}

// Outermost figure/div/li holding exactly one image.
fn collect_gallery_items(node: &NodeRef, out: &mut Vec<NodeRef>) {
    for child in node.children() {
        let Some(el) = child.as_element() else {
            continue;
        };
        let images = child.select("img").map(|found| found.count()).unwrap_or(0);
        if images == 0 {
            continue;
        }
        let tag = el.name.local.to_lowercase();
        if images == 1 && matches!(tag.as_str(), "figure" | "div" | "li") {
            out.push(child.clone());
        } else {
            collect_gallery_items(&child, out);
        }
    }
}

pub(crate) fn accordion_block(html: &str) -> Option<BlockKind> {
    let mut items = paired_items(html);
    let toggles = TOGGLE.find_iter(html).count();
    let panels = PANEL_OPEN.find_iter(html).count();
    if items.len() < toggles || items.len() < panels {
        tracing::debug!(
            paired = items.len(),
            toggles,
            panels,
            "toggles not all followed by their panel, pairing by position"
        );
        items = zipped_items(html);
    }
    if items.is_empty() {
        items = DETAILS
            .captures_iter(html)
            .map(|caps| AccordionItem {
                question: clean_for_label(&caps[1]),
                answer: clean_for_label(&caps[2]),
            })
            .collect();
    }
    items.retain(|item| !item.question.is_empty());
    if items.is_empty() {
        return None;
    }
    Some(BlockKind::Accordion { items })
}

fn paired_items(html: &str) -> Vec<AccordionItem> {
    let mut items = Vec::new();
    for caps in TOGGLE.captures_iter(html) {
        let (Some(toggle), Some(label)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let Some(panel) = PANEL_AFTER_TOGGLE
            .captures(&html[toggle.end()..])
            .and_then(|panel| panel.get(1))
        else {
            continue;
        };
        let Some(element) = find_balanced(html, toggle.end() + panel.start(), "div") else {
            continue;
        };
        items.push(AccordionItem {
            question: toggle_label(label.as_str()),
            answer: clean_for_label(inner_of(element)),
        });
    }
    items
}

fn zipped_items(html: &str) -> Vec<AccordionItem> {
    let questions: Vec<String> = TOGGLE
        .captures_iter(html)
        .map(|caps| toggle_label(&caps[1]))
        .collect();
    let answers: Vec<String> = PANEL_OPEN
        .find_iter(html)
        .map(|open| {
            let inner = match find_balanced(html, open.start(), "div") {
                Some(element) => inner_of(element),
                None => {
                    let rest = &html[open.end()..];
                    &rest[..rest.find("</div").unwrap_or(rest.len())]
                }
            };
            clean_for_label(inner)
        })
        .collect();
    if questions.len() != answers.len() {
        tracing::debug!(
            questions = questions.len(),
            answers = answers.len(),
            "accordion toggle and panel counts differ"
        );
    }
    questions
        .into_iter()
        .enumerate()
        .map(|(idx, question)| AccordionItem {
            question,
            answer: answers.get(idx).cloned().unwrap_or_default(),
        })
        .collect()
}

fn toggle_label(inner: &str) -> String {
    if let Some(title) = TOGGLE_TITLE.captures(inner) {
        return clean_for_label(&title[1]);
    }
    clean_for_label(&TOGGLE_ICON.replace_all(inner, ""))
}

pub(crate) fn list_items(inner: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut pos = 0;
    while let Some(open) = LI_OPEN.find_at(inner, pos) {
        let (item, next) = match find_balanced(inner, open.start(), "li") {
            Some(element) => (inner_of(element), open.start() + element.len()),
            None => {
                let end = LI_OPEN
                    .find_at(inner, open.end())
                    .map_or(inner.len(), |m| m.start());
                (&inner[open.end()..end], end)
            }
        };
        let item = item.trim();
        if !item.is_empty() {
            items.push(item.to_string());
        }
        pos = next;
    }
    items
}

pub(crate) fn code_block(open_tag: &str, inner: &str) -> BlockKind {
    let (attrs, body) = match CODE_WRAPPER.captures(inner) {
        Some(caps) => (
            caps.get(1).map_or("", |m| m.as_str()),
            caps.get(2).map_or("", |m| m.as_str()),
        ),
        None => ("", inner),
    };
    let language = LANGUAGE_CLASS
        .captures(attrs)
        .or_else(|| LANGUAGE_CLASS.captures(open_tag))
        .map(|caps| caps[1].to_ascii_lowercase());
    BlockKind::Code {
        code: decode_entities(&remove_tags(body)),
        language,
    }
}

pub(crate) fn quote_block(inner: &str) -> Option<BlockKind> {
    let citation = CITE
        .captures(inner)
        .map(|caps| clean_for_label(&caps[1]))
        .filter(|cite| !cite.is_empty());
    let html = CITE.replace_all(inner, "").trim().to_string();
    if clean_for_label(&html).is_empty() && citation.is_none() {
        return None;
    }
    Some(BlockKind::Quote { html, citation })
}

pub(crate) fn spacer_block(open_tag: &str) -> BlockKind {
    let height = PX_HEIGHT
        .captures(open_tag)
        .and_then(|caps| caps[1].parse::<u32>().ok())
        .map(SpacerHeight::from_pixels)
        .unwrap_or_default();
    BlockKind::Spacer { height }
}

pub(crate) fn is_callout(open_tag: &str) -> bool {
    classes_of(open_tag).split_whitespace().any(|class| {
        class == "callout"
            || class.starts_with("callout--")
            || class.starts_with("wp-block-callout")
            || class.starts_with("is-style-callout")
    })
}

pub(crate) fn callout_block(open_tag: &str, inner: &str) -> BlockKind {
    let classes = classes_of(open_tag);
    let severity = classes
        .split_whitespace()
        .find_map(|class| {
            if class.ends_with("warning") {
                Some(CalloutSeverity::Warning)
            } else if class.ends_with("success") {
                Some(CalloutSeverity::Success)
            } else if class.ends_with("error") || class.ends_with("danger") {
                Some(CalloutSeverity::Error)
            } else if class.ends_with("info") {
                Some(CalloutSeverity::Info)
            } else {
                None
            }
        })
        .unwrap_or_default();
    let title = CALLOUT_TITLE
        .captures(inner)
        .map(|caps| clean_for_label(&caps[1]))
        .filter(|title| !title.is_empty());
    let html = CALLOUT_TITLE.replace(inner, "").trim().to_string();
    BlockKind::Callout {
        html,
        severity,
        title,
    }
}

pub(crate) fn classes_of(open_tag: &str) -> String {
    CLASS_ATTR
        .captures(open_tag)
        .map(|caps| caps[1].to_string())
        .unwrap_or_default()
}

pub(crate) fn has_class(open_tag: &str, token: &str) -> bool {
    classes_of(open_tag)
        .split_whitespace()
        .any(|class| class == token)
}

struct ImageParts {
    url: String,
    alt: Option<String>,
    caption: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
}

// A data-attribute asset wins over the plain `src`.
fn image_parts(node: &NodeRef, cloud: &str) -> Option<ImageParts> {
    let (src, alt, width, height) = match node.select_first("img") {
        Ok(img) => {
            let attrs = img.attributes.borrow();
            (
                image_src(&attrs),
                image_alt(&attrs),
                parse_dimension(attrs.get("width")),
                parse_dimension(attrs.get("height")),
            )
        }
        Err(()) => (None, None, None, None),
    };
    let url = asset_url(node, cloud).or(src)?;
    let caption = node
        .select_first("figcaption")
        .ok()
        .map(|cap| collapse_whitespace(&cap.text_contents()))
        .filter(|cap| !cap.is_empty());
    Some(ImageParts {
        url,
        alt,
        caption,
        width,
        height,
    })
}

fn asset_url(node: &NodeRef, cloud: &str) -> Option<String> {
    if cloud.is_empty() {
        return None;
    }
    let el = node.select_first("[data-public-id]").ok()?;
    let attrs = el.attributes.borrow();
    let public_id = attrs.get("data-public-id")?.trim().trim_matches('/');
    if public_id.is_empty() {
        return None;
    }
    let mut url = format!("https://res.cloudinary.com/{cloud}/image/upload/");
    if let Some(version) = attrs
        .get("data-version")
        .map(|v| v.trim().trim_start_matches('v'))
        .filter(|v| !v.is_empty())
    {
        url.push('v');
        url.push_str(version);
        url.push('/');
    }
    url.push_str(public_id);
    if let Some(format) = attrs
        .get("data-format")
        .map(str::trim)
        .filter(|f| !f.is_empty())
    {
        url.push('.');
        url.push_str(format.trim_start_matches('.'));
    }
    Some(url)
}

fn image_src(attrs: &kuchiki::Attributes) -> Option<String> {
    attrs
        .get("src")
        .or_else(|| attrs.get("data-src"))
        .or_else(|| attrs.get("data-orig-file"))
        .map(str::trim)
        .filter(|src| !src.is_empty())
        .map(str::to_string)
}

fn image_alt(attrs: &kuchiki::Attributes) -> Option<String> {
    attrs
        .get("alt")
        .map(collapse_whitespace)
        .filter(|alt| !alt.is_empty())
}

fn parse_dimension(value: Option<&str>) -> Option<u32> {
    let value = value?;
    let digits: String = value.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse::<u32>().ok()
}

fn root_element(doc: &NodeRef) -> Option<NodeRef> {
    let body = doc.select_first("body").ok()?;
    body.as_node()
        .children()
        .find(|child| child.as_element().is_some())
}

fn class_of(node: &NodeRef) -> String {
    node.as_element()
        .and_then(|el| el.attributes.borrow().get("class").map(str::to_string))
        .unwrap_or_default()
}

fn alignment_from(classes: &str) -> ImageAlignment {
    classes
        .split_whitespace()
        .find_map(|class| match class {
            "alignleft" => Some(ImageAlignment::Left),
            "alignright" => Some(ImageAlignment::Right),
            "aligncenter" => Some(ImageAlignment::Center),
            "alignfull" | "alignwide" => Some(ImageAlignment::Full),
            _ => None,
        })
        .unwrap_or_default()
}

fn size_from(classes: &str) -> ImageSize {
    classes
        .split_whitespace()
        .find_map(|class| match class {
            "size-thumbnail" | "size-small" => Some(ImageSize::Small),
            "size-medium" => Some(ImageSize::Medium),
            "size-large" => Some(ImageSize::Large),
            "size-full" => Some(ImageSize::Full),
            _ => None,
        })
        .unwrap_or_default()
}

fn gallery_style_from(classes: &str) -> Option<GalleryStyle> {
    classes.split_whitespace().find_map(|class| match class {
        "is-style-grid" => Some(GalleryStyle::Grid),
        "is-style-carousel" => Some(GalleryStyle::Carousel),
        "is-style-masonry" => Some(GalleryStyle::Masonry),
        "is-style-fullwidth" | "alignfull" => Some(GalleryStyle::Fullwidth),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(cache: &mut ImageCache) -> ExtractContext<'_> {
        ExtractContext {
            cloud: "studio",
            gallery_style: GalleryStyle::Carousel,
            images: cache,
        }
    }

    #[test]
    fn video_prefers_iframe_then_anchor_then_bare_url() {
        let iframe = r#"<figure class="wp-block-embed"><iframe width="560" src="https://www.youtube.com/embed/abcdefghijk?feature=oembed"></iframe><a href="https://vimeo.com/1">x</a></figure>"#;
        assert!(matches!(
            video_block(iframe),
            Some(BlockKind::Video { ref url, provider: VideoProvider::Youtube }) if url.contains("embed/abcdefghijk")
        ));
        let anchor = r#"<figure class="wp-block-embed"><a href="https://vimeo.com/76979871">Watch</a></figure>"#;
        assert!(matches!(
            video_block(anchor),
            Some(BlockKind::Video { provider: VideoProvider::Vimeo, .. })
        ));
        let bare = "<figure class=\"wp-block-embed\"><div class=\"wp-block-embed__wrapper\">\nhttps://youtu.be/abcdefghijk\n</div></figure>";
        assert!(matches!(
            video_block(bare),
            Some(BlockKind::Video { ref url, .. }) if url == "https://youtu.be/abcdefghijk"
        ));
        let hosted = r#"<figure class="wp-block-video"><video controls src="https://cdn.example.com/reel.mp4"></video></figure>"#;
        assert!(matches!(
            video_block(hosted),
            Some(BlockKind::Video { provider: VideoProvider::Custom, .. })
        ));
        assert!(video_block("<figure class=\"wp-block-embed\"></figure>").is_none());
    }

    #[test]
    fn image_prefers_data_attribute_asset() {
        let mut cache = ImageCache::default();
        let html = r#"<figure class="wp-block-image size-medium alignleft"><img src="https://example.com/fallback.jpg" alt="Set model" data-public-id="portfolio/set-01" data-version="1712" data-format="jpg"/><figcaption>Act <em>one</em> set</figcaption></figure>"#;
        let image = image_block(html, &mut ctx(&mut cache)).unwrap();
        assert_eq!(
            image.url,
            "https://res.cloudinary.com/studio/image/upload/v1712/portfolio/set-01.jpg"
        );
        assert_eq!(image.alt.as_deref(), Some("Set model"));
        assert_eq!(image.caption.as_deref(), Some("Act one set"));
        assert_eq!(image.alignment, ImageAlignment::Left);
        assert_eq!(image.size, ImageSize::Medium);
    }

    #[test]
    fn image_dimensions_are_shared_through_the_cache() {
        let mut cache = ImageCache::default();
        let sized = r#"<figure><img src="https://example.com/a.jpg" width="800" height="600"></figure>"#;
        let bare = r#"<figure><img src="https://example.com/a.jpg"></figure>"#;
        image_block(sized, &mut ctx(&mut cache)).unwrap();
        let image = image_block(bare, &mut ctx(&mut cache)).unwrap();
        assert_eq!((image.width, image.height), (Some(800), Some(600)));
    }

    #[test]
    fn gallery_reads_legacy_list_markup() {
        let mut cache = ImageCache::default();
        let html = r#"<figure class="wp-block-gallery columns-2"><ul class="blocks-gallery-grid"><li class="blocks-gallery-item"><figure><img src="1.jpg" alt="One"><figcaption class="blocks-gallery-item__caption">First</figcaption></figure></li><li class="blocks-gallery-item"><figure><img src="2.jpg"></figure></li></ul></figure>"#;
        let Some(BlockKind::Gallery { images, style }) = gallery_block(html, &mut ctx(&mut cache))
        else {
            panic!("expected gallery");
        };
        assert_eq!(style, GalleryStyle::Carousel);
        assert_eq!(images.len(), 2);
        assert_eq!(images[0].caption.as_deref(), Some("First"));
        assert_eq!(images[0].alt.as_deref(), Some("One"));
        assert_eq!(images[1].url, "2.jpg");
    }

    #[test]
    fn gallery_without_containers_scans_bare_images() {
        let mut cache = ImageCache::default();
        let html = r#"<div class="wp-block-gallery is-style-masonry"><img src="a.jpg"><img src="b.jpg" alt="B"></div>"#;
        let Some(BlockKind::Gallery { images, style }) = gallery_block(html, &mut ctx(&mut cache))
        else {
            panic!("expected gallery");
        };
        assert_eq!(style, GalleryStyle::Masonry);
        assert_eq!(images.len(), 2);
        assert!(images.iter().all(|img| img.caption.is_none()));
        assert_eq!(images[1].alt.as_deref(), Some("B"));
    }

    #[test]
    fn accordion_pairs_toggle_with_following_panel() {
        let html = r#"<div class="wp-block-accordion"><div class="wp-block-accordion-item"><h3 class="wp-block-accordion-heading"><button class="wp-block-accordion-heading__toggle"><span class="wp-block-accordion-heading__toggle-title">Do you travel?</span><span class="wp-block-accordion-heading__toggle-icon">+</span></button></h3><div class="wp-block-accordion-panel"><div><p>Yes &amp; often.</p></div></div></div></div>"#;
        let Some(BlockKind::Accordion { items }) = accordion_block(html) else {
            panic!("expected accordion");
        };
        assert_eq!(
            items,
            vec![AccordionItem {
                question: "Do you travel?".into(),
                answer: "Yes & often.".into(),
            }]
        );
    }

    #[test]
    fn accordion_with_toggles_before_panels_pairs_by_position() {
        let html = concat!(
            r#"<div class="wp-block-accordion">"#,
            r#"<button class="accordion-toggle">Q1</button><button class="accordion-toggle">Q2</button>"#,
            r#"<div class="accordion-panel"><p>A1</p></div><div class="accordion-panel"><p>A2</p></div>"#,
            r#"</div>"#,
        );
        let Some(BlockKind::Accordion { items }) = accordion_block(html) else {
            panic!("expected accordion");
        };
        assert_eq!(
            items,
            vec![
                AccordionItem {
                    question: "Q1".into(),
                    answer: "A1".into(),
                },
                AccordionItem {
                    question: "Q2".into(),
                    answer: "A2".into(),
                },
            ]
        );
    }

    #[test]
    fn accordion_details_markup_is_understood() {
        let html = r#"<div class="wp-block-accordion"><details><summary>Rates?</summary><p>On request.</p></details></div>"#;
        let Some(BlockKind::Accordion { items }) = accordion_block(html) else {
            panic!("expected accordion");
        };
        assert_eq!(items[0].question, "Rates?");
        assert_eq!(items[0].answer, "On request.");
    }

    #[test]
    fn list_items_keep_nested_lists_inside() {
        let items = list_items("<li>One</li><li>Two<ul><li>Two A</li></ul></li><li>Three");
        assert_eq!(
            items,
            vec!["One", "Two<ul><li>Two A</li></ul>", "Three"]
        );
    }

    #[test]
    fn code_block_reads_language_and_decodes() {
        let kind = code_block(
            "<pre class=\"wp-block-code\">",
            "<code class=\"language-rust\">if a &lt; b { x &amp;&amp; y }</code>",
        );
        assert_eq!(
            kind,
            BlockKind::Code {
                code: "if a < b { x && y }".into(),
                language: Some("rust".into()),
            }
        );
    }

    #[test]
    fn quote_captures_citation() {
        let kind = quote_block("<p>Less is more.</p><cite>Mies</cite>").unwrap();
        assert_eq!(
            kind,
            BlockKind::Quote {
                html: "<p>Less is more.</p>".into(),
                citation: Some("Mies".into()),
            }
        );
    }

    #[test]
    fn callout_severity_and_title() {
        let open = r#"<div class="callout callout--warning">"#;
        assert!(is_callout(open));
        let kind = callout_block(open, r#"<p class="callout-title">Heads up</p><p>Venue changed.</p>"#);
        assert_eq!(
            kind,
            BlockKind::Callout {
                html: "<p>Venue changed.</p>".into(),
                severity: CalloutSeverity::Warning,
                title: Some("Heads up".into()),
            }
        );
    }

    #[test]
    fn spacer_height_maps_to_token() {
        assert_eq!(
            spacer_block(r#"<div style="height:100px" aria-hidden="true" class="wp-block-spacer">"#),
            BlockKind::Spacer {
                height: SpacerHeight::Xlarge
            }
        );
    }
}
