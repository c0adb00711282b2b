use crate::types::{
    AccordionItem, BlockKind, ContentBlock, ContentInput, GalleryStyle, ImageAlignment,
    VideoProvider,
};

use super::{extract_protected, html_to_blocks, parse_content, split_blocks, ParseOptions, Parser};

fn kinds(blocks: &[ContentBlock]) -> Vec<&'static str> {
    blocks.iter().map(ContentBlock::type_name).collect()
}

#[test]
fn paragraph_keeps_inline_markup() {
    let blocks = html_to_blocks("<p>Hello <strong>world</strong></p>");
    assert_eq!(
        blocks,
        vec![ContentBlock::new(
            "block-1",
            BlockKind::Paragraph {
                html: "Hello <strong>world</strong>".into()
            }
        )]
    );
}

#[test]
fn heading_then_paragraph() {
    let blocks = html_to_blocks("<h3>Section One</h3><p>Text</p>");
    assert_eq!(blocks.len(), 2);
    assert_eq!(
        blocks[0].kind,
        BlockKind::Heading {
            text: "Section One".into(),
            level: 3
        }
    );
    assert_eq!(
        blocks[1].kind,
        BlockKind::Paragraph {
            html: "Text".into()
        }
    );
    assert_eq!(blocks[1].id, "block-2");
}

#[test]
fn plain_text_becomes_one_paragraph() {
    let blocks = html_to_blocks("  Plain text, no tags at all.  ");
    assert_eq!(
        blocks,
        vec![ContentBlock::new(
            "block-1",
            BlockKind::Paragraph {
                html: "Plain text, no tags at all.".into()
            }
        )]
    );
}

#[test]
fn empty_input_yields_nothing() {
    assert!(html_to_blocks("").is_empty());
    assert!(html_to_blocks("   \n ").is_empty());
    assert!(parse_content(ContentInput::from_json("null").unwrap()).is_empty());
}

#[test]
fn structured_input_passes_through() {
    let blocks = vec![
        ContentBlock::new("x", BlockKind::Divider),
        ContentBlock::new(
            "y",
            BlockKind::Paragraph {
                html: "<p>not reparsed</p>".into(),
            },
        ),
    ];
    assert_eq!(parse_content(blocks.clone()), blocks);
}

#[test]
fn gallery_of_captioned_figures() {
    let html = r#"<p>Intro</p>
<div class="wp-block-gallery">
  <figure><img src="https://example.com/1.jpg" alt="One"><figcaption>First</figcaption></figure>
  <figure><img src="https://example.com/2.jpg"><figcaption>Second</figcaption></figure>
  <figure><img src="https://example.com/3.jpg"><figcaption>Third</figcaption></figure>
</div>
<p>Outro</p>"#;
    let blocks = html_to_blocks(html);
    assert_eq!(kinds(&blocks), vec!["paragraph", "gallery", "paragraph"]);
    let BlockKind::Gallery { images, style } = &blocks[1].kind else {
        panic!("expected gallery");
    };
    assert_eq!(*style, GalleryStyle::Carousel);
    let captions: Vec<_> = images.iter().filter_map(|i| i.caption.as_deref()).collect();
    assert_eq!(captions, vec!["First", "Second", "Third"]);
    assert!(images.iter().all(|i| !i.url.is_empty()));
}

#[test]
fn gallery_of_nested_image_blocks() {
    let html = concat!(
        r#"<figure class="wp-block-gallery has-nested-images">"#,
        r#"<figure class="wp-block-image size-large"><img src="a.jpg" alt="A"/><figcaption>Alpha</figcaption></figure>"#,
        r#"<figure class="wp-block-image size-large"><img src="b.jpg" alt="B"/></figure>"#,
        r#"</figure>"#,
    );
    let blocks = html_to_blocks(html);
    assert_eq!(kinds(&blocks), vec!["gallery"]);
    let BlockKind::Gallery { images, .. } = &blocks[0].kind else {
        panic!("expected gallery");
    };
    assert_eq!(images.len(), 2);
    assert_eq!(images[0].caption.as_deref(), Some("Alpha"));
}

#[test]
fn gallery_style_follows_options() {
    let mut parser = Parser::new(ParseOptions {
        gallery_style: GalleryStyle::Grid,
        ..ParseOptions::default()
    });
    let blocks = parser
        .parse_html(r#"<div class="wp-block-gallery"><figure><img src="a.jpg"></figure></div>"#);
    assert!(matches!(
        blocks[0].kind,
        BlockKind::Gallery {
            style: GalleryStyle::Grid,
            ..
        }
    ));
}

#[test]
fn accordion_falls_back_to_index_pairing() {
    let html = concat!(
        r#"<div class="wp-block-accordion">"#,
        r#"<button class="accordion-toggle">Q1</button><span>x</span><div class="accordion-panel"><p>A1</p></div>"#,
        r#"<button class="accordion-toggle">Q2</button><span>y</span><div class="accordion-panel"><p>A2</p></div>"#,
        r#"</div>"#,
    );
    let blocks = html_to_blocks(html);
    assert_eq!(blocks.len(), 1);
    assert_eq!(
        blocks[0].kind,
        BlockKind::Accordion {
            items: vec![
                AccordionItem {
                    question: "Q1".into(),
                    answer: "A1".into()
                },
                AccordionItem {
                    question: "Q2".into(),
                    answer: "A2".into()
                },
            ]
        }
    );
}

#[test]
fn accordion_with_all_toggles_first_is_not_mispaired() {
    let html = concat!(
        r#"<div class="wp-block-accordion">"#,
        r#"<button class="accordion-toggle">Q1</button><button class="accordion-toggle">Q2</button>"#,
        r#"<div class="accordion-panel"><p>A1</p></div><div class="accordion-panel"><p>A2</p></div>"#,
        r#"</div>"#,
    );
    let blocks = html_to_blocks(html);
    let BlockKind::Accordion { items } = &blocks[0].kind else {
        panic!("expected accordion");
    };
    let pairs: Vec<_> = items
        .iter()
        .map(|item| (item.question.as_str(), item.answer.as_str()))
        .collect();
    assert_eq!(pairs, vec![("Q1", "A1"), ("Q2", "A2")]);
}

#[test]
fn list_holding_an_image_keeps_its_items() {
    let blocks = html_to_blocks(
        r#"<ul><li>one</li><li><figure class="wp-block-image"><img src="a.jpg"></figure></li><li>two</li></ul>"#,
    );
    assert_eq!(kinds(&blocks), vec!["list", "image", "list"]);
    assert_eq!(
        blocks[0].kind,
        BlockKind::List {
            items: vec!["one".into()],
            ordered: false
        }
    );
    assert!(matches!(&blocks[1].kind, BlockKind::Image(image) if image.url == "a.jpg"));
    assert!(blocks.iter().all(|block| match &block.kind {
        BlockKind::Paragraph { html } => !html.contains("<li"),
        _ => true,
    }));
}

#[test]
fn quote_holding_an_embed_stays_a_quote() {
    let blocks = html_to_blocks(concat!(
        r#"<blockquote><p>Watch this.</p>"#,
        r#"<figure class="wp-block-embed is-provider-vimeo"><div class="wp-block-embed__wrapper">https://vimeo.com/76979871</div></figure>"#,
        r#"<cite>Crew</cite></blockquote>"#,
    ));
    assert_eq!(kinds(&blocks), vec!["quote", "video", "quote"]);
    assert!(matches!(
        &blocks[0].kind,
        BlockKind::Quote { html, citation: None } if html == "<p>Watch this.</p>"
    ));
    assert!(matches!(
        &blocks[2].kind,
        BlockKind::Quote { citation: Some(cite), .. } if cite == "Crew"
    ));
}

#[test]
fn protected_blocks_keep_document_order() {
    let html = concat!(
        r#"<h2>Reel</h2>"#,
        r#"<figure class="wp-block-embed is-type-video"><div class="wp-block-embed__wrapper">https://www.youtube.com/watch?v=abc12345678</div></figure>"#,
        r#"<p>Between</p>"#,
        r#"<figure class="wp-block-image alignright"><img src="still.jpg" alt="Still"/></figure>"#,
    );
    let blocks = html_to_blocks(html);
    assert_eq!(kinds(&blocks), vec!["heading", "video", "paragraph", "image"]);
    assert!(matches!(
        blocks[1].kind,
        BlockKind::Video {
            provider: VideoProvider::Youtube,
            ..
        }
    ));
    let BlockKind::Image(image) = &blocks[3].kind else {
        panic!("expected image");
    };
    assert_eq!(image.alignment, ImageAlignment::Right);
    let ids: Vec<_> = blocks.iter().map(|b| b.id.as_str()).collect();
    assert_eq!(ids, vec!["block-1", "block-2", "block-3", "block-4"]);
}

#[test]
fn tokens_inside_wrappers_are_resolved_in_place() {
    let html = concat!(
        r#"<div class="entry-content"><p>Lead</p>"#,
        r#"<figure class="wp-block-image"><img src="x.jpg"/></figure>"#,
        r#"<p>Tail</p></div>"#,
    );
    let blocks = html_to_blocks(html);
    assert_eq!(kinds(&blocks), vec!["paragraph", "image", "paragraph"]);
}

#[test]
fn lists_quotes_and_code() {
    let html = concat!(
        "<ol><li>First <em>step</em></li><li>Second</li></ol>",
        "<blockquote class=\"wp-block-quote\"><p>Form follows function.</p><cite>Sullivan</cite></blockquote>",
        "<pre class=\"wp-block-code\"><code class=\"language-js\">let a = 1 &lt; 2;</code></pre>",
    );
    let blocks = html_to_blocks(html);
    assert_eq!(
        blocks[0].kind,
        BlockKind::List {
            items: vec!["First <em>step</em>".into(), "Second".into()],
            ordered: true,
        }
    );
    assert!(matches!(
        &blocks[1].kind,
        BlockKind::Quote { citation: Some(c), .. } if c == "Sullivan"
    ));
    assert_eq!(
        blocks[2].kind,
        BlockKind::Code {
            code: "let a = 1 < 2;".into(),
            language: Some("js".into()),
        }
    );
}

#[test]
fn loose_text_and_rules_between_elements() {
    let blocks = html_to_blocks("<p>One</p>\nstray words\n<hr class=\"wp-block-separator\"/><p>Two</p>");
    assert_eq!(
        kinds(&blocks),
        vec!["paragraph", "paragraph", "divider", "paragraph"]
    );
    assert_eq!(
        blocks[1].kind,
        BlockKind::Paragraph {
            html: "stray words".into()
        }
    );
}

#[test]
fn trailing_gap_becomes_final_paragraph() {
    let blocks = html_to_blocks("<h2>Notes</h2>closing remark");
    assert_eq!(kinds(&blocks), vec!["heading", "paragraph"]);
}

#[test]
fn comments_and_empty_paragraphs_are_skipped() {
    let blocks = html_to_blocks("<!-- wp:paragraph --><p>Kept</p><!-- /wp:paragraph --><p>&nbsp;</p>");
    assert_eq!(blocks.len(), 1);
}

#[test]
fn unclosed_gallery_terminates_and_stays_visible() {
    let html = r#"<div class="wp-block-gallery"><figure><img src="a.jpg"></figure>"#;
    let protected = extract_protected(html);
    assert!(protected.blocks.is_empty());
    let blocks = split_blocks(&protected.html, protected.blocks);
    assert!(!blocks.is_empty());
}

#[test]
fn spacer_and_callout_divs() {
    let html = concat!(
        r#"<div style="height:50px" aria-hidden="true" class="wp-block-spacer"></div>"#,
        r#"<div class="callout callout--success"><p>Booked.</p></div>"#,
        r#"<div class="plain"><p>Just a div</p></div>"#,
    );
    let blocks = html_to_blocks(html);
    assert_eq!(kinds(&blocks), vec!["spacer", "callout", "paragraph"]);
}

#[test]
fn image_dimensions_persist_across_parses() {
    let mut parser = Parser::default();
    parser.parse_html(
        r#"<figure class="wp-block-image"><img src="https://example.com/p.jpg" width="1200" height="800"/></figure>"#,
    );
    assert_eq!(parser.image_cache().len(), 1);
    let blocks =
        parser.parse_html(r#"<figure class="wp-block-image"><img src="https://example.com/p.jpg"/></figure>"#);
    let BlockKind::Image(image) = &blocks[0].kind else {
        panic!("expected image");
    };
    assert_eq!(image.width, Some(1200));
}
