use std::path::Path;

use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::{json, Map, Value};

use crate::error::FolioError;

#[derive(Clone, Debug, PartialEq)]
#[derive(Serialize, Deserialize)]
#[serde(into = "BlockRecord", try_from = "BlockRecord")]
pub struct ContentBlock {
    pub id: String,
    pub kind: BlockKind,
}

impl ContentBlock {
    pub fn new(id: impl Into<String>, kind: BlockKind) -> Self {
        Self {
            id: id.into(),
            kind,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }

    pub fn from_record(record: BlockRecord) -> Option<Self> {
        let meta = Meta(&record.metadata);
        let content = record.content;
        let kind = match record.block_type.as_str() {
            "paragraph" => BlockKind::Paragraph { html: content },
            "heading" => BlockKind::Heading {
                text: content,
                level: meta.number("level").map_or(2, |l| l.clamp(1, 6) as u8),
            },
            "image" => BlockKind::Image(ImageBlock {
                url: content,
                alt: meta.string("alt"),
                caption: meta.string("caption"),
                alignment: meta.token("alignment").unwrap_or_default(),
                size: meta.token("size").unwrap_or_default(),
                width: meta.number("width").map(|w| w as u32),
                height: meta.number("height").map(|h| h as u32),
            }),
            "quote" => BlockKind::Quote {
                html: content,
                citation: meta.string("citation"),
            },
            "list" => {
                let mut items = meta.strings("items");
                if items.is_empty() {
                    items = content
                        .lines()
                        .map(str::trim)
                        .filter(|line| !line.is_empty())
                        .map(str::to_string)
                        .collect();
                }
                let ordered = meta
                    .boolean("ordered")
                    .unwrap_or_else(|| meta.string("listType").as_deref() == Some("ordered"));
                BlockKind::List { items, ordered }
            }
            "code" => BlockKind::Code {
                code: content,
                language: meta.string("language"),
            },
            "gallery" => BlockKind::Gallery {
                images: meta.records("images"),
                style: meta.token("galleryStyle").unwrap_or_default(),
            },
            "spacer" => BlockKind::Spacer {
                height: meta.token("height").unwrap_or_default(),
            },
            "video" => BlockKind::Video {
                provider: meta
                    .token("provider")
                    .unwrap_or_else(|| VideoProvider::detect(&content)),
                url: content,
            },
            "accordion" => BlockKind::Accordion {
                items: meta.records("items"),
            },
            "callout" => BlockKind::Callout {
                html: content,
                severity: meta
                    .token("severity")
                    .or_else(|| meta.token("type"))
                    .unwrap_or_default(),
                title: meta.string("title"),
            },
            "divider" => BlockKind::Divider,
            "file" => BlockKind::File {
                url: content,
                name: meta.string("fileName").or_else(|| meta.string("name")),
                size: meta.string("fileSize").or_else(|| meta.string("size")),
            },
            other => {
                tracing::debug!(block_type = other, id = %record.id, "dropping block with unknown type");
                return None;
            }
        };
        Some(Self {
            id: record.id,
            kind,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum BlockKind {
    Paragraph {
        html: String,
    },
    Heading {
        text: String,
        level: u8,
    },
    Image(ImageBlock),
    Quote {
        html: String,
        citation: Option<String>,
    },
    List {
        items: Vec<String>,
        ordered: bool,
    },
    Code {
        code: String,
        language: Option<String>,
    },
    Gallery {
        images: Vec<GalleryImage>,
        style: GalleryStyle,
    },
    Spacer {
        height: SpacerHeight,
    },
    Video {
        url: String,
        provider: VideoProvider,
    },
    Accordion {
        items: Vec<AccordionItem>,
    },
    Callout {
        html: String,
        severity: CalloutSeverity,
        title: Option<String>,
    },
    Divider,
    File {
        url: String,
        name: Option<String>,
        size: Option<String>,
    },
}

impl BlockKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            BlockKind::Paragraph { .. } => "paragraph",
            BlockKind::Heading { .. } => "heading",
            BlockKind::Image(_) => "image",
            BlockKind::Quote { .. } => "quote",
            BlockKind::List { .. } => "list",
            BlockKind::Code { .. } => "code",
            BlockKind::Gallery { .. } => "gallery",
            BlockKind::Spacer { .. } => "spacer",
            BlockKind::Video { .. } => "video",
            BlockKind::Accordion { .. } => "accordion",
            BlockKind::Callout { .. } => "callout",
            BlockKind::Divider => "divider",
            BlockKind::File { .. } => "file",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Default)]
pub struct ImageBlock {
    pub url: String,
    pub alt: Option<String>,
    pub caption: Option<String>,
    pub alignment: ImageAlignment,
    pub size: ImageSize,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryImage {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccordionItem {
    pub question: String,
    pub answer: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageAlignment {
    Left,
    Right,
    #[default]
    Center,
    Full,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageSize {
    Small,
    Medium,
    #[default]
    Large,
    Full,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GalleryStyle {
    #[default]
    Grid,
    Carousel,
    Masonry,
    Fullwidth,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoProvider {
    Youtube,
    Vimeo,
    #[default]
    Custom,
}

impl VideoProvider {
    pub fn detect(url: &str) -> Self {
        let lower = url.to_ascii_lowercase();
        if lower.contains("youtube.com") || lower.contains("youtu.be") {
            VideoProvider::Youtube
        } else if lower.contains("vimeo.com") {
            VideoProvider::Vimeo
        } else {
            VideoProvider::Custom
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalloutSeverity {
    #[default]
    Info,
    Warning,
    Success,
    Error,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpacerHeight {
    Small,
    #[default]
    Medium,
    Large,
    Xlarge,
}

impl SpacerHeight {
    pub fn pixels(self) -> u32 {
        match self {
            SpacerHeight::Small => 16,
            SpacerHeight::Medium => 32,
            SpacerHeight::Large => 64,
            SpacerHeight::Xlarge => 96,
        }
    }

    pub fn from_pixels(px: u32) -> Self {
        match px {
            0..=24 => SpacerHeight::Small,
            25..=48 => SpacerHeight::Medium,
            49..=80 => SpacerHeight::Large,
            _ => SpacerHeight::Xlarge,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlockRecord {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type")]
    pub block_type: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub content: String,
    #[serde(default, skip_serializing_if = "metadata_is_empty")]
    pub metadata: Value,
}

fn nullable_string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(d)?.unwrap_or_default())
}

fn metadata_is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

impl From<ContentBlock> for BlockRecord {
    fn from(block: ContentBlock) -> Self {
        let block_type = block.type_name().to_string();
        let mut meta = Map::new();
        let mut put = |key: &str, value: Value| {
            if !value.is_null() {
                meta.insert(key.to_string(), value);
            }
        };
        let content = match block.kind {
            BlockKind::Paragraph { html } => html,
            BlockKind::Heading { text, level } => {
                put("level", json!(level));
                text
            }
            BlockKind::Image(image) => {
                put("alt", json!(image.alt));
                put("caption", json!(image.caption));
                put("alignment", json!(image.alignment));
                put("size", json!(image.size));
                put("width", json!(image.width));
                put("height", json!(image.height));
                image.url
            }
            BlockKind::Quote { html, citation } => {
                put("citation", json!(citation));
                html
            }
            BlockKind::List { items, ordered } => {
                put("items", json!(items));
                put("ordered", json!(ordered));
                put("listType", json!(if ordered { "ordered" } else { "bullet" }));
                String::new()
            }
            BlockKind::Code { code, language } => {
                put("language", json!(language));
                code
            }
            BlockKind::Gallery { images, style } => {
                put("images", json!(images));
                put("galleryStyle", json!(style));
                String::new()
            }
            BlockKind::Spacer { height } => {
                put("height", json!(height));
                String::new()
            }
            BlockKind::Video { url, provider } => {
                put("provider", json!(provider));
                url
            }
            BlockKind::Accordion { items } => {
                put("items", json!(items));
                String::new()
            }
            BlockKind::Callout {
                html,
                severity,
                title,
            } => {
                put("severity", json!(severity));
                put("title", json!(title));
                html
            }
            BlockKind::Divider => String::new(),
            BlockKind::File { url, name, size } => {
                put("fileName", json!(name));
                put("fileSize", json!(size));
                url
            }
        };
        BlockRecord {
            id: block.id,
            block_type,
            content,
            metadata: Value::Object(meta),
        }
    }
}

impl TryFrom<BlockRecord> for ContentBlock {
    type Error = FolioError;

    fn try_from(record: BlockRecord) -> Result<Self, Self::Error> {
        let block_type = record.block_type.clone();
        ContentBlock::from_record(record).ok_or(FolioError::UnknownBlockType(block_type))
    }
}

// Missing or mistyped metadata fields read as absent.
struct Meta<'a>(&'a Value);

impl Meta<'_> {
    fn get(&self, key: &str) -> Option<&Value> {
        self.0.as_object()?.get(key)
    }

    fn string(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    fn number(&self, key: &str) -> Option<u64> {
        match self.get(key)? {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    fn boolean(&self, key: &str) -> Option<bool> {
        self.get(key)?.as_bool()
    }

    fn token<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.get(key)?.as_str()?.trim().to_ascii_lowercase();
        serde_json::from_value(Value::String(raw)).ok()
    }

    fn strings(&self, key: &str) -> Vec<String> {
        self.get(key)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn records<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        self.get(key)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|v| serde_json::from_value(v.clone()).ok())
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(from = "RawInput")]
pub enum ContentInput {
    Html(String),
    Blocks(Vec<ContentBlock>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawInput {
    Missing,
    Html(String),
    Records(Vec<BlockRecord>),
}

impl From<RawInput> for ContentInput {
    fn from(raw: RawInput) -> Self {
        match raw {
            RawInput::Missing => ContentInput::Html(String::new()),
            RawInput::Html(html) => ContentInput::Html(html),
            RawInput::Records(records) => ContentInput::Blocks(
                records
                    .into_iter()
                    .filter_map(ContentBlock::from_record)
                    .collect(),
            ),
        }
    }
}

impl ContentInput {
    pub fn from_json(text: &str) -> Result<Self, FolioError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn open(path: &Path) -> Result<Self, FolioError> {
        let text = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json(&text)
        } else {
            Ok(ContentInput::Html(text))
        }
    }
}

impl From<&str> for ContentInput {
    fn from(html: &str) -> Self {
        ContentInput::Html(html.to_string())
    }
}

impl From<Vec<ContentBlock>> for ContentInput {
    fn from(blocks: Vec<ContentBlock>) -> Self {
        ContentInput::Blocks(blocks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_with_unknown_types_are_dropped() {
        let input = ContentInput::from_json(
            r#"[
                {"id": "a", "type": "paragraph", "content": "Hi"},
                {"id": "b", "type": "carousel-widget", "content": ""},
                {"id": "c", "type": "heading", "content": "Title", "metadata": {"level": 3}}
            ]"#,
        )
        .unwrap();
        let ContentInput::Blocks(blocks) = input else {
            panic!("expected blocks");
        };
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].id, "a");
        assert!(matches!(
            blocks[1].kind,
            BlockKind::Heading { ref text, level: 3 } if text == "Title"
        ));
    }

    #[test]
    fn irrelevant_metadata_is_ignored() {
        let record: BlockRecord = serde_json::from_value(json!({
            "id": "img",
            "type": "image",
            "content": "https://example.com/a.jpg",
            "metadata": {"level": 9, "alignment": "LEFT", "size": "gigantic", "items": [1, 2]}
        }))
        .unwrap();
        let block = ContentBlock::from_record(record).unwrap();
        let BlockKind::Image(image) = block.kind else {
            panic!("expected image");
        };
        assert_eq!(image.alignment, ImageAlignment::Left);
        assert_eq!(image.size, ImageSize::Large);
    }

    #[test]
    fn null_input_reads_as_empty_html() {
        let input = ContentInput::from_json("null").unwrap();
        assert_eq!(input, ContentInput::Html(String::new()));
    }

    #[test]
    fn list_type_metadata_selects_ordering() {
        let record: BlockRecord = serde_json::from_value(json!({
            "id": "l",
            "type": "list",
            "content": "",
            "metadata": {"items": ["one", "two"], "listType": "ordered"}
        }))
        .unwrap();
        let block = ContentBlock::from_record(record).unwrap();
        assert!(matches!(
            block.kind,
            BlockKind::List { ref items, ordered: true } if items.len() == 2
        ));
    }

    #[test]
    fn blocks_serialize_as_records() {
        let block = ContentBlock::new(
            "block-1",
            BlockKind::Gallery {
                images: vec![GalleryImage {
                    url: "https://example.com/1.jpg".into(),
                    caption: Some("One".into()),
                    alt: None,
                }],
                style: GalleryStyle::Carousel,
            },
        );
        let value = serde_json::to_value(&block).unwrap();
        assert_eq!(value["type"], "gallery");
        assert_eq!(value["content"], "");
        assert_eq!(value["metadata"]["galleryStyle"], "carousel");
        assert_eq!(value["metadata"]["images"][0]["caption"], "One");
        let back: ContentBlock = serde_json::from_value(value).unwrap();
        assert_eq!(back, block);
    }
}
