use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::text::{clean_for_label, slugify};
use crate::types::{BlockKind, ContentBlock};

static EMBEDDED_HEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<h([1-6])\b([^>]*)>(.*?)</h[1-6]\s*>").expect("heading regex is valid")
});
static ID_ATTR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)(?:^|\s)id\s*=\s*["']([^"']+)["']"#).expect("id regex is valid")
});

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
    pub id: String,
    pub text: String,
    pub level: u8,
}

pub fn extract_headings(blocks: &[ContentBlock]) -> Vec<TocEntry> {
    let mut entries = Vec::new();
    for block in blocks {
        match &block.kind {
            BlockKind::Heading { text, level } => {
                let slug = slugify(text);
                let id = if slug.is_empty() {
                    format!("heading-{}", block.id)
                } else {
                    slug
                };
                entries.push(TocEntry {
                    id,
                    text: text.clone(),
                    level: *level,
                });
            }
            BlockKind::Paragraph { html } => {
                entries.extend(EMBEDDED_HEADING.captures_iter(html).filter_map(embedded_entry));
            }
            _ => {}
        }
    }
    entries
}

fn embedded_entry(caps: Captures<'_>) -> Option<TocEntry> {
    let level = caps[1].parse::<u8>().ok()?;
    let text = clean_for_label(&caps[3]);
    let id = ID_ATTR
        .captures(&caps[2])
        .map(|id| id[1].to_string())
        .unwrap_or_else(|| slugify(&text));
    if text.is_empty() || id.is_empty() {
        return None;
    }
    Some(TocEntry { id, text, level })
}

pub fn anchor_embedded_headings(html: &str) -> String {
    EMBEDDED_HEADING
        .replace_all(html, |caps: &Captures| {
            let attrs = &caps[2];
            let slug = slugify(&caps[3]);
            if ID_ATTR.is_match(attrs) || slug.is_empty() {
                return caps[0].to_string();
            }
            format!(
                "<h{level}{attrs} id=\"{slug}\">{inner}</h{level}>",
                level = &caps[1],
                inner = &caps[3]
            )
        })
        .into_owned()
}

#[derive(Clone, Debug, Default)]
pub struct TocTracker {
    entries: Vec<TocEntry>,
    visible: HashSet<String>,
    active: Option<usize>,
}

impl TocTracker {
    pub fn new(entries: Vec<TocEntry>) -> Self {
        Self {
            entries,
            visible: HashSet::new(),
            active: None,
        }
    }

    pub fn entries(&self) -> &[TocEntry] {
        &self.entries
    }

    // First visible entry in TOC order wins; with nothing visible the last
    // active entry stays.
    pub fn observe(&mut self, id: &str, visible: bool) -> Option<&TocEntry> {
        if !self.entries.iter().any(|entry| entry.id == id) {
            tracing::debug!(id, "visibility event for unknown heading ignored");
            return self.active();
        }
        if visible {
            self.visible.insert(id.to_string());
        } else {
            self.visible.remove(id);
        }
        if let Some(idx) = self
            .entries
            .iter()
            .position(|entry| self.visible.contains(&entry.id))
        {
            self.active = Some(idx);
        }
        self.active()
    }

    pub fn active(&self) -> Option<&TocEntry> {
        self.active.and_then(|idx| self.entries.get(idx))
    }
}
