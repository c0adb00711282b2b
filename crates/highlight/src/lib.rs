use once_cell::sync::Lazy;
use syntect::{
    easy::HighlightLines,
    highlighting::{Color as SynColor, Style, Theme, ThemeSet},
    parsing::{SyntaxReference, SyntaxSet},
    util::LinesWithEndings,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub fn hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[derive(Clone, Debug)]
pub struct HighlightSpan {
    pub text: String,
    pub fg: Color,
    pub bold: bool,
    pub italic: bool,
}

static SYNTAXES: Lazy<SyntaxSet> = Lazy::new(SyntaxSet::load_defaults_newlines);
static THEMES: Lazy<ThemeSet> = Lazy::new(ThemeSet::load_defaults);
static THEME: Lazy<Theme> = Lazy::new(|| {
    THEMES
        .themes
        .get("InspiredGitHub")
        .cloned()
        .or_else(|| THEMES.themes.values().next().cloned())
        .unwrap_or_default()
});

fn find_syntax(lang: Option<&str>) -> Option<&'static SyntaxReference> {
    let lang = lang?.trim();
    let lang = lang
        .strip_prefix("language-")
        .or_else(|| lang.strip_prefix("lang-"))
        .unwrap_or(lang);
    if lang.is_empty() {
        return None;
    }
    SYNTAXES
        .find_syntax_by_token(lang)
        .or_else(|| SYNTAXES.find_syntax_by_name(lang))
}

pub fn is_known_language(lang: &str) -> bool {
    find_syntax(Some(lang)).is_some()
}

pub fn theme_background() -> Option<Color> {
    THEME.settings.background.map(to_color)
}

pub fn highlight_spans(lang: Option<&str>, text: &str) -> Vec<HighlightSpan> {
    let syntax = find_syntax(lang).unwrap_or_else(|| SYNTAXES.find_syntax_plain_text());
    let mut h = HighlightLines::new(syntax, &THEME);
    let mut out = Vec::new();
    for line in LinesWithEndings::from(text) {
        let ranges = h
            .highlight_line(line, &SYNTAXES)
            .unwrap_or_else(|_| vec![(Style::default(), line)]);
        out.extend(ranges.into_iter().map(|(style, content)| HighlightSpan {
            text: content.to_string(),
            fg: to_color(style.foreground),
            bold: style
                .font_style
                .contains(syntect::highlighting::FontStyle::BOLD),
            italic: style
                .font_style
                .contains(syntect::highlighting::FontStyle::ITALIC),
        }));
    }
    out
}

pub fn highlight_html(lang: Option<&str>, text: &str) -> String {
    if find_syntax(lang).is_none() {
        return escape(text);
    }
    let mut html = String::with_capacity(text.len() * 2);
    for span in highlight_spans(lang, text) {
        let mut style = format!("color:{}", span.fg.hex());
        if span.bold {
            style.push_str(";font-weight:bold");
        }
        if span.italic {
            style.push_str(";font-style:italic");
        }
        html.push_str("<span style=\"");
        html.push_str(&style);
        html.push_str("\">");
        html.push_str(&escape(&span.text));
        html.push_str("</span>");
    }
    html
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

fn to_color(c: SynColor) -> Color {
    Color {
        r: c.r,
        g: c.g,
        b: c.b,
    }
}
