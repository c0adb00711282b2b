pub mod cache;
pub mod config;
pub mod error;
pub mod parse;
pub mod render;
pub mod text;
pub mod toc;
pub mod types;

pub use config::FolioConfig;
pub use error::FolioError;
pub use parse::{html_to_blocks, parse_content, ParseOptions, Parser};
pub use render::{render, render_to, RenderOptions, ViewState};
pub use toc::{extract_headings, TocEntry, TocTracker};
pub use types::{BlockKind, ContentBlock, ContentInput};
