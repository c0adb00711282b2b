use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use folio_core::types::BlockRecord;
use folio_core::{extract_headings, render, ContentInput, FolioConfig, Parser as BlockParser, ViewState};

/// Turns rich-text article HTML into typed content blocks.
#[derive(Parser, Debug)]
#[command(name = "folio", version, about, long_about = None)]
struct Args {
    /// Configuration file (defaults to the user config directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log parser decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the parsed blocks as JSON records
    Blocks {
        /// HTML file, `.json` block file, or `-` for stdin
        input: PathBuf,
    },
    /// Print the rendered HTML article
    Render {
        input: PathBuf,
        /// Accent colour (`#rgb`, `#rrggbb` or a colour name)
        #[arg(long)]
        accent: Option<String>,
        /// Style the first paragraph with a drop cap
        #[arg(long)]
        drop_cap: bool,
    },
    /// Print the table of contents as JSON
    Toc { input: PathBuf },
}

fn main() -> Result<()> {
    let args = Args::parse();
    let default_filter = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match &args.config {
        Some(path) => FolioConfig::load_from(path),
        None => FolioConfig::load(),
    }
    .context("loading configuration")?;
    let mut parser = BlockParser::new(config.parse.clone());

    match args.command {
        Command::Blocks { input } => {
            let blocks = parser.parse(read_input(&input)?);
            let records: Vec<BlockRecord> = blocks.into_iter().map(BlockRecord::from).collect();
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        Command::Render {
            input,
            accent,
            drop_cap,
        } => {
            let blocks = parser.parse(read_input(&input)?);
            let mut options = config.render.clone();
            options.drop_cap |= drop_cap;
            let accent = accent.unwrap_or_else(|| options.accent_color.clone());
            println!("{}", render(&blocks, &accent, &options, &ViewState::new()));
        }
        Command::Toc { input } => {
            let blocks = parser.parse(read_input(&input)?);
            println!("{}", serde_json::to_string_pretty(&extract_headings(&blocks))?);
        }
    }
    tracing::debug!(cached_images = parser.image_cache().len(), "done");
    Ok(())
}

fn read_input(path: &Path) -> Result<ContentInput> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("reading standard input")?;
        return Ok(sniff(text));
    }
    ContentInput::open(path).with_context(|| format!("reading {}", path.display()))
}

// Stdin has no extension to go by: JSON input is decoded as such, anything
// that fails to decode is HTML.
fn sniff(text: String) -> ContentInput {
    match ContentInput::from_json(&text) {
        Ok(input) => input,
        Err(err) => {
            tracing::debug!(%err, "standard input is not JSON, reading it as HTML");
            ContentInput::Html(text)
        }
    }
}
