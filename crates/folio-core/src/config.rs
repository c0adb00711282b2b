use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::FolioError;
use crate::parse::ParseOptions;
use crate::render::RenderOptions;

pub const QUALIFIER: &str = "com";
pub const ORGANIZATION: &str = "folio";
pub const APPLICATION: &str = "folio";

const CONFIG_FILE: &str = "config.toml";

pub fn config_root() -> Option<PathBuf> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION).map(|p| p.config_dir().to_path_buf())
}

pub fn config_path() -> Option<PathBuf> {
    config_root().map(|root| root.join(CONFIG_FILE))
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FolioConfig {
    pub render: RenderOptions,
    pub parse: ParseOptions,
}

impl FolioConfig {
    pub fn load() -> Result<Self, FolioError> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, FolioError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self, FolioError> {
        Ok(toml::from_str(text)?)
    }
}
