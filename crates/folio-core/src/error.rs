use thiserror::Error;

#[derive(Debug, Error)]
pub enum FolioError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),
    #[error("Unknown block type: {0}")]
    UnknownBlockType(String),
}
