use thiserror::Error;

use crate::config::ConfigError;
use crate::unpacker::UnpackError;

#[derive(Error, Debug)]
pub enum EddyError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Unpack error: {0}")]
    Unpack(#[from] UnpackError),

    #[error("Crawl error: {0}")]
    Crawl(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, EddyError>;
