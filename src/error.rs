use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("Consent dialog not found on {url}")]
    ConsentNotFound { url: String },

    #[error("No free key for {key} within {limit} suffixes")]
    KeyCollisionLimit { key: String, limit: u32 },

    #[error("Browser error: {0}")]
    Browser(#[from] anyhow::Error),

    #[error("Unknown page: {url}")]
    PageNotFound { url: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yml::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),
}

pub type Result<T> = std::result::Result<T, ScrapeError>;
