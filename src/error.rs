//! Error types for PageChat.

use thiserror::Error;

/// Library-level error type for PageChat operations.
#[derive(Error, Debug)]
pub enum PageChatError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTML sanitization failed: {0}")]
    Sanitize(String),

    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    #[error("Context index error: {0}")]
    Index(String),

    #[error("Chat completion failed: {0}")]
    Completion(String),

    #[error("Auth service error: {0}")]
    Auth(String),

    #[error("Page store error: {0}")]
    PageStore(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for PageChat operations.
pub type Result<T> = std::result::Result<T, PageChatError>;
