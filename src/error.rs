//! Error types for Narcissus.

use thiserror::Error;

/// Library-level error type for Narcissus operations.
#[derive(Error, Debug)]
pub enum NarcissusError {
    #[error("Configuration error: {0}")]
    Config(String),

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

    #[error("Malformed model response: {0}")]
    MalformedResponse(String),

    #[error("Invalid tool arguments: {0}")]
    ToolArguments(String),

    #[error("Remote tool error: {0}")]
    RemoteTool(String),

    #[error("Remote tool catalog is not configured")]
    RemoteCatalogDisabled,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Agent error: {0}")]
    Agent(String),

    #[error("Agent exceeded maximum iterations ({0})")]
    IterationsExhausted(usize),
}

/// Result type alias for Narcissus operations.
pub type Result<T> = std::result::Result<T, NarcissusError>;
