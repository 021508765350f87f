//! Crate-wide error type.

use crate::ooxml::OoxmlError;
use crate::ooxml::opc::error::OpcError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for slidesmith operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that stop a run.
///
/// Per-item failures (one image, one search) are logged and degraded
/// instead of surfacing here.
#[derive(Error, Debug)]
pub enum Error {
    /// OPC package error
    #[error("OPC error: {0}")]
    Opc(#[from] OpcError),

    /// PresentationML error
    #[error("OOXML error: {0}")]
    Ooxml(#[from] OoxmlError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// Required API key absent from the environment
    #[error("Missing credential: {0} is not set")]
    MissingCredential(&'static str),

    /// Prompt file, section or template problem
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Template path does not exist
    #[error("Template not found: {}", .0.display())]
    TemplateNotFound(PathBuf),

    /// Template exists but cannot be used
    #[error("Cannot open template {}: {reason}", path.display())]
    TemplateOpen { path: PathBuf, reason: String },

    /// Language model call failed
    #[error("LLM error: {0}")]
    Llm(String),

    /// Output deck could not be written
    #[error("Cannot save {}: {reason}", path.display())]
    Save { path: PathBuf, reason: String },

    /// Image could not be read or embedded
    #[error("Image error: {0}")]
    Image(String),
}
