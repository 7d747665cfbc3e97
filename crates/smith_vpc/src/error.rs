//! Error types for VPC construction and synthesis.

use thiserror::Error;

/// Result type alias for VPC operations.
pub type VpcResult<T> = Result<T, VpcError>;

/// Errors that can occur while building or synthesizing a network.
#[derive(Error, Debug)]
pub enum VpcError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Duplicate resource: {0}")]
    DuplicateResource(String),

    #[error("Resource {resource} references undeclared resource {target}")]
    DanglingReference { resource: String, target: String },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl VpcError {
    /// Whether this error was raised by input validation.
    pub fn is_validation(&self) -> bool {
        matches!(self, VpcError::Validation(_))
    }
}
