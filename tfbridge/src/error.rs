//! Error types for tfbridge

/// Error type for bridge operations
///
/// Every variant is surfaced to the calling handler unchanged. Variants that
/// wrap text from elsewhere (the executable's stderr, the OS) display that
/// text verbatim.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("{0}")]
    Encode(#[from] serde_json::Error),

    #[error("{0}")]
    Spawn(#[from] std::io::Error),

    /// Non-zero exit with diagnostic text on stderr
    #[error("{0}")]
    Diagnostic(String),

    /// Non-zero exit with nothing on stderr
    #[error("failed to execute")]
    Opaque,

    #[error("{0}")]
    Decode(String),

    #[error("error getting {0}")]
    MissingField(String),

    #[error("error setting {field}: {message}")]
    SetField { field: String, message: String },

    #[error("schema not found for resource: {0}")]
    SchemaNotFound(String),

    #[error("{0}")]
    Custom(String),
}

/// Result type alias for bridge operations
pub type Result<T> = std::result::Result<T, BridgeError>;

impl From<String> for BridgeError {
    fn from(s: String) -> Self {
        BridgeError::Custom(s)
    }
}

impl From<&str> for BridgeError {
    fn from(s: &str) -> Self {
        BridgeError::Custom(s.to_string())
    }
}
