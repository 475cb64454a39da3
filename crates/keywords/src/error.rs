use thiserror::Error;

/// Result type for keyword operations
pub type Result<T> = std::result::Result<T, KeywordError>;

/// Errors that can occur while deriving keywords from a user ID
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeywordError {
    /// The identity does not have the `Name (Comment) <email>` shape
    #[error("Malformed identity: {0:?}")]
    MalformedIdentity(String),

    /// Unknown keyword scheme name
    #[error("Unknown keyword scheme: {0}")]
    UnknownScheme(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl KeywordError {
    /// Create a malformed identity error
    pub fn malformed(identity: impl Into<String>) -> Self {
        Self::MalformedIdentity(identity.into())
    }

    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
