//! Error types
//!
//! The formatting pipeline itself is total: pretty-printer failures fall back
//! to the unformatted text and unknown type kinds render as `unknown`. The
//! errors below surface only from configuration loading, pool construction,
//! and the pluggable [`TypePrinter`](crate::format::pretty::TypePrinter) seam.

use thiserror::Error;

/// Result type for etch-types operations
pub type EtchResult<T> = Result<T, EtchError>;

/// Main error type for etch-types
#[derive(Debug, Error)]
pub enum EtchError {
    /// TypeScript parse error
    #[error("TypeScript parse error: {0}")]
    TypeScriptParse(String),

    /// A construct the layout printer has no rule for
    #[error("Unsupported type construct: {0}")]
    Unsupported(String),

    /// Parsed source did not contain the expected declaration
    #[error("Missing declaration: {0}")]
    MissingDeclaration(String),

    /// Invalid module specifier
    #[error("Invalid specifier: {0}")]
    InvalidSpecifier(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML configuration could not be parsed
    #[error("Invalid TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Worker pool could not be created
    #[error("Failed to build worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

impl EtchError {
    /// Create an unsupported-construct error
    pub fn unsupported(what: impl Into<String>) -> Self {
        EtchError::Unsupported(what.into())
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        EtchError::Config(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_etch_error_display() {
        let err = EtchError::TypeScriptParse("Expected ';', got '}'".to_string());
        assert!(err.to_string().starts_with("TypeScript parse error"));

        let err = EtchError::unsupported("mapped type");
        assert_eq!(err.to_string(), "Unsupported type construct: mapped type");
    }

    #[test]
    fn test_config_error_from_toml() {
        let toml_err = toml::from_str::<toml::Value>("a = ").unwrap_err();
        let err: EtchError = toml_err.into();
        assert!(matches!(err, EtchError::Toml(_)));
    }
}
