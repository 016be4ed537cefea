//! # Errores
//! src/error.rs
//!
//! Errores tipados del cliente de la API y de la configuración.

use crate::client::crypto::CryptoError;
use crate::http::{ParseError, StatusCode};
use thiserror::Error;

/// Errores que puede devolver `ApiClient`
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error("connection failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed response: {0}")]
    Parse(#[from] ParseError),

    #[error("unexpected status {status}: {body}")]
    UnexpectedStatus { status: StatusCode, body: String },

    /// La API respondió `success: false`
    #[error("api error: {0}")]
    Api(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("encryption error: {0}")]
    Crypto(#[from] CryptoError),

    #[error("gave up after {attempts} attempts: {last}")]
    RetriesExhausted {
        attempts: u32,
        last: Box<ClientError>,
    },
}

impl From<url::ParseError> for ClientError {
    fn from(e: url::ParseError) -> Self {
        ClientError::InvalidUrl(e.to_string())
    }
}

/// Valores de configuración inválidos
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{field} must be >= 1")]
    Zero { field: &'static str },

    #[error("invalid header '{0}', expected 'Name: value'")]
    InvalidHeader(String),

    #[error("invalid url '{0}'")]
    InvalidUrl(String),

    #[error("encryption key must be exactly 32 bytes, got {0}")]
    KeyLength(usize),

    #[error("{0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retries_exhausted_message() {
        let err = ClientError::RetriesExhausted {
            attempts: 3,
            last: Box::new(ClientError::Api("User not found".to_string())),
        };
        assert_eq!(err.to_string(), "gave up after 3 attempts: api error: User not found");
    }

    #[test]
    fn test_config_error_messages() {
        assert_eq!(
            ConfigError::Zero { field: "concurrency" }.to_string(),
            "concurrency must be >= 1"
        );
        assert_eq!(
            ConfigError::KeyLength(5).to_string(),
            "encryption key must be exactly 32 bytes, got 5"
        );
    }
}
