use crate::providers::transip::types::ApiErrorBody;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransipError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Cannot read private key {path}: {source}")]
    KeyFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Signing error: {0}")]
    Signing(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TransipError {
    pub(crate) fn from_response(status: u16, body: Option<ApiErrorBody>) -> Self {
        TransipError::Api {
            status,
            message: body
                .map(|b| b.error)
                .unwrap_or_else(|| "Unknown error".to_string()),
        }
    }
}
