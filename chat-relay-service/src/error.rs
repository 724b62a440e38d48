use crate::services::providers::ProviderError;
use thiserror::Error;

/// Everything that can stop a single relay invocation.
///
/// Callers only ever see the rendered message inside a 500 envelope; the
/// variant is kept for logs.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    #[error("API communication error: {0}")]
    UpstreamTransport(String),

    #[error("Could not parse API response as JSON: {0}")]
    UpstreamParse(String),

    #[error("Invalid response from API: {0}")]
    UpstreamContract(String),

    #[error("Unexpected error: {0}")]
    Unexpected(#[from] anyhow::Error),
}

impl RelayError {
    /// Stable label for the `kind` log field.
    pub fn kind(&self) -> &'static str {
        match self {
            RelayError::MalformedRequest(_) => "malformed_request",
            RelayError::UpstreamTransport(_) => "upstream_transport",
            RelayError::UpstreamParse(_) => "upstream_parse",
            RelayError::UpstreamContract(_) => "upstream_contract",
            RelayError::Unexpected(_) => "unexpected",
        }
    }
}

impl From<ProviderError> for RelayError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Network(_) | ProviderError::Status { .. } => {
                RelayError::UpstreamTransport(err.to_string())
            }
            ProviderError::InvalidJson(msg) => RelayError::UpstreamParse(msg),
            ProviderError::MissingText => RelayError::UpstreamContract(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for RelayError {
    fn from(err: serde_json::Error) -> Self {
        RelayError::MalformedRequest(err.to_string())
    }
}
