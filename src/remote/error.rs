use thiserror::Error;

use crate::network::NetworkError;

/// The response body did not match the expected schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("could not decode response: {0}")]
pub struct DecodingError(pub String);

impl From<serde_json::Error> for DecodingError {
    fn from(error: serde_json::Error) -> Self {
        DecodingError(error.to_string())
    }
}

/// A structured error body sent by the API, e.g. `{"error": "email_exists"}`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("api error {code}")]
pub struct ApiError {
    pub code: String,
    pub message: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: None,
        }
    }
}

/// Every way a Remote call can fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    /// Connectivity, timeout, or a non-2xx status without a recognizable body.
    #[error(transparent)]
    Network(#[from] NetworkError),

    /// The body arrived but does not match the expected schema.
    #[error(transparent)]
    Decoding(#[from] DecodingError),

    /// The API answered with a structured error.
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl RemoteError {
    pub fn is_decoding(&self) -> bool {
        matches!(self, RemoteError::Decoding(_))
    }

    pub fn api_code(&self) -> Option<&str> {
        match self {
            RemoteError::Api(error) => Some(&error.code),
            _ => None,
        }
    }
}
