use thiserror::Error;

/// Transport-level failures: the request never produced a usable body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkError {
    #[error("not connected to the internet")]
    NotConnected,

    #[error("request timed out")]
    Timeout,

    /// Non-2xx status. The body is kept so structured API errors can still be
    /// recognized.
    #[error("unacceptable status code {code}")]
    Status { code: u16, body: Vec<u8> },

    #[error("invalid request url: {0}")]
    InvalidUrl(String),

    #[error("transport error: {0}")]
    Transport(String),
}
