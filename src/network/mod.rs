//! Network - the transport capability Remotes are built on.
//!
//! A [`Network`] takes a [`Request`] and answers with raw response bytes or a
//! [`NetworkError`], exactly once, on whatever thread it likes. Everything
//! above it (validation, decoding, typed errors) lives in [`crate::remote`].
//!
//! Two implementations ship with the crate:
//!
//! - [`MockNetwork`]: canned responses keyed by request path, for tests and
//!   offline development.
//! - `HttpNetwork` (feature `http`): a `reqwest` blocking client driven from a
//!   worker thread per request.

mod config;
mod credentials;
mod error;
#[cfg(feature = "http")]
mod http;
mod mock;
mod request;

pub use config::{ApiConfig, ConfigError};
pub use credentials::Credentials;
pub use error::NetworkError;
#[cfg(feature = "http")]
pub use http::HttpNetwork;
pub use mock::MockNetwork;
pub use request::{HttpMethod, ParameterEncoding, Parameters, Request, TargetType};

/// Callback receiving the outcome of one network call.
pub type ResponseCallback = Box<dyn FnOnce(Result<Vec<u8>, NetworkError>) + Send>;

/// Performs HTTP requests on behalf of Remotes.
pub trait Network: Send + Sync {
    /// Execute `request` and invoke `completion` exactly once with the body.
    fn response_data(&self, request: Request, completion: ResponseCallback);
}
