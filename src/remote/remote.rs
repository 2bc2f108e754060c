//! The shared request → validate → map pipeline.

use std::sync::Arc;

use serde_json::Value;

use super::{ApiError, Mapper, RemoteError};
use crate::network::{Network, NetworkError, Request};

/// Recognizes structured API error bodies.
pub struct ResponseValidator;

impl ResponseValidator {
    /// Check a 2xx body: `{"error": "<code>", "message": "..."}` is an API error.
    pub fn validate(response: &[u8]) -> Result<(), ApiError> {
        match Self::parse(response, false) {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    /// Check the body of a non-2xx response. Also accepts the
    /// `{"code": "...", "message": "..."}` shape.
    pub fn api_error_from_failure(response: &[u8]) -> Option<ApiError> {
        Self::parse(response, true)
    }

    fn parse(response: &[u8], failed: bool) -> Option<ApiError> {
        let value: Value = serde_json::from_slice(response).ok()?;
        let object = value.as_object()?;
        let message = object
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string);

        if let Some(code) = object.get("error").and_then(Value::as_str) {
            return Some(ApiError {
                code: code.to_string(),
                message,
            });
        }

        if failed {
            if let Some(code) = object.get("code").and_then(Value::as_str) {
                return Some(ApiError {
                    code: code.to_string(),
                    message,
                });
            }
        }

        None
    }
}

fn process<M: Mapper>(
    result: Result<Vec<u8>, NetworkError>,
    mapper: &M,
) -> Result<M::Output, RemoteError> {
    match result {
        Ok(body) => {
            ResponseValidator::validate(&body)?;
            Ok(mapper.map(&body)?)
        }
        Err(NetworkError::Status { code, body }) => {
            match ResponseValidator::api_error_from_failure(&body) {
                Some(error) => Err(RemoteError::Api(error)),
                None => Err(RemoteError::Network(NetworkError::Status { code, body })),
            }
        }
        Err(error) => Err(RemoteError::Network(error)),
    }
}

/// Base of every resource-family Remote. Stateless between calls.
#[derive(Clone)]
pub struct Remote {
    network: Arc<dyn Network>,
}

impl Remote {
    pub fn new(network: Arc<dyn Network>) -> Self {
        Self { network }
    }

    /// Send `request` and resolve `completion` with the mapped result.
    pub fn enqueue<M, F>(&self, request: Request, mapper: M, completion: F)
    where
        M: Mapper,
        F: FnOnce(Result<M::Output, RemoteError>) + Send + 'static,
    {
        self.network.response_data(
            request,
            Box::new(move |result| {
                let mapped = process(result, &mapper);
                if let Err(error) = &mapped {
                    tracing::debug!(%error, "remote call failed");
                }
                completion(mapped);
            }),
        );
    }
}
