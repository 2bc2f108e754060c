//! Mappers - pure decoders from response bytes to typed models.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use super::DecodingError;

/// Decodes a response body.
pub trait Mapper: Send + 'static {
    type Output: Send + 'static;

    fn map(&self, response: &[u8]) -> Result<Self::Output, DecodingError>;
}

/// Decode `T`, unwrapping an optional `{"data": ...}` envelope.
///
/// When the payload is an object with a `data` member that decodes as `T`,
/// that member wins. Otherwise the whole payload is decoded as `T`.
pub fn decode_envelope<T: DeserializeOwned>(response: &[u8]) -> Result<T, DecodingError> {
    let value: Value = serde_json::from_slice(response)?;

    if let Some(data) = value.as_object().and_then(|object| object.get("data")) {
        if let Ok(decoded) = T::deserialize(data) {
            return Ok(decoded);
        }
    }

    Ok(serde_json::from_value(value)?)
}

/// Maps a body into any deserializable model (or `Vec` of models).
pub struct JsonMapper<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonMapper<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for JsonMapper<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: DeserializeOwned + Send + 'static> Mapper for JsonMapper<T> {
    type Output = T;

    fn map(&self, response: &[u8]) -> Result<T, DecodingError> {
        decode_envelope(response)
    }
}

/// Maps `{"exists": bool}`.
#[derive(Default)]
pub struct EmailExistsMapper;

#[derive(Deserialize)]
struct EmailExists {
    exists: bool,
}

impl Mapper for EmailExistsMapper {
    type Output = bool;

    fn map(&self, response: &[u8]) -> Result<bool, DecodingError> {
        decode_envelope::<EmailExists>(response).map(|body| body.exists)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Account;

    #[test]
    fn envelope_is_transparent() {
        let bare = br#"{"id": 42, "username": "Ada", "email": "ada@example.com"}"#;
        let wrapped = br#"{"data": {"id": 42, "username": "Ada", "email": "ada@example.com"}}"#;

        let mapper = JsonMapper::<Account>::new();
        assert_eq!(mapper.map(bare).unwrap(), mapper.map(wrapped).unwrap());
    }

    #[test]
    fn envelope_works_for_lists() {
        let wrapped = br#"{"data": [{"id": 1}, {"id": 2}]}"#;
        let accounts = JsonMapper::<Vec<Account>>::new().map(wrapped).unwrap();
        assert_eq!(accounts.len(), 2);
    }

    #[test]
    fn malformed_json_is_a_decoding_error() {
        let result = JsonMapper::<Account>::new().map(b"{not json");
        assert!(result.is_err());
    }

    #[test]
    fn missing_required_field_is_a_decoding_error() {
        let result = JsonMapper::<Account>::new().map(br#"{"username": "nobody"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn email_exists_mapper() {
        assert!(EmailExistsMapper.map(br#"{"exists": true}"#).unwrap());
        assert!(!EmailExistsMapper.map(br#"{"data": {"exists": false}}"#).unwrap());
    }
}
