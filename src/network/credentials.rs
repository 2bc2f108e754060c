use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// How requests authenticate against the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Credentials {
    /// Username plus application password, sent as HTTP Basic.
    ApplicationPassword { username: String, password: String },
    /// Opaque session token, sent as a Bearer token.
    Bearer { token: String },
}

impl Credentials {
    /// Value for the `Authorization` header.
    pub fn authorization_header(&self) -> String {
        match self {
            Credentials::ApplicationPassword { username, password } => {
                let encoded = STANDARD.encode(format!("{}:{}", username, password));
                format!("Basic {}", encoded)
            }
            Credentials::Bearer { token } => format!("Bearer {}", token),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_header_is_base64_of_user_and_password() {
        let credentials = Credentials::ApplicationPassword {
            username: "ada".into(),
            password: "secret".into(),
        };
        assert_eq!(credentials.authorization_header(), "Basic YWRhOnNlY3JldA==");
    }

    #[test]
    fn bearer_header() {
        let credentials = Credentials::Bearer {
            token: "abc".into(),
        };
        assert_eq!(credentials.authorization_header(), "Bearer abc");
    }
}
