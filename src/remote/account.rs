use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use super::{ApiError, EmailExistsMapper, JsonMapper, Remote, RemoteCompletion, RemoteError};
use crate::model::{Account, SignupForm};
use crate::network::{HttpMethod, Network, Parameters, TargetType};

/// Account operations that can fail with a recognized API error code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountError {
    #[error("an account with this email already exists")]
    EmailExists,

    #[error("the email address is not valid")]
    InvalidEmail,

    #[error("the password is too weak")]
    WeakPassword,

    #[error("no user matches these details")]
    UserNotFound,

    /// An API error code this client does not know. Kept for diagnostics.
    #[error("unexpected account error {code}")]
    Unexpected {
        code: String,
        message: Option<String>,
    },

    #[error(transparent)]
    Remote(RemoteError),
}

impl AccountError {
    pub fn from_api_error(error: ApiError) -> Self {
        match error.code.as_str() {
            "email_exists" => AccountError::EmailExists,
            "invalid_email" => AccountError::InvalidEmail,
            "weak_password" => AccountError::WeakPassword,
            "user_not_found" => AccountError::UserNotFound,
            _ => AccountError::Unexpected {
                code: error.code,
                message: error.message,
            },
        }
    }
}

impl From<RemoteError> for AccountError {
    fn from(error: RemoteError) -> Self {
        match error {
            RemoteError::Api(error) => AccountError::from_api_error(error),
            other => AccountError::Remote(other),
        }
    }
}

enum AccountEndpoint {
    Me,
    EmailExists { email: String },
    Create(SignupForm),
}

impl TargetType for AccountEndpoint {
    fn method(&self) -> HttpMethod {
        match self {
            AccountEndpoint::Me | AccountEndpoint::EmailExists { .. } => HttpMethod::Get,
            AccountEndpoint::Create(_) => HttpMethod::Post,
        }
    }

    fn path(&self) -> String {
        match self {
            AccountEndpoint::Me => "me".to_string(),
            AccountEndpoint::EmailExists { .. } => "users/email-exists".to_string(),
            AccountEndpoint::Create(_) => "users".to_string(),
        }
    }

    fn parameters(&self) -> Parameters {
        match self {
            AccountEndpoint::Me => Parameters::new(),
            AccountEndpoint::EmailExists { email } => {
                let mut parameters = Parameters::new();
                parameters.insert("email".into(), Value::String(email.clone()));
                parameters
            }
            AccountEndpoint::Create(form) => match serde_json::to_value(form) {
                Ok(Value::Object(parameters)) => parameters,
                _ => Parameters::new(),
            },
        }
    }
}

/// Account operations the [`AccountStore`](crate::store::AccountStore) needs.
pub trait AccountRemoteProtocol: Send + Sync {
    fn load_account(&self, completion: RemoteCompletion<Account>);

    fn check_if_email_exists(&self, email: String, completion: RemoteCompletion<bool>);

    fn create_account(&self, form: SignupForm, completion: RemoteCompletion<Account>);
}

pub struct AccountRemote {
    remote: Remote,
}

impl AccountRemote {
    pub fn new(network: Arc<dyn Network>) -> Self {
        Self {
            remote: Remote::new(network),
        }
    }
}

impl AccountRemoteProtocol for AccountRemote {
    fn load_account(&self, completion: RemoteCompletion<Account>) {
        self.remote.enqueue(
            AccountEndpoint::Me.as_request(),
            JsonMapper::<Account>::new(),
            completion,
        );
    }

    fn check_if_email_exists(&self, email: String, completion: RemoteCompletion<bool>) {
        self.remote.enqueue(
            AccountEndpoint::EmailExists { email }.as_request(),
            EmailExistsMapper,
            completion,
        );
    }

    fn create_account(&self, form: SignupForm, completion: RemoteCompletion<Account>) {
        self.remote.enqueue(
            AccountEndpoint::Create(form).as_request(),
            JsonMapper::<Account>::new(),
            completion,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::{MockNetwork, ParameterEncoding};
    use std::sync::mpsc;

    #[test]
    fn known_codes_map_to_cases() {
        assert_eq!(
            AccountError::from_api_error(ApiError::new("email_exists")),
            AccountError::EmailExists
        );
        assert_eq!(
            AccountError::from(RemoteError::Api(ApiError::new("weak_password"))),
            AccountError::WeakPassword
        );
    }

    #[test]
    fn unknown_code_is_unexpected() {
        let error = AccountError::from_api_error(ApiError {
            code: "totally_unknown_code".into(),
            message: Some("??".into()),
        });
        assert_eq!(
            error,
            AccountError::Unexpected {
                code: "totally_unknown_code".into(),
                message: Some("??".into()),
            }
        );
    }

    #[test]
    fn check_email_sends_query_parameter() {
        let network = MockNetwork::new();
        network.simulate_response("users/email-exists", br#"{"exists": true}"#.to_vec());
        let remote = AccountRemote::new(Arc::new(network.clone()));

        let (tx, rx) = mpsc::channel();
        remote.check_if_email_exists(
            "ada@example.com".into(),
            Box::new(move |result| tx.send(result).unwrap()),
        );

        assert_eq!(rx.recv().unwrap(), Ok(true));
        let request = &network.requests()[0];
        assert_eq!(request.encoding, ParameterEncoding::Url);
        assert_eq!(request.parameters["email"], "ada@example.com");
    }

    #[test]
    fn create_account_posts_form() {
        let network = MockNetwork::new();
        network.simulate_response("users", br#"{"error": "email_exists"}"#.to_vec());
        let remote = AccountRemote::new(Arc::new(network.clone()));

        let (tx, rx) = mpsc::channel();
        remote.create_account(
            SignupForm {
                email: "ada@example.com".into(),
                username: "ada".into(),
                password: "pw".into(),
            },
            Box::new(move |result| tx.send(result).unwrap()),
        );

        let error = AccountError::from(rx.recv().unwrap().unwrap_err());
        assert_eq!(error, AccountError::EmailExists);
        assert_eq!(network.requests()[0].method, HttpMethod::Post);
        assert_eq!(network.requests()[0].parameters["username"], "ada");
    }
}
