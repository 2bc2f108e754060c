//! Account remote that answers from fixed values, no network involved.

#![allow(dead_code)]

use std::sync::Mutex;

use mate_stores::model::{Account, SignupForm};
use mate_stores::remote::{AccountRemoteProtocol, RemoteCompletion};
use mate_stores::{ApiError, RemoteError};

#[derive(Default)]
pub struct StubAccountRemote {
    account: Mutex<Option<Result<Account, RemoteError>>>,
    email_exists: Mutex<Option<Result<bool, RemoteError>>>,
    calls: Mutex<Vec<&'static str>>,
}

impl StubAccountRemote {
    pub fn returning(account: Account) -> Self {
        let stub = Self::default();
        *stub.account.lock().unwrap() = Some(Ok(account));
        stub
    }

    pub fn failing_with(code: &str) -> Self {
        let stub = Self::default();
        *stub.account.lock().unwrap() = Some(Err(RemoteError::Api(ApiError::new(code))));
        *stub.email_exists.lock().unwrap() = Some(Err(RemoteError::Api(ApiError::new(code))));
        stub
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    fn account(&self) -> Result<Account, RemoteError> {
        self.account
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Err(RemoteError::Api(ApiError::new("not_stubbed"))))
    }
}

impl AccountRemoteProtocol for StubAccountRemote {
    fn load_account(&self, completion: RemoteCompletion<Account>) {
        self.calls.lock().unwrap().push("load_account");
        completion(self.account());
    }

    fn check_if_email_exists(&self, _email: String, completion: RemoteCompletion<bool>) {
        self.calls.lock().unwrap().push("check_if_email_exists");
        let result = self.email_exists.lock().unwrap().clone().unwrap_or(Ok(false));
        completion(result);
    }

    fn create_account(&self, _form: SignupForm, completion: RemoteCompletion<Account>) {
        self.calls.lock().unwrap().push("create_account");
        completion(self.account());
    }
}
