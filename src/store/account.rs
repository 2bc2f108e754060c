use std::sync::Arc;

use crate::action::{Action, Completion};
use crate::dispatcher::{Dispatcher, Processor};
use crate::model::{Account, SignupForm, StorageAccount};
use crate::network::Network;
use crate::remote::{AccountError, AccountRemote, AccountRemoteProtocol, RemoteError};
use crate::storage::{ReadOnlyConvertible, StorageManager};

#[derive(Debug, Clone)]
pub enum AccountAction {
    /// Fetch the signed-in account and store it.
    SynchronizeAccount {
        on_completion: Completion<Result<Account, RemoteError>>,
    },

    /// Read a stored account. Does not touch the network.
    LoadAccount {
        user_id: i64,
        on_completion: Completion<Option<Account>>,
    },

    CheckIfEmailExists {
        email: String,
        on_completion: Completion<Result<bool, AccountError>>,
    },

    /// Sign up, then store the new account.
    CreateAccount {
        form: SignupForm,
        on_completion: Completion<Result<Account, AccountError>>,
    },
}

impl Action for AccountAction {}

pub struct AccountStore {
    remote: Arc<dyn AccountRemoteProtocol>,
    storage: StorageManager,
}

impl AccountStore {
    pub fn new(
        dispatcher: &Dispatcher,
        storage: StorageManager,
        network: Arc<dyn Network>,
    ) -> Arc<Self> {
        Self::with_remote(dispatcher, storage, Arc::new(AccountRemote::new(network)))
    }

    /// Build with a custom remote, e.g. a stub in tests.
    pub fn with_remote(
        dispatcher: &Dispatcher,
        storage: StorageManager,
        remote: Arc<dyn AccountRemoteProtocol>,
    ) -> Arc<Self> {
        let store = Arc::new(Self { remote, storage });
        Self::register_supported_actions(&store, dispatcher);
        store
    }

    fn register_supported_actions(store: &Arc<Self>, dispatcher: &Dispatcher) {
        dispatcher.register::<AccountAction, _>(store);
    }

    fn synchronize_account(&self, on_completion: Completion<Result<Account, RemoteError>>) {
        let storage = self.storage.clone();
        self.remote.load_account(Box::new(move |result| {
            if let Ok(account) = &result {
                super::persist::<StorageAccount>(&storage, std::slice::from_ref(account));
            }
            on_completion.complete(result);
        }));
    }

    fn load_account(&self, user_id: i64, on_completion: Completion<Option<Account>>) {
        let account = match self
            .storage
            .view_storage()
            .load_object::<StorageAccount>(user_id)
        {
            Ok(stored) => stored.map(|account| account.to_read_only()),
            Err(error) => {
                tracing::error!(user_id, %error, "failed to load account");
                None
            }
        };
        on_completion.complete(account);
    }

    fn check_if_email_exists(
        &self,
        email: String,
        on_completion: Completion<Result<bool, AccountError>>,
    ) {
        self.remote.check_if_email_exists(
            email,
            Box::new(move |result| on_completion.complete(result.map_err(AccountError::from))),
        );
    }

    fn create_account(
        &self,
        form: SignupForm,
        on_completion: Completion<Result<Account, AccountError>>,
    ) {
        let storage = self.storage.clone();
        self.remote.create_account(
            form,
            Box::new(move |result| {
                if let Ok(account) = &result {
                    super::persist::<StorageAccount>(&storage, std::slice::from_ref(account));
                }
                on_completion.complete(result.map_err(AccountError::from));
            }),
        );
    }
}

impl Processor<AccountAction> for AccountStore {
    fn on_action(&self, action: AccountAction) {
        match action {
            AccountAction::SynchronizeAccount { on_completion } => {
                self.synchronize_account(on_completion)
            }
            AccountAction::LoadAccount {
                user_id,
                on_completion,
            } => self.load_account(user_id, on_completion),
            AccountAction::CheckIfEmailExists {
                email,
                on_completion,
            } => self.check_if_email_exists(email, on_completion),
            AccountAction::CreateAccount {
                form,
                on_completion,
            } => self.create_account(form, on_completion),
        }
    }
}
