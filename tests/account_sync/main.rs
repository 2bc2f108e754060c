//! Dispatch → store → remote → storage, end to end.

mod stub_remote;

use std::sync::{mpsc, Arc, Mutex};

use mate_stores::model::{Account, SignupForm, StorageAccount};
use mate_stores::{
    AccountAction, AccountError, AccountStore, Completion, Dispatcher, StorageChange,
    StorageManager,
};
use stub_remote::StubAccountRemote;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn ada() -> Account {
    Account {
        user_id: 42,
        username: "Ada".into(),
        email: "ada@example.com".into(),
        display_name: String::new(),
        gravatar_url: None,
        email_verified: true,
    }
}

#[test]
fn synchronize_account_completes_and_stores() {
    init_tracing();
    let dispatcher = Dispatcher::new();
    let storage = StorageManager::new();
    let remote = Arc::new(StubAccountRemote::returning(ada()));
    let _store = AccountStore::with_remote(&dispatcher, storage.clone(), remote.clone());

    let (tx, rx) = mpsc::channel();
    dispatcher.dispatch(AccountAction::SynchronizeAccount {
        on_completion: Completion::new(move |result| tx.send(result).unwrap()),
    });

    let account = rx.recv().unwrap().unwrap();
    assert_eq!(account.user_id, 42);
    assert_eq!(account.username, "Ada");

    let stored = storage.committed_objects::<StorageAccount>().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].data.id, 42);
    assert_eq!(stored[0].data.username, "Ada");
    assert_eq!(stored[0].data.email, "ada@example.com");
    assert_eq!(remote.calls(), vec!["load_account"]);
}

#[test]
fn observers_see_the_save_before_the_completion() {
    let dispatcher = Dispatcher::new();
    let storage = StorageManager::new();
    let _store = AccountStore::with_remote(
        &dispatcher,
        storage.clone(),
        Arc::new(StubAccountRemote::returning(ada())),
    );

    let log = Arc::new(Mutex::new(Vec::new()));
    let observed = Arc::clone(&log);
    let _token = storage.observe("Account", move |change: &StorageChange| {
        observed
            .lock()
            .unwrap()
            .push(format!("saved {:?}", change.inserted));
    });

    let completed = Arc::clone(&log);
    dispatcher.dispatch(AccountAction::SynchronizeAccount {
        on_completion: Completion::new(move |_| completed.lock().unwrap().push("completed".into())),
    });

    assert_eq!(*log.lock().unwrap(), vec!["saved [42]".to_string(), "completed".to_string()]);
}

#[test]
fn synchronizing_twice_keeps_one_entity() {
    let dispatcher = Dispatcher::new();
    let storage = StorageManager::new();
    let _store = AccountStore::with_remote(
        &dispatcher,
        storage.clone(),
        Arc::new(StubAccountRemote::returning(ada())),
    );

    for _ in 0..2 {
        dispatcher.dispatch(AccountAction::SynchronizeAccount {
            on_completion: Completion::noop(),
        });
    }

    let stored = storage.committed_objects::<StorageAccount>().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].version, 1);
}

#[test]
fn api_errors_reach_the_caller_as_account_errors() {
    let dispatcher = Dispatcher::new();
    let storage = StorageManager::new();
    let _store = AccountStore::with_remote(
        &dispatcher,
        storage.clone(),
        Arc::new(StubAccountRemote::failing_with("email_exists")),
    );

    let (tx, rx) = mpsc::channel();
    dispatcher.dispatch(AccountAction::CreateAccount {
        form: SignupForm {
            email: "ada@example.com".into(),
            username: "Ada".into(),
            password: "correct horse".into(),
        },
        on_completion: Completion::new(move |result| tx.send(result).unwrap()),
    });
    assert_eq!(rx.recv().unwrap(), Err(AccountError::EmailExists));

    let (tx, rx) = mpsc::channel();
    dispatcher.dispatch(AccountAction::CheckIfEmailExists {
        email: "ada@example.com".into(),
        on_completion: Completion::new(move |result| tx.send(result).unwrap()),
    });
    assert_eq!(rx.recv().unwrap(), Err(AccountError::EmailExists));

    assert!(storage.committed_objects::<StorageAccount>().unwrap().is_empty());
}

#[test]
fn dropped_store_stops_receiving() {
    let dispatcher = Dispatcher::new();
    let store = AccountStore::with_remote(
        &dispatcher,
        StorageManager::new(),
        Arc::new(StubAccountRemote::returning(ada())),
    );
    drop(store);

    let completion = Completion::new(|_: Result<Account, mate_stores::RemoteError>| {});
    dispatcher.dispatch(AccountAction::SynchronizeAccount {
        on_completion: completion.clone(),
    });

    assert!(!completion.is_completed());
    assert_eq!(dispatcher.processor_count::<AccountAction>(), 0);
}
