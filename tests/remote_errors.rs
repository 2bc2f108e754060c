//! How wire failures are classified on the way to a Store's caller.

use std::sync::{mpsc, Arc};

use mate_stores::remote::{AccountRemote, AccountRemoteProtocol};
use mate_stores::{AccountError, MockNetwork, NetworkError, RemoteError};

fn load_account(network: MockNetwork) -> Result<mate_stores::model::Account, RemoteError> {
    let remote = AccountRemote::new(Arc::new(network));
    let (tx, rx) = mpsc::channel();
    remote.load_account(Box::new(move |result| tx.send(result).unwrap()));
    rx.recv().unwrap()
}

#[test]
fn known_api_code_maps_to_a_specific_case() {
    let network = MockNetwork::new();
    network.simulate_response("me", br#"{"error": "email_exists", "message": "taken"}"#.to_vec());

    let error = AccountError::from(load_account(network).unwrap_err());
    assert_eq!(error, AccountError::EmailExists);
}

#[test]
fn unknown_api_code_is_unexpected() {
    let network = MockNetwork::new();
    network.simulate_response("me", br#"{"error": "totally_unknown_code"}"#.to_vec());

    match AccountError::from(load_account(network).unwrap_err()) {
        AccountError::Unexpected { code, .. } => assert_eq!(code, "totally_unknown_code"),
        other => panic!("expected Unexpected, got {:?}", other),
    }
}

#[test]
fn malformed_body_is_a_decoding_error() {
    let network = MockNetwork::new();
    network.simulate_response("me", b"{\"id\": \"not a number\"}".to_vec());

    let error = load_account(network).unwrap_err();
    assert!(error.is_decoding());
    assert!(matches!(AccountError::from(error), AccountError::Remote(_)));
}

#[test]
fn unknown_path_is_a_status_error() {
    let error = load_account(MockNetwork::new()).unwrap_err();
    assert!(matches!(
        error,
        RemoteError::Network(NetworkError::Status { code: 404, .. })
    ));
}

#[test]
fn asynchronous_network_completes_on_another_thread() {
    let network = MockNetwork::new().asynchronous();
    network.simulate_response("me", br#"{"data": {"id": 7, "username": "async"}}"#.to_vec());

    let caller = std::thread::current().id();
    let remote = AccountRemote::new(Arc::new(network));
    let (tx, rx) = mpsc::channel();
    remote.load_account(Box::new(move |result| {
        tx.send((std::thread::current().id(), result)).unwrap()
    }));

    let (thread, result) = rx.recv().unwrap();
    assert_ne!(thread, caller);
    assert_eq!(result.unwrap().username, "async");
}
