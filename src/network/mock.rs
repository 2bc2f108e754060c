//! MockNetwork - canned responses for tests and offline development.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;

use super::{Network, NetworkError, Request, ResponseCallback};

#[derive(Clone)]
enum Canned {
    Body(Vec<u8>),
    Error(NetworkError),
}

#[derive(Default)]
struct MockState {
    responses: HashMap<String, Canned>,
    requests: Vec<Request>,
}

/// In-process [`Network`] answering from a table keyed by request path.
///
/// Unknown paths fail with `NetworkError::Status { code: 404 }`.
/// Clone-friendly via Arc.
#[derive(Clone, Default)]
pub struct MockNetwork {
    state: Arc<Mutex<MockState>>,
    asynchronous: bool,
}

impl MockNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer from a spawned thread instead of the calling one.
    pub fn asynchronous(mut self) -> Self {
        self.asynchronous = true;
        self
    }

    /// Serve `body` for every request to `path`.
    pub fn simulate_response(&self, path: impl Into<String>, body: impl Into<Vec<u8>>) {
        self.lock().responses.insert(path.into(), Canned::Body(body.into()));
    }

    /// Fail every request to `path` with `error`.
    pub fn simulate_error(&self, path: impl Into<String>, error: NetworkError) {
        self.lock().responses.insert(path.into(), Canned::Error(error));
    }

    /// Forget all canned responses and recorded requests.
    pub fn reset(&self) {
        let mut state = self.lock();
        state.responses.clear();
        state.requests.clear();
    }

    /// Every request received so far, in order.
    pub fn requests(&self) -> Vec<Request> {
        self.lock().requests.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Network for MockNetwork {
    fn response_data(&self, request: Request, completion: ResponseCallback) {
        let canned = {
            let mut state = self.lock();
            let canned = state.responses.get(&request.path).cloned();
            state.requests.push(request.clone());
            canned
        };

        let result = match canned {
            Some(Canned::Body(body)) => Ok(body),
            Some(Canned::Error(error)) => Err(error),
            None => Err(NetworkError::Status {
                code: 404,
                body: Vec::new(),
            }),
        };

        tracing::debug!(
            method = request.method.as_str(),
            path = %request.path,
            ok = result.is_ok(),
            "mock network answered"
        );

        if self.asynchronous {
            thread::spawn(move || completion(result));
        } else {
            completion(result);
        }
    }
}
