use std::sync::Arc;

use thiserror::Error;

use crate::action::{Action, Completion};
use crate::dispatcher::{Dispatcher, Processor};
use crate::model::{MateEvent, NewEvent, StorageEvent};
use crate::network::Network;
use crate::remote::{EventRemote, EventRemoteProtocol, RemoteError};
use crate::storage::{upsert_all, StorageError, StorageManager};

/// Page numbers start at 1.
pub const FIRST_PAGE: u32 = 1;

/// Where to resume a failed paged sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryToken {
    pub page_number: u32,
}

/// A paged sync failed. `retry_token` names the page to request again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to sync page {}: {error}", .retry_token.page_number)]
pub struct SyncingError {
    pub error: RemoteError,
    pub retry_token: RetryToken,
}

#[derive(Debug, Clone)]
pub enum EventAction {
    /// Fetch one page of events. Completes with whether another page may
    /// exist. Syncing the first page removes stored events it does not list.
    SynchronizeEvents {
        page_number: u32,
        page_size: u32,
        on_completion: Completion<Result<bool, SyncingError>>,
    },

    RetrieveEvent {
        event_id: i64,
        on_completion: Completion<Result<MateEvent, RemoteError>>,
    },

    CreateEvent {
        event: NewEvent,
        on_completion: Completion<Result<MateEvent, RemoteError>>,
    },

    /// Drop every stored event, e.g. on logout.
    ResetStoredEvents { on_completion: Completion<()> },
}

impl Action for EventAction {}

pub struct EventStore {
    remote: Arc<dyn EventRemoteProtocol>,
    storage: StorageManager,
}

impl EventStore {
    pub fn new(
        dispatcher: &Dispatcher,
        storage: StorageManager,
        network: Arc<dyn Network>,
    ) -> Arc<Self> {
        Self::with_remote(dispatcher, storage, Arc::new(EventRemote::new(network)))
    }

    pub fn with_remote(
        dispatcher: &Dispatcher,
        storage: StorageManager,
        remote: Arc<dyn EventRemoteProtocol>,
    ) -> Arc<Self> {
        let store = Arc::new(Self { remote, storage });
        dispatcher.register::<EventAction, _>(&store);
        store
    }

    fn synchronize_events(
        &self,
        page_number: u32,
        page_size: u32,
        on_completion: Completion<Result<bool, SyncingError>>,
    ) {
        let storage = self.storage.clone();
        self.remote.load_events(
            page_number,
            page_size,
            Box::new(move |result| {
                let result = match result {
                    Ok(events) => {
                        if let Err(error) = store_page(&storage, page_number, &events) {
                            tracing::error!(page_number, %error, "failed to store events");
                        }
                        Ok(events.len() >= page_size as usize && page_size > 0)
                    }
                    Err(error) => Err(SyncingError {
                        error,
                        retry_token: RetryToken { page_number },
                    }),
                };
                on_completion.complete(result);
            }),
        );
    }

    fn retrieve_event(
        &self,
        event_id: i64,
        on_completion: Completion<Result<MateEvent, RemoteError>>,
    ) {
        let storage = self.storage.clone();
        self.remote.load_event(
            event_id,
            Box::new(move |result| {
                if let Ok(event) = &result {
                    super::persist::<StorageEvent>(&storage, std::slice::from_ref(event));
                }
                on_completion.complete(result);
            }),
        );
    }

    fn create_event(
        &self,
        event: NewEvent,
        on_completion: Completion<Result<MateEvent, RemoteError>>,
    ) {
        let storage = self.storage.clone();
        self.remote.create_event(
            event,
            Box::new(move |result| {
                if let Ok(event) = &result {
                    super::persist::<StorageEvent>(&storage, std::slice::from_ref(event));
                }
                on_completion.complete(result);
            }),
        );
    }

    fn reset_stored_events(&self, on_completion: Completion<()>) {
        let result = self
            .storage
            .perform(|context| context.delete_all_objects::<StorageEvent>());
        if let Err(error) = result {
            tracing::error!(%error, "failed to reset stored events");
        }
        on_completion.complete(());
    }
}

/// Upsert one page in a single save. On the first page, stored events
/// missing from it are deleted in the same save.
fn store_page(
    storage: &StorageManager,
    page_number: u32,
    events: &[MateEvent],
) -> Result<(), StorageError> {
    storage.perform(|context| {
        if page_number <= FIRST_PAGE {
            context.delete_all_objects::<StorageEvent>()?;
        }
        upsert_all::<StorageEvent>(context, events)?;
        Ok(())
    })
}

impl Processor<EventAction> for EventStore {
    fn on_action(&self, action: EventAction) {
        match action {
            EventAction::SynchronizeEvents {
                page_number,
                page_size,
                on_completion,
            } => self.synchronize_events(page_number, page_size, on_completion),
            EventAction::RetrieveEvent {
                event_id,
                on_completion,
            } => self.retrieve_event(event_id, on_completion),
            EventAction::CreateEvent {
                event,
                on_completion,
            } => self.create_event(event, on_completion),
            EventAction::ResetStoredEvents { on_completion } => {
                self.reset_stored_events(on_completion)
            }
        }
    }
}
