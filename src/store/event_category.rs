use std::sync::Arc;

use crate::action::{Action, Completion};
use crate::dispatcher::{Dispatcher, Processor};
use crate::model::{EventCategory, StorageEventCategory};
use crate::network::Network;
use crate::remote::{EventCategoryRemote, EventCategoryRemoteProtocol, RemoteError};
use crate::storage::{upsert_all, StorageManager};

#[derive(Debug, Clone)]
pub enum EventCategoryAction {
    /// Fetch every category. The stored set is replaced by the response.
    SynchronizeCategories {
        on_completion: Completion<Result<Vec<EventCategory>, RemoteError>>,
    },
}

impl Action for EventCategoryAction {}

pub struct EventCategoryStore {
    remote: Arc<dyn EventCategoryRemoteProtocol>,
    storage: StorageManager,
}

impl EventCategoryStore {
    pub fn new(
        dispatcher: &Dispatcher,
        storage: StorageManager,
        network: Arc<dyn Network>,
    ) -> Arc<Self> {
        Self::with_remote(dispatcher, storage, Arc::new(EventCategoryRemote::new(network)))
    }

    pub fn with_remote(
        dispatcher: &Dispatcher,
        storage: StorageManager,
        remote: Arc<dyn EventCategoryRemoteProtocol>,
    ) -> Arc<Self> {
        let store = Arc::new(Self { remote, storage });
        dispatcher.register::<EventCategoryAction, _>(&store);
        store
    }

    fn synchronize_categories(
        &self,
        on_completion: Completion<Result<Vec<EventCategory>, RemoteError>>,
    ) {
        let storage = self.storage.clone();
        self.remote.load_all_categories(Box::new(move |result| {
            if let Ok(categories) = &result {
                replace_categories(&storage, categories);
            }
            on_completion.complete(result);
        }));
    }
}

fn replace_categories(storage: &StorageManager, categories: &[EventCategory]) {
    let result = storage.perform(|context| {
        context.delete_all_objects::<StorageEventCategory>()?;
        upsert_all::<StorageEventCategory>(context, categories)?;
        Ok(())
    });
    if let Err(error) = result {
        tracing::error!(%error, "failed to replace event categories");
    }
}

impl Processor<EventCategoryAction> for EventCategoryStore {
    fn on_action(&self, action: EventCategoryAction) {
        match action {
            EventCategoryAction::SynchronizeCategories { on_completion } => {
                self.synchronize_categories(on_completion)
            }
        }
    }
}
