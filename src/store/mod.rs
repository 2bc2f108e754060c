//! Stores - the processors that turn actions into remote calls and storage
//! writes.
//!
//! ## Architecture
//!
//! ```text
//!  dispatch(EventAction::SynchronizeEvents)
//!        │
//!        ▼
//!  ┌────────────┐  load_events   ┌─────────────┐
//!  │ EventStore │ ─────────────▶ │ EventRemote │ ──▶ Network
//!  └────────────┘                └─────────────┘
//!        │ upsert + save (StorageManager::perform)
//!        ▼
//!  StorageManager ──▶ observers ──▶ ResultsController ──▶ UI
//!        │
//!        └──▶ on_completion(Ok(has_more))
//! ```
//!
//! Authenticated stores are built from a [`Dispatcher`](crate::Dispatcher),
//! a [`StorageManager`](crate::StorageManager) and a
//! [`Network`](crate::network::Network). The app settings store needs only
//! the dispatcher and a settings file. Every constructor returns `Arc<Self>`
//! and registers the store for its actions exactly once; the dispatcher holds
//! stores weakly, so the caller keeps the `Arc`.
//!
//! ## Example
//!
//! ```ignore
//! let dispatcher = Dispatcher::new();
//! let storage = StorageManager::new();
//! let network: Arc<dyn Network> = Arc::new(HttpNetwork::new(config)?);
//!
//! let _accounts = AccountStore::new(&dispatcher, storage.clone(), network);
//! dispatcher.dispatch(AccountAction::SynchronizeAccount {
//!     on_completion: Completion::new(|result| println!("{:?}", result)),
//! });
//! ```

mod account;
mod app_settings;
mod event;
mod event_category;

pub use account::{AccountAction, AccountStore};
pub use app_settings::{AppSettingsAction, AppSettingsStore};
pub use event::{EventAction, EventStore, RetryToken, SyncingError, FIRST_PAGE};
pub use event_category::{EventCategoryAction, EventCategoryStore};

use crate::storage::{upsert_all, ReadOnlyConvertible, StorageManager};

/// Upsert `models` and save them as one unit of work.
///
/// Failures are logged. A failed write never fails the action that caused it.
pub(crate) fn persist<E: ReadOnlyConvertible>(storage: &StorageManager, models: &[E::ReadOnly]) {
    let result = storage.perform(|context| upsert_all::<E>(context, models).map(|_| ()));
    if let Err(error) = result {
        tracing::error!(entity = E::ENTITY_NAME, %error, "failed to upsert");
    }
}
