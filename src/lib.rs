// Lets `#[derive(StorageEntity)]` expand to `mate_stores::...` inside this crate too.
extern crate self as mate_stores;

pub mod action;
pub mod dispatcher;
pub mod model;
pub mod network;
pub mod remote;
pub mod results_controller;
pub mod settings;
pub mod storage;
pub mod store;

pub use action::{Action, Completion};
pub use dispatcher::{Dispatcher, Processor};
pub use network::{ApiConfig, Credentials, MockNetwork, Network, NetworkError, Request};
pub use remote::{AccountError, ApiError, DecodingError, RemoteError};
pub use results_controller::{
    IndexPath, ObjectChange, ResultsController, ResultsControllerConsumer, SectionChange,
    SectionInfo, SortDescriptor,
};
pub use settings::{GeneralAppSettings, GeneralAppSettingsStorage, SettingsError};
pub use storage::{
    upsert, upsert_all, ObservationToken, ReadOnlyConvertible, ReadOnlyType, StorageChange,
    StorageContext, StorageEntity, StorageError, StorageManager, Versioned,
};
pub use store::{
    AccountAction, AccountStore, AppSettingsAction, AppSettingsStore, EventAction,
    EventCategoryAction, EventCategoryStore, EventStore, RetryToken, SyncingError,
};

// Derive macro shares the trait's name; they live in different namespaces.
pub use mate_stores_macros::StorageEntity;

#[cfg(feature = "http")]
pub use network::HttpNetwork;
