use std::sync::Arc;

use super::{JsonMapper, Remote, RemoteCompletion};
use crate::model::EventCategory;
use crate::network::{HttpMethod, Network, TargetType};

enum EventCategoryEndpoint {
    All,
}

impl TargetType for EventCategoryEndpoint {
    fn method(&self) -> HttpMethod {
        HttpMethod::Get
    }

    fn path(&self) -> String {
        match self {
            EventCategoryEndpoint::All => "event-categories".to_string(),
        }
    }
}

pub trait EventCategoryRemoteProtocol: Send + Sync {
    fn load_all_categories(&self, completion: RemoteCompletion<Vec<EventCategory>>);
}

pub struct EventCategoryRemote {
    remote: Remote,
}

impl EventCategoryRemote {
    pub fn new(network: Arc<dyn Network>) -> Self {
        Self {
            remote: Remote::new(network),
        }
    }
}

impl EventCategoryRemoteProtocol for EventCategoryRemote {
    fn load_all_categories(&self, completion: RemoteCompletion<Vec<EventCategory>>) {
        self.remote.enqueue(
            EventCategoryEndpoint::All.as_request(),
            JsonMapper::<Vec<EventCategory>>::new(),
            completion,
        );
    }
}
