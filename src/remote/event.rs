use std::sync::Arc;

use serde_json::Value;

use super::{JsonMapper, Remote, RemoteCompletion};
use crate::model::{MateEvent, NewEvent};
use crate::network::{HttpMethod, Network, Parameters, TargetType};

enum EventEndpoint {
    List { page_number: u32, page_size: u32 },
    Single { event_id: i64 },
    Create(NewEvent),
}

impl TargetType for EventEndpoint {
    fn method(&self) -> HttpMethod {
        match self {
            EventEndpoint::List { .. } | EventEndpoint::Single { .. } => HttpMethod::Get,
            EventEndpoint::Create(_) => HttpMethod::Post,
        }
    }

    fn path(&self) -> String {
        match self {
            EventEndpoint::List { .. } | EventEndpoint::Create(_) => "events".to_string(),
            EventEndpoint::Single { event_id } => format!("events/{}", event_id),
        }
    }

    fn parameters(&self) -> Parameters {
        match self {
            EventEndpoint::List {
                page_number,
                page_size,
            } => {
                let mut parameters = Parameters::new();
                parameters.insert("page".into(), Value::from(*page_number));
                parameters.insert("per_page".into(), Value::from(*page_size));
                parameters
            }
            EventEndpoint::Single { .. } => Parameters::new(),
            EventEndpoint::Create(event) => match serde_json::to_value(event) {
                Ok(Value::Object(parameters)) => parameters,
                _ => Parameters::new(),
            },
        }
    }
}

pub trait EventRemoteProtocol: Send + Sync {
    fn load_events(
        &self,
        page_number: u32,
        page_size: u32,
        completion: RemoteCompletion<Vec<MateEvent>>,
    );

    fn load_event(&self, event_id: i64, completion: RemoteCompletion<MateEvent>);

    fn create_event(&self, event: NewEvent, completion: RemoteCompletion<MateEvent>);
}

pub struct EventRemote {
    remote: Remote,
}

impl EventRemote {
    pub fn new(network: Arc<dyn Network>) -> Self {
        Self {
            remote: Remote::new(network),
        }
    }
}

impl EventRemoteProtocol for EventRemote {
    fn load_events(
        &self,
        page_number: u32,
        page_size: u32,
        completion: RemoteCompletion<Vec<MateEvent>>,
    ) {
        self.remote.enqueue(
            EventEndpoint::List {
                page_number,
                page_size,
            }
            .as_request(),
            JsonMapper::<Vec<MateEvent>>::new(),
            completion,
        );
    }

    fn load_event(&self, event_id: i64, completion: RemoteCompletion<MateEvent>) {
        self.remote.enqueue(
            EventEndpoint::Single { event_id }.as_request(),
            JsonMapper::<MateEvent>::new(),
            completion,
        );
    }

    fn create_event(&self, event: NewEvent, completion: RemoteCompletion<MateEvent>) {
        self.remote.enqueue(
            EventEndpoint::Create(event).as_request(),
            JsonMapper::<MateEvent>::new(),
            completion,
        );
    }
}
