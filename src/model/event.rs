use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::{ReadOnlyConvertible, ReadOnlyType};
use crate::StorageEntity;

/// A published event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MateEvent {
    #[serde(rename = "id")]
    pub event_id: i64,

    /// Default: empty.
    #[serde(default)]
    pub title: String,

    /// Default: empty.
    #[serde(default)]
    pub description: String,

    /// Default: 0 (uncategorized).
    #[serde(default)]
    pub category_id: i64,

    /// ISO8601. Default: none.
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,

    /// Default: empty.
    #[serde(default)]
    pub location: String,

    /// Default: 0.
    #[serde(default)]
    pub attendee_count: u32,

    /// Ticket price in cents. Default: 0 (free).
    #[serde(default)]
    pub price_cents: i64,
}

impl ReadOnlyType for MateEvent {
    fn primary_key(&self) -> i64 {
        self.event_id
    }
}

/// Stored event. Tracks every field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, StorageEntity)]
#[entity(name = "Event")]
pub struct StorageEvent {
    #[entity(key)]
    pub event_id: i64,
    pub title: String,
    pub description: String,
    pub category_id: i64,
    pub start_date: Option<DateTime<Utc>>,
    pub location: String,
    pub attendee_count: u32,
    pub price_cents: i64,
}

impl ReadOnlyConvertible for StorageEvent {
    type ReadOnly = MateEvent;

    fn update_with(&mut self, event: &MateEvent) {
        self.event_id = event.event_id;
        self.title = event.title.clone();
        self.description = event.description.clone();
        self.category_id = event.category_id;
        self.start_date = event.start_date;
        self.location = event.location.clone();
        self.attendee_count = event.attendee_count;
        self.price_cents = event.price_cents;
    }

    fn to_read_only(&self) -> MateEvent {
        MateEvent {
            event_id: self.event_id,
            title: self.title.clone(),
            description: self.description.clone(),
            category_id: self.category_id,
            start_date: self.start_date,
            location: self.location.clone(),
            attendee_count: self.attendee_count,
            price_cents: self.price_cents,
        }
    }
}

/// Payload for creating an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub category_id: i64,
    pub start_date: Option<DateTime<Utc>>,
    pub location: String,
    pub price_cents: i64,
}
