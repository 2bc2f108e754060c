use serde::{Deserialize, Serialize};

use crate::storage::{ReadOnlyConvertible, ReadOnlyType};
use crate::StorageEntity;

/// A category events are filed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventCategory {
    #[serde(rename = "id")]
    pub category_id: i64,

    /// Default: empty.
    #[serde(default)]
    pub name: String,

    /// Default: empty.
    #[serde(default)]
    pub slug: String,

    /// Default: 0 (top level).
    #[serde(default)]
    pub parent_id: i64,
}

impl ReadOnlyType for EventCategory {
    fn primary_key(&self) -> i64 {
        self.category_id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, StorageEntity)]
#[entity(name = "EventCategory")]
pub struct StorageEventCategory {
    #[entity(key)]
    pub category_id: i64,
    pub name: String,
    pub slug: String,
    pub parent_id: i64,
}

impl ReadOnlyConvertible for StorageEventCategory {
    type ReadOnly = EventCategory;

    fn update_with(&mut self, category: &EventCategory) {
        self.category_id = category.category_id;
        self.name = category.name.clone();
        self.slug = category.slug.clone();
        self.parent_id = category.parent_id;
    }

    fn to_read_only(&self) -> EventCategory {
        EventCategory {
            category_id: self.category_id,
            name: self.name.clone(),
            slug: self.slug.clone(),
            parent_id: self.parent_id,
        }
    }
}
