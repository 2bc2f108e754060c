//! Storage - persisted counterparts of read-only models.
//!
//! Read-only models come off the wire and never change. Storage entities are
//! their mutable, persisted twins, keyed by a stable numeric primary key. The
//! two are bridged by [`ReadOnlyConvertible`]:
//!
//! ```text
//!   Remote ──▶ Account ──upsert──▶ StorageAccount ──save_if_needed──▶ tables
//!                 ▲                      │                              │
//!                 └──── to_read_only ────┘               StorageChange ─┴─▶ observers
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use mate_stores::{upsert, StorageManager};
//!
//! let manager = StorageManager::new();
//! let storage = manager.writer_derived_storage();
//! upsert::<StorageAccount>(storage, &account)?;
//! storage.save_if_needed();
//! ```

mod context;
mod error;
mod manager;
mod upsert;

use serde::{de::DeserializeOwned, Deserialize, Serialize};

pub use context::StorageContext;
pub use error::StorageError;
pub use manager::{ObservationToken, StorageManager};
pub use upsert::{upsert, upsert_all};

/// A persisted entity type.
///
/// Exactly one entity exists per primary key per entity type. Derive it with
/// `#[derive(StorageEntity)]`.
pub trait StorageEntity:
    Serialize + DeserializeOwned + Default + Clone + Send + Sync + 'static
{
    /// Table name (e.g. "Account", "Event").
    const ENTITY_NAME: &'static str;

    fn primary_key(&self) -> i64;
}

/// A read-only model that has a storage counterpart.
pub trait ReadOnlyType: Clone + Send + Sync + 'static {
    /// Key of the storage entity this model maps to.
    fn primary_key(&self) -> i64;

    /// Whether `entity` is the stored form of this model.
    fn is_read_only_representation<E>(&self, entity: &E) -> bool
    where
        E: ReadOnlyConvertible<ReadOnly = Self>,
        Self: Sized,
    {
        entity.primary_key() == ReadOnlyType::primary_key(self)
    }
}

/// Conversion between a storage entity and its read-only model.
///
/// `update_with` followed by `to_read_only` gives back the model for every
/// field the entity tracks. Untracked fields come back with the default
/// documented on the model.
pub trait ReadOnlyConvertible: StorageEntity {
    type ReadOnly: ReadOnlyType;

    /// Overwrite this entity with `model`. Idempotent.
    fn update_with(&mut self, model: &Self::ReadOnly);

    /// Snapshot as a read-only model. Never fails.
    fn to_read_only(&self) -> Self::ReadOnly;
}

/// A committed object together with its row version.
///
/// The version starts at 1 and increases on every save that changes the
/// stored bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct Versioned<T> {
    pub data: T,
    pub version: u64,
}

/// What one save did to one entity type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StorageChange {
    pub entity: String,
    pub inserted: Vec<i64>,
    pub updated: Vec<i64>,
    pub deleted: Vec<i64>,
}

impl StorageChange {
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.inserted.is_empty() && self.updated.is_empty() && self.deleted.is_empty()
    }
}

/// Internal stored representation of an entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct StoredObject {
    pub bytes: Vec<u8>,
    pub version: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Default, Serialize, Deserialize, crate::StorageEntity)]
    struct StorageSeat {
        #[entity(key)]
        number: u32,
    }

    #[test]
    fn derived_key_widens_unsigned_without_wrapping() {
        let seat = StorageSeat { number: u32::MAX };
        assert_eq!(StorageSeat::ENTITY_NAME, "Seat");
        assert_eq!(seat.primary_key(), 4_294_967_295);
    }
}
