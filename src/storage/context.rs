//! StorageContext - a unit of work over the shared tables.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::manager::Shared;
use super::{StorageChange, StorageEntity, StorageError, StoredObject};

/// An unsaved change to one object.
#[derive(Debug, Clone)]
enum Pending {
    Upsert(Vec<u8>),
    Delete,
}

type PendingKey = (String, i64);

/// A write context over the shared tables.
///
/// Changes are staged locally: this context sees them immediately, every
/// other context only after [`save_if_needed`](StorageContext::save_if_needed).
pub struct StorageContext {
    name: &'static str,
    shared: Arc<Shared>,
    pending: Mutex<BTreeMap<PendingKey, Pending>>,
}

impl StorageContext {
    pub(crate) fn new(name: &'static str, shared: Arc<Shared>) -> Self {
        Self {
            name,
            shared,
            pending: Mutex::new(BTreeMap::new()),
        }
    }

    /// Context name, used in logs.
    pub fn name(&self) -> &'static str {
        self.name
    }

    fn pending(&self) -> MutexGuard<'_, BTreeMap<PendingKey, Pending>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Load the object of type `E` with `key`, including unsaved changes.
    pub fn load_object<E: StorageEntity>(&self, key: i64) -> Result<Option<E>, StorageError> {
        if let Some(pending) = self.pending().get(&(E::ENTITY_NAME.to_string(), key)) {
            return match pending {
                Pending::Upsert(bytes) => Ok(Some(serde_json::from_slice(bytes)?)),
                Pending::Delete => Ok(None),
            };
        }

        let tables = self
            .shared
            .tables
            .read()
            .map_err(|_| StorageError::LockPoisoned("load_object"))?;

        match tables.get(E::ENTITY_NAME).and_then(|table| table.get(&key)) {
            Some(stored) => Ok(Some(serde_json::from_slice(&stored.bytes)?)),
            None => Ok(None),
        }
    }

    /// A blank entity. It becomes part of the context once staged.
    pub fn insert_new_object<E: StorageEntity>(&self) -> E {
        E::default()
    }

    /// Stage `entity` for the next save, replacing any stored version.
    pub fn stage<E: StorageEntity>(&self, entity: &E) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec(entity)?;
        self.pending().insert(
            (E::ENTITY_NAME.to_string(), entity.primary_key()),
            Pending::Upsert(bytes),
        );
        Ok(())
    }

    /// Stage a deletion.
    pub fn delete_object<E: StorageEntity>(&self, key: i64) {
        self.pending()
            .insert((E::ENTITY_NAME.to_string(), key), Pending::Delete);
    }

    /// Stage a deletion for every object of type `E`.
    pub fn delete_all_objects<E: StorageEntity>(&self) -> Result<(), StorageError> {
        let keys = self.keys::<E>()?;
        let mut pending = self.pending();
        for key in keys {
            pending.insert((E::ENTITY_NAME.to_string(), key), Pending::Delete);
        }
        Ok(())
    }

    /// Keys of every object of type `E` visible to this context.
    fn keys<E: StorageEntity>(&self) -> Result<BTreeSet<i64>, StorageError> {
        let mut keys: BTreeSet<i64> = {
            let tables = self
                .shared
                .tables
                .read()
                .map_err(|_| StorageError::LockPoisoned("keys"))?;
            tables
                .get(E::ENTITY_NAME)
                .map(|table| table.keys().copied().collect())
                .unwrap_or_default()
        };

        for ((entity, key), pending) in self.pending().iter() {
            if entity != E::ENTITY_NAME {
                continue;
            }
            match pending {
                Pending::Upsert(_) => keys.insert(*key),
                Pending::Delete => keys.remove(key),
            };
        }
        Ok(keys)
    }

    /// Objects of type `E` matching `predicate`, ordered by primary key.
    pub fn fetch_objects<E: StorageEntity>(
        &self,
        predicate: &dyn Fn(&E) -> bool,
    ) -> Result<Vec<E>, StorageError> {
        let mut results = Vec::new();
        for key in self.keys::<E>()? {
            if let Some(object) = self.load_object::<E>(key)? {
                if predicate(&object) {
                    results.push(object);
                }
            }
        }
        Ok(results)
    }

    /// Number of objects of type `E` visible to this context.
    pub fn count_objects<E: StorageEntity>(&self) -> Result<usize, StorageError> {
        Ok(self.keys::<E>()?.len())
    }

    /// Whether there is anything to save.
    pub fn has_changes(&self) -> bool {
        !self.pending().is_empty()
    }

    /// Discard every unsaved change.
    pub fn rollback(&self) {
        self.pending().clear();
    }

    /// Commit staged changes, then notify observers.
    ///
    /// Failures are logged and swallowed. Use [`try_save`](Self::try_save)
    /// to handle them.
    pub fn save_if_needed(&self) {
        if let Err(error) = self.try_save() {
            tracing::error!(context = self.name, %error, "failed to save storage changes");
        }
    }

    /// Commit staged changes and return what changed, per entity type.
    ///
    /// Objects whose bytes equal the stored ones are not rewritten and do
    /// not show up as updates.
    pub fn try_save(&self) -> Result<Vec<StorageChange>, StorageError> {
        let _commit = self.shared.commit_lock.lock();

        if !self.has_changes() {
            return Ok(Vec::new());
        }

        let mut changes: BTreeMap<String, StorageChange> = BTreeMap::new();
        {
            // Staged changes stay put until the tables are writable.
            let mut tables = self
                .shared
                .tables
                .write()
                .map_err(|_| StorageError::LockPoisoned("save"))?;
            let staged = std::mem::take(&mut *self.pending());

            for ((entity, key), pending) in staged {
                let table = tables.entry(entity.clone()).or_default();
                let change = changes
                    .entry(entity.clone())
                    .or_insert_with(|| StorageChange::new(entity));

                match pending {
                    Pending::Upsert(bytes) => match table.get_mut(&key) {
                        Some(stored) if stored.bytes == bytes => {}
                        Some(stored) => {
                            stored.bytes = bytes;
                            stored.version += 1;
                            change.updated.push(key);
                        }
                        None => {
                            table.insert(key, StoredObject { bytes, version: 1 });
                            change.inserted.push(key);
                        }
                    },
                    Pending::Delete => {
                        if table.remove(&key).is_some() {
                            change.deleted.push(key);
                        }
                    }
                }
            }
        }

        let changes: Vec<StorageChange> = changes
            .into_values()
            .filter(|change| !change.is_empty())
            .collect();

        tracing::debug!(context = self.name, entities = changes.len(), "storage saved");
        self.shared.notify(&changes);
        Ok(changes)
    }
}
