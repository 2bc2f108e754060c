//! StorageManager - shared tables, the two write contexts, and change observers.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock, Weak};

use parking_lot::ReentrantMutex;

use super::{StorageChange, StorageContext, StorageEntity, StorageError, StoredObject, Versioned};

pub(crate) type Tables = HashMap<String, BTreeMap<i64, StoredObject>>;

type ObserverFn = Arc<dyn Fn(&StorageChange) + Send + Sync>;

struct Observer {
    entity: String,
    callback: ObserverFn,
}

/// State shared by every context of one manager.
pub(crate) struct Shared {
    pub(crate) tables: RwLock<Tables>,
    observers: Mutex<HashMap<u64, Observer>>,
    next_observer: AtomicU64,
    /// Serializes commit + notification so observers see saves in order.
    /// Re-entrant so an observer may itself save.
    pub(crate) commit_lock: ReentrantMutex<()>,
}

impl Shared {
    fn new(tables: Tables) -> Self {
        Self {
            tables: RwLock::new(tables),
            observers: Mutex::new(HashMap::new()),
            next_observer: AtomicU64::new(1),
            commit_lock: ReentrantMutex::new(()),
        }
    }

    /// Deliver changes to observers of the matching entity. Called with the
    /// commit lock held and the tables lock released.
    pub(crate) fn notify(&self, changes: &[StorageChange]) {
        for change in changes {
            let callbacks: Vec<ObserverFn> = {
                let observers = self
                    .observers
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner);
                let mut matching: Vec<(u64, ObserverFn)> = observers
                    .iter()
                    .filter(|(_, observer)| observer.entity == change.entity)
                    .map(|(id, observer)| (*id, Arc::clone(&observer.callback)))
                    .collect();
                matching.sort_by_key(|(id, _)| *id);
                matching.into_iter().map(|(_, callback)| callback).collect()
            };

            for callback in callbacks {
                callback(change);
            }
        }
    }
}

/// Stops delivery of storage changes when dropped.
pub struct ObservationToken {
    id: u64,
    shared: Weak<Shared>,
}

impl Drop for ObservationToken {
    fn drop(&mut self) {
        if let Some(shared) = self.shared.upgrade() {
            shared
                .observers
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(&self.id);
        }
    }
}

/// Process-wide storage shared by all Stores.
///
/// Exposes two contexts over the same tables:
///
/// - [`view_storage`](StorageManager::view_storage): UI-facing reads and
///   simple upserts.
/// - [`writer_derived_storage`](StorageManager::writer_derived_storage):
///   background synchronization work.
///
/// Writes staged in either context become visible to the other only after
/// that context saves. Stores write through [`perform`](StorageManager::perform)
/// instead, so one Store's save never commits another's staged work.
/// Clone-friendly via Arc.
#[derive(Clone)]
pub struct StorageManager {
    shared: Arc<Shared>,
    view: Arc<StorageContext>,
    derived: Arc<StorageContext>,
}

impl Default for StorageManager {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageManager {
    /// Create an empty storage.
    pub fn new() -> Self {
        Self::with_tables(Tables::new())
    }

    fn with_tables(tables: Tables) -> Self {
        let shared = Arc::new(Shared::new(tables));
        Self {
            view: Arc::new(StorageContext::new("view", Arc::clone(&shared))),
            derived: Arc::new(StorageContext::new("writer_derived", Arc::clone(&shared))),
            shared,
        }
    }

    /// Context for UI reads and simple upserts.
    pub fn view_storage(&self) -> &StorageContext {
        &self.view
    }

    /// Context for background synchronization writes.
    pub fn writer_derived_storage(&self) -> &StorageContext {
        &self.derived
    }

    /// A fresh private context over the shared tables. Nothing staged in it
    /// is visible to, or committed by, any other context.
    pub fn new_derived_context(&self) -> StorageContext {
        StorageContext::new("unit_of_work", Arc::clone(&self.shared))
    }

    /// Run `work` as one unit of work and save it.
    ///
    /// `work` stages into a private context while the commit lock is held, so
    /// no other save can interleave and nothing else staged elsewhere is
    /// committed with it. If `work` fails, its staged changes are discarded.
    pub fn perform<T, F>(&self, work: F) -> Result<T, StorageError>
    where
        F: FnOnce(&StorageContext) -> Result<T, StorageError>,
    {
        let _commit = self.shared.commit_lock.lock();
        let context = self.new_derived_context();
        let value = work(&context)?;
        context.try_save()?;
        Ok(value)
    }

    /// Call `callback` after every save that touches `entity`, in commit
    /// order, on the saving thread. Delivery stops when the token drops.
    pub fn observe<F>(&self, entity: &str, callback: F) -> ObservationToken
    where
        F: Fn(&StorageChange) + Send + Sync + 'static,
    {
        let id = self.shared.next_observer.fetch_add(1, Ordering::SeqCst);
        self.shared
            .observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                id,
                Observer {
                    entity: entity.to_string(),
                    callback: Arc::new(callback),
                },
            );
        ObservationToken {
            id,
            shared: Arc::downgrade(&self.shared),
        }
    }

    /// Every saved object of type `E` with its row version, ordered by key.
    pub fn committed_objects<E: StorageEntity>(&self) -> Result<Vec<Versioned<E>>, StorageError> {
        let tables = self
            .shared
            .tables
            .read()
            .map_err(|_| StorageError::LockPoisoned("committed_objects"))?;

        let Some(table) = tables.get(E::ENTITY_NAME) else {
            return Ok(Vec::new());
        };

        table
            .values()
            .map(|stored| {
                Ok(Versioned {
                    data: serde_json::from_slice(&stored.bytes)?,
                    version: stored.version,
                })
            })
            .collect()
    }

    /// Drop every stored entity and every unsaved change, e.g. on logout.
    /// Observers receive a deletion for each removed key.
    pub fn reset(&self) -> Result<(), StorageError> {
        let _commit = self.shared.commit_lock.lock();
        self.view.rollback();
        self.derived.rollback();

        let removed = {
            let mut tables = self
                .shared
                .tables
                .write()
                .map_err(|_| StorageError::LockPoisoned("reset"))?;
            std::mem::take(&mut *tables)
        };

        let mut changes: Vec<StorageChange> = removed
            .into_iter()
            .map(|(entity, table)| StorageChange {
                deleted: table.into_keys().collect(),
                ..StorageChange::new(entity)
            })
            .filter(|change| !change.is_empty())
            .collect();
        changes.sort_by(|a, b| a.entity.cmp(&b.entity));

        tracing::debug!(entities = changes.len(), "storage reset");
        self.shared.notify(&changes);
        Ok(())
    }

    /// Write every committed entity to `path` as a bitcode snapshot.
    pub fn persist_to(&self, path: &Path) -> Result<(), StorageError> {
        let bytes = {
            let tables = self
                .shared
                .tables
                .read()
                .map_err(|_| StorageError::LockPoisoned("persist_to"))?;
            bitcode::serialize(&*tables).map_err(|e| StorageError::Snapshot(e.to_string()))?
        };
        std::fs::write(path, bytes)?;
        tracing::debug!(path = %path.display(), "storage snapshot written");
        Ok(())
    }

    /// Open a storage from a snapshot written by [`persist_to`](Self::persist_to).
    pub fn load_from(path: &Path) -> Result<Self, StorageError> {
        let bytes = std::fs::read(path)?;
        let tables: Tables =
            bitcode::deserialize(&bytes).map_err(|e| StorageError::Snapshot(e.to_string()))?;
        Ok(Self::with_tables(tables))
    }

    /// Open the snapshot at `path`, or an empty storage if there is none yet.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        if path.exists() {
            Self::load_from(path)
        } else {
            Ok(Self::new())
        }
    }
}
