//! The live query object.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use super::diff::{self, Change, RowKey};
use super::{
    IndexPath, ObjectChange, Predicate, ResultsControllerConsumer, SectionChange, SectionInfo,
    SectionKey, SortDescriptor,
};
use crate::storage::{ObservationToken, ReadOnlyConvertible, StorageError, StorageManager};

struct Row<M> {
    id: RowKey,
    object: M,
}

struct State<E: ReadOnlyConvertible> {
    predicate: Option<Predicate<E>>,
    section_key: Option<SectionKey<E>>,
    sort_descriptors: Vec<SortDescriptor<E>>,
    rows: Vec<Row<E::ReadOnly>>,
    fetched: bool,
}

impl<E: ReadOnlyConvertible> State<E> {
    fn row_keys(&self) -> Vec<RowKey> {
        self.rows.iter().map(|row| row.id.clone()).collect()
    }

    fn sectioned(&self) -> bool {
        self.section_key.is_some()
    }
}

type Consumer<M> = Arc<dyn ResultsControllerConsumer<M>>;

/// Event ready for delivery, built under the state lock and sent after it.
enum Outgoing<M> {
    Section(SectionChange),
    Object(M, ObjectChange),
}

struct Inner<E: ReadOnlyConvertible> {
    manager: StorageManager,
    state: Mutex<State<E>>,
    consumer: RwLock<Option<Consumer<E::ReadOnly>>>,
}

impl<E: ReadOnlyConvertible> Inner<E> {
    fn state(&self) -> MutexGuard<'_, State<E>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn consumer(&self) -> Option<Consumer<E::ReadOnly>> {
        self.consumer
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn load_rows(&self, state: &State<E>) -> Result<Vec<Row<E::ReadOnly>>, StorageError> {
        let mut objects = self.manager.committed_objects::<E>()?;

        if let Some(predicate) = &state.predicate {
            objects.retain(|object| predicate(&object.data));
        }

        objects.sort_by(|a, b| {
            state
                .sort_descriptors
                .iter()
                .map(|descriptor| descriptor.compare(&a.data, &b.data))
                .find(|ordering| ordering.is_ne())
                .unwrap_or_else(|| a.data.primary_key().cmp(&b.data.primary_key()))
        });

        Ok(objects
            .into_iter()
            .map(|object| Row {
                id: RowKey {
                    key: object.data.primary_key(),
                    version: object.version,
                    section: state
                        .section_key
                        .as_ref()
                        .map(|key| key(&object.data))
                        .unwrap_or_default(),
                },
                object: object.data.to_read_only(),
            })
            .collect())
    }

    /// Recompute after a save and forward the difference.
    fn refresh(&self) {
        let outgoing = {
            let mut state = self.state();
            if !state.fetched {
                return;
            }

            let rows = match self.load_rows(&state) {
                Ok(rows) => rows,
                Err(error) => {
                    tracing::error!(
                        entity = E::ENTITY_NAME,
                        %error,
                        "results controller refresh failed"
                    );
                    return;
                }
            };

            let new_keys: Vec<RowKey> = rows.iter().map(|row| row.id.clone()).collect();
            let changes = diff::diff(&state.row_keys(), &new_keys, state.sectioned());
            let old_rows = std::mem::replace(&mut state.rows, rows);

            let find = |rows: &[Row<E::ReadOnly>], key: i64| {
                rows.iter()
                    .find(|row| row.id.key == key)
                    .map(|row| row.object.clone())
            };

            changes
                .into_iter()
                .filter_map(|change| match change {
                    Change::Section(section) => Some(Outgoing::Section(section)),
                    Change::Object {
                        key,
                        in_old,
                        change,
                    } => {
                        let source = if in_old { &old_rows } else { &state.rows };
                        find(source.as_slice(), key).map(|object| Outgoing::Object(object, change))
                    }
                })
                .collect::<Vec<_>>()
        };

        if outgoing.is_empty() {
            return;
        }

        if let Some(consumer) = self.consumer() {
            consumer.will_change_content();
            for event in &outgoing {
                match event {
                    Outgoing::Section(change) => consumer.did_change_section(change),
                    Outgoing::Object(object, change) => consumer.did_change_object(object, change),
                }
            }
            consumer.did_change_content();
        }
    }
}

/// A live view over every saved `E` matching a predicate, in sort order.
///
/// Objects are exposed as read-only models. Change events are delivered on
/// the thread that saved, in commit order.
pub struct ResultsController<E: ReadOnlyConvertible> {
    inner: Arc<Inner<E>>,
    _observation: ObservationToken,
}

impl<E: ReadOnlyConvertible> ResultsController<E> {
    pub fn new(
        manager: StorageManager,
        predicate: Option<Predicate<E>>,
        section_key: Option<SectionKey<E>>,
        sort_descriptors: Vec<SortDescriptor<E>>,
    ) -> Self {
        let inner = Arc::new(Inner {
            manager: manager.clone(),
            state: Mutex::new(State {
                predicate,
                section_key,
                sort_descriptors,
                rows: Vec::new(),
                fetched: false,
            }),
            consumer: RwLock::new(None),
        });

        let weak = Arc::downgrade(&inner);
        let observation = manager.observe(E::ENTITY_NAME, move |_change| {
            if let Some(inner) = weak.upgrade() {
                inner.refresh();
            }
        });

        Self {
            inner,
            _observation: observation,
        }
    }

    /// Populate the snapshot. Call once before the first read.
    pub fn perform_fetch(&self) -> Result<(), StorageError> {
        let mut state = self.inner.state();
        state.rows = self.inner.load_rows(&state)?;
        state.fetched = true;
        Ok(())
    }

    /// Replace the predicate, re-fetch, and tell the consumer to reload
    /// everything.
    pub fn set_predicate(&self, predicate: Option<Predicate<E>>) -> Result<(), StorageError> {
        {
            let mut state = self.inner.state();
            state.predicate = predicate;
            state.rows = self.inner.load_rows(&state)?;
            state.fetched = true;
        }

        if let Some(consumer) = self.inner.consumer() {
            consumer.did_reset_content();
        }
        Ok(())
    }

    /// Forward change events to `consumer`, replacing any previous one.
    pub fn start_forwarding_events(
        &self,
        consumer: Arc<dyn ResultsControllerConsumer<E::ReadOnly>>,
    ) {
        *self
            .inner
            .consumer
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(consumer);
    }

    /// Stop forwarding change events.
    pub fn stop_forwarding_events(&self) {
        *self
            .inner
            .consumer
            .write()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Current snapshot, in order.
    pub fn fetched_objects(&self) -> Vec<E::ReadOnly> {
        self.inner
            .state()
            .rows
            .iter()
            .map(|row| row.object.clone())
            .collect()
    }

    pub fn number_of_objects(&self) -> usize {
        self.inner.state().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.number_of_objects() == 0
    }

    /// The snapshot grouped by section key.
    pub fn sections(&self) -> Vec<SectionInfo<E::ReadOnly>> {
        let state = self.inner.state();
        diff::section_ranges(&state.row_keys(), state.sectioned())
            .into_iter()
            .map(|(name, range)| SectionInfo {
                name,
                number_of_objects: range.len(),
                objects: state.rows[range].iter().map(|row| row.object.clone()).collect(),
            })
            .collect()
    }

    /// Object at `index_path`, if it exists.
    pub fn object(&self, index_path: IndexPath) -> Option<E::ReadOnly> {
        let index = self.object_index(index_path)?;
        self.inner
            .state()
            .rows
            .get(index)
            .map(|row| row.object.clone())
    }

    /// Flat position of `index_path` in [`fetched_objects`](Self::fetched_objects).
    pub fn object_index(&self, index_path: IndexPath) -> Option<usize> {
        let state = self.inner.state();
        let sections = diff::section_ranges(&state.row_keys(), state.sectioned());
        let (_, range) = sections.get(index_path.section)?;
        (index_path.row < range.len()).then(|| range.start + index_path.row)
    }
}
