//! ResultsController - live, sorted, filtered views over storage entities.
//!
//! A controller owns a query (predicate + sort descriptors + optional section
//! key) over one entity type. After [`ResultsController::perform_fetch`] it
//! keeps a snapshot of matching objects as read-only models and, on every
//! save that touches its entity type, recomputes the snapshot and forwards the
//! difference as ordered change events.
//!
//! ## Example
//!
//! ```ignore
//! use mate_stores::{ResultsController, SortDescriptor};
//!
//! let controller = ResultsController::<StorageEvent>::new(
//!     storage_manager.clone(),
//!     Some(Arc::new(|event: &StorageEvent| event.category_id == 3)),
//!     None,
//!     vec![SortDescriptor::ascending(|event: &StorageEvent| event.start_date)],
//! );
//! controller.perform_fetch()?;
//! controller.start_forwarding_events(Arc::new(my_table_view));
//! ```

mod controller;
mod diff;

use std::cmp::Ordering;
use std::sync::Arc;

pub use controller::ResultsController;

/// Filter over storage entities.
pub type Predicate<E> = Arc<dyn Fn(&E) -> bool + Send + Sync>;

/// Groups objects into named sections. Sort by the same key first so each
/// section is contiguous.
pub type SectionKey<E> = Arc<dyn Fn(&E) -> String + Send + Sync>;

/// One ordering rule. Descriptors apply in order; the primary key breaks
/// remaining ties.
pub struct SortDescriptor<E> {
    compare: Arc<dyn Fn(&E, &E) -> Ordering + Send + Sync>,
}

impl<E> Clone for SortDescriptor<E> {
    fn clone(&self) -> Self {
        Self {
            compare: Arc::clone(&self.compare),
        }
    }
}

impl<E: 'static> SortDescriptor<E> {
    pub fn ascending<K, F>(key: F) -> Self
    where
        K: Ord,
        F: Fn(&E) -> K + Send + Sync + 'static,
    {
        Self {
            compare: Arc::new(move |a, b| key(a).cmp(&key(b))),
        }
    }

    pub fn descending<K, F>(key: F) -> Self
    where
        K: Ord,
        F: Fn(&E) -> K + Send + Sync + 'static,
    {
        Self {
            compare: Arc::new(move |a, b| key(b).cmp(&key(a))),
        }
    }

    pub fn compare(&self, a: &E, b: &E) -> Ordering {
        (self.compare)(a, b)
    }
}

/// Position of an object: section, then row within the section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IndexPath {
    pub section: usize,
    pub row: usize,
}

impl IndexPath {
    pub fn new(section: usize, row: usize) -> Self {
        Self { section, row }
    }
}

/// A section of the current snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionInfo<M> {
    pub name: String,
    pub number_of_objects: usize,
    pub objects: Vec<M>,
}

/// What happened to one object between two snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectChange {
    Insert { new_index_path: IndexPath },
    Delete { index_path: IndexPath },
    /// Moved objects are not also reported as updated; reload them at `to`.
    Move { from: IndexPath, to: IndexPath },
    Update { index_path: IndexPath },
}

/// What happened to one section between two snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionChange {
    Insert { index: usize, name: String },
    Delete { index: usize, name: String },
}

/// Receives change events from a [`ResultsController`].
///
/// Events for one save arrive as `will_change_content`, then section and
/// object changes (deletes, inserts, moves, updates), then
/// `did_change_content`. A predicate change sends `did_reset_content` alone.
pub trait ResultsControllerConsumer<M>: Send + Sync {
    fn will_change_content(&self) {}

    fn did_change_section(&self, _change: &SectionChange) {}

    fn did_change_object(&self, _object: &M, _change: &ObjectChange) {}

    fn did_change_content(&self) {}

    fn did_reset_content(&self) {}
}
