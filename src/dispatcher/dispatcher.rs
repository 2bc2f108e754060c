//! Action registry and synchronous delivery.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, Weak};

use super::Processor;
use crate::action::Action;

type Deliver = Arc<dyn Fn(&dyn Any) -> bool + Send + Sync>;

/// One processor registered for one action kind.
struct Registration {
    processor_id: usize,
    liveness: Weak<dyn Any + Send + Sync>,
    deliver: Deliver,
}

/// Routes dispatched actions to every processor registered for their type.
///
/// Clone-friendly via Arc: all clones share one registry. Processors are held
/// weakly, so registering a Store never extends its lifetime.
#[derive(Clone, Default)]
pub struct Dispatcher {
    registry: Arc<RwLock<HashMap<TypeId, Vec<Registration>>>>,
}

fn processor_id<P>(processor: &Arc<P>) -> usize {
    Arc::as_ptr(processor) as *const () as usize
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `processor` for actions of type `A`.
    ///
    /// Registering the same processor twice for the same kind is a no-op.
    pub fn register<A, P>(&self, processor: &Arc<P>)
    where
        A: Action,
        P: Processor<A>,
    {
        let id = processor_id(processor);
        let weak: Weak<P> = Arc::downgrade(processor);
        let liveness: Weak<dyn Any + Send + Sync> = weak.clone();

        let deliver: Deliver = Arc::new(move |action: &dyn Any| match weak.upgrade() {
            Some(processor) => {
                if let Some(action) = action.downcast_ref::<A>() {
                    processor.on_action(action.clone());
                }
                true
            }
            None => false,
        });

        let mut registry = self
            .registry
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let entries = registry.entry(TypeId::of::<A>()).or_default();

        // A dead entry at the same address belongs to a dropped processor.
        entries.retain(|entry| entry.liveness.strong_count() > 0);
        if entries.iter().any(|entry| entry.processor_id == id) {
            return;
        }

        tracing::debug!(action = A::kind_name(), "processor registered");
        entries.push(Registration {
            processor_id: id,
            liveness,
            deliver,
        });
    }

    /// Remove `processor` from every action kind it was registered for.
    pub fn unregister<P: Send + Sync + 'static>(&self, processor: &Arc<P>) {
        let id = processor_id(processor);
        let mut registry = self
            .registry
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        for entries in registry.values_mut() {
            entries.retain(|entry| entry.processor_id != id);
        }
        registry.retain(|_, entries| !entries.is_empty());
    }

    /// Whether `processor` currently receives actions of type `A`.
    pub fn is_registered<A: Action, P: Send + Sync + 'static>(&self, processor: &Arc<P>) -> bool {
        let id = processor_id(processor);
        let registry = self.registry.read().unwrap_or_else(PoisonError::into_inner);
        registry
            .get(&TypeId::of::<A>())
            .map(|entries| {
                entries
                    .iter()
                    .any(|entry| entry.processor_id == id && entry.liveness.strong_count() > 0)
            })
            .unwrap_or(false)
    }

    /// Number of live processors registered for `A`.
    pub fn processor_count<A: Action>(&self) -> usize {
        let registry = self.registry.read().unwrap_or_else(PoisonError::into_inner);
        registry
            .get(&TypeId::of::<A>())
            .map(|entries| {
                entries
                    .iter()
                    .filter(|entry| entry.liveness.strong_count() > 0)
                    .count()
            })
            .unwrap_or(0)
    }

    /// Deliver `action` synchronously, in registration order, to every
    /// processor registered for its type. Nobody listening is not an error.
    pub fn dispatch<A: Action>(&self, action: A) {
        let targets: Vec<(usize, Deliver)> = {
            let registry = self.registry.read().unwrap_or_else(PoisonError::into_inner);
            match registry.get(&TypeId::of::<A>()) {
                Some(entries) => entries
                    .iter()
                    .map(|entry| (entry.processor_id, Arc::clone(&entry.deliver)))
                    .collect(),
                None => Vec::new(),
            }
        };

        if targets.is_empty() {
            tracing::trace!(action = A::kind_name(), "no processor registered");
            return;
        }

        // Registry lock is released so processors may dispatch re-entrantly.
        let mut dropped = Vec::new();
        for (id, deliver) in targets {
            if !deliver(&action) {
                dropped.push(id);
            }
        }

        if !dropped.is_empty() {
            let mut registry = self
                .registry
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            if let Some(entries) = registry.get_mut(&TypeId::of::<A>()) {
                entries.retain(|entry| {
                    !(dropped.contains(&entry.processor_id) && entry.liveness.strong_count() == 0)
                });
            }
        }
    }

    /// Deliver each action in order. No atomicity across the batch.
    pub fn dispatch_all<A: Action>(&self, actions: impl IntoIterator<Item = A>) {
        for action in actions {
            self.dispatch(action);
        }
    }
}
