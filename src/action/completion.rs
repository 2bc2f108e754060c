//! Single-shot completion callbacks shared across action clones.

use std::fmt;
use std::sync::{Arc, Mutex};

type Callback<T> = Box<dyn FnOnce(T) + Send>;

/// A completion callback that runs at most once.
///
/// Cloning a `Completion` does not duplicate the callback: every clone points
/// at the same slot, and the first call to [`complete`](Completion::complete)
/// takes it. Later calls are dropped with a warning.
pub struct Completion<T> {
    slot: Arc<Mutex<Option<Callback<T>>>>,
}

impl<T> Clone for Completion<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<T: 'static> Completion<T> {
    /// Wrap a callback.
    pub fn new<F>(callback: F) -> Self
    where
        F: FnOnce(T) + Send + 'static,
    {
        Self {
            slot: Arc::new(Mutex::new(Some(Box::new(callback)))),
        }
    }

    /// A completion that discards its value.
    pub fn noop() -> Self {
        Self::new(|_| {})
    }

    /// Resolve the completion. Only the first call has any effect.
    pub fn complete(&self, value: T) {
        let callback = match self.slot.lock() {
            Ok(mut slot) => slot.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };

        match callback {
            Some(callback) => callback(value),
            None => tracing::warn!("completion invoked more than once, ignoring"),
        }
    }

    /// Whether the callback already ran.
    pub fn is_completed(&self) -> bool {
        match self.slot.lock() {
            Ok(slot) => slot.is_none(),
            Err(poisoned) => poisoned.into_inner().is_none(),
        }
    }
}

impl<T> fmt::Debug for Completion<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pending = self.slot.lock().map(|s| s.is_some()).unwrap_or(false);
        f.debug_struct("Completion")
            .field("pending", &pending)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn runs_once_across_clones() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let completion = Completion::new(move |value: usize| {
            counter.fetch_add(value, Ordering::SeqCst);
        });

        let clone = completion.clone();
        completion.complete(1);
        clone.complete(10);

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(clone.is_completed());
    }

    #[test]
    fn noop_is_pending_until_completed() {
        let completion = Completion::<()>::noop();
        assert!(!completion.is_completed());
        completion.complete(());
        assert!(completion.is_completed());
    }
}
