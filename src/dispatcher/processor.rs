//! The processor side of the dispatcher contract.

use crate::action::Action;

/// A component that answers one action family.
///
/// A Store implements `Processor<A>` once per action family it supports and
/// registers itself with the [`Dispatcher`](super::Dispatcher) at
/// construction time. `on_action` matches exhaustively over `A`.
pub trait Processor<A: Action>: Send + Sync + 'static {
    fn on_action(&self, action: A);
}
