//! Actions - values describing one intended operation plus its completion.
//!
//! Every action family is a plain Rust enum, one variant per operation. The
//! variant carries the request parameters and a [`Completion`] that the
//! handling Store resolves exactly once.
//!
//! ## Example
//!
//! ```ignore
//! use mate_stores::{Action, Completion};
//!
//! #[derive(Clone)]
//! enum CounterAction {
//!     Increment { by: u32, on_completion: Completion<u32> },
//! }
//!
//! impl Action for CounterAction {}
//!
//! dispatcher.dispatch(CounterAction::Increment {
//!     by: 1,
//!     on_completion: Completion::new(|value| println!("now {}", value)),
//! });
//! ```

mod completion;

pub use completion::Completion;

/// Marker trait for dispatchable actions.
///
/// Actions are cloned when more than one processor listens for the same
/// kind, so the payload must be `Clone`. Completions stay single-shot across
/// clones.
pub trait Action: Clone + Send + 'static {
    /// Human readable name of the action family, used in logs.
    fn kind_name() -> &'static str {
        std::any::type_name::<Self>()
    }
}
