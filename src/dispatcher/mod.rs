//! Dispatcher - routes actions to the processors registered for their kind.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐  dispatch(AccountAction)  ┌────────────┐
//! │    UI    │ ────────────────────────▶ │ Dispatcher │
//! └──────────┘                           └────────────┘
//!                                              │ TypeId(AccountAction)
//!                        ┌─────────────────────┼─────────────────────┐
//!                        ▼                     ▼                     ▼
//!                 ┌──────────────┐     ┌──────────────┐      (weak refs,
//!                 │ AccountStore │     │ AuditStore   │       pruned when
//!                 └──────────────┘     └──────────────┘       dropped)
//! ```
//!
//! The dispatcher is an ordinary value: construct one per process (or per
//! test) and hand clones of it to every Store.

mod dispatcher;
mod processor;

pub use dispatcher::Dispatcher;
pub use processor::Processor;
