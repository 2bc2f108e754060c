//! Models - read-only values from the wire and their storage entities.
//!
//! Each resource family has a read-only model (decoded from JSON, equality is
//! structural) and a storage entity (persisted, mutated in place). Absent wire
//! fields decode to the default documented on the field; the storage entity
//! documents which fields it does not track.

mod account;
mod event;
mod event_category;

pub use account::{Account, SignupForm, StorageAccount};
pub use event::{MateEvent, NewEvent, StorageEvent};
pub use event_category::{EventCategory, StorageEventCategory};
