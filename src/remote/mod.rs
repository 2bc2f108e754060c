//! Remotes - typed access to one resource family each.
//!
//! A Remote method builds a [`Request`](crate::network::Request) from typed
//! arguments and hands it to [`Remote::enqueue`] together with a [`Mapper`].
//! `enqueue` is the one shared pipeline:
//!
//! ```text
//!  Network ──bytes──▶ ResponseValidator ──▶ Mapper ──▶ Result<T, RemoteError>
//!     │                     │                  │
//!     └─ NetworkError       └─ ApiError        └─ DecodingError
//! ```
//!
//! Every failure is a value delivered through the completion; nothing is
//! thrown across the Remote boundary.

mod account;
mod error;
mod event;
mod event_category;
mod mapper;
mod remote;

pub use account::{AccountError, AccountRemote, AccountRemoteProtocol};
pub use error::{ApiError, DecodingError, RemoteError};
pub use event::{EventRemote, EventRemoteProtocol};
pub use event_category::{EventCategoryRemote, EventCategoryRemoteProtocol};
pub use mapper::{decode_envelope, EmailExistsMapper, JsonMapper, Mapper};
pub use remote::{Remote, ResponseValidator};

/// Completion for a Remote call.
pub type RemoteCompletion<T> = Box<dyn FnOnce(Result<T, RemoteError>) + Send>;
