//! Settings - small app-wide preferences kept in a JSON file.
//!
//! Settings are not entities: they live in one JSON object that is read and
//! written whole. Every field has a default, so files written by older builds
//! keep decoding after new fields are added.
//!
//! ```text
//!   AppSettingsStore ──▶ GeneralAppSettingsStorage ──▶ settings.json
//! ```

mod general;
mod storage;

pub use general::GeneralAppSettings;
pub use storage::{GeneralAppSettingsStorage, SettingsError};
