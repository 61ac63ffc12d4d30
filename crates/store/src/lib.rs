//! Persistence for atelier: users, sessions, settings and projects in a
//! single JSON file under the data directory.

pub mod error;
pub mod store;
pub mod types;

pub use {
    error::{Error, Result},
    store::{JsonStore, STORE_FILENAME},
    types::{ProviderSettings, SessionRecord, UserRecord, UserSettings},
};
