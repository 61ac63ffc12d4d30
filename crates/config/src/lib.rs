//! Configuration loading and schema for atelier.
//!
//! Config files: `atelier.toml` or `atelier.json`,
//! searched in `./` then `~/.config/atelier/`.
//!
//! Supports `${ENV_VAR}` substitution in all string values.

pub mod env_subst;
pub mod error;
pub mod loader;
pub mod schema;

pub use {
    error::{Error, Result},
    loader::{
        config_dir, default_data_dir, discover_and_load, find_or_default_config_path, load_config,
        save_config,
    },
    schema::{AtelierConfig, AuthConfig, DEV_SECRET, GitConfig, ServerConfig, StorageConfig},
};
