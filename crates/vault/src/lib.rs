//! Encryption-at-rest for provider credentials using XChaCha20-Poly1305.
//!
//! The sealing key is derived from the configured app secret (SHA-256), so
//! sealed blobs survive restarts without any unlock step. Blobs are base64
//! strings embedded directly in the JSON store.

pub mod error;
pub mod vault;
pub mod xchacha20;

pub use {error::VaultError, vault::Vault};
