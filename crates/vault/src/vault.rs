//! Secret vault: seals provider credentials before they hit disk.

use {
    base64::Engine,
    secrecy::{ExposeSecret, Secret},
    sha2::{Digest, Sha256},
};

use crate::{error::VaultError, xchacha20};

/// Encryption-at-rest vault keyed from the application secret.
///
/// The sealing key is the SHA-256 digest of the configured app secret, so the
/// same secret opens blobs across restarts. Sealed values are opaque base64
/// strings safe to embed in the JSON store.
pub struct Vault {
    key: [u8; 32],
}

impl Vault {
    /// Create a vault from the application secret.
    pub fn new(app_secret: &Secret<String>) -> Self {
        let digest = Sha256::digest(app_secret.expose_secret().as_bytes());
        let mut key = [0u8; 32];
        key.copy_from_slice(&digest);
        Self { key }
    }

    /// Encrypt a plaintext string into an opaque base64 blob.
    pub fn encrypt_string(&self, plaintext: &str) -> Result<String, VaultError> {
        let blob = xchacha20::encrypt(&self.key, plaintext.as_bytes())?;
        Ok(base64::engine::general_purpose::STANDARD.encode(blob))
    }

    /// Decrypt a base64 blob produced by [`encrypt_string`](Self::encrypt_string).
    pub fn decrypt_string(&self, b64: &str) -> Result<String, VaultError> {
        let blob = base64::engine::general_purpose::STANDARD.decode(b64)?;
        let plaintext = xchacha20::decrypt(&self.key, &blob)?;
        Ok(String::from_utf8(plaintext)?)
    }
}
