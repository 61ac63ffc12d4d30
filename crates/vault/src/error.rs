//! Vault error types.

/// Errors produced by sealing and opening secrets.
#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    /// Encryption or decryption failed (tampered data, wrong key).
    #[error("cipher error: {0}")]
    CipherError(String),

    /// Base64 decoding failed.
    #[error("base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Decrypted bytes were not valid UTF-8.
    #[error("sealed value is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

pub type Result<T> = std::result::Result<T, VaultError>;
