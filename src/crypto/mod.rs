//! Cryptographic operations for secret files.
//!
//! This module provides the [`Cipher`] seam used by the store lifecycle to turn
//! one plaintext file into one encrypted file and back, and its production
//! implementation [`AgeCipher`] built on age passphrase encryption.
//!
//! # Module Structure
//!
//! - `age`: Core encryption/decryption functions using the age crate
//!
//! # Example
//!
//! ```
//! use passkeeper::crypto::{encrypt_with_passphrase, decrypt_with_passphrase};
//! use age::secrecy::SecretString;
//!
//! let passphrase = SecretString::new("correct horse".to_string());
//! let plaintext = b"[github]\npassword = hunter2\n";
//! let encrypted = encrypt_with_passphrase(plaintext, &passphrase)?;
//! let decrypted = decrypt_with_passphrase(&encrypted, &passphrase)?;
//! assert_eq!(plaintext, decrypted.as_slice());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod age;

use crate::errors::AppResult;
use ::age::secrecy::SecretString;
use std::path::Path;

// Re-export commonly used functions
pub use self::age::{
    decrypt_file_streaming, decrypt_with_passphrase, encrypt_file_streaming,
    encrypt_with_passphrase,
};

/// Passphrase-based encryption of a single file.
///
/// Implementations must fail loudly on a wrong passphrase or corrupt input;
/// the caller propagates the error as-is.
pub trait Cipher {
    /// Encrypts `source` into `output`, overwriting it.
    fn encrypt(&self, passphrase: &SecretString, source: &Path, output: &Path) -> AppResult<()>;

    /// Decrypts `source` into `output`, overwriting it.
    fn decrypt(&self, passphrase: &SecretString, source: &Path, output: &Path) -> AppResult<()>;
}

/// [`Cipher`] backed by age's scrypt passphrase recipient.
#[derive(Debug, Default, Clone, Copy)]
pub struct AgeCipher;

impl Cipher for AgeCipher {
    fn encrypt(&self, passphrase: &SecretString, source: &Path, output: &Path) -> AppResult<()> {
        encrypt_file_streaming(source, output, passphrase)
    }

    fn decrypt(&self, passphrase: &SecretString, source: &Path, output: &Path) -> AppResult<()> {
        decrypt_file_streaming(source, output, passphrase)
    }
}
