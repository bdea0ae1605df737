//! Age encryption implementation for secret files.
//!
//! This module provides passphrase-based encryption using the age crate,
//! supporting both in-memory and streaming file encryption/decryption.

use crate::errors::{AppError, AppResult, CryptoError};
use age::secrecy::SecretString;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Encrypt data using age with passphrase.
///
/// # Example
///
/// ```
/// use passkeeper::crypto::encrypt_with_passphrase;
/// use age::secrecy::SecretString;
///
/// let passphrase = SecretString::new("my-secret-passphrase".to_string());
/// let plaintext = b"Secret data";
/// let encrypted = encrypt_with_passphrase(plaintext, &passphrase)?;
/// assert_ne!(encrypted.as_slice(), plaintext);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn encrypt_with_passphrase(plaintext: &[u8], passphrase: &SecretString) -> AppResult<Vec<u8>> {
    let mut encrypted = Vec::new();
    encrypt_stream(plaintext, &mut encrypted, passphrase).map_err(|source| {
        CryptoError::EncryptionFailed {
            path: "<memory>".into(),
            source,
        }
    })?;
    Ok(encrypted)
}

/// Decrypt age-encrypted data with passphrase.
///
/// # Example
///
/// ```
/// use passkeeper::crypto::{encrypt_with_passphrase, decrypt_with_passphrase};
/// use age::secrecy::SecretString;
///
/// let passphrase = SecretString::new("my-secret-passphrase".to_string());
/// let plaintext = b"Secret data";
/// let encrypted = encrypt_with_passphrase(plaintext, &passphrase)?;
/// let decrypted = decrypt_with_passphrase(&encrypted, &passphrase)?;
/// assert_eq!(plaintext, decrypted.as_slice());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn decrypt_with_passphrase(ciphertext: &[u8], passphrase: &SecretString) -> AppResult<Vec<u8>> {
    let mut decrypted = Vec::new();
    decrypt_stream(ciphertext, &mut decrypted, passphrase, Path::new("<memory>"))?;
    Ok(decrypted)
}

/// Streaming encryption of a file.
///
/// Encrypts `input_path` into `output_path`. The ciphertext is written to a
/// sibling temporary file and moved over `output_path` only once complete, so
/// a failure leaves any previous ciphertext intact. The output is
/// owner-readable only.
///
/// # Example
///
/// ```no_run
/// use passkeeper::crypto::encrypt_file_streaming;
/// use age::secrecy::SecretString;
/// use std::path::Path;
///
/// let passphrase = SecretString::new("my-secret-passphrase".to_string());
/// let input = Path::new("bar.ini");
/// let output = Path::new("encrypted/bar.ini.passkeeper");
/// encrypt_file_streaming(input, output, &passphrase)?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn encrypt_file_streaming(
    input_path: &Path,
    output_path: &Path,
    passphrase: &SecretString,
) -> AppResult<()> {
    let input = BufReader::new(File::open(input_path)?);
    let mut staging = sibling_temp_file(output_path)?;

    {
        let mut output = BufWriter::new(staging.as_file_mut());
        encrypt_stream(input, &mut output, passphrase)
            .and_then(|_| output.flush())
            .map_err(|source| CryptoError::EncryptionFailed {
                path: input_path.to_path_buf(),
                source,
            })?;
    }

    persist(staging, output_path)
}

/// Streaming decryption of a file.
///
/// Decrypts `input_path` into `output_path`. Plaintext goes to a sibling
/// temporary file that replaces `output_path` only after decryption
/// succeeded; on a wrong passphrase or corrupt input an existing
/// `output_path` is left untouched.
///
/// # Example
///
/// ```no_run
/// use passkeeper::crypto::decrypt_file_streaming;
/// use age::secrecy::SecretString;
/// use std::path::Path;
///
/// let passphrase = SecretString::new("my-secret-passphrase".to_string());
/// let input = Path::new("encrypted/bar.ini.passkeeper");
/// let output = Path::new("bar.ini");
/// decrypt_file_streaming(input, output, &passphrase)?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn decrypt_file_streaming(
    input_path: &Path,
    output_path: &Path,
    passphrase: &SecretString,
) -> AppResult<()> {
    let input = BufReader::new(File::open(input_path)?);
    let mut staging = sibling_temp_file(output_path)?;

    {
        let mut output = BufWriter::new(staging.as_file_mut());
        decrypt_stream(input, &mut output, passphrase, input_path)?;
        output.flush()?;
    }

    persist(staging, output_path)
}

/// Temporary file next to `path`, so the final rename stays on one filesystem.
/// `tempfile` creates it owner-readable only.
fn sibling_temp_file(path: &Path) -> io::Result<NamedTempFile> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    NamedTempFile::new_in(dir)
}

fn persist(staging: NamedTempFile, output_path: &Path) -> AppResult<()> {
    staging.as_file().sync_all()?;
    staging
        .persist(output_path)
        .map_err(|e| AppError::Io(e.error))?;
    Ok(())
}

fn encrypt_stream<R: Read, W: Write>(
    mut input: R,
    output: W,
    passphrase: &SecretString,
) -> io::Result<()> {
    let encryptor = age::Encryptor::with_user_passphrase(passphrase.clone());
    let mut writer = encryptor
        .wrap_output(output)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    io::copy(&mut input, &mut writer)?;
    writer.finish()?;
    Ok(())
}

fn decrypt_stream<R: Read, W: Write>(
    input: R,
    mut output: W,
    passphrase: &SecretString,
    path: &Path,
) -> AppResult<()> {
    let decryptor = match age::Decryptor::new(input).map_err(|source| {
        CryptoError::DecryptionFailed {
            path: path.to_path_buf(),
            source,
        }
    })? {
        age::Decryptor::Passphrase(d) => d,
        _ => return Err(CryptoError::UnsupportedFormat(path.to_path_buf()).into()),
    };

    let mut reader = decryptor.decrypt(passphrase, None).map_err(|source| match source {
        age::DecryptError::DecryptionFailed | age::DecryptError::NoMatchingKeys => {
            CryptoError::InvalidPassphrase {
                path: path.to_path_buf(),
                source,
            }
        }
        source => CryptoError::DecryptionFailed {
            path: path.to_path_buf(),
            source,
        },
    })?;

    io::copy(&mut reader, &mut output)?;
    Ok(())
}
