//! Error handling utilities for the passkeeper application.
//!
//! This module provides the central error type `AppError` which represents all
//! possible error conditions that might occur in the application, as well as the
//! convenience type alias `AppResult` for functions that can return these errors.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Represents specific error cases that can occur when running shell commands.
///
/// Secure deletion goes through the shell, so every failure mode of spawning or
/// running a command is captured here together with the command line.
///
/// # Examples
///
/// ```
/// use passkeeper::errors::ShellError;
///
/// let error = ShellError::NonZeroExit {
///     command: "shred --remove /tmp/store/foo.ini".to_string(),
///     status_code: 1,
/// };
///
/// assert!(format!("{}", error).contains("non-zero status code"));
/// assert!(format!("{}", error).contains("shred"));
/// ```
#[derive(Debug, Error)]
pub enum ShellError {
    /// Error when the shell interpreter cannot be found.
    #[error("Shell command '{command}' could not be started: {source}. Please check that a POSIX shell is available in your PATH.")]
    CommandNotFound {
        /// The command line that could not be started
        command: String,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Error when permission is denied to execute the command.
    #[error("Permission denied when trying to run '{command}': {source}")]
    PermissionDenied {
        /// The command line that had permission denied
        command: String,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Error when the command fails to execute due to other I/O errors.
    #[error("Failed to execute '{command}': {source}")]
    ExecutionFailed {
        /// The command line that failed to execute
        command: String,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Error when the command exits with a non-zero status code.
    #[error("Command '{command}' exited with non-zero status code: {status_code}")]
    NonZeroExit {
        /// The command line that exited with a non-zero status
        command: String,
        /// The exit status code
        status_code: i32,
    },
}

/// Represents errors reported by the version-control adapter.
///
/// # Examples
///
/// ```
/// use passkeeper::errors::VcsError;
///
/// let error = VcsError::CommandFailed {
///     args: "commit -m test".to_string(),
///     status_code: 128,
///     stderr: "fatal: not a git repository".to_string(),
/// };
/// assert!(format!("{}", error).contains("git commit -m test"));
/// assert!(format!("{}", error).contains("not a git repository"));
/// ```
#[derive(Debug, Error)]
pub enum VcsError {
    /// The `git` binary could not be spawned.
    #[error("Failed to run git: {0}. Is git installed and in your PATH?")]
    Spawn(#[source] io::Error),

    /// A git command ran but reported failure.
    #[error("git {args} failed with status {status_code}: {stderr}")]
    CommandFailed {
        /// Arguments passed to git
        args: String,
        /// The exit status code
        status_code: i32,
        /// Captured standard error, trimmed
        stderr: String,
    },
}

/// Represents specific error cases that can occur during cryptographic operations.
///
/// # Examples
///
/// ```
/// use passkeeper::errors::CryptoError;
///
/// let error = CryptoError::EmptyPassphrase;
/// assert!(format!("{}", error).contains("empty"));
/// ```
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Incorrect passphrase provided for decryption.
    #[error("Incorrect passphrase for {path}. Please try again with the passphrase used to encrypt your store.")]
    InvalidPassphrase {
        /// The encrypted file that could not be opened
        path: PathBuf,
        /// The underlying age error
        #[source]
        source: age::DecryptError,
    },

    /// Encrypted data uses unsupported encryption format.
    #[error("Unsupported encryption format in {0}: expected a passphrase-encrypted file")]
    UnsupportedFormat(PathBuf),

    /// Error during encryption operation.
    #[error("Encryption of {path} failed: {source}")]
    EncryptionFailed {
        /// The source file being encrypted
        path: PathBuf,
        /// The underlying I/O error from the age stream
        #[source]
        source: io::Error,
    },

    /// Error during decryption operation.
    #[error("Decryption of {path} failed: {source}")]
    DecryptionFailed {
        /// The encrypted file being decrypted
        path: PathBuf,
        /// The underlying age error
        #[source]
        source: age::DecryptError,
    },

    /// Reading the passphrase from the terminal failed.
    #[error("Failed to read passphrase: {0}")]
    PassphrasePrompt(String),

    /// An empty passphrase was entered.
    #[error("Passphrase cannot be empty")]
    EmptyPassphrase,
}

/// Errors raised while parsing a sectioned key/value secret document.
///
/// # Examples
///
/// ```
/// use passkeeper::errors::DocumentError;
///
/// let error = DocumentError::MissingSectionHeader {
///     file: "bar.ini".to_string(),
///     line: 1,
/// };
/// assert!(format!("{}", error).contains("bar.ini:1"));
/// ```
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DocumentError {
    /// An option line appeared before any `[section]` header.
    #[error("{file}:{line}: option found before any [section] header")]
    MissingSectionHeader {
        /// Name of the file being parsed
        file: String,
        /// One-based line number
        line: usize,
    },

    /// A section header is not closed or has an empty name.
    #[error("{file}:{line}: malformed section header")]
    MalformedSection {
        /// Name of the file being parsed
        file: String,
        /// One-based line number
        line: usize,
    },
}

/// Errors from the store lifecycle itself (as opposed to its adapters).
#[derive(Debug, Error)]
pub enum StoreError {
    /// The passphrase confirmation differed from the first entry.
    #[error("Passphrases do not match, nothing was encrypted")]
    PassphraseMismatch,

    /// `init` was run on a directory that already holds an encrypted store.
    #[error("{0} already contains an encrypted store")]
    AlreadyInitialized(PathBuf),
}

/// Represents all possible errors that can occur in the passkeeper application.
///
/// This enum is the central error type used across the application, with variants
/// for different error categories. It uses `thiserror` for deriving the `Error` trait
/// implementation and formatted error messages.
///
/// # Examples
///
/// Creating a configuration error:
/// ```
/// use passkeeper::errors::AppError;
///
/// let error = AppError::Config("Missing store directory".to_string());
/// assert_eq!(format!("{}", error), "Configuration error: Missing store directory");
/// ```
///
/// Converting from an IO error:
/// ```
/// use passkeeper::errors::AppError;
/// use std::io::{self, ErrorKind};
///
/// let io_error = io::Error::new(ErrorKind::NotFound, "file not found");
/// let app_error: AppError = io_error.into();
///
/// match app_error {
///     AppError::Io(inner) => assert_eq!(inner.kind(), ErrorKind::NotFound),
///     _ => panic!("Expected Io variant"),
/// }
/// ```
#[derive(Debug, Error)]
pub enum AppError {
    /// Errors related to configuration loading or validation.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input/output errors from filesystem operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Errors related to cryptographic operations.
    #[error("Cryptographic error: {0}")]
    Crypto(#[from] CryptoError),

    /// Errors from shell commands (secure deletion).
    #[error("Shell error: {0}")]
    Shell(#[from] ShellError),

    /// Errors from the version-control adapter.
    #[error("Version control error: {0}")]
    Vcs(#[from] VcsError),

    /// Errors parsing a secret document.
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    /// Errors from the store lifecycle.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// A type alias for `Result<T, AppError>` to simplify function signatures.
///
/// # Examples
///
/// ```
/// use passkeeper::errors::{AppResult, AppError};
///
/// fn might_fail() -> AppResult<String> {
///     if false {
///         return Err(AppError::Config("Something went wrong".to_string()));
///     }
///     Ok("Operation succeeded".to_string())
/// }
/// ```
pub type AppResult<T> = Result<T, AppError>;
