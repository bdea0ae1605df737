/*!
# Passkeeper

Passkeeper keeps small secret files (logins, passwords, service configs) in an
encrypted, version-controlled directory and only materializes plaintext while
the operator needs it.

## Core Features

- Initialize a store with ignore rules and a template secret file
- Decrypt the whole store into a plaintext working copy
- Search the working copy by section, key or value
- Re-encrypt edits and commit them in one revision
- Securely erase plaintext and prune encrypted files whose plaintext was deleted
- Flush version-control history

## Architecture

- `cli`: Command-line interface handling using clap
- `config`: Configuration loading and validation
- `errors`: Error handling infrastructure
- `store`: Store layout, naming rules and file enumeration
- `document`: Parsing of sectioned secret files
- `crypto`, `vcs`, `shell`, `prompt`: Adapters for encryption, git, secure deletion and operator input
- `ops`: The lifecycle manager tying the adapters together

## Usage Example

```rust,no_run
use passkeeper::{Config, Passkeeper};

fn main() -> passkeeper::AppResult<()> {
    let config = Config::load()?;
    config.validate()?;

    let keeper = Passkeeper::with_system_adapters(&config);
    keeper.decrypt()?;
    // edit the plaintext files...
    if keeper.encrypt(Some("Rotate github token"))? {
        keeper.cleanup_ini()?;
    }
    Ok(())
}
```
*/

/// Command-line interface for parsing and handling user arguments
pub mod cli;
/// Configuration loading and management
pub mod config;
/// Application-wide constants
pub mod constants;
/// Passphrase encryption of secret files
pub mod crypto;
/// Sectioned secret documents
pub mod document;
/// Error types and utilities for error handling
pub mod errors;
/// Store lifecycle operations
pub mod ops;
/// Operator prompts
pub mod prompt;
/// Shell commands and secure deletion
pub mod shell;
/// Store layout and file enumeration
pub mod store;
/// Version control of the encrypted store
pub mod vcs;

// Re-export important types for convenience
pub use cli::CliArgs;
pub use config::Config;
pub use errors::{AppError, AppResult};
pub use ops::{Passkeeper, SearchResults};
