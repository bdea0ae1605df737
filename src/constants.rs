//! Constants used throughout the application.
//!
//! This module contains all constants used in the passkeeper application, organized
//! into logical groups. Having constants centralized makes them easier to find,
//! modify, and reference consistently.

// Application Metadata
/// The name of the application.
pub const APP_NAME: &str = "passkeeper";
/// The description of the application used in CLI help text.
pub const APP_DESCRIPTION: &str =
    "Keep login and config secrets encrypted and versioned, decrypted only while you need them";

// CLI Arguments & Defaults
/// Log format identifier for plain text.
pub const LOG_FORMAT_TEXT: &str = "text";
/// Log format identifier for JSON.
pub const LOG_FORMAT_JSON: &str = "json";
/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// Configuration Keys & Environment Variables
/// Environment variable for specifying the store directory.
pub const ENV_VAR_PASSKEEPER_DIR: &str = "PASSKEEPER_DIR";
/// Environment variable holding a passphrase for non-interactive runs (tests, CI).
pub const ENV_VAR_TEST_PASSPHRASE: &str = "PASSKEEPER_TEST_PASSPHRASE";
/// Standard environment variable for the user's home directory.
pub const ENV_VAR_HOME: &str = "HOME";
/// Default store directory name within the user's home directory.
pub const DEFAULT_STORE_SUBDIR: &str = ".passkeeper";

// Store Layout
/// Name of the encrypted subdirectory under the store root.
pub const ENCRYPTED_DIR: &str = "encrypted";
/// Suffix of plaintext secret files.
pub const PLAINTEXT_SUFFIX: &str = ".ini";
/// Suffix appended to a plaintext file name to form its encrypted name.
pub const ENCRYPTED_SUFFIX: &str = ".passkeeper";
/// Name of the key-material directory seeded at init.
pub const DEFAULT_RAW_DIR: &str = "default.raw";
/// Name of the template secret file seeded at init.
pub const DEFAULT_INI_FILE: &str = "default.ini";
/// Name of the placeholder key file seeded inside the key-material directory.
pub const DEFAULT_RAW_KEY_FILE: &str = "ssh_id.rsa";
/// Ignore rules keeping plaintext out of version control.
pub const GITIGNORE_PATTERNS: &[&str] = &["*.ini", "/*.raw"];
/// Name of the ignore-rule file.
pub const GITIGNORE_FILE: &str = ".gitignore";
/// Name of the version-control history directory.
pub const GIT_DIR: &str = ".git";
/// Default POSIX permissions for newly created directories (owner read/write/execute).
#[cfg(unix)]
pub const DEFAULT_DIR_PERMISSIONS: u32 = 0o700;
/// Default POSIX permissions for newly created files (owner read/write).
#[cfg(unix)]
pub const DEFAULT_FILE_PERMISSIONS: u32 = 0o600;

// Commit Messages
/// Commit message used by encrypt when the caller supplies none.
pub const DEFAULT_COMMIT_MESSAGE: &str = "Update encrypted files";
/// Commit message used after a history flush.
pub const FLUSH_COMMIT_MESSAGE: &str = "Clean git History";

// Shell
/// Command prefix for securely erasing a single file.
pub const SHRED_COMMAND: &str = "shred --remove";
/// Command prefix for erasing files that may be read-only, such as git objects.
pub const SHRED_FORCE_COMMAND: &str = "shred --force --remove";

// Prompts
/// Prompt shown for the passphrase.
pub const PASSPHRASE_PROMPT: &str = "Passphrase: ";
/// Prompt shown for the passphrase confirmation.
pub const PASSPHRASE_CONFIRM_PROMPT: &str = "Confirm passphrase: ";

// Templates
/// Content of the template secret file written at init.
pub const DEFAULT_INI_TEMPLATE: &str = "[foo]
name = foo access
type = web
url = http://foo.net
login = foo
password = bar
comments = foo is good website
";
/// Content of the placeholder key file written at init.
pub const DEFAULT_RAW_KEY_TEMPLATE: &str = "Put your raw key material (ssh keys, certificates) in this directory.\n";

// Logging Configuration
/// Service name used in tracing spans and structured logs.
pub const TRACING_SERVICE_NAME: &str = "passkeeper";
/// Name for the root tracing span covering an application invocation.
pub const TRACING_ROOT_SPAN_NAME: &str = "app_invocation";
