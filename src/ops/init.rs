//! Creating a new store.

use super::Passkeeper;
use crate::constants::{
    DEFAULT_INI_FILE, DEFAULT_INI_TEMPLATE, DEFAULT_RAW_DIR, DEFAULT_RAW_KEY_FILE,
    DEFAULT_RAW_KEY_TEMPLATE, GITIGNORE_PATTERNS,
};
use crate::errors::{AppResult, StoreError};
use crate::store::{create_dir, write_private_file};
use tracing::info;

impl Passkeeper {
    /// Creates the store layout, seeds it with example files, and commits the
    /// encrypted seed.
    ///
    /// Steps, in order: create the root and `default.raw/`, initialize version
    /// control, register the ignore rules, write `default.ini` and the
    /// placeholder key, encrypt with the default message, then clean up the
    /// plaintext.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::AlreadyInitialized` if the encrypted directory
    /// already exists, and `StoreError::PassphraseMismatch` if the passphrase
    /// confirmation fails. In the latter case the seeded plaintext is left in
    /// place.
    pub fn init_dir(&self) -> AppResult<()> {
        let encrypted_root = self.store.encrypted_root();
        if encrypted_root.exists() {
            return Err(StoreError::AlreadyInitialized(encrypted_root).into());
        }

        let root = &self.store.directory;
        let raw_dir = root.join(DEFAULT_RAW_DIR);
        create_dir(root)?;
        create_dir(&raw_dir)?;

        self.vcs.init()?;
        self.vcs.add_gitignore(GITIGNORE_PATTERNS)?;

        write_private_file(&root.join(DEFAULT_INI_FILE), DEFAULT_INI_TEMPLATE)?;
        write_private_file(&raw_dir.join(DEFAULT_RAW_KEY_FILE), DEFAULT_RAW_KEY_TEMPLATE)?;

        if !self.encrypt(None)? {
            return Err(StoreError::PassphraseMismatch.into());
        }
        self.cleanup_ini()?;

        info!("Initialized store");
        Ok(())
    }
}
