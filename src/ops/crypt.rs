//! Encrypting plaintext edits into the store and materializing plaintext from it.

use super::Passkeeper;
use crate::constants::{DEFAULT_COMMIT_MESSAGE, PASSPHRASE_CONFIRM_PROMPT, PASSPHRASE_PROMPT};
use crate::errors::AppResult;
use crate::store::{create_dir, plaintext_name_for};
use age::secrecy::ExposeSecret;
use tracing::{debug, info, warn};

impl Passkeeper {
    /// Decrypts every encrypted file into its plaintext path under the root.
    ///
    /// The passphrase is asked once. Listed entries that are no longer regular
    /// files are skipped. Version control is not touched.
    ///
    /// # Errors
    ///
    /// A wrong passphrase or corrupt ciphertext fails the operation at the
    /// first affected file; files decrypted before it stay on disk.
    pub fn decrypt(&self) -> AppResult<()> {
        let passphrase = self.prompter.passphrase(PASSPHRASE_PROMPT)?;

        let mut decrypted = 0usize;
        for name in self.files().encrypted_files()? {
            let source = self.store.encrypted_root().join(&name);
            if !source.is_file() {
                debug!("Skipping {:?}: not a regular file", name);
                continue;
            }
            let Some(plaintext_name) = plaintext_name_for(&name) else {
                continue;
            };
            let output = self.store.plaintext_path(plaintext_name);

            self.cipher.decrypt(&passphrase, &source, &output)?;
            debug!("Decrypted {:?}", name);
            decrypted += 1;
        }

        info!("Decrypted {} files", decrypted);
        Ok(())
    }

    /// Encrypts every plaintext file and commits the result once.
    ///
    /// The passphrase is asked twice. If the entries differ nothing is written
    /// and `Ok(false)` is returned. Otherwise each live `*.ini` under the root is
    /// encrypted to `encrypted/<name>.passkeeper`, the produced paths are staged
    /// and a single commit is made with `commit_message`, or
    /// `"Update encrypted files"` when `None`.
    ///
    /// # Errors
    ///
    /// Cipher, filesystem and version-control failures propagate; files already
    /// encrypted at that point are left in place uncommitted.
    pub fn encrypt(&self, commit_message: Option<&str>) -> AppResult<bool> {
        let passphrase = self.prompter.passphrase(PASSPHRASE_PROMPT)?;
        let confirmation = self.prompter.passphrase(PASSPHRASE_CONFIRM_PROMPT)?;

        if passphrase.expose_secret() != confirmation.expose_secret() {
            warn!("Passphrase confirmation does not match, aborting encryption");
            return Ok(false);
        }
        drop(confirmation);

        create_dir(&self.store.encrypted_root())?;

        let mut staged = Vec::new();
        for name in self.files().plaintext_files()? {
            let source = self.store.plaintext_path(&name);
            if !source.is_file() {
                debug!("Skipping {:?}: not a regular file", name);
                continue;
            }
            let output = self.store.encrypted_path(&name);

            self.cipher.encrypt(&passphrase, &source, &output)?;
            debug!("Encrypted {:?}", name);
            staged.push(self.store.encrypted_relative(&name));
        }

        self.vcs.add(&staged)?;
        self.vcs
            .commit(commit_message.unwrap_or(DEFAULT_COMMIT_MESSAGE))?;

        info!("Encrypted {} files", staged.len());
        Ok(true)
    }
}
