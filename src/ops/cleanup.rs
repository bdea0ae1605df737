//! Retiring plaintext and reconciling stale ciphertext.

use super::Passkeeper;
use crate::errors::AppResult;
use crate::shell::shred_command;
use crate::store::plaintext_name_for;
use std::collections::HashSet;
use tracing::{debug, info};

impl Passkeeper {
    /// Securely erases every plaintext file, then offers to delete encrypted
    /// files whose plaintext was not part of the working copy.
    ///
    /// Which plaintext files were live is recorded before erasing, so an
    /// encrypted file counts as stale only when its `.ini` was missing from the
    /// working copy being retired (the operator deleted it after decrypting).
    /// With no live plaintext at all there is no working copy, and the
    /// reconciliation step is skipped.
    pub fn cleanup_ini(&self) -> AppResult<()> {
        let mut live = HashSet::new();

        for name in self.files().plaintext_files()? {
            let path = self.store.plaintext_path(&name);
            if !path.is_file() {
                debug!("Skipping {:?}: not a regular file", name);
                continue;
            }
            self.shell.run_cmd(&shred_command(&path))?;
            debug!("Shredded {:?}", name);
            live.insert(name);
        }

        info!("Shredded {} plaintext files", live.len());

        if live.is_empty() {
            debug!("No working copy was present, skipping stale file reconciliation");
            return Ok(());
        }

        self.reconcile(|plaintext_name| live.contains(plaintext_name))
    }

    /// Offers to delete encrypted files whose plaintext counterpart is not on
    /// disk right now.
    ///
    /// The operator is asked once per candidate, in listing order. A confirmed
    /// file is shredded, untracked, and committed as
    /// `Remove file encrypted/<name>`. A refused file is left alone.
    pub fn remove_old_encrypted_files(&self) -> AppResult<()> {
        self.reconcile(|plaintext_name| self.store.plaintext_path(plaintext_name).is_file())
    }

    fn reconcile(&self, is_live: impl Fn(&str) -> bool) -> AppResult<()> {
        let mut removed = 0usize;

        for name in self.files().encrypted_files()? {
            let Some(plaintext_name) = plaintext_name_for(&name) else {
                continue;
            };
            if is_live(plaintext_name) {
                continue;
            }

            let relative = format!("{}/{}", self.store.encrypted_dir, name);
            let question = format!(
                "{} has no matching {}. Delete it?",
                relative, plaintext_name
            );
            if !self.prompter.confirm(&question)? {
                info!("Keeping {:?}", relative);
                continue;
            }

            let path = self.store.encrypted_root().join(&name);
            self.shell.run_cmd(&shred_command(&path))?;
            self.vcs.soft_remove(&[relative.clone()])?;
            self.vcs.commit(&format!("Remove file {}", relative))?;
            info!("Removed {:?}", relative);
            removed += 1;
        }

        debug!("Stale file reconciliation removed {} files", removed);
        Ok(())
    }
}
