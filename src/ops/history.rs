//! Rewriting version-control history.

use super::Passkeeper;
use crate::constants::{FLUSH_COMMIT_MESSAGE, GITIGNORE_FILE, GITIGNORE_PATTERNS, GIT_DIR};
use crate::errors::AppResult;
use tracing::{debug, info, warn};

impl Passkeeper {
    /// Replaces the repository history with a single commit of the current
    /// encrypted store.
    ///
    /// The existing `.git` directory is securely erased, a fresh repository is
    /// created, the ignore rules are registered again, and `encrypted` plus
    /// `.gitignore` are committed as `Clean git History`. A store that was never
    /// encrypted has no `encrypted` directory, and only `.gitignore` is staged.
    /// Previous revisions of every encrypted file are gone afterwards; this
    /// cannot be undone.
    pub fn flush_history(&self) -> AppResult<()> {
        warn!("Erasing version-control history");

        self.shell.shred_dir(&self.store.directory.join(GIT_DIR))?;
        self.vcs.init()?;
        self.vcs.add_gitignore(GITIGNORE_PATTERNS)?;

        let mut tracked = Vec::new();
        if self.store.encrypted_root().is_dir() {
            tracked.push(self.store.encrypted_dir.clone());
        } else {
            debug!("No encrypted directory, committing ignore rules only");
        }
        tracked.push(GITIGNORE_FILE.to_string());
        self.vcs.add(&tracked)?;
        self.vcs.commit(FLUSH_COMMIT_MESSAGE)?;

        info!("History flushed");
        Ok(())
    }
}
