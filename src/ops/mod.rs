//! Secret-file lifecycle operations.
//!
//! [`Passkeeper`] owns one [`Store`] and decides, for every plaintext/encrypted
//! pair, when it is created, synchronized, searched and destroyed. Collaborators
//! (version control, cipher, shell, prompts) are passed in explicitly so tests
//! can substitute fakes.
//!
//! Every operation runs to completion synchronously. Operations that touch
//! version control record exactly one commit per logical change, never one per
//! file.

pub mod cleanup;
pub mod crypt;
pub mod history;
pub mod init;
pub mod search;

pub use search::{SearchResults, SectionMatch};

use crate::config::Config;
use crate::crypto::{AgeCipher, Cipher};
use crate::prompt::{Prompter, TerminalPrompter};
use crate::shell::{Shell, SystemShell};
use crate::store::{DirectoryLister, FileEnumerator, ReadDirLister, Store};
use crate::vcs::{GitRepository, VersionControl};
use std::fmt;
use std::path::Path;

/// The secret-file lifecycle manager.
///
/// # Example
///
/// ```no_run
/// use passkeeper::{Config, Passkeeper};
///
/// let config = Config::load()?;
/// let keeper = Passkeeper::with_system_adapters(&config);
///
/// keeper.decrypt()?;
/// let results = keeper.search("github")?;
/// for section in results.sections() {
///     println!("{}", section);
/// }
/// keeper.cleanup_ini()?;
/// # Ok::<(), passkeeper::AppError>(())
/// ```
pub struct Passkeeper {
    store: Store,
    vcs: Box<dyn VersionControl>,
    cipher: Box<dyn Cipher>,
    shell: Box<dyn Shell>,
    prompter: Box<dyn Prompter>,
    lister: Box<dyn DirectoryLister>,
}

impl Passkeeper {
    /// Creates a manager for the store rooted at `directory`.
    pub fn new(
        directory: impl AsRef<Path>,
        vcs: Box<dyn VersionControl>,
        cipher: Box<dyn Cipher>,
        shell: Box<dyn Shell>,
        prompter: Box<dyn Prompter>,
    ) -> Self {
        Passkeeper {
            store: Store::new(directory.as_ref()),
            vcs,
            cipher,
            shell,
            prompter,
            lister: Box::new(ReadDirLister),
        }
    }

    /// Replaces how directory entries are listed (sorted `read_dir` by default).
    pub fn with_lister(mut self, lister: Box<dyn DirectoryLister>) -> Self {
        self.lister = lister;
        self
    }

    /// Wires the production adapters: git, age, `sh`, and the terminal.
    pub fn with_system_adapters(config: &Config) -> Self {
        Self::new(
            &config.directory,
            Box::new(GitRepository::new(&config.directory)),
            Box::new(AgeCipher),
            Box::new(SystemShell),
            Box::new(TerminalPrompter),
        )
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Root directory of the managed store.
    pub fn directory(&self) -> &Path {
        &self.store.directory
    }

    fn files(&self) -> FileEnumerator<'_> {
        self.store.enumerator(self.lister.as_ref())
    }
}

impl fmt::Debug for Passkeeper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Passkeeper")
            .field("directory", &"[REDACTED_PATH]")
            .field("encrypted_dir", &self.store.encrypted_dir)
            .finish_non_exhaustive()
    }
}
