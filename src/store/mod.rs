//! Store layout and file enumeration.
//!
//! A store is a root directory holding ephemeral plaintext `*.ini` files plus an
//! `encrypted/` subdirectory with their durable `*.ini.passkeeper` counterparts.
//! This module owns the naming rules between the two and lists in-scope files.

use crate::constants::{ENCRYPTED_DIR, ENCRYPTED_SUFFIX, PLAINTEXT_SUFFIX};
use crate::errors::{AppError, AppResult};
use std::fs::{self, Permissions};
use std::io;
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Root directory of a store plus the name of its encrypted subdirectory.
///
/// # Examples
///
/// ```
/// use passkeeper::store::Store;
/// use std::path::PathBuf;
///
/// let store = Store::new("/secrets");
/// assert_eq!(store.encrypted_dir, "encrypted");
/// assert_eq!(
///     store.encrypted_path("bar.ini"),
///     PathBuf::from("/secrets/encrypted/bar.ini.passkeeper")
/// );
/// assert_eq!(store.encrypted_relative("bar.ini"), "encrypted/bar.ini.passkeeper");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Store {
    /// Root directory; plaintext files live directly under it.
    pub directory: PathBuf,
    /// Name of the encrypted subdirectory, always `encrypted`.
    pub encrypted_dir: String,
}

impl Store {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Store {
            directory: directory.into(),
            encrypted_dir: ENCRYPTED_DIR.to_string(),
        }
    }

    /// Absolute path of the encrypted subdirectory.
    pub fn encrypted_root(&self) -> PathBuf {
        self.directory.join(&self.encrypted_dir)
    }

    /// Path of a plaintext file given its name (`bar.ini`).
    pub fn plaintext_path(&self, plaintext_name: &str) -> PathBuf {
        self.directory.join(plaintext_name)
    }

    /// Path of the encrypted counterpart of a plaintext file name.
    pub fn encrypted_path(&self, plaintext_name: &str) -> PathBuf {
        self.encrypted_root()
            .join(encrypted_name_for(plaintext_name))
    }

    /// Store-relative path of the encrypted counterpart, as tracked by version control.
    pub fn encrypted_relative(&self, plaintext_name: &str) -> String {
        format!(
            "{}/{}",
            self.encrypted_dir,
            encrypted_name_for(plaintext_name)
        )
    }

    /// Lists in-scope files of this store through `lister`.
    pub fn enumerator<'a>(&'a self, lister: &'a dyn DirectoryLister) -> FileEnumerator<'a> {
        FileEnumerator {
            store: self,
            lister,
        }
    }
}

/// Returns true if `name` is an in-scope plaintext file name.
pub fn is_plaintext_name(name: &str) -> bool {
    name.ends_with(PLAINTEXT_SUFFIX)
}

/// Returns true if `name` is an in-scope encrypted file name.
pub fn is_encrypted_name(name: &str) -> bool {
    name.strip_suffix(ENCRYPTED_SUFFIX)
        .map_or(false, is_plaintext_name)
}

/// `foo.ini` -> `foo.ini.passkeeper`
pub fn encrypted_name_for(plaintext_name: &str) -> String {
    format!("{}{}", plaintext_name, ENCRYPTED_SUFFIX)
}

/// `foo.ini.passkeeper` -> `foo.ini`; `None` for out-of-scope names.
pub fn plaintext_name_for(encrypted_name: &str) -> Option<&str> {
    encrypted_name
        .strip_suffix(ENCRYPTED_SUFFIX)
        .filter(|name| is_plaintext_name(name))
}

/// Source of directory entry names.
///
/// Listing is kept apart from the per-file type check done at use time, so a
/// listing may name entries that are gone or are not regular files.
pub trait DirectoryLister {
    /// Names of the entries directly inside `dir`, in processing order.
    fn list(&self, dir: &Path) -> AppResult<Vec<String>>;
}

/// [`DirectoryLister`] reading the filesystem, names sorted so batches run in
/// a stable order. Non UTF-8 names are dropped.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReadDirLister;

impl DirectoryLister for ReadDirLister {
    fn list(&self, dir: &Path) -> AppResult<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(dir)? {
            let name = entry?.file_name();
            match name.into_string() {
                Ok(name) => names.push(name),
                Err(name) => debug!("Ignoring non UTF-8 entry {:?}", name),
            }
        }
        names.sort();
        Ok(names)
    }
}

/// Lists candidate plaintext and encrypted files of a [`Store`].
///
/// Filtering is by suffix only and does not look at the entry type: callers
/// check that each entry is still a regular file at the moment they use it,
/// and skip it otherwise.
#[derive(Clone, Copy)]
pub struct FileEnumerator<'a> {
    store: &'a Store,
    lister: &'a dyn DirectoryLister,
}

impl<'a> FileEnumerator<'a> {
    /// Names under the store root ending in `.ini`.
    pub fn plaintext_files(&self) -> AppResult<Vec<String>> {
        self.list_matching(&self.store.directory, is_plaintext_name)
    }

    /// Names under the encrypted directory ending in `.ini.passkeeper`.
    ///
    /// A store that was never encrypted has no encrypted directory; that lists
    /// as empty rather than failing.
    pub fn encrypted_files(&self) -> AppResult<Vec<String>> {
        let root = self.store.encrypted_root();
        if !root.exists() {
            debug!("No encrypted directory yet at {:?}", root);
            return Ok(Vec::new());
        }
        self.list_matching(&root, is_encrypted_name)
    }

    fn list_matching(&self, dir: &Path, in_scope: fn(&str) -> bool) -> AppResult<Vec<String>> {
        let (names, ignored): (Vec<String>, Vec<String>) = self
            .lister
            .list(dir)?
            .into_iter()
            .partition(|name| in_scope(name));
        if !ignored.is_empty() {
            debug!("Ignoring out-of-scope entries {:?}", ignored);
        }
        Ok(names)
    }
}

/// Creates `path` and its parents, restricting the leaf to the owner.
///
/// Succeeds if the directory already exists.
pub fn create_dir(path: &Path) -> AppResult<()> {
    if path.is_dir() {
        return Ok(());
    }

    fs::create_dir_all(path).map_err(|e| {
        AppError::Io(io::Error::new(
            e.kind(),
            format!("Failed to create directory {}: {}", path.display(), e),
        ))
    })?;

    #[cfg(unix)]
    {
        let permissions = Permissions::from_mode(crate::constants::DEFAULT_DIR_PERMISSIONS);
        fs::set_permissions(path, permissions).map_err(|e| {
            AppError::Io(io::Error::new(
                e.kind(),
                format!("Failed to set secure permissions on {}: {}", path.display(), e),
            ))
        })?;
    }

    debug!("Created directory {:?}", path);
    Ok(())
}

/// Writes `content` to a new file at `path` readable only by the owner.
pub fn write_private_file(path: &Path, content: &str) -> AppResult<()> {
    fs::write(path, content)?;

    #[cfg(unix)]
    {
        fs::set_permissions(
            path,
            Permissions::from_mode(crate::constants::DEFAULT_FILE_PERMISSIONS),
        )?;
    }

    Ok(())
}
