//! Shell abstraction for secure deletion.
//!
//! Plaintext secrets and retired ciphertext are erased with `shred` rather than
//! unlinked, so the store talks to the shell through the [`Shell`] trait. Tests
//! substitute a recorder; production uses [`SystemShell`].

use crate::constants::{SHRED_COMMAND, SHRED_FORCE_COMMAND};
use crate::errors::{AppError, AppResult, ShellError};
use std::fs;
use std::io;
use std::path::Path;
use std::process::Command;
use tracing::{debug, info};
use walkdir::WalkDir;

/// Trait defining the interface for running shell commands.
///
/// # Examples
///
/// ```
/// use passkeeper::shell::Shell;
/// use passkeeper::errors::AppResult;
/// use std::path::Path;
///
/// struct DryRun;
///
/// impl Shell for DryRun {
///     fn run_cmd(&self, command: &str) -> AppResult<()> {
///         println!("would run: {}", command);
///         Ok(())
///     }
///
///     fn shred_dir(&self, path: &Path) -> AppResult<()> {
///         println!("would wipe: {}", path.display());
///         Ok(())
///     }
/// }
///
/// DryRun.run_cmd("shred --remove /tmp/store/foo.ini").unwrap();
/// ```
pub trait Shell {
    /// Runs `command` through the shell, failing on non-zero exit.
    fn run_cmd(&self, command: &str) -> AppResult<()>;

    /// Securely wipes every file under `path`, then removes the tree.
    fn shred_dir(&self, path: &Path) -> AppResult<()>;
}

/// Builds the command line that securely erases one file.
///
/// Paths made only of shell-safe characters are passed as-is; anything else is
/// single-quoted.
///
/// ```
/// use passkeeper::shell::shred_command;
/// use std::path::Path;
///
/// assert_eq!(
///     shred_command(Path::new("foo/encrypted/bli.ini.passkeeper")),
///     "shred --remove foo/encrypted/bli.ini.passkeeper"
/// );
/// assert_eq!(
///     shred_command(Path::new("my store/bar.ini")),
///     "shred --remove 'my store/bar.ini'"
/// );
/// ```
pub fn shred_command(path: &Path) -> String {
    format!("{} {}", SHRED_COMMAND, quote(&path.to_string_lossy()))
}

/// Like [`shred_command`], but also erases read-only files.
///
/// ```
/// use passkeeper::shell::force_shred_command;
/// use std::path::Path;
///
/// assert_eq!(
///     force_shred_command(Path::new(".git/objects/ab/cdef")),
///     "shred --force --remove .git/objects/ab/cdef"
/// );
/// ```
pub fn force_shred_command(path: &Path) -> String {
    format!("{} {}", SHRED_FORCE_COMMAND, quote(&path.to_string_lossy()))
}

fn quote(arg: &str) -> String {
    let safe = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "/._-+=:@,%".contains(c));
    if safe {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}

/// [`Shell`] implementation running commands with `sh -c`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemShell;

impl Shell for SystemShell {
    fn run_cmd(&self, command: &str) -> AppResult<()> {
        debug!("Running shell command: {}", command);

        match Command::new("sh").arg("-c").arg(command).status() {
            Ok(status) if status.success() => Ok(()),
            Ok(status) => Err(ShellError::NonZeroExit {
                command: command.to_string(),
                status_code: status.code().unwrap_or(-1),
            }
            .into()),
            Err(e) => {
                let command = command.to_string();
                let specific_error = match e.kind() {
                    io::ErrorKind::NotFound => ShellError::CommandNotFound { command, source: e },
                    io::ErrorKind::PermissionDenied => {
                        ShellError::PermissionDenied { command, source: e }
                    }
                    _ => ShellError::ExecutionFailed { command, source: e },
                };
                Err(specific_error.into())
            }
        }
    }

    fn shred_dir(&self, path: &Path) -> AppResult<()> {
        if !path.exists() {
            debug!("Nothing to wipe at {:?}", path);
            return Ok(());
        }

        let mut wiped = 0usize;
        for entry in WalkDir::new(path).follow_links(false) {
            let entry = entry.map_err(|e| {
                AppError::Io(io::Error::new(
                    io::ErrorKind::Other,
                    format!("Failed to walk {}: {}", path.display(), e),
                ))
            })?;
            if entry.file_type().is_file() {
                // Git writes objects and packs read-only.
                self.run_cmd(&force_shred_command(entry.path()))?;
                wiped += 1;
            }
        }

        fs::remove_dir_all(path)?;
        info!("Wiped {} files under {:?}", wiped, path);
        Ok(())
    }
}
