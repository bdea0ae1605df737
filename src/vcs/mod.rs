//! Version control for the encrypted store.
//!
//! Only ciphertext and the ignore-rule file are ever staged. The store lifecycle
//! drives version control through the [`VersionControl`] trait; [`GitRepository`]
//! implements it by running the `git` binary against the store root.

use crate::constants::GITIGNORE_FILE;
use crate::errors::{AppResult, VcsError};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tracing::{debug, info};

/// Operations the store needs from version control.
pub trait VersionControl {
    /// Creates a repository at the store root (idempotent).
    fn init(&self) -> AppResult<()>;

    /// Stages store-relative `paths`.
    fn add(&self, paths: &[String]) -> AppResult<()>;

    /// Stops tracking store-relative `paths` without rewriting history.
    fn soft_remove(&self, paths: &[String]) -> AppResult<()>;

    /// Records one commit of everything staged.
    fn commit(&self, message: &str) -> AppResult<()>;

    /// Ensures each pattern is present in the store's ignore-rule file.
    fn add_gitignore(&self, patterns: &[&str]) -> AppResult<()>;
}

/// A git working tree rooted at the store directory.
#[derive(Debug, Clone)]
pub struct GitRepository {
    root: PathBuf,
}

impl GitRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        GitRepository { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn run_git(&self, args: &[&str]) -> AppResult<Output> {
        debug!("Running git {}", args.join(" "));
        Command::new("git")
            .arg("-C")
            .arg(&self.root)
            .args(args)
            .output()
            .map_err(|e| VcsError::Spawn(e).into())
    }

    fn git(&self, args: &[&str]) -> AppResult<()> {
        let output = self.run_git(args)?;
        if output.status.success() {
            return Ok(());
        }
        Err(VcsError::CommandFailed {
            args: args.join(" "),
            status_code: output.status.code().unwrap_or(-1),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
        .into())
    }

    /// True when the index differs from HEAD (or HEAD does not exist yet and
    /// something is staged).
    fn has_staged_changes(&self) -> AppResult<bool> {
        let output = self.run_git(&["diff", "--cached", "--quiet"])?;
        match output.status.code() {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            code => Err(VcsError::CommandFailed {
                args: "diff --cached --quiet".to_string(),
                status_code: code.unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into()),
        }
    }
}

impl VersionControl for GitRepository {
    fn init(&self) -> AppResult<()> {
        self.git(&["init", "--quiet"])?;
        info!("Initialized git repository");
        Ok(())
    }

    fn add(&self, paths: &[String]) -> AppResult<()> {
        if paths.is_empty() {
            return Ok(());
        }
        let mut args = vec!["add", "--"];
        args.extend(paths.iter().map(String::as_str));
        self.git(&args)
    }

    fn soft_remove(&self, paths: &[String]) -> AppResult<()> {
        if paths.is_empty() {
            return Ok(());
        }
        let mut args = vec!["rm", "--cached", "--quiet", "--ignore-unmatch", "--"];
        args.extend(paths.iter().map(String::as_str));
        self.git(&args)
    }

    fn commit(&self, message: &str) -> AppResult<()> {
        if !self.has_staged_changes()? {
            debug!("Nothing staged, skipping commit {:?}", message);
            return Ok(());
        }
        self.git(&["commit", "--quiet", "-m", message])?;
        info!("Committed: {}", message);
        Ok(())
    }

    fn add_gitignore(&self, patterns: &[&str]) -> AppResult<()> {
        let path = self.root.join(GITIGNORE_FILE);
        let existing = if path.exists() {
            fs::read_to_string(&path)?
        } else {
            String::new()
        };

        let missing: Vec<&str> = patterns
            .iter()
            .copied()
            .filter(|pattern| !existing.lines().any(|line| line.trim() == *pattern))
            .collect();
        if missing.is_empty() {
            return Ok(());
        }

        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        if !existing.is_empty() && !existing.ends_with('\n') {
            writeln!(file)?;
        }
        for pattern in &missing {
            writeln!(file, "{}", pattern)?;
        }
        debug!("Added ignore rules {:?}", missing);
        Ok(())
    }
}
