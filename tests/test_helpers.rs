#![allow(dead_code)]

use age::secrecy::SecretString;
use assert_cmd::Command;
use passkeeper::crypto::Cipher;
use passkeeper::errors::AppResult;
use passkeeper::ops::Passkeeper;
use passkeeper::prompt::Prompter;
use passkeeper::shell::Shell;
use passkeeper::store::{DirectoryLister, ReadDirLister};
use passkeeper::vcs::VersionControl;
use std::collections::{HashMap, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

pub const TEST_PASSPHRASE: &str = "test-passphrase";

/// Creates a `Command` for the `passkeeper` binary with a clean, non-interactive environment.
/// Additional environment variables or arguments can be configured by the caller.
pub fn base_passkeeper_command() -> Command {
    let mut cmd = Command::cargo_bin("passkeeper").expect("passkeeper binary not built");
    cmd.env_clear();
    if let Ok(path) = std::env::var("PATH") {
        cmd.env("PATH", path);
    }
    if let Ok(tmpdir) = std::env::var("TMPDIR") {
        cmd.env("TMPDIR", tmpdir);
    }
    cmd.env("HOME", "/tmp")
        .env("PASSKEEPER_TEST_PASSPHRASE", TEST_PASSPHRASE);
    cmd
}

/// One adapter call seen by the manager, in the order it was made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    GitInit,
    GitAdd(Vec<String>),
    GitSoftRemove(Vec<String>),
    GitCommit(String),
    GitIgnore(Vec<String>),
    Encrypt { source: PathBuf, output: PathBuf },
    Decrypt { source: PathBuf, output: PathBuf },
    RunCmd(String),
    ShredDir(PathBuf),
    Passphrase(String),
    Confirm(String),
}

pub type CallLog = Arc<Mutex<Vec<Call>>>;

pub fn new_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn calls(log: &CallLog) -> Vec<Call> {
    log.lock().unwrap().clone()
}

fn record(log: &CallLog, call: Call) {
    log.lock().unwrap().push(call);
}

pub struct RecordingVcs {
    pub log: CallLog,
}

impl VersionControl for RecordingVcs {
    fn init(&self) -> AppResult<()> {
        record(&self.log, Call::GitInit);
        Ok(())
    }

    fn add(&self, paths: &[String]) -> AppResult<()> {
        record(&self.log, Call::GitAdd(paths.to_vec()));
        Ok(())
    }

    fn soft_remove(&self, paths: &[String]) -> AppResult<()> {
        record(&self.log, Call::GitSoftRemove(paths.to_vec()));
        Ok(())
    }

    fn commit(&self, message: &str) -> AppResult<()> {
        record(&self.log, Call::GitCommit(message.to_string()));
        Ok(())
    }

    fn add_gitignore(&self, patterns: &[&str]) -> AppResult<()> {
        record(
            &self.log,
            Call::GitIgnore(patterns.iter().map(|p| p.to_string()).collect()),
        );
        Ok(())
    }
}

/// Cipher that copies bytes through unchanged and records each call.
pub struct CopyCipher {
    pub log: CallLog,
}

impl Cipher for CopyCipher {
    fn encrypt(&self, _passphrase: &SecretString, source: &Path, output: &Path) -> AppResult<()> {
        record(
            &self.log,
            Call::Encrypt {
                source: source.to_path_buf(),
                output: output.to_path_buf(),
            },
        );
        fs::copy(source, output)?;
        Ok(())
    }

    fn decrypt(&self, _passphrase: &SecretString, source: &Path, output: &Path) -> AppResult<()> {
        record(
            &self.log,
            Call::Decrypt {
                source: source.to_path_buf(),
                output: output.to_path_buf(),
            },
        );
        fs::copy(source, output)?;
        Ok(())
    }
}

/// Shell that records commands without running them.
pub struct RecordingShell {
    pub log: CallLog,
}

impl Shell for RecordingShell {
    fn run_cmd(&self, command: &str) -> AppResult<()> {
        record(&self.log, Call::RunCmd(command.to_string()));
        Ok(())
    }

    fn shred_dir(&self, path: &Path) -> AppResult<()> {
        record(&self.log, Call::ShredDir(path.to_path_buf()));
        Ok(())
    }
}

/// Prompter answering from pre-recorded scripts; running out of answers panics.
pub struct ScriptedPrompter {
    pub log: CallLog,
    passphrases: Mutex<VecDeque<String>>,
    answers: Mutex<VecDeque<bool>>,
}

impl ScriptedPrompter {
    pub fn new(log: &CallLog, passphrases: &[&str], answers: &[bool]) -> Self {
        ScriptedPrompter {
            log: Arc::clone(log),
            passphrases: Mutex::new(passphrases.iter().map(|p| p.to_string()).collect()),
            answers: Mutex::new(answers.iter().copied().collect()),
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn passphrase(&self, prompt: &str) -> AppResult<SecretString> {
        record(&self.log, Call::Passphrase(prompt.to_string()));
        let passphrase = self
            .passphrases
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected passphrase prompt: {}", prompt));
        Ok(SecretString::new(passphrase))
    }

    fn confirm(&self, question: &str) -> AppResult<bool> {
        record(&self.log, Call::Confirm(question.to_string()));
        Ok(self
            .answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected confirmation: {}", question)))
    }
}

/// Lister returning fixed names for chosen directories and reading the
/// filesystem for every other one.
#[derive(Default)]
pub struct FixedListing {
    listings: HashMap<PathBuf, Vec<String>>,
}

impl FixedListing {
    pub fn with(mut self, dir: impl Into<PathBuf>, names: &[&str]) -> Self {
        self.listings
            .insert(dir.into(), names.iter().map(|n| n.to_string()).collect());
        self
    }
}

impl DirectoryLister for FixedListing {
    fn list(&self, dir: &Path) -> AppResult<Vec<String>> {
        match self.listings.get(dir) {
            Some(names) => Ok(names.clone()),
            None => ReadDirLister.list(dir),
        }
    }
}

/// Builds a manager over `root` wired to recording fakes sharing `log`.
pub fn recording_keeper(
    root: &Path,
    log: &CallLog,
    passphrases: &[&str],
    answers: &[bool],
) -> Passkeeper {
    Passkeeper::new(
        root,
        Box::new(RecordingVcs {
            log: Arc::clone(log),
        }),
        Box::new(CopyCipher {
            log: Arc::clone(log),
        }),
        Box::new(RecordingShell {
            log: Arc::clone(log),
        }),
        Box::new(ScriptedPrompter::new(log, passphrases, answers)),
    )
}

/// Every entry below `root` with its content (empty for directories), sorted.
pub fn snapshot(root: &Path) -> Vec<(String, Vec<u8>)> {
    let mut entries: Vec<_> = walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .map(|entry| {
            let relative = entry
                .path()
                .strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .into_owned();
            let content = if entry.file_type().is_file() {
                fs::read(entry.path()).unwrap()
            } else {
                Vec::new()
            };
            (relative, content)
        })
        .collect();
    entries.sort();
    entries
}

pub fn secret(value: &str) -> SecretString {
    SecretString::new(value.to_string())
}
