//! Integration tests for the store lifecycle (ops module).
//!
//! The manager runs against real temporary directories while version control,
//! the cipher, the shell and the operator are recording fakes, so each test can
//! assert the exact sequence of side effects.

mod test_helpers;

use passkeeper::constants::DEFAULT_INI_TEMPLATE;
use passkeeper::errors::{AppError, StoreError};
use passkeeper::shell::shred_command;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use test_helpers::{calls, new_log, recording_keeper, snapshot, Call, FixedListing};

fn commits(log: &[Call]) -> Vec<&Call> {
    log.iter()
        .filter(|c| matches!(c, Call::GitCommit(_)))
        .collect()
}

fn shreds(log: &[Call]) -> Vec<&Call> {
    log.iter().filter(|c| matches!(c, Call::RunCmd(_))).collect()
}

fn write_encrypted(root: &Path, names: &[&str]) {
    let encrypted = root.join("encrypted");
    fs::create_dir_all(&encrypted).expect("create encrypted dir");
    for name in names {
        fs::write(encrypted.join(name), "[section]\nkey = value\n").expect("write encrypted file");
    }
}

#[test]
fn test_out_of_scope_entries_are_never_touched() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let root = temp_dir.path();
    // Neither of these parses as a secret document, so search would fail on them.
    fs::write(root.join("ignored"), "no section header").unwrap();
    fs::write(root.join("notes.txt"), "no section header").unwrap();
    fs::write(root.join("bar.ini"), "[bar]\nlogin = me\n").unwrap();
    write_encrypted(root, &["bar.ini.passkeeper", "stray", "old.passkeeper"]);

    let log = new_log();
    let keeper = recording_keeper(root, &log, &["pw", "pw", "pw"], &[]);

    keeper.encrypt(None).expect("encrypt");
    keeper.decrypt().expect("decrypt");
    let results = keeper.search("me").expect("search");
    keeper.cleanup_ini().expect("cleanup");

    let log = calls(&log);
    let encrypted = root.join("encrypted");
    let touched: Vec<&Call> = log
        .iter()
        .filter(|c| matches!(c, Call::Encrypt { .. } | Call::Decrypt { .. } | Call::RunCmd(_)))
        .collect();
    assert_eq!(
        touched,
        vec![
            &Call::Encrypt {
                source: root.join("bar.ini"),
                output: encrypted.join("bar.ini.passkeeper"),
            },
            &Call::Decrypt {
                source: encrypted.join("bar.ini.passkeeper"),
                output: root.join("bar.ini"),
            },
            &Call::RunCmd(shred_command(&root.join("bar.ini"))),
        ]
    );
    assert_eq!(results.documents.len(), 1);
    assert_eq!(results.documents[0].name, "bar.ini");
}

#[test]
fn test_encrypt_mismatch_has_no_side_effects() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let root = temp_dir.path();
    fs::write(root.join("bar.ini"), "[bar]\nlogin = me\n").unwrap();
    let before = snapshot(root);

    let log = new_log();
    let keeper = recording_keeper(root, &log, &["first", "second"], &[]);

    let encrypted = keeper.encrypt(Some("never used")).expect("encrypt");

    assert!(!encrypted);
    assert_eq!(snapshot(root), before);
    assert_eq!(
        calls(&log),
        vec![
            Call::Passphrase("Passphrase: ".to_string()),
            Call::Passphrase("Confirm passphrase: ".to_string()),
        ]
    );
}

#[test]
fn test_encrypt_single_file_and_single_commit() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let root = temp_dir.path();
    fs::write(root.join("ignored"), "x").unwrap();
    fs::write(root.join("bar.ini"), "[bar]\n").unwrap();

    let log = new_log();
    let keeper = recording_keeper(root, &log, &["pw", "pw"], &[])
        .with_lister(Box::new(FixedListing::default().with(root, &["ignored", "bar.ini"])));

    assert!(keeper.encrypt(None).expect("encrypt"));

    assert!(root.join("encrypted").is_dir());
    let log = calls(&log);
    assert_eq!(
        log[2..],
        [
            Call::Encrypt {
                source: root.join("bar.ini"),
                output: root.join("encrypted").join("bar.ini.passkeeper"),
            },
            Call::GitAdd(vec!["encrypted/bar.ini.passkeeper".to_string()]),
            Call::GitCommit("Update encrypted files".to_string()),
        ]
    );
}

#[test]
fn test_encrypt_uses_custom_commit_message() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let root = temp_dir.path();
    fs::write(root.join("a.ini"), "[a]\n").unwrap();
    fs::write(root.join("b.ini"), "[b]\n").unwrap();

    let log = new_log();
    let keeper = recording_keeper(root, &log, &["pw", "pw"], &[]);

    assert!(keeper.encrypt(Some("Rotate router password")).expect("encrypt"));

    let log = calls(&log);
    assert_eq!(
        log.iter().find(|c| matches!(c, Call::GitAdd(_))),
        Some(&Call::GitAdd(vec![
            "encrypted/a.ini.passkeeper".to_string(),
            "encrypted/b.ini.passkeeper".to_string(),
        ]))
    );
    assert_eq!(
        commits(&log),
        vec![&Call::GitCommit("Rotate router password".to_string())]
    );
}

#[test]
fn test_remove_old_encrypted_files_asks_per_stale_file() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let root = temp_dir.path();
    let encrypted = root.join("encrypted");
    write_encrypted(
        root,
        &["bar.ini.passkeeper", "foo.ini.passkeeper", "bli.ini.passkeeper"],
    );
    fs::write(root.join("bar.ini"), "[bar]\n").unwrap();

    let log = new_log();
    let keeper = recording_keeper(root, &log, &[], &[false, true]).with_lister(Box::new(
        FixedListing::default().with(
            &encrypted,
            &["bar.ini.passkeeper", "foo.ini.passkeeper", "bli.ini.passkeeper"],
        ),
    ));

    keeper.remove_old_encrypted_files().expect("reconcile");

    let bli = "encrypted/bli.ini.passkeeper".to_string();
    assert_eq!(
        calls(&log),
        vec![
            Call::Confirm(
                "encrypted/foo.ini.passkeeper has no matching foo.ini. Delete it?".to_string()
            ),
            Call::Confirm(
                "encrypted/bli.ini.passkeeper has no matching bli.ini. Delete it?".to_string()
            ),
            Call::RunCmd(shred_command(&encrypted.join("bli.ini.passkeeper"))),
            Call::GitSoftRemove(vec![bli.clone()]),
            Call::GitCommit(format!("Remove file {}", bli)),
        ]
    );
}

#[test]
fn test_cleanup_without_plaintext_shreds_nothing() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let root = temp_dir.path();
    write_encrypted(root, &["bar.ini.passkeeper", "foo.ini.passkeeper"]);
    fs::write(root.join("readme"), "x").unwrap();

    let log = new_log();
    let keeper = recording_keeper(root, &log, &[], &[]);

    keeper.cleanup_ini().expect("cleanup");

    assert!(calls(&log).is_empty());
}

#[test]
fn test_cleanup_skips_listed_entries_that_are_not_files() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let root = temp_dir.path();
    write_encrypted(root, &["bar.ini.passkeeper"]);
    fs::create_dir(root.join("dir.ini")).unwrap();

    let log = new_log();
    let keeper = recording_keeper(root, &log, &[], &[])
        .with_lister(Box::new(FixedListing::default().with(root, &["gone.ini", "dir.ini"])));

    keeper.cleanup_ini().expect("cleanup");

    let log = calls(&log);
    assert!(shreds(&log).is_empty());
    assert!(!log.iter().any(|c| matches!(c, Call::Confirm(_))));
    assert!(root.join("encrypted").join("bar.ini.passkeeper").exists());
}

#[test]
fn test_encrypt_skips_listed_plaintext_that_is_missing() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let root = temp_dir.path();

    let log = new_log();
    let keeper = recording_keeper(root, &log, &["pw", "pw"], &[])
        .with_lister(Box::new(FixedListing::default().with(root, &["bar.ini"])));

    assert!(keeper.encrypt(None).expect("encrypt"));

    let log = calls(&log);
    assert!(!log.iter().any(|c| matches!(c, Call::Encrypt { .. })));
    assert_eq!(
        log[2..],
        [
            Call::GitAdd(Vec::new()),
            Call::GitCommit("Update encrypted files".to_string()),
        ]
    );
}

#[test]
fn test_cleanup_prunes_files_deleted_from_working_copy() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let root = temp_dir.path();
    write_encrypted(root, &["bar.ini.passkeeper", "foo.ini.passkeeper"]);
    // The operator decrypted both, then deleted foo.ini.
    fs::write(root.join("bar.ini"), "[bar]\n").unwrap();

    let log = new_log();
    let keeper = recording_keeper(root, &log, &[], &[true]);

    keeper.cleanup_ini().expect("cleanup");

    let foo = "encrypted/foo.ini.passkeeper".to_string();
    assert_eq!(
        calls(&log),
        vec![
            Call::RunCmd(shred_command(&root.join("bar.ini"))),
            Call::Confirm(format!("{} has no matching foo.ini. Delete it?", foo)),
            Call::RunCmd(shred_command(&root.join("encrypted").join("foo.ini.passkeeper"))),
            Call::GitSoftRemove(vec![foo.clone()]),
            Call::GitCommit(format!("Remove file {}", foo)),
        ]
    );
}

#[test]
fn test_cleanup_keeps_declined_files() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let root = temp_dir.path();
    write_encrypted(root, &["bar.ini.passkeeper", "foo.ini.passkeeper"]);
    fs::write(root.join("bar.ini"), "[bar]\n").unwrap();

    let log = new_log();
    let keeper = recording_keeper(root, &log, &[], &[false]);

    keeper.cleanup_ini().expect("cleanup");

    let log = calls(&log);
    assert_eq!(shreds(&log).len(), 1);
    assert!(commits(&log).is_empty());
    assert!(root.join("encrypted").join("foo.ini.passkeeper").exists());
}

#[test]
fn test_flush_history() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let root = temp_dir.path();
    write_encrypted(root, &["bar.ini.passkeeper"]);

    let log = new_log();
    let keeper = recording_keeper(root, &log, &[], &[]);

    keeper.flush_history().expect("flush");

    assert_eq!(
        calls(&log),
        vec![
            Call::ShredDir(root.join(".git")),
            Call::GitInit,
            Call::GitIgnore(vec!["*.ini".to_string(), "/*.raw".to_string()]),
            Call::GitAdd(vec!["encrypted".to_string(), ".gitignore".to_string()]),
            Call::GitCommit("Clean git History".to_string()),
        ]
    );
}

#[test]
fn test_flush_history_without_encrypted_directory() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let root = temp_dir.path();

    let log = new_log();
    let keeper = recording_keeper(root, &log, &[], &[]);

    keeper.flush_history().expect("flush");

    let log = calls(&log);
    assert!(log.contains(&Call::GitAdd(vec![".gitignore".to_string()])));
    assert_eq!(commits(&log), vec![&Call::GitCommit("Clean git History".to_string())]);
}

#[test]
fn test_decrypt_skips_non_files() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let root = temp_dir.path();
    write_encrypted(root, &["bar.ini.passkeeper"]);
    fs::create_dir(root.join("encrypted").join("dir.ini.passkeeper")).unwrap();

    let log = new_log();
    let keeper = recording_keeper(root, &log, &["pw"], &[]).with_lister(Box::new(
        FixedListing::default().with(
            root.join("encrypted"),
            &["gone.ini.passkeeper", "dir.ini.passkeeper", "bar.ini.passkeeper"],
        ),
    ));

    keeper.decrypt().expect("decrypt");

    let log = calls(&log);
    assert_eq!(
        log,
        vec![
            Call::Passphrase("Passphrase: ".to_string()),
            Call::Decrypt {
                source: root.join("encrypted").join("bar.ini.passkeeper"),
                output: root.join("bar.ini"),
            },
        ]
    );
    assert_eq!(
        fs::read_to_string(root.join("bar.ini")).unwrap(),
        "[section]\nkey = value\n"
    );
}

#[test]
fn test_decrypt_without_encrypted_directory() {
    let temp_dir = TempDir::new().expect("create temp dir");

    let log = new_log();
    let keeper = recording_keeper(temp_dir.path(), &log, &["pw"], &[]);

    keeper.decrypt().expect("decrypt");

    assert_eq!(calls(&log).len(), 1);
}

#[test]
fn test_search_matches_sections_case_insensitively() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let root = temp_dir.path();
    fs::write(
        root.join("foo.ini"),
        "[unmatched]\nfoo = bar\n\n[WanTed]\nfoo = bar\n\n[value]\nfound = .wanted.\n",
    )
    .unwrap();

    let log = new_log();
    let keeper = recording_keeper(root, &log, &[], &[]);

    let results = keeper.search("WANTED").expect("search");

    assert_eq!(results.section_names(), vec!["WanTed", "value"]);
    let rendered: Vec<String> = results.sections().map(|s| s.to_string()).collect();
    assert_eq!(
        rendered,
        vec!["[WanTed]\nfoo = bar\n", "[value]\nfound = .wanted.\n"]
    );
    assert!(calls(&log).is_empty());
}

#[test]
fn test_search_orders_matches_by_file() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let root = temp_dir.path();
    fs::write(root.join("b.ini"), "[mail]\nlogin = shared\n").unwrap();
    fs::write(root.join("a.ini"), "[bank]\nlogin = shared\n[misc]\nx = y\n").unwrap();
    fs::create_dir(root.join("dir.ini")).unwrap();

    let log = new_log();
    let keeper = recording_keeper(root, &log, &[], &[]);

    let results = keeper.search("SHARED").expect("search");

    let found: Vec<(&str, &str)> = results
        .matches
        .iter()
        .map(|m| (m.file.as_str(), m.section.as_str()))
        .collect();
    assert_eq!(found, vec![("a.ini", "bank"), ("b.ini", "mail")]);
    assert_eq!(results.documents.len(), 2);
}

#[test]
fn test_search_reports_malformed_documents() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let root = temp_dir.path();
    fs::write(root.join("bad.ini"), "login = orphan\n").unwrap();

    let log = new_log();
    let keeper = recording_keeper(root, &log, &[], &[]);

    match keeper.search("orphan") {
        Err(AppError::Document(e)) => assert!(e.to_string().contains("bad.ini:1")),
        other => panic!("Expected document error, got {:?}", other.map(|r| r.matches)),
    }
}

#[test]
fn test_init_dir_creates_and_seeds_store() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let root = temp_dir.path().join("store");

    let log = new_log();
    let keeper = recording_keeper(&root, &log, &["pw", "pw"], &[]);

    keeper.init_dir().expect("init");

    assert_eq!(
        fs::read_to_string(root.join("default.ini")).unwrap(),
        DEFAULT_INI_TEMPLATE
    );
    assert!(root.join("default.raw").join("ssh_id.rsa").is_file());
    assert!(root.join("encrypted").join("default.ini.passkeeper").is_file());

    assert_eq!(
        calls(&log),
        vec![
            Call::GitInit,
            Call::GitIgnore(vec!["*.ini".to_string(), "/*.raw".to_string()]),
            Call::Passphrase("Passphrase: ".to_string()),
            Call::Passphrase("Confirm passphrase: ".to_string()),
            Call::Encrypt {
                source: root.join("default.ini"),
                output: root.join("encrypted").join("default.ini.passkeeper"),
            },
            Call::GitAdd(vec!["encrypted/default.ini.passkeeper".to_string()]),
            Call::GitCommit("Update encrypted files".to_string()),
            Call::RunCmd(shred_command(&root.join("default.ini"))),
        ]
    );
}

#[cfg(unix)]
#[test]
fn test_init_dir_restricts_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = TempDir::new().expect("create temp dir");
    let root = temp_dir.path().join("store");

    let log = new_log();
    recording_keeper(&root, &log, &["pw", "pw"], &[])
        .init_dir()
        .expect("init");

    let mode = |p: &Path| fs::metadata(p).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode(&root), 0o700);
    assert_eq!(mode(&root.join("default.raw")), 0o700);
    assert_eq!(mode(&root.join("encrypted")), 0o700);
    assert_eq!(mode(&root.join("default.ini")), 0o600);
}

#[test]
fn test_init_dir_mismatch_keeps_template() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let root = temp_dir.path().join("store");

    let log = new_log();
    let keeper = recording_keeper(&root, &log, &["first", "second"], &[]);

    match keeper.init_dir() {
        Err(AppError::Store(StoreError::PassphraseMismatch)) => {}
        other => panic!("Expected passphrase mismatch, got {:?}", other),
    }

    assert!(root.join("default.ini").is_file());
    let log = calls(&log);
    assert!(shreds(&log).is_empty());
    assert!(commits(&log).is_empty());
}

#[test]
fn test_init_dir_refuses_existing_store() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let root = temp_dir.path();
    write_encrypted(root, &["bar.ini.passkeeper"]);
    let before = snapshot(root);

    let log = new_log();
    let keeper = recording_keeper(root, &log, &[], &[]);

    match keeper.init_dir() {
        Err(AppError::Store(StoreError::AlreadyInitialized(path))) => {
            assert_eq!(path, root.join("encrypted"));
        }
        other => panic!("Expected already initialized, got {:?}", other),
    }
    assert!(calls(&log).is_empty());
    assert_eq!(snapshot(root), before);
}
