//! Interactive prompts.
//!
//! Passphrases and per-file deletion confirmations are the only points where the
//! store waits on the operator. They sit behind the [`Prompter`] trait so tests
//! can script answers.

use crate::constants::ENV_VAR_TEST_PASSPHRASE;
use crate::errors::{AppResult, CryptoError};
use age::secrecy::SecretString;
use std::io::{self, BufRead, Write};
use tracing::debug;

/// Operator interaction needed by the store lifecycle.
pub trait Prompter {
    /// Reads a passphrase without echoing it.
    fn passphrase(&self, prompt: &str) -> AppResult<SecretString>;

    /// Asks a yes/no question; anything but an explicit yes is a no.
    fn confirm(&self, question: &str) -> AppResult<bool>;
}

/// Interprets a typed answer to a `[y/N]` question.
///
/// ```
/// use passkeeper::prompt::is_yes;
///
/// assert!(is_yes("y"));
/// assert!(is_yes(" YES \n"));
/// assert!(!is_yes(""));
/// assert!(!is_yes("n"));
/// ```
pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// [`Prompter`] reading from the controlling terminal.
///
/// When `PASSKEEPER_TEST_PASSPHRASE` is set, its value is used instead of
/// prompting for passphrases, for non-interactive testing.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn passphrase(&self, prompt: &str) -> AppResult<SecretString> {
        if let Ok(test_passphrase) = std::env::var(ENV_VAR_TEST_PASSPHRASE) {
            debug!("Using {} for non-interactive testing", ENV_VAR_TEST_PASSPHRASE);
            return Ok(SecretString::new(test_passphrase));
        }

        let passphrase = rpassword::prompt_password(prompt)
            .map_err(|e| CryptoError::PassphrasePrompt(e.to_string()))?;

        if passphrase.is_empty() {
            return Err(CryptoError::EmptyPassphrase.into());
        }

        Ok(SecretString::new(passphrase))
    }

    fn confirm(&self, question: &str) -> AppResult<bool> {
        let mut stdout = io::stdout();
        write!(stdout, "{} [y/N] ", question)?;
        stdout.flush()?;

        let mut input = String::new();
        io::stdin().lock().read_line(&mut input)?;
        Ok(is_yes(&input))
    }
}
