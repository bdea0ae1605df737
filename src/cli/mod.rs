use crate::constants::{APP_DESCRIPTION, APP_NAME, DEFAULT_LOG_LEVEL, LOG_FORMAT_JSON, LOG_FORMAT_TEXT};
use clap::{Parser, Subcommand};

/// Keep secret files encrypted and versioned
#[derive(Parser, Debug)]
#[clap(name = APP_NAME, about = APP_DESCRIPTION)]
#[clap(author, version, long_about = None)]
pub struct CliArgs {
    /// Store directory (overrides PASSKEEPER_DIR)
    #[clap(short = 'd', long, global = true)]
    pub directory: Option<String>,

    /// Print verbose output
    #[clap(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Log output format
    #[clap(long, global = true, default_value = LOG_FORMAT_TEXT, value_parser = [LOG_FORMAT_TEXT, LOG_FORMAT_JSON])]
    pub log_format: String,

    /// Log level used when RUST_LOG is not set
    #[clap(long, global = true, default_value = DEFAULT_LOG_LEVEL)]
    pub log_level: String,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Create a new store with a template secret file
    Init,

    /// Decrypt every encrypted file into the store directory
    Decrypt,

    /// Encrypt plaintext files and commit them
    Encrypt {
        /// Commit message
        #[clap(short = 'm', long)]
        message: Option<String>,

        /// Keep plaintext files after encrypting
        #[clap(long)]
        no_cleanup: bool,
    },

    /// Securely erase plaintext files and prune deleted secrets
    Cleanup,

    /// Offer to delete encrypted files with no plaintext counterpart
    Prune,

    /// Search decrypted files for sections matching a pattern
    Search {
        /// Case-insensitive text to look for in section names, keys and values
        pattern: String,

        /// Print matches as JSON
        #[clap(long)]
        json: bool,
    },

    /// Erase version-control history, keeping only the current store
    FlushHistory {
        /// Do not ask for confirmation
        #[clap(short = 'y', long)]
        yes: bool,
    },
}

impl CliArgs {
    /// Parse command-line arguments
    pub fn parse() -> Self {
        CliArgs::parse_from(std::env::args())
    }
}
