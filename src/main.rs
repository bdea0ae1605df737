/*!
# Passkeeper - Encrypted Secret Files

Passkeeper keeps secret files encrypted with a passphrase inside a git
repository, and only decrypts them while you work with them.

This file contains the main application flow: it parses arguments, sets up
logging and configuration, and dispatches to the store lifecycle operations.

## Usage

```
passkeeper [OPTIONS] <COMMAND>

Commands:
  init           Create a new store with a template secret file
  decrypt        Decrypt every encrypted file into the store directory
  encrypt        Encrypt plaintext files and commit them
  cleanup        Securely erase plaintext files and prune deleted secrets
  prune          Offer to delete encrypted files with no plaintext counterpart
  search         Search decrypted files for sections matching a pattern
  flush-history  Erase version-control history, keeping only the current store

Options:
  -d, --directory <DIRECTORY>    Store directory (overrides PASSKEEPER_DIR)
  -v, --verbose                  Print verbose output
      --log-format <LOG_FORMAT>  Log output format [default: text] [possible values: text, json]
      --log-level <LOG_LEVEL>    Log level used when RUST_LOG is not set [default: info]
```

## Configuration

- `PASSKEEPER_DIR`: The store directory (defaults to "~/.passkeeper")
- `RUST_LOG`: Log filter, takes precedence over `--log-level`
*/

use passkeeper::cli::{CliArgs, Commands};
use passkeeper::config::Config;
use passkeeper::constants::{LOG_FORMAT_JSON, TRACING_ROOT_SPAN_NAME, TRACING_SERVICE_NAME};
use passkeeper::errors::{AppResult, StoreError};
use passkeeper::ops::Passkeeper;
use passkeeper::prompt::{Prompter, TerminalPrompter};
use std::process;
use tracing::{debug, error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() {
    let args = CliArgs::parse();

    init_logging(&args);

    let correlation_id = uuid::Uuid::new_v4().to_string();
    let root_span = tracing::info_span!(
        TRACING_ROOT_SPAN_NAME,
        service_name = TRACING_SERVICE_NAME,
        correlation_id = %correlation_id,
    );
    let _guard = root_span.enter();

    if let Err(e) = run(args) {
        error!("{}", e);
        process::exit(1);
    }
}

/// Sets up the global tracing subscriber writing to stderr.
///
/// `RUST_LOG` wins over `--log-level`; `--verbose` forces debug output.
fn init_logging(args: &CliArgs) {
    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level))
    };

    let registry = tracing_subscriber::registry().with(filter);
    if args.log_format == LOG_FORMAT_JSON {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

/// Runs the selected command.
///
/// # Errors
///
/// Any error from configuration loading or the store operations is returned
/// unchanged; it is logged once by `main`.
fn run(args: CliArgs) -> AppResult<()> {
    debug!("CLI arguments: {:?}", args);

    let config = Config::load_with_override(args.directory.as_deref())?;
    config.validate()?;
    debug!("Configuration loaded: {:?}", config);

    let keeper = Passkeeper::with_system_adapters(&config);

    match args.command {
        Commands::Init => keeper.init_dir()?,
        Commands::Decrypt => keeper.decrypt()?,
        Commands::Encrypt {
            message,
            no_cleanup,
        } => {
            if !keeper.encrypt(message.as_deref())? {
                return Err(StoreError::PassphraseMismatch.into());
            }
            if !no_cleanup {
                keeper.cleanup_ini()?;
            }
        }
        Commands::Cleanup => keeper.cleanup_ini()?,
        Commands::Prune => keeper.remove_old_encrypted_files()?,
        Commands::Search { pattern, json } => {
            let results = keeper.search(&pattern)?;
            if json {
                let matches: Vec<_> = results
                    .matches
                    .iter()
                    .filter_map(|m| {
                        results.lookup(m).map(|section| {
                            serde_json::json!({ "file": m.file, "section": section })
                        })
                    })
                    .collect();
                let rendered =
                    serde_json::to_string_pretty(&matches).map_err(std::io::Error::from)?;
                println!("{}", rendered);
            } else {
                for m in &results.matches {
                    if let Some(section) = results.lookup(m) {
                        println!("# {}\n{}", m.file, section);
                    }
                }
            }
        }
        Commands::FlushHistory { yes } => {
            let confirmed = yes
                || TerminalPrompter.confirm(
                    "This permanently erases every previous version of your secrets. Continue?",
                )?;
            if !confirmed {
                info!("History flush cancelled");
                return Ok(());
            }
            keeper.flush_history()?;
        }
    }

    Ok(())
}
