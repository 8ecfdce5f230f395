use std::fs::OpenOptions;
use std::path::Path;

use env_logger::{Builder, Env, Target};

use crate::error::Result;

/// Route `log` output to an append-only file; the TUI owns stdout and stderr.
///
/// Defaults to `info`, `RUST_LOG` overrides. Calling this twice keeps the first logger.
pub fn init_logging(log_file: &Path, verbose: bool) -> Result<()> {
    if let Some(parent) = log_file.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(log_file)?;

    let default_level = if verbose { "typerank=debug,warn" } else { "typerank=info,warn" };
    let initialised = Builder::from_env(Env::default().default_filter_or(default_level))
        .target(Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .try_init();

    if initialised.is_ok() {
        log::debug!("logging to {}", log_file.display());
    }
    Ok(())
}
