use std::path::PathBuf;

use flexi_logger::{
    detailed_format, Cleanup, Criterion, Duplicate, FileSpec, Logger, LoggerHandle, Naming,
};

use crate::config::LoggingConfig;
use crate::error::SeedError;

const MAX_LOG_SIZE: u64 = 5 * 1024 * 1024;
const KEEP_LOG_FILES: usize = 10;

/// Starts file logging in `log_dir`. `RUST_LOG` overrides the configured
/// level. Warnings and errors are also echoed to stderr.
///
/// The returned handle must be kept alive for the duration of the program.
pub fn setup_logging(log_dir: PathBuf, config: &LoggingConfig) -> Result<LoggerHandle, SeedError> {
    let handle = Logger::try_with_env_or_str(config.log_spec())?
        .log_to_file(
            FileSpec::default()
                .directory(log_dir)
                .basename("productseed"),
        )
        .duplicate_to_stderr(Duplicate::Warn)
        .format_for_files(detailed_format)
        .rotate(
            Criterion::Size(MAX_LOG_SIZE),
            Naming::Timestamps,
            Cleanup::KeepLogFiles(KEEP_LOG_FILES),
        )
        .start()?;

    Ok(handle)
}

/// Like [`setup_logging`], but a logger that can't start is only a warning
/// on stderr: the run goes ahead without file logging.
pub fn try_setup_logging(log_dir: PathBuf, config: &LoggingConfig) -> Option<LoggerHandle> {
    match setup_logging(log_dir, config) {
        Ok(handle) => Some(handle),
        Err(err) => {
            eprintln!("Warning: continuing without file logging: {}", err);
            None
        }
    }
}
