use log::{error, info, warn, LevelFilter};
use std::path::Path;

// For file-based logging with rotation
use log4rs::append::rolling_file::policy::compound::roll::fixed_window::FixedWindowRoller;
use log4rs::append::rolling_file::policy::compound::trigger::size::SizeTrigger;
use log4rs::append::rolling_file::policy::compound::CompoundPolicy;
use log4rs::append::rolling_file::RollingFileAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;

use crate::error::{Error, Result};

/// Environment variable that overrides the configured level
pub const LOG_ENV_VAR: &str = "DCT_HASHER_LOG";

/// Initialize a rotating file logger in `log_dir`.
///
/// Output goes to the file only, so it never mixes with the progress bar or
/// with hashes printed on stdout.
pub fn init_logger(log_dir: &Path, level: LevelFilter) -> Result<()> {
    std::fs::create_dir_all(log_dir)?;

    let log_file_path = log_dir.join("dct-hasher.log");
    let archived_logs_pattern = log_dir.join("dct-hasher.{}.log");

    // Rotate at 10MB, keep 5 archives
    let file_trigger = SizeTrigger::new(10 * 1024 * 1024);
    let file_roller = FixedWindowRoller::builder()
        .build(&archived_logs_pattern.to_string_lossy(), 5)
        .map_err(|e| Error::Configuration(format!("Failed to create log roller: {}", e)))?;
    let compound_policy = CompoundPolicy::new(Box::new(file_trigger), Box::new(file_roller));

    let rolling_file = RollingFileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] [{M}:{L}] - {m}{n}",
        )))
        .build(&log_file_path, Box::new(compound_policy))
        .map_err(|e| Error::Configuration(format!("Failed to create log appender: {}", e)))?;

    let level = std::env::var(LOG_ENV_VAR)
        .ok()
        .and_then(|value| value.parse::<LevelFilter>().ok())
        .unwrap_or(level);

    let config = Config::builder()
        .appender(Appender::builder().build("file", Box::new(rolling_file)))
        .build(Root::builder().appender("file").build(level))
        .map_err(|e| Error::Configuration(format!("Failed to build log config: {}", e)))?;

    log4rs::init_config(config)
        .map_err(|e| Error::Configuration(format!("Failed to initialize log4rs: {}", e)))?;

    info!("dct-hasher started");
    info!("Logging to file: {}", log_file_path.display());
    Ok(())
}

/// Log file operation that failed
pub fn log_file_error(path: &Path, operation: &str, error: &dyn std::error::Error) {
    error!(
        "File operation failed - Operation: {}, Path: {}, Error: {}",
        operation,
        path.display(),
        error
    );
}

/// Log an entry the scanner skipped
pub fn log_hash_error(path: &Path, error: &dyn std::error::Error) {
    warn!(
        "Hash computation failed - Path: {}, Error: {}",
        path.display(),
        error
    );
}
