use dct_hasher_core::{BatchScanner, Config, LogLevel};
use log::{error, info};
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let directory = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("test_data/real_images"));

    let config = Config {
        log_level: LogLevel::Debug,
        show_progress: true,
        file_timeout_secs: Some(10),
        ..Config::default()
    };

    // Initialize logging
    env_logger::Builder::new()
        .filter_level(config.log_level.into())
        .init();

    let scanner = BatchScanner::new(config)?;

    match scanner.scan(&directory) {
        Ok(report) => {
            info!("Appended {} hashes to {}", report.hashed, report.output_path.display());
            for skipped in &report.skipped {
                println!("skipped {}: {}", skipped.path.display(), skipped.reason);
            }
            Ok(())
        }
        Err(e) => {
            error!("Error scanning {}: {}", directory.display(), e);
            Err(e.into())
        }
    }
}
