use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use dct_hasher_core::config::LogLevel;
use dct_hasher_core::{logging, phash_from_file, BatchScanner, Config, HashAlgorithm};
use log::{error, info};
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dct-hasher")]
#[command(about = "Compute perceptual hashes for image files")]
#[command(version)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Write logs to rotating files in this directory instead of stderr
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Hash every file in a directory (non-recursive) into the results log
    Scan {
        /// Directory to scan
        directory: PathBuf,

        /// Results log to append to
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Number of worker threads (0 = one per CPU)
        #[arg(long)]
        threads: Option<usize>,

        /// Skip files that take longer than this many seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Also scan entries whose name starts with a dot
        #[arg(long)]
        include_hidden: bool,

        /// Show a progress bar
        #[arg(long)]
        progress: bool,

        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Hash individual files and print `<hash>,<path>` lines
    Hash {
        /// Files to hash
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Hash algorithm
        #[arg(short, long, value_enum, default_value_t = Algorithm::Dct)]
        algorithm: Algorithm,
    },

    /// Generate default configuration file
    GenerateConfig {
        /// Path to save configuration file
        #[arg(default_value = "dct-hasher.json")]
        path: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Algorithm {
    Dct,
    Average,
}

impl From<Algorithm> for HashAlgorithm {
    fn from(algorithm: Algorithm) -> Self {
        match algorithm {
            Algorithm::Dct => HashAlgorithm::Dct,
            Algorithm::Average => HashAlgorithm::Average,
        }
    }
}

/// `-v` flags win over the level from a configuration file
fn log_level(verbose: u8, configured: Option<LogLevel>) -> LogLevel {
    match verbose {
        0 => configured.unwrap_or(LogLevel::Info),
        1 => LogLevel::Debug,
        _ => LogLevel::Trace,
    }
}

fn init_logging(log_dir: Option<&PathBuf>, level: LogLevel) -> anyhow::Result<()> {
    let filter: log::LevelFilter = level.into();
    match log_dir {
        Some(dir) => logging::init_logger(dir, filter)
            .with_context(|| format!("Failed to set up logging in {}", dir.display()))?,
        None => env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or(filter.to_string()),
        )
        .init(),
    }
    Ok(())
}

/// Write `<hash>,<path>` for every file to `out`. Failures go to `err` and to
/// the log. Returns how many files failed.
fn hash_files(
    files: &[PathBuf],
    algorithm: HashAlgorithm,
    out: &mut impl Write,
    err: &mut impl Write,
) -> io::Result<usize> {
    let mut failed = 0;
    for path in files {
        match phash_from_file(path, algorithm) {
            Ok(hash) => writeln!(out, "{},{}", hash, path.display())?,
            Err(e) => {
                failed += 1;
                writeln!(err, "{}: {}", path.display(), e)?;
                error!("Failed to hash {}: {}", path.display(), e);
            }
        }
    }
    Ok(failed)
}

fn main() -> Result<(), anyhow::Error> {
    // Parse command line arguments
    let cli = Cli::parse();

    // The config file is read before logging starts so its level applies
    let file_config = match &cli.command {
        Commands::Scan {
            config: Some(config_path),
            ..
        } => Some(Config::from_file(config_path)?),
        _ => None,
    };

    let level = log_level(cli.verbose, file_config.as_ref().map(|c| c.log_level));
    init_logging(cli.log_dir.as_ref(), level)?;

    match cli.command {
        Commands::Scan {
            directory,
            output,
            threads,
            timeout,
            include_hidden,
            progress,
            ..
        } => {
            let mut config = file_config.unwrap_or_default();

            // Override config with command line arguments
            if let Some(output) = output {
                config.output_path = output;
            }
            if let Some(threads) = threads {
                config.threads = threads;
            }
            if timeout.is_some() {
                config.file_timeout_secs = timeout;
            }
            config.include_hidden |= include_hidden;
            config.show_progress |= progress;

            let scanner = BatchScanner::new(config)?;

            info!("Scanning {}...", directory.display());
            let report = scanner
                .scan(&directory)
                .with_context(|| format!("Scan of {} failed", directory.display()))?;

            eprintln!(
                "{} hashed, {} skipped -> {}",
                report.hashed,
                report.skipped.len(),
                report.output_path.display()
            );
            Ok(())
        }

        Commands::Hash { files, algorithm } => {
            hash_files(
                &files,
                algorithm.into(),
                &mut io::stdout().lock(),
                &mut io::stderr().lock(),
            )?;
            Ok(())
        }

        Commands::GenerateConfig { path } => {
            let config = Config::default();
            config.save_to_file(&path)?;
            println!("Configuration file generated at: {}", path.display());
            Ok(())
        }
    }
}
