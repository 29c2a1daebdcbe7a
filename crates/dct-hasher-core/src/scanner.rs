//! Batch scanning of a directory into the results log.
//!
//! Every entry directly inside the directory is pushed through the DCT hash
//! pipeline on a rayon pool. Successful hashes are sent to a single writer
//! thread that owns the [`HashLog`], so appends never interleave. Anything that
//! goes wrong with one entry (unreadable file, decode failure, wrong
//! dimensions, panic, timeout) skips that entry only; it is logged and returned
//! in the [`ScanReport`], but never written to the results log.
//!
//! A failure of the results log itself is fatal: remaining work is abandoned
//! and the error is returned.

use crossbeam::channel;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::discovery::list_directory;
use crate::error::{Error, Result};
use crate::logging::{log_file_error, log_hash_error};
use crate::persistence::{HashLog, HashRecord};
use crate::processing::timeout_utils::{catch_panic, execute_with_timeout, extract_panic_info};
use crate::processing::{DctHasher, FileImageSource, ImageResizer, PHash};

// Records buffered between the workers and the writer thread
const WRITER_QUEUE: usize = 256;

/// An entry that could not be hashed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    pub path: PathBuf,
    pub reason: String,
}

/// Result of hashing one directory entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    Hashed(HashRecord),
    Skipped(SkippedEntry),
}

/// Summary of a completed scan
#[derive(Debug, Clone)]
pub struct ScanReport {
    /// Directory that was scanned
    pub directory: PathBuf,
    /// Results log the records were appended to
    pub output_path: PathBuf,
    /// Records appended to the log by this scan
    pub hashed: usize,
    /// Entries that were skipped, with the reason
    pub skipped: Vec<SkippedEntry>,
    pub elapsed: Duration,
}

impl ScanReport {
    /// Entries looked at, hashed or not
    pub fn total(&self) -> usize {
        self.hashed + self.skipped.len()
    }
}

/// Drives the DCT hash pipeline over a directory
pub struct BatchScanner {
    config: Config,
    hasher: DctHasher,
}

impl BatchScanner {
    /// Create a scanner that decodes files with the `image` crate
    pub fn new(config: Config) -> Result<Self> {
        let hasher = DctHasher::new(
            Arc::new(FileImageSource),
            Arc::new(ImageResizer::new(config.resize_filter)),
        );
        Self::with_hasher(config, hasher)
    }

    /// Create a scanner around a custom pipeline
    pub fn with_hasher(config: Config, hasher: DctHasher) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, hasher })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Hash one entry, turning every failure into a skipped outcome
    pub fn hash_entry(&self, path: &Path) -> ScanOutcome {
        match self.compute(path) {
            Ok(hash) => {
                debug!("Hashed '{}' -> {}", path.display(), hash);
                ScanOutcome::Hashed(HashRecord::new(hash, path))
            }
            Err(e) => {
                log_hash_error(path, &e);
                ScanOutcome::Skipped(SkippedEntry {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                })
            }
        }
    }

    fn compute(&self, path: &Path) -> Result<PHash> {
        if !path.is_file() {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "not a regular file",
            )));
        }

        match self.config.file_timeout_secs {
            Some(secs) => {
                let hasher = self.hasher.clone();
                let owned = path.to_path_buf();
                execute_with_timeout(path, Duration::from_secs(secs), move || {
                    hasher.hash_file(&owned)
                })
            }
            None => catch_panic(|| self.hasher.hash_file(path)),
        }
    }

    /// Hash every entry of `directory` and append the results to the log
    pub fn scan<P: AsRef<Path>>(&self, directory: P) -> Result<ScanReport> {
        let directory = directory.as_ref();
        let start = Instant::now();

        let entries = list_directory(directory, self.config.include_hidden)?;
        info!(
            "Found {} entries in {}",
            entries.len(),
            directory.display()
        );

        let log = HashLog::open(&self.config.output_path)?;
        let log_failed = Arc::new(AtomicBool::new(false));
        let (tx, rx) = channel::bounded::<HashRecord>(WRITER_QUEUE);

        let writer_failed = log_failed.clone();
        let writer = thread::Builder::new()
            .name("hash-log-writer".to_string())
            .spawn(move || -> Result<usize> {
                let mut log = log;
                for record in rx {
                    if let Err(e) = log.append(&record) {
                        writer_failed.store(true, Ordering::SeqCst);
                        log_file_error(log.path(), "append", &e);
                        return Err(e);
                    }
                }
                log.finish().map_err(|e| {
                    writer_failed.store(true, Ordering::SeqCst);
                    e
                })
            })?;

        let progress = self.progress_bar(entries.len() as u64);

        let num_threads = self.config.worker_threads();
        info!("Using {} threads for hashing", num_threads);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build()
            .map_err(|e| Error::Unknown(format!("Failed to build thread pool: {}", e)))?;

        let skipped: Vec<SkippedEntry> = pool.install(|| {
            entries
                .par_iter()
                .filter_map(|path| {
                    if log_failed.load(Ordering::Relaxed) {
                        return None;
                    }

                    let outcome = self.hash_entry(path);
                    progress.inc(1);

                    match outcome {
                        ScanOutcome::Hashed(record) => {
                            // The writer only hangs up after a log failure
                            if tx.send(record).is_err() {
                                log_failed.store(true, Ordering::SeqCst);
                            }
                            None
                        }
                        ScanOutcome::Skipped(entry) => Some(entry),
                    }
                })
                .collect()
        });

        // Closing the channel lets the writer drain and flush
        drop(tx);
        let written = writer
            .join()
            .map_err(|panic_err| Error::Unknown(extract_panic_info(panic_err)))??;

        progress.finish_with_message(format!("{} hashed, {} skipped", written, skipped.len()));

        let report = ScanReport {
            directory: directory.to_path_buf(),
            output_path: self.config.output_path.clone(),
            hashed: written,
            skipped,
            elapsed: start.elapsed(),
        };

        info!(
            "Scan of {} completed: {} hashed, {} skipped in {:.2?}",
            directory.display(),
            report.hashed,
            report.skipped.len(),
            report.elapsed
        );

        Ok(report)
    }

    fn progress_bar(&self, len: u64) -> ProgressBar {
        if !self.config.show_progress {
            return ProgressBar::hidden();
        }

        let progress_bar = ProgressBar::new(len);
        let style = ProgressStyle::default_bar()
            .template("[{eta}] {bar:40.cyan/blue} {pos}/{len} ({percent}%) {msg}")
            .map(|style| style.progress_chars("##-"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style);
        progress_bar.set_message("Computing image hashes...");
        progress_bar
    }
}

/// Hash every entry of `directory` into the log at `output` with default settings
pub fn hash_directory<P: AsRef<Path>, Q: AsRef<Path>>(directory: P, output: Q) -> Result<ScanReport> {
    let config = Config {
        output_path: output.as_ref().to_path_buf(),
        ..Config::default()
    };
    BatchScanner::new(config)?.scan(directory)
}
