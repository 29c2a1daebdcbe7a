//! Core functionality for computing perceptual image hashes.
//!
//! This library provides:
//! - A DCT-based 64-bit perceptual hash (resize, greyscale, 2D DCT-II, bit packing)
//! - A simpler average hash over an 8x8 thumbnail
//! - A batch scanner that hashes every file of a directory into an append-only
//!   results log, skipping files that cannot be hashed
//!
//! ```no_run
//! use dct_hasher_core::{BatchScanner, Config};
//!
//! let scanner = BatchScanner::new(Config::default())?;
//! let report = scanner.scan("photos")?;
//! println!("{} hashed, {} skipped", report.hashed, report.skipped.len());
//! # Ok::<(), dct_hasher_core::Error>(())
//! ```

// -- Internal Modules --
mod error;

// -- Public Re-exports --
pub use config::{Config, LogLevel, ResizeFilter, DEFAULT_OUTPUT};
pub use error::{Error, Result};
pub use persistence::{read_hash_log, HashLog, HashRecord};
pub use processing::{
    phash_from_file, phash_from_img, AverageHasher, DctHasher, HashAlgorithm, PHash,
};
pub use scanner::{hash_directory, BatchScanner, ScanOutcome, ScanReport, SkippedEntry};

// -- Public Modules --
pub mod config;
pub mod discovery;
pub mod logging;
pub mod persistence;
pub mod processing;
pub mod scanner;
