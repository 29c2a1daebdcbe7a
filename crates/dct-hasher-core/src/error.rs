use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

/// Custom error types for the dct-hasher library
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The image source could not interpret a file as an image
    #[error("Image decode error: {0}")]
    Decode(#[from] image::ImageError),

    /// A pipeline stage received a grid of the wrong size
    #[error("Unexpected dimensions in {stage}: expected {expected:?}, got {actual:?}")]
    Dimension {
        stage: &'static str,
        expected: (u32, u32),
        actual: (u32, u32),
    },

    /// The results log could not be opened or written
    #[error("Results log {path} failed: {source}")]
    HashLog {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A results log line could not be parsed
    #[error("Malformed record on line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    /// File not found error
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Invalid configuration error
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// Per-file timeout elapsed
    #[error("Hashing {path} timed out after {seconds} seconds")]
    Timeout { path: PathBuf, seconds: u64 },

    /// Unknown error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl Error {
    pub(crate) fn dimension(stage: &'static str, expected: (u32, u32), actual: (u32, u32)) -> Self {
        Error::Dimension {
            stage,
            expected,
            actual,
        }
    }
}
