use log::debug;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use super::models::HashRecord;
use crate::error::{Error, Result};

/// Append-only results log.
///
/// The file is opened once, in append mode, and every record becomes one line.
/// Buffered data is flushed by [`HashLog::finish`], and on drop for any other
/// exit path.
pub struct HashLog {
    path: PathBuf,
    writer: BufWriter<File>,
    written: usize,
}

impl HashLog {
    /// Open (creating if needed) the log at `path` for appending
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| Error::HashLog {
                path: path.clone(),
                source,
            })?;

        debug!("Opened results log {}", path.display());

        Ok(Self {
            path,
            writer: BufWriter::new(file),
            written: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Records appended through this handle
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn append(&mut self, record: &HashRecord) -> Result<()> {
        record
            .write_to(&mut self.writer)
            .map_err(|source| Error::HashLog {
                path: self.path.clone(),
                source,
            })?;
        self.written += 1;
        Ok(())
    }

    /// Flush and close, returning the number of records written
    pub fn finish(mut self) -> Result<usize> {
        self.writer.flush().map_err(|source| Error::HashLog {
            path: self.path.clone(),
            source,
        })?;
        debug!(
            "Closed results log {} after {} records",
            self.path.display(),
            self.written
        );
        Ok(self.written)
    }
}

/// Read every record from a results log.
///
/// Lines are split on raw bytes so paths that are not valid UTF-8 read back
/// unchanged.
pub fn read_hash_log<P: AsRef<Path>>(path: P) -> Result<Vec<HashRecord>> {
    let file = File::open(path.as_ref())?;

    BufReader::new(file)
        .split(b'\n')
        .enumerate()
        .filter(|(_, line)| !matches!(line, Ok(l) if l.is_empty()))
        .map(|(i, line)| HashRecord::parse_line(&line?, i + 1))
        .collect()
}
