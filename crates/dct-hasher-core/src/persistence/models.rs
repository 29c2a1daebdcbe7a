use std::borrow::Cow;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::processing::types::PHash;

/// One line of the results log: a hash and the path it was computed from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashRecord {
    /// Perceptual hash of the image
    pub hash: PHash,

    /// Path as discovered during the scan, not normalized
    pub path: PathBuf,
}

impl HashRecord {
    pub fn new(hash: PHash, path: impl Into<PathBuf>) -> Self {
        Self {
            hash,
            path: path.into(),
        }
    }

    /// Write `<decimal hash>,<path>\n`.
    ///
    /// On Unix the path goes out as its raw bytes, so names that are not
    /// valid UTF-8 are logged unchanged.
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        write!(out, "{},", self.hash)?;
        out.write_all(&path_bytes(&self.path))?;
        out.write_all(b"\n")
    }

    /// The line [`HashRecord::write_to`] produces
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut line = Vec::new();
        // Writing into a Vec cannot fail
        let _ = self.write_to(&mut line);
        line
    }

    /// Parse a line written by [`HashRecord::write_to`].
    ///
    /// The path is everything after the first comma, so paths containing
    /// commas survive.
    pub fn parse_line(line: &[u8], line_number: usize) -> Result<Self> {
        let line = line.strip_suffix(b"\n").unwrap_or(line);

        let comma = line
            .iter()
            .position(|&b| b == b',')
            .ok_or_else(|| Error::MalformedRecord {
                line: line_number,
                reason: "missing ',' separator".to_string(),
            })?;
        let (hash, path) = (&line[..comma], &line[comma + 1..]);

        let hash = String::from_utf8_lossy(hash);
        let hash = hash.parse::<PHash>().map_err(|e| Error::MalformedRecord {
            line: line_number,
            reason: format!("invalid hash '{}': {}", hash, e),
        })?;

        if path.is_empty() {
            return Err(Error::MalformedRecord {
                line: line_number,
                reason: "empty path".to_string(),
            });
        }

        Ok(Self::new(hash, path_from_bytes(path)))
    }
}

#[cfg(unix)]
fn path_bytes(path: &Path) -> Cow<'_, [u8]> {
    use std::os::unix::ffi::OsStrExt;
    Cow::Borrowed(path.as_os_str().as_bytes())
}

#[cfg(not(unix))]
fn path_bytes(path: &Path) -> Cow<'_, [u8]> {
    Cow::Owned(path.display().to_string().into_bytes())
}

#[cfg(unix)]
fn path_from_bytes(bytes: &[u8]) -> PathBuf {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;
    PathBuf::from(OsStr::from_bytes(bytes))
}

#[cfg(not(unix))]
fn path_from_bytes(bytes: &[u8]) -> PathBuf {
    PathBuf::from(String::from_utf8_lossy(bytes).into_owned())
}
