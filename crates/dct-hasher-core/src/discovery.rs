use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::error::{Error, Result};

/// List the entries directly inside `directory`, sorted by name.
///
/// Paths are `directory.join(name)`, exactly as discovered. Sub-directories are
/// listed too; it is up to the caller to decide what to do with them. Entries
/// whose name starts with a dot are left out unless `include_hidden` is set.
pub fn list_directory<P: AsRef<Path>>(directory: P, include_hidden: bool) -> Result<Vec<PathBuf>> {
    let directory = directory.as_ref();

    if !directory.is_dir() {
        return Err(Error::FileNotFound(directory.to_path_buf()));
    }

    let entries = WalkDir::new(directory)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| match e {
            Ok(entry) => Some(entry),
            Err(err) => {
                log::warn!("Skipping unreadable entry in {}: {}", directory.display(), err);
                None
            }
        })
        .filter(|e| include_hidden || !is_hidden(e))
        .map(|e| e.into_path())
        .collect();

    Ok(entries)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().as_encoded_bytes().starts_with(b".")
}
