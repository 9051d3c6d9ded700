use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::trace;

/// Enumerate every regular file under `root`, depth-first.
///
/// Directories are never entries themselves; a missing or non-directory
/// root yields an empty list. Files appear in platform directory-listing
/// order, unsorted, with subdirectories descended via an explicit work
/// stack, so arbitrarily deep trees cannot exhaust the call stack.
///
/// Metadata is resolved through symlinks, so a link to a regular file is
/// enumerated like the file itself; entries whose metadata cannot be read
/// (dangling links, permission holes) are skipped. Failures listing a
/// directory propagate.
pub fn enumerate_files(root: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    if !root.is_dir() {
        return Ok(files);
    }

    let mut pending = vec![root.to_path_buf()];
    while let Some(dir) = pending.pop() {
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            let metadata = match fs::metadata(&path) {
                Ok(metadata) => metadata,
                Err(err) => {
                    trace!(path = %path.display(), %err, "skipping unreadable entry");
                    continue;
                }
            };

            if metadata.is_dir() {
                pending.push(path);
            } else if metadata.is_file() {
                files.push(path);
            }
        }
    }

    Ok(files)
}
