//! Scratch-area helpers: collision-free staging names and best-effort
//! teardown of staging trees.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Generates unique scratch file/folder names.
///
/// Name selection is a single critical section: the mutex owns the RNG, so
/// two threads of one process can never race to the same candidate name.
/// Cross-process uniqueness rests on the probabilistic suffix alone.
pub struct ScratchNamer {
    rng: Mutex<StdRng>,
}

impl ScratchNamer {
    pub fn new() -> ScratchNamer {
        ScratchNamer {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Derive a name of the form `base_YYYY_MM_DD_HH_MM_SS` that does not
    /// exist on the filesystem, appending random integer suffixes until a
    /// free name is found. Never fails.
    pub fn unique_name(&self, base: &str) -> String {
        let mut rng = self.rng.lock();

        let stamp = Local::now().format("%Y_%m_%d_%H_%M_%S");
        let mut name = format!("{base}_{stamp}");
        while Path::new(&name).exists() {
            let suffix: i32 = rng.gen();
            let _ = write!(name, "{suffix}");
        }
        name
    }
}

impl Default for ScratchNamer {
    fn default() -> ScratchNamer {
        ScratchNamer::new()
    }
}

static NAMER: Lazy<ScratchNamer> = Lazy::new(ScratchNamer::new);

/// [`ScratchNamer::unique_name`] on the process-wide generator.
pub fn generate_unique_name(base: &str) -> String {
    NAMER.unique_name(base)
}

/// Delete `path` and everything under it, post-order.
///
/// Best-effort: failures on individual nodes are logged at debug level and
/// skipped, and nothing is reported to the caller. A locked file leaves a
/// partially-deleted tree behind. A missing `path` is a no-op. Symlinks are
/// removed, never followed. Traversal uses an explicit stack, so tree depth
/// is not bounded by the call stack.
pub fn delete_all(path: impl AsRef<Path>) {
    // (node, children already pushed)
    let mut stack: Vec<(PathBuf, bool)> = vec![(path.as_ref().to_path_buf(), false)];

    while let Some((node, expanded)) = stack.pop() {
        let metadata = match fs::symlink_metadata(&node) {
            Ok(metadata) => metadata,
            Err(_) => continue,
        };

        if !metadata.is_dir() {
            if let Err(err) = fs::remove_file(&node) {
                debug!(path = %node.display(), %err, "could not delete file");
            }
        } else if expanded {
            // Children were handled on earlier iterations.
            if let Err(err) = fs::remove_dir(&node) {
                debug!(path = %node.display(), %err, "could not delete directory");
            }
        } else {
            stack.push((node.clone(), true));
            match fs::read_dir(&node) {
                Ok(listing) => {
                    for child in listing.flatten() {
                        stack.push((child.path(), false));
                    }
                }
                Err(err) => {
                    debug!(path = %node.display(), %err, "could not list directory");
                }
            }
        }
    }
}
