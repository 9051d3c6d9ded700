//! Conversions between platform paths and the canonical archive form.
//!
//! Stream paths inside a container are platform neutral: forward-slash
//! separated and prefixed with `/`. These helpers translate between that
//! form and the platform's own separator, and compute relative paths
//! against a staging root. All of them are pure string manipulation; none
//! touch the filesystem.

use std::path::{Path, PathBuf, MAIN_SEPARATOR};

/// Replace the platform separator with `/`.
pub fn to_canonical(path: &str) -> String {
    path.replace(MAIN_SEPARATOR, "/")
}

/// Replace `/` with the platform separator.
pub fn to_platform(path: &str) -> String {
    path.replace('/', MAIN_SEPARATOR.to_string().as_str())
}

/// Compute `full`'s canonical path relative to `root`.
///
/// When `full` does not live under `root` it is passed through unchanged
/// and treated as already relative. This permissive fallback is part of the
/// archive contract: mismatched roots do not fail, they produce a
/// canonicalized form of whatever was passed in. Callers mixing up roots
/// get a plausible-looking stream path instead of an error.
///
/// The result always starts with `/`.
pub fn relativize(root: &Path, full: &Path) -> String {
    let relative = full.strip_prefix(root).unwrap_or(full);
    let canonical = to_canonical(&relative.to_string_lossy());

    if canonical.starts_with('/') {
        canonical
    } else {
        format!("/{canonical}")
    }
}

/// Compose a platform path for `relative` under `root`.
///
/// `relative` may use either separator; one leading separator is stripped
/// before joining. No existence checks are performed.
pub fn resolve(root: &Path, relative: &str) -> PathBuf {
    let platform = to_platform(relative);
    let trimmed = platform
        .strip_prefix(MAIN_SEPARATOR)
        .unwrap_or(platform.as_str());
    root.join(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_is_identity_for_forward_slashes() {
        assert_eq!(to_canonical("/a/b.txt"), "/a/b.txt");
    }

    #[test]
    fn relativize_strips_root() {
        let rel = relativize(Path::new("/stage/run1"), Path::new("/stage/run1/sub/b.txt"));
        assert_eq!(rel, "/sub/b.txt");
    }

    #[test]
    fn relativize_root_itself_is_slash() {
        // Packing never asks for the root, but the form should stay sane
        let rel = relativize(Path::new("/stage/run1"), Path::new("/stage/run1"));
        assert_eq!(rel, "/");
    }

    #[test]
    fn relativize_falls_back_on_foreign_path() {
        // Not under the root: passed through, canonicalized, slash-prefixed
        let rel = relativize(Path::new("/stage/run1"), Path::new("/elsewhere/c.txt"));
        assert_eq!(rel, "/elsewhere/c.txt");

        let rel = relativize(Path::new("/stage/run1"), Path::new("already/relative.txt"));
        assert_eq!(rel, "/already/relative.txt");
    }

    #[test]
    fn resolve_joins_under_root() {
        let full = resolve(Path::new("/out"), "/sub/b.txt");
        assert_eq!(full, Path::new("/out/sub/b.txt"));
    }

    #[test]
    fn resolve_without_leading_separator() {
        let full = resolve(Path::new("/out"), "sub/b.txt");
        assert_eq!(full, Path::new("/out/sub/b.txt"));
    }

    #[test]
    fn resolve_then_relativize_roundtrip() {
        let root = Path::new("/stage/run1");
        let rel = "/content/page1.dat";
        assert_eq!(relativize(root, &resolve(root, rel)), rel);
    }
}
