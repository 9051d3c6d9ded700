use std::collections::HashSet;

/// Marker stream used by container readers to track open-reader counts.
///
/// It lives in the staging directory alongside real artifacts but must
/// never be packed; archives produced by this design are expected to
/// exclude it.
pub const READER_COUNT_PATH: &str = "/.reader.count";

/// Reserved canonical paths excluded from packing.
///
/// The skip list is consulted against each file's canonical relative path
/// while the lookup map is written; matched paths appear neither in the map
/// nor in the stream section. Expansion needs no skip knowledge, since
/// skipped paths never exist in a container.
#[derive(Debug, Clone)]
pub struct SkipList {
    paths: HashSet<String>,
}

impl SkipList {
    /// A skip list with the given canonical paths.
    pub fn new<I, S>(paths: I) -> SkipList
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SkipList {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    /// A skip list that excludes nothing.
    pub fn empty() -> SkipList {
        SkipList {
            paths: HashSet::new(),
        }
    }

    pub fn matches(&self, canonical_path: &str) -> bool {
        self.paths.contains(canonical_path)
    }
}

/// The default exclusion set: exactly the reader-count marker.
impl Default for SkipList {
    fn default() -> SkipList {
        SkipList::new([READER_COUNT_PATH])
    }
}
