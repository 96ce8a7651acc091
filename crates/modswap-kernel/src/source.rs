//! Loader source-cache port
//!
//! The host loader keeps compiled representations of module sources keyed by
//! resolved file path. Purging an entry forces the next load of that file to
//! re-read and re-execute from disk.

use std::io;
use std::path::Path;

/// Purge capability over the loader's compiled-source cache.
pub trait SourceCache {
    /// Drop any cached compiled representation for `path`.
    ///
    /// Fails for files that were never cached; callers walking a tree treat
    /// that as non-actionable and continue.
    fn purge(&mut self, path: &Path) -> io::Result<()>;
}
