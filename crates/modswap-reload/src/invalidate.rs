//! Compiled-source cache invalidation
//!
//! After a module is unloaded, its compiled sources must be purged from the
//! host loader's cache, otherwise the next load would reuse the old in-memory
//! representation instead of re-reading from disk.

use std::path::Path;

use tracing::{debug, trace};
use walkdir::WalkDir;

use modswap_kernel::SourceCache;

/// Recursively purge every file under `root` from the loader cache.
///
/// Each file is purged under its resolved identity (symlinks followed).
/// Files that were never cached are not actionable: individual purge
/// failures and unreadable directory entries are skipped and the traversal
/// continues. The only observable effect is that a subsequent load of the
/// same tree re-reads from the filesystem.
pub fn invalidate_tree(root: &Path, cache: &mut dyn SourceCache) {
    let mut purged = 0usize;
    for entry in WalkDir::new(root).into_iter().filter_map(Result::ok) {
        if !entry.file_type().is_file() {
            continue;
        }
        let resolved = entry
            .path()
            .canonicalize()
            .unwrap_or_else(|_| entry.path().to_path_buf());
        match cache.purge(&resolved) {
            Ok(()) => purged += 1,
            Err(e) => trace!(path = %resolved.display(), "purge skipped: {e}"),
        }
    }
    debug!(root = %root.display(), purged, "invalidated cached module sources");
}
