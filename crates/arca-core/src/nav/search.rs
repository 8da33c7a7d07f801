//! Recursive, cancellable filename search.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{CoreError, CoreResult};
use crate::fs::entry::FileEntry;

/// Shared cancellation token for a running search.
///
/// Cheap to clone; the walker checks it at every directory boundary, so
/// cancellation takes effect before the next directory is read, never
/// mid-entry.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. Idempotent.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Searches `root` recursively for entries whose name contains `query`,
/// case-insensitively.
///
/// An empty or whitespace-only query returns an empty result without
/// touching the filesystem. Unreadable directories are skipped with a
/// warning so one permission error never voids the rest of the results.
/// Symlinked directories are followed at most once each (canonicalized
/// visited set), so link cycles terminate. A directory whose own name
/// matches is included; its children still only appear if they match
/// themselves.
///
/// # Errors
///
/// - [`CoreError::Cancelled`] — the flag was raised; partial results are
///   discarded.
/// - [`CoreError::NotFound`] / [`CoreError::NotADirectory`] — bad root.
pub fn search(root: &Path, query: &str, cancel: &CancelFlag) -> CoreResult<Vec<FileEntry>> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Ok(Vec::new());
    }

    if !root.exists() {
        return Err(CoreError::NotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(CoreError::NotADirectory(root.to_path_buf()));
    }

    let mut results = Vec::new();
    let mut visited = HashSet::new();
    if let Ok(canonical) = root.canonicalize() {
        visited.insert(canonical);
    }
    walk(root, &needle, cancel, &mut visited, &mut results)?;
    Ok(results)
}

fn walk(
    dir: &Path,
    needle: &str,
    cancel: &CancelFlag,
    visited: &mut HashSet<PathBuf>,
    results: &mut Vec<FileEntry>,
) -> CoreResult<()> {
    if cancel.is_cancelled() {
        return Err(CoreError::Cancelled);
    }

    let read_dir = match std::fs::read_dir(dir) {
        Ok(rd) => rd,
        Err(e) => {
            tracing::warn!("skipping unreadable directory: {} ({e})", dir.display());
            return Ok(());
        }
    };

    for entry in read_dir {
        let entry = match entry {
            Ok(e) => e,
            Err(_) => continue,
        };
        let path = entry.path();
        let metadata = match entry.metadata() {
            Ok(m) => m,
            Err(_) => continue,
        };

        let file_entry = FileEntry::new(path.clone(), &metadata);
        if file_entry.name().to_lowercase().contains(needle) {
            results.push(file_entry);
        }

        if path.is_dir() {
            // canonicalize so a symlink loop visits each real dir once
            match path.canonicalize() {
                Ok(canonical) => {
                    if visited.insert(canonical) {
                        walk(&path, needle, cancel, visited, results)?;
                    }
                }
                Err(_) => continue,
            }
        }
    }

    Ok(())
}
