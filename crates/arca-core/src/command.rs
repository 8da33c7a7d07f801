//! Command types for communication between a frontend and the core.
//!
//! The UI translates user input into [`Command`]s and hands them to
//! [`crate::nav::state::Navigator::dispatch`]; results come back as
//! snapshot updates over the navigator's `watch` channel. This decoupling
//! lets any frontend drive the same core logic.

use std::path::PathBuf;

use crate::nav::sort::SortKey;

/// An action the UI requests the core to perform.
///
/// Commands flow **UI → Core**. The core never creates commands itself.
/// Paths and names arrive untrusted; the core validates them before any
/// filesystem work.
#[derive(Debug, Clone)]
pub enum Command {
    /// Navigate into the directory at the given path.
    Navigate(PathBuf),
    /// Move to the parent directory.
    GoUp,
    /// Re-read the current directory.
    Refresh,
    /// Open the entry at the given path: directories navigate, files are
    /// recorded as recently used and handed to the viewer.
    Open(PathBuf),
    /// Run a recursive filename search from the current directory.
    Search(String),
    /// Abandon the running search and return to the listing.
    CancelSearch,
    /// Change the sort key for the current listing.
    SetSort(SortKey),
    /// Toggle visibility of hidden (dot-prefixed) files.
    ToggleHidden,
    /// Create a file (`is_dir == false`) or directory in the current directory.
    Create { name: String, is_dir: bool },
    /// Rename an entry in place.
    Rename { path: PathBuf, new_name: String },
    /// Delete a file or directory tree (after user confirmation).
    Delete(PathBuf),
    /// Copy an entry into the destination directory.
    Copy { src: PathBuf, target_dir: PathBuf },
    /// Move an entry into the destination directory.
    Move { src: PathBuf, target_dir: PathBuf },
    /// Flip the favorite flag on a recorded path.
    SetFavorite { path: PathBuf, favorite: bool },
    /// Drop one row from the recent list.
    RemoveRecent(PathBuf),
    /// Drop all non-favorite rows from the recent list.
    ClearHistory,
    /// Clear the displayed error after the user has seen it.
    AcknowledgeError,
}
