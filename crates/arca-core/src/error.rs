//! Error types for `arca-core`.
//!
//! All fallible operations in the core library return [`CoreResult<T>`],
//! which is an alias for `Result<T, CoreError>`.

use std::path::PathBuf;

/// Unified error type for all core operations.
///
/// Each variant captures just enough context for the caller to display
/// a meaningful message or take corrective action.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The target path does not exist.
    #[error("path not found: {0}")]
    NotFound(PathBuf),

    /// The process lacks permission to access the path.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// A directory was expected but the path points to a file.
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    /// An absolute path was expected.
    #[error("path is not absolute: {0}")]
    NotAbsolute(PathBuf),

    /// The destination name is already taken.
    #[error("already exists: {0}")]
    AlreadyExists(PathBuf),

    /// A file or directory name is invalid (empty, contains path separators, etc.).
    #[error("invalid name: {0:?}")]
    InvalidName(String),

    /// A recursive operation completed for some entries but not all.
    /// Completed parts are not rolled back.
    #[error("{} item(s) could not be processed", failed.len())]
    PartialFailure {
        /// The sub-paths the operation could not process.
        failed: Vec<PathBuf>,
    },

    /// The destination device ran out of space mid-transfer.
    #[error("insufficient space writing: {0}")]
    InsufficientSpace(PathBuf),

    /// The operation was superseded by a newer one. Never shown to users.
    #[error("operation cancelled")]
    Cancelled,

    /// Failed to parse a TOML configuration file.
    #[error("config parse error: {0}")]
    ConfigParse(String),

    /// The recent-files store failed.
    #[error("store error: {0}")]
    Store(#[from] rusqlite::Error),

    /// An I/O error that doesn't fit a more specific variant.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout `arca-core`.
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Maps an I/O error on `path` to the matching variant.
    pub(crate) fn from_io(err: std::io::Error, path: &std::path::Path) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => CoreError::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => CoreError::PermissionDenied(path.to_path_buf()),
            std::io::ErrorKind::AlreadyExists => CoreError::AlreadyExists(path.to_path_buf()),
            std::io::ErrorKind::StorageFull => CoreError::InsufficientSpace(path.to_path_buf()),
            _ => CoreError::Io(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};

    #[test]
    fn not_found_displays_path() {
        let err = CoreError::NotFound(PathBuf::from("/missing/file"));
        assert_eq!(err.to_string(), "path not found: /missing/file");
    }

    #[test]
    fn permission_denied_displays_path() {
        let err = CoreError::PermissionDenied(PathBuf::from("/secret"));
        assert_eq!(err.to_string(), "permission denied: /secret");
    }

    #[test]
    fn not_a_directory_displays_path() {
        let err = CoreError::NotADirectory(PathBuf::from("/some/file.txt"));
        assert_eq!(err.to_string(), "not a directory: /some/file.txt");
    }

    #[test]
    fn not_absolute_displays_path() {
        let err = CoreError::NotAbsolute(PathBuf::from("relative/path"));
        assert_eq!(err.to_string(), "path is not absolute: relative/path");
    }

    #[test]
    fn invalid_name_displays_message() {
        let err = CoreError::InvalidName("bad/name".to_string());
        assert_eq!(err.to_string(), "invalid name: \"bad/name\"");
    }

    #[test]
    fn partial_failure_counts_paths() {
        let err = CoreError::PartialFailure {
            failed: vec![PathBuf::from("/a"), PathBuf::from("/b")],
        };
        assert_eq!(err.to_string(), "2 item(s) could not be processed");
    }

    #[test]
    fn cancelled_displays_message() {
        let err = CoreError::Cancelled;
        assert_eq!(err.to_string(), "operation cancelled");
    }

    #[test]
    fn io_error_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let core_err: CoreError = io_err.into();
        assert!(matches!(core_err, CoreError::Io(_)));
        assert!(core_err.to_string().contains("gone"));
    }

    #[test]
    fn from_io_classifies_not_found() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = CoreError::from_io(io_err, Path::new("/missing"));
        assert!(matches!(err, CoreError::NotFound(p) if p == Path::new("/missing")));
    }

    #[test]
    fn from_io_classifies_permission_denied() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "no");
        let err = CoreError::from_io(io_err, Path::new("/secret"));
        assert!(matches!(err, CoreError::PermissionDenied(_)));
    }

    #[test]
    fn from_io_classifies_already_exists() {
        let io_err = std::io::Error::new(std::io::ErrorKind::AlreadyExists, "taken");
        let err = CoreError::from_io(io_err, Path::new("/taken"));
        assert!(matches!(err, CoreError::AlreadyExists(_)));
    }

    #[test]
    fn core_result_err() {
        let result: CoreResult<i32> = Err(CoreError::Cancelled);
        assert!(result.is_err());
    }

    #[test]
    fn error_is_debug() {
        let err = CoreError::NotFound(PathBuf::from("/test"));
        let debug = format!("{:?}", err);
        assert!(debug.contains("NotFound"));
    }
}
