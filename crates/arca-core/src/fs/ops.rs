//! Directory reading and structural file operations.
//!
//! All functions here are synchronous and are expected to run on a blocking
//! worker (see [`crate::nav::state`]); none of them is called on the
//! interactive thread directly.

use std::path::{Path, PathBuf};

use crate::error::{CoreError, CoreResult};
use crate::fs::entry::FileEntry;

/// Reads the immediate contents of a directory and returns them as
/// [`FileEntry`] values in the default order: directories first, then
/// case-insensitive name ascending.
///
/// The default order holds even when no sort key is applied afterwards;
/// use [`crate::nav::sort::sort_entries`] for the other orderings.
/// Children whose metadata cannot be read are skipped.
///
/// # Errors
///
/// - [`CoreError::NotFound`] — the path does not exist.
/// - [`CoreError::NotADirectory`] — the path is not a directory.
/// - [`CoreError::PermissionDenied`] — read access is denied.
/// - [`CoreError::Io`] — any other I/O error.
pub fn read_directory(path: &Path) -> CoreResult<Vec<FileEntry>> {
    if !path.exists() {
        return Err(CoreError::NotFound(path.to_path_buf()));
    }
    if !path.is_dir() {
        return Err(CoreError::NotADirectory(path.to_path_buf()));
    }

    let read_dir = std::fs::read_dir(path).map_err(|e| CoreError::from_io(e, path))?;

    let mut entries = Vec::new();
    for dir_entry in read_dir {
        let dir_entry = match dir_entry {
            Ok(e) => e,
            Err(_) => continue,
        };
        let metadata = match dir_entry.metadata() {
            Ok(m) => m,
            Err(_) => continue,
        };
        entries.push(FileEntry::new(dir_entry.path(), &metadata));
    }

    entries.sort_by(|a, b| {
        b.is_dir()
            .cmp(&a.is_dir())
            .then_with(|| a.name().to_lowercase().cmp(&b.name().to_lowercase()))
    });

    Ok(entries)
}

/// Creates a new empty file or directory named `name` under `parent`.
///
/// No silent renaming: an occupied name is an error.
///
/// # Errors
///
/// - [`CoreError::InvalidName`] — empty/whitespace name, `.`/`..`, or separators.
/// - [`CoreError::AlreadyExists`] — the name is taken.
/// - [`CoreError::PermissionDenied`] — the parent is not writable.
pub fn create_entry(parent: &Path, name: &str, is_dir: bool) -> CoreResult<FileEntry> {
    if !is_valid_filename(name) {
        return Err(CoreError::InvalidName(name.to_string()));
    }

    let target = parent.join(name);
    if is_dir {
        std::fs::create_dir(&target).map_err(|e| CoreError::from_io(e, &target))?;
    } else {
        // create_new reports AlreadyExists atomically
        std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
            .map_err(|e| CoreError::from_io(e, &target))?;
    }

    let metadata = std::fs::symlink_metadata(&target)?;
    Ok(FileEntry::new(target, &metadata))
}

/// Renames a file or directory within its parent directory.
///
/// Single-entity operation: it aborts with no partial state, and an
/// occupied destination name is an error rather than a silent rename.
///
/// # Errors
///
/// - [`CoreError::NotFound`] — `path` does not exist.
/// - [`CoreError::InvalidName`] — `new_name` is invalid.
/// - [`CoreError::AlreadyExists`] — the new name is taken.
pub fn rename_entry(path: &Path, new_name: &str) -> CoreResult<FileEntry> {
    // symlink_metadata: does not follow symlinks, avoids TOCTOU
    if std::fs::symlink_metadata(path).is_err() {
        return Err(CoreError::NotFound(path.to_path_buf()));
    }
    if !is_valid_filename(new_name) {
        return Err(CoreError::InvalidName(new_name.to_string()));
    }

    let parent = path
        .parent()
        .ok_or_else(|| CoreError::InvalidName("no parent directory".to_string()))?;
    let new_path = parent.join(new_name);
    if std::fs::symlink_metadata(&new_path).is_ok() {
        return Err(CoreError::AlreadyExists(new_path));
    }

    std::fs::rename(path, &new_path).map_err(|e| CoreError::from_io(e, path))?;

    let metadata = std::fs::symlink_metadata(&new_path)?;
    Ok(FileEntry::new(new_path, &metadata))
}

/// Copies a file or directory into `target_dir`, returning the entry
/// created there.
///
/// If the source name is taken in the destination, a free name is chosen
/// by appending `_<n>` before the extension — the only place silent
/// renaming happens. Directories are copied by creating the destination
/// directory and then copying children depth-first, streaming via
/// `read_dir`; the first child error aborts the copy, leaving already
/// copied children in place (best-effort, no rollback). File contents are
/// staged under a temporary name and committed by rename, so a truncated
/// transfer is never visible under the final name.
///
/// # Errors
///
/// - [`CoreError::NotFound`] — `src` does not exist.
/// - [`CoreError::NotADirectory`] — `target_dir` is not a directory.
/// - [`CoreError::PermissionDenied`] / [`CoreError::InsufficientSpace`] /
///   [`CoreError::Io`] — transfer failures.
pub fn copy_entry(src: &Path, target_dir: &Path) -> CoreResult<FileEntry> {
    let meta = std::fs::symlink_metadata(src).map_err(|e| CoreError::from_io(e, src))?;
    if !target_dir.is_dir() {
        return Err(CoreError::NotADirectory(target_dir.to_path_buf()));
    }

    let name = src
        .file_name()
        .ok_or_else(|| CoreError::InvalidName(src.display().to_string()))?;
    let dest = free_target_name(target_dir, Path::new(name));

    if meta.is_dir() {
        copy_dir_recursive(src, &dest)?;
    } else if meta.is_symlink() {
        copy_symlink(src, &dest)?;
    } else {
        copy_file_staged(src, &dest)?;
    }

    let metadata = std::fs::symlink_metadata(&dest)?;
    Ok(FileEntry::new(dest, &metadata))
}

/// Moves a file or directory into `target_dir`, returning the entry at
/// its new location.
///
/// Attempts a fast rename first. If that fails (e.g. cross-device), falls
/// back to copy + delete of the source; if the source then cannot be
/// deleted the operation fails with [`CoreError::PartialFailure`] naming
/// the leftover source, never reporting a silent duplicate as success.
/// Destination collisions are resolved like [`copy_entry`].
pub fn move_entry(src: &Path, target_dir: &Path) -> CoreResult<FileEntry> {
    if std::fs::symlink_metadata(src).is_err() {
        return Err(CoreError::NotFound(src.to_path_buf()));
    }
    if !target_dir.is_dir() {
        return Err(CoreError::NotADirectory(target_dir.to_path_buf()));
    }

    let name = src
        .file_name()
        .ok_or_else(|| CoreError::InvalidName(src.display().to_string()))?;
    let dest = free_target_name(target_dir, Path::new(name));

    if std::fs::rename(src, &dest).is_err() {
        move_by_copy(src, &dest)?;
    }

    let metadata = std::fs::symlink_metadata(&dest)?;
    Ok(FileEntry::new(dest, &metadata))
}

/// Deletes a file or directory.
///
/// Directories are deleted bottom-up, best-effort: a child that fails to
/// delete is recorded and the remaining children are still attempted; a
/// directory with anything left inside it is kept in place. Completed
/// deletions are not rolled back.
///
/// # Errors
///
/// - [`CoreError::NotFound`] — `path` does not exist.
/// - [`CoreError::PartialFailure`] — some children could not be deleted;
///   carries their paths.
pub fn delete_entry(path: &Path) -> CoreResult<()> {
    let meta = std::fs::symlink_metadata(path).map_err(|e| CoreError::from_io(e, path))?;

    if meta.is_dir() {
        let mut failed = Vec::new();
        delete_dir_recursive(path, &mut failed);
        if !failed.is_empty() {
            return Err(CoreError::PartialFailure { failed });
        }
    } else {
        // regular files and symlinks alike
        std::fs::remove_file(path).map_err(|e| CoreError::from_io(e, path))?;
    }

    Ok(())
}

/// Picks the first free destination path for `file_name` inside `dir`.
///
/// The original name is preferred; occupied names get `_<n>` appended
/// before the extension, with `n` starting at 1.
fn free_target_name(dir: &Path, file_name: &Path) -> PathBuf {
    let candidate = dir.join(file_name);
    if std::fs::symlink_metadata(&candidate).is_err() {
        return candidate;
    }

    let stem = file_name
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = file_name
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    let mut counter = 1usize;
    loop {
        let candidate = dir.join(format!("{stem}_{counter}{ext}"));
        if std::fs::symlink_metadata(&candidate).is_err() {
            return candidate;
        }
        counter += 1;
    }
}

fn copy_dir_recursive(src: &Path, dest: &Path) -> CoreResult<()> {
    std::fs::create_dir_all(dest).map_err(|e| CoreError::from_io(e, dest))?;

    let read_dir = std::fs::read_dir(src).map_err(|e| CoreError::from_io(e, src))?;
    for entry in read_dir {
        let entry = entry.map_err(CoreError::Io)?;
        let entry_path = entry.path();
        let target = dest.join(entry.file_name());

        // entry.file_type() does not follow symlinks
        let ft = entry.file_type().map_err(CoreError::Io)?;
        if ft.is_symlink() {
            copy_symlink(&entry_path, &target)?;
        } else if ft.is_dir() {
            copy_dir_recursive(&entry_path, &target)?;
        } else {
            copy_file_staged(&entry_path, &target)?;
        }
    }

    Ok(())
}

/// Copies `src` to `dest` by writing to a `.part` sibling and renaming it
/// into place, so interrupted transfers never leave a truncated file under
/// the final name.
fn copy_file_staged(src: &Path, dest: &Path) -> CoreResult<()> {
    let tmp = staging_path(dest);

    let result = (|| -> std::io::Result<()> {
        let mut reader = std::fs::File::open(src)?;
        let mut writer = std::fs::File::create(&tmp)?;
        std::io::copy(&mut reader, &mut writer)?;
        writer.sync_all()
    })();

    if let Err(e) = result {
        let _ = std::fs::remove_file(&tmp);
        let at = if src.exists() { dest } else { src };
        return Err(CoreError::from_io(e, at));
    }

    std::fs::rename(&tmp, dest).map_err(|e| CoreError::from_io(e, dest))
}

fn staging_path(dest: &Path) -> PathBuf {
    let name = dest
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    dest.with_file_name(format!(".{name}.part"))
}

fn copy_symlink(src: &Path, dest: &Path) -> CoreResult<()> {
    let link_target = std::fs::read_link(src).map_err(|e| CoreError::from_io(e, src))?;
    #[cfg(unix)]
    std::os::unix::fs::symlink(&link_target, dest).map_err(|e| CoreError::from_io(e, dest))?;
    #[cfg(not(unix))]
    copy_file_staged(src, dest)?;
    Ok(())
}

/// Cross-device move fallback: copy `src` to `dest`, then delete the
/// source. A source that survives the delete is surfaced as
/// [`CoreError::PartialFailure`] so the caller never sees a doubled file
/// reported as success.
fn move_by_copy(src: &Path, dest: &Path) -> CoreResult<()> {
    let meta = std::fs::symlink_metadata(src).map_err(|e| CoreError::from_io(e, src))?;

    if meta.is_dir() {
        copy_dir_recursive(src, dest)?;
    } else if meta.is_symlink() {
        copy_symlink(src, dest)?;
    } else {
        copy_file_staged(src, dest)?;
    }

    if let Err(e) = delete_entry(src) {
        tracing::warn!(
            "move fallback left source in place: {} ({e})",
            src.display()
        );
        return Err(CoreError::PartialFailure {
            failed: vec![src.to_path_buf()],
        });
    }

    Ok(())
}

fn delete_dir_recursive(dir: &Path, failed: &mut Vec<PathBuf>) {
    let read_dir = match std::fs::read_dir(dir) {
        Ok(rd) => rd,
        Err(e) => {
            tracing::warn!("cannot read directory for deletion: {} ({e})", dir.display());
            failed.push(dir.to_path_buf());
            return;
        }
    };

    let failures_before = failed.len();
    for entry in read_dir {
        let entry = match entry {
            Ok(e) => e,
            Err(_) => continue,
        };
        let path = entry.path();
        let is_dir = entry
            .file_type()
            .map(|ft| ft.is_dir() && !ft.is_symlink())
            .unwrap_or(false);

        if is_dir {
            delete_dir_recursive(&path, failed);
        } else if let Err(e) = std::fs::remove_file(&path) {
            tracing::warn!("failed to delete: {} ({e})", path.display());
            failed.push(path);
        }
    }

    // Only a fully emptied directory can be removed itself.
    if failed.len() == failures_before {
        if let Err(e) = std::fs::remove_dir(dir) {
            tracing::warn!("failed to delete directory: {} ({e})", dir.display());
            failed.push(dir.to_path_buf());
        }
    }
}

fn is_valid_filename(name: &str) -> bool {
    if name.trim().is_empty() || name == "." || name == ".." {
        return false;
    }
    if name.contains('/') || name.contains('\0') {
        return false;
    }
    #[cfg(windows)]
    if name.contains('\\') || name.contains(':') {
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    // --- read_directory tests ---

    #[test]
    fn read_directory_returns_entries() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("file1.txt"), "hello").unwrap();
        fs::write(tmp.path().join("file2.txt"), "world").unwrap();
        fs::create_dir(tmp.path().join("subdir")).unwrap();

        let entries = read_directory(tmp.path()).unwrap();

        assert_eq!(entries.len(), 3);
        let names: Vec<&str> = entries.iter().map(|e| e.name()).collect();
        assert!(names.contains(&"file1.txt"));
        assert!(names.contains(&"file2.txt"));
        assert!(names.contains(&"subdir"));
    }

    #[test]
    fn read_directory_default_order_dirs_first_then_ci_name() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("Banana.txt"), "").unwrap();
        fs::write(tmp.path().join("apple.txt"), "").unwrap();
        fs::create_dir(tmp.path().join("zeta")).unwrap();
        fs::create_dir(tmp.path().join("Alpha")).unwrap();

        let entries = read_directory(tmp.path()).unwrap();

        let names: Vec<&str> = entries.iter().map(|e| e.name()).collect();
        assert_eq!(names, vec!["Alpha", "zeta", "apple.txt", "Banana.txt"]);
    }

    #[test]
    fn read_directory_empty() {
        let tmp = TempDir::new().unwrap();
        let entries = read_directory(tmp.path()).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn read_directory_nonexistent_returns_not_found() {
        let result = read_directory(Path::new("/nonexistent/path/that/does/not/exist"));
        assert!(matches!(result.unwrap_err(), CoreError::NotFound(_)));
    }

    #[test]
    fn read_directory_on_file_returns_not_a_directory() {
        let tmp = TempDir::new().unwrap();
        let file_path = tmp.path().join("not_a_dir.txt");
        fs::write(&file_path, "content").unwrap();

        let result = read_directory(&file_path);
        assert!(matches!(result.unwrap_err(), CoreError::NotADirectory(_)));
    }

    #[test]
    fn read_directory_is_not_recursive() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("subdir")).unwrap();
        fs::write(tmp.path().join("subdir").join("nested.txt"), "").unwrap();
        fs::write(tmp.path().join("top.txt"), "").unwrap();

        let entries = read_directory(tmp.path()).unwrap();

        let names: Vec<&str> = entries.iter().map(|e| e.name()).collect();
        assert_eq!(names, vec!["subdir", "top.txt"]);
    }

    #[test]
    fn read_directory_includes_hidden_files() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".hidden"), "").unwrap();
        fs::write(tmp.path().join("visible.txt"), "").unwrap();

        let entries = read_directory(tmp.path()).unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries.iter().filter(|e| e.is_hidden()).count(), 1);
    }

    // --- create_entry tests ---

    #[test]
    fn create_entry_file() {
        let tmp = TempDir::new().unwrap();

        let entry = create_entry(tmp.path(), "new.txt", false).unwrap();

        assert_eq!(entry.name(), "new.txt");
        assert!(!entry.is_dir());
        assert!(tmp.path().join("new.txt").exists());
    }

    #[test]
    fn create_entry_directory() {
        let tmp = TempDir::new().unwrap();

        let entry = create_entry(tmp.path(), "newdir", true).unwrap();

        assert!(entry.is_dir());
        assert!(tmp.path().join("newdir").is_dir());
    }

    #[test]
    fn create_entry_existing_name_fails() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("taken.txt"), "").unwrap();

        let result = create_entry(tmp.path(), "taken.txt", false);
        assert!(matches!(result.unwrap_err(), CoreError::AlreadyExists(_)));
    }

    #[test]
    fn create_entry_existing_dir_name_fails() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("taken")).unwrap();

        let result = create_entry(tmp.path(), "taken", true);
        assert!(matches!(result.unwrap_err(), CoreError::AlreadyExists(_)));
    }

    #[test]
    fn create_entry_rejects_empty_and_whitespace_names() {
        let tmp = TempDir::new().unwrap();
        for bad in ["", "   ", "\t", ".", "..", "a/b", "a\0b"] {
            let result = create_entry(tmp.path(), bad, false);
            assert!(
                matches!(result.unwrap_err(), CoreError::InvalidName(_)),
                "expected InvalidName for {bad:?}"
            );
        }
    }

    // --- rename_entry tests ---

    #[test]
    fn rename_entry_file() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("old_name.txt");
        fs::write(&file, "content").unwrap();

        let entry = rename_entry(&file, "new_name.txt").unwrap();

        assert!(!file.exists());
        assert_eq!(entry.name(), "new_name.txt");
        assert_eq!(
            fs::read_to_string(tmp.path().join("new_name.txt")).unwrap(),
            "content"
        );
    }

    #[test]
    fn rename_entry_directory() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("old_dir");
        fs::create_dir(&dir).unwrap();

        let entry = rename_entry(&dir, "new_dir").unwrap();

        assert!(!dir.exists());
        assert!(entry.is_dir());
        assert!(tmp.path().join("new_dir").is_dir());
    }

    #[test]
    fn rename_entry_nonexistent_returns_not_found() {
        let tmp = TempDir::new().unwrap();
        let result = rename_entry(&tmp.path().join("nope.txt"), "new.txt");
        assert!(matches!(result.unwrap_err(), CoreError::NotFound(_)));
    }

    #[test]
    fn rename_entry_to_taken_name_fails_without_partial_state() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("a.txt");
        fs::write(&file, "a").unwrap();
        fs::write(tmp.path().join("b.txt"), "b").unwrap();

        let result = rename_entry(&file, "b.txt");

        assert!(matches!(result.unwrap_err(), CoreError::AlreadyExists(_)));
        assert_eq!(fs::read_to_string(&file).unwrap(), "a");
        assert_eq!(fs::read_to_string(tmp.path().join("b.txt")).unwrap(), "b");
    }

    #[test]
    fn rename_entry_invalid_names() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("file.txt");
        fs::write(&file, "").unwrap();

        for bad in ["", "  ", ".", "..", "bad/name", "bad\0name"] {
            let result = rename_entry(&file, bad);
            assert!(matches!(result.unwrap_err(), CoreError::InvalidName(_)));
        }
    }

    #[test]
    fn rename_entry_unicode_name() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("file.txt");
        fs::write(&file, "hello").unwrap();

        let entry = rename_entry(&file, "파일.txt").unwrap();

        assert_eq!(entry.name(), "파일.txt");
        assert_eq!(
            fs::read_to_string(tmp.path().join("파일.txt")).unwrap(),
            "hello"
        );
    }

    // --- copy_entry tests ---

    #[test]
    fn copy_entry_round_trips_binary_content() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("blob.bin");
        let data: Vec<u8> = vec![0x00, 0xFF, 0x00, 0x42, 0x00, 0x13, 0x37];
        fs::write(&src, &data).unwrap();
        let target = tmp.path().join("dest");
        fs::create_dir(&target).unwrap();

        let entry = copy_entry(&src, &target).unwrap();

        assert_eq!(fs::read(entry.path()).unwrap(), data);
        assert_eq!(fs::read(&src).unwrap(), data);
    }

    #[test]
    fn copy_entry_zero_byte_file() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("empty.txt");
        fs::write(&src, "").unwrap();
        let target = tmp.path().join("dest");
        fs::create_dir(&target).unwrap();

        let entry = copy_entry(&src, &target).unwrap();

        assert_eq!(entry.size(), 0);
        assert_eq!(fs::read(entry.path()).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn copy_entry_directory_recursive() {
        let tmp = TempDir::new().unwrap();
        let src_dir = tmp.path().join("src_dir");
        fs::create_dir(&src_dir).unwrap();
        fs::write(src_dir.join("a.txt"), "aaa").unwrap();
        fs::create_dir(src_dir.join("nested")).unwrap();
        fs::write(src_dir.join("nested").join("b.txt"), "bbb").unwrap();

        let target = tmp.path().join("dest");
        fs::create_dir(&target).unwrap();

        let entry = copy_entry(&src_dir, &target).unwrap();

        assert!(entry.is_dir());
        let copied = target.join("src_dir");
        assert_eq!(fs::read_to_string(copied.join("a.txt")).unwrap(), "aaa");
        assert_eq!(
            fs::read_to_string(copied.join("nested").join("b.txt")).unwrap(),
            "bbb"
        );
    }

    #[test]
    fn copy_entry_handles_deeply_nested_trees() {
        let tmp = TempDir::new().unwrap();
        let src_root = tmp.path().join("deep");
        fs::create_dir(&src_root).unwrap();
        let mut dir = src_root.clone();
        for i in 0..70 {
            dir = dir.join(format!("d{i}"));
            fs::create_dir(&dir).unwrap();
        }
        fs::write(dir.join("leaf.txt"), "bottom").unwrap();
        let target = tmp.path().join("dest");
        fs::create_dir(&target).unwrap();

        copy_entry(&src_root, &target).unwrap();

        let mut copied = target.join("deep");
        for i in 0..70 {
            copied = copied.join(format!("d{i}"));
        }
        assert_eq!(fs::read_to_string(copied.join("leaf.txt")).unwrap(), "bottom");
    }

    #[test]
    fn copy_entry_collision_appends_counter() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("a.txt");
        fs::write(&src, "source").unwrap();
        let target = tmp.path().join("dest");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("a.txt"), "old").unwrap();
        fs::write(target.join("a_1.txt"), "older").unwrap();

        let entry = copy_entry(&src, &target).unwrap();
        assert_eq!(entry.name(), "a_2.txt");

        let entry = copy_entry(&src, &target).unwrap();
        assert_eq!(entry.name(), "a_3.txt");

        // pre-existing files untouched
        assert_eq!(fs::read_to_string(target.join("a.txt")).unwrap(), "old");
        assert_eq!(fs::read_to_string(target.join("a_1.txt")).unwrap(), "older");
    }

    #[test]
    fn copy_entry_collision_without_extension() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("Makefile");
        fs::write(&src, "all:").unwrap();
        let target = tmp.path().join("dest");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("Makefile"), "").unwrap();

        let entry = copy_entry(&src, &target).unwrap();
        assert_eq!(entry.name(), "Makefile_1");
    }

    #[test]
    fn copy_entry_directory_collision() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("docs");
        fs::create_dir(&src).unwrap();
        fs::write(src.join("readme.md"), "hi").unwrap();
        let target = tmp.path().join("dest");
        fs::create_dir(&target).unwrap();
        fs::create_dir(target.join("docs")).unwrap();

        let entry = copy_entry(&src, &target).unwrap();

        assert_eq!(entry.name(), "docs_1");
        assert_eq!(
            fs::read_to_string(target.join("docs_1").join("readme.md")).unwrap(),
            "hi"
        );
    }

    #[test]
    fn copy_entry_nonexistent_src_returns_not_found() {
        let tmp = TempDir::new().unwrap();
        let result = copy_entry(&tmp.path().join("nope.txt"), tmp.path());
        assert!(matches!(result.unwrap_err(), CoreError::NotFound(_)));
    }

    #[test]
    fn copy_entry_into_file_returns_not_a_directory() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src.txt");
        fs::write(&src, "x").unwrap();
        let not_dir = tmp.path().join("file.txt");
        fs::write(&not_dir, "").unwrap();

        let result = copy_entry(&src, &not_dir);
        assert!(matches!(result.unwrap_err(), CoreError::NotADirectory(_)));
    }

    #[test]
    fn copy_leaves_no_staging_file_behind() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("data.txt");
        fs::write(&src, "payload").unwrap();
        let target = tmp.path().join("dest");
        fs::create_dir(&target).unwrap();

        copy_entry(&src, &target).unwrap();

        let leftovers: Vec<_> = fs::read_dir(&target)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".part"))
            .collect();
        assert!(leftovers.is_empty());
    }

    // --- move_entry tests ---

    #[test]
    fn move_entry_same_device() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src.txt");
        fs::write(&src, "content").unwrap();
        let target = tmp.path().join("dest");
        fs::create_dir(&target).unwrap();

        let entry = move_entry(&src, &target).unwrap();

        assert!(!src.exists());
        assert!(entry.path().exists());
        assert_eq!(fs::read_to_string(entry.path()).unwrap(), "content");
    }

    #[test]
    fn move_entry_directory() {
        let tmp = TempDir::new().unwrap();
        let src_dir = tmp.path().join("src_dir");
        fs::create_dir(&src_dir).unwrap();
        fs::write(src_dir.join("a.txt"), "aaa").unwrap();
        let target = tmp.path().join("dest");
        fs::create_dir(&target).unwrap();

        let entry = move_entry(&src_dir, &target).unwrap();

        assert!(!src_dir.exists());
        assert!(entry.is_dir());
        assert_eq!(
            fs::read_to_string(target.join("src_dir").join("a.txt")).unwrap(),
            "aaa"
        );
    }

    #[test]
    fn move_entry_collision_appends_counter() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("a.txt");
        fs::write(&src, "moved").unwrap();
        let target = tmp.path().join("dest");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("a.txt"), "old").unwrap();

        let entry = move_entry(&src, &target).unwrap();

        assert_eq!(entry.name(), "a_1.txt");
        assert!(!src.exists());
        assert_eq!(fs::read_to_string(target.join("a.txt")).unwrap(), "old");
    }

    #[test]
    fn move_entry_nonexistent_returns_not_found() {
        let tmp = TempDir::new().unwrap();
        let result = move_entry(&tmp.path().join("nope.txt"), tmp.path());
        assert!(matches!(result.unwrap_err(), CoreError::NotFound(_)));
    }

    #[test]
    fn move_by_copy_end_state_matches_rename() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src.txt");
        fs::write(&src, "fallback path").unwrap();
        let dest = tmp.path().join("dest.txt");

        move_by_copy(&src, &dest).unwrap();

        assert!(!src.exists());
        assert_eq!(fs::read_to_string(&dest).unwrap(), "fallback path");
    }

    #[cfg(unix)]
    #[test]
    fn move_by_copy_surfaces_leftover_source() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let locked = tmp.path().join("locked");
        fs::create_dir(&locked).unwrap();
        let src = locked.join("src.txt");
        fs::write(&src, "dup").unwrap();
        let dest = tmp.path().join("dest.txt");

        // Read-only parent: the copy succeeds, the source delete cannot.
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o555)).unwrap();

        let result = move_by_copy(&src, &dest);

        assert!(matches!(
            result.unwrap_err(),
            CoreError::PartialFailure { failed } if failed == vec![src.clone()]
        ));
        // Both copies exist, but the condition was detected and reported.
        assert!(src.exists());
        assert!(dest.exists());

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
    }

    // --- delete_entry tests ---

    #[test]
    fn delete_entry_file() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("to_delete.txt");
        fs::write(&file, "bye").unwrap();

        delete_entry(&file).unwrap();

        assert!(!file.exists());
    }

    #[test]
    fn delete_entry_directory_recursive() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("dir_to_delete");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("inside.txt"), "").unwrap();
        fs::create_dir(dir.join("nested")).unwrap();
        fs::write(dir.join("nested").join("deep.txt"), "").unwrap();

        delete_entry(&dir).unwrap();

        assert!(!dir.exists());
    }

    #[test]
    fn delete_entry_nonexistent_returns_not_found() {
        let tmp = TempDir::new().unwrap();
        let result = delete_entry(&tmp.path().join("nope.txt"));
        assert!(matches!(result.unwrap_err(), CoreError::NotFound(_)));
    }

    #[cfg(unix)]
    #[test]
    fn delete_entry_partial_failure_keeps_undeletable_child() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("mixed");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("deletable.txt"), "").unwrap();
        let locked = dir.join("locked");
        fs::create_dir(&locked).unwrap();
        let pinned = locked.join("pinned.txt");
        fs::write(&pinned, "").unwrap();

        // Read-only subdir: its file cannot be unlinked.
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o555)).unwrap();

        let result = delete_entry(&dir);

        match result.unwrap_err() {
            CoreError::PartialFailure { failed } => {
                assert!(failed.contains(&pinned));
            }
            other => panic!("expected PartialFailure, got {other:?}"),
        }
        // Deletable child gone, undeletable subtree still present.
        assert!(!dir.join("deletable.txt").exists());
        assert!(dir.exists());
        assert!(pinned.exists());

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn delete_entry_symlink_removes_link_not_target() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("real.txt");
        fs::write(&target, "data").unwrap();
        let link = tmp.path().join("link.txt");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        delete_entry(&link).unwrap();

        assert!(!link.exists());
        assert!(target.exists());
    }

    // --- free_target_name tests ---

    #[test]
    fn free_target_name_prefers_original() {
        let tmp = TempDir::new().unwrap();
        let picked = free_target_name(tmp.path(), Path::new("a.txt"));
        assert_eq!(picked, tmp.path().join("a.txt"));
    }

    #[test]
    fn free_target_name_skips_taken_suffixes() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.txt"), "").unwrap();
        fs::write(tmp.path().join("a_1.txt"), "").unwrap();
        fs::write(tmp.path().join("a_2.txt"), "").unwrap();

        let picked = free_target_name(tmp.path(), Path::new("a.txt"));
        assert_eq!(picked, tmp.path().join("a_3.txt"));
    }
}
