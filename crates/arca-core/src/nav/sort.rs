//! Sorting and filtering for file entries.

use crate::fs::entry::FileEntry;

/// The key by which entries are ordered.
///
/// Each key carries a fixed direction: `Name` and `Type` are ascending
/// case-insensitive, `Size` is ascending by bytes, `Date` is descending
/// (newest first). Directories always come before files regardless of key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Case-insensitive name, A–Z. The default.
    #[default]
    Name,
    /// Last-modified time, newest first.
    Date,
    /// File size in bytes, smallest first.
    Size,
    /// Case-insensitive extension, A–Z.
    Type,
}

impl SortKey {
    /// Parses a config string into a key. Unknown strings fall back to
    /// `Name` so a stale config file never breaks startup.
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "date" => SortKey::Date,
            "size" => SortKey::Size,
            "type" => SortKey::Type,
            _ => SortKey::Name,
        }
    }
}

/// Sorts file entries by the given key.
///
/// Directories always appear before files; within each group the key's
/// fixed direction applies. Pure — no filesystem access, and the input
/// slice is never mutated; returns a new `Vec<FileEntry>`.
pub fn sort_entries(entries: &[FileEntry], key: SortKey) -> Vec<FileEntry> {
    let mut sorted: Vec<FileEntry> = entries.to_vec();

    sorted.sort_by(|a, b| {
        let dir_cmp = b.is_dir().cmp(&a.is_dir());
        if dir_cmp != std::cmp::Ordering::Equal {
            return dir_cmp;
        }
        compare_by_key(a, b, key)
    });

    sorted
}

fn compare_by_key(a: &FileEntry, b: &FileEntry, key: SortKey) -> std::cmp::Ordering {
    match key {
        SortKey::Name => a.name().to_lowercase().cmp(&b.name().to_lowercase()),
        SortKey::Date => b.modified().cmp(&a.modified()),
        SortKey::Size => a.size().cmp(&b.size()),
        SortKey::Type => a
            .extension()
            .cmp(b.extension())
            .then_with(|| a.name().to_lowercase().cmp(&b.name().to_lowercase())),
    }
}

/// Filters out hidden entries when `show_hidden` is `false`.
///
/// When `show_hidden` is `true` all entries are returned unchanged.
pub fn filter_hidden(entries: &[FileEntry], show_hidden: bool) -> Vec<FileEntry> {
    if show_hidden {
        return entries.to_vec();
    }
    entries.iter().filter(|e| !e.is_hidden()).cloned().collect()
}
