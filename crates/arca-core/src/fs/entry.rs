//! File entry representation and kind classification.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use unicode_normalization::UnicodeNormalization;

/// Extensions treated as plain text.
const TEXT_EXTENSIONS: &[&str] = &[
    "txt", "md", "log", "gradle", "properties", "kt", "java", "c", "cpp", "py", "js", "css", "html",
];

/// Extensions treated as images.
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "webp"];

const JSON_EXTENSIONS: &[&str] = &["json"];
const XML_EXTENSIONS: &[&str] = &["xml"];

/// Broad content category of an entry, derived from `is_dir` and the
/// lowercased extension. Format viewers pick their renderer from this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Directory,
    Text,
    Image,
    Json,
    Xml,
    Other,
}

impl FileKind {
    /// Classifies an entry from its directory flag and lowercased extension.
    ///
    /// The extension tables are fixed; the first table containing the
    /// extension wins.
    pub fn classify(is_dir: bool, extension: &str) -> Self {
        if is_dir {
            return FileKind::Directory;
        }
        if TEXT_EXTENSIONS.contains(&extension) {
            FileKind::Text
        } else if IMAGE_EXTENSIONS.contains(&extension) {
            FileKind::Image
        } else if JSON_EXTENSIONS.contains(&extension) {
            FileKind::Json
        } else if XML_EXTENSIONS.contains(&extension) {
            FileKind::Xml
        } else {
            FileKind::Other
        }
    }
}

/// A single file or directory entry as observed at listing time.
///
/// `FileEntry` is immutable — create new instances via [`FileEntry::new`]
/// rather than mutating existing ones; a fresh listing produces fresh
/// entries. Directory sizes are reported as `0`.
///
/// # Examples
///
/// ```no_run
/// use arca_core::FileEntry;
/// use std::fs;
///
/// let metadata = fs::metadata("Cargo.toml").unwrap();
/// let entry = FileEntry::new("Cargo.toml".into(), &metadata);
/// assert_eq!(entry.name(), "Cargo.toml");
/// assert!(!entry.is_dir());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    path: PathBuf,
    name: String,
    size: u64,
    modified: Option<SystemTime>,
    is_dir: bool,
    is_hidden: bool,
    is_symlink: bool,
    extension: String,
    kind: FileKind,
}

impl FileEntry {
    /// Creates a new `FileEntry` from a path and its metadata.
    ///
    /// Names are normalised to NFC (macOS stores them decomposed). Hidden
    /// files are detected by a leading `.`; directory sizes are `0`;
    /// extensions are lowercased and empty for directories.
    pub fn new(path: PathBuf, metadata: &std::fs::Metadata) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().nfc().collect::<String>())
            .unwrap_or_default();
        let is_hidden = name.starts_with('.');
        let is_dir = metadata.is_dir();
        let extension = if is_dir {
            String::new()
        } else {
            path.extension()
                .map(|e| e.to_string_lossy().to_lowercase())
                .unwrap_or_default()
        };
        let kind = FileKind::classify(is_dir, &extension);

        Self {
            path,
            name,
            size: if is_dir { 0 } else { metadata.len() },
            modified: metadata.modified().ok(),
            is_dir,
            is_hidden,
            is_symlink: metadata.is_symlink(),
            extension,
            kind,
        }
    }

    /// Returns the full path of this entry.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the file or directory name (last component of the path).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the file size in bytes. Always `0` for directories.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Returns the last-modified time, if available.
    pub fn modified(&self) -> Option<SystemTime> {
        self.modified
    }

    /// Returns `true` if this entry is a directory.
    pub fn is_dir(&self) -> bool {
        self.is_dir
    }

    /// Returns `true` if the name starts with `.`.
    pub fn is_hidden(&self) -> bool {
        self.is_hidden
    }

    /// Returns `true` if this entry is a symbolic link.
    pub fn is_symlink(&self) -> bool {
        self.is_symlink
    }

    /// Returns the lowercased extension. Empty for directories and
    /// extension-less files.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Returns the content category used by format viewers.
    pub fn kind(&self) -> FileKind {
        self.kind
    }

    /// Human-readable size: `-` for directories, otherwise B/KB/MB/GB.
    pub fn format_size(&self) -> String {
        if self.is_dir {
            return "-".to_string();
        }
        const KB: u64 = 1024;
        const MB: u64 = 1024 * KB;
        const GB: u64 = 1024 * MB;
        match self.size {
            s if s < KB => format!("{s} B"),
            s if s < MB => format!("{} KB", s / KB),
            s if s < GB => format!("{} MB", s / MB),
            s => format!("{} GB", s / GB),
        }
    }
}
