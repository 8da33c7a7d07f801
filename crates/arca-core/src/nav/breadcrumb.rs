//! Breadcrumb decomposition of absolute paths.

use std::path::{Component, Path, PathBuf};

use crate::error::{CoreError, CoreResult};

/// One clickable breadcrumb: the display name of a path component and
/// the absolute path up to and including that component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    path: PathBuf,
    name: String,
}

impl Segment {
    /// The absolute path prefix ending at this component.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The display name of this component. The root segment is named `/`.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Decomposes an absolute path into breadcrumb segments, root first.
///
/// Pure string work — the path is never checked against the live
/// filesystem, so breadcrumbs stay renderable even when an ancestor has
/// been deleted since listing. Idempotent: segmenting any segment's
/// `path` yields a prefix of the original result, and joining the
/// segment names (root's `/` plus the components) reconstructs the
/// input path.
///
/// # Errors
///
/// [`CoreError::NotAbsolute`] for relative input.
pub fn segments(path: &Path) -> CoreResult<Vec<Segment>> {
    if !path.is_absolute() {
        return Err(CoreError::NotAbsolute(path.to_path_buf()));
    }

    let mut result = Vec::new();
    let mut prefix = PathBuf::new();

    for component in path.components() {
        match component {
            Component::RootDir => {
                prefix.push(Component::RootDir.as_os_str());
                result.push(Segment {
                    path: prefix.clone(),
                    name: "/".to_string(),
                });
            }
            Component::Prefix(p) => {
                // Windows drive / UNC prefix stands in for the root segment.
                prefix.push(p.as_os_str());
                result.push(Segment {
                    path: prefix.clone(),
                    name: p.as_os_str().to_string_lossy().into_owned(),
                });
            }
            Component::Normal(name) => {
                prefix.push(name);
                result.push(Segment {
                    path: prefix.clone(),
                    name: name.to_string_lossy().into_owned(),
                });
            }
            // components() has already folded `.` and `..` away for
            // absolute paths; nothing to do.
            Component::CurDir | Component::ParentDir => {}
        }
    }

    Ok(result)
}
