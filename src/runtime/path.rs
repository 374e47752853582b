//! Path utility functions for normalization and display.

use std::path::{Component, Path, PathBuf};

/// Normalize a path by processing `.` and `..` components lexically.
/// This does not access the filesystem and does not follow symlinks.
pub(crate) fn normalize_path(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !result.pop() {
                    result.push(component);
                }
            }
            _ => {
                result.push(component);
            }
        }
    }
    result
}

/// Check if a path is under a given directory by comparing normalized path components.
/// Returns true if `path` is under `dir` (i.e., `dir` is a prefix of `path`).
///
/// `/app/vendor/../../etc/passwd` is NOT under `/app`.
pub fn is_path_under(path: &Path, dir: &Path) -> bool {
    let normalized_path = normalize_path(path);
    let normalized_dir = normalize_path(dir);

    let path_components: Vec<_> = normalized_path.components().collect();
    let dir_components: Vec<_> = normalized_dir.components().collect();

    if path_components.len() < dir_components.len() {
        return false;
    }

    dir_components
        .iter()
        .zip(path_components.iter())
        .all(|(d, p)| d == p)
}

/// Resolve a path declared relative to `base_dir`.
///
/// Absolute paths keep their components as declared; relative ones are joined onto
/// `base_dir` and normalized. A trailing separator is not preserved either way.
pub fn resolve_relative_path(base_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.components().collect()
    } else {
        normalize_path(&base_dir.join(path))
    }
}

/// Shorten `path` for progress output: shown relative to `root` when it lies under
/// `root`, otherwise unchanged.
///
/// For example, with root `/srv/app`, `/srv/app/vendor/acme/theme` is shown as
/// `vendor/acme/theme`.
pub fn display_path(path: &Path, root: &Path) -> PathBuf {
    if is_path_under(path, root)
        && let Some(relative) = pathdiff::diff_paths(normalize_path(path), normalize_path(root))
        && !relative.as_os_str().is_empty()
    {
        return relative;
    }
    path.to_path_buf()
}
