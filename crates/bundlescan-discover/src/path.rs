//! Path normalization shared by traversal and aggregation.
//!
//! Every path is made absolute and resolved lexically before it is compared
//! or stored: `.` segments are dropped, `..` pops the previous component,
//! and trailing separators disappear. Symlinks are not followed, so two
//! spellings of the same location compare equal only when they agree
//! lexically.

use std::path::{Component, Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum PathResolutionError {
    #[error("failed to read the current directory while resolving {path}")]
    CurrentDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to resolve {path}")]
    Stat {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Makes `path` absolute against the current directory and resolves it
/// lexically. Does not touch the filesystem for absolute input.
pub fn normalize(path: &Path) -> Result<PathBuf, PathResolutionError> {
    if path.is_absolute() {
        return Ok(normalize_lexically(path));
    }
    let cwd = std::env::current_dir().map_err(|e| PathResolutionError::CurrentDir {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(normalize_lexically(&cwd.join(path)))
}

/// Reads the metadata of an input path, following symlinks.
pub fn stat(path: &Path) -> Result<std::fs::Metadata, PathResolutionError> {
    std::fs::metadata(path).map_err(|e| PathResolutionError::Stat {
        path: path.to_path_buf(),
        source: e,
    })
}

fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                // `..` at the root stays at the root.
                if matches!(out.components().next_back(), Some(Component::Normal(_))) {
                    out.pop();
                }
            }
            Component::Normal(name) => out.push(name),
        }
    }
    out
}

/// Whether `ancestor` is `path` itself or one of its parent directories.
///
/// Both inputs must already be normalized.
pub fn is_ancestor_or_equal(ancestor: &Path, path: &Path) -> bool {
    path.starts_with(ancestor)
}

/// Forward-slash path of `path` relative to `base`, `"."` when they are
/// equal, with `..` segments when `path` lies outside `base`.
///
/// Both inputs must already be normalized.
pub fn relative_to(path: &Path, base: &Path) -> String {
    let path_parts: Vec<Component<'_>> = path.components().collect();
    let base_parts: Vec<Component<'_>> = base.components().collect();

    let common = path_parts
        .iter()
        .zip(&base_parts)
        .take_while(|(a, b)| a == b)
        .count();

    let segments: Vec<String> = std::iter::repeat_n("..".to_owned(), base_parts.len() - common)
        .chain(
            path_parts[common..]
                .iter()
                .map(|c| c.as_os_str().to_string_lossy().into_owned()),
        )
        .collect();

    if segments.is_empty() {
        ".".to_owned()
    } else {
        segments.join("/")
    }
}
