//! Sandbox checks: every resolved path must stay under the canonical storage root.

use crate::error::StorageError;
use std::path::{Component, Path, PathBuf};

fn traversal(path: &Path, reason: &'static str) -> StorageError {
    StorageError::PathTraversalAttempt {
        message: path.display().to_string().into(),
        context: Some(reason.into()),
    }
}

/// Collapses `.` and `..` lexically; `..` may never climb above the (empty) base.
fn normalize_relative(path: &Path) -> Result<PathBuf, StorageError> {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {},
            Component::Normal(segment) => out.push(segment),
            Component::ParentDir => {
                if !out.pop() {
                    return Err(traversal(path, "'..' climbs above the storage root"));
                }
            },
            Component::RootDir | Component::Prefix(_) => {
                return Err(traversal(path, "absolute paths are not allowed"));
            },
        }
    }
    Ok(out)
}

/// Joins a relative path to the root, refusing anything that would land outside it.
///
/// Existing targets are canonicalized so symlinks are followed before the check; targets
/// that do not exist yet are checked through their nearest existing ancestor.
pub(crate) fn resolve_path(root: &Path, path: impl AsRef<Path>) -> Result<PathBuf, StorageError> {
    let path = path.as_ref();
    if path.is_absolute() {
        return Err(traversal(path, "absolute paths are not allowed"));
    }

    let joined = root.join(normalize_relative(path)?);
    match joined.canonicalize() {
        Ok(canonical) if canonical.starts_with(root) => Ok(canonical),
        Ok(canonical) => Err(traversal(&canonical, "resolves outside the storage root")),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => check_ancestors(root, joined),
        Err(e) => Err(StorageError::Io { source: e, context: None }),
    }
}

fn check_ancestors(root: &Path, joined: PathBuf) -> Result<PathBuf, StorageError> {
    let existing = joined.ancestors().skip(1).find(|ancestor| ancestor.exists());
    let Some(ancestor) = existing else {
        return Err(traversal(&joined, "no existing parent directory inside the storage root"));
    };

    if ancestor == root {
        return Ok(joined);
    }
    match ancestor.canonicalize() {
        Ok(canonical) if canonical.starts_with(root) => Ok(joined),
        Ok(canonical) => Err(traversal(&canonical, "parent directory links outside the storage root")),
        Err(e) => Err(StorageError::Io {
            source: e,
            context: Some(format!("Failed to verify {}", ancestor.display()).into()),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parent_segments_collapse_inside_the_root() {
        assert_eq!(normalize_relative(Path::new("a/./b/../c.toml")).unwrap(), PathBuf::from("a/c.toml"));
    }

    #[test]
    fn climbing_above_the_root_is_rejected() {
        let err = normalize_relative(Path::new("a/../../etc/passwd")).unwrap_err();
        assert!(matches!(err, StorageError::PathTraversalAttempt { .. }));
    }

    #[test]
    fn missing_targets_resolve_through_their_existing_ancestor() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().canonicalize().unwrap();
        let resolved = resolve_path(&root, "nested/dir/orders.toml").unwrap();
        assert_eq!(resolved, root.join("nested/dir/orders.toml"));
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_directories_cannot_leave_the_root() {
        let tmp = tempfile::tempdir().unwrap();
        let outside = tempfile::tempdir().unwrap();
        let root = tmp.path().canonicalize().unwrap();
        std::os::unix::fs::symlink(outside.path(), root.join("escape")).unwrap();

        let err = resolve_path(&root, "escape/orders.toml").unwrap_err();
        assert!(matches!(err, StorageError::PathTraversalAttempt { .. }), "{err:?}");
    }
}
