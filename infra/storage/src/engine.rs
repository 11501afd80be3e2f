//! Core storage engine providing sandboxed, atomic text file I/O.
//!
//! This module contains the primary [`Storage`] handle. It owns the physical root directory,
//! enforces the sandbox via path resolution, and guarantees that a write either fully
//! replaces a file or leaves the previous version untouched.

use crate::builder::StorageBuilder;
use crate::error::{StorageError, StorageErrorExt};
use crate::maintenance;
use crate::security;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Marker embedded in temp file names; anything carrying it is safe to purge.
pub(crate) const TMP_MARKER: &str = ".joinerytmp.";

/// The internal shared state of a [`Storage`] instance.
#[derive(Debug)]
pub struct StorageInner {
    /// The canonicalized physical path on the disk where all files are stored.
    pub(crate) root: PathBuf,
    /// A unique counter used to generate temporary file names.
    pub(crate) tmp_counter: AtomicU64,
}

/// A thread-safe handle to the storage engine.
///
/// All paths are relative to the root and validated to prevent traversal attacks.
/// The handle is internally reference-counted (`Arc`) and can be cheaply cloned across
/// generation tasks.
///
/// # Example
///
/// ```rust
/// use joinery_storage::{Storage, StorageError};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() -> Result<(), StorageError> {
///     # let tmp = tempfile::tempdir().unwrap();
///     # let root = tmp.path().join("domains");
///     let storage = Storage::builder().root(&root).connect().await?;
///
///     storage.write("orders.toml", "# generated\n").await?;
///     assert_eq!(storage.list("toml").await?, vec![std::path::PathBuf::from("orders.toml")]);
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Storage {
    pub(crate) inner: Arc<StorageInner>,
}

impl Deref for Storage {
    type Target = StorageInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl Storage {
    #[must_use = "The storage engine is not initialized until you call .connect()"]
    pub fn builder() -> StorageBuilder {
        StorageBuilder::new()
    }

    /// The canonical root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves a relative path to a physical path on the disk within the storage root.
    ///
    /// 1. Absolute paths are rejected.
    /// 2. `.` and `..` are collapsed lexically and may not climb above the root.
    /// 3. The physical result (or its first existing ancestor) must still lie within the root.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::PathTraversalAttempt`] if the path tries to escape the sandbox.
    /// Returns [`StorageError::Io`] if the path or its parent cannot be verified on the filesystem.
    pub fn resolve(&self, path: impl AsRef<Path>) -> Result<PathBuf, StorageError> {
        security::resolve_path(&self.root, path)
    }

    /// Reads a UTF-8 file, returning `None` when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::PathTraversalAttempt`] for paths outside the sandbox,
    /// [`StorageError::Encoding`] for non UTF-8 content and [`StorageError::Io`] otherwise.
    pub async fn read(&self, path: impl AsRef<Path>) -> Result<Option<String>, StorageError> {
        let resolved = self.resolve(path)?;

        let data = match fs::read(&resolved).await {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(StorageError::Io {
                    source: err,
                    context: Some(format!("Read failed: {}", resolved.display()).into()),
                });
            },
        };

        let text = String::from_utf8(data).context(resolved.display().to_string())?;
        Ok(Some(text))
    }

    /// Writes a file atomically.
    ///
    /// 1. Contents go to a unique temporary sibling (`.<name>.joinerytmp.<id>`).
    /// 2. The temporary file is synced to hardware (`fsync`).
    /// 3. It is renamed over the destination.
    /// 4. The parent directory is synced so the rename itself is durable.
    ///
    /// Parent directories are created as needed. On platforms that do not support atomic
    /// replace for existing targets, the implementation falls back to remove-then-rename.
    /// A failed write removes its temporary file and leaves the destination untouched.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::PathTraversalAttempt`] if the path escapes the sandbox.
    /// Returns [`StorageError::Io`] if disk space is full or hardware failure occurs.
    pub async fn write(&self, path: impl AsRef<Path>, contents: &str) -> Result<(), StorageError> {
        let resolved = self.resolve(path)?;
        if resolved.file_name().is_none() {
            return Err(StorageError::InvalidTarget {
                message: resolved.display().to_string().into(),
                context: None,
            });
        }

        if let Some(parent) = resolved.parent() {
            fs::create_dir_all(parent)
                .await
                .context(format!("Failed to create directories for {}", resolved.display()))?;
        }

        let temp = unique_tmp_path(&resolved, &self.tmp_counter);
        if let Err(err) = Self::write_synced(&temp, contents.as_bytes()).await {
            let _ = fs::remove_file(&temp).await;
            return Err(err);
        }

        if let Err(err) = fs::rename(&temp, &resolved).await {
            if err.kind() == std::io::ErrorKind::AlreadyExists {
                fs::remove_file(&resolved)
                    .await
                    .context(format!("Failed to replace existing file: {}", resolved.display()))?;
                fs::rename(&temp, &resolved).await.context(format!(
                    "Atomic swap failed: {} -> {}",
                    temp.display(),
                    resolved.display()
                ))?;
            } else {
                let _ = fs::remove_file(&temp).await;
                return Err(StorageError::Io {
                    source: err,
                    context: Some(
                        format!("Atomic swap failed: {} -> {}", temp.display(), resolved.display())
                            .into(),
                    ),
                });
            }
        }

        if let Some(parent) = resolved.parent() {
            Self::sync_dir(parent).await;
        }

        debug!(path = %resolved.display(), bytes = contents.len(), "File saved atomically");
        Ok(())
    }

    /// Deletes a file; deleting a missing file is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if there are not enough permissions to delete the file.
    pub async fn delete(&self, path: impl AsRef<Path>) -> Result<(), StorageError> {
        let resolved = self.resolve(path)?;
        match fs::remove_file(&resolved).await {
            Ok(()) => debug!(path = %resolved.display(), "File deleted"),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {},
            Err(err) => {
                return Err(StorageError::Io {
                    source: err,
                    context: Some(format!("Failed to delete: {}", resolved.display()).into()),
                });
            },
        }
        Ok(())
    }

    /// Checks if a file exists within the storage sandbox.
    ///
    /// # Errors
    ///
    /// Returns an `Err` only if path resolution fails (e.g., due to a security violation).
    pub fn exists(&self, path: impl AsRef<Path>) -> Result<bool, StorageError> {
        let resolved = self.resolve(path)?;
        Ok(resolved.is_file())
    }

    /// Files directly under the root with the given extension, as sorted relative paths.
    ///
    /// Temporary files are never listed.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the root cannot be read.
    pub async fn list(&self, extension: &str) -> Result<Vec<PathBuf>, StorageError> {
        let mut entries = fs::read_dir(&self.root)
            .await
            .context(format!("Failed to list {}", self.root.display()))?;

        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await.context("Failed to read entry")? {
            let path = entry.path();
            let is_file = entry.file_type().await.is_ok_and(|t| t.is_file());
            let matches = path.extension().and_then(|e| e.to_str()) == Some(extension);
            let is_tmp = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.contains(TMP_MARKER));
            if is_file && matches && !is_tmp {
                files.push(PathBuf::from(entry.file_name()));
            }
        }

        files.sort();
        Ok(files)
    }

    pub async fn purge_tmp(&self) {
        maintenance::purge_tmp(&self.root).await;
    }

    async fn write_synced(temp: &Path, data: &[u8]) -> Result<(), StorageError> {
        let mut file = fs::OpenOptions::new()
            .create_new(true)
            .write(true)
            .open(temp)
            .await
            .context(format!("Temp creation failed: {}", temp.display()))?;
        file.write_all(data).await.context("Write failed")?;
        file.sync_all().await.context("Hardware sync failed")?;
        Ok(())
    }

    async fn sync_dir(path: &Path) {
        match fs::File::open(path).await {
            Ok(dir) => {
                if let Err(err) = dir.sync_all().await {
                    tracing::warn!(path = %path.display(), error = %err, "Directory sync failed");
                }
            },
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "Directory open failed");
            },
        }
    }
}

fn unique_tmp_path(target: &Path, counter: &AtomicU64) -> PathBuf {
    let counter = counter.fetch_add(1, Ordering::Relaxed);
    let file_name = target.file_name().and_then(|s| s.to_str()).unwrap_or("domain");
    target.with_file_name(format!(".{file_name}{TMP_MARKER}{counter}"))
}
