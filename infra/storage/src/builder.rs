use crate::engine::{Storage, StorageInner};
use crate::error::{StorageError, StorageErrorExt};
use private::Sealed;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use tokio::fs;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy)]
struct Options {
    create: bool,
    purge: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self { create: true, purge: true }
    }
}

#[derive(Debug, Default)]
pub struct NoRoot;
#[derive(Debug)]
pub struct WithRoot(PathBuf);

mod private {
    pub(super) trait Sealed {}
}
impl Sealed for NoRoot {}
impl Sealed for WithRoot {}

/// Type-state builder for [`Storage`]; `connect` exists only once a root is set.
#[allow(private_bounds)]
#[derive(Debug, Default)]
pub struct StorageBuilder<S: Sealed = NoRoot> {
    state: S,
    options: Options,
}

#[allow(private_bounds)]
impl<S: Sealed> StorageBuilder<S> {
    /// Create the root when missing (default). Schema directories are opened with `false`.
    #[must_use = "The storage engine is not initialized until you call .connect()"]
    pub const fn create(mut self, enable: bool) -> Self {
        self.options.create = enable;
        self
    }

    /// Remove stale temp files left by interrupted writes while connecting (default).
    #[must_use = "The storage engine is not initialized until you call .connect()"]
    pub const fn purge(mut self, enable: bool) -> Self {
        self.options.purge = enable;
        self
    }
}

impl StorageBuilder<NoRoot> {
    #[must_use = "The storage engine is not initialized until you call .connect()"]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "The storage engine is not initialized until you call .connect()"]
    pub fn root(self, path: impl Into<PathBuf>) -> StorageBuilder<WithRoot> {
        StorageBuilder { state: WithRoot(path.into()), options: self.options }
    }
}

impl StorageBuilder<WithRoot> {
    /// Opens the root directory.
    ///
    /// The root is created when `create` is set, then canonicalized so every later path
    /// check compares physical locations. With `purge` set, stale temp files under the
    /// root are removed; a failed cleanup is logged and never fails the connection.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the root is missing and `create` is off, or cannot
    /// be created or resolved.
    pub async fn connect(self) -> Result<Storage, StorageError> {
        let WithRoot(root) = self.state;

        if self.options.create {
            fs::create_dir_all(&root)
                .await
                .context(format!("Failed to create storage root: {}", root.display()))?;
        }

        let canonical = fs::canonicalize(&root)
            .await
            .context(format!("Failed to resolve storage root: {}", root.display()))?;
        if !canonical.is_dir() {
            return Err(StorageError::InvalidTarget {
                message: canonical.display().to_string().into(),
                context: Some("storage root must be a directory".into()),
            });
        }
        info!(path = %canonical.display(), "Storage root opened");

        let storage = Storage {
            inner: Arc::new(StorageInner { root: canonical, tmp_counter: AtomicU64::new(1) }),
        };

        if self.options.purge {
            storage.purge_tmp().await;
        } else {
            debug!("Temp file purge skipped");
        }

        Ok(storage)
    }
}
