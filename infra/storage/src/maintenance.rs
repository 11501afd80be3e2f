//! Recovery of temp files left behind by interrupted writes.

use crate::engine::TMP_MARKER;
use std::path::Path;
use std::time::{Duration, SystemTime};
use tracing::{error, info, warn};
use walkdir::{DirEntry, WalkDir};

/// Temp files younger than this may belong to a write still in flight.
const STALE_AFTER: Duration = Duration::from_secs(300);

pub(crate) async fn purge_tmp(root: &Path) {
    let root = root.to_path_buf();
    let now = SystemTime::now();

    match tokio::task::spawn_blocking(move || remove_stale(&root, now, STALE_AFTER)).await {
        Ok((removed, failed)) if removed > 0 || failed > 0 => {
            info!(removed, failed, "Cleaned up temporary files");
        },
        Err(e) => {
            error!(error = %e, "Temp file cleanup task panicked");
        },
        _ => {},
    }
}

fn remove_stale(root: &Path, now: SystemTime, threshold: Duration) -> (usize, usize) {
    let mut removed = 0;
    let mut failed = 0;

    WalkDir::new(root)
        .into_iter()
        .flatten()
        .filter(|e| is_tmp(e) && is_stale(e, now, threshold))
        .for_each(|entry| match std::fs::remove_file(entry.path()) {
            Ok(()) => removed += 1,
            Err(e) => {
                warn!(path = %entry.path().display(), error = %e, "Failed to remove temp file");
                failed += 1;
            },
        });

    (removed, failed)
}

fn is_tmp(entry: &DirEntry) -> bool {
    entry.file_type().is_file()
        && entry.file_name().to_str().is_some_and(|name| name.contains(TMP_MARKER))
}

fn is_stale(entry: &DirEntry, now: SystemTime, threshold: Duration) -> bool {
    entry
        .metadata()
        .ok()
        .and_then(|m| m.modified().ok())
        .and_then(|modified| now.duration_since(modified).ok())
        .is_none_or(|age| age > threshold)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_stale_temp_files_are_removed() {
        let tmp = tempfile::tempdir().unwrap();
        let stale = tmp.path().join(".orders.toml.joinerytmp.7");
        let domain = tmp.path().join("orders.toml");
        std::fs::write(&stale, "partial").unwrap();
        std::fs::write(&domain, "kept").unwrap();

        let later = SystemTime::now() + Duration::from_secs(3600);
        assert_eq!(remove_stale(tmp.path(), later, STALE_AFTER), (1, 0));
        assert!(!stale.exists());
        assert!(domain.exists());
    }

    #[test]
    fn fresh_temp_files_are_left_alone() {
        let tmp = tempfile::tempdir().unwrap();
        let fresh = tmp.path().join(".orders.toml.joinerytmp.1");
        std::fs::write(&fresh, "in flight").unwrap();

        assert_eq!(remove_stale(tmp.path(), SystemTime::now(), STALE_AFTER), (0, 0));
        assert!(fresh.exists());
    }
}
