//! Filesystem primitives for the analysis tree.
//!
//! Appends are single whole-line writes; replacements go through
//! [`write_atomic`] (temp file in the same directory, then rename) so readers
//! never observe a half-written artifact. [`write_atomic_all`] does the same
//! for a group of files that must change together.

pub mod layout;

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tokio::io::AsyncWriteExt;

pub use layout::Layout;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid log entry: {0}")]
    InvalidEntry(String),

    #[error("malformed content snapshot at {}: {source}", path.display())]
    MalformedContent {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Create `dir` and all of its parents.
pub async fn ensure_dir(dir: &Path) -> Result<(), StorageError> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| StorageError::io(dir, e))
}

async fn ensure_parent(path: &Path) -> Result<(), StorageError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_dir(parent).await,
        _ => Ok(()),
    }
}

/// Append one complete line to `path`, creating the file and its directory if needed.
///
/// The caller is responsible for serializing appends to the same file.
pub async fn append_line(path: &Path, line: &str) -> Result<(), StorageError> {
    ensure_parent(path).await?;

    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
        .map_err(|e| StorageError::io(path, e))?;

    file.write_all(line.as_bytes())
        .await
        .map_err(|e| StorageError::io(path, e))?;
    file.flush().await.map_err(|e| StorageError::io(path, e))?;
    Ok(())
}

/// Read a file as UTF-8, treating a missing file as empty.
pub async fn read_or_empty(path: &Path) -> Result<String, StorageError> {
    match tokio::fs::read_to_string(path).await {
        Ok(content) => Ok(content),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(String::new()),
        Err(e) => Err(StorageError::io(path, e)),
    }
}

/// Replace `path` with `contents` all-or-nothing: write a sibling temp file,
/// sync it, then rename over the destination.
pub async fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), StorageError> {
    let tmp_path = stage(path, contents).await?;
    if let Err(e) = tokio::fs::rename(&tmp_path, path).await {
        let _ = tokio::fs::remove_file(&tmp_path).await;
        return Err(StorageError::io(path, e));
    }
    Ok(())
}

/// Replace several files as one unit.
///
/// Every temp file is written and synced before any destination changes. If a
/// rename fails, the remaining temp files are removed and the destinations
/// already replaced get their previous contents back (or are removed if they
/// did not exist).
pub async fn write_atomic_all(files: &[(&Path, &[u8])]) -> Result<(), StorageError> {
    let mut staged = Vec::with_capacity(files.len());
    for (path, contents) in files {
        match stage(path, contents).await {
            Ok(tmp_path) => staged.push(tmp_path),
            Err(e) => {
                discard(&staged).await;
                return Err(e);
            }
        }
    }

    let mut previous = Vec::with_capacity(files.len());
    for (path, _) in files {
        match read_previous(path).await {
            Ok(prior) => previous.push(prior),
            Err(e) => {
                discard(&staged).await;
                return Err(e);
            }
        }
    }

    for (i, ((path, _), tmp_path)) in files.iter().zip(&staged).enumerate() {
        if let Err(e) = tokio::fs::rename(tmp_path, path).await {
            discard(&staged[i..]).await;
            for ((done, _), prior) in files[..i].iter().zip(&previous).rev() {
                restore(done, prior.as_deref()).await;
            }
            return Err(StorageError::io(*path, e));
        }
    }
    Ok(())
}

/// Write `contents` to a synced temp file next to `path` and return its path.
async fn stage(path: &Path, contents: &[u8]) -> Result<PathBuf, StorageError> {
    ensure_parent(path).await?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "artifact".into());
    let tmp_path = path.with_file_name(format!(".{file_name}.{}.tmp", uuid::Uuid::now_v7()));

    let result = async {
        let mut file = tokio::fs::File::create(&tmp_path)
            .await
            .map_err(|e| StorageError::io(&tmp_path, e))?;
        file.write_all(contents)
            .await
            .map_err(|e| StorageError::io(&tmp_path, e))?;
        file.flush().await.map_err(|e| StorageError::io(&tmp_path, e))?;
        file.sync_all()
            .await
            .map_err(|e| StorageError::io(&tmp_path, e))
    }
    .await;

    match result {
        Ok(()) => Ok(tmp_path),
        Err(e) => {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            Err(e)
        }
    }
}

async fn discard(tmp_paths: &[PathBuf]) {
    for tmp_path in tmp_paths {
        let _ = tokio::fs::remove_file(tmp_path).await;
    }
}

/// Current contents of a regular file at `path`; `None` if there is none.
async fn read_previous(path: &Path) -> Result<Option<Vec<u8>>, StorageError> {
    match tokio::fs::symlink_metadata(path).await {
        Ok(meta) if meta.is_file() => tokio::fs::read(path)
            .await
            .map(Some)
            .map_err(|e| StorageError::io(path, e)),
        Ok(_) => Ok(None),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(StorageError::io(path, e)),
    }
}

async fn restore(path: &Path, prior: Option<&[u8]>) {
    let restored = match prior {
        Some(contents) => write_atomic(path, contents).await,
        None => tokio::fs::remove_file(path)
            .await
            .map_err(|e| StorageError::io(path, e)),
    };
    if let Err(e) = restored {
        tracing::warn!(path = %path.display(), error = %e, "failed to roll back artifact");
    }
}

/// Snapshot of the analysis tree, used by `daybook doctor`.
#[derive(Debug, Serialize)]
pub struct StorageReport {
    pub root: PathBuf,
    pub writable: bool,
    pub day_dirs: u64,
    pub range_dirs: u64,
    pub summaries: u64,
    pub log_bytes: u64,
    pub stray_temp_files: u64,
    pub oldest_day: Option<String>,
    pub newest_day: Option<String>,
}

/// Walk the analysis root and count days, ranges, summaries, and leftovers.
pub async fn check_storage_health(root: &Path) -> Result<StorageReport, StorageError> {
    ensure_dir(root).await?;

    let probe = root.join(format!(".probe.{}", uuid::Uuid::now_v7()));
    let writable = match tokio::fs::write(&probe, b"ok").await {
        Ok(()) => {
            let _ = tokio::fs::remove_file(&probe).await;
            true
        }
        Err(e) => {
            tracing::warn!(root = %root.display(), error = %e, "analysis root is not writable");
            false
        }
    };

    let mut report = StorageReport {
        root: root.to_path_buf(),
        writable,
        day_dirs: 0,
        range_dirs: 0,
        summaries: 0,
        log_bytes: 0,
        stray_temp_files: 0,
        oldest_day: None,
        newest_day: None,
    };

    let mut days: Vec<String> = Vec::new();
    let mut entries = tokio::fs::read_dir(root)
        .await
        .map_err(|e| StorageError::io(root, e))?;

    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| StorageError::io(root, e))?
    {
        let name = entry.file_name().to_string_lossy().into_owned();
        let path = entry.path();
        let is_dir = entry.file_type().await.map(|t| t.is_dir()).unwrap_or(false);
        if !is_dir {
            continue;
        }

        if crate::dates::parse_date(&name).is_ok() {
            report.day_dirs += 1;
            days.push(name);
        } else if name.contains("_to_") {
            report.range_dirs += 1;
        } else {
            continue;
        }

        let mut files = tokio::fs::read_dir(&path)
            .await
            .map_err(|e| StorageError::io(&path, e))?;
        while let Some(file) = files
            .next_entry()
            .await
            .map_err(|e| StorageError::io(&path, e))?
        {
            let file_name = file.file_name().to_string_lossy().into_owned();
            if file_name == layout::SUMMARY_MARKDOWN {
                report.summaries += 1;
            } else if file_name.ends_with(".tmp") {
                report.stray_temp_files += 1;
            } else if file_name == layout::DAILY_LOG {
                if let Ok(meta) = file.metadata().await {
                    report.log_bytes += meta.len();
                }
            }
        }
    }

    days.sort();
    report.oldest_day = days.first().cloned();
    report.newest_day = days.last().cloned();
    Ok(report)
}
