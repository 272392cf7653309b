//! Day-partitioned, append-only capture log.
//!
//! [`LogAccumulator`] owns `<root>/<YYYY-MM-DD>/daily.log`. Appends to one day
//! are serialized through a per-date async mutex; appends to different days run
//! in parallel. Reads take no lock: every append is one complete line write, so
//! a reader sees either the whole line or none of it.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::NaiveDate;
use serde::Serialize;

use super::entry::{count_entries, LogEntry};
use crate::dates::{day_key, DateRange, ReferenceZone};
use crate::storage::{self, Layout, StorageError};

const DAY_SEPARATOR: &str = "============================================================";

/// Merged multi-day log, as written to `weekly.log`.
#[derive(Debug, Clone)]
pub struct MergedLog {
    pub text: String,
    pub path: PathBuf,
    /// Total entries across all merged days.
    pub entry_count: usize,
    /// Days that contributed at least one entry.
    pub active_days: Vec<NaiveDate>,
}

/// Outcome of [`LogAccumulator::append_batch`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub appended: usize,
    pub failed: Vec<BatchFailure>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchFailure {
    pub index: usize,
    pub error: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    Success,
    Partial,
    Failed,
}

impl BatchReport {
    pub fn status(&self) -> BatchStatus {
        match (self.appended, self.failed.len()) {
            (_, 0) => BatchStatus::Success,
            (0, _) => BatchStatus::Failed,
            _ => BatchStatus::Partial,
        }
    }

    pub fn message(&self) -> String {
        match self.status() {
            BatchStatus::Success => format!("{} logs stored successfully", self.appended),
            BatchStatus::Failed => format!("failed to store all {} logs", self.failed.len()),
            BatchStatus::Partial => format!(
                "stored {}, failed {}",
                self.appended,
                self.failed.len()
            ),
        }
    }
}

pub struct LogAccumulator {
    layout: Layout,
    zone: ReferenceZone,
    day_locks: Mutex<HashMap<NaiveDate, Arc<tokio::sync::Mutex<()>>>>,
}

impl LogAccumulator {
    /// Create an accumulator rooted at `root`. No I/O happens until the first append.
    pub fn new(root: impl Into<PathBuf>, zone: ReferenceZone) -> Self {
        Self {
            layout: Layout::new(root),
            zone,
            day_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Create an accumulator and make sure the root directory exists.
    pub async fn open(root: impl Into<PathBuf>, zone: ReferenceZone) -> Result<Self, StorageError> {
        let acc = Self::new(root, zone);
        storage::ensure_dir(acc.layout.root()).await?;
        tracing::info!(root = %acc.layout.root().display(), zone = %zone, "log accumulator ready");
        Ok(acc)
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn root(&self) -> &Path {
        self.layout.root()
    }

    pub fn zone(&self) -> ReferenceZone {
        self.zone
    }

    pub fn daily_log_path(&self, date: NaiveDate) -> PathBuf {
        self.layout.daily_log(date)
    }

    fn day_lock(&self, date: NaiveDate) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.day_locks.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(date).or_default())
    }

    /// Drop the registry entry for `date` once no append holds or awaits it.
    fn release_day_lock(&self, date: NaiveDate, lock: Arc<tokio::sync::Mutex<()>>) {
        let mut locks = self.day_locks.lock().unwrap_or_else(PoisonError::into_inner);
        drop(lock);
        if locks.get(&date).is_some_and(|l| Arc::strong_count(l) == 1) {
            locks.remove(&date);
        }
    }

    /// Append one entry to the log of the day its timestamp falls on.
    ///
    /// Returns the day the entry was written to.
    pub async fn append_entry(&self, entry: &LogEntry) -> Result<NaiveDate, StorageError> {
        let local = self.zone.at_millis(entry.timestamp).ok_or_else(|| {
            StorageError::InvalidEntry(format!("timestamp {} is out of range", entry.timestamp))
        })?;
        let date = local.date_naive();
        let line = entry.format_line(local.time());
        let path = self.layout.daily_log(date);

        let lock = self.day_lock(date);
        let appended = {
            let _guard = lock.lock().await;
            storage::append_line(&path, &line).await
        };
        self.release_day_lock(date, lock);
        appended?;

        tracing::debug!(
            date = %date,
            app = %entry.source_app,
            device = entry.device_id.as_deref().unwrap_or("-"),
            "appended log entry"
        );
        Ok(date)
    }

    /// Append entries in order. A failing entry is recorded and skipped; the
    /// rest of the batch is still written.
    pub async fn append_batch(&self, entries: &[LogEntry]) -> BatchReport {
        let mut report = BatchReport::default();

        for (index, entry) in entries.iter().enumerate() {
            match self.append_entry(entry).await {
                Ok(_) => report.appended += 1,
                Err(e) => {
                    tracing::warn!(index, error = %e, "failed to append log entry in batch");
                    report.failed.push(BatchFailure {
                        index,
                        error: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            appended = report.appended,
            failed = report.failed.len(),
            total = entries.len(),
            "appended log batch"
        );
        report
    }

    /// Full raw content of one day's log. A day with no activity is an empty string.
    pub async fn read_day(&self, date: NaiveDate) -> Result<String, StorageError> {
        storage::read_or_empty(&self.layout.daily_log(date)).await
    }

    /// Number of entries logged on `date`.
    pub async fn entry_count(&self, date: NaiveDate) -> Result<usize, StorageError> {
        Ok(count_entries(&self.read_day(date).await?))
    }

    /// Every day of `range` mapped to its raw content (empty for quiet days).
    pub async fn read_range(
        &self,
        range: &DateRange,
    ) -> Result<BTreeMap<NaiveDate, String>, StorageError> {
        let mut days = BTreeMap::new();
        for date in range.days() {
            days.insert(date, self.read_day(date).await?);
        }
        Ok(days)
    }

    /// Concatenate the days of `range` chronologically, each under a date
    /// header, and write the result to the range's `weekly.log`.
    ///
    /// Days without entries contribute nothing. The merged file is rewritten
    /// on every call.
    pub async fn merge_range(&self, range: &DateRange) -> Result<MergedLog, StorageError> {
        let days = self.read_range(range).await?;

        let mut text = String::new();
        let mut entry_count = 0;
        let mut active_days = Vec::new();

        for (date, content) in &days {
            let count = count_entries(content);
            if count == 0 {
                continue;
            }
            entry_count += count;
            active_days.push(*date);

            if !text.is_empty() {
                text.push('\n');
            }
            text.push_str(&day_header(*date));
            text.push_str(content);
            if !content.ends_with('\n') {
                text.push('\n');
            }
        }

        let path = self.layout.weekly_log(range);
        storage::write_atomic(&path, text.as_bytes()).await?;

        tracing::info!(
            range = %range,
            days = active_days.len(),
            entries = entry_count,
            path = %path.display(),
            "merged daily logs"
        );

        Ok(MergedLog {
            text,
            path,
            entry_count,
            active_days,
        })
    }
}

fn day_header(date: NaiveDate) -> String {
    format!("{DAY_SEPARATOR}\nDate: {}\n{DAY_SEPARATOR}\n\n", day_key(date))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::parse_date;
    use tempfile::TempDir;

    // 2025-11-15T09:15:00Z
    const T1: i64 = 1_763_198_100_000;

    #[tokio::test]
    async fn invalid_timestamp_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let acc = LogAccumulator::new(tmp.path(), ReferenceZone::utc());
        let err = acc
            .append_entry(&LogEntry::new("x", "com.app", i64::MAX))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::InvalidEntry(_)));
    }

    #[tokio::test]
    async fn idle_day_locks_are_released() {
        let tmp = TempDir::new().unwrap();
        let acc = Arc::new(LogAccumulator::new(tmp.path(), ReferenceZone::utc()));

        for day in 0..30 {
            acc.append_entry(&LogEntry::new("x", "com.app", T1 + day * 86_400_000))
                .await
                .unwrap();
        }
        assert!(acc.day_locks.lock().unwrap().is_empty());

        let tasks: Vec<_> = (0..16)
            .map(|i| {
                let acc = Arc::clone(&acc);
                tokio::spawn(async move {
                    acc.append_entry(&LogEntry::new("y", "com.app", T1 + i)).await
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }
        assert!(acc.day_locks.lock().unwrap().is_empty());
        assert_eq!(acc.entry_count(parse_date("2025-11-15").unwrap()).await.unwrap(), 17);
    }

    #[tokio::test]
    async fn batch_reports_partial_failure() {
        let tmp = TempDir::new().unwrap();
        let acc = LogAccumulator::new(tmp.path(), ReferenceZone::utc());
        let entries = vec![
            LogEntry::new("ok", "com.app", T1),
            LogEntry::new("bad", "com.app", i64::MIN),
            LogEntry::new("also ok", "com.app", T1 + 1000),
        ];

        let report = acc.append_batch(&entries).await;
        assert_eq!(report.appended, 2);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].index, 1);
        assert_eq!(report.status(), BatchStatus::Partial);

        let day = parse_date("2025-11-15").unwrap();
        assert_eq!(acc.entry_count(day).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn entries_bucket_by_reference_zone() {
        let tmp = TempDir::new().unwrap();
        let zone: ReferenceZone = "+10:00".parse().unwrap();
        let acc = LogAccumulator::new(tmp.path(), zone);

        // 2025-11-15T23:30:00Z is 09:30 on the 16th at +10:00.
        let date = acc
            .append_entry(&LogEntry::new("late", "com.app", 1_763_249_400_000))
            .await
            .unwrap();
        assert_eq!(date, parse_date("2025-11-16").unwrap());

        let content = acc.read_day(date).await.unwrap();
        assert_eq!(content, "[09:30:00] [com.app] late\n");
    }

    #[test]
    fn batch_status_messages() {
        let report = BatchReport {
            appended: 3,
            failed: vec![],
        };
        assert_eq!(report.status(), BatchStatus::Success);
        assert_eq!(report.message(), "3 logs stored successfully");

        let report = BatchReport {
            appended: 0,
            failed: vec![BatchFailure {
                index: 0,
                error: "boom".into(),
            }],
        };
        assert_eq!(report.status(), BatchStatus::Failed);
    }
}
