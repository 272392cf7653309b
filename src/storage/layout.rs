//! Deterministic on-disk layout of the analysis tree.
//!
//! ```text
//! <root>/
//!   2025-11-15/
//!     daily.log            append-only capture log
//!     summary.md           latest daily analysis
//!     summary_source.log   log snapshot the analysis was generated from
//!     summary.json         analysis metadata
//!   2025-11-09_to_2025-11-15/
//!     weekly.log           merged daily logs (rewritten on every merge)
//!     summary.md
//!     summary_source.log
//!     summary.json
//! ```

use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::dates::{day_key, DateRange};

pub const DAILY_LOG: &str = "daily.log";
pub const WEEKLY_LOG: &str = "weekly.log";
pub const SUMMARY_MARKDOWN: &str = "summary.md";
pub const SUMMARY_SOURCE: &str = "summary_source.log";
pub const SUMMARY_METADATA: &str = "summary.json";

#[derive(Debug, Clone)]
pub struct Layout {
    root: PathBuf,
}

impl Layout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn day_dir(&self, date: NaiveDate) -> PathBuf {
        self.root.join(day_key(date))
    }

    pub fn daily_log(&self, date: NaiveDate) -> PathBuf {
        self.day_dir(date).join(DAILY_LOG)
    }

    pub fn range_dir(&self, range: &DateRange) -> PathBuf {
        self.root.join(range.range_key())
    }

    pub fn weekly_log(&self, range: &DateRange) -> PathBuf {
        self.range_dir(range).join(WEEKLY_LOG)
    }

    /// Directory holding the artifacts for an analysis key (a day or a range key).
    pub fn artifact_dir(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }

    pub fn summary_markdown(&self, key: &str) -> PathBuf {
        self.artifact_dir(key).join(SUMMARY_MARKDOWN)
    }

    pub fn summary_source(&self, key: &str) -> PathBuf {
        self.artifact_dir(key).join(SUMMARY_SOURCE)
    }

    pub fn summary_metadata(&self, key: &str) -> PathBuf {
        self.artifact_dir(key).join(SUMMARY_METADATA)
    }
}
