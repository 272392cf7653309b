//! Summary artifacts and their metadata.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Controls prompt framing and disclaimers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnalysisType {
    /// A completed calendar day.
    Daily,
    /// The current day, with data still arriving.
    TodayInProgress,
    /// A span of days, framed as trends.
    Weekly,
}

impl AnalysisType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::TodayInProgress => "today-in-progress",
            Self::Weekly => "weekly",
        }
    }
}

impl std::fmt::Display for AnalysisType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AnalysisType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(Self::Daily),
            "today-in-progress" | "today" => Ok(Self::TodayInProgress),
            "weekly" => Ok(Self::Weekly),
            _ => Err(format!("unknown analysis type: {s}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryMetadata {
    /// RFC 3339 generation time.
    pub generated_at: String,
    /// `YYYY-MM-DD` or `YYYY-MM-DD to YYYY-MM-DD`.
    pub date_range: String,
    pub log_count: usize,
    pub content_item_count: usize,
    pub analysis_type: AnalysisType,
}

/// A rendered analysis for a day or a range of days.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub markdown: String,
    pub metadata: SummaryMetadata,
    /// The log the analysis was built from (`daily.log` or `weekly.log`).
    pub source_log_path: PathBuf,
    /// Where `markdown` was persisted. `None` when nothing was written.
    pub summary_path: Option<PathBuf>,
}

/// What a summary request produced. Neither variant is an error.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", content = "result", rename_all = "snake_case")]
pub enum SummaryOutcome {
    /// The model was invoked and the artifact persisted.
    Generated(Summary),
    /// Nothing was logged or published in the window; the model was not
    /// invoked and nothing was persisted.
    NoActivity(Summary),
}

impl SummaryOutcome {
    pub fn summary(&self) -> &Summary {
        match self {
            Self::Generated(s) | Self::NoActivity(s) => s,
        }
    }

    pub fn into_summary(self) -> Summary {
        match self {
            Self::Generated(s) | Self::NoActivity(s) => s,
        }
    }

    pub fn is_generated(&self) -> bool {
        matches!(self, Self::Generated(_))
    }

    pub fn status(&self) -> &'static str {
        match self {
            Self::Generated(_) => "generated",
            Self::NoActivity(_) => "no_activity",
        }
    }
}
