pub mod append_logs;
pub mod read_logs;
pub mod summarize;

use std::sync::Arc;

use append_logs::AppendLogsParams;
use chrono::NaiveDate;
use read_logs::ReadLogsParams;
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::{tool, tool_handler, tool_router, ServerHandler};
use summarize::{SummarizeDayParams, SummarizeRangeParams, SummarizeTodayParams};

use crate::dates::{day_key, parse_date, DateRange};
use crate::journal::{count_entries, LogAccumulator, LogEntry};
use crate::summary::{SummaryEngine, SummaryOutcome};

/// The daybook MCP tool handler. Holds the shared journal and summary engine
/// and exposes all MCP tools via the `#[tool_router]` macro.
#[derive(Clone)]
pub struct DaybookTools {
    tool_router: ToolRouter<Self>,
    journal: Arc<LogAccumulator>,
    engine: Arc<SummaryEngine>,
}

#[tool_router]
impl DaybookTools {
    pub fn new(journal: Arc<LogAccumulator>, engine: Arc<SummaryEngine>) -> Self {
        Self {
            tool_router: Self::tool_router(),
            journal,
            engine,
        }
    }

    /// Append captured text fragments to the daily logs.
    #[tool(description = "Append captured phone text to the daily logs. Each entry lands in the log of the day its timestamp falls on. Returns counts of stored and failed entries.")]
    async fn append_logs(
        &self,
        Parameters(params): Parameters<AppendLogsParams>,
    ) -> Result<String, String> {
        if params.logs.is_empty() {
            return Err("logs must not be empty".into());
        }

        tracing::info!(count = params.logs.len(), "append_logs called");

        let entries: Vec<LogEntry> = params.logs.into_iter().map(LogEntry::from).collect();
        let report = self.journal.append_batch(&entries).await;

        Ok(serde_json::json!({
            "status": report.status(),
            "message": report.message(),
            "uploaded": report.appended,
            "failed": report.failed.len(),
            "errors": report.failed,
        })
        .to_string())
    }

    /// Read raw log content for a day or a range of days.
    #[tool(description = "Read the raw captured log for one day (date) or for each day of a range (start_date, end_date). Defaults to today.")]
    async fn read_logs(
        &self,
        Parameters(params): Parameters<ReadLogsParams>,
    ) -> Result<String, String> {
        let zone = self.journal.zone();

        if params.date.is_some() || (params.start_date.is_none() && params.end_date.is_none()) {
            let date = resolve_day(params.date.as_deref(), zone.today())?;
            tracing::info!(date = %date, "read_logs called");

            let content = self
                .journal
                .read_day(date)
                .await
                .map_err(|e| format!("read failed: {e}"))?;
            return Ok(serde_json::json!({
                "date": day_key(date),
                "entry_count": count_entries(&content),
                "log_file_path": self.journal.daily_log_path(date),
                "content": content,
            })
            .to_string());
        }

        let range = resolve_range(
            params.start_date.as_deref(),
            params.end_date.as_deref(),
            zone.today(),
            self.engine.settings().default_range_days,
        )?;
        tracing::info!(range = %range, "read_logs called");

        let days = self
            .journal
            .read_range(&range)
            .await
            .map_err(|e| format!("read failed: {e}"))?;
        let days: Vec<_> = days
            .iter()
            .map(|(date, content)| {
                serde_json::json!({
                    "date": day_key(*date),
                    "entry_count": count_entries(content),
                    "content": content,
                })
            })
            .collect();

        Ok(serde_json::json!({
            "start_date": day_key(range.start()),
            "end_date": day_key(range.end()),
            "days": days,
        })
        .to_string())
    }

    /// Analyze one completed day.
    #[tool(description = "Generate the markdown analysis (activities, focus, mood, personality) for one day. Defaults to yesterday. Slow: invokes the language model.")]
    async fn summarize_day(
        &self,
        Parameters(params): Parameters<SummarizeDayParams>,
    ) -> Result<String, String> {
        let outcome = match params.date.as_deref() {
            Some(s) => {
                let date = parse_date(s).map_err(|e| e.to_string())?;
                tracing::info!(date = %date, "summarize_day called");
                self.engine.generate_for_date(date).await
            }
            None => {
                tracing::info!("summarize_day called for yesterday");
                self.engine.generate_for_yesterday().await
            }
        }
        .map_err(|e| e.to_string())?;
        Ok(outcome_json(&outcome).to_string())
    }

    /// Analyze the current day so far.
    #[tool(description = "Generate an in-progress analysis of today. The result is marked as based on partial data.")]
    async fn summarize_today(
        &self,
        Parameters(_params): Parameters<SummarizeTodayParams>,
    ) -> Result<String, String> {
        tracing::info!("summarize_today called");

        let outcome = self
            .engine
            .generate_for_today()
            .await
            .map_err(|e| e.to_string())?;
        Ok(outcome_json(&outcome).to_string())
    }

    /// Analyze a range of days as one trend report.
    #[tool(description = "Generate a trend analysis across a range of days (start_date..end_date inclusive). Defaults to the last 7 days ending today.")]
    async fn summarize_range(
        &self,
        Parameters(params): Parameters<SummarizeRangeParams>,
    ) -> Result<String, String> {
        let outcome = if params.start_date.is_none() && params.end_date.is_none() {
            tracing::info!("summarize_range called for the default window");
            self.engine.generate_for_last_days(None).await
        } else {
            let range = resolve_range(
                params.start_date.as_deref(),
                params.end_date.as_deref(),
                self.engine.zone().today(),
                self.engine.settings().default_range_days,
            )?;
            tracing::info!(range = %range, "summarize_range called");
            self.engine.generate_for_range(range).await
        }
        .map_err(|e| e.to_string())?;
        Ok(outcome_json(&outcome).to_string())
    }
}

#[tool_handler]
impl ServerHandler for DaybookTools {
    fn get_info(&self) -> rmcp::model::ServerInfo {
        rmcp::model::ServerInfo {
            instructions: Some(
                "Daybook keeps a day-by-day log of captured phone text and turns it into \
                 markdown analyses. Use append_logs to store captures, read_logs to inspect \
                 them, and summarize_day, summarize_today, or summarize_range to analyze."
                    .into(),
            ),
            capabilities: rmcp::model::ServerCapabilities::builder()
                .enable_tools()
                .build(),
            ..Default::default()
        }
    }
}

/// Parse an optional `YYYY-MM-DD` argument, falling back to `default`.
fn resolve_day(date: Option<&str>, default: NaiveDate) -> Result<NaiveDate, String> {
    match date {
        Some(s) => parse_date(s).map_err(|e| e.to_string()),
        None => Ok(default),
    }
}

fn resolve_range(
    start: Option<&str>,
    end: Option<&str>,
    today: NaiveDate,
    default_days: u32,
) -> Result<DateRange, String> {
    DateRange::resolve(start, end, today, default_days).map_err(|e| e.to_string())
}

/// Tool response body: `{summary, metadata, log_file_path, summary_file_path, status}`.
pub fn outcome_json(outcome: &SummaryOutcome) -> serde_json::Value {
    let summary = outcome.summary();
    serde_json::json!({
        "status": outcome.status(),
        "summary": summary.markdown,
        "metadata": summary.metadata,
        "log_file_path": summary.source_log_path,
        "summary_file_path": summary.summary_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::{AnalysisType, Summary, SummaryMetadata};

    fn d(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn day_defaults_and_validation() {
        let fallback = d("2025-11-14");
        assert_eq!(resolve_day(None, fallback).unwrap(), fallback);
        assert_eq!(resolve_day(Some("2025-11-15"), fallback).unwrap(), d("2025-11-15"));
        assert!(resolve_day(Some("15/11/2025"), fallback).is_err());
        assert!(resolve_day(Some("2025-13-01"), fallback).is_err());
        assert!(resolve_day(Some(""), fallback).is_err());
    }

    #[test]
    fn range_defaults_to_trailing_window() {
        let today = d("2025-11-15");
        let range = resolve_range(None, None, today, 7).unwrap();
        assert_eq!(range.start(), d("2025-11-08"));
        assert_eq!(range.end(), today);

        let range = resolve_range(None, Some("2025-11-10"), today, 7).unwrap();
        assert_eq!(range.start(), d("2025-11-03"));
        assert_eq!(range.end(), d("2025-11-10"));

        let range = resolve_range(Some("2025-11-12"), None, today, 7).unwrap();
        assert_eq!(range.start(), d("2025-11-12"));
        assert_eq!(range.end(), today);
    }

    #[test]
    fn reversed_or_malformed_range_is_rejected() {
        let today = d("2025-11-15");
        assert!(resolve_range(Some("2025-11-16"), Some("2025-11-10"), today, 7).is_err());
        assert!(resolve_range(Some("yesterday"), None, today, 7).is_err());
        assert!(resolve_range(None, Some("2025-02-30"), today, 7).is_err());
    }

    #[test]
    fn outcome_json_has_response_fields() {
        let outcome = SummaryOutcome::NoActivity(Summary {
            markdown: "# No Activity Recorded\n".into(),
            metadata: SummaryMetadata {
                generated_at: "2025-11-16T00:00:00Z".into(),
                date_range: "2025-11-15".into(),
                log_count: 0,
                content_item_count: 0,
                analysis_type: AnalysisType::Daily,
            },
            source_log_path: "/tmp/2025-11-15/daily.log".into(),
            summary_path: None,
        });
        let json = outcome_json(&outcome);
        assert_eq!(json["status"], "no_activity");
        assert_eq!(json["summary"], "# No Activity Recorded\n");
        assert_eq!(json["metadata"]["analysis_type"], "daily");
        assert_eq!(json["log_file_path"], "/tmp/2025-11-15/daily.log");
        assert!(json["summary_file_path"].is_null());
    }
}
