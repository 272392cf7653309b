//! Summary pipeline: gather, filter, prompt, invoke, persist.
//!
//! [`SummaryEngine`] is the only place that calls the language model. Each
//! request walks `Gathering → Filtering → Prompting → Invoking → Persisting →
//! Done`; any failure ends in `Failed` and leaves the artifacts on disk as they
//! were. The request deadline covers everything up to the model call;
//! persisting runs outside it and replaces the three artifacts as one group.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, SecondsFormat, Utc};
use serde::Serialize;

use super::error::{GenerationError, GenerationFailure, SummaryError};
use super::prompt::{self, PromptInputs, SECTION_HEADINGS};
use super::types::{AnalysisType, Summary, SummaryMetadata, SummaryOutcome};
use crate::config::DaybookConfig;
use crate::content::{filter_by_date_range, ContentItem, ContentSource};
use crate::dates::{day_key, DateRange, ReferenceZone};
use crate::journal::{count_entries, LogAccumulator};
use crate::llm::LanguageModel;
use crate::storage::{self, StorageError};

/// Appended to every today-in-progress analysis.
pub const IN_PROGRESS_NOTE: &str =
    "\n\n---\n*Note: This is an in-progress analysis for today. Data may be incomplete.*\n";

#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub max_output_tokens: u32,
    pub generation_timeout: Duration,
    pub request_deadline: Duration,
    pub default_range_days: u32,
}

impl EngineSettings {
    pub fn from_config(config: &DaybookConfig) -> Self {
        Self {
            max_output_tokens: config.llm.max_output_tokens,
            generation_timeout: config.summary.generation_timeout(),
            request_deadline: config.summary.request_deadline(),
            default_range_days: config.summary.default_range_days,
        }
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self::from_config(&DaybookConfig::default())
    }
}

/// Where a summary request is in its pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Gathering,
    Filtering,
    Prompting,
    Invoking,
    Persisting,
    Done,
    Failed,
}

impl PipelineState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gathering => "gathering",
            Self::Filtering => "filtering",
            Self::Prompting => "prompting",
            Self::Invoking => "invoking",
            Self::Persisting => "persisting",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for PipelineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-request state tracker. Logs every transition.
struct Pipeline<'a> {
    target: &'a str,
    state: PipelineState,
}

impl<'a> Pipeline<'a> {
    fn start(target: &'a str) -> Self {
        tracing::debug!(request = target, state = %PipelineState::Gathering, "summary pipeline started");
        Self {
            target,
            state: PipelineState::Gathering,
        }
    }

    fn advance(&mut self, next: PipelineState) {
        tracing::debug!(request = self.target, from = %self.state, to = %next, "summary pipeline transition");
        self.state = next;
    }

    fn fail(&mut self, err: &dyn std::fmt::Display) {
        tracing::warn!(request = self.target, state = %self.state, error = %err, "summary pipeline failed");
        self.state = PipelineState::Failed;
    }
}

/// What the pre-persist stages produced.
enum Draft {
    Empty(Summary),
    Ready(ReadyDraft),
}

struct ReadyDraft {
    key: String,
    log_text: String,
    summary: Summary,
}

/// Sidecar written next to `summary.md` for auditing.
#[derive(Serialize)]
struct ArtifactRecord<'a> {
    #[serde(flatten)]
    metadata: &'a SummaryMetadata,
    model: &'a str,
    source_log_path: &'a std::path::Path,
}

pub struct SummaryEngine {
    journal: Arc<LogAccumulator>,
    content: Arc<dyn ContentSource>,
    model: Arc<dyn LanguageModel>,
    settings: EngineSettings,
}

impl SummaryEngine {
    pub fn new(
        journal: Arc<LogAccumulator>,
        content: Arc<dyn ContentSource>,
        model: Arc<dyn LanguageModel>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            journal,
            content,
            model,
            settings,
        }
    }

    pub fn zone(&self) -> ReferenceZone {
        self.journal.zone()
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn journal(&self) -> &LogAccumulator {
        &self.journal
    }

    /// Analyze one completed day.
    pub async fn generate_for_date(&self, date: NaiveDate) -> Result<SummaryOutcome, SummaryError> {
        self.run(AnalysisType::Daily, DateRange::single(date)).await
    }

    /// Analyze the current day in the reference zone. The result always carries
    /// the in-progress note.
    pub async fn generate_for_today(&self) -> Result<SummaryOutcome, SummaryError> {
        let today = self.zone().today();
        self.run(AnalysisType::TodayInProgress, DateRange::single(today))
            .await
    }

    pub async fn generate_for_yesterday(&self) -> Result<SummaryOutcome, SummaryError> {
        let today = self.zone().today();
        let yesterday = today.pred_opt().unwrap_or(today);
        self.generate_for_date(yesterday).await
    }

    /// Analyze an inclusive range of days as one trend report.
    pub async fn generate_for_range(&self, range: DateRange) -> Result<SummaryOutcome, SummaryError> {
        self.run(AnalysisType::Weekly, range).await
    }

    /// Range ending today and reaching back `days` days (the configured default when `None`).
    pub async fn generate_for_last_days(
        &self,
        days: Option<u32>,
    ) -> Result<SummaryOutcome, SummaryError> {
        let days = days.unwrap_or(self.settings.default_range_days);
        let range = DateRange::trailing(self.zone().today(), days);
        self.generate_for_range(range).await
    }

    async fn run(
        &self,
        analysis: AnalysisType,
        range: DateRange,
    ) -> Result<SummaryOutcome, SummaryError> {
        let target = match analysis {
            AnalysisType::Weekly => range.range_key(),
            _ => day_key(range.start()),
        };
        let mut pipeline = Pipeline::start(&target);

        let deadline = self.settings.request_deadline;
        let drafted =
            tokio::time::timeout(deadline, self.draft(analysis, range, &target, &mut pipeline))
                .await;

        let draft = match drafted {
            Ok(Ok(draft)) => draft,
            Ok(Err(e)) => {
                pipeline.fail(&e);
                return Err(e);
            }
            Err(_) => {
                let err = GenerationError::new(
                    target.as_str(),
                    GenerationFailure::DeadlineExceeded(deadline),
                );
                pipeline.fail(&err);
                return Err(err.into());
            }
        };

        let ready = match draft {
            Draft::Empty(summary) => {
                pipeline.advance(PipelineState::Done);
                tracing::info!(request = %target, "no activity recorded; model not invoked");
                return Ok(SummaryOutcome::NoActivity(summary));
            }
            Draft::Ready(ready) => ready,
        };

        pipeline.advance(PipelineState::Persisting);
        match self.persist(ready).await {
            Ok(summary) => {
                pipeline.advance(PipelineState::Done);
                tracing::info!(
                    request = %target,
                    analysis = %analysis,
                    logs = summary.metadata.log_count,
                    items = summary.metadata.content_item_count,
                    path = ?summary.summary_path,
                    "summary generated"
                );
                Ok(SummaryOutcome::Generated(summary))
            }
            Err(e) => {
                pipeline.fail(&e);
                Err(e)
            }
        }
    }

    /// Everything up to and including the model call. Runs under the request deadline.
    async fn draft(
        &self,
        analysis: AnalysisType,
        range: DateRange,
        target: &str,
        pipeline: &mut Pipeline<'_>,
    ) -> Result<Draft, SummaryError> {
        // 1. Gather the log text for the window
        // The merged text carries per-day headers, so its entry count comes
        // from the merge rather than from counting lines.
        let (log_text, source_log_path, log_count) = match analysis {
            AnalysisType::Weekly => {
                let merged = self.journal.merge_range(&range).await?;
                (merged.text, merged.path, merged.entry_count)
            }
            _ => {
                let date = range.start();
                let text = self.journal.read_day(date).await?;
                let count = count_entries(&text);
                (text, self.journal.daily_log_path(date), count)
            }
        };

        // 2. Narrow the content snapshot to the same window
        pipeline.advance(PipelineState::Filtering);
        let snapshot = self.content.snapshot().await?;
        let items = filter_by_date_range(&snapshot, &range, self.zone());

        let label = range_label(analysis, &range);
        let metadata = SummaryMetadata {
            generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            date_range: label.clone(),
            log_count,
            content_item_count: items.len(),
            analysis_type: analysis,
        };

        if log_count == 0 && items.is_empty() {
            let mut markdown = no_activity_markdown(&label);
            if analysis == AnalysisType::TodayInProgress {
                markdown.push_str(IN_PROGRESS_NOTE);
            }
            return Ok(Draft::Empty(Summary {
                markdown,
                metadata,
                source_log_path,
                summary_path: None,
            }));
        }

        // 3. Render the prompt
        pipeline.advance(PipelineState::Prompting);
        let prompt = prompt::render(&PromptInputs {
            analysis,
            range: &range,
            log_text: &log_text,
            items: &items,
            zone: self.zone(),
        });

        // 4. Invoke the model
        pipeline.advance(PipelineState::Invoking);
        let mut markdown = self.invoke(target, &prompt, &items).await?;
        if analysis == AnalysisType::TodayInProgress {
            markdown.push_str(IN_PROGRESS_NOTE);
        }

        Ok(Draft::Ready(ReadyDraft {
            key: target.to_string(),
            log_text,
            summary: Summary {
                markdown,
                metadata,
                source_log_path,
                summary_path: None,
            },
        }))
    }

    async fn invoke(
        &self,
        target: &str,
        prompt: &str,
        items: &[ContentItem],
    ) -> Result<String, GenerationError> {
        let limit = self.settings.generation_timeout;
        tracing::info!(
            request = target,
            model = self.model.name(),
            prompt_chars = prompt.len(),
            items = items.len(),
            "invoking language model"
        );

        let generated = tokio::time::timeout(
            limit,
            self.model.generate(prompt, self.settings.max_output_tokens),
        )
        .await
        .map_err(|_| GenerationError::new(target, GenerationFailure::Timeout(limit)))?
        .map_err(|e| GenerationError::new(target, e))?;

        let markdown = generated.trim().to_string();
        if markdown.is_empty() {
            return Err(GenerationError::new(
                target,
                crate::llm::LlmError::EmptyResponse,
            ));
        }

        let missing = missing_sections(&markdown);
        if !missing.is_empty() {
            tracing::warn!(request = target, missing = ?missing, "model output is missing sections");
        }
        Ok(markdown)
    }

    /// Source snapshot, metadata, and markdown are replaced together; if any
    /// of them cannot be written the previous artifacts stay in place.
    async fn persist(&self, ready: ReadyDraft) -> Result<Summary, SummaryError> {
        let layout = self.journal.layout();
        let ReadyDraft {
            key,
            log_text,
            mut summary,
        } = ready;

        let source_path = layout.summary_source(&key);
        let metadata_path = layout.summary_metadata(&key);
        let summary_path: PathBuf = layout.summary_markdown(&key);

        let record = ArtifactRecord {
            metadata: &summary.metadata,
            model: self.model.name(),
            source_log_path: &summary.source_log_path,
        };
        let mut json = serde_json::to_vec_pretty(&record).map_err(|source| {
            StorageError::Encode {
                path: metadata_path.clone(),
                source,
            }
        })?;
        json.push(b'\n');

        storage::write_atomic_all(&[
            (source_path.as_path(), log_text.as_bytes()),
            (metadata_path.as_path(), json.as_slice()),
            (summary_path.as_path(), summary.markdown.as_bytes()),
        ])
        .await?;

        summary.summary_path = Some(summary_path);
        Ok(summary)
    }
}

/// Headings from [`SECTION_HEADINGS`] that do not appear as lines in `markdown`.
pub fn missing_sections(markdown: &str) -> Vec<&'static str> {
    SECTION_HEADINGS
        .iter()
        .copied()
        .filter(|heading| !markdown.lines().any(|line| line.trim() == *heading))
        .collect()
}

fn range_label(analysis: AnalysisType, range: &DateRange) -> String {
    match analysis {
        AnalysisType::Weekly => format!("{} to {}", day_key(range.start()), day_key(range.end())),
        _ => day_key(range.start()),
    }
}

fn no_activity_markdown(label: &str) -> String {
    format!("# No Activity Recorded\n\nNo phone logs or blog posts found for {label}.\n")
}
