#![allow(dead_code)]

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use daybook::content::{ContentItem, StaticContent};
use daybook::dates::ReferenceZone;
use daybook::journal::{LogAccumulator, LogEntry};
use daybook::llm::{LanguageModel, LlmError};
use daybook::summary::{EngineSettings, SummaryEngine};

// 2025-11-15T09:15:00Z
pub const NOV15_0915: i64 = 1_763_198_100_000;
// 2025-11-15T11:40:30Z
pub const NOV15_1140: i64 = 1_763_206_830_000;
// 2025-11-15T12:05:10Z
pub const NOV15_1205: i64 = 1_763_208_310_000;
pub const DAY_MS: i64 = 86_400_000;

/// What a [`ScriptedModel`] answers with.
#[derive(Clone)]
pub enum Reply {
    Markdown(String),
    Status(u16),
    Empty,
}

/// In-process [`LanguageModel`] that returns a fixed reply and records every prompt.
pub struct ScriptedModel {
    reply: Reply,
    delay: Option<Duration>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    pub fn new(reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            delay: None,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        })
    }

    /// Answers with [`analysis_markdown`] for `title`.
    pub fn answering(title: &str) -> Arc<Self> {
        Self::new(Reply::Markdown(analysis_markdown(title)))
    }

    /// Sleeps for `delay` before answering.
    pub fn slow(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            reply: Reply::Markdown(analysis_markdown("# Too Late")),
            delay: Some(delay),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn generate(&self, prompt: &str, _max_output_tokens: u32) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.reply {
            Reply::Markdown(text) => Ok(text.clone()),
            Reply::Status(status) => Err(LlmError::Status {
                status: *status,
                body: "scripted failure".into(),
            }),
            Reply::Empty => Err(LlmError::EmptyResponse),
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// A well-formed analysis with all four sections under `title`.
pub fn analysis_markdown(title: &str) -> String {
    format!(
        "{title}\n\n\
         ## What You Did\n- Worked on the backend in VS Code (\"Working on backend\").\n\n\
         ## What Was On Your Mind\n- Database choices.\n\n\
         ## Mood Analysis\n- Focused and steady.\n\n\
         ## Personality Insights\n- Prefers to dig into details.\n"
    )
}

pub fn entry(text: &str, app: &str, timestamp: i64) -> LogEntry {
    LogEntry::new(text, app, timestamp)
}

pub fn post(title: &str, published_at_secs: i64) -> ContentItem {
    ContentItem {
        title: title.into(),
        body: format!("Body of {title}."),
        url: format!("https://blog.example/{}", title.to_lowercase().replace(' ', "-")),
        published_at: published_at_secs,
        scraped_at: published_at_secs + 60,
        summary: None,
    }
}

/// Short timeouts so failure tests finish quickly.
pub fn fast_settings() -> EngineSettings {
    EngineSettings {
        max_output_tokens: 4000,
        generation_timeout: Duration::from_secs(5),
        request_deadline: Duration::from_secs(10),
        default_range_days: 7,
    }
}

pub fn journal(root: &Path) -> Arc<LogAccumulator> {
    Arc::new(LogAccumulator::new(root, ReferenceZone::utc()))
}

/// Engine over `journal` with a static content snapshot.
pub fn engine(
    journal: &Arc<LogAccumulator>,
    model: Arc<dyn LanguageModel>,
    items: Vec<ContentItem>,
    settings: EngineSettings,
) -> SummaryEngine {
    SummaryEngine::new(
        Arc::clone(journal),
        Arc::new(StaticContent::new(items)),
        model,
        settings,
    )
}
