use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::dates::ReferenceZone;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DaybookConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub llm: LlmConfig,
    pub summary: SummaryConfig,
    pub time: TimeConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub transport: String,
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    /// Root of the date-keyed analysis tree (`<root>/<YYYY-MM-DD>/daily.log`).
    pub analysis_dir: String,
    /// JSON snapshot of scraped content, maintained by an external scraper.
    pub content_cache: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LlmConfig {
    pub provider: String,
    pub host: String,
    pub model: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
    /// Transport-level timeout for a single completion request.
    pub request_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SummaryConfig {
    /// Upper bound on one model invocation.
    pub generation_timeout_secs: u64,
    /// Upper bound on a summary request from gathering through the model call.
    pub request_deadline_secs: u64,
    pub default_range_days: u32,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct TimeConfig {
    /// Fixed UTC offset (`+HH:MM` / `-HH:MM`) that defines calendar-day boundaries.
    pub utc_offset: String,
}

impl Default for DaybookConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            storage: StorageConfig::default(),
            llm: LlmConfig::default(),
            summary: SummaryConfig::default(),
            time: TimeConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            transport: "stdio".into(),
            host: "127.0.0.1".into(),
            port: 8765,
            log_level: "info".into(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let root = default_daybook_dir();
        Self {
            analysis_dir: root.join("analysis").to_string_lossy().into_owned(),
            content_cache: root
                .join("state")
                .join("blog_cache.json")
                .to_string_lossy()
                .into_owned(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "ollama".into(),
            host: "http://localhost:11434".into(),
            model: "llama3.1:8b".into(),
            temperature: 0.7,
            max_output_tokens: 4000,
            request_timeout_secs: 240,
        }
    }
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            generation_timeout_secs: 240,
            request_deadline_secs: 300,
            default_range_days: 7,
        }
    }
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            utc_offset: "+00:00".into(),
        }
    }
}

impl SummaryConfig {
    pub fn generation_timeout(&self) -> Duration {
        Duration::from_secs(self.generation_timeout_secs)
    }

    pub fn request_deadline(&self) -> Duration {
        Duration::from_secs(self.request_deadline_secs)
    }
}

/// Returns `~/.daybook/`
pub fn default_daybook_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".daybook")
}

/// Returns the default config file path: `~/.daybook/config.toml`
pub fn default_config_path() -> PathBuf {
    default_daybook_dir().join("config.toml")
}

impl DaybookConfig {
    /// Load config from TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            DaybookConfig::default()
        };

        config.apply_env_overrides();
        config.reference_zone()?;
        Ok(config)
    }

    /// Apply environment variable overrides (DAYBOOK_DIR, DAYBOOK_CONTENT_CACHE,
    /// DAYBOOK_OLLAMA_HOST, DAYBOOK_MODEL, DAYBOOK_UTC_OFFSET, DAYBOOK_LOG_LEVEL).
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("DAYBOOK_DIR") {
            self.storage.analysis_dir = val;
        }
        if let Ok(val) = std::env::var("DAYBOOK_CONTENT_CACHE") {
            self.storage.content_cache = val;
        }
        if let Ok(val) = std::env::var("DAYBOOK_OLLAMA_HOST") {
            self.llm.host = val;
        }
        if let Ok(val) = std::env::var("DAYBOOK_MODEL") {
            self.llm.model = val;
        }
        if let Ok(val) = std::env::var("DAYBOOK_UTC_OFFSET") {
            self.time.utc_offset = val;
        }
        if let Ok(val) = std::env::var("DAYBOOK_LOG_LEVEL") {
            self.server.log_level = val;
        }
    }

    /// Resolve the analysis root, expanding `~` if needed.
    pub fn resolved_analysis_dir(&self) -> PathBuf {
        expand_tilde(&self.storage.analysis_dir)
    }

    pub fn resolved_content_cache(&self) -> PathBuf {
        expand_tilde(&self.storage.content_cache)
    }

    /// Parse the configured offset into the zone used for every day boundary.
    pub fn reference_zone(&self) -> Result<ReferenceZone> {
        self.time
            .utc_offset
            .parse()
            .with_context(|| format!("invalid time.utc_offset: {:?}", self.time.utc_offset))
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}
