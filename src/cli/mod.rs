pub mod doctor;
pub mod log;
pub mod show;
pub mod summarize;

use std::time::Duration;

use anyhow::Result;
use daybook::config::DaybookConfig;
use daybook::journal::LogAccumulator;
use indicatif::{ProgressBar, ProgressStyle};

/// Open the configured analysis tree for direct use by a CLI command.
pub async fn open_journal(config: &DaybookConfig) -> Result<LogAccumulator> {
    let zone = config.reference_zone()?;
    let journal = LogAccumulator::open(config.resolved_analysis_dir(), zone).await?;
    Ok(journal)
}

/// Spinner on stderr for long model calls. Hidden when stderr is not a terminal.
fn spinner(message: impl Into<String>) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner} {msg} ({elapsed})")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.into());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}
