//! CLI `log` and `import` commands: append entries without going through MCP.

use std::path::Path;

use anyhow::{Context, Result};
use daybook::config::DaybookConfig;
use daybook::journal::{BatchStatus, LogEntry};

/// Append a single entry, stamped now unless `timestamp` (epoch millis) is given.
pub async fn log(
    config: &DaybookConfig,
    app: &str,
    text: &str,
    timestamp: Option<i64>,
    device: Option<&str>,
) -> Result<()> {
    let journal = super::open_journal(config).await?;

    let timestamp = timestamp.unwrap_or_else(|| chrono::Utc::now().timestamp_millis());
    let mut entry = LogEntry::new(text, app, timestamp);
    if let Some(device) = device {
        entry = entry.with_device(device);
    }

    let date = journal.append_entry(&entry).await?;
    println!(
        "Appended to {}",
        journal.daily_log_path(date).display()
    );
    Ok(())
}

/// Append every entry from a JSON file.
///
/// Accepts either a bare array of entries or the device upload body
/// `{"logs": [...]}`. Entries use the device field names
/// (`text`, `appPackage`, `timestamp`, `deviceId`).
pub async fn import(config: &DaybookConfig, file: &Path) -> Result<()> {
    let json = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("failed to read import file: {}", file.display()))?;

    let entries = parse_import(&json).context("failed to parse import JSON")?;

    let journal = super::open_journal(config).await?;

    println!("Importing {} log entries...", entries.len());
    let report = journal.append_batch(&entries).await;

    for failure in &report.failed {
        eprintln!("  entry {}: {}", failure.index, failure.error);
    }
    println!("{}", report.message());

    if report.status() == BatchStatus::Failed && !entries.is_empty() {
        anyhow::bail!("import failed");
    }
    Ok(())
}

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum ImportData {
    Upload { logs: Vec<LogEntry> },
    Entries(Vec<LogEntry>),
}

fn parse_import(json: &str) -> serde_json::Result<Vec<LogEntry>> {
    Ok(match serde_json::from_str::<ImportData>(json)? {
        ImportData::Upload { logs } => logs,
        ImportData::Entries(entries) => entries,
    })
}
