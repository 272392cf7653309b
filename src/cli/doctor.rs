//! CLI `doctor` command: check the analysis tree, content cache, and model server.

use anyhow::{Context, Result};
use daybook::config::DaybookConfig;
use daybook::content::{ContentSource, JsonContentCache};
use daybook::llm::ollama::OllamaClient;
use daybook::storage;

/// Run diagnostics and print a health report.
pub async fn doctor(config: &DaybookConfig) -> Result<()> {
    let root = config.resolved_analysis_dir();
    let zone = config.reference_zone()?;

    let report = storage::check_storage_health(&root)
        .await
        .context("failed to inspect analysis directory")?;

    println!("Daybook Health Report");
    println!("=====================");
    println!();
    println!("Analysis dir:      {}", report.root.display());
    println!("Writable:          {}", if report.writable { "yes" } else { "NO" });
    println!("Reference zone:    UTC{zone} (today is {})", zone.today());
    println!();
    println!("Contents:");
    println!("  Days logged:     {}", report.day_dirs);
    println!("  Ranges merged:   {}", report.range_dirs);
    println!("  Summaries:       {}", report.summaries);
    println!("  Log size:        {}", format_bytes(report.log_bytes));
    if let (Some(oldest), Some(newest)) = (&report.oldest_day, &report.newest_day) {
        println!("  Span:            {oldest} .. {newest}");
    }
    if report.stray_temp_files > 0 {
        println!(
            "  WARNING: {} leftover temp files from interrupted writes (safe to delete)",
            report.stray_temp_files
        );
    }
    println!();

    let cache_path = config.resolved_content_cache();
    let cache = JsonContentCache::new(&cache_path);
    println!("Content cache:     {}", cache_path.display());
    if !cache_path.exists() {
        println!("  Status:          not found (summaries will use logs only)");
    } else {
        match cache.snapshot().await {
            Ok(items) => println!("  Status:          OK ({} posts)", items.len()),
            Err(e) => println!("  Status:          UNREADABLE ({e})"),
        }
    }
    println!();

    println!("Language model:");
    println!("  Provider:        {}", config.llm.provider);
    println!("  Host:            {}", config.llm.host);
    println!("  Configured:      {}", config.llm.model);
    if config.llm.provider == "ollama" {
        let client = OllamaClient::new(&config.llm)?;
        match client.list_models().await {
            Ok(models) if models.iter().any(|m| m == &config.llm.model) => {
                println!("  Status:          OK (model available)");
            }
            Ok(models) => {
                println!("  Status:          REACHABLE, model not pulled");
                println!("  Available:       {}", models.join(", "));
                println!("  Run `ollama pull {}` to fetch it.", config.llm.model);
            }
            Err(e) => println!("  Status:          UNREACHABLE ({e})"),
        }
    }

    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
