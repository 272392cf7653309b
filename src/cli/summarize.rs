//! CLI `summarize` commands: run the summary pipeline once and print the markdown.

use std::sync::Arc;

use anyhow::Result;
use daybook::config::DaybookConfig;
use daybook::content::{ContentSource, JsonContentCache};
use daybook::dates::{parse_date, DateRange};
use daybook::llm;
use daybook::summary::{EngineSettings, SummaryEngine, SummaryOutcome};

pub enum Target {
    Day(Option<String>),
    Today,
    Range {
        start: Option<String>,
        end: Option<String>,
    },
}

pub async fn summarize(config: &DaybookConfig, target: Target) -> Result<()> {
    let journal = Arc::new(super::open_journal(config).await?);
    let content: Arc<dyn ContentSource> =
        Arc::new(JsonContentCache::new(config.resolved_content_cache()));
    let model = llm::create_client(&config.llm)?;
    let engine = SummaryEngine::new(
        journal,
        content,
        model,
        EngineSettings::from_config(config),
    );

    let today = engine.zone().today();
    let pb = super::spinner(format!("Generating with {}", config.llm.model));

    let result = match target {
        Target::Day(Some(date)) => {
            let date = parse_date(&date)?;
            pb.set_message(format!("Analyzing {date}"));
            engine.generate_for_date(date).await
        }
        Target::Day(None) => {
            pb.set_message("Analyzing yesterday");
            engine.generate_for_yesterday().await
        }
        Target::Today => {
            pb.set_message(format!("Analyzing {today} so far"));
            engine.generate_for_today().await
        }
        Target::Range {
            start: None,
            end: None,
        } => {
            pb.set_message(format!(
                "Analyzing the last {} days",
                config.summary.default_range_days
            ));
            engine.generate_for_last_days(None).await
        }
        Target::Range { start, end } => {
            let range = DateRange::resolve(
                start.as_deref(),
                end.as_deref(),
                today,
                config.summary.default_range_days,
            )?;
            pb.set_message(format!("Analyzing {range}"));
            engine.generate_for_range(range).await
        }
    };
    pb.finish_and_clear();

    let outcome = result?;
    print_outcome(&outcome);
    Ok(())
}

fn print_outcome(outcome: &SummaryOutcome) {
    let summary = outcome.summary();
    println!("{}", summary.markdown.trim_end());
    println!();
    match &summary.summary_path {
        Some(path) => eprintln!("Saved to {}", path.display()),
        None => eprintln!("Nothing to analyze for {}; no summary saved.", summary.metadata.date_range),
    }
    eprintln!(
        "{} log entries, {} blog posts ({})",
        summary.metadata.log_count, summary.metadata.content_item_count, summary.metadata.analysis_type
    );
}
