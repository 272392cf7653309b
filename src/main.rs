mod cli;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use daybook::config::DaybookConfig;
use daybook::server;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "daybook",
    version,
    about = "Daily activity log and LLM-written summaries, served over MCP"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the MCP server
    Serve {
        /// Transport: stdio or sse. Defaults to server.transport from config.
        #[arg(long)]
        transport: Option<String>,
    },
    /// Append one entry to the daily log
    Log {
        /// Package name of the source app
        app: String,
        /// Captured text
        text: String,
        /// Capture time in epoch milliseconds (default: now)
        #[arg(long)]
        timestamp: Option<i64>,
        /// Capturing device identifier
        #[arg(long)]
        device: Option<String>,
    },
    /// Append entries from a JSON file
    Import {
        /// Path to a JSON array of entries, or an upload body `{"logs": [...]}`
        file: PathBuf,
    },
    /// Print the raw log for a day or a range
    Show {
        /// Day to show (YYYY-MM-DD, default: today)
        date: Option<String>,
        /// First day of a range
        #[arg(long, conflicts_with = "date")]
        start: Option<String>,
        /// Last day of a range
        #[arg(long, conflicts_with = "date")]
        end: Option<String>,
    },
    /// Generate an analysis with the language model
    Summarize {
        #[command(subcommand)]
        target: SummarizeTarget,
    },
    /// Check the analysis directory, content cache, and model server
    Doctor,
}

#[derive(Subcommand)]
enum SummarizeTarget {
    /// One completed day (default: yesterday)
    Day { date: Option<String> },
    /// Today so far, marked as in progress
    Today,
    /// A range of days as one trend report (default: last 7 days)
    Range {
        start: Option<String>,
        end: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load config (for log level)
    let config = DaybookConfig::load()?;

    // Log to stderr so stdout stays clean for MCP JSON-RPC.
    let filter = EnvFilter::try_new(&config.server.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Serve { transport } => {
            let transport = transport.unwrap_or_else(|| config.server.transport.clone());
            match transport.as_str() {
                "stdio" => server::serve_stdio(config).await?,
                "sse" | "http" => server::serve_sse(config).await?,
                other => anyhow::bail!("unknown transport: {other}. Supported: stdio, sse"),
            }
        }
        Command::Log {
            app,
            text,
            timestamp,
            device,
        } => {
            cli::log::log(&config, &app, &text, timestamp, device.as_deref()).await?;
        }
        Command::Import { file } => {
            cli::log::import(&config, &file).await?;
        }
        Command::Show { date, start, end } => {
            cli::show::show(&config, date.as_deref(), start.as_deref(), end.as_deref()).await?;
        }
        Command::Summarize { target } => {
            let target = match target {
                SummarizeTarget::Day { date } => cli::summarize::Target::Day(date),
                SummarizeTarget::Today => cli::summarize::Target::Today,
                SummarizeTarget::Range { start, end } => {
                    cli::summarize::Target::Range { start, end }
                }
            };
            cli::summarize::summarize(&config, target).await?;
        }
        Command::Doctor => {
            cli::doctor::doctor(&config).await?;
        }
    }

    Ok(())
}
