//! CLI `show` command: print the raw log for a day or a range.

use anyhow::Result;
use daybook::config::DaybookConfig;
use daybook::dates::{parse_date, DateRange};
use daybook::journal::count_entries;

pub async fn show(
    config: &DaybookConfig,
    date: Option<&str>,
    start: Option<&str>,
    end: Option<&str>,
) -> Result<()> {
    let journal = super::open_journal(config).await?;
    let today = journal.zone().today();

    if date.is_some() || (start.is_none() && end.is_none()) {
        let date = match date {
            Some(s) => parse_date(s)?,
            None => today,
        };
        let content = journal.read_day(date).await?;
        if content.is_empty() {
            println!("No entries for {date}.");
        } else {
            print!("{content}");
        }
        return Ok(());
    }

    let range = DateRange::resolve(start, end, today, config.summary.default_range_days)?;
    let days = journal.read_range(&range).await?;

    let total: usize = days.values().map(|c| count_entries(c)).sum();
    println!("Logs {range} ({total} entries)");
    println!("{}", "=".repeat(40));
    for (date, content) in &days {
        let count = count_entries(content);
        if count == 0 {
            println!("\n{date}: (no entries)");
            continue;
        }
        println!("\n{date}: {count} entries");
        print!("{content}");
    }

    Ok(())
}
