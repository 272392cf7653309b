//! Analysis prompt rendering.
//!
//! [`render`] is a pure function of its inputs: same logs, same items, same
//! analysis type and range always produce the same prompt. Empty inputs still
//! render a complete prompt; deciding whether to call the model at all is the
//! engine's job.

use crate::content::ContentItem;
use crate::dates::{day_key, DateRange, ReferenceZone};

use super::types::AnalysisType;

/// The four sections every analysis must contain, in order.
pub const SECTION_HEADINGS: [&str; 4] = [
    "## What You Did",
    "## What Was On Your Mind",
    "## Mood Analysis",
    "## Personality Insights",
];

const RULE: &str = "====================================";
const ITEM_RULE: &str = "------------------------------------------------------------";

pub struct PromptInputs<'a> {
    pub analysis: AnalysisType,
    pub range: &'a DateRange,
    pub log_text: &'a str,
    pub items: &'a [ContentItem],
    pub zone: ReferenceZone,
}

/// Title line the model is asked to open the document with.
pub fn title(analysis: AnalysisType, range: &DateRange) -> String {
    match analysis {
        AnalysisType::Daily => format!("# Daily Summary - {}", day_key(range.start())),
        AnalysisType::TodayInProgress => format!("# Today So Far - {}", day_key(range.start())),
        AnalysisType::Weekly => format!(
            "# Weekly Summary - {} to {}",
            day_key(range.start()),
            day_key(range.end())
        ),
    }
}

pub fn render(inputs: &PromptInputs<'_>) -> String {
    let analysis = inputs.analysis;
    let mut out = String::new();

    out.push_str(&opening(analysis));
    out.push_str("\n\n");

    if analysis == AnalysisType::TodayInProgress {
        out.push_str(
            "IMPORTANT: this day is still in progress. The data below covers only part of the \
             day and more activity will follow. Treat every observation as provisional, say so \
             where it matters, and never present a conclusion about the day as final.\n\n",
        );
    }

    out.push_str(&data_block(inputs));
    out.push_str("\n\n");

    out.push_str(
        "Write a markdown document with exactly the structure below. Use the four section \
         headings verbatim and in this order; do not rename, merge, add, or drop sections.\n\n",
    );
    out.push_str(&title(analysis, inputs.range));
    out.push_str("\n\n");

    for (heading, guidance) in SECTION_HEADINGS.iter().zip(section_guidance(analysis)) {
        out.push_str(heading);
        out.push('\n');
        out.push_str(guidance);
        out.push_str("\nBack every point with evidence from the data: quote the captured text or paraphrase it closely, and mention the app or time when it helps.\n\n");
    }

    if analysis == AnalysisType::Weekly {
        out.push_str(
            "Across the whole period, describe trends, shifts, and contrasts between days \
             (for example early versus late in the week, or weekdays versus the weekend). \
             Do not walk through the days one by one or repeat the same observation per day. \
             Point out days that have noticeably more or less data.\n\n",
        );
    }

    out.push_str("Guidelines:\n");
    out.push_str("- Be observational and honest, not judgmental.\n");
    out.push_str("- Ground every claim in the data above; quote or paraphrase the evidence.\n");
    out.push_str("- Never invent apps, people, events, or feelings that do not appear in the data.\n");
    out.push_str("- If the data is thin or missing, say so plainly instead of filling the gap.\n");
    out.push_str("- Keep each section to 3-5 bullet points or 1-2 short paragraphs.\n\n");
    out.push_str("Output only the markdown document, with no preamble or closing remarks.\n");

    out
}

fn opening(analysis: AnalysisType) -> String {
    let (span, when) = match analysis {
        AnalysisType::Daily => ("one day", "that day"),
        AnalysisType::TodayInProgress => ("the current day so far", "today"),
        AnalysisType::Weekly => ("a span of several days", "during this period"),
    };
    format!(
        "You are analyzing {span} in someone's life. You have two sources: text captured from \
         the apps on their phone, each line tagged with a time and the app it came from, and \
         any blog posts they published {when}."
    )
}

fn data_block(inputs: &PromptInputs<'_>) -> String {
    let mut out = String::new();
    let label = match inputs.analysis {
        AnalysisType::Weekly => format!(
            "DATA FROM {} TO {}",
            day_key(inputs.range.start()),
            day_key(inputs.range.end())
        ),
        _ => format!("DATA FROM {}", day_key(inputs.range.start())),
    };

    out.push_str(&format!("{RULE}\n{label}\n{RULE}\n\n"));

    let logs_heading = match inputs.analysis {
        AnalysisType::Weekly => "PHONE ACTIVITY LOGS (BY DAY):",
        _ => "PHONE ACTIVITY LOGS:",
    };
    let logs = inputs.log_text.trim_end();
    if logs.trim().is_empty() {
        out.push_str(&format!("{logs_heading} None\n"));
    } else {
        out.push_str(&format!("{logs_heading}\n{logs}\n"));
    }

    out.push('\n');
    if inputs.items.is_empty() {
        out.push_str("BLOG POSTS: None\n");
    } else {
        out.push_str("BLOG POSTS:\n\n");
        for item in inputs.items {
            out.push_str(&render_item(item, inputs.zone));
        }
    }

    out.push_str(&format!("\n{RULE}\nEND OF DATA\n{RULE}"));
    out
}

fn render_item(item: &ContentItem, zone: ReferenceZone) -> String {
    let published = zone
        .at_seconds(item.published_at)
        .map(|dt| format!("{} ({zone})", dt.format("%Y-%m-%d %H:%M:%S")))
        .unwrap_or_else(|| "unknown".into());
    let title = if item.title.trim().is_empty() {
        "Untitled"
    } else {
        item.title.trim()
    };

    let mut out = format!("Title: {title}\nURL: {}\nPublished: {published}\n", item.url);
    if let Some(summary) = item.summary.as_deref().filter(|s| !s.trim().is_empty()) {
        out.push_str(&format!("Summary: {}\n", summary.trim()));
    }
    out.push_str(&format!("\nContent:\n{}\n{ITEM_RULE}\n", item.body.trim()));
    out
}

fn section_guidance(analysis: AnalysisType) -> [&'static str; 4] {
    match analysis {
        AnalysisType::Weekly => [
            "The main activities and projects of the period, how time was split between work, \
             learning, social contact, and leisure, and any notable events.",
            "The dominant topics and questions, how they persisted or shifted across the days, \
             and problems that were being worked through.",
            "The overall mood trend (improving, declining, stable), the best and hardest days, \
             and what seemed to trigger stress or satisfaction.",
            "Behavioral traits that show up on several days: communication style, work habits, \
             how challenges are handled, and what gets chosen when time is free.",
        ],
        _ => [
            "What they actually did: which apps were used and for what, key tasks or projects, \
             social interactions, and the balance between productive and leisure time.",
            "The topics, questions, and concerns that dominated their text, including problems \
             they were trying to solve and things they looked up.",
            "Their emotional state and energy, read from tone, word choice, punctuation, and \
             message length, including any shifts over the course of the day.",
            "Patterns in communication and thinking: direct or verbose, detail-oriented or \
             big-picture, and what their choices suggest they value.",
        ],
    }
}
