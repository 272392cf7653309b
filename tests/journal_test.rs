mod helpers;

use std::sync::Arc;

use daybook::dates::{parse_date, DateRange, ReferenceZone};
use daybook::journal::{BatchStatus, LogAccumulator};
use helpers::{entry, journal, DAY_MS, NOV15_0915, NOV15_1140, NOV15_1205};
use tempfile::TempDir;

#[tokio::test]
async fn entries_render_as_timestamped_lines() {
    let tmp = TempDir::new().unwrap();
    let acc = journal(tmp.path());

    acc.append_entry(&entry("Working on backend", "com.android.vscode", NOV15_0915))
        .await
        .unwrap();
    acc.append_entry(&entry("lunch?", "com.whatsapp", NOV15_1140))
        .await
        .unwrap();

    let day = parse_date("2025-11-15").unwrap();
    let content = acc.read_day(day).await.unwrap();
    assert_eq!(
        content,
        "[09:15:00] [com.android.vscode] Working on backend\n[11:40:30] [com.whatsapp] lunch?\n"
    );
    assert!(tmp.path().join("2025-11-15").join("daily.log").exists());
    assert_eq!(acc.entry_count(day).await.unwrap(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_same_day_appends_never_interleave() {
    let tmp = TempDir::new().unwrap();
    let acc = journal(tmp.path());
    let n = 64;

    let mut handles = Vec::new();
    for i in 0..n {
        let acc = Arc::clone(&acc);
        handles.push(tokio::spawn(async move {
            let text = format!("message-{i:03} {}", "x".repeat(200));
            acc.append_entry(&entry(&text, "com.app", NOV15_0915 + i))
                .await
                .unwrap();
        }));
    }
    for h in handles {
        h.await.unwrap();
    }

    let content = acc.read_day(parse_date("2025-11-15").unwrap()).await.unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), n as usize);

    let expected_tail = "x".repeat(200);
    for line in &lines {
        assert!(line.starts_with("[09:15:00] [com.app] message-"), "mangled line: {line}");
        assert!(line.ends_with(&expected_tail), "mangled line: {line}");
    }
    for i in 0..n {
        let marker = format!("message-{i:03} ");
        assert_eq!(lines.iter().filter(|l| l.contains(&marker)).count(), 1);
    }
}

#[tokio::test]
async fn appends_to_different_days_land_in_separate_logs() {
    let tmp = TempDir::new().unwrap();
    let acc = journal(tmp.path());

    let today = entry("today", "com.app", NOV15_0915);
    let tomorrow = entry("tomorrow", "com.app", NOV15_0915 + DAY_MS);
    let (a, b) = tokio::join!(acc.append_entry(&today), acc.append_entry(&tomorrow));
    assert_eq!(a.unwrap(), parse_date("2025-11-15").unwrap());
    assert_eq!(b.unwrap(), parse_date("2025-11-16").unwrap());

    let d16 = acc.read_day(parse_date("2025-11-16").unwrap()).await.unwrap();
    assert_eq!(d16, "[09:15:00] [com.app] tomorrow\n");
}

#[tokio::test]
async fn reading_an_unlogged_day_is_empty_and_creates_nothing() {
    let tmp = TempDir::new().unwrap();
    let acc = journal(tmp.path());

    let content = acc.read_day(parse_date("2030-01-01").unwrap()).await.unwrap();
    assert_eq!(content, "");
    assert!(!tmp.path().join("2030-01-01").exists());
}

#[tokio::test]
async fn line_breaks_in_text_are_flattened() {
    let tmp = TempDir::new().unwrap();
    let acc = journal(tmp.path());

    acc.append_entry(&entry("first line\r\n  second line\nthird", "com.notes", NOV15_1205))
        .await
        .unwrap();

    let content = acc.read_day(parse_date("2025-11-15").unwrap()).await.unwrap();
    assert_eq!(content, "[12:05:10] [com.notes] first line second line third\n");
}

#[tokio::test]
async fn day_boundary_follows_reference_zone() {
    let tmp = TempDir::new().unwrap();
    let zone: ReferenceZone = "-05:00".parse().unwrap();
    let acc = LogAccumulator::new(tmp.path(), zone);

    // 2025-11-15T03:00:00Z is still the 14th at UTC-5.
    let ts = NOV15_0915 - (6 * 3600 + 15 * 60) * 1000;
    let date = acc.append_entry(&entry("late night", "com.app", ts)).await.unwrap();
    assert_eq!(date, parse_date("2025-11-14").unwrap());

    let content = acc.read_day(date).await.unwrap();
    assert_eq!(content, "[22:00:00] [com.app] late night\n");
}

#[tokio::test]
async fn batch_reports_partial_failure() {
    let tmp = TempDir::new().unwrap();
    let acc = journal(tmp.path());

    let report = acc
        .append_batch(&[
            entry("ok one", "com.app", NOV15_0915),
            entry("bad", "com.app", i64::MAX),
            entry("ok two", "com.app", NOV15_1140),
        ])
        .await;

    assert_eq!(report.appended, 2);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].index, 1);
    assert_eq!(report.status(), BatchStatus::Partial);
    assert_eq!(acc.entry_count(parse_date("2025-11-15").unwrap()).await.unwrap(), 2);
}

#[tokio::test]
async fn merge_skips_quiet_days_and_keeps_order() {
    let tmp = TempDir::new().unwrap();
    let acc = journal(tmp.path());

    // 13th and 15th have entries; 14th is silent.
    acc.append_entry(&entry("fifteenth", "com.app", NOV15_0915))
        .await
        .unwrap();
    acc.append_entry(&entry("thirteenth", "com.app", NOV15_0915 - 2 * DAY_MS))
        .await
        .unwrap();

    let range = DateRange::parse("2025-11-13", "2025-11-15").unwrap();
    let merged = acc.merge_range(&range).await.unwrap();

    assert_eq!(merged.entry_count, 2);
    assert_eq!(
        merged.active_days,
        vec![parse_date("2025-11-13").unwrap(), parse_date("2025-11-15").unwrap()]
    );
    assert!(!merged.text.contains("Date: 2025-11-14"));

    let first = merged.text.find("Date: 2025-11-13").unwrap();
    let second = merged.text.find("Date: 2025-11-15").unwrap();
    assert!(first < second);
    assert!(merged.text.find("thirteenth").unwrap() < merged.text.find("fifteenth").unwrap());

    let expected_path = tmp
        .path()
        .join("2025-11-13_to_2025-11-15")
        .join("weekly.log");
    assert_eq!(merged.path, expected_path);
    assert_eq!(std::fs::read_to_string(&expected_path).unwrap(), merged.text);
}

#[tokio::test]
async fn merge_of_empty_range_is_empty() {
    let tmp = TempDir::new().unwrap();
    let acc = journal(tmp.path());

    let range = DateRange::parse("2025-11-01", "2025-11-07").unwrap();
    let merged = acc.merge_range(&range).await.unwrap();
    assert_eq!(merged.text, "");
    assert_eq!(merged.entry_count, 0);
    assert!(merged.active_days.is_empty());
}
