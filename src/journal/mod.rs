//! Capture log: entries, line format, and the day-partitioned accumulator.

pub mod accumulator;
pub mod entry;

pub use accumulator::{BatchFailure, BatchReport, BatchStatus, LogAccumulator, MergedLog};
pub use entry::{count_entries, LogEntry};
