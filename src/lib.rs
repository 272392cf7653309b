//! Daybook: daily and weekly activity analyses from captured phone text.
//!
//! Daybook is an [MCP](https://modelcontextprotocol.io/) server and CLI that
//! accumulates text captured on a phone into one log per calendar day, then turns
//! a day (or a range of days) of logs, plus any blog posts published in the same
//! window, into a structured markdown analysis written by a local language model.
//!
//! Every analysis has the same four sections:
//!
//! | Section | Covers |
//! |---------|--------|
//! | **What You Did** | Apps used, tasks, projects, social contact |
//! | **What Was On Your Mind** | Topics, questions, problems being worked on |
//! | **Mood Analysis** | Tone, energy, shifts over the day or week |
//! | **Personality Insights** | Recurring patterns in communication and choices |
//!
//! # Architecture
//!
//! - **Storage**: plain files under `<analysis_dir>/<YYYY-MM-DD>/` and
//!   `<analysis_dir>/<start>_to_<end>/`; appends are whole lines, artifacts are
//!   replaced atomically
//! - **Content**: a JSON cache of blog posts filled by an external scraper
//! - **Model**: Ollama `/api/generate`, one non-streaming request per analysis
//! - **Transport**: MCP over stdio (primary) or Streamable HTTP/SSE
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from TOML files and environment variables
//! - [`dates`]: Calendar days, day ranges, and the reference timezone
//! - [`storage`]: On-disk layout and atomic file primitives
//! - [`journal`]: Log entries and the day-partitioned accumulator
//! - [`content`]: Blog post snapshots and date filtering
//! - [`llm`]: Language-model client trait and the Ollama implementation
//! - [`summary`]: Prompt rendering and the summary pipeline

pub mod config;
pub mod content;
pub mod dates;
pub mod journal;
pub mod llm;
pub mod server;
pub mod storage;
pub mod summary;
pub mod tools;
