//! Analysis generation: prompt rendering, the summary pipeline, and its artifacts.

pub mod engine;
pub mod error;
pub mod prompt;
pub mod types;

pub use engine::{missing_sections, EngineSettings, PipelineState, SummaryEngine, IN_PROGRESS_NOTE};
pub use error::{GenerationError, GenerationFailure, SummaryError};
pub use prompt::SECTION_HEADINGS;
pub use types::{AnalysisType, Summary, SummaryMetadata, SummaryOutcome};
