use std::time::Duration;

use crate::llm::LlmError;
use crate::storage::StorageError;

/// Why a model invocation produced no usable analysis.
#[derive(Debug, thiserror::Error)]
pub enum GenerationFailure {
    #[error(transparent)]
    Model(#[from] LlmError),

    #[error("model call exceeded {0:?}")]
    Timeout(Duration),

    #[error("request deadline of {0:?} exceeded")]
    DeadlineExceeded(Duration),
}

/// A failed generation, tagged with the date or range it was for.
/// Nothing is persisted when this is returned.
#[derive(Debug, thiserror::Error)]
#[error("summary generation failed for {target}: {kind}")]
pub struct GenerationError {
    pub target: String,
    #[source]
    pub kind: GenerationFailure,
}

impl GenerationError {
    pub fn new(target: impl Into<String>, kind: impl Into<GenerationFailure>) -> Self {
        Self {
            target: target.into(),
            kind: kind.into(),
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(
            self.kind,
            GenerationFailure::Timeout(_)
                | GenerationFailure::DeadlineExceeded(_)
                | GenerationFailure::Model(LlmError::Timeout(_))
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SummaryError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Generation(#[from] GenerationError),
}
