//! Analyzer error types.
//!
//! Only conditions that stop an operation are errors. Malformed records and
//! questions that cannot be embedded are accumulated as warnings instead, and
//! an unreachable pass target is reported through `StrategyResult::feasible`.

use thiserror::Error;

/// Errors returned by the analytical operations of [`crate::analyzer::ExamAnalyzer`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalyzerError {
    /// An operation was attempted before a successful build.
    #[error("exam analyzer not ready: {0}")]
    NotReady(String),

    /// The caller passed an input the operation cannot work with.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The build produced no usable records or no embeddings.
    #[error("build failed: {0}")]
    BuildFailure(String),
}

impl AnalyzerError {
    /// Returns `true` if the analyzer has not been successfully built.
    pub fn is_not_ready(&self) -> bool {
        matches!(self, AnalyzerError::NotReady(_))
    }

    /// Returns `true` if the error was caused by caller input.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, AnalyzerError::InvalidInput(_))
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        AnalyzerError::InvalidInput(message.into())
    }
}

/// Errors produced while computing a single embedding vector.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmbeddingError {
    /// The text contained no tokens the embedder could use.
    #[error("text has no embeddable tokens")]
    EmptyText,

    /// The embedder produced a vector of the wrong size.
    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}
