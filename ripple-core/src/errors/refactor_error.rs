//! Fatal and recoverable errors for plan execution.

use super::error_code::{self, RippleErrorCode};
use super::{ProjectError, QueryError};

/// A migration sink refused a record.
#[derive(Debug, thiserror::Error)]
#[error("migration sink failure: {message}")]
pub struct SinkError {
    pub message: String,
}

impl SinkError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Fatal umbrella error: execution stops and the error surfaces to the
/// caller. Recoverable refusals live in [`EditError`] instead.
#[derive(Debug, thiserror::Error)]
pub enum RefactorError {
    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Project(#[from] ProjectError),

    #[error(transparent)]
    Sink(#[from] SinkError),
}

impl RippleErrorCode for RefactorError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Query(e) => e.error_code(),
            Self::Project(e) => e.error_code(),
            Self::Sink(_) => error_code::SINK_FAILED,
        }
    }
}

/// Outcome of implementing (or planning) a single requirement.
///
/// The first four variants are refusals: they are recorded on the report as
/// unimplemented requirements and execution continues. `Fatal` aborts the
/// whole run. Display strings on the refusals are stable; reports carry them
/// verbatim.
#[derive(Debug, thiserror::Error)]
pub enum EditError {
    #[error("Function declaration not found")]
    DeclarationNotFound,

    #[error("More than one function declaration matched")]
    AmbiguousDeclaration { matched: usize },

    #[error("Function not found")]
    CallNotFound,

    #[error("requirement budget of {budget} exceeded while planning")]
    PlanningBudgetExceeded { budget: usize },

    #[error(transparent)]
    Fatal(#[from] RefactorError),
}

impl EditError {
    /// True when execution must stop instead of recording the failure.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal(_))
    }
}

impl From<QueryError> for EditError {
    fn from(e: QueryError) -> Self {
        Self::Fatal(RefactorError::Query(e))
    }
}

impl From<ProjectError> for EditError {
    fn from(e: ProjectError) -> Self {
        Self::Fatal(RefactorError::Project(e))
    }
}

impl From<SinkError> for EditError {
    fn from(e: SinkError) -> Self {
        Self::Fatal(RefactorError::Sink(e))
    }
}

impl RippleErrorCode for EditError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::DeclarationNotFound => error_code::DECLARATION_NOT_FOUND,
            Self::AmbiguousDeclaration { .. } => error_code::AMBIGUOUS_DECLARATION,
            Self::CallNotFound => error_code::CALL_NOT_FOUND,
            Self::PlanningBudgetExceeded { .. } => error_code::PLANNER_CYCLE,
            Self::Fatal(e) => e.error_code(),
        }
    }
}
