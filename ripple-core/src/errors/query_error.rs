//! Errors raised while parsing sources and evaluating path expressions.

use super::error_code::{self, RippleErrorCode};

/// Errors from the tree query layer. All of these are fatal: the project
/// state cannot be trusted for further edits once one is raised.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("TypeScript parse failed for {path}: {message}")]
    Parse { path: String, message: String },

    #[error("invalid path expression `{expression}`: {message}")]
    InvalidExpression { expression: String, message: String },

    #[error("invalid search glob `{glob}`: {message}")]
    InvalidGlob { glob: String, message: String },

    #[error("no file at {path}")]
    FileNotFound { path: String },

    #[error("node belongs to a stale parse of {path}; re-query after flush")]
    StaleNode { path: String },
}

impl RippleErrorCode for QueryError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Parse { .. } => error_code::PARSE_FAILED,
            Self::InvalidExpression { .. } => error_code::INVALID_PATH_EXPRESSION,
            Self::InvalidGlob { .. } => error_code::INVALID_GLOB,
            Self::FileNotFound { .. } => error_code::FILE_NOT_FOUND,
            Self::StaleNode { .. } => error_code::STALE_NODE,
        }
    }
}
