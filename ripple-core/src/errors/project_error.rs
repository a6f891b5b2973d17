//! Errors raised while committing staged edits to the virtual project.

use super::error_code::{self, RippleErrorCode};

/// Errors from the project layer.
///
/// Overlapping edits within a single flush are a planner bug, not a user
/// error: the planner must never emit two edits over the same source range.
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error("conflicting edits overlap in {path}")]
    ConflictingEdits { path: String },

    #[error("edit range {start}..{end} out of bounds in {path}")]
    EditOutOfBounds {
        path: String,
        start: usize,
        end: usize,
    },

    #[error("no file at {path} for staged edit")]
    UnknownFile { path: String },
}

impl RippleErrorCode for ProjectError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::ConflictingEdits { .. } => error_code::CONFLICTING_EDITS,
            Self::EditOutOfBounds { .. } => error_code::EDIT_OUT_OF_BOUNDS,
            Self::UnknownFile { .. } => error_code::FILE_NOT_FOUND,
        }
    }
}
