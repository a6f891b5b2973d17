//! Layered error types for the Ripple engine.

pub mod error_code;
mod project_error;
mod query_error;
mod refactor_error;

pub use error_code::RippleErrorCode;
pub use project_error::ProjectError;
pub use query_error::QueryError;
pub use refactor_error::{EditError, RefactorError, SinkError};
