//! # ripple-core
//!
//! Foundation crate for the Ripple refactoring engine.
//! Defines the data model (callables, imports, requirements, changesets,
//! reports), errors, config, and the migration sink seam.
//! The engine crate depends on this; this depends on no parser.

pub mod config;
pub mod errors;
pub mod traits;
pub mod types;

// Re-export the most commonly used types at the crate root.
pub use config::EngineConfig;
pub use errors::{EditError, ProjectError, QueryError, RefactorError, RippleErrorCode, SinkError};
pub use traits::{InMemoryMigrationSink, JsonLinesSink, MigrationSink};
pub use types::callable::{CallableAccess, CallableRef, Scope, ScopeKind};
pub use types::changeset::Changeset;
pub use types::collections::{FxHashMap, FxHashSet};
pub use types::imports::ImportRef;
pub use types::report::{MigrationRecord, Report, Unimplemented};
pub use types::requirement::{
    AddMigration, AddParameter, PassArgument, PassDummyInTests, Provenance, Requirement,
    RequirementKind, TestPopulation,
};
