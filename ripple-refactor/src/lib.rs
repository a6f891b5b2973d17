//! # ripple-refactor
//!
//! The Ripple refactoring engine: virtual project, AST query adapter over
//! tree-sitter, callable identity inference, import editing, the
//! requirement planner, and the changeset executor.
//!
//! One entry point covers the common case:
//!
//! ```
//! use ripple_core::{
//!     CallableAccess, CallableRef, ImportRef, Provenance, Requirement, TestPopulation,
//! };
//! use ripple_refactor::{Project, Refactorer};
//!
//! let mut project = Project::from_files([(
//!     "src/f.ts",
//!     "export function handle() { return step(\"x\"); }\nfunction step(s: string) {}\n",
//! )]);
//! let root = Requirement::AddParameter(ripple_core::AddParameter {
//!     target: CallableRef::function("step", "src/f.ts", CallableAccess::PrivateFunction),
//!     parameter_type: ImportRef::library("HandlerContext", "@scope/automation"),
//!     parameter_name: "context".to_string(),
//!     populate_in_tests: TestPopulation {
//!         dummy_value: "{} as HandlerContext".to_string(),
//!         additional_import: None,
//!     },
//!     why: Provenance::reason("thread context through handlers"),
//! });
//!
//! let report = Refactorer::new().apply(&mut project, root).unwrap();
//! assert!(report.is_clean());
//! ```

pub mod callables;
pub mod executor;
pub mod imports;
pub mod pipeline;
pub mod planner;
pub mod project;
pub mod tree;

pub use executor::Executor;
pub use pipeline::Refactorer;
pub use planner::Planner;
pub use project::Project;
