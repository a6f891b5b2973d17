//! AST query adapter: normalized parse trees, path expressions, search.

pub mod normalize;
pub mod path;
pub mod query;

pub use normalize::{NodeId, SourceTree};
pub use path::PathExpr;
pub use query::{find_matches, parse_file, select, stage_replacement, stage_text, FileMatches};
