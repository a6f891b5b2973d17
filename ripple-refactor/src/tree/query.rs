//! Path-expression evaluation and project-wide search.

use std::ops::Range;

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use ripple_core::{FxHashSet, QueryError};

use crate::project::{Project, StagedEdit};

use super::normalize::{NodeId, SourceTree};
use super::path::{Axis, PathExpr, Predicate, Step};

/// All matches of one expression within one file.
#[derive(Debug)]
pub struct FileMatches {
    pub tree: SourceTree,
    pub nodes: Vec<NodeId>,
}

/// Parse one project file at the current epoch.
pub fn parse_file(project: &Project, path: &str) -> Result<SourceTree, QueryError> {
    let content = project
        .file(path)
        .ok_or_else(|| QueryError::FileNotFound {
            path: path.to_string(),
        })?;
    SourceTree::parse(path, content, project.epoch())
}

/// Compile search globs. Brace alternation and `**` follow gitignore-style
/// semantics; a plain file path matches itself.
pub fn compile_globs(globs: &[String]) -> Result<GlobSet, QueryError> {
    let mut builder = GlobSetBuilder::new();
    for glob in globs {
        let compiled = GlobBuilder::new(glob)
            .literal_separator(true)
            .build()
            .map_err(|e| QueryError::InvalidGlob {
                glob: glob.clone(),
                message: e.to_string(),
            })?;
        builder.add(compiled);
    }
    builder.build().map_err(|e| QueryError::InvalidGlob {
        glob: globs.join(","),
        message: e.to_string(),
    })
}

/// Evaluate `expr` over every project file matching `globs`.
///
/// Files are visited in sorted path order; nodes within a file come back in
/// document order. Files with no matches are omitted.
pub fn find_matches(
    project: &Project,
    globs: &[String],
    expr: &PathExpr,
) -> Result<Vec<FileMatches>, QueryError> {
    let glob_set = compile_globs(globs)?;
    let mut results = Vec::new();
    let paths: Vec<String> = project
        .paths()
        .filter(|p| glob_set.is_match(p))
        .map(str::to_string)
        .collect();
    for path in paths {
        let tree = parse_file(project, &path)?;
        let nodes = select(&tree, tree.root(), expr);
        if !nodes.is_empty() {
            results.push(FileMatches { tree, nodes });
        }
    }
    Ok(results)
}

/// Evaluate a path expression relative to `from`, in document order,
/// deduplicated.
pub fn select(tree: &SourceTree, from: NodeId, expr: &PathExpr) -> Vec<NodeId> {
    let mut current = vec![from];
    for step in &expr.steps {
        let mut next = Vec::new();
        let mut seen = FxHashSet::default();
        for &node in &current {
            match step.axis {
                Axis::Child => {
                    for &child in tree.children(node) {
                        if step_matches(tree, child, step) && seen.insert(child) {
                            next.push(child);
                        }
                    }
                }
                Axis::Descendant => {
                    collect_descendants(tree, node, step, &mut seen, &mut next);
                }
            }
        }
        current = next;
        if current.is_empty() {
            break;
        }
    }
    current
}

fn collect_descendants(
    tree: &SourceTree,
    node: NodeId,
    step: &Step,
    seen: &mut FxHashSet<NodeId>,
    out: &mut Vec<NodeId>,
) {
    for &child in tree.children(node) {
        if step_matches(tree, child, step) && seen.insert(child) {
            out.push(child);
        }
        collect_descendants(tree, child, step, seen, out);
    }
}

fn step_matches(tree: &SourceTree, node: NodeId, step: &Step) -> bool {
    if !step.name.matches(tree.name(node)) {
        return false;
    }
    step.predicates.iter().all(|p| match p {
        Predicate::Value(expected) => tree.value(node) == expected,
        Predicate::Path(path) => !select(tree, node, path).is_empty(),
    })
}

/// Stage a rewrite of `node`'s source range, to be committed by the next
/// [`Project::flush`]. The tree must have been parsed at the project's
/// current epoch.
pub fn stage_replacement(
    project: &mut Project,
    tree: &SourceTree,
    node: NodeId,
    replacement: impl Into<String>,
) -> Result<(), QueryError> {
    stage_text(project, tree, tree.range(node), replacement)
}

/// Stage a raw range edit against the file a tree was parsed from. An empty
/// range inserts.
pub fn stage_text(
    project: &mut Project,
    tree: &SourceTree,
    range: Range<usize>,
    replacement: impl Into<String>,
) -> Result<(), QueryError> {
    if tree.epoch() != project.epoch() {
        return Err(QueryError::StaleNode {
            path: tree.path().to_string(),
        });
    }
    project.stage(StagedEdit {
        path: tree.path().to_string(),
        range,
        replacement: replacement.into(),
    });
    Ok(())
}
