//! The virtual project: an in-memory file store with staged textual edits.
//!
//! Paths are project-relative strings with `/` separators. Files iterate in
//! sorted path order so query results are stable across runs. Edits staged
//! through the tree layer accumulate until [`Project::flush`], which applies
//! them back-to-front per file and bumps the epoch; any tree parsed before
//! the flush is invalid afterwards.

use std::collections::BTreeMap;
use std::ops::Range;

use ripple_core::ProjectError;

/// One pending textual replacement. An empty range is an insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StagedEdit {
    pub path: String,
    pub range: Range<usize>,
    pub replacement: String,
}

/// A mutable, in-memory TypeScript project.
#[derive(Debug, Default)]
pub struct Project {
    files: BTreeMap<String, String>,
    staged: Vec<StagedEdit>,
    epoch: u64,
}

impl Project {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a project from `(path, content)` pairs.
    pub fn from_files<P, C, I>(files: I) -> Self
    where
        P: Into<String>,
        C: Into<String>,
        I: IntoIterator<Item = (P, C)>,
    {
        let mut project = Self::new();
        for (path, content) in files {
            project.add_file(path, content);
        }
        project
    }

    /// Add or replace a file.
    pub fn add_file(&mut self, path: impl Into<String>, content: impl Into<String>) {
        self.files.insert(path.into(), content.into());
    }

    /// Current content of a file.
    pub fn file(&self, path: &str) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }

    /// All file paths, sorted.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Generation counter; bumped on every flush. Trees remember the epoch
    /// they were parsed at, and edits staged against an older epoch are
    /// rejected by the tree layer.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Number of edits waiting for the next flush.
    pub fn pending_edits(&self) -> usize {
        self.staged.len()
    }

    pub(crate) fn stage(&mut self, edit: StagedEdit) {
        self.staged.push(edit);
    }

    /// Drop staged edits without applying them. A refused requirement must
    /// not leak partial edits into the next flush.
    pub fn discard_staged(&mut self) {
        self.staged.clear();
    }

    /// Commit all staged edits and invalidate outstanding trees.
    ///
    /// Exact-duplicate edits collapse; overlapping edits are refused — the
    /// planner must not emit them within a single flush.
    pub fn flush(&mut self) -> Result<(), ProjectError> {
        let staged = std::mem::take(&mut self.staged);
        self.epoch += 1;
        if staged.is_empty() {
            return Ok(());
        }

        let mut by_file: BTreeMap<String, Vec<StagedEdit>> = BTreeMap::new();
        for edit in staged {
            by_file.entry(edit.path.clone()).or_default().push(edit);
        }

        for (path, mut edits) in by_file {
            let content = self
                .files
                .get_mut(&path)
                .ok_or_else(|| ProjectError::UnknownFile { path: path.clone() })?;

            // Back-to-front so earlier ranges stay valid while later ones
            // are rewritten.
            edits.sort_by(|a, b| {
                (b.range.start, b.range.end)
                    .cmp(&(a.range.start, a.range.end))
            });
            edits.dedup();

            let mut applied_up_to = usize::MAX;
            for edit in edits {
                let Range { start, end } = edit.range;
                if end > content.len()
                    || !content.is_char_boundary(start)
                    || !content.is_char_boundary(end)
                {
                    return Err(ProjectError::EditOutOfBounds { path, start, end });
                }
                if end > applied_up_to {
                    return Err(ProjectError::ConflictingEdits { path });
                }
                content.replace_range(start..end, &edit.replacement);
                applied_up_to = start;
            }
        }

        Ok(())
    }
}
