//! Changesets: requirement groups with prerequisite ordering.

use serde::{Deserialize, Serialize};

use super::requirement::Requirement;

/// A tree of requirements. `prerequisites` must be fully implemented before
/// `requirements`; within `requirements` the planner has already ordered
/// declaration edits before the call-site edits that reference them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Changeset {
    pub requirements: Vec<Requirement>,
    pub prerequisites: Vec<Changeset>,
}

impl Changeset {
    /// A leaf changeset holding a single requirement.
    pub fn leaf(requirement: Requirement) -> Self {
        Self {
            requirements: vec![requirement],
            prerequisites: Vec::new(),
        }
    }

    /// All requirements in implementation order: prerequisites flattened
    /// depth-first, followed by this changeset's own requirements.
    pub fn all_requirements(&self) -> Vec<&Requirement> {
        let mut out = Vec::new();
        self.collect(&mut out);
        out
    }

    fn collect<'a>(&'a self, out: &mut Vec<&'a Requirement>) {
        for pre in &self.prerequisites {
            pre.collect(out);
        }
        out.extend(self.requirements.iter());
    }

    /// Total number of requirements in the tree.
    pub fn len(&self) -> usize {
        self.requirements.len()
            + self
                .prerequisites
                .iter()
                .map(Changeset::len)
                .sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
