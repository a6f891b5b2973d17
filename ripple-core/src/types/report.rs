//! Run reports and migration records.

use serde::{Deserialize, Serialize};

use super::requirement::{AddParameter, Provenance, Requirement};

/// A requirement the executor (or planner) refused, with the stable
/// refusal message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unimplemented {
    pub requirement: Requirement,
    pub message: String,
}

/// A migration persisted for downstream consumers: the full parameter
/// addition they must apply against their own source, with provenance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationRecord {
    pub downstream: AddParameter,
    pub why: Provenance,
}

/// Outcome of one engine run. An empty `implemented` list means "nothing to
/// do", not an error; callers inspect `unimplemented` before committing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Report {
    pub implemented: Vec<Requirement>,
    pub unimplemented: Vec<Unimplemented>,
    /// Records drained from the default in-memory sink. Empty when a custom
    /// sink was supplied.
    pub migrations: Vec<MigrationRecord>,
}

impl Report {
    /// Concatenate another report onto this one, preserving order.
    pub fn extend(&mut self, other: Report) {
        self.implemented.extend(other.implemented);
        self.unimplemented.extend(other.unimplemented);
        self.migrations.extend(other.migrations);
    }

    pub fn record_implemented(&mut self, requirement: Requirement) {
        self.implemented.push(requirement);
    }

    pub fn record_unimplemented(&mut self, requirement: Requirement, message: impl Into<String>) {
        self.unimplemented.push(Unimplemented {
            requirement,
            message: message.into(),
        });
    }

    /// True when every planned requirement was implemented.
    pub fn is_clean(&self) -> bool {
        self.unimplemented.is_empty()
    }
}
