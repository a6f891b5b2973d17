//! The requirement model: one declarative refactoring intent per value.
//!
//! Equality is deliberately narrow. Two requirements are the same plan node
//! iff they are the same kind of edit against the same callable (and, for
//! argument passing, from the same enclosing callable). Provenance and edit
//! payloads never participate: the planner's cycle safety rests on this.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use super::callable::{CallableRef, Scope};
use super::imports::ImportRef;

/// Why a requirement exists: a free-form reason on the root, or the
/// requirement that generated it. Never consulted for equality.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Provenance {
    Reason(String),
    CausedBy(Box<Requirement>),
}

impl Provenance {
    pub fn reason(text: impl Into<String>) -> Self {
        Self::Reason(text.into())
    }

    pub fn caused_by(requirement: &Requirement) -> Self {
        Self::CausedBy(Box::new(requirement.clone()))
    }
}

/// How tests should populate the new parameter at their call sites.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestPopulation {
    /// Expression textually prepended at test call sites,
    /// e.g. `{} as HandlerContext`.
    pub dummy_value: String,
    /// Import added to each test file the dummy lands in.
    pub additional_import: Option<ImportRef>,
}

/// Insert a new first parameter into the target's declaration and add the
/// type's import if absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddParameter {
    pub target: CallableRef,
    pub parameter_type: ImportRef,
    pub parameter_name: String,
    pub populate_in_tests: TestPopulation,
    pub why: Provenance,
}

/// Prepend an argument at every call of `target` inside `enclosing`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PassArgument {
    pub enclosing: CallableRef,
    pub target: CallableRef,
    pub argument_value: String,
    pub why: Provenance,
}

/// Prepend a dummy argument at every call of `target` under the test roots,
/// adding `additional_import` to each file changed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PassDummyInTests {
    pub target: CallableRef,
    pub dummy_value: String,
    pub additional_import: Option<ImportRef>,
    pub why: Provenance,
}

/// Record that downstream API consumers must apply `downstream` against
/// their own source. No direct effect on the project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddMigration {
    pub downstream: Box<AddParameter>,
    pub why: Provenance,
}

/// A single declarative refactoring intent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Requirement {
    AddParameter(AddParameter),
    PassArgument(PassArgument),
    PassDummyInTests(PassDummyInTests),
    AddMigration(AddMigration),
}

/// Discriminant used in dedup keys and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequirementKind {
    AddParameter,
    PassArgument,
    PassDummyInTests,
    AddMigration,
}

impl RequirementKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::AddParameter => "add-parameter",
            Self::PassArgument => "pass-argument",
            Self::PassDummyInTests => "pass-dummy-in-tests",
            Self::AddMigration => "add-migration",
        }
    }
}

/// Callable identity as requirement equality sees it: name, scope chain,
/// and file. Access is excluded — a requirement against `f` is the same
/// requirement however `f`'s visibility was classified.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallableKey {
    name: String,
    scope: Option<Scope>,
    file_path: String,
}

impl CallableKey {
    fn of(callable: &CallableRef) -> Self {
        Self {
            name: callable.name.clone(),
            scope: callable.scope.clone(),
            file_path: callable.file_path.clone(),
        }
    }
}

/// The full equality key for a requirement.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupKey {
    kind: RequirementKind,
    target: CallableKey,
    /// Only `PassArgument` distinguishes by enclosing callable.
    enclosing: Option<CallableKey>,
}

impl Requirement {
    pub fn kind(&self) -> RequirementKind {
        match self {
            Self::AddParameter(_) => RequirementKind::AddParameter,
            Self::PassArgument(_) => RequirementKind::PassArgument,
            Self::PassDummyInTests(_) => RequirementKind::PassDummyInTests,
            Self::AddMigration(_) => RequirementKind::AddMigration,
        }
    }

    /// The callable this requirement is about. For migrations, the
    /// downstream target.
    pub fn target(&self) -> &CallableRef {
        match self {
            Self::AddParameter(r) => &r.target,
            Self::PassArgument(r) => &r.target,
            Self::PassDummyInTests(r) => &r.target,
            Self::AddMigration(r) => &r.downstream.target,
        }
    }

    pub fn why(&self) -> &Provenance {
        match self {
            Self::AddParameter(r) => &r.why,
            Self::PassArgument(r) => &r.why,
            Self::PassDummyInTests(r) => &r.why,
            Self::AddMigration(r) => &r.why,
        }
    }

    pub fn dedup_key(&self) -> DedupKey {
        let enclosing = match self {
            Self::PassArgument(r) => Some(CallableKey::of(&r.enclosing)),
            _ => None,
        };
        DedupKey {
            kind: self.kind(),
            target: CallableKey::of(self.target()),
            enclosing,
        }
    }

    /// One-line description for logs and reports.
    pub fn describe(&self) -> String {
        match self {
            Self::AddParameter(r) => format!(
                "add parameter {}: {} to {}",
                r.parameter_name,
                r.parameter_type.name(),
                r.target.qualified_name()
            ),
            Self::PassArgument(r) => format!(
                "pass {} to {} from {}",
                r.argument_value,
                r.target.qualified_name(),
                r.enclosing.qualified_name()
            ),
            Self::PassDummyInTests(r) => format!(
                "pass dummy {} to {} in tests",
                r.dummy_value,
                r.target.qualified_name()
            ),
            Self::AddMigration(r) => format!(
                "record migration for {}",
                r.downstream.target.qualified_name()
            ),
        }
    }
}

impl PartialEq for Requirement {
    fn eq(&self, other: &Self) -> bool {
        self.dedup_key() == other.dedup_key()
    }
}

impl Eq for Requirement {}

impl Hash for Requirement {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.dedup_key().hash(state);
    }
}

impl From<AddParameter> for Requirement {
    fn from(r: AddParameter) -> Self {
        Self::AddParameter(r)
    }
}

impl From<PassArgument> for Requirement {
    fn from(r: PassArgument) -> Self {
        Self::PassArgument(r)
    }
}

impl From<PassDummyInTests> for Requirement {
    fn from(r: PassDummyInTests) -> Self {
        Self::PassDummyInTests(r)
    }
}

impl From<AddMigration> for Requirement {
    fn from(r: AddMigration) -> Self {
        Self::AddMigration(r)
    }
}
