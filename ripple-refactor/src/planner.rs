//! The requirement planner: one root requirement in, a changeset DAG out.
//!
//! Adding a parameter ripples outward: every caller must pass a value, and
//! callers without a suitable value in scope need the parameter themselves,
//! recursively. The planner walks that caller graph, deduplicating by
//! requirement equality so cyclic call graphs terminate, and bounding the
//! total traversal as a second line of defense.

use ripple_core::types::requirement::DedupKey;
use ripple_core::{
    AddMigration, AddParameter, Changeset, EditError, EngineConfig, FxHashSet, PassArgument,
    PassDummyInTests, Provenance, QueryError, Requirement, Unimplemented,
};

use crate::callables::{enclosing_declaration, infer_callable, parameter_named_type};
use crate::project::Project;
use crate::tree::{find_matches, PathExpr};

/// Plans the transitive consequences of a root requirement against one
/// project. One planner instance per run.
pub struct Planner<'p> {
    project: &'p Project,
    config: EngineConfig,
    planned: FxHashSet<DedupKey>,
    dropped: Vec<Unimplemented>,
}

impl<'p> Planner<'p> {
    pub fn new(project: &'p Project) -> Self {
        Self::with_config(project, EngineConfig::default())
    }

    pub fn with_config(project: &'p Project, config: EngineConfig) -> Self {
        Self {
            project,
            config,
            planned: FxHashSet::default(),
            dropped: Vec::new(),
        }
    }

    /// Build the changeset rooted at `root`.
    ///
    /// Only `AddParameter` has consequences; any other root yields a leaf
    /// changeset holding just itself.
    pub fn changeset_for(&mut self, root: &Requirement) -> Result<Changeset, QueryError> {
        self.planned.clear();
        self.dropped.clear();
        self.planned.insert(root.dedup_key());
        self.expand(root.clone(), true)
    }

    /// Requirements dropped by the traversal budget, in discovery order.
    /// They belong on the final report as unimplemented.
    pub fn take_dropped(&mut self) -> Vec<Unimplemented> {
        std::mem::take(&mut self.dropped)
    }

    fn expand(&mut self, requirement: Requirement, is_root: bool) -> Result<Changeset, QueryError> {
        let add = match &requirement {
            Requirement::AddParameter(add) => add.clone(),
            _ => return Ok(Changeset::leaf(requirement)),
        };

        let mut prerequisites = Vec::new();
        let mut pass_arguments = Vec::new();

        let call_path = PathExpr::parse(&add.target.call_path())?;
        let globs = add.target.planning_globs(&self.config);
        tracing::debug!(
            callable = %add.target.qualified_name(),
            expression = %call_path,
            "scanning call sites"
        );

        for file in find_matches(self.project, &globs, &call_path)? {
            // Test call sites are populated with dummies, not real values.
            if is_test_path(file.tree.path()) {
                continue;
            }
            for &call in &file.nodes {
                let Some(decl) = enclosing_declaration(&file.tree, call) else {
                    continue;
                };
                let Some(enclosing) = infer_callable(&file.tree, decl) else {
                    continue;
                };

                let existing =
                    parameter_named_type(&file.tree, decl, add.parameter_type.name());
                let argument_value = match existing {
                    Some(parameter) => parameter,
                    None => {
                        let prerequisite = Requirement::from(AddParameter {
                            target: enclosing.clone(),
                            parameter_type: add.parameter_type.clone(),
                            parameter_name: add.parameter_name.clone(),
                            populate_in_tests: add.populate_in_tests.clone(),
                            why: Provenance::caused_by(&requirement),
                        });
                        if self.admit(&prerequisite) {
                            prerequisites.push(self.expand(prerequisite, false)?);
                        }
                        add.parameter_name.clone()
                    }
                };

                let pass = Requirement::from(PassArgument {
                    enclosing,
                    target: add.target.clone(),
                    argument_value,
                    why: Provenance::caused_by(&requirement),
                });
                if self.admit(&pass) {
                    pass_arguments.push(pass);
                }
            }
        }

        // Declaration edit first, then the call-site edits that reference
        // the new parameter by name.
        let mut requirements = Vec::with_capacity(pass_arguments.len() + 3);
        requirements.push(requirement.clone());
        requirements.extend(pass_arguments);

        if is_root && add.target.access.is_public() {
            let dummy = Requirement::from(PassDummyInTests {
                target: add.target.clone(),
                dummy_value: add.populate_in_tests.dummy_value.clone(),
                additional_import: add.populate_in_tests.additional_import.clone(),
                why: Provenance::caused_by(&requirement),
            });
            let migration = Requirement::from(AddMigration {
                downstream: Box::new(AddParameter {
                    target: add.target.clone(),
                    parameter_type: add.parameter_type.externalized(),
                    parameter_name: add.parameter_name.clone(),
                    populate_in_tests: add.populate_in_tests.clone(),
                    why: Provenance::caused_by(&requirement),
                }),
                why: Provenance::caused_by(&requirement),
            });
            if self.admit(&dummy) {
                requirements.push(dummy);
            }
            if self.admit(&migration) {
                requirements.push(migration);
            }
        }

        Ok(Changeset {
            requirements,
            prerequisites,
        })
    }

    /// Admit a requirement into the plan unless an equal one is already
    /// planned or the traversal budget is spent. Budget refusals are
    /// recorded for the report; equality drops are silent (that is the
    /// cycle-safety rule working as intended).
    fn admit(&mut self, requirement: &Requirement) -> bool {
        let key = requirement.dedup_key();
        if self.planned.contains(&key) {
            return false;
        }
        let budget = self.config.effective_max_planned();
        if self.planned.len() >= budget {
            tracing::warn!(
                requirement = %requirement.describe(),
                budget,
                "traversal budget exceeded; dropping requirement"
            );
            self.dropped.push(Unimplemented {
                requirement: requirement.clone(),
                message: EditError::PlanningBudgetExceeded { budget }.to_string(),
            });
            return false;
        }
        self.planned.insert(key);
        true
    }
}

/// True for files under a test root (`test/`, `tests/`, `test-utils/`, …).
fn is_test_path(path: &str) -> bool {
    path.split('/')
        .next()
        .is_some_and(|segment| segment.starts_with("test"))
}
