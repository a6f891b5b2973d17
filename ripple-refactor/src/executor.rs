//! Walks a changeset in dependency order and applies each requirement as a
//! bounded textual edit.
//!
//! Prerequisites run to completion before the owning requirements. The
//! project is flushed after every individual requirement so subsequent
//! queries see updated source; a refused requirement's staged edits are
//! discarded instead. Refusals are recorded on the report and execution
//! continues; parser/project/sink failures abort.

use std::sync::atomic::{AtomicBool, Ordering};

use ripple_core::{
    AddMigration, AddParameter, Changeset, EditError, EngineConfig, MigrationRecord,
    MigrationSink, PassArgument, PassDummyInTests, RefactorError, Report, Requirement,
};

use crate::imports::add_import;
use crate::project::Project;
use crate::tree::{find_matches, select, stage_replacement, PathExpr};

/// Hook invoked after each changeset completes, with the report so far.
/// Callers use it to commit version-control snapshots between changesets.
pub type ChangesetHook<'a> = &'a mut dyn FnMut(&Changeset, &Report);

/// Implements changesets against a project.
pub struct Executor<'a> {
    config: EngineConfig,
    sink: &'a mut dyn MigrationSink,
    hook: Option<ChangesetHook<'a>>,
    cancelled: Option<&'a AtomicBool>,
}

impl<'a> Executor<'a> {
    pub fn new(sink: &'a mut dyn MigrationSink) -> Self {
        Self {
            config: EngineConfig::default(),
            sink,
            hook: None,
            cancelled: None,
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Install a per-changeset completion hook.
    pub fn on_changeset(mut self, hook: ChangesetHook<'a>) -> Self {
        self.hook = Some(hook);
        self
    }

    /// Cooperative cancellation: checked before each requirement; the
    /// remainder of the plan is reported as unimplemented.
    pub fn cancel_flag(mut self, flag: &'a AtomicBool) -> Self {
        self.cancelled = Some(flag);
        self
    }

    /// Implement the whole changeset, prerequisites first.
    pub fn implement(
        &mut self,
        project: &mut Project,
        changeset: &Changeset,
    ) -> Result<Report, RefactorError> {
        let mut report = Report::default();
        self.implement_changeset(project, changeset, &mut report)?;
        Ok(report)
    }

    fn implement_changeset(
        &mut self,
        project: &mut Project,
        changeset: &Changeset,
        report: &mut Report,
    ) -> Result<(), RefactorError> {
        for prerequisite in &changeset.prerequisites {
            self.implement_changeset(project, prerequisite, report)?;
        }

        let mut completed = true;
        for (index, requirement) in changeset.requirements.iter().enumerate() {
            if self.is_cancelled() {
                for remaining in &changeset.requirements[index..] {
                    report.record_unimplemented(remaining.clone(), "cancelled");
                }
                completed = false;
                break;
            }

            match self.implement_requirement(project, requirement) {
                Ok(()) => {
                    project.flush()?;
                    tracing::debug!(requirement = %requirement.describe(), "implemented");
                    report.record_implemented(requirement.clone());
                }
                Err(EditError::Fatal(error)) => return Err(error),
                Err(refusal) => {
                    project.discard_staged();
                    tracing::warn!(
                        requirement = %requirement.describe(),
                        refusal = %refusal,
                        "requirement not implemented"
                    );
                    report.record_unimplemented(requirement.clone(), refusal.to_string());
                }
            }
        }

        if completed {
            if let Some(hook) = self.hook.as_mut() {
                hook(changeset, report);
            }
        }
        Ok(())
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    fn implement_requirement(
        &mut self,
        project: &mut Project,
        requirement: &Requirement,
    ) -> Result<(), EditError> {
        match requirement {
            Requirement::AddParameter(r) => self.add_parameter(project, r),
            Requirement::PassArgument(r) => self.pass_argument(project, r),
            Requirement::PassDummyInTests(r) => self.pass_dummy_in_tests(project, r),
            Requirement::AddMigration(r) => self.add_migration(r),
        }
    }

    /// Rewrite the declaration's opening parenthesis to introduce the new
    /// first parameter, adding the type's import if absent.
    ///
    /// An empty parameter list is left with a trailing comma
    /// (`f(context: T, )`); the next reparse resolves it and callers accept
    /// the simple substitution form.
    fn add_parameter(&mut self, project: &mut Project, r: &AddParameter) -> Result<(), EditError> {
        add_import(project, &r.target.file_path, &r.parameter_type)?;

        let declaration = PathExpr::parse(&r.target.declaration_path())?;
        let globs = r.target.source_globs(&self.config);
        let matches = find_matches(project, &globs, &declaration)?;
        let total: usize = matches.iter().map(|m| m.nodes.len()).sum();
        if total == 0 {
            return Err(EditError::DeclarationNotFound);
        }
        if total > 1 {
            return Err(EditError::AmbiguousDeclaration { matched: total });
        }

        let file = &matches[0];
        let decl = file.nodes[0];
        let paren = file
            .tree
            .first_descendant_named(decl, "OpenParenToken")
            .ok_or(EditError::DeclarationNotFound)?;
        stage_replacement(
            project,
            &file.tree,
            paren,
            format!("({}: {}, ", r.parameter_name, r.parameter_type.name()),
        )?;
        Ok(())
    }

    /// Prepend the argument at every call of the target inside the
    /// enclosing callable's declaration.
    fn pass_argument(&mut self, project: &mut Project, r: &PassArgument) -> Result<(), EditError> {
        let declaration = PathExpr::parse(&r.enclosing.declaration_path())?;
        let globs = r.enclosing.source_globs(&self.config);
        let matches = find_matches(project, &globs, &declaration)?;
        let total: usize = matches.iter().map(|m| m.nodes.len()).sum();
        if total == 0 {
            return Err(EditError::CallNotFound);
        }
        if total > 1 {
            return Err(EditError::AmbiguousDeclaration { matched: total });
        }

        let file = &matches[0];
        let decl = file.nodes[0];
        let call_path = PathExpr::parse(&r.target.call_path())?;
        let calls = select(&file.tree, decl, &call_path);
        if calls.is_empty() {
            return Err(EditError::CallNotFound);
        }
        for call in calls {
            let Some(paren) = file.tree.first_descendant_named(call, "OpenParenToken") else {
                continue;
            };
            stage_replacement(
                project,
                &file.tree,
                paren,
                format!("({}, ", r.argument_value),
            )?;
        }
        Ok(())
    }

    /// Prepend the dummy at every call of the target under the test roots,
    /// then add the extra import to each file actually changed. Zero
    /// matches is success with no edits.
    fn pass_dummy_in_tests(
        &mut self,
        project: &mut Project,
        r: &PassDummyInTests,
    ) -> Result<(), EditError> {
        let call_path = PathExpr::parse(&r.target.call_path())?;
        let test_globs = vec![self.config.effective_test_glob().to_string()];
        let matches = find_matches(project, &test_globs, &call_path)?;
        if matches.is_empty() {
            return Ok(());
        }

        let mut touched = Vec::new();
        for file in &matches {
            let mut changed = false;
            for &call in &file.nodes {
                let Some(paren) = file.tree.first_descendant_named(call, "OpenParenToken") else {
                    continue;
                };
                stage_replacement(project, &file.tree, paren, format!("({}, ", r.dummy_value))?;
                changed = true;
            }
            if changed {
                touched.push(file.tree.path().to_string());
            }
        }

        project.flush()?;
        if let Some(import) = &r.additional_import {
            for path in &touched {
                add_import(project, path, import)?;
            }
        }
        Ok(())
    }

    /// Migrations mutate nothing; the record goes to the sink.
    fn add_migration(&mut self, r: &AddMigration) -> Result<(), EditError> {
        self.sink
            .record(MigrationRecord {
                downstream: (*r.downstream).clone(),
                why: r.why.clone(),
            })
            .map_err(EditError::from)
    }
}
