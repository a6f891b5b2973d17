//! Top-level entry point: plan, then execute.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use ripple_core::{
    Changeset, EngineConfig, InMemoryMigrationSink, MigrationSink, RefactorError, Report,
    Requirement,
};

use crate::executor::Executor;
use crate::planner::Planner;
use crate::project::Project;

/// Plans and applies one root requirement against a project.
#[derive(Default)]
pub struct Refactorer {
    config: EngineConfig,
    cancel: Option<Arc<AtomicBool>>,
}

impl Refactorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            config,
            cancel: None,
        }
    }

    /// Install a cooperative cancellation flag shared with the caller.
    pub fn cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Plan and execute with the default in-memory migration sink; records
    /// surface on `report.migrations`.
    pub fn apply(
        &self,
        project: &mut Project,
        root: Requirement,
    ) -> Result<Report, RefactorError> {
        let mut sink = InMemoryMigrationSink::new();
        let mut report = self.apply_with(project, root, &mut sink, None)?;
        report.migrations = sink.into_records();
        Ok(report)
    }

    /// Plan and execute with a custom sink and an optional per-changeset
    /// hook. Requirements the planner dropped (traversal budget) lead the
    /// report's unimplemented list.
    pub fn apply_with(
        &self,
        project: &mut Project,
        root: Requirement,
        sink: &mut dyn MigrationSink,
        hook: Option<&mut dyn FnMut(&Changeset, &Report)>,
    ) -> Result<Report, RefactorError> {
        let (changeset, dropped) = {
            let mut planner = Planner::with_config(project, self.config.clone());
            let changeset = planner.changeset_for(&root)?;
            (changeset, planner.take_dropped())
        };
        tracing::debug!(
            requirements = changeset.len(),
            dropped = dropped.len(),
            "plan ready"
        );

        let mut executor = Executor::new(sink).with_config(self.config.clone());
        if let Some(hook) = hook {
            executor = executor.on_changeset(hook);
        }
        if let Some(flag) = self.cancel.as_deref() {
            executor = executor.cancel_flag(flag);
        }
        let mut report = executor.implement(project, &changeset)?;
        if !dropped.is_empty() {
            report.unimplemented.splice(0..0, dropped);
        }
        Ok(report)
    }
}
