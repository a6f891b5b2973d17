//! Engine configuration.

use serde::{Deserialize, Serialize};

/// Configuration for planning and execution.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    /// Upper bound on requirements planned in one run. Default: 512.
    /// A guard against pathological caller graphs; exceeding it records the
    /// overflowing requirement as unimplemented and planning continues.
    pub max_planned_requirements: Option<usize>,
    /// Glob for production sources. Default: "src/**/*.ts".
    pub source_glob: Option<String>,
    /// Glob for test sources. Default: "test*/**/*.ts".
    pub test_glob: Option<String>,
}

impl EngineConfig {
    /// Returns the effective requirement budget, defaulting to 512.
    pub fn effective_max_planned(&self) -> usize {
        self.max_planned_requirements.unwrap_or(512)
    }

    /// Returns the effective source glob.
    pub fn effective_source_glob(&self) -> &str {
        self.source_glob.as_deref().unwrap_or("src/**/*.ts")
    }

    /// Returns the effective test glob.
    pub fn effective_test_glob(&self) -> &str {
        self.test_glob.as_deref().unwrap_or("test*/**/*.ts")
    }
}
