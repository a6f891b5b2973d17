//! Import identities: what symbol a file needs and where it comes from.

use serde::{Deserialize, Serialize};

/// A symbol import, either from a published library or from a local file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImportRef {
    /// Import from a package, e.g. `import { X } from "@scope/pkg"`.
    Library { name: String, location: String },
    /// Import from a project-relative file. `external_path` names the module
    /// specifier downstream consumers resolve the same symbol from, when the
    /// file is re-exported under a package name.
    Local {
        name: String,
        local_path: String,
        external_path: Option<String>,
    },
}

impl ImportRef {
    pub fn library(name: impl Into<String>, location: impl Into<String>) -> Self {
        Self::Library {
            name: name.into(),
            location: location.into(),
        }
    }

    pub fn local(name: impl Into<String>, local_path: impl Into<String>) -> Self {
        Self::Local {
            name: name.into(),
            local_path: local_path.into(),
            external_path: None,
        }
    }

    pub fn local_published(
        name: impl Into<String>,
        local_path: impl Into<String>,
        external_path: impl Into<String>,
    ) -> Self {
        Self::Local {
            name: name.into(),
            local_path: local_path.into(),
            external_path: Some(external_path.into()),
        }
    }

    /// The imported symbol name.
    pub fn name(&self) -> &str {
        match self {
            Self::Library { name, .. } | Self::Local { name, .. } => name,
        }
    }

    /// The module specifier written into an import statement.
    ///
    /// Local paths pass through unchanged; computing a relative path from
    /// the importing file is an open question and deliberately not done.
    pub fn location(&self) -> &str {
        match self {
            Self::Library { location, .. } => location,
            Self::Local { local_path, .. } => local_path,
        }
    }

    /// The form downstream consumers should import. A `Local` import that
    /// carries an `external_path` becomes a `Library` import from that
    /// package; everything else is unchanged.
    pub fn externalized(&self) -> ImportRef {
        match self {
            Self::Local {
                name,
                external_path: Some(external),
                ..
            } => Self::Library {
                name: name.clone(),
                location: external.clone(),
            },
            other => other.clone(),
        }
    }
}
