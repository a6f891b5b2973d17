//! Canonical identity for a callable: name, enclosing scope chain, file,
//! and access classification.
//!
//! The identity is what the planner keys its dedup set on and what the
//! executor turns back into path expressions, so equality here is structural
//! and total: two identifiers are equal iff name, scope chain, file path,
//! and access all match.

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;

/// Visibility classification of a callable. Decides search scope and
/// whether test dummies / migrations are owed.
///
/// `protected` members collapse to `PrivateMethod`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CallableAccess {
    PublicFunction,
    PrivateFunction,
    PublicMethod,
    PrivateMethod,
}

impl CallableAccess {
    /// Public callables are reachable from tests and downstream consumers.
    pub fn is_public(&self) -> bool {
        matches!(self, Self::PublicFunction | Self::PublicMethod)
    }

    /// True for class members.
    pub fn is_method(&self) -> bool {
        matches!(self, Self::PublicMethod | Self::PrivateMethod)
    }
}

/// Kind of a lexical scope wrapping a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScopeKind {
    /// A class wrapping a method.
    Class,
    /// A `namespace`/`module` block.
    Namespace,
}

/// One link of the enclosing scope chain. `parent` points outward; the
/// chain head is the innermost scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scope {
    pub kind: ScopeKind,
    pub name: String,
    pub exported: bool,
    pub parent: Option<Box<Scope>>,
}

impl Scope {
    pub fn new(kind: ScopeKind, name: impl Into<String>, exported: bool) -> Self {
        Self {
            kind,
            name: name.into(),
            exported,
            parent: None,
        }
    }

    /// Wrap this scope in an outer one.
    pub fn inside(mut self, parent: Scope) -> Self {
        self.parent = Some(Box::new(parent));
        self
    }

    /// Scope names from the outermost inward.
    pub fn names_outermost_first(&self) -> Vec<&str> {
        let mut names = Vec::new();
        let mut current = Some(self);
        while let Some(scope) = current {
            names.push(scope.name.as_str());
            current = scope.parent.as_deref();
        }
        names.reverse();
        names
    }

    /// Scopes from the outermost inward.
    fn chain_outermost_first(&self) -> Vec<&Scope> {
        let mut chain = Vec::new();
        let mut current = Some(self);
        while let Some(scope) = current {
            chain.push(scope);
            current = scope.parent.as_deref();
        }
        chain.reverse();
        chain
    }
}

/// The canonical handle for a function or method.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallableRef {
    pub name: String,
    /// Innermost enclosing scope, or `None` for a top-level function.
    pub scope: Option<Scope>,
    /// Project-relative path of the declaring file.
    pub file_path: String,
    pub access: CallableAccess,
}

impl CallableRef {
    /// A top-level function with no enclosing scope.
    pub fn function(
        name: impl Into<String>,
        file_path: impl Into<String>,
        access: CallableAccess,
    ) -> Self {
        Self {
            name: name.into(),
            scope: None,
            file_path: file_path.into(),
            access,
        }
    }

    /// A scoped callable (class method or namespaced function).
    pub fn scoped(
        name: impl Into<String>,
        scope: Scope,
        file_path: impl Into<String>,
        access: CallableAccess,
    ) -> Self {
        Self {
            name: name.into(),
            scope: Some(scope),
            file_path: file_path.into(),
            access,
        }
    }

    /// Dotted name through the scope chain, e.g. `Spacey.giveMeYourContext`.
    pub fn qualified_name(&self) -> String {
        let mut parts: Vec<&str> = self
            .scope
            .as_ref()
            .map(|s| s.names_outermost_first())
            .unwrap_or_default();
        parts.push(&self.name);
        parts.join(".")
    }

    /// Path expression addressing this callable's declaration.
    ///
    /// Scope components outermost-first, then the terminal declaration:
    /// a `MethodDeclaration` when the innermost scope is a class, else a
    /// `FunctionDeclaration`.
    pub fn declaration_path(&self) -> String {
        let mut components = Vec::new();
        if let Some(scope) = &self.scope {
            for link in scope.chain_outermost_first() {
                match link.kind {
                    ScopeKind::Class => components.push(format!(
                        "ClassDeclaration[/Identifier[@value='{}']]",
                        link.name
                    )),
                    ScopeKind::Namespace => components.push(format!(
                        "ModuleDeclaration[/Identifier[@value='{}']]/ModuleBlock",
                        link.name
                    )),
                }
            }
        }
        let in_class = self
            .scope
            .as_ref()
            .is_some_and(|s| s.kind == ScopeKind::Class);
        let terminal = if in_class {
            format!("MethodDeclaration[/Identifier[@value='{}']]", self.name)
        } else {
            format!("FunctionDeclaration[/Identifier[@value='{}']]", self.name)
        };
        components.push(terminal);
        format!("//{}", components.join("/"))
    }

    /// Path expression addressing call sites of this callable.
    ///
    /// Private methods match any qualified access ending in the method name
    /// (covers `this.fn(…)`); public scoped callables match the full dotted
    /// name; plain functions match a bare identifier call.
    pub fn call_path(&self) -> String {
        if self.access == CallableAccess::PrivateMethod {
            return format!(
                "//CallExpression[/PropertyAccessExpression/Identifier[@value='{}']]",
                self.name
            );
        }
        if self.scope.is_some() {
            return format!(
                "//CallExpression[/PropertyAccessExpression[@value='{}']]",
                self.qualified_name()
            );
        }
        format!("//CallExpression[/Identifier[@value='{}']]", self.name)
    }

    /// Globs scanned when planning call-site consequences. Public callables
    /// are scanned across source and test roots (test hits are re-routed to
    /// dummy insertion); private ones only in their declaring file.
    pub fn planning_globs(&self, config: &EngineConfig) -> Vec<String> {
        if self.access.is_public() {
            vec![
                config.effective_source_glob().to_string(),
                config.effective_test_glob().to_string(),
            ]
        } else {
            vec![self.file_path.clone()]
        }
    }

    /// Globs scanned when editing declarations and source call sites.
    pub fn source_globs(&self, config: &EngineConfig) -> Vec<String> {
        if self.access.is_public() {
            vec![config.effective_source_glob().to_string()]
        } else {
            vec![self.file_path.clone()]
        }
    }
}
