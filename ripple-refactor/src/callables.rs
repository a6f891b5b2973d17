//! Callable identity inference from parse trees.
//!
//! Walks outward from a node to find the declaration wrapping it, then
//! classifies that declaration: name, class/namespace scope chain, and
//! access. The rules mirror TypeScript visibility as the planner needs it:
//! an `export`ed function is public; a method is public unless marked
//! `private` or `protected` (`protected` counts as private here).

use ripple_core::{CallableAccess, CallableRef, Scope, ScopeKind};

use crate::tree::{NodeId, SourceTree};

/// Nearest enclosing function or method declaration, if any. Call sites in
/// top-level statements or arrow-function bodies have none and produce no
/// caller consequences.
pub fn enclosing_declaration(tree: &SourceTree, node: NodeId) -> Option<NodeId> {
    tree.ancestors(node)
        .find(|&a| matches!(tree.name(a), "FunctionDeclaration" | "MethodDeclaration"))
}

/// The declared name of a function/method/class node.
pub fn declared_name<'t>(tree: &'t SourceTree, decl: NodeId) -> Option<&'t str> {
    tree.child_named(decl, "Identifier").map(|id| tree.text(id))
}

/// Build the canonical identity for a declaration node.
pub fn infer_callable(tree: &SourceTree, decl: NodeId) -> Option<CallableRef> {
    let name = declared_name(tree, decl)?.to_string();

    // Accumulate class/namespace scopes, innermost first.
    let mut links: Vec<(ScopeKind, String, bool)> = Vec::new();
    for ancestor in tree.ancestors(decl) {
        let kind = match tree.name(ancestor) {
            "ClassDeclaration" => ScopeKind::Class,
            "ModuleDeclaration" => ScopeKind::Namespace,
            _ => continue,
        };
        let scope_name = declared_name(tree, ancestor)?.to_string();
        let exported = tree.child_named(ancestor, "ExportKeyword").is_some();
        links.push((kind, scope_name, exported));
    }

    let mut scope: Option<Scope> = None;
    for (kind, scope_name, exported) in links.into_iter().rev() {
        let mut link = Scope::new(kind, scope_name, exported);
        link.parent = scope.take().map(Box::new);
        scope = Some(link);
    }

    let access = match tree.name(decl) {
        "MethodDeclaration" => {
            let private = tree.child_named(decl, "PrivateKeyword").is_some()
                || tree.child_named(decl, "ProtectedKeyword").is_some();
            if private {
                CallableAccess::PrivateMethod
            } else {
                CallableAccess::PublicMethod
            }
        }
        "FunctionDeclaration" => {
            if tree.child_named(decl, "ExportKeyword").is_some() {
                CallableAccess::PublicFunction
            } else {
                CallableAccess::PrivateFunction
            }
        }
        _ => return None,
    };

    Some(CallableRef {
        name,
        scope,
        file_path: tree.path().to_string(),
        access,
    })
}

/// Look through a declaration's own parameter list for a parameter whose
/// type annotation textually equals `type_name`; returns the parameter name.
pub fn parameter_named_type(
    tree: &SourceTree,
    decl: NodeId,
    type_name: &str,
) -> Option<String> {
    let params = tree.child_named(decl, "ParameterList")?;
    for &param in tree.children(params) {
        if tree.name(param) != "Parameter" {
            continue;
        }
        let Some(annotation) = tree.child_named(param, "TypeAnnotation") else {
            continue;
        };
        let matches = tree
            .children(annotation)
            .first()
            .is_some_and(|&ty| tree.text(ty) == type_name);
        if !matches {
            continue;
        }
        if let Some(name) = tree.child_named(param, "Identifier") {
            return Some(tree.text(name).to_string());
        }
    }
    None
}
