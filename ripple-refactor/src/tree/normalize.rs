//! Tree-sitter CST → owned arena with TypeScript-AST node names.
//!
//! Path expressions speak the TypeScript compiler's vocabulary
//! (`FunctionDeclaration`, `PropertyAccessExpression`, `OpenParenToken`, …)
//! while tree-sitter produces its own grammar kinds (`function_declaration`,
//! `member_expression`, anonymous `"("`). This module flattens each parse
//! into a [`SourceTree`] arena, renaming kinds and reshaping the few places
//! the two trees disagree:
//!
//! - `export_statement` is spliced away; the `export` token becomes an
//!   `ExportKeyword` child of the exported declaration itself.
//! - `expression_statement` is transparent.
//! - `class_body` is spliced so methods are direct children of their
//!   `ClassDeclaration`.
//! - `accessibility_modifier` collapses to `PrivateKeyword` /
//!   `ProtectedKeyword` / `PublicKeyword` by its text.
//! - `StringLiteral` values are the text without the surrounding quotes.
//!
//! Only the anonymous tokens queries rely on are kept (`(`, `export`,
//! `static`); comments are dropped.

use std::ops::Range;

use ripple_core::QueryError;
use smallvec::SmallVec;
use tree_sitter::Node as TsNode;

/// Index of a node within its [`SourceTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32);

#[derive(Debug)]
struct TreeNode {
    name: &'static str,
    range: Range<usize>,
    /// Differs from `range` only for string literals (quotes stripped).
    value_range: Range<usize>,
    parent: Option<NodeId>,
    children: SmallVec<[NodeId; 8]>,
}

/// An immutable parse of one project file, valid for a single project epoch.
#[derive(Debug)]
pub struct SourceTree {
    path: String,
    source: String,
    epoch: u64,
    nodes: Vec<TreeNode>,
}

impl SourceTree {
    /// Parse `source` as TypeScript and normalize it into an arena.
    pub fn parse(
        path: impl Into<String>,
        source: impl Into<String>,
        epoch: u64,
    ) -> Result<Self, QueryError> {
        let path = path.into();
        let source = source.into();

        let mut parser = tree_sitter::Parser::new();
        let language: tree_sitter::Language =
            tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into();
        parser
            .set_language(&language)
            .map_err(|e| QueryError::Parse {
                path: path.clone(),
                message: e.to_string(),
            })?;
        let ts_tree = parser
            .parse(source.as_bytes(), None)
            .ok_or_else(|| QueryError::Parse {
                path: path.clone(),
                message: "tree-sitter returned no tree".to_string(),
            })?;

        let mut tree = Self {
            path,
            source,
            epoch,
            nodes: Vec::new(),
        };
        let root = ts_tree.root_node();
        let root_id = tree.push_node("SourceFile", root.byte_range(), None);
        tree.build_children(root, root_id, "SourceFile");
        Ok(tree)
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn name(&self, id: NodeId) -> &'static str {
        self.node(id).name
    }

    /// Verbatim source slice of the node.
    pub fn text(&self, id: NodeId) -> &str {
        &self.source[self.node(id).range.clone()]
    }

    /// Value as `@value` predicates see it: the text, minus surrounding
    /// quotes for string literals.
    pub fn value(&self, id: NodeId) -> &str {
        &self.source[self.node(id).value_range.clone()]
    }

    pub fn range(&self, id: NodeId) -> Range<usize> {
        self.node(id).range.clone()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    /// Walk from a node's parent up to the root.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let mut current = self.parent(id);
        std::iter::from_fn(move || {
            let next = current?;
            current = self.parent(next);
            Some(next)
        })
    }

    /// First direct child with the given normalized name.
    pub fn child_named(&self, id: NodeId, name: &str) -> Option<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .find(|&c| self.name(c) == name)
    }

    /// First descendant (document order, self excluded) with the given name.
    pub fn first_descendant_named(&self, id: NodeId, name: &str) -> Option<NodeId> {
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            if self.name(node) == name {
                return Some(node);
            }
            stack.extend(self.children(node).iter().rev().copied());
        }
        None
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id.0 as usize]
    }

    fn push_node(
        &mut self,
        name: &'static str,
        range: Range<usize>,
        parent: Option<NodeId>,
    ) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        let value_range = if name == "StringLiteral" {
            strip_quotes(&self.source, &range)
        } else {
            range.clone()
        };
        self.nodes.push(TreeNode {
            name,
            range,
            value_range,
            parent,
            children: SmallVec::new(),
        });
        if let Some(p) = parent {
            self.nodes[p.0 as usize].children.push(id);
        }
        id
    }

    fn build_children(&mut self, ts_node: TsNode, parent: NodeId, parent_name: &'static str) {
        for i in 0..ts_node.child_count() {
            let Some(child) = ts_node.child(i) else { continue };
            self.build_node(child, parent, parent_name);
        }
    }

    fn build_node(&mut self, ts_node: TsNode, parent: NodeId, parent_name: &'static str) {
        let kind = ts_node.kind();

        // Transparent wrappers.
        if kind == "expression_statement" {
            self.build_children(ts_node, parent, parent_name);
            return;
        }
        if kind == "export_statement" {
            self.build_export(ts_node, parent, parent_name);
            return;
        }
        if kind == "class_body" {
            // Methods become direct children of the class.
            self.build_children(ts_node, parent, parent_name);
            return;
        }
        if kind == "comment" {
            return;
        }

        if !ts_node.is_named() {
            // Only the tokens queries address survive normalization.
            let name = match kind {
                "(" => "OpenParenToken",
                "export" => "ExportKeyword",
                "static" => "StaticKeyword",
                _ => return,
            };
            self.push_node(name, ts_node.byte_range(), Some(parent));
            return;
        }

        if kind == "accessibility_modifier" {
            let name = match &self.source[ts_node.byte_range()] {
                "private" => "PrivateKeyword",
                "protected" => "ProtectedKeyword",
                _ => "PublicKeyword",
            };
            self.push_node(name, ts_node.byte_range(), Some(parent));
            return;
        }

        let name = normalized_name(kind, parent_name);
        let id = self.push_node(name, ts_node.byte_range(), Some(parent));

        // Leaves: no useful structure below these.
        if matches!(name, "Identifier" | "StringLiteral" | "ThisKeyword") {
            return;
        }
        self.build_children(ts_node, id, name);
    }

    /// Splice an `export_statement`: attach the exported declaration to the
    /// outer parent with an `ExportKeyword` prepended to its children.
    /// Non-declaration exports (`export { x }`, `export default …`,
    /// re-exports) keep their raw shape.
    fn build_export(&mut self, ts_node: TsNode, parent: NodeId, parent_name: &'static str) {
        let mut export_token: Option<Range<usize>> = None;
        let mut declaration: Option<TsNode> = None;
        for i in 0..ts_node.child_count() {
            let Some(child) = ts_node.child(i) else { continue };
            match child.kind() {
                "export" => export_token = Some(child.byte_range()),
                "function_declaration"
                | "generator_function_declaration"
                | "class_declaration"
                | "abstract_class_declaration"
                | "internal_module"
                | "module"
                | "interface_declaration"
                | "enum_declaration"
                | "type_alias_declaration"
                | "lexical_declaration"
                | "variable_declaration" => declaration = Some(child),
                _ => {}
            }
        }

        match declaration {
            Some(decl) => {
                let name = normalized_name(decl.kind(), parent_name);
                let id = self.push_node(name, decl.byte_range(), Some(parent));
                if let Some(range) = export_token {
                    let kw = self.push_node("ExportKeyword", range, None);
                    self.nodes[kw.0 as usize].parent = Some(id);
                    self.nodes[id.0 as usize].children.insert(0, kw);
                }
                self.build_children(decl, id, name);
            }
            None => {
                let id = self.push_node("ExportDeclaration", ts_node.byte_range(), Some(parent));
                self.build_children(ts_node, id, "ExportDeclaration");
            }
        }
    }
}

/// Map a tree-sitter kind to the TypeScript-AST name queries use.
/// Kinds with no mapping keep their grammar name.
fn normalized_name(kind: &'static str, parent_name: &str) -> &'static str {
    match kind {
        "program" => "SourceFile",
        "function_declaration" | "generator_function_declaration" => "FunctionDeclaration",
        "method_definition" => "MethodDeclaration",
        "class_declaration" | "abstract_class_declaration" => "ClassDeclaration",
        "internal_module" | "module" => "ModuleDeclaration",
        "statement_block" => {
            if parent_name == "ModuleDeclaration" {
                "ModuleBlock"
            } else {
                "Block"
            }
        }
        "call_expression" => "CallExpression",
        "member_expression" => "PropertyAccessExpression",
        "identifier" | "property_identifier" | "type_identifier"
        | "shorthand_property_identifier" => "Identifier",
        "import_statement" => "ImportDeclaration",
        "string" => "StringLiteral",
        "required_parameter" | "optional_parameter" => "Parameter",
        "formal_parameters" => "ParameterList",
        "type_annotation" => "TypeAnnotation",
        "arguments" => "ArgumentList",
        "this" => "ThisKeyword",
        other => other,
    }
}

fn strip_quotes(source: &str, range: &Range<usize>) -> Range<usize> {
    let text = &source[range.clone()];
    let quoted = text.len() >= 2
        && ((text.starts_with('"') && text.ends_with('"'))
            || (text.starts_with('\'') && text.ends_with('\''))
            || (text.starts_with('`') && text.ends_with('`')));
    if quoted {
        range.start + 1..range.end - 1
    } else {
        range.clone()
    }
}
