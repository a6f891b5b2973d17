//! Tree query adapter tests: normalization, path evaluation, glob scoping,
//! staged edits and flush semantics.

use pretty_assertions::assert_eq;
use ripple_core::QueryError;
use ripple_refactor::project::Project;
use ripple_refactor::tree::{
    find_matches, parse_file, select, stage_replacement, PathExpr,
};

// ---- Helpers ----

fn project(files: &[(&str, &str)]) -> Project {
    Project::from_files(files.iter().copied())
}

fn select_in(project: &Project, path: &str, expr: &str) -> Vec<String> {
    let tree = parse_file(project, path).unwrap();
    let parsed = PathExpr::parse(expr).unwrap();
    select(&tree, tree.root(), &parsed)
        .into_iter()
        .map(|n| tree.text(n).to_string())
        .collect()
}

// ---- Normalization ----

#[test]
fn function_declarations_are_addressable_by_name() {
    let p = project(&[(
        "src/f.ts",
        "export function visible() {}\nfunction hidden(s: string) {}\n",
    )]);
    let found = select_in(
        &p,
        "src/f.ts",
        "//FunctionDeclaration[/Identifier[@value='hidden']]",
    );
    assert_eq!(found.len(), 1);
    assert!(found[0].starts_with("function hidden"));
}

#[test]
fn exported_declarations_carry_an_export_keyword_child() {
    let p = project(&[(
        "src/f.ts",
        "export function visible() {}\nfunction hidden() {}\n",
    )]);
    let tree = parse_file(&p, "src/f.ts").unwrap();
    let decls = select(
        &tree,
        tree.root(),
        &PathExpr::parse("//FunctionDeclaration").unwrap(),
    );
    assert_eq!(decls.len(), 2);

    let visible = decls
        .iter()
        .find(|&&d| tree.text(d).contains("visible"))
        .copied()
        .unwrap();
    let hidden = decls
        .iter()
        .find(|&&d| tree.text(d).contains("hidden"))
        .copied()
        .unwrap();
    assert!(tree.child_named(visible, "ExportKeyword").is_some());
    assert!(tree.child_named(hidden, "ExportKeyword").is_none());
}

#[test]
fn methods_are_direct_children_of_their_class() {
    let p = project(&[(
        "src/classy.ts",
        "class Classy { public static thinger() { return 1; } }\n",
    )]);
    let found = select_in(
        &p,
        "src/classy.ts",
        "//ClassDeclaration[/Identifier[@value='Classy']]/MethodDeclaration[/Identifier[@value='thinger']]",
    );
    assert_eq!(found.len(), 1);
}

#[test]
fn namespace_functions_sit_under_a_module_block() {
    let p = project(&[(
        "src/spacey.ts",
        "namespace Spacey { export function giveMeYourContext(s: string) { return s; } }\n",
    )]);
    let found = select_in(
        &p,
        "src/spacey.ts",
        "//ModuleDeclaration[/Identifier[@value='Spacey']]/ModuleBlock/FunctionDeclaration[/Identifier[@value='giveMeYourContext']]",
    );
    assert_eq!(found.len(), 1);
}

#[test]
fn string_literal_values_compare_without_quotes() {
    let p = project(&[(
        "src/f.ts",
        "import { HandlerContext } from \"@scope/automation\";\n",
    )]);
    let found = select_in(
        &p,
        "src/f.ts",
        "//ImportDeclaration[//StringLiteral[@value='@scope/automation']]",
    );
    assert_eq!(found.len(), 1);
}

#[test]
fn qualified_calls_match_by_dotted_value() {
    let p = project(&[(
        "src/caller.ts",
        "class Classy { m() { return Spacey.giveMeYourContext(\"x\"); } }\n",
    )]);
    let found = select_in(
        &p,
        "src/caller.ts",
        "//CallExpression[/PropertyAccessExpression[@value='Spacey.giveMeYourContext']]",
    );
    assert_eq!(found.len(), 1);

    let this_style = project(&[(
        "src/c.ts",
        "class C { a() { return this.b(1); } b(n: number) { return n; } }\n",
    )]);
    let found = select_in(
        &this_style,
        "src/c.ts",
        "//CallExpression[/PropertyAccessExpression/Identifier[@value='b']]",
    );
    assert_eq!(found.len(), 1);
}

#[test]
fn matches_come_back_in_document_order() {
    let p = project(&[(
        "src/f.ts",
        "function a() { first(); second(); }\nfunction b() { third(); }\n",
    )]);
    let tree = parse_file(&p, "src/f.ts").unwrap();
    let calls = select(
        &tree,
        tree.root(),
        &PathExpr::parse("//CallExpression").unwrap(),
    );
    let texts: Vec<&str> = calls.iter().map(|&c| tree.text(c)).collect();
    assert_eq!(texts, vec!["first()", "second()", "third()"]);
}

// ---- Glob scoping ----

#[test]
fn find_matches_scopes_by_glob() {
    let p = project(&[
        ("src/a.ts", "function f() {}\n"),
        ("src/deep/b.ts", "function f() {}\n"),
        ("test/a_test.ts", "function f() {}\n"),
        ("tests/b_test.ts", "function f() {}\n"),
    ]);
    let expr = PathExpr::parse("//FunctionDeclaration[/Identifier[@value='f']]").unwrap();

    let src = find_matches(&p, &["src/**/*.ts".to_string()], &expr).unwrap();
    let src_paths: Vec<&str> = src.iter().map(|m| m.tree.path()).collect();
    assert_eq!(src_paths, vec!["src/a.ts", "src/deep/b.ts"]);

    let tests = find_matches(&p, &["test*/**/*.ts".to_string()], &expr).unwrap();
    let test_paths: Vec<&str> = tests.iter().map(|m| m.tree.path()).collect();
    assert_eq!(test_paths, vec!["test/a_test.ts", "tests/b_test.ts"]);

    let single = find_matches(&p, &["src/a.ts".to_string()], &expr).unwrap();
    assert_eq!(single.len(), 1);
    assert_eq!(single[0].tree.path(), "src/a.ts");

    let braced = find_matches(&p, &["{src,test}/**/*.ts".to_string()], &expr).unwrap();
    let braced_paths: Vec<&str> = braced.iter().map(|m| m.tree.path()).collect();
    assert_eq!(braced_paths, vec!["src/a.ts", "src/deep/b.ts", "test/a_test.ts"]);
}

// ---- Edits and flush ----

#[test]
fn staged_replacement_lands_on_flush() {
    let mut p = project(&[("src/f.ts", "function f(s: string) { return s; }\n")]);
    let tree = parse_file(&p, "src/f.ts").unwrap();
    let decl = select(
        &tree,
        tree.root(),
        &PathExpr::parse("//FunctionDeclaration[/Identifier[@value='f']]").unwrap(),
    )[0];
    let paren = tree.first_descendant_named(decl, "OpenParenToken").unwrap();

    stage_replacement(&mut p, &tree, paren, "(context: HandlerContext, ").unwrap();
    assert_eq!(p.pending_edits(), 1);
    p.flush().unwrap();

    assert_eq!(
        p.file("src/f.ts").unwrap(),
        "function f(context: HandlerContext, s: string) { return s; }\n"
    );
}

#[test]
fn flush_invalidates_outstanding_trees() {
    let mut p = project(&[("src/f.ts", "function f() {}\n")]);
    let tree = parse_file(&p, "src/f.ts").unwrap();
    let decl = select(
        &tree,
        tree.root(),
        &PathExpr::parse("//FunctionDeclaration").unwrap(),
    )[0];
    let paren = tree.first_descendant_named(decl, "OpenParenToken").unwrap();

    p.flush().unwrap();

    let err = stage_replacement(&mut p, &tree, paren, "(x, ").unwrap_err();
    assert!(matches!(err, QueryError::StaleNode { .. }));
}

#[test]
fn overlapping_edits_are_refused() {
    let mut p = project(&[("src/f.ts", "function f(s: string) {}\n")]);
    let tree = parse_file(&p, "src/f.ts").unwrap();
    let decl = select(
        &tree,
        tree.root(),
        &PathExpr::parse("//FunctionDeclaration").unwrap(),
    )[0];

    // Whole declaration and a range inside it.
    stage_replacement(&mut p, &tree, decl, "function g() {}").unwrap();
    let paren = tree.first_descendant_named(decl, "OpenParenToken").unwrap();
    stage_replacement(&mut p, &tree, paren, "(x, ").unwrap();

    assert!(p.flush().is_err());
}

#[test]
fn duplicate_edits_collapse() {
    let mut p = project(&[("src/f.ts", "function f() { g(); }\n")]);
    let tree = parse_file(&p, "src/f.ts").unwrap();
    let call = select(
        &tree,
        tree.root(),
        &PathExpr::parse("//CallExpression").unwrap(),
    )[0];
    let paren = tree.first_descendant_named(call, "OpenParenToken").unwrap();

    stage_replacement(&mut p, &tree, paren, "(ctx, ").unwrap();
    stage_replacement(&mut p, &tree, paren, "(ctx, ").unwrap();
    p.flush().unwrap();

    assert_eq!(p.file("src/f.ts").unwrap(), "function f() { g(ctx, ); }\n");
}
