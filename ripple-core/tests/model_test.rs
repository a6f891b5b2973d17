//! Data-model tests: requirement equality, changeset ordering, callable
//! path building, import externalization, report accumulation.

use pretty_assertions::assert_eq;
use ripple_core::{
    AddMigration, AddParameter, CallableAccess, CallableRef, Changeset, EditError, EngineConfig,
    ImportRef, InMemoryMigrationSink, JsonLinesSink, MigrationRecord, MigrationSink, PassArgument,
    PassDummyInTests, Provenance, Report, Requirement, Scope, ScopeKind, TestPopulation,
};

// ---- Helpers ----

fn context_import() -> ImportRef {
    ImportRef::library("HandlerContext", "@scope/automation")
}

fn populate() -> TestPopulation {
    TestPopulation {
        dummy_value: "{} as HandlerContext".to_string(),
        additional_import: Some(context_import()),
    }
}

fn add_parameter(target: CallableRef, why: &str) -> Requirement {
    Requirement::AddParameter(AddParameter {
        target,
        parameter_type: context_import(),
        parameter_name: "context".to_string(),
        populate_in_tests: populate(),
        why: Provenance::reason(why),
    })
}

fn plain_fn(name: &str, file: &str, access: CallableAccess) -> CallableRef {
    CallableRef::function(name, file, access)
}

// ---- Requirement equality ----

#[test]
fn equality_ignores_provenance_and_payload() {
    let target = plain_fn("priv", "src/f.ts", CallableAccess::PrivateFunction);
    let a = add_parameter(target.clone(), "first reason");
    let b = add_parameter(target, "a completely different reason");
    assert_eq!(a, b);
}

#[test]
fn equality_ignores_access_classification() {
    let a = add_parameter(
        plain_fn("f", "src/f.ts", CallableAccess::PrivateFunction),
        "r",
    );
    let b = add_parameter(
        plain_fn("f", "src/f.ts", CallableAccess::PublicFunction),
        "r",
    );
    assert_eq!(a, b);
}

#[test]
fn pass_argument_distinguishes_enclosing() {
    let target = plain_fn("priv", "src/f.ts", CallableAccess::PrivateFunction);
    let from_a = Requirement::PassArgument(PassArgument {
        enclosing: plain_fn("callerA", "src/a.ts", CallableAccess::PublicFunction),
        target: target.clone(),
        argument_value: "context".to_string(),
        why: Provenance::reason("r"),
    });
    let from_b = Requirement::PassArgument(PassArgument {
        enclosing: plain_fn("callerB", "src/b.ts", CallableAccess::PublicFunction),
        target: target.clone(),
        argument_value: "context".to_string(),
        why: Provenance::reason("r"),
    });
    let from_a_again = Requirement::PassArgument(PassArgument {
        enclosing: plain_fn("callerA", "src/a.ts", CallableAccess::PublicFunction),
        target,
        argument_value: "ctx".to_string(),
        why: Provenance::reason("other"),
    });
    assert_ne!(from_a, from_b);
    assert_eq!(from_a, from_a_again);
}

#[test]
fn different_kinds_never_compare_equal() {
    let target = plain_fn("f", "src/f.ts", CallableAccess::PublicFunction);
    let add = add_parameter(target.clone(), "r");
    let dummy = Requirement::PassDummyInTests(PassDummyInTests {
        target,
        dummy_value: "{}".to_string(),
        additional_import: None,
        why: Provenance::reason("r"),
    });
    assert_ne!(add, dummy);
}

#[test]
fn scope_chains_compare_structurally() {
    let inner = Scope::new(ScopeKind::Class, "Classy", false)
        .inside(Scope::new(ScopeKind::Namespace, "Spacey", true));
    let same = Scope::new(ScopeKind::Class, "Classy", false)
        .inside(Scope::new(ScopeKind::Namespace, "Spacey", true));
    let different = Scope::new(ScopeKind::Class, "Classy", false)
        .inside(Scope::new(ScopeKind::Namespace, "Other", true));
    assert_eq!(inner, same);
    assert_ne!(inner, different);
}

// ---- Changeset ordering ----

#[test]
fn all_requirements_flattens_prerequisites_first_depth_first() {
    let leaf_a = add_parameter(plain_fn("a", "src/a.ts", CallableAccess::PrivateFunction), "a");
    let leaf_b = add_parameter(plain_fn("b", "src/b.ts", CallableAccess::PrivateFunction), "b");
    let root_req = add_parameter(plain_fn("r", "src/r.ts", CallableAccess::PrivateFunction), "r");

    let nested = Changeset {
        requirements: vec![leaf_b.clone()],
        prerequisites: vec![Changeset::leaf(leaf_a.clone())],
    };
    let root = Changeset {
        requirements: vec![root_req.clone()],
        prerequisites: vec![nested],
    };

    let flattened = root.all_requirements();
    assert_eq!(flattened.len(), 3);
    assert_eq!(flattened[0], &leaf_a);
    assert_eq!(flattened[1], &leaf_b);
    assert_eq!(flattened[2], &root_req);
    assert_eq!(root.len(), 3);
}

// ---- Callable paths and globs ----

#[test]
fn declaration_path_for_a_plain_function() {
    let f = plain_fn("priv", "src/f.ts", CallableAccess::PrivateFunction);
    assert_eq!(
        f.declaration_path(),
        "//FunctionDeclaration[/Identifier[@value='priv']]"
    );
}

#[test]
fn declaration_path_for_a_class_method() {
    let m = CallableRef::scoped(
        "thinger",
        Scope::new(ScopeKind::Class, "Classy", false),
        "src/classy.ts",
        CallableAccess::PublicMethod,
    );
    assert_eq!(
        m.declaration_path(),
        "//ClassDeclaration[/Identifier[@value='Classy']]/MethodDeclaration[/Identifier[@value='thinger']]"
    );
}

#[test]
fn declaration_path_for_a_namespaced_function() {
    let f = CallableRef::scoped(
        "giveMeYourContext",
        Scope::new(ScopeKind::Namespace, "Spacey", true),
        "src/spacey.ts",
        CallableAccess::PublicFunction,
    );
    assert_eq!(
        f.declaration_path(),
        "//ModuleDeclaration[/Identifier[@value='Spacey']]/ModuleBlock/FunctionDeclaration[/Identifier[@value='giveMeYourContext']]"
    );
}

#[test]
fn call_path_depends_on_access_and_scope() {
    let private_method = CallableRef::scoped(
        "thinger",
        Scope::new(ScopeKind::Class, "Classy", false),
        "src/classy.ts",
        CallableAccess::PrivateMethod,
    );
    assert_eq!(
        private_method.call_path(),
        "//CallExpression[/PropertyAccessExpression/Identifier[@value='thinger']]"
    );

    let public_method = CallableRef::scoped(
        "thinger",
        Scope::new(ScopeKind::Class, "Classy", false),
        "src/classy.ts",
        CallableAccess::PublicMethod,
    );
    assert_eq!(
        public_method.call_path(),
        "//CallExpression[/PropertyAccessExpression[@value='Classy.thinger']]"
    );

    let bare = plain_fn("priv", "src/f.ts", CallableAccess::PrivateFunction);
    assert_eq!(
        bare.call_path(),
        "//CallExpression[/Identifier[@value='priv']]"
    );
}

#[test]
fn search_globs_follow_access() {
    let config = EngineConfig::default();
    let public = plain_fn("f", "src/f.ts", CallableAccess::PublicFunction);
    assert_eq!(
        public.planning_globs(&config),
        vec!["src/**/*.ts".to_string(), "test*/**/*.ts".to_string()]
    );
    assert_eq!(public.source_globs(&config), vec!["src/**/*.ts".to_string()]);

    let private = plain_fn("f", "src/f.ts", CallableAccess::PrivateFunction);
    assert_eq!(private.planning_globs(&config), vec!["src/f.ts".to_string()]);
    assert_eq!(private.source_globs(&config), vec!["src/f.ts".to_string()]);
}

#[test]
fn qualified_name_joins_scopes_outermost_first() {
    let m = CallableRef::scoped(
        "fn",
        Scope::new(ScopeKind::Class, "Inner", false)
            .inside(Scope::new(ScopeKind::Namespace, "Outer", true)),
        "src/x.ts",
        CallableAccess::PublicMethod,
    );
    assert_eq!(m.qualified_name(), "Outer.Inner.fn");
}

// ---- Imports ----

#[test]
fn local_import_with_external_path_externalizes_to_library() {
    let local = ImportRef::local_published(
        "HandlerContext",
        "src/HandlerContext.ts",
        "@scope/automation",
    );
    assert_eq!(
        local.externalized(),
        ImportRef::library("HandlerContext", "@scope/automation")
    );

    let plain_local = ImportRef::local("HandlerContext", "src/HandlerContext.ts");
    assert_eq!(plain_local.externalized(), plain_local);

    let library = context_import();
    assert_eq!(library.externalized(), library);
}

// ---- Reports and sinks ----

#[test]
fn reports_concatenate_in_order() {
    let first = add_parameter(plain_fn("a", "src/a.ts", CallableAccess::PrivateFunction), "a");
    let second = add_parameter(plain_fn("b", "src/b.ts", CallableAccess::PrivateFunction), "b");

    let mut report = Report::default();
    report.record_implemented(first.clone());
    let mut other = Report::default();
    other.record_unimplemented(second.clone(), "Function not found");

    report.extend(other);
    assert_eq!(report.implemented, vec![first]);
    assert_eq!(report.unimplemented.len(), 1);
    assert_eq!(report.unimplemented[0].message, "Function not found");
    assert!(!report.is_clean());
}

#[test]
fn refusal_messages_are_stable() {
    assert_eq!(
        EditError::DeclarationNotFound.to_string(),
        "Function declaration not found"
    );
    assert_eq!(
        EditError::AmbiguousDeclaration { matched: 2 }.to_string(),
        "More than one function declaration matched"
    );
    assert_eq!(EditError::CallNotFound.to_string(), "Function not found");
}

fn sample_record() -> MigrationRecord {
    MigrationRecord {
        downstream: AddParameter {
            target: plain_fn("f", "src/f.ts", CallableAccess::PublicFunction),
            parameter_type: context_import(),
            parameter_name: "context".to_string(),
            populate_in_tests: populate(),
            why: Provenance::reason("root"),
        },
        why: Provenance::reason("root"),
    }
}

#[test]
fn in_memory_sink_accumulates_records() {
    let mut sink = InMemoryMigrationSink::new();
    sink.record(sample_record()).unwrap();
    sink.record(sample_record()).unwrap();
    assert_eq!(sink.records().len(), 2);
    assert_eq!(sink.into_records().len(), 2);
}

#[test]
fn json_lines_sink_writes_one_record_per_line() {
    let mut sink = JsonLinesSink::new(Vec::new());
    sink.record(sample_record()).unwrap();
    sink.record(sample_record()).unwrap();
    let buffer = sink.into_inner();
    let text = String::from_utf8(buffer).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    for line in lines {
        let value: serde_json::Value = serde_json::from_str(line).unwrap();
        assert!(value["downstream"]["parameter_name"] == "context");
    }
}

#[test]
fn add_migration_targets_the_downstream_callable() {
    let migration = Requirement::AddMigration(AddMigration {
        downstream: Box::new(sample_record().downstream),
        why: Provenance::reason("root"),
    });
    assert_eq!(migration.target().name, "f");
}
