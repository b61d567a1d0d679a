mod common;

use cmdtree_core::config::CompilerConfig;
use cmdtree_core::diagnostic::Severity;
use cmdtree_core::lints::{
    ArgumentPosition, ConflictingAlias, LintManager, MethodSignature, ReferenceType,
};
use cmdtree_core::member::{Member, Parameter};
use common::*;
use pretty_assertions::assert_eq;

fn lint<'m>(lints: LintManager<'static>, members: &'m [Member]) -> Outcome<'m> {
    compile_with(CompilerConfig::default(), Some(lints), members)
}

#[test]
fn conflicting_alias() {
    let members = [Member::new_type("A").command("a b").command("a b|b1")];
    let outcome = lint(LintManager::new(&[&ConflictingAlias]), &members);
    assert!(outcome.entries().is_empty());

    let members = [Member::new_type("A").command("a b|1").command("a c|1")];
    let outcome = lint(LintManager::new(&[&ConflictingAlias]), &members);
    let errors = outcome.errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("\"a b|1\""));
    assert!(errors[0].contains("\"a c|1\""));
}

#[test]
fn argument_position() {
    let members = [Member::new_type("A").command("a <b> c")];
    let outcome = lint(LintManager::new(&[&ArgumentPosition]), &members);
    assert!(outcome.entries().is_empty());

    let members = [Member::new_type("A").command("<a> b c")];
    let outcome = lint(LintManager::new(&[&ArgumentPosition]), &members);
    assert_eq!(outcome.errors().len(), 1);

    let error = &outcome.entries()[0];
    assert!(error.message.contains("Invalid command start"));
    let token = error.location.token.as_ref().unwrap();
    assert_eq!(&token.line[token.range.clone()], "<a>");
}

#[test]
fn method_signature() {
    let run = || {
        executor(
            "run",
            "a <b>",
            vec![Parameter::new("b", ty("String")).with_let(Some("b"))],
        )
    };
    let members = [Member::new_type("A").command("a <b>"), run()];
    let outcome = lint(LintManager::new(&[&MethodSignature]), &members);
    assert!(outcome.entries().is_empty());

    let members = [
        Member::new_type("A").command("a <b>"),
        run().throws(ty("IOException")),
    ];
    let outcome = lint(LintManager::new(&[&MethodSignature]), &members);
    assert_eq!(outcome.errors().len(), 1);
    assert_eq!(outcome.entries()[0].location.element, "Commands#run");
}

#[test]
fn unchecked_exceptions_are_always_allowed() {
    let members = [
        Member::new_type("A").command("a"),
        Member::method("allowed", ty("boolean"), vec![sender()])
            .throws(ty("IllegalArgumentException"))
            .bind(cmdtree_core::member::Bind::Path("a".into())),
    ];
    let outcome = lint(LintManager::new(&[&MethodSignature]), &members);
    assert!(outcome.entries().is_empty());
}

#[test]
fn reference_type_severity() {
    let members = |provider: &str, parameter: &str| {
        [
            Member::new_type("A").command("a <b>"),
            argument("b", provider),
            executor(
                "run",
                "a <b>",
                vec![Parameter::new("b", ty(parameter)).with_let(None)],
            ),
        ]
    };
    let severities = |members: &[Member]| {
        lint(LintManager::new(&[&ReferenceType]), members)
            .entries()
            .iter()
            .map(|diagnostic| diagnostic.severity)
            .collect::<Vec<_>>()
    };

    assert!(severities(&members("IntegerArgumentType", "Integer")).is_empty());
    assert!(severities(&members("IntegerArgumentType", "Object")).is_empty());
    assert!(severities(&members("ListArgumentType<String>", "List<String>")).is_empty());
    assert_eq!(
        severities(&members("ArgumentType", "Integer")),
        [Severity::Warning]
    );
    assert_eq!(
        severities(&members("IntegerArgumentType", "String")),
        [Severity::Error]
    );
    assert_eq!(
        severities(&members("ListArgumentType<String>", "List<Integer>")),
        [Severity::Error]
    );
}

#[test]
fn default_lints_report_in_fixed_order() {
    let members = [
        Member::new_type("A").command("<x> y").command("a b|z").command("a c|z"),
        Member::method("run", ty("int"), Vec::new())
            .modifiers(cmdtree_core::member::Modifiers::PUBLIC)
            .bind(cmdtree_core::member::Bind::Path("a b".into())),
    ];
    let outcome = compile(&members);
    let errors = outcome.errors();
    assert_eq!(errors.len(), 5, "{:#?}", errors);
    assert!(errors[0].starts_with("Invalid command start"));
    assert!(errors[1].contains("conflicts with"));
    assert_eq!(errors[2], "\"<x>\" has no argument type");
    assert!(errors[3].starts_with("Invalid signature \"int run()\""));
    assert!(errors[4].ends_with("it is not final"));
    assert_eq!(
        outcome.warnings(),
        [
            "\"<x> y\" can never be executed, no command is bound to it",
            "\"a c\" can never be executed, no command is bound to it",
        ]
    );
}
