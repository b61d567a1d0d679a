#![allow(dead_code)]

use cmdtree_core::commands::{CompileError, Environment, Identity, NodeIdx};
use cmdtree_core::config::CompilerConfig;
use cmdtree_core::diagnostic::{Diagnostic, Diagnostics, Severity};
use cmdtree_core::lints::LintManager;
use cmdtree_core::member::{Bind, Member, Parameter};
use cmdtree_core::types::{TypeDecl, TypeHierarchy, TypeRef};
use cmdtree_core::Compiler;

pub fn ty(s: &str) -> TypeRef {
    TypeRef::parse(s).unwrap()
}

/// A small slice of a server API: argument types, functional interfaces and exceptions.
pub fn hierarchy() -> TypeHierarchy {
    let mut types = TypeHierarchy::new("Object");
    types.declare(TypeDecl::new("ArgumentType").parameter("T"));
    types.declare(TypeDecl::new("CompletableFuture").parameter("T"));
    types.declare(TypeDecl::new("Command").parameter("S"));
    types.declare(TypeDecl::new("Predicate").parameter("T"));
    types.declare(TypeDecl::new("SuggestionProvider").parameter("S"));
    types.declare(TypeDecl::new("Integer").extends(ty("Number")));
    types.declare(TypeDecl::new("IntegerArgumentType").extends(ty("ArgumentType<Integer>")));
    types.declare(TypeDecl::new("StringArgumentType").extends(ty("ArgumentType<String>")));
    types.declare(TypeDecl::new("PlayerArgumentType").extends(ty("ArgumentType<Player>")));
    types.declare(
        TypeDecl::new("ListArgumentType")
            .parameter("E")
            .extends(ty("ArgumentType<List<E>>")),
    );
    types.declare(TypeDecl::new("List").parameter("E"));
    types.declare(TypeDecl::new("Player").extends(ty("CommandSender")));
    types.declare(TypeDecl::new("CommandSyntaxException").extends(ty("Exception")));
    types.declare(TypeDecl::new("IOException").extends(ty("Exception")));
    types.declare(TypeDecl::new("IllegalArgumentException").extends(ty("RuntimeException")));
    types
}

pub fn context() -> Parameter {
    Parameter::new("context", ty("CommandContext<CommandSender>"))
}

pub fn sender() -> Parameter {
    Parameter::new("sender", ty("CommandSender"))
}

/// An argument type field bound to every argument named `name`.
pub fn argument(name: &str, provider: &str) -> Member {
    Member::field(name, ty(provider))
        .owned_by("Arguments")
        .bind(Bind::Pattern(format!("<{}>", name)))
}

/// An `int` executor bound to `path`, taking the context and then `parameters`.
pub fn executor(name: &str, path: &str, parameters: Vec<Parameter>) -> Member {
    let mut all = vec![context()];
    all.extend(parameters);
    Member::method(name, ty("int"), all)
        .owned_by("Commands")
        .throws(ty("CommandSyntaxException"))
        .bind(Bind::Path(path.to_string()))
}

pub struct Outcome<'m> {
    pub result: Result<Environment<'m>, CompileError>,
    pub diagnostics: Diagnostics,
}

impl<'m> Outcome<'m> {
    pub fn env(&self) -> &Environment<'m> {
        match &self.result {
            Ok(env) => env,
            Err(err) => panic!("{}: {:#?}", err, self.diagnostics.entries()),
        }
    }

    pub fn messages(&self, severity: Severity) -> Vec<&str> {
        self.diagnostics
            .entries()
            .iter()
            .filter(|diagnostic| diagnostic.severity == severity)
            .map(|diagnostic| diagnostic.message.as_str())
            .collect()
    }

    pub fn errors(&self) -> Vec<&str> {
        self.messages(Severity::Error)
    }

    pub fn warnings(&self) -> Vec<&str> {
        self.messages(Severity::Warning)
    }

    pub fn entries(&self) -> &[Diagnostic] {
        self.diagnostics.entries()
    }
}

pub fn compile(members: &[Member]) -> Outcome<'_> {
    compile_with(CompilerConfig::default(), None, members)
}

pub fn compile_with<'m>(
    config: CompilerConfig,
    lints: Option<LintManager<'static>>,
    members: &'m [Member],
) -> Outcome<'m> {
    let mut compiler = Compiler::new(config, hierarchy());
    if let Some(lints) = lints {
        compiler = compiler.with_lints(lints);
    }
    let mut diagnostics = Diagnostics::new();
    let result = compiler.compile(members, &mut diagnostics);
    Outcome {
        result,
        diagnostics,
    }
}

/// Finds the node at `path`, e.g. `give <player>`.
pub fn node(env: &Environment<'_>, path: &str) -> NodeIdx {
    let mut current = None;
    for segment in path.split_whitespace() {
        let identity = match segment.strip_prefix('<').and_then(|s| s.strip_suffix('>')) {
            Some(name) => Identity::argument(name),
            None => Identity::literal(segment),
        };
        current = Some(
            env.tree
                .child(current, &identity)
                .unwrap_or_else(|| panic!("{} does not exist", path)),
        );
    }
    current.expect("empty path")
}

/// The paths of every node `member` is bound to.
pub fn bound_paths(env: &Environment<'_>, member: usize) -> Vec<String> {
    env.scope(cmdtree_core::member::MemberId(member))
        .iter()
        .map(|&idx| env.tree.path_string(idx, " "))
        .collect()
}
