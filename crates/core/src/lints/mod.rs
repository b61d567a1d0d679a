mod argument_position;
mod argument_type;
mod conflicting_alias;
mod duplicate_binding;
mod method_signature;
mod public_final;
mod reference_type;
mod suggestions_target;
mod unexecutable;

pub use argument_position::ArgumentPosition;
pub use argument_type::ArgumentType;
pub use conflicting_alias::ConflictingAlias;
pub use duplicate_binding::DuplicateBinding;
pub use method_signature::MethodSignature;
pub use public_final::PublicFinal;
pub use reference_type::ReferenceType;
pub use suggestions_target::SuggestionsTarget;
pub use unexecutable::Unexecutable;

use crate::commands::environment::Environment;
use crate::commands::node::Command;
use crate::diagnostic::{Location, Logger};
use crate::Context;
use std::time::Instant;
use tracing::trace;

pub const fn make_default_lint_manager() -> LintManager<'static> {
    LintManager::new(&[
        &argument_position::ArgumentPosition,
        &conflicting_alias::ConflictingAlias,
        &argument_type::ArgumentType,
        &method_signature::MethodSignature,
        &public_final::PublicFinal,
        &reference_type::ReferenceType,
        &duplicate_binding::DuplicateBinding,
        &suggestions_target::SuggestionsTarget,
        &unexecutable::Unexecutable,
    ])
}

/// Runs lints one after the other.
///
/// Lints only read the environment, so the order matters for nothing but the order the
/// diagnostics come out in.
pub struct LintManager<'l> {
    lints: &'l [&'l dyn Lint],
}

impl<'l> LintManager<'l> {
    pub const fn new(lints: &'l [&'l dyn Lint]) -> Self {
        Self { lints }
    }

    pub fn run_lints(&self, env: &Environment<'_>, context: &Context<'_>, logger: &mut dyn Logger) {
        for &lint in self.lints {
            trace!("Running lint: {}", lint.name());
            let start = Instant::now();

            lint.lint(env, context, logger);

            trace!("Completed lint in {:?}", start.elapsed());
        }
    }
}

pub trait Lint {
    fn lint(&self, env: &Environment<'_>, context: &Context<'_>, logger: &mut dyn Logger);

    /// Shown in trace logs. Not stable across builds, so never match on it.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Where the first pattern line naming `command` points to.
fn declared_at(command: &Command) -> Location {
    command
        .declarations
        .first()
        .map(|declaration| declaration.location.clone())
        .unwrap_or_else(|| Location::new(command.identity.to_string()))
}

#[cfg(test)]
pub(crate) mod test_utils {
    use crate::commands::binder::bind_member;
    use crate::commands::environment::Environment;
    use crate::commands::parser::parse;
    use crate::commands::resolver::resolve;
    use crate::config::CompilerConfig;
    use crate::diagnostic::Diagnostics;
    use crate::lints::Lint;
    use crate::member::Member;
    use crate::types::{TypeDecl, TypeHierarchy, TypeRef};
    use crate::Context;

    pub fn ty(s: &str) -> TypeRef {
        TypeRef::parse(s).unwrap()
    }

    pub fn types() -> TypeHierarchy {
        let mut types = TypeHierarchy::new("Object");
        types.declare(TypeDecl::new("ArgumentType").parameter("T"));
        types.declare(TypeDecl::new("CompletableFuture").parameter("T"));
        types.declare(TypeDecl::new("Predicate").parameter("T"));
        types.declare(TypeDecl::new("Command").parameter("S"));
        types.declare(TypeDecl::new("SuggestionProvider").parameter("S"));
        types.declare(TypeDecl::new("Integer").extends(ty("Number")));
        types.declare(TypeDecl::new("IntegerArgumentType").extends(ty("ArgumentType<Integer>")));
        types.declare(TypeDecl::new("PlayerArgumentType").extends(ty("ArgumentType<Player>")));
        types.declare(TypeDecl::new("Player").extends(ty("CommandSender")));
        types.declare(TypeDecl::new("CommandSyntaxException").extends(ty("Exception")));
        types.declare(TypeDecl::new("IllegalStateException").extends(ty("RuntimeException")));
        types
    }

    /// Builds the environment for `members` and runs only `lint` over it.
    pub fn lint_with(lint: &dyn Lint, members: &[Member]) -> Diagnostics {
        let config = CompilerConfig::default();
        let types = types();
        let context = Context {
            config: &config,
            types: &types,
        };
        let mut setup = Diagnostics::new();
        let mut env = Environment::new(members, config.lex_cache);
        for id in env.member_ids() {
            parse(&mut env, &context, &mut setup, id);
        }
        for id in env.member_ids() {
            bind_member(&mut env, &context, &mut setup, id);
        }
        for id in env.member_ids() {
            resolve(&mut env, &context, &mut setup, id);
        }

        let mut diagnostics = Diagnostics::new();
        lint.lint(&env, &context, &mut diagnostics);
        diagnostics
    }
}
