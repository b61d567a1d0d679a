//! # [`ArgumentType`]
//!
//! Every argument needs something that parses it. An argument node without an argument type
//! bound to it is reported, and so is an argument type bound to a literal, which has nothing to
//! parse.

use super::{declared_at, Lint};
use crate::commands::binding::Role;
use crate::commands::environment::Environment;
use crate::diagnostic::Logger;
use crate::Context;

pub struct ArgumentType;

impl Lint for ArgumentType {
    fn lint(&self, env: &Environment<'_>, context: &Context<'_>, logger: &mut dyn Logger) {
        let separator = &context.config.separator;
        for idx in env.tree.walk() {
            let command = &env.tree[idx];
            let mut providers = command.bindings_with(Role::ArgumentType).peekable();

            if command.identity.is_argument() {
                if providers.peek().is_none() {
                    logger.error(
                        &declared_at(command),
                        format!(
                            "\"{}\" has no argument type",
                            env.tree.path_string(idx, separator)
                        ),
                    );
                }
                continue;
            }

            for provider in providers {
                let member = env.member(provider.member());
                logger.error(
                    &member.location,
                    format!(
                        "\"{}\" is bound to literal \"{}\", argument types can only be bound to \
                         arguments",
                        member.name,
                        env.tree.path_string(idx, separator)
                    ),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lints::test_utils::{lint_with, ty};
    use crate::member::{Bind, Member};

    #[test]
    fn covered_arguments_pass() {
        let members = [
            Member::new_type("A").command("give <player> <amount>"),
            Member::field("amount", ty("IntegerArgumentType")).bind(Bind::Pattern("<amount>".into())),
            Member::field("player", ty("PlayerArgumentType"))
                .bind(Bind::Path("give <player>".into())),
        ];
        assert!(lint_with(&ArgumentType, &members).is_empty());
    }

    #[test]
    fn uncovered_argument_is_reported() {
        let members = [
            Member::new_type("A").command("give <player> <amount>"),
            Member::field("amount", ty("IntegerArgumentType")).bind(Bind::Pattern("<amount>".into())),
        ];
        let diagnostics = lint_with(&ArgumentType, &members);
        assert_eq!(diagnostics.errors().count(), 1);
        assert_eq!(
            diagnostics.entries()[0].message,
            "\"give <player>\" has no argument type"
        );
    }

    #[test]
    fn provider_on_literal_is_reported() {
        let members = [
            Member::new_type("A").command("give"),
            Member::field("give", ty("IntegerArgumentType")).bind(Bind::Path("give".into())),
        ];
        let diagnostics = lint_with(&ArgumentType, &members);
        assert_eq!(diagnostics.errors().count(), 1);
        assert!(diagnostics.entries()[0].message.contains("bound to literal \"give\""));
    }
}
