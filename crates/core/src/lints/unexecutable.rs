//! # [`Unexecutable`]
//!
//! A leaf without an executor can be typed but does nothing. This is only a warning, the
//! executor may be bound by a later batch.

use super::{declared_at, Lint};
use crate::commands::binding::Role;
use crate::commands::environment::Environment;
use crate::diagnostic::Logger;
use crate::Context;

pub struct Unexecutable;

impl Lint for Unexecutable {
    fn lint(&self, env: &Environment<'_>, context: &Context<'_>, logger: &mut dyn Logger) {
        for idx in env.tree.walk() {
            let command = &env.tree[idx];
            if !command.is_leaf() || command.bindings_with(Role::Command).next().is_some() {
                continue;
            }

            logger.warn(
                &declared_at(command),
                format!(
                    "\"{}\" can never be executed, no command is bound to it",
                    env.tree.path_string(idx, &context.config.separator)
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lints::test_utils::{lint_with, ty};
    use crate::member::{Bind, Member};

    #[test]
    fn leaf_without_executor_warns() {
        let members = [
            Member::new_type("A").command("a b").command("a c"),
            Member::field("b", ty("Command<CommandSender>")).bind(Bind::Path("a b".into())),
        ];
        let diagnostics = lint_with(&Unexecutable, &members);
        assert_eq!(diagnostics.warnings().count(), 1);
        assert_eq!(
            diagnostics.entries()[0].message,
            "\"a c\" can never be executed, no command is bound to it"
        );
    }
}
