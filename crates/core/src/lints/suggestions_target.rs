//! # [`SuggestionsTarget`]
//!
//! Literals complete to their own names. A suggestion provider bound to one is never asked.

use super::Lint;
use crate::commands::binding::Role;
use crate::commands::environment::Environment;
use crate::diagnostic::Logger;
use crate::Context;

pub struct SuggestionsTarget;

impl Lint for SuggestionsTarget {
    fn lint(&self, env: &Environment<'_>, context: &Context<'_>, logger: &mut dyn Logger) {
        for idx in env.tree.walk() {
            let command = &env.tree[idx];
            if !command.identity.is_literal() {
                continue;
            }

            for binding in command.bindings_with(Role::Suggestions) {
                let member = env.member(binding.member());
                logger.error(
                    &member.location,
                    format!(
                        "\"{}\" suggests values for literal \"{}\", only arguments can have \
                         suggestions",
                        member.name,
                        env.tree.path_string(idx, &context.config.separator)
                    ),
                );
            }
        }
    }
}
