//! # [`DuplicateBinding`]
//!
//! A node can only be generated with one argument type, one executor, one requirement and one
//! suggestion provider. Every binding after the first for the same role is reported.

use super::Lint;
use crate::commands::binding::Role;
use crate::commands::environment::Environment;
use crate::diagnostic::Logger;
use crate::Context;

pub struct DuplicateBinding;

const ROLES: [Role; 4] = [
    Role::ArgumentType,
    Role::Command,
    Role::Requirement,
    Role::Suggestions,
];

impl Lint for DuplicateBinding {
    fn lint(&self, env: &Environment<'_>, context: &Context<'_>, logger: &mut dyn Logger) {
        for idx in env.tree.walk() {
            let command = &env.tree[idx];
            for role in ROLES {
                let mut bound = command.bindings_with(role);
                let Some(first) = bound.next() else {
                    continue;
                };
                let first = env.member(first.member());

                for duplicate in bound {
                    let member = env.member(duplicate.member());
                    logger.error(
                        &member.location,
                        format!(
                            "\"{}\" already has its {} from \"{}\", \"{}\" cannot provide another",
                            env.tree.path_string(idx, &context.config.separator),
                            role,
                            first.location.element,
                            member.location.element
                        ),
                    );
                }
            }
        }
    }
}
