//! # [`ArgumentPosition`]
//!
//! A command has to be typed starting with its name, so a top-level node can never be an
//! argument. Every pattern line that declared such a node is reported at its first token.

use super::Lint;
use crate::commands::environment::Environment;
use crate::diagnostic::Logger;
use crate::Context;

pub struct ArgumentPosition;

impl Lint for ArgumentPosition {
    fn lint(&self, env: &Environment<'_>, _: &Context<'_>, logger: &mut dyn Logger) {
        for &idx in env.tree.roots().values() {
            let command = &env.tree[idx];
            if !command.identity.is_argument() {
                continue;
            }

            for declaration in &command.declarations {
                logger.error(
                    &declaration.location,
                    format!(
                        "Invalid command start: \"{}\", commands must start with a literal",
                        command.identity
                    ),
                );
            }
        }
    }
}
