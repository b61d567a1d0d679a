//! # [`PublicFinal`]
//!
//! Generated code reads bound members from outside their owner and assumes they never change.

use super::Lint;
use crate::commands::environment::Environment;
use crate::diagnostic::Logger;
use crate::member::Modifiers;
use crate::Context;

pub struct PublicFinal;

impl Lint for PublicFinal {
    fn lint(&self, env: &Environment<'_>, _: &Context<'_>, logger: &mut dyn Logger) {
        for id in env.bound_members() {
            let member = env.member(id);
            let missing = [(Modifiers::PUBLIC, "public"), (Modifiers::FINAL, "final")]
                .into_iter()
                .filter(|&(modifier, _)| !member.modifiers.contains(modifier))
                .map(|(_, name)| name)
                .collect::<Vec<_>>();
            if missing.is_empty() {
                continue;
            }

            logger.error(
                &member.location,
                format!(
                    "\"{}\" should be public and final, it is not {}",
                    member.name,
                    missing.join(" and ")
                ),
            );
        }
    }
}
