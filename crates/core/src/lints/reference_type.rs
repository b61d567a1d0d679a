//! # [`ReferenceType`]
//!
//! A `@Let` parameter receives the value parsed by the argument type bound to the node it links
//! to, so its declared type has to accept that value. The universal object type accepts
//! anything. A raw argument type hides the value type, which only earns a warning since the
//! check cannot be made.

use super::Lint;
use crate::commands::binding::{Binding, Role};
use crate::commands::environment::Environment;
use crate::diagnostic::Logger;
use crate::Context;

pub struct ReferenceType;

impl Lint for ReferenceType {
    fn lint(&self, env: &Environment<'_>, context: &Context<'_>, logger: &mut dyn Logger) {
        let types = context.types;
        for (idx, binding) in env.bindings() {
            let Binding::Method(method) = binding else {
                continue;
            };
            let member = env.member(method.member);
            let parameters = member.parameters();

            for (&i, link) in &method.parameters {
                let Some(parameter) = parameters.get(i) else {
                    continue;
                };
                let target = link.target();
                let path = env.tree.path_string(target, &context.config.separator);

                for provider in env.tree[target].bindings_with(Role::ArgumentType) {
                    let Binding::Field(field) = provider else {
                        continue;
                    };
                    if types.is_object(&parameter.ty) {
                        continue;
                    }

                    let Some(value) = &field.value else {
                        logger.warn(
                            &member.location,
                            format!(
                                "The type of \"{}\" cannot be checked, the argument type of \"{}\" \
                                 is raw",
                                parameter.name, path
                            ),
                        );
                        continue;
                    };
                    if parameter.ty == *value || types.is_subtype(value, &parameter.ty) {
                        continue;
                    }

                    logger.error(
                        &member.location,
                        format!(
                            "Invalid type \"{}\" for \"{}\" in \"{}\", \"{}\" provides {} so it \
                             should be {} or a supertype of it",
                            parameter.ty,
                            parameter.name,
                            env.tree.path_string(idx, &context.config.separator),
                            path,
                            value,
                            value
                        ),
                    );
                }
            }
        }
    }
}
