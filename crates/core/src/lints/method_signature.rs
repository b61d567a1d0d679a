//! # [`MethodSignature`]
//!
//! The code generator calls bound methods with a fixed set of leading parameters, picked by the
//! method's return type, followed by the `@Let` extractions:
//!
//! - `int`: the command context.
//! - `void`: the command context and the sender.
//! - `boolean`: the sender alone, no extractions.
//! - suggestions: the command context and the suggestions builder.
//!
//! Only the syntax exception and unchecked exceptions may be declared, and requirements may not
//! declare the syntax exception either. A method that does not fit gets exactly one error,
//! naming the signature it should have.

use super::Lint;
use crate::commands::binding::{Binding, Signature};
use crate::commands::environment::Environment;
use crate::config::TypeNames;
use crate::diagnostic::Logger;
use crate::member::{Element, Member, Parameter};
use crate::types::{TypeHierarchy, TypeRef};
use crate::Context;
use itertools::Itertools;

pub struct MethodSignature;

impl Lint for MethodSignature {
    fn lint(&self, env: &Environment<'_>, context: &Context<'_>, logger: &mut dyn Logger) {
        let names = &context.config.types;
        for id in env.bound_members() {
            let binding = env.scope(id).first().and_then(|&idx| env.binding(idx, id));
            let Some(Binding::Method(method)) = binding else {
                continue;
            };
            let member = env.member(id);
            let Element::Method {
                parameters, throws, ..
            } = &member.element
            else {
                continue;
            };

            let shape = Shape::of(method.signature, names);
            if !shape.accepts(parameters, throws, names, context.types) {
                logger.error(
                    &member.location,
                    format!(
                        "Invalid signature \"{}\", it should be \"{}\"",
                        member.signature(),
                        shape.render(member, names)
                    ),
                );
            }
        }
    }
}

struct Shape {
    returns: TypeRef,
    /// Leading parameters as (type, conventional name).
    fixed: Vec<(TypeRef, &'static str)>,
    extractions: bool,
    syntax_exception: bool,
}

impl Shape {
    fn of(signature: Signature, names: &TypeNames) -> Shape {
        let context = TypeRef::generic(names.context.clone(), vec![TypeRef::new(names.sender.clone())]);
        let sender = TypeRef::new(names.sender.clone());
        match signature {
            Signature::Command => Shape {
                returns: TypeRef::new("int"),
                fixed: vec![(context, "context")],
                extractions: true,
                syntax_exception: true,
            },
            Signature::Execution => Shape {
                returns: TypeRef::new("void"),
                fixed: vec![(context, "context"), (sender, "sender")],
                extractions: true,
                syntax_exception: true,
            },
            Signature::Requirement => Shape {
                returns: TypeRef::new("boolean"),
                fixed: vec![(sender, "sender")],
                extractions: false,
                syntax_exception: false,
            },
            Signature::Suggestions => Shape {
                returns: TypeRef::generic(
                    names.future.clone(),
                    vec![TypeRef::new(names.suggestions.clone())],
                ),
                fixed: vec![
                    (context, "context"),
                    (TypeRef::new(names.suggestions_builder.clone()), "builder"),
                ],
                extractions: true,
                syntax_exception: true,
            },
        }
    }

    fn accepts(
        &self,
        parameters: &[Parameter],
        throws: &[TypeRef],
        names: &TypeNames,
        types: &TypeHierarchy,
    ) -> bool {
        if parameters.len() < self.fixed.len() {
            return false;
        }
        let (fixed, rest) = parameters.split_at(self.fixed.len());

        let fixed_match = fixed
            .iter()
            .zip(&self.fixed)
            .all(|(parameter, (ty, _))| parameter.let_.is_none() && parameter.ty == *ty);
        let rest_match = if self.extractions {
            rest.iter().all(|parameter| parameter.let_.is_some())
        } else {
            rest.is_empty()
        };
        let throws_match = throws.iter().all(|exception| {
            let unchecked = names
                .unchecked_exceptions
                .iter()
                .any(|name| types.is_subtype(exception, &TypeRef::new(name.clone())));
            unchecked
                || (self.syntax_exception
                    && types.is_subtype(exception, &TypeRef::new(names.syntax_exception.clone())))
        });

        fixed_match && rest_match && throws_match
    }

    fn render(&self, member: &Member, names: &TypeNames) -> String {
        let mut parameters = self
            .fixed
            .iter()
            .map(|(ty, name)| format!("{} {}", ty, name))
            .collect_vec();
        if self.extractions {
            parameters.push("@Let ...".to_string());
        }

        let mut signature = format!(
            "{} {}({})",
            self.returns,
            member.name,
            parameters.join(", ")
        );
        if self.syntax_exception {
            signature.push_str(" throws ");
            signature.push_str(&names.syntax_exception);
        }
        signature
    }
}
