//! Links `@Let` parameters to the nodes their values are drawn from.

use super::binding::{Binding, Link};
use super::environment::Environment;
use super::lexer::{ARGUMENT_CLOSE, ARGUMENT_OPEN};
use super::node::{CommandTree, NodeIdx};
use super::token::Identity;
use crate::diagnostic::Logger;
use crate::member::{Let, Member, MemberId, Parameter};
use crate::Context;
use tracing::trace;

/// Resolves the `@Let` parameters of `id` at every node it is bound to.
///
/// Parameters are independent of each other. A parameter that cannot be resolved is reported
/// and left without a link.
pub fn resolve(
    env: &mut Environment<'_>,
    context: &Context<'_>,
    logger: &mut dyn Logger,
    id: MemberId,
) {
    let member = env.member(id);
    let scope = env.scope(id).to_vec();
    for idx in scope {
        if !matches!(env.binding(idx, id), Some(Binding::Method(_))) {
            continue;
        }

        for (i, parameter) in member.parameters().iter().enumerate() {
            let Some(let_) = &parameter.let_ else {
                continue;
            };
            let link = match link(&env.tree, idx, member, parameter, let_, context) {
                Ok(link) => link,
                Err(message) => {
                    logger.error(&member.location, message);
                    continue;
                }
            };
            trace!(
                "Resolved {} of {} to {:?}",
                parameter.name, member.location.element, link
            );
            if let Some(Binding::Method(method)) = env.tree[idx].bindings.get_mut(&id) {
                method.parameters.insert(i, link);
            }
        }
    }
}

fn link(
    tree: &CommandTree,
    idx: NodeIdx,
    member: &Member,
    parameter: &Parameter,
    let_: &Let,
    context: &Context<'_>,
) -> Result<Link, String> {
    let Some(value) = &let_.value else {
        if tree[idx].identity.is_literal() {
            return Err(format!(
                "\"{}\" of \"{}\" is bound to literal \"{}\", only arguments carry values",
                parameter.name,
                member.name,
                tree.path_string(idx, &context.config.separator)
            ));
        }
        return Ok(Link::Pointer(idx));
    };

    let name = referenced_name(value).ok_or_else(|| {
        format!(
            "Invalid @Let value \"{}\" on \"{}\", it should name a single argument",
            value, parameter.name
        )
    })?;
    let argument = Identity::argument(name);
    if let Some(step) = tree
        .ancestors(idx)
        .find(|&step| tree[step].identity == argument)
    {
        return Ok(Link::Reference(step));
    }

    // A literal of the same name only explains the miss, it never resolves.
    match tree
        .ancestors(idx)
        .find(|&step| tree[step].identity.name() == name)
    {
        Some(step) => Err(format!(
            "\"{}\" of \"{}\" refers to literal \"{}\", only arguments carry values",
            parameter.name,
            member.name,
            tree.path_string(step, &context.config.separator)
        )),
        None => Err(format!(
            "\"{}\" does not exist in \"{}\"",
            argument,
            tree.path_string(idx, &context.config.separator)
        )),
    }
}

/// `amount` and `<amount>` both name the argument `amount`.
fn referenced_name(value: &str) -> Option<&str> {
    let value = value.trim();
    let name = value
        .strip_prefix(ARGUMENT_OPEN)
        .and_then(|rest| rest.strip_suffix(ARGUMENT_CLOSE))
        .unwrap_or(value)
        .trim();
    let valid = !name.is_empty()
        && !name.contains(char::is_whitespace)
        && !name.contains(['|', ARGUMENT_OPEN, ARGUMENT_CLOSE]);
    valid.then_some(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn referenced_names() {
        assert_eq!(referenced_name("amount"), Some("amount"));
        assert_eq!(referenced_name(" <amount> "), Some("amount"));
        assert_eq!(referenced_name("<>"), None);
        assert_eq!(referenced_name("a b"), None);
        assert_eq!(referenced_name("<a|b>"), None);
        assert_eq!(referenced_name("<<a>>"), None);
    }
}
