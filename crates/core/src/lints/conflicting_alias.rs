//! # [`ConflictingAlias`]
//!
//! Siblings share one namespace of names. No alias of a literal may equal the name or any alias
//! of another literal under the same parent, otherwise typing it would be ambiguous.

use super::{declared_at, Lint};
use crate::commands::environment::Environment;
use crate::commands::node::{Command, NodeIdx};
use crate::diagnostic::Logger;
use crate::Context;
use itertools::Itertools;
use std::iter;

pub struct ConflictingAlias;

impl Lint for ConflictingAlias {
    fn lint(&self, env: &Environment<'_>, _: &Context<'_>, logger: &mut dyn Logger) {
        let tree = &env.tree;
        let namespaces = iter::once(tree.roots())
            .chain(tree.walk().into_iter().map(|idx| &tree[idx].children));

        for namespace in namespaces {
            let literals = namespace
                .values()
                .copied()
                .filter(|&idx| tree[idx].identity.is_literal())
                .collect::<Vec<NodeIdx>>();

            for (first, second) in literals.into_iter().tuple_combinations() {
                if !conflicts(&tree[first], &tree[second]) {
                    continue;
                }
                logger.error(
                    &declared_at(&tree[second]),
                    format!(
                        "\"{}\" conflicts with \"{}\"",
                        tree.pattern(second),
                        tree.pattern(first)
                    ),
                );
            }
        }
    }
}

fn conflicts(first: &Command, second: &Command) -> bool {
    clashes(first, second) || clashes(second, first)
}

/// Whether an alias of `node` is taken by `sibling`.
fn clashes(node: &Command, sibling: &Command) -> bool {
    node.aliases
        .iter()
        .any(|alias| sibling.names().any(|name| name == alias.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lints::test_utils::lint_with;
    use crate::member::Member;

    #[test]
    fn aliases_on_one_node_pass() {
        let members = [Member::new_type("A").command("a b").command("a b|b1")];
        assert!(lint_with(&ConflictingAlias, &members).is_empty());
    }

    #[test]
    fn shared_alias_is_reported_once() {
        let members = [Member::new_type("A").command("a b|1").command("a c|1")];
        let diagnostics = lint_with(&ConflictingAlias, &members);
        assert_eq!(diagnostics.len(), 1);

        let message = &diagnostics.entries()[0].message;
        assert!(message.contains("\"a b|1\""));
        assert!(message.contains("\"a c|1\""));
    }

    #[test]
    fn alias_equal_to_sibling_name() {
        let members = [Member::new_type("A").command("tp|teleport").command("teleport")];
        let diagnostics = lint_with(&ConflictingAlias, &members);
        assert_eq!(diagnostics.errors().count(), 1);
    }

    #[test]
    fn arguments_do_not_take_part() {
        let members = [Member::new_type("A").command("a <b>").command("a c|b")];
        assert!(lint_with(&ConflictingAlias, &members).is_empty());
    }
}
