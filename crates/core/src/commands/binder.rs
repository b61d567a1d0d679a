//! Attaches bound members to the nodes of a finished tree.

use super::binding::{classify, Binding};
use super::environment::Environment;
use super::node::{CommandTree, NodeIdx};
use super::token::{render, Token};
use crate::diagnostic::{Location, Logger};
use crate::member::{Bind, MemberId};
use crate::Context;
use smallvec::SmallVec;
use tracing::trace;

/// The nodes a binding pattern is written against.
pub struct Target<'a> {
    /// The pattern as written, for diagnostics.
    pub line: &'a str,
    pub tokens: &'a [Token],
    pub location: &'a Location,
}

/// A strategy for finding the nodes a binding belongs to.
pub trait Binder {
    /// Attaches a copy of `binding` to every node `target` selects and returns those nodes.
    fn bind(
        &self,
        tree: &mut CommandTree,
        target: &Target<'_>,
        binding: &Binding,
        logger: &mut dyn Logger,
    ) -> SmallVec<[NodeIdx; 1]>;
}

/// Follows the pattern from the top-level namespace, one step per token.
pub struct Direct;

impl Binder for Direct {
    fn bind(
        &self,
        tree: &mut CommandTree,
        target: &Target<'_>,
        binding: &Binding,
        logger: &mut dyn Logger,
    ) -> SmallVec<[NodeIdx; 1]> {
        let mut current = None;
        for (i, token) in target.tokens.iter().enumerate() {
            match tree.child(current, &token.identity) {
                Some(idx) => current = Some(idx),
                None => {
                    logger.error(
                        &target.location.at_token(target.line, token.span.clone()),
                        format!(
                            "\"{}\" does not exist",
                            render(&target.tokens[..=i])
                        ),
                    );
                    return SmallVec::new();
                }
            }
        }

        let Some(idx) = current else {
            return SmallVec::new();
        };
        attach(tree, idx, binding);
        smallvec::smallvec![idx]
    }
}

/// Matches the pattern as a suffix of every path in the tree.
pub struct Pattern;

impl Binder for Pattern {
    fn bind(
        &self,
        tree: &mut CommandTree,
        target: &Target<'_>,
        binding: &Binding,
        logger: &mut dyn Logger,
    ) -> SmallVec<[NodeIdx; 1]> {
        let view = &*tree;
        let matches: SmallVec<[NodeIdx; 1]> = view
            .walk()
            .into_iter()
            .filter(|&idx| ends_with(view, idx, target.tokens))
            .collect();

        if matches.is_empty() {
            logger.warn(
                target.location,
                format!("Pattern \"{}\" does not exist", target.line.trim()),
            );
        }
        for &idx in &matches {
            attach(tree, idx, binding);
        }
        matches
    }
}

/// Whether the path leading to `idx` ends with `tokens`.
fn ends_with(tree: &CommandTree, idx: NodeIdx, tokens: &[Token]) -> bool {
    let mut path = tree.ancestors(idx);
    tokens.iter().rev().all(|token| {
        path.next()
            .is_some_and(|step| tree[step].identity == token.identity)
    })
}

fn attach(tree: &mut CommandTree, idx: NodeIdx, binding: &Binding) {
    let mut binding = binding.clone();
    match &mut binding {
        Binding::Method(method) => method.identity = tree[idx].identity.clone(),
        Binding::Field(field) => field.identity = tree[idx].identity.clone(),
    }
    tree[idx].bindings.insert(binding.member(), binding);
}

/// Classifies `id` and binds it with the strategy its [`Bind`] asks for. Members without one
/// are left alone.
pub fn bind_member(
    env: &mut Environment<'_>,
    context: &Context<'_>,
    logger: &mut dyn Logger,
    id: MemberId,
) {
    let member = env.member(id);
    let Some(bind) = &member.bind else {
        return;
    };

    let classified = match classify(member, &context.config.types, context.types) {
        Ok(classified) => classified,
        Err(message) => {
            logger.error(&member.location, message);
            return;
        }
    };

    let line = bind.source();
    let tokens = env.lexer.lex(logger, &member.location, line);
    let Some(last) = tokens.last() else {
        if line.trim().is_empty() {
            logger.error(
                &member.location,
                format!("The binding pattern of \"{}\" should not be blank", member.name),
            );
        }
        return;
    };

    for token in tokens.iter().filter(|token| !token.aliases.is_empty()) {
        logger.warn(
            &member.location.at_token(line, token.span.clone()),
            format!(
                "Aliases of \"{}\" are ignored, bindings only match names",
                token.lexeme
            ),
        );
    }

    let binding = Binding::new(last.identity.clone(), id, classified);
    let target = Target {
        line,
        tokens: &tokens,
        location: &member.location,
    };
    let binder: &dyn Binder = match bind {
        Bind::Path(_) => &Direct,
        Bind::Pattern(_) => &Pattern,
    };
    let nodes = binder.bind(&mut env.tree, &target, &binding, logger);
    trace!("Bound {} to {} node(s)", member.location.element, nodes.len());
    if !nodes.is_empty() {
        env.scopes.entry(id).or_default().extend(nodes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::binding::{Classified, Role};
    use crate::commands::lexer::Lexer;
    use crate::commands::token::Identity;
    use crate::diagnostic::Diagnostics;

    fn tree(lines: &[&str]) -> CommandTree {
        let mut lexer = Lexer::uncached();
        let mut diagnostics = Diagnostics::new();
        let location = Location::new("test");
        let mut tree = CommandTree::new();
        for line in lines {
            let mut current = None;
            for token in lexer.lex(&mut diagnostics, &location, line).iter() {
                current = Some(tree.child_or_insert(current, &token.identity));
            }
        }
        tree
    }

    fn run(binder: &dyn Binder, tree: &mut CommandTree, line: &str) -> (Vec<String>, Diagnostics) {
        let mut diagnostics = Diagnostics::new();
        let location = Location::new("Member");
        let tokens = Lexer::uncached().lex(&mut diagnostics, &location, line);
        let binding = Binding::new(
            tokens.last().unwrap().identity.clone(),
            MemberId(0),
            Classified::Field {
                role: Role::ArgumentType,
                value: None,
            },
        );
        let target = Target {
            line,
            tokens: &tokens,
            location: &location,
        };
        let nodes = binder.bind(tree, &target, &binding, &mut diagnostics);
        let paths = nodes
            .into_iter()
            .map(|idx| tree.path_string(idx, " "))
            .collect();
        (paths, diagnostics)
    }

    #[test]
    fn direct_binds_exact_path() {
        let mut tree = tree(&["a <b> c", "d <b>"]);
        let (paths, diagnostics) = run(&Direct, &mut tree, "a <b>");
        assert!(diagnostics.is_empty());
        assert_eq!(paths, ["a <b>"]);

        let idx = tree.child(tree.child(None, &Identity::literal("a")), &Identity::argument("b"));
        let bound = &tree[idx.unwrap()].bindings[&MemberId(0)];
        assert_eq!(bound.identity(), &Identity::argument("b"));
    }

    #[test]
    fn direct_reports_missing_step() {
        let mut tree = tree(&["a <b> c"]);
        let (paths, diagnostics) = run(&Direct, &mut tree, "a <x> c");
        assert!(paths.is_empty());
        assert_eq!(diagnostics.errors().count(), 1);
        assert_eq!(diagnostics.entries()[0].message, "\"a <x>\" does not exist");
        assert!(tree.walk().into_iter().all(|idx| tree[idx].bindings.is_empty()));
    }

    #[test]
    fn pattern_binds_every_match() {
        let mut tree = tree(&["a <b>", "c d <b>", "e <b> f"]);
        let (paths, diagnostics) = run(&Pattern, &mut tree, "<b>");
        assert!(diagnostics.is_empty());
        assert_eq!(paths, ["a <b>", "c d <b>", "e <b>"]);

        let (paths, _) = run(&Pattern, &mut tree, "d <b>");
        assert_eq!(paths, ["c d <b>"]);
    }

    #[test]
    fn pattern_without_match_warns_once() {
        let mut tree = tree(&["a <b>", "c <b>"]);
        let (paths, diagnostics) = run(&Pattern, &mut tree, "<z>");
        assert!(paths.is_empty());
        assert_eq!(diagnostics.warnings().count(), 1);
        assert_eq!(diagnostics.errors().count(), 0);
        assert!(tree.walk().into_iter().all(|idx| tree[idx].bindings.is_empty()));
    }

    #[test]
    fn pattern_longer_than_path_does_not_match() {
        let mut tree = tree(&["<b>"]);
        let (paths, diagnostics) = run(&Pattern, &mut tree, "a <b>");
        assert!(paths.is_empty());
        assert_eq!(diagnostics.warnings().count(), 1);
    }
}
