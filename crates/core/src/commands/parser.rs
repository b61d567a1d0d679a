//! Grows the command tree from the pattern lines members declare.

use crate::commands::environment::Environment;
use crate::commands::node::Declaration;
use crate::diagnostic::Logger;
use crate::member::MemberId;
use crate::Context;
use tracing::trace;

/// Adds every pattern line `member` declares to the tree.
///
/// Each line is walked left to right, creating the nodes it names that do not exist yet and
/// merging aliases into those that do. Blank lines contribute nothing, as do lines the lexer
/// rejected.
pub fn parse(env: &mut Environment<'_>, context: &Context<'_>, logger: &mut dyn Logger, member: MemberId) {
    let declaring = env.member(member);
    for line in &declaring.commands {
        let tokens = env.lexer.lex(logger, &declaring.location, line);
        let Some(first) = tokens.first() else {
            continue;
        };

        if context.config.strict_command_start && first.identity.is_argument() {
            logger.error(
                &declaring.location.at_token(line, first.span.clone()),
                format!(
                    "Invalid command start: \"{}\" in \"{}\", commands must start with a literal",
                    first.lexeme, line
                ),
            );
            continue;
        }

        let mut current = None;
        for token in tokens.iter() {
            let idx = env.tree.child_or_insert(current, &token.identity);
            let command = &mut env.tree[idx];
            command.aliases.extend(token.aliases.iter().cloned());
            command.declarations.push(Declaration {
                member,
                location: declaring.location.at_token(line, token.span.clone()),
            });
            current = Some(idx);
        }
        trace!("Parsed \"{}\" from {}", line, declaring.location.element);
    }
}
