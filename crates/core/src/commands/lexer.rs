//! Turns a single command pattern line such as `give|g <player> <amount>` into tokens.

use super::token::{Identity, Token};
use crate::diagnostic::{Location, Logger};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::iter::Peekable;
use std::rc::Rc;
use std::str::CharIndices;
use tracing::trace;

pub const ALIAS_SEPARATOR: char = '|';
pub const ARGUMENT_OPEN: char = '<';
pub const ARGUMENT_CLOSE: char = '>';

/// Lexes pattern lines, remembering the tokens of lines that lexed cleanly.
///
/// Tokens are immutable, so a cached line is shared rather than copied. Lines that produced a
/// diagnostic are never cached so that every declaration reports its own problems.
pub struct Lexer {
    cache: Option<FxHashMap<String, Rc<[Token]>>>,
}

impl Default for Lexer {
    fn default() -> Self {
        Self::new()
    }
}

impl Lexer {
    pub fn new() -> Self {
        Self {
            cache: Some(FxHashMap::default()),
        }
    }

    pub fn uncached() -> Self {
        Self { cache: None }
    }

    /// Returns an empty sequence for blank lines and for lines that could not be lexed, the
    /// latter after reporting why.
    pub fn lex(&mut self, logger: &mut dyn Logger, location: &Location, line: &str) -> Rc<[Token]> {
        if let Some(tokens) = self.cache.as_ref().and_then(|cache| cache.get(line)) {
            trace!("Lexer cache hit: {}", line);
            return tokens.clone();
        }

        let mut scanner = Scanner {
            line,
            src_iter: line.char_indices().peekable(),
            location,
            logger,
            tokens: Vec::new(),
            reported: false,
        };
        let tokens: Rc<[Token]> = scanner.run().unwrap_or_default().into();

        if let Some(cache) = &mut self.cache {
            if !scanner.reported {
                cache.insert(line.to_string(), tokens.clone());
            }
        }
        tokens
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Start,
    Literal(usize),
    Argument(usize),
    End,
}

struct Scanner<'a> {
    line: &'a str,
    src_iter: Peekable<CharIndices<'a>>,
    location: &'a Location,
    logger: &'a mut dyn Logger,
    tokens: Vec<Token>,
    reported: bool,
}

impl Scanner<'_> {
    /// `None` means the line was rejected.
    fn run(&mut self) -> Option<Vec<Token>> {
        let mut state = State::Start;
        loop {
            state = match state {
                State::Start => match self.src_iter.peek() {
                    None => State::End,
                    Some(&(_, c)) if c.is_whitespace() => {
                        self.src_iter.next();
                        State::Start
                    }
                    Some(&(start, ARGUMENT_OPEN)) => {
                        self.src_iter.next();
                        State::Argument(start)
                    }
                    Some(&(start, _)) => State::Literal(start),
                },
                State::Literal(start) => {
                    let end = self.read_segment();
                    self.literal(start, end)?;
                    State::Start
                }
                State::Argument(start) => {
                    let end = self.read_argument(start)?;
                    self.argument(start, end)?;
                    State::Start
                }
                State::End => return Some(std::mem::take(&mut self.tokens)),
            };
        }
    }

    /// Consumes up to the next whitespace and returns the end of the segment.
    fn read_segment(&mut self) -> usize {
        while let Some(&(i, c)) = self.src_iter.peek() {
            if c.is_whitespace() {
                return i;
            }
            self.src_iter.next();
        }
        self.line.len()
    }

    fn read_argument(&mut self, start: usize) -> Option<usize> {
        let end = loop {
            match self.src_iter.peek() {
                Some(&(i, ARGUMENT_CLOSE)) => {
                    self.src_iter.next();
                    break i + ARGUMENT_CLOSE.len_utf8();
                }
                Some(&(i, c)) if c.is_whitespace() => {
                    self.unterminated(start, i);
                    return None;
                }
                Some(_) => {
                    self.src_iter.next();
                }
                None => {
                    self.unterminated(start, self.line.len());
                    return None;
                }
            }
        };

        let segment_end = self.read_segment();
        if segment_end != end {
            let lexeme = &self.line[start..segment_end];
            self.error(
                start..segment_end,
                format!(
                    "Invalid argument: \"{}\", an argument should end with \"{}\"",
                    lexeme, ARGUMENT_CLOSE
                ),
            );
            return None;
        }
        Some(end)
    }

    fn unterminated(&mut self, start: usize, end: usize) {
        let lexeme = &self.line[start..end];
        self.error(
            start..end,
            format!(
                "Invalid argument: \"{}\", an argument should end with \"{}\"",
                lexeme, ARGUMENT_CLOSE
            ),
        );
    }

    fn literal(&mut self, start: usize, end: usize) -> Option<()> {
        let line = self.line;
        let lexeme = &line[start..end];

        if lexeme.contains([ARGUMENT_OPEN, ARGUMENT_CLOSE]) {
            self.error(
                start..end,
                format!(
                    "Invalid literal: \"{}\", a literal should not contain \"{}\" or \"{}\"",
                    lexeme, ARGUMENT_OPEN, ARGUMENT_CLOSE
                ),
            );
            return None;
        }

        let mut parts = lexeme.split(ALIAS_SEPARATOR);
        let name = parts.next().unwrap_or_default();
        if name.is_empty() || lexeme.split(ALIAS_SEPARATOR).any(str::is_empty) {
            self.error(
                start..end,
                format!(
                    "Invalid literal: \"{}\", names and aliases should not be blank",
                    lexeme
                ),
            );
            return None;
        }

        let mut aliases: SmallVec<[String; 2]> = SmallVec::new();
        for alias in parts {
            if alias == name {
                self.warn(
                    start..end,
                    format!(
                        "Alias \"{}\" in \"{}\" is the same as the literal's name",
                        alias, lexeme
                    ),
                );
            } else if aliases.iter().any(|existing| existing == alias) {
                self.warn(
                    start..end,
                    format!("Duplicate alias \"{}\" in \"{}\"", alias, lexeme),
                );
            } else {
                aliases.push(alias.to_string());
            }
        }

        self.tokens.push(Token {
            identity: Identity::literal(name),
            lexeme: lexeme.to_string(),
            span: start..end,
            aliases,
        });
        Some(())
    }

    fn argument(&mut self, start: usize, end: usize) -> Option<()> {
        let line = self.line;
        let lexeme = &line[start..end];
        let name = &line[start + ARGUMENT_OPEN.len_utf8()..end - ARGUMENT_CLOSE.len_utf8()];

        let problem = if name.is_empty() {
            Some("an argument should not be blank")
        } else if name.contains(ALIAS_SEPARATOR) {
            Some("an argument should not have aliases")
        } else if name.contains(ARGUMENT_OPEN) {
            Some("an argument should not be nested")
        } else {
            None
        };
        if let Some(problem) = problem {
            self.error(
                start..end,
                format!("Invalid argument: \"{}\", {}", lexeme, problem),
            );
            return None;
        }

        self.tokens.push(Token {
            identity: Identity::argument(name),
            lexeme: lexeme.to_string(),
            span: start..end,
            aliases: SmallVec::new(),
        });
        Some(())
    }

    fn error(&mut self, range: std::ops::Range<usize>, message: String) {
        self.reported = true;
        let location = self.location.at_token(self.line, range);
        self.logger.error(&location, message);
    }

    fn warn(&mut self, range: std::ops::Range<usize>, message: String) {
        self.reported = true;
        let location = self.location.at_token(self.line, range);
        self.logger.warn(&location, message);
    }
}
