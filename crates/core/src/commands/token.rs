use serde::Serialize;
use smallvec::SmallVec;
use std::fmt;
use std::ops::Range;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Literal,
    Argument,
}

/// The normalized name of a literal or argument, used as the edge key of the command tree.
///
/// Equality includes the kind, `give` and `<give>` are different identities.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Identity {
    kind: Kind,
    name: String,
}

impl Identity {
    pub fn literal(name: impl AsRef<str>) -> Self {
        Self {
            kind: Kind::Literal,
            name: name.as_ref().trim().to_string(),
        }
    }

    pub fn argument(name: impl AsRef<str>) -> Self {
        Self {
            kind: Kind::Argument,
            name: name.as_ref().trim().to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn is_argument(&self) -> bool {
        self.kind == Kind::Argument
    }

    pub fn is_literal(&self) -> bool {
        self.kind == Kind::Literal
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            Kind::Literal => write!(f, "{}", self.name),
            Kind::Argument => write!(f, "<{}>", self.name),
        }
    }
}

/// One segment of a command pattern line.
#[derive(Clone, Debug, Eq)]
pub struct Token {
    pub identity: Identity,
    /// The segment exactly as written, e.g. `give|g`.
    pub lexeme: String,
    /// Byte range of the lexeme within its line.
    pub span: Range<usize>,
    /// Only literals carry aliases.
    pub aliases: SmallVec<[String; 2]>,
}

impl Token {
    pub fn kind(&self) -> Kind {
        self.identity.kind()
    }
}

// Spans are positional metadata, two tokens spelled the same way are the same token.
impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.identity == other.identity
            && self.lexeme == other.lexeme
            && self.aliases == other.aliases
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identity)?;
        for alias in &self.aliases {
            write!(f, "|{}", alias)?;
        }
        Ok(())
    }
}

/// Renders tokens back into pattern syntax.
pub fn render(tokens: &[Token]) -> String {
    itertools::join(tokens, " ")
}
