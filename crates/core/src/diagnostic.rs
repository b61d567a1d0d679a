//! Diagnostics reported while compiling a batch of command declarations.
//!
//! The compiler never aborts on a bad declaration. Every phase reports through a [`Logger`]
//! and keeps going, so a single run surfaces every problem at once.

use serde::Serialize;
use std::fmt;
use std::ops::Range;
use tracing::debug;

/// Where a diagnostic points to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Location {
    /// Qualified name of the source element, e.g. `Give#execute`.
    pub element: String,
    /// Byte range of the element's declaration in the file it was read from, if known.
    pub span: Option<Range<usize>>,
    /// The pattern token the diagnostic is about, if any.
    pub token: Option<TokenSpan>,
}

/// A token inside a command pattern line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TokenSpan {
    pub line: String,
    pub range: Range<usize>,
}

impl Location {
    pub fn new(element: impl Into<String>) -> Self {
        Self {
            element: element.into(),
            span: None,
            token: None,
        }
    }

    pub fn with_span(mut self, span: Range<usize>) -> Self {
        self.span = Some(span);
        self
    }

    pub fn at_token(&self, line: &str, range: Range<usize>) -> Self {
        Self {
            element: self.element.clone(),
            span: self.span.clone(),
            token: Some(TokenSpan {
                line: line.into(),
                range,
            }),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.element)?;
        if let Some(token) = &self.token {
            let lexeme = token.line.get(token.range.clone()).unwrap_or_default();
            write!(f, " at \"{}\"", lexeme)?;
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub location: Location,
    pub message: String,
}

/// Sink for compiler diagnostics.
///
/// Implementations decide what to do with a report. The compiler itself never aggregates or
/// deduplicates, every call site picks severity and message.
pub trait Logger {
    fn error(&mut self, location: &Location, message: String);

    fn warn(&mut self, location: &Location, message: String);
}

/// A [`Logger`] that keeps every diagnostic in report order.
#[derive(Default, Debug)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries
            .iter()
            .filter(|diagnostic| diagnostic.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries
            .iter()
            .filter(|diagnostic| diagnostic.severity == Severity::Warning)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn push(&mut self, severity: Severity, location: &Location, message: String) {
        debug!(element = %location.element, ?severity, "{}", message);
        self.entries.push(Diagnostic {
            severity,
            location: location.clone(),
            message,
        });
    }
}

impl Logger for Diagnostics {
    fn error(&mut self, location: &Location, message: String) {
        self.push(Severity::Error, location, message);
    }

    fn warn(&mut self, location: &Location, message: String) {
        self.push(Severity::Warning, location, message);
    }
}

/// Counts what passes through to the host's logger so the compiler can gate the hand-off
/// without knowing anything about the sink it was given.
pub(crate) struct Tally<'a> {
    inner: &'a mut dyn Logger,
    pub(crate) errors: usize,
    pub(crate) warnings: usize,
}

impl<'a> Tally<'a> {
    pub(crate) fn new(inner: &'a mut dyn Logger) -> Self {
        Self {
            inner,
            errors: 0,
            warnings: 0,
        }
    }
}

impl Logger for Tally<'_> {
    fn error(&mut self, location: &Location, message: String) {
        self.errors += 1;
        self.inner.error(location, message);
    }

    fn warn(&mut self, location: &Location, message: String) {
        self.warnings += 1;
        self.inner.warn(location, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tally_forwards_and_counts() {
        let mut diagnostics = Diagnostics::new();
        let location = Location::new("Give#execute");
        {
            let mut tally = Tally::new(&mut diagnostics);
            tally.error(&location, "first".to_string());
            tally.warn(&location, "second".to_string());
            tally.warn(&location, "third".to_string());
            assert_eq!(tally.errors, 1);
            assert_eq!(tally.warnings, 2);
        }
        assert_eq!(diagnostics.len(), 3);
        assert_eq!(diagnostics.errors().count(), 1);
        assert_eq!(diagnostics.entries()[2].message, "third");
    }

    #[test]
    fn location_display_names_token() {
        let location = Location::new("Give").at_token("give <amount>", 5..13);
        assert_eq!(location.to_string(), "Give at \"<amount>\"");
    }
}
