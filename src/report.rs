use cmdtree_core::diagnostic::{Diagnostic, Severity};
use line_index::{LineIndex, TextSize};
use owo_colors::OwoColorize;
use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;

/// The manifest diagnostics point into.
pub struct Source<'a> {
    path: &'a Path,
    index: LineIndex,
}

impl<'a> Source<'a> {
    pub fn new(path: &'a Path, text: &str) -> Self {
        Self {
            path,
            index: LineIndex::new(text),
        }
    }

    /// One-based line and column of a byte offset.
    fn line_col(&self, offset: usize) -> Option<(u32, u32)> {
        let offset = TextSize::from(u32::try_from(offset).ok()?);
        let line_col = self.index.line_col(offset);
        Some((line_col.line + 1, line_col.col + 1))
    }
}

pub fn human(out: &mut impl Write, source: &Source<'_>, diagnostics: &[Diagnostic]) -> io::Result<()> {
    for diagnostic in diagnostics {
        match diagnostic.severity {
            Severity::Error => write!(out, "{}", "error".red().bold())?,
            Severity::Warning => write!(out, "{}", "warning".yellow().bold())?,
        }
        writeln!(out, "{} {}", ":".bold(), diagnostic.message.bold())?;

        let location = &diagnostic.location;
        let position = location
            .span
            .as_ref()
            .and_then(|span| source.line_col(span.start));
        match position {
            Some((line, col)) => writeln!(
                out,
                "  {} {}:{}:{} {}",
                "-->".blue().bold(),
                source.path.display(),
                line,
                col,
                location.element
            )?,
            None => writeln!(
                out,
                "  {} {} {}",
                "-->".blue().bold(),
                source.path.display(),
                location.element
            )?,
        }

        if let Some(token) = &location.token {
            let padding = token.line.get(..token.range.start).unwrap_or_default().chars().count();
            let width = token
                .line
                .get(token.range.clone())
                .unwrap_or_default()
                .chars()
                .count()
                .max(1);
            let marker = "^".repeat(width);
            let bar = "|".blue();
            let gutter = bar.bold();
            writeln!(out, "   {}", gutter)?;
            writeln!(out, "   {} {}", gutter, token.line)?;
            match diagnostic.severity {
                Severity::Error => {
                    writeln!(out, "   {} {:padding$}{}", gutter, "", marker.red().bold())?
                }
                Severity::Warning => {
                    writeln!(out, "   {} {:padding$}{}", gutter, "", marker.yellow().bold())?
                }
            }
        }
        writeln!(out)?;
    }
    Ok(())
}

#[derive(Serialize)]
struct JsonReport<'a> {
    file: String,
    errors: usize,
    warnings: usize,
    diagnostics: &'a [Diagnostic],
}

pub fn json(out: &mut impl Write, source: &Source<'_>, diagnostics: &[Diagnostic]) -> io::Result<()> {
    let count = |severity| {
        diagnostics
            .iter()
            .filter(|diagnostic| diagnostic.severity == severity)
            .count()
    };
    let report = JsonReport {
        file: source.path.display().to_string(),
        errors: count(Severity::Error),
        warnings: count(Severity::Warning),
        diagnostics,
    };
    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)
}
