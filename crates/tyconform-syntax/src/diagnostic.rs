//! Diagnostic reporting with source highlighting.
//!
//! Every failure the pipeline produces (lexer, parser or checker) ends up as
//! a [`Diagnostic`]: a level, a stable code, the mismatch kind, a message and
//! the span it points at. The [`Emitter`] renders diagnostics against their
//! [`SourceFile`] in a compiler-style layout.

use crate::error::SyntaxError;
use crate::source::SourceFile;
use crate::span::{Span, Spanned};
use std::fmt;
use std::io::{self, Write};

/// A diagnostic message (error, warning, note, or help).
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// Diagnostic level
    pub level: DiagnosticLevel,
    /// Stable error code (e.g. "TC2001")
    pub code: Option<String>,
    /// Mismatch kind (e.g. "TypeMismatch")
    pub kind: Option<String>,
    /// Primary message
    pub message: String,
    /// Source span
    pub span: Span,
    /// Optional suggestions
    pub suggestions: Vec<String>,
    /// Related notes
    pub notes: Vec<DiagnosticNote>,
}

impl Diagnostic {
    /// Whether this diagnostic fails a check run.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.level, DiagnosticLevel::Error)
    }
}

impl From<&SyntaxError> for Diagnostic {
    fn from(error: &SyntaxError) -> Self {
        let kind = match error {
            SyntaxError::Lexer(_) => "LexerError",
            SyntaxError::Parser(_) => "ParserError",
        };
        let message = match error {
            SyntaxError::Lexer(err) => err.to_string(),
            SyntaxError::Parser(err) => err.to_string(),
        };
        DiagnosticBuilder::new(DiagnosticLevel::Error, message, error.span())
            .code(error.code())
            .kind(kind)
            .build()
    }
}

/// Severity level of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticLevel {
    /// Error: the check fails
    Error,
    /// Warning: suspicious but not failing
    Warning,
    /// Note: additional information
    Note,
    /// Help: suggestion for fixing the issue
    Help,
}

impl fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl DiagnosticLevel {
    /// Lowercase name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Note => "note",
            Self::Help => "help",
        }
    }

    /// Returns the ANSI color code for this level.
    #[must_use]
    pub const fn color_code(&self) -> &'static str {
        match self {
            Self::Error => "\x1b[31m",
            Self::Warning => "\x1b[33m",
            Self::Note => "\x1b[36m",
            Self::Help => "\x1b[32m",
        }
    }

    /// Returns the reset ANSI code.
    #[must_use]
    pub const fn reset_code() -> &'static str {
        "\x1b[0m"
    }

    /// Formats this level with colors if enabled.
    #[must_use]
    pub fn format_colored(&self, use_colors: bool) -> String {
        if use_colors {
            format!("{}{}{}", self.color_code(), self, Self::reset_code())
        } else {
            self.to_string()
        }
    }
}

/// A note attached to a diagnostic.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosticNote {
    /// Note message
    pub message: String,
    /// Source span
    pub span: Span,
}

/// Builder for creating diagnostics.
pub struct DiagnosticBuilder {
    diagnostic: Diagnostic,
}

impl DiagnosticBuilder {
    /// Creates a new diagnostic builder.
    #[must_use]
    pub fn new(level: DiagnosticLevel, message: impl Into<String>, span: Span) -> Self {
        Self {
            diagnostic: Diagnostic {
                level,
                code: None,
                kind: None,
                message: message.into(),
                span,
                suggestions: Vec::new(),
                notes: Vec::new(),
            },
        }
    }

    /// Adds an error code.
    #[must_use]
    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.diagnostic.code = Some(code.into());
        self
    }

    /// Adds the mismatch kind.
    #[must_use]
    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.diagnostic.kind = Some(kind.into());
        self
    }

    /// Adds a suggestion.
    #[must_use]
    pub fn suggest(mut self, suggestion: impl Into<String>) -> Self {
        self.diagnostic.suggestions.push(suggestion.into());
        self
    }

    /// Adds a note.
    #[must_use]
    pub fn note(mut self, message: impl Into<String>, span: Span) -> Self {
        self.diagnostic.notes.push(DiagnosticNote {
            message: message.into(),
            span,
        });
        self
    }

    /// Builds the diagnostic.
    #[must_use]
    pub fn build(self) -> Diagnostic {
        self.diagnostic
    }
}

/// Renders diagnostics with source highlighting.
#[derive(Debug, Clone, Copy)]
pub struct Emitter {
    /// Use colors in output
    use_colors: bool,
}

impl Emitter {
    /// Creates a new diagnostic emitter.
    #[must_use]
    pub const fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// Writes one diagnostic.
    ///
    /// ```text
    /// fixtures/net.ts:3:14: error: type '1' is not assignable to parameter 'data' of type 'string'
    ///    [TC2001 TypeMismatch]
    ///    3 | socket.write(1);
    ///      |              ^
    /// ```
    ///
    /// # Errors
    ///
    /// Propagates write failures.
    pub fn emit(&self, out: &mut impl Write, diagnostic: &Diagnostic, file: &SourceFile) -> io::Result<()> {
        let span = diagnostic.span;

        writeln!(
            out,
            "{}:{}:{}: {}: {}",
            file.name(),
            span.start_line,
            span.start_col,
            diagnostic.level.format_colored(self.use_colors),
            diagnostic.message
        )?;

        match (&diagnostic.code, &diagnostic.kind) {
            (Some(code), Some(kind)) => writeln!(out, "   [{code} {kind}]")?,
            (Some(tag), None) | (None, Some(tag)) => writeln!(out, "   [{tag}]")?,
            (None, None) => {}
        }

        self.emit_source_highlight(out, diagnostic.level, span, &file.text)?;

        for suggestion in &diagnostic.suggestions {
            let prefix = DiagnosticLevel::Help.format_colored(self.use_colors);
            writeln!(out, "   {prefix}: {suggestion}")?;
        }

        for note in &diagnostic.notes {
            let prefix = DiagnosticLevel::Note.format_colored(self.use_colors);
            writeln!(
                out,
                "   {} at {}:{}: {}",
                prefix, note.span.start_line, note.span.start_col, note.message
            )?;
        }

        Ok(())
    }

    /// Underlines `span` in `source`, one row per covered line.
    fn emit_source_highlight(
        &self,
        out: &mut impl Write,
        level: DiagnosticLevel,
        span: Span,
        source: &str,
    ) -> io::Result<()> {
        let lines: Vec<&str> = source.lines().collect();
        if lines.is_empty() || span.start_line == 0 {
            return Ok(());
        }

        let start_line = (span.start_line - 1).min(lines.len() - 1);
        let end_line = span.end_line.saturating_sub(1).clamp(start_line, lines.len() - 1);

        for (line_idx, line) in lines.iter().enumerate().take(end_line + 1).skip(start_line) {
            writeln!(out, "{:4} | {line}", line_idx + 1)?;

            let from = if line_idx == start_line { span.start_col } else { 1 };
            let to = if line_idx == end_line {
                span.end_col
            } else {
                line.chars().count() + 1
            };
            let indent = from.saturating_sub(1);
            let width = to.saturating_sub(from).max(1);

            let carets = "^".repeat(width);
            if self.use_colors {
                writeln!(
                    out,
                    "     | {}{}{carets}{}",
                    " ".repeat(indent),
                    level.color_code(),
                    DiagnosticLevel::reset_code()
                )?;
            } else {
                writeln!(out, "     | {}{carets}", " ".repeat(indent))?;
            }
        }

        Ok(())
    }

    /// Emits a syntax error as a diagnostic.
    ///
    /// # Errors
    ///
    /// Propagates write failures.
    pub fn emit_syntax_error(&self, out: &mut impl Write, error: &SyntaxError, file: &SourceFile) -> io::Result<()> {
        self.emit(out, &Diagnostic::from(error), file)
    }
}
