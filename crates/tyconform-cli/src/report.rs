//! Diagnostic output in the human and JSON formats.

use crate::cli::Format;
use anyhow::Result;
use serde::Serialize;
use std::io::Write;
use tyconform_syntax::{Diagnostic, Emitter, SourceFile};

/// One diagnostic in the JSON report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    /// File the diagnostic points into
    pub file: String,
    /// 1-based line
    pub line: usize,
    /// 1-based column
    pub column: usize,
    /// Line the span ends on
    pub end_line: usize,
    /// Column just past the span
    pub end_column: usize,
    /// "error", "warning", ...
    pub severity: String,
    /// Stable error code
    pub code: Option<String>,
    /// Mismatch kind
    pub kind: Option<String>,
    /// Message
    pub message: String,
    /// Fix suggestions
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl Record {
    fn new(file: &SourceFile, diagnostic: &Diagnostic) -> Self {
        let span = diagnostic.span;
        Self {
            file: file.name(),
            line: span.start_line,
            column: span.start_col,
            end_line: span.end_line,
            end_column: span.end_col,
            severity: diagnostic.level.to_string(),
            code: diagnostic.code.clone(),
            kind: diagnostic.kind.clone(),
            message: diagnostic.message.clone(),
            suggestions: diagnostic.suggestions.clone(),
        }
    }
}

/// The JSON document written at the end of a run.
#[derive(Debug, Serialize)]
struct Summary<'a> {
    files: usize,
    errors: usize,
    passed: bool,
    diagnostics: &'a [Record],
}

/// Result of a check run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    /// Files read
    pub files: usize,
    /// Error diagnostics reported
    pub errors: usize,
}

impl Outcome {
    /// Whether every check passed.
    pub const fn passed(&self) -> bool {
        self.errors == 0
    }
}

/// Writes diagnostics as they are reported (human) or collects them for a
/// single document (JSON).
pub struct Reporter<W: Write> {
    out: W,
    format: Format,
    emitter: Emitter,
    records: Vec<Record>,
    files: usize,
    errors: usize,
}

impl<W: Write> Reporter<W> {
    /// Creates a reporter writing to `out`.
    pub fn new(out: W, format: Format, use_colors: bool) -> Self {
        Self {
            out,
            format,
            emitter: Emitter::new(use_colors && format == Format::Human),
            records: Vec::new(),
            files: 0,
            errors: 0,
        }
    }

    /// Counts a file as read.
    pub fn file_read(&mut self) {
        self.files += 1;
    }

    /// Reports one diagnostic against the file it points into.
    pub fn report(&mut self, file: &SourceFile, diagnostic: &Diagnostic) -> Result<()> {
        if diagnostic.is_error() {
            self.errors += 1;
        }
        match self.format {
            Format::Human => {
                self.emitter.emit(&mut self.out, diagnostic, file)?;
                writeln!(self.out)?;
            }
            Format::Json => self.records.push(Record::new(file, diagnostic)),
        }
        Ok(())
    }

    /// Writes the summary and returns the outcome.
    pub fn finish(mut self) -> Result<Outcome> {
        let outcome = Outcome {
            files: self.files,
            errors: self.errors,
        };
        match self.format {
            Format::Human => {
                let files = plural(outcome.files, "file");
                if outcome.passed() {
                    writeln!(self.out, "checked {files}: all checks passed")?;
                } else {
                    writeln!(self.out, "checked {files}: {}", plural(outcome.errors, "error"))?;
                }
            }
            Format::Json => {
                let summary = Summary {
                    files: outcome.files,
                    errors: outcome.errors,
                    passed: outcome.passed(),
                    diagnostics: &self.records,
                };
                serde_json::to_writer_pretty(&mut self.out, &summary)?;
                writeln!(self.out)?;
            }
        }
        self.out.flush()?;
        Ok(outcome)
    }
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("1 {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tyconform_syntax::{DiagnosticBuilder, DiagnosticLevel, SourceKind, Span};

    fn diagnostic() -> (SourceFile, Diagnostic) {
        let file = SourceFile::new("a.ts", "worker.sned();\n", SourceKind::Fixture);
        let diagnostic = DiagnosticBuilder::new(
            DiagnosticLevel::Error,
            "property 'sned' does not exist on type 'Worker'",
            Span::new(7, 11, 1, 8, 1, 12),
        )
        .code("TC2006")
        .kind("UnknownMember")
        .suggest("did you mean 'send'?")
        .build();
        (file, diagnostic)
    }

    #[test]
    fn test_human_output() {
        let (file, diag) = diagnostic();
        let mut out = Vec::new();
        let mut reporter = Reporter::new(&mut out, Format::Human, false);
        reporter.file_read();
        reporter.report(&file, &diag).unwrap();
        let outcome = reporter.finish().unwrap();

        assert!(!outcome.passed());
        let output = String::from_utf8(out).unwrap();
        assert!(output.starts_with("a.ts:1:8: error: property 'sned'"), "{output}");
        assert!(output.contains("help: did you mean 'send'?"));
        assert!(output.ends_with("checked 1 file: 1 error\n"), "{output}");
    }

    #[test]
    fn test_json_output() {
        let (file, diag) = diagnostic();
        let mut out = Vec::new();
        let mut reporter = Reporter::new(&mut out, Format::Json, true);
        reporter.file_read();
        reporter.file_read();
        reporter.report(&file, &diag).unwrap();
        reporter.finish().unwrap();

        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(json["files"], 2);
        assert_eq!(json["passed"], false);
        let record = &json["diagnostics"][0];
        assert_eq!(record["file"], "a.ts");
        assert_eq!(record["line"], 1);
        assert_eq!(record["column"], 8);
        assert_eq!(record["code"], "TC2006");
        assert_eq!(record["kind"], "UnknownMember");
        assert_eq!(record["suggestions"][0], "did you mean 'send'?");
    }

    #[test]
    fn test_passing_run() {
        let mut out = Vec::new();
        let mut reporter = Reporter::new(&mut out, Format::Human, false);
        reporter.file_read();
        reporter.file_read();
        assert!(reporter.finish().unwrap().passed());
        assert_eq!(String::from_utf8(out).unwrap(), "checked 2 files: all checks passed\n");
    }
}
