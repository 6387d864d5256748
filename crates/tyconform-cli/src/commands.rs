//! The `check` and `parse` commands.

use crate::cli::{CheckArgs, ParseArgs};
use crate::config::Config;
use crate::report::{Outcome, Reporter};
use anyhow::{Context, Result};
use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};
use tyconform_check::{Catalog, Checker};
use tyconform_log::{debug, info};
use tyconform_syntax::{parse_declarations, parse_fixture, Diagnostic, Emitter, SourceFile, SourceKind};

/// Reads every input, builds the catalog and checks each fixture,
/// reporting to stdout.
pub fn check(args: &CheckArgs) -> Result<Outcome> {
    let cwd = std::env::current_dir().context("failed to determine the current directory")?;
    let config = Config::from_args(args, &cwd)?;
    let use_colors = !args.no_color && io::stdout().is_terminal();
    let reporter = Reporter::new(io::stdout().lock(), args.format, use_colors);
    run(&config, reporter)
}

/// The check pipeline over an explicit configuration.
pub fn run<W: Write>(config: &Config, mut reporter: Reporter<W>) -> Result<Outcome> {
    let decl_files = read_all(&config.declarations, SourceKind::Declarations)?;
    let fixture_files = read_all(&config.fixtures, SourceKind::Fixture)?;
    info!(
        declarations = decl_files.len(),
        fixtures = fixture_files.len(),
        "checking"
    );

    let mut parsed = Vec::with_capacity(decl_files.len());
    for file in &decl_files {
        reporter.file_read();
        match parse_declarations(&file.text) {
            Ok(decls) => parsed.push((file, decls)),
            Err(errors) => {
                for error in &errors {
                    reporter.report(file, &Diagnostic::from(error))?;
                }
            }
        }
    }

    let mut builder = Catalog::builder();
    for (_, decls) in &parsed {
        builder.add(decls);
    }
    let (catalog, catalog_errors) = builder.build();
    for diag in &catalog_errors {
        let file = parsed[diag.file].0;
        reporter.report(file, &Diagnostic::from(&diag.error))?;
    }
    debug!(entries = catalog.len(), "catalog ready");

    for file in &fixture_files {
        reporter.file_read();
        let fixture = match parse_fixture(&file.text) {
            Ok(fixture) => fixture,
            Err(errors) => {
                for error in &errors {
                    reporter.report(file, &Diagnostic::from(error))?;
                }
                continue;
            }
        };

        let errors = Checker::new(&catalog, config.checker).check_fixture(&fixture);
        debug!(file = %file.name(), errors = errors.len(), "fixture checked");
        for error in &errors {
            reporter.report(file, &Diagnostic::from(error))?;
        }
    }

    reporter.finish()
}

/// Parses one file and prints its syntax tree.
pub fn parse(args: &ParseArgs) -> Result<Outcome> {
    let file = read(&args.file, SourceKind::from_path(&args.file))?;
    let mut stdout = io::stdout().lock();

    let result = match file.kind {
        SourceKind::Declarations => parse_declarations(&file.text).map(|decls| writeln!(stdout, "{decls:#?}")),
        SourceKind::Fixture => parse_fixture(&file.text).map(|fixture| writeln!(stdout, "{fixture:#?}")),
    };

    match result {
        Ok(written) => {
            written?;
            Ok(Outcome { files: 1, errors: 0 })
        }
        Err(errors) => {
            let emitter = Emitter::new(io::stderr().is_terminal());
            let mut stderr = io::stderr().lock();
            for error in &errors {
                emitter.emit_syntax_error(&mut stderr, error, &file)?;
            }
            Ok(Outcome {
                files: 1,
                errors: errors.len(),
            })
        }
    }
}

fn read_all(paths: &[PathBuf], kind: SourceKind) -> Result<Vec<SourceFile>> {
    paths.iter().map(|path| read(path, kind)).collect()
}

fn read(path: &Path, kind: SourceKind) -> Result<SourceFile> {
    let text = std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    Ok(SourceFile::new(path, text, kind))
}
