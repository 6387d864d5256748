//! `tyconform` command-line tool.
//!
//! - `tyconform check` - check fixtures against declaration catalogs
//! - `tyconform parse` - print the syntax tree of a file
//!
//! Exit status is 0 when every check passes, 1 when diagnostics were
//! reported and 2 when the run could not complete (unreadable input,
//! invalid configuration or arguments).

mod cli;
mod commands;
mod config;
mod report;

use clap::Parser;
use cli::{Cli, Command};
use std::process::ExitCode;
use tyconform_log::debug;

fn main() -> ExitCode {
    let cli = Cli::parse();
    tyconform_log::init(cli.level());
    debug!(?cli, "starting");

    let result = match &cli.command {
        Command::Check(args) => commands::check(args),
        Command::Parse(args) => commands::parse(args),
    };

    match result {
        Ok(outcome) if outcome.passed() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::from(1),
        Err(err) => {
            eprintln!("error: {err}");
            for cause in err.chain().skip(1) {
                eprintln!("  caused by: {cause}");
            }
            ExitCode::from(2)
        }
    }
}
