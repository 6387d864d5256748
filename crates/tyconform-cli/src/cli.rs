//! Command-line interface definitions using clap.

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tyconform_log::Level;

/// Checks call sites and type expectations against TypeScript declaration
/// files.
#[derive(Parser, Debug)]
#[command(name = "tyconform")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging (-v for info, -vv for debug, -vvv for trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Log level, overriding -v.
    #[arg(long, value_name = "LEVEL", global = true)]
    pub log_level: Option<Level>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// The log level chosen on the command line.
    pub fn level(&self) -> Level {
        self.log_level.unwrap_or(Level::from_verbosity(self.verbose))
    }
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check fixtures against declaration catalogs.
    Check(CheckArgs),

    /// Print the syntax tree of one file.
    Parse(ParseArgs),
}

/// Arguments for the check command.
#[derive(Args, Debug, Default)]
pub struct CheckArgs {
    /// Project configuration file. Defaults to `tyconform.toml` in the
    /// current directory when no files are given.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Declaration file to add to the catalog (repeatable).
    #[arg(short, long = "decl", value_name = "FILE")]
    pub decls: Vec<PathBuf>,

    /// Files to check. Files ending in `.d.ts` are added to the catalog.
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = Format::Human)]
    pub format: Format,

    /// Disable colored output.
    #[arg(long)]
    pub no_color: bool,

    /// Do not report object literal keys the target type does not declare.
    #[arg(long)]
    pub no_excess_property_checks: bool,

    /// Do not report member access on possibly undefined values.
    #[arg(long)]
    pub no_strict_null_checks: bool,
}

/// Arguments for the parse command.
#[derive(Args, Debug)]
pub struct ParseArgs {
    /// File to parse; `.d.ts` files use the declaration grammar.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

/// How diagnostics are written.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Format {
    /// Compiler-style messages with source excerpts
    #[default]
    Human,
    /// A single JSON document on stdout
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_check_arguments() {
        let cli = Cli::parse_from([
            "tyconform",
            "-vv",
            "check",
            "--decl",
            "a.d.ts",
            "-d",
            "b.d.ts",
            "--format",
            "json",
            "cluster.ts",
        ]);
        assert_eq!(cli.level(), Level::Debug);

        let Command::Check(args) = cli.command else {
            panic!("expected check");
        };
        assert_eq!(args.decls, [PathBuf::from("a.d.ts"), PathBuf::from("b.d.ts")]);
        assert_eq!(args.files, [PathBuf::from("cluster.ts")]);
        assert_eq!(args.format, Format::Json);
        assert!(!args.no_color);
    }

    #[test]
    fn test_log_level_overrides_verbosity() {
        let cli = Cli::parse_from(["tyconform", "parse", "a.ts", "-v", "--log-level", "error"]);
        assert_eq!(cli.level(), Level::Error);
        assert!(Cli::try_parse_from(["tyconform", "--log-level", "loud", "parse", "a.ts"]).is_err());
    }
}
