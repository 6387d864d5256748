//! Project configuration from `tyconform.toml`, merged with command-line
//! flags.
//!
//! ```toml
//! declarations = ["fixtures/cluster.d.ts"]
//! fixtures = ["fixtures/cluster.ts"]
//!
//! [checker]
//! excess_property_checks = true
//! strict_null_checks = true
//! ```

use crate::cli::CheckArgs;
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tyconform_check::CheckOptions;
use tyconform_log::debug;
use tyconform_syntax::SourceKind;

/// Default configuration file name.
pub const FILE_NAME: &str = "tyconform.toml";

/// Inputs and switches for one check run.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Declaration catalog files
    pub declarations: Vec<PathBuf>,
    /// Fixture files
    pub fixtures: Vec<PathBuf>,
    /// Checker options
    pub checker: CheckOptions,
}

impl Config {
    /// Reads a configuration file. Relative paths in it are resolved against
    /// the file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let mut config: Config =
            toml::from_str(&text).with_context(|| format!("invalid config file {}", path.display()))?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        config.declarations = config.declarations.into_iter().map(|p| base.join(p)).collect();
        config.fixtures = config.fixtures.into_iter().map(|p| base.join(p)).collect();

        debug!(
            path = %path.display(),
            declarations = config.declarations.len(),
            fixtures = config.fixtures.len(),
            "loaded config"
        );
        Ok(config)
    }

    /// Builds the configuration for `tyconform check`.
    ///
    /// An explicit `--config` is always read. Without one, `tyconform.toml`
    /// in `cwd` is used when no files were given. Files and flags on the
    /// command line then replace what the file says.
    pub fn from_args(args: &CheckArgs, cwd: &Path) -> Result<Self> {
        let mut config = match &args.config {
            Some(path) => Self::load(path)?,
            None if args.decls.is_empty() && args.files.is_empty() => {
                let path = cwd.join(FILE_NAME);
                if !path.is_file() {
                    bail!("no input files given and no {FILE_NAME} found in {}", cwd.display());
                }
                Self::load(&path)?
            }
            None => Self::default(),
        };

        let (decls, fixtures): (Vec<&PathBuf>, Vec<&PathBuf>) = args
            .files
            .iter()
            .partition(|path| SourceKind::from_path(path) == SourceKind::Declarations);

        if !args.decls.is_empty() || !decls.is_empty() {
            config.declarations = args.decls.iter().chain(decls).cloned().collect();
        }
        if !fixtures.is_empty() {
            config.fixtures = fixtures.into_iter().cloned().collect();
        }
        if args.no_excess_property_checks {
            config.checker.excess_property_checks = false;
        }
        if args.no_strict_null_checks {
            config.checker.strict_null_checks = false;
        }

        if config.fixtures.is_empty() {
            bail!("no fixture files to check");
        }
        Ok(config)
    }
}
