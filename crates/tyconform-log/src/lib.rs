//! Logging setup for the `tyconform` workspace.
//!
//! Library crates log through the re-exported `tracing` macros; the binary
//! calls [`init`] once with the verbosity chosen on the command line. The
//! `TYCONFORM_LOG` environment variable, when set, takes precedence and
//! accepts any `EnvFilter` directive.
//!
//! # Example
//!
//! ```
//! use tyconform_log::{debug, info, Level};
//!
//! tyconform_log::init(Level::Info);
//!
//! let files = 3;
//! info!(files, "checking fixtures");
//! debug!("catalog contents: {:?}", ["Worker", "ClusterSettings"]);
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use tracing_subscriber::{EnvFilter, Registry, fmt as tfmt, layer::SubscriberExt, reload};
use tracing_subscriber::util::SubscriberInitExt;

pub use tracing::{debug, error, info, instrument, trace, warn};

/// Environment variable overriding the log filter.
pub const ENV_VAR: &str = "TYCONFORM_LOG";

/// Log levels, ordered from most severe (Error) to least severe (Trace).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    /// Critical failures
    Error = 0,
    /// Potentially harmful situations
    Warn = 1,
    /// Pipeline progress
    Info = 2,
    /// Per-file and per-declaration detail
    Debug = 3,
    /// Per-expression detail
    Trace = 4,
}

impl Level {
    /// Returns the string representation of this log level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Level::Error => "ERROR",
            Level::Warn => "WARN",
            Level::Info => "INFO",
            Level::Debug => "DEBUG",
            Level::Trace => "TRACE",
        }
    }

    /// Maps a `-v` count from the command line to a level.
    ///
    /// ```
    /// use tyconform_log::Level;
    ///
    /// assert_eq!(Level::from_verbosity(0), Level::Warn);
    /// assert_eq!(Level::from_verbosity(2), Level::Debug);
    /// assert_eq!(Level::from_verbosity(9), Level::Trace);
    /// ```
    pub const fn from_verbosity(count: u8) -> Self {
        match count {
            0 => Level::Warn,
            1 => Level::Info,
            2 => Level::Debug,
            _ => Level::Trace,
        }
    }

    fn filter(self) -> EnvFilter {
        EnvFilter::new(self.as_str().to_ascii_lowercase())
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised by this crate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LogError {
    /// The string does not name a level.
    #[error("invalid log level: {0}")]
    InvalidLevel(String),

    /// The subscriber rejected a new filter.
    #[error("failed to reload log filter: {0}")]
    Reload(String),
}

impl FromStr for Level {
    type Err = LogError;

    /// Parses a level name, case-insensitively.
    ///
    /// ```
    /// use tyconform_log::Level;
    ///
    /// assert_eq!("error".parse(), Ok(Level::Error));
    /// assert_eq!("INFO".parse(), Ok(Level::Info));
    /// assert!("loud".parse::<Level>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ERROR" => Ok(Level::Error),
            "WARN" => Ok(Level::Warn),
            "INFO" => Ok(Level::Info),
            "DEBUG" => Ok(Level::Debug),
            "TRACE" => Ok(Level::Trace),
            _ => Err(LogError::InvalidLevel(s.to_string())),
        }
    }
}

static HANDLE: OnceLock<reload::Handle<EnvFilter, Registry>> = OnceLock::new();

/// Installs the global subscriber. Later calls are no-ops.
///
/// Output goes to stderr so that machine-readable reports on stdout stay
/// clean.
pub fn init(level: Level) {
    HANDLE.get_or_init(|| {
        let filter = EnvFilter::try_from_env(ENV_VAR).unwrap_or_else(|_| level.filter());
        let (layer, handle) = reload::Layer::new(filter);

        // Another subscriber may already be installed (e.g. by a test
        // harness); keeping it is fine.
        let _ = tracing_subscriber::registry()
            .with(layer)
            .with(
                tfmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .compact(),
            )
            .try_init();

        handle
    });
}

/// Changes the minimum level of the global subscriber.
///
/// Installs the subscriber first if [`init`] has not run yet.
///
/// # Errors
///
/// Returns [`LogError::Reload`] if the subscriber has been dropped.
pub fn set_level(level: Level) -> Result<(), LogError> {
    init(level);
    match HANDLE.get() {
        Some(handle) => handle
            .reload(level.filter())
            .map_err(|err| LogError::Reload(err.to_string())),
        None => Ok(()),
    }
}

/// Changes the minimum level from a string such as `"debug"`.
///
/// # Errors
///
/// Returns [`LogError::InvalidLevel`] for unknown names.
pub fn set_level_from_str(s: &str) -> Result<(), LogError> {
    set_level(s.parse()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_ordering() {
        assert!(Level::Error < Level::Warn);
        assert!(Level::Warn < Level::Info);
        assert!(Level::Info < Level::Debug);
        assert!(Level::Debug < Level::Trace);
    }

    #[test]
    fn test_level_from_str() {
        assert_eq!("error".parse(), Ok(Level::Error));
        assert_eq!("WARN".parse(), Ok(Level::Warn));
        assert_eq!("Info".parse(), Ok(Level::Info));
        assert_eq!("DEBUG".parse(), Ok(Level::Debug));
        assert_eq!("trace".parse(), Ok(Level::Trace));
        assert_eq!(
            "invalid".parse::<Level>(),
            Err(LogError::InvalidLevel("invalid".to_string()))
        );
    }

    #[test]
    fn test_level_display() {
        assert_eq!(Level::Warn.to_string(), "WARN");
        assert_eq!(Level::Trace.as_str(), "TRACE");
    }

    #[test]
    fn test_verbosity_mapping() {
        assert_eq!(Level::from_verbosity(0), Level::Warn);
        assert_eq!(Level::from_verbosity(1), Level::Info);
        assert_eq!(Level::from_verbosity(2), Level::Debug);
        assert_eq!(Level::from_verbosity(3), Level::Trace);
    }

    #[test]
    fn test_init_is_idempotent() {
        init(Level::Info);
        init(Level::Debug);
        assert!(set_level(Level::Warn).is_ok());
        assert!(set_level_from_str("nope").is_err());
    }

    #[test]
    fn test_macros_from_threads() {
        init(Level::Info);

        let handles: Vec<_> = (0..4)
            .map(|i| {
                std::thread::spawn(move || {
                    info!("thread {} message", i);
                    debug!(thread = i, "filtered out at info");
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
    }
}
