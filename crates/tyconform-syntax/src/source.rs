//! Source files as seen by the lexer and the diagnostic emitter.

use std::path::{Path, PathBuf};

/// Which grammar a file is parsed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Declaration catalog (`*.d.ts`)
    Declarations,
    /// Call sites and expectations (`*.ts`)
    Fixture,
}

impl SourceKind {
    /// Guesses the kind from a file name: `.d.ts` is a catalog, anything
    /// else a fixture.
    ///
    /// ```
    /// use tyconform_syntax::source::SourceKind;
    ///
    /// assert_eq!(SourceKind::from_path("cluster.d.ts".as_ref()), SourceKind::Declarations);
    /// assert_eq!(SourceKind::from_path("cluster.ts".as_ref()), SourceKind::Fixture);
    /// ```
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();
        if name.ends_with(".d.ts") {
            Self::Declarations
        } else {
            Self::Fixture
        }
    }
}

/// A loaded source file.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Path used in diagnostics
    pub path: PathBuf,
    /// Full text
    pub text: String,
    /// Grammar to parse with
    pub kind: SourceKind,
}

impl SourceFile {
    /// Wraps already-loaded text.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>, kind: SourceKind) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
            kind,
        }
    }

    /// Reads a file from disk, inferring its kind from the name.
    ///
    /// # Errors
    ///
    /// Propagates the IO error from reading the file.
    pub fn read(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        Ok(Self::new(path, text, SourceKind::from_path(path)))
    }

    /// Display name used in diagnostics.
    #[must_use]
    pub fn name(&self) -> String {
        self.path.display().to_string()
    }

    /// Returns the text of a 1-indexed line, if it exists.
    #[must_use]
    pub fn line(&self, line: usize) -> Option<&str> {
        line.checked_sub(1).and_then(|idx| self.text.lines().nth(idx))
    }
}
