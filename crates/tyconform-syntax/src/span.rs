//! Source location tracking for tokens and AST nodes.
//!
//! Every token and AST node carries a `Span` so that diagnostics can point
//! at the exact call site, argument or annotation that failed.
//!
//! # Examples
//!
//! ```
//! use tyconform_syntax::span::Span;
//!
//! let callee = Span::new(0, 11, 1, 1, 1, 12);
//! let args = Span::new(11, 19, 1, 12, 1, 20);
//! let call = callee.to(args);
//!
//! assert_eq!(call.start, 0);
//! assert_eq!(call.end, 19);
//! ```

use std::fmt;

/// A region of source text.
///
/// Byte offsets are 0-indexed and `end` is exclusive. Lines and columns are
/// 1-indexed; columns count bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Byte offset of the span start
    pub start: usize,

    /// Byte offset of the span end (exclusive)
    pub end: usize,

    /// Line of the span start
    pub start_line: usize,

    /// Column of the span start
    pub start_col: usize,

    /// Line of the span end
    pub end_line: usize,

    /// Column of the span end
    pub end_col: usize,
}

impl Span {
    /// Creates a span from byte offsets and line/column positions.
    #[must_use]
    pub const fn new(
        start: usize,
        end: usize,
        start_line: usize,
        start_col: usize,
        end_line: usize,
        end_col: usize,
    ) -> Self {
        Self {
            start,
            end,
            start_line,
            start_col,
            end_line,
            end_col,
        }
    }

    /// Creates a zero-length span, used for EOF and missing tokens.
    ///
    /// ```
    /// use tyconform_syntax::span::Span;
    ///
    /// let eof = Span::point(40, 3, 7);
    /// assert!(eof.is_empty());
    /// assert_eq!(eof.start_line, 3);
    /// ```
    #[must_use]
    pub const fn point(offset: usize, line: usize, col: usize) -> Self {
        Self::new(offset, offset, line, col, line, col)
    }

    /// Returns a span running from the start of `self` to the end of `other`.
    #[must_use]
    pub const fn to(self, other: Span) -> Self {
        Self {
            start: self.start,
            end: other.end,
            start_line: self.start_line,
            start_col: self.start_col,
            end_line: other.end_line,
            end_col: other.end_col,
        }
    }

    /// Length of the span in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns `true` for zero-length spans.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Start position as a line/column pair.
    #[must_use]
    pub const fn start_pos(&self) -> LineCol {
        LineCol::new(self.start_line, self.start_col)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start_line, self.start_col)
    }
}

/// A line and column position in source code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineCol {
    /// Line number (1-indexed)
    pub line: usize,

    /// Column number in bytes (1-indexed)
    pub col: usize,
}

impl LineCol {
    /// Creates a new line/column position.
    #[must_use]
    pub const fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

impl fmt::Display for LineCol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

/// Types that know where they came from.
pub trait Spanned {
    /// Returns the source span of this item.
    fn span(&self) -> Span;
}

impl Spanned for Span {
    fn span(&self) -> Span {
        *self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_to() {
        let left = Span::new(0, 10, 1, 1, 1, 11);
        let right = Span::new(15, 25, 2, 1, 2, 11);
        let merged = left.to(right);

        assert_eq!(merged.start, 0);
        assert_eq!(merged.end, 25);
        assert_eq!(merged.start_line, 1);
        assert_eq!(merged.end_line, 2);
        assert_eq!(merged.end_col, 11);
    }

    #[test]
    fn test_span_len_and_empty() {
        let span = Span::new(10, 20, 1, 5, 1, 15);
        assert_eq!(span.len(), 10);
        assert!(!span.is_empty());
        assert!(Span::point(3, 1, 4).is_empty());
    }

    #[test]
    fn test_span_display() {
        let span = Span::new(0, 10, 5, 10, 5, 20);
        assert_eq!(span.to_string(), "5:10");
        assert_eq!(span.start_pos(), LineCol::new(5, 10));
    }
}
