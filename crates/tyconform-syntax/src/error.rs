//! Error types for the lexer and parser.
//!
//! Lexer errors occur during tokenization, parser errors during syntactic
//! analysis of declaration and fixture files. Both carry a span so the
//! emitter can highlight the offending text.

use crate::span::{Span, Spanned};
use thiserror::Error;

/// Errors that can occur during tokenization.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexerError {
    /// Unknown character encountered in source.
    ///
    /// ```text
    /// worker.send(#)
    ///             ^
    /// error: unknown character '#'
    /// ```
    #[error("unknown character '{ch}'")]
    UnknownChar {
        /// The unexpected character
        ch: char,
        /// Location in source
        span: Span,
    },

    /// String literal without a closing quote on the same line.
    #[error("unterminated string literal")]
    UnterminatedString {
        /// Location where the string started
        start: Span,
    },

    /// Numeric literal followed by identifier characters.
    #[error("invalid numeric literal '{literal}'")]
    InvalidNumeric {
        /// The invalid literal text
        literal: String,
        /// Location in source
        span: Span,
    },

    /// Block comment without `*/`.
    #[error("unterminated block comment")]
    UnterminatedComment {
        /// Location where the comment started
        start: Span,
    },

    /// `// $Something` that is not a known directive.
    #[error("unknown directive '${name}'")]
    UnknownDirective {
        /// Directive name without the `$`
        name: String,
        /// Location in source
        span: Span,
    },
}

impl Spanned for LexerError {
    fn span(&self) -> Span {
        match self {
            Self::UnknownChar { span, .. }
            | Self::InvalidNumeric { span, .. }
            | Self::UnknownDirective { span, .. } => *span,
            Self::UnterminatedString { start } | Self::UnterminatedComment { start } => *start,
        }
    }
}

/// Errors that can occur during parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParserError {
    /// Unexpected token encountered.
    ///
    /// ```text
    /// interface Worker { send(: string): void; }
    ///                         ^
    /// error: expected parameter name, found ':'
    /// ```
    #[error("expected {}, found '{found}'", format_expected(.expected))]
    UnexpectedToken {
        /// Descriptions of what would have been accepted
        expected: Vec<String>,
        /// The token actually found
        found: String,
        /// Location in source
        span: Span,
    },

    /// Expected a type but found another token.
    #[error("expected type, found '{found}'")]
    ExpectedType {
        /// The token actually found
        found: String,
        /// Location in source
        span: Span,
    },

    /// Expected an expression but found another token.
    #[error("expected expression, found '{found}'")]
    ExpectedExpression {
        /// The token actually found
        found: String,
        /// Location in source
        span: Span,
    },

    /// Expected a declaration in a `.d.ts` file.
    #[error("expected declaration, found '{found}'")]
    ExpectedDeclaration {
        /// The token actually found
        found: String,
        /// Location in source
        span: Span,
    },

    /// Opening delimiter never closed.
    #[error("missing closing delimiter '{delimiter}'")]
    MissingDelimiter {
        /// The delimiter that was expected
        delimiter: String,
        /// Location of the opening delimiter
        span: Span,
    },

    /// A `$ExpectType` / `$ExpectError` directive with no statement after it.
    #[error("directive is not followed by a statement")]
    DanglingDirective {
        /// Location of the directive
        span: Span,
    },

    /// Construct that parses but is not allowed where it appears.
    #[error("{message}")]
    Invalid {
        /// Description of the problem
        message: String,
        /// Location in source
        span: Span,
    },
}

fn format_expected(expected: &[String]) -> String {
    match expected {
        [single] => single.clone(),
        many => format!("one of: {}", many.join(", ")),
    }
}

impl Spanned for ParserError {
    fn span(&self) -> Span {
        match self {
            Self::UnexpectedToken { span, .. }
            | Self::ExpectedType { span, .. }
            | Self::ExpectedExpression { span, .. }
            | Self::ExpectedDeclaration { span, .. }
            | Self::MissingDelimiter { span, .. }
            | Self::DanglingDirective { span }
            | Self::Invalid { span, .. } => *span,
        }
    }
}

/// Lexer or parser error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    /// Lexer error
    #[error("lexer error: {0}")]
    Lexer(#[from] LexerError),

    /// Parser error
    #[error("parser error: {0}")]
    Parser(#[from] ParserError),
}

impl SyntaxError {
    /// Stable diagnostic code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Lexer(_) => "TC0001",
            Self::Parser(_) => "TC0002",
        }
    }
}

impl Spanned for SyntaxError {
    fn span(&self) -> Span {
        match self {
            Self::Lexer(err) => err.span(),
            Self::Parser(err) => err.span(),
        }
    }
}

/// Result type for lexer operations.
pub type LexerResult<T> = Result<T, LexerError>;

/// Result type for parser operations.
pub type ParserResult<T> = Result<T, ParserError>;

/// Result type for whole-file parsing; every error found is returned.
pub type SyntaxResult<T> = Result<T, Vec<SyntaxError>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lexer_error_display() {
        let err = LexerError::UnknownChar {
            ch: '#',
            span: Span::new(10, 11, 1, 11, 1, 12),
        };
        assert_eq!(err.to_string(), "unknown character '#'");

        let err = LexerError::InvalidNumeric {
            literal: "1abc".to_string(),
            span: Span::new(0, 4, 1, 1, 1, 5),
        };
        assert_eq!(err.to_string(), "invalid numeric literal '1abc'");
    }

    #[test]
    fn test_parser_error_display() {
        let err = ParserError::UnexpectedToken {
            expected: vec!["identifier".to_string()],
            found: ":".to_string(),
            span: Span::point(0, 1, 1),
        };
        assert_eq!(err.to_string(), "expected identifier, found ':'");

        let err = ParserError::UnexpectedToken {
            expected: vec!["';'".to_string(), "'}'".to_string()],
            found: "EOF".to_string(),
            span: Span::point(0, 1, 1),
        };
        assert_eq!(err.to_string(), "expected one of: ';', '}', found 'EOF'");
    }

    #[test]
    fn test_syntax_error_from_and_code() {
        let err: SyntaxError = LexerError::UnterminatedString {
            start: Span::point(4, 2, 1),
        }
        .into();
        assert_eq!(err.code(), "TC0001");
        assert_eq!(err.span().start_line, 2);
        assert_eq!(err.to_string(), "lexer error: unterminated string literal");

        let err: SyntaxError = ParserError::DanglingDirective {
            span: Span::point(0, 1, 1),
        }
        .into();
        assert_eq!(err.code(), "TC0002");
    }
}
