//! Tokenization for declaration and fixture files.
//!
//! The lexer makes a single pass over the source, producing tokens with
//! spans. Ordinary comments are discarded, but the two directive comments
//! used by fixtures are turned into tokens:
//!
//! - `// $ExpectType T` becomes [`TokenKind::ExpectType`], the tokens of
//!   `T`, and a closing [`TokenKind::DirectiveEnd`] at the end of the line.
//! - `// $ExpectError` becomes [`TokenKind::ExpectError`].
//!
//! # Examples
//!
//! ```
//! use tyconform_syntax::lexer::Lexer;
//! use tyconform_syntax::token::TokenKind;
//!
//! let tokens = Lexer::new("worker.send(\"test\");").lex().unwrap();
//! assert_eq!(tokens.len(), 8); // worker . send ( "test" ) ; EOF
//! assert_eq!(tokens[4].kind, TokenKind::Str("test".to_string()));
//! ```

use crate::error::{LexerError, LexerResult};
use crate::span::Span;
use crate::token::{Token, TokenKind};
use std::iter::Peekable;
use std::str::Chars;
use tyconform_log::trace;

/// Lexical analyzer.
///
/// Errors do not stop the lexer: it records them, skips to a safe restart
/// point and keeps going, so one run reports every bad character.
pub struct Lexer<'input> {
    /// The source being tokenized
    input: &'input str,

    /// Remaining characters
    chars: Peekable<Chars<'input>>,

    /// Current byte offset
    position: usize,

    /// Current line (1-indexed)
    line: usize,

    /// Current column in characters (1-indexed)
    column: usize,

    /// Inside a `$ExpectType` comment; the next newline closes it
    in_directive: bool,

    /// Accumulated tokens
    tokens: Vec<Token>,

    /// Accumulated errors
    errors: Vec<LexerError>,
}

impl<'input> Lexer<'input> {
    /// Creates a lexer over `input`.
    #[must_use]
    pub fn new(input: &'input str) -> Self {
        Self {
            input,
            chars: input.chars().peekable(),
            position: 0,
            line: 1,
            column: 1,
            in_directive: false,
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Tokenizes the whole input.
    ///
    /// # Errors
    ///
    /// Returns every [`LexerError`] encountered if there was at least one.
    pub fn lex(self) -> Result<Vec<Token>, Vec<LexerError>> {
        let (tokens, errors) = self.lex_recovering();
        if errors.is_empty() {
            Ok(tokens)
        } else {
            Err(errors)
        }
    }

    /// Tokenizes the whole input, returning tokens and errors side by side.
    ///
    /// The token stream always ends with [`TokenKind::EOF`].
    #[must_use]
    pub fn lex_recovering(mut self) -> (Vec<Token>, Vec<LexerError>) {
        loop {
            self.skip_trivia();

            if self.peek().is_none() {
                break;
            }

            match self.next_token() {
                Ok(token) => self.tokens.push(token),
                Err(err) => {
                    self.errors.push(err);
                    self.recover();
                }
            }
        }

        let eof_span = Span::point(self.position, self.line, self.column);
        if self.in_directive {
            self.tokens.push(Token::new(TokenKind::DirectiveEnd, eof_span));
        }
        self.tokens.push(Token::new(TokenKind::EOF, eof_span));

        trace!(
            tokens = self.tokens.len(),
            errors = self.errors.len(),
            "lexed input"
        );
        (self.tokens, self.errors)
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn peek2(&self) -> Option<char> {
        let mut iter = self.chars.clone();
        iter.next();
        iter.next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        self.position += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn here(&self) -> Span {
        Span::point(self.position, self.line, self.column)
    }

    fn span_from(&self, start: Span) -> Span {
        Span::new(
            start.start,
            self.position,
            start.start_line,
            start.start_col,
            self.line,
            self.column,
        )
    }

    /// Skips whitespace and comments, emitting directive tokens on the way.
    fn skip_trivia(&mut self) {
        while let Some(ch) = self.peek() {
            match ch {
                '\n' if self.in_directive => {
                    let span = self.here();
                    self.tokens.push(Token::new(TokenKind::DirectiveEnd, span));
                    self.in_directive = false;
                    self.bump();
                }
                c if c.is_whitespace() => {
                    self.bump();
                }
                '/' if self.peek2() == Some('/') => self.read_line_comment(),
                '/' if self.peek2() == Some('*') => self.read_block_comment(),
                _ => break,
            }
        }
    }

    fn read_line_comment(&mut self) {
        let start = self.here();
        self.bump();
        self.bump();

        while matches!(self.peek(), Some(' ' | '\t')) {
            self.bump();
        }

        if self.peek() == Some('$') && !self.in_directive {
            self.bump();
            let name_start = self.position;
            while self.peek().is_some_and(|c| c.is_ascii_alphanumeric()) {
                self.bump();
            }
            let name = &self.input[name_start..self.position];
            let span = self.span_from(start);

            match name {
                "ExpectType" => {
                    self.tokens.push(Token::new(TokenKind::ExpectType, span));
                    self.in_directive = true;
                    return;
                }
                "ExpectError" => {
                    self.tokens.push(Token::new(TokenKind::ExpectError, span));
                }
                _ => self.errors.push(LexerError::UnknownDirective {
                    name: name.to_string(),
                    span,
                }),
            }
        }

        while let Some(ch) = self.peek() {
            if ch == '\n' {
                break;
            }
            self.bump();
        }
    }

    fn read_block_comment(&mut self) {
        let start = self.here();
        self.bump();
        self.bump();

        loop {
            match self.bump() {
                Some('*') if self.peek() == Some('/') => {
                    self.bump();
                    return;
                }
                Some(_) => {}
                None => {
                    self.errors.push(LexerError::UnterminatedComment {
                        start: self.span_from(start),
                    });
                    return;
                }
            }
        }
    }

    fn next_token(&mut self) -> LexerResult<Token> {
        let start = self.here();
        let ch = self.peek().ok_or(LexerError::UnknownChar {
            ch: '\0',
            span: start,
        })?;

        let kind = match ch {
            c if c.is_alphabetic() || c == '_' || c == '$' => self.read_word(),
            '0'..='9' => self.read_number(start)?,
            '"' | '\'' => self.read_string(start)?,
            '=' => {
                self.bump();
                match self.peek() {
                    Some('>') => {
                        self.bump();
                        TokenKind::FatArrow
                    }
                    Some('=') => {
                        self.bump();
                        if self.peek() == Some('=') {
                            self.bump();
                            TokenKind::EqEqEq
                        } else {
                            TokenKind::EqEq
                        }
                    }
                    _ => TokenKind::Eq,
                }
            }
            '!' => {
                self.bump();
                if self.peek() == Some('=') {
                    self.bump();
                    if self.peek() == Some('=') {
                        self.bump();
                        TokenKind::BangEqEq
                    } else {
                        TokenKind::BangEq
                    }
                } else {
                    TokenKind::Bang
                }
            }
            '&' => {
                self.bump();
                if self.peek() == Some('&') {
                    self.bump();
                    TokenKind::AmpAmp
                } else {
                    TokenKind::Amp
                }
            }
            '|' => {
                self.bump();
                if self.peek() == Some('|') {
                    self.bump();
                    TokenKind::PipePipe
                } else {
                    TokenKind::Pipe
                }
            }
            '.' => {
                self.bump();
                if self.peek() == Some('.') && self.peek2() == Some('.') {
                    self.bump();
                    self.bump();
                    TokenKind::Ellipsis
                } else {
                    TokenKind::Dot
                }
            }
            _ => {
                let kind = match ch {
                    '(' => TokenKind::LParen,
                    ')' => TokenKind::RParen,
                    '{' => TokenKind::LBrace,
                    '}' => TokenKind::RBrace,
                    '[' => TokenKind::LBracket,
                    ']' => TokenKind::RBracket,
                    ',' => TokenKind::Comma,
                    ':' => TokenKind::Colon,
                    ';' => TokenKind::Semi,
                    '?' => TokenKind::Question,
                    '<' => TokenKind::Lt,
                    '>' => TokenKind::Gt,
                    other => {
                        self.bump();
                        return Err(LexerError::UnknownChar {
                            ch: other,
                            span: self.span_from(start),
                        });
                    }
                };
                self.bump();
                kind
            }
        };

        Ok(Token::new(kind, self.span_from(start)))
    }

    fn read_word(&mut self) -> TokenKind {
        let start = self.position;
        while let Some(ch) = self.peek() {
            if ch.is_alphanumeric() || ch == '_' || ch == '$' {
                self.bump();
            } else {
                break;
            }
        }

        let text = &self.input[start..self.position];
        TokenKind::keyword(text).unwrap_or_else(|| TokenKind::Ident(text.to_string()))
    }

    fn read_number(&mut self, start: Span) -> LexerResult<TokenKind> {
        let begin = self.position;
        self.eat_digits();

        if self.peek() == Some('.') && self.peek2().is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
            self.eat_digits();
        }

        if matches!(self.peek(), Some('e' | 'E')) {
            let after = self.peek2();
            if after.is_some_and(|c| c.is_ascii_digit() || c == '+' || c == '-') {
                self.bump();
                if matches!(self.peek(), Some('+' | '-')) {
                    self.bump();
                }
                self.eat_digits();
            }
        }

        let mut invalid = false;
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '$')
        {
            invalid = true;
            self.bump();
        }

        let literal = &self.input[begin..self.position];
        if invalid {
            return Err(LexerError::InvalidNumeric {
                literal: literal.to_string(),
                span: self.span_from(start),
            });
        }

        literal
            .replace('_', "")
            .parse::<f64>()
            .map(TokenKind::Num)
            .map_err(|_| LexerError::InvalidNumeric {
                literal: literal.to_string(),
                span: self.span_from(start),
            })
    }

    fn eat_digits(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_digit() || c == '_') {
            self.bump();
        }
    }

    fn read_string(&mut self, start: Span) -> LexerResult<TokenKind> {
        let quote = self.bump().unwrap_or('"');
        let mut value = String::new();

        loop {
            match self.peek() {
                None | Some('\n') => {
                    return Err(LexerError::UnterminatedString {
                        start: self.span_from(start),
                    });
                }
                Some(c) if c == quote => {
                    self.bump();
                    return Ok(TokenKind::Str(value));
                }
                Some('\\') => {
                    self.bump();
                    let escaped = match self.bump() {
                        Some('n') => '\n',
                        Some('t') => '\t',
                        Some('r') => '\r',
                        Some('0') => '\0',
                        Some(other) => other,
                        None => {
                            return Err(LexerError::UnterminatedString {
                                start: self.span_from(start),
                            });
                        }
                    };
                    value.push(escaped);
                }
                Some(c) => {
                    self.bump();
                    value.push(c);
                }
            }
        }
    }

    /// Skips to a character that can start a token.
    fn recover(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_alphanumeric()
                || ch.is_whitespace()
                || matches!(ch, '_' | '$' | '"' | '\'' | '(' | ')' | '{' | '}' | '[' | ']' | ';')
            {
                break;
            }
            self.bump();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::new(source)
            .lex()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    fn ident(name: &str) -> TokenKind {
        TokenKind::Ident(name.to_string())
    }

    #[test]
    fn test_lexer_empty() {
        assert_eq!(kinds(""), vec![TokenKind::EOF]);
        assert_eq!(kinds("   \n\t "), vec![TokenKind::EOF]);
    }

    #[test]
    fn test_lexer_keywords_and_identifiers() {
        assert_eq!(
            kinds("declare const workers: Dict"),
            vec![
                TokenKind::Declare,
                TokenKind::Const,
                ident("workers"),
                TokenKind::Colon,
                ident("Dict"),
                TokenKind::EOF,
            ]
        );
    }

    #[test]
    fn test_lexer_dollar_and_underscore_identifiers() {
        assert_eq!(
            kinds("$el _private"),
            vec![ident("$el"), ident("_private"), TokenKind::EOF]
        );
    }

    #[test]
    fn test_lexer_numbers() {
        assert_eq!(
            kinds("1 2.5 1e3 1_000"),
            vec![
                TokenKind::Num(1.0),
                TokenKind::Num(2.5),
                TokenKind::Num(1000.0),
                TokenKind::Num(1000.0),
                TokenKind::EOF,
            ]
        );
    }

    #[test]
    fn test_lexer_number_then_member() {
        // `1.` followed by a non-digit is not a fraction
        assert_eq!(
            kinds("1.x"),
            vec![TokenKind::Num(1.0), TokenKind::Dot, ident("x"), TokenKind::EOF]
        );
    }

    #[test]
    fn test_lexer_invalid_number() {
        let errors = Lexer::new("port: 1abc").lex().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            &errors[0],
            LexerError::InvalidNumeric { literal, .. } if literal == "1abc"
        ));
    }

    #[test]
    fn test_lexer_strings() {
        assert_eq!(
            kinds(r#""json" 'advanced' "a\"b\n""#),
            vec![
                TokenKind::Str("json".into()),
                TokenKind::Str("advanced".into()),
                TokenKind::Str("a\"b\n".into()),
                TokenKind::EOF,
            ]
        );
    }

    #[test]
    fn test_lexer_unterminated_string() {
        let errors = Lexer::new("send(\"test);\nfoo()").lex().unwrap_err();
        assert!(matches!(errors[0], LexerError::UnterminatedString { .. }));
    }

    #[test]
    fn test_lexer_operators() {
        assert_eq!(
            kinds("= == === != !== ! && || | & => ? ... . < >"),
            vec![
                TokenKind::Eq,
                TokenKind::EqEq,
                TokenKind::EqEqEq,
                TokenKind::BangEq,
                TokenKind::BangEqEq,
                TokenKind::Bang,
                TokenKind::AmpAmp,
                TokenKind::PipePipe,
                TokenKind::Pipe,
                TokenKind::Amp,
                TokenKind::FatArrow,
                TokenKind::Question,
                TokenKind::Ellipsis,
                TokenKind::Dot,
                TokenKind::Lt,
                TokenKind::Gt,
                TokenKind::EOF,
            ]
        );
    }

    #[test]
    fn test_lexer_comments_are_skipped() {
        assert_eq!(
            kinds("a // trailing\n/* block\n comment */ b"),
            vec![ident("a"), ident("b"), TokenKind::EOF]
        );
    }

    #[test]
    fn test_lexer_unterminated_block_comment() {
        let errors = Lexer::new("a /* never closed").lex().unwrap_err();
        assert!(matches!(errors[0], LexerError::UnterminatedComment { .. }));
    }

    #[test]
    fn test_lexer_expect_type_directive() {
        assert_eq!(
            kinds("// $ExpectType Worker | undefined\nworker;"),
            vec![
                TokenKind::ExpectType,
                ident("Worker"),
                TokenKind::Pipe,
                TokenKind::Undefined,
                TokenKind::DirectiveEnd,
                ident("worker"),
                TokenKind::Semi,
                TokenKind::EOF,
            ]
        );
    }

    #[test]
    fn test_lexer_directive_at_eof_is_closed() {
        assert_eq!(
            kinds("// $ExpectType boolean"),
            vec![
                TokenKind::ExpectType,
                ident("boolean"),
                TokenKind::DirectiveEnd,
                TokenKind::EOF,
            ]
        );
    }

    #[test]
    fn test_lexer_expect_error_directive() {
        assert_eq!(
            kinds("// $ExpectError because reasons\nf(1);"),
            vec![
                TokenKind::ExpectError,
                ident("f"),
                TokenKind::LParen,
                TokenKind::Num(1.0),
                TokenKind::RParen,
                TokenKind::Semi,
                TokenKind::EOF,
            ]
        );
    }

    #[test]
    fn test_lexer_unknown_directive() {
        let errors = Lexer::new("// $ExpectNothing\nx").lex().unwrap_err();
        assert!(matches!(
            &errors[0],
            LexerError::UnknownDirective { name, .. } if name == "ExpectNothing"
        ));
    }

    #[test]
    fn test_lexer_recovers_and_reports_all_errors() {
        let (tokens, errors) = Lexer::new("a # b @ c").lex_recovering();
        assert_eq!(errors.len(), 2);
        let idents: Vec<_> = tokens
            .iter()
            .filter(|t| matches!(t.kind, TokenKind::Ident(_)))
            .collect();
        assert_eq!(idents.len(), 3);
    }

    #[test]
    fn test_lexer_spans() {
        let tokens = Lexer::new("cluster.fork();\n  worker").lex().unwrap();
        assert_eq!(tokens[0].span, Span::new(0, 7, 1, 1, 1, 8));
        assert_eq!(tokens[2].span.start_col, 9);
        let worker = &tokens[6];
        assert_eq!(worker.kind, ident("worker"));
        assert_eq!(worker.span.start_line, 2);
        assert_eq!(worker.span.start_col, 3);
    }

    #[test]
    fn test_lexer_columns_count_characters() {
        let tokens = Lexer::new("\"é\"; x").lex().unwrap();
        let x = &tokens[2];
        assert_eq!(x.kind, ident("x"));
        assert_eq!(x.span, Span::new(6, 7, 1, 6, 1, 7));

        let tokens = Lexer::new("f(\"日本\", y)").lex().unwrap();
        let y = tokens.iter().find(|t| t.kind == ident("y")).unwrap();
        assert_eq!(y.span.start, 12);
        assert_eq!(y.span.start_col, 9);
    }
}
