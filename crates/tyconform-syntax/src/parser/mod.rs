//! Recursive descent parser for declaration and fixture files.
//!
//! One [`Parser`] type serves both grammars. The token-level helpers live
//! here; the grammar itself is split by area:
//!
//! - [`types`] - type annotations, signatures, members
//! - [`decl`] - catalog declarations
//! - [`expr`] - fixture expressions (precedence climbing)
//! - [`stmt`] - fixture statements and directives
//!
//! Errors are accumulated: after a failed declaration or statement the
//! parser skips to the next `;` or `}` and carries on.

mod decl;
mod expr;
mod stmt;
mod types;

use crate::ast::{DeclFile, Fixture};
use crate::error::{ParserError, ParserResult, SyntaxError, SyntaxResult};
use crate::lexer::Lexer;
use crate::span::Span;
use crate::token::{Token, TokenKind};
use tyconform_log::debug;

/// Parser over a token stream.
pub struct Parser {
    /// Token stream; always ends with EOF
    tokens: Vec<Token>,
    /// Index of the current token
    pos: usize,
    /// Accumulated errors
    errors: Vec<ParserError>,
}

impl Parser {
    /// Creates a parser over lexed tokens.
    #[must_use]
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().is_none_or(|t| t.kind != TokenKind::EOF) {
            let span = tokens.last().map_or_else(Span::default, |t| {
                Span::point(t.span.end, t.span.end_line, t.span.end_col)
            });
            tokens.push(Token::new(TokenKind::EOF, span));
        }
        Self {
            tokens,
            pos: 0,
            errors: Vec::new(),
        }
    }

    /// Returns the current token.
    fn current(&self) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[self.pos.min(last)]
    }

    /// Returns the kind of the current token.
    fn peek(&self) -> &TokenKind {
        &self.current().kind
    }

    /// Returns the kind of the token `n` places ahead.
    fn peek_nth(&self, n: usize) -> &TokenKind {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.pos + n).min(last)].kind
    }

    /// Span of the current token.
    fn span(&self) -> Span {
        self.current().span
    }

    /// Span of the previously consumed token.
    fn prev_span(&self) -> Span {
        self.pos
            .checked_sub(1)
            .and_then(|idx| self.tokens.get(idx))
            .map_or_else(|| self.span(), |t| t.span)
    }

    /// Consumes the current token and returns it.
    fn bump(&mut self) -> Token {
        let token = self.current().clone();
        if token.kind != TokenKind::EOF {
            self.pos += 1;
        }
        token
    }

    fn check(&self, kind: &TokenKind) -> bool {
        self.peek() == kind
    }

    /// Consumes the current token if it matches.
    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Requires the current token to be `kind`.
    fn expect(&mut self, kind: &TokenKind) -> ParserResult<Token> {
        if self.check(kind) {
            Ok(self.bump())
        } else {
            Err(self.unexpected(&[format!("'{kind}'")]))
        }
    }

    /// Requires a closing delimiter, reporting where it was opened.
    fn expect_closing(&mut self, kind: &TokenKind, opened: Span) -> ParserResult<Token> {
        if self.check(kind) {
            Ok(self.bump())
        } else if self.is_at_eof() {
            Err(ParserError::MissingDelimiter {
                delimiter: kind.to_string(),
                span: opened,
            })
        } else {
            Err(self.unexpected(&[format!("'{kind}'")]))
        }
    }

    fn unexpected(&self, expected: &[String]) -> ParserError {
        ParserError::UnexpectedToken {
            expected: expected.to_vec(),
            found: self.peek().to_string(),
            span: self.span(),
        }
    }

    fn is_at_eof(&self) -> bool {
        self.check(&TokenKind::EOF)
    }

    /// Reports an error and continues.
    fn emit_error(&mut self, error: ParserError) {
        debug!(%error, "parse error, recovering");
        self.errors.push(error);
    }

    /// Skips past the construct that started at token index `start`.
    ///
    /// Delimiters opened since `start` are closed first, then tokens are
    /// skipped up to and including a `;`, or up to a `}` that belongs to an
    /// enclosing block. Always makes progress unless at `}` or EOF.
    fn recover_from(&mut self, start: usize) {
        let before = self.pos;
        let mut depth = 0usize;
        for token in &self.tokens[start..self.pos] {
            match token.kind {
                TokenKind::LBrace | TokenKind::LParen | TokenKind::LBracket => depth += 1,
                TokenKind::RBrace | TokenKind::RParen | TokenKind::RBracket => {
                    depth = depth.saturating_sub(1);
                }
                _ => {}
            }
        }

        let started_inside = depth > 0;

        loop {
            match self.peek() {
                TokenKind::EOF => break,
                TokenKind::Semi if depth == 0 => {
                    self.bump();
                    break;
                }
                TokenKind::LBrace | TokenKind::LParen | TokenKind::LBracket => depth += 1,
                TokenKind::RBrace | TokenKind::RParen | TokenKind::RBracket => {
                    if depth == 0 {
                        break;
                    }
                    depth -= 1;
                    if depth == 0 && started_inside {
                        self.bump();
                        break;
                    }
                }
                _ => {}
            }
            self.bump();
        }

        if self.pos == before && !matches!(self.peek(), TokenKind::RBrace | TokenKind::EOF) {
            self.bump();
        }
    }

    /// Whether the current token starts a new line.
    fn at_line_start(&self) -> bool {
        self.pos > 0 && self.span().start_line > self.prev_span().end_line
    }

    /// Consumes an optional `;`.
    fn eat_semi(&mut self) {
        self.eat(&TokenKind::Semi);
    }

    /// Index of the token matching the opening delimiter at `self.pos + n`.
    ///
    /// Returns the offset (relative to `self.pos`) of the closing token, or
    /// `None` if the input ends first.
    fn matching_close(&self, n: usize) -> Option<usize> {
        let (open, close) = match self.peek_nth(n) {
            TokenKind::LParen => (TokenKind::LParen, TokenKind::RParen),
            TokenKind::LBracket => (TokenKind::LBracket, TokenKind::RBracket),
            TokenKind::LBrace => (TokenKind::LBrace, TokenKind::RBrace),
            TokenKind::Lt => (TokenKind::Lt, TokenKind::Gt),
            _ => return None,
        };
        let mut depth = 0usize;
        let mut offset = n;
        loop {
            let kind = self.peek_nth(offset);
            if *kind == TokenKind::EOF {
                return None;
            }
            if *kind == open {
                depth += 1;
            } else if *kind == close {
                depth -= 1;
                if depth == 0 {
                    return Some(offset);
                }
            }
            offset += 1;
        }
    }

    /// Parses an identifier, accepting keywords when `allow_keywords` is set.
    fn parse_name(&mut self, what: &str, allow_keywords: bool) -> ParserResult<crate::ast::Ident> {
        let span = self.span();
        let name = match self.peek() {
            TokenKind::Ident(name) => name.clone(),
            kind if allow_keywords => match kind.keyword_text() {
                Some(text) => text.to_string(),
                None => return Err(self.unexpected(&[what.to_string()])),
            },
            _ => return Err(self.unexpected(&[what.to_string()])),
        };
        self.bump();
        Ok(crate::ast::Ident::new(name, span))
    }

    /// Parses a whole declaration file.
    ///
    /// # Errors
    ///
    /// Returns every syntax error found.
    pub fn parse_declarations(mut self) -> Result<DeclFile, Vec<ParserError>> {
        self.tokens.retain(|t| !t.kind.is_directive());
        let mut decls = Vec::new();

        while !self.is_at_eof() {
            if self.eat(&TokenKind::Semi) {
                continue;
            }
            let start = self.pos;
            match self.parse_decl() {
                Ok(Some(decl)) => decls.push(decl),
                Ok(None) => {}
                Err(err) => {
                    self.emit_error(err);
                    self.recover_from(start);
                }
            }
            // A stray `}` at top level would otherwise stall the loop.
            if self.check(&TokenKind::RBrace) {
                let span = self.span();
                self.bump();
                self.emit_error(ParserError::ExpectedDeclaration {
                    found: "}".to_string(),
                    span,
                });
            }
        }

        if self.errors.is_empty() {
            Ok(DeclFile { decls })
        } else {
            Err(self.errors)
        }
    }

    /// Parses a whole fixture file.
    ///
    /// # Errors
    ///
    /// Returns every syntax error found.
    pub fn parse_fixture(mut self) -> Result<Fixture, Vec<ParserError>> {
        let mut stmts = Vec::new();

        while !self.is_at_eof() {
            if let Some(stmt) = self.parse_stmt_recovering() {
                stmts.push(stmt);
            }
            if self.check(&TokenKind::RBrace) {
                let span = self.span();
                self.bump();
                self.emit_error(ParserError::UnexpectedToken {
                    expected: vec!["statement".to_string()],
                    found: "}".to_string(),
                    span,
                });
            }
        }

        if self.errors.is_empty() {
            Ok(Fixture { stmts })
        } else {
            Err(self.errors)
        }
    }
}

fn lex_for_parse(source: &str) -> (Vec<Token>, Vec<SyntaxError>) {
    let (tokens, lex_errors) = Lexer::new(source).lex_recovering();
    let errors = lex_errors.into_iter().map(SyntaxError::from).collect();
    (tokens, errors)
}

/// Lexes and parses a declaration file.
///
/// # Errors
///
/// Returns all lexer and parser errors.
///
/// ```
/// use tyconform_syntax::parse_declarations;
///
/// let file = parse_declarations("declare function fork(): Worker;").unwrap();
/// assert_eq!(file.decls.len(), 1);
/// ```
pub fn parse_declarations(source: &str) -> SyntaxResult<DeclFile> {
    let (tokens, mut errors) = lex_for_parse(source);
    match Parser::new(tokens).parse_declarations() {
        Ok(file) if errors.is_empty() => Ok(file),
        Ok(_) => Err(errors),
        Err(parse_errors) => {
            errors.extend(parse_errors.into_iter().map(SyntaxError::from));
            Err(errors)
        }
    }
}

/// Lexes and parses a fixture file.
///
/// # Errors
///
/// Returns all lexer and parser errors.
///
/// ```
/// use tyconform_syntax::parse_fixture;
///
/// let fixture = parse_fixture("cluster.fork();\nworker!.send(\"test\", () => {});").unwrap();
/// assert_eq!(fixture.stmts.len(), 2);
/// ```
pub fn parse_fixture(source: &str) -> SyntaxResult<Fixture> {
    let (tokens, mut errors) = lex_for_parse(source);
    match Parser::new(tokens).parse_fixture() {
        Ok(fixture) if errors.is_empty() => Ok(fixture),
        Ok(_) => Err(errors),
        Err(parse_errors) => {
            errors.extend(parse_errors.into_iter().map(SyntaxError::from));
            Err(errors)
        }
    }
}

/// Parses a standalone type annotation, as found in configuration or tests.
///
/// # Errors
///
/// Returns all lexer and parser errors, including trailing tokens.
pub fn parse_type(source: &str) -> SyntaxResult<crate::ast::TypeExpr> {
    let (tokens, errors) = lex_for_parse(source);
    if !errors.is_empty() {
        return Err(errors);
    }
    let mut parser = Parser::new(tokens);
    let ty = parser.parse_type().map_err(|e| vec![SyntaxError::from(e)])?;
    if !parser.is_at_eof() {
        return Err(vec![SyntaxError::from(parser.unexpected(&["end of input".to_string()]))]);
    }
    Ok(ty)
}
