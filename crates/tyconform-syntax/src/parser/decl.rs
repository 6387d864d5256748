//! Declarations in `.d.ts` catalog files.

use super::Parser;
use crate::ast::{Decl, VarKind};
use crate::error::{ParserError, ParserResult};
use crate::token::TokenKind;

impl Parser {
    /// Parses one declaration.
    ///
    /// Returns `Ok(None)` for constructs that are accepted but carry no
    /// declaration: `export default x;`, `export = x;`, `export { a };` and
    /// `import` statements.
    pub(crate) fn parse_decl(&mut self) -> ParserResult<Option<Decl>> {
        let start = self.span();

        loop {
            match self.peek() {
                TokenKind::Export => {
                    self.bump();
                    if matches!(self.peek(), TokenKind::Default | TokenKind::Eq | TokenKind::LBrace) {
                        self.skip_statement();
                        return Ok(None);
                    }
                }
                TokenKind::Declare | TokenKind::Abstract => {
                    self.bump();
                }
                _ => break,
            }
        }

        let decl = match self.peek() {
            TokenKind::Import => {
                self.parse_import()?;
                return Ok(None);
            }
            TokenKind::Interface => {
                self.bump();
                let name = self.parse_name("interface name", false)?;
                let type_params = self.parse_type_params()?;
                let mut extends = Vec::new();
                if self.eat(&TokenKind::Extends) {
                    loop {
                        extends.push(self.parse_type()?);
                        if !self.eat(&TokenKind::Comma) {
                            break;
                        }
                    }
                }
                let members = self.parse_member_block()?;
                Decl::Interface {
                    name,
                    type_params,
                    extends,
                    members,
                    span: start.to(self.prev_span()),
                }
            }
            TokenKind::Class => {
                self.bump();
                let name = self.parse_name("class name", false)?;
                let type_params = self.parse_type_params()?;
                let extends = if self.eat(&TokenKind::Extends) {
                    Some(self.parse_type()?)
                } else {
                    None
                };
                let mut implements = Vec::new();
                if self.eat(&TokenKind::Implements) {
                    loop {
                        implements.push(self.parse_type()?);
                        if !self.eat(&TokenKind::Comma) {
                            break;
                        }
                    }
                }
                let members = self.parse_member_block()?;
                Decl::Class {
                    name,
                    type_params,
                    extends,
                    implements,
                    members,
                    span: start.to(self.prev_span()),
                }
            }
            TokenKind::Type => {
                self.bump();
                let name = self.parse_name("type alias name", false)?;
                let type_params = self.parse_type_params()?;
                self.expect(&TokenKind::Eq)?;
                let ty = self.parse_type()?;
                self.eat_semi();
                Decl::TypeAlias {
                    name,
                    type_params,
                    ty,
                    span: start.to(self.prev_span()),
                }
            }
            TokenKind::Function => {
                self.bump();
                let name = self.parse_name("function name", false)?;
                let sig = self.parse_signature()?;
                self.eat_semi();
                Decl::Function {
                    name,
                    sig,
                    span: start.to(self.prev_span()),
                }
            }
            TokenKind::Const | TokenKind::Let | TokenKind::Var => {
                let kind = match self.bump().kind {
                    TokenKind::Const => VarKind::Const,
                    TokenKind::Let => VarKind::Let,
                    _ => VarKind::Var,
                };
                let name = self.parse_name("variable name", false)?;
                let ty = if self.eat(&TokenKind::Colon) {
                    Some(self.parse_type()?)
                } else {
                    None
                };
                self.eat_semi();
                Decl::Variable {
                    kind,
                    name,
                    ty,
                    span: start.to(self.prev_span()),
                }
            }
            TokenKind::Namespace => {
                self.bump();
                let name = self.parse_name("namespace name", false)?;
                let open = self.expect(&TokenKind::LBrace)?.span;
                let mut body = Vec::new();
                while !self.check(&TokenKind::RBrace) && !self.is_at_eof() {
                    if self.eat(&TokenKind::Semi) {
                        continue;
                    }
                    if let Some(decl) = self.parse_decl()? {
                        body.push(decl);
                    }
                }
                self.expect_closing(&TokenKind::RBrace, open)?;
                Decl::Namespace {
                    name,
                    body,
                    span: start.to(self.prev_span()),
                }
            }
            other => {
                return Err(ParserError::ExpectedDeclaration {
                    found: other.to_string(),
                    span: self.span(),
                });
            }
        };

        Ok(Some(decl))
    }

    /// Skips a statement that declares nothing, up to and including `;`.
    fn skip_statement(&mut self) {
        let start = self.pos;
        while !matches!(self.peek(), TokenKind::Semi | TokenKind::EOF) {
            if self.check(&TokenKind::LBrace) {
                // `export { a, b }` may end without `;`
                if let Some(close) = self.matching_close(0) {
                    for _ in 0..=close {
                        self.bump();
                    }
                    break;
                }
            }
            if self.pos > start && self.at_line_start() {
                return;
            }
            self.bump();
        }
        self.eat_semi();
    }
}
