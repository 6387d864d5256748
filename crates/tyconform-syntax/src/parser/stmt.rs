//! Fixture statements and the directives attached to them.

use super::Parser;
use crate::ast::{Directive, ImportSpec, Stmt, StmtKind, VarKind};
use crate::error::{ParserError, ParserResult};
use crate::span::Spanned;
use crate::token::TokenKind;

impl Parser {
    /// Parses a statement, recording the error and skipping ahead on failure.
    pub(crate) fn parse_stmt_recovering(&mut self) -> Option<Stmt> {
        let start = self.pos;
        match self.parse_stmt() {
            Ok(stmt) => stmt,
            Err(err) => {
                self.emit_error(err);
                self.recover_from(start);
                None
            }
        }
    }

    /// Parses one statement together with the directives above it.
    ///
    /// Returns `Ok(None)` for an empty statement (`;`).
    pub(crate) fn parse_stmt(&mut self) -> ParserResult<Option<Stmt>> {
        let directives = self.parse_directives()?;

        if let Some(first) = directives.first() {
            if matches!(self.peek(), TokenKind::RBrace | TokenKind::EOF) {
                return Err(ParserError::DanglingDirective { span: first.span() });
            }
        } else if self.eat(&TokenKind::Semi) {
            return Ok(None);
        }

        let mut stmt = self.parse_stmt_kind()?;
        stmt.directives = directives;
        Ok(Some(stmt))
    }

    fn parse_directives(&mut self) -> ParserResult<Vec<Directive>> {
        let mut directives = Vec::new();
        loop {
            match self.peek() {
                TokenKind::ExpectType => {
                    let start = self.bump().span;
                    let ty = self.parse_type()?;
                    if !self.eat(&TokenKind::DirectiveEnd) {
                        return Err(self.unexpected(&["end of directive".to_string()]));
                    }
                    directives.push(Directive::ExpectType {
                        span: start.to(ty.span()),
                        ty,
                    });
                }
                TokenKind::ExpectError => {
                    let span = self.bump().span;
                    directives.push(Directive::ExpectError { span });
                }
                TokenKind::DirectiveEnd => {
                    self.bump();
                }
                _ => return Ok(directives),
            }
        }
    }

    fn parse_stmt_kind(&mut self) -> ParserResult<Stmt> {
        let start = self.span();
        let kind = match self.peek() {
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
                let init = if self.eat(&TokenKind::Eq) {
                    Some(self.parse_expr()?)
                } else {
                    None
                };
                self.eat_semi();
                StmtKind::Let {
                    kind,
                    name,
                    ty,
                    init,
                }
            }
            TokenKind::LBrace => StmtKind::Block(self.parse_block()?),
            TokenKind::If => {
                self.bump();
                let open = self.expect(&TokenKind::LParen)?.span;
                let cond = self.parse_expr()?;
                self.expect_closing(&TokenKind::RParen, open)?;
                let then_branch = Box::new(self.parse_branch()?);
                let else_branch = if self.eat(&TokenKind::Else) {
                    Some(Box::new(self.parse_branch()?))
                } else {
                    None
                };
                StmtKind::If {
                    cond,
                    then_branch,
                    else_branch,
                }
            }
            TokenKind::Return => {
                self.bump();
                let value = if matches!(self.peek(), TokenKind::Semi | TokenKind::RBrace | TokenKind::EOF)
                    || self.at_line_start()
                {
                    None
                } else {
                    Some(self.parse_expr()?)
                };
                self.eat_semi();
                StmtKind::Return(value)
            }
            TokenKind::Import => self.parse_import()?,
            _ => {
                let expr = self.parse_expr()?;
                self.eat_semi();
                StmtKind::Expr(expr)
            }
        };
        Ok(Stmt::new(kind, start.to(self.prev_span())))
    }

    /// The statement of an `if` or `else` branch; directives are not allowed
    /// between the condition and the branch.
    fn parse_branch(&mut self) -> ParserResult<Stmt> {
        self.parse_stmt_kind()
    }

    /// `{ stmt* }`, recovering inside the block.
    pub(crate) fn parse_block(&mut self) -> ParserResult<Vec<Stmt>> {
        let open = self.expect(&TokenKind::LBrace)?.span;
        let mut stmts = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.is_at_eof() {
            if let Some(stmt) = self.parse_stmt_recovering() {
                stmts.push(stmt);
            }
        }
        self.expect_closing(&TokenKind::RBrace, open)?;
        Ok(stmts)
    }

    /// `import def, { a, b as c } from "module";`
    pub(crate) fn parse_import(&mut self) -> ParserResult<StmtKind> {
        self.expect(&TokenKind::Import)?;
        let mut names = Vec::new();

        // `import "module";`
        if let TokenKind::Str(module) = self.peek().clone() {
            self.bump();
            self.eat_semi();
            return Ok(StmtKind::Import { names, module });
        }

        // `import type { A } from "m"`
        if self.check(&TokenKind::Type) && matches!(self.peek_nth(1), TokenKind::LBrace | TokenKind::Ident(_)) {
            self.bump();
        }

        if matches!(self.peek(), TokenKind::Ident(_)) {
            let local = self.parse_name("import name", false)?;
            names.push(ImportSpec {
                imported: local.clone(),
                local,
            });
            self.eat(&TokenKind::Comma);
        }

        if self.check(&TokenKind::LBrace) {
            let open = self.bump().span;
            while !self.check(&TokenKind::RBrace) && !self.is_at_eof() {
                let imported = self.parse_name("import name", true)?;
                let local = if self.eat(&TokenKind::As) {
                    self.parse_name("import alias", false)?
                } else {
                    imported.clone()
                };
                names.push(ImportSpec { imported, local });
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
            self.expect_closing(&TokenKind::RBrace, open)?;
        }

        if names.is_empty() {
            return Err(self.unexpected(&["import name".to_string(), "'{'".to_string()]));
        }

        self.expect(&TokenKind::From)?;
        let module = match self.peek().clone() {
            TokenKind::Str(module) => {
                self.bump();
                module
            }
            _ => return Err(self.unexpected(&["module specifier".to_string()])),
        };
        self.eat_semi();
        Ok(StmtKind::Import { names, module })
    }
}
