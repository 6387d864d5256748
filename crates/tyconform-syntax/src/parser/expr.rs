//! Fixture expressions.
//!
//! Binary operators use precedence climbing over [`BinaryOp::precedence`];
//! `as` binds tighter than every binary operator.

use super::Parser;
use crate::ast::{ArrowBody, BinaryOp, Expr, Ident, ObjectProp, Param, UnaryOp};
use crate::error::{ParserError, ParserResult};
use crate::span::Spanned;
use crate::token::TokenKind;

/// Lowest binding power; every operator binds at least this tightly.
const MIN_PRECEDENCE: u8 = 0;

impl Parser {
    /// Parses a complete expression.
    pub(crate) fn parse_expr(&mut self) -> ParserResult<Expr> {
        self.parse_binary(MIN_PRECEDENCE)
    }

    fn parse_binary(&mut self, precedence: u8) -> ParserResult<Expr> {
        let mut left = self.parse_unary()?;

        loop {
            if self.eat(&TokenKind::As) {
                let ty = self.parse_type()?;
                let span = left.span().to(ty.span());
                left = Expr::As {
                    expr: Box::new(left),
                    ty,
                    span,
                };
                continue;
            }

            let op = match self.peek() {
                TokenKind::AmpAmp => BinaryOp::And,
                TokenKind::PipePipe => BinaryOp::Or,
                TokenKind::EqEq | TokenKind::EqEqEq => BinaryOp::Eq,
                TokenKind::BangEq | TokenKind::BangEqEq => BinaryOp::NotEq,
                _ => break,
            };
            if op.precedence() < precedence {
                break;
            }
            self.bump();

            let right = self.parse_binary(op.precedence() + 1)?;
            let span = left.span().to(right.span());
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
                span,
            };
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> ParserResult<Expr> {
        if self.check(&TokenKind::Bang) {
            let start = self.bump().span;
            let operand = self.parse_unary()?;
            let span = start.to(operand.span());
            return Ok(Expr::Unary {
                op: UnaryOp::Not,
                operand: Box::new(operand),
                span,
            });
        }
        self.parse_postfix()
    }

    /// Primary expression followed by calls, member accesses, indexing and
    /// non-null assertions.
    fn parse_postfix(&mut self) -> ParserResult<Expr> {
        let mut expr = self.parse_primary()?;

        loop {
            match self.peek() {
                TokenKind::Dot => {
                    self.bump();
                    let property = self.parse_name("property name", true)?;
                    let span = expr.span().to(property.span);
                    expr = Expr::Member {
                        object: Box::new(expr),
                        property,
                        span,
                    };
                }
                TokenKind::LParen => {
                    let args = self.parse_args()?;
                    let span = expr.span().to(self.prev_span());
                    expr = Expr::Call {
                        callee: Box::new(expr),
                        args,
                        span,
                    };
                }
                TokenKind::LBracket => {
                    let open = self.bump().span;
                    let index = self.parse_expr()?;
                    self.expect_closing(&TokenKind::RBracket, open)?;
                    let span = expr.span().to(self.prev_span());
                    expr = Expr::Index {
                        object: Box::new(expr),
                        index: Box::new(index),
                        span,
                    };
                }
                // `x!` only when the `!` is on the same line
                TokenKind::Bang if !self.at_line_start() => {
                    let end = self.bump().span;
                    let span = expr.span().to(end);
                    expr = Expr::NonNull {
                        expr: Box::new(expr),
                        span,
                    };
                }
                _ => break,
            }
        }

        Ok(expr)
    }

    fn parse_args(&mut self) -> ParserResult<Vec<Expr>> {
        let open = self.expect(&TokenKind::LParen)?.span;
        let mut args = Vec::new();
        while !self.check(&TokenKind::RParen) && !self.is_at_eof() {
            args.push(self.parse_expr()?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect_closing(&TokenKind::RParen, open)?;
        Ok(args)
    }

    fn parse_primary(&mut self) -> ParserResult<Expr> {
        let span = self.span();

        match self.peek().clone() {
            TokenKind::Str(value) => {
                self.bump();
                Ok(Expr::Str { value, span })
            }
            TokenKind::Num(value) => {
                self.bump();
                Ok(Expr::Num { value, span })
            }
            TokenKind::True | TokenKind::False => {
                let value = self.bump().kind == TokenKind::True;
                Ok(Expr::Bool { value, span })
            }
            TokenKind::Null => {
                self.bump();
                Ok(Expr::Null { span })
            }
            TokenKind::Undefined => {
                self.bump();
                Ok(Expr::Undefined { span })
            }
            TokenKind::This => {
                self.bump();
                Ok(Expr::Ident(Ident::new("this", span)))
            }
            TokenKind::Ident(name) => {
                self.bump();
                let ident = Ident::new(name, span);
                if self.check(&TokenKind::FatArrow) {
                    // `key => ...`
                    let param = Param {
                        span: ident.span,
                        name: ident,
                        optional: false,
                        rest: false,
                        ty: None,
                    };
                    return self.parse_arrow_rest(span, vec![param], None);
                }
                Ok(Expr::Ident(ident))
            }
            TokenKind::New => self.parse_new(),
            TokenKind::LBracket => {
                self.bump();
                let mut elements = Vec::new();
                while !self.check(&TokenKind::RBracket) && !self.is_at_eof() {
                    elements.push(self.parse_expr()?);
                    if !self.eat(&TokenKind::Comma) {
                        break;
                    }
                }
                self.expect_closing(&TokenKind::RBracket, span)?;
                Ok(Expr::Array {
                    elements,
                    span: span.to(self.prev_span()),
                })
            }
            TokenKind::LBrace => self.parse_object_literal(),
            TokenKind::LParen if self.at_arrow() => {
                let params = self.parse_params()?;
                let ret = if self.eat(&TokenKind::Colon) {
                    Some(self.parse_type()?)
                } else {
                    None
                };
                self.parse_arrow_rest(span, params, ret)
            }
            TokenKind::LParen => {
                self.bump();
                let inner = self.parse_expr()?;
                self.expect_closing(&TokenKind::RParen, span)?;
                Ok(inner)
            }
            other => Err(ParserError::ExpectedExpression {
                found: other.to_string(),
                span,
            }),
        }
    }

    /// Whether the `(` at the cursor opens an arrow parameter list.
    fn at_arrow(&self) -> bool {
        self.matching_close(0)
            .is_some_and(|close| matches!(self.peek_nth(close + 1), TokenKind::FatArrow | TokenKind::Colon))
    }

    /// Everything from `=>` on.
    fn parse_arrow_rest(
        &mut self,
        start: crate::span::Span,
        params: Vec<Param>,
        ret: Option<crate::ast::TypeExpr>,
    ) -> ParserResult<Expr> {
        self.expect(&TokenKind::FatArrow)?;
        let body = if self.check(&TokenKind::LBrace) {
            let body_start = self.span();
            let stmts = self.parse_block()?;
            ArrowBody::Block {
                stmts,
                span: body_start.to(self.prev_span()),
            }
        } else {
            ArrowBody::Expr(Box::new(self.parse_expr()?))
        };
        Ok(Expr::Arrow {
            params,
            ret,
            body,
            span: start.to(self.prev_span()),
        })
    }

    /// `new Callee(args)`; the argument list may be omitted.
    fn parse_new(&mut self) -> ParserResult<Expr> {
        let start = self.expect(&TokenKind::New)?.span;

        let name = self.parse_name("constructor name", false)?;
        let mut callee = Expr::Ident(name);
        while self.eat(&TokenKind::Dot) {
            let property = self.parse_name("property name", true)?;
            let span = callee.span().to(property.span);
            callee = Expr::Member {
                object: Box::new(callee),
                property,
                span,
            };
        }

        let args = if self.check(&TokenKind::LParen) {
            self.parse_args()?
        } else {
            Vec::new()
        };
        Ok(Expr::New {
            callee: Box::new(callee),
            args,
            span: start.to(self.prev_span()),
        })
    }

    /// `{ key: value, shorthand, "quoted": value }`
    fn parse_object_literal(&mut self) -> ParserResult<Expr> {
        let open = self.expect(&TokenKind::LBrace)?.span;
        let mut props = Vec::new();

        while !self.check(&TokenKind::RBrace) && !self.is_at_eof() {
            let key = match self.peek().clone() {
                TokenKind::Str(value) => Ident::new(value, self.bump().span),
                _ => self.parse_name("property name", true)?,
            };
            let value = if self.eat(&TokenKind::Colon) {
                self.parse_expr()?
            } else {
                Expr::Ident(key.clone())
            };
            props.push(ObjectProp {
                span: key.span.to(value.span()),
                key,
                value,
            });
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }

        self.expect_closing(&TokenKind::RBrace, open)?;
        Ok(Expr::Object {
            props,
            span: open.to(self.prev_span()),
        })
    }
}
