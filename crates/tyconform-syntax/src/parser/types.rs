//! Type annotations, signatures and object members.

use super::Parser;
use crate::ast::{Ident, KeywordType, Member, Param, Signature, TypeExpr};
use crate::error::{ParserError, ParserResult};
use crate::span::Spanned;
use crate::token::TokenKind;

impl Parser {
    /// Parses a type annotation: `A | B[] | (x: T) => R`.
    pub(crate) fn parse_type(&mut self) -> ParserResult<TypeExpr> {
        let start = self.span();
        // Leading `|` as in multi-line unions
        self.eat(&TokenKind::Pipe);

        let first = self.parse_array_type()?;
        if !self.check(&TokenKind::Pipe) {
            return Ok(first);
        }

        let mut members = vec![first];
        while self.eat(&TokenKind::Pipe) {
            members.push(self.parse_array_type()?);
        }
        let span = start.to(self.prev_span());
        Ok(TypeExpr::Union { members, span })
    }

    /// Primary type followed by any number of `[]` suffixes.
    fn parse_array_type(&mut self) -> ParserResult<TypeExpr> {
        let mut ty = self.parse_primary_type()?;
        while self.check(&TokenKind::LBracket) && *self.peek_nth(1) == TokenKind::RBracket {
            self.bump();
            let close = self.bump();
            let span = ty.span().to(close.span);
            ty = TypeExpr::Array {
                elem: Box::new(ty),
                span,
            };
        }
        Ok(ty)
    }

    fn parse_primary_type(&mut self) -> ParserResult<TypeExpr> {
        let span = self.span();
        let keyword = |kind| TypeExpr::Keyword { kind, span };

        match self.peek().clone() {
            TokenKind::Ident(name) => match KeywordType::from_name(&name) {
                Some(kind) => {
                    self.bump();
                    Ok(keyword(kind))
                }
                None => self.parse_type_ref(),
            },
            TokenKind::Void => {
                self.bump();
                Ok(keyword(KeywordType::Void))
            }
            TokenKind::Null => {
                self.bump();
                Ok(keyword(KeywordType::Null))
            }
            TokenKind::Undefined => {
                self.bump();
                Ok(keyword(KeywordType::Undefined))
            }
            TokenKind::This => {
                self.bump();
                Ok(keyword(KeywordType::This))
            }
            TokenKind::Str(value) => {
                self.bump();
                Ok(TypeExpr::StringLit { value, span })
            }
            TokenKind::Num(value) => {
                self.bump();
                Ok(TypeExpr::NumberLit { value, span })
            }
            TokenKind::True | TokenKind::False => {
                let value = self.bump().kind == TokenKind::True;
                Ok(TypeExpr::BoolLit { value, span })
            }
            TokenKind::Lt => self.parse_function_type(),
            TokenKind::LParen => {
                let is_function = self
                    .matching_close(0)
                    .is_some_and(|close| *self.peek_nth(close + 1) == TokenKind::FatArrow);
                if is_function {
                    return self.parse_function_type();
                }
                self.bump();
                let inner = self.parse_type()?;
                self.expect_closing(&TokenKind::RParen, span)?;
                Ok(inner)
            }
            TokenKind::LBrace => {
                let members = self.parse_member_block()?;
                Ok(TypeExpr::Object {
                    members,
                    span: span.to(self.prev_span()),
                })
            }
            other => Err(ParserError::ExpectedType {
                found: other.to_string(),
                span,
            }),
        }
    }

    /// `NodeJS.Dict<Worker>`
    fn parse_type_ref(&mut self) -> ParserResult<TypeExpr> {
        let start = self.span();
        let mut path = vec![self.parse_name("type name", false)?];
        while self.eat(&TokenKind::Dot) {
            path.push(self.parse_name("type name", true)?);
        }

        let mut args = Vec::new();
        if self.check(&TokenKind::Lt) {
            let open = self.bump().span;
            loop {
                args.push(self.parse_type()?);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
            self.expect_closing(&TokenKind::Gt, open)?;
        }

        Ok(TypeExpr::Ref {
            path,
            args,
            span: start.to(self.prev_span()),
        })
    }

    /// `<T>(a: T) => R`
    fn parse_function_type(&mut self) -> ParserResult<TypeExpr> {
        let start = self.span();
        let type_params = self.parse_type_params()?;
        let params = self.parse_params()?;
        self.expect(&TokenKind::FatArrow)?;
        let ret = self.parse_type()?;
        let span = start.to(ret.span());
        Ok(TypeExpr::Function {
            sig: Box::new(Signature {
                type_params,
                params,
                ret: Some(ret),
                span,
            }),
            span,
        })
    }

    /// Optional `<T, U extends X = Y>`; constraints and defaults are skipped.
    pub(crate) fn parse_type_params(&mut self) -> ParserResult<Vec<Ident>> {
        let mut params = Vec::new();
        if !self.check(&TokenKind::Lt) {
            return Ok(params);
        }
        let open = self.bump().span;
        loop {
            params.push(self.parse_name("type parameter", false)?);
            if self.eat(&TokenKind::Extends) {
                self.parse_type()?;
            }
            if self.eat(&TokenKind::Eq) {
                self.parse_type()?;
            }
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect_closing(&TokenKind::Gt, open)?;
        Ok(params)
    }

    /// Parenthesized parameter list. Annotations are optional so the same
    /// rule serves arrow functions in fixtures.
    pub(crate) fn parse_params(&mut self) -> ParserResult<Vec<Param>> {
        let open = self.expect(&TokenKind::LParen)?.span;
        let mut params = Vec::new();

        while !self.check(&TokenKind::RParen) && !self.is_at_eof() {
            let start = self.span();
            let rest = self.eat(&TokenKind::Ellipsis);
            let name = self.parse_name("parameter name", true)?;
            let optional = self.eat(&TokenKind::Question);
            let ty = if self.eat(&TokenKind::Colon) {
                Some(self.parse_type()?)
            } else {
                None
            };
            params.push(Param {
                name,
                optional,
                rest,
                ty,
                span: start.to(self.prev_span()),
            });

            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }

        self.expect_closing(&TokenKind::RParen, open)?;
        Ok(params)
    }

    /// `<T>(params): R` with an optional return annotation.
    pub(crate) fn parse_signature(&mut self) -> ParserResult<Signature> {
        let start = self.span();
        let type_params = self.parse_type_params()?;
        let params = self.parse_params()?;
        let ret = if self.eat(&TokenKind::Colon) {
            Some(self.parse_type()?)
        } else {
            None
        };
        Ok(Signature {
            type_params,
            params,
            ret,
            span: start.to(self.prev_span()),
        })
    }

    /// `{ member; member, ... }` as used by interfaces, classes and type
    /// literals.
    pub(crate) fn parse_member_block(&mut self) -> ParserResult<Vec<Member>> {
        let open = self.expect(&TokenKind::LBrace)?.span;
        let mut members = Vec::new();

        while !self.check(&TokenKind::RBrace) && !self.is_at_eof() {
            if self.eat(&TokenKind::Semi) || self.eat(&TokenKind::Comma) {
                continue;
            }
            members.push(self.parse_member()?);
            let separated = self.eat(&TokenKind::Semi)
                || self.eat(&TokenKind::Comma)
                || self.check(&TokenKind::RBrace)
                || self.at_line_start();
            if !separated {
                return Err(self.unexpected(&["';'".to_string(), "'}'".to_string()]));
            }
        }

        self.expect_closing(&TokenKind::RBrace, open)?;
        Ok(members)
    }

    /// Whether the current token is used as a modifier rather than as a
    /// member name (`readonly: boolean` names a property).
    fn at_modifier(&self) -> bool {
        let is_modifier = match self.peek() {
            TokenKind::Readonly | TokenKind::Static | TokenKind::Abstract | TokenKind::Declare => true,
            TokenKind::Ident(name) => matches!(name.as_str(), "public" | "private" | "protected"),
            _ => false,
        };
        is_modifier
            && !matches!(
                self.peek_nth(1),
                TokenKind::Colon
                    | TokenKind::Question
                    | TokenKind::LParen
                    | TokenKind::Lt
                    | TokenKind::Semi
                    | TokenKind::Comma
                    | TokenKind::RBrace
            )
    }

    fn parse_member(&mut self) -> ParserResult<Member> {
        let start = self.span();
        let mut readonly = false;
        let mut is_static = false;
        while self.at_modifier() {
            match self.bump().kind {
                TokenKind::Readonly => readonly = true,
                TokenKind::Static => is_static = true,
                _ => {}
            }
        }

        match self.peek() {
            TokenKind::LBracket => {
                self.bump();
                let key = self.parse_name("index key name", true)?;
                self.expect(&TokenKind::Colon)?;
                let key_ty = self.parse_type()?;
                self.expect(&TokenKind::RBracket)?;
                self.expect(&TokenKind::Colon)?;
                let value = self.parse_type()?;
                return Ok(Member::Index {
                    key,
                    key_ty,
                    value,
                    span: start.to(self.prev_span()),
                });
            }
            TokenKind::LParen | TokenKind::Lt => {
                let sig = self.parse_signature()?;
                return Ok(Member::Call {
                    span: start.to(self.prev_span()),
                    sig,
                });
            }
            TokenKind::New if matches!(self.peek_nth(1), TokenKind::LParen | TokenKind::Lt) => {
                self.bump();
                let sig = self.parse_signature()?;
                return Ok(Member::Construct {
                    span: start.to(self.prev_span()),
                    sig,
                });
            }
            TokenKind::Ident(name) if name == "constructor" && *self.peek_nth(1) == TokenKind::LParen => {
                self.bump();
                let sig = self.parse_signature()?;
                return Ok(Member::Construct {
                    span: start.to(self.prev_span()),
                    sig,
                });
            }
            _ => {}
        }

        let name = self.parse_member_name()?;
        let optional = self.eat(&TokenKind::Question);

        if matches!(self.peek(), TokenKind::LParen | TokenKind::Lt) {
            let sig = self.parse_signature()?;
            return Ok(Member::Method {
                name,
                optional,
                is_static,
                sig,
                span: start.to(self.prev_span()),
            });
        }

        let ty = if self.eat(&TokenKind::Colon) {
            Some(self.parse_type()?)
        } else {
            None
        };
        Ok(Member::Property {
            name,
            optional,
            readonly,
            is_static,
            ty,
            span: start.to(self.prev_span()),
        })
    }

    /// Member names may be identifiers, keywords or quoted strings.
    fn parse_member_name(&mut self) -> ParserResult<Ident> {
        if let TokenKind::Str(value) = self.peek().clone() {
            let span = self.bump().span;
            return Ok(Ident::new(value, span));
        }
        self.parse_name("member name", true)
    }
}
