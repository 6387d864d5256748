//! Syntax trees for declaration catalogs and fixtures.
//!
//! - [`ty`] - type annotations, signatures and members
//! - [`decl`] - catalog declarations
//! - [`expr`] - fixture expressions
//! - [`stmt`] - fixture statements and directives

pub mod decl;
pub mod expr;
pub mod stmt;
pub mod ty;

pub use decl::{Decl, DeclFile, VarKind};
pub use expr::{ArrowBody, BinaryOp, Expr, ObjectProp, UnaryOp};
pub use stmt::{Directive, Fixture, ImportSpec, Stmt, StmtKind};
pub use ty::{Ident, KeywordType, Member, Param, Signature, TypeExpr};
