//! Expressions found in fixture files.

use crate::ast::stmt::Stmt;
use crate::ast::ty::{Ident, Param, TypeExpr};
use crate::span::{Span, Spanned};

/// Prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// Logical not: `!x`
    Not,
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// `&&`
    And,
    /// `||`
    Or,
    /// `==` / `===`
    Eq,
    /// `!=` / `!==`
    NotEq,
}

impl BinaryOp {
    /// Binding power; higher binds tighter.
    #[must_use]
    pub const fn precedence(self) -> u8 {
        match self {
            Self::Or => 1,
            Self::And => 2,
            Self::Eq | Self::NotEq => 3,
        }
    }
}

/// A property in an object literal: `key: value` or shorthand `key`.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectProp {
    /// Property key
    pub key: Ident,
    /// Property value; shorthand properties hold an identifier expression
    pub value: Expr,
    /// Source location
    pub span: Span,
}

/// Body of an arrow function.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrowBody {
    /// `x => x.isDead()`
    Expr(Box<Expr>),
    /// `x => { ... }`
    Block {
        /// Statements of the block
        stmts: Vec<Stmt>,
        /// Source location
        span: Span,
    },
}

/// An expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// `"test"`
    Str {
        /// Literal value
        value: String,
        /// Source location
        span: Span,
    },

    /// `1`
    Num {
        /// Literal value
        value: f64,
        /// Source location
        span: Span,
    },

    /// `true` / `false`
    Bool {
        /// Literal value
        value: bool,
        /// Source location
        span: Span,
    },

    /// `null`
    Null {
        /// Source location
        span: Span,
    },

    /// `undefined`
    Undefined {
        /// Source location
        span: Span,
    },

    /// Variable reference
    Ident(Ident),

    /// `object.property`
    Member {
        /// Receiver
        object: Box<Expr>,
        /// Property name
        property: Ident,
        /// Source location
        span: Span,
    },

    /// `object[index]`
    Index {
        /// Receiver
        object: Box<Expr>,
        /// Index expression
        index: Box<Expr>,
        /// Source location
        span: Span,
    },

    /// `callee(args)`
    Call {
        /// Called expression
        callee: Box<Expr>,
        /// Arguments
        args: Vec<Expr>,
        /// Source location
        span: Span,
    },

    /// `new Callee(args)`
    New {
        /// Constructed expression
        callee: Box<Expr>,
        /// Arguments
        args: Vec<Expr>,
        /// Source location
        span: Span,
    },

    /// `(a: T, b) => body`
    Arrow {
        /// Parameters, possibly unannotated
        params: Vec<Param>,
        /// Return annotation
        ret: Option<TypeExpr>,
        /// Body
        body: ArrowBody,
        /// Source location
        span: Span,
    },

    /// `{ key: value }`
    Object {
        /// Properties in source order
        props: Vec<ObjectProp>,
        /// Source location
        span: Span,
    },

    /// `[a, b]`
    Array {
        /// Elements
        elements: Vec<Expr>,
        /// Source location
        span: Span,
    },

    /// `expr!`
    NonNull {
        /// Asserted expression
        expr: Box<Expr>,
        /// Source location
        span: Span,
    },

    /// `expr as T`
    As {
        /// Asserted expression
        expr: Box<Expr>,
        /// Target type
        ty: TypeExpr,
        /// Source location
        span: Span,
    },

    /// `!expr`
    Unary {
        /// Operator
        op: UnaryOp,
        /// Operand
        operand: Box<Expr>,
        /// Source location
        span: Span,
    },

    /// `left op right`
    Binary {
        /// Operator
        op: BinaryOp,
        /// Left operand
        left: Box<Expr>,
        /// Right operand
        right: Box<Expr>,
        /// Source location
        span: Span,
    },
}

impl Expr {
    /// Short human label for the expression, used in diagnostics.
    ///
    /// Calls and member chains render as `worker.send`, anything else as a
    /// kind description.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Ident(ident) => ident.name.clone(),
            Self::Member {
                object, property, ..
            } => format!("{}.{}", object.describe(), property.name),
            Self::NonNull { expr, .. } => expr.describe(),
            Self::Call { callee, .. } => format!("{}(...)", callee.describe()),
            Self::New { callee, .. } => format!("new {}(...)", callee.describe()),
            Self::Index { object, .. } => format!("{}[...]", object.describe()),
            Self::Str { .. } | Self::Num { .. } | Self::Bool { .. } => "literal".to_string(),
            Self::Null { .. } => "null".to_string(),
            Self::Undefined { .. } => "undefined".to_string(),
            Self::Arrow { .. } => "arrow function".to_string(),
            Self::Object { .. } => "object literal".to_string(),
            Self::Array { .. } => "array literal".to_string(),
            Self::As { expr, .. } => expr.describe(),
            Self::Unary { .. } | Self::Binary { .. } => "expression".to_string(),
        }
    }
}

impl Spanned for Expr {
    fn span(&self) -> Span {
        match self {
            Self::Ident(ident) => ident.span,
            Self::Str { span, .. }
            | Self::Num { span, .. }
            | Self::Bool { span, .. }
            | Self::Null { span }
            | Self::Undefined { span }
            | Self::Member { span, .. }
            | Self::Index { span, .. }
            | Self::Call { span, .. }
            | Self::New { span, .. }
            | Self::Arrow { span, .. }
            | Self::Object { span, .. }
            | Self::Array { span, .. }
            | Self::NonNull { span, .. }
            | Self::As { span, .. }
            | Self::Unary { span, .. }
            | Self::Binary { span, .. } => *span,
        }
    }
}
