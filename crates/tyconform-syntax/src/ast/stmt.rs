//! Statements and directives found in fixture files.

use crate::ast::decl::VarKind;
use crate::ast::expr::Expr;
use crate::ast::ty::{Ident, TypeExpr};
use crate::span::{Span, Spanned};

/// A `// $...` comment attached to the statement below it.
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    /// `// $ExpectType T`
    ExpectType {
        /// Expected type
        ty: TypeExpr,
        /// Location of the comment
        span: Span,
    },

    /// `// $ExpectError`
    ExpectError {
        /// Location of the comment
        span: Span,
    },
}

impl Spanned for Directive {
    fn span(&self) -> Span {
        match self {
            Self::ExpectType { span, .. } | Self::ExpectError { span } => *span,
        }
    }
}

/// One binding of an import: `Worker` or `Worker as W`.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportSpec {
    /// Name exported by the module (the local name for default imports)
    pub imported: Ident,
    /// Name bound in the fixture
    pub local: Ident,
}

/// Statement variants.
#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    /// `expr;`
    Expr(Expr),

    /// `const name: T = init;`
    Let {
        /// Binding keyword
        kind: VarKind,
        /// Bound name
        name: Ident,
        /// Annotation
        ty: Option<TypeExpr>,
        /// Initializer
        init: Option<Expr>,
    },

    /// `{ ... }`
    Block(Vec<Stmt>),

    /// `if (cond) then else otherwise`
    If {
        /// Condition
        cond: Expr,
        /// Then branch
        then_branch: Box<Stmt>,
        /// Else branch
        else_branch: Option<Box<Stmt>>,
    },

    /// `return value;` inside an arrow body
    Return(Option<Expr>),

    /// `import def, { a, b as c } from "module";`
    Import {
        /// Every imported binding
        names: Vec<ImportSpec>,
        /// Module specifier
        module: String,
    },
}

/// A statement with the directives written above it.
#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    /// What the statement is
    pub kind: StmtKind,
    /// Attached directives, in source order
    pub directives: Vec<Directive>,
    /// Source location (excluding directives)
    pub span: Span,
}

impl Stmt {
    /// Creates a statement without directives.
    #[must_use]
    pub const fn new(kind: StmtKind, span: Span) -> Self {
        Self {
            kind,
            directives: Vec::new(),
            span,
        }
    }
}

impl Spanned for Stmt {
    fn span(&self) -> Span {
        self.span
    }
}

/// A parsed fixture file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Fixture {
    /// Top-level statements in source order
    pub stmts: Vec<Stmt>,
}
