//! Declarations found in `.d.ts` catalog files.

use crate::ast::ty::{Ident, Member, Signature, TypeExpr};
use crate::span::{Span, Spanned};

/// Binding keyword of a variable declaration or statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    /// `const`
    Const,
    /// `let`
    Let,
    /// `var`
    Var,
}

/// A top-level or namespaced declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    /// `interface Name<T> extends A, B { ... }`
    Interface {
        /// Interface name
        name: Ident,
        /// Type parameters
        type_params: Vec<Ident>,
        /// Base interfaces
        extends: Vec<TypeExpr>,
        /// Members
        members: Vec<Member>,
        /// Source location
        span: Span,
    },

    /// `class Name<T> extends Base implements I { ... }`
    Class {
        /// Class name
        name: Ident,
        /// Type parameters
        type_params: Vec<Ident>,
        /// Base class
        extends: Option<TypeExpr>,
        /// Implemented interfaces (checked for existence only)
        implements: Vec<TypeExpr>,
        /// Members, including constructors and statics
        members: Vec<Member>,
        /// Source location
        span: Span,
    },

    /// `type Name<T> = T;`
    TypeAlias {
        /// Alias name
        name: Ident,
        /// Type parameters
        type_params: Vec<Ident>,
        /// Aliased type
        ty: TypeExpr,
        /// Source location
        span: Span,
    },

    /// `declare function name(params): R;`
    Function {
        /// Function name
        name: Ident,
        /// Signature
        sig: Signature,
        /// Source location
        span: Span,
    },

    /// `declare const name: T;`
    Variable {
        /// Binding keyword
        kind: VarKind,
        /// Variable name
        name: Ident,
        /// Declared type; `any` when omitted
        ty: Option<TypeExpr>,
        /// Source location
        span: Span,
    },

    /// `namespace Name { ... }`
    Namespace {
        /// Namespace name
        name: Ident,
        /// Nested declarations
        body: Vec<Decl>,
        /// Source location
        span: Span,
    },
}

impl Decl {
    /// The declared name.
    #[must_use]
    pub fn name(&self) -> &Ident {
        match self {
            Self::Interface { name, .. }
            | Self::Class { name, .. }
            | Self::TypeAlias { name, .. }
            | Self::Function { name, .. }
            | Self::Variable { name, .. }
            | Self::Namespace { name, .. } => name,
        }
    }
}

impl Spanned for Decl {
    fn span(&self) -> Span {
        match self {
            Self::Interface { span, .. }
            | Self::Class { span, .. }
            | Self::TypeAlias { span, .. }
            | Self::Function { span, .. }
            | Self::Variable { span, .. }
            | Self::Namespace { span, .. } => *span,
        }
    }
}

/// A parsed declaration file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DeclFile {
    /// Declarations in source order
    pub decls: Vec<Decl>,
}
