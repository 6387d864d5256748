//! Type checking errors.
//!
//! Every mismatch the catalog builder or the checker finds is a
//! [`TypeError`]. Errors carry the span they point at, a stable `TCxxxx`
//! code and the mismatch kind reported next to it, and convert into a
//! [`Diagnostic`] for rendering.

use crate::types::Ty;
use std::fmt;
use thiserror::Error;
use tyconform_syntax::{Diagnostic, DiagnosticBuilder, DiagnosticLevel, Span, Spanned};

/// What an incompatible value was being assigned to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// A call argument
    Parameter(String),
    /// A property of an object literal
    Property(String),
    /// An annotated `const`/`let` binding
    Binding(String),
    /// The returned value of an annotated arrow function
    Return,
    /// Anything else, such as an array element
    Value,
}

impl Target {
    /// The parameter, property or binding name, if there is one.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Parameter(name) | Self::Property(name) | Self::Binding(name) => Some(name),
            Self::Return | Self::Value => None,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parameter(name) => write!(f, "parameter '{name}'"),
            Self::Property(name) => write!(f, "property '{name}'"),
            Self::Binding(name) => write!(f, "variable '{name}'"),
            Self::Return => f.write_str("return type"),
            Self::Value => f.write_str("type"),
        }
    }
}

/// Type checking errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TypeError {
    /// Value not assignable to its declared type.
    #[error("type '{found}' is not assignable to {target} of type '{expected}'")]
    TypeMismatch {
        /// What was being assigned to
        target: Target,
        /// The declared type
        expected: Ty,
        /// The type of the value
        found: Ty,
        /// Source location of the value
        span: Span,
    },

    /// Required parameter without an argument.
    #[error("missing argument for parameter '{param}' of type '{expected}'")]
    MissingArgument {
        /// Parameter name
        param: String,
        /// Parameter type
        expected: Ty,
        /// Source location of the call
        span: Span,
    },

    /// Object literal lacks a required property.
    #[error("property '{name}' is missing but required by type '{target}'")]
    MissingProperty {
        /// Property name
        name: String,
        /// The object type the literal is checked against
        target: Ty,
        /// Source location of the literal
        span: Span,
    },

    /// `$ExpectType` annotation differs from the inferred type.
    #[error("expected type '{expected}', found '{found}'")]
    ExpectationMismatch {
        /// Canonical rendering of the annotation
        expected: String,
        /// Canonical rendering of the inferred type
        found: String,
        /// Source location of the expression
        span: Span,
    },

    /// Object literal key the target type does not declare.
    #[error("'{key}' does not exist in type '{ty}'")]
    UnknownOption {
        /// The undeclared key
        key: String,
        /// The object type the literal is checked against
        ty: Ty,
        /// A declared key with a similar spelling
        suggestion: Option<String>,
        /// Source location of the key
        span: Span,
    },

    /// Too many arguments.
    #[error("expected {expected} arguments, found {found}")]
    ArgumentCount {
        /// Accepted arity, e.g. `1-2`
        expected: String,
        /// Number of arguments passed
        found: usize,
        /// Source location of the first surplus argument
        span: Span,
    },

    /// Name not found in scope, catalog values or catalog types.
    #[error("cannot find name '{name}'")]
    UnknownName {
        /// The unresolved name
        name: String,
        /// Source location
        span: Span,
    },

    /// Property access on a type without that property.
    #[error("property '{name}' does not exist on type '{ty}'")]
    UnknownMember {
        /// Property name
        name: String,
        /// The receiver type
        ty: Ty,
        /// Source location of the property name
        span: Span,
    },

    /// Member access on a value that may be `null` or `undefined`.
    #[error("'{expr}' is possibly undefined")]
    PossiblyUndefined {
        /// The receiver expression
        expr: String,
        /// Source location of the receiver
        span: Span,
    },

    /// Call on a value without call signatures.
    #[error("type '{ty}' has no call signatures")]
    NotCallable {
        /// The callee type
        ty: Ty,
        /// Source location of the callee
        span: Span,
    },

    /// `new` on a value without construct signatures.
    #[error("type '{ty}' has no construct signatures")]
    NotConstructible {
        /// The callee type
        ty: Ty,
        /// Source location of the callee
        span: Span,
    },

    /// Second declaration of a type alias, class or variable.
    #[error("duplicate declaration '{name}'")]
    DuplicateDeclaration {
        /// The declared name
        name: String,
        /// Where the first declaration is
        previous: Span,
        /// Source location of the duplicate
        span: Span,
    },

    /// Interface or class whose base chain leads back to itself.
    #[error("'{name}' recursively extends itself through '{base}'")]
    CyclicBase {
        /// The type whose `extends` clause closes the cycle
        name: String,
        /// The base named in that clause
        base: String,
        /// Source location of the declaration
        span: Span,
    },

    /// `$ExpectError` on a statement that checked cleanly.
    #[error("expected an error, but the statement has none")]
    UnusedExpectError {
        /// Source location of the directive
        span: Span,
    },

    /// `return` at fixture top level.
    #[error("return outside function")]
    ReturnOutsideFunction {
        /// Source location
        span: Span,
    },
}

impl TypeError {
    /// Stable diagnostic code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::TypeMismatch { .. } | Self::MissingArgument { .. } | Self::MissingProperty { .. } => "TC2001",
            Self::ExpectationMismatch { .. } => "TC2002",
            Self::UnknownOption { .. } => "TC2003",
            Self::ArgumentCount { .. } => "TC2004",
            Self::UnknownName { .. } => "TC2005",
            Self::UnknownMember { .. } => "TC2006",
            Self::PossiblyUndefined { .. } => "TC2007",
            Self::NotCallable { .. } => "TC2008",
            Self::NotConstructible { .. } => "TC2009",
            Self::DuplicateDeclaration { .. } => "TC2010",
            Self::UnusedExpectError { .. } => "TC2011",
            Self::ReturnOutsideFunction { .. } => "TC2012",
            Self::CyclicBase { .. } => "TC2013",
        }
    }

    /// Mismatch kind. A missing argument or property is a `TypeMismatch` on
    /// that parameter or property.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::TypeMismatch { .. } | Self::MissingArgument { .. } | Self::MissingProperty { .. } => {
                "TypeMismatch"
            }
            Self::ExpectationMismatch { .. } => "ExpectationMismatch",
            Self::UnknownOption { .. } => "UnknownOption",
            Self::ArgumentCount { .. } => "ArgumentCount",
            Self::UnknownName { .. } => "UnknownName",
            Self::UnknownMember { .. } => "UnknownMember",
            Self::PossiblyUndefined { .. } => "PossiblyUndefined",
            Self::NotCallable { .. } => "NotCallable",
            Self::NotConstructible { .. } => "NotConstructible",
            Self::DuplicateDeclaration { .. } => "DuplicateDeclaration",
            Self::UnusedExpectError { .. } => "UnusedExpectError",
            Self::ReturnOutsideFunction { .. } => "ReturnOutsideFunction",
            Self::CyclicBase { .. } => "CyclicBase",
        }
    }

    /// The parameter or property a mismatch is about.
    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        match self {
            Self::TypeMismatch { target, .. } => target.name(),
            Self::MissingArgument { param, .. } => Some(param),
            Self::MissingProperty { name, .. } => Some(name),
            Self::UnknownOption { key, .. } => Some(key),
            _ => None,
        }
    }

    /// Builds the diagnostic for this error.
    #[must_use]
    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut builder = DiagnosticBuilder::new(DiagnosticLevel::Error, self.to_string(), self.span())
            .code(self.code())
            .kind(self.kind());

        match self {
            Self::UnknownOption {
                suggestion: Some(suggestion),
                ..
            } => {
                builder = builder.suggest(format!("did you mean '{suggestion}'?"));
            }
            Self::DuplicateDeclaration { previous, .. } => {
                builder = builder.note("first declared here", *previous);
            }
            Self::PossiblyUndefined { expr, .. } => {
                builder = builder.suggest(format!("check '{expr}' first or assert it with '{expr}!'"));
            }
            _ => {}
        }

        builder.build()
    }
}

impl Spanned for TypeError {
    fn span(&self) -> Span {
        match self {
            Self::TypeMismatch { span, .. }
            | Self::MissingArgument { span, .. }
            | Self::MissingProperty { span, .. }
            | Self::ExpectationMismatch { span, .. }
            | Self::UnknownOption { span, .. }
            | Self::ArgumentCount { span, .. }
            | Self::UnknownName { span, .. }
            | Self::UnknownMember { span, .. }
            | Self::PossiblyUndefined { span, .. }
            | Self::NotCallable { span, .. }
            | Self::NotConstructible { span, .. }
            | Self::DuplicateDeclaration { span, .. }
            | Self::CyclicBase { span, .. }
            | Self::UnusedExpectError { span }
            | Self::ReturnOutsideFunction { span } => *span,
        }
    }
}

impl From<&TypeError> for Diagnostic {
    fn from(error: &TypeError) -> Self {
        error.to_diagnostic()
    }
}

/// Result type for type checking operations.
pub type TypeResult<T> = Result<T, TypeError>;
