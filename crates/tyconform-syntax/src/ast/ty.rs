//! Type annotations and the signature/member shapes built from them.

use crate::span::{Span, Spanned};

/// An identifier with its location.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ident {
    /// Identifier text
    pub name: String,
    /// Source location
    pub span: Span,
}

impl Ident {
    /// Creates an identifier.
    #[must_use]
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

impl Spanned for Ident {
    fn span(&self) -> Span {
        self.span
    }
}

/// Built-in type keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordType {
    /// `string`
    String,
    /// `number`
    Number,
    /// `boolean`
    Boolean,
    /// `void`
    Void,
    /// `undefined`
    Undefined,
    /// `null`
    Null,
    /// `any`
    Any,
    /// `unknown`
    Unknown,
    /// `never`
    Never,
    /// `object`
    Object,
    /// `this`
    This,
}

impl KeywordType {
    /// Recognizes the keyword spellings that lex as plain identifiers.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let kw = match name {
            "string" => Self::String,
            "number" => Self::Number,
            "boolean" => Self::Boolean,
            "any" => Self::Any,
            "unknown" => Self::Unknown,
            "never" => Self::Never,
            "object" => Self::Object,
            _ => return None,
        };
        Some(kw)
    }
}

/// A type annotation.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    /// Built-in type: `string`, `void`, `this`, ...
    Keyword {
        /// Which keyword
        kind: KeywordType,
        /// Source location
        span: Span,
    },

    /// String literal type: `"advanced"`
    StringLit {
        /// Literal value
        value: String,
        /// Source location
        span: Span,
    },

    /// Number literal type: `1`
    NumberLit {
        /// Literal value
        value: f64,
        /// Source location
        span: Span,
    },

    /// Boolean literal type: `true`
    BoolLit {
        /// Literal value
        value: bool,
        /// Source location
        span: Span,
    },

    /// Named type, possibly qualified and generic: `NodeJS.Dict<Worker>`
    Ref {
        /// Name segments (`["NodeJS", "Dict"]`)
        path: Vec<Ident>,
        /// Type arguments
        args: Vec<TypeExpr>,
        /// Source location
        span: Span,
    },

    /// Array type: `string[]`
    Array {
        /// Element type
        elem: Box<TypeExpr>,
        /// Source location
        span: Span,
    },

    /// Union type: `"json" | "advanced"`
    Union {
        /// Members in source order
        members: Vec<TypeExpr>,
        /// Source location
        span: Span,
    },

    /// Function type: `(message: string) => void`
    Function {
        /// The call signature
        sig: Box<Signature>,
        /// Source location
        span: Span,
    },

    /// Object type literal: `{ keepOpen?: boolean }`
    Object {
        /// Members in source order
        members: Vec<Member>,
        /// Source location
        span: Span,
    },
}

impl TypeExpr {
    /// Joins the path of a [`TypeExpr::Ref`] with dots.
    #[must_use]
    pub fn ref_name(path: &[Ident]) -> String {
        path.iter()
            .map(|seg| seg.name.as_str())
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl Spanned for TypeExpr {
    fn span(&self) -> Span {
        match self {
            Self::Keyword { span, .. }
            | Self::StringLit { span, .. }
            | Self::NumberLit { span, .. }
            | Self::BoolLit { span, .. }
            | Self::Ref { span, .. }
            | Self::Array { span, .. }
            | Self::Union { span, .. }
            | Self::Function { span, .. }
            | Self::Object { span, .. } => *span,
        }
    }
}

/// A declared or arrow-function parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    /// Parameter name
    pub name: Ident,
    /// Declared with `?`
    pub optional: bool,
    /// Declared with `...`
    pub rest: bool,
    /// Annotation; may be absent on arrow-function parameters
    pub ty: Option<TypeExpr>,
    /// Source location
    pub span: Span,
}

/// A call signature: `<T>(a: T, b?: U): R`.
#[derive(Debug, Clone, PartialEq)]
pub struct Signature {
    /// Method-level type parameters
    pub type_params: Vec<Ident>,
    /// Parameters in order
    pub params: Vec<Param>,
    /// Return annotation; absent on constructors
    pub ret: Option<TypeExpr>,
    /// Source location
    pub span: Span,
}

/// A member of an interface, class or object type literal.
#[derive(Debug, Clone, PartialEq)]
pub enum Member {
    /// `name?: T`
    Property {
        /// Property name
        name: Ident,
        /// Declared with `?`
        optional: bool,
        /// Declared `readonly`
        readonly: bool,
        /// Declared `static` (classes only)
        is_static: bool,
        /// Property type; `any` when omitted
        ty: Option<TypeExpr>,
        /// Source location
        span: Span,
    },

    /// `name?(params): R`; repeated names are overloads
    Method {
        /// Method name
        name: Ident,
        /// Declared with `?`
        optional: bool,
        /// Declared `static` (classes only)
        is_static: bool,
        /// Signature
        sig: Signature,
        /// Source location
        span: Span,
    },

    /// `[key: string]: T`
    Index {
        /// Name of the key binding
        key: Ident,
        /// Key type (`string` or `number`)
        key_ty: TypeExpr,
        /// Value type
        value: TypeExpr,
        /// Source location
        span: Span,
    },

    /// `(params): R` call signature
    Call {
        /// Signature
        sig: Signature,
        /// Source location
        span: Span,
    },

    /// `new (params): R` in interfaces, `constructor(params)` in classes
    Construct {
        /// Signature
        sig: Signature,
        /// Source location
        span: Span,
    },
}

impl Spanned for Member {
    fn span(&self) -> Span {
        match self {
            Self::Property { span, .. }
            | Self::Method { span, .. }
            | Self::Index { span, .. }
            | Self::Call { span, .. }
            | Self::Construct { span, .. } => *span,
        }
    }
}
