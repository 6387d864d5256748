//! Tokens shared by the declaration and fixture grammars.

use crate::span::{Span, Spanned};
use std::fmt;

/// The kind of a token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // ===== Keywords =====
    /// `interface`
    Interface,
    /// `class`
    Class,
    /// `type`
    Type,
    /// `declare`
    Declare,
    /// `function`
    Function,
    /// `const`
    Const,
    /// `let`
    Let,
    /// `var`
    Var,
    /// `namespace`
    Namespace,
    /// `export`
    Export,
    /// `import`
    Import,
    /// `from`
    From,
    /// `default`
    Default,
    /// `extends`
    Extends,
    /// `implements`
    Implements,
    /// `new`
    New,
    /// `readonly`
    Readonly,
    /// `static`
    Static,
    /// `abstract`
    Abstract,
    /// `if`
    If,
    /// `else`
    Else,
    /// `return`
    Return,
    /// `as`
    As,
    /// `this`
    This,
    /// `void`
    Void,
    /// `null`
    Null,
    /// `undefined`
    Undefined,
    /// `true`
    True,
    /// `false`
    False,

    // ===== Literals =====
    /// Identifier
    Ident(String),
    /// String literal, escapes already processed
    Str(String),
    /// Numeric literal
    Num(f64),

    // ===== Operators =====
    /// `=`
    Eq,
    /// `==`
    EqEq,
    /// `===`
    EqEqEq,
    /// `!=`
    BangEq,
    /// `!==`
    BangEqEq,
    /// `!`
    Bang,
    /// `&&`
    AmpAmp,
    /// `||`
    PipePipe,
    /// `|`
    Pipe,
    /// `&`
    Amp,
    /// `=>`
    FatArrow,
    /// `?`
    Question,
    /// `...`
    Ellipsis,
    /// `<`
    Lt,
    /// `>`
    Gt,

    // ===== Delimiters =====
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `.`
    Dot,
    /// `,`
    Comma,
    /// `:`
    Colon,
    /// `;`
    Semi,

    // ===== Directives =====
    /// `// $ExpectType`, followed by type tokens and [`TokenKind::DirectiveEnd`]
    ExpectType,
    /// `// $ExpectError`
    ExpectError,
    /// End of a directive comment line
    DirectiveEnd,

    /// End of input
    EOF,
}

impl TokenKind {
    /// Maps a word to its keyword kind, or `None` for plain identifiers.
    #[must_use]
    pub fn keyword(word: &str) -> Option<Self> {
        let kind = match word {
            "interface" => Self::Interface,
            "class" => Self::Class,
            "type" => Self::Type,
            "declare" => Self::Declare,
            "function" => Self::Function,
            "const" => Self::Const,
            "let" => Self::Let,
            "var" => Self::Var,
            "namespace" => Self::Namespace,
            "export" => Self::Export,
            "import" => Self::Import,
            "from" => Self::From,
            "default" => Self::Default,
            "extends" => Self::Extends,
            "implements" => Self::Implements,
            "new" => Self::New,
            "readonly" => Self::Readonly,
            "static" => Self::Static,
            "abstract" => Self::Abstract,
            "if" => Self::If,
            "else" => Self::Else,
            "return" => Self::Return,
            "as" => Self::As,
            "this" => Self::This,
            "void" => Self::Void,
            "null" => Self::Null,
            "undefined" => Self::Undefined,
            "true" => Self::True,
            "false" => Self::False,
            _ => return None,
        };
        Some(kind)
    }

    /// Returns the source text of a keyword token.
    ///
    /// Keywords are valid property names (`{ type: string }`,
    /// `options.default`), so the parser asks for this when it needs a name.
    #[must_use]
    pub const fn keyword_text(&self) -> Option<&'static str> {
        let text = match self {
            Self::Interface => "interface",
            Self::Class => "class",
            Self::Type => "type",
            Self::Declare => "declare",
            Self::Function => "function",
            Self::Const => "const",
            Self::Let => "let",
            Self::Var => "var",
            Self::Namespace => "namespace",
            Self::Export => "export",
            Self::Import => "import",
            Self::From => "from",
            Self::Default => "default",
            Self::Extends => "extends",
            Self::Implements => "implements",
            Self::New => "new",
            Self::Readonly => "readonly",
            Self::Static => "static",
            Self::Abstract => "abstract",
            Self::If => "if",
            Self::Else => "else",
            Self::Return => "return",
            Self::As => "as",
            Self::This => "this",
            Self::Void => "void",
            Self::Null => "null",
            Self::Undefined => "undefined",
            Self::True => "true",
            Self::False => "false",
            _ => return None,
        };
        Some(text)
    }

    /// Returns `true` for the two directive-opening tokens.
    #[must_use]
    pub const fn is_directive(&self) -> bool {
        matches!(self, Self::ExpectType | Self::ExpectError | Self::DirectiveEnd)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(text) = self.keyword_text() {
            return f.write_str(text);
        }
        match self {
            Self::Ident(name) => f.write_str(name),
            Self::Str(value) => write!(f, "{value:?}"),
            Self::Num(value) => write!(f, "{value}"),
            Self::Eq => f.write_str("="),
            Self::EqEq => f.write_str("=="),
            Self::EqEqEq => f.write_str("==="),
            Self::BangEq => f.write_str("!="),
            Self::BangEqEq => f.write_str("!=="),
            Self::Bang => f.write_str("!"),
            Self::AmpAmp => f.write_str("&&"),
            Self::PipePipe => f.write_str("||"),
            Self::Pipe => f.write_str("|"),
            Self::Amp => f.write_str("&"),
            Self::FatArrow => f.write_str("=>"),
            Self::Question => f.write_str("?"),
            Self::Ellipsis => f.write_str("..."),
            Self::Lt => f.write_str("<"),
            Self::Gt => f.write_str(">"),
            Self::LParen => f.write_str("("),
            Self::RParen => f.write_str(")"),
            Self::LBrace => f.write_str("{"),
            Self::RBrace => f.write_str("}"),
            Self::LBracket => f.write_str("["),
            Self::RBracket => f.write_str("]"),
            Self::Dot => f.write_str("."),
            Self::Comma => f.write_str(","),
            Self::Colon => f.write_str(":"),
            Self::Semi => f.write_str(";"),
            Self::ExpectType => f.write_str("$ExpectType"),
            Self::ExpectError => f.write_str("$ExpectError"),
            Self::DirectiveEnd => f.write_str("end of directive"),
            Self::EOF => f.write_str("EOF"),
            _ => Ok(()),
        }
    }
}

/// A token with its location.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// What was lexed
    pub kind: TokenKind,
    /// Where it was lexed
    pub span: Span,
}

impl Token {
    /// Creates a token.
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

impl Spanned for Token {
    fn span(&self) -> Span {
        self.span
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_roundtrip() {
        for word in ["interface", "declare", "readonly", "undefined", "this", "as"] {
            let kind = TokenKind::keyword(word).unwrap();
            assert_eq!(kind.keyword_text(), Some(word));
        }
        assert_eq!(TokenKind::keyword("Worker"), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(TokenKind::FatArrow.to_string(), "=>");
        assert_eq!(TokenKind::Ident("send".into()).to_string(), "send");
        assert_eq!(TokenKind::Str("json".into()).to_string(), "\"json\"");
        assert_eq!(TokenKind::New.to_string(), "new");
    }
}
