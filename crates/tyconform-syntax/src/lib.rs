//! tyconform syntax: lexer, parser and AST for declaration and fixture files.
//!
//! This crate is the front end of the conformance checker:
//! - Lexical analysis, including `// $ExpectType` / `// $ExpectError`
//!   directives
//! - Parsing of `.d.ts` catalogs and `.ts` fixtures
//! - AST node definitions
//! - Source location tracking and diagnostic rendering
//!
//! # Modules
//!
//! - [`span`] - Source location tracking
//! - [`token`] - Token types and definitions
//! - [`lexer`] - Tokenizer
//! - [`parser`] - Recursive descent parser
//! - [`ast`] - Syntax trees
//! - [`error`] - Lexer and parser error types
//! - [`diagnostic`] - Diagnostics and the emitter
//! - [`source`] - Loaded source files
//!
//! # Examples
//!
//! ## Parsing a catalog
//!
//! ```
//! use tyconform_syntax::{parse_declarations, ast::Decl};
//!
//! let file = parse_declarations("interface Worker { isDead(): boolean; }").unwrap();
//! assert!(matches!(file.decls[0], Decl::Interface { .. }));
//! ```
//!
//! ## Lexing
//!
//! ```
//! use tyconform_syntax::{Lexer, TokenKind};
//!
//! let tokens = Lexer::new("worker!.send(\"test\")").lex().unwrap();
//! assert_eq!(tokens[1].kind, TokenKind::Bang);
//! ```

#![warn(missing_docs)]

pub mod ast;
pub mod diagnostic;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod source;
pub mod span;
pub mod token;

pub use diagnostic::{Diagnostic, DiagnosticBuilder, DiagnosticLevel, Emitter};
pub use error::{LexerError, LexerResult, ParserError, ParserResult, SyntaxError, SyntaxResult};
pub use lexer::Lexer;
pub use parser::{parse_declarations, parse_fixture, parse_type, Parser};
pub use source::{SourceFile, SourceKind};
pub use span::{LineCol, Span, Spanned};
pub use token::{Token, TokenKind};
