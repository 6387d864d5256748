//! tyconform checker: declaration catalogs and call-site conformance.
//!
//! This crate provides the semantic half of the conformance checker:
//! - Lowering parsed declarations into a merged [`Catalog`]
//! - Structural assignability between types
//! - Overload resolution and argument checking at call sites
//! - Option-object validation (excess and mistyped properties)
//! - `$ExpectType` / `$ExpectError` fixture directives
//!
//! # Example
//!
//! ```
//! use tyconform_check::{Catalog, Checker, CheckOptions};
//! use tyconform_syntax::{parse_declarations, parse_fixture};
//!
//! let decls = parse_declarations(
//!     "interface Settings { serialization?: \"json\" | \"advanced\"; }
//!      declare function setup(settings?: Settings): void;",
//! )
//! .unwrap();
//! let (catalog, errors) = Catalog::builder().file(&decls).build();
//! assert!(errors.is_empty());
//!
//! let fixture = parse_fixture("setup({ serialization: \"xml\" });").unwrap();
//! let errors = Checker::new(&catalog, CheckOptions::default()).check_fixture(&fixture);
//! assert_eq!(errors.len(), 1);
//! assert_eq!(errors[0].subject(), Some("serialization"));
//! ```

#![warn(missing_docs)]

pub mod assign;
pub mod catalog;
pub mod check;
pub mod context;
pub mod error;
pub mod options;
pub mod types;

pub use assign::is_assignable;
pub use catalog::{Catalog, CatalogBuilder, CatalogDiagnostic, TypeDef, ValueDef};
pub use check::{CallSite, Checker};
pub use error::{Target, TypeError, TypeResult};
pub use options::CheckOptions;
