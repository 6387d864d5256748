//! Call-site and expectation checking.
//!
//! The [`Checker`] walks fixture statements against an immutable
//! [`Catalog`]. It synthesizes expression types bottom-up and switches to
//! checking mode where a declared type is known: call arguments, annotated
//! bindings and object literals passed as configuration objects.
//!
//! Errors accumulate instead of stopping the walk. An expression whose type
//! cannot be determined gets the error type, which is compatible with
//! everything, so one mistake is reported once.
//!
//! # Directives
//!
//! - `// $ExpectError` consumes the errors of the next statement, and is
//!   itself an error when there are none.
//! - `// $ExpectType T` compares the canonical rendering of the statement's
//!   type with `T`.

mod call;
mod expr;
mod stmt;

use crate::assign::Relation;
use crate::catalog::Catalog;
use crate::error::TypeError;
use crate::options::CheckOptions;
use crate::types::{Signature, Ty};
use crate::context::TypeEnv;
use tyconform_log::debug;
use tyconform_syntax::ast::{Expr, Fixture, TypeExpr};
use tyconform_syntax::Span;

/// Concrete invocation: the argument expressions and the span of the call.
#[derive(Debug, Clone, Copy)]
pub struct CallSite<'a> {
    /// Positional arguments
    pub args: &'a [Expr],
    /// The whole call expression
    pub span: Span,
}

impl<'a> CallSite<'a> {
    /// Creates a call site.
    #[must_use]
    pub const fn new(args: &'a [Expr], span: Span) -> Self {
        Self { args, span }
    }
}

/// Return context of the arrow function being checked.
#[derive(Debug)]
struct ReturnFrame {
    declared: Option<Ty>,
    found: Vec<Ty>,
}

/// Type checker for fixtures.
pub struct Checker<'cat> {
    catalog: &'cat Catalog,
    options: CheckOptions,
    env: TypeEnv,
    returns: Vec<ReturnFrame>,
    errors: Vec<TypeError>,
}

impl<'cat> Checker<'cat> {
    /// Creates a checker over `catalog`.
    #[must_use]
    pub fn new(catalog: &'cat Catalog, options: CheckOptions) -> Self {
        Self {
            catalog,
            options,
            env: TypeEnv::new(),
            returns: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// The catalog being checked against.
    #[must_use]
    pub const fn catalog(&self) -> &'cat Catalog {
        self.catalog
    }

    /// Mutable access to the fixture scope, for binding names before
    /// checking expressions directly.
    pub fn env_mut(&mut self) -> &mut TypeEnv {
        &mut self.env
    }

    /// Checks every statement of a fixture and returns the errors found.
    pub fn check_fixture(&mut self, fixture: &Fixture) -> Vec<TypeError> {
        debug!(statements = fixture.stmts.len(), "checking fixture");
        for stmt in &fixture.stmts {
            self.check_stmt(stmt);
        }
        debug!(errors = self.errors.len(), "fixture checked");
        std::mem::take(&mut self.errors)
    }

    /// Checks a call site against one declared signature.
    ///
    /// Succeeds when every argument is assignable to its parameter and
    /// every required parameter has an argument. Otherwise returns each
    /// mismatch, naming the offending parameter.
    ///
    /// # Errors
    ///
    /// `TypeMismatch` (including missing required arguments) and
    /// `ArgumentCount`, plus any error found inside the arguments.
    pub fn check(&mut self, signature: &Signature, call: CallSite<'_>) -> Result<(), Vec<TypeError>> {
        let mark = self.errors.len();
        self.check_args(signature, call.args, call.span);
        let errors = self.errors.split_off(mark);
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Checks that the inferred type of `expr` equals `expected`.
    ///
    /// Types are compared by canonical rendering, after alias expansion.
    /// Errors found while inferring the type are not kept, so repeated
    /// calls give the same answer.
    ///
    /// # Errors
    ///
    /// `ExpectationMismatch` with both renderings.
    pub fn check_expectation(&mut self, expr: &Expr, expected: &Ty) -> Result<(), TypeError> {
        let mark = self.errors.len();
        let found = self.synth(expr);
        self.errors.truncate(mark);
        self.compare_expectation(&found, expected, tyconform_syntax::Spanned::span(expr))
    }

    /// Infers the type of an expression, recording errors.
    pub fn synth(&mut self, expr: &Expr) -> Ty {
        self.synth_expr(expr)
    }

    /// Lowers a fixture annotation, recording unknown names.
    pub fn resolve_type(&mut self, ty: &TypeExpr) -> Ty {
        let (ty, errors) = self.catalog.resolve_type(ty);
        self.errors.extend(errors);
        ty
    }

    /// Errors recorded so far.
    #[must_use]
    pub fn errors(&self) -> &[TypeError] {
        &self.errors
    }

    fn compare_expectation(&self, found: &Ty, expected: &Ty, span: Span) -> Result<(), TypeError> {
        let found = self.catalog.canonical(found).to_string();
        let expected = self.catalog.canonical(expected).to_string();
        if found == expected {
            Ok(())
        } else {
            Err(TypeError::ExpectationMismatch { expected, found, span })
        }
    }

    fn is_assignable(&self, source: &Ty, target: &Ty) -> bool {
        Relation::new(self.catalog).assignable(source, target)
    }

    fn error(&mut self, error: TypeError) {
        self.errors.push(error);
    }
}

/// Closest candidate within two edits of `name`.
fn similar_name<'a>(name: &str, candidates: impl Iterator<Item = &'a str>) -> Option<String> {
    candidates
        .map(|c| (edit_distance(name, c), c))
        .filter(|(d, _)| *d <= 2)
        .min_by_key(|(d, _)| *d)
        .map(|(_, c)| c.to_string())
}

fn edit_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.chars().enumerate() {
        let mut row = vec![i + 1; b.len() + 1];
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != *cb);
            row[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(row[j] + 1);
        }
        prev = row;
    }
    prev[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use tyconform_syntax::ast::StmtKind;
    use tyconform_syntax::{parse_declarations, parse_fixture};

    const DECLS: &str = r#"
        interface Worker { id: number; isDead(): boolean; }
        interface Cluster { worker?: Worker; fork(env?: any): Worker; }
        declare const cluster: Cluster;
        type Tree = { left: Tree; right: Tree; value: number };
        declare const tree: Tree;
    "#;

    fn catalog() -> Catalog {
        let decls = parse_declarations(DECLS).unwrap();
        let (catalog, errors) = Catalog::builder().file(&decls).build();
        assert!(errors.is_empty(), "{errors:?}");
        catalog
    }

    fn expr(source: &str) -> Expr {
        let mut fixture = parse_fixture(source).unwrap();
        match fixture.stmts.remove(0).kind {
            StmtKind::Expr(expr) => expr,
            other => panic!("expected an expression statement, got {other:?}"),
        }
    }

    #[test]
    fn test_check_expectation_matches_repeatably() {
        let catalog = catalog();
        let mut checker = Checker::new(&catalog, CheckOptions::default());
        let id = expr("cluster.fork().id;");

        let first = checker.check_expectation(&id, &Ty::NUMBER);
        let second = checker.check_expectation(&id, &Ty::NUMBER);
        assert_eq!(first, Ok(()));
        assert_eq!(first, second);
        assert!(checker.errors().is_empty());
    }

    #[test]
    fn test_check_expectation_mismatch_repeatably() {
        let catalog = catalog();
        let mut checker = Checker::new(&catalog, CheckOptions::default());
        let worker = expr("cluster.worker;");

        let first = checker.check_expectation(&worker, &Ty::named("Worker"));
        let second = checker.check_expectation(&worker, &Ty::named("Worker"));
        assert!(matches!(
            &first,
            Err(TypeError::ExpectationMismatch { expected, found, .. })
                if expected == "Worker" && found == "Worker | undefined"
        ));
        assert_eq!(first, second);
        assert!(checker.errors().is_empty());
    }

    #[test]
    fn test_check_expectation_drops_inference_errors() {
        let catalog = catalog();
        let mut checker = Checker::new(&catalog, CheckOptions::default());
        let access = expr("cluster.worker.id;");

        let first = checker.check_expectation(&access, &Ty::NUMBER);
        assert_eq!(first, checker.check_expectation(&access, &Ty::NUMBER));
        assert!(checker.errors().is_empty());
    }

    #[test]
    fn test_check_expectation_recursive_alias() {
        let catalog = catalog();
        let mut checker = Checker::new(&catalog, CheckOptions::default());

        assert_eq!(checker.check_expectation(&expr("tree;"), &Ty::named("Tree")), Ok(()));
        assert_eq!(checker.check_expectation(&expr("tree.left.right;"), &Ty::named("Tree")), Ok(()));
        assert!(checker.check_expectation(&expr("tree.value;"), &Ty::named("Tree")).is_err());
    }

    #[test]
    fn test_edit_distance() {
        assert_eq!(edit_distance("colour", "color"), 1);
        assert_eq!(edit_distance("", "cwd"), 3);
        assert_eq!(edit_distance("silent", "silent"), 0);
    }

    #[test]
    fn test_similar_name() {
        let keys = ["exec", "execArgv", "silent", "cwd"];
        assert_eq!(similar_name("sillent", keys.into_iter()), Some("silent".to_string()));
        assert_eq!(similar_name("colour", keys.into_iter()), None);
    }
}
