//! Statements, scopes and directives.

use super::Checker;
use crate::error::{Target, TypeError};
use crate::types::Ty;
use tyconform_log::trace;
use tyconform_syntax::ast::{Directive, ImportSpec, Stmt, StmtKind, VarKind};

impl Checker<'_> {
    /// Checks one statement and applies the directives attached to it.
    pub(super) fn check_stmt(&mut self, stmt: &Stmt) {
        trace!(line = stmt.span.start_line, "checking statement");
        let mark = self.errors.len();
        let ty = self.check_stmt_kind(stmt);

        for directive in &stmt.directives {
            if let Directive::ExpectError { span } = directive {
                if self.errors.len() == mark {
                    self.error(TypeError::UnusedExpectError { span: *span });
                } else {
                    self.errors.truncate(mark);
                }
            }
        }

        for directive in &stmt.directives {
            if let Directive::ExpectType { ty: annotation, .. } = directive {
                let expected = self.resolve_type(annotation);
                if ty.contains_error() || expected.contains_error() {
                    continue;
                }
                if let Err(err) = self.compare_expectation(&ty, &expected, stmt.span) {
                    self.error(err);
                }
            }
        }
    }

    /// Checks a statement and returns the type `$ExpectType` compares: the
    /// value of an expression statement, the bound type of a binding,
    /// `void` otherwise.
    fn check_stmt_kind(&mut self, stmt: &Stmt) -> Ty {
        match &stmt.kind {
            StmtKind::Expr(expr) => self.synth_expr(expr),

            StmtKind::Let {
                kind,
                name,
                ty,
                init,
            } => {
                let declared = ty.as_ref().map(|ty| self.resolve_type(ty));
                let bound = match (declared, init) {
                    (Some(declared), Some(init)) => {
                        self.check_against(init, &declared, &Target::Binding(name.name.clone()));
                        declared
                    }
                    (Some(declared), None) => declared,
                    (None, Some(init)) => {
                        let ty = self.synth_expr(init);
                        match kind {
                            VarKind::Const => ty,
                            VarKind::Let | VarKind::Var => ty.widen(),
                        }
                    }
                    (None, None) => Ty::Any,
                };
                self.env.bind(name.name.clone(), bound.clone());
                bound
            }

            StmtKind::Block(stmts) => {
                self.env.new_scope();
                for stmt in stmts {
                    self.check_stmt(stmt);
                }
                self.env.pop_scope();
                Ty::VOID
            }

            StmtKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                self.synth_expr(cond);
                let narrowed = self.truthy_narrowing(cond);

                self.env.new_scope();
                for (name, ty) in narrowed {
                    self.env.bind(name, ty);
                }
                self.check_stmt(then_branch);
                self.env.pop_scope();

                if let Some(else_branch) = else_branch {
                    self.env.new_scope();
                    self.check_stmt(else_branch);
                    self.env.pop_scope();
                }
                Ty::VOID
            }

            StmtKind::Return(value) => {
                let declared = match self.returns.last() {
                    Some(frame) => frame.declared.clone(),
                    None => {
                        self.error(TypeError::ReturnOutsideFunction { span: stmt.span });
                        if let Some(value) = value {
                            self.synth_expr(value);
                        }
                        return Ty::VOID;
                    }
                };

                match (value, declared) {
                    (Some(value), Some(declared)) => self.check_against(value, &declared, &Target::Return),
                    (Some(value), None) => {
                        let ty = self.synth_expr(value).widen();
                        if let Some(frame) = self.returns.last_mut() {
                            frame.found.push(ty);
                        }
                    }
                    (None, _) => {
                        if let Some(frame) = self.returns.last_mut() {
                            frame.found.push(Ty::VOID);
                        }
                    }
                }
                Ty::VOID
            }

            StmtKind::Import { names, module } => {
                trace!(%module, names = names.len(), "import");
                for spec in names {
                    self.import(spec);
                }
                Ty::VOID
            }
        }
    }

    /// Binds an imported value. Type-only imports only need to exist.
    fn import(&mut self, spec: &ImportSpec) {
        let name = &spec.imported.name;
        if let Some(value) = self.catalog.value(name) {
            let ty = value.ty.clone();
            self.env.bind(spec.local.name.clone(), ty);
        } else if self.catalog.type_def(name).is_none() {
            self.error(TypeError::UnknownName {
                name: name.clone(),
                span: spec.imported.span,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::Checker;
    use crate::catalog::Catalog;
    use crate::error::TypeError;
    use crate::options::CheckOptions;
    use tyconform_syntax::{parse_declarations, parse_fixture};

    const DECLS: &str = r#"
        interface Worker { id: number; isDead(): boolean; disconnect(): this; }
        interface Cluster { worker?: Worker; isPrimary: boolean; fork(env?: any): Worker; }
        declare const cluster: Cluster;
    "#;

    fn run(source: &str) -> Vec<TypeError> {
        let decls = parse_declarations(DECLS).unwrap();
        let (catalog, errors) = Catalog::builder().file(&decls).build();
        assert!(errors.is_empty(), "{errors:?}");
        let fixture = parse_fixture(source).unwrap();
        Checker::new(&catalog, CheckOptions::default()).check_fixture(&fixture)
    }

    fn kinds(errors: &[TypeError]) -> Vec<&'static str> {
        errors.iter().map(TypeError::kind).collect()
    }

    #[test]
    fn test_expect_type_passes() {
        let errors = run(
            "// $ExpectType boolean\ncluster.isPrimary;\n\
             // $ExpectType Worker | undefined\ncluster.worker;\n\
             // $ExpectType Worker\ncluster.fork().disconnect();",
        );
        assert!(errors.is_empty(), "{errors:?}");
    }

    #[test]
    fn test_expect_type_mismatch() {
        let errors = run("// $ExpectType string\ncluster.isPrimary;");
        assert!(matches!(
            errors.as_slice(),
            [TypeError::ExpectationMismatch { expected, found, .. }] if expected == "string" && found == "boolean"
        ));
    }

    #[test]
    fn test_expect_type_on_binding() {
        let errors = run(
            "// $ExpectType \"a\"\nconst a = \"a\";\n\
             // $ExpectType string\nlet b = \"b\";",
        );
        assert!(errors.is_empty(), "{errors:?}");
    }

    #[test]
    fn test_expect_error_consumes_errors() {
        let errors = run("// $ExpectError\ncluster.fork(1, 2);");
        assert!(errors.is_empty(), "{errors:?}");
    }

    #[test]
    fn test_unused_expect_error() {
        let errors = run("// $ExpectError\ncluster.fork();");
        assert_eq!(kinds(&errors), ["UnusedExpectError"]);
    }

    #[test]
    fn test_annotated_binding_checked() {
        let errors = run("const w: Worker = cluster.worker;");
        assert!(matches!(
            errors.as_slice(),
            [TypeError::TypeMismatch { target, .. }] if target.name() == Some("w")
        ));
    }

    #[test]
    fn test_block_scoping() {
        let errors = run("{ const w = cluster.fork(); }\nw.id;");
        assert_eq!(kinds(&errors), ["UnknownName"]);
    }

    #[test]
    fn test_if_narrowing() {
        let errors = run(
            "const w = cluster.worker;\n\
             if (w) { w.id; }\n\
             if (w && w.isDead()) { w.disconnect(); }",
        );
        assert!(errors.is_empty(), "{errors:?}");

        let errors = run("const w = cluster.worker;\nif (cluster.isPrimary) { w.id; }");
        assert_eq!(kinds(&errors), ["PossiblyUndefined"]);
    }

    #[test]
    fn test_return_outside_function() {
        let errors = run("return 1;");
        assert_eq!(kinds(&errors), ["ReturnOutsideFunction"]);
        assert_eq!(errors[0].code(), "TC2012");
    }

    #[test]
    fn test_arrow_block_returns() {
        let errors = run(
            "const f = (w: Worker) => { if (w.isDead()) { return 1; } return 2; };\n\
             // $ExpectType number\nf(cluster.fork());\n\
             const g = (): string => { return 1; };",
        );
        assert_eq!(kinds(&errors), ["TypeMismatch"]);
    }

    #[test]
    fn test_imports() {
        let errors = run(
            "import cluster, { Worker, Missing } from \"node:cluster\";\n\
             import { cluster as c } from \"node:cluster\";\n\
             c.fork();",
        );
        assert!(matches!(
            errors.as_slice(),
            [TypeError::UnknownName { name, .. }] if name == "Missing"
        ));
    }

    #[test]
    fn test_checking_continues_after_errors() {
        let errors = run("cluster.nope;\ncluster.fork(\"a\", \"b\");\nmissing;");
        assert_eq!(kinds(&errors), ["UnknownMember", "ArgumentCount", "UnknownName"]);
    }
}
