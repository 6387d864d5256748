//! Expression typing: synthesis and contextual checking.

use super::{similar_name, Checker, ReturnFrame};
use crate::error::{Target, TypeError};
use crate::types::{Lit, ObjectShape, ParamTy, PropTy, Signature, Ty};
use tyconform_log::trace;
use tyconform_syntax::ast::{ArrowBody, BinaryOp, Expr, Ident, ObjectProp, Param, TypeExpr, UnaryOp};
use tyconform_syntax::{Span, Spanned};

impl Checker<'_> {
    /// Infers the type of `expr`.
    pub(super) fn synth_expr(&mut self, expr: &Expr) -> Ty {
        let ty = match expr {
            Expr::Str { value, .. } => Ty::Literal(Lit::Str(value.clone())),
            Expr::Num { value, .. } => Ty::Literal(Lit::Num(*value)),
            Expr::Bool { value, .. } => Ty::Literal(Lit::Bool(*value)),
            Expr::Null { .. } => Ty::NULL,
            Expr::Undefined { .. } => Ty::UNDEFINED,

            Expr::Ident(ident) => self.lookup(ident),

            Expr::Member {
                object, property, ..
            } => {
                let object_ty = self.synth_expr(object);
                self.member(&object_ty, object, property)
            }

            Expr::Index { object, index, .. } => {
                let object_ty = self.synth_expr(object);
                self.synth_expr(index);
                self.index(&object_ty)
            }

            Expr::Call { callee, args, span } => {
                let callee_ty = self.synth_expr(callee);
                self.call(&callee_ty, callee, args, *span)
            }

            Expr::New { callee, args, span } => {
                let callee_ty = self.synth_expr(callee);
                self.construct(&callee_ty, callee, args, *span)
            }

            Expr::Arrow {
                params, ret, body, ..
            } => self.arrow(params, ret.as_ref(), body, None),

            Expr::Object { props, .. } => {
                let mut shape = ObjectShape::default();
                for prop in props {
                    let ty = self.synth_expr(&prop.value).widen();
                    shape.insert(PropTy {
                        name: prop.key.name.clone(),
                        ty,
                        optional: false,
                        readonly: false,
                    });
                }
                Ty::Object(Box::new(shape))
            }

            Expr::Array { elements, .. } => {
                if elements.is_empty() {
                    Ty::Array(Box::new(Ty::Any))
                } else {
                    let elems: Vec<Ty> = elements.iter().map(|e| self.synth_expr(e).widen()).collect();
                    Ty::Array(Box::new(Ty::union(elems)))
                }
            }

            Expr::NonNull { expr, .. } => {
                let ty = self.synth_expr(expr);
                match ty.non_nullish() {
                    Ty::Never => Ty::Error,
                    ty => ty,
                }
            }

            Expr::As { expr, ty, .. } => {
                self.synth_expr(expr);
                self.resolve_type(ty)
            }

            Expr::Unary {
                op: UnaryOp::Not,
                operand,
                ..
            } => {
                self.synth_expr(operand);
                Ty::BOOLEAN
            }

            Expr::Binary {
                op, left, right, ..
            } => self.binary(*op, left, right),
        };
        trace!(expr = %expr.describe(), %ty, "synthesized");
        ty
    }

    fn lookup(&mut self, ident: &Ident) -> Ty {
        if let Some(ty) = self.env.lookup(&ident.name) {
            return ty.clone();
        }
        if ident.name == "this" {
            return Ty::Any;
        }
        if let Some(value) = self.catalog.value(&ident.name) {
            return value.ty.clone();
        }
        self.error(TypeError::UnknownName {
            name: ident.name.clone(),
            span: ident.span,
        });
        Ty::Error
    }

    /// Type of `object.property` given the object's type.
    pub(super) fn member(&mut self, object_ty: &Ty, object: &Expr, property: &Ident) -> Ty {
        if object_ty.is_any_like() {
            return object_ty.clone();
        }

        let receiver = if object_ty.is_possibly_nullish() {
            if self.options.strict_null_checks {
                self.error(TypeError::PossiblyUndefined {
                    expr: object.describe(),
                    span: object.span(),
                });
            }
            match object_ty.non_nullish() {
                Ty::Never => return Ty::Error,
                ty => ty,
            }
        } else {
            object_ty.clone()
        };

        let mut found = Vec::new();
        for member in receiver.members() {
            if member.is_any_like() {
                return member.clone();
            }
            let prop = self
                .catalog
                .shape_of(&self.catalog.expand_alias(member))
                .and_then(|shape| shape.prop(&property.name).cloned());
            match prop {
                Some(prop) => found.push(prop.read_ty().replace_this(member)),
                None => {
                    self.error(TypeError::UnknownMember {
                        name: property.name.clone(),
                        ty: member.clone(),
                        span: property.span,
                    });
                    return Ty::Error;
                }
            }
        }
        Ty::union(found)
    }

    /// Type of `object[key]`: the array element or index signature type.
    fn index(&mut self, object_ty: &Ty) -> Ty {
        match self.catalog.expand_alias(object_ty) {
            Ty::Array(elem) => *elem,
            ty if ty.is_any_like() => ty,
            ty => self
                .catalog
                .shape_of(&ty)
                .and_then(|shape| shape.index)
                .unwrap_or(Ty::Any),
        }
    }

    fn binary(&mut self, op: BinaryOp, left: &Expr, right: &Expr) -> Ty {
        match op {
            BinaryOp::And => {
                let left_ty = self.synth_expr(left);
                let narrowed = self.truthy_narrowing(left);
                self.env.new_scope();
                for (name, ty) in narrowed {
                    self.env.bind(name, ty);
                }
                let right_ty = self.synth_expr(right);
                self.env.pop_scope();
                Ty::union([left_ty.nullish_part(), right_ty])
            }
            BinaryOp::Or => {
                let left_ty = self.synth_expr(left);
                let right_ty = self.synth_expr(right);
                Ty::union([left_ty.non_nullish(), right_ty])
            }
            BinaryOp::Eq | BinaryOp::NotEq => {
                self.synth_expr(left);
                self.synth_expr(right);
                Ty::BOOLEAN
            }
        }
    }

    /// Identifiers known to be non-nullish when `cond` is truthy, with their
    /// narrowed types.
    pub(super) fn truthy_narrowing(&self, cond: &Expr) -> Vec<(String, Ty)> {
        match cond {
            Expr::Ident(ident) => {
                let current = self
                    .env
                    .lookup(&ident.name)
                    .cloned()
                    .or_else(|| self.catalog.value(&ident.name).map(|v| v.ty.clone()));
                match current {
                    Some(ty) if ty.is_possibly_nullish() => vec![(ident.name.clone(), ty.non_nullish())],
                    _ => Vec::new(),
                }
            }
            Expr::Binary {
                op: BinaryOp::And,
                left,
                right,
                ..
            } => {
                let mut names = self.truthy_narrowing(left);
                names.extend(self.truthy_narrowing(right));
                names
            }
            _ => Vec::new(),
        }
    }

    /// Checks `expr` against a declared type, reporting mismatches against
    /// `target`.
    pub(super) fn check_against(&mut self, expr: &Expr, expected: &Ty, target: &Target) {
        let expanded = self.catalog.expand_alias(expected);
        if expanded.is_any_like() {
            self.synth_expr(expr);
            return;
        }

        match expr {
            Expr::Object { props, span } => {
                if let Some((object_ty, shape)) = self.object_target(&expanded) {
                    self.check_object_literal(props, &object_ty, &shape, *span);
                    return;
                }
            }
            Expr::Arrow {
                params,
                ret,
                body,
                span,
            } => {
                let context = self.call_context(&expanded);
                let ty = self.arrow(params, ret.as_ref(), body, context.as_ref());
                self.expect_assignable(&ty, expected, target, *span);
                return;
            }
            Expr::Array { elements, .. } => {
                if let Ty::Array(elem) = self.catalog.expand_alias(&expanded.non_nullish()) {
                    for element in elements {
                        self.check_against(element, &elem, target);
                    }
                    return;
                }
            }
            _ => {}
        }

        let found = self.synth_expr(expr);
        self.expect_assignable(&found, expected, target, expr.span());
    }

    fn expect_assignable(&mut self, found: &Ty, expected: &Ty, target: &Target, span: Span) {
        if found.contains_error() || self.is_assignable(found, expected) {
            return;
        }
        self.error(TypeError::TypeMismatch {
            target: target.clone(),
            expected: expected.clone(),
            found: found.clone(),
            span,
        });
    }

    /// The single object type an object literal is checked against, with
    /// its members.
    fn object_target(&self, expected: &Ty) -> Option<(Ty, ObjectShape)> {
        let object_ty = self.catalog.expand_alias(&expected.non_nullish());
        match &object_ty {
            Ty::Named { .. } | Ty::Object(_) => {
                let shape = self.catalog.shape_of(&object_ty)?;
                Some((object_ty, shape))
            }
            _ => None,
        }
    }

    fn check_object_literal(&mut self, props: &[ObjectProp], object_ty: &Ty, shape: &ObjectShape, span: Span) {
        for prop in props {
            let key = &prop.key.name;
            match shape.prop(key) {
                Some(declared) => {
                    let ty = declared.read_ty();
                    self.check_against(&prop.value, &ty, &Target::Property(key.clone()));
                }
                None => match &shape.index {
                    Some(index) => {
                        let index = index.clone();
                        self.check_against(&prop.value, &index, &Target::Property(key.clone()));
                    }
                    None => {
                        self.synth_expr(&prop.value);
                        if self.options.excess_property_checks {
                            let suggestion = similar_name(key, shape.props.iter().map(|p| p.name.as_str()));
                            self.error(TypeError::UnknownOption {
                                key: key.clone(),
                                ty: object_ty.clone(),
                                suggestion,
                                span: prop.key.span,
                            });
                        }
                    }
                },
            }
        }

        for declared in &shape.props {
            if !declared.optional && !props.iter().any(|p| p.key.name == declared.name) {
                self.error(TypeError::MissingProperty {
                    name: declared.name.clone(),
                    target: object_ty.clone(),
                    span,
                });
            }
        }
    }

    /// The signature that types the parameters of an arrow passed where
    /// `expected` is required.
    fn call_context(&self, expected: &Ty) -> Option<Signature> {
        let callable = self.catalog.expand_alias(&expected.non_nullish());
        match callable {
            Ty::Function(mut sigs) => (!sigs.is_empty()).then(|| sigs.remove(0)),
            ty => self
                .catalog
                .shape_of(&ty)
                .and_then(|shape| shape.calls.into_iter().next()),
        }
    }

    /// Checks an arrow function, with parameter types from `context` where
    /// they are not annotated.
    pub(super) fn arrow(
        &mut self,
        params: &[Param],
        ret: Option<&TypeExpr>,
        body: &ArrowBody,
        context: Option<&Signature>,
    ) -> Ty {
        let mut sig_params = Vec::with_capacity(params.len());
        let mut bindings = Vec::with_capacity(params.len());

        for (index, param) in params.iter().enumerate() {
            let ty = match &param.ty {
                Some(ty) => self.resolve_type(ty),
                None if param.rest => match context.and_then(|c| c.params.get(index)) {
                    Some(p) if p.rest => p.ty.clone(),
                    _ => Ty::Array(Box::new(Ty::Any)),
                },
                None => context
                    .and_then(|c| c.param_for(index))
                    .map_or(Ty::Any, |(_, ty)| ty),
            };
            bindings.push((param.name.name.clone(), ty.clone()));
            sig_params.push(ParamTy {
                name: param.name.name.clone(),
                ty,
                optional: param.optional,
                rest: param.rest,
            });
        }

        let declared = ret.map(|ret| self.resolve_type(ret));

        self.env.new_scope();
        for (name, ty) in bindings {
            self.env.bind(name, ty);
        }

        let ret = match body {
            ArrowBody::Expr(expr) => match &declared {
                Some(declared) => {
                    self.check_against(expr, declared, &Target::Return);
                    declared.clone()
                }
                None => self.synth_expr(expr),
            },
            ArrowBody::Block { stmts, .. } => {
                self.returns.push(ReturnFrame {
                    declared: declared.clone(),
                    found: Vec::new(),
                });
                for stmt in stmts {
                    self.check_stmt(stmt);
                }
                let frame = self.returns.pop();
                match (declared, frame) {
                    (Some(declared), _) => declared,
                    (None, Some(frame)) if !frame.found.is_empty() => Ty::union(frame.found),
                    _ => Ty::VOID,
                }
            }
        };

        self.env.pop_scope();
        Ty::Function(vec![Signature { params: sig_params, ret }])
    }
}

#[cfg(test)]
mod tests {
    use super::super::Checker;
    use crate::catalog::Catalog;
    use crate::error::TypeError;
    use crate::options::CheckOptions;
    use crate::types::Ty;
    use tyconform_syntax::ast::{Expr, StmtKind};
    use tyconform_syntax::{parse_declarations, parse_fixture};

    const DECLS: &str = r#"
        interface Array<T> { length: number; forEach(callbackfn: (value: T, index: number) => void): void; }
        interface Dict<T> { [key: string]: T | undefined; }
        interface Worker { id: number; isDead(): boolean; disconnect(): this; }
        interface Settings { cwd?: string; serialization?: "json" | "advanced"; args?: string[]; }
        interface Cluster { workers?: Dict<Worker>; worker?: Worker; settings: Settings; }
        declare const cluster: Cluster;
    "#;

    fn catalog() -> Catalog {
        let file = parse_declarations(DECLS).unwrap();
        let (catalog, errors) = Catalog::builder().file(&file).build();
        assert!(errors.is_empty(), "{errors:?}");
        catalog
    }

    fn expr(source: &str) -> Expr {
        let fixture = parse_fixture(source).unwrap();
        match fixture.stmts.into_iter().next().map(|s| s.kind) {
            Some(StmtKind::Expr(expr)) => expr,
            other => panic!("expected expression statement, got {other:?}"),
        }
    }

    fn synth(source: &str) -> (String, Vec<TypeError>) {
        let catalog = catalog();
        let mut checker = Checker::new(&catalog, CheckOptions::default());
        let ty = checker.synth(&expr(source));
        (catalog.canonical(&ty).to_string(), checker.errors().to_vec())
    }

    #[test]
    fn test_literals() {
        assert_eq!(synth("\"json\";").0, "\"json\"");
        assert_eq!(synth("1;").0, "1");
        assert_eq!(synth("null;").0, "null");
    }

    #[test]
    fn test_member_and_optional_property() {
        assert_eq!(synth("cluster.worker;").0, "Worker | undefined");
        assert_eq!(synth("cluster.settings.serialization;").0, "\"advanced\" | \"json\" | undefined");
    }

    #[test]
    fn test_possibly_undefined() {
        let (ty, errors) = synth("cluster.worker.id;");
        assert_eq!(ty, "number");
        assert!(matches!(errors.as_slice(), [TypeError::PossiblyUndefined { expr, .. }] if expr == "cluster.worker"));
    }

    #[test]
    fn test_possibly_undefined_disabled() {
        let catalog = catalog();
        let options = CheckOptions {
            strict_null_checks: false,
            ..CheckOptions::default()
        };
        let mut checker = Checker::new(&catalog, options);
        checker.synth(&expr("cluster.worker.id;"));
        assert!(checker.errors().is_empty());
    }

    #[test]
    fn test_non_null_and_this_return() {
        assert_eq!(synth("cluster.worker!.disconnect();").0, "Worker");
    }

    #[test]
    fn test_index_signature_access() {
        assert_eq!(synth("cluster.workers![\"1\"];").0, "Worker | undefined");
    }

    #[test]
    fn test_logical_operators() {
        let (ty, errors) = synth("cluster.worker && cluster.worker.isDead();");
        // member paths are not narrowed
        assert_eq!(errors.len(), 1);
        assert_eq!(ty, "boolean | undefined");

        assert_eq!(synth("!cluster.worker;").0, "boolean");
        assert_eq!(synth("cluster.worker || null;").0, "Worker | null");
    }

    #[test]
    fn test_unknown_member_and_name() {
        let (ty, errors) = synth("cluster.wrokers;");
        assert_eq!(ty, "any");
        assert!(matches!(errors.as_slice(), [TypeError::UnknownMember { name, .. }] if name == "wrokers"));

        let (_, errors) = synth("clutser.fork();");
        assert!(matches!(errors.as_slice(), [TypeError::UnknownName { name, .. }] if name == "clutser"));
    }

    #[test]
    fn test_object_and_array_literals_widen() {
        assert_eq!(synth("({ cwd: \"/tmp\", n: 1 });").0, "{ cwd: string; n: number }");
        assert_eq!(synth("[\"a\", 1];").0, "(number | string)[]");
    }

    #[test]
    fn test_arrow_with_context() {
        let (_, errors) = synth("[\"a\"].forEach((value, index) => value);");
        assert!(errors.is_empty(), "{errors:?}");
    }

    #[test]
    fn test_arrow_without_context() {
        let (ty, errors) = synth("(x: number) => x;");
        assert!(errors.is_empty());
        assert_eq!(ty, "(x: number) => number");
    }

    #[test]
    fn test_object_literal_against_settings() {
        let catalog = catalog();
        let mut checker = Checker::new(&catalog, CheckOptions::default());
        let settings = Ty::named("Settings");
        let literal = expr("({ serialization: \"xml\", colour: 1, args: [\"a\", 2] });");
        checker.check_against(&literal, &settings, &crate::error::Target::Parameter("settings".into()));

        let kinds: Vec<(&str, Option<&str>)> = checker.errors().iter().map(|e| (e.kind(), e.subject())).collect();
        assert_eq!(
            kinds,
            [
                ("TypeMismatch", Some("serialization")),
                ("UnknownOption", Some("colour")),
                ("TypeMismatch", Some("args")),
            ]
        );
    }
}
